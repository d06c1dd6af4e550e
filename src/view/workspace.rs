//! Registry of open views, keyed by view type.
//!
//! Opening a view renders it immediately. Refreshing walks every open view
//! of every type; a view that fails to render is logged and skipped so one
//! broken sink cannot block the others.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::settings::Settings;
use crate::skills::SkillRegistry;

/// A surface that displays the skill registry.
pub trait View: Send {
    /// Tag used to group and look up views of the same kind.
    fn view_type(&self) -> &'static str;

    /// Tear down and redraw from scratch.
    fn render(&mut self, registry: &SkillRegistry, settings: &Settings) -> Result<()>;
}

/// Open views grouped by type tag.
#[derive(Default)]
pub struct Workspace {
    views: BTreeMap<&'static str, Vec<Box<dyn View>>>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a view and draw its first frame.
    pub fn open(&mut self, mut view: Box<dyn View>, registry: &SkillRegistry, settings: &Settings) {
        draw(view.as_mut(), registry, settings);
        self.views.entry(view.view_type()).or_default().push(view);
    }

    /// Redraw the open views of `view_type`.
    ///
    /// Returns `false` when none are open, leaving the caller to open one.
    pub fn reveal(
        &mut self,
        view_type: &str,
        registry: &SkillRegistry,
        settings: &Settings,
    ) -> bool {
        match self.views.get_mut(view_type) {
            Some(views) if !views.is_empty() => {
                for view in views.iter_mut() {
                    draw(view.as_mut(), registry, settings);
                }
                true
            }
            _ => false,
        }
    }

    /// Close every view of `view_type`, returning how many were closed.
    pub fn detach(&mut self, view_type: &str) -> usize {
        self.views.remove(view_type).map(|v| v.len()).unwrap_or(0)
    }

    /// Close everything.
    pub fn detach_all(&mut self) {
        self.views.clear();
    }

    /// Number of open views of `view_type`.
    pub fn count(&self, view_type: &str) -> usize {
        self.views.get(view_type).map(Vec::len).unwrap_or(0)
    }

    /// Redraw every open view.
    pub fn refresh(&mut self, registry: &SkillRegistry, settings: &Settings) {
        for view in self.views.values_mut().flatten() {
            draw(view.as_mut(), registry, settings);
        }
    }
}

fn draw(view: &mut dyn View, registry: &SkillRegistry, settings: &Settings) {
    if let Err(e) = view.render(registry, settings) {
        tracing::warn!(view_type = view.view_type(), error = %e, "view render failed");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::VaultXpError;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// Cloneable in-memory sink for inspecting what views wrote.
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }

        pub fn clear(&self) {
            self.0.lock().unwrap().clear();
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Counts renders; optionally fails every one.
    pub struct CountingView {
        pub renders: Arc<Mutex<usize>>,
        pub fail: bool,
    }

    impl View for CountingView {
        fn view_type(&self) -> &'static str {
            "counting"
        }

        fn render(&mut self, _: &SkillRegistry, _: &Settings) -> Result<()> {
            *self.renders.lock().unwrap() += 1;
            if self.fail {
                return Err(VaultXpError::view("sink closed"));
            }
            Ok(())
        }
    }

    fn counting(fail: bool) -> (Box<dyn View>, Arc<Mutex<usize>>) {
        let renders = Arc::new(Mutex::new(0));
        let view = CountingView {
            renders: Arc::clone(&renders),
            fail,
        };
        (Box::new(view), renders)
    }

    #[test]
    fn test_open_renders_once() {
        let mut workspace = Workspace::new();
        let (view, renders) = counting(false);

        workspace.open(view, &SkillRegistry::new(), &Settings::default());

        assert_eq!(*renders.lock().unwrap(), 1);
        assert_eq!(workspace.count("counting"), 1);
    }

    #[test]
    fn test_reveal_without_open_view_returns_false() {
        let mut workspace = Workspace::new();
        assert!(!workspace.reveal("counting", &SkillRegistry::new(), &Settings::default()));
    }

    #[test]
    fn test_refresh_redraws_every_view_even_after_failure() {
        let mut workspace = Workspace::new();
        let registry = SkillRegistry::new();
        let settings = Settings::default();
        let (broken, broken_renders) = counting(true);
        let (healthy, healthy_renders) = counting(false);

        workspace.open(broken, &registry, &settings);
        workspace.open(healthy, &registry, &settings);
        workspace.refresh(&registry, &settings);

        assert_eq!(*broken_renders.lock().unwrap(), 2);
        assert_eq!(*healthy_renders.lock().unwrap(), 2);
    }

    #[test]
    fn test_detach() {
        let mut workspace = Workspace::new();
        let (a, _) = counting(false);
        let (b, _) = counting(false);
        workspace.open(a, &SkillRegistry::new(), &Settings::default());
        workspace.open(b, &SkillRegistry::new(), &Settings::default());

        assert_eq!(workspace.detach("counting"), 2);
        assert_eq!(workspace.count("counting"), 0);
        assert_eq!(workspace.detach("counting"), 0);
    }

    #[test]
    fn test_shared_buffer_captures_stats_view() {
        use crate::view::{StatsView, STATS_VIEW_TYPE};

        let buffer = SharedBuffer::default();
        let mut workspace = Workspace::new();
        workspace.open(
            Box::new(StatsView::new(Box::new(buffer.clone()))),
            &SkillRegistry::new(),
            &Settings::default(),
        );

        assert_eq!(workspace.count(STATS_VIEW_TYPE), 1);
        assert!(buffer.contents().contains("Lv 0"));
        assert!(buffer.contents().contains("Scribe"));
    }
}

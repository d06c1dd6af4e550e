//! Live settings panel for `vaultxp watch`.
//!
//! Reads one command per line from stdin and forwards it to the running
//! controller:
//!
//! ```text
//! names on|off|toggle   show or hide skill names
//! interval <minutes>    change the update interval
//! refresh               run a cycle now
//! show                  redraw the stats view
//! quit                  stop watching
//! ```

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::controller::ControlCommand;

/// Help text printed for unrecognized input.
pub const PANEL_HELP: &str =
    "commands: names on|off|toggle, interval <minutes>, refresh, show, quit";

/// Line parser for panel commands.
pub struct SettingsPanel;

impl SettingsPanel {
    /// Parse one input line. Blank or unknown input yields `None`.
    pub fn parse(line: &str) -> Option<ControlCommand> {
        let mut words = line.split_whitespace();
        let command = words.next()?.to_ascii_lowercase();
        let arg = words.next();

        match (command.as_str(), arg) {
            ("names", Some(value)) => match value.to_ascii_lowercase().as_str() {
                "on" | "true" | "show" => Some(ControlCommand::SetShowSkillNames(true)),
                "off" | "false" | "hide" => Some(ControlCommand::SetShowSkillNames(false)),
                "toggle" => Some(ControlCommand::ToggleShowSkillNames),
                _ => None,
            },
            ("names", None) => Some(ControlCommand::ToggleShowSkillNames),
            // Whatever was typed goes through; invalid values fall back later.
            ("interval", value) => Some(ControlCommand::SetUpdateInterval(
                value.unwrap_or_default().to_string(),
            )),
            ("refresh", None) => Some(ControlCommand::Refresh),
            ("show", None) => Some(ControlCommand::Render),
            ("quit" | "exit" | "q", None) => Some(ControlCommand::Quit),
            _ => None,
        }
    }

    /// Forward parsed lines from `input` until it ends or the receiver is gone.
    pub async fn forward<R>(input: R, commands: mpsc::Sender<ControlCommand>)
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read panel input");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            match Self::parse(&line) {
                Some(command) => {
                    tracing::debug!(?command, "panel command");
                    if commands.send(command).await.is_err() {
                        break;
                    }
                }
                None => eprintln!("{}", PANEL_HELP),
            }
        }
    }

    /// Spawn a task that feeds stdin lines to the controller.
    pub fn spawn_stdin(commands: mpsc::Sender<ControlCommand>) -> JoinHandle<()> {
        tokio::spawn(Self::forward(BufReader::new(tokio::io::stdin()), commands))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!(
            SettingsPanel::parse("names on"),
            Some(ControlCommand::SetShowSkillNames(true))
        );
        assert_eq!(
            SettingsPanel::parse("  NAMES Off "),
            Some(ControlCommand::SetShowSkillNames(false))
        );
        assert_eq!(
            SettingsPanel::parse("names toggle"),
            Some(ControlCommand::ToggleShowSkillNames)
        );
        assert_eq!(
            SettingsPanel::parse("names"),
            Some(ControlCommand::ToggleShowSkillNames)
        );
        assert_eq!(SettingsPanel::parse("names maybe"), None);
    }

    #[test]
    fn test_parse_interval_keeps_raw_input() {
        assert_eq!(
            SettingsPanel::parse("interval 10"),
            Some(ControlCommand::SetUpdateInterval("10".to_string()))
        );
        assert_eq!(
            SettingsPanel::parse("interval abc"),
            Some(ControlCommand::SetUpdateInterval("abc".to_string()))
        );
        assert_eq!(
            SettingsPanel::parse("interval"),
            Some(ControlCommand::SetUpdateInterval(String::new()))
        );
    }

    #[test]
    fn test_parse_other_commands() {
        assert_eq!(SettingsPanel::parse("refresh"), Some(ControlCommand::Refresh));
        assert_eq!(SettingsPanel::parse("show"), Some(ControlCommand::Render));
        assert_eq!(SettingsPanel::parse("quit"), Some(ControlCommand::Quit));
        assert_eq!(SettingsPanel::parse("q"), Some(ControlCommand::Quit));
        assert_eq!(SettingsPanel::parse(""), None);
        assert_eq!(SettingsPanel::parse("dance"), None);
        assert_eq!(SettingsPanel::parse("refresh now"), None);
    }

    #[tokio::test]
    async fn test_forward_sends_parsed_lines() {
        let input: &[u8] = b"names off\n\nbogus\ninterval 3\nquit\n";
        let (tx, mut rx) = mpsc::channel(8);

        SettingsPanel::forward(input, tx).await;

        assert_eq!(rx.recv().await, Some(ControlCommand::SetShowSkillNames(false)));
        assert_eq!(
            rx.recv().await,
            Some(ControlCommand::SetUpdateInterval("3".to_string()))
        );
        assert_eq!(rx.recv().await, Some(ControlCommand::Quit));
        assert_eq!(rx.recv().await, None);
    }
}

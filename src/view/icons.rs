//! Symbolic icon names to terminal glyphs.
//!
//! Every glyph is a single-column character so grid cells stay aligned.

/// Glyph used for icon names with no mapping.
pub const FALLBACK_GLYPH: &str = "•";

/// Resolve a symbolic icon name to a glyph.
pub fn glyph(name: &str) -> &'static str {
    match name {
        "pencil" => "✎",
        "archive" => "▤",
        "package" => "▣",
        "image" => "▨",
        "link" => "⇄",
        "check-square" => "☑",
        "hash" => "#",
        "trophy" => "★",
        "book" => "◫",
        "star" => "☆",
        _ => FALLBACK_GLYPH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::SkillKind;

    #[test]
    fn test_every_default_icon_has_a_glyph() {
        for kind in SkillKind::ALL {
            assert_ne!(glyph(kind.default_icon()), FALLBACK_GLYPH, "{kind}");
        }
    }

    #[test]
    fn test_unknown_icon_falls_back() {
        assert_eq!(glyph("unicorn"), FALLBACK_GLYPH);
    }

    #[test]
    fn test_glyphs_are_single_chars() {
        for kind in SkillKind::ALL {
            assert_eq!(glyph(kind.default_icon()).chars().count(), 1);
        }
    }
}

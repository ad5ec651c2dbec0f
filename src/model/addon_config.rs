//! The generation form: everything a user says about the addon they want.

use serde::{Deserialize, Serialize};

use super::{AddonType, Settings};

/// Input to the generate stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonConfig {
    pub addon_type: AddonType,
    pub addon_name: String,
    pub features: String,
    pub ui_layout: String,
    pub behavior: String,
    pub toc_version: String,
    pub toc_author: String,
    pub toc_deps: String,
    pub toc_interface: String,
}

impl AddonConfig {
    /// Fills empty TOC fields from the saved defaults.
    ///
    /// Fields the user typed are left alone.
    #[must_use]
    pub fn with_defaults(mut self, settings: &Settings) -> Self {
        fill(&mut self.toc_interface, &settings.default_interface);
        fill(&mut self.toc_author, &settings.default_author);
        fill(&mut self.toc_deps, &settings.default_deps);
        self
    }

    /// Whether the name follows the addon folder naming convention:
    /// a leading letter, then letters, digits, or underscores.
    pub fn has_conventional_name(&self) -> bool {
        let mut chars = self.addon_name.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// Live specification preview in the notes dialect.
    pub fn preview(&self) -> String {
        let mut lines = Vec::new();
        if !self.addon_name.is_empty() {
            lines.push(format!("**Addon Name:** {}", self.addon_name));
        }
        lines.push(format!("**Type:** {}", self.addon_type.label()));
        if !self.features.is_empty() {
            lines.push(format!("\n### Features\n{}", self.features));
        }
        if !self.ui_layout.is_empty() {
            lines.push(format!("\n### UI Layout\n{}", self.ui_layout));
        }
        if !self.behavior.is_empty() {
            lines.push(format!("\n### Behavior & API\n{}", self.behavior));
        }
        if !(self.toc_interface.is_empty()
            && self.toc_version.is_empty()
            && self.toc_author.is_empty())
        {
            lines.push("\n### TOC Metadata".to_string());
            push_item(&mut lines, "Interface", &self.toc_interface);
            push_item(&mut lines, "Version", &self.toc_version);
            push_item(&mut lines, "Author", &self.toc_author);
            push_item(&mut lines, "Dependencies", &self.toc_deps);
        }
        lines.join("\n")
    }
}

fn fill(field: &mut String, default: &str) {
    if field.trim().is_empty() && !default.is_empty() {
        *field = default.to_string();
    }
}

fn push_item(lines: &mut Vec<String>, label: &str, value: &str) {
    if !value.is_empty() {
        lines.push(format!("- {label}: {value}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AddonConfig {
        AddonConfig {
            addon_type: AddonType::Combat,
            addon_name: "DPSMeterPro".into(),
            features: "Track damage".into(),
            ..AddonConfig::default()
        }
    }

    #[test]
    fn defaults_fill_only_empty_fields() {
        let settings = Settings {
            default_interface: "110002".into(),
            default_author: "Someone".into(),
            default_deps: "Ace3".into(),
        };
        let mut cfg = config();
        cfg.toc_author = "Me".into();

        let cfg = cfg.with_defaults(&settings);

        assert_eq!(cfg.toc_interface, "110002");
        assert_eq!(cfg.toc_author, "Me");
        assert_eq!(cfg.toc_deps, "Ace3");
    }

    #[test]
    fn conventional_names() {
        let mut cfg = config();
        assert!(cfg.has_conventional_name());

        cfg.addon_name = "9Lives".into();
        assert!(!cfg.has_conventional_name());

        cfg.addon_name = "Guild Roster+".into();
        assert!(!cfg.has_conventional_name());
    }

    #[test]
    fn preview_skips_empty_sections() {
        let preview = config().preview();

        assert!(preview.starts_with("**Addon Name:** DPSMeterPro\n**Type:** Combat"));
        assert!(preview.contains("### Features\nTrack damage"));
        assert!(!preview.contains("UI Layout"));
        assert!(!preview.contains("TOC Metadata"));
    }

    #[test]
    fn preview_lists_toc_metadata() {
        let mut cfg = config();
        cfg.toc_version = "1.0.0".into();
        cfg.toc_deps = "Ace3".into();

        let preview = cfg.preview();

        assert!(preview.contains("### TOC Metadata\n- Version: 1.0.0\n- Dependencies: Ace3"));
    }
}

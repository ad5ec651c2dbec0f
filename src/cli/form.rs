//! Generation form flags, shared by `generate` and `preview`.

use clap::{Args, ValueEnum};

use crate::model::{AddonConfig, AddonType};
use crate::notes;
use crate::storage::Storage;

#[derive(Debug, Clone, Args)]
pub struct FormArgs {
    /// Addon name (letters, digits, underscores; starts with a letter).
    #[arg(long, default_value = "")]
    name: String,

    /// Addon category.
    #[arg(long = "type", value_enum, default_value_t = TypeArg::Ui)]
    addon_type: TypeArg,

    /// What the addon should do.
    #[arg(long, default_value = "")]
    features: String,

    /// How the addon's frames should look and behave on screen.
    #[arg(long, default_value = "")]
    ui_layout: String,

    /// Events, slash commands, saved variables, and APIs to use.
    #[arg(long, default_value = "")]
    behavior: String,

    /// `## Interface` build number. Defaults to the saved setting.
    #[arg(long, default_value = "")]
    interface: String,

    /// `## Version` of the addon. Left out of the prompt when empty.
    #[arg(long, default_value = "")]
    version: String,

    /// `## Author`. Defaults to the saved setting.
    #[arg(long, default_value = "")]
    author: String,

    /// `## Dependencies`. Defaults to the saved setting.
    #[arg(long, default_value = "")]
    deps: String,
}

/// CLI-facing addon category, mapped to the domain `AddonType`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TypeArg {
    /// UI Enhancement.
    Ui,
    /// Data Display.
    Data,
    /// Automation.
    Auto,
    /// Social.
    Social,
    /// Combat.
    Combat,
}

impl TypeArg {
    fn to_domain(self) -> AddonType {
        match self {
            Self::Ui => AddonType::Ui,
            Self::Data => AddonType::Data,
            Self::Auto => AddonType::Auto,
            Self::Social => AddonType::Social,
            Self::Combat => AddonType::Combat,
        }
    }
}

impl FormArgs {
    pub fn into_config(self) -> AddonConfig {
        AddonConfig {
            addon_type: self.addon_type.to_domain(),
            addon_name: self.name,
            features: self.features,
            ui_layout: self.ui_layout,
            behavior: self.behavior,
            toc_version: self.version,
            toc_author: self.author,
            toc_deps: self.deps,
            toc_interface: self.interface,
        }
    }
}

pub(super) fn cmd_preview(storage: &Storage, form: FormArgs) -> Result<(), String> {
    let config = form.into_config().with_defaults(&storage.load_settings());
    warn_unconventional(&config);
    println!("{}", notes::to_plain(&config.preview()));
    Ok(())
}

pub(super) fn warn_unconventional(config: &AddonConfig) {
    if !config.addon_name.is_empty() && !config.has_conventional_name() {
        eprintln!(
            "Warning: '{}' is not a conventional addon folder name \
             (letters, digits, underscores; starts with a letter)",
            config.addon_name
        );
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        form: FormArgs,
    }

    #[test]
    fn flags_map_onto_the_form() {
        let harness = Harness::parse_from([
            "forge",
            "--name",
            "DPSMeter",
            "--type",
            "combat",
            "--features",
            "Track DPS",
            "--deps",
            "Ace3",
        ]);

        let config = harness.form.into_config();

        assert_eq!(config.addon_name, "DPSMeter");
        assert_eq!(config.addon_type, AddonType::Combat);
        assert_eq!(config.features, "Track DPS");
        assert_eq!(config.toc_version, "");
        assert_eq!(config.toc_deps, "Ace3");
        assert_eq!(config.toc_interface, "");
    }

    #[test]
    fn version_is_only_set_when_given() {
        let harness = Harness::parse_from(["forge", "--name", "X", "--version", "2.1.0"]);
        assert_eq!(harness.form.into_config().toc_version, "2.1.0");

        let harness = Harness::parse_from(["forge", "--name", "X"]);
        assert!(!harness.form.into_config().preview().contains("Version"));
    }
}

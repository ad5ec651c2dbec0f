//! Settings commands: show, set.

use clap::Subcommand;

use crate::model::Settings;
use crate::storage::Storage;

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print the saved defaults.
    Show,

    /// Change one or more defaults. Pass an empty string to clear one.
    Set {
        /// Default `## Interface` build number.
        #[arg(long)]
        interface: Option<String>,

        /// Default `## Author`.
        #[arg(long)]
        author: Option<String>,

        /// Default `## Dependencies`.
        #[arg(long)]
        deps: Option<String>,
    },
}

pub(super) fn run(storage: &Storage, command: SettingsCommand) -> Result<(), String> {
    match command {
        SettingsCommand::Show => {
            println!("{}", format_settings(&storage.load_settings()));
            Ok(())
        }
        SettingsCommand::Set {
            interface,
            author,
            deps,
        } => {
            if interface.is_none() && author.is_none() && deps.is_none() {
                return Err("nothing to set: pass --interface, --author, or --deps".to_string());
            }
            let mut settings = storage.load_settings();
            apply(&mut settings, interface, author, deps);
            storage
                .save_settings(&settings)
                .map_err(|e| format!("failed to save settings: {e}"))?;
            println!("{}", format_settings(&settings));
            Ok(())
        }
    }
}

fn apply(
    settings: &mut Settings,
    interface: Option<String>,
    author: Option<String>,
    deps: Option<String>,
) {
    if let Some(interface) = interface {
        settings.default_interface = interface;
    }
    if let Some(author) = author {
        settings.default_author = author;
    }
    if let Some(deps) = deps {
        settings.default_deps = deps;
    }
}

fn format_settings(settings: &Settings) -> String {
    let show = |value: &str| {
        if value.is_empty() {
            "(unset)".to_string()
        } else {
            value.to_string()
        }
    };
    format!(
        "interface     {}\nauthor        {}\ndependencies  {}",
        show(&settings.default_interface),
        show(&settings.default_author),
        show(&settings.default_deps),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_changes_only_given_fields() {
        let mut settings = Settings {
            default_interface: "110002".into(),
            default_author: "Me".into(),
            default_deps: "Ace3".into(),
        };

        apply(&mut settings, None, Some(String::new()), Some("LibStub".into()));

        assert_eq!(settings.default_interface, "110002");
        assert_eq!(settings.default_author, "");
        assert_eq!(settings.default_deps, "LibStub");
    }

    #[test]
    fn unset_fields_are_labelled() {
        let text = format_settings(&Settings::default());
        assert!(text.starts_with("interface     (unset)"));
    }
}

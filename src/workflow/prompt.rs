//! Natural-language prompts sent to the gateway, one builder per stage.

use std::fmt::Write;

use crate::model::{AddonConfig, AddonFile};

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Initial addon commit";

/// Asks for a complete addon. Empty form fields are left out.
pub fn generate(config: &AddonConfig) -> String {
    let mut prompt = format!(
        "Create a World of Warcraft addon named \"{}\" of type \"{}\".",
        config.addon_name,
        config.addon_type.label()
    );
    section(&mut prompt, "Feature Requirements", &config.features);
    section(&mut prompt, "UI Layout Preferences", &config.ui_layout);
    section(&mut prompt, "Behavior & API Requirements", &config.behavior);

    prompt.push_str("\n\nTOC Metadata:");
    item(&mut prompt, "Interface", &config.toc_interface);
    item(&mut prompt, "Version", &config.toc_version);
    item(&mut prompt, "Author", &config.toc_author);
    item(&mut prompt, "Dependencies", &config.toc_deps);

    prompt.push_str(
        "\n\nPlease generate all required files (.toc, .lua, .xml as needed) with complete, \
         production-ready code. Include a file_tree showing the addon directory structure, \
         a specification_summary, and a generation_summary.",
    );
    prompt
}

/// Sends the current files with the developer's feedback.
pub fn refine(addon_name: &str, files: &[AddonFile], feedback: &str) -> String {
    format!(
        "Current addon \"{addon_name}\" files:\n{}\n\nDeveloper Feedback: {feedback}\n\n\
         Please analyze the feedback and produce updated files with the requested changes.",
        files_json(files)
    )
}

/// Asks for the files to be committed to a repository.
pub fn deliver(
    addon_name: &str,
    files: &[AddonFile],
    repo: &str,
    branch: &str,
    message: &str,
) -> String {
    format!(
        "Create a GitHub repository and commit these WoW addon files.\n\
         Repository: {repo}\nBranch: {branch}\nCommit message: {message}\n\
         Addon name: {addon_name}\n\nFiles:\n{}",
        files_json(files)
    )
}

/// Asks for an installable archive.
pub fn package(addon_name: &str, files: &[AddonFile]) -> String {
    format!(
        "Package these WoW addon files into a ZIP named {addon_name}.zip for direct \
         extraction into Interface/AddOns folder:\n{}",
        files_json(files)
    )
}

fn files_json(files: &[AddonFile]) -> String {
    serde_json::to_string(files).unwrap_or_default()
}

fn section(prompt: &mut String, heading: &str, body: &str) {
    if !body.is_empty() {
        let _ = write!(prompt, "\n\n{heading}:\n{body}");
    }
}

fn item(prompt: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        let _ = write!(prompt, "\n- {label}: {value}");
    }
}

//! Typed stage replies, validated from the gateway's untyped `result`.
//!
//! Every field is optional on the wire. Missing or mistyped fields take the
//! stage's default; nothing here fails.

use serde_json::Value;

use crate::model::{AddonFile, FileType};

/// What the generate capability produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReply {
    /// Empty when the agent did not name the addon.
    pub addon_name: String,
    pub files: Vec<AddonFile>,
    pub file_tree: String,
    pub specification_summary: String,
    pub generation_summary: String,
}

impl GenerateReply {
    pub fn from_result(result: Option<&Value>) -> Self {
        Self {
            addon_name: text(result, "addon_name").unwrap_or_default(),
            files: files(result, "files"),
            file_tree: text(result, "file_tree").unwrap_or_default(),
            specification_summary: text(result, "specification_summary").unwrap_or_default(),
            generation_summary: text(result, "generation_summary").unwrap_or_default(),
        }
    }
}

/// One per-file change reported by the refine capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    pub filename: String,
    pub change_description: String,
}

/// What the refine capability produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefineReply {
    /// Empty means "no file changes", not "delete everything".
    pub updated_files: Vec<AddonFile>,
    pub modifications: Vec<Modification>,
    pub feedback_summary: Option<String>,
}

impl RefineReply {
    pub fn from_result(result: Option<&Value>) -> Self {
        let modifications = array(result, "modifications")
            .iter()
            .map(|m| Modification {
                filename: text(Some(m), "filename").unwrap_or_else(|| "unknown".to_string()),
                change_description: text(Some(m), "change_description")
                    .unwrap_or_else(|| "updated".to_string()),
            })
            .collect();

        Self {
            updated_files: files(result, "updated_files"),
            modifications,
            feedback_summary: text(result, "feedback_summary"),
        }
    }

    /// The agent's side of the conversation: the summary, then one bullet per file.
    pub fn agent_message(&self) -> String {
        let mut message = self
            .feedback_summary
            .clone()
            .unwrap_or_else(|| "Changes applied".to_string());

        if !self.modifications.is_empty() {
            message.push_str("\n\nModifications:\n");
            let bullets: Vec<_> = self
                .modifications
                .iter()
                .map(|m| format!("- **{}**: {}", m.filename, m.change_description))
                .collect();
            message.push_str(&bullets.join("\n"));
        }
        message
    }
}

/// What the deliver capability produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliverReply {
    pub repository_url: String,
    pub gist_url: String,
    pub message: String,
}

impl DeliverReply {
    pub fn from_result(result: Option<&Value>) -> Self {
        Self {
            repository_url: text(result, "repository_url").unwrap_or_default(),
            gist_url: text(result, "gist_url").unwrap_or_default(),
            message: message(result, "Files committed successfully"),
        }
    }
}

/// What the package capability produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageReply {
    pub package_name: Option<String>,
    pub installation_path: Option<String>,
    pub message: String,
}

impl PackageReply {
    pub fn from_result(result: Option<&Value>) -> Self {
        Self {
            package_name: text(result, "package_name"),
            installation_path: text(result, "installation_path"),
            message: message(result, "Package created successfully"),
        }
    }
}

/// `message`, else `status`, else the stage's fallback.
fn message(result: Option<&Value>, fallback: &str) -> String {
    text(result, "message")
        .or_else(|| text(result, "status"))
        .unwrap_or_else(|| fallback.to_string())
}

fn text(value: Option<&Value>, key: &str) -> Option<String> {
    value?.get(key)?.as_str().map(String::from)
}

fn array<'a>(value: Option<&'a Value>, key: &str) -> &'a [Value] {
    value
        .and_then(|v| v.get(key))
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

/// Reads a file list. Entries without a filename are dropped.
fn files(value: Option<&Value>, key: &str) -> Vec<AddonFile> {
    array(value, key)
        .iter()
        .filter_map(|entry| {
            let Some(filename) = text(Some(entry), "filename").filter(|f| !f.is_empty()) else {
                tracing::warn!(key, "dropping file entry without a filename");
                return None;
            };
            let file_type = match text(Some(entry), "file_type").map(|t| FileType::from_tag(&t)) {
                Some(tagged) if tagged != FileType::Other => tagged,
                _ => FileType::from_filename(&filename),
            };
            Some(AddonFile {
                content: text(Some(entry), "content").unwrap_or_default(),
                description: text(Some(entry), "description"),
                filename,
                file_type,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn generate_reads_every_field() {
        let result = json!({
            "addon_name": "X",
            "files": [
                { "filename": "X.toc", "content": "## Title: X", "file_type": "toc" },
                { "filename": "Core.lua", "content": "print(1)", "file_type": "lua",
                  "description": "core" }
            ],
            "file_tree": "X/\n  X.toc",
            "specification_summary": "spec",
            "generation_summary": "**done**"
        });

        let reply = GenerateReply::from_result(Some(&result));

        assert_eq!(reply.addon_name, "X");
        assert_eq!(reply.files.len(), 2);
        assert_eq!(reply.files[1].description.as_deref(), Some("core"));
        assert_eq!(reply.file_tree, "X/\n  X.toc");
        assert_eq!(reply.generation_summary, "**done**");
    }

    #[test]
    fn missing_result_gives_defaults() {
        assert_eq!(GenerateReply::from_result(None), GenerateReply::default());
        assert_eq!(RefineReply::from_result(None).agent_message(), "Changes applied");
        assert_eq!(
            DeliverReply::from_result(None).message,
            "Files committed successfully"
        );
        assert_eq!(
            PackageReply::from_result(None).message,
            "Package created successfully"
        );
    }

    #[test]
    fn file_type_falls_back_to_extension() {
        let result = json!({ "files": [
            { "filename": "UI.xml", "content": "<Ui/>" },
            { "filename": "Core.lua", "content": "", "file_type": "LuaScript" },
            { "filename": "X.toc", "content": "", "file_type": "lua" }
        ]});

        let types: Vec<_> = GenerateReply::from_result(Some(&result))
            .files
            .iter()
            .map(|f| f.file_type)
            .collect();

        assert_eq!(types, [FileType::Markup, FileType::Script, FileType::Script]);
    }

    #[test]
    fn malformed_file_entries_are_dropped() {
        let result = json!({ "files": [ "Core.lua", { "content": "x" }, { "filename": "" },
                                        { "filename": "A.lua", "content": 7 } ] });

        let files = GenerateReply::from_result(Some(&result)).files;

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "A.lua");
        assert_eq!(files[0].content, "");
    }

    #[test]
    fn files_field_of_wrong_type_is_empty() {
        let result = json!({ "files": "Core.lua" });
        assert!(GenerateReply::from_result(Some(&result)).files.is_empty());
    }

    #[test]
    fn refine_message_lists_modifications_with_fallbacks() {
        let result = json!({
            "feedback_summary": "Added a button",
            "modifications": [
                { "filename": "UI.lua", "change_description": "new button" },
                { "change_description": "tweak" },
                { "filename": "Core.lua" }
            ]
        });

        let reply = RefineReply::from_result(Some(&result));

        assert_eq!(
            reply.agent_message(),
            "Added a button\n\nModifications:\n\
             - **UI.lua**: new button\n\
             - **unknown**: tweak\n\
             - **Core.lua**: updated"
        );
        assert!(reply.updated_files.is_empty());
    }

    #[test]
    fn message_falls_back_to_status() {
        let result = json!({ "status": "queued", "repository_url": "https://r" });

        let reply = DeliverReply::from_result(Some(&result));

        assert_eq!(reply.message, "queued");
        assert_eq!(reply.repository_url, "https://r");
        assert_eq!(reply.gist_url, "");
    }

    #[test]
    fn package_keeps_absent_fields_absent() {
        let result = json!({ "installation_path": "AddOns/" });

        let reply = PackageReply::from_result(Some(&result));

        assert_eq!(reply.package_name, None);
        assert_eq!(reply.installation_path.as_deref(), Some("AddOns/"));
    }
}

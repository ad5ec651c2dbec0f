//! Addon files and addon categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One file of a generated addon.
///
/// A stage always produces a full set of these; files are never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonFile {
    pub filename: String,
    pub content: String,
    pub file_type: FileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AddonFile {
    /// Creates a file, inferring its type from the filename extension.
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        let filename = filename.into();
        let file_type = FileType::from_filename(&filename);
        Self {
            filename,
            content: content.into(),
            file_type,
            description: None,
        }
    }

    /// Short label for listings: the description when present, else the file type.
    pub fn label(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => self.file_type.as_str(),
        }
    }
}

/// What kind of source a file holds, which selects its tokenizer.
///
/// Serialized with the gateway's vocabulary: `lua`, `xml`, `toc`, `other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileType {
    /// Lua script.
    Script,
    /// XML frame description.
    Markup,
    /// `.toc` table of contents.
    Manifest,
    Other,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Script => "lua",
            Self::Markup => "xml",
            Self::Manifest => "toc",
            Self::Other => "other",
        }
    }

    /// Parses a gateway file type tag. Unknown tags map to [`FileType::Other`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "lua" | "script" => Self::Script,
            "xml" | "markup" => Self::Markup,
            "toc" | "manifest" => Self::Manifest,
            _ => Self::Other,
        }
    }

    /// Infers the type from a filename extension.
    pub fn from_filename(filename: &str) -> Self {
        match filename.rsplit_once('.') {
            Some((_, ext)) => Self::from_tag(ext),
            None => Self::Other,
        }
    }
}

impl From<String> for FileType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<FileType> for String {
    fn from(file_type: FileType) -> Self {
        file_type.as_str().to_string()
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addon category chosen on the generation form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddonType {
    #[default]
    Ui,
    Data,
    Auto,
    Social,
    Combat,
    #[serde(other)]
    Custom,
}

impl AddonType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ui => "UI Enhancement",
            Self::Data => "Data Display",
            Self::Auto => "Automation",
            Self::Social => "Social",
            Self::Combat => "Combat",
            Self::Custom => "Custom",
        }
    }
}

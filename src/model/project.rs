//! Projects: the persisted record of one generated addon.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AddonFile, AddonType};

/// A saved addon and its latest file set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub addon_type: AddonType,
    #[serde(default)]
    pub files: Vec<AddonFile>,
    pub created_at: Timestamp,
    pub iteration_count: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "fileTree")]
    pub file_tree_text: String,
    #[serde(default)]
    pub spec_summary: String,
}

impl Project {
    /// A freshly generated project at iteration 1.
    pub fn new(name: impl Into<String>, addon_type: AddonType, files: Vec<AddonFile>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            addon_type,
            files,
            created_at: Timestamp::now(),
            iteration_count: 1,
            status: "ready".to_string(),
            file_tree_text: String::new(),
            spec_summary: String::new(),
        }
    }

    /// First eight characters of the id, for listings.
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let project = Project::new("DPSMeterPro", AddonType::Combat, vec![]);
        let json = serde_json::to_value(&project).unwrap();

        assert_eq!(json["type"], "combat");
        assert_eq!(json["iterationCount"], 1);
        assert!(json.get("fileTree").is_some());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn short_id_handles_short_ids() {
        let mut project = Project::new("X", AddonType::Ui, vec![]);
        assert_eq!(project.short_id().len(), 8);

        project.id = "1".into();
        assert_eq!(project.short_id(), "1");
    }
}

//! Project records: the `projects` slot.

use crate::model::Project;

use super::{PROJECTS_SLOT, ProjectRecords, Result, Storage};

impl Storage {
    /// Best-effort read for display.
    fn load_projects(&self) -> Vec<Project> {
        self.read_slot(PROJECTS_SLOT).unwrap_or_default()
    }

    /// Strict read for read-modify-write: an unreadable or malformed list is
    /// an error, never an empty list to be saved over.
    fn load_projects_for_update(&self) -> Result<Vec<Project>> {
        match self.read_raw(PROJECTS_SLOT)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_projects(&self, projects: &[Project]) -> Result<()> {
        self.write_slot(PROJECTS_SLOT, projects)
    }
}

impl ProjectRecords for Storage {
    fn create(&self, project: &Project) -> Result<()> {
        let mut projects = self.load_projects_for_update()?;
        projects.insert(0, project.clone());
        self.save_projects(&projects)?;
        tracing::info!(id = %project.id, name = %project.name, "project saved");
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<Project>> {
        Ok(self.load_projects())
    }

    fn update_by_name(&self, name: &str, mutator: &mut dyn FnMut(&mut Project)) -> Result<usize> {
        let mut projects = self.load_projects_for_update()?;
        let mut matched = 0;
        for project in projects.iter_mut().filter(|p| p.name == name) {
            mutator(project);
            matched += 1;
        }
        if matched > 0 {
            self.save_projects(&projects)?;
        }
        Ok(matched)
    }

    fn delete_by_id(&self, id: &str) -> Result<bool> {
        let mut projects = self.load_projects_for_update()?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Ok(false);
        }
        self.save_projects(&projects)?;
        tracing::info!(id, "project deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::model::{AddonFile, AddonType};

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("forge.sqlite")).unwrap();
        (dir, storage)
    }

    fn sample_project(name: &str) -> Project {
        let mut project = Project::new(
            name,
            AddonType::Combat,
            vec![AddonFile::new("Core.lua", "local x = 1")],
        );
        project.spec_summary = "Tracks damage".into();
        project.file_tree_text = "Addon/\n  Core.lua".into();
        project
    }

    #[test]
    fn list_empty() {
        let (_dir, storage) = test_storage();
        assert!(storage.list_all().unwrap().is_empty());
    }

    #[test]
    fn create_prepends() {
        let (_dir, storage) = test_storage();

        storage.create(&sample_project("First")).unwrap();
        storage.create(&sample_project("Second")).unwrap();

        let names: Vec<String> = storage
            .list_all()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Second", "First"]);
    }

    #[test]
    fn update_by_name_merges_only_what_the_mutator_touches() {
        let (_dir, storage) = test_storage();
        let original = sample_project("DPSMeterPro");
        storage.create(&original).unwrap();
        storage.create(&sample_project("Other")).unwrap();

        let matched = storage
            .update_by_name("DPSMeterPro", &mut |p| {
                p.iteration_count += 1;
                p.files = vec![AddonFile::new("UI.lua", "-- ui")];
            })
            .unwrap();

        assert_eq!(matched, 1);
        let projects = storage.list_all().unwrap();
        let updated = projects.iter().find(|p| p.id == original.id).unwrap();
        assert_eq!(updated.iteration_count, 2);
        assert_eq!(updated.files[0].filename, "UI.lua");
        assert_eq!(updated.spec_summary, original.spec_summary);
        assert_eq!(updated.file_tree_text, original.file_tree_text);
        assert_eq!(updated.created_at, original.created_at);

        let other = projects.iter().find(|p| p.name == "Other").unwrap();
        assert_eq!(other.iteration_count, 1);
    }

    #[test]
    fn update_by_name_touches_every_namesake() {
        let (_dir, storage) = test_storage();
        storage.create(&sample_project("Twin")).unwrap();
        storage.create(&sample_project("Twin")).unwrap();

        let matched = storage
            .update_by_name("Twin", &mut |p| p.iteration_count += 1)
            .unwrap();

        assert_eq!(matched, 2);
        assert!(storage.list_all().unwrap().iter().all(|p| p.iteration_count == 2));
    }

    #[test]
    fn update_unknown_name_writes_nothing() {
        let (_dir, storage) = test_storage();
        storage.create(&sample_project("A")).unwrap();
        let before = storage.read_raw(PROJECTS_SLOT).unwrap();

        let matched = storage
            .update_by_name("Missing", &mut |p| p.iteration_count = 99)
            .unwrap();

        assert_eq!(matched, 0);
        assert_eq!(storage.read_raw(PROJECTS_SLOT).unwrap(), before);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let (_dir, storage) = test_storage();
        let keep = sample_project("Keep");
        let gone = sample_project("Drop");
        storage.create(&keep).unwrap();
        storage.create(&gone).unwrap();

        assert!(storage.delete_by_id(&gone.id).unwrap());

        let projects = storage.list_all().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, keep.id);
    }

    #[test]
    fn delete_unknown_id_leaves_document_unchanged() {
        let (_dir, storage) = test_storage();
        storage.create(&sample_project("A")).unwrap();
        storage.create(&sample_project("B")).unwrap();
        let before = storage.read_raw(PROJECTS_SLOT).unwrap();

        assert!(!storage.delete_by_id("no-such-id").unwrap());

        assert_eq!(storage.read_raw(PROJECTS_SLOT).unwrap(), before);
    }

    #[test]
    fn malformed_project_list_reads_as_empty() {
        let (_dir, storage) = test_storage();
        storage.write_raw(PROJECTS_SLOT, r#"{"not":"a list"}"#).unwrap();

        assert!(storage.list_all().unwrap().is_empty());
    }

    #[test]
    fn writes_refuse_to_replace_a_malformed_project_list() {
        let (_dir, storage) = test_storage();
        storage.create(&sample_project("Keep1")).unwrap();
        storage.create(&sample_project("Keep2")).unwrap();
        let mut document: serde_json::Value =
            serde_json::from_str(&storage.read_raw(PROJECTS_SLOT).unwrap().unwrap()).unwrap();
        document[1].as_object_mut().unwrap().remove("iterationCount");
        storage.write_raw(PROJECTS_SLOT, &document.to_string()).unwrap();
        let before = storage.read_raw(PROJECTS_SLOT).unwrap();

        assert!(storage.create(&sample_project("New")).is_err());
        assert!(storage.update_by_name("Keep2", &mut |p| p.iteration_count += 1).is_err());
        assert!(storage.delete_by_id("anything").is_err());

        assert_eq!(storage.read_raw(PROJECTS_SLOT).unwrap(), before);
        assert!(before.unwrap().contains("Keep1"));
    }
}

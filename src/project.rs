//! Deleting a project leaves its cards on the board. They stay in storage and
//! are simply not shown by any project-scoped view.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BoardError, StoreError};
use crate::store::{read_document, Store, PROJECTS_KEY};

pub const DEFAULT_COLOR: &str = "#3b82f6";

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_color")]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub color: String,
}

impl Default for ProjectDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            color: default_color(),
        }
    }
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn build(&self) -> Result<Project, BoardError> {
        if self.name.trim().is_empty() {
            return Err(BoardError::EmptyProjectName);
        }
        let color = if self.color.trim().is_empty() {
            default_color()
        } else {
            self.color.clone()
        };
        Ok(Project {
            id: Uuid::new_v4().to_string(),
            name: self.name.clone(),
            description: self.description.clone(),
            created_at: Utc::now(),
            color,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRegistry {
    projects: Vec<Project>,
}

impl ProjectRegistry {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    pub fn seed() -> Self {
        let created_at = Utc
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self::new(vec![
            Project {
                id: "proj-1".to_string(),
                name: "Website Redesign".to_string(),
                description: "Revamp the company website.".to_string(),
                created_at,
                color: default_color(),
            },
            Project {
                id: "proj-2".to_string(),
                name: "AI Research".to_string(),
                description: "Explore AI-driven automation.".to_string(),
                created_at,
                color: default_color(),
            },
        ])
    }

    /// Reads the project list from `store`, falling back to [`ProjectRegistry::seed`].
    pub fn load(store: &impl Store) -> Self {
        let Some(data) = read_document(store, PROJECTS_KEY) else {
            tracing::info!("no stored projects, using seed projects");
            return Self::seed();
        };
        match serde_json::from_str::<Vec<Project>>(&data) {
            Ok(projects) => {
                tracing::debug!(count = projects.len(), "projects loaded");
                Self::new(projects)
            }
            Err(err) => {
                tracing::warn!(%err, "discarding stored projects");
                Self::seed()
            }
        }
    }

    pub fn save(&self, store: &mut impl Store) -> Result<(), StoreError> {
        store.set(PROJECTS_KEY, &serde_json::to_string_pretty(&self.projects)?)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns a registry with a new project built from `draft` appended.
    pub fn add_project(&self, draft: &ProjectDraft) -> Result<(ProjectRegistry, Project), BoardError> {
        let project = draft.build()?;
        let mut projects = self.projects.clone();
        projects.push(project.clone());
        Ok((Self::new(projects), project))
    }

    /// Returns a registry without the project `id`. Unknown ids are a no-op.
    pub fn delete_project(&self, id: &str) -> ProjectRegistry {
        Self::new(
            self.projects
                .iter()
                .filter(|p| p.id != id)
                .cloned()
                .collect(),
        )
    }
}

impl Default for ProjectRegistry {
    fn default() -> Self {
        Self::seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn seed_has_two_projects() {
        let registry = ProjectRegistry::seed();
        let ids: Vec<&str> = registry.projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["proj-1", "proj-2"]);
    }

    #[test]
    fn load_falls_back_to_seed() {
        let mut store = MemoryStore::new();
        assert_eq!(ProjectRegistry::load(&store), ProjectRegistry::seed());

        store.set(PROJECTS_KEY, "not json").unwrap();
        assert_eq!(ProjectRegistry::load(&store), ProjectRegistry::seed());
    }

    #[test]
    fn load_ignores_legacy_fields() {
        let mut store = MemoryStore::new();
        store
            .set(
                PROJECTS_KEY,
                r#"[{"id": "p1", "name": "Old", "createdAt": "2024-06-01T10:00:00.000Z", "tasks": [], "members": ["1"]}]"#,
            )
            .unwrap();

        let registry = ProjectRegistry::load(&store);
        let project = registry.get("p1").unwrap();
        assert_eq!(project.name, "Old");
        assert_eq!(project.description, "");
        assert_eq!(project.color, DEFAULT_COLOR);
    }

    #[test]
    fn add_project_appends_with_fresh_id() {
        let registry = ProjectRegistry::seed();
        let mut draft = ProjectDraft::new("Mobile App");
        draft.description = "iOS first".to_string();

        let (next, project) = registry.add_project(&draft).unwrap();

        assert_eq!(next.len(), 3);
        assert_eq!(next.projects().last(), Some(&project));
        assert_eq!(project.color, DEFAULT_COLOR);
        assert!(!registry.contains(&project.id));
    }

    #[test]
    fn add_project_requires_name() {
        let registry = ProjectRegistry::seed();
        let err = registry.add_project(&ProjectDraft::new("  ")).unwrap_err();
        assert_eq!(err, BoardError::EmptyProjectName);
    }

    #[test]
    fn delete_project_by_id() {
        let registry = ProjectRegistry::seed();
        let next = registry.delete_project("proj-1");
        assert!(!next.contains("proj-1"));
        assert!(next.contains("proj-2"));
        assert_eq!(next.delete_project("missing"), next);
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = MemoryStore::new();
        let (registry, _) = ProjectRegistry::seed()
            .add_project(&ProjectDraft::new("Infra"))
            .unwrap();
        registry.save(&mut store).unwrap();

        assert_eq!(ProjectRegistry::load(&store), registry);
    }
}

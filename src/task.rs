use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::BoardError;

/// Workflow stage of a card. Each variant is also one of the five board columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Backlog,
    #[serde(rename = "To-Do", alias = "Todo")]
    ToDo,
    #[serde(rename = "In-Progress")]
    InProgress,
    Done,
    Cancelled,
}

impl Status {
    /// Board order.
    pub const ALL: [Status; 5] = [
        Status::Backlog,
        Status::ToDo,
        Status::InProgress,
        Status::Done,
        Status::Cancelled,
    ];

    /// Stable column id, 1 through 5.
    pub fn id(self) -> u8 {
        match self {
            Status::Backlog => 1,
            Status::ToDo => 2,
            Status::InProgress => 3,
            Status::Done => 4,
            Status::Cancelled => 5,
        }
    }

    pub fn index(self) -> usize {
        usize::from(self.id() - 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            Status::Backlog => "Backlog",
            Status::ToDo => "To-Do",
            Status::InProgress => "In-Progress",
            Status::Done => "Done",
            Status::Cancelled => "Cancelled",
        }
    }

    pub fn from_id(id: u8) -> Option<Status> {
        Status::ALL.into_iter().find(|status| status.id() == id)
    }

    /// Next status in board order, wrapping around. Used by the form selectors.
    pub fn cycle(self, step: isize) -> Status {
        let len = Status::ALL.len() as isize;
        let index = (self.index() as isize + step).rem_euclid(len);
        Status::ALL[index as usize]
    }
}

impl TryFrom<u8> for Status {
    type Error = BoardError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Status::from_id(id).ok_or(BoardError::UnknownColumn(id))
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        status.id()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn cycle(self, step: isize) -> Priority {
        let len = Priority::ALL.len() as isize;
        let current = Priority::ALL
            .iter()
            .position(|p| *p == self)
            .unwrap_or_default() as isize;
        Priority::ALL[(current + step).rem_euclid(len) as usize]
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        };
        f.write_str(label)
    }
}

/// A card on the board.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assigned_user: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDate>,
}

// Older boards stored numeric card ids.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// What the add-task form submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub assigned_user: String,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: Status::Backlog,
            priority: Priority::Medium,
            assigned_user: String::new(),
        }
    }
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, status: Status) -> Self {
        Self {
            title: title.into(),
            status,
            ..Self::default()
        }
    }

    /// Builds the card for `project_id`, with a fresh id and today's date.
    pub fn build(&self, project_id: &str) -> Result<Task, BoardError> {
        if self.title.trim().is_empty() {
            return Err(BoardError::EmptyTitle);
        }
        Ok(Task {
            id: format!("task-{}", Uuid::new_v4()),
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            assigned_user: self.assigned_user.clone(),
            project_id: project_id.to_string(),
            created_at: Some(Local::now().date_naive()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_ids_follow_board_order() {
        let ids: Vec<u8> = Status::ALL.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(Status::try_from(3), Ok(Status::InProgress));
        assert_eq!(Status::try_from(9), Err(BoardError::UnknownColumn(9)));
    }

    #[test]
    fn status_serializes_with_column_names() {
        assert_eq!(
            serde_json::to_value(Status::InProgress).unwrap(),
            json!("In-Progress")
        );
        let legacy: Status = serde_json::from_value(json!("Todo")).unwrap();
        assert_eq!(legacy, Status::ToDo);
    }

    #[test]
    fn cycle_wraps_in_both_directions() {
        assert_eq!(Status::Cancelled.cycle(1), Status::Backlog);
        assert_eq!(Status::Backlog.cycle(-1), Status::Cancelled);
        assert_eq!(Priority::Low.cycle(1), Priority::High);
    }

    #[test]
    fn task_reads_legacy_numeric_id_and_defaults() {
        let task: Task = serde_json::from_value(json!({
            "id": 1,
            "title": "Task 1",
            "status": "Backlog",
            "projectId": "proj-1"
        }))
        .unwrap();

        assert_eq!(task.id, "1");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.description, "");
        assert_eq!(task.created_at, None);
    }

    #[test]
    fn task_uses_camel_case_keys() {
        let task = TaskDraft::new("Write docs", Status::Done)
            .build("proj-9")
            .unwrap();
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["projectId"], json!("proj-9"));
        assert_eq!(value["status"], json!("Done"));
        assert!(value.get("assignedUser").is_some());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn build_rejects_blank_title() {
        let draft = TaskDraft::new("   ", Status::Backlog);
        assert_eq!(draft.build("proj-1"), Err(BoardError::EmptyTitle));
    }

    #[test]
    fn build_assigns_unique_ids() {
        let draft = TaskDraft::new("Ship it", Status::ToDo);
        let a = draft.build("proj-1").unwrap();
        let b = draft.build("proj-1").unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("task-"));
    }
}

//! Columns are never added, removed or renamed; only their content changes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::{read_document, Store, COLUMNS_KEY};
use crate::task::{Priority, Status, Task};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub status: Status,
    pub content: Vec<Task>,
}

impl Column {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            content: Vec::new(),
        }
    }

    pub fn id(&self) -> u8 {
        self.status.id()
    }

    pub fn name(&self) -> &'static str {
        self.status.name()
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.content.iter().any(|t| t.id == task_id)
    }
}

/// All five columns, indexed by [`Status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns([Column; 5]);

#[derive(Deserialize)]
struct ColumnRecord {
    id: u8,
    #[serde(default)]
    content: Vec<Task>,
}

#[derive(Serialize)]
struct ColumnRecordRef<'a> {
    id: u8,
    name: &'a str,
    content: &'a [Task],
}

impl Columns {
    pub fn empty() -> Self {
        Self(Status::ALL.map(Column::new))
    }

    /// Board used on first start and whenever the stored board is unusable.
    pub fn seed() -> Self {
        let mut columns = Self::empty();
        for task in seed_tasks() {
            columns.column_mut(task.status).content.push(task);
        }
        columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.0.iter()
    }

    pub fn column(&self, status: Status) -> &Column {
        &self.0[status.index()]
    }

    pub(crate) fn column_mut(&mut self, status: Status) -> &mut Column {
        &mut self.0[status.index()]
    }

    pub(crate) fn columns_mut(&mut self) -> impl Iterator<Item = &mut Column> {
        self.0.iter_mut()
    }

    pub fn task_count(&self) -> usize {
        self.0.iter().map(|c| c.content.len()).sum()
    }

    pub fn find(&self, task_id: &str) -> Option<&Task> {
        self.locate(task_id).map(|(_, task)| task)
    }

    /// Finds a card by id together with the column holding it.
    pub fn locate(&self, task_id: &str) -> Option<(Status, &Task)> {
        self.0.iter().find_map(|c| {
            c.content
                .iter()
                .find(|t| t.id == task_id)
                .map(|task| (c.status, task))
        })
    }

    /// Reads the board from `store`, falling back to [`Columns::seed`].
    pub fn load(store: &impl Store) -> Self {
        let Some(data) = read_document(store, COLUMNS_KEY) else {
            tracing::info!("no stored board, using seed columns");
            return Self::seed();
        };
        match Self::from_json(&data) {
            Ok(columns) => {
                tracing::debug!(tasks = columns.task_count(), "board loaded");
                columns
            }
            Err(err) => {
                tracing::warn!(%err, "discarding stored board");
                Self::seed()
            }
        }
    }

    pub fn save(&self, store: &mut impl Store) -> Result<(), StoreError> {
        let records: Vec<ColumnRecordRef<'_>> = self
            .0
            .iter()
            .map(|c| ColumnRecordRef {
                id: c.id(),
                name: c.name(),
                content: &c.content,
            })
            .collect();
        store.set(COLUMNS_KEY, &serde_json::to_string_pretty(&records)?)
    }

    /// Parses and normalizes a stored board.
    ///
    /// Unknown column ids reject the whole document. Statuses are rewritten to
    /// match the containing column and repeated card ids are dropped.
    pub fn from_json(data: &str) -> Result<Self, StoreError> {
        let records: Vec<ColumnRecord> = serde_json::from_str(data)?;
        let mut columns = Self::empty();
        let mut seen = HashSet::new();

        for record in records {
            let status = Status::try_from(record.id).map_err(|err| StoreError::Malformed {
                key: COLUMNS_KEY,
                reason: err.to_string(),
            })?;
            for mut task in record.content {
                if !seen.insert(task.id.clone()) {
                    tracing::warn!(task_id = %task.id, "dropping duplicate card");
                    continue;
                }
                if task.status != status {
                    tracing::debug!(task_id = %task.id, from = %task.status, to = %status, "fixing card status");
                    task.status = status;
                }
                columns.column_mut(status).content.push(task);
            }
        }
        Ok(columns)
    }
}

impl Default for Columns {
    fn default() -> Self {
        Self::seed()
    }
}

fn seed_tasks() -> [Task; 2] {
    [
        Task {
            id: "1".to_string(),
            title: "Task 1".to_string(),
            description: "Description for Task 1".to_string(),
            status: Status::Backlog,
            priority: Priority::Medium,
            assigned_user: "User1".to_string(),
            project_id: "proj-1".to_string(),
            created_at: None,
        },
        Task {
            id: "2".to_string(),
            title: "Task 2".to_string(),
            description: "Description for Task 2".to_string(),
            status: Status::ToDo,
            priority: Priority::High,
            assigned_user: "User2".to_string(),
            project_id: "proj-2".to_string(),
            created_at: None,
        },
    ]
}

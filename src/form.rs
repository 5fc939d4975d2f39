use crossterm::event::KeyCode;

use crate::project::ProjectDraft;
use crate::task::{Priority, Status, TaskDraft};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Status(Status),
    Priority(Priority),
}

impl FieldValue {
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Status(status) => format!("< {status} >"),
            FieldValue::Priority(priority) => format!("< {priority} >"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: FieldValue,
}

impl Field {
    fn text(label: &'static str) -> Self {
        Self {
            label,
            value: FieldValue::Text(String::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Project,
    Task,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Editing,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<Field>,
    pub focus: usize,
}

impl Form {
    pub fn project() -> Self {
        Self {
            kind: FormKind::Project,
            fields: vec![Field::text("Project Name"), Field::text("Description (Optional)")],
            focus: 0,
        }
    }

    pub fn task(status: Status) -> Self {
        Self {
            kind: FormKind::Task,
            fields: vec![
                Field::text("Task title"),
                Field::text("Description"),
                Field {
                    label: "Status",
                    value: FieldValue::Status(status),
                },
                Field {
                    label: "Priority",
                    value: FieldValue::Priority(Priority::Medium),
                },
                Field::text("Assignee"),
            ],
            focus: 0,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::Project => "Add Project",
            FormKind::Task => "Add New Task",
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> FormEvent {
        match code {
            KeyCode::Esc => return FormEvent::Cancel,
            KeyCode::Enter => return FormEvent::Submit,
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % self.fields.len(),
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
            }
            KeyCode::Left => self.cycle(-1),
            KeyCode::Right => self.cycle(1),
            KeyCode::Backspace => {
                if let FieldValue::Text(text) = &mut self.fields[self.focus].value {
                    text.pop();
                }
            }
            KeyCode::Char(c) => {
                if let FieldValue::Text(text) = &mut self.fields[self.focus].value {
                    text.push(c);
                }
            }
            _ => {}
        }
        FormEvent::Editing
    }

    fn cycle(&mut self, step: isize) {
        match &mut self.fields[self.focus].value {
            FieldValue::Status(status) => *status = status.cycle(step),
            FieldValue::Priority(priority) => *priority = priority.cycle(step),
            FieldValue::Text(_) => {}
        }
    }

    fn text_at(&self, index: usize) -> String {
        match self.fields.get(index).map(|f| &f.value) {
            Some(FieldValue::Text(text)) => text.clone(),
            _ => String::new(),
        }
    }

    pub fn project_draft(&self) -> ProjectDraft {
        ProjectDraft {
            name: self.text_at(0),
            description: self.text_at(1),
            ..ProjectDraft::default()
        }
    }

    pub fn task_draft(&self) -> TaskDraft {
        let mut draft = TaskDraft {
            title: self.text_at(0),
            description: self.text_at(1),
            assigned_user: self.text_at(4),
            ..TaskDraft::default()
        };
        for field in &self.fields {
            match field.value {
                FieldValue::Status(status) => draft.status = status,
                FieldValue::Priority(priority) => draft.priority = priority,
                FieldValue::Text(_) => {}
            }
        }
        draft
    }
}

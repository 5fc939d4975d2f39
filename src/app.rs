use crate::column::Columns;
use crate::error::{AppError, BoardError};
use crate::kanban_board::Destination;
use crate::project::{Project, ProjectDraft, ProjectRegistry};
use crate::store::Store;
use crate::task::{Status, Task, TaskDraft};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Projects,
    Board { project_id: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Board,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Board => ViewMode::List,
            ViewMode::List => ViewMode::Board,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message shown after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn from_result(result: Result<String, AppError>) -> Self {
        match result {
            Ok(message) => Self::success(message),
            Err(err) => Self::error(err.to_string()),
        }
    }
}

pub struct App<S: Store> {
    store: S,
    projects: ProjectRegistry,
    columns: Columns,
    screen: Screen,
    view: ViewMode,
}

impl<S: Store> App<S> {
    /// Hydrates both documents from `store`.
    pub fn load(store: S) -> Self {
        let projects = ProjectRegistry::load(&store);
        let columns = Columns::load(&store);
        Self {
            store,
            projects,
            columns,
            screen: Screen::Projects,
            view: ViewMode::default(),
        }
    }

    pub fn projects(&self) -> &ProjectRegistry {
        &self.projects
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Project whose board is open, if it still exists.
    pub fn current_project(&self) -> Option<&Project> {
        match &self.screen {
            Screen::Board { project_id } => self.projects.get(project_id),
            Screen::Projects => None,
        }
    }

    /// Cards of the open project in one column.
    pub fn visible_tasks(&self, status: Status) -> Vec<&Task> {
        match &self.screen {
            Screen::Board { project_id } => self.columns.visible_in(status, project_id).collect(),
            Screen::Projects => Vec::new(),
        }
    }

    /// Cards of the open project in board order.
    pub fn project_tasks(&self) -> Vec<&Task> {
        match &self.screen {
            Screen::Board { project_id } => self.columns.tasks_for_project(project_id),
            Screen::Projects => Vec::new(),
        }
    }

    pub fn add_project(&mut self, draft: &ProjectDraft) -> Result<String, AppError> {
        let (next, project) = self.projects.add_project(draft)?;
        self.projects = next;
        tracing::info!(project_id = %project.id, name = %project.name, "project added");
        self.save_projects()?;
        Ok("Project added successfully!".to_string())
    }

    /// Removes a project. Its cards stay on the board but are no longer shown.
    pub fn delete_project(&mut self, id: &str) -> Result<String, AppError> {
        self.projects = self.projects.delete_project(id);
        tracing::info!(project_id = %id, "project deleted");
        if matches!(&self.screen, Screen::Board { project_id } if project_id == id) {
            self.screen = Screen::Projects;
        }
        self.save_projects()?;
        Ok("Project deleted.".to_string())
    }

    pub fn open_project(&mut self, id: &str) -> Result<(), AppError> {
        if !self.projects.contains(id) {
            return Err(BoardError::ProjectNotFound(id.to_string()).into());
        }
        tracing::debug!(project_id = %id, "opening board");
        self.screen = Screen::Board {
            project_id: id.to_string(),
        };
        Ok(())
    }

    pub fn close_project(&mut self) {
        self.screen = Screen::Projects;
    }

    /// Adds a card to the open project.
    pub fn add_task(&mut self, draft: &TaskDraft) -> Result<String, AppError> {
        let project_id = self.open_project_id()?;
        let next = self.columns.add_task(draft, &project_id)?;
        self.columns = next;
        tracing::info!(%project_id, status = %draft.status, "task added");
        self.save_columns()?;
        Ok("Task added successfully".to_string())
    }

    pub fn delete_task(&mut self, task_id: &str) -> Result<String, AppError> {
        self.columns = self.columns.delete_task(task_id);
        tracing::info!(%task_id, "task deleted");
        self.save_columns()?;
        Ok("Task deleted successfully".to_string())
    }

    /// Applies a drop of `card` onto `destination`.
    pub fn move_card(&mut self, card: &Task, destination: &Destination) -> Result<String, AppError> {
        let next = match self.columns.move_card(card, destination) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!(task_id = %card.id, column_id = destination.column_id, %err, "move rejected");
                return Err(err.into());
            }
        };
        self.columns = next;
        let target = Status::try_from(destination.column_id)?;
        tracing::info!(task_id = %card.id, to = %target, "task moved");
        self.save_columns()?;
        Ok(format!("Task moved to {target}"))
    }

    /// Switches between board and list presentation. Never touches the model.
    pub fn toggle_view(&mut self) {
        self.view = self.view.toggled();
    }

    fn open_project_id(&self) -> Result<String, AppError> {
        match &self.screen {
            Screen::Board { project_id } if self.projects.contains(project_id) => {
                Ok(project_id.clone())
            }
            Screen::Board { project_id } => {
                Err(BoardError::ProjectNotFound(project_id.clone()).into())
            }
            Screen::Projects => Err(BoardError::ProjectNotFound(String::new()).into()),
        }
    }

    fn save_projects(&mut self) -> Result<(), AppError> {
        self.projects.save(&mut self.store).map_err(|err| {
            tracing::error!(%err, "failed to save projects");
            AppError::from(err)
        })
    }

    fn save_columns(&mut self) -> Result<(), AppError> {
        self.columns.save(&mut self.store).map_err(|err| {
            tracing::error!(%err, "failed to save board");
            AppError::from(err)
        })
    }
}

pub mod app;
pub mod cli;
pub mod column;
pub mod error;
pub mod form;
pub mod kanban_board;
pub mod logging;
pub mod project;
pub mod store;
pub mod task;
pub mod ui;

pub use app::{App, Notice, NoticeKind, Screen, ViewMode};
pub use column::{Column, Columns};
pub use error::{AppError, BoardError, StoreError};
pub use kanban_board::Destination;
pub use project::{Project, ProjectDraft, ProjectRegistry};
pub use store::{FileStore, MemoryStore, Store};
pub use task::{Priority, Status, Task, TaskDraft};

//! Board transitions. Nothing here persists; callers save the returned board.

use crate::column::Columns;
use crate::error::BoardError;
use crate::task::{Status, Task, TaskDraft};

/// Where a dragged card was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub column_id: u8,
    /// Card the drop landed on. Reserved for reordering within a column; ignored.
    pub card_id: Option<String>,
}

impl Destination {
    pub fn column(column_id: u8) -> Self {
        Self {
            column_id,
            card_id: None,
        }
    }
}

impl From<Status> for Destination {
    fn from(status: Status) -> Self {
        Self::column(status.id())
    }
}

impl Columns {
    /// Moves `card` to the end of the destination column and rewrites its status.
    ///
    /// The destination is validated before anything changes, so a bad drop never
    /// loses the card. Dropping a card onto the column that already holds it keeps
    /// its position.
    pub fn move_card(&self, card: &Task, destination: &Destination) -> Result<Columns, BoardError> {
        let target = Status::try_from(destination.column_id)?;
        if let Some(over) = &destination.card_id {
            tracing::trace!(card_id = %over, "drop position within column ignored");
        }
        let (source, current) = self
            .locate(&card.id)
            .ok_or_else(|| BoardError::CardNotFound(card.id.clone()))?;

        let mut next = self.clone();
        if source == target {
            if let Some(task) = next
                .column_mut(target)
                .content
                .iter_mut()
                .find(|t| t.id == card.id)
            {
                task.status = target;
            }
            return Ok(next);
        }

        let mut moved = current.clone();
        moved.status = target;
        for column in next.columns_mut() {
            if column.status == target {
                column.content.push(moved.clone());
            } else {
                column.content.retain(|t| t.id != card.id);
            }
        }
        Ok(next)
    }

    /// Appends a new card built from `draft` to the column named by its status.
    pub fn add_task(&self, draft: &TaskDraft, project_id: &str) -> Result<Columns, BoardError> {
        let task = draft.build(project_id)?;
        Ok(self.with_task(task))
    }

    pub(crate) fn with_task(&self, task: Task) -> Columns {
        let mut next = self.clone();
        next.column_mut(task.status).content.push(task);
        next
    }

    /// Removes the card with `task_id` from whichever column holds it.
    pub fn delete_task(&self, task_id: &str) -> Columns {
        let mut next = self.clone();
        for column in next.columns_mut() {
            column.content.retain(|t| t.id != task_id);
        }
        next
    }

    /// Cards of one column that belong to `project_id`.
    pub fn visible_in<'a>(
        &'a self,
        status: Status,
        project_id: &'a str,
    ) -> impl Iterator<Item = &'a Task> + 'a {
        self.column(status)
            .content
            .iter()
            .filter(move |t| t.project_id == project_id)
    }

    /// All cards of `project_id` in board order, as shown by the list view.
    pub fn tasks_for_project<'a>(&'a self, project_id: &'a str) -> Vec<&'a Task> {
        Status::ALL
            .into_iter()
            .flat_map(|status| self.visible_in(status, project_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use proptest::prelude::*;

    fn placement(columns: &Columns) -> Vec<Vec<String>> {
        columns
            .iter()
            .map(|c| c.content.iter().map(|t| t.id.clone()).collect())
            .collect()
    }

    fn holders(columns: &Columns, id: &str) -> Vec<Status> {
        columns
            .iter()
            .filter(|c| c.contains(id))
            .map(|c| c.status)
            .collect()
    }

    fn card(columns: &Columns, id: &str) -> Task {
        columns.find(id).cloned().unwrap()
    }

    #[test]
    fn move_to_in_progress() {
        let columns = Columns::seed();
        let task = card(&columns, "1");

        let moved = columns.move_card(&task, &Destination::column(3)).unwrap();

        assert_eq!(holders(&moved, "1"), vec![Status::InProgress]);
        let content = &moved.column(Status::InProgress).content;
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].status, Status::InProgress);
        assert_eq!(serde_json::to_value(content[0].status).unwrap(), "In-Progress");
        assert!(!moved.column(Status::Backlog).contains("1"));
    }

    #[test]
    fn move_to_every_column_keeps_card_count_and_status() {
        let columns = Columns::seed();
        for source_id in ["1", "2"] {
            for status in Status::ALL {
                let moved = columns
                    .move_card(&card(&columns, source_id), &status.into())
                    .unwrap();
                assert_eq!(moved.task_count(), columns.task_count());
                assert_eq!(holders(&moved, source_id), vec![status]);
                assert_eq!(moved.find(source_id).unwrap().status, status);
            }
        }
    }

    #[test]
    fn move_appends_at_end_of_destination() {
        let columns = Columns::seed();
        let moved = columns
            .move_card(&card(&columns, "1"), &Status::ToDo.into())
            .unwrap();
        let ids: Vec<&str> = moved
            .column(Status::ToDo)
            .content
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn drop_on_own_column_is_a_no_op() {
        let columns = Columns::seed()
            .add_task(&TaskDraft::new("Second", Status::Backlog), "proj-1")
            .unwrap();
        let before = placement(&columns);

        let moved = columns
            .move_card(&card(&columns, "1"), &Status::Backlog.into())
            .unwrap();

        assert_eq!(placement(&moved), before);
        assert_eq!(moved, columns);
    }

    #[test]
    fn stale_status_is_rewritten_on_drop_in_place() {
        let mut columns = Columns::seed();
        columns.column_mut(Status::Backlog).content[0].status = Status::Done;

        let moved = columns
            .move_card(&card(&columns, "1"), &Status::Backlog.into())
            .unwrap();
        assert_eq!(moved.find("1").unwrap().status, Status::Backlog);
    }

    #[test]
    fn unknown_destination_changes_nothing() {
        let columns = Columns::seed();
        let err = columns
            .move_card(&card(&columns, "1"), &Destination::column(42))
            .unwrap_err();
        assert_eq!(err, BoardError::UnknownColumn(42));
        assert_eq!(holders(&columns, "1"), vec![Status::Backlog]);
    }

    #[test]
    fn unknown_card_is_rejected() {
        let columns = Columns::seed();
        let mut ghost = card(&columns, "1");
        ghost.id = "nope".to_string();

        let err = columns.move_card(&ghost, &Status::Done.into()).unwrap_err();
        assert_eq!(err, BoardError::CardNotFound("nope".to_string()));
    }

    #[test]
    fn add_task_lands_in_matching_column() {
        let columns = Columns::seed();
        let mut draft = TaskDraft::new("Plan sprint", Status::Done);
        draft.priority = Priority::High;

        let next = columns.add_task(&draft, "proj-1").unwrap();

        assert_eq!(next.task_count(), columns.task_count() + 1);
        let added = next.column(Status::Done).content.last().unwrap();
        assert_eq!(added.title, "Plan sprint");
        assert_eq!(added.status, Status::Done);
        assert_eq!(added.priority, Priority::High);
        assert_eq!(added.project_id, "proj-1");
        assert!(added.created_at.is_some());
        for status in [Status::Backlog, Status::ToDo, Status::InProgress, Status::Cancelled] {
            assert_eq!(next.column(status), columns.column(status));
        }
    }

    #[test]
    fn add_task_with_blank_title_is_rejected() {
        let columns = Columns::seed();
        for title in ["", "   ", "\t\n"] {
            let err = columns
                .add_task(&TaskDraft::new(title, Status::Backlog), "proj-1")
                .unwrap_err();
            assert_eq!(err, BoardError::EmptyTitle);
        }
    }

    #[test]
    fn delete_task_removes_one_card() {
        let columns = Columns::seed();
        let next = columns.delete_task("2");
        assert_eq!(next.task_count(), 1);
        assert!(next.find("2").is_none());
    }

    #[test]
    fn delete_unknown_task_is_a_no_op() {
        let columns = Columns::seed();
        assert_eq!(columns.delete_task("missing"), columns);
    }

    #[test]
    fn delete_then_re_add_restores_count() {
        let columns = Columns::seed();
        let task = card(&columns, "2");
        let restored = columns.delete_task("2").with_task(task);
        assert_eq!(restored.task_count(), columns.task_count());
        assert_eq!(holders(&restored, "2"), vec![Status::ToDo]);
    }

    #[test]
    fn project_views_filter_other_projects() {
        let columns = Columns::seed()
            .add_task(&TaskDraft::new("Mine", Status::Done), "proj-1")
            .unwrap();

        let titles: Vec<&str> = columns
            .tasks_for_project("proj-1")
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Task 1", "Mine"]);
        assert_eq!(columns.visible_in(Status::ToDo, "proj-1").count(), 0);
        assert!(columns.tasks_for_project("gone").is_empty());
    }

    fn board_from(statuses: &[Status]) -> Columns {
        statuses
            .iter()
            .enumerate()
            .fold(Columns::empty(), |board, (i, status)| {
                board.with_task(Task {
                    id: format!("c{i}"),
                    title: format!("Card {i}"),
                    description: String::new(),
                    status: *status,
                    priority: Priority::Medium,
                    assigned_user: String::new(),
                    project_id: "proj-1".to_string(),
                    created_at: None,
                })
            })
    }

    fn assert_statuses_match(columns: &Columns) -> Result<(), TestCaseError> {
        for column in columns.iter() {
            for task in &column.content {
                prop_assert_eq!(task.status, column.status);
            }
        }
        Ok(())
    }

    fn any_status() -> impl Strategy<Value = Status> {
        prop::sample::select(Status::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn move_keeps_board_invariants(
            statuses in prop::collection::vec(any_status(), 1..32),
            pick in any::<prop::sample::Index>(),
            column_id in any::<u8>(),
        ) {
            let board = board_from(&statuses);
            let card = card(&board, &format!("c{}", pick.index(statuses.len())));

            match board.move_card(&card, &Destination::column(column_id)) {
                Ok(moved) => {
                    prop_assert!((1..=5).contains(&column_id));
                    prop_assert_eq!(moved.task_count(), board.task_count());
                    let held_by = holders(&moved, &card.id);
                    prop_assert_eq!(held_by.len(), 1);
                    prop_assert_eq!(held_by[0].id(), column_id);
                    assert_statuses_match(&moved)?;
                }
                Err(err) => {
                    prop_assert!(!(1..=5).contains(&column_id));
                    prop_assert_eq!(err, BoardError::UnknownColumn(column_id));
                }
            }
            prop_assert_eq!(&board, &board_from(&statuses));
        }

        #[test]
        fn move_sequences_never_lose_or_duplicate_cards(
            statuses in prop::collection::vec(any_status(), 1..24),
            moves in prop::collection::vec((any::<prop::sample::Index>(), any::<u8>()), 1..40),
        ) {
            let mut board = board_from(&statuses);
            for (pick, column_id) in moves {
                let card = card(&board, &format!("c{}", pick.index(statuses.len())));
                if let Ok(next) = board.move_card(&card, &Destination::column(column_id)) {
                    board = next;
                }
                prop_assert_eq!(board.task_count(), statuses.len());
                for i in 0..statuses.len() {
                    prop_assert_eq!(holders(&board, &format!("c{i}")).len(), 1);
                }
                assert_statuses_match(&board)?;
            }

            let gone = board.delete_task("c0");
            prop_assert_eq!(gone.task_count(), statuses.len() - 1);
            let readded = gone
                .add_task(&TaskDraft::new("Again", Status::Done), "proj-1")
                .unwrap();
            prop_assert_eq!(readded.task_count(), statuses.len());
        }
    }
}

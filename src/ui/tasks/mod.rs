pub mod card;

use iced::{
    widget::{container, scrollable, text, Column},
    Element, Length, Task,
};

use crate::models::TaskItem;
use card::{CardAction, Intent};

#[derive(Debug, Clone)]
pub enum BoardAction {
    Card(String, CardAction),
}

/// The shell's content area: a transient copy of the user's tasks.
///
/// Nothing fetches tasks from the backend yet, so the binary starts with an
/// empty board and cards only appear when a caller supplies items through
/// [`Board::new`].
#[derive(Debug, Default, Clone)]
pub struct Board {
    tasks: Vec<TaskItem>,
}

impl Board {
    pub fn new(tasks: Vec<TaskItem>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[TaskItem] {
        &self.tasks
    }

    pub fn update(&mut self, action: BoardAction) -> Task<BoardAction> {
        match action {
            BoardAction::Card(task_id, card_action) => {
                let Some(item) = self.tasks.iter().find(|t| t.id == task_id) else {
                    log::warn!("Card action for unknown task {}", task_id);
                    return Task::none();
                };
                let (intent, task) = card::update(item, card_action);
                if let Some(intent) = intent {
                    self.apply(intent);
                }
                task.map(move |action| BoardAction::Card(task_id.clone(), action))
            }
        }
    }

    fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::ToggleComplete(task_id, completed) => {
                log::info!("Marking task {} completed={}", task_id, completed);
                if let Some(item) = self.tasks.iter_mut().find(|t| t.id == task_id) {
                    item.completed = completed;
                }
            }
            Intent::Edit(item) => {
                log::info!("Edit requested for task {}", item.id);
            }
            Intent::Delete(task_id) => {
                log::info!("Deleting task {}", task_id);
                self.tasks.retain(|t| t.id != task_id);
            }
        }
    }

    pub fn view(&self) -> Element<'_, BoardAction> {
        if self.tasks.is_empty() {
            return container(text("No tasks yet."))
                .center_x(Length::Fill)
                .padding(20)
                .into();
        }

        let cards = self.tasks.iter().map(|item| {
            let task_id = item.id.clone();
            card::view(item).map(move |action| BoardAction::Card(task_id.clone(), action))
        });

        scrollable(Column::with_children(cards).spacing(10).padding(10))
            .height(Length::Fill)
            .into()
    }
}

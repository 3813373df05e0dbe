//! Presentation for a single task. Holds no state of its own: the caller
//! passes the task in and receives intents back.

use iced::{
    widget::{button, column, container, row, text},
    Alignment, Element, Length, Task,
};
use rfd::{AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};

use crate::models::TaskItem;

#[derive(Debug, Clone)]
pub enum CardAction {
    ToggleClicked,
    EditClicked,
    DeleteClicked,
    DeleteConfirmed(bool),
}

/// What the user asked the owner of the task to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    ToggleComplete(String, bool),
    Edit(TaskItem),
    Delete(String),
}

pub fn update(item: &TaskItem, action: CardAction) -> (Option<Intent>, Task<CardAction>) {
    match action {
        CardAction::ToggleClicked => (
            Some(Intent::ToggleComplete(item.id.clone(), !item.completed)),
            Task::none(),
        ),
        CardAction::EditClicked => (Some(Intent::Edit(item.clone())), Task::none()),
        CardAction::DeleteClicked => (
            None,
            Task::perform(
                confirm_delete(item.title.clone()),
                CardAction::DeleteConfirmed,
            ),
        ),
        CardAction::DeleteConfirmed(true) => (Some(Intent::Delete(item.id.clone())), Task::none()),
        CardAction::DeleteConfirmed(false) => {
            log::debug!("Delete of task {} cancelled", item.id);
            (None, Task::none())
        }
    }
}

async fn confirm_delete(title: String) -> bool {
    let result = AsyncMessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Delete task")
        .set_description(format!(
            "Are you sure you want to delete this task?\n\n{}",
            title
        ))
        .set_buttons(MessageButtons::YesNo)
        .show()
        .await;
    matches!(result, MessageDialogResult::Yes)
}

pub fn view(item: &TaskItem) -> Element<'_, CardAction> {
    let marker = if item.completed { "[x]" } else { "[ ]" };
    let completed = item.completed;
    let body_style = move |theme: &iced::Theme| {
        if completed {
            text::secondary(theme)
        } else {
            text::Style::default()
        }
    };
    let created = item
        .created_date
        .with_timezone(&chrono::Local)
        .format("%x")
        .to_string();

    let details = column![
        text(&item.title).size(18).style(body_style),
        text(&item.description).size(14).style(body_style),
        text(format!("Created: {}", created))
            .size(12)
            .style(text::secondary),
    ]
    .spacing(4)
    .width(Length::Fill);

    container(
        row![
            button(marker).on_press(CardAction::ToggleClicked),
            details,
            button("Edit").on_press(CardAction::EditClicked),
            button("Delete")
                .style(button::danger)
                .on_press(CardAction::DeleteClicked),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .padding(12)
    .width(Length::Fill)
    .style(if item.completed {
        container::bordered_box
    } else {
        container::rounded_box
    })
    .into()
}

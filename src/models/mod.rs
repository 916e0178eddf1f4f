use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumString};

/// A to-do item as the backend sees it.
///
/// `id` is assigned by the server; drafts created in the form have none.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Todo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default)]
    pub task: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub priority: Option<i32>,

    #[serde(default)]
    pub deadline: Option<NaiveDate>,

    #[serde(default)]
    pub done: bool,

    #[serde(default)]
    pub assigned: Option<Contact>,
}

impl Todo {
    pub fn assignee_name(&self) -> String {
        self.assigned
            .as_ref()
            .map(Contact::display_name)
            .unwrap_or_default()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl Contact {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One page of contacts from `ContactEndpoint.getPage`.
///
/// `size` is the total number of matching contacts, not the page length.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ContactPage {
    pub content: Vec<Contact>,
    pub size: u64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum MessageType {
    #[default]
    Info,
    Error,
    Editing,
}

/// Push message from `EventEndpoint`. Never persisted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Message {
    #[serde(default = "Message::unset_id")]
    pub id: i64,
    pub data: String,
    #[serde(default)]
    pub message_type: MessageType,
}

impl Message {
    fn unset_id() -> i64 {
        -1
    }

    pub fn editing(todo: &Todo) -> Self {
        Self {
            id: todo.id.unwrap_or(0),
            data: format!("Some one is editing {}", todo.task),
            message_type: MessageType::Editing,
        }
    }
}

/// Aggregates computed server side. Replaced wholesale on every fetch.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Stats {
    /// Index 0 holds the count for priority 1.
    #[serde(default)]
    pub priority_counts: [u32; 5],
    #[serde(default)]
    pub deadlines: BTreeMap<NaiveDate, u32>,
    #[serde(default)]
    pub assigned: u32,
    #[serde(default)]
    pub done: u32,
}

impl Stats {
    pub fn priority_count(&self, priority: usize) -> u32 {
        match priority {
            1..=5 => self.priority_counts[priority - 1],
            _ => 0,
        }
    }

    /// Chart categories, e.g. `Mon Oct 19 2026`, in date order.
    pub fn deadline_labels(&self) -> Vec<String> {
        self.deadlines
            .keys()
            .map(|d| d.format("%a %b %d %Y").to_string())
            .collect()
    }

    pub fn deadline_counts(&self) -> Vec<u32> {
        self.deadlines.values().copied().collect()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserInfo {
    pub name: String,
    #[serde(default)]
    pub authorities: Vec<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    /// Base64 image bytes as serialized by the backend.
    #[serde(default)]
    pub picture: Option<String>,
}

impl UserInfo {
    pub fn has_role(&self, role: &str) -> bool {
        self.authorities.iter().any(|a| a == role)
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.name)
    }

    pub fn profile_picture_url(&self) -> Option<String> {
        self.picture
            .as_ref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("data:image;base64,{p}"))
    }
}

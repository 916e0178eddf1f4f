use crate::api::{ApiError, ApiErrorKind};
use crate::connectivity::ConnectionState;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use strum::Display;

pub(crate) const SAVE_FAILED_TEXT: &str = "Error in saving";
const DISMISS_AFTER_MS: u32 = 5_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Theme {
    Success,
    Warning,
    Error,
    Contrast,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Notification {
    pub text: String,
    pub theme: Theme,
}

impl Notification {
    pub fn new(text: impl Into<String>, theme: Theme) -> Self {
        Self {
            text: text.into(),
            theme,
        }
    }
}

/// What the user sees for a failed endpoint call.
///
/// Validation failures carry the server's message. An unauthorized call is
/// handled by the forced-logout path and shows nothing.
pub(crate) fn notification_for_error(e: &ApiError) -> Option<Notification> {
    match e {
        ApiError::Validation { message } => Some(Notification::new(message.clone(), Theme::Error)),
        _ if e.kind() == ApiErrorKind::Unauthorized => None,
        _ => Some(Notification::new(SAVE_FAILED_TEXT, Theme::Error)),
    }
}

pub(crate) const OFFLINE_TEXT: &str = "You are offline. Showing the last saved data.";

/// Losing the connection is announced; every other state speaks for itself.
pub(crate) fn notification_for_connection(state: ConnectionState) -> Option<Notification> {
    state
        .is_offline()
        .then(|| Notification::new(OFFLINE_TEXT, Theme::Contrast))
}

/// On-screen notification stack. Entries dismiss themselves.
#[derive(Clone, Copy)]
pub(crate) struct Notifications {
    items: RwSignal<Vec<(u64, Notification)>>,
    next_id: StoredValue<u64>,
}

impl Notifications {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(vec![]),
            next_id: StoredValue::new(0),
        }
    }

    pub fn items(&self) -> RwSignal<Vec<(u64, Notification)>> {
        self.items
    }

    pub fn show(&self, notification: Notification) {
        let id = self.next_id.get_value() + 1;
        self.next_id.set_value(id);

        tracing::debug!(theme = %notification.theme, text = %notification.text, "notification");
        self.items.update(|items| items.push((id, notification)));

        let items = self.items;
        spawn_local(async move {
            TimeoutFuture::new(DISMISS_AFTER_MS).await;
            items.try_update(|items| items.retain(|(i, _)| *i != id));
        });
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|(i, _)| *i != id));
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_show_server_message() {
        let n = notification_for_error(&ApiError::Validation {
            message: "Assignee 4 already has a todo!".to_string(),
        })
        .expect("shown");
        assert_eq!(n.text, "Assignee 4 already has a todo!");
        assert_eq!(n.theme, Theme::Error);
    }

    #[test]
    fn other_errors_are_generic() {
        for e in [
            ApiError::Network("down".to_string()),
            ApiError::Http {
                status: 500,
                body: String::new(),
            },
            ApiError::Parse("eof".to_string()),
        ] {
            assert_eq!(
                notification_for_error(&e),
                Some(Notification::new(SAVE_FAILED_TEXT, Theme::Error))
            );
        }
    }

    #[test]
    fn unauthorized_is_silent() {
        assert_eq!(notification_for_error(&ApiError::Unauthorized), None);
    }

    #[test]
    fn only_lost_connection_is_announced() {
        assert_eq!(
            notification_for_connection(ConnectionState::ConnectionLost),
            Some(Notification::new(OFFLINE_TEXT, Theme::Contrast))
        );
        for s in [
            ConnectionState::Connected,
            ConnectionState::Loading,
            ConnectionState::Reconnecting,
        ] {
            assert_eq!(notification_for_connection(s), None);
        }
    }

    #[test]
    fn theme_names_match_css_themes() {
        assert_eq!(Theme::Success.to_string(), "success");
        assert_eq!(Theme::Contrast.to_string(), "contrast");
    }
}

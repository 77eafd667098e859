// SPDX-License-Identifier: MPL-2.0
//! Error display state sub-component.

use crate::error::Error;
use crate::i18n::fluent::I18n;

/// Error state for displaying user-friendly errors with optional details.
#[derive(Debug, Clone)]
pub struct State {
    /// i18n key for the friendly error message.
    friendly_key: &'static str,
    friendly_text: String,
    /// Technical error details.
    details: String,
    show_details: bool,
}

/// Messages for the error state sub-component.
#[derive(Debug, Clone)]
pub enum Message {
    ToggleDetails,
    /// Ask for the failed fetch to be started again.
    Retry,
}

/// Effects produced by the error state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Retry,
}

impl State {
    #[must_use]
    pub fn new(friendly_key: &'static str, details: String, i18n: &I18n) -> Self {
        Self {
            friendly_key,
            friendly_text: i18n.tr(friendly_key),
            details,
            show_details: false,
        }
    }

    /// Builds the display state for an application error.
    #[must_use]
    pub fn from_error(error: &Error, i18n: &I18n) -> Self {
        Self::new(error.i18n_key(), error.to_string(), i18n)
    }

    pub fn handle(&mut self, msg: Message) -> Effect {
        match msg {
            Message::ToggleDetails => {
                self.show_details = !self.show_details;
                Effect::None
            }
            Message::Retry => Effect::Retry,
        }
    }

    #[must_use]
    pub fn friendly_text(&self) -> &str {
        &self.friendly_text
    }

    #[must_use]
    pub fn details(&self) -> &str {
        &self.details
    }

    #[must_use]
    pub fn show_details(&self) -> bool {
        self.show_details
    }

    #[must_use]
    pub fn friendly_key(&self) -> &'static str {
        self.friendly_key
    }
}

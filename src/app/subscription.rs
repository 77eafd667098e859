// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Keyboard and wheel input is only routed to the viewer while it shows a
//! sequence; otherwise the subscription only listens for window close.

use super::Message;
use crate::ui::viewer::component;
use crate::ui::viewer::subcomponents::wheel;
use iced::{event, time, Subscription};
use std::time::Duration;

/// Spinner animation rate while the sequence is being fetched.
const SPINNER_INTERVAL: Duration = Duration::from_millis(50);

pub fn create_event_subscription(viewer_ready: bool) -> Subscription<Message> {
    if viewer_ready {
        event::listen_with(|event, status, window_id| {
            if let event::Event::Window(iced::window::Event::CloseRequested) = &event {
                return Some(Message::WindowCloseRequested(window_id));
            }

            // Wheel always navigates, even over widgets that report it captured
            if matches!(
                event,
                event::Event::Mouse(iced::mouse::Event::WheelScrolled { .. })
            ) {
                return Some(Message::Viewer(component::Message::RawEvent {
                    window: window_id,
                    event: event.clone(),
                }));
            }

            match (&event, status) {
                (event::Event::Keyboard(..), event::Status::Ignored) => {
                    Some(Message::Viewer(component::Message::RawEvent {
                        window: window_id,
                        event: event.clone(),
                    }))
                }
                _ => None,
            }
        })
    } else {
        event::listen_with(|event, _status, window_id| {
            if let event::Event::Window(iced::window::Event::CloseRequested) = &event {
                Some(Message::WindowCloseRequested(window_id))
            } else {
                None
            }
        })
    }
}

/// Periodic ticks for the loading spinner and the wheel debounce.
///
/// Each tick only runs while it has something to do.
pub fn create_tick_subscription(viewer: &component::State) -> Subscription<Message> {
    let spinner = if viewer.is_loading() {
        time::every(SPINNER_INTERVAL).map(|_| Message::Viewer(component::Message::SpinnerTick))
    } else {
        Subscription::none()
    };

    let wheel = if viewer.wheel_pending() {
        time::every(wheel::TICK_INTERVAL).map(|_| Message::Viewer(component::Message::WheelTick))
    } else {
        Subscription::none()
    };

    Subscription::batch([spinner, wheel])
}

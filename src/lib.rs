// SPDX-License-Identifier: MPL-2.0
//! `study_lens` is a radiology study viewer built with the Iced GUI framework.
//!
//! It retrieves the ordered image list of a study, preloads the images
//! around the current position and lets the user scroll through them with
//! the keyboard, the mouse wheel or a slider, adjusting contrast,
//! brightness, scale and inversion on the fly.

#![doc(html_root_url = "https://docs.rs/study_lens/0.1.0")]

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod media;
pub mod study;
pub mod ui;

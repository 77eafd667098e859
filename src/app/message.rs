// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::ui::viewer::component;
use std::path::PathBuf;

/// Top-level messages consumed by `App::update`.
#[derive(Debug, Clone)]
pub enum Message {
    Viewer(component::Message),
    /// Window close was requested (user clicked X or pressed Alt+F4).
    WindowCloseRequested(iced::window::Id),
}

/// Runtime flags passed in from the CLI.
#[derive(Debug, Default, Clone)]
pub struct Flags {
    /// Study endpoint; overrides `[study].endpoint` from the config.
    pub endpoint: Option<String>,
    /// Optional locale override in BCP-47 form (e.g. `es`, `en-US`).
    pub lang: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `STUDY_LENS_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
    /// Header title; overrides `[study].title` from the config.
    pub title: Option<String>,
    /// Where to write the diagnostics log as JSON when the window closes.
    pub diagnostics_file: Option<PathBuf>,
}

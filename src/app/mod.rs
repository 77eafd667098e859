// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration around the study viewer.
//!
//! The `App` struct wires together configuration, localization, the
//! diagnostics log and the viewer component, and turns the viewer's
//! effects into Iced tasks: sequence fetches, image loads and the save
//! dialog.

mod message;
pub mod paths;
mod subscription;

pub use message::{Flags, Message};

use crate::config::{self, Config};
use crate::diagnostics::{BufferCapacity, DiagnosticsCollector};
use crate::i18n::fluent::I18n;
use crate::media::{export, prefetch, DecoderChain};
use crate::study::{StudyClient, StudyInfo};
use crate::ui::viewer::component;
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    viewer: component::State,
    client: StudyClient,
    decoders: Arc<DecoderChain>,
    diagnostics: DiagnosticsCollector,
    diagnostics_file: Option<PathBuf>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("viewer_ready", &self.viewer.is_ready())
            .field("images", &self.viewer.sequence().len())
            .field("decoders", &self.decoders)
            .finish_non_exhaustive()
    }
}

pub const WINDOW_DEFAULT_HEIGHT: u32 = 760;
pub const WINDOW_DEFAULT_WIDTH: u32 = 960;
pub const MIN_WINDOW_HEIGHT: u32 = 480;
pub const MIN_WINDOW_WIDTH: u32 = 640;

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        // Close goes through `Message::WindowCloseRequested` so the
        // diagnostics log can be written first
        exit_on_close_request: false,
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    paths::init_cli_overrides(flags.config_dir.clone());

    // iced requires an Fn boot closure; the flags are consumed on the first call
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Loads the config and starts fetching the study.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (config, config_warning) = config::load();
        Self::from_config(flags, &config, config_warning)
    }

    fn from_config(
        flags: Flags,
        config: &Config,
        config_warning: Option<String>,
    ) -> (Self, Task<Message>) {
        let i18n = I18n::new(flags.lang, config);
        let mut diagnostics = DiagnosticsCollector::new(BufferCapacity::default());
        if let Some(key) = config_warning {
            diagnostics.log_warning(i18n.tr(&key));
        }

        let endpoint = flags.endpoint.or_else(|| config.study.endpoint.clone());
        let info = StudyInfo {
            title: flags.title.or_else(|| config.study.title.clone()),
            date: config.study.date.clone(),
            description: config.study.description.clone(),
        };
        let settings = component::Settings::from_config(&config.viewer);
        let viewer = component::State::new(endpoint.as_deref(), info, settings)
            .with_diagnostics(diagnostics.handle());

        let mut app = App {
            i18n,
            viewer,
            client: StudyClient::new(),
            decoders: Arc::new(DecoderChain::with_defaults()),
            diagnostics,
            diagnostics_file: flags.diagnostics_file,
        };

        let effect = app.viewer.start(&app.i18n);
        app.diagnostics.process_pending();
        let task = app.perform(effect);
        (app, task)
    }

    fn title(&self) -> String {
        let app_name = self.i18n.tr("window-title");
        match &self.viewer.info().title {
            Some(title) => format!("{title} - {app_name}"),
            None => app_name,
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_event_subscription(self.viewer.is_ready()),
            subscription::create_tick_subscription(&self.viewer),
        ])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Viewer(viewer_message) => {
                let effect = self.viewer.handle_message(viewer_message, &self.i18n);
                self.diagnostics.process_pending();
                self.perform(effect)
            }
            Message::WindowCloseRequested(id) => {
                self.write_diagnostics();
                window::close(id)
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        self.viewer.view(&self.i18n).map(Message::Viewer)
    }

    /// Turns a viewer effect into the task that carries it out.
    fn perform(&self, effect: component::Effect) -> Task<Message> {
        match effect {
            component::Effect::None => Task::none(),
            component::Effect::FetchSequence { generation, source } => {
                let client = self.client.clone();
                Task::perform(
                    async move { client.fetch_sequence(&source).await },
                    move |result| {
                        Message::Viewer(component::Message::SequenceFetched { generation, result })
                    },
                )
            }
            component::Effect::LoadImages {
                generation,
                requests,
            } => Task::batch(requests.into_iter().map(|(index, image)| {
                Task::perform(
                    prefetch::load_image_for_prefetch(
                        self.client.clone(),
                        Arc::clone(&self.decoders),
                        self.diagnostics.handle(),
                        index,
                        image,
                    ),
                    move |(index, result)| {
                        Message::Viewer(component::Message::ImageLoaded {
                            generation,
                            index,
                            result,
                        })
                    },
                )
            })),
            component::Effect::PickExportDestination { file_name, format } => Task::perform(
                export::pick_destination(file_name, format),
                |path| Message::Viewer(component::Message::ExportDestinationChosen(path)),
            ),
        }
    }

    fn write_diagnostics(&mut self) {
        self.diagnostics.process_pending();
        let Some(path) = &self.diagnostics_file else {
            return;
        };
        if let Err(err) = self.diagnostics.export_to_file(path) {
            eprintln!("[study_lens] cannot write diagnostics to {}: {err}", path.display());
        }
    }
}

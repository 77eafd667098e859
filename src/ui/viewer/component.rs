// SPDX-License-Identifier: MPL-2.0
//! Viewer component encapsulating state and update logic.
//!
//! The component never performs I/O itself. Every fetch, image load and
//! save dialog is returned to the application as an [`Effect`], and the
//! results come back as [`Message`]s tagged with the generation that
//! requested them. Results from an older generation are dropped.

use super::controls;
use super::subcomponents::{adjustment, error_state, loading, navigation, wheel};
use crate::config::ViewerConfig;
use crate::diagnostics::{DiagnosticsHandle, StudyOperation, UserAction};
use crate::domain::viewing::{CacheBudget, DebounceWindow, PrefetchRadius};
use crate::error::Error;
use crate::i18n::fluent::I18n;
use crate::media::export::{self, ExportFormat};
use crate::media::{ImageData, PreloadCache, PresentationFilter};
use crate::study::{ImageRef, ImageSequence, StudyInfo, StudySource};
use crate::ui::design_tokens::{palette, spacing, typography};
use iced::widget::{button, image, text, Column, Container, Row, Space};
use iced::{alignment, event, keyboard, mouse, window, Element, Length};
use std::path::PathBuf;
use std::time::Instant;

/// Messages emitted by viewer widgets or returned by viewer effects.
#[derive(Debug, Clone)]
pub enum Message {
    SequenceFetched {
        generation: u64,
        result: Result<ImageSequence, Error>,
    },
    ImageLoaded {
        generation: u64,
        index: usize,
        result: Result<ImageData, Error>,
    },
    Navigation(navigation::Message),
    Adjustment(adjustment::Message),
    ErrorState(error_state::Message),
    RawEvent {
        window: window::Id,
        event: event::Event,
    },
    WheelTick,
    SpinnerTick,
    Export(ExportFormat),
    /// Result of the save dialog; `None` when cancelled.
    ExportDestinationChosen(Option<PathBuf>),
}

/// Side effects the application should perform after handling a viewer message.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    FetchSequence {
        generation: u64,
        source: StudySource,
    },
    /// Load and decode each `(index, image)`; answer with [`Message::ImageLoaded`].
    LoadImages {
        generation: u64,
        requests: Vec<(usize, ImageRef)>,
    },
    PickExportDestination {
        file_name: String,
        format: ExportFormat,
    },
}

/// Tunables read from the `[viewer]` config section.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Settings {
    pub prefetch_radius: PrefetchRadius,
    pub cache_budget: CacheBudget,
    pub debounce_window: DebounceWindow,
    pub export_format: ExportFormat,
}

impl Settings {
    #[must_use]
    pub fn from_config(viewer: &ViewerConfig) -> Self {
        let defaults = Self::default();
        Self {
            prefetch_radius: viewer
                .prefetch_radius
                .map_or(defaults.prefetch_radius, PrefetchRadius::new),
            cache_budget: viewer
                .prefetch_cache_mb
                .map_or(defaults.cache_budget, CacheBudget::new),
            debounce_window: viewer
                .wheel_debounce_ms
                .map_or(defaults.debounce_window, DebounceWindow::new),
            export_format: viewer.export_format.unwrap_or_default(),
        }
    }
}

/// Outcome of the last export, shown under the controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Saved(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone)]
enum Phase {
    Loading,
    Ready,
    Failed(error_state::State),
}

/// The displayed image with the filter currently applied to it.
#[derive(Debug, Clone)]
struct Presented {
    index: usize,
    image: ImageData,
    filter: PresentationFilter,
    handle: image::Handle,
}

/// Complete viewer state.
#[derive(Debug)]
pub struct State {
    source: Result<StudySource, Error>,
    info: StudyInfo,
    settings: Settings,
    phase: Phase,
    loading: loading::State,
    fetch_in_flight: bool,
    fetch_started_at: Option<Instant>,
    generation: u64,
    sequence: ImageSequence,
    navigation: navigation::State,
    adjustment: adjustment::State,
    wheel: wheel::State,
    cache: PreloadCache,
    presented: Option<Presented>,
    pending_export: Option<ImageData>,
    export_status: Option<ExportStatus>,
    diagnostics: Option<DiagnosticsHandle>,
}

impl State {
    /// Creates a viewer for `endpoint`. Nothing is fetched until [`State::start`].
    ///
    /// A missing or unparsable endpoint is kept and reported as the error
    /// state on start.
    #[must_use]
    pub fn new(endpoint: Option<&str>, info: StudyInfo, settings: Settings) -> Self {
        let source = endpoint
            .ok_or_else(|| Error::Config("no study endpoint configured".into()))
            .and_then(StudySource::parse);

        Self {
            source,
            info,
            settings,
            phase: Phase::Loading,
            loading: loading::State::default(),
            fetch_in_flight: false,
            fetch_started_at: None,
            generation: 0,
            sequence: ImageSequence::default(),
            navigation: navigation::State::default(),
            adjustment: adjustment::State::default(),
            wheel: wheel::State::new(settings.debounce_window),
            cache: PreloadCache::new(settings.cache_budget),
            presented: None,
            pending_export: None,
            export_status: None,
            diagnostics: None,
        }
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticsHandle) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Starts fetching the sequence. Does nothing while a fetch is in flight.
    pub fn start(&mut self, i18n: &I18n) -> Effect {
        if self.fetch_in_flight {
            return Effect::None;
        }

        let source = match &self.source {
            Ok(source) => source.clone(),
            Err(error) => {
                let error = error.clone();
                self.fail(&error, i18n);
                return Effect::None;
            }
        };

        self.generation = self.generation.wrapping_add(1);
        self.fetch_in_flight = true;
        self.fetch_started_at = Some(Instant::now());
        self.clear_sequence();
        self.phase = Phase::Loading;
        self.loading.handle(loading::Message::StartLoading);

        Effect::FetchSequence {
            generation: self.generation,
            source,
        }
    }

    pub fn handle_message(&mut self, message: Message, i18n: &I18n) -> Effect {
        self.handle_message_at(message, i18n, Instant::now())
    }

    /// Same as [`State::handle_message`] with an explicit clock reading.
    pub fn handle_message_at(&mut self, message: Message, i18n: &I18n, now: Instant) -> Effect {
        match message {
            Message::SequenceFetched { generation, result } => {
                self.on_sequence_fetched(generation, result, i18n)
            }
            Message::ImageLoaded {
                generation,
                index,
                result,
            } => {
                self.on_image_loaded(generation, index, result);
                Effect::None
            }
            Message::Navigation(message) => self.navigate(message),
            Message::Adjustment(message) => {
                self.adjust(message);
                Effect::None
            }
            Message::ErrorState(message) => {
                let Phase::Failed(error) = &mut self.phase else {
                    return Effect::None;
                };
                match error.handle(message) {
                    error_state::Effect::Retry => {
                        self.log_action(UserAction::RetryLoad);
                        self.start(i18n)
                    }
                    error_state::Effect::None => Effect::None,
                }
            }
            Message::RawEvent { event, .. } => self.handle_raw_event(event, now),
            Message::WheelTick => match self.wheel.handle_at(wheel::Message::Tick, now) {
                wheel::Effect::Step(direction) if self.is_ready() => {
                    let delta = match direction {
                        navigation::Direction::Next => 1.0,
                        navigation::Direction::Previous => -1.0,
                    };
                    self.log_action(UserAction::WheelStep { delta });
                    let effect = self.navigation.step(direction);
                    self.after_navigation(effect)
                }
                _ => Effect::None,
            },
            Message::SpinnerTick => {
                if self.loading.handle_at(loading::Message::SpinnerTick, now)
                    == loading::Effect::BecameSlow
                {
                    self.log_warning("sequence fetch is taking longer than expected");
                }
                Effect::None
            }
            Message::Export(format) => self.request_export(format),
            Message::ExportDestinationChosen(path) => {
                self.finish_export(path);
                Effect::None
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready)
    }

    #[must_use]
    pub fn error(&self) -> Option<&error_state::State> {
        match &self.phase {
            Phase::Failed(error) => Some(error),
            _ => None,
        }
    }

    #[must_use]
    pub fn sequence(&self) -> &ImageSequence {
        &self.sequence
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.navigation.current_index()
    }

    #[must_use]
    pub fn adjustment(&self) -> &adjustment::State {
        &self.adjustment
    }

    #[must_use]
    pub fn info(&self) -> &StudyInfo {
        &self.info
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The image currently on screen, if it has been loaded.
    #[must_use]
    pub fn current_image(&self) -> Option<&ImageData> {
        self.presented.as_ref().map(|presented| &presented.image)
    }

    /// Display handle of the current image with adjustments applied.
    #[must_use]
    pub fn presented_handle(&self) -> Option<&image::Handle> {
        self.presented.as_ref().map(|presented| &presented.handle)
    }

    #[must_use]
    pub fn cache(&self) -> &PreloadCache {
        &self.cache
    }

    #[must_use]
    pub fn export_status(&self) -> Option<&ExportStatus> {
        self.export_status.as_ref()
    }

    /// True while a wheel burst waits to be turned into a step.
    #[must_use]
    pub fn wheel_pending(&self) -> bool {
        self.wheel.is_pending()
    }

    // =========================================================================
    // Update helpers
    // =========================================================================

    fn on_sequence_fetched(
        &mut self,
        generation: u64,
        result: Result<ImageSequence, Error>,
        i18n: &I18n,
    ) -> Effect {
        if generation != self.generation {
            self.log_warning(format!("dropped stale sequence (generation {generation})"));
            return Effect::None;
        }

        self.fetch_in_flight = false;
        self.loading.handle(loading::Message::StopLoading);

        match result {
            Ok(sequence) => {
                #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
                let duration_ms = self
                    .fetch_started_at
                    .take()
                    .map_or(0, |started| started.elapsed().as_millis() as u64);
                self.log_operation(StudyOperation::FetchSequence {
                    image_count: sequence.len(),
                    duration_ms,
                });

                self.navigation = navigation::State::new(sequence.len());
                self.sequence = sequence;
                self.phase = Phase::Ready;
                self.plan_prefetch()
            }
            Err(error) => {
                self.fetch_started_at = None;
                self.clear_sequence();
                self.fail(&error, i18n);
                Effect::None
            }
        }
    }

    fn on_image_loaded(&mut self, generation: u64, index: usize, result: Result<ImageData, Error>) {
        if generation != self.generation || index >= self.sequence.len() {
            return;
        }

        match result {
            Ok(image) => {
                self.cache.insert(index, image);
                if index == self.navigation.current_index() {
                    self.refresh_presented();
                }
            }
            Err(error) => self.cache.mark_failed(index, error.to_string()),
        }
    }

    fn navigate(&mut self, message: navigation::Message) -> Effect {
        if !self.is_ready() {
            return Effect::None;
        }

        let action = match &message {
            navigation::Message::Next => Some(UserAction::NavigateNext),
            navigation::Message::Previous => Some(UserAction::NavigatePrevious),
            navigation::Message::JumpTo(_) | navigation::Message::SliderChanged(_) => None,
        };

        let effect = self.navigation.handle(message);
        if let navigation::Effect::IndexChanged { to, .. } = effect {
            self.log_action(action.unwrap_or(UserAction::JumpToImage { index: to }));
        }
        self.after_navigation(effect)
    }

    fn after_navigation(&mut self, effect: navigation::Effect) -> Effect {
        match effect {
            navigation::Effect::IndexChanged { to, .. } => {
                // Touch the new current image so eviction prefers the others
                let _ = self.cache.get(to);
                self.export_status = None;
                self.refresh_presented();
                self.plan_prefetch()
            }
            navigation::Effect::None => Effect::None,
        }
    }

    fn adjust(&mut self, message: adjustment::Message) {
        if !self.is_ready() {
            return;
        }

        let effect = self.adjustment.handle(message.clone());
        if effect == adjustment::Effect::None {
            return;
        }

        let action = match message {
            adjustment::Message::SetContrast(_) => UserAction::SetContrast {
                percent: self.adjustment.contrast.value(),
            },
            adjustment::Message::SetBrightness(_) => UserAction::SetBrightness {
                percent: self.adjustment.brightness.value(),
            },
            adjustment::Message::SetScale(_)
            | adjustment::Message::ScaleUp
            | adjustment::Message::ScaleDown => UserAction::SetScale {
                factor: self.adjustment.scale.value(),
            },
            adjustment::Message::ToggleInvert => UserAction::ToggleInvert,
            adjustment::Message::Reset => UserAction::ResetAdjustments,
        };
        self.log_action(action);

        if effect == adjustment::Effect::FilterChanged {
            self.refresh_presented();
        }
    }

    fn handle_raw_event(&mut self, event: event::Event, now: Instant) -> Effect {
        if !self.is_ready() {
            return Effect::None;
        }

        match event {
            event::Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(named),
                ..
            }) => match named {
                keyboard::key::Named::ArrowRight | keyboard::key::Named::ArrowDown => {
                    self.navigate(navigation::Message::Next)
                }
                keyboard::key::Named::ArrowLeft | keyboard::key::Named::ArrowUp => {
                    self.navigate(navigation::Message::Previous)
                }
                _ => Effect::None,
            },
            event::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                // Wheel down reports a negative y and means "next"
                let delta = -scroll_steps(&delta);
                self.wheel
                    .handle_at(wheel::Message::Scrolled { delta }, now);
                Effect::None
            }
            _ => Effect::None,
        }
    }

    fn request_export(&mut self, format: ExportFormat) -> Effect {
        let image = match self.current_image() {
            Some(image) if self.is_ready() => image.clone(),
            _ => {
                self.log_warning(Error::ExportUnavailable.to_string());
                return Effect::None;
            }
        };

        self.log_action(UserAction::ExportImage {
            format: format.extension().to_string(),
        });
        self.pending_export = Some(image);
        Effect::PickExportDestination {
            file_name: export::default_file_name(
                &self.info,
                self.navigation.current_index(),
                format,
            ),
            format,
        }
    }

    fn finish_export(&mut self, path: Option<PathBuf>) {
        let image = self.pending_export.take();
        let Some(path) = path else {
            return;
        };

        match export::export_image(image.as_ref(), &path) {
            Ok(size_bytes) => {
                self.log_operation(StudyOperation::ExportImage { size_bytes });
                self.export_status = Some(ExportStatus::Saved(path));
            }
            Err(error) if error.is_silent() => self.log_warning(error.to_string()),
            Err(error) => {
                self.log_error(format!("export to {} failed: {error}", path.display()));
                self.export_status = Some(ExportStatus::Failed(error.to_string()));
            }
        }
    }

    /// Requests the not yet requested images around the current index.
    fn plan_prefetch(&mut self) -> Effect {
        let requests: Vec<(usize, ImageRef)> = self
            .cache
            .plan(
                self.navigation.current_index(),
                self.sequence.len(),
                self.settings.prefetch_radius,
            )
            .into_iter()
            .filter_map(|index| self.sequence.get(index).cloned().map(|image| (index, image)))
            .collect();

        if requests.is_empty() {
            Effect::None
        } else {
            Effect::LoadImages {
                generation: self.generation,
                requests,
            }
        }
    }

    /// Rebuilds the display handle when the index or the filter changed.
    fn refresh_presented(&mut self) {
        let index = self.navigation.current_index();
        let filter = self.adjustment.filter();
        if self
            .presented
            .as_ref()
            .is_some_and(|presented| presented.index == index && presented.filter == filter)
        {
            return;
        }

        let image = match self.presented.take() {
            Some(presented) if presented.index == index => Some(presented.image),
            _ => self.cache.peek(index).cloned(),
        };
        self.presented = image.map(|image| Presented {
            index,
            handle: image.presented(&filter),
            filter,
            image,
        });
    }

    fn clear_sequence(&mut self) {
        self.sequence = ImageSequence::default();
        self.navigation = navigation::State::default();
        self.cache.clear();
        self.wheel.cancel();
        self.presented = None;
        self.pending_export = None;
        self.export_status = None;
    }

    fn fail(&mut self, error: &Error, i18n: &I18n) {
        eprintln!("[study_lens] failed to load study: {error}");
        self.log_error(error.to_string());
        self.phase = Phase::Failed(error_state::State::from_error(error, i18n));
    }

    fn log_action(&self, action: UserAction) {
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log_action(action);
        }
    }

    fn log_operation(&self, operation: StudyOperation) {
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log_operation(operation);
        }
    }

    fn log_warning(&self, message: impl Into<String>) {
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log_warning(message);
        }
    }

    fn log_error(&self, message: impl Into<String>) {
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log_error(message);
        }
    }

    // =========================================================================
    // View
    // =========================================================================

    pub fn view<'a>(&'a self, i18n: &'a I18n) -> Element<'a, Message> {
        let body = match &self.phase {
            Phase::Loading => super::loading_view(i18n, &self.loading),
            Phase::Failed(error) => super::error_view(i18n, error),
            Phase::Ready if self.sequence.is_empty() => super::message_view(i18n.tr("viewer-empty")),
            Phase::Ready => self.ready_view(i18n),
        };

        Column::new()
            .spacing(spacing::SM)
            .padding(spacing::MD)
            .width(Length::Fill)
            .height(Length::Fill)
            .push(self.header_view(i18n))
            .push(body)
            .into()
    }

    fn header_view<'a>(&'a self, i18n: &'a I18n) -> Element<'a, Message> {
        let title = self
            .info
            .title
            .clone()
            .unwrap_or_else(|| i18n.tr("study-untitled"));

        let mut header = Column::new()
            .spacing(spacing::XXS)
            .push(text(title).size(typography::TITLE_MD));

        if let Some(date) = &self.info.date {
            header = header.push(
                text(i18n.tr_with_args("study-date", &[("date", date.as_str())]))
                    .size(typography::BODY_SM)
                    .color(palette::GRAY_400),
            );
        }
        if let Some(description) = &self.info.description {
            header = header.push(
                text(description.as_str())
                    .size(typography::BODY)
                    .color(palette::GRAY_200),
            );
        }

        header.into()
    }

    fn ready_view<'a>(&'a self, i18n: &'a I18n) -> Element<'a, Message> {
        let ctx = controls::ViewContext { i18n };
        let index = self.navigation.current_index();

        let pane: Element<'a, Message> = match &self.presented {
            Some(presented) => {
                let image = super::view_image(
                    &presented.handle,
                    presented.image.width,
                    presented.image.height,
                    self.adjustment.scale,
                );
                Container::new(image)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .align_x(alignment::Horizontal::Center)
                    .align_y(alignment::Vertical::Center)
                    .clip(true)
                    .into()
            }
            None => match self.cache.failure(index) {
                Some(reason) => super::message_view(format!(
                    "{} ({reason})",
                    i18n.tr("viewer-image-failed")
                )),
                None => super::message_view(i18n.tr("viewer-image-loading")),
            },
        };

        let export_enabled = self.presented.is_some();
        let preferred = self.settings.export_format;
        // Configured format first, as the primary action
        let formats = std::iter::once(preferred)
            .chain(ExportFormat::all().iter().copied().filter(|f| *f != preferred));
        let export_row = formats
            .fold(
                Row::new()
                    .spacing(spacing::XS)
                    .align_y(alignment::Vertical::Center),
                |row, format| {
                    let label = match format {
                        ExportFormat::Png => i18n.tr("export-png"),
                        ExportFormat::Jpg => i18n.tr("export-jpg"),
                    };
                    let style = if format == preferred {
                        button::primary
                    } else {
                        button::secondary
                    };
                    row.push(
                        button(text(label).size(typography::BODY))
                            .style(style)
                            .on_press_maybe(export_enabled.then_some(Message::Export(format))),
                    )
                },
            )
            .push(Space::new().width(Length::Fixed(spacing::MD)))
            .push(self.export_status_view(i18n));

        Column::new()
            .spacing(spacing::SM)
            .width(Length::Fill)
            .height(Length::Fill)
            .push(pane)
            .push(controls::navigation_bar(ctx, &self.navigation).map(Message::Navigation))
            .push(controls::adjustment_panel(ctx, &self.adjustment).map(Message::Adjustment))
            .push(export_row)
            .into()
    }

    fn export_status_view<'a>(&'a self, i18n: &'a I18n) -> Element<'a, Message> {
        match &self.export_status {
            Some(ExportStatus::Saved(path)) => text(i18n.tr_with_args(
                "export-saved",
                &[("path", path.display().to_string().as_str())],
            ))
            .size(typography::CAPTION)
            .color(palette::SUCCESS_500)
            .into(),
            Some(ExportStatus::Failed(reason)) => {
                text(format!("{} {reason}", i18n.tr("export-failed")))
                    .size(typography::CAPTION)
                    .color(palette::ERROR_500)
                    .into()
            }
            None => Space::new().into(),
        }
    }
}

/// Normalizes mouse wheel units (lines vs. pixels) into line steps.
fn scroll_steps(delta: &mouse::ScrollDelta) -> f32 {
    match delta {
        mouse::ScrollDelta::Lines { y, .. } => *y,
        mouse::ScrollDelta::Pixels { y, .. } => *y / 120.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{BufferCapacity, DiagnosticEventKind, DiagnosticsCollector};
    use std::time::Duration;
    use tempfile::tempdir;

    fn i18n() -> I18n {
        I18n::default()
    }

    fn sequence_of(len: usize) -> ImageSequence {
        ImageSequence::new(
            (0..len)
                .map(|i| ImageRef::Local(PathBuf::from(format!("/study/{i}.png"))))
                .collect(),
        )
    }

    fn image(marker: u8) -> ImageData {
        ImageData::from_rgba(1, 1, vec![marker, marker, marker, 255], vec![marker; 8])
    }

    fn requested(effect: &Effect) -> Vec<usize> {
        match effect {
            Effect::LoadImages { requests, .. } => requests.iter().map(|(i, _)| *i).collect(),
            _ => Vec::new(),
        }
    }

    fn settings(radius: usize) -> Settings {
        Settings {
            prefetch_radius: PrefetchRadius::new(radius),
            ..Settings::default()
        }
    }

    /// Viewer that has fetched a sequence of `len` images.
    fn ready_viewer(len: usize, radius: usize) -> (State, Effect) {
        let i18n = i18n();
        let mut state = State::new(Some("/study"), StudyInfo::default(), settings(radius));
        let Effect::FetchSequence { generation, .. } = state.start(&i18n) else {
            panic!("expected fetch effect");
        };
        let effect = state.handle_message(
            Message::SequenceFetched {
                generation,
                result: Ok(sequence_of(len)),
            },
            &i18n,
        );
        (state, effect)
    }

    fn key_press(named: keyboard::key::Named) -> Message {
        Message::RawEvent {
            window: window::Id::unique(),
            event: event::Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(named),
                modified_key: keyboard::Key::Named(named),
                physical_key: keyboard::key::Physical::Code(keyboard::key::Code::ArrowRight),
                location: keyboard::Location::Standard,
                modifiers: keyboard::Modifiers::default(),
                text: None,
                repeat: false,
            }),
        }
    }

    fn wheel(y: f32) -> Message {
        Message::RawEvent {
            window: window::Id::unique(),
            event: event::Event::Mouse(mouse::Event::WheelScrolled {
                delta: mouse::ScrollDelta::Lines { x: 0.0, y },
            }),
        }
    }

    #[test]
    fn start_fetches_once_while_in_flight() {
        let i18n = i18n();
        let mut state = State::new(Some("/study"), StudyInfo::default(), Settings::default());
        assert!(matches!(state.start(&i18n), Effect::FetchSequence { .. }));
        assert_eq!(state.start(&i18n), Effect::None);
        assert!(state.is_loading());
    }

    #[test]
    fn failed_fetch_shows_error_and_keeps_list_empty() {
        let i18n = i18n();
        let mut state = State::new(Some("/study"), StudyInfo::default(), Settings::default());
        let Effect::FetchSequence { generation, .. } = state.start(&i18n) else {
            panic!("expected fetch effect");
        };

        let effect = state.handle_message(
            Message::SequenceFetched {
                generation,
                result: Err(Error::Fetch("HTTP 500".into())),
            },
            &i18n,
        );

        assert_eq!(effect, Effect::None);
        assert!(state.sequence().is_empty());
        let error = state.error().expect("error state");
        assert_eq!(error.friendly_key(), "error-fetch-failed");
        assert!(!state.is_loading());
    }

    #[test]
    fn missing_endpoint_is_config_error() {
        let i18n = i18n();
        let mut state = State::new(None, StudyInfo::default(), Settings::default());
        assert_eq!(state.start(&i18n), Effect::None);
        assert_eq!(
            state.error().map(error_state::State::friendly_key),
            Some("error-config")
        );
    }

    #[test]
    fn retry_starts_a_new_generation() {
        let i18n = i18n();
        let mut state = State::new(Some("/study"), StudyInfo::default(), Settings::default());
        let Effect::FetchSequence { generation, .. } = state.start(&i18n) else {
            panic!("expected fetch effect");
        };
        state.handle_message(
            Message::SequenceFetched {
                generation,
                result: Err(Error::Fetch("timeout".into())),
            },
            &i18n,
        );

        let effect = state.handle_message(Message::ErrorState(error_state::Message::Retry), &i18n);
        match effect {
            Effect::FetchSequence { generation: next, .. } => assert_eq!(next, generation + 1),
            other => panic!("expected fetch effect, got {other:?}"),
        }
        assert!(state.is_loading());
    }

    #[test]
    fn stale_results_are_dropped() {
        let (mut state, _) = ready_viewer(3, 1);
        let i18n = i18n();
        let stale = state.generation() - 1;

        state.handle_message(
            Message::SequenceFetched {
                generation: stale,
                result: Ok(sequence_of(9)),
            },
            &i18n,
        );
        state.handle_message(
            Message::ImageLoaded {
                generation: stale,
                index: 0,
                result: Ok(image(1)),
            },
            &i18n,
        );

        assert_eq!(state.sequence().len(), 3);
        assert!(state.current_image().is_none());
    }

    #[test]
    fn ready_plans_window_around_first_image() {
        let (state, effect) = ready_viewer(10, 3);
        assert!(state.is_ready());
        assert_eq!(requested(&effect), vec![0, 1, 2, 3]);
    }

    #[test]
    fn each_index_is_requested_at_most_once() {
        let (mut state, first) = ready_viewer(5, 2);
        let i18n = i18n();
        let mut seen = requested(&first);

        seen.extend(requested(&state.handle_message(
            Message::Navigation(navigation::Message::JumpTo(2)),
            &i18n,
        )));
        for message in [
            navigation::Message::Next,
            navigation::Message::Next,
            navigation::Message::Previous,
            navigation::Message::JumpTo(0),
            navigation::Message::SliderChanged(4.0),
        ] {
            seen.extend(requested(
                &state.handle_message(Message::Navigation(message), &i18n),
            ));
        }

        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn oversized_images_are_not_refetched_when_stepping_back_and_forth() {
        let i18n = i18n();
        let settings = Settings {
            prefetch_radius: PrefetchRadius::new(1),
            cache_budget: CacheBudget::new(8),
            ..Settings::default()
        };
        let mut state = State::new(Some("/study"), StudyInfo::default(), settings);
        let Effect::FetchSequence { generation, .. } = state.start(&i18n) else {
            panic!("expected fetch effect");
        };

        let mut counts = [0usize; 3];
        let mut pending = state.handle_message(
            Message::SequenceFetched {
                generation,
                result: Ok(sequence_of(3)),
            },
            &i18n,
        );
        let steps = [
            navigation::Message::Next,
            navigation::Message::Previous,
            navigation::Message::Next,
            navigation::Message::Previous,
        ];
        for step in steps {
            for index in requested(&pending) {
                counts[index] += 1;
                let five_mb = ImageData::from_rgba(1, 1, vec![0; 4], vec![0; 5 * 1024 * 1024]);
                state.handle_message(
                    Message::ImageLoaded {
                        generation,
                        index,
                        result: Ok(five_mb),
                    },
                    &i18n,
                );
            }
            pending = state.handle_message(Message::Navigation(step), &i18n);
        }
        for index in requested(&pending) {
            counts[index] += 1;
        }

        assert_eq!(counts, [1, 1, 1]);
        assert!(state.current_image().is_some());
    }

    #[test]
    fn keyboard_arrows_navigate_with_clamping() {
        let (mut state, _) = ready_viewer(3, 1);
        let i18n = i18n();

        state.handle_message(key_press(keyboard::key::Named::ArrowLeft), &i18n);
        assert_eq!(state.current_index(), 0);

        for _ in 0..5 {
            state.handle_message(key_press(keyboard::key::Named::ArrowRight), &i18n);
        }
        assert_eq!(state.current_index(), 2);

        state.handle_message(key_press(keyboard::key::Named::ArrowUp), &i18n);
        assert_eq!(state.current_index(), 1);
        state.handle_message(key_press(keyboard::key::Named::ArrowDown), &i18n);
        assert_eq!(state.current_index(), 2);
    }

    #[test]
    fn wheel_burst_moves_one_step() {
        let (mut state, _) = ready_viewer(10, 1);
        let i18n = i18n();
        let start = Instant::now();

        for i in 0..10u64 {
            let at = start + Duration::from_millis(i * 8);
            state.handle_message_at(wheel(-1.0), &i18n, at);
            state.handle_message_at(Message::WheelTick, &i18n, at);
        }
        assert!(state.wheel_pending());
        for t in (80..400).step_by(16) {
            state.handle_message_at(Message::WheelTick, &i18n, start + Duration::from_millis(t));
        }

        assert_eq!(state.current_index(), 1);
        assert!(!state.wheel_pending());
    }

    #[test]
    fn wheel_up_moves_back() {
        let (mut state, _) = ready_viewer(10, 1);
        let i18n = i18n();
        state.handle_message(Message::Navigation(navigation::Message::JumpTo(5)), &i18n);

        let start = Instant::now();
        state.handle_message_at(wheel(2.0), &i18n, start);
        state.handle_message_at(Message::WheelTick, &i18n, start + Duration::from_millis(200));
        assert_eq!(state.current_index(), 4);
    }

    #[test]
    fn input_is_ignored_until_ready() {
        let i18n = i18n();
        let mut state = State::new(Some("/study"), StudyInfo::default(), Settings::default());
        let _ = state.start(&i18n);

        state.handle_message(key_press(keyboard::key::Named::ArrowRight), &i18n);
        state.handle_message(Message::Adjustment(adjustment::Message::SetContrast(150.0)), &i18n);
        assert_eq!(state.current_index(), 0);
        assert!(state.adjustment().is_default());
    }

    #[test]
    fn adjustments_do_not_touch_cached_pixels() {
        let (mut state, _) = ready_viewer(2, 1);
        let i18n = i18n();
        let generation = state.generation();
        state.handle_message(
            Message::ImageLoaded {
                generation,
                index: 0,
                result: Ok(image(40)),
            },
            &i18n,
        );

        state.handle_message(Message::Adjustment(adjustment::Message::ToggleInvert), &i18n);
        state.handle_message(Message::Adjustment(adjustment::Message::SetContrast(250.0)), &i18n);

        assert_eq!(state.adjustment().contrast.value(), 200.0);
        assert!(state.presented_handle().is_some());
        let cached = state.cache().peek(0).expect("cached image");
        assert_eq!(cached.rgba_bytes(), &[40, 40, 40, 255]);

        state.handle_message(Message::Adjustment(adjustment::Message::Reset), &i18n);
        assert!(state.adjustment().is_default());
    }

    #[test]
    fn failed_current_image_is_remembered() {
        let (mut state, _) = ready_viewer(2, 1);
        let i18n = i18n();
        let generation = state.generation();
        state.handle_message(
            Message::ImageLoaded {
                generation,
                index: 0,
                result: Err(Error::Decode("unrecognised image format".into())),
            },
            &i18n,
        );

        assert!(state.is_ready());
        assert!(state.current_image().is_none());
        assert!(state.cache().failure(0).is_some());
    }

    #[test]
    fn export_without_image_is_silent_noop() {
        let (mut state, _) = ready_viewer(2, 1);
        let i18n = i18n();
        assert_eq!(
            state.handle_message(Message::Export(ExportFormat::Png), &i18n),
            Effect::None
        );
        assert!(state.export_status().is_none());
    }

    #[test]
    fn export_writes_original_bytes_to_chosen_path() {
        let (mut state, _) = ready_viewer(2, 1);
        let i18n = i18n();
        let generation = state.generation();
        state.handle_message(
            Message::ImageLoaded {
                generation,
                index: 0,
                result: Ok(image(7)),
            },
            &i18n,
        );

        let effect = state.handle_message(Message::Export(ExportFormat::Jpg), &i18n);
        assert_eq!(
            effect,
            Effect::PickExportDestination {
                file_name: "study-1.jpg".into(),
                format: ExportFormat::Jpg,
            }
        );

        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("slice.jpg");
        state.handle_message(Message::ExportDestinationChosen(Some(path.clone())), &i18n);

        assert_eq!(std::fs::read(&path).expect("read export"), vec![7u8; 8]);
        assert_eq!(state.export_status(), Some(&ExportStatus::Saved(path)));
    }

    #[test]
    fn cancelled_export_writes_nothing() {
        let (mut state, _) = ready_viewer(1, 1);
        let i18n = i18n();
        let generation = state.generation();
        state.handle_message(
            Message::ImageLoaded {
                generation,
                index: 0,
                result: Ok(image(1)),
            },
            &i18n,
        );
        let _ = state.handle_message(Message::Export(ExportFormat::Png), &i18n);
        state.handle_message(Message::ExportDestinationChosen(None), &i18n);
        assert!(state.export_status().is_none());
    }

    #[test]
    fn user_actions_reach_diagnostics() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::default());
        let (state, _) = ready_viewer(3, 1);
        let mut state = state.with_diagnostics(collector.handle());
        let i18n = i18n();

        state.handle_message(Message::Navigation(navigation::Message::Next), &i18n);
        state.handle_message(Message::Navigation(navigation::Message::SliderChanged(0.0)), &i18n);
        collector.process_pending();

        let actions: Vec<UserAction> = collector
            .iter()
            .filter_map(|event| match &event.kind {
                DiagnosticEventKind::UserAction { action, .. } => Some(action.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            actions,
            vec![UserAction::NavigateNext, UserAction::JumpToImage { index: 0 }]
        );
    }

    #[test]
    fn settings_come_from_config() {
        let config = ViewerConfig {
            prefetch_radius: Some(9),
            prefetch_cache_mb: Some(1),
            wheel_debounce_ms: Some(60),
            export_format: Some(ExportFormat::Jpg),
        };
        let settings = Settings::from_config(&config);
        assert_eq!(settings.prefetch_radius.value(), 5);
        assert_eq!(settings.cache_budget.megabytes(), 8);
        assert_eq!(settings.debounce_window.millis(), 60);
        assert_eq!(settings.export_format, ExportFormat::Jpg);
    }

    #[test]
    fn view_builds_in_every_phase() {
        let i18n = i18n();
        let mut state = State::new(Some("/study"), StudyInfo::default(), Settings::default());
        let _ = state.view(&i18n);
        let _ = state.start(&i18n);
        let _ = state.view(&i18n);

        let (ready, _) = ready_viewer(3, 1);
        let _ = ready.view(&i18n);
    }

    #[test]
    fn pixel_wheel_deltas_are_normalized() {
        assert_eq!(scroll_steps(&mouse::ScrollDelta::Pixels { x: 0.0, y: -240.0 }), -2.0);
        assert_eq!(scroll_steps(&mouse::ScrollDelta::Lines { x: 0.0, y: 1.5 }), 1.5);
    }
}

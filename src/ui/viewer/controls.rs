// SPDX-License-Identifier: MPL-2.0
//! Viewer controls: navigation bar and presentation adjustments.

use super::subcomponents::{adjustment, navigation};
use crate::config::defaults::{MAX_FILTER_PERCENT, MAX_SCALE, MIN_FILTER_PERCENT, MIN_SCALE};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use iced::{
    alignment::Vertical,
    widget::{button, checkbox, slider, text, Column, Row, Space},
    Element, Length,
};

#[derive(Clone, Copy)]
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
}

/// `current / total` with a one-based current position.
#[must_use]
pub fn position_label(i18n: &I18n, state: &navigation::State) -> String {
    let current = (state.current_index() + 1).to_string();
    let total = state.len().to_string();
    i18n.tr_with_args(
        "viewer-position",
        &[("current", current.as_str()), ("total", total.as_str())],
    )
}

/// Previous/next buttons, position indicator and index slider.
pub fn navigation_bar<'a>(
    ctx: ViewContext<'a>,
    state: &navigation::State,
) -> Element<'a, navigation::Message> {
    let previous = button(text(ctx.i18n.tr("viewer-previous")).size(typography::BODY))
        .padding([spacing::XXS, spacing::SM])
        .on_press_maybe(state.has_previous().then_some(navigation::Message::Previous));
    let next = button(text(ctx.i18n.tr("viewer-next")).size(typography::BODY))
        .padding([spacing::XXS, spacing::SM])
        .on_press_maybe(state.has_next().then_some(navigation::Message::Next));

    let mut row = Row::new()
        .spacing(spacing::SM)
        .align_y(Vertical::Center)
        .push(previous)
        .push(text(position_label(ctx.i18n, state)).size(typography::CAPTION))
        .push(next);

    // A one-image sequence has nothing to scrub
    if state.len() > 1 {
        #[allow(clippy::cast_precision_loss)] // Sequence lengths are far below 2^24
        let last = (state.len() - 1) as f32;
        #[allow(clippy::cast_precision_loss)]
        let current = state.current_index() as f32;
        row = row.push(
            slider(0.0..=last, current, navigation::Message::SliderChanged)
                .step(1.0)
                .width(Length::Fill),
        );
    } else {
        row = row.push(Space::new().width(Length::Fill));
    }

    row.into()
}

/// Contrast, brightness and scale sliders plus invert and reset.
pub fn adjustment_panel<'a>(
    ctx: ViewContext<'a>,
    state: &adjustment::State,
) -> Element<'a, adjustment::Message> {
    let contrast = labeled_slider(
        ctx.i18n.tr("adjust-contrast"),
        format!("{:.0}%", state.contrast.value()),
        slider(
            MIN_FILTER_PERCENT..=MAX_FILTER_PERCENT,
            state.contrast.value(),
            adjustment::Message::SetContrast,
        )
        .step(1.0),
    );

    let brightness = labeled_slider(
        ctx.i18n.tr("adjust-brightness"),
        format!("{:.0}%", state.brightness.value()),
        slider(
            MIN_FILTER_PERCENT..=MAX_FILTER_PERCENT,
            state.brightness.value(),
            adjustment::Message::SetBrightness,
        )
        .step(1.0),
    );

    let scale = labeled_slider(
        ctx.i18n.tr("adjust-scale"),
        format!("{:.2}×", state.scale.value()),
        Row::new()
            .spacing(spacing::XXS)
            .align_y(Vertical::Center)
            .push(
                button(text("−").size(typography::BODY))
                    .on_press_maybe(scale_step_message(state, ScaleStep::Down)),
            )
            .push(
                slider(
                    MIN_SCALE..=MAX_SCALE,
                    state.scale.value(),
                    adjustment::Message::SetScale,
                )
                .step(0.05),
            )
            .push(
                button(text("+").size(typography::BODY))
                    .on_press_maybe(scale_step_message(state, ScaleStep::Up)),
            ),
    );

    let invert = checkbox(state.invert)
        .label(ctx.i18n.tr("adjust-invert"))
        .text_size(typography::BODY)
        .on_toggle(|_| adjustment::Message::ToggleInvert);

    let reset = button(text(ctx.i18n.tr("adjust-reset")).size(typography::BODY))
        .on_press_maybe((!state.is_default()).then_some(adjustment::Message::Reset));

    Row::new()
        .spacing(spacing::MD)
        .align_y(Vertical::Center)
        .push(contrast)
        .push(brightness)
        .push(scale)
        .push(invert)
        .push(reset)
        .into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleStep {
    Up,
    Down,
}

/// Message for the `+`/`−` scale buttons; `None` once the bound is reached.
#[must_use]
pub fn scale_step_message(
    state: &adjustment::State,
    step: ScaleStep,
) -> Option<adjustment::Message> {
    match step {
        ScaleStep::Up => (!state.scale.is_max()).then_some(adjustment::Message::ScaleUp),
        ScaleStep::Down => (!state.scale.is_min()).then_some(adjustment::Message::ScaleDown),
    }
}

fn labeled_slider<'a>(
    label: String,
    value: String,
    control: impl Into<Element<'a, adjustment::Message>>,
) -> Element<'a, adjustment::Message> {
    Column::new()
        .spacing(spacing::XXS)
        .width(Length::Fixed(sizing::CONTROL_COLUMN))
        .push(
            Row::new()
                .push(text(label).size(typography::BODY_SM))
                .push(Space::new().width(Length::Fill))
                .push(text(value).size(typography::BODY_SM)),
        )
        .push(control)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_is_one_based() {
        let i18n = I18n::default();
        let mut state = navigation::State::new(12);
        state.handle(navigation::Message::JumpTo(4));
        assert_eq!(position_label(&i18n, &state), "5 / 12");
    }

    #[test]
    fn scale_buttons_disable_at_bounds() {
        let mut state = adjustment::State::default();
        assert_eq!(
            scale_step_message(&state, ScaleStep::Up),
            Some(adjustment::Message::ScaleUp)
        );
        assert_eq!(
            scale_step_message(&state, ScaleStep::Down),
            Some(adjustment::Message::ScaleDown)
        );

        state.handle(adjustment::Message::SetScale(MAX_SCALE));
        assert_eq!(scale_step_message(&state, ScaleStep::Up), None);
        state.handle(adjustment::Message::SetScale(MIN_SCALE));
        assert_eq!(scale_step_message(&state, ScaleStep::Down), None);
    }

    #[test]
    fn views_build_for_edge_sequences() {
        let i18n = I18n::default();
        let ctx = ViewContext { i18n: &i18n };
        let _single = navigation_bar(ctx, &navigation::State::new(1));
        let _many = navigation_bar(ctx, &navigation::State::new(40));
        let _panel = adjustment_panel(ctx, &adjustment::State::default());
    }
}

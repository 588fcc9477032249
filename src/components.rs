use gpui::{Div, FontWeight, Stateful, div, prelude::*, px, rgb, rgba};

use crate::{form_field::FormField, theme::*};

pub fn title(text: &str) -> Div {
    div()
        .w_full()
        .flex()
        .justify_center()
        .text_size(px(TEXT_SIZE_TITLE))
        .italic()
        .text_color(rgba(TEXT_BRIGHT))
        .child(text.to_string())
}

pub fn caption(text: &str) -> Div {
    div()
        .w_full()
        .flex()
        .justify_center()
        .text_size(px(TEXT_SIZE_EXTRA_SMALL))
        .font_weight(FontWeight::MEDIUM)
        .text_color(rgb(TEXT_DIM))
        .child(text.to_uppercase())
}

pub fn body_text(text: &str) -> Div {
    div()
        .w_full()
        .px(px(GAP_MEDIUM))
        .text_size(px(TEXT_SIZE_MEDIUM))
        .line_height(px(LINE_HEIGHT_MEDIUM))
        .text_color(rgb(TEXT_MUTED))
        .child(text.to_string())
}

/// Modal card centred over a dimmed room.
pub fn overlay_panel() -> Div {
    div()
        .flex()
        .flex_col()
        .gap(px(GAP_LARGE))
        .w(px(PANEL_WIDTH))
        .p(px(PADDING_PANEL))
        .rounded(px(RADIUS_PANEL))
        .bg(rgba(PANEL_BACKGROUND))
        .border_1()
        .border_color(rgba(BORDER_FAINT))
}

pub fn scrim() -> Stateful<Div> {
    div()
        .id("overlay-scrim")
        .absolute()
        .inset_0()
        .flex()
        .items_center()
        .justify_center()
        .bg(rgba(SCRIM))
        .occlude()
}

pub fn button_filled(
    id: &'static str,
    text: &str,
    background: u32,
    hover_background: u32,
    large: bool,
) -> Stateful<Div> {
    div()
        .id(id)
        .flex()
        .items_center()
        .justify_center()
        .w_full()
        .h(px(if large {
            BUTTON_HEIGHT_LARGE
        } else {
            ELEMENT_HEIGHT
        }))
        .rounded(px(RADIUS_BUTTON))
        .bg(rgb(background))
        .cursor_pointer()
        .hover(move |style| style.bg(rgb(hover_background)))
        .text_color(rgb(TEXT_ON_AMBER))
        .text_size(px(if large {
            TEXT_SIZE_LARGE
        } else {
            TEXT_SIZE_MEDIUM
        }))
        .font_weight(FontWeight::SEMIBOLD)
        .child(text.to_string())
}

pub fn button_outline(id: &'static str, text: &str) -> Stateful<Div> {
    div()
        .id(id)
        .flex()
        .items_center()
        .justify_center()
        .gap(px(GAP_SMALL))
        .w_full()
        .h(px(ELEMENT_HEIGHT))
        .rounded(px(RADIUS_BUTTON))
        .bg(rgba(BUTTON_GHOST))
        .border_1()
        .border_color(rgba(BORDER_SOFT))
        .cursor_pointer()
        .hover(|style| style.bg(rgba(BUTTON_GHOST_HOVER)))
        .text_color(rgba(TEXT_SOFT))
        .text_size(px(TEXT_SIZE_MEDIUM))
        .child(text.to_string())
}

/// Quiet text-only action, spaced out in small caps.
pub fn button_text(id: &'static str, text: &str, color: u32, hover_color: u32) -> Stateful<Div> {
    div()
        .id(id)
        .flex()
        .justify_center()
        .w_full()
        .py(px(GAP_SMALL))
        .cursor_pointer()
        .text_size(px(TEXT_SIZE_EXTRA_SMALL))
        .text_color(rgb(color))
        .hover(move |style| style.text_color(rgb(hover_color)))
        .child(text.to_uppercase())
}

pub fn divider(text: &str) -> Div {
    let rule = || div().flex_1().h(px(1.0)).bg(rgba(BORDER_FAINT));
    div()
        .flex()
        .flex_row()
        .items_center()
        .gap(px(GAP_MEDIUM))
        .py(px(GAP_SMALL))
        .child(rule())
        .child(
            div()
                .text_size(px(TEXT_SIZE_EXTRA_SMALL))
                .font_weight(FontWeight::BOLD)
                .text_color(rgb(TEXT_FAINT))
                .child(text.to_uppercase()),
        )
        .child(rule())
}

pub fn field(field: &gpui::Entity<FormField>) -> Div {
    div().w_full().child(field.clone())
}

pub fn hint(text: &str) -> Div {
    div()
        .text_size(px(TEXT_SIZE_EXTRA_SMALL))
        .font_weight(FontWeight::MEDIUM)
        .text_color(rgb(TEXT_DIM))
        .child(text.to_uppercase())
}

pub fn identity_badge(username: &str) -> Div {
    div()
        .flex()
        .flex_col()
        .items_end()
        .gap(px(GAP_EXTRA_SMALL))
        .child(
            div()
                .text_size(px(TEXT_SIZE_EXTRA_SMALL))
                .text_color(rgb(TEXT_MUTED))
                .child("ILLUMINATED BY"),
        )
        .child(
            div()
                .text_size(px(TEXT_SIZE_MEDIUM))
                .italic()
                .text_color(rgba(TEXT_SOFT))
                .child(username.to_string()),
        )
}

/// Round exit glyph with its label, "Return to anonymity".
pub fn logout_button() -> Stateful<Div> {
    div()
        .id("logout")
        .flex()
        .flex_row()
        .items_center()
        .gap(px(GAP_SMALL))
        .h(px(LOGOUT_SIZE))
        .pl(px(GAP_MEDIUM))
        .pr(px(GAP_SMALL))
        .rounded(px(LOGOUT_SIZE / 2.0))
        .border_1()
        .border_color(rgba(BORDER_FAINT))
        .cursor_pointer()
        .text_color(rgb(TEXT_MUTED))
        .hover(|style| {
            style
                .bg(rgba(BUTTON_GHOST))
                .border_color(rgba(BORDER_SOFT))
                .text_color(rgb(BUTTON_LIGHT))
        })
        .child(
            div()
                .text_size(px(TEXT_SIZE_TINY))
                .child("RETURN TO ANONYMITY"),
        )
        .child(div().text_size(px(TEXT_SIZE_LARGE)).child("⇥"))
}

pub fn footer() -> Div {
    div()
        .flex()
        .flex_col()
        .items_center()
        .gap(px(GAP_SMALL))
        .opacity(0.4)
        .child(div().w(px(GAP_LARGE)).h(px(1.0)).bg(rgb(WIRE)))
        .child(
            div()
                .text_size(px(TEXT_SIZE_EXTRA_SMALL))
                .text_color(rgb(TEXT_MUTED))
                .child("LIGHT IT UP"),
        )
        .child(
            div()
                .text_size(px(TEXT_SIZE_TINY))
                .text_color(rgb(TEXT_FAINT))
                .child("AN INTERACTIVE DIGITAL INSTALLATION"),
        )
}

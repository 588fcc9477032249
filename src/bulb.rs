use std::{f32::consts::TAU, rc::Rc, time::Duration};

use gpui::{
    Animation, AnimationExt, App, Div, MouseButton, MouseUpEvent, Window, div, ease_in_out,
    prelude::*, px, rgb, rgba,
};

use crate::theme::*;

const WIDGET_WIDTH: f32 = 240.0;

/// Opacity floor and ceiling for the slow idle pulses.
pub const BREATH_RANGE: (f32, f32) = (0.75, 1.0);
pub const SHIMMER_RANGE: (f32, f32) = (0.5, 1.0);

/// Maps a looping animation's progress onto a smooth swell between `range`
/// bounds: dimmest at both ends of the cycle, brightest halfway.
pub fn breath_opacity(range: (f32, f32), delta: f32) -> f32 {
    let (low, high) = range;
    low + (high - low) * (0.5 - 0.5 * (TAU * delta).cos())
}

fn pulsing(period_millis: u64) -> Animation {
    Animation::new(Duration::from_millis(period_millis)).repeat()
}

/// Colours and offsets for one frame of the bulb, derived from the two flags
/// the widget is given.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulbStyle {
    pub glass: u32,
    pub glass_edge: u32,
    pub filament: u32,
    pub glow: bool,
    pub rope: u32,
    pub rope_width: f32,
    pub rope_offset: f32,
    pub handle: u32,
    pub handle_edge: u32,
    pub handle_glow: bool,
}

impl BulbStyle {
    pub fn new(is_on: bool, is_pulling: bool) -> Self {
        let (glass, glass_edge, filament) = if is_on {
            (GLASS_LIT, GLASS_EDGE_LIT, FILAMENT_LIT)
        } else {
            (GLASS_DARK, GLASS_EDGE_DARK, FILAMENT_DARK)
        };
        let (rope, rope_width, rope_offset, handle, handle_edge) = if is_pulling {
            (
                ROPE_PULLED,
                ROPE_WIDTH * 1.5,
                ROPE_PULL_DISTANCE,
                HANDLE_PULLED,
                HANDLE_EDGE_PULLED,
            )
        } else {
            (ROPE, ROPE_WIDTH, 0.0, HANDLE, HANDLE_EDGE)
        };

        Self {
            glass,
            glass_edge,
            filament,
            glow: is_on,
            rope,
            rope_width,
            rope_offset,
            handle,
            handle_edge,
            handle_glow: is_pulling,
        }
    }
}

fn halo(size: f32, color: u32) -> Div {
    let offset = (GLASS_SIZE - size) / 2.0;
    div()
        .absolute()
        .top(px(offset))
        .left(px(offset))
        .size(px(size))
        .rounded(px(size / 2.0))
        .bg(rgba(color))
}

fn glass(style: BulbStyle) -> Div {
    div()
        .relative()
        .flex()
        .flex_col()
        .items_center()
        .justify_center()
        .size(px(GLASS_SIZE))
        .rounded(px(GLASS_SIZE / 2.0))
        .bg(rgba(style.glass))
        .border_2()
        .border_color(rgb(style.glass_edge))
        .child(
            div()
                .w(px(FILAMENT_WIDTH))
                .h(px(FILAMENT_HEIGHT))
                .border_t_2()
                .border_l_2()
                .border_r_2()
                .border_color(rgb(style.filament))
                .rounded_t_full(),
        )
        .child(
            div()
                .flex()
                .flex_row()
                .justify_between()
                .w(px(FILAMENT_WIDTH * 0.7))
                .h(px(FILAMENT_HEIGHT))
                .child(div().w(px(1.5)).h_full().bg(rgb(style.filament)))
                .child(div().w(px(1.5)).h_full().bg(rgb(style.filament))),
        )
}

fn rope(style: BulbStyle) -> Div {
    let grip = || {
        div()
            .w_full()
            .h(px(GRIP_HEIGHT))
            .mt(px(GRIP_HEIGHT))
            .bg(rgba(if style.handle_glow { GRIP_PULLED } else { GRIP }))
    };

    div()
        .absolute()
        .top(px(style.rope_offset))
        .left(px(WIDGET_WIDTH / 2.0 + ROPE_OFFSET))
        .flex()
        .flex_col()
        .items_center()
        .cursor_pointer()
        .child(div().w(px(style.rope_width)).h(px(ROPE_HEIGHT)).bg(rgb(style.rope)))
        .child(
            div()
                .flex()
                .flex_col()
                .items_center()
                .w(px(HANDLE_WIDTH))
                .h(px(HANDLE_HEIGHT))
                .rounded_t_sm()
                .rounded_b_full()
                .bg(rgb(style.handle))
                .border_b_2()
                .border_color(rgb(style.handle_edge))
                .when(!style.handle_glow, |element| {
                    element.hover(|hover| hover.bg(rgb(HANDLE_HOVER)))
                })
                .child(grip())
                .child(grip())
                .child(grip()),
        )
        .when(style.handle_glow, |element| {
            element.child(
                div()
                    .w(px(HANDLE_WIDTH * 1.6))
                    .h(px(GRIP_HEIGHT * 3.0))
                    .rounded(px(HANDLE_WIDTH))
                    .bg(rgba(HANDLE_GLOW)),
            )
        })
}

/// The hanging bulb and its cord. Clicking either one calls `on_pull`; the
/// widget itself keeps no state and does not debounce.
pub fn light_bulb(
    is_on: bool,
    is_pulling: bool,
    on_pull: impl Fn(&MouseUpEvent, &mut Window, &mut App) + 'static,
) -> Div {
    let style = BulbStyle::new(is_on, is_pulling);
    let on_pull = Rc::new(on_pull);
    let bulb_pull = on_pull.clone();

    let halos = div()
        .absolute()
        .top_0()
        .left_0()
        .size(px(GLASS_SIZE))
        .child(halo(HALO_FAR_SIZE, HALO_FAR).with_animation(
            "halo-shimmer",
            pulsing(SHIMMER_MILLIS),
            |element, delta| element.opacity(breath_opacity(SHIMMER_RANGE, delta)),
        ))
        .child(halo(HALO_OUTER_SIZE, HALO_OUTER))
        .child(halo(HALO_INNER_SIZE, HALO_INNER).with_animation(
            "halo-breath",
            pulsing(BREATH_MILLIS),
            |element, delta| element.opacity(breath_opacity(BREATH_RANGE, delta)),
        ))
        .child(halo(GLASS_SIZE * 0.8, HALO_INNER));

    div()
        .relative()
        .flex()
        .flex_col()
        .items_center()
        .w(px(WIDGET_WIDTH))
        .child(div().w(px(WIRE_WIDTH)).h(px(WIRE_HEIGHT)).bg(rgb(WIRE)))
        .child(
            div()
                .w(px(SOCKET_WIDTH))
                .h(px(SOCKET_HEIGHT))
                .rounded_t_lg()
                .bg(rgb(SOCKET)),
        )
        .child(
            div()
                .relative()
                .size(px(GLASS_SIZE))
                .cursor_pointer()
                .when(style.glow, |element| {
                    element.child(halos.with_animation(
                        "bulb-glow",
                        Animation::new(Duration::from_millis(GLOW_FADE_MILLIS))
                            .with_easing(ease_in_out),
                        |element, delta| element.opacity(delta),
                    ))
                })
                .child(glass(style))
                .on_mouse_up(MouseButton::Left, move |event, window, context| {
                    bulb_pull(event, window, context)
                }),
        )
        .child(
            rope(style).on_mouse_up(MouseButton::Left, move |event, window, context| {
                on_pull(event, window, context)
            }),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glow_follows_the_on_flag_only() {
        let lit = BulbStyle::new(true, false);
        let dark = BulbStyle::new(false, false);
        assert!(lit.glow);
        assert!(!dark.glow);
        assert_eq!(lit.glass_edge, GLASS_EDGE_LIT);
        assert_eq!(dark.filament, FILAMENT_DARK);
        assert_eq!(lit.rope_offset, dark.rope_offset);
    }

    #[test]
    fn breath_swells_and_returns_within_its_range() {
        let (low, high) = BREATH_RANGE;
        assert!((breath_opacity(BREATH_RANGE, 0.0) - low).abs() < 1e-6);
        assert!((breath_opacity(BREATH_RANGE, 0.5) - high).abs() < 1e-6);
        assert!((breath_opacity(BREATH_RANGE, 1.0) - low).abs() < 1e-5);
        for step in 0..=100 {
            let opacity = breath_opacity(SHIMMER_RANGE, step as f32 / 100.0);
            assert!((SHIMMER_RANGE.0 - 1e-6..=SHIMMER_RANGE.1 + 1e-6).contains(&opacity));
        }
    }

    #[test]
    fn pulling_drops_and_recolours_the_rope() {
        let resting = BulbStyle::new(false, false);
        let pulled = BulbStyle::new(false, true);
        assert_eq!(resting.rope_offset, 0.0);
        assert_eq!(pulled.rope_offset, ROPE_PULL_DISTANCE);
        assert_eq!(pulled.rope, ROPE_PULLED);
        assert!(pulled.rope_width > resting.rope_width);
        assert!(pulled.handle_glow);
        assert_eq!(pulled.glass, resting.glass);
    }
}

use std::time::{Duration, Instant};

use gpui::{
    Animation, AnimationExt, App, AsyncApp, Context, Entity, FocusHandle, Focusable, KeyDownEvent,
    MouseButton, MouseUpEvent, Subscription, Task, WeakEntity, Window, actions, div, ease_in_out,
    prelude::*, px, rgb, rgba,
};

use crate::{
    bulb::{breath_opacity, light_bulb},
    components::*,
    controller::{Controller, Cue},
    light_state::LightState,
    overlay::{InteractionOverlay, OverlayEvent},
    sound::SoundGenerator,
    storage::FileStore,
    theme::*,
};

actions!(light_it_up, [Quit]);

const HINT_TEXT: &str = "Pull the cord to begin";
const HINT_PULSE_RANGE: (f32, f32) = (0.4, 1.0);

/// Keyboard focus belongs to the room whenever no overlay form is showing.
fn room_takes_focus(state: LightState) -> bool {
    !state.shows_overlay()
}

pub struct LightApp {
    controller: Controller<FileStore>,
    sound: SoundGenerator,
    overlay: Entity<InteractionOverlay>,
    focus_handle: FocusHandle,
    timer: Option<Task<()>>,
    _overlay_subscription: Subscription,
}

impl LightApp {
    pub fn new(
        controller: Controller<FileStore>,
        window: &mut Window,
        context: &mut Context<Self>,
    ) -> Self {
        let state = controller.state();
        let overlay = context.new(|context| InteractionOverlay::new(state, context));
        let overlay_subscription =
            context.subscribe_in(&overlay, window, Self::handle_overlay_event);

        let mut app = Self {
            controller,
            sound: SoundGenerator::new(),
            overlay,
            focus_handle: context.focus_handle(),
            timer: None,
            _overlay_subscription: overlay_subscription,
        };
        app.apply(Vec::new(), context);
        app
    }

    /// Plays what the controller asked for and brings every dependent piece
    /// (hum, overlay, pending timer) in line with the new state.
    fn apply(&mut self, cues: Vec<Cue>, context: &mut Context<Self>) {
        for cue in cues {
            self.sound.play(cue);
        }

        let state = self.controller.state();
        self.sound.set_hum(state.is_lit());
        self.overlay
            .update(context, |overlay, context| overlay.set_state(state, context));

        self.schedule_next_deadline(context);
        context.notify();
    }

    /// Replacing the task drops the previous one, which cancels its timer.
    fn schedule_next_deadline(&mut self, context: &mut Context<Self>) {
        let Some(deadline) = self.controller.next_deadline() else {
            self.timer = None;
            return;
        };
        let delay = deadline.saturating_duration_since(Instant::now());

        self.timer = Some(context.spawn(
            async move |this: WeakEntity<Self>, context: &mut AsyncApp| {
                context.background_executor().timer(delay).await;
                if let Err(error) = this.update(context, |this, context| this.tick(context)) {
                    log::debug!("[controller] timer fired after the view closed: {error}");
                }
            },
        ));
    }

    fn tick(&mut self, context: &mut Context<Self>) {
        let cues = self.controller.advance(Instant::now());
        self.apply(cues, context);
    }

    fn pull(&mut self, context: &mut Context<Self>) {
        let cues = self.controller.pull(Instant::now());
        self.apply(cues, context);
    }

    fn logout(&mut self, context: &mut Context<Self>) {
        self.controller.logout();
        self.apply(Vec::new(), context);
    }

    fn handle_overlay_event(
        &mut self,
        _: &Entity<InteractionOverlay>,
        event: &OverlayEvent,
        window: &mut Window,
        context: &mut Context<Self>,
    ) {
        let cues = match event {
            OverlayEvent::KeepGlowing => self.controller.decide(true),
            OverlayEvent::Decline => self.controller.decline(),
            OverlayEvent::SignIn { username } => {
                if !self.controller.sign_in(username) {
                    log::debug!("[overlay] sign-in not accepted");
                }
                Vec::new()
            }
        };
        self.apply(cues, context);

        // The form may have held focus; once it is gone the room takes it
        // back so the space bar keeps working.
        if room_takes_focus(self.controller.state()) {
            window.focus(&self.focus_handle, context);
        }
    }

    /// Space pulls the cord, but only while keyboard focus is on the room
    /// itself so typing a space into a form field never reaches the bulb.
    fn key_down(&mut self, event: &KeyDownEvent, window: &mut Window, context: &mut Context<Self>) {
        let keystroke = &event.keystroke;
        if keystroke.key != "space" || keystroke.modifiers.modified() || event.is_held {
            return;
        }
        if !self.focus_handle.is_focused(window) {
            return;
        }
        self.pull(context);
        context.stop_propagation();
    }

    fn shutdown(&mut self) {
        self.controller.teardown();
        self.timer = None;
        self.sound.set_hum(false);
    }

    fn quit(&mut self, _: &Quit, _window: &mut Window, context: &mut Context<Self>) {
        log::info!("[quit] shutting down");
        self.shutdown();
        context.quit();
    }

    fn render_identity(&self, context: &mut Context<Self>) -> impl IntoElement {
        let username = self
            .controller
            .user()
            .filter(|user| user.is_logged_in)
            .map(|user| user.username.clone());

        div()
            .absolute()
            .top(px(PADDING_CORNER))
            .right(px(PADDING_CORNER))
            .when_some(username, |element, username| {
                element
                    .flex()
                    .flex_row()
                    .items_center()
                    .gap(px(GAP_MEDIUM))
                    .child(identity_badge(&username))
                    .child(logout_button().on_mouse_up(
                        MouseButton::Left,
                        context.listener(|this, _, _, context| this.logout(context)),
                    ))
            })
    }
}

impl Drop for LightApp {
    fn drop(&mut self) {
        log::info!("[drop] LightApp shutting down");
        self.shutdown();
    }
}

impl Focusable for LightApp {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for LightApp {
    fn render(&mut self, _window: &mut Window, context: &mut Context<Self>) -> impl IntoElement {
        let state = self.controller.state();
        let lit = state.is_lit();
        let pulling = self.controller.is_rope_pulling();
        let show_hint = self.controller.show_hint() && !lit && !pulling;

        let on_pull = context.listener(|this, _: &MouseUpEvent, window, context| {
            window.focus(&this.focus_handle, context);
            this.pull(context);
        });

        div()
            .key_context("LightApp")
            .track_focus(&self.focus_handle(context))
            .on_action(context.listener(Self::quit))
            .on_key_down(context.listener(Self::key_down))
            .relative()
            .flex()
            .flex_col()
            .items_center()
            .size_full()
            .overflow_hidden()
            .bg(rgb(if lit { ROOM_LIT } else { ROOM_DARK }))
            .when(lit, |element| {
                element.child(
                    div()
                        .absolute()
                        .inset_0()
                        .bg(rgba(AMBIENCE))
                        .with_animation(
                            "room-ambience",
                            Animation::new(Duration::from_millis(GLOW_FADE_MILLIS))
                                .with_easing(ease_in_out),
                            |element, delta| element.opacity(delta),
                        ),
                )
            })
            .child(light_bulb(lit, pulling, on_pull))
            .when(show_hint, |element| {
                element.child(
                    div()
                        .absolute()
                        .bottom(px(WINDOW_HEIGHT / 4.0))
                        .w_full()
                        .flex()
                        .justify_center()
                        .child(hint(HINT_TEXT).with_animation(
                            "hint-pulse",
                            Animation::new(Duration::from_millis(HINT_PULSE_MILLIS)).repeat(),
                            |element, delta| {
                                element.opacity(breath_opacity(HINT_PULSE_RANGE, delta))
                            },
                        )),
                )
            })
            .child(
                div()
                    .absolute()
                    .bottom(px(PADDING_CORNER))
                    .w_full()
                    .flex()
                    .justify_center()
                    .child(footer()),
            )
            .child(self.render_identity(context))
            .child(self.overlay.clone())
    }
}

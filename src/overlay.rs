use gpui::{
    AnyElement, Context, Entity, EventEmitter, MouseButton, Window, actions, div, prelude::*, px,
    rgb, rgba,
};

use crate::{
    components::*,
    form_field::{FieldKind, FormField},
    light_state::LightState,
    theme::*,
};

actions!(overlay, [SubmitEmail, SwitchField]);

/// Identity handed out by the provider button. Nothing is contacted.
pub const PROVIDER_USERNAME: &str = "Google User";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayEvent {
    KeepGlowing,
    Decline,
    SignIn { username: String },
}

/// Everything before the first `@`. An address that starts with `@` keeps the
/// whole string so the username is never empty.
pub fn username_from_email(email: &str) -> String {
    match email.split('@').next() {
        Some(local) if !local.is_empty() => local.to_string(),
        _ => email.to_string(),
    }
}

/// The form only checks that both fields have something in them.
pub fn accept_email_form(email: &str, password: &str) -> Option<String> {
    if email.is_empty() || password.is_empty() {
        return None;
    }
    Some(username_from_email(email))
}

pub struct InteractionOverlay {
    state: LightState,
    email_input: Entity<FormField>,
    password_input: Entity<FormField>,
    email_view: bool,
}

impl EventEmitter<OverlayEvent> for InteractionOverlay {}

impl InteractionOverlay {
    pub fn new(state: LightState, context: &mut Context<Self>) -> Self {
        Self {
            state,
            email_input: FormField::new(context, FieldKind::Email),
            password_input: FormField::new(context, FieldKind::Password),
            email_view: false,
        }
    }

    pub fn set_state(&mut self, state: LightState, context: &mut Context<Self>) {
        if self.state != state {
            self.state = state;
            context.notify();
        }
    }

    fn show_email_form(&mut self, window: &mut Window, context: &mut Context<Self>) {
        self.email_view = true;
        let handle = self.email_input.read(context).focus_handle.clone();
        window.focus(&handle, context);
        context.notify();
    }

    fn show_options(&mut self, context: &mut Context<Self>) {
        self.email_view = false;
        context.notify();
    }

    fn submit_email(&mut self, _: &SubmitEmail, _window: &mut Window, context: &mut Context<Self>) {
        if self.state != LightState::SigningIn || !self.email_view {
            return;
        }
        let email = self.email_input.read(context).text().to_string();
        let password = self.password_input.read(context).text().to_string();
        match accept_email_form(&email, &password) {
            Some(username) => context.emit(OverlayEvent::SignIn { username }),
            None => log::debug!("[overlay] email form incomplete, ignoring submit"),
        }
    }

    fn switch_field(&mut self, _: &SwitchField, window: &mut Window, context: &mut Context<Self>) {
        let email = self.email_input.read(context).focus_handle.clone();
        let password = self.password_input.read(context).focus_handle.clone();
        let next = if email.is_focused(window) {
            password
        } else {
            email
        };
        window.focus(&next, context);
    }

    fn render_deciding(&self, context: &mut Context<Self>) -> AnyElement {
        div()
            .flex()
            .flex_col()
            .items_center()
            .gap(px(GAP_LARGE))
            .child(
                div()
                    .flex()
                    .items_center()
                    .justify_center()
                    .size(px(ICON_BADGE_SIZE))
                    .rounded(px(ICON_BADGE_SIZE / 2.0))
                    .bg(rgba(BADGE_BACKGROUND))
                    .border_1()
                    .border_color(rgba(BADGE_BORDER))
                    .text_size(px(TEXT_SIZE_TITLE))
                    .text_color(rgb(BUTTON_AMBER))
                    .child("☀"),
            )
            .child(
                div()
                    .flex()
                    .flex_col()
                    .gap(px(GAP_SMALL))
                    .child(title("Preserve the Radiance?"))
                    .child(body_text(
                        "Shall we remember this glow for your next visit, \
                         or let the darkness return when you leave?",
                    )),
            )
            .child(
                div()
                    .flex()
                    .flex_col()
                    .w_full()
                    .gap(px(GAP_MEDIUM))
                    .child(
                        button_filled(
                            "keep-glowing",
                            "Stay Illuminated",
                            BUTTON_AMBER,
                            BUTTON_AMBER_HOVER,
                            true,
                        )
                        .on_mouse_up(
                            MouseButton::Left,
                            context.listener(|_, _, _, context| {
                                context.emit(OverlayEvent::KeepGlowing)
                            }),
                        ),
                    )
                    .child(
                        button_text("return-to-shadow", "Return to Shadow", TEXT_DIM, TEXT_HOVER)
                            .on_mouse_up(
                                MouseButton::Left,
                                context.listener(|_, _, _, context| {
                                    context.emit(OverlayEvent::Decline)
                                }),
                            ),
                    ),
            )
            .into_any_element()
    }

    fn render_email_form(&self, context: &mut Context<Self>) -> AnyElement {
        div()
            .key_context("EmailForm")
            .on_action(context.listener(Self::submit_email))
            .on_action(context.listener(Self::switch_field))
            .flex()
            .flex_col()
            .gap(px(GAP_MEDIUM))
            .child(
                div()
                    .flex()
                    .flex_col()
                    .gap(px(GAP_SMALL + GAP_EXTRA_SMALL))
                    .child(field(&self.email_input))
                    .child(field(&self.password_input)),
            )
            .child(
                button_filled(
                    "authenticate",
                    "Authenticate",
                    BUTTON_LIGHT,
                    BUTTON_LIGHT_HOVER,
                    false,
                )
                .on_mouse_up(
                    MouseButton::Left,
                    context.listener(|this, _, window, context| {
                        this.submit_email(&SubmitEmail, window, context)
                    }),
                ),
            )
            .child(
                button_text("return-to-options", "Return to Options", TEXT_DIM, TEXT_HOVER)
                    .on_mouse_up(
                        MouseButton::Left,
                        context.listener(|this, _, _, context| this.show_options(context)),
                    ),
            )
            .into_any_element()
    }

    fn render_signing_in(&self, context: &mut Context<Self>) -> AnyElement {
        let choice = if self.email_view {
            self.render_email_form(context)
        } else {
            button_outline("continue-via-email", "Continue via Email")
                .text_color(rgb(TEXT_MUTED))
                .on_mouse_up(
                    MouseButton::Left,
                    context.listener(|this, _, window, context| {
                        this.show_email_form(window, context)
                    }),
                )
                .into_any_element()
        };

        div()
            .flex()
            .flex_col()
            .gap(px(GAP_LARGE))
            .child(
                div()
                    .flex()
                    .flex_col()
                    .gap(px(GAP_SMALL))
                    .child(title("Welcome Back"))
                    .child(caption("Identity for persistence")),
            )
            .child(
                div()
                    .flex()
                    .flex_col()
                    .gap(px(GAP_MEDIUM))
                    .child(
                        button_outline("provider-sign-in", "G   Enter with Google").on_mouse_up(
                            MouseButton::Left,
                            context.listener(|_, _, _, context| {
                                context.emit(OverlayEvent::SignIn {
                                    username: PROVIDER_USERNAME.to_string(),
                                })
                            }),
                        ),
                    )
                    .child(divider("or"))
                    .child(choice),
            )
            .child(
                div()
                    .id("prefer-darkness")
                    .flex()
                    .justify_center()
                    .pt(px(GAP_MEDIUM))
                    .cursor_pointer()
                    .text_size(px(TEXT_SIZE_SMALL))
                    .text_color(rgb(TEXT_FAINT))
                    .hover(|style| style.text_color(rgb(TEXT_MUTED)))
                    .underline()
                    .child("I prefer the darkness")
                    .on_mouse_up(
                        MouseButton::Left,
                        context.listener(|_, _, _, context| context.emit(OverlayEvent::Decline)),
                    ),
            )
            .into_any_element()
    }
}

impl Render for InteractionOverlay {
    fn render(&mut self, _window: &mut Window, context: &mut Context<Self>) -> impl IntoElement {
        let content = match self.state {
            LightState::Deciding => self.render_deciding(context),
            LightState::SigningIn => self.render_signing_in(context),
            LightState::Off | LightState::On => return div().into_any_element(),
        };

        scrim()
            .child(overlay_panel().child(content))
            .into_any_element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_the_local_part() {
        assert_eq!(username_from_email("ada@example.com"), "ada");
        assert_eq!(username_from_email("a@b@c"), "a");
        assert_eq!(username_from_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn leading_at_keeps_the_whole_address() {
        assert_eq!(username_from_email("@example.com"), "@example.com");
    }

    #[test]
    fn form_needs_both_fields() {
        assert_eq!(accept_email_form("", "x"), None);
        assert_eq!(accept_email_form("ada@example.com", ""), None);
        assert_eq!(
            accept_email_form("ada@example.com", "x"),
            Some("ada".to_string())
        );
        assert_eq!(
            accept_email_form("not an email", "x"),
            Some("not an email".to_string())
        );
    }

    #[test]
    fn overlay_only_for_decision_states() {
        assert!(!LightState::Off.shows_overlay());
        assert!(!LightState::On.shows_overlay());
        assert!(LightState::Deciding.shows_overlay());
        assert!(LightState::SigningIn.shows_overlay());
    }
}

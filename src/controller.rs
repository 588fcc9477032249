//! The pull-cord state machine.
//!
//! Everything here is toolkit-agnostic: callers feed in the current time and
//! get back the sound cues to play. The view owns a real timer that calls
//! [`Controller::advance`] at [`Controller::next_deadline`].

use std::time::{Duration, Instant};

use crate::{
    light_state::{LightState, PersistedLight, User},
    schedule::{Schedule, Timer},
    storage::{KeyValueStore, Persistence},
};

pub const PULL_SETTLE: Duration = Duration::from_millis(150);
pub const IDLE_HINT_DELAY: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Pull,
    Click { turning_on: bool },
}

pub struct Controller<S> {
    state: LightState,
    user: Option<User>,
    has_interacted: bool,
    show_hint: bool,
    is_rope_pulling: bool,
    pending_pull: Option<LightState>,
    schedule: Schedule,
    persistence: Persistence<S>,
}

impl<S: KeyValueStore> Controller<S> {
    /// Restores the saved user and light, then arms the idle hint unless the
    /// restored session already counts as interacted.
    pub fn start(persistence: Persistence<S>, now: Instant) -> Self {
        let mut controller = Self {
            state: LightState::Off,
            user: None,
            has_interacted: false,
            show_hint: false,
            is_rope_pulling: false,
            pending_pull: None,
            schedule: Schedule::default(),
            persistence,
        };

        if let Some(user) = controller.persistence.load_user() {
            log::info!("[controller] restored user {}", user.username);
            controller.user = Some(user);
            if controller.persistence.load_light() == Some(PersistedLight::On) {
                controller.state = LightState::On;
                controller.has_interacted = true;
                log::info!("[controller] restored light on");
            }
        }

        if !controller.has_interacted {
            controller
                .schedule
                .arm(Timer::IdleHint, now + IDLE_HINT_DELAY);
        }
        controller
    }

    pub fn state(&self) -> LightState {
        self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_logged_in)
    }

    pub fn has_interacted(&self) -> bool {
        self.has_interacted
    }

    pub fn show_hint(&self) -> bool {
        self.show_hint
    }

    pub fn is_rope_pulling(&self) -> bool {
        self.is_rope_pulling
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.schedule.next_deadline()
    }

    /// Starts a pull. A pull that arrives while another is still settling is
    /// dropped and returns no cues.
    pub fn pull(&mut self, now: Instant) -> Vec<Cue> {
        if self.pending_pull.is_some() {
            log::debug!("[controller] pull ignored, previous pull still settling");
            return Vec::new();
        }

        self.has_interacted = true;
        self.show_hint = false;
        self.schedule.cancel(Timer::IdleHint);

        self.is_rope_pulling = true;
        self.pending_pull = Some(self.state);
        self.schedule.arm(Timer::PullSettle, now + PULL_SETTLE);
        vec![Cue::Pull]
    }

    /// Fires every timer due at `now`.
    pub fn advance(&mut self, now: Instant) -> Vec<Cue> {
        let mut cues = Vec::new();
        for timer in self.schedule.take_due(now) {
            match timer {
                Timer::PullSettle => cues.extend(self.settle_pull()),
                Timer::IdleHint => {
                    if !self.has_interacted {
                        log::debug!("[controller] idle, showing hint");
                        self.show_hint = true;
                    }
                }
            }
        }
        cues
    }

    fn settle_pull(&mut self) -> Option<Cue> {
        self.is_rope_pulling = false;
        let from = self.pending_pull.take()?;

        let cue = if from.is_lit() {
            self.transition(LightState::Off);
            if self.is_logged_in() {
                self.persistence.save_light(PersistedLight::Off);
            }
            Cue::Click { turning_on: false }
        } else if self.is_logged_in() {
            self.transition(LightState::On);
            self.persistence.save_light(PersistedLight::On);
            Cue::Click { turning_on: true }
        } else {
            self.transition(LightState::Deciding);
            Cue::Click { turning_on: true }
        };
        Some(cue)
    }

    /// "Stay illuminated" or "return to shadow" from the deciding prompt.
    pub fn decide(&mut self, keep_glowing: bool) -> Vec<Cue> {
        if self.state != LightState::Deciding {
            log::warn!(
                "[controller] decision outside deciding state ({})",
                self.state.label()
            );
            return Vec::new();
        }
        if keep_glowing {
            self.abandon_pull();
            self.transition(LightState::SigningIn);
            Vec::new()
        } else {
            self.decline()
        }
    }

    /// Backs out of either overlay into darkness.
    pub fn decline(&mut self) -> Vec<Cue> {
        if !self.state.shows_overlay() {
            return Vec::new();
        }
        self.abandon_pull();
        self.transition(LightState::Off);
        vec![Cue::Click { turning_on: false }]
    }

    /// Returns `false` when the sign-in is not accepted.
    pub fn sign_in(&mut self, username: &str) -> bool {
        if self.state != LightState::SigningIn {
            log::warn!(
                "[controller] sign-in outside signing-in state ({})",
                self.state.label()
            );
            return false;
        }
        if username.is_empty() {
            log::warn!("[controller] sign-in without a username");
            return false;
        }

        let user = User::signed_in(username);
        log::info!("[controller] signed in as {}", user.username);
        self.persistence.save_user(&user);
        self.persistence.save_light(PersistedLight::On);
        self.user = Some(user);
        self.abandon_pull();
        self.transition(LightState::On);
        true
    }

    pub fn logout(&mut self) {
        let Some(user) = self.user.take() else {
            log::debug!("[controller] logout without a user");
            return;
        };
        log::info!("[controller] {} logged out", user.username);
        self.abandon_pull();
        self.persistence.clear();
        self.transition(LightState::Off);
    }

    /// Drops a pull that is still settling. Explicit choices made inside the
    /// window win over the pull that preceded them.
    fn abandon_pull(&mut self) {
        if self.pending_pull.take().is_some() {
            log::debug!("[controller] dropping in-flight pull");
        }
        self.schedule.cancel(Timer::PullSettle);
        self.is_rope_pulling = false;
    }

    /// Cancels every pending timer. Called when the view goes away.
    pub fn teardown(&mut self) {
        self.schedule.cancel_all();
        self.pending_pull = None;
        self.is_rope_pulling = false;
    }

    fn transition(&mut self, next: LightState) {
        if self.state != next {
            log::info!(
                "[controller] {} -> {}",
                self.state.label(),
                next.label()
            );
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        overlay::PROVIDER_USERNAME,
        storage::{LIGHT_KEY, USER_KEY, memory::MemoryStore},
    };

    const ADA: &str = r#"{"username":"ada","isLoggedIn":true}"#;

    fn fresh(now: Instant) -> Controller<MemoryStore> {
        Controller::start(Persistence::new(MemoryStore::default()), now)
    }

    fn restored(entries: &[(&str, &str)], now: Instant) -> Controller<MemoryStore> {
        Controller::start(Persistence::new(MemoryStore::with(entries)), now)
    }

    fn store(controller: &Controller<MemoryStore>) -> &MemoryStore {
        controller.persistence.store()
    }

    fn settled_pull(controller: &mut Controller<MemoryStore>, at: Instant) -> Vec<Cue> {
        let mut cues = controller.pull(at);
        cues.extend(controller.advance(at + PULL_SETTLE));
        cues
    }

    #[test]
    fn anonymous_pull_walks_through_to_sign_in() {
        let start = Instant::now();
        let mut controller = fresh(start);

        assert_eq!(controller.pull(start), vec![Cue::Pull]);
        assert!(controller.is_rope_pulling());
        assert_eq!(controller.state(), LightState::Off);

        assert!(
            controller
                .advance(start + Duration::from_millis(149))
                .is_empty()
        );
        assert_eq!(
            controller.advance(start + PULL_SETTLE),
            vec![Cue::Click { turning_on: true }]
        );
        assert_eq!(controller.state(), LightState::Deciding);
        assert!(!controller.is_rope_pulling());
        assert_eq!(store(&controller).writes, 0);

        assert!(controller.decide(true).is_empty());
        assert_eq!(controller.state(), LightState::SigningIn);

        assert!(controller.sign_in("ada"));
        assert_eq!(controller.state(), LightState::On);
        assert_eq!(controller.user(), Some(&User::signed_in("ada")));
        assert_eq!(
            store(&controller).entries.get(LIGHT_KEY).map(String::as_str),
            Some("on")
        );
        assert_eq!(
            store(&controller).entries.get(USER_KEY).map(String::as_str),
            Some(ADA)
        );
    }

    #[test]
    fn logged_in_pull_off_keeps_user_record() {
        let start = Instant::now();
        let mut controller = restored(&[(USER_KEY, ADA), (LIGHT_KEY, "on")], start);
        assert_eq!(controller.state(), LightState::On);

        let cues = settled_pull(&mut controller, start);
        assert_eq!(cues, vec![Cue::Pull, Cue::Click { turning_on: false }]);
        assert_eq!(controller.state(), LightState::Off);
        assert_eq!(
            store(&controller).entries.get(LIGHT_KEY).map(String::as_str),
            Some("off")
        );
        assert!(store(&controller).entries.contains_key(USER_KEY));
    }

    #[test]
    fn logged_in_pull_on_skips_the_prompt() {
        let start = Instant::now();
        let mut controller = restored(&[(USER_KEY, ADA), (LIGHT_KEY, "off")], start);
        assert_eq!(controller.state(), LightState::Off);

        settled_pull(&mut controller, start);
        assert_eq!(controller.state(), LightState::On);
        assert_eq!(
            store(&controller).entries.get(LIGHT_KEY).map(String::as_str),
            Some("on")
        );
    }

    #[test]
    fn pull_from_overlay_turns_off_without_persisting() {
        let start = Instant::now();
        let mut controller = fresh(start);
        settled_pull(&mut controller, start);
        controller.decide(true);

        let later = start + Duration::from_secs(1);
        let cues = settled_pull(&mut controller, later);
        assert_eq!(cues, vec![Cue::Pull, Cue::Click { turning_on: false }]);
        assert_eq!(controller.state(), LightState::Off);
        assert_eq!(store(&controller).writes, 0);
    }

    #[test]
    fn second_pull_inside_settle_window_is_ignored() {
        let start = Instant::now();
        let mut controller = fresh(start);

        assert_eq!(controller.pull(start), vec![Cue::Pull]);
        assert!(
            controller
                .pull(start + Duration::from_millis(50))
                .is_empty()
        );
        controller.advance(start + PULL_SETTLE);
        assert_eq!(controller.state(), LightState::Deciding);

        assert!(
            controller
                .advance(start + Duration::from_millis(400))
                .is_empty()
        );
        assert_eq!(controller.state(), LightState::Deciding);
    }

    #[test]
    fn discard_and_decline_return_to_darkness() {
        let start = Instant::now();
        let mut controller = fresh(start);
        settled_pull(&mut controller, start);

        assert_eq!(
            controller.decide(false),
            vec![Cue::Click { turning_on: false }]
        );
        assert_eq!(controller.state(), LightState::Off);

        let later = start + Duration::from_secs(1);
        settled_pull(&mut controller, later);
        controller.decide(true);
        assert_eq!(
            controller.decline(),
            vec![Cue::Click { turning_on: false }]
        );
        assert_eq!(controller.state(), LightState::Off);
        assert!(controller.user().is_none());
    }

    #[test]
    fn sign_in_is_rejected_outside_the_form() {
        let start = Instant::now();
        let mut controller = fresh(start);
        assert!(!controller.sign_in("ada"));
        assert_eq!(controller.state(), LightState::Off);

        settled_pull(&mut controller, start);
        controller.decide(true);
        assert!(!controller.sign_in(""));
        assert_eq!(controller.state(), LightState::SigningIn);
    }

    #[test]
    fn logout_clears_everything() {
        let start = Instant::now();
        let mut controller = restored(&[(USER_KEY, ADA), (LIGHT_KEY, "on")], start);

        controller.logout();
        assert_eq!(controller.state(), LightState::Off);
        assert!(controller.user().is_none());
        assert!(store(&controller).entries.is_empty());
    }

    #[test]
    fn restored_light_suppresses_the_hint() {
        let start = Instant::now();
        let mut controller = restored(&[(USER_KEY, ADA), (LIGHT_KEY, "on")], start);

        assert!(controller.has_interacted());
        assert_eq!(controller.next_deadline(), None);
        controller.advance(start + Duration::from_secs(10));
        assert!(!controller.show_hint());
    }

    #[test]
    fn saved_light_without_user_is_ignored() {
        let start = Instant::now();
        let controller = restored(&[(LIGHT_KEY, "on")], start);

        assert_eq!(controller.state(), LightState::Off);
        assert!(!controller.has_interacted());
    }

    #[test]
    fn malformed_user_starts_dark() {
        let start = Instant::now();
        let controller = restored(&[(USER_KEY, "{{{"), (LIGHT_KEY, "on")], start);

        assert_eq!(controller.state(), LightState::Off);
        assert!(controller.user().is_none());
    }

    #[test]
    fn hint_appears_after_idle_delay() {
        let start = Instant::now();
        let mut controller = fresh(start);

        controller.advance(start + Duration::from_millis(2999));
        assert!(!controller.show_hint());
        controller.advance(start + IDLE_HINT_DELAY);
        assert!(controller.show_hint());

        controller.pull(start + Duration::from_secs(4));
        assert!(!controller.show_hint());
    }

    #[test]
    fn early_interaction_suppresses_hint_for_good() {
        let start = Instant::now();
        let mut controller = fresh(start);

        settled_pull(&mut controller, start + Duration::from_secs(1));
        controller.decide(false);
        controller.advance(start + Duration::from_secs(60));
        assert!(!controller.show_hint());
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn teardown_cancels_pending_timers() {
        let start = Instant::now();
        let mut controller = fresh(start);
        controller.pull(start + Duration::from_millis(10));

        controller.teardown();
        assert_eq!(controller.next_deadline(), None);
        assert!(controller.advance(start + Duration::from_secs(5)).is_empty());
        assert_eq!(controller.state(), LightState::Off);
        assert!(!controller.is_rope_pulling());
    }

    #[test]
    fn logout_inside_settle_window_stays_dark() {
        let start = Instant::now();
        let mut controller = restored(&[(USER_KEY, ADA), (LIGHT_KEY, "off")], start);

        controller.pull(start);
        controller.logout();
        assert_eq!(controller.state(), LightState::Off);
        assert!(!controller.is_rope_pulling());

        assert!(controller.advance(start + PULL_SETTLE).is_empty());
        assert_eq!(controller.state(), LightState::Off);
        assert!(controller.user().is_none());
        assert!(store(&controller).entries.is_empty());
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn sign_in_inside_settle_window_stays_lit() {
        let start = Instant::now();
        let mut controller = fresh(start);
        settled_pull(&mut controller, start);
        controller.decide(true);

        let later = start + Duration::from_secs(2);
        controller.pull(later);
        assert!(controller.sign_in("ada"));

        assert!(controller.advance(later + PULL_SETTLE).is_empty());
        assert_eq!(controller.state(), LightState::On);
        assert!(controller.is_logged_in());
        assert_eq!(
            store(&controller).entries.get(LIGHT_KEY).map(String::as_str),
            Some("on")
        );
    }

    #[test]
    fn decline_inside_settle_window_is_final() {
        let start = Instant::now();
        let mut controller = fresh(start);
        settled_pull(&mut controller, start);

        let later = start + Duration::from_secs(1);
        controller.pull(later);
        assert_eq!(
            controller.decline(),
            vec![Cue::Click { turning_on: false }]
        );
        assert!(controller.advance(later + PULL_SETTLE).is_empty());
        assert_eq!(controller.state(), LightState::Off);

        // The cord is free again straight away.
        assert_eq!(controller.pull(later + PULL_SETTLE), vec![Cue::Pull]);
    }

    #[test]
    fn logout_from_dark_room_forgets_the_user() {
        let start = Instant::now();
        let mut controller = restored(&[(USER_KEY, ADA), (LIGHT_KEY, "off")], start);
        assert_eq!(controller.state(), LightState::Off);

        controller.logout();
        assert_eq!(controller.state(), LightState::Off);
        assert!(controller.user().is_none());
        assert!(store(&controller).entries.is_empty());
    }

    #[test]
    fn logout_without_user_touches_nothing() {
        let start = Instant::now();
        let mut controller = fresh(start);

        controller.logout();
        assert_eq!(controller.state(), LightState::Off);
        assert_eq!(store(&controller).writes, 0);
    }

    #[test]
    fn provider_sign_in_uses_placeholder_identity() {
        let start = Instant::now();
        let mut controller = fresh(start);
        settled_pull(&mut controller, start);
        controller.decide(true);

        assert!(controller.sign_in(PROVIDER_USERNAME));
        assert_eq!(controller.state(), LightState::On);
        assert_eq!(
            controller.user().map(|user| user.username.as_str()),
            Some(PROVIDER_USERNAME)
        );
        assert!(store(&controller).entries.contains_key(USER_KEY));
    }

    proptest! {
        #[test]
        fn logout_always_leaves_a_dark_anonymous_room(
            restored_on in any::<bool>(),
            steps in proptest::collection::vec((any::<bool>(), 0u64..400), 0..16),
        ) {
            let start = Instant::now();
            let light = if restored_on { "on" } else { "off" };
            let mut controller = restored(&[(USER_KEY, ADA), (LIGHT_KEY, light)], start);

            let mut now = start;
            for (pull, gap) in steps {
                if pull {
                    controller.pull(now);
                }
                now += Duration::from_millis(gap);
                controller.advance(now);
            }

            controller.logout();
            controller.advance(now + Duration::from_secs(1));

            prop_assert_eq!(controller.state(), LightState::Off);
            prop_assert!(controller.user().is_none());
            prop_assert!(store(&controller).entries.is_empty());
            prop_assert!(!controller.is_rope_pulling());
        }

        #[test]
        fn settled_pulls_alternate_lit_and_unlit(
            logged_in in any::<bool>(),
            gaps in proptest::collection::vec(150u64..2_000, 1..24),
        ) {
            let start = Instant::now();
            let entries: &[(&str, &str)] = if logged_in { &[(USER_KEY, ADA)] } else { &[] };
            let mut controller = restored(entries, start);

            let mut now = start;
            let mut expected_lit = false;
            for gap in gaps {
                controller.pull(now);
                now += Duration::from_millis(gap);
                controller.advance(now);

                expected_lit = !expected_lit;
                prop_assert_eq!(controller.state().is_lit(), expected_lit);
                let expected = match (expected_lit, logged_in) {
                    (false, _) => LightState::Off,
                    (true, true) => LightState::On,
                    (true, false) => LightState::Deciding,
                };
                prop_assert_eq!(controller.state(), expected);
            }
        }
    }
}

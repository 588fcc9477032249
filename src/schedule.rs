use std::{collections::BTreeMap, time::Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Timer {
    PullSettle,
    IdleHint,
}

/// One-shot deadlines, at most one per timer kind. Re-arming a kind replaces
/// its previous deadline.
#[derive(Default)]
pub struct Schedule {
    deadlines: BTreeMap<Timer, Instant>,
}

impl Schedule {
    pub fn arm(&mut self, timer: Timer, at: Instant) {
        if self.deadlines.insert(timer, at).is_some() {
            log::debug!("[schedule] re-armed {timer:?}");
        }
    }

    pub fn cancel(&mut self, timer: Timer) -> bool {
        self.deadlines.remove(&timer).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.deadlines.clear();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Removes and returns every timer whose deadline is at or before `now`,
    /// earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<Timer> {
        let mut due: Vec<(Instant, Timer)> = self
            .deadlines
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(timer, at)| (*at, *timer))
            .collect();
        due.sort();
        for (_, timer) in &due {
            self.deadlines.remove(timer);
        }
        due.into_iter().map(|(_, timer)| timer).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn due_timers_fire_once_in_deadline_order() {
        let start = Instant::now();
        let mut schedule = Schedule::default();
        schedule.arm(Timer::IdleHint, start + Duration::from_secs(3));
        schedule.arm(Timer::PullSettle, start + Duration::from_millis(150));

        assert_eq!(
            schedule.next_deadline(),
            Some(start + Duration::from_millis(150))
        );
        assert!(schedule.take_due(start).is_empty());
        assert_eq!(
            schedule.take_due(start + Duration::from_secs(5)),
            vec![Timer::PullSettle, Timer::IdleHint]
        );
        assert!(schedule.take_due(start + Duration::from_secs(10)).is_empty());
        assert_eq!(schedule.next_deadline(), None);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let start = Instant::now();
        let mut schedule = Schedule::default();
        schedule.arm(Timer::IdleHint, start + Duration::from_secs(3));

        assert!(schedule.cancel(Timer::IdleHint));
        assert!(!schedule.cancel(Timer::IdleHint));
        assert!(schedule.take_due(start + Duration::from_secs(4)).is_empty());
    }

    #[test]
    fn rearming_replaces_the_deadline() {
        let start = Instant::now();
        let mut schedule = Schedule::default();
        schedule.arm(Timer::PullSettle, start + Duration::from_millis(150));
        schedule.arm(Timer::PullSettle, start + Duration::from_millis(400));

        assert!(schedule.take_due(start + Duration::from_millis(200)).is_empty());
        assert_eq!(
            schedule.next_deadline(),
            Some(start + Duration::from_millis(400))
        );
        assert_eq!(
            schedule.take_due(start + Duration::from_millis(400)),
            vec![Timer::PullSettle]
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledEvent {
    due_tick: u64,
    event: GameEvent,
}

/// One-shot timers on a virtual tick clock. At most one entry is pending per
/// event kind; scheduling a kind that is already pending restarts its timer,
/// so the last-scheduled hide wins when pickups overlap. Tests drive time by
/// calling `advance` directly instead of waiting on real timers.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct EventSchedule {
    now: u64,
    pending: Vec<ScheduledEvent>,
}

impl EventSchedule {
    pub(crate) fn now(&self) -> u64 {
        self.now
    }

    pub(crate) fn schedule_in(&mut self, delay_ticks: u64, event: GameEvent) {
        self.cancel(event);
        self.pending.push(ScheduledEvent {
            due_tick: self.now.saturating_add(delay_ticks),
            event,
        });
    }

    pub(crate) fn cancel(&mut self, event: GameEvent) {
        self.pending.retain(|entry| entry.event != event);
    }

    pub(crate) fn is_pending(&self, event: GameEvent) -> bool {
        self.pending.iter().any(|entry| entry.event == event)
    }

    /// Moves the clock forward one tick and returns everything that came
    /// due, in the order it was scheduled.
    pub(crate) fn advance(&mut self) -> Vec<GameEvent> {
        self.now = self.now.saturating_add(1);
        let now = self.now;
        let mut due = Vec::new();
        self.pending.retain(|entry| {
            if entry.due_tick <= now {
                due.push(entry.event);
                false
            } else {
                true
            }
        });
        due
    }
}

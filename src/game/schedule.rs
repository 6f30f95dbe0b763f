use std::time::Instant;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTurn {
    pub id: u64,
    pub session_id: Uuid,
    pub player_index: usize,
    pub due_at: Instant,
}

/// Pending bot turns. The scheduler only tracks due times; callers poll
/// [`TurnScheduler::take_due`] and run the turns themselves.
#[derive(Debug, Default)]
pub struct TurnScheduler {
    next_id: u64,
    tasks: Vec<ScheduledTurn>,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, session_id: Uuid, player_index: usize, due_at: Instant) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.tasks.push(ScheduledTurn {
            id,
            session_id,
            player_index,
            due_at,
        });
        id
    }

    pub fn cancel(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    pub fn cancel_session(&mut self, session_id: Uuid) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.session_id != session_id);
        before - self.tasks.len()
    }

    /// Removes and returns every task due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<ScheduledTurn> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|task| task.due_at <= now);
        self.tasks = pending;
        due.sort_by_key(|task| (task.due_at, task.id));
        due
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn due_tasks_come_out_in_order() {
        let mut scheduler = TurnScheduler::new();
        let now = Instant::now();
        let session = Uuid::new_v4();
        let late = scheduler.schedule(session, 1, now + Duration::from_secs(5));
        let early = scheduler.schedule(session, 0, now + Duration::from_secs(1));
        assert!(scheduler.take_due(now).is_empty());
        let due = scheduler.take_due(now + Duration::from_secs(10));
        assert_eq!(due.iter().map(|t| t.id).collect::<Vec<_>>(), vec![early, late]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut scheduler = TurnScheduler::new();
        let now = Instant::now();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let id = scheduler.schedule(a, 0, now);
        scheduler.schedule(b, 0, now);
        scheduler.schedule(b, 1, now);
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert_eq!(scheduler.cancel_session(b), 2);
        assert!(scheduler.take_due(now).is_empty());
    }
}

use crate::runtime::event::TimerEvent;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerCommand {
    /// Fires once after `delay` unless the key is cancelled first.
    EmitAfter {
        key: String,
        delay: Duration,
        event: TimerEvent,
    },
    /// Like `EmitAfter`, but any earlier pending event under the key is dropped.
    Debounce {
        key: String,
        delay: Duration,
        event: TimerEvent,
    },
    Cancel {
        key: String,
    },
}

#[derive(Debug, Clone)]
struct Guard {
    key: String,
    version: u64,
}

#[derive(Debug, Clone)]
struct DelayedTask {
    due_at: Instant,
    guard: Guard,
    event: TimerEvent,
}

#[derive(Default)]
pub struct Scheduler {
    delayed: Vec<DelayedTask>,
    key_versions: HashMap<String, u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, command: SchedulerCommand, now: Instant) {
        match command {
            SchedulerCommand::EmitAfter { key, delay, event } => {
                let version = *self.key_versions.entry(key.clone()).or_insert(0);
                self.delayed.push(DelayedTask {
                    due_at: now + delay,
                    guard: Guard { key, version },
                    event,
                });
            }
            SchedulerCommand::Debounce { key, delay, event } => {
                let version = self.bump_version(&key);
                self.delayed.push(DelayedTask {
                    due_at: now + delay,
                    guard: Guard { key, version },
                    event,
                });
            }
            SchedulerCommand::Cancel { key } => {
                self.bump_version(&key);
            }
        }
    }

    pub fn drain_ready(&mut self, now: Instant) -> Vec<TimerEvent> {
        let mut ready = Vec::new();
        let mut idx = 0usize;
        while idx < self.delayed.len() {
            if self.delayed[idx].due_at <= now {
                let task = self.delayed.swap_remove(idx);
                if self.task_is_valid(&task) {
                    ready.push(task);
                }
            } else {
                idx += 1;
            }
        }
        ready.sort_by_key(|task| task.due_at);
        ready.into_iter().map(|task| task.event).collect()
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        let mut next = default_timeout;

        for task in &self.delayed {
            let due_in = task.due_at.saturating_duration_since(now);
            if due_in < next {
                next = due_in;
            }
        }

        next
    }

    fn task_is_valid(&self, task: &DelayedTask) -> bool {
        let current = *self.key_versions.get(&task.guard.key).unwrap_or(&0);
        current == task.guard.version
    }

    fn bump_version(&mut self, key: &str) -> u64 {
        let entry = self.key_versions.entry(key.to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn debounce_keeps_only_the_last_event() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        for offset in [0, 10, 20] {
            scheduler.schedule(
                SchedulerCommand::Debounce {
                    key: "probe".into(),
                    delay: ms(100),
                    event: TimerEvent::ProbeImage,
                },
                start + ms(offset),
            );
        }
        assert!(scheduler.drain_ready(start + ms(110)).is_empty());
        assert_eq!(
            scheduler.drain_ready(start + ms(120)),
            vec![TimerEvent::ProbeImage]
        );
        assert_eq!(scheduler.poll_timeout(start + ms(120), ms(100)), ms(100));
    }

    #[test]
    fn cancel_drops_pending_events() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        scheduler.schedule(
            SchedulerCommand::EmitAfter {
                key: "notice".into(),
                delay: ms(50),
                event: TimerEvent::DismissNotice { id: 1 },
            },
            start,
        );
        scheduler.schedule(SchedulerCommand::Cancel { key: "notice".into() }, start);
        assert!(scheduler.drain_ready(start + ms(60)).is_empty());
    }

    #[test]
    fn poll_timeout_tracks_next_due_event() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        assert_eq!(scheduler.poll_timeout(start, ms(120)), ms(120));
        scheduler.schedule(
            SchedulerCommand::EmitAfter {
                key: "notice".into(),
                delay: ms(30),
                event: TimerEvent::DismissNotice { id: 1 },
            },
            start,
        );
        assert_eq!(scheduler.poll_timeout(start, ms(120)), ms(30));
    }
}

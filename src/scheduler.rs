//! Virtual-time task scheduler.
//!
//! The front-end feeds elapsed wall time into [`Scheduler::advance`]; the
//! scheduler answers with the tasks that became due. Frame tasks fire once per
//! advance (one per rendered frame), interval and one-shot timers fire when
//! their due time has been reached. Every scheduled task is addressed by a
//! [`TaskHandle`] so it can be cancelled.

use std::time::Duration;

use tracing::trace;

/// Work the game attaches to a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Per-frame update.
    Frame,
    /// Periodic obstacle spawn.
    Spawn,
    /// Early one-off spawn right after a run starts.
    BootstrapSpawn,
    /// Lowers the jump impulse flag.
    ClearImpulse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone, Copy)]
enum Cadence {
    EveryFrame,
    Interval(Duration),
    Once,
}

#[derive(Debug, Clone)]
struct Entry {
    handle: TaskHandle,
    task: Task,
    cadence: Cadence,
    due: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Duration,
    next_handle: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Runs `task` on every advance until cancelled.
    pub fn every_frame(&mut self, task: Task) -> TaskHandle {
        self.insert(task, Cadence::EveryFrame, self.now)
    }

    /// Runs `task` every `period`, first at `now + period`. Fires at most
    /// once per advance; missed periods are dropped, not queued.
    pub fn every(&mut self, task: Task, period: Duration) -> TaskHandle {
        self.insert(task, Cadence::Interval(period), self.now + period)
    }

    /// Runs `task` once at `now + delay`.
    pub fn after(&mut self, task: Task, delay: Duration) -> TaskHandle {
        self.insert(task, Cadence::Once, self.now + delay)
    }

    /// Returns whether the handle was still scheduled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Number of tasks that would still fire.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Moves time forward by `dt` and returns the due tasks: timers in due
    /// order (ties by scheduling order), then frame tasks.
    pub fn advance(&mut self, dt: Duration) -> Vec<Task> {
        self.now += dt;
        let now = self.now;

        let mut timers: Vec<(Duration, TaskHandle, Task)> = Vec::new();
        let mut frames = Vec::new();
        for entry in &mut self.entries {
            match entry.cadence {
                Cadence::EveryFrame => frames.push(entry.task),
                Cadence::Interval(period) => {
                    if entry.due <= now {
                        timers.push((entry.due, entry.handle, entry.task));
                        entry.due = now + period;
                    }
                }
                Cadence::Once => {
                    if entry.due <= now {
                        timers.push((entry.due, entry.handle, entry.task));
                    }
                }
            }
        }
        self.entries
            .retain(|e| !matches!(e.cadence, Cadence::Once) || e.due > now);

        timers.sort_by_key(|&(due, handle, _)| (due, handle));
        let mut due: Vec<Task> = timers.into_iter().map(|(_, _, task)| task).collect();
        due.extend(frames);
        trace!(now_ms = now.as_millis() as u64, due = due.len(), "scheduler advanced");
        due
    }

    fn insert(&mut self, task: Task, cadence: Cadence, due: Duration) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(Entry {
            handle,
            task,
            cadence,
            due,
        });
        handle
    }
}

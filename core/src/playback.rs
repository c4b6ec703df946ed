//! Progressive reveal of a compiled line.
//!
//! [`PlaybackDriver`] walks an [`ExecutionQueue`] one operation at a time. Each operation
//! stays on screen for its timeout, after which the driver advances and schedules the next
//! step, until the last operation is revealed.
//!
//! ```text
//!            start(empty or 1 op)
//!   Idle ──────────────────────────────► Complete
//!    │                                      ▲
//!    │ start(2+ ops)          tick at last  │
//!    ▼                        index - 1     │
//!  Running ──────────────────────────────────┘
//!    ▲ │ tick
//!    └─┘
//! ```
//!
//! Installing a new queue from any state restarts at progress 0 and cancels the pending
//! wake of the old one.

use crate::{
    atom::{Effect, EpistleLine},
    error::Result,
    queue::{compile, ExecutionOperation, ExecutionQueue, OperationKey},
    scheduler::{Scheduler, TimerHandle, Wake},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackStatus {
    /// No queue installed.
    Idle,
    /// A wake is pending and more operations remain.
    Running,
    /// Every operation is revealed.
    Complete,
}

/// A queue and the index of the last revealed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    queue: ExecutionQueue,
    progress: usize,
}

impl PlaybackState {
    pub fn new(queue: ExecutionQueue) -> Self {
        Self { queue, progress: 0 }
    }

    pub fn queue(&self) -> &ExecutionQueue {
        &self.queue
    }

    pub fn progress(&self) -> usize {
        self.progress
    }

    /// An empty queue is complete from the start.
    pub fn is_complete(&self) -> bool {
        self.progress + 1 >= self.queue.len()
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        !self.queue.is_empty() && index <= self.progress
    }

    pub fn current(&self) -> Option<&ExecutionOperation> {
        self.queue.get(self.progress)
    }

    fn advance(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.progress += 1;
        true
    }
}

/// One operation as the presentation layer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderItem<'a> {
    pub key: OperationKey,
    pub text: &'a str,
    pub effect: &'a Effect,
    pub revealed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    wake: Wake,
    handle: TimerHandle,
}

/// Drives a line's reveal on an injected [`Scheduler`].
///
/// At most one wake is pending at any time. Dropping the driver cancels it.
pub struct PlaybackDriver<S: Scheduler> {
    scheduler: S,
    state: Option<PlaybackState>,
    generation: u64,
    pending: Option<Pending>,
}

impl<S: Scheduler> PlaybackDriver<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            state: None,
            generation: 0,
            pending: None,
        }
    }

    /// Installs `queue` and restarts playback from its first operation.
    pub fn start(&mut self, queue: ExecutionQueue) {
        self.cancel_pending();
        self.generation += 1;
        tracing::debug!(
            generation = self.generation,
            operations = queue.len(),
            "starting playback"
        );
        self.state = Some(PlaybackState::new(queue));
        self.schedule_next();
    }

    /// Compiles `line` and starts playing it, replacing whatever was playing.
    ///
    /// On a compile error the current playback is left untouched.
    pub fn play_line(&mut self, line: &EpistleLine) -> Result<()> {
        let queue = compile(&line.line)?;
        tracing::debug!(line_id = %line.line_id, "playing line");
        self.start(queue);
        Ok(())
    }

    /// Reveals the next operation. Returns `false` when idle or already complete.
    pub fn tick(&mut self) -> bool {
        let advanced = match self.state.as_mut() {
            Some(state) => state.advance(),
            None => false,
        };
        if !advanced {
            return false;
        }

        self.cancel_pending();
        if let Some(state) = &self.state {
            tracing::trace!(progress = state.progress(), "advanced");
        }
        self.schedule_next();
        true
    }

    /// Delivers a wake from the scheduler. Stale wakes are ignored.
    pub fn wake(&mut self, wake: Wake) -> bool {
        match self.pending {
            Some(pending) if pending.wake == wake => {
                self.pending = None;
                self.tick()
            },
            _ => {
                if wake.generation != self.generation {
                    tracing::warn!(
                        stale = wake.generation,
                        current = self.generation,
                        "ignoring wake for a superseded queue"
                    );
                } else {
                    tracing::trace!(step = wake.step, "ignoring wake that is no longer pending");
                }
                false
            },
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        match &self.state {
            None => PlaybackStatus::Idle,
            Some(state) if state.is_complete() => PlaybackStatus::Complete,
            Some(_) => PlaybackStatus::Running,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status() == PlaybackStatus::Complete
    }

    pub fn state(&self) -> Option<&PlaybackState> {
        self.state.as_ref()
    }

    pub fn has_pending_wake(&self) -> bool {
        self.pending.is_some()
    }

    /// Every operation of the current queue with its reveal flag.
    pub fn snapshot(&self) -> Vec<RenderItem<'_>> {
        let Some(state) = &self.state else {
            return Vec::new();
        };

        state
            .queue
            .iter()
            .enumerate()
            .map(|(index, op)| RenderItem {
                key: op.key,
                text: &op.body,
                effect: &op.effect,
                revealed: state.is_revealed(index),
            })
            .collect()
    }

    /// Concatenated bodies of the revealed operations.
    pub fn revealed_text(&self) -> String {
        self.snapshot()
            .into_iter()
            .filter(|item| item.revealed)
            .map(|item| item.text)
            .collect()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn schedule_next(&mut self) {
        let Some(state) = &self.state else {
            return;
        };
        if state.is_complete() {
            tracing::debug!(generation = self.generation, "playback complete");
            return;
        }
        let Some(current) = state.current() else {
            return;
        };

        let wake = Wake {
            generation: self.generation,
            step: state.progress(),
        };
        let handle = self.scheduler.schedule(current.timeout, wake);
        self.pending = Some(Pending { wake, handle });
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.scheduler.cancel(pending.handle);
        }
    }
}

impl<S: Scheduler> Drop for PlaybackDriver<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

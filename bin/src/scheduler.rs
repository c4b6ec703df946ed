use epistle_core::{Scheduler, TimerHandle, Wake};
use std::{collections::HashMap, time::Duration};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};

/// [`Scheduler`] on the tokio runtime.
///
/// Each wake is a spawned sleep that sends the wake into a channel. The player loop receives
/// from that channel and hands each wake back to the driver. Cancelling aborts the sleep.
pub struct TokioScheduler {
    wakes: UnboundedSender<Wake>,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
    next_handle: u64,
}

impl TokioScheduler {
    /// The scheduler and the receiving end of its wakes. Scheduling spawns onto the current
    /// tokio runtime.
    pub fn new()-> (Self, UnboundedReceiver<Wake>) {
        let (wakes, rx) = unbounded_channel();
        let scheduler = Self {
            wakes,
            tasks: HashMap::new(),
            next_handle: 0,
        };
        (scheduler, rx)
    }

    /// Sleeps not yet finished or cancelled.
    pub fn in_flight(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, wake: Wake) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());

        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        let wakes = self.wakes.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The player may already be gone.
            let _ = wakes.send(wake);
        });
        tracing::trace!(handle = handle.0, ?delay, step = wake.step, "scheduled wake");
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

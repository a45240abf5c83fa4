//! Background tasks
//!
//! Blocking work (file reads, HTTP round trips, model parsing) runs on worker
//! threads. Every worker reports into one shared channel, so the frame loop
//! sees completions in the order they actually finished. There is no
//! cancellation and no retry: a spawned job always runs to the end.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread;

/// Queue of in-flight background jobs producing `T`
pub struct TaskQueue<T> {
    sender: Sender<Option<T>>,
    receiver: Receiver<Option<T>>,
    in_flight: usize,
}

impl<T: Send + 'static> TaskQueue<T> {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Run `job` on a worker thread; its result shows up in a later `drain`
    pub fn spawn<F>(&mut self, job: F)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let sender = self.sender.clone();
        self.in_flight += 1;

        thread::spawn(move || {
            // A panicking job still reports, so in_flight always settles
            let result = catch_unwind(AssertUnwindSafe(job)).ok();
            let _ = sender.send(result);
        });
    }

    /// Collect everything that finished since the last call, oldest first
    pub fn drain(&mut self) -> Vec<T> {
        let mut done = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(Some(value)) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    done.push(value);
                }
                Ok(None) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    log::error!("Background task panicked");
                }
                // We hold a sender ourselves, so Disconnected cannot happen
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        done
    }

    /// Number of jobs spawned but not yet drained
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl<T: Send + 'static> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn drain_until_idle<T: Send + 'static>(queue: &mut TaskQueue<T>) -> Vec<T> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut all = Vec::new();
        while queue.in_flight() > 0 {
            assert!(Instant::now() < deadline, "tasks did not finish");
            all.extend(queue.drain());
            thread::sleep(Duration::from_millis(2));
        }
        all
    }

    #[test]
    fn test_results_arrive_in_completion_order() {
        let mut queue = TaskQueue::new();
        let (release_first, gate) = mpsc::channel::<()>();

        // First job waits until the second has finished
        queue.spawn(move || {
            gate.recv().unwrap();
            "slow"
        });
        queue.spawn(|| "fast");
        assert_eq!(queue.in_flight(), 2);

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = Vec::new();
        while seen.is_empty() {
            assert!(Instant::now() < deadline);
            seen.extend(queue.drain());
            thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(seen, vec!["fast"]);

        release_first.send(()).unwrap();
        seen.extend(drain_until_idle(&mut queue));
        assert_eq!(seen, vec!["fast", "slow"]);
    }

    #[test]
    fn test_panicking_job_still_settles() {
        let mut queue: TaskQueue<u32> = TaskQueue::new();
        queue.spawn(|| panic!("boom"));
        queue.spawn(|| 7);

        let results = drain_until_idle(&mut queue);
        assert_eq!(results, vec![7]);
        assert_eq!(queue.in_flight(), 0);
    }

    #[test]
    fn test_drain_empty_queue() {
        let mut queue: TaskQueue<()> = TaskQueue::new();
        assert!(queue.drain().is_empty());
        assert_eq!(queue.in_flight(), 0);
    }
}

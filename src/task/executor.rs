use crate::task::execution::{Job, JobOutcome, execute};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

pub struct TaskExecutor {
    completion_tx: Sender<JobOutcome>,
    completion_rx: Receiver<JobOutcome>,
}

impl TaskExecutor {
    pub fn new() -> Self {
        let (completion_tx, completion_rx) = mpsc::channel::<JobOutcome>();
        Self {
            completion_tx,
            completion_rx,
        }
    }

    pub fn spawn(&self, job: Job) {
        let completion_tx = self.completion_tx.clone();
        std::thread::spawn(move || {
            let outcome = execute(job);
            let _ = completion_tx.send(outcome);
        });
    }

    pub fn drain_ready(&self) -> Vec<JobOutcome> {
        let mut out = Vec::<JobOutcome>::new();
        loop {
            match self.completion_rx.try_recv() {
                Ok(outcome) => out.push(outcome),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}

impl Default for TaskExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    #[test]
    fn completions_arrive_on_the_channel() {
        let executor = TaskExecutor::new();
        executor.spawn(Job::Decode {
            run_id: 4,
            path: PathBuf::from("/nonexistent/rowdeck.unknown"),
        });

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut outcomes = Vec::new();
        while outcomes.is_empty() && Instant::now() < deadline {
            outcomes = executor.drain_ready();
            std::thread::sleep(Duration::from_millis(5));
        }

        match outcomes.as_slice() {
            [JobOutcome::Decoded { run_id, result, .. }] => {
                assert_eq!(*run_id, 4);
                assert!(matches!(result, Err(DecodeError::UnsupportedFormat(_))));
            }
            other => panic!("unexpected outcomes: {other:?}"),
        }
    }
}

/// Bookkeeping for a job kind where only the latest run matters.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    last_started_run_id: Option<u64>,
    sequence: u64,
}

impl RunState {
    /// Allocates a run id and makes it the current one.
    pub fn start(&mut self) -> u64 {
        self.sequence = self.sequence.saturating_add(1);
        self.last_started_run_id = Some(self.sequence);
        self.sequence
    }

    /// Whether a completed run is the latest one started.
    pub fn finish(&self, run_id: u64) -> bool {
        self.last_started_run_id == Some(run_id)
    }

    /// Forgets outstanding runs; their completions will no longer be current.
    pub fn invalidate(&mut self) {
        self.last_started_run_id = None;
    }
}

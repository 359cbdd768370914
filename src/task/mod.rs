//! Background jobs: file decoding and image probes run off the event loop
//! and report back through the executor's completion channel.

pub mod execution;
pub mod executor;
pub mod probe;
pub mod run_state;

pub use execution::{Job, JobOutcome, ProbeRequest, execute};
pub use executor::TaskExecutor;
pub use probe::{ProbeVerdict, probe};
pub use run_state::RunState;

use crate::task::JobOutcome;
use crate::terminal::TerminalEvent;

/// Events the scheduler delivers after a delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    DismissNotice { id: u64 },
    ProbeImage,
}

#[derive(Debug)]
pub enum AppEvent {
    Terminal(TerminalEvent),
    Job(JobOutcome),
    Timer(TimerEvent),
}

use crate::runtime::scheduler::SchedulerCommand;
use crate::task::Job;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Spawn(Job),
    Schedule(SchedulerCommand),
    OpenUrl(String),
    RequestRender,
}

//! Application state for the terminal interface.
//!
//! [`App`] wraps the [`Workflow`] with one screen per stage. Screen handlers
//! live in the submodules; anything that must leave the state (background
//! jobs, timers, opening a URL) is queued as an [`Effect`] and drained by
//! the reducer.

pub mod columns;
pub mod intake;
pub mod records;

use crate::config::{Config, ProbeConfig};
use crate::core::workflow::{BackRequest, Stage, Workflow};
use crate::runtime::effect::Effect;
use crate::runtime::scheduler::SchedulerCommand;
use crate::runtime::event::TimerEvent;
use crate::state::notice::{Notice, NoticeKind};
use crate::task::RunState;
use crate::ui::spinner::Spinner;
use columns::ConfigScreen;
use intake::UploadScreen;
use records::EditorScreen;
use std::time::Duration;

pub(crate) const NOTICE_KEY: &str = "notice";
pub(crate) const PROBE_KEY: &str = "probe";

/// The part of [`Config`] the interface needs at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub notice: Duration,
    pub probe: ProbeConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            notice: config.notice_duration(),
            probe: config.probe.clone(),
        }
    }
}

#[derive(Debug)]
pub enum Screen {
    Upload(UploadScreen),
    Config(ConfigScreen),
    Editor(EditorScreen),
}

pub struct App {
    settings: Settings,
    workflow: Workflow,
    screen: Screen,
    notice: Option<Notice>,
    next_notice_id: u64,
    decode_runs: RunState,
    spinner: Spinner,
    should_exit: bool,
    pending_effects: Vec<Effect>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            workflow: Workflow::new(),
            screen: Screen::Upload(UploadScreen::default()),
            notice: None,
            next_notice_id: 0,
            decode_runs: RunState::default(),
            spinner: Spinner::default(),
            should_exit: false,
            pending_effects: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn stage(&self) -> Stage {
        self.workflow.stage()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn back_prompt(&self) -> Option<&BackRequest> {
        self.workflow.pending_back()
    }

    pub fn spinner(&self) -> &Spinner {
        &self.spinner
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn request_exit(&mut self) {
        self.should_exit = true;
    }

    pub fn take_pending_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.pending_effects)
    }

    pub(crate) fn push_effect(&mut self, effect: Effect) {
        self.pending_effects.push(effect);
    }

    /// Advances the activity spinner. Returns whether anything is running
    /// and the frame needs redrawing.
    pub fn tick(&mut self) -> bool {
        let busy = match &self.screen {
            Screen::Upload(upload) => upload.is_loading(),
            Screen::Editor(editor) => self.settings.probe.enabled && editor.is_probing(),
            Screen::Config(_) => false,
        };
        if busy {
            self.spinner.tick();
        }
        busy
    }

    pub fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.next_notice_id = self.next_notice_id.wrapping_add(1);
        let id = self.next_notice_id;
        self.notice = Some(Notice {
            id,
            kind,
            message: message.into(),
        });
        self.push_effect(Effect::Schedule(SchedulerCommand::EmitAfter {
            key: NOTICE_KEY.to_string(),
            delay: self.settings.notice,
            event: TimerEvent::DismissNotice { id },
        }));
    }

    pub fn dismiss_notice(&mut self, id: u64) -> bool {
        if self.notice.as_ref().is_some_and(|n| n.id == id) {
            self.notice = None;
            true
        } else {
            false
        }
    }

    pub fn on_timer(&mut self, event: TimerEvent) -> bool {
        match event {
            TimerEvent::DismissNotice { id } => self.dismiss_notice(id),
            TimerEvent::ProbeImage => {
                self.spawn_pending_probe();
                false
            }
        }
    }

    /// Arms the confirmation gate for a backward move.
    pub(crate) fn request_back_to(&mut self, target: Stage) {
        if self.workflow.request_back_to(target).is_none() {
            tracing::debug!(stage = %self.stage(), %target, "no backward move");
        }
    }

    pub fn confirm_back(&mut self) {
        match self.workflow.confirm_back() {
            Some(Stage::Upload) => {
                self.decode_runs.invalidate();
                self.push_effect(Effect::Schedule(SchedulerCommand::Cancel {
                    key: PROBE_KEY.to_string(),
                }));
                self.screen = Screen::Upload(UploadScreen::default());
            }
            Some(Stage::Config) => {
                self.push_effect(Effect::Schedule(SchedulerCommand::Cancel {
                    key: PROBE_KEY.to_string(),
                }));
                self.enter_config();
            }
            Some(Stage::Editor) | None => {}
        }
    }

    pub fn cancel_back(&mut self) {
        self.workflow.cancel_back();
    }

    fn enter_config(&mut self) {
        self.screen = Screen::Config(ConfigScreen::new(self.workflow.schema_draft()));
    }

    fn enter_editor(&mut self) {
        let screen = EditorScreen::new(
            self.workflow.data().to_vec(),
            self.workflow.columns().to_vec(),
        );
        self.screen = Screen::Editor(screen);
        self.refresh_image(Duration::ZERO);
    }
}

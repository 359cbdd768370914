use super::{App, PROBE_KEY, Screen};
use crate::core::editor::RecordEditor;
use crate::core::image::{Fallback, ImageResolver};
use crate::core::schema::{ColumnConfig, DataType};
use crate::core::value::Record;
use crate::core::workflow::Stage;
use crate::error::EditError;
use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::runtime::event::TimerEvent;
use crate::runtime::scheduler::SchedulerCommand;
use crate::state::notice::NoticeKind;
use crate::state::text_input::TextInput;
use crate::task::{Job, ProbeRequest, ProbeVerdict};
use crate::terminal::{KeyCode, KeyEvent};
use std::time::Duration;

#[derive(Debug)]
pub struct EditorScreen {
    editor: RecordEditor,
    focus: usize,
    input: TextInput,
    edit_error: Option<String>,
    /// The buffer holds text the field refused, so it differs from the stored value.
    refused: bool,
    resolver: ImageResolver,
    last_verdict: Option<ProbeVerdict>,
}

pub(crate) enum EditorOutcome {
    Stay,
    /// The focused record or the image column value changed.
    ImageChanged { typing: bool },
    Save,
    Open,
    Back(Stage),
}

impl EditorScreen {
    pub fn new(data: Vec<Record>, columns: Vec<ColumnConfig>) -> Self {
        let mut screen = Self {
            editor: RecordEditor::new(data, columns),
            focus: 0,
            input: TextInput::default(),
            edit_error: None,
            refused: false,
            resolver: ImageResolver::default(),
            last_verdict: None,
        };
        screen.load_focus();
        screen
    }

    pub fn editor(&self) -> &RecordEditor {
        &self.editor
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    /// Why the last keystroke was not stored, if it was refused.
    pub fn edit_error(&self) -> Option<&str> {
        self.edit_error.as_deref()
    }

    pub fn resolver(&self) -> &ImageResolver {
        &self.resolver
    }

    pub fn last_verdict(&self) -> Option<&ProbeVerdict> {
        self.last_verdict.as_ref()
    }

    pub fn is_probing(&self) -> bool {
        self.resolver.pending().is_some()
    }

    pub fn focused_column(&self) -> Option<&ColumnConfig> {
        self.editor.columns().get(self.focus)
    }

    /// Reference to open outside the terminal: the candidate that loaded,
    /// otherwise the original value.
    pub fn open_target(&self) -> Option<String> {
        let target = match self.resolver.state() {
            Fallback::Loaded(idx) => self.resolver.candidates().get(idx)?.as_str(),
            _ => self.resolver.original(),
        };
        (!target.is_empty()).then(|| target.to_string())
    }

    fn load_focus(&mut self) {
        let value = self
            .focused_column()
            .map(|column| {
                self.editor
                    .value(self.editor.current_index(), &column.original_header)
                    .to_display()
            })
            .unwrap_or_default();
        self.input.set(value);
        self.edit_error = None;
        self.refused = false;
    }

    fn move_focus(&mut self, forward: bool, wrap: bool) {
        let len = self.editor.columns().len();
        if len == 0 {
            return;
        }
        self.focus = match (forward, wrap) {
            (true, true) => (self.focus + 1) % len,
            (false, true) => (self.focus + len - 1) % len,
            (true, false) => (self.focus + 1).min(len - 1),
            (false, false) => self.focus.saturating_sub(1),
        };
        self.load_focus();
    }

    fn focus_column(&mut self, key: &str) {
        if let Some(idx) = self
            .editor
            .columns()
            .iter()
            .position(|c| c.original_header == key)
        {
            self.focus = idx;
        }
        self.load_focus();
    }

    /// Points the image pane at the current record's reference. Returns
    /// whether the reference changed.
    fn sync_image(&mut self) -> bool {
        let changed = self.resolver.set_url(&self.editor.current_image_url());
        if changed {
            self.last_verdict = None;
        }
        changed
    }

    fn write(&mut self, raw: &str) -> bool {
        let Some(column) = self.focused_column() else {
            return false;
        };
        let key = column.original_header.clone();
        let is_image = column.is_image();
        match self.editor.set_field(self.editor.current_index(), &key, raw) {
            Ok(()) => {
                self.edit_error = None;
                self.refused = false;
                is_image
            }
            Err(err) => {
                self.edit_error = Some(err.to_string());
                self.refused = true;
                false
            }
        }
    }

    fn cycle_select(&mut self, column: &ColumnConfig, forward: bool) {
        let current = self
            .editor
            .value(self.editor.current_index(), &column.original_header)
            .to_display();
        // "" (no selection) followed by the configured options.
        let choices: Vec<&str> = std::iter::once("")
            .chain(column.options.iter().map(String::as_str))
            .collect();
        let position = choices.iter().position(|c| *c == current);
        let next = match (position, forward) {
            (Some(idx), true) => (idx + 1) % choices.len(),
            (Some(idx), false) => (idx + choices.len() - 1) % choices.len(),
            (None, true) => 1.min(choices.len() - 1),
            (None, false) => choices.len() - 1,
        };
        let value = choices[next].to_string();
        self.write(&value);
        self.input.set(value);
    }

    fn input_key(&mut self, key: KeyEvent) -> EditorOutcome {
        match key.code {
            KeyCode::Up => {
                self.move_focus(false, false);
                return EditorOutcome::Stay;
            }
            KeyCode::Down => {
                self.move_focus(true, false);
                return EditorOutcome::Stay;
            }
            _ => {}
        }
        let Some(column) = self.focused_column().cloned() else {
            return EditorOutcome::Stay;
        };
        if column.is_read_only() {
            if !matches!(
                key.code,
                KeyCode::Left | KeyCode::Right | KeyCode::Home | KeyCode::End
            ) {
                self.edit_error = Some(EditError::ReadOnly(column.display_name).to_string());
            }
            return EditorOutcome::Stay;
        }
        if column.data_type == DataType::Select {
            match key.code {
                KeyCode::Right | KeyCode::Char(' ') => self.cycle_select(&column, true),
                KeyCode::Left => self.cycle_select(&column, false),
                KeyCode::Backspace | KeyCode::Delete => {
                    self.write("");
                    self.input.clear();
                }
                _ => {}
            }
            return EditorOutcome::Stay;
        }
        if self.input.handle_key(key) {
            let raw = self.input.value().to_string();
            if self.write(&raw) {
                return EditorOutcome::ImageChanged { typing: true };
            }
        }
        EditorOutcome::Stay
    }

    pub(crate) fn handle(&mut self, command: Command) -> EditorOutcome {
        match command {
            Command::Save => EditorOutcome::Save,
            Command::OpenImage => EditorOutcome::Open,
            Command::Cancel => EditorOutcome::Back(Stage::Config),
            Command::ChangeFile => EditorOutcome::Back(Stage::Upload),
            Command::NextFocus | Command::Submit => {
                self.move_focus(true, true);
                EditorOutcome::Stay
            }
            Command::PrevFocus => {
                self.move_focus(false, true);
                EditorOutcome::Stay
            }
            Command::NextRecord | Command::PrevRecord => {
                let moved = if command == Command::NextRecord {
                    self.editor.go_next()
                } else {
                    self.editor.go_previous()
                };
                if moved {
                    self.load_focus();
                    EditorOutcome::ImageChanged { typing: false }
                } else {
                    EditorOutcome::Stay
                }
            }
            Command::TextAction(action) => {
                let writable = self
                    .focused_column()
                    .is_some_and(|c| !c.is_read_only() && c.data_type != DataType::Select);
                if writable && self.input.apply(action) {
                    let raw = self.input.value().to_string();
                    if self.write(&raw) {
                        return EditorOutcome::ImageChanged { typing: true };
                    }
                }
                EditorOutcome::Stay
            }
            Command::InputKey(key) => self.input_key(key),
            _ => EditorOutcome::Stay,
        }
    }
}

impl App {
    pub(crate) fn editor_command(&mut self, command: Command) {
        let Screen::Editor(screen) = &mut self.screen else {
            return;
        };
        match screen.handle(command) {
            EditorOutcome::Stay => {}
            EditorOutcome::ImageChanged { typing } => {
                let delay = if typing {
                    self.settings.probe.debounce()
                } else {
                    Duration::ZERO
                };
                self.refresh_image(delay);
            }
            EditorOutcome::Save => self.save_records(),
            EditorOutcome::Open => match screen.open_target() {
                Some(url) => self.push_effect(Effect::OpenUrl(url)),
                None => self.notify(NoticeKind::Error, "This record has no image URL."),
            },
            EditorOutcome::Back(stage) => self.request_back_to(stage),
        }
    }

    fn save_records(&mut self) {
        let Screen::Editor(screen) = &mut self.screen else {
            return;
        };
        if screen.refused {
            let reason = screen.edit_error.clone().unwrap_or_default();
            tracing::debug!(%reason, "save blocked by a refused edit");
            self.notify(
                NoticeKind::Error,
                format!("Not saved: the focused field was not accepted ({reason})."),
            );
            return;
        }
        match screen.editor.commit() {
            Ok(data) => match self.workflow.commit_data(data) {
                Ok(()) => self.notify(NoticeKind::Success, "Changes saved."),
                Err(err) => self.notify(NoticeKind::Error, err.to_string()),
            },
            Err(err) => {
                screen.focus_column(&err.column_key);
                self.refresh_image(Duration::ZERO);
            }
        }
    }

    /// Re-reads the image reference of the current record and, when it
    /// changed, schedules a probe of the first candidate.
    pub(crate) fn refresh_image(&mut self, delay: Duration) {
        let Screen::Editor(screen) = &mut self.screen else {
            return;
        };
        if !screen.sync_image() {
            return;
        }
        if !self.settings.probe.enabled || !screen.is_probing() {
            return;
        }
        self.push_effect(Effect::Schedule(SchedulerCommand::Debounce {
            key: PROBE_KEY.to_string(),
            delay,
            event: TimerEvent::ProbeImage,
        }));
    }

    /// Starts a probe for the candidate currently being attempted.
    pub(crate) fn spawn_pending_probe(&mut self) {
        if !self.settings.probe.enabled {
            return;
        }
        let Screen::Editor(screen) = &self.screen else {
            return;
        };
        let Some((index, url)) = screen.resolver.pending() else {
            return;
        };
        let request = ProbeRequest {
            generation: screen.resolver.generation(),
            index,
            url: url.to_string(),
            timeout: self.settings.probe.timeout(),
        };
        self.push_effect(Effect::Spawn(Job::Probe(request)));
    }

    /// Applies a probe verdict. Stale verdicts are dropped; a failure moves
    /// on to the next candidate.
    pub fn on_probed(&mut self, generation: u64, index: usize, verdict: ProbeVerdict) -> bool {
        let Screen::Editor(screen) = &mut self.screen else {
            return false;
        };
        if !screen.resolver.report(generation, index, verdict.is_loaded()) {
            tracing::debug!(generation, index, "stale probe verdict dropped");
            return false;
        }
        tracing::debug!(generation, index, verdict = %verdict.describe(), "probe applied");
        screen.last_verdict = Some(verdict);
        self.spawn_pending_probe();
        true
    }
}

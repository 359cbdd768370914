use super::{App, Screen};
use crate::core::value::Record;
use crate::error::DecodeError;
use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::state::text_input::TextInput;
use crate::task::Job;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct UploadScreen {
    path: TextInput,
    error: Option<String>,
    loading: Option<PathBuf>,
}

pub(crate) enum UploadOutcome {
    Stay,
    Decode(PathBuf),
}

impl UploadScreen {
    pub fn path(&self) -> &TextInput {
        &self.path
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// File currently being read, if any.
    pub fn loading(&self) -> Option<&Path> {
        self.loading.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    fn handle(&mut self, command: Command) -> UploadOutcome {
        if self.is_loading() {
            return UploadOutcome::Stay;
        }
        match command {
            Command::InputKey(key) => {
                if self.path.handle_key(key) {
                    self.error = None;
                }
            }
            Command::TextAction(action) => {
                if self.path.apply(action) {
                    self.error = None;
                }
            }
            Command::Submit => {
                let raw = self.path.value().trim();
                if raw.is_empty() {
                    self.error = Some("Enter the path of a spreadsheet, CSV or JSON file.".into());
                } else {
                    return UploadOutcome::Decode(expand_home(raw));
                }
            }
            Command::Cancel => self.error = None,
            _ => {}
        }
        UploadOutcome::Stay
    }
}

fn expand_home(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(raw)),
        None => PathBuf::from(raw),
    }
}

impl App {
    pub(crate) fn upload_command(&mut self, command: Command) {
        let Screen::Upload(upload) = &mut self.screen else {
            return;
        };
        if let UploadOutcome::Decode(path) = upload.handle(command) {
            self.start_decode(path);
        }
    }

    /// Starts reading a file in the background. Refused while another read
    /// is outstanding.
    pub fn start_decode(&mut self, path: PathBuf) {
        let Screen::Upload(upload) = &mut self.screen else {
            return;
        };
        if upload.is_loading() {
            return;
        }
        upload.path.set(path.display().to_string());
        upload.error = None;
        upload.loading = Some(path.clone());
        let run_id = self.decode_runs.start();
        tracing::info!(path = %path.display(), run_id, "reading file");
        self.push_effect(Effect::Spawn(Job::Decode { run_id, path }));
    }

    pub fn on_decoded(
        &mut self,
        run_id: u64,
        path: &Path,
        result: Result<Vec<Record>, DecodeError>,
    ) -> bool {
        if !self.decode_runs.finish(run_id) {
            tracing::debug!(run_id, "stale decode completion dropped");
            return false;
        }
        let Screen::Upload(upload) = &mut self.screen else {
            return false;
        };
        upload.loading = None;
        match self.workflow.load_decoded(result) {
            Ok(()) => self.enter_config(),
            Err(err) => {
                tracing::info!(path = %path.display(), error = %err, "file rejected");
                upload.error = Some(format!(
                    "Could not read {}: {err}. Make sure it is a valid spreadsheet (.xlsx, .xls, .ods), CSV or JSON file.",
                    path.display()
                ));
            }
        }
        true
    }
}

//! The `upload → config → editor` stage machine and the session data it owns.
//!
//! Forward moves are data driven. Backward moves are user driven and pass
//! through a confirmation gate: [`Workflow::request_back`] arms it,
//! [`Workflow::confirm_back`] takes the move, [`Workflow::cancel_back`]
//! drops it.

use crate::core::schema::{ColumnConfig, SchemaDraft, validate_for_confirmation};
use crate::core::value::{Record, column_keys};
use crate::error::{DecodeError, LoadError, WorkflowError};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    #[default]
    Upload,
    Config,
    Editor,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Config => "config",
            Self::Editor => "editor",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A backward move waiting for the user to confirm it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackRequest {
    pub target: Stage,
    pub warning: String,
}

#[derive(Debug, Default)]
pub struct Workflow {
    stage: Stage,
    raw_data: Vec<Record>,
    columns: Vec<ColumnConfig>,
    data: Vec<Record>,
    pending_back: Option<BackRequest>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn raw_data(&self) -> &[Record] {
        &self.raw_data
    }

    pub fn columns(&self) -> &[ColumnConfig] {
        &self.columns
    }

    pub fn data(&self) -> &[Record] {
        &self.data
    }

    /// Source headers in file order.
    pub fn headers(&self) -> Vec<String> {
        column_keys(&self.raw_data)
    }

    pub fn pending_back(&self) -> Option<&BackRequest> {
        self.pending_back.as_ref()
    }

    /// Takes the result of a decode. An empty dataset counts as a failure and
    /// leaves the workflow in `upload`. Outside `upload` nothing is loaded.
    pub fn load_decoded(
        &mut self,
        result: Result<Vec<Record>, DecodeError>,
    ) -> Result<(), LoadError> {
        self.expect_stage(Stage::Upload, "load a dataset")?;
        let records = result?;
        if records.is_empty() {
            return Err(DecodeError::Empty.into());
        }
        tracing::info!(records = records.len(), "dataset loaded");
        self.data = records.clone();
        self.raw_data = records;
        self.stage = Stage::Config;
        Ok(())
    }

    /// Draft for the config stage: the confirmed columns when coming back
    /// from the editor, otherwise a fresh derivation from the headers.
    pub fn schema_draft(&self) -> SchemaDraft {
        let headers = self.headers();
        let data_keys: Vec<String> = self
            .data
            .iter()
            .flat_map(|record| record.keys().cloned())
            .collect();
        let draft = if self.columns.is_empty() {
            SchemaDraft::from_headers(&headers)
        } else {
            SchemaDraft::from_columns(self.columns.clone(), &headers)
        };
        draft.with_reserved(data_keys)
    }

    pub fn confirm_schema(&mut self, columns: Vec<ColumnConfig>) -> Result<(), WorkflowError> {
        self.expect_stage(Stage::Config, "confirm the schema")?;
        if let Err(violation) = validate_for_confirmation(&columns) {
            tracing::info!(%violation, "schema rejected");
            return Err(violation.into());
        }
        tracing::info!(columns = columns.len(), "schema confirmed");
        self.columns = columns;
        self.stage = Stage::Editor;
        Ok(())
    }

    /// Replaces the canonical dataset with a committed working copy.
    pub fn commit_data(&mut self, data: Vec<Record>) -> Result<(), WorkflowError> {
        self.expect_stage(Stage::Editor, "save records")?;
        if data.len() != self.raw_data.len() {
            return Err(WorkflowError::LengthMismatch {
                expected: self.raw_data.len(),
                got: data.len(),
            });
        }
        tracing::info!(records = data.len(), "working copy committed");
        self.data = data;
        Ok(())
    }

    /// One step back: editor → config, config → upload.
    pub fn request_back(&mut self) -> Option<&BackRequest> {
        match self.stage {
            Stage::Upload => None,
            Stage::Config => self.request_back_to(Stage::Upload),
            Stage::Editor => self.request_back_to(Stage::Config),
        }
    }

    /// Arms the confirmation gate for a move to an earlier stage.
    pub fn request_back_to(&mut self, target: Stage) -> Option<&BackRequest> {
        let warning = match (self.stage, target) {
            (Stage::Editor, Stage::Config) => {
                "Going back to column configuration drops edits that were not saved. Continue?"
            }
            (Stage::Config | Stage::Editor, Stage::Upload) => {
                "Choosing another file discards the loaded data and the column configuration. Continue?"
            }
            _ => return None,
        };
        self.pending_back = Some(BackRequest {
            target,
            warning: warning.to_string(),
        });
        self.pending_back.as_ref()
    }

    pub fn cancel_back(&mut self) {
        self.pending_back = None;
    }

    /// Takes the armed backward move, if any, and returns the new stage.
    pub fn confirm_back(&mut self) -> Option<Stage> {
        let request = self.pending_back.take()?;
        match request.target {
            Stage::Upload => self.reset(),
            Stage::Config => self.stage = Stage::Config,
            Stage::Editor => return None,
        }
        tracing::info!(stage = %self.stage, "moved back");
        Some(self.stage)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn expect_stage(&self, stage: Stage, action: &'static str) -> Result<(), WorkflowError> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(WorkflowError::WrongStage {
                action,
                stage: self.stage.name(),
            })
        }
    }
}

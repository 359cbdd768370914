use std::path::PathBuf;

/// Failure to turn a source file into records.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("file appears empty")]
    Empty,

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("could not read csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not read json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record {index} is not a flat object")]
    NotFlat { index: usize },
}

/// Why a decoded dataset was not taken into the session.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

/// A schema invariant that blocks the `config → editor` transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("at least one column must be configured")]
    NoColumns,

    #[error("{count} columns are typed as URL; choose a single image column")]
    MultipleImageColumns { count: usize },

    #[error("column \"{display_name}\" is a selector but has no options")]
    SelectWithoutOptions {
        original_header: String,
        display_name: String,
    },
}

/// A schema draft edit that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaEditError {
    #[error("no column at position {0}")]
    NoSuchColumn(usize),

    #[error("no option at position {0}")]
    NoSuchOption(usize),
}

/// A field value that fails save-time validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record #{}: column \"{display_name}\" contains an invalid URL", .record_index + 1)]
pub struct FieldError {
    pub record_index: usize,
    pub column_key: String,
    pub display_name: String,
}

/// A write refused at the editor boundary. Refused writes leave state untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("column \"{0}\" is read-only")]
    ReadOnly(String),

    #[error("unknown column \"{0}\"")]
    UnknownColumn(String),

    #[error("no record at position {0}")]
    NoSuchRecord(usize),

    #[error("\"{0}\" is not a number")]
    NotANumber(String),

    #[error("\"{value}\" is not an option of \"{column}\"")]
    UnknownOption { column: String, value: String },
}

/// A transition the workflow cannot take from its current stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("cannot {action} while in the {stage} stage")]
    WrongStage {
        action: &'static str,
        stage: &'static str,
    },

    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    #[error("dataset has {got} records, expected {expected}")]
    LengthMismatch { expected: usize, got: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Errors that end the process. Everything else is shown in the interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("could not set up logging: {0}")]
    Logging(String),
}

pub mod config;
pub mod core;
pub mod decode;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod state;
pub mod task;
pub mod terminal;
pub mod ui;

pub use config::Config;
pub use error::AppError;
pub use runtime::Runtime;
pub use state::{App, Settings};

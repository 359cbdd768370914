pub mod app;
pub mod notice;
pub mod text_input;

pub use app::{App, Screen, Settings};
pub use app::columns::{ConfigField, ConfigScreen};
pub use app::intake::UploadScreen;
pub use app::records::EditorScreen;
pub use notice::{Notice, NoticeKind};

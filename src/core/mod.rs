pub mod editor;
pub mod image;
pub mod schema;
pub mod value;
pub mod workflow;

pub use editor::RecordEditor;
pub use image::{Fallback, ImageResolver, ImageView};
pub use schema::{ColumnConfig, ColumnField, DataType, Permission, SchemaDraft};
pub use value::{FieldValue, Record};
pub use workflow::{BackRequest, Stage, Workflow};

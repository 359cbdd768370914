//! Column schema: derivation from source headers, draft edits, and the
//! confirmation gate.
//!
//! The draft is free to violate the invariants while the user edits it.
//! They are checked once, by [`validate_for_confirmation`], when the user
//! asks to move on to the editor.

use crate::error::{SchemaEditError, SchemaViolation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Header substrings that mark a column as the likely image column.
pub const IMAGE_KEYWORDS: [&str; 6] = ["image", "imagen", "foto", "photo", "url", "link"];

/// Namespace for headers synthesized for user-added columns.
pub const ADDED_COLUMN_PREFIX: &str = "custom_col_";

pub const ADDED_COLUMN_LABEL: &str = "New column";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Text,
    Number,
    Select,
    Date,
    Url,
}

impl DataType {
    pub const ALL: [DataType; 5] = [
        DataType::Text,
        DataType::Number,
        DataType::Select,
        DataType::Date,
        DataType::Url,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Select => "select",
            Self::Date => "date",
            Self::Url => "url (image)",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    ReadOnly,
    ReadWrite,
}

impl Permission {
    pub fn toggled(self) -> Self {
        match self {
            Self::ReadOnly => Self::ReadWrite,
            Self::ReadWrite => Self::ReadOnly,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ReadOnly => "read-only",
            Self::ReadWrite => "read/write",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub original_header: String,
    pub display_name: String,
    pub data_type: DataType,
    pub permission: Permission,
    /// Only meaningful for [`DataType::Select`]; kept when the type changes.
    #[serde(default)]
    pub options: Vec<String>,
}

impl ColumnConfig {
    pub fn new(original_header: impl Into<String>) -> Self {
        let original_header = original_header.into();
        Self {
            display_name: original_header.clone(),
            original_header,
            data_type: DataType::Text,
            permission: Permission::ReadWrite,
            options: Vec::new(),
        }
    }

    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for option in options {
            let option = option.into();
            if !self.options.contains(&option) {
                self.options.push(option);
            }
        }
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.permission == Permission::ReadOnly
    }

    pub fn is_image(&self) -> bool {
        self.data_type == DataType::Url
    }
}

pub fn looks_like_image_header(header: &str) -> bool {
    let lower = header.to_lowercase();
    IMAGE_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Initial configuration for a list of source headers.
///
/// Only the first header that looks like an image column is typed as URL;
/// later matches fall back to text.
pub fn derive_initial_schema<S: AsRef<str>>(headers: &[S]) -> Vec<ColumnConfig> {
    let mut image_seen = false;
    headers
        .iter()
        .map(|header| {
            let header = header.as_ref();
            let mut column = ColumnConfig::new(header);
            if looks_like_image_header(header) && !image_seen {
                column.data_type = DataType::Url;
                image_seen = true;
            }
            column
        })
        .collect()
}

pub fn validate_for_confirmation(columns: &[ColumnConfig]) -> Result<(), SchemaViolation> {
    let url_count = columns.iter().filter(|c| c.is_image()).count();
    if url_count > 1 {
        return Err(SchemaViolation::MultipleImageColumns { count: url_count });
    }

    if let Some(column) = columns
        .iter()
        .find(|c| c.data_type == DataType::Select && c.options.is_empty())
    {
        return Err(SchemaViolation::SelectWithoutOptions {
            original_header: column.original_header.clone(),
            display_name: column.display_name.clone(),
        });
    }

    if columns.is_empty() {
        return Err(SchemaViolation::NoColumns);
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnField {
    DisplayName(String),
    DataType(DataType),
    Permission(Permission),
}

/// Editable schema prior to confirmation.
#[derive(Debug, Clone, Default)]
pub struct SchemaDraft {
    columns: Vec<ColumnConfig>,
    source: HashSet<String>,
    reserved: HashSet<String>,
    next_added: u64,
}

impl SchemaDraft {
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        Self::from_columns(derive_initial_schema(headers), headers)
    }

    /// Draft seeded from existing columns. `source_headers` are the keys the
    /// dataset may already contain; added columns never reuse them.
    pub fn from_columns<S: AsRef<str>>(columns: Vec<ColumnConfig>, source_headers: &[S]) -> Self {
        let source: HashSet<String> = source_headers
            .iter()
            .map(|h| h.as_ref().to_string())
            .collect();
        let mut reserved = source.clone();
        reserved.extend(columns.iter().map(|c| c.original_header.clone()));
        Self {
            columns,
            source,
            reserved,
            next_added: 0,
        }
    }

    /// Extra keys that added columns must not collide with, such as keys
    /// written into the dataset by earlier editing sessions.
    pub fn with_reserved<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn columns(&self) -> &[ColumnConfig] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ColumnConfig> {
        self.columns.get(index)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn into_columns(self) -> Vec<ColumnConfig> {
        self.columns
    }

    /// True for columns that do not come from the source file.
    pub fn is_added(&self, index: usize) -> bool {
        self.columns
            .get(index)
            .is_some_and(|c| !self.source.contains(&c.original_header))
    }

    pub fn set_field(&mut self, index: usize, field: ColumnField) -> Result<(), SchemaEditError> {
        let column = self
            .columns
            .get_mut(index)
            .ok_or(SchemaEditError::NoSuchColumn(index))?;
        match field {
            ColumnField::DisplayName(name) => column.display_name = name,
            ColumnField::DataType(data_type) => column.data_type = data_type,
            ColumnField::Permission(permission) => column.permission = permission,
        }
        Ok(())
    }

    /// Appends a trimmed option. Blank and duplicate values are ignored;
    /// returns whether the option list changed.
    pub fn add_option(&mut self, index: usize, value: &str) -> Result<bool, SchemaEditError> {
        let column = self
            .columns
            .get_mut(index)
            .ok_or(SchemaEditError::NoSuchColumn(index))?;
        let value = value.trim();
        if value.is_empty() || column.options.iter().any(|o| o == value) {
            return Ok(false);
        }
        column.options.push(value.to_string());
        Ok(true)
    }

    pub fn remove_option(
        &mut self,
        index: usize,
        option_index: usize,
    ) -> Result<String, SchemaEditError> {
        let column = self
            .columns
            .get_mut(index)
            .ok_or(SchemaEditError::NoSuchColumn(index))?;
        if option_index >= column.options.len() {
            return Err(SchemaEditError::NoSuchOption(option_index));
        }
        Ok(column.options.remove(option_index))
    }

    /// Appends a text column with a fresh header and returns its position.
    pub fn add_column(&mut self) -> usize {
        let header = self.fresh_header();
        self.reserved.insert(header.clone());
        let mut column = ColumnConfig::new(header);
        column.display_name = ADDED_COLUMN_LABEL.to_string();
        self.columns.push(column);
        self.columns.len() - 1
    }

    pub fn remove_column(&mut self, index: usize) -> Result<ColumnConfig, SchemaEditError> {
        if index >= self.columns.len() {
            return Err(SchemaEditError::NoSuchColumn(index));
        }
        Ok(self.columns.remove(index))
    }

    pub fn validate(&self) -> Result<(), SchemaViolation> {
        validate_for_confirmation(&self.columns)
    }

    fn fresh_header(&mut self) -> String {
        loop {
            self.next_added += 1;
            let candidate = format!("{ADDED_COLUMN_PREFIX}{}", self.next_added);
            if !self.reserved.contains(&candidate) {
                return candidate;
            }
        }
    }
}

use super::{App, Screen};
use crate::core::schema::{ColumnConfig, ColumnField, DataType, SchemaDraft};
use crate::core::workflow::Stage;
use crate::runtime::command::Command;
use crate::state::text_input::TextInput;
use crate::terminal::{KeyCode, KeyEvent};

/// Which attribute of the selected column keystrokes go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Name,
    Type,
    Permission,
    Options,
}

impl ConfigField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Type => "type",
            Self::Permission => "permission",
            Self::Options => "options",
        }
    }
}

#[derive(Debug)]
pub struct ConfigScreen {
    draft: SchemaDraft,
    selected: usize,
    field: ConfigField,
    name: TextInput,
    option_input: TextInput,
    option_cursor: usize,
    error: Option<String>,
}

pub(crate) enum ConfigOutcome {
    Stay,
    Confirm(Vec<ColumnConfig>),
    Back,
}

impl ConfigScreen {
    pub fn new(draft: SchemaDraft) -> Self {
        let mut screen = Self {
            draft,
            selected: 0,
            field: ConfigField::Name,
            name: TextInput::default(),
            option_input: TextInput::default(),
            option_cursor: 0,
            error: None,
        };
        screen.select(0);
        screen
    }

    pub fn draft(&self) -> &SchemaDraft {
        &self.draft
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn field(&self) -> ConfigField {
        self.field
    }

    pub fn name_input(&self) -> &TextInput {
        &self.name
    }

    pub fn option_input(&self) -> &TextInput {
        &self.option_input
    }

    pub fn option_cursor(&self) -> usize {
        self.option_cursor
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn selected_column(&self) -> Option<&ColumnConfig> {
        self.draft.column(self.selected)
    }

    fn selected_is_select(&self) -> bool {
        self.selected_column()
            .is_some_and(|c| c.data_type == DataType::Select)
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(self.draft.len().saturating_sub(1));
        let name = self
            .selected_column()
            .map(|c| c.display_name.clone())
            .unwrap_or_default();
        self.name.set(name);
        self.option_input.clear();
        self.option_cursor = 0;
        if self.field == ConfigField::Options && !self.selected_is_select() {
            self.field = ConfigField::Name;
        }
    }

    fn fields(&self) -> &'static [ConfigField] {
        if self.selected_is_select() {
            &[
                ConfigField::Name,
                ConfigField::Type,
                ConfigField::Permission,
                ConfigField::Options,
            ]
        } else {
            &[ConfigField::Name, ConfigField::Type, ConfigField::Permission]
        }
    }

    fn cycle_field(&mut self, forward: bool) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        let next = if forward {
            (idx + 1) % fields.len()
        } else {
            (idx + fields.len() - 1) % fields.len()
        };
        self.field = fields[next];
    }

    fn set(&mut self, field: ColumnField) {
        if let Err(err) = self.draft.set_field(self.selected, field) {
            tracing::warn!(%err, "schema edit ignored");
        }
    }

    pub(crate) fn handle(&mut self, command: Command) -> ConfigOutcome {
        match command {
            Command::Save => return self.confirm(),
            Command::Cancel => return ConfigOutcome::Back,
            Command::Submit => {
                if self.field == ConfigField::Options && !self.option_input.value().trim().is_empty() {
                    self.add_option();
                } else {
                    return self.confirm();
                }
            }
            Command::NextFocus => self.cycle_field(true),
            Command::PrevFocus => self.cycle_field(false),
            Command::AddColumn => {
                let index = self.draft.add_column();
                self.field = ConfigField::Name;
                self.select(index);
                self.error = None;
            }
            Command::RemoveColumn => {
                if self.draft.remove_column(self.selected).is_ok() {
                    self.select(self.selected);
                    self.error = None;
                }
            }
            Command::TextAction(action) => {
                let changed = match self.field {
                    ConfigField::Name => self.name.apply(action),
                    ConfigField::Options => {
                        self.option_input.apply(action);
                        false
                    }
                    _ => false,
                };
                if changed {
                    self.set(ColumnField::DisplayName(self.name.value().to_string()));
                    self.error = None;
                }
            }
            Command::InputKey(key) => self.input_key(key),
            _ => {}
        }
        ConfigOutcome::Stay
    }

    fn confirm(&mut self) -> ConfigOutcome {
        ConfigOutcome::Confirm(self.draft.columns().to_vec())
    }

    fn add_option(&mut self) {
        let value = self.option_input.take();
        match self.draft.add_option(self.selected, &value) {
            Ok(true) => {
                let count = self.selected_column().map_or(0, |c| c.options.len());
                self.option_cursor = count.saturating_sub(1);
                self.error = None;
            }
            Ok(false) => {}
            Err(err) => tracing::warn!(%err, "option not added"),
        }
    }

    fn input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => return self.select(self.selected.saturating_sub(1)),
            KeyCode::Down => return self.select(self.selected + 1),
            _ => {}
        }
        if self.draft.is_empty() {
            return;
        }
        match self.field {
            ConfigField::Name => {
                if self.name.handle_key(key) {
                    self.set(ColumnField::DisplayName(self.name.value().to_string()));
                    self.error = None;
                }
            }
            ConfigField::Type => {
                let Some(current) = self.selected_column().map(|c| c.data_type) else {
                    return;
                };
                let next = match key.code {
                    KeyCode::Right | KeyCode::Char(' ') => current.next(),
                    KeyCode::Left => current.prev(),
                    _ => return,
                };
                self.set(ColumnField::DataType(next));
                self.error = None;
            }
            ConfigField::Permission => {
                if matches!(key.code, KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')) {
                    if let Some(current) = self.selected_column().map(|c| c.permission) {
                        self.set(ColumnField::Permission(current.toggled()));
                        self.error = None;
                    }
                }
            }
            ConfigField::Options => self.options_key(key),
        }
    }

    fn options_key(&mut self, key: KeyEvent) {
        let count = self.selected_column().map_or(0, |c| c.options.len());
        if self.option_input.is_empty() {
            match key.code {
                KeyCode::Left => {
                    self.option_cursor = self.option_cursor.saturating_sub(1);
                    return;
                }
                KeyCode::Right => {
                    self.option_cursor = (self.option_cursor + 1).min(count.saturating_sub(1));
                    return;
                }
                KeyCode::Delete | KeyCode::Backspace => {
                    if self.draft.remove_option(self.selected, self.option_cursor).is_ok() {
                        self.option_cursor = self.option_cursor.min(count.saturating_sub(2));
                    }
                    return;
                }
                _ => {}
            }
        }
        self.option_input.handle_key(key);
    }
}

impl App {
    pub(crate) fn config_command(&mut self, command: Command) {
        let Screen::Config(config) = &mut self.screen else {
            return;
        };
        match config.handle(command) {
            ConfigOutcome::Stay => {}
            ConfigOutcome::Back => self.request_back_to(Stage::Upload),
            ConfigOutcome::Confirm(columns) => match self.workflow.confirm_schema(columns) {
                Ok(()) => self.enter_editor(),
                Err(err) => config.error = Some(err.to_string()),
            },
        }
    }
}

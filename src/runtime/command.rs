use crate::state::text_input::TextAction;
use crate::terminal::KeyEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    /// Enter: submit the current line, confirm a prompt.
    Submit,
    /// Esc: dismiss a prompt or step back.
    Cancel,
    /// Ctrl+S: confirm the schema or save the records.
    Save,
    AddColumn,
    RemoveColumn,
    OpenImage,
    ChangeFile,
    NextRecord,
    PrevRecord,
    NextFocus,
    PrevFocus,
    InputKey(KeyEvent),
    TextAction(TextAction),
    Tick,
    Noop,
}

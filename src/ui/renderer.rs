//! Turns [`App`] into a frame of styled lines.
//!
//! Each stage is drawn as one framed block under a breadcrumb header; the
//! cursor position is tracked while lines are appended so the backend can
//! keep it on screen.

use crate::core::image::ImageView;
use crate::core::schema::{ColumnConfig, DataType};
use crate::core::workflow::Stage;
use crate::state::text_input::TextInput;
use crate::state::{
    App, ConfigField, ConfigScreen, EditorScreen, NoticeKind, Screen, UploadScreen,
};
use crate::terminal::{CursorPos, TerminalSize};
use crate::ui::span::{Span, SpanLine};
use crate::ui::theme::Theme;
use unicode_width::UnicodeWidthStr;

const STAGES: [Stage; 3] = [Stage::Upload, Stage::Config, Stage::Editor];
const GUTTER: &str = "│  ";

#[derive(Debug, Default, Clone)]
pub struct RenderFrame {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
}

#[derive(Default)]
struct FrameBuilder {
    frame: RenderFrame,
}

impl FrameBuilder {
    fn push(&mut self, line: SpanLine) {
        self.frame.lines.push(line);
    }

    /// Appends a line and places the cursor `col` cells into it.
    fn push_with_cursor(&mut self, line: SpanLine, col: usize) {
        self.frame.cursor = Some(CursorPos {
            col: col.min(u16::MAX as usize) as u16,
            row: self.frame.lines.len().min(u16::MAX as usize) as u16,
        });
        self.push(line);
    }

    fn blank(&mut self) {
        self.push(Vec::new());
    }
}

#[derive(Default)]
pub struct Renderer {
    theme: Theme,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn render(&self, state: &App, _size: TerminalSize) -> RenderFrame {
        let mut out = FrameBuilder::default();
        self.header(state, &mut out);

        match state.screen() {
            Screen::Upload(upload) => self.upload(state, upload, &mut out),
            Screen::Config(config) => self.config(config, &mut out),
            Screen::Editor(editor) => self.editor(state, editor, &mut out),
        }

        if let Some(prompt) = state.back_prompt() {
            // The prompt owns the keyboard; hide the field cursor.
            out.frame.cursor = None;
            out.blank();
            out.push(vec![Span::styled(
                format!("◆  Go back to {}?", prompt.target),
                self.theme.error,
            )]);
            out.push(vec![
                Span::styled(GUTTER, self.theme.hint),
                Span::new(prompt.warning.clone()),
            ]);
            out.push(vec![Span::styled(
                "└  Enter/y confirm · Esc/n stay",
                self.theme.hint,
            )]);
        } else {
            out.blank();
            out.push(vec![Span::styled(hints(state.stage()), self.theme.hint)]);
        }

        out.frame
    }

    fn header(&self, state: &App, out: &mut FrameBuilder) {
        let mut line = vec![Span::styled("rowdeck  ", self.theme.title)];
        for (idx, stage) in STAGES.iter().enumerate() {
            if idx > 0 {
                line.push(Span::styled(" › ", self.theme.stage_inactive));
            }
            let style = if *stage == state.stage() {
                self.theme.stage_active
            } else {
                self.theme.stage_inactive
            };
            line.push(Span::styled(stage.name(), style));
        }
        out.push(line);

        match state.notice() {
            Some(notice) => {
                let (glyph, style) = match notice.kind {
                    NoticeKind::Success => ("✔ ", self.theme.success),
                    NoticeKind::Error => ("✖ ", self.theme.error),
                };
                out.push(vec![Span::styled(format!("{glyph}{}", notice.message), style)]);
            }
            None => out.blank(),
        }
        out.push(vec![Span::styled("┌", self.theme.hint)]);
    }

    fn upload(&self, state: &App, upload: &UploadScreen, out: &mut FrameBuilder) {
        out.push(vec![
            Span::styled(GUTTER, self.theme.hint),
            Span::styled("Open a spreadsheet, CSV or JSON file", self.theme.label),
        ]);
        self.text_line("File", upload.path(), "path/to/data.xlsx", true, out);

        if let Some(path) = upload.loading() {
            out.push(vec![
                Span::styled(GUTTER, self.theme.hint),
                state.spinner().span(),
                Span::new(format!(" Reading {}", path.display())),
            ]);
        }
        if let Some(error) = upload.error() {
            self.error_line(error, out);
        }
        out.push(vec![Span::styled("└", self.theme.hint)]);
    }

    fn config(&self, config: &ConfigScreen, out: &mut FrameBuilder) {
        let draft = config.draft();
        out.push(vec![
            Span::styled(GUTTER, self.theme.hint),
            Span::styled(format!("{} columns", draft.len()), self.theme.label),
        ]);

        let name_width = draft
            .columns()
            .iter()
            .map(|c| c.display_name.width())
            .max()
            .unwrap_or(0)
            .clamp(8, 28);
        for (idx, column) in draft.columns().iter().enumerate() {
            let selected = idx == config.selected();
            let mut line = vec![
                Span::styled(GUTTER, self.theme.hint),
                Span::new(if selected { "› " } else { "  " }),
            ];
            let name_style = if selected {
                self.theme.label
            } else {
                Default::default()
            };
            line.push(Span::styled(pad(&column.display_name, name_width), name_style));
            line.push(Span::styled(
                format!("  {:<12}{:<11}", column.data_type.label(), column.permission.label()),
                self.theme.hint,
            ));
            if column.display_name != column.original_header {
                line.push(Span::styled(
                    format!("← {}  ", column.original_header),
                    self.theme.placeholder,
                ));
            }
            if draft.is_added(idx) {
                line.push(Span::styled("(added)", self.theme.placeholder));
            }
            out.push(line);
        }
        if draft.is_empty() {
            out.push(vec![
                Span::styled(GUTTER, self.theme.hint),
                Span::styled("No columns. Ctrl+N adds one.", self.theme.placeholder),
            ]);
        }

        if let Some(column) = draft.column(config.selected()) {
            out.push(vec![Span::styled(GUTTER, self.theme.hint)]);
            self.column_form(config, column, out);
        }
        if let Some(error) = config.error() {
            self.error_line(error, out);
        }
        out.push(vec![Span::styled("└", self.theme.hint)]);
    }

    fn column_form(&self, config: &ConfigScreen, column: &ColumnConfig, out: &mut FrameBuilder) {
        let focused = config.field();
        self.text_line(
            ConfigField::Name.label(),
            config.name_input(),
            &column.original_header,
            focused == ConfigField::Name,
            out,
        );
        self.choice_line(
            ConfigField::Type.label(),
            column.data_type.label(),
            focused == ConfigField::Type,
            out,
        );
        self.choice_line(
            ConfigField::Permission.label(),
            column.permission.label(),
            focused == ConfigField::Permission,
            out,
        );
        if column.data_type != DataType::Select {
            return;
        }

        let options_focused = focused == ConfigField::Options;
        let mut line = vec![
            Span::styled(GUTTER, self.theme.hint),
            Span::styled(format!("{:>11}: ", ConfigField::Options.label()), self.theme.label),
        ];
        if column.options.is_empty() {
            line.push(Span::styled("none yet", self.theme.placeholder));
        }
        for (idx, option) in column.options.iter().enumerate() {
            let style = if options_focused
                && config.option_input().is_empty()
                && idx == config.option_cursor()
            {
                self.theme.focused
            } else {
                Default::default()
            };
            line.push(Span::styled(format!("[{option}]"), style));
            line.push(Span::new(" "));
        }
        out.push(line);
        self.text_line("new option", config.option_input(), "type and press Enter", options_focused, out);
    }

    fn editor(&self, state: &App, screen: &EditorScreen, out: &mut FrameBuilder) {
        let editor = screen.editor();
        if editor.is_empty() {
            out.push(vec![
                Span::styled(GUTTER, self.theme.hint),
                Span::styled("No records.", self.theme.placeholder),
            ]);
            out.push(vec![Span::styled("└", self.theme.hint)]);
            return;
        }

        out.push(vec![
            Span::styled(GUTTER, self.theme.hint),
            Span::styled(
                format!("Record {} of {}", editor.current_index() + 1, editor.len()),
                self.theme.label,
            ),
        ]);
        if editor.image_column().is_some() {
            self.image_pane(state, screen, out);
        }
        out.push(vec![Span::styled(GUTTER, self.theme.hint)]);

        let label_width = editor
            .columns()
            .iter()
            .map(|c| c.display_name.width())
            .max()
            .unwrap_or(0)
            .clamp(6, 24);
        for (idx, column) in editor.columns().iter().enumerate() {
            let focused = idx == screen.focus();
            let value = editor
                .value(editor.current_index(), &column.original_header)
                .to_display();
            self.field_line(screen, column, &value, focused, label_width, out);
        }

        if let Some(error) = screen.edit_error() {
            self.error_line(error, out);
        }
        if let Some(error) = editor.error() {
            self.error_line(&error.to_string(), out);
        }
        out.push(vec![Span::styled("└", self.theme.hint)]);
    }

    fn image_pane(&self, state: &App, screen: &EditorScreen, out: &mut FrameBuilder) {
        let mut line = vec![Span::styled(GUTTER, self.theme.hint)];
        match screen.resolver().view() {
            ImageView::NoImage => {
                line.push(Span::styled("▢ no image", self.theme.placeholder));
            }
            ImageView::Loading {
                candidate,
                attempt,
                total,
            } => {
                if state.settings().probe.enabled {
                    line.push(state.spinner().span());
                    line.push(Span::new(format!(" loading image ({attempt}/{total}) ")));
                } else {
                    line.push(Span::new("▣ image "));
                }
                line.push(Span::styled(candidate.to_string(), self.theme.url));
            }
            ImageView::Loaded { candidate } => {
                line.push(Span::styled("▣ image ", self.theme.success));
                line.push(Span::styled(candidate.to_string(), self.theme.url));
            }
            ImageView::Exhausted { original } => {
                line.push(Span::styled("✖ image unavailable, open ", self.theme.error));
                line.push(Span::styled(original.to_string(), self.theme.url));
            }
        }
        out.push(line);
        if let Some(verdict) = screen.last_verdict().filter(|v| !v.is_loaded()) {
            out.push(vec![
                Span::styled(GUTTER, self.theme.hint),
                Span::styled(format!("  last attempt: {}", verdict.describe()), self.theme.hint),
            ]);
        }
    }

    fn field_line(
        &self,
        screen: &EditorScreen,
        column: &ColumnConfig,
        value: &str,
        focused: bool,
        label_width: usize,
        out: &mut FrameBuilder,
    ) {
        let marker = if focused { "› " } else { "  " };
        let label = format!("{marker}{}: ", pad(&column.display_name, label_width));
        let mut line = vec![
            Span::styled(GUTTER, self.theme.hint),
            Span::styled(label.clone(), self.theme.label),
        ];
        let prefix = GUTTER.width() + label.width();

        if column.is_read_only() {
            line.push(Span::styled(value.to_string(), self.theme.readonly));
            line.push(Span::styled("  (read-only)", self.theme.placeholder));
            out.push(line);
            return;
        }
        if column.data_type == DataType::Select {
            let shown = if value.is_empty() { "–" } else { value };
            let style = if focused {
                self.theme.focused
            } else {
                Default::default()
            };
            line.push(Span::styled(format!("‹ {shown} ›"), style));
            if !value.is_empty() && !column.options.iter().any(|o| o == value) {
                line.push(Span::styled("  (not an option)", self.theme.placeholder));
            }
            out.push(line);
            return;
        }

        let style = if column.data_type == DataType::Url {
            self.theme.url
        } else {
            Default::default()
        };
        if focused {
            line.push(Span::styled(screen.input().value().to_string(), style));
            out.push_with_cursor(line, prefix + screen.input().cursor_width());
        } else {
            line.push(Span::styled(value.to_string(), style));
            out.push(line);
        }
    }

    fn text_line(
        &self,
        label: &str,
        input: &TextInput,
        placeholder: &str,
        focused: bool,
        out: &mut FrameBuilder,
    ) {
        let label = format!("{label:>11}: ");
        let prefix = GUTTER.width() + label.width();
        let mut line = vec![
            Span::styled(GUTTER, self.theme.hint),
            Span::styled(label, self.theme.label),
        ];
        if input.is_empty() {
            line.push(Span::styled(placeholder.to_string(), self.theme.placeholder));
        } else {
            line.push(Span::new(input.value().to_string()));
        }
        if focused {
            out.push_with_cursor(line, prefix + input.cursor_width());
        } else {
            out.push(line);
        }
    }

    fn choice_line(&self, label: &str, value: &str, focused: bool, out: &mut FrameBuilder) {
        let style = if focused {
            self.theme.focused
        } else {
            Default::default()
        };
        out.push(vec![
            Span::styled(GUTTER, self.theme.hint),
            Span::styled(format!("{label:>11}: "), self.theme.label),
            Span::styled(format!("‹ {value} ›"), style),
        ]);
    }

    fn error_line(&self, message: &str, out: &mut FrameBuilder) {
        out.push(vec![
            Span::styled(GUTTER, self.theme.hint),
            Span::styled(format!("! {message}"), self.theme.error),
        ]);
    }
}

fn hints(stage: Stage) -> &'static str {
    match stage {
        Stage::Upload => "Enter open · Ctrl+C quit",
        Stage::Config => {
            "↑↓ column · Tab field · ←→ change · Ctrl+N add · Ctrl+D remove · Ctrl+S continue · Esc back"
        }
        Stage::Editor => {
            "↑↓/Tab field · PgUp/PgDn record · Ctrl+S save · Ctrl+O open image · Esc columns · Ctrl+U new file"
        }
    }
}

fn pad(text: &str, width: usize) -> String {
    let used = text.width();
    if used >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - used))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Settings;
    use crate::ui::span::line_text;

    fn text(frame: &RenderFrame) -> Vec<String> {
        frame.lines.iter().map(line_text).collect()
    }

    #[test]
    fn upload_stage_shows_breadcrumb_and_cursor() {
        let app = App::new(Settings::default());
        let frame = Renderer::default().render(&app, TerminalSize { width: 80, height: 24 });
        let lines = text(&frame);
        assert!(lines[0].contains("upload › config › editor"));
        assert!(lines.iter().any(|l| l.contains("path/to/data.xlsx")));
        let cursor = frame.cursor.expect("cursor on path input");
        assert!(line_text(&frame.lines[cursor.row as usize]).contains("File"));
    }

    #[test]
    fn pad_respects_display_width() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abcdef");
    }
}

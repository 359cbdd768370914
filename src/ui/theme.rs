use crate::ui::style::{Color, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub stage_active: Style,
    pub stage_inactive: Style,
    pub label: Style,
    pub hint: Style,
    pub error: Style,
    pub success: Style,
    pub placeholder: Style,
    pub focused: Style,
    pub readonly: Style,
    pub url: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::new().color(Color::Cyan).bold(),
            stage_active: Style::new().color(Color::Cyan).bold(),
            stage_inactive: Style::new().color(Color::DarkGrey),
            label: Style::new().bold(),
            hint: Style::new().color(Color::DarkGrey),
            error: Style::new().color(Color::Red).bold(),
            success: Style::new().color(Color::Green).bold(),
            placeholder: Style::new().color(Color::DarkGrey),
            focused: Style::new().reverse(),
            readonly: Style::new().color(Color::DarkGrey),
            url: Style::new().color(Color::Blue),
        }
    }
}

use crate::ui::span::Span;
use crate::ui::style::{Color, Style};

const BRAILLE: &[char] = &['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

/// Activity glyph for work running in the background.
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    frame: u8,
}

impl Spinner {
    pub fn tick(&mut self) {
        self.frame = ((self.frame as usize + 1) % BRAILLE.len()) as u8;
    }

    pub fn glyph(&self) -> char {
        BRAILLE[self.frame as usize % BRAILLE.len()]
    }

    pub fn span(&self) -> Span {
        Span::styled(self.glyph().to_string(), Style::new().color(Color::Cyan))
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::fmt::amount_cell;
use crate::grid::editor::{CellStyle, Intent, Mode};

/// Presentation configuration handed to every screen.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub header: Style,
    pub footer: Style,
    pub status: Style,
    pub normal: Style,
    pub active: Style,
    pub error: Style,
    pub modified: Style,
    pub marked: Style,
    pub amount_pos: Style,
    pub amount_neg: Style,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            header: Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            footer: Style::new().fg(Color::DarkGray),
            status: Style::new().fg(Color::Yellow),
            normal: Style::new(),
            active: Style::new()
                .bg(Color::Rgb(40, 40, 60))
                .add_modifier(Modifier::BOLD),
            error: Style::new().fg(Color::White).bg(Color::Red),
            modified: Style::new().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            marked: Style::new().fg(Color::Rgb(80, 220, 100)),
            amount_pos: Style::new().fg(Color::Rgb(80, 220, 100)),
            amount_neg: Style::new().fg(Color::Red),
        }
    }
}

impl Palette {
    pub fn cell(&self, style: CellStyle) -> Style {
        match style {
            CellStyle::Normal => self.normal,
            CellStyle::Active => self.active,
            CellStyle::Error => self.error,
            CellStyle::Modified => self.modified,
            CellStyle::Marked => self.marked,
        }
    }

    /// Debit or credit cell as a colored Span, red when negative, blank for zero.
    pub fn money_span(&self, amount: f64) -> Span<'static> {
        let style = if amount < 0.0 {
            self.amount_neg
        } else {
            self.amount_pos
        };
        Span::styled(amount_cell(amount), style)
    }
}

/// Translate a terminal key into a grid intent for the given mode.
pub fn intent_for(key: KeyEvent, mode: Mode) -> Option<Intent> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let intent = match key.code {
        KeyCode::Up => Intent::MoveUp,
        KeyCode::Down => Intent::MoveDown,
        KeyCode::Left if mode == Mode::Delete => Intent::PrevPage,
        KeyCode::Right if mode == Mode::Delete => Intent::NextPage,
        KeyCode::Left => Intent::MoveLeft,
        KeyCode::Right => Intent::MoveRight,
        KeyCode::Tab if mode == Mode::Insert => Intent::Advance,
        KeyCode::BackTab if mode == Mode::Insert => Intent::Retreat,
        KeyCode::Tab | KeyCode::BackTab => Intent::ToggleView,
        KeyCode::PageDown => Intent::NextPage,
        KeyCode::PageUp => Intent::PrevPage,
        KeyCode::Enter => Intent::Activate,
        KeyCode::Esc => Intent::Back,
        KeyCode::Backspace => Intent::Erase,
        KeyCode::Char('x') if ctrl && mode == Mode::Edit => Intent::ToggleSelect,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(' ' | 'x') if mode == Mode::Delete => Intent::ToggleSelect,
        KeyCode::Char(_) if mode == Mode::Delete => return None,
        KeyCode::Char(c) => Intent::Input(c),
        _ => return None,
    };
    Some(intent)
}

/// Restore the terminal before the default panic output is printed.
pub fn install_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));
}

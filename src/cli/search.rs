use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::error::{BudgieError, Result};
use crate::grid::codec::{self, Parsed, Value};
use crate::grid::editor::Mode;
use crate::models::{EditableRow, Field, SearchCriteria, FIELD_COUNT};
use crate::tui::Palette;

/// Turn the six criterion texts into a filter; blank texts are wildcards.
/// On failure, returns every field that did not parse.
pub fn parse_criteria(texts: &EditableRow) -> std::result::Result<SearchCriteria, Vec<Field>> {
    let mut criteria = SearchCriteria::default();
    let mut invalid = Vec::new();
    for field in Field::ALL {
        match codec::parse(field, texts.get(field)) {
            Parsed::Absent => {}
            Parsed::Invalid => invalid.push(field),
            Parsed::Valid(value) => match value {
                Value::Year(y) => criteria.year = Some(y),
                Value::Month(m) => criteria.month = Some(m),
                Value::Day(d) => criteria.day = Some(d),
                Value::Text(t) => criteria.description = Some(t),
                Value::Amount(a) if field == Field::Credit => criteria.credit = Some(a),
                Value::Amount(a) => criteria.debit = Some(a),
            },
        }
    }
    if invalid.is_empty() {
        Ok(criteria)
    } else {
        Err(invalid)
    }
}

/// [`parse_criteria`] with the first bad field reported as an error.
pub fn criteria_or_error(texts: &EditableRow) -> Result<SearchCriteria> {
    parse_criteria(texts).map_err(|fields| {
        let field = fields[0];
        BudgieError::InvalidCriterion {
            field: field.label(),
            value: texts.get(field).to_string(),
        }
    })
}

pub enum SearchAction {
    Continue,
    Close,
    Submit(SearchCriteria),
}

/// Criteria form shown before the delete and edit grids.
pub struct SearchForm {
    purpose: Mode,
    texts: EditableRow,
    focus: usize,
    invalid: [bool; FIELD_COUNT],
    feedback: String,
}

impl SearchForm {
    pub fn new(purpose: Mode) -> Self {
        Self {
            purpose,
            texts: EditableRow::default(),
            focus: 0,
            invalid: [false; FIELD_COUNT],
            feedback: "Leave a field blank to match anything.".to_string(),
        }
    }

    pub fn purpose(&self) -> Mode {
        self.purpose
    }

    fn focused(&self) -> Field {
        Field::from_index(self.focus).unwrap_or(Field::Year)
    }

    pub fn handle_key(&mut self, code: KeyCode) -> SearchAction {
        match code {
            KeyCode::Esc => return SearchAction::Close,
            KeyCode::Up | KeyCode::BackTab => self.focus = self.focus.saturating_sub(1),
            KeyCode::Down | KeyCode::Tab => self.focus = (self.focus + 1).min(FIELD_COUNT - 1),
            KeyCode::Backspace => {
                self.texts.pop_char(self.focused());
            }
            KeyCode::Char(c) => {
                self.texts.push_char(self.focused(), c);
            }
            KeyCode::Enter => return self.submit(),
            _ => {}
        }
        SearchAction::Continue
    }

    fn submit(&mut self) -> SearchAction {
        self.invalid = [false; FIELD_COUNT];
        match parse_criteria(&self.texts) {
            Ok(criteria) => SearchAction::Submit(criteria),
            Err(fields) => {
                for f in &fields {
                    self.invalid[f.index()] = true;
                }
                self.feedback = format!("{} is not valid.", fields[0].label());
                SearchAction::Continue
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame, palette: &Palette) {
        let [header_area, form_area, status_area, hints_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(format!(" {}: search", self.purpose.title())).style(palette.header),
            header_area,
        );

        let lines: Vec<Line> = Field::ALL
            .iter()
            .map(|&field| {
                let idx = field.index();
                let style = if self.invalid[idx] {
                    palette.error
                } else if idx == self.focus {
                    palette.active
                } else {
                    palette.normal
                };
                let marker = if idx == self.focus { ">" } else { " " };
                Line::from(vec![
                    Span::raw(format!(" {marker} {:<12}", field.label())),
                    Span::styled(
                        format!("{:<width$}", self.texts.get(field), width = field.max_len()),
                        style,
                    ),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), form_area);

        frame.render_widget(
            Paragraph::new(format!(" {}", self.feedback)).style(palette.status),
            status_area,
        );
        frame.render_widget(
            Paragraph::new(" Up/Down=field  Enter=search  Esc=back").style(palette.footer),
            hints_area,
        );
    }
}

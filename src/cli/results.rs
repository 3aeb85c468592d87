use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::importer::{ImportReport, RowOutcome};
use crate::models::Transaction;
use crate::tui::Palette;

pub enum ResultsAction {
    Continue,
    Close,
}

/// Read-only table of a committed set, each row tagged stored or rejected.
pub struct ResultsView {
    title: String,
    stored_label: &'static str,
    rows: Vec<(Transaction, bool)>,
    offset: usize,
}

impl ResultsView {
    pub fn inserted(txns: Vec<Transaction>) -> Self {
        let rows = txns.into_iter().map(|t| {
            let ok = t.is_valid;
            (t, ok)
        });
        Self::build("Insert results".into(), "Successfully inserted", rows.collect())
    }

    pub fn updated(txns: Vec<Transaction>) -> Self {
        let rows = txns.into_iter().map(|t| (t, true)).collect();
        Self::build("Edit results".into(), "Successfully updated", rows)
    }

    pub fn imported(file: &str, report: ImportReport) -> Self {
        let rows = report
            .rows
            .into_iter()
            .map(|r| (r.transaction, r.outcome == RowOutcome::Inserted))
            .collect();
        Self::build(format!("Import results: {file}"), "Successfully inserted", rows)
    }

    fn build(title: String, stored_label: &'static str, rows: Vec<(Transaction, bool)>) -> Self {
        Self {
            title,
            stored_label,
            rows,
            offset: 0,
        }
    }

    pub fn stored_count(&self) -> usize {
        self.rows.iter().filter(|(_, ok)| *ok).count()
    }

    pub fn handle_key(&mut self, code: KeyCode) -> ResultsAction {
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => return ResultsAction::Close,
            KeyCode::Down => {
                if self.offset + 1 < self.rows.len() {
                    self.offset += 1;
                }
            }
            KeyCode::Up => self.offset = self.offset.saturating_sub(1),
            _ => {}
        }
        ResultsAction::Continue
    }

    pub fn draw(&self, frame: &mut Frame, palette: &Palette) {
        let [title_area, legend_area, table_area, keys_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(format!(
                " {}  ({} of {} stored)",
                self.title,
                self.stored_count(),
                self.rows.len()
            ))
            .style(palette.header),
            title_area,
        );
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(vec![
                    Span::raw(" "),
                    Span::styled("██", palette.marked),
                    Span::raw(format!(" {}", self.stored_label)),
                ]),
                Line::from(vec![
                    Span::raw(" "),
                    Span::styled("██", palette.amount_neg),
                    Span::raw(" Not inserted into DB - invalid or duplicate"),
                ]),
            ]),
            legend_area,
        );

        let rows: Vec<Row> = self
            .rows
            .iter()
            .skip(self.offset)
            .map(|(t, ok)| {
                let style = if *ok { palette.marked } else { palette.error };
                Row::new(vec![
                    Cell::from(format!("{:04}-{:02}-{:02}", t.year, t.month, t.day)),
                    Cell::from(t.description.clone()),
                    Cell::from(palette.money_span(t.debit)),
                    Cell::from(palette.money_span(t.credit)),
                ])
                .style(style)
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Fill(1),
                Constraint::Length(14),
                Constraint::Length(14),
            ],
        )
        .header(
            Row::new(vec!["Date", "Description", "Debit", "Credit"])
                .style(palette.header)
                .bottom_margin(1),
        )
        .column_spacing(1);
        frame.render_widget(table, table_area);

        frame.render_widget(
            Paragraph::new(" Up/Down=scroll  Enter/Esc=back to menu").style(palette.footer),
            keys_area,
        );
    }
}

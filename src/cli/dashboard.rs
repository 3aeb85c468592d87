use std::path::Path;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use rusqlite::Connection;

use super::grid_view;
use super::results::{ResultsAction, ResultsView};
use super::search::{SearchAction, SearchForm};
use crate::db::open_data_dir;
use crate::error::Result;
use crate::grid::editor::{CommitOutcome, GridAction, GridEditor, Mode};
use crate::importer::import_file;
use crate::settings::Settings;
use crate::store::TransactionStore;
use crate::tui::{install_panic_hook, intent_for, Palette};

const MENU_ITEMS: &[&str] = &[
    "Import a CSV file",
    "Enter transactions",
    "Delete transactions",
    "Edit transactions",
    "Quit",
];

enum DashboardScreen {
    Home,
    ImportPrompt(String),
    Search(SearchForm),
    Grid(GridEditor),
    Results(ResultsView),
}

/// What a sub-screen asks the dashboard to do after a key.
enum Transition {
    Stay,
    Home(Option<String>),
    To(DashboardScreen),
}

struct Dashboard {
    screen: DashboardScreen,
    menu_selection: usize,
    status_message: Option<String>,
    txn_count: i64,
    settings: Settings,
    palette: Palette,
}

impl Dashboard {
    fn new(settings: Settings, palette: Palette) -> Self {
        Self {
            screen: DashboardScreen::Home,
            menu_selection: 0,
            status_message: None,
            txn_count: 0,
            settings,
            palette,
        }
    }

    fn load_data(&mut self, conn: &Connection) {
        match conn.count() {
            Ok(n) => self.txn_count = n,
            Err(e) => {
                tracing::warn!(error = %e, "could not count transactions");
                self.status_message = Some(format!("Could not read the database: {e}"));
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        match &self.screen {
            DashboardScreen::Home => self.draw_home(frame),
            DashboardScreen::ImportPrompt(input) => self.draw_import_prompt(frame, input),
            DashboardScreen::Search(form) => form.draw(frame, &self.palette),
            DashboardScreen::Grid(editor) => grid_view::draw(frame, editor, &self.palette),
            DashboardScreen::Results(view) => view.draw(frame, &self.palette),
        }
    }

    fn draw_home(&self, frame: &mut Frame) {
        let area = frame.area();
        let [header_area, sep, stats_area, menu_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(" budgie: your transactions, row by row").style(self.palette.header),
            header_area,
        );
        let sep_line = "━".repeat(area.width as usize);
        frame.render_widget(Paragraph::new(sep_line).style(self.palette.footer), sep);

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(format!(" Transactions   {}", self.txn_count)),
                Line::from(format!(" Data dir       {}", self.settings.data_dir)),
            ]),
            stats_area,
        );

        let mut lines = vec![
            Line::from(Span::styled(
                " What would you like to do?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (i, item) in MENU_ITEMS.iter().enumerate() {
            let marker = if i == self.menu_selection { ">" } else { " " };
            let style = if i == self.menu_selection {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(format!(" {marker} {item}"), style)));
        }
        frame.render_widget(Paragraph::new(lines), menu_area);

        if let Some(msg) = &self.status_message {
            frame.render_widget(
                Paragraph::new(format!(" {msg}")).style(self.palette.status),
                hints_area,
            );
        } else {
            frame.render_widget(
                Paragraph::new(" Up/Down=navigate  Enter=select  q=quit").style(self.palette.footer),
                hints_area,
            );
        }
    }

    fn draw_import_prompt(&self, frame: &mut Frame, input: &str) {
        let [header_area, body_area, hints_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(
            Paragraph::new(" Import a CSV file").style(self.palette.header),
            header_area,
        );
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(" Columns: date (MM/DD/YYYY), description, debit, credit, total"),
                Line::from(""),
                Line::from(format!(" File path: {input}\u{2588}")),
            ]),
            body_area,
        );
        frame.render_widget(
            Paragraph::new(" Enter=import  Esc=back").style(self.palette.footer),
            hints_area,
        );
    }

    /// Returns true when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent, conn: &Connection) -> bool {
        let transition = match &mut self.screen {
            DashboardScreen::Home => return self.handle_home_key(key.code),
            DashboardScreen::ImportPrompt(input) => import_prompt_key(input, key.code, conn),
            DashboardScreen::Search(form) => search_key(form, key.code, conn, &self.settings),
            DashboardScreen::Grid(editor) => grid_key(editor, key, conn),
            DashboardScreen::Results(view) => match view.handle_key(key.code) {
                ResultsAction::Close => Transition::Home(None),
                ResultsAction::Continue => Transition::Stay,
            },
        };
        match transition {
            Transition::Stay => {}
            Transition::Home(msg) => {
                self.screen = DashboardScreen::Home;
                self.status_message = msg;
                self.load_data(conn);
            }
            Transition::To(screen) => self.screen = screen,
        }
        false
    }

    fn handle_home_key(&mut self, code: KeyCode) -> bool {
        self.status_message = None;
        match code {
            KeyCode::Up => {
                self.menu_selection = self.menu_selection.saturating_sub(1);
            }
            KeyCode::Down => {
                self.menu_selection = (self.menu_selection + 1).min(MENU_ITEMS.len() - 1);
            }
            KeyCode::Char('q') => return true,
            KeyCode::Enter => match self.menu_selection {
                0 => self.screen = DashboardScreen::ImportPrompt(String::new()),
                1 => {
                    self.screen = DashboardScreen::Grid(GridEditor::for_insert(
                        self.settings.insert_rows,
                        self.settings.page_size,
                    ))
                }
                2 => self.screen = DashboardScreen::Search(SearchForm::new(Mode::Delete)),
                3 => self.screen = DashboardScreen::Search(SearchForm::new(Mode::Edit)),
                _ => return true,
            },
            _ => {}
        }
        false
    }
}

fn import_prompt_key(input: &mut String, code: KeyCode, conn: &Connection) -> Transition {
    match code {
        KeyCode::Esc => Transition::Home(None),
        KeyCode::Backspace => {
            input.pop();
            Transition::Stay
        }
        KeyCode::Char(c) => {
            input.push(c);
            Transition::Stay
        }
        KeyCode::Enter if !input.trim().is_empty() => {
            let file = input.trim().to_string();
            match import_file(conn, Path::new(&file)) {
                Ok(report) => Transition::To(DashboardScreen::Results(ResultsView::imported(&file, report))),
                Err(e) => {
                    tracing::warn!(file = %file, error = %e, "import failed");
                    Transition::Home(Some(format!("Could not import {file}: {e}")))
                }
            }
        }
        _ => Transition::Stay,
    }
}

fn search_key(form: &mut SearchForm, code: KeyCode, conn: &Connection, settings: &Settings) -> Transition {
    match form.handle_key(code) {
        SearchAction::Continue => Transition::Stay,
        SearchAction::Close => Transition::Home(None),
        SearchAction::Submit(criteria) => match conn.find(&criteria) {
            Ok(rows) => {
                let editor = match form.purpose() {
                    Mode::Edit => GridEditor::for_edit(rows, criteria, settings.page_size),
                    _ => GridEditor::for_delete(rows, criteria, settings.page_size),
                };
                Transition::To(DashboardScreen::Grid(editor))
            }
            Err(e) => {
                tracing::warn!(error = %e, "search failed");
                Transition::Home(Some(format!("Search failed: {e}")))
            }
        },
    }
}

fn grid_key(editor: &mut GridEditor, key: KeyEvent, conn: &Connection) -> Transition {
    let Some(intent) = intent_for(key, editor.mode()) else {
        return Transition::Stay;
    };
    match editor.handle_key(intent) {
        GridAction::Continue => Transition::Stay,
        GridAction::Close => Transition::Home(None),
        GridAction::Commit => match editor.commit(conn) {
            Ok(CommitOutcome::Blocked) | Ok(CommitOutcome::Deleted(_)) => Transition::Stay,
            Ok(CommitOutcome::Inserted(txns)) => {
                Transition::To(DashboardScreen::Results(ResultsView::inserted(txns)))
            }
            Ok(CommitOutcome::Updated(txns)) => {
                Transition::To(DashboardScreen::Results(ResultsView::updated(txns)))
            }
            Err(e) => {
                tracing::warn!(mode = ?editor.mode(), error = %e, "commit failed");
                Transition::Home(Some(format!("Could not save changes: {e}")))
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

pub fn run(settings: Settings) -> Result<()> {
    let conn = open_data_dir(&settings.data_path())?;
    tracing::info!(db = %settings.db_path().display(), "dashboard started");

    let mut dashboard = Dashboard::new(settings, Palette::default());
    dashboard.load_data(&conn);

    install_panic_hook();
    let mut terminal = ratatui::init();

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| dashboard.draw(frame)) {
            break Err(e.into());
        }

        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break Ok(());
                }
                if dashboard.handle_key(key, &conn) {
                    break Ok(());
                }
            }
            _ => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    tracing::info!("dashboard closed");
    result
}

use ratatui::{
    layout::{Alignment, Constraint, Layout},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::grid::editor::{GridEditor, Mode, RenderModel};
use crate::grid::nav::ViewMode;
use crate::models::Field;
use crate::tui::Palette;

fn column_widths(model: &RenderModel) -> Vec<Constraint> {
    let mut widths: Vec<Constraint> = Field::ALL
        .iter()
        .map(|f| Constraint::Length(f.max_len().max(f.label().len()) as u16 + 1))
        .collect();
    if model.header.len() > widths.len() {
        widths.push(Constraint::Length(6));
    }
    widths
}

fn key_hints(mode: Mode) -> &'static str {
    match mode {
        Mode::Insert => " Arrows/Tab=move  type=edit  Enter=next/submit  PgUp/PgDn=page  Esc=back",
        Mode::Delete => " Up/Down=row  Space/x=select  Left/Right=page  Tab=confirm  Enter=toggle/delete  Esc=back",
        Mode::Edit => " Arrows=move  type=edit  Ctrl+X=select  Tab=confirm  Enter=save  PgUp/PgDn=page  Esc=back",
    }
}

/// Draw a grid editor frame: table, confirm button, prompt and key hints.
pub fn draw(frame: &mut Frame, editor: &GridEditor, palette: &Palette) {
    let model = editor.render();

    let [title_area, table_area, confirm_area, status_area, keys_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let mut title = vec![
        Span::styled(format!(" {}", model.title), palette.header),
        Span::styled(format!("  {}", model.page_label), palette.footer),
    ];
    if editor.mode() != Mode::Insert {
        title.push(Span::styled(
            format!("  {} selected", editor.selection().selected_count()),
            palette.marked,
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), title_area);

    let rows: Vec<Row> = model
        .rows
        .iter()
        .map(|cells| {
            Row::new(
                cells
                    .iter()
                    .map(|c| Cell::from(c.text.clone()).style(palette.cell(c.style)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    let widths = column_widths(&model);
    let table = Table::new(rows, widths)
        .header(Row::new(model.header.clone()).style(palette.header).bottom_margin(1))
        .column_spacing(1);
    frame.render_widget(table, table_area);

    let confirm_style = if model.view == ViewMode::Confirm {
        palette.active
    } else {
        palette.footer
    };
    frame.render_widget(
        Paragraph::new(Span::styled(format!("[ {} ]", model.confirm_label), confirm_style))
            .alignment(Alignment::Center),
        confirm_area,
    );

    frame.render_widget(
        Paragraph::new(format!(" {}", model.prompt)).style(palette.status),
        status_area,
    );
    frame.render_widget(
        Paragraph::new(key_hints(editor.mode())).style(palette.footer),
        keys_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_draw_insert_grid() {
        let backend = TestBackend::new(100, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let editor = GridEditor::for_insert(3, 10);
        let palette = Palette::default();
        terminal.draw(|f| draw(f, &editor, &palette)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Enter transactions"));
        assert!(text.contains("Description"));
        assert!(text.contains("[ Submit ]"));
        assert!(text.contains("Page 1/1"));
    }
}

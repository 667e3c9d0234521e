// ============================================================================
// Dashboard - Rendu de l'écran de recherche
// ============================================================================
// Header, formulaire de recherche, table des cartes, footer.
//
// CONCEPTS RATATUI :
// 1. Layout : découpage vertical de l'écran
// 2. Table + TableState : lignes, en-têtes et sélection
// 3. Paragraph : formulaire et messages
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, FormField};
use crate::models::price::{format_money, format_percent, price_or_zero};
use crate::models::Card;
use crate::pipeline::{PageView, SortColumn};

/// Nombre de lignes "squelette" pendant le chargement
const SKELETON_ROWS: usize = 3;

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);
    render_form(frame, app, chunks[1]);
    render_results(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

/// Header, formulaire, table, footer
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(5), // Formulaire : 3 lignes + bordures
            Constraint::Min(0),    // Table
            Constraint::Length(4), // Footer : message + raccourcis
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Pokemon Grading Tool ")
        .title_alignment(Alignment::Center);

    let text = Line::from(vec![
        Span::styled(
            app.language.label(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(app.set_name.as_str(), Style::default().fg(Color::Green)),
    ]);

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Formulaire
// ============================================================================

/// Dessine les champs du formulaire, le champ actif en surbrillance
fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let border_color = if app.is_editing() { Color::Green } else { Color::Cyan };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Search ");

    let rows: [&[FormField]; 3] = [
        &[FormField::CardName, FormField::CardNumber, FormField::Set],
        &[FormField::Language, FormField::Rarity, FormField::Delta],
        &[FormField::FilterName, FormField::FilterNumber],
    ];

    let lines: Vec<Line> = rows
        .iter()
        .map(|fields| {
            let mut spans = Vec::new();
            for field in fields.iter() {
                spans.extend(field_spans(app, *field));
                spans.push(Span::raw("   "));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Label + valeur d'un champ
fn field_spans(app: &App, field: FormField) -> Vec<Span<'static>> {
    let focused = app.is_editing() && app.focused_field == field;

    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let mut value = app.field_value(field).to_string();
    let mut value_style = Style::default().fg(Color::White);

    if field == FormField::Delta {
        if value.is_empty() {
            value = "0".to_string();
        } else if app.delta_error().is_some() {
            value_style = value_style.fg(Color::Red);
        }
    }

    if focused {
        value_style = value_style.add_modifier(Modifier::REVERSED);
    }

    let mut spans = vec![
        Span::styled(format!("{}: ", field.label()), label_style),
        Span::styled(if field.is_text() { value } else { format!("< {} >", value) }, value_style),
    ];

    if focused && field.is_text() {
        spans.push(Span::styled(
            "█",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ));
    }

    spans
}

// ============================================================================
// Table des résultats
// ============================================================================

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.view();

    let title = if app.is_loading_data() {
        " Cards | loading... ".to_string()
    } else if view.is_empty() {
        " Cards ".to_string()
    } else {
        format!(
            " Cards | page {}/{} | {} results ",
            view.page, view.page_count, view.total
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    if app.is_loading_data() {
        render_skeleton(frame, app, block, area);
        return;
    }

    if view.is_empty() {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No cards found", Style::default().fg(Color::Gray))),
        ])
        .block(block)
        .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    }

    render_table(frame, app, &view, block, area);
}

/// Largeurs des colonnes, dans l'ordre de SortColumn::ALL
fn column_widths() -> [Constraint; 9] {
    [
        Constraint::Min(18),
        Constraint::Length(10),
        Constraint::Length(24),
        Constraint::Length(18),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(9),
        Constraint::Length(11),
    ]
}

/// En-têtes avec numéro de touche et flèche de tri
fn header_row(app: &App) -> Row<'static> {
    let cells = SortColumn::ALL.iter().enumerate().map(|(index, column)| {
        let mut label = format!("{} {}", index + 1, column.label());
        let mut style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

        if app.sort.column == *column {
            label.push(' ');
            label.push_str(app.sort.direction.arrow());
            style = style.add_modifier(Modifier::UNDERLINED);
        }

        Cell::from(label).style(style)
    });

    Row::new(cells).bottom_margin(1)
}

fn card_row(card: &Card) -> Row<'static> {
    let delta = price_or_zero(card.price_delta.as_deref());
    let delta_style = if card.price_delta.is_none() {
        Style::default().fg(Color::Gray)
    } else if delta >= 0.0 {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    };

    Row::new(vec![
        Cell::from(card.display_name().to_string()),
        Cell::from(card.display_number().to_string()),
        Cell::from(card.set_name.clone().unwrap_or_else(|| "N/A".to_string())),
        Cell::from(card.rarity.clone().unwrap_or_else(|| "N/A".to_string())),
        Cell::from(format_money(card.tcgplayer_price.as_deref())),
        Cell::from(format_money(card.psa_10_price.as_deref())),
        Cell::from(format_money(card.price_delta.as_deref())).style(delta_style),
        Cell::from(format_percent(card.profit_potential.as_deref())),
        Cell::from(card.display_last_updated()),
    ])
}

fn render_table(frame: &mut Frame, app: &App, view: &PageView<'_>, block: Block, area: Rect) {
    let rows: Vec<Row> = view.records.iter().map(|card| card_row(card)).collect();

    let table = Table::new(rows, column_widths())
        .header(header_row(app))
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !app.is_editing() {
        state.select(Some(app.selected_index.min(view.records.len().saturating_sub(1))));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

/// Lignes grisées pendant le chargement
fn render_skeleton(frame: &mut Frame, app: &App, block: Block, area: Rect) {
    let skeleton_style = Style::default().fg(Color::DarkGray);
    let rows: Vec<Row> = (0..SKELETON_ROWS)
        .map(|_| {
            Row::new(
                SortColumn::ALL
                    .iter()
                    .map(|_| Cell::from("░░░░░░░░").style(skeleton_style)),
            )
        })
        .collect();

    let table = Table::new(rows, column_widths())
        .header(header_row(app))
        .block(block);

    frame.render_widget(table, area);
}

// ============================================================================
// Footer : message + raccourcis
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let message = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Press ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " again to quit, any other key to cancel ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if let Some(error) = &app.error {
        Line::from(Span::styled(
            format!("✗ {}", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else if app.is_loading_data() {
        let text = app.loading_message.clone().unwrap_or_else(|| "Loading...".to_string());
        Line::from(Span::styled(text, Style::default().fg(Color::Yellow)))
    } else if let Some(error) = app.delta_error() {
        Line::from(Span::styled(error.to_string(), Style::default().fg(Color::Red)))
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(status.clone(), Style::default().fg(Color::Green)))
    } else {
        Line::from("")
    };

    let shortcuts = if app.is_editing() {
        Line::from(vec![
            Span::styled("[Enter]", key_style),
            Span::raw(" Search  "),
            Span::styled("[Tab/↑↓]", key_style),
            Span::raw(" Field  "),
            Span::styled("[←→]", key_style),
            Span::raw(" Change  "),
            Span::styled("[Esc]", key_style),
            Span::raw(" Table"),
        ])
    } else {
        Line::from(vec![
            Span::styled("[q]", key_style),
            Span::raw(" Quit  "),
            Span::styled("[/]", key_style),
            Span::raw(" Search  "),
            Span::styled("[j k]", key_style),
            Span::raw(" Row  "),
            Span::styled("[n p]", key_style),
            Span::raw(" Page  "),
            Span::styled("[1-9]", key_style),
            Span::raw(" Sort  "),
            Span::styled("[o]", key_style),
            Span::raw(" Open"),
        ])
    };

    let paragraph = Paragraph::new(vec![message, shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(app: &App) -> String {
        let backend = TestBackend::new(160, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();

        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_empty_state_message() {
        let app = App::with_cards(Vec::new(), 10);
        assert!(screen_text(&app).contains("No cards found"));
    }

    #[test]
    fn test_table_shows_rows_and_sort_arrow() {
        let cards = vec![Card {
            card_name: Some("Pikachu ex - 238/191".to_string()),
            price_delta: Some("120".to_string()),
            ..Default::default()
        }];
        let app = App::with_cards(cards, 10);

        let text = screen_text(&app);
        assert!(text.contains("Pikachu ex"));
        assert!(text.contains("238/191"));
        assert!(text.contains("Card Name ↑"));
        assert!(text.contains("page 1/1"));
    }

    #[test]
    fn test_delta_error_replaces_stale_error() {
        let mut app = App::default();
        assert!(app.submit_search().is_none());

        app.focused_field = FormField::Delta;
        for c in ">abc".chars() {
            app.append_char(c);
        }

        let text = screen_text(&app);
        assert!(text.contains("invalid price delta filter"));
        assert!(!text.contains("Please enter a card name"));
    }

    #[test]
    fn test_error_is_displayed() {
        let mut app = App::default();
        app.error = Some("HTTP error! status: 500".to_string());
        assert!(screen_text(&app).contains("HTTP error! status: 500"));
    }
}

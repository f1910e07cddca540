//! UI rendering for the flashcards app.

use crate::app::{App, View};
use flashcard_core::{overall, CardState, CategorySummary, ProgressModel};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    match app.view {
        View::CategoryList => draw_category_list(f, app),
        View::Study => draw_study(f, app),
    }

    if let Some(category) = &app.confirm_reset {
        draw_confirm_reset(f, category);
    }

    if app.show_help {
        draw_help(f);
    }

    if let Some(msg) = &app.message {
        draw_message(f, msg);
    }
}

fn draw_category_list(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    // Header
    let all = overall(&app.summaries);
    let mut title = format!(
        "Data Engineering Flashcards  |  {} of {} terms mastered",
        all.mastered, all.total
    );
    if app.is_syncing() {
        title.push_str("  |  syncing...");
    }
    let header = Paragraph::new(title)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    // Categories
    if app.summaries.is_empty() {
        let msg = Paragraph::new("No categories yet. Press 's' to sync the question bank.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Categories "));
        f.render_widget(msg, chunks[1]);
    } else {
        let items: Vec<ListItem> = app
            .summaries
            .iter()
            .enumerate()
            .map(|(i, summary)| {
                let style = if i == app.selected {
                    Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                let spans = vec![
                    Span::styled(format!("{:<28}", summary.category), style),
                    Span::raw(" "),
                    Span::styled(
                        progress_bar(summary.mastered_percentage(), 20),
                        Style::default().fg(Color::Green),
                    ),
                    Span::raw(format!(
                        " {} of {} words mastered",
                        summary.mastered, summary.total
                    )),
                ];

                ListItem::new(Line::from(spans)).style(if i == app.selected {
                    Style::default().bg(Color::DarkGray)
                } else {
                    Style::default()
                })
            })
            .collect();

        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Categories "));
        f.render_widget(list, chunks[1]);
    }

    // Footer
    let footer = Paragraph::new("j/k:Navigate  Enter:Practice  r:Reset  s:Sync  ?:Help  q:Quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[2]);
}

fn progress_bar(percent: u32, width: usize) -> String {
    let filled = (percent as usize * width / 100).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn draw_study(f: &mut Frame, app: &App) {
    let Some(session) = &app.session else { return };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Card
            Constraint::Length(9), // Progress
            Constraint::Length(3), // Buttons
        ])
        .split(f.area());

    let title = format!(
        "{}  |  Card {} of {}  |  {} mode",
        session.category,
        (session.current_index + 1).min(session.total_cards()),
        session.total_cards(),
        session.mode.name()
    );
    let header = Paragraph::new(title)
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    // Card content
    if let Some(card) = session.current_card() {
        let status = Span::styled(
            format!(" {} ", card.state.name().to_uppercase()),
            Style::default().fg(Color::Black).bg(state_color(card.state)),
        );
        let mut title_spans = vec![
            Span::raw(" "),
            status,
            Span::raw(format!(" {} ", card.difficulty.name())),
        ];
        if app.config.progress.model == ProgressModel::Tally {
            title_spans.push(Span::styled(
                format!("{} of {} correct ", card.tally.correct, card.tally.total()),
                Style::default().fg(Color::Cyan),
            ));
        }
        let card_title = Line::from(title_spans);

        if session.flipped {
            let inner = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(chunks[1]);

            let front = Paragraph::new(card.term.as_str())
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::BOLD))
                .block(Block::default().borders(Borders::ALL).title(card_title))
                .wrap(Wrap { trim: true });
            f.render_widget(front, inner[0]);

            let mut lines = vec![Line::from(Span::styled(
                card.definition.as_str(),
                Style::default().fg(Color::Green),
            ))];
            if !card.example.is_empty() {
                lines.push(Line::raw(""));
                lines.push(Line::from(Span::styled(
                    format!("Example: {}", card.example),
                    Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
                )));
            }
            let back = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" Definition "))
                .wrap(Wrap { trim: true });
            f.render_widget(back, inner[1]);
        } else {
            let front = Paragraph::new(card.term.as_str())
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::BOLD))
                .block(Block::default().borders(Borders::ALL).title(card_title))
                .wrap(Wrap { trim: true });
            f.render_widget(front, chunks[1]);
        }
    }

    if let Some(summary) = app.session_summary() {
        draw_progress_bars(f, chunks[2], summary);
    }

    // Buttons
    let buttons = if session.flipped {
        vec![
            ("n", "Didn't know", Color::Red),
            ("y", "Knew it", Color::Green),
        ]
    } else {
        vec![("Space", "Tap to see definition", Color::White)]
    };

    let button_spans: Vec<Span> = buttons
        .iter()
        .flat_map(|(key, label, color)| {
            vec![
                Span::styled(format!("[{}]", key), Style::default().fg(*color).add_modifier(Modifier::BOLD)),
                Span::raw(format!(" {} ", label)),
                Span::raw("  "),
            ]
        })
        .collect();

    let button_line = Paragraph::new(Line::from(button_spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(button_line, chunks[3]);
}

fn state_color(state: CardState) -> Color {
    match state {
        CardState::Learning => Color::Yellow,
        CardState::Reviewing => Color::Magenta,
        CardState::Mastered => Color::Green,
    }
}

fn draw_progress_bars(f: &mut Frame, area: Rect, summary: &CategorySummary) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3); 3])
        .split(area);

    let states = [CardState::Mastered, CardState::Reviewing, CardState::Learning];

    for (row, state) in rows.iter().zip(states) {
        let count = summary.count(state);
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(state_color(state)))
            .percent(summary.state_percentage(state).min(100) as u16)
            .label(format!("{} {} of {} words", state.as_str(), count, summary.total));
        f.render_widget(gauge, *row);
    }
}

fn draw_confirm_reset(f: &mut Frame, category: &str) {
    let area = centered_rect(50, 25, f.area());
    f.render_widget(Clear, area);

    let text = format!(
        "Reset all progress for \"{}\"?\n\nEvery word goes back to learning.\n\n[y] Reset    [n] Cancel",
        category
    );
    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Reset Progress "))
        .wrap(Wrap { trim: false });
    f.render_widget(popup, area);
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 80, f.area());
    f.render_widget(Clear, area);

    let help = r#"
Data Engineering Flashcards Keybindings

Categories:
  j/k, Up/Down    Navigate categories
  Enter, Space    Practice category
  r               Reset category progress
  s               Sync question bank
  q               Quit

Study Session:
  Space, Enter    Show definition
  y, 2            Knew it
  n, 1            Didn't know
  q, Esc          End session

General:
  ?               Show this help

Press any key to close
"#;

    let popup = Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });
    f.render_widget(popup, area);
}

fn draw_message(f: &mut Frame, msg: &str) {
    let area = Rect::new(
        f.area().x + 2,
        f.area().height.saturating_sub(5),
        f.area().width.saturating_sub(4),
        3,
    );
    f.render_widget(Clear, area);

    let message = Paragraph::new(msg)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use flashcard_core::{CardStore, NewCard, Tally};
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        let cards = vec![
            NewCard::new("Basics", "ETL", "Extract, transform, load").with_example("Nightly batch job"),
            NewCard::new("Basics", "ELT", "Extract, load, transform"),
        ];
        App::with_store(Config::default(), CardStore::in_memory(&cards).unwrap()).unwrap()
    }

    #[test]
    fn test_progress_bar_text() {
        assert_eq!(progress_bar(0, 4), "[----]");
        assert_eq!(progress_bar(50, 4), "[##--]");
        assert_eq!(progress_bar(100, 4), "[####]");
    }

    #[test]
    fn test_category_list_renders_mastery() {
        let screen = render(&app());
        assert!(screen.contains("Basics"));
        assert!(screen.contains("0 of 2 words mastered"));
    }

    #[test]
    fn test_study_view_hides_definition_until_flipped() {
        let mut app = app();
        app.start_study();

        let screen = render(&app);
        assert!(screen.contains("ETL"));
        assert!(screen.contains("LEARNING"));
        assert!(!screen.contains("Extract, transform, load"));

        app.session.as_mut().unwrap().flip();
        let screen = render(&app);
        assert!(screen.contains("Extract, transform, load"));
        assert!(screen.contains("Example: Nightly batch job"));
        assert!(screen.contains("learning 2 of 2 words"));
    }

    #[test]
    fn test_study_view_shows_tally_in_tally_model() {
        let cards = vec![NewCard::new("Basics", "CDC", "Change data capture").with_tally(Tally {
            correct: 3,
            incorrect: 2,
        })];
        let mut config = Config::default();
        config.progress.model = ProgressModel::Tally;
        let mut app = App::with_store(config, CardStore::in_memory(&cards).unwrap()).unwrap();
        app.start_study();

        let screen = render(&app);
        assert!(screen.contains("3 of 5 correct"));
    }

    #[test]
    fn test_reset_dialog_renders() {
        let mut app = app();
        app.confirm_reset = Some("Basics".to_string());
        let screen = render(&app);
        assert!(screen.contains("Reset Progress"));
    }
}

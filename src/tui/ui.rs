//! UI rendering using ratatui
//!
//! Screens:
//! - Splash and Menu (see `menu`)
//! - Playing: the puzzle, plus the time's-up modal and end screens

use crate::app::{
    AppCoordinator, GameSession, ModalOption, Screen, TimeUp, EXHAUSTED_MESSAGE,
    WRONG_ANSWER_MESSAGE,
};
use crate::game::Phase;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::time::Instant;

use super::menu::{render_menu, render_splash};

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator, now: Instant) {
    match &coordinator.screen {
        Screen::Splash { .. } => {
            render_splash(frame, coordinator.splash_opacity(now));
        }
        Screen::Menu {
            selected,
            show_help,
        } => {
            render_menu(frame, *selected, &coordinator.best_scores, *show_help);
        }
        Screen::Playing { session } => {
            render_game(frame, session);
        }
    }
}

/// Render the in-game screen
fn render_game(frame: &mut Frame, session: &GameSession) {
    let area = frame.area();

    // Main layout: header (3 lines) + content + footer
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title, round, timer
            Constraint::Min(0),    // Puzzle
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    render_header(frame, layout[0], session);

    match session.phase() {
        Phase::Loading => render_notice(frame, layout[1], "Loading words...", Color::DarkGray),
        Phase::Unavailable => render_unavailable(frame, layout[1], &session.feedback),
        Phase::Exhausted => render_exhausted(frame, layout[1], session),
        Phase::Active | Phase::TimedOut | Phase::Quit => render_puzzle(frame, layout[1], session),
    }

    let hints = match session.phase() {
        Phase::TimedOut => "↑↓ Choose  Enter Confirm  R Retry  Q Quit",
        Phase::Exhausted | Phase::Unavailable => "Press any key to return to the menu",
        _ => "Type letters  Backspace Reset  Esc Menu",
    };
    let footer = Paragraph::new(hints)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[2]);

    if let Some(time_up) = &session.time_up {
        render_time_up(frame, area, time_up, session.modal_selected);
    }
}

/// Render the header: title, round, timer
fn render_header(frame: &mut Frame, area: Rect, session: &GameSession) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Split header into: title | round | timer
    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(10), // Title
            Constraint::Min(10),    // Round
            Constraint::Length(10), // Timer
        ])
        .split(inner);

    let state = session.engine.state();

    let title = Paragraph::new(session.engine.difficulty().title())
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Left);
    frame.render_widget(title, header_layout[0]);

    let round = Paragraph::new(format!(
        "Round {}  ({} left)",
        state.round,
        session.engine.words_remaining()
    ))
    .style(Style::default().fg(Color::Cyan))
    .alignment(Alignment::Center);
    frame.render_widget(round, header_layout[1]);

    let timer = Paragraph::new(format_timer(state.time_remaining))
        .style(Style::default().fg(timer_color(state.time_remaining)).bold())
        .alignment(Alignment::Right);
    frame.render_widget(timer, header_layout[2]);
}

/// Render the scrambled word, definition, letters, guess and score
fn render_puzzle(frame: &mut Frame, area: Rect, session: &GameSession) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Scrambled word
            Constraint::Length(1), // Spacer
            Constraint::Length(3), // Definition
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Available letters
            Constraint::Length(1), // Guess
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Feedback
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Score banner
            Constraint::Min(0),    // Remaining space
        ])
        .split(area);

    let state = session.engine.state();

    let scrambled = Paragraph::new(state.scrambled_word().to_uppercase())
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center);
    frame.render_widget(scrambled, layout[0]);

    let definition = Paragraph::new(session.engine.definition().unwrap_or("..."))
        .style(Style::default().fg(Color::White).italic())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(definition, layout[2]);

    let letters = Paragraph::new(format_letter_rack(&state.available))
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);
    frame.render_widget(letters, layout[4]);

    let guess = Paragraph::new(format_guess(&state.guess(), state.current_word.chars().count()))
        .style(Style::default().fg(Color::White).bold())
        .alignment(Alignment::Center);
    frame.render_widget(guess, layout[5]);

    let feedback = Paragraph::new(session.feedback.as_str())
        .style(Style::default().fg(feedback_color(&session.feedback)))
        .alignment(Alignment::Center);
    frame.render_widget(feedback, layout[7]);

    let score = Paragraph::new(format!(
        "Score: {}    High Score: {}",
        state.score, state.high_score
    ))
    .style(Style::default().fg(Color::Magenta).bold())
    .alignment(Alignment::Center);
    frame.render_widget(score, layout[9]);
}

/// Render the time's-up modal over the puzzle
fn render_time_up(frame: &mut Frame, area: Rect, time_up: &TimeUp, selected: ModalOption) {
    let modal = centered_rect(44, 11, area);
    frame.render_widget(Clear, modal);

    let mut lines = vec![
        Line::from(""),
        Line::from("Time's up!").style(Style::default().fg(Color::Red).bold()),
        Line::from(""),
        Line::from(format!(
            "The correct word was: {}",
            time_up.word.to_uppercase()
        )),
    ];
    if time_up.new_high_score {
        lines.push(
            Line::from(format!("NEW High Score: {}", time_up.score))
                .style(Style::default().fg(Color::Yellow).bold()),
        );
    } else {
        lines.push(Line::from(format!("Score: {}", time_up.score)));
    }
    lines.push(Line::from(""));

    let options: Vec<Span> = ModalOption::all()
        .iter()
        .map(|opt| {
            if *opt == selected {
                Span::styled(
                    format!("[ {} ]", opt.label()),
                    Style::default().fg(Color::Yellow).bold(),
                )
            } else {
                Span::styled(
                    format!("  {}  ", opt.label()),
                    Style::default().fg(Color::White),
                )
            }
        })
        .collect();
    lines.push(Line::from(options));

    let body = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(body, modal);
}

/// Render the screen shown after the last word is solved
fn render_exhausted(frame: &mut Frame, area: Rect, session: &GameSession) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(area);

    let title = Paragraph::new(EXHAUSTED_MESSAGE)
        .style(Style::default().fg(Color::Green).bold())
        .alignment(Alignment::Center);
    frame.render_widget(title, layout[1]);

    let state = session.engine.state();
    let score = Paragraph::new(format!(
        "Final Score: {}    High Score: {}",
        state.score, state.high_score
    ))
    .style(Style::default().fg(Color::Yellow).bold())
    .alignment(Alignment::Center);
    frame.render_widget(score, layout[2]);
}

/// Render the word-list error screen
fn render_unavailable(frame: &mut Frame, area: Rect, reason: &str) {
    render_notice(frame, area, reason, Color::Red);
}

/// Single centred message
fn render_notice(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Percentage(40),
        ])
        .margin(2)
        .split(area);

    let notice = Paragraph::new(message)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(notice, layout[1]);
}

/// A `width` x `height` rectangle centred in `area`, clipped to fit
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Format the available letters for display
fn format_letter_rack(letters: &[char]) -> String {
    if letters.is_empty() {
        return String::new();
    }

    let letters_str: String = letters
        .iter()
        .map(|c| c.to_ascii_uppercase().to_string())
        .collect::<Vec<_>>()
        .join(" ");

    format!("[ {} ]", letters_str)
}

/// Guess so far, padded with underscores to the word length
fn format_guess(guess: &str, word_len: usize) -> String {
    let mut cells: Vec<String> = guess
        .chars()
        .map(|c| c.to_ascii_uppercase().to_string())
        .collect();
    while cells.len() < word_len {
        cells.push("_".to_string());
    }
    cells.join(" ")
}

/// Format the timer display
fn format_timer(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", mins, secs)
}

fn timer_color(seconds: u32) -> Color {
    if seconds <= 10 {
        Color::Red
    } else if seconds <= 30 {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn feedback_color(feedback: &str) -> Color {
    if feedback.starts_with("OK") {
        Color::Green
    } else if feedback == WRONG_ANSWER_MESSAGE {
        Color::Red
    } else {
        Color::White
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::words::Lexicon;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn screen_text(coordinator: &AppCoordinator) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal
            .draw(|frame| render(frame, coordinator, Instant::now()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn coordinator() -> AppCoordinator {
        let lexicon = Arc::new(Lexicon::parse("cloud\tWater in the sky.\n"));
        AppCoordinator::new(Box::new(MemoryStore::new()), lexicon.clone(), lexicon, false)
    }

    #[test]
    fn test_format_timer() {
        assert_eq!(format_timer(120), "2:00");
        assert_eq!(format_timer(65), "1:05");
        assert_eq!(format_timer(9), "0:09");
    }

    #[test]
    fn test_format_letter_rack() {
        assert_eq!(format_letter_rack(&['a', 'c', 't']), "[ A C T ]");
        assert_eq!(format_letter_rack(&[]), "");
    }

    #[test]
    fn test_format_guess_pads_to_length() {
        assert_eq!(format_guess("ca", 3), "C A _");
        assert_eq!(format_guess("", 2), "_ _");
        assert_eq!(format_guess("dog", 3), "D O G");
    }

    #[test]
    fn test_centered_rect_clips() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(50, 50, area), area);
    }

    #[test]
    fn test_feedback_colors() {
        assert_eq!(feedback_color("OK +200 (CAT)"), Color::Green);
        assert_eq!(feedback_color(WRONG_ANSWER_MESSAGE), Color::Red);
        assert_eq!(feedback_color(""), Color::White);
    }

    #[test]
    fn test_menu_renders_options() {
        let text = screen_text(&coordinator());
        assert!(text.contains("How To Play"));
        assert!(text.contains("Best: 0"));
    }

    #[test]
    fn test_game_renders_title() {
        let mut app = coordinator();
        app.start_game(crate::game::Level::Medium);
        let text = screen_text(&app);
        assert!(text.contains("MEDIUM"));
        assert!(text.contains("Round 1"));
        assert!(text.contains("1:30"));
    }
}

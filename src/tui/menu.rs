//! Splash and main menu rendering

use crate::app::{MenuOption, HOW_TO_PLAY};
use crate::game::Level;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use super::ui::centered_rect;

const LOGO: &str = r#"
                     ____
  __ _ _ __   __ _  / ___|_ __ __ _ _ __ ___  ___
 / _` | '_ \ / _` || |  _| '__/ _` | '_ ` _ \/ __|
| (_| | | | | (_| || |_| | | | (_| | | | | | \__ \
 \__,_|_| |_|\__,_| \____|_|  \__,_|_| |_| |_|___/
"#;

/// Logo colour at full opacity
const LOGO_RGB: (u8, u8, u8) = (255, 200, 40);

/// Render the splash logo, dimmed by `opacity` (1.0 = full)
pub fn render_splash(frame: &mut Frame, opacity: f32) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(7),
            Constraint::Min(0),
        ])
        .split(area);

    let logo = Paragraph::new(LOGO)
        .style(Style::default().fg(dimmed(LOGO_RGB, opacity)).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo, layout[1]);
}

/// Scale an RGB colour towards black
fn dimmed((r, g, b): (u8, u8, u8), opacity: f32) -> Color {
    let k = opacity.clamp(0.0, 1.0);
    let scale = |c: u8| (c as f32 * k).round() as u8;
    Color::Rgb(scale(r), scale(g), scale(b))
}

/// Render the main menu with the best score next to each level
pub fn render_menu(frame: &mut Frame, selected: usize, best_scores: &[(Level, u32)], show_help: bool) {
    let area = frame.area();

    // Main layout
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Logo
            Constraint::Length(1), // Spacer
            Constraint::Min(6),    // Menu options
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let logo = Paragraph::new(LOGO)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo, layout[0]);

    // Menu options
    let items: Vec<ListItem> = MenuOption::all()
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == selected { "> " } else { "  " };
            ListItem::new(menu_line(prefix, *opt, best_scores)).style(style)
        })
        .collect();

    let menu_width = 32.min(layout[2].width);
    let menu_area = Rect {
        x: layout[2].x + (layout[2].width - menu_width) / 2,
        width: menu_width,
        ..layout[2]
    };
    frame.render_widget(List::new(items), menu_area);

    // Footer
    let footer = Paragraph::new("↑↓ Navigate  Enter Select  Esc Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[3]);

    if show_help {
        render_how_to_play(frame, area);
    }
}

/// One menu row: label, plus the best score for level options
fn menu_line(prefix: &str, option: MenuOption, best_scores: &[(Level, u32)]) -> String {
    let best = option
        .level()
        .and_then(|level| best_scores.iter().find(|(l, _)| *l == level))
        .map(|(_, score)| *score);

    match best {
        Some(score) => format!("{}{:<12}Best: {}", prefix, option.label(), score),
        None => format!("{}{}", prefix, option.label()),
    }
}

/// How To Play modal
fn render_how_to_play(frame: &mut Frame, area: Rect) {
    let modal = centered_rect(60, 9, area);
    frame.render_widget(Clear, modal);

    let mut lines: Vec<Line> = vec![Line::from("")];
    lines.extend(HOW_TO_PLAY.iter().map(|rule| Line::from(format!("• {}", rule))));
    lines.push(Line::from(""));
    lines.push(Line::from("Press any key to close").style(Style::default().fg(Color::DarkGray)));

    let help = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" How To Play "),
        );
    frame.render_widget(help, modal);
}

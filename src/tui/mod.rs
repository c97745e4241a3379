//! Terminal UI components using ratatui

mod menu;
mod terminal;
mod ui;

pub use terminal::Tui;
pub use ui::render;

//! Application state and screen flow

pub mod screen;
pub mod state;

pub use screen::{AppCoordinator, MenuOption, Screen, HOW_TO_PLAY};
pub use state::{GameSession, ModalOption, TimeUp, EXHAUSTED_MESSAGE, WRONG_ANSWER_MESSAGE};

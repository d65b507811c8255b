pub mod game_handler;
pub mod timeout_handler;

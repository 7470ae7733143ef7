// Library exports for the MCTS Battlesnake
// The server binary and the replay tool both build on these modules

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod replay;
pub mod rules;
pub mod search;
pub mod types;

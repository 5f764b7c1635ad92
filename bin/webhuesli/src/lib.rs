mod config;
mod error;
mod input;
mod terminal;

pub use config::Config;
pub use error::Error;
pub use input::{Input, InvalidInput, HELP};
pub use terminal::{
    is_connection_lost, styled, Bell, Console, Outbox, Outgoing, TerminalPanel, TextSurface,
};

pub type Result<T> = std::result::Result<T, Error>;

//! Platform adapters

pub mod console;
pub mod line;

pub use console::ConsoleMessenger;
pub use line::LineClient;

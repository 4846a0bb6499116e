mod config;
mod environment;
mod history;
mod shell;

pub use environment::Environment;
pub use shell::ShellState;

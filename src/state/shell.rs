use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crossterm::style::Stylize;
use log::{debug, warn};

use super::config::Configuration;
use super::environment::Environment;
use super::history::History;
use crate::errors::ShoalError;
use crate::exec::StatusCode;

/// Represents the shell state and provides methods for interacting with it.
/// Owned by the read-eval loop and lent to every command as it runs.
pub struct ShellState {
    pub environment: Environment,
    pub history: History,
    pub config: Configuration,
    /// Cleared by `quit`; the loop ends once the current line finishes
    pub running: bool,
    pub last_status: StatusCode,
}

impl ShellState {
    /// Builds the shell state, reading the configuration from `config_path` or from the
    /// default location when none is given
    pub fn new(config_path: Option<&Path>) -> Self {
        let environment = Environment::new();
        let config = load_config(config_path, environment.home());

        Self {
            history: History::new(config.history_limit),
            environment,
            config,
            running: true,
            last_status: StatusCode::success(),
        }
    }

    /// Generates the prompt string used by the `LineEditor`
    pub fn generate_prompt(&self) -> String {
        let cwd = match std::env::current_dir() {
            Ok(path) => self.environment.collapse_home(&path),
            Err(_) => "?".to_owned(),
        };

        let prompt_delimiter = match self.config.multi_line_prompt {
            true => "\n",
            false => "",
        };

        let (open, close, tick) = match self.last_status.is_success() {
            true => ("[".dark_grey(), "]".dark_grey(), "%".green()),
            false => ("[".red(), "]".red(), "%".red()),
        };

        format!(
            "{}{}@{}:{}{}{}{} ",
            open,
            self.environment.user().dark_blue(),
            self.environment.host().dark_blue(),
            cwd.dark_green(),
            close,
            prompt_delimiter,
            tick.bold(),
        )
    }

    /// Prints an error to stderr, coloured only when stderr is a terminal
    pub fn report(&self, error: &ShoalError) {
        let message = match self.config.show_errors {
            true => format!("shoal: [{}] {}", error.kind_name(), error),
            false => format!("shoal: {}", error),
        };

        let mut stderr = io::stderr();
        let written = match stderr.is_terminal() {
            true => writeln!(stderr, "{}", message.as_str().red()),
            false => writeln!(stderr, "{}", message),
        };

        if let Err(io_error) = written {
            warn!("Could not report '{}': {}", message, io_error);
        }
    }
}

// A missing default file is normal; anything else wrong with the configuration is worth a warning
fn load_config(config_path: Option<&Path>, home: &Path) -> Configuration {
    let (path, explicit) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (Configuration::default_path(home), false),
    };

    if !explicit && !path.exists() {
        debug!("No configuration file at {}", path.display());
        return Configuration::default();
    }

    match Configuration::from_file(&path) {
        Ok(config) => {
            debug!("Loaded configuration from {}: {:?}", path.display(), config);
            config
        }
        Err(error) => {
            warn!("{}; using the default configuration", error);
            Configuration::default()
        }
    }
}

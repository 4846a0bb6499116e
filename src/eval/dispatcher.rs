use log::debug;

use super::parser::parse_line;
use super::validator::Validator;
use crate::exec::{Builtins, Context, Runnable, StatusCode};
use crate::state::ShellState;

/// Takes logical lines from the read loop through validation, parsing and execution
#[derive(Default)]
pub struct Dispatcher {
    validator: Validator,
    builtins: Builtins,
}

impl Dispatcher {
    /// Evaluates and executes a whole logical line, returning the status of its last command.
    /// Rejected lines run nothing and are not archived.
    pub fn eval(&self, shell: &mut ShellState, line: &str) -> StatusCode {
        let line = line.trim();
        if line.is_empty() {
            return shell.last_status;
        }

        if let Err(error) = self.validator.validate(line) {
            shell.report(&error);
            shell.last_status = StatusCode::SYNTAX;
            return shell.last_status;
        }

        let commands = parse_line(line);
        debug!("Parsed {:?} into {:?}", line, commands);

        let mut status = StatusCode::success();
        let mut context = Context::new(shell, &self.builtins);
        // * Each `;` unit runs regardless of how the previous one ended
        for command in &commands {
            status = command.run(&mut context);
        }

        shell.history.push(line);
        shell.environment.refresh_identity();
        shell.last_status = status;
        status
    }
}

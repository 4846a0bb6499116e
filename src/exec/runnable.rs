use super::builtins::Builtins;
use super::StatusCode;
use crate::eval::parser::Command;
use crate::state::ShellState;

/// Everything a command may touch while it runs
pub struct Context<'a> {
    pub shell: &'a mut ShellState,
    pub builtins: &'a Builtins,
}

impl<'a> Context<'a> {
    pub fn new(shell: &'a mut ShellState, builtins: &'a Builtins) -> Self {
        Self { shell, builtins }
    }
}

/// Represents any node of a parsed command line.
/// A `Runnable` always runs to completion and never fails outright:
/// errors are reported as they happen and become a failing status.
pub trait Runnable {
    fn run(&self, context: &mut Context<'_>) -> StatusCode;
}

impl Runnable for Command {
    fn run(&self, context: &mut Context<'_>) -> StatusCode {
        match self {
            Command::Basic(command) => command.run(context),
            Command::Logic(tree) => tree.run(context),
            Command::Pipeline(pipeline) => pipeline.run(context),
        }
    }
}

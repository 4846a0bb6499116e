use log::{debug, trace};

use super::descriptors::DescriptorSnapshot;
use super::executable::spawn_and_wait;
use super::redirect;
use super::runnable::{Context, Runnable};
use super::terminal::restore_echo;
use super::StatusCode;
use crate::errors::Result;
use crate::eval::parser::BasicCommand;
use crate::state::Environment;

/// Name of the builtin that declares variables; its own arguments are never substituted
const DECLARATION_BUILTIN: &str = "addenv";

impl Runnable for BasicCommand {
    fn run(&self, context: &mut Context<'_>) -> StatusCode {
        let mut tokens: Vec<String> = self.line().split_whitespace().map(str::to_owned).collect();
        if tokens.is_empty() {
            return StatusCode::success();
        }

        substitute(&context.shell.environment, &mut tokens);
        debug!("Running {:?}", tokens);

        // * Errors are reported only after the snapshot has been dropped,
        // * so they reach the shell's own stderr rather than a redirected one
        match execute(tokens, context) {
            Ok(status) => status,
            Err(error) => {
                context.shell.report(&error);
                StatusCode::failure()
            }
        }
    }
}

/// Replaces whole tokens that name a stored variable.
/// The declaration builtin and the name it declares are left alone.
fn substitute(environment: &Environment, tokens: &mut [String]) {
    let skipped = match tokens.first().map(String::as_str) {
        Some(DECLARATION_BUILTIN) => 2,
        _ => 0,
    };

    let skipped = skipped.min(tokens.len());
    trace!("Substituting in {:?}", &tokens[skipped..]);
    environment.substitute(&mut tokens[skipped..]);
}

fn execute(tokens: Vec<String>, context: &mut Context<'_>) -> Result<StatusCode> {
    let _snapshot = DescriptorSnapshot::standard()?;
    let arguments = redirect::resolve(tokens)?;

    let Some(name) = arguments.first() else {
        return Ok(StatusCode::success());
    };

    match context.builtins.resolve(name) {
        Some(builtin) => {
            restore_echo();
            // Builtin failures are reported while the command's own redirections are in place
            match builtin.run(context.shell, &arguments) {
                Ok(()) => Ok(StatusCode::success()),
                Err(error) => {
                    context.shell.report(&error);
                    Ok(StatusCode::failure())
                }
            }
        }
        None => spawn_and_wait(&arguments),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::exec::builtins::Builtins;
    use crate::exec::descriptors::lock_descriptors;
    use crate::state::ShellState;

    fn tokens(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_owned).collect()
    }

    fn shell() -> ShellState {
        ShellState::new(Some(Path::new("/nonexistent/shoal/config")))
    }

    fn run(shell: &mut ShellState, line: &str) -> StatusCode {
        let builtins = Builtins::default();
        let mut context = Context::new(shell, &builtins);
        BasicCommand::new(line).run(&mut context)
    }

    #[test]
    fn test_declaration_arguments_are_not_substituted() {
        let mut environment = Environment::new();
        environment.set("$X", "1");
        environment.set("$Y", "2");

        let mut declaration = tokens("addenv $X $Y");
        substitute(&environment, &mut declaration);
        assert_eq!(declaration, tokens("addenv $X 2"));

        let mut ordinary = tokens("$X $Y addenv");
        substitute(&environment, &mut ordinary);
        assert_eq!(ordinary, tokens("1 2 addenv"));
    }

    #[test]
    fn test_blank_line_is_a_no_op() {
        let mut shell = shell();
        assert_eq!(run(&mut shell, "   "), StatusCode::success());
    }

    #[test]
    fn test_builtin_status() {
        let _guard = lock_descriptors();
        let mut shell = shell();

        assert_eq!(run(&mut shell, "addenv $NAME shoal"), StatusCode::success());
        assert_eq!(shell.environment.get("$NAME"), Some("shoal"));
        assert_eq!(run(&mut shell, "addenv NAME shoal"), StatusCode::failure());
        assert_eq!(run(&mut shell, "quit now"), StatusCode::failure());
        assert!(shell.running);
    }

    #[test]
    fn test_external_status() {
        let _guard = lock_descriptors();
        let mut shell = shell();

        assert_eq!(run(&mut shell, "true"), StatusCode::success());
        assert_eq!(run(&mut shell, "false"), StatusCode::failure());
    }

    #[test]
    fn test_redirection_failure_does_not_run_command() {
        let _guard = lock_descriptors();
        let mut shell = shell();

        assert_eq!(run(&mut shell, "quit < /nonexistent/shoal/input"), StatusCode::failure());
        assert!(shell.running);
    }

    #[test]
    fn test_only_redirections_is_a_no_op() {
        let _guard = lock_descriptors();
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("touched");
        let mut shell = shell();

        let status = run(&mut shell, &format!("> {}", path.display()));
        assert_eq!(status, StatusCode::success());
        assert!(path.exists());
    }
}

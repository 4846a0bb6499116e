use log::debug;

use super::runnable::{Context, Runnable};
use super::StatusCode;
use crate::eval::parser::{LogicNode, LogicOperator};

impl Runnable for LogicNode {
    fn run(&self, context: &mut Context<'_>) -> StatusCode {
        match self {
            LogicNode::Leaf(command) => command.run(context),
            LogicNode::Operator {
                operator,
                left,
                right,
            } => {
                let status = left.run(context);
                let proceed = match operator {
                    LogicOperator::And => status.is_success(),
                    LogicOperator::Or => !status.is_success(),
                };

                match proceed {
                    true => right.run(context),
                    false => {
                        debug!("Skipping the right side of {} after status {}", operator, status);
                        status
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::eval::parser::Command;
    use crate::exec::builtins::Builtins;
    use crate::exec::descriptors::lock_descriptors;
    use crate::state::ShellState;

    fn evaluate(shell: &mut ShellState, line: &str) -> StatusCode {
        let builtins = Builtins::default();
        let mut context = Context::new(shell, &builtins);
        Command::parse(line).run(&mut context)
    }

    fn shell() -> ShellState {
        ShellState::new(Some(Path::new("/nonexistent/shoal/config")))
    }

    #[test]
    fn test_and_skips_right_after_failure() {
        let _guard = lock_descriptors();
        let mut shell = shell();

        assert_eq!(evaluate(&mut shell, "false && addenv $RAN yes"), StatusCode::failure());
        assert_eq!(shell.environment.get("$RAN"), None);
    }

    #[test]
    fn test_or_skips_right_after_success() {
        let _guard = lock_descriptors();
        let mut shell = shell();

        assert_eq!(evaluate(&mut shell, "true || addenv $RAN yes"), StatusCode::success());
        assert_eq!(shell.environment.get("$RAN"), None);

        assert_eq!(evaluate(&mut shell, "false || addenv $RAN yes"), StatusCode::success());
        assert_eq!(shell.environment.get("$RAN"), Some("yes"));
    }

    #[test]
    fn test_leftmost_operator_groups_the_rest() {
        let _guard = lock_descriptors();
        let mut shell = shell();

        // Parsed as `false && (true || true)`
        assert_eq!(evaluate(&mut shell, "false && true || true"), StatusCode::failure());
    }

    #[test]
    fn test_leaf_is_a_pass_through() {
        let _guard = lock_descriptors();
        let mut shell = shell();

        assert_eq!(evaluate(&mut shell, "false"), StatusCode::failure());
        assert_eq!(evaluate(&mut shell, "true"), StatusCode::success());
    }
}

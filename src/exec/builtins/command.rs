use crate::errors::Result;
use crate::state::ShellState;

/// Signature shared by every builtin: the shell state and the full argument vector,
/// including the builtin's own name
pub type BuiltinFunction = fn(&mut ShellState, &[String]) -> Result<()>;

/// Represents a builtin function and the name it is invoked by
pub struct Builtin {
    pub name: &'static str,
    function: BuiltinFunction,
}

impl Builtin {
    pub fn new(name: &'static str, function: BuiltinFunction) -> Self {
        Self { name, function }
    }

    /// Runs the builtin in-process; builtins never spawn a child
    pub fn run(&self, shell: &mut ShellState, arguments: &[String]) -> Result<()> {
        (self.function)(shell, arguments)
    }
}

#[macro_use]
mod args;
mod command;
mod functions;

pub use command::{Builtin, BuiltinFunction};

/// The fixed table of builtin commands, built once at startup
pub struct Builtins {
    commands: Vec<Builtin>,
}

impl Default for Builtins {
    fn default() -> Self {
        let mut builtins = Self {
            commands: Vec::new(),
        };

        builtins.add_builtin("cd", functions::change_directory);
        builtins.add_builtin("echo", functions::echo);
        builtins.add_builtin("exit", functions::exit);
        builtins.add_builtin("pwd", functions::working_directory);
        builtins.add_builtin("history", functions::history);
        builtins.add_builtin("addenv", functions::add_environment_variable);
        builtins.add_builtin("quit", functions::quit);

        builtins
    }
}

impl Builtins {
    fn add_builtin(&mut self, name: &'static str, function: BuiltinFunction) {
        self.commands.push(Builtin::new(name, function))
    }

    /// Attempts to locate a builtin by name
    pub fn resolve(&self, name: &str) -> Option<&Builtin> {
        self.commands.iter().find(|builtin| builtin.name == name)
    }
}

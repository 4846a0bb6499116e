/*
Builtins run inside the shell process itself, so unlike external programs they can read and change
the shell's state: its working directory, its variables and whether it keeps running.
Each one receives the whole argument vector, its own name included, which is what clap expects.
 */

use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;

use log::debug;

use super::args::{
    AddEnvironmentArgs, ChangeDirectoryArgs, ExitArgs, HistoryArgs, QuitArgs,
    WorkingDirectoryArgs,
};
use crate::errors::{Handle, Result};
use crate::state::ShellState;

pub fn change_directory(shell: &mut ShellState, args: &[String]) -> Result<()> {
    let arguments = clap_handle!(ChangeDirectoryArgs, args);
    let target = match arguments.path.as_deref() {
        None => shell.environment.home().to_path_buf(),
        Some("-") => shell
            .environment
            .previous_directory()
            .replace_err(|| builtin_err!(PreviousDirectoryNotSet))?
            .to_path_buf(),
        Some(path) => PathBuf::from(path),
    };

    shell.environment.change_directory(&target)
}

// * echo takes no options, so `-h` and friends are printed like any other word
pub fn echo(_shell: &mut ShellState, args: &[String]) -> Result<()> {
    match args.len() > 1 {
        true => write_line(&mut io::stdout().lock(), "echo", args[1..].join(" ")),
        false => Ok(()),
    }
}

pub fn exit(_shell: &mut ShellState, args: &[String]) -> Result<()> {
    let arguments = clap_handle!(ExitArgs, args);
    let code = arguments.code.unwrap_or(0);

    debug!("Exiting with status {}", code);
    let _ = io::stdout().flush();
    std::process::exit(code);
}

pub fn working_directory(_shell: &mut ShellState, args: &[String]) -> Result<()> {
    clap_handle!(WorkingDirectoryArgs, args);
    let cwd = std::env::current_dir().replace_err(|| builtin_err!(FailedToReadDirectory))?;
    write_line(&mut io::stdout().lock(), "pwd", cwd.display())
}

pub fn history(shell: &mut ShellState, args: &[String]) -> Result<()> {
    clap_handle!(HistoryArgs, args);
    let mut stdout = io::stdout().lock();
    for (number, line) in shell.history.entries() {
        write_line(&mut stdout, "history", format_args!(" {}  {}", number, line))?;
    }

    Ok(())
}

pub fn add_environment_variable(shell: &mut ShellState, args: &[String]) -> Result<()> {
    let arguments = clap_handle!(AddEnvironmentArgs, args);
    if !arguments.name.starts_with('$') {
        return Err(builtin_err!(InvalidUsage("addenv $NAME VALUE".to_owned())));
    }

    shell.environment.set(&arguments.name, &arguments.value);
    Ok(())
}

pub fn quit(shell: &mut ShellState, args: &[String]) -> Result<()> {
    clap_handle!(QuitArgs, args);
    shell.running = false;
    Ok(())
}

// * Output may be redirected somewhere that refuses it, which fails the builtin and not the shell
fn write_line(out: &mut impl Write, builtin: &str, line: impl Display) -> Result<()> {
    writeln!(out, "{}", line)
        .and_then(|_| out.flush())
        .map_err(|error| builtin_err!(FailedToWrite(builtin.to_owned(), error)))
}

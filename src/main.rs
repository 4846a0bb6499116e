#[macro_use]
mod errors;
mod cli;
mod eval;
mod exec;
mod state;

use clap::Parser;
use log::{debug, warn};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

use cli::Cli;
use eval::{Dispatcher, LineEditor};
use state::ShellState;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    catch_interrupts();

    // The ShellState type stores all of the state for the shell, including its configuration,
    // its variables and the history of accepted lines
    let mut shell = ShellState::new(cli.config.as_deref());
    // The Dispatcher type is responsible for validating and parsing a line and then running
    // the resulting commands as builtins or external programs
    let dispatcher = Dispatcher::default();

    if let Some(line) = cli.command {
        let status = dispatcher.eval(&mut shell, &line);
        std::process::exit(status.code());
    }

    // The LineEditor type is responsible for reading lines of input from the user,
    // joining continuation lines and keeping in-session history
    let mut line_editor = LineEditor::new();
    while shell.running {
        let Some(line) = line_editor.prompt_and_read_line(&shell) else {
            debug!("End of input");
            break;
        };

        dispatcher.eval(&mut shell, &line);
    }

    std::process::exit(shell.last_status.code());
}

extern "C" fn on_interrupt(_: nix::libc::c_int) {}

// * An interrupt should stop the foreground program, never the shell itself.
// * A caught signal reverts to its default action in exec'd children, so they still receive it
fn catch_interrupts() {
    let action = SigAction::new(
        SigHandler::Handler(on_interrupt),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );

    // SAFETY: the handler does nothing, so it cannot touch any state the main thread relies on
    if let Err(errno) = unsafe { sigaction(Signal::SIGINT, &action) } {
        warn!("Failed to install the interrupt handler: {}", errno.desc());
    }
}

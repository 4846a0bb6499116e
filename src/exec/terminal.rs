use std::io::{self, IsTerminal};

use log::{debug, warn};
use nix::sys::termios::{tcgetattr, tcsetattr, LocalFlags, SetArg};

/// Turns terminal echo back on if a previous foreground program left it off.
/// Does nothing when stdin is not a terminal.
pub fn restore_echo() {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return;
    }

    let mut attributes = match tcgetattr(&stdin) {
        Ok(attributes) => attributes,
        Err(errno) => {
            warn!("Failed to read terminal attributes: {}", errno.desc());
            return;
        }
    };

    if attributes.local_flags.contains(LocalFlags::ECHO) {
        return;
    }

    debug!("Re-enabling terminal echo");
    attributes.local_flags.insert(LocalFlags::ECHO);
    if let Err(errno) = tcsetattr(&stdin, SetArg::TCSANOW, &attributes) {
        warn!("Failed to re-enable terminal echo: {}", errno.desc());
    }
}

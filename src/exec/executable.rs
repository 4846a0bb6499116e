use std::ffi::CString;
use std::io::{self, Write};

use log::debug;
use nix::errno::Errno;
use nix::libc;
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{execvp, fork, write, ForkResult, Pid};

use super::StatusCode;
use crate::errors::{Handle, Result};

/// Runs an external program in a child process and blocks until it finishes.
/// `arguments[0]` is looked up in `PATH`; the child inherits the current standard descriptors.
pub fn spawn_and_wait(arguments: &[String]) -> Result<StatusCode> {
    let argv = arguments
        .iter()
        .map(|argument| {
            CString::new(argument.as_bytes())
                .replace_err(|| spawn_err!(InvalidArgument(argument.clone())))
        })
        .collect::<Result<Vec<_>>>()?;

    let Some(program) = argv.first() else {
        return Ok(StatusCode::success());
    };

    // * Everything the child needs is allocated before forking,
    // * since the child may only make async-signal-safe calls
    let failure_prefix = format!("shoal: {}: ", arguments[0]);
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();

    // SAFETY: the child branch only calls signal, execvp, write and _exit
    match unsafe { fork() }.map_err(|errno| spawn_err!(FailedToFork(errno)))? {
        ForkResult::Child => {
            // The shell ignores SIGPIPE, and ignored signals survive exec
            // SAFETY: resetting a disposition is async-signal-safe
            let _ = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) };

            let errno = match execvp(program, &argv) {
                Ok(never) => match never {},
                Err(errno) => errno,
            };

            let stderr = io::stderr();
            let _ = write(&stderr, failure_prefix.as_bytes());
            let _ = write(&stderr, errno.desc().as_bytes());
            let _ = write(&stderr, b"\n");

            // SAFETY: _exit skips the parent's atexit handlers and buffers, which the child must not run
            unsafe { libc::_exit(StatusCode::NOT_EXECUTABLE.code()) }
        }
        ForkResult::Parent { child } => {
            debug!("Spawned {:?} as pid {}", arguments, child);
            wait_for(child)
        }
    }
}

// Stopped and continued children are not finished, so keep waiting
fn wait_for(child: Pid) -> Result<StatusCode> {
    loop {
        match waitpid(child, Some(WaitPidFlag::WUNTRACED)) {
            Ok(WaitStatus::Exited(_, code)) => {
                debug!("Pid {} exited with {}", child, code);
                return Ok(StatusCode::new(code));
            }
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                debug!("Pid {} was killed by {}", child, signal);
                return Ok(StatusCode::from_signal(signal as i32));
            }
            Ok(status) => debug!("Pid {} is not finished yet: {:?}", child, status),
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(spawn_err!(FailedToWait(errno))),
        }
    }
}

use std::io::{self, Write};
use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};

use log::{debug, warn};
use nix::fcntl::{fcntl, FcntlArg};
use nix::unistd::dup2;

use crate::errors::Result;
use crate::eval::symbols::{STDERR, STDIN, STDOUT};

// Saved copies are placed above the range a command is likely to address directly
const SAVED_FD_FLOOR: RawFd = 10;

/// Copies of some of the standard descriptors taken before a command rewires them.
/// Dropping the snapshot puts every captured slot back the way it was,
/// whichever way the command finished.
pub struct DescriptorSnapshot {
    saved: Vec<(RawFd, OwnedFd)>,
}

impl DescriptorSnapshot {
    pub fn capture(fds: &[RawFd]) -> Result<Self> {
        flush_standard_streams();

        let mut saved = Vec::with_capacity(fds.len());
        for &fd in fds {
            // * Close-on-exec keeps the saved copies out of spawned children
            let copy = fcntl(fd, FcntlArg::F_DUPFD_CLOEXEC(SAVED_FD_FLOOR))
                .map_err(|errno| descriptor_err!(FailedToSave(fd, errno)))?;
            // SAFETY: `copy` was just returned by fcntl and nothing else owns it
            saved.push((fd, unsafe { OwnedFd::from_raw_fd(copy) }));
        }

        debug!("Captured descriptors {:?}", fds);
        Ok(Self { saved })
    }

    /// Captures stdin, stdout and stderr
    pub fn standard() -> Result<Self> {
        Self::capture(&[STDIN, STDOUT, STDERR])
    }

    /// Points `fd` back at its captured target while keeping the snapshot alive
    pub fn reinstate(&self, fd: RawFd) -> Result<()> {
        if let Some((_, copy)) = self.saved.iter().find(|(slot, _)| *slot == fd) {
            flush_standard_streams();
            dup2(copy.as_raw_fd(), fd).map_err(|errno| descriptor_err!(FailedToInstall(fd, errno)))?;
        }

        Ok(())
    }
}

impl Drop for DescriptorSnapshot {
    fn drop(&mut self) {
        flush_standard_streams();

        for (fd, copy) in &self.saved {
            if let Err(errno) = dup2(copy.as_raw_fd(), *fd) {
                warn!("Failed to restore descriptor {}: {}", fd, errno.desc());
            }
        }

        debug!(
            "Restored descriptors {:?}",
            self.saved.iter().map(|(fd, _)| *fd).collect::<Vec<_>>()
        );
        // The saved copies are closed as `saved` is dropped
    }
}

/// Moves an open descriptor into a standard slot, closing the original
pub fn install(source: OwnedFd, target: RawFd) -> Result<()> {
    if source.as_raw_fd() == target {
        // Already in place, e.g. a file opened while the slot was closed
        let _ = source.into_raw_fd();
        return Ok(());
    }

    duplicate(source.as_raw_fd(), target)
}

/// Makes `target` refer to whatever `source` currently refers to
pub fn duplicate(source: RawFd, target: RawFd) -> Result<()> {
    flush_standard_streams();
    dup2(source, target).map_err(|errno| descriptor_err!(FailedToInstall(target, errno)))?;

    Ok(())
}

// Buffered output must reach the descriptor it was written for before that descriptor moves
fn flush_standard_streams() {
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
}

/// Serialises tests that rewire the process-wide standard descriptors
#[cfg(test)]
pub static FD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub fn lock_descriptors() -> std::sync::MutexGuard<'static, ()> {
    FD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

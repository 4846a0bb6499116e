use std::os::fd::OwnedFd;

use log::debug;
use nix::fcntl::OFlag;
use nix::unistd::pipe2;

use super::descriptors::{install, DescriptorSnapshot};
use super::runnable::{Context, Runnable};
use super::StatusCode;
use crate::errors::Result;
use crate::eval::parser::{Command, Pipeline};
use crate::eval::symbols::{STDIN, STDOUT};

impl Runnable for Pipeline {
    fn run(&self, context: &mut Context<'_>) -> StatusCode {
        match run_stages(self.stages(), context) {
            Ok(status) => status,
            Err(error) => {
                context.shell.report(&error);
                StatusCode::failure()
            }
        }
    }
}

// * Stages run one after another, each finishing before the next is wired up.
// * A stage that writes more than the pipe buffer holds will block until the
// * reader runs, so this is only suitable for modest amounts of data
fn run_stages(stages: &[Command], context: &mut Context<'_>) -> Result<StatusCode> {
    let boundary = DescriptorSnapshot::capture(&[STDIN, STDOUT])?;

    let mut upstream: Option<OwnedFd> = None;
    let mut status = StatusCode::success();
    for (index, stage) in stages.iter().enumerate() {
        if let Some(read_end) = upstream.take() {
            install(read_end, STDIN)?;
        }

        if index + 1 == stages.len() {
            boundary.reinstate(STDOUT)?;
        } else {
            let (read_end, write_end) =
                pipe2(OFlag::O_CLOEXEC).map_err(|errno| descriptor_err!(FailedToCreatePipe(errno)))?;
            install(write_end, STDOUT)?;
            upstream = Some(read_end);
        }

        status = stage.run(context);
        debug!("Pipeline stage {} finished with {}", index + 1, status);
    }

    Ok(status)
}

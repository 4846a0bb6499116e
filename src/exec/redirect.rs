use std::fs::{File, OpenOptions};
use std::os::fd::{OwnedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;

use log::debug;

use super::descriptors::{duplicate, install};
use crate::errors::{Handle, Result};
use crate::eval::symbols::{OpenMode, RedirectSymbol, DESCRIPTOR_TARGETS};

/// Permission bits for files created by output redirections (rw-r--r--)
const CREATED_FILE_MODE: u32 = 0o644;

/// Where a redirection points its standard slot
#[derive(Debug, PartialEq, Eq)]
pub enum Target {
    File(String),
    /// One of the standard descriptors, duplicated rather than opened
    Descriptor(RawFd),
}

/// One I/O redirection taken from a command's tokens
#[derive(Debug, PartialEq, Eq)]
pub struct Directive {
    symbol: RedirectSymbol,
    target: Target,
}

impl Directive {
    fn new(symbol: RedirectSymbol, filename: String) -> Result<Self> {
        let descriptor = DESCRIPTOR_TARGETS
            .iter()
            .find(|(literal, _)| *literal == filename)
            .map(|&(_, fd)| fd);

        let target = match descriptor {
            Some(_) if symbol.mode() == OpenMode::Append => {
                return Err(redirect_err!(InvalidDuplication(
                    symbol.as_str().to_owned(),
                    filename
                )));
            }
            Some(fd) => Target::Descriptor(fd),
            None if filename.starts_with('&') => return Err(redirect_err!(BadDescriptor(filename))),
            None => Target::File(filename),
        };

        Ok(Self { symbol, target })
    }

    /// Installs the target onto the symbol's standard slot
    pub fn apply(&self) -> Result<()> {
        let slot = self.symbol.target_fd();
        debug!("Redirecting {} {:?} onto descriptor {}", self.symbol.as_str(), self.target, slot);

        match &self.target {
            Target::Descriptor(source) => duplicate(*source, slot),
            Target::File(filename) => {
                let file = open(filename, self.symbol.mode())?;
                install(OwnedFd::from(file), slot)
            }
        }
    }
}

/// Separates redirections from ordinary arguments without touching any descriptor.
/// The filename is the rest of the token after the symbol or, when that is empty, the next token.
pub fn parse_all(tokens: Vec<String>) -> Result<(Vec<String>, Vec<Directive>)> {
    let mut arguments = Vec::with_capacity(tokens.len());
    let mut directives = Vec::new();

    let mut tokens = tokens.into_iter();
    while let Some(token) = tokens.next() {
        let Some(symbol) = RedirectSymbol::match_prefix(&token) else {
            arguments.push(token);
            continue;
        };

        let remainder = &token[symbol.as_str().len()..];
        let filename = match remainder.is_empty() {
            true => tokens
                .next()
                .replace_err(|| redirect_err!(MissingFilename(symbol.as_str().to_owned())))?,
            false => remainder.to_owned(),
        };

        directives.push(Directive::new(symbol, filename)?);
    }

    Ok((arguments, directives))
}

/// Applies every redirection in `tokens` in order and returns the tokens that remain.
/// The caller owns restoring the standard descriptors afterwards.
pub fn resolve(tokens: Vec<String>) -> Result<Vec<String>> {
    let (arguments, directives) = parse_all(tokens)?;
    for directive in &directives {
        directive.apply()?;
    }

    Ok(arguments)
}

fn open(filename: &str, mode: OpenMode) -> Result<File> {
    let mut options = OpenOptions::new();
    match mode {
        OpenMode::Append => options.create(true).append(true),
        OpenMode::Truncate => options.create(true).write(true).truncate(true),
        OpenMode::Read => options.read(true),
    };

    options
        .mode(CREATED_FILE_MODE)
        .open(filename)
        .map_err(|error| redirect_err!(FailedToOpen(filename.to_owned(), error)))
}

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use nix::errno::Errno;
use strum::IntoStaticStr;

/// `Result` alias which automatically uses `ShoalError` as the error type.
pub type Result<T> = std::result::Result<T, ShoalError>;

pub trait Handle<T> {
    /// Replaces any error kind with a new one, without overriding the default error message.
    /// Useful in situations where additional context provides no additional clarity.
    fn replace_err(self, new_error: impl FnOnce() -> ShoalError) -> Result<T>;
    /// Replaces any error kind with a new one, overriding the default error message with the
    /// provided one. Useful in situations where additional context can provide additional clarity.
    fn replace_err_with_msg(self, new_error: impl FnOnce() -> ShoalError, context: &str)
        -> Result<T>;
}

impl<T, E> Handle<T> for std::result::Result<T, E> {
    fn replace_err(self, new_error: impl FnOnce() -> ShoalError) -> Result<T> {
        self.map_err(|_| new_error())
    }

    fn replace_err_with_msg(
        self,
        new_error: impl FnOnce() -> ShoalError,
        context: &str,
    ) -> Result<T> {
        self.map_err(|_| new_error().set_context(context))
    }
}

impl<T> Handle<T> for Option<T> {
    fn replace_err(self, new_error: impl FnOnce() -> ShoalError) -> Result<T> {
        self.ok_or_else(new_error)
    }

    fn replace_err_with_msg(
        self,
        new_error: impl FnOnce() -> ShoalError,
        context: &str,
    ) -> Result<T> {
        self.ok_or_else(|| new_error().set_context(context))
    }
}

/// Error type for the shell.
/// Contains an error kind and optionally a custom message,
/// which is used to override the default error message.
/// No error kind is fatal: every error is reported and converted into a failing status.
#[derive(Debug)]
pub struct ShoalError {
    kind: ErrorKind,
    custom_message: Option<String>,
}

impl Display for ShoalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // If the error has a custom message, use it instead of the default error message.
        match &self.custom_message {
            Some(message) => write!(f, "{}", message),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl ShoalError {
    /// Creates a `ShoalError` with no custom message.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            custom_message: None,
        }
    }

    /// Takes a `ShoalError` and gives it a custom message.
    pub fn set_context(mut self, context: &str) -> Self {
        self.custom_message = Some(context.to_owned());
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Name of the error category, e.g. `Redirect`
    pub fn kind_name(&self) -> &'static str {
        self.kind().into()
    }
}

/// Enum representing every type of error which can occur in the shell.
/// Downstream error variants will typically include data providing basic information
/// about how the error occurred, such as the substring that failed validation.
#[derive(Debug, IntoStaticStr)]
pub enum ErrorKind {
    Syntax(SyntaxError),
    Redirect(RedirectError),
    Descriptor(DescriptorError),
    Spawn(SpawnError),
    Builtin(BuiltinError),
    State(StateError),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Syntax(error) => write!(f, "{}", error),
            ErrorKind::Redirect(error) => write!(f, "{}", error),
            ErrorKind::Descriptor(error) => write!(f, "{}", error),
            ErrorKind::Spawn(error) => write!(f, "{}", error),
            ErrorKind::Builtin(error) => write!(f, "{}", error),
            ErrorKind::State(error) => write!(f, "{}", error),
        }
    }
}

/// Error type for lines rejected before any parsing happens.
/// Every variant carries the exact substring that matched the failing rule.
#[derive(Debug, PartialEq, Eq)]
pub enum SyntaxError {
    UnrecognizedSequence(String),
    EmptyCommand(String),
    MalformedRedirection(String),
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxError::UnrecognizedSequence(sequence) => write!(
                f,
                "syntax error: unrecognized sequence of special characters: '{}'",
                sequence
            ),
            SyntaxError::EmptyCommand(sequence) => {
                write!(f, "syntax error: missing command around '{}'", sequence)
            }
            SyntaxError::MalformedRedirection(sequence) => {
                write!(f, "syntax error: malformed redirection: '{}'", sequence)
            }
        }
    }
}

/// Error type for errors which occur while resolving I/O redirections.
#[derive(Debug)]
pub enum RedirectError {
    MissingFilename(String),
    BadDescriptor(String),
    InvalidDuplication(String, String),
    FailedToOpen(String, std::io::Error),
}

impl Display for RedirectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RedirectError::MissingFilename(symbol) => {
                write!(f, "missing filename after '{}'", symbol)
            }
            RedirectError::BadDescriptor(target) => write!(f, "{}: bad file descriptor", target),
            RedirectError::InvalidDuplication(symbol, target) => {
                write!(f, "cannot duplicate '{}' with '{}'", target, symbol)
            }
            RedirectError::FailedToOpen(filename, error) => {
                write!(f, "{}: {}", filename, describe_io_error(error))
            }
        }
    }
}

/// Error type for failures of the descriptor plumbing itself (dup, dup2, pipe).
#[derive(Debug)]
pub enum DescriptorError {
    FailedToSave(i32, Errno),
    FailedToInstall(i32, Errno),
    FailedToCreatePipe(Errno),
}

impl Display for DescriptorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DescriptorError::FailedToSave(fd, errno) => {
                write!(f, "failed to save descriptor {}: {}", fd, errno.desc())
            }
            DescriptorError::FailedToInstall(fd, errno) => {
                write!(f, "failed to install descriptor {}: {}", fd, errno.desc())
            }
            DescriptorError::FailedToCreatePipe(errno) => {
                write!(f, "failed to create pipe: {}", errno.desc())
            }
        }
    }
}

/// Error type for errors which occur while starting or reaping external processes.
/// Failures of the program image itself are reported by the child before it exits.
#[derive(Debug)]
pub enum SpawnError {
    InvalidArgument(String),
    FailedToFork(Errno),
    FailedToWait(Errno),
}

impl Display for SpawnError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SpawnError::InvalidArgument(argument) => {
                write!(f, "{}: argument contains a nul byte", argument)
            }
            SpawnError::FailedToFork(errno) => write!(f, "fork failed: {}", errno.desc()),
            SpawnError::FailedToWait(errno) => write!(f, "wait failed: {}", errno.desc()),
        }
    }
}

/// Error type for errors which occur during execution of builtins.
#[derive(Debug)]
pub enum BuiltinError {
    TooManyArguments(String),
    InvalidUsage(String),
    NoSuchDirectory(PathBuf),
    PreviousDirectoryNotSet,
    FailedToChangeDirectory(PathBuf),
    FailedToReadDirectory,
    FailedToWrite(String, std::io::Error),
}

impl Display for BuiltinError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BuiltinError::TooManyArguments(builtin) => {
                write!(f, "{}: too many arguments", builtin)
            }
            BuiltinError::InvalidUsage(usage) => write!(f, "usage: {}", usage),
            BuiltinError::NoSuchDirectory(path) => {
                write!(f, "cd: {}: No such file or directory", path.display())
            }
            BuiltinError::PreviousDirectoryNotSet => write!(f, "cd: OLDPWD not set"),
            BuiltinError::FailedToChangeDirectory(path) => {
                write!(f, "cd: {}: cannot change directory", path.display())
            }
            BuiltinError::FailedToReadDirectory => {
                write!(f, "pwd: cannot read the current directory")
            }
            BuiltinError::FailedToWrite(builtin, error) => {
                write!(f, "{}: write error: {}", builtin, describe_io_error(error))
            }
        }
    }
}

/// Error type for errors which occur during state operations.
#[derive(Debug)]
pub enum StateError {
    FailedToOpenConfigFile(PathBuf),
    FailedToReadConfigFile(PathBuf),
    MalformedConfigLine(usize, String),
    UnknownConfigKey(String),
    InvalidConfigValue(String, String),
}

impl Display for StateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::FailedToOpenConfigFile(path) => {
                write!(f, "Failed to open configuration file: {}", path.display())
            }
            StateError::FailedToReadConfigFile(path) => {
                write!(f, "Failed to read configuration file: {}", path.display())
            }
            StateError::MalformedConfigLine(number, line) => {
                write!(f, "Malformed configuration line {}: '{}'", number, line)
            }
            StateError::UnknownConfigKey(key) => write!(f, "Unknown configuration key: '{}'", key),
            StateError::InvalidConfigValue(key, value) => {
                write!(f, "Invalid value for '{}': '{}'", key, value)
            }
        }
    }
}

// Strips the "(os error N)" suffix so messages read like the C library's strerror()
fn describe_io_error(error: &std::io::Error) -> String {
    match error.raw_os_error() {
        Some(code) => Errno::from_raw(code).desc().to_owned(),
        None => error.to_string(),
    }
}

/// Shortcut for creating a `ShoalError::Syntax` without explicit imports
macro_rules! syntax_err {
    ($content:expr) => {{
        use crate::errors::ErrorKind;
        use crate::errors::ShoalError;
        use crate::errors::SyntaxError::*;
        ShoalError::new(ErrorKind::Syntax($content))
    }};
}

/// Shortcut for creating a `ShoalError::Redirect` without explicit imports
macro_rules! redirect_err {
    ($content:expr) => {{
        use crate::errors::ErrorKind;
        use crate::errors::RedirectError::*;
        use crate::errors::ShoalError;
        ShoalError::new(ErrorKind::Redirect($content))
    }};
}

/// Shortcut for creating a `ShoalError::Descriptor` without explicit imports
macro_rules! descriptor_err {
    ($content:expr) => {{
        use crate::errors::DescriptorError::*;
        use crate::errors::ErrorKind;
        use crate::errors::ShoalError;
        ShoalError::new(ErrorKind::Descriptor($content))
    }};
}

/// Shortcut for creating a `ShoalError::Spawn` without explicit imports
macro_rules! spawn_err {
    ($content:expr) => {{
        use crate::errors::ErrorKind;
        use crate::errors::ShoalError;
        use crate::errors::SpawnError::*;
        ShoalError::new(ErrorKind::Spawn($content))
    }};
}

/// Shortcut for creating a `ShoalError::Builtin` without explicit imports
macro_rules! builtin_err {
    ($content:expr) => {{
        use crate::errors::BuiltinError::*;
        use crate::errors::ErrorKind;
        use crate::errors::ShoalError;
        ShoalError::new(ErrorKind::Builtin($content))
    }};
}

/// Shortcut for creating a `ShoalError::State` without explicit imports
macro_rules! state_err {
    ($content:expr) => {{
        use crate::errors::ErrorKind;
        use crate::errors::ShoalError;
        use crate::errors::StateError::*;
        ShoalError::new(ErrorKind::State($content))
    }};
}

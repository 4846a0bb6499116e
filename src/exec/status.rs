use std::fmt::{Display, Formatter};

/// Exit status of a command, following the POSIX convention where zero means success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(i32);

impl StatusCode {
    /// Status used for lines rejected by the syntax validator
    pub const SYNTAX: Self = Self(2);
    /// Status a child exits with when its program image could not be loaded
    pub const NOT_EXECUTABLE: Self = Self(127);

    pub fn new(code: i32) -> Self {
        Self(code)
    }

    pub fn success() -> Self {
        Self(0)
    }

    pub fn failure() -> Self {
        Self(1)
    }

    /// Status of a process that was terminated by the given signal number
    pub fn from_signal(signal: i32) -> Self {
        Self(128 + signal)
    }

    pub fn is_success(&self) -> bool {
        self.0 == 0
    }

    pub fn code(&self) -> i32 {
        self.0
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        Self::success()
    }
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

use std::os::fd::RawFd;

use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

// Separators
pub const SEMI: char = ';';
pub const PIPE: char = '|';

// Operators
pub const AND_IF: &str = "&&";
pub const OR_IF: &str = "||";

pub const STDIN: RawFd = 0;
pub const STDOUT: RawFd = 1;
pub const STDERR: RawFd = 2;

/// Literal targets which duplicate an already-open standard descriptor instead of opening a file
pub const DESCRIPTOR_TARGETS: [(&str, RawFd); 3] = [("&0", STDIN), ("&1", STDOUT), ("&2", STDERR)];

/// How the target of a redirection is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Append,
    Truncate,
    Read,
}

/// Every redirection symbol understood by the shell.
/// * Declaration order is matching order: prefixed forms come before bare ones
/// * and the two-character forms before the single-character ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum RedirectSymbol {
    #[strum(serialize = "1>>")]
    StdoutAppend,
    #[strum(serialize = "2>>")]
    StderrAppend,
    #[strum(serialize = ">>")]
    Append,
    #[strum(serialize = "1>")]
    StdoutTruncate,
    #[strum(serialize = "2>")]
    StderrTruncate,
    #[strum(serialize = ">")]
    Truncate,
    #[strum(serialize = "0<")]
    StdinRead,
    #[strum(serialize = "<")]
    Read,
}

impl RedirectSymbol {
    /// Finds the longest symbol the token starts with
    pub fn match_prefix(token: &str) -> Option<Self> {
        Self::iter().find(|symbol| token.starts_with(symbol.as_str()))
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// The standard descriptor slot the redirection replaces
    pub fn target_fd(self) -> RawFd {
        match self {
            Self::StdoutAppend | Self::Append | Self::StdoutTruncate | Self::Truncate => STDOUT,
            Self::StderrAppend | Self::StderrTruncate => STDERR,
            Self::StdinRead | Self::Read => STDIN,
        }
    }

    pub fn mode(self) -> OpenMode {
        match self {
            Self::StdoutAppend | Self::StderrAppend | Self::Append => OpenMode::Append,
            Self::StdoutTruncate | Self::StderrTruncate | Self::Truncate => OpenMode::Truncate,
            Self::StdinRead | Self::Read => OpenMode::Read,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_forms_win() {
        assert_eq!(RedirectSymbol::match_prefix("1>>log"), Some(RedirectSymbol::StdoutAppend));
        assert_eq!(RedirectSymbol::match_prefix("2>&1"), Some(RedirectSymbol::StderrTruncate));
        assert_eq!(RedirectSymbol::match_prefix(">>"), Some(RedirectSymbol::Append));
        assert_eq!(RedirectSymbol::match_prefix(">out"), Some(RedirectSymbol::Truncate));
        assert_eq!(RedirectSymbol::match_prefix("0<in"), Some(RedirectSymbol::StdinRead));
    }

    #[test]
    fn test_plain_words_are_not_symbols() {
        assert_eq!(RedirectSymbol::match_prefix("echo"), None);
        assert_eq!(RedirectSymbol::match_prefix("3>x"), None);
        assert_eq!(RedirectSymbol::match_prefix("a>b"), None);
    }

    #[test]
    fn test_targets_and_modes() {
        assert_eq!(RedirectSymbol::StderrAppend.target_fd(), STDERR);
        assert_eq!(RedirectSymbol::StderrAppend.mode(), OpenMode::Append);
        assert_eq!(RedirectSymbol::Read.target_fd(), STDIN);
        assert_eq!(RedirectSymbol::Truncate.mode(), OpenMode::Truncate);
    }
}

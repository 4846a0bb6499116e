use log::debug;
use regex::Regex;

use crate::errors::{Result, ShoalError};

/// A single rejection rule: a pattern and the error built from the substring it matched
struct Rule {
    pattern: Regex,
    error: fn(String) -> ShoalError,
}

impl Rule {
    fn new(pattern: &str, error: fn(String) -> ShoalError) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("rule patterns are valid regular expressions"),
            error,
        }
    }

    // The first capture group, when present, narrows the match down to the offending text
    fn find<'a>(&self, line: &'a str) -> Option<&'a str> {
        let captures = self.pattern.captures(line)?;
        captures
            .get(1)
            .or_else(|| captures.get(0))
            .map(|matched| matched.as_str())
    }
}

/// Rejects malformed operator sequences before a line is split or parsed.
/// Rules are checked in order and the first match wins.
pub struct Validator {
    rules: Vec<Rule>,
}

impl Default for Validator {
    #[rustfmt::skip]
    fn default() -> Self {
        let rules = vec![
            // Runs of special characters that are never valid operators
            Rule::new(
                r"\|{3,}|&{3,}|[&|]*(?:&\||\|&)[&|]*|[<>]*(?:>>>|<<|<>|><)[<>]*",
                |sequence| syntax_err!(UnrecognizedSequence(sequence)),
            ),
            // Operators with nothing (or only another operator) between them
            Rule::new(
                r"^(?:&&|\|\||\||;)|(?:&&|\|\||\|)\s+(?:&&|\|\||\|)|(?:&&|\|\||\||;)\s*;|;\s*(?:&&|\|\||\|)|(?:&&|\|\||\|)\s*$",
                |sequence| syntax_err!(EmptyCommand(sequence)),
            ),
            // Redirections from a descriptor other than the standard ones
            Rule::new(
                r"(?:^|\s)((?:\d{2,}|[3-9])[<>]|[12]<|0>)",
                |sequence| syntax_err!(MalformedRedirection(sequence)),
            ),
            // Redirection targets that are themselves redirections
            Rule::new(
                r"((?:>>?|<)(?:\s+[^\s<>]*|[^\s<>]+)[<>])",
                |sequence| syntax_err!(MalformedRedirection(sequence)),
            ),
        ];

        Self { rules }
    }
}

impl Validator {
    /// Checks a whole logical line, returning an error naming the offending substring
    pub fn validate(&self, line: &str) -> Result<()> {
        for rule in &self.rules {
            if let Some(sequence) = rule.find(line) {
                debug!("Rejected line {:?} at {:?}", line, sequence);
                return Err((rule.error)(sequence.to_owned()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, SyntaxError};

    fn rejection(line: &str) -> SyntaxError {
        match Validator::default().validate(line) {
            Err(error) => match error.kind() {
                ErrorKind::Syntax(SyntaxError::UnrecognizedSequence(s)) => {
                    SyntaxError::UnrecognizedSequence(s.clone())
                }
                ErrorKind::Syntax(SyntaxError::EmptyCommand(s)) => {
                    SyntaxError::EmptyCommand(s.clone())
                }
                ErrorKind::Syntax(SyntaxError::MalformedRedirection(s)) => {
                    SyntaxError::MalformedRedirection(s.clone())
                }
                other => panic!("unexpected error kind: {:?}", other),
            },
            Ok(()) => panic!("line {:?} was accepted", line),
        }
    }

    #[test]
    fn test_accepts_well_formed_lines() {
        let validator = Validator::default();
        for line in [
            "ls -l",
            "a && b || c",
            "ls | wc -l",
            "cat < in.txt > out.txt 2>&1",
            "echo a >> log; echo b 2>> err",
            "echo trailing ;",
            "cat 0< in | sort 1> out",
        ] {
            assert!(validator.validate(line).is_ok(), "rejected {:?}", line);
        }
    }

    #[test]
    fn test_triple_pipe_names_the_run() {
        assert_eq!(
            rejection("a ||| b"),
            SyntaxError::UnrecognizedSequence("|||".to_owned())
        );
    }

    #[test]
    fn test_mixed_and_long_runs() {
        assert_eq!(rejection("a &&& b"), SyntaxError::UnrecognizedSequence("&&&".to_owned()));
        assert_eq!(rejection("a |& b"), SyntaxError::UnrecognizedSequence("|&".to_owned()));
        assert_eq!(rejection("a &|| b"), SyntaxError::UnrecognizedSequence("&||".to_owned()));
        assert_eq!(rejection("a >>> f"), SyntaxError::UnrecognizedSequence(">>>".to_owned()));
        assert_eq!(rejection("cat << f"), SyntaxError::UnrecognizedSequence("<<".to_owned()));
    }

    #[test]
    fn test_empty_command_between_operators() {
        assert_eq!(rejection("a || && b"), SyntaxError::EmptyCommand("|| &&".to_owned()));
        assert_eq!(rejection("a | | b"), SyntaxError::EmptyCommand("| |".to_owned()));
        assert_eq!(rejection("a ;; b"), SyntaxError::EmptyCommand(";;".to_owned()));
        assert_eq!(rejection("&& a"), SyntaxError::EmptyCommand("&&".to_owned()));
        assert_eq!(rejection("a ||"), SyntaxError::EmptyCommand("||".to_owned()));
    }

    #[test]
    fn test_malformed_redirections() {
        assert_eq!(rejection("ls 3> f"), SyntaxError::MalformedRedirection("3>".to_owned()));
        assert_eq!(rejection("ls 12>> f"), SyntaxError::MalformedRedirection("12>".to_owned()));
        assert_eq!(rejection("cat 1< f"), SyntaxError::MalformedRedirection("1<".to_owned()));
        assert_eq!(rejection("echo > > f"), SyntaxError::MalformedRedirection("> >".to_owned()));
        assert_eq!(rejection("echo >a<b"), SyntaxError::MalformedRedirection(">a<".to_owned()));
    }
}

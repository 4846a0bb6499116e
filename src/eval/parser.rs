use strum::Display;

use super::symbols::{AND_IF, OR_IF, PIPE, SEMI};

/// A command which can be run to completion, producing a status code.
/// The set of variants is fixed: every logical unit of a line parses into exactly one of these.
#[derive(Debug, PartialEq)]
pub enum Command {
    Basic(BasicCommand),
    Logic(LogicNode),
    Pipeline(Pipeline),
}

/// A single command with its arguments and redirections, still in textual form.
/// Tokenizing is deferred until execution so that substitution sees the current environment.
#[derive(Debug, PartialEq)]
pub struct BasicCommand {
    line: String,
}

impl BasicCommand {
    pub fn new(line: &str) -> Self {
        Self {
            line: line.trim().to_owned(),
        }
    }

    pub fn line(&self) -> &str {
        &self.line
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LogicOperator {
    #[strum(serialize = "&&")]
    And,
    #[strum(serialize = "||")]
    Or,
}

/// Binary tree over a fragment joined by `&&`/`||`.
/// A node is either an operator with two owned subtrees or a leaf owning one command,
/// and a leaf never holds another logic tree.
#[derive(Debug, PartialEq)]
pub enum LogicNode {
    Operator {
        operator: LogicOperator,
        left: Box<LogicNode>,
        right: Box<LogicNode>,
    },
    Leaf(Box<Command>),
}

impl LogicNode {
    pub fn parse(fragment: &str) -> Self {
        match find_logic_operator(fragment) {
            Some((position, operator)) => Self::Operator {
                operator,
                left: Box::new(Self::parse(&fragment[..position])),
                right: Box::new(Self::parse(&fragment[position + 2..])),
            },
            None => Self::Leaf(Box::new(Command::parse(fragment))),
        }
    }
}

/// Two or more stages connected by `|`, run in order
#[derive(Debug, PartialEq)]
pub struct Pipeline {
    stages: Vec<Command>,
}

impl Pipeline {
    pub fn stages(&self) -> &[Command] {
        &self.stages
    }
}

impl Command {
    /// Parses a fragment that contains no top-level `;`
    pub fn parse(fragment: &str) -> Self {
        if find_logic_operator(fragment).is_some() {
            return Self::Logic(LogicNode::parse(fragment));
        }

        let stages = split_pipes(fragment);
        if stages.len() > 1 {
            return Self::Pipeline(Pipeline {
                stages: stages.into_iter().map(Self::parse).collect(),
            });
        }

        Self::Basic(BasicCommand::new(fragment))
    }
}

/// Splits a validated line into its independent `;`-separated units.
/// Blank units (such as the one after a trailing `;`) are dropped.
pub fn parse_line(line: &str) -> Vec<Command> {
    line.split(SEMI)
        .filter(|unit| !unit.trim().is_empty())
        .map(Command::parse)
        .collect()
}

// Finds whichever logic operator occurs first in the fragment.
// * Splitting at the leftmost operator makes `a && b || c` group as `a && (b || c)`,
// * which differs from the usual shell grammar and is kept intentionally
fn find_logic_operator(fragment: &str) -> Option<(usize, LogicOperator)> {
    let or_position = fragment.find(OR_IF);
    let and_position = fragment.find(AND_IF);

    match (or_position, and_position) {
        (Some(or), Some(and)) if and < or => Some((and, LogicOperator::And)),
        (Some(or), _) => Some((or, LogicOperator::Or)),
        (None, Some(and)) => Some((and, LogicOperator::And)),
        (None, None) => None,
    }
}

/// Splits on every `|` that is not part of a `||`
pub fn split_pipes(fragment: &str) -> Vec<&str> {
    let bytes = fragment.as_bytes();
    let pipe = PIPE as u8;

    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let doubled = (i > 0 && bytes[i - 1] == pipe) || bytes.get(i + 1) == Some(&pipe);
        if byte == pipe && !doubled {
            pieces.push(&fragment[start..i]);
            start = i + 1;
        }
    }
    pieces.push(&fragment[start..]);

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(line: &str) -> Command {
        Command::Basic(BasicCommand::new(line))
    }

    fn leaf(line: &str) -> Box<LogicNode> {
        Box::new(LogicNode::Leaf(Box::new(basic(line))))
    }

    #[test]
    fn test_plain_command_is_basic() {
        assert_eq!(Command::parse("  ls -l  "), basic("ls -l"));
    }

    #[test]
    fn test_sequence_drops_blank_units() {
        let commands = parse_line("echo a; ; echo b;");
        assert_eq!(commands, vec![basic("echo a"), basic("echo b")]);
    }

    #[test]
    fn test_leftmost_operator_is_the_root() {
        let expected = Command::Logic(LogicNode::Operator {
            operator: LogicOperator::And,
            left: leaf("false"),
            right: Box::new(LogicNode::Operator {
                operator: LogicOperator::Or,
                left: leaf("true"),
                right: leaf("true"),
            }),
        });

        assert_eq!(Command::parse("false && true || true"), expected);
    }

    #[test]
    fn test_or_then_and() {
        let expected = Command::Logic(LogicNode::Operator {
            operator: LogicOperator::Or,
            left: leaf("a"),
            right: Box::new(LogicNode::Operator {
                operator: LogicOperator::And,
                left: leaf("b"),
                right: leaf("c"),
            }),
        });

        assert_eq!(Command::parse("a || b && c"), expected);
    }

    #[test]
    fn test_pipes_inside_logic_leaves() {
        let parsed = Command::parse("ls | wc -l && echo done");
        let Command::Logic(LogicNode::Operator { left, right, .. }) = parsed else {
            panic!("expected an operator node");
        };

        let LogicNode::Leaf(left) = *left else {
            panic!("expected a leaf");
        };
        assert_eq!(
            *left,
            Command::Pipeline(Pipeline {
                stages: vec![basic("ls"), basic("wc -l")]
            })
        );
        assert_eq!(*right, *leaf("echo done"));
    }

    #[test]
    fn test_split_pipes_ignores_double_pipe() {
        assert_eq!(split_pipes("a | b|c"), vec!["a ", " b", "c"]);
        assert_eq!(split_pipes("a || b"), vec!["a || b"]);
        assert_eq!(split_pipes("plain"), vec!["plain"]);
    }

    #[test]
    fn test_operator_display() {
        assert_eq!(LogicOperator::And.to_string(), "&&");
        assert_eq!(LogicOperator::Or.to_string(), "||");
    }
}

use std::collections::VecDeque;

/// Append-only log of the lines accepted by the shell during this session
#[derive(Debug)]
pub struct History {
    lines: VecDeque<String>,
    // Index of the oldest retained line, so numbering stays stable when old lines are dropped
    first_number: usize,
    limit: Option<usize>,
}

impl History {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            lines: VecDeque::new(),
            first_number: 1,
            limit,
        }
    }

    pub fn push(&mut self, line: &str) {
        self.lines.push_back(line.to_owned());

        if let Some(limit) = self.limit {
            while self.lines.len() > limit {
                self.lines.pop_front();
                self.first_number += 1;
            }
        }
    }

    /// Iterates over the retained lines along with their 1-based history numbers
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(move |(i, line)| (self.first_number + i, line.as_str()))
    }
}

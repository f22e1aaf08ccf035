//! Operator selection grammar.
//!
//! Input is a comma separated list of tokens, each one of:
//! - `all`: every comic (only valid as the sole token)
//! - `q`: cancel, wins over every other token
//! - `n`: the 1-based comic number `n`
//! - `a-b`: the inclusive, ascending 1-based range `a..=b`
//!
//! Invalid tokens are reported and skipped; the remaining tokens still count.

use std::collections::BTreeSet;
use std::fmt;

/// Ascending, duplicate-free zero-based indices into the current comic list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionSet {
    indices: BTreeSet<usize>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every index in `0..count`.
    pub fn all(count: usize) -> Self {
        (0..count).collect()
    }

    pub fn insert(&mut self, index: usize) -> bool {
        self.indices.insert(index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl FromIterator<usize> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The operator typed `q`.
    Cancel,
    /// At least one valid index; `rejected` lists the tokens that were skipped.
    Chosen {
        set: SelectionSet,
        rejected: Vec<RejectedToken>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("no valid selections")]
    NoValidSelections { rejected: Vec<RejectedToken> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedToken {
    pub token: String,
    pub reason: RejectReason,
}

impl fmt::Display for RejectedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reason, self.token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotANumber,
    NumberOutOfRange,
    MalformedRange,
    RangeOutOfBounds,
    DescendingRange,
    AllNotAlone,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotANumber => write!(f, "Invalid input"),
            RejectReason::NumberOutOfRange => write!(f, "Invalid number"),
            RejectReason::MalformedRange => write!(f, "Malformed range"),
            RejectReason::RangeOutOfBounds => write!(f, "Invalid range"),
            RejectReason::DescendingRange => write!(f, "Descending range not supported"),
            RejectReason::AllNotAlone => write!(f, "'all' must be used on its own"),
        }
    }
}

/// Parses `input` against a list of `count` comics.
pub fn parse_selection(input: &str, count: usize) -> Result<Selection, SelectionError> {
    let normalized = input.trim().to_lowercase();
    let tokens: Vec<&str> = normalized
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.contains(&"q") {
        return Ok(Selection::Cancel);
    }
    if tokens == ["all"] {
        return if count == 0 {
            Err(SelectionError::NoValidSelections {
                rejected: Vec::new(),
            })
        } else {
            Ok(Selection::Chosen {
                set: SelectionSet::all(count),
                rejected: Vec::new(),
            })
        };
    }

    let mut set = SelectionSet::new();
    let mut rejected = Vec::new();
    for token in tokens {
        match parse_token(token, count) {
            Ok(indices) => indices.for_each(|index| {
                set.insert(index);
            }),
            Err(reason) => rejected.push(RejectedToken {
                token: token.to_string(),
                reason,
            }),
        }
    }

    if set.is_empty() {
        Err(SelectionError::NoValidSelections { rejected })
    } else {
        Ok(Selection::Chosen { set, rejected })
    }
}

fn parse_token(token: &str, count: usize) -> Result<std::ops::Range<usize>, RejectReason> {
    if token == "all" {
        return Err(RejectReason::AllNotAlone);
    }
    match token.split_once('-') {
        Some((start, end)) => {
            let start = parse_number(start).ok_or(RejectReason::MalformedRange)?;
            let end = parse_number(end).ok_or(RejectReason::MalformedRange)?;
            if !in_bounds(start, count) || !in_bounds(end, count) {
                return Err(RejectReason::RangeOutOfBounds);
            }
            if start > end {
                return Err(RejectReason::DescendingRange);
            }
            Ok(start - 1..end)
        }
        None => {
            let number = parse_number(token).ok_or(RejectReason::NotANumber)?;
            if !in_bounds(number, count) {
                return Err(RejectReason::NumberOutOfRange);
            }
            Ok(number - 1..number)
        }
    }
}

fn parse_number(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn in_bounds(number: usize, count: usize) -> bool {
    (1..=count).contains(&number)
}

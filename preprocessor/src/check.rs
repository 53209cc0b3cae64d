use anyhow::Result;
use std::fmt::Display;

use crate::{expand::expand, store::SourceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    UpToDate,
    /// The merged file differs from a fresh expansion, starting at `line` (1-based).
    Stale { line: usize },
    Missing,
}

impl CheckStatus {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, CheckStatus::UpToDate)
    }
}

impl Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::UpToDate => write!(f, "up to date"),
            CheckStatus::Stale { line } => write!(f, "stale from line {line}"),
            CheckStatus::Missing => write!(f, "missing"),
        }
    }
}

/// Compares the merged file in `store` with a fresh expansion of `root`.
pub fn check<S: SourceStore + ?Sized>(
    store: &S,
    root: &str,
    merged: &str,
) -> Result<CheckStatus> {
    if !store.exists(merged) {
        return Ok(CheckStatus::Missing);
    }

    let expected = expand(store, root)?.lines;
    let actual = store.read_lines(merged)?;

    let first_difference = expected
        .iter()
        .zip(actual.iter())
        .position(|(expected, actual)| expected != actual)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())));

    Ok(match first_difference {
        Some(index) => CheckStatus::Stale { line: index + 1 },
        None => CheckStatus::UpToDate,
    })
}

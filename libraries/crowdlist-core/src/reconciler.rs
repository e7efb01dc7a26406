//! Reconciler - desired order vs. external order
//!
//! Produces the shortest list of single-item moves that turns the external
//! playlist into the desired order. Items on a longest increasing
//! subsequence (measured in target positions) already sit in the right
//! relative order and stay put; every other item is moved once, in target
//! order, to directly after its target predecessor. That is `n - LIS`
//! moves, the minimum for single-item moves.
//!
//! Moves are meant to be applied in sequence. After any prefix of the plan
//! has been applied, the playlist differs from the target only by the moves
//! still pending.

use crate::error::{CrowdError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Move one item
///
/// `from` is the item's index before the move, `to` its index after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOp {
    pub from: usize,
    pub to: usize,
}

impl MoveOp {
    /// Index, counted before the move, that the item is inserted in front of
    ///
    /// This is the external service's `insert_before` convention.
    pub fn insert_before(&self) -> usize {
        if self.to > self.from {
            self.to + 1
        } else {
            self.to
        }
    }
}

/// Result of reconciling a desired order against the external one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcilePlan {
    /// Moves to apply, in order
    pub moves: Vec<MoveOp>,

    /// External order once every move is applied
    pub target: Vec<String>,

    /// Desired URIs that the external playlist does not contain
    pub missing: Vec<String>,

    /// External URIs the desired order does not mention, kept at the end
    pub unranked: Vec<String>,
}

impl ReconcilePlan {
    /// True when the external playlist is already in order
    pub fn is_noop(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Plan the moves that bring `current` into `desired` order
///
/// Equal URIs are paired by occurrence, so a track added twice is two
/// distinct items. URIs missing from `current` are reported and skipped;
/// items of `current` absent from `desired` keep their relative order below
/// every ranked item.
pub fn reconcile<D, C>(desired: &[D], current: &[C]) -> ReconcilePlan
where
    D: AsRef<str>,
    C: AsRef<str>,
{
    // (uri, occurrence) -> index in current
    let mut current_index: HashMap<(&str, usize), usize> = HashMap::with_capacity(current.len());
    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for (index, uri) in current.iter().enumerate() {
        let uri = uri.as_ref();
        let seen = occurrences.entry(uri).or_insert(0);
        current_index.insert((uri, *seen), index);
        *seen += 1;
    }

    // Target sequence expressed as indices into current
    let mut placed = vec![false; current.len()];
    let mut target: Vec<usize> = Vec::with_capacity(current.len());
    let mut missing = Vec::new();
    let mut wanted: HashMap<&str, usize> = HashMap::new();
    for uri in desired {
        let uri = uri.as_ref();
        let seen = wanted.entry(uri).or_insert(0);
        match current_index.get(&(uri, *seen)) {
            Some(&index) => {
                placed[index] = true;
                target.push(index);
            }
            None => missing.push(uri.to_string()),
        }
        *seen += 1;
    }

    let mut unranked = Vec::new();
    for (index, was_placed) in placed.iter().enumerate() {
        if !was_placed {
            target.push(index);
            unranked.push(current[index].as_ref().to_string());
        }
    }

    // rank_of[i] = target position of current[i]
    let mut rank_of = vec![0usize; current.len()];
    for (rank, &index) in target.iter().enumerate() {
        rank_of[index] = rank;
    }

    let keep = increasing_run(&rank_of);
    let mut work = rank_of;
    let mut moves = Vec::new();

    for rank in 0..work.len() {
        if keep[rank] {
            continue;
        }
        let from = index_of(&work, rank);
        work.remove(from);
        let to = if rank == 0 {
            0
        } else {
            index_of(&work, rank - 1) + 1
        };
        work.insert(to, rank);

        if from != to {
            moves.push(MoveOp { from, to });
        }
    }

    ReconcilePlan {
        moves,
        target: target
            .iter()
            .map(|&index| current[index].as_ref().to_string())
            .collect(),
        missing,
        unranked,
    }
}

/// Apply `moves` in order to a copy of `items`
pub fn apply_moves<T: Clone>(items: &[T], moves: &[MoveOp]) -> Result<Vec<T>> {
    let mut out = items.to_vec();
    for op in moves {
        if op.from >= out.len() || op.to >= out.len() {
            return Err(CrowdError::invalid_input(format!(
                "move {} -> {} out of range for {} items",
                op.from,
                op.to,
                out.len()
            )));
        }
        let item = out.remove(op.from);
        out.insert(op.to, item);
    }
    Ok(out)
}

/// Flags, indexed by value, the members of one longest increasing subsequence
///
/// `seq` is a permutation of `0..seq.len()`.
fn increasing_run(seq: &[usize]) -> Vec<bool> {
    // tails[k] = index in seq of the smallest tail of an increasing run of length k + 1
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];

    for (i, &value) in seq.iter().enumerate() {
        let pos = tails.partition_point(|&t| seq[t] < value);
        if pos > 0 {
            prev[i] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
    }

    let mut keep = vec![false; seq.len()];
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        keep[seq[i]] = true;
        cursor = prev[i];
    }
    keep
}

/// Position of `rank` in the working sequence; every rank occurs exactly once
fn index_of(work: &[usize], rank: usize) -> usize {
    work.iter().position(|&r| r == rank).unwrap_or_default()
}

//! Edge-list ingestion
//!
//! Reads `key<delimiter>key` lines into an [`AdjacencyTable`], interning
//! textual keys through a [`NodeRegistry`] or, in numeric mode, parsing them
//! directly as zero-based indices. Blank and malformed lines are skipped and
//! counted. I/O failure is returned to the caller as an [`IngestError`]; the
//! reader never terminates the process.

use crate::rank::RankConfig;
use crate::storage::{AdjacencyTable, NodeId};
use std::collections::HashMap;
use std::io::BufRead;
use thiserror::Error;

/// Ingestion failure kinds
#[derive(Debug, Error)]
pub enum IngestError {
    /// Underlying reader failed
    #[error("edge list read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Bijection between raw textual keys and dense node indices.
///
/// Built incrementally as edges are read; bypassed entirely in numeric mode.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    to_idx: HashMap<String, u32>,
    to_name: Vec<String>,
}

impl NodeRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up or assign the index for `key`
    #[allow(clippy::cast_possible_truncation)] // registry growth is bounded by u32 node space
    pub fn intern(&mut self, key: &str) -> u32 {
        if let Some(&idx) = self.to_idx.get(key) {
            return idx;
        }
        let idx = self.to_name.len() as u32;
        self.to_idx.insert(key.to_string(), idx);
        self.to_name.push(key.to_string());
        idx
    }

    /// Name registered for `idx`, if any
    #[must_use]
    pub fn name(&self, idx: u32) -> Option<&str> {
        self.to_name.get(idx as usize).map(String::as_str)
    }

    /// Number of distinct keys seen
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_name.len()
    }

    /// Whether no keys have been interned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_name.is_empty()
    }
}

/// Ingestion summary alongside the built graph
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    /// Lines consumed, including skipped ones
    pub lines: u64,

    /// Blank or malformed lines dropped
    pub skipped: u64,

    /// Duplicate arcs dropped by the table
    pub duplicates: u64,
}

fn parse_index(field: &str) -> Option<u32> {
    field.parse::<u32>().ok()
}

/// Read an edge list into an adjacency table.
///
/// Each line is split on the first occurrence of the configured delimiter;
/// both fields are trimmed of ASCII blanks and tabs. Lines without the
/// delimiter, with an empty field, or (in numeric mode) with an unparseable
/// index are skipped. Progress is logged every 100 000 lines.
///
/// # Errors
///
/// Returns [`IngestError::Io`] if the underlying reader fails.
pub fn read_edge_list<R: BufRead>(
    reader: R,
    config: &RankConfig,
) -> Result<(AdjacencyTable, NodeRegistry, IngestStats), IngestError> {
    let mut table = AdjacencyTable::new();
    let mut registry = NodeRegistry::new();
    let mut stats = IngestStats::default();

    for line in reader.lines() {
        let line = line?;
        stats.lines += 1;

        match split_edge(&line, &config.delimiter) {
            Some((from, to)) => {
                let endpoints = if config.numeric {
                    parse_index(from).zip(parse_index(to))
                } else {
                    Some((registry.intern(from), registry.intern(to)))
                };

                match endpoints {
                    Some((from_idx, to_idx)) => {
                        if !table.add_arc(NodeId(from_idx), NodeId(to_idx)) {
                            stats.duplicates += 1;
                        }
                    }
                    None => stats.skipped += 1,
                }
            }
            None => stats.skipped += 1,
        }

        if stats.lines % 100_000 == 0 {
            tracing::info!(
                lines = stats.lines,
                vertices = table.row_count(),
                "reading edge list"
            );
        }
    }

    tracing::info!(
        lines = stats.lines,
        vertices = table.row_count(),
        arcs = table.arc_count(),
        skipped = stats.skipped,
        "edge list read"
    );

    Ok((table, registry, stats))
}

/// Split a line on the first delimiter occurrence and trim both fields.
/// Returns `None` for blank or malformed lines.
fn split_edge<'a>(line: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    let (from, to) = line.split_once(delimiter)?;
    let from = from.trim_matches([' ', '\t']);
    let to = to.trim_matches([' ', '\t']);
    if from.is_empty() || to.is_empty() {
        return None;
    }
    Some((from, to))
}

//! Diagnostic dump formatting
//!
//! Plain-text renderings of the run parameters, the adjacency table, and the
//! rank vector. All writers take `impl io::Write`; nothing here prints on
//! its own. Rust's `Display` for `f64` is shortest-round-trip, so rank
//! output preserves full precision.

use crate::ingest::NodeRegistry;
use crate::rank::RankConfig;
use crate::storage::AdjacencyTable;
use std::io::{self, Write};

/// Render a node either through the registry or as its bare index.
fn node_label(idx: u32, names: Option<&NodeRegistry>) -> String {
    names
        .and_then(|r| r.name(idx))
        .map_or_else(|| idx.to_string(), str::to_string)
}

/// Write the run parameters on one line.
///
/// # Errors
///
/// Propagates writer failures.
pub fn write_params<W: Write>(mut w: W, config: &RankConfig) -> io::Result<()> {
    writeln!(
        w,
        "alpha = {} convergence = {} max_iterations = {} numeric = {} delimiter = '{}'",
        config.alpha, config.convergence, config.max_iterations, config.numeric, config.delimiter
    )
}

/// Write one `dest:[ sources ]` line per node.
///
/// Pass the registry to render textual keys, or `None` for bare indices.
///
/// # Errors
///
/// Propagates writer failures.
pub fn write_adjacency<W: Write>(
    mut w: W,
    table: &AdjacencyTable,
    names: Option<&NodeRegistry>,
) -> io::Result<()> {
    for (dest, sources) in table.iter_rows() {
        write!(w, "{dest}:[ ")?;
        for &src in sources {
            write!(w, "{} ", node_label(src, names))?;
        }
        writeln!(w, "]")?;
    }
    Ok(())
}

/// Write one `name = rank` line per node, then the total mass.
///
/// # Errors
///
/// Propagates writer failures.
#[allow(clippy::cast_possible_truncation)] // node space is u32 by construction
pub fn write_ranks<W: Write>(
    mut w: W,
    ranks: &[f64],
    names: Option<&NodeRegistry>,
) -> io::Result<()> {
    let mut sum = 0.0;
    for (i, rank) in ranks.iter().enumerate() {
        writeln!(w, "{} = {rank}", node_label(i as u32, names))?;
        sum += rank;
    }
    writeln!(w, "s = {sum}")
}

//! Parallel Batch Parsing
//!
//! Uses Rayon to parse independent documents on separate threads. Each
//! source gets its own reader and result; nothing is shared between parses.

use crate::core::QName;
use crate::error::Result;
use crate::map::OrderedMultiMap;
use crate::options::Options;
use crate::strategy::root::parse_root;
use crate::strategy::slice::Slices;
use rayon::prelude::*;

/// Parse the root element of every source, results in input order
pub fn parse_roots(sources: &[&[u8]], options: &Options) -> Vec<Result<OrderedMultiMap>> {
    sources
        .par_iter()
        .map(|source| parse_root(*source, options))
        .collect()
}

/// Collect every `target` slice of every source, results in input order
pub fn collect_elements(sources: &[&[u8]], target: &str, options: &Options) -> Result<Vec<Result<Vec<OrderedMultiMap>>>> {
    let target = QName::parse(target)?;
    Ok(sources
        .par_iter()
        .map(|source| Slices::new(*source, target.clone(), options).collect::<Result<Vec<_>>>())
        .collect())
}

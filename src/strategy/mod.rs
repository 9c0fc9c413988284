//! Parsing Strategy Module
//!
//! - Root: reads up to the document element's start and describes it
//! - Slice: streams every occurrence of one element to a callback
//! - Parallel: batches of independent sources on the Rayon pool

pub mod parallel;
pub mod root;
pub mod slice;

pub use root::{parse_root, parse_root_file};
pub use slice::{parse_element, parse_element_file, parse_element_with, Slices};

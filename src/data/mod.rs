//! Input loading module

pub mod input;

pub use input::{load_graph, AccountRecord, RawGraph};

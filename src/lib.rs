//! Core library functions for the follow-graph backbone analyzer
//!
//! Load a follow graph ([`data`]), compute its structural metrics
//! ([`metrics`]), reduce it to a size-capped backbone ([`backbone`]) and
//! write the results ([`storage`], [`viz`]).

pub mod backbone;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod storage;
pub mod viz;

pub use backbone::{select_backbone, BackboneSelection};
pub use config::{AnalysisConfig, BackboneConfig, LoadOptions};
pub use error::{GraphError, Result};
pub use graph::FollowGraph;
pub use metrics::{analyze, Analysis};

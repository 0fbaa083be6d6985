//! Graph representation and algorithms module

pub mod algorithms;
pub mod builder;
pub mod compressed;

pub use builder::GraphBuilder;
pub use compressed::FollowGraph;

//! Configuration management for analysis and backbone extraction
//!
//! Every limit is caller supplied. A value of zero for a set size or a
//! sample size switches the corresponding signal off; it is not an error.

use crate::error::{GraphError, Result};

/// Default cap on the follower list of a single target during co-follow
/// pair generation. Bounds the per-target cost at `cap * (cap - 1) / 2`
/// pairs at the price of missing pairs among the followers past the cap.
pub const DEFAULT_FOLLOWER_CAP: usize = 5000;

/// Options applied while turning the raw input into a graph
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Treat `following` targets that are not top-level keys as nodes
    /// instead of dropping the edge.
    pub keep_external_targets: bool,
}

/// Settings for the structural report
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Minimum shared follow targets for a co-follow pair to be reported
    pub min_shared: usize,

    /// Entries per ranked report section
    pub top: usize,

    /// Pivot sample size for approximate betweenness (0 disables it)
    pub betweenness_k: usize,

    /// Seed for pivot sampling
    pub betweenness_seed: u64,

    /// Per-target follower cap for co-follow pair generation
    pub follower_cap: usize,

    /// Number of strongly connected components listed in the report
    pub scc_limit: usize,

    /// Members listed per reported component
    pub scc_member_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_shared: 10,
            top: 50,
            betweenness_k: 200,
            betweenness_seed: 1,
            follower_cap: DEFAULT_FOLLOWER_CAP,
            scc_limit: 10,
            scc_member_limit: 50,
        }
    }
}

impl AnalysisConfig {
    /// Reject settings that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        if self.follower_cap < 2 {
            return Err(GraphError::invalid(
                "follower_cap",
                format!("must be at least 2, got {}", self.follower_cap),
            ));
        }
        if self.scc_member_limit == 0 {
            return Err(GraphError::invalid("scc_member_limit", "must be at least 1"));
        }
        Ok(())
    }
}

/// Settings for backbone node and edge selection
#[derive(Debug, Clone)]
pub struct BackboneConfig {
    /// Account that is always kept and anchors the ego network
    pub root: Option<String>,

    /// Hubs kept by in-degree
    pub top_in: usize,

    /// Bridges kept by approximate betweenness
    pub top_bridge: usize,

    /// Pivot sample size for betweenness (0 disables bridges)
    pub betweenness_k: usize,

    /// Seed for pivot sampling
    pub betweenness_seed: u64,

    /// Reciprocal pairs whose endpoints are kept
    pub reciprocal_pairs: usize,

    /// Undirected hop radius around the root (0 disables the ego signal)
    pub ego_hops: usize,

    /// Hard cap on kept nodes
    pub max_nodes: usize,

    /// Hard cap on kept edges
    pub max_edges: usize,
}

impl Default for BackboneConfig {
    fn default() -> Self {
        Self {
            root: None,
            top_in: 200,
            top_bridge: 120,
            betweenness_k: 250,
            betweenness_seed: 1,
            reciprocal_pairs: 300,
            ego_hops: 0,
            max_nodes: 800,
            max_edges: 20_000,
        }
    }
}

impl BackboneConfig {
    /// Reject settings that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        if let Some(root) = &self.root {
            if root.trim().is_empty() {
                return Err(GraphError::invalid("root", "must not be blank"));
            }
        }
        Ok(())
    }

    /// Set the root account
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
        assert!(BackboneConfig::default().validate().is_ok());
    }

    #[test]
    fn follower_cap_below_two_is_rejected() {
        let config = AnalysisConfig {
            follower_cap: 1,
            ..AnalysisConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidConfig {
                field: "follower_cap",
                ..
            }
        ));
    }

    #[test]
    fn blank_root_is_rejected() {
        let config = BackboneConfig::default().with_root("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_caps_are_valid() {
        let config = BackboneConfig {
            top_in: 0,
            top_bridge: 0,
            betweenness_k: 0,
            reciprocal_pairs: 0,
            max_nodes: 0,
            max_edges: 0,
            ..BackboneConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}

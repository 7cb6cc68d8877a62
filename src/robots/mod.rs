//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt
//! files. A domain's robots.txt is requested at most once per run; when it cannot
//! be obtained the domain is treated as unrestricted.

mod cache;
mod parser;
mod record;
mod store;

pub use cache::SingleFlightCache;
pub use parser::{AgentGroup, ParsedRobots, Rule, RuleKind};
pub use record::{PolicyRecord, PolicyStatus};
pub use store::PolicyStore;

/// Agent whose rules decide every fetch
pub const ROBOTS_AGENT: &str = "*";

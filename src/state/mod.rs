//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `DomainState`: Tracks per-domain pacing (last request time, crawl-delay)
//! - `LinkOutcome`: The terminal outcome of each link of a run

mod domain_state;
mod link_outcome;

pub use domain_state::DomainState;
pub use link_outcome::LinkOutcome;

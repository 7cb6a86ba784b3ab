//! CrowdfundFix - Crowdfunded bug bounties with heuristic triage
//!
//! Bug reports are triaged by three engines and funded by the community.
//!
//! # Engines
//!
//! 1. `analysis` categorizes a report, scores complexity, confidence, impact
//!    and priority, estimates a bounty and extracts log insights
//! 2. `matching` ranks developers for a bug by skill overlap, success rate
//!    and experience
//! 3. `verification` grades a submitted fix, deterministically per PR link
//!
//! The engines are pure functions over plain records. `marketplace` wires
//! them to SQLite storage and `server` exposes the result over HTTP.

pub mod analysis;
pub mod config;
pub mod error;
pub mod keywords;
pub mod marketplace;
pub mod matching;
pub mod seed;
pub mod server;
pub mod storage;
pub mod types;
pub mod verification;

pub use config::Config;
pub use error::{MarketError, MarketResult};
pub use marketplace::Marketplace;
pub use storage::Storage;
pub use types::{
    AnalysisInput, AnalysisResult, BugStatus, ComplexityLabel, DeveloperProfile, ImpactScores,
    MatchResult, Severity, UserRole, VerificationResult,
};

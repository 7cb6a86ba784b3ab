//! Shared domain types
//!
//! Engine inputs/outputs plus the enums persisted on bug and user records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Parse a severity label, falling back to `Medium` for anything unknown.
    ///
    /// The engines never reject input; strict parsing lives in `FromStr`.
    pub fn from_label_lossy(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }

    /// 0-1 scalar used throughout scoring
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Low => 0.2,
            Severity::Medium => 0.5,
            Severity::High => 0.8,
            Severity::Critical => 1.0,
        }
    }

    /// Bounty multiplier applied on top of the complexity score
    pub fn bounty_multiplier(&self) -> f64 {
        match self {
            Severity::Low => 0.5,
            Severity::Medium => 1.0,
            Severity::High => 1.8,
            Severity::Critical => 3.0,
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str() == s)
            .ok_or_else(|| format!("Invalid severity '{}'", s))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BugStatus {
    #[default]
    Open,
    Funded,
    Claimed,
    #[serde(rename = "In Review")]
    InReview,
    Resolved,
}

impl BugStatus {
    pub const ALL: [BugStatus; 5] = [
        BugStatus::Open,
        BugStatus::Funded,
        BugStatus::Claimed,
        BugStatus::InReview,
        BugStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BugStatus::Open => "Open",
            BugStatus::Funded => "Funded",
            BugStatus::Claimed => "Claimed",
            BugStatus::InReview => "In Review",
            BugStatus::Resolved => "Resolved",
        }
    }
}

impl FromStr for BugStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BugStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| format!("Invalid status '{}'", s))
    }
}

impl fmt::Display for BugStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UserRole {
    #[default]
    User,
    Developer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "User",
            UserRole::Developer => "Developer",
            UserRole::Admin => "Admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(UserRole::User),
            "Developer" => Ok(UserRole::Developer),
            "Admin" => Ok(UserRole::Admin),
            other => Err(format!("Invalid role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplexityLabel {
    Low,
    Medium,
    High,
    Extreme,
}

impl ComplexityLabel {
    /// Half-open bins: [0,30) Low, [30,60) Medium, [60,85) High, [85,101) Extreme.
    /// Anything outside the bins reads as Medium.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if (0.0..30.0).contains(&s) => ComplexityLabel::Low,
            s if (30.0..60.0).contains(&s) => ComplexityLabel::Medium,
            s if (60.0..85.0).contains(&s) => ComplexityLabel::High,
            s if (85.0..101.0).contains(&s) => ComplexityLabel::Extreme,
            _ => ComplexityLabel::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLabel::Low => "Low",
            ComplexityLabel::Medium => "Medium",
            ComplexityLabel::High => "High",
            ComplexityLabel::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for ComplexityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ANALYSIS
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub logs: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactScores {
    pub user_impact: u32,
    pub severity: u32,
    pub urgency: u32,
    pub popularity: u32,
}

impl ImpactScores {
    pub fn average(&self) -> f64 {
        let sum = self.user_impact + self.severity + self.urgency + self.popularity;
        sum as f64 / 4.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub category: String,
    pub complexity_score: f64,
    pub complexity_label: ComplexityLabel,
    pub estimated_bounty: u32,
    pub confidence_score: f64,
    pub impact: ImpactScores,
    pub priority_score: f64,
    pub summary: String,
    pub error_clusters: Vec<String>,
    pub log_insights: Vec<String>,
}

// ============================================================================
// MATCHING
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeveloperProfile {
    pub id: String,
    pub name: String,
    pub skills: Vec<String>,
    pub success_rate: f64,
    pub bugs_resolved: u32,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub id: String,
    pub name: String,
    pub skills: Vec<String>,
    pub success_rate: f64,
    pub bugs_resolved: u32,
    pub avatar_url: Option<String>,
    pub match_score: f64,
}

// ============================================================================
// VERIFICATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub bug_id: String,
    pub developer_id: String,
    pub pr_link: String,
    pub similarity_score: f64,
    pub passed: bool,
    pub diff_summary: String,
}

/// Round to one decimal place, half away from zero.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

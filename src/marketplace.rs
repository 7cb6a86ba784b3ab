//! Marketplace orchestration
//!
//! Loads bug and developer records, runs the engines and persists what they
//! derive. The engines themselves stay free of storage concerns.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis;
use crate::error::{MarketError, MarketResult};
use crate::matching;
use crate::storage::{BugRecord, FundingRecord, Storage, UserRecord};
use crate::types::{
    AnalysisInput, BugStatus, ComplexityLabel, ImpactScores, MatchResult, Severity, UserRole,
    VerificationResult,
};
use crate::verification;

const TOP_DEVELOPERS: u32 = 10;
const RECENT_BUGS: u32 = 5;
const AVATAR_BASE: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

// ============================================================================
// REQUESTS
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default)]
    pub bugs_resolved: u32,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBug {
    pub author_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub repo_link: Option<String>,
    #[serde(default)]
    pub logs: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub expected_behavior: Option<String>,
    #[serde(default)]
    pub bounty: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixVerificationRequest {
    pub bug_id: String,
    pub developer_id: String,
    pub pr_link: String,
}

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub bug_id: String,
    pub category: String,
    pub complexity: ComplexityLabel,
    pub estimated_bounty: u32,
    pub confidence_score: f64,
    pub impact_score: ImpactScores,
    pub nlp_summary: String,
    pub error_clusters: Vec<String>,
    pub log_insights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperSummary {
    pub id: String,
    pub name: String,
    pub skills: Vec<String>,
    pub success_rate: f64,
    pub bugs_resolved: u32,
    pub avatar_url: Option<String>,
}

impl From<&UserRecord> for DeveloperSummary {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            skills: user.skills.clone(),
            success_rate: user.success_rate,
            bugs_resolved: user.bugs_resolved,
            avatar_url: user.avatar_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingSummary {
    pub bug_id: String,
    pub total_funded: f64,
    pub contributors: usize,
    pub fundings: Vec<FundingRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_bugs: u32,
    pub resolved_bugs: u32,
    pub resolved_percentage: f64,
    pub total_funding: f64,
    pub average_bounty: f64,
    pub bugs_by_severity: BTreeMap<String, u32>,
    pub bugs_by_status: BTreeMap<String, u32>,
    pub top_developers: Vec<DeveloperSummary>,
    pub recent_bugs: Vec<BugRecord>,
}

// ============================================================================
// MARKETPLACE
// ============================================================================

pub struct Marketplace {
    storage: Arc<Storage>,
}

impl Marketplace {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    pub fn register_user(&self, req: NewUser) -> MarketResult<UserRecord> {
        if req.name.trim().is_empty() {
            return Err(MarketError::Validation("name cannot be empty".to_string()));
        }
        if self.storage.email_exists(&req.email)? {
            return Err(MarketError::Validation("Email already registered".to_string()));
        }

        // Unknown roles register as plain users
        let role = req
            .role
            .as_deref()
            .and_then(|r| r.parse::<UserRole>().ok())
            .unwrap_or_default();

        let user = UserRecord {
            id: new_id("user"),
            avatar_url: Some(
                req.avatar_url
                    .unwrap_or_else(|| format!("{}{}", AVATAR_BASE, req.name)),
            ),
            name: req.name,
            email: req.email,
            role,
            reputation: 0.0,
            skills: req.skills,
            success_rate: req.success_rate.clamp(0.0, 100.0),
            bugs_resolved: req.bugs_resolved,
            created_at: Utc::now(),
        };
        self.storage.insert_user(&user)?;

        info!("Registered {} {} ({})", user.role.as_str(), user.name, user.id);
        Ok(user)
    }

    pub fn list_developers(&self) -> MarketResult<Vec<DeveloperSummary>> {
        let developers = self.storage.list_developers()?;
        Ok(developers.iter().map(DeveloperSummary::from).collect())
    }

    // ------------------------------------------------------------------------
    // Bugs
    // ------------------------------------------------------------------------

    pub fn create_bug(&self, req: NewBug) -> MarketResult<BugRecord> {
        if req.title.trim().is_empty() {
            return Err(MarketError::Validation("title cannot be empty".to_string()));
        }
        if req.bounty < 0.0 {
            return Err(MarketError::Validation("bounty cannot be negative".to_string()));
        }
        let severity = match req.severity.as_deref() {
            None => Severity::Medium,
            Some(label) => label.parse::<Severity>().map_err(MarketError::Validation)?,
        };

        let bug = BugRecord {
            id: new_id("bug"),
            title: req.title,
            description: req.description,
            repo_link: req.repo_link.unwrap_or_default(),
            logs: req.logs.unwrap_or_default(),
            tags: req.tags,
            severity,
            expected_behavior: req.expected_behavior.unwrap_or_default(),
            status: BugStatus::Open,
            ai_priority_score: None,
            predicted_complexity: None,
            predicted_bounty: None,
            bounty: req.bounty,
            funds_raised: 0.0,
            contributors: 0,
            author_id: req.author_id,
            assigned_developer_id: None,
            created_at: Utc::now(),
        };
        self.storage.insert_bug(&bug)?;

        info!("Created bug {} ({}): {}", bug.id, bug.severity, bug.title);
        Ok(bug)
    }

    pub fn list_bugs(&self) -> MarketResult<Vec<BugRecord>> {
        Ok(self.storage.list_bugs(None)?)
    }

    pub fn get_bug(&self, bug_id: &str) -> MarketResult<BugRecord> {
        self.storage
            .get_bug(bug_id)?
            .ok_or_else(|| MarketError::NotFound("Bug".to_string()))
    }

    pub fn update_bug_status(&self, bug_id: &str, status: &str) -> MarketResult<BugRecord> {
        let status: BugStatus = status.parse().map_err(MarketError::Validation)?;
        if !self.storage.update_bug_status(bug_id, status)? {
            return Err(MarketError::NotFound("Bug".to_string()));
        }
        info!("Bug {} moved to {}", bug_id, status);
        self.get_bug(bug_id)
    }

    // ------------------------------------------------------------------------
    // Engines
    // ------------------------------------------------------------------------

    /// Analyze a stored bug and persist priority, complexity and bounty onto it
    pub fn analyze_bug(&self, bug_id: &str) -> MarketResult<AnalysisResponse> {
        let bug = self.get_bug(bug_id)?;

        let input = AnalysisInput {
            title: bug.title,
            description: bug.description,
            logs: bug.logs,
            tags: bug.tags,
            severity: bug.severity,
        };
        let analysis = analysis::analyze(&input);

        self.storage.update_bug_ai_scores(
            bug_id,
            analysis.priority_score,
            analysis.complexity_label.as_str(),
            analysis.estimated_bounty as f64,
        )?;

        info!(
            "Analyzed bug {}: {} / {} complexity / bounty {} / priority {}",
            bug_id,
            analysis.category,
            analysis.complexity_label,
            analysis.estimated_bounty,
            analysis.priority_score
        );

        Ok(AnalysisResponse {
            bug_id: bug.id,
            category: analysis.category,
            complexity: analysis.complexity_label,
            estimated_bounty: analysis.estimated_bounty,
            confidence_score: analysis.confidence_score,
            impact_score: analysis.impact,
            nlp_summary: analysis.summary,
            error_clusters: analysis.error_clusters,
            log_insights: analysis.log_insights,
        })
    }

    /// Rank every developer for a bug and record a match per pair.
    ///
    /// Pairs that already have a stored match keep their original score.
    pub fn match_developers(&self, bug_id: &str) -> MarketResult<Vec<MatchResult>> {
        let bug = self.get_bug(bug_id)?;
        let profiles: Vec<_> = self
            .storage
            .list_developers()?
            .iter()
            .map(UserRecord::to_profile)
            .collect();

        if profiles.is_empty() {
            warn!("No developers registered; nothing to match for bug {}", bug_id);
        }

        let matches = matching::match_developers(&bug.tags, bug.severity, &profiles);

        let mut recorded = 0;
        for m in &matches {
            if self
                .storage
                .record_match_if_absent(bug_id, &m.id, m.match_score)?
            {
                recorded += 1;
            }
        }

        info!(
            "Matched {} developers to bug {} ({} new matches recorded)",
            matches.len(),
            bug_id,
            recorded
        );
        Ok(matches)
    }

    pub fn verify_fix(&self, req: &FixVerificationRequest) -> VerificationResult {
        let result = verification::verify_fix(&req.bug_id, &req.developer_id, &req.pr_link);
        info!(
            "Verified fix {} for bug {}: {:.1}% ({})",
            req.pr_link,
            req.bug_id,
            result.similarity_score,
            if result.passed { "passed" } else { "failed" }
        );
        result
    }

    // ------------------------------------------------------------------------
    // Funding
    // ------------------------------------------------------------------------

    pub fn add_funding(
        &self,
        bug_id: &str,
        contributor_name: &str,
        amount: f64,
    ) -> MarketResult<FundingRecord> {
        if !(amount > 0.0 && amount.is_finite()) {
            return Err(MarketError::Validation(
                "amount must be a positive number".to_string(),
            ));
        }

        let funding = self
            .storage
            .add_funding(bug_id, contributor_name, amount)?
            .ok_or_else(|| MarketError::NotFound("Bug".to_string()))?;

        info!(
            "{} funded bug {} with {:.2}",
            contributor_name, bug_id, amount
        );
        Ok(funding)
    }

    pub fn funding_summary(&self, bug_id: &str) -> MarketResult<FundingSummary> {
        self.get_bug(bug_id)?;
        let fundings = self.storage.get_fundings(bug_id)?;

        Ok(FundingSummary {
            bug_id: bug_id.to_string(),
            total_funded: fundings.iter().map(|f| f.amount).sum(),
            contributors: fundings.len(),
            fundings,
        })
    }

    // ------------------------------------------------------------------------
    // Analytics
    // ------------------------------------------------------------------------

    pub fn dashboard(&self) -> MarketResult<Dashboard> {
        let total_bugs = self.storage.count_bugs()?;
        let bugs_by_status = self.storage.count_bugs_by_status()?;
        let bugs_by_severity = self.storage.count_bugs_by_severity()?;
        let resolved_bugs = bugs_by_status
            .get(BugStatus::Resolved.as_str())
            .copied()
            .unwrap_or(0);
        let resolved_percentage = if total_bugs > 0 {
            round_to(resolved_bugs as f64 / total_bugs as f64 * 100.0, 1)
        } else {
            0.0
        };
        let (total_funding, average_bounty) = self.storage.funding_totals()?;

        let top_developers = self
            .storage
            .top_developers(TOP_DEVELOPERS)?
            .iter()
            .map(DeveloperSummary::from)
            .collect();
        let recent_bugs = self.storage.list_bugs(Some(RECENT_BUGS))?;

        Ok(Dashboard {
            total_bugs,
            resolved_bugs,
            resolved_percentage,
            total_funding,
            average_bounty: round_to(average_bounty, 2),
            bugs_by_severity,
            bugs_by_status,
            top_developers,
            recent_bugs,
        })
    }
}

/// `prefix-` plus the first 8 hex digits of a v4 uuid
fn new_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &hex[..8])
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

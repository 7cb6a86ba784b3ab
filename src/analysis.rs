//! Bug analysis engine
//!
//! Rule-based scoring over free text and metadata:
//! 1. Category by keyword overlap (first table entry wins ties)
//! 2. Complexity score (0-100) and its label
//! 3. Bounty estimate, rounded to the nearest 25
//! 4. Confidence, impact breakdown and priority
//! 5. Summary sentence, error clusters and log insights
//!
//! Everything except the simulated `popularity` signal is a pure function
//! of the input.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::keywords::{
    count_present, CATEGORY_KEYWORDS, COMPLEXITY_KEYWORDS, ERROR_CLUSTERS, GENERAL_CATEGORY,
    LOG_INSIGHT_RULES, NO_LOG_DATA, NO_LOG_PATTERN, UNCATEGORIZED_CLUSTER, URGENCY_KEYWORDS,
    USER_IMPACT_KEYWORDS,
};
use crate::types::{round1, AnalysisInput, AnalysisResult, ComplexityLabel, ImpactScores, Severity};

/// Bounties are quoted in steps of this size
pub const BOUNTY_STEP: f64 = 25.0;

/// Run a full analysis with a fresh per-call generator for the simulated signals
pub fn analyze(input: &AnalysisInput) -> AnalysisResult {
    let mut rng = StdRng::from_entropy();
    analyze_with_rng(input, &mut rng)
}

/// Run a full analysis drawing the simulated signals from `rng`
pub fn analyze_with_rng<R: Rng + ?Sized>(input: &AnalysisInput, rng: &mut R) -> AnalysisResult {
    let full_text = combined_text(input);
    let severity = input.severity;

    let category = categorize(&full_text);
    let complexity_score = complexity_score(&full_text, severity, &input.logs);
    let complexity_label = ComplexityLabel::from_score(complexity_score);
    let estimated_bounty = estimate_bounty(complexity_score, severity);
    let confidence_score = confidence_score(&full_text, &input.logs);
    let impact = impact_scores(&full_text, severity, rng);
    let priority_score = priority_score(complexity_score, severity, &impact);
    let summary = summarize(&input.title, category, complexity_label, severity);
    let error_clusters = error_clusters(&full_text, &input.logs);
    let log_insights = log_insights(&input.logs);

    debug!(
        "Analyzed '{}': category={}, complexity={:.2} ({}), bounty={}, priority={}",
        input.title, category, complexity_score, complexity_label, estimated_bounty, priority_score
    );

    AnalysisResult {
        category: category.to_string(),
        complexity_score,
        complexity_label,
        estimated_bounty,
        confidence_score,
        impact,
        priority_score,
        summary,
        error_clusters,
        log_insights,
    }
}

/// Lowercase `title description logs tags...` corpus used for substring matching
pub fn combined_text(input: &AnalysisInput) -> String {
    format!(
        "{} {} {} {}",
        input.title,
        input.description,
        input.logs,
        input.tags.join(" ")
    )
    .to_lowercase()
}

pub fn categorize(text: &str) -> &'static str {
    let mut best_category = GENERAL_CATEGORY;
    let mut best_score = 0;

    for &(category, keywords) in CATEGORY_KEYWORDS {
        let score = count_present(text, keywords);
        // Strictly greater: earlier categories keep ties
        if score > best_score {
            best_score = score;
            best_category = category;
        }
    }

    best_category
}

pub fn complexity_score(text: &str, severity: Severity, logs: &str) -> f64 {
    let base = severity.weight() * 40.0;
    let text_factor = (char_len(text) / 500.0).min(1.0) * 20.0;
    let log_factor = if logs.is_empty() {
        0.0
    } else {
        (char_len(logs) / 200.0).min(1.0) * 15.0
    };
    let keyword_hits = count_present(text, COMPLEXITY_KEYWORDS) as f64;
    let keyword_factor = (keyword_hits * 5.0).min(25.0);

    (base + text_factor + log_factor + keyword_factor).clamp(0.0, 100.0)
}

pub fn estimate_bounty(complexity_score: f64, severity: Severity) -> u32 {
    let bounty = complexity_score * 3.0 * severity.bounty_multiplier();
    let rounded = (bounty / BOUNTY_STEP).round() * BOUNTY_STEP;
    rounded.max(0.0) as u32
}

pub fn confidence_score(text: &str, logs: &str) -> f64 {
    let text_score = (char_len(text) / 300.0).min(1.0) * 50.0;
    let log_score = if logs.is_empty() {
        0.0
    } else {
        (char_len(logs) / 100.0).min(1.0) * 30.0
    };
    round1((20.0 + text_score + log_score).min(100.0))
}

pub fn impact_scores<R: Rng + ?Sized>(text: &str, severity: Severity, rng: &mut R) -> ImpactScores {
    let weight = severity.weight();

    let user_hits = count_present(text, USER_IMPACT_KEYWORDS) as f64;
    let urgency_hits = count_present(text, URGENCY_KEYWORDS) as f64;
    // Simulated signal, not reproducible across calls
    let popularity: f64 = rng.gen_range(30.0..=80.0);

    ImpactScores {
        user_impact: to_percent(weight * 60.0 + user_hits * 15.0),
        severity: to_percent(weight * 100.0),
        urgency: to_percent(weight * 50.0 + urgency_hits * 20.0),
        popularity: to_percent(popularity),
    }
}

pub fn priority_score(complexity_score: f64, severity: Severity, impact: &ImpactScores) -> f64 {
    let priority = severity.weight() * 40.0 + impact.average() * 0.4 + complexity_score * 0.2;
    round1(priority.clamp(0.0, 100.0))
}

pub fn summarize(
    title: &str,
    category: &str,
    complexity: ComplexityLabel,
    severity: Severity,
) -> String {
    format!(
        "This is a {}-severity issue in the {} domain. \
         Analysis indicates {} complexity. \
         The issue '{}' requires targeted investigation and a fix \
         addressing the root cause identified in the error patterns.",
        severity.as_str().to_lowercase(),
        category.to_lowercase(),
        complexity.as_str().to_lowercase(),
        title
    )
}

pub fn error_clusters(text: &str, logs: &str) -> Vec<String> {
    let combined = format!("{} {}", text, logs).to_lowercase();

    let clusters: Vec<String> = ERROR_CLUSTERS
        .iter()
        .filter(|(_, patterns)| patterns.iter().any(|p| combined.contains(p)))
        .map(|(name, _)| name.to_string())
        .collect();

    if clusters.is_empty() {
        vec![UNCATEGORIZED_CLUSTER.to_string()]
    } else {
        clusters
    }
}

pub fn log_insights(logs: &str) -> Vec<String> {
    if logs.trim().is_empty() {
        return vec![NO_LOG_DATA.to_string()];
    }

    let logs_lower = logs.to_lowercase();
    let insights: Vec<String> = LOG_INSIGHT_RULES
        .iter()
        .filter(|(keyword, _)| logs_lower.contains(keyword))
        .map(|(_, insight)| insight.to_string())
        .collect();

    if insights.is_empty() {
        vec![NO_LOG_PATTERN.to_string()]
    } else {
        insights
    }
}

fn char_len(s: &str) -> f64 {
    s.chars().count() as f64
}

fn to_percent(value: f64) -> u32 {
    value.clamp(0.0, 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, description: &str, logs: &str, tags: &[&str], sev: Severity) -> AnalysisInput {
        AnalysisInput {
            title: title.to_string(),
            description: description.to_string(),
            logs: logs.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            severity: sev,
        }
    }

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_single_keyword_category() {
        let bug = input("jwt", "", "", &[], Severity::Medium);
        assert_eq!(categorize(&combined_text(&bug)), "Authentication / Security");
    }

    #[test]
    fn test_category_tie_keeps_table_order() {
        // one Payment keyword, one UI keyword
        assert_eq!(categorize("stripe css"), "Payment Gateway Integration");
        assert_eq!(categorize("css stripe"), "Payment Gateway Integration");
    }

    #[test]
    fn test_no_keyword_is_general_bug() {
        let bug = input("", "", "", &[], Severity::Low);
        assert_eq!(categorize(&combined_text(&bug)), "General Bug");
    }

    #[test]
    fn test_exact_scores_for_short_crash_report() {
        let bug = input("Crash", "", "", &[], Severity::High);
        let result = analyze_with_rng(&bug, &mut seeded());

        // 0.8*40 + 8/500*20 + 0 + 5
        assert!((result.complexity_score - 37.32).abs() < 1e-9);
        assert_eq!(result.complexity_label, ComplexityLabel::Medium);
        // 37.32 * 3 * 1.8 = 201.528 -> 200
        assert_eq!(result.estimated_bounty, 200);
        assert_eq!(result.confidence_score, 21.3);
        assert_eq!(result.category, "Memory Management / Infrastructure");
        assert_eq!(result.impact.user_impact, 48);
        assert_eq!(result.impact.severity, 80);
        assert_eq!(result.impact.urgency, 60);
        assert!((30..=80).contains(&result.impact.popularity));
        assert!(result.priority_score >= 61.2 && result.priority_score <= 66.3);
        assert_eq!(
            result.summary,
            "This is a high-severity issue in the memory management / infrastructure domain. \
             Analysis indicates medium complexity. The issue 'Crash' requires targeted \
             investigation and a fix addressing the root cause identified in the error patterns."
        );
    }

    #[test]
    fn test_scores_stay_in_range_for_every_severity() {
        let long = "memory leak crash infinite loop deadlock race condition concurrent heap oom segfault "
            .repeat(20);
        for sev in Severity::ALL {
            for bug in [
                input("", "", "", &[], sev),
                input("title", &long, &long, &["auth", "ui"], sev),
            ] {
                let result = analyze_with_rng(&bug, &mut seeded());
                assert!((0.0..=100.0).contains(&result.complexity_score));
                assert!((0.0..=100.0).contains(&result.priority_score));
                assert!((0.0..=100.0).contains(&result.confidence_score));
                assert_eq!(result.estimated_bounty % 25, 0);
                assert!(!result.error_clusters.is_empty());
                assert!(!result.log_insights.is_empty());
            }
        }
    }

    #[test]
    fn test_saturated_critical_bug_hits_caps() {
        let long = "memory leak crash infinite loop deadlock race condition ".repeat(20);
        let bug = input("t", &long, &long, &[], Severity::Critical);
        let result = analyze_with_rng(&bug, &mut seeded());
        // 40 + 20 + 15 + 25
        assert_eq!(result.complexity_score, 100.0);
        assert_eq!(result.complexity_label, ComplexityLabel::Extreme);
        assert_eq!(result.estimated_bounty, 900);
        assert_eq!(result.confidence_score, 100.0);
    }

    #[test]
    fn test_impact_clamps_to_100() {
        let text = "user customer client login payment checkout critical urgent crash down block broken";
        let impact = impact_scores(text, Severity::Critical, &mut seeded());
        assert_eq!(impact.user_impact, 100);
        assert_eq!(impact.urgency, 100);
        assert_eq!(impact.severity, 100);
    }

    #[test]
    fn test_whitespace_logs_still_count_for_complexity() {
        let with_ws = complexity_score("x", Severity::Low, "   ");
        let without = complexity_score("x", Severity::Low, "");
        assert!(with_ws > without);
        assert_eq!(log_insights("   "), vec![NO_LOG_DATA.to_string()]);
    }

    #[test]
    fn test_empty_logs_insight() {
        assert_eq!(
            log_insights(""),
            vec!["No log data provided for analysis.".to_string()]
        );
    }

    #[test]
    fn test_401_log_insight() {
        let insights = log_insights("401 error occurred");
        assert!(insights.contains(
            &"Authentication failure (401) detected — check token lifecycle.".to_string()
        ));
    }

    #[test]
    fn test_log_insights_follow_rule_order() {
        let insights = log_insights("FATAL ERROR: Ineffective mark-compacts near heap limit");
        assert_eq!(
            insights,
            vec![
                "Heap-related issue — possible memory leak or large allocation.".to_string(),
                "Fatal error detected — process stability at risk.".to_string(),
                "V8 mark-compacts failing near heap limit — severe memory pressure.".to_string(),
            ]
        );
    }

    #[test]
    fn test_unmatched_logs_insight() {
        assert_eq!(log_insights("all good"), vec![NO_LOG_PATTERN.to_string()]);
    }

    #[test]
    fn test_uncategorized_cluster() {
        assert_eq!(
            error_clusters("plain words", ""),
            vec!["Uncategorized Error".to_string()]
        );
    }

    #[test]
    fn test_auth_redirect_scenario() {
        let bug = input(
            "Auth token loop",
            "Refreshing the page causes an infinite loop with 401 responses",
            "Error: 401 Unauthorized\nRedirecting...",
            &["auth", "jwt"],
            Severity::Critical,
        );
        let result = analyze_with_rng(&bug, &mut seeded());

        assert_eq!(result.category, "Authentication / Security");
        assert!(result.complexity_score <= 100.0);
        for cluster in ["401 Unauthorized", "Infinite Redirect", "JWT Expiration"] {
            assert!(
                result.error_clusters.contains(&cluster.to_string()),
                "missing cluster {}",
                cluster
            );
        }
        assert!(result.summary.starts_with("This is a critical-severity issue"));
    }

    #[test]
    fn test_bounty_rounds_half_away_from_zero() {
        // 12.5 * 3 * 1.0 = 37.5 -> 1.5 steps -> 2 steps
        assert_eq!(estimate_bounty(12.5, Severity::Medium), 50);
        assert_eq!(estimate_bounty(0.0, Severity::Critical), 0);
    }

    #[test]
    fn test_analysis_is_deterministic_except_popularity() {
        let bug = input("Slow query", "postgres index missing", "timeout", &["db"], Severity::Low);
        let a = analyze(&bug);
        let b = analyze(&bug);
        assert_eq!(a.category, b.category);
        assert_eq!(a.complexity_score, b.complexity_score);
        assert_eq!(a.estimated_bounty, b.estimated_bounty);
        assert_eq!(a.error_clusters, b.error_clusters);
        assert_eq!(a.log_insights, b.log_insights);
    }

    #[test]
    fn test_unknown_severity_scores_like_medium() {
        let text = "Payment webhook crash";
        let description = "Stripe callback fails for every customer";
        let logs = "Error: 500 Internal Server Error";
        let unknown = input(text, description, logs, &["payment"], Severity::from_label_lossy("bogus"));
        let medium = input(text, description, logs, &["payment"], Severity::Medium);

        let a = analyze_with_rng(&unknown, &mut seeded());
        let b = analyze_with_rng(&medium, &mut seeded());

        assert_eq!(a.category, b.category);
        assert_eq!(a.complexity_score, b.complexity_score);
        assert_eq!(a.complexity_label, b.complexity_label);
        assert_eq!(a.estimated_bounty, b.estimated_bounty);
        assert_eq!(a.confidence_score, b.confidence_score);
        assert_eq!(a.impact.user_impact, b.impact.user_impact);
        assert_eq!(a.impact.severity, b.impact.severity);
        assert_eq!(a.impact.urgency, b.impact.urgency);
        assert_eq!(a.summary, b.summary);
        assert!(a.summary.contains("medium-severity"));
        assert_eq!(a.error_clusters, b.error_clusters);
        assert_eq!(a.log_insights, b.log_insights);
    }
}

//! Developer matching
//!
//! Score = skill overlap (up to 60) + reputation (up to 25)
//!       + experience (up to 10) + jitter in [-5, 5], clamped to [0, 100].

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::types::{round1, DeveloperProfile, MatchResult, Severity};

pub const SKILL_WEIGHT: f64 = 60.0;
pub const REPUTATION_WEIGHT: f64 = 25.0;
pub const EXPERIENCE_WEIGHT: f64 = 10.0;
/// Resolved bugs needed for the full experience bonus
pub const EXPERIENCE_CAP: f64 = 50.0;
pub const MAX_VARIATION: f64 = 5.0;

/// Rank developers for a bug using a fresh per-call generator for the jitter
pub fn match_developers(
    bug_tags: &[String],
    bug_severity: Severity,
    developers: &[DeveloperProfile],
) -> Vec<MatchResult> {
    let mut rng = StdRng::from_entropy();
    match_developers_with_rng(bug_tags, bug_severity, developers, &mut rng)
}

/// Rank developers, highest score first. Ties keep input order.
///
/// `_bug_severity` does not take part in the score.
pub fn match_developers_with_rng<R: Rng + ?Sized>(
    bug_tags: &[String],
    _bug_severity: Severity,
    developers: &[DeveloperProfile],
    rng: &mut R,
) -> Vec<MatchResult> {
    if developers.is_empty() {
        return Vec::new();
    }

    let tags: Vec<String> = bug_tags.iter().map(|t| t.to_lowercase()).collect();
    let tag_set: HashSet<&str> = tags.iter().map(String::as_str).collect();
    // Duplicate tags still count towards the denominator
    let max_possible = tags.len().max(1) as f64;

    let mut matches: Vec<MatchResult> = developers
        .iter()
        .map(|dev| {
            let skills: HashSet<String> = dev.skills.iter().map(|s| s.to_lowercase()).collect();
            let overlap = skills
                .iter()
                .filter(|s| tag_set.contains(s.as_str()))
                .count() as f64;

            let skill_score = (overlap / max_possible) * SKILL_WEIGHT;
            let reputation_score = (dev.success_rate / 100.0) * REPUTATION_WEIGHT;
            let experience_score =
                (dev.bugs_resolved as f64 / EXPERIENCE_CAP).min(1.0) * EXPERIENCE_WEIGHT;
            let variation = rng.gen_range(-MAX_VARIATION..=MAX_VARIATION);

            let total = (skill_score + reputation_score + experience_score + variation)
                .clamp(0.0, 100.0);

            MatchResult {
                id: dev.id.clone(),
                name: dev.name.clone(),
                skills: dev.skills.clone(),
                success_rate: dev.success_rate,
                bugs_resolved: dev.bugs_resolved,
                avatar_url: dev.avatar_url.clone(),
                match_score: round1(total),
            }
        })
        .collect();

    // sort_by is stable
    matches.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));

    debug!(
        "Matched {} developers against {} tags",
        matches.len(),
        tags.len()
    );

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn dev(id: &str, skills: &[&str], success_rate: f64, bugs_resolved: u32) -> DeveloperProfile {
        DeveloperProfile {
            id: id.to_string(),
            name: format!("Dev {}", id),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            success_rate,
            bugs_resolved,
            avatar_url: None,
        }
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_empty_developers() {
        assert!(match_developers(&[], Severity::Critical, &[]).is_empty());
        assert!(match_developers(&tags(&["rust"]), Severity::Low, &[]).is_empty());
    }

    #[test]
    fn test_perfect_match_range() {
        let bug_tags = tags(&["React", "auth"]);
        let developers = vec![dev("1", &["react", "AUTH"], 100.0, 80)];

        for _ in 0..50 {
            let matches = match_developers(&bug_tags, Severity::High, &developers);
            assert_eq!(matches.len(), 1);
            let score = matches[0].match_score;
            assert!((90.0..=100.0).contains(&score), "score {} out of range", score);
        }
    }

    #[test]
    fn test_scores_always_clamped() {
        let developers = vec![
            dev("zero", &[], 0.0, 0),
            dev("full", &["a"], 100.0, 500),
        ];
        for _ in 0..50 {
            for m in match_developers(&tags(&["a"]), Severity::Medium, &developers) {
                assert!((0.0..=100.0).contains(&m.match_score));
            }
        }
    }

    #[test]
    fn test_sorted_descending() {
        let developers = vec![
            dev("weak", &[], 10.0, 0),
            dev("strong", &["rust", "sql"], 95.0, 60),
            dev("mid", &["rust"], 60.0, 20),
        ];
        let matches = match_developers(&tags(&["rust", "sql"]), Severity::Medium, &developers);
        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["strong", "mid", "weak"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        // StepRng(0, 0) always yields 0 -> constant jitter for every developer
        let mut rng = StepRng::new(0, 0);
        let developers = vec![
            dev("first", &["go"], 50.0, 10),
            dev("second", &["go"], 50.0, 10),
            dev("third", &["go"], 50.0, 10),
        ];
        let matches =
            match_developers_with_rng(&tags(&["go"]), Severity::Low, &developers, &mut rng);
        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
        assert_eq!(matches[0].match_score, matches[2].match_score);
    }

    #[test]
    fn test_duplicate_tags_dilute_skill_score() {
        let mut rng_a = StepRng::new(0, 0);
        let mut rng_b = StepRng::new(0, 0);
        let developers = vec![dev("1", &["rust"], 0.0, 0)];

        let single = match_developers_with_rng(&tags(&["rust"]), Severity::Low, &developers, &mut rng_a);
        let doubled =
            match_developers_with_rng(&tags(&["rust", "RUST"]), Severity::Low, &developers, &mut rng_b);
        assert!((single[0].match_score - doubled[0].match_score - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_severity_does_not_change_score() {
        let developers = vec![dev("1", &["css"], 70.0, 25)];
        let low = match_developers_with_rng(
            &tags(&["css"]),
            Severity::Low,
            &developers,
            &mut StepRng::new(0, 0),
        );
        let critical = match_developers_with_rng(
            &tags(&["css"]),
            Severity::Critical,
            &developers,
            &mut StepRng::new(0, 0),
        );
        assert_eq!(low[0].match_score, critical[0].match_score);
    }

    #[test]
    fn test_profile_fields_echoed() {
        let mut developer = dev("42", &["Python"], 88.5, 12);
        developer.avatar_url = Some("https://example.com/a.png".to_string());
        let matches = match_developers(&tags(&["python"]), Severity::Medium, &[developer]);
        let m = &matches[0];
        assert_eq!(m.id, "42");
        assert_eq!(m.name, "Dev 42");
        assert_eq!(m.skills, vec!["Python".to_string()]);
        assert_eq!(m.success_rate, 88.5);
        assert_eq!(m.bugs_resolved, 12);
        assert_eq!(m.avatar_url.as_deref(), Some("https://example.com/a.png"));
    }
}

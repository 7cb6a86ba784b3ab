//! Simulated fix verification
//!
//! The result depends only on the PR link: the link's SHA-256 digest seeds a
//! generator that produces the similarity score and the diff summary.
//! Bug and developer ids are echoed back untouched.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::keywords::DIFF_SUMMARY_TEMPLATES;
use crate::types::{round1, VerificationResult};

/// Similarity strictly above this passes
pub const PASS_THRESHOLD: f64 = 75.0;

const SUMMARY_SENTENCES: usize = 3;

pub fn verify_fix(bug_id: &str, developer_id: &str, pr_link: &str) -> VerificationResult {
    let mut rng = StdRng::seed_from_u64(seed_for(pr_link));

    let similarity_score = round1(rng.gen_range(60.0..=99.0));
    let passed = similarity_score > PASS_THRESHOLD;

    let lines_changed: u32 = rng.gen_range(5..=200);
    let files_changed: u32 = rng.gen_range(1..=15);

    let mut pool = Vec::with_capacity(DIFF_SUMMARY_TEMPLATES.len() + 1);
    pool.push(format!(
        "Modified {} files with {} line changes.",
        files_changed, lines_changed
    ));
    pool.extend(DIFF_SUMMARY_TEMPLATES.iter().map(|s| s.to_string()));

    let picks = SUMMARY_SENTENCES.min(pool.len());
    let diff_summary = index::sample(&mut rng, pool.len(), picks)
        .into_iter()
        .map(|i| pool[i].as_str())
        .collect::<Vec<_>>()
        .join(" ");

    debug!(
        "Verified fix for bug {} by {}: similarity={}, passed={}",
        bug_id, developer_id, similarity_score, passed
    );

    VerificationResult {
        bug_id: bug_id.to_string(),
        developer_id: developer_id.to_string(),
        pr_link: pr_link.to_string(),
        similarity_score,
        passed,
        diff_summary,
    }
}

/// First 8 hex digits of SHA-256(pr_link), read as a base-16 integer
pub fn seed_for(pr_link: &str) -> u64 {
    let digest = Sha256::digest(pr_link.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) as u64
}

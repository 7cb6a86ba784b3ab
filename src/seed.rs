//! Demo data
//!
//! Fills an empty database with an admin, a few reporters, a developer pool
//! and some open bugs so matching and the dashboard have something to show.

use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::info;

use crate::storage::{BugRecord, Storage, UserRecord};
use crate::types::{BugStatus, Severity, UserRole};

pub const ADMIN_ID: &str = "user-admin";

const AVATAR_BASE: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

/// (id, name, email, reputation)
const REPORTERS: &[(&str, &str, &str, f64)] = &[
    ("user-1", "Alice Johnson", "alice@example.com", 25.0),
    ("user-2", "Bob Wilson", "bob@example.com", 15.0),
    ("user-3", "Carol Davis", "carol@example.com", 30.0),
];

/// (id, name, skills, success rate, bugs resolved)
const DEVELOPERS: &[(&str, &str, &[&str], f64, u32)] = &[
    ("dev-1", "Sarah Chen", &["react", "typescript", "css", "frontend"], 94.0, 47),
    ("dev-2", "Marcus Rivera", &["auth", "jwt", "security", "node"], 91.0, 38),
    ("dev-3", "Priya Patel", &["payment", "stripe", "webhook", "python"], 88.0, 29),
    ("dev-4", "James Okafor", &["memory", "node", "kubernetes", "docker"], 85.0, 52),
    ("dev-5", "Elena Volkov", &["postgres", "sql", "database", "performance"], 90.0, 33),
];

struct DemoBug {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    logs: &'static str,
    tags: &'static [&'static str],
    severity: Severity,
    bounty: f64,
    author_id: &'static str,
    age_hours: i64,
}

const BUGS: &[DemoBug] = &[
    DemoBug {
        id: "bug-1",
        title: "JWT refresh causes infinite redirect loop",
        description: "After the access token expires the refresh token request returns 401 and the app keeps redirecting to /login.",
        logs: "Error: 401 Unauthorized\nRedirecting to /login\nRedirecting to /login",
        tags: &["auth", "jwt", "react"],
        severity: Severity::Critical,
        bounty: 500.0,
        author_id: "user-1",
        age_hours: 72,
    },
    DemoBug {
        id: "bug-2",
        title: "Stripe webhook fails on currency conversion",
        description: "Payments in EUR trigger a webhook failure and the invoice is never marked as paid.",
        logs: "Webhook callback failed: TypeError: cannot read properties of undefined (reading 'amount')",
        tags: &["payment", "stripe", "webhook"],
        severity: Severity::High,
        bounty: 300.0,
        author_id: "user-2",
        age_hours: 48,
    },
    DemoBug {
        id: "bug-3",
        title: "Worker memory leak under sustained load",
        description: "Node workers grow until they hit the heap limit and crash after a few hours.",
        logs: "FATAL ERROR: Ineffective mark-compacts near heap limit Allocation failed - JavaScript heap out of memory",
        tags: &["memory", "node", "docker"],
        severity: Severity::Critical,
        bounty: 750.0,
        author_id: "user-3",
        age_hours: 24,
    },
    DemoBug {
        id: "bug-4",
        title: "Dashboard table overflows on mobile",
        description: "The responsive layout breaks below 400px and the table renders off screen.",
        logs: "",
        tags: &["css", "frontend", "mobile"],
        severity: Severity::Low,
        bounty: 50.0,
        author_id: "user-1",
        age_hours: 6,
    },
];

/// Seed an empty database. Returns `false` when the demo admin already exists.
pub fn seed_demo_data(storage: &Storage) -> Result<bool> {
    if storage.get_user(ADMIN_ID)?.is_some() {
        return Ok(false);
    }

    let now = Utc::now();

    storage.insert_user(&UserRecord {
        id: ADMIN_ID.to_string(),
        name: "Admin User".to_string(),
        email: "admin@crowdfundfix.io".to_string(),
        role: UserRole::Admin,
        reputation: 100.0,
        skills: Vec::new(),
        success_rate: 0.0,
        bugs_resolved: 0,
        avatar_url: Some(format!("{}Admin", AVATAR_BASE)),
        created_at: now,
    })?;

    for &(id, name, email, reputation) in REPORTERS {
        let first_name = name.split_whitespace().next().unwrap_or(name);
        storage.insert_user(&UserRecord {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role: UserRole::User,
            reputation,
            skills: Vec::new(),
            success_rate: 0.0,
            bugs_resolved: 0,
            avatar_url: Some(format!("{}{}", AVATAR_BASE, first_name)),
            created_at: now,
        })?;
    }

    for &(id, name, skills, success_rate, bugs_resolved) in DEVELOPERS {
        storage.insert_user(&UserRecord {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@dev.io", name.to_lowercase().replace(' ', ".")),
            role: UserRole::Developer,
            reputation: bugs_resolved as f64 * 2.5,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            success_rate,
            bugs_resolved,
            avatar_url: Some(format!("{}{}", AVATAR_BASE, id)),
            created_at: now,
        })?;
    }

    for bug in BUGS {
        storage.insert_bug(&BugRecord {
            id: bug.id.to_string(),
            title: bug.title.to_string(),
            description: bug.description.to_string(),
            repo_link: String::new(),
            logs: bug.logs.to_string(),
            tags: bug.tags.iter().map(|t| t.to_string()).collect(),
            severity: bug.severity,
            expected_behavior: String::new(),
            status: BugStatus::Open,
            ai_priority_score: None,
            predicted_complexity: None,
            predicted_bounty: None,
            bounty: bug.bounty,
            funds_raised: 0.0,
            contributors: 0,
            author_id: bug.author_id.to_string(),
            assigned_developer_id: None,
            created_at: now - Duration::hours(bug.age_hours),
        })?;
    }

    info!(
        "Seeded {} users, {} developers, {} bugs",
        REPORTERS.len() + 1,
        DEVELOPERS.len(),
        BUGS.len()
    );
    Ok(true)
}

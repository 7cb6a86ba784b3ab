//! SQLite storage for the marketplace
//!
//! Users (developers included), bugs, fundings and developer matches.

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::types::{BugStatus, DeveloperProfile, Severity, UserRole};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL DEFAULT 'User',
    reputation REAL NOT NULL DEFAULT 0,
    skills TEXT NOT NULL DEFAULT '[]',
    success_rate REAL NOT NULL DEFAULT 0,
    bugs_resolved INTEGER NOT NULL DEFAULT 0,
    avatar_url TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS bugs (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    repo_link TEXT NOT NULL DEFAULT '',
    logs TEXT NOT NULL DEFAULT '',
    tags TEXT NOT NULL DEFAULT '[]',
    severity TEXT NOT NULL DEFAULT 'Medium',
    expected_behavior TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'Open',
    ai_priority_score REAL,
    predicted_complexity TEXT,
    predicted_bounty REAL,
    bounty REAL NOT NULL DEFAULT 0,
    funds_raised REAL NOT NULL DEFAULT 0,
    contributors INTEGER NOT NULL DEFAULT 0,
    author_id TEXT NOT NULL,
    assigned_developer_id TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS fundings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    bug_id TEXT NOT NULL REFERENCES bugs(id),
    contributor_name TEXT NOT NULL,
    amount REAL NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS developer_matches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    bug_id TEXT NOT NULL REFERENCES bugs(id),
    developer_id TEXT NOT NULL REFERENCES users(id),
    match_score REAL NOT NULL,
    UNIQUE(bug_id, developer_id)
);

CREATE INDEX IF NOT EXISTS idx_bugs_created_at ON bugs(created_at);
CREATE INDEX IF NOT EXISTS idx_fundings_bug ON fundings(bug_id);
"#;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub reputation: f64,
    pub skills: Vec<String>,
    pub success_rate: f64,
    pub bugs_resolved: u32,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn to_profile(&self) -> DeveloperProfile {
        DeveloperProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            skills: self.skills.clone(),
            success_rate: self.success_rate,
            bugs_resolved: self.bugs_resolved,
            avatar_url: self.avatar_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub repo_link: String,
    pub logs: String,
    pub tags: Vec<String>,
    pub severity: Severity,
    pub expected_behavior: String,
    pub status: BugStatus,
    #[serde(rename = "aiScore")]
    pub ai_priority_score: Option<f64>,
    pub predicted_complexity: Option<String>,
    pub predicted_bounty: Option<f64>,
    pub bounty: f64,
    pub funds_raised: f64,
    pub contributors: u32,
    pub author_id: String,
    pub assigned_developer_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingRecord {
    pub id: i64,
    pub bug_id: String,
    pub contributor_name: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeveloperMatchRecord {
    pub id: i64,
    pub bug_id: String,
    pub developer_id: String,
    pub match_score: f64,
}

// ============================================================================
// STORAGE
// ============================================================================

pub struct Storage {
    conn: Mutex<Connection>,
}

const USER_COLUMNS: &str =
    "id, name, email, role, reputation, skills, success_rate, bugs_resolved, avatar_url, created_at";

const BUG_COLUMNS: &str = "id, title, description, repo_link, logs, tags, severity, expected_behavior, status, \
     ai_priority_score, predicted_complexity, predicted_bounty, bounty, funds_raised, contributors, \
     author_id, assigned_developer_id, created_at";

impl Storage {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.run_migrations()?;
        info!("SQLite storage opened at {}", path.as_ref().display());
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.run_migrations()?;
        Ok(storage)
    }

    /// Open `path`, treating `:memory:` as a throwaway database
    pub fn open(path: &str) -> Result<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::new(path)
        }
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ========================================================================
    // USERS
    // ========================================================================

    pub fn insert_user(&self, user: &UserRecord) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            &format!(
                "INSERT INTO users ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                USER_COLUMNS
            ),
            params![
                user.id,
                user.name,
                user.email,
                user.role.as_str(),
                user.reputation,
                serde_json::to_string(&user.skills)?,
                user.success_rate,
                user.bugs_resolved,
                user.avatar_url,
                timestamp(&user.created_at),
            ],
        )?;
        debug!("Inserted user {} ({})", user.id, user.role.as_str());
        Ok(())
    }

    pub fn get_user(&self, id: &str) -> Result<Option<UserRecord>> {
        let conn = self.conn.lock();
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn email_exists(&self, email: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE LOWER(email) = LOWER(?1)",
            params![email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// All developers, in registration order
    pub fn list_developers(&self) -> Result<Vec<UserRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users WHERE role = 'Developer' ORDER BY created_at ASC, rowid ASC",
            USER_COLUMNS
        ))?;
        let users = stmt
            .query_map([], row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub fn top_developers(&self, limit: u32) -> Result<Vec<UserRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users WHERE role = 'Developer' ORDER BY bugs_resolved DESC, rowid ASC LIMIT ?1",
            USER_COLUMNS
        ))?;
        let users = stmt
            .query_map(params![limit], row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    // ========================================================================
    // BUGS
    // ========================================================================

    pub fn insert_bug(&self, bug: &BugRecord) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            &format!(
                "INSERT INTO bugs ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
                BUG_COLUMNS
            ),
            params![
                bug.id,
                bug.title,
                bug.description,
                bug.repo_link,
                bug.logs,
                serde_json::to_string(&bug.tags)?,
                bug.severity.as_str(),
                bug.expected_behavior,
                bug.status.as_str(),
                bug.ai_priority_score,
                bug.predicted_complexity,
                bug.predicted_bounty,
                bug.bounty,
                bug.funds_raised,
                bug.contributors,
                bug.author_id,
                bug.assigned_developer_id,
                timestamp(&bug.created_at),
            ],
        )?;
        debug!("Inserted bug {}", bug.id);
        Ok(())
    }

    pub fn get_bug(&self, id: &str) -> Result<Option<BugRecord>> {
        let conn = self.conn.lock();
        let bug = conn
            .query_row(
                &format!("SELECT {} FROM bugs WHERE id = ?1", BUG_COLUMNS),
                params![id],
                row_to_bug,
            )
            .optional()?;
        Ok(bug)
    }

    /// Newest first; `limit` of `None` returns every bug
    pub fn list_bugs(&self, limit: Option<u32>) -> Result<Vec<BugRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM bugs ORDER BY created_at DESC, rowid DESC LIMIT ?1",
            BUG_COLUMNS
        ))?;
        // SQLite treats a negative LIMIT as unbounded
        let limit = limit.map(i64::from).unwrap_or(-1);
        let bugs = stmt
            .query_map(params![limit], row_to_bug)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(bugs)
    }

    pub fn update_bug_status(&self, id: &str, status: BugStatus) -> Result<bool> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE bugs SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        Ok(updated > 0)
    }

    pub fn update_bug_ai_scores(
        &self,
        id: &str,
        priority_score: f64,
        predicted_complexity: &str,
        predicted_bounty: f64,
    ) -> Result<bool> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE bugs SET ai_priority_score = ?1, predicted_complexity = ?2, predicted_bounty = ?3 WHERE id = ?4",
            params![priority_score, predicted_complexity, predicted_bounty, id],
        )?;
        Ok(updated > 0)
    }

    // ========================================================================
    // FUNDING
    // ========================================================================

    /// Record a contribution and roll it into the bug's totals.
    ///
    /// Returns `None` if the bug does not exist. A bug with a positive bounty
    /// moves to `Funded` once `funds_raised >= bounty`.
    pub fn add_funding(
        &self,
        bug_id: &str,
        contributor_name: &str,
        amount: f64,
    ) -> Result<Option<FundingRecord>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let totals: Option<(f64, f64)> = tx
            .query_row(
                "SELECT funds_raised, bounty FROM bugs WHERE id = ?1",
                params![bug_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let Some((funds_raised, bounty)) = totals else {
            return Ok(None);
        };

        let created_at = Utc::now();
        tx.execute(
            "INSERT INTO fundings (bug_id, contributor_name, amount, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![bug_id, contributor_name, amount, timestamp(&created_at)],
        )?;
        let id = tx.last_insert_rowid();

        let new_total = funds_raised + amount;
        tx.execute(
            "UPDATE bugs SET funds_raised = ?1, contributors = contributors + 1 WHERE id = ?2",
            params![new_total, bug_id],
        )?;
        if bounty > 0.0 && new_total >= bounty {
            tx.execute(
                "UPDATE bugs SET status = ?1 WHERE id = ?2",
                params![BugStatus::Funded.as_str(), bug_id],
            )?;
            info!("Bug {} fully funded ({:.2}/{:.2})", bug_id, new_total, bounty);
        }

        tx.commit()?;

        Ok(Some(FundingRecord {
            id,
            bug_id: bug_id.to_string(),
            contributor_name: contributor_name.to_string(),
            amount,
            created_at,
        }))
    }

    pub fn get_fundings(&self, bug_id: &str) -> Result<Vec<FundingRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, bug_id, contributor_name, amount, created_at FROM fundings WHERE bug_id = ?1 ORDER BY id ASC",
        )?;
        let fundings = stmt
            .query_map(params![bug_id], |row| {
                Ok(FundingRecord {
                    id: row.get(0)?,
                    bug_id: row.get(1)?,
                    contributor_name: row.get(2)?,
                    amount: row.get(3)?,
                    created_at: parse_timestamp(row, 4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(fundings)
    }

    // ========================================================================
    // DEVELOPER MATCHES
    // ========================================================================

    /// Insert a match unless one already exists for the pair. An existing
    /// score is left as it was.
    pub fn record_match_if_absent(
        &self,
        bug_id: &str,
        developer_id: &str,
        match_score: f64,
    ) -> Result<bool> {
        let conn = self.conn.lock();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO developer_matches (bug_id, developer_id, match_score) VALUES (?1, ?2, ?3)",
            params![bug_id, developer_id, match_score],
        )?;
        Ok(inserted > 0)
    }

    pub fn get_matches(&self, bug_id: &str) -> Result<Vec<DeveloperMatchRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, bug_id, developer_id, match_score FROM developer_matches WHERE bug_id = ?1 ORDER BY match_score DESC, id ASC",
        )?;
        let matches = stmt
            .query_map(params![bug_id], |row| {
                Ok(DeveloperMatchRecord {
                    id: row.get(0)?,
                    bug_id: row.get(1)?,
                    developer_id: row.get(2)?,
                    match_score: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(matches)
    }

    // ========================================================================
    // ANALYTICS
    // ========================================================================

    pub fn count_bugs(&self) -> Result<u32> {
        let conn = self.conn.lock();
        let count: u32 = conn.query_row("SELECT COUNT(*) FROM bugs", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Bug counts keyed by severity label; every severity is present
    pub fn count_bugs_by_severity(&self) -> Result<BTreeMap<String, u32>> {
        let mut counts: BTreeMap<String, u32> = Severity::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT severity, COUNT(*) FROM bugs GROUP BY severity")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        for (severity, count) in rows {
            counts.insert(severity, count);
        }
        Ok(counts)
    }

    /// Bug counts keyed by status label; every status is present
    pub fn count_bugs_by_status(&self) -> Result<BTreeMap<String, u32>> {
        let mut counts: BTreeMap<String, u32> = BugStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM bugs GROUP BY status")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        for (status, count) in rows {
            counts.insert(status, count);
        }
        Ok(counts)
    }

    /// (sum of funds raised, average bounty) across all bugs
    pub fn funding_totals(&self) -> Result<(f64, f64)> {
        let conn = self.conn.lock();
        let totals = conn.query_row(
            "SELECT COALESCE(SUM(funds_raised), 0.0), COALESCE(AVG(bounty), 0.0) FROM bugs",
            [],
            |row| Ok((row.get::<_, f64>(0)?, row.get::<_, f64>(1)?)),
        )?;
        Ok(totals)
    }
}

// ============================================================================
// ROW MAPPING
// ============================================================================

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_json_list(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_enum<T: std::str::FromStr<Err = String>>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: parse_enum(row, 3)?,
        reputation: row.get(4)?,
        skills: parse_json_list(row, 5)?,
        success_rate: row.get(6)?,
        bugs_resolved: row.get(7)?,
        avatar_url: row.get(8)?,
        created_at: parse_timestamp(row, 9)?,
    })
}

fn row_to_bug(row: &Row<'_>) -> rusqlite::Result<BugRecord> {
    Ok(BugRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        repo_link: row.get(3)?,
        logs: row.get(4)?,
        tags: parse_json_list(row, 5)?,
        severity: parse_enum(row, 6)?,
        expected_behavior: row.get(7)?,
        status: parse_enum(row, 8)?,
        ai_priority_score: row.get(9)?,
        predicted_complexity: row.get(10)?,
        predicted_bounty: row.get(11)?,
        bounty: row.get(12)?,
        funds_raised: row.get(13)?,
        contributors: row.get(14)?,
        author_id: row.get(15)?,
        assigned_developer_id: row.get(16)?,
        created_at: parse_timestamp(row, 17)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bug(id: &str, bounty: f64) -> BugRecord {
        BugRecord {
            id: id.to_string(),
            title: "Checkout crashes".to_string(),
            description: "Stripe webhook returns 500".to_string(),
            repo_link: String::new(),
            logs: "500 Internal Server Error".to_string(),
            tags: vec!["payment".to_string(), "backend".to_string()],
            severity: Severity::High,
            expected_behavior: String::new(),
            status: BugStatus::Open,
            ai_priority_score: None,
            predicted_complexity: None,
            predicted_bounty: None,
            bounty,
            funds_raised: 0.0,
            contributors: 0,
            author_id: "user-1".to_string(),
            assigned_developer_id: None,
            created_at: Utc::now(),
        }
    }

    fn developer(id: &str, email: &str, resolved: u32) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            name: format!("Dev {}", id),
            email: email.to_string(),
            role: UserRole::Developer,
            reputation: 0.0,
            skills: vec!["rust".to_string()],
            success_rate: 90.0,
            bugs_resolved: resolved,
            avatar_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_bug_round_trip() {
        let storage = Storage::in_memory().unwrap();
        storage.insert_bug(&bug("bug-1", 0.0)).unwrap();

        let loaded = storage.get_bug("bug-1").unwrap().unwrap();
        assert_eq!(loaded.tags, vec!["payment".to_string(), "backend".to_string()]);
        assert_eq!(loaded.severity, Severity::High);
        assert_eq!(loaded.status, BugStatus::Open);
        assert!(storage.get_bug("bug-404").unwrap().is_none());
    }

    #[test]
    fn test_list_bugs_newest_first() {
        let storage = Storage::in_memory().unwrap();
        storage.insert_bug(&bug("bug-a", 0.0)).unwrap();
        storage.insert_bug(&bug("bug-b", 0.0)).unwrap();
        storage.insert_bug(&bug("bug-c", 0.0)).unwrap();

        let ids: Vec<String> = storage
            .list_bugs(None)
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["bug-c", "bug-b", "bug-a"]);
        assert_eq!(storage.list_bugs(Some(2)).unwrap().len(), 2);
    }

    #[test]
    fn test_ai_scores_and_status_updates() {
        let storage = Storage::in_memory().unwrap();
        storage.insert_bug(&bug("bug-1", 0.0)).unwrap();

        assert!(storage.update_bug_ai_scores("bug-1", 72.4, "High", 450.0).unwrap());
        assert!(storage.update_bug_status("bug-1", BugStatus::InReview).unwrap());
        assert!(!storage.update_bug_status("bug-x", BugStatus::Resolved).unwrap());

        let loaded = storage.get_bug("bug-1").unwrap().unwrap();
        assert_eq!(loaded.ai_priority_score, Some(72.4));
        assert_eq!(loaded.predicted_complexity.as_deref(), Some("High"));
        assert_eq!(loaded.predicted_bounty, Some(450.0));
        assert_eq!(loaded.status, BugStatus::InReview);
    }

    #[test]
    fn test_funding_reaches_bounty() {
        let storage = Storage::in_memory().unwrap();
        storage.insert_bug(&bug("bug-1", 100.0)).unwrap();

        storage.add_funding("bug-1", "alice", 60.0).unwrap().unwrap();
        let partial = storage.get_bug("bug-1").unwrap().unwrap();
        assert_eq!(partial.status, BugStatus::Open);
        assert_eq!(partial.contributors, 1);

        storage.add_funding("bug-1", "bob", 40.0).unwrap().unwrap();
        let funded = storage.get_bug("bug-1").unwrap().unwrap();
        assert_eq!(funded.funds_raised, 100.0);
        assert_eq!(funded.contributors, 2);
        assert_eq!(funded.status, BugStatus::Funded);

        assert_eq!(storage.get_fundings("bug-1").unwrap().len(), 2);
        assert!(storage.add_funding("bug-x", "carol", 5.0).unwrap().is_none());
    }

    #[test]
    fn test_zero_bounty_never_auto_funds() {
        let storage = Storage::in_memory().unwrap();
        storage.insert_bug(&bug("bug-1", 0.0)).unwrap();
        storage.add_funding("bug-1", "alice", 500.0).unwrap();
        assert_eq!(
            storage.get_bug("bug-1").unwrap().unwrap().status,
            BugStatus::Open
        );
    }

    #[test]
    fn test_match_is_recorded_once() {
        let storage = Storage::in_memory().unwrap();
        storage.insert_bug(&bug("bug-1", 0.0)).unwrap();
        storage.insert_user(&developer("dev-1", "d1@example.com", 3)).unwrap();

        assert!(storage.record_match_if_absent("bug-1", "dev-1", 81.5).unwrap());
        assert!(!storage.record_match_if_absent("bug-1", "dev-1", 12.0).unwrap());

        let matches = storage.get_matches("bug-1").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_score, 81.5);
    }

    #[test]
    fn test_developers_and_email_lookup() {
        let storage = Storage::in_memory().unwrap();
        storage.insert_user(&developer("dev-1", "a@example.com", 3)).unwrap();
        storage.insert_user(&developer("dev-2", "b@example.com", 30)).unwrap();
        let mut plain = developer("user-1", "c@example.com", 0);
        plain.role = UserRole::User;
        storage.insert_user(&plain).unwrap();

        assert!(storage.email_exists("A@example.com").unwrap());
        assert!(!storage.email_exists("z@example.com").unwrap());
        assert_eq!(storage.list_developers().unwrap().len(), 2);
        assert_eq!(storage.top_developers(1).unwrap()[0].id, "dev-2");
        assert!(storage.insert_user(&developer("dev-3", "a@example.com", 0)).is_err());
    }

    #[test]
    fn test_grouped_counts_are_zero_filled() {
        let storage = Storage::in_memory().unwrap();
        storage.insert_bug(&bug("bug-1", 200.0)).unwrap();

        let by_severity = storage.count_bugs_by_severity().unwrap();
        assert_eq!(by_severity.len(), 4);
        assert_eq!(by_severity["High"], 1);
        assert_eq!(by_severity["Low"], 0);

        let by_status = storage.count_bugs_by_status().unwrap();
        assert_eq!(by_status.len(), 5);
        assert_eq!(by_status["In Review"], 0);

        assert_eq!(storage.funding_totals().unwrap(), (0.0, 200.0));
    }
}

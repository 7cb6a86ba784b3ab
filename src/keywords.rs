//! Keyword tables driving the heuristic engines
//!
//! Every table is an ordered slice. Iteration order is observable: category
//! ties go to the earliest entry and clusters/insights are reported in table
//! order.

/// Category label -> substring keywords
pub const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Authentication / Security",
        &[
            "auth", "jwt", "token", "login", "password", "session", "oauth", "security",
            "permission", "401", "403", "credential",
        ],
    ),
    (
        "Payment Gateway Integration",
        &[
            "payment", "stripe", "billing", "invoice", "charge", "webhook", "currency",
            "checkout", "transaction",
        ],
    ),
    (
        "UI / Frontend",
        &[
            "css", "ui", "frontend", "react", "component", "render", "layout", "mobile",
            "responsive", "z-index", "animation", "dom",
        ],
    ),
    (
        "Memory Management / Infrastructure",
        &[
            "memory", "leak", "oom", "heap", "buffer", "gc", "worker", "kubernetes", "docker",
            "infra", "devops", "crash",
        ],
    ),
    (
        "Database / Data Layer",
        &[
            "database", "sql", "query", "orm", "migration", "index", "postgres", "mysql",
            "mongo", "redis",
        ],
    ),
    (
        "API / Backend",
        &[
            "api", "endpoint", "rest", "graphql", "backend", "server", "route", "middleware",
            "cors", "500",
        ],
    ),
    (
        "Performance",
        &[
            "slow", "latency", "timeout", "performance", "cache", "optimize", "bottleneck",
            "throughput",
        ],
    ),
];

pub const GENERAL_CATEGORY: &str = "General Bug";

pub const COMPLEXITY_KEYWORDS: &[&str] = &[
    "memory",
    "leak",
    "crash",
    "infinite",
    "loop",
    "deadlock",
    "race condition",
    "concurrent",
    "heap",
    "oom",
    "segfault",
];

pub const USER_IMPACT_KEYWORDS: &[&str] =
    &["user", "customer", "client", "login", "payment", "checkout"];

pub const URGENCY_KEYWORDS: &[&str] = &["critical", "urgent", "crash", "down", "block", "broken"];

/// Cluster label -> substring patterns; a cluster matches if any pattern does
pub const ERROR_CLUSTERS: &[(&str, &[&str])] = &[
    (
        "TypeError",
        &["typeerror", "cannot read propert", "undefined is not"],
    ),
    (
        "401 Unauthorized",
        &["401", "unauthorized", "authentication failed"],
    ),
    ("500 Server Error", &["500", "internal server error"]),
    ("Infinite Redirect", &["redirect", "loop", "infinite"]),
    (
        "JWT Expiration",
        &["jwt", "token expired", "refresh token"],
    ),
    ("Webhook Failure", &["webhook", "callback fail"]),
    ("Data Parsing", &["parse", "json", "deserializ"]),
    ("OOM Crash", &["oom", "out of memory", "heap limit"]),
    ("Buffer Retention", &["buffer", "stream", "unclosed"]),
    ("Worker Dying", &["worker", "process exit", "signal"]),
    ("Timeout", &["timeout", "timed out", "deadline"]),
    (
        "Connection Error",
        &["connection refused", "econnrefused", "network"],
    ),
];

pub const UNCATEGORIZED_CLUSTER: &str = "Uncategorized Error";

/// Log keyword -> advisory message
pub const LOG_INSIGHT_RULES: &[(&str, &str)] = &[
    ("redirect", "Detected redirect loop pattern in log output."),
    (
        "401",
        "Authentication failure (401) detected — check token lifecycle.",
    ),
    (
        "500",
        "Server error (500) detected — check server-side exception handlers.",
    ),
    (
        "undefined",
        "Accessing undefined value — missing null check or data validation.",
    ),
    (
        "timeout",
        "Timeout detected — check service connectivity and retry logic.",
    ),
    (
        "heap",
        "Heap-related issue — possible memory leak or large allocation.",
    ),
    (
        "oom",
        "Out of memory condition — investigate buffer/stream management.",
    ),
    (
        "touppercase",
        "Calling method on potentially undefined value — add type guard.",
    ),
    (
        "fatal error",
        "Fatal error detected — process stability at risk.",
    ),
    (
        "mark-compacts",
        "V8 mark-compacts failing near heap limit — severe memory pressure.",
    ),
];

pub const NO_LOG_DATA: &str = "No log data provided for analysis.";
pub const NO_LOG_PATTERN: &str = "Log data present but no specific patterns matched.";

/// Static diff-summary sentences; the files/lines sentence is built at runtime
/// and sits in front of these in the template pool.
pub const DIFF_SUMMARY_TEMPLATES: &[&str] = &[
    "Key changes in error handling and validation logic.",
    "Added unit tests covering the reported scenario.",
    "Refactored affected module for better error isolation.",
];

/// Count how many keywords occur as substrings of `haystack` (distinct keywords, not occurrences)
pub fn count_present(haystack: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| haystack.contains(*kw)).count()
}

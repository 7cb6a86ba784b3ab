//! Bugs command - list reported bugs

use crate::client::CrowdfixClient;
use crate::style::*;
use anyhow::Result;

pub async fn run(server: &str, limit: usize) -> Result<()> {
    print_header("Reported Bugs");

    let bugs = CrowdfixClient::new(server).list_bugs().await?;
    if bugs.is_empty() {
        print_info("No bugs reported yet.");
        return Ok(());
    }

    println!();
    println!(
        "{:<12}  {:<32}  {:<8}  {:<9}  {:>10}",
        "ID", "Title", "Severity", "Status", "Funded"
    );
    println!("{}", "─".repeat(79));

    for bug in bugs.iter().take(limit) {
        let severity = bug.severity.as_str();
        let severity = match severity {
            "Critical" => style_red(severity),
            "High" => style_yellow(severity),
            other => other.to_string(),
        };
        println!(
            "{:<12}  {:<32}  {:<8}  {:<9}  {:>10}",
            style_dim(&bug.id),
            truncate(&bug.title, 32),
            severity,
            bug.status.as_str(),
            format!("{:.2}/{:.2}", bug.funds_raised, bug.bounty)
        );
    }

    println!();
    println!("Showing {} of {} bugs", bugs.len().min(limit), bugs.len());
    Ok(())
}

//! Match command - rank developers for a bug

use crate::client::CrowdfixClient;
use crate::style::*;
use anyhow::Result;

pub async fn run(server: &str, bug_id: &str) -> Result<()> {
    print_header(&format!("Developer Matches for {}", bug_id));

    let matches = CrowdfixClient::new(server).match_developers(bug_id).await?;

    println!();
    println!(
        "{:>4}  {:<20}  {:>7}  {:>8}  Skills",
        "Rank", "Developer", "Score", "Resolved"
    );
    println!("{}", "─".repeat(70));

    for (i, m) in matches.iter().enumerate() {
        let rank = format!("#{}", i + 1);
        let rank_styled = if i == 0 {
            style_yellow(&rank)
        } else if i < 3 {
            style_cyan(&rank)
        } else {
            rank
        };
        println!(
            "{:>4}  {:<20}  {:>7}  {:>8}  {}",
            rank_styled,
            truncate(&m.name, 20),
            style_score(m.match_score),
            m.bugs_resolved,
            style_dim(&m.skills.join(", "))
        );
    }

    Ok(())
}

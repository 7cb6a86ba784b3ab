//! Dashboard command

use crate::client::CrowdfixClient;
use crate::style::*;
use anyhow::Result;

pub async fn run(server: &str) -> Result<()> {
    let dashboard = CrowdfixClient::new(server).dashboard().await?;

    print_header("CrowdfundFix Dashboard");
    println!(
        "Bugs:           {} ({} resolved, {}%)",
        style_bold(&dashboard.total_bugs.to_string()),
        dashboard.resolved_bugs,
        dashboard.resolved_percentage
    );
    println!(
        "Total Funding:  {}",
        style_green(&format!("${:.2}", dashboard.total_funding))
    );
    println!("Average Bounty: ${:.2}", dashboard.average_bounty);

    println!();
    println!("{}", style_bold("By severity"));
    for (severity, count) in &dashboard.bugs_by_severity {
        println!("  {:<10} {}", severity, count);
    }

    println!();
    println!("{}", style_bold("By status"));
    for (status, count) in &dashboard.bugs_by_status {
        println!("  {:<10} {}", status, count);
    }

    if !dashboard.top_developers.is_empty() {
        println!();
        println!("{}", style_bold("Top developers"));
        for dev in &dashboard.top_developers {
            println!(
                "  {:<20} {:>5.1}%  {} resolved",
                truncate(&dev.name, 20),
                dev.success_rate,
                dev.bugs_resolved
            );
        }
    }

    Ok(())
}

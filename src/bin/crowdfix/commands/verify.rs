//! Verify command - grade a fix locally

use crate::style::*;
use anyhow::Result;
use crowdfundfix::verification;

pub fn run(bug_id: &str, developer_id: &str, pr_link: &str, json: bool) -> Result<()> {
    let result = verification::verify_fix(bug_id, developer_id, pr_link);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_header("Fix Verification");
    println!("PR:          {}", result.pr_link);
    println!("Similarity:  {}%", style_score(result.similarity_score));
    println!(
        "Result:      {}",
        if result.passed {
            style_green("PASSED")
        } else {
            style_red("FAILED")
        }
    );
    println!();
    println!("{}", style_dim(&result.diff_summary));

    Ok(())
}

//! Analyze command - run the analysis engine locally

use crate::style::*;
use anyhow::Result;
use crowdfundfix::{analysis, AnalysisInput, Severity};

pub fn run(input: AnalysisInput, severity: &str, json: bool) -> Result<()> {
    let input = AnalysisInput {
        severity: Severity::from_label_lossy(severity),
        ..input
    };
    let result = analysis::analyze(&input);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_header("Bug Analysis");
    println!("Category:         {}", style_cyan(&result.category));
    println!(
        "Complexity:       {} ({:.2})",
        style_bold(result.complexity_label.as_str()),
        result.complexity_score
    );
    println!(
        "Estimated Bounty: {}",
        style_green(&format!("${}", result.estimated_bounty))
    );
    println!("Confidence:       {}", style_score(result.confidence_score));
    println!("Priority:         {}", style_score(result.priority_score));
    println!(
        "Impact:           user {} / severity {} / urgency {} / popularity {}",
        result.impact.user_impact,
        result.impact.severity,
        result.impact.urgency,
        result.impact.popularity
    );
    println!();
    println!("{}", style_dim(&result.summary));

    if !result.error_clusters.is_empty() {
        println!();
        println!("{}", style_bold("Error clusters"));
        for cluster in &result.error_clusters {
            println!("  - {}", cluster);
        }
    }

    println!();
    println!("{}", style_bold("Log insights"));
    for insight in &result.log_insights {
        println!("  - {}", insight);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_severity_is_analyzed_as_medium() {
        let input = AnalysisInput {
            title: "Checkout button broken".to_string(),
            ..Default::default()
        };
        assert!(run(input.clone(), "critical", true).is_ok());
        assert!(run(input, "Apocalyptic", true).is_ok());
    }
}

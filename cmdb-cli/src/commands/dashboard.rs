//! Dashboard command - key metrics, recent changes and CI distribution

use anyhow::Result;
use colored::Colorize;

use cmdb_core::services::{Breakdown, Dashboard};
use cmdb_core::{CmdbContext, Route};

use super::{get_context, require_view};
use crate::output;

/// Rows shown in the recent-changes table
pub const RECENT_CHANGES: usize = 5;

fn render(dashboard: &Dashboard) {
    println!("{}", "Key Metrics".bold());
    let mut metrics = output::create_table();
    metrics.set_header(dashboard.metrics.iter().map(|m| m.label).collect::<Vec<_>>());
    metrics.add_row(dashboard.metrics.iter().map(|m| m.value.to_string()).collect::<Vec<_>>());
    println!("{}", metrics);

    println!();
    println!("{}", "Recent Changes".bold());
    let mut changes = output::create_table();
    changes.set_header(vec!["Time", "Action", "CI Name", "User", "Details"]);
    for audit in &dashboard.recent_changes {
        changes.add_row(vec![
            audit.timestamp.replacen('T', " ", 1).trim_end_matches('Z').to_string(),
            audit.action.label().to_string(),
            audit.ci_name.clone(),
            audit.user.clone(),
            audit.details.clone(),
        ]);
    }
    println!("{}", changes);

    println!();
    let heading = match dashboard.breakdown {
        Breakdown::Type => "CI Distribution by Type",
        Breakdown::Environment => "CI Distribution by Environment",
    };
    println!("{}", heading.bold());
    let total: usize = dashboard.distribution.iter().map(|s| s.value).sum();
    let mut distribution = output::create_table();
    distribution.set_header(vec!["Group", "Items", "Share"]);
    for slice in &dashboard.distribution {
        let share = if total == 0 {
            0.0
        } else {
            slice.value as f64 * 100.0 / total as f64
        };
        distribution.add_row(vec![
            slice.name.to_string(),
            slice.value.to_string(),
            format!("{:.0}%", share),
        ]);
    }
    println!("{}", distribution);
}

/// Show the dashboard view
pub fn show(ctx: &CmdbContext, breakdown: Breakdown) -> Result<()> {
    render(&ctx.inventory.dashboard(breakdown, RECENT_CHANGES)?);
    Ok(())
}

pub fn run(breakdown: Breakdown, json: bool) -> Result<()> {
    let ctx = get_context()?;
    require_view(&ctx, Route::Dashboard)?;

    if json {
        return output::json(&ctx.inventory.dashboard(breakdown, RECENT_CHANGES)?);
    }
    show(&ctx, breakdown)
}

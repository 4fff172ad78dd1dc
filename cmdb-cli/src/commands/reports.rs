//! Reports command - the report catalogue

use anyhow::Result;
use colored::Colorize;

use cmdb_core::{CmdbContext, Route};

use super::{get_context, require_view};
use crate::output;

/// Show the reports view
pub fn show(ctx: &CmdbContext) {
    println!("{}", "View and download reports for your configuration items".dimmed());
    let mut table = output::create_table();
    table.set_header(vec!["Report", "Date", "Description"]);
    for report in ctx.inventory.reports() {
        table.add_row(vec![report.title, report.date, report.description]);
    }
    println!("{}", table);
}

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    require_view(&ctx, Route::Reports)?;

    if json {
        return output::json(&ctx.inventory.reports());
    }
    show(&ctx);
    Ok(())
}

//! Status command - users, session and saved settings

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status()?;

    if json {
        return output::json(&status);
    }

    println!("{}", "CMDB Console Status".bold());
    println!();

    if status.first_run {
        output::warning("No users registered. Run 'cmdb register <email>' to set up.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let signed_in = match (&status.session.email, status.session.role) {
        (Some(email), Some(role)) => format!("{} ({})", email, role.label()),
        _ => "no".to_string(),
    };

    table.add_row(vec!["Users", &status.total_users.to_string()]);
    table.add_row(vec!["Administrators", &status.admin_users.to_string()]);
    table.add_row(vec!["Signed in", &signed_in]);
    table.add_row(vec![
        "Database connection",
        status.database_connection.as_deref().unwrap_or("none"),
    ]);
    table.add_row(vec!["Device imports", &status.device_imports.to_string()]);

    println!("{}", table);
    Ok(())
}

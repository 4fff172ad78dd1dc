//! Open command - navigate to a console view through the guards

use anyhow::Result;
use colored::Colorize;

use cmdb_core::services::{Breakdown, Navigation};
use cmdb_core::{CmdbContext, LogEvent, Route};

use super::{categories, cis, dashboard, get_context, get_logger, log_event, reports};
use crate::output;

/// Print the body of a view that passed the guards
fn render_view(ctx: &CmdbContext, route: Route) -> Result<()> {
    match route {
        Route::Dashboard => dashboard::show(ctx, Breakdown::Type)?,
        Route::ConfigurationItems => cis::show(ctx, None)?,
        Route::Categories => categories::show(ctx)?,
        Route::Reports => reports::show(ctx),
        Route::Settings => {
            println!("Users: {}", ctx.auth.users().len());
            println!("{}", "Manage with 'cmdb users', 'cmdb settings' and 'cmdb delete-all-data'.".dimmed());
        }
        Route::Landing => println!("{}", "Track and manage your configuration items.".dimmed()),
        Route::Login => println!("{}", "Sign in with 'cmdb login <email>'.".dimmed()),
        Route::Register => println!("{}", "Create an account with 'cmdb register <email>'.".dimmed()),
        Route::NotFound => output::warning("Oops! Page not found"),
    }
    Ok(())
}

pub fn run(path: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    let navigation = ctx.navigate(path);

    let mut event = LogEvent::new("page_opened").with_page(path);
    if let Some(email) = ctx.auth.session().user_email() {
        event = event.with_user(email);
    }
    log_event(&logger, event);

    if json {
        return output::json(&navigation);
    }

    match &navigation {
        Navigation::Allow { route } => {
            println!("{} {}", route.title().bold(), format!("({})", route.path()).dimmed());
            println!();
            render_view(&ctx, *route)?;
        }
        Navigation::Redirect { to, from } => {
            output::warning(&format!("Redirected to {}", to.path()));
            if let Some(from) = from {
                println!("{}", format!("Requested location: {}", from).dimmed());
            }
        }
    }
    Ok(())
}

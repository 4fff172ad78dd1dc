//! Categories command - manage configuration item categories

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use cmdb_core::domain::inventory::{Category, CategoryColor};
use cmdb_core::{CmdbContext, LogEvent, OperationResult, Route};

use super::{get_context, get_logger, log_event, require_view};
use crate::output;

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// List categories
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a category
    Add {
        name: String,
        /// What belongs in this category (at least 10 characters)
        #[arg(long, short)]
        description: String,
        /// blue, green, amber, purple or rose
        #[arg(long, default_value = "blue")]
        color: CategoryColor,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a category by ID
    Delete {
        id: u64,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn colored_name(category: &Category) -> String {
    let name = category.name.as_str();
    match category.color {
        CategoryColor::Blue => name.blue(),
        CategoryColor::Green => name.green(),
        CategoryColor::Amber => name.yellow(),
        CategoryColor::Purple => name.purple(),
        CategoryColor::Rose => name.red(),
    }
    .bold()
    .to_string()
}

/// Show the categories view
pub fn show(ctx: &CmdbContext) -> Result<()> {
    let categories = ctx.inventory.categories()?;
    if categories.is_empty() {
        println!("{}", "No categories yet".dimmed());
        return Ok(());
    }
    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Items", "Description"]);
    for category in &categories {
        table.add_row(vec![
            category.id.to_string(),
            colored_name(category),
            format!("{} items", category.item_count),
            category.description.clone(),
        ]);
    }
    println!("{}", table);
    Ok(())
}

pub fn run(command: CategoriesCommands) -> Result<()> {
    let ctx = get_context()?;
    require_view(&ctx, Route::Categories)?;
    let logger = get_logger();

    match command {
        CategoriesCommands::List { json } => {
            if json {
                return output::json(&ctx.inventory.categories()?);
            }
            show(&ctx)?;
        }
        CategoriesCommands::Add {
            name,
            description,
            color,
            json,
        } => {
            let category = ctx.inventory.create_category(&name, &description, color)?;
            log_event(
                &logger,
                LogEvent::new("category_created").with_command(format!("categories add {}", category.name)),
            );

            if json {
                return output::json(&OperationResult::ok(category));
            }
            output::success(&format!("Category \"{}\" created successfully", category.name));
        }
        CategoriesCommands::Delete { id, force, json } => {
            if !force
                && !json
                && !Confirm::new()
                    .with_prompt(format!("Delete category {}?", id))
                    .default(false)
                    .interact()?
            {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            let removed = ctx.inventory.delete_category(id)?;
            log_event(&logger, LogEvent::new("category_deleted"));

            if json {
                return output::json(&OperationResult::ok(removed));
            }
            output::success(&format!("Category \"{}\" deleted", removed.name));
        }
    }
    Ok(())
}

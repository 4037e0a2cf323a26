use crate::{
    libs::{
        category::{CategoryPatch, NewCategory},
        context::AppContext,
        messages::Message,
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

const DEFAULT_COLOR: &str = "#8B5CF6";

#[derive(Debug, Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    command: Option<CategoryCommand>,
}

#[derive(Debug, Subcommand)]
enum CategoryCommand {
    Add {
        name: String,
        #[arg(short, long, default_value = DEFAULT_COLOR)]
        color: String,
    },
    List,
    Edit {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
    },
    Rm {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: CategoryArgs) -> Result<()> {
    let ctx = AppContext::open()?;
    match args.command {
        Some(CategoryCommand::Add { name, color }) => {
            let category = ctx.store.add_category(NewCategory { name, color });
            msg_success!(Message::CategoryAdded(category.name));
        }
        Some(CategoryCommand::List) | None => {
            let categories = ctx.store.categories();
            if categories.is_empty() {
                msg_info!(Message::NoCategoriesFound);
                return Ok(());
            }
            msg_print!(Message::CategoriesHeader, true);
            View::categories(&categories)?;
        }
        Some(CategoryCommand::Edit { id, name, color }) => {
            let patch = CategoryPatch { name, color };
            if patch == CategoryPatch::default() {
                msg_info!(Message::NothingToUpdate);
                return Ok(());
            }
            match ctx.store.update_category(&id, patch) {
                Some(category) => msg_success!(Message::CategoryUpdated(category.name)),
                None => msg_error!(Message::CategoryNotFound(id)),
            }
        }
        Some(CategoryCommand::Rm { id, yes }) => {
            let Some(category) = ctx.store.category(&id) else {
                msg_error!(Message::CategoryNotFound(id));
                return Ok(());
            };
            let confirmed = yes
                || Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::PromptConfirmDeleteCategory(category.name.clone()).to_string())
                    .default(false)
                    .interact()?;
            if !confirmed {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            ctx.store.delete_category(&category.id);
            msg_success!(Message::CategoryDeleted(category.name));
        }
    }
    Ok(())
}

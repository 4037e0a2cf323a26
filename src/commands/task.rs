use super::{confirm_delete, parse_when};
use crate::{
    libs::{
        context::AppContext,
        formatter::parse_date,
        messages::Message,
        record::Record,
        task::{is_due_on, visible_tasks, NewTask, Priority, Task, TaskFilter, TaskPatch},
        view::View,
    },
    msg_bail_anyhow, msg_error, msg_info, msg_print,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: Option<TaskCommand>,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// YYYY-MM-DD [HH:MM], local time
        #[arg(long)]
        due: Option<String>,
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,
        /// Category id
        #[arg(short, long)]
        category: Option<String>,
    },
    List {
        #[arg(short, long, value_enum, default_value_t = TaskFilter::All)]
        filter: TaskFilter,
        #[arg(short, long)]
        category: Option<String>,
        /// Only tasks due on YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
        /// Reload from the server first
        #[arg(short, long)]
        refresh: bool,
    },
    Show {
        id: String,
    },
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Toggle completion
    Done {
        id: String,
    },
    Rm {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn cmd(args: TaskArgs) -> Result<()> {
    let mut ctx = AppContext::open()?;
    match args.command {
        Some(TaskCommand::Add {
            title,
            description,
            due,
            priority,
            category,
        }) => {
            let offset = ctx.offset();
            let draft = NewTask {
                title,
                description,
                completed: None,
                due_date: due.map(|due| parse_when(&due, &offset)).transpose()?,
                category,
                priority,
            };
            ctx.warn_if_offline();
            let pending = ctx.store.add_task(draft)?;
            ctx.settle(pending).await;
            Ok(())
        }
        Some(TaskCommand::List {
            filter,
            category,
            due,
            refresh,
        }) => handle_list(&mut ctx, filter, category, due, refresh).await,
        Some(TaskCommand::Show { id }) => {
            let task = match ctx.store.fetch_task(&id).await {
                Ok(task) => task,
                Err(e) => {
                    tracing::debug!(id = %id, error = %e, "falling back to the local copy");
                    match ctx.store.task(&id) {
                        Some(task) => task,
                        None => msg_bail_anyhow!(Message::RecordNotFound(Task::KIND, id)),
                    }
                }
            };
            let status = ctx.store.sync_status::<Task>(&task.id);
            View::tasks(&[(task.clone(), status)], &ctx.store.categories(), &ctx.offset())?;
            if let Some(description) = task.description {
                msg_print!(description);
            }
            Ok(())
        }
        Some(TaskCommand::Edit {
            id,
            title,
            description,
            due,
            priority,
            category,
        }) => {
            let offset = ctx.offset();
            let patch = TaskPatch {
                title,
                description,
                completed: None,
                due_date: due.map(|due| parse_when(&due, &offset)).transpose()?,
                category,
                priority,
            };
            if patch.is_empty() {
                msg_info!(Message::NothingToUpdate);
                return Ok(());
            }
            match ctx.store.update_task(&id, patch) {
                Some(pending) => {
                    ctx.settle(pending).await;
                }
                None => msg_error!(Message::RecordNotFound(Task::KIND, id)),
            }
            Ok(())
        }
        Some(TaskCommand::Done { id }) => {
            match ctx.store.complete_task(&id) {
                Some(pending) => {
                    ctx.settle(pending).await;
                }
                None => msg_error!(Message::RecordNotFound(Task::KIND, id)),
            }
            Ok(())
        }
        Some(TaskCommand::Rm { id, yes }) => {
            if ctx.store.task(&id).is_none() {
                msg_error!(Message::RecordNotFound(Task::KIND, id));
                return Ok(());
            }
            if !confirm_delete(Task::KIND, yes)? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            match ctx.store.delete_task(&id) {
                Some(pending) => {
                    ctx.settle(pending).await;
                }
                None => msg_error!(Message::RecordNotFound(Task::KIND, id)),
            }
            Ok(())
        }
        None => handle_list(&mut ctx, TaskFilter::All, None, None, false).await,
    }
}

async fn handle_list(
    ctx: &mut AppContext,
    filter: TaskFilter,
    category: Option<String>,
    due: Option<String>,
    refresh: bool,
) -> Result<()> {
    if refresh {
        let pending = ctx.store.fetch_tasks();
        ctx.settle(pending).await;
    }

    let offset = ctx.offset();
    let due = match due {
        Some(input) => match parse_date(&input) {
            Some(date) => Some(date),
            None => msg_bail_anyhow!(Message::InvalidDate(input)),
        },
        None => None,
    };

    let tasks: Vec<_> = visible_tasks(&ctx.store.tasks(), filter, category.as_deref())
        .into_iter()
        .filter(|task| due.map_or(true, |date| is_due_on(task, date, &offset)))
        .map(|task| {
            let status = ctx.store.sync_status::<Task>(&task.id);
            (task, status)
        })
        .collect();

    if tasks.is_empty() {
        msg_info!(Message::NoRecordsFound(Task::KIND));
        return Ok(());
    }

    msg_print!(Message::TasksHeader, true);
    View::tasks(&tasks, &ctx.store.categories(), &offset)?;
    Ok(())
}

use super::confirm_delete;
use crate::{
    libs::{
        context::AppContext,
        messages::Message,
        note::{search_notes, NewNote, Note, NotePatch},
        record::Record,
        view::View,
    },
    msg_error, msg_info, msg_print,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Input};

#[derive(Debug, Args)]
pub struct NoteArgs {
    #[command(subcommand)]
    command: Option<NoteCommand>,
}

#[derive(Debug, Subcommand)]
enum NoteCommand {
    Add {
        title: String,
        /// Prompted for when omitted
        content: Option<String>,
        /// Comma separated
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    List {
        /// Matches title or content
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long)]
        category: Option<String>,
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
        #[arg(long)]
        content: Option<String>,
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        #[arg(short, long)]
        category: Option<String>,
    },
    Rm {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn cmd(args: NoteArgs) -> Result<()> {
    let mut ctx = AppContext::open()?;
    match args.command {
        Some(NoteCommand::Add {
            title,
            content,
            tags,
            category,
        }) => {
            let content = match content {
                Some(content) => content,
                None => Input::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::PromptContent.to_string())
                    .interact_text()?,
            };
            let draft = NewNote {
                title,
                content,
                tags: if tags.is_empty() { None } else { Some(tags) },
                category,
            };
            ctx.warn_if_offline();
            let pending = ctx.store.add_note(draft)?;
            ctx.settle(pending).await;
            Ok(())
        }
        Some(NoteCommand::List {
            search,
            category,
            refresh,
        }) => handle_list(&mut ctx, &search, category, refresh).await,
        Some(NoteCommand::Show { id }) => {
            let note = match ctx.store.fetch_note(&id).await {
                Ok(note) => Some(note),
                Err(e) => {
                    tracing::debug!(id = %id, error = %e, "falling back to the local copy");
                    ctx.store.note(&id)
                }
            };
            let Some(note) = note else {
                msg_error!(Message::RecordNotFound(Note::KIND, id));
                return Ok(());
            };
            msg_print!(note.title, true);
            msg_print!(note.content);
            if let Some(tags) = note.tags.filter(|tags| !tags.is_empty()) {
                msg_print!(format!("#{}", tags.join(" #")));
            }
            Ok(())
        }
        Some(NoteCommand::Edit {
            id,
            title,
            content,
            tags,
            category,
        }) => {
            let patch = NotePatch {
                title,
                content,
                tags,
                category,
            };
            if patch == NotePatch::default() {
                msg_info!(Message::NothingToUpdate);
                return Ok(());
            }
            match ctx.store.update_note(&id, patch) {
                Some(pending) => {
                    ctx.settle(pending).await;
                }
                None => msg_error!(Message::RecordNotFound(Note::KIND, id)),
            }
            Ok(())
        }
        Some(NoteCommand::Rm { id, yes }) => {
            if ctx.store.note(&id).is_none() {
                msg_error!(Message::RecordNotFound(Note::KIND, id));
                return Ok(());
            }
            if !confirm_delete(Note::KIND, yes)? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            match ctx.store.delete_note(&id) {
                Some(pending) => {
                    ctx.settle(pending).await;
                }
                None => msg_error!(Message::RecordNotFound(Note::KIND, id)),
            }
            Ok(())
        }
        None => handle_list(&mut ctx, "", None, false).await,
    }
}

async fn handle_list(ctx: &mut AppContext, search: &str, category: Option<String>, refresh: bool) -> Result<()> {
    if refresh {
        let pending = ctx.store.fetch_notes();
        ctx.settle(pending).await;
    }

    let notes: Vec<_> = search_notes(&ctx.store.notes(), search, category.as_deref())
        .into_iter()
        .map(|note| {
            let status = ctx.store.sync_status::<Note>(&note.id);
            (note, status)
        })
        .collect();

    if notes.is_empty() {
        msg_info!(Message::NoRecordsFound(Note::KIND));
        return Ok(());
    }

    msg_print!(Message::NotesHeader, true);
    View::notes(&notes, &ctx.store.categories(), &ctx.offset())?;
    Ok(())
}

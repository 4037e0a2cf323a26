use crate::{
    libs::{
        context::AppContext,
        hexagon::render_svg,
        messages::Message,
        preferences::LifeBalancePatch,
        view::View,
    },
    msg_error, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BalanceArgs {
    #[command(subcommand)]
    command: Option<BalanceCommand>,
}

#[derive(Debug, Subcommand)]
enum BalanceCommand {
    Show,
    /// Score an area from 1 to 10
    Set {
        /// Area id or name
        area: String,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=10))]
        value: u8,
    },
    /// Write the radar chart as SVG
    Chart {
        #[arg(short, long, default_value = "life-balance.svg")]
        output: PathBuf,
    },
}

pub fn cmd(args: BalanceArgs) -> Result<()> {
    let ctx = AppContext::open()?;
    match args.command {
        Some(BalanceCommand::Show) | None => {
            msg_print!(Message::BalanceHeader, true);
            View::balance(&ctx.store.life_balance_areas())?;
        }
        Some(BalanceCommand::Set { area, value }) => {
            let areas = ctx.store.life_balance_areas();
            let Some(found) = areas
                .iter()
                .find(|a| a.id == area || a.name.eq_ignore_ascii_case(&area))
            else {
                msg_error!(Message::BalanceAreaNotFound(area));
                return Ok(());
            };
            let patch = LifeBalancePatch {
                value: Some(value),
                ..LifeBalancePatch::default()
            };
            if let Some(updated) = ctx.store.update_life_balance_area(&found.id, patch) {
                msg_success!(Message::BalanceAreaUpdated(updated.name, updated.value));
            }
        }
        Some(BalanceCommand::Chart { output }) => {
            fs::write(&output, render_svg(&ctx.store.life_balance_areas()))?;
            msg_success!(Message::BalanceChartWritten(output.display().to_string()));
        }
    }
    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{CharacterListController, FieldAssignmentsForm, FormView, DEFAULT_CONFIG_FILE};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(about = "List, create and delete characters on a roster server")]
pub struct Cli {
    /// Overrides the configured API base address.
    #[arg(long)]
    pub base_url: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    List,
    /// Posts a new character built from key=value pairs.
    Create {
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// Deletes the character at a zero-based position of the listing.
    Delete { index: usize },
}

/// Mounts the controller and applies `command` to it.
///
/// Only malformed input is returned as an error. Request failures are logged
/// by the controller and the listing shows whatever state survived.
pub async fn execute(controller: &CharacterListController, command: Command) -> Result<()> {
    let _ = controller.mount().await;

    match command {
        Command::List => {}
        Command::Create { fields } => {
            let mut form =
                FieldAssignmentsForm::parse(&fields).context("invalid character fields")?;
            match form.take_submission() {
                Some(record) => {
                    let _ = controller.create(record).await;
                }
                None => warn!("nothing to submit"),
            }
        }
        Command::Delete { index } => {
            let _ = controller.delete(index).await;
        }
    }
    Ok(())
}

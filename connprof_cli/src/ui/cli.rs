use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use connprof_core::storage::{ConnectionProfile, JsonFileConfig};
use connprof_core::wizard::{Notifier, Prompter};
use connprof_core::{ConnectionWizard, ProfileError, ProfileStore, SecretCache};
use log::{debug, info};

use super::terminal::{LineSource, TerminalNotifier, TerminalPrompter};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "connprof", version, subcommand_required = true)]
pub struct Args {
    /// Settings file to use instead of the per-user default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactively create a new connection profile
    Create,
    /// List stored connection profiles
    List,
    /// Delete a connection profile
    Delete {
        /// Name of the profile to delete
        name: String,
    },
    /// Run several commands in one session; passwords entered stay cached until exit
    Shell,
}

pub async fn run_cli(args: Args) -> Result<(), ProfileError> {
    let config = match args.config {
        Some(path) => JsonFileConfig::at(path),
        None => JsonFileConfig::new()?,
    };
    info!("Using settings file {:?}", config.path());

    // One secret cache per process: it lives exactly as long as this session.
    let store = ProfileStore::new(Arc::new(config), SecretCache::new());
    let mut prompter = TerminalPrompter::new();
    let notifier = TerminalNotifier;

    match args.command {
        Command::Create => create_profile(&store, &mut prompter, &notifier).await,
        Command::List => list_profiles(&store).await,
        Command::Delete { name } => delete_profile(&store, &name, &notifier).await,
        Command::Shell => run_shell(&store, &mut prompter, &notifier).await,
    }
}

async fn create_profile(
    store: &ProfileStore,
    prompter: &mut dyn Prompter,
    notifier: &dyn Notifier,
) -> Result<(), ProfileError> {
    let outcome = ConnectionWizard::new(store, prompter, notifier).run().await?;
    debug!("Wizard finished: {outcome:?}");
    Ok(())
}

async fn list_profiles(store: &ProfileStore) -> Result<(), ProfileError> {
    let profiles = store.list().await?;
    if profiles.is_empty() {
        println!("No profiles stored.");
        return Ok(());
    }
    for profile in &profiles {
        println!("{}", describe(profile));
    }
    Ok(())
}

/// One line per profile. The password itself is never printed.
fn describe(profile: &ConnectionProfile) -> String {
    format!(
        "{:<16} {:<40} user={:<12} reject_unauthorized={:<5} password={}",
        profile.name,
        profile.url,
        profile.username.as_deref().unwrap_or("-"),
        profile.reject_unauthorized,
        if profile.has_password() { "cached" } else { "-" },
    )
}

async fn delete_profile(
    store: &ProfileStore,
    name: &str,
    notifier: &dyn Notifier,
) -> Result<(), ProfileError> {
    if store.delete(name).await? {
        notifier.show_info(&format!("Profile {name} was deleted."));
    } else {
        notifier.show_error(&format!("Profile {name} does not exist."));
    }
    Ok(())
}

const SHELL_HELP: &str = "Commands: create | list | delete <name> | help | quit";

/// One line typed at the shell prompt.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Empty,
    Create,
    List,
    Delete(&'a str),
    Help,
    Quit,
    /// Unknown word, or the wrong number of arguments.
    Invalid,
}

fn parse_shell_line(line: &str) -> ShellCommand<'_> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => ShellCommand::Empty,
        ["create"] => ShellCommand::Create,
        ["list"] => ShellCommand::List,
        ["delete", name] => ShellCommand::Delete(*name),
        ["help"] => ShellCommand::Help,
        ["quit" | "exit"] => ShellCommand::Quit,
        _ => ShellCommand::Invalid,
    }
}

/// Interactive loop sharing one store (and so one secret cache).
///
/// A failing command is reported and the loop carries on; only end of input
/// or `quit` ends the session.
async fn run_shell<L: LineSource>(
    store: &ProfileStore,
    prompter: &mut TerminalPrompter<L>,
    notifier: &dyn Notifier,
) -> Result<(), ProfileError> {
    println!("{SHELL_HELP}");
    loop {
        print!("connprof> ");
        let _ = io::stdout().flush();
        let Some(line) = prompter.read_line().await else {
            println!();
            break;
        };

        let result = match parse_shell_line(&line) {
            ShellCommand::Empty => continue,
            ShellCommand::Create => create_profile(store, prompter, notifier).await,
            ShellCommand::List => list_profiles(store).await,
            ShellCommand::Delete(name) => delete_profile(store, name, notifier).await,
            ShellCommand::Help => {
                println!("{SHELL_HELP}");
                Ok(())
            }
            ShellCommand::Quit => break,
            ShellCommand::Invalid => {
                notifier.show_error(&format!("Unknown command: {}", line.trim()));
                println!("{SHELL_HELP}");
                Ok(())
            }
        };
        if let Err(e) = result {
            notifier.show_error(&e.to_string());
        }
    }
    Ok(())
}

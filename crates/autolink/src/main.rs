//! `autolink`: link plain-text mentions of vault documents as `[[wikilinks]]`.

mod commands;
mod config;
mod front_matter;
mod vault;

use anyhow::Result;
use autolink_core::IndexHandle;
use clap::{Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use vault::Vault;

#[derive(Parser, Debug)]
#[command(name = "autolink", version, about = "Link plain-text mentions across a markdown vault")]
struct Cli {
    /// Vault root directory
    #[arg(long, env = "AUTOLINK_VAULT", default_value = ".", value_name = "DIR")]
    vault: PathBuf,

    /// Config file (defaults to <vault>/autolink.toml when present)
    #[arg(long, env = "AUTOLINK_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base directory whose prefix may be omitted in links
    #[arg(long, value_name = "DIR")]
    base_dir: Option<String>,

    /// Skip documents whose body has at most this many characters
    #[arg(long, allow_negative_numbers = true, value_name = "N")]
    min_char_count: Option<i64>,

    /// Resolve bare words to namespaced documents by path proximity
    #[arg(long)]
    namespace_resolution: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite documents, printing a diff unless --write is given
    Link {
        /// Files to rewrite (defaults to every document in the vault)
        files: Vec<PathBuf>,

        /// Write changes back instead of printing a diff
        #[arg(long)]
        write: bool,
    },
    /// List every matchable term and its link target
    Terms,
    /// List the wikilinks a document already contains
    Links {
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let mut config = Config::discover(&cli.vault, cli.config.as_deref())?;
    if let Some(base_dir) = cli.base_dir {
        config.base_dir = Some(base_dir);
    }
    if let Some(min) = cli.min_char_count {
        config.min_char_count = min;
    }
    if cli.namespace_resolution {
        config.namespace_resolution = true;
    }
    let settings = config.scan_settings()?;

    let vault = Vault::open(&cli.vault, config.ignore.clone())?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Link { files, write } => {
            let handle = IndexHandle::empty();
            commands::build_index(&handle, &vault, config.base_dir())?;
            commands::run_link(&handle, &vault, settings, &files, write, &mut stdout)?;
        }
        Command::Terms => {
            let handle = IndexHandle::empty();
            commands::build_index(&handle, &vault, config.base_dir())?;
            commands::run_terms(&handle.load(), &mut stdout)?;
        }
        Command::Links { file } => commands::run_links(&vault, &file, &mut stdout)?,
    }
    Ok(())
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("autolink=debug,autolink_core=debug")
        } else {
            EnvFilter::new("autolink=info,autolink_core=info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

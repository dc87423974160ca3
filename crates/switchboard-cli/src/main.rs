//! Command-line entry point.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use switchboard_core::{EngineConfig, FileStorage, ShortcutRegistry, Storage};
use switchboard_cli::{CliError, Script, Session};

#[derive(Parser, Debug)]
#[command(name = "switchboard", version, about = "Headless switchboard diagram editor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an input script and print the resulting snapshot
    Run {
        /// JSON array of script steps
        script: PathBuf,
        /// Engine config file
        #[arg(long, env = "SWITCHBOARD_CONFIG")]
        config: Option<PathBuf>,
        /// Write the final snapshot here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Start from a snapshot file
        #[arg(long)]
        load: Option<PathBuf>,
        /// Also save the snapshot under this id in the snapshot store
        #[arg(long)]
        store: Option<String>,
        /// Snapshot store directory
        #[arg(long, env = "SWITCHBOARD_STORE")]
        store_dir: Option<PathBuf>,
    },
    /// Print the keyboard shortcut map
    Shortcuts,
    /// List ids in the snapshot store
    Snapshots {
        #[arg(long, env = "SWITCHBOARD_STORE")]
        store_dir: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Run {
            script,
            config,
            out,
            load,
            store,
            store_dir,
        } => {
            let config = match config {
                Some(path) => EngineConfig::load_from_file(&path)?,
                None => EngineConfig::default(),
            };
            let mut session = match load {
                Some(path) => {
                    log::info!("Loading snapshot from {}", path.display());
                    Session::with_snapshot(config, &std::fs::read_to_string(path)?)?
                }
                None => Session::new(config),
            };

            let script = Script::from_json(&std::fs::read_to_string(&script)?)?;
            log::info!("Replaying {} steps", script.len());
            let report = session.run(&script);
            log::info!(
                "Replayed {} steps ({} commands handled, {} renders), {} objects",
                report.steps,
                report.handled,
                report.renders,
                report.objects
            );

            let snapshot = session.snapshot().ok_or(CliError::Detached)?;
            if let Some(id) = store {
                let storage = open_store(store_dir.as_deref())?;
                pollster::block_on(storage.save(&id, &snapshot))?;
                log::info!("Stored snapshot {} in {}", id, storage.base_path().display());
            }
            match out {
                Some(path) => std::fs::write(path, &snapshot)?,
                None => println!("{}", snapshot),
            }
        }
        Command::Shortcuts => println!("{}", ShortcutRegistry::describe()),
        Command::Snapshots { store_dir } => {
            let storage = open_store(store_dir.as_deref())?;
            for id in pollster::block_on(storage.list())? {
                println!("{}", id);
            }
        }
    }
    Ok(())
}

fn open_store(dir: Option<&Path>) -> Result<FileStorage, CliError> {
    let storage = match dir {
        Some(dir) => FileStorage::new(dir.to_path_buf())?,
        None => FileStorage::default_location()?,
    };
    Ok(storage)
}

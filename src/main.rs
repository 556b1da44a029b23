// src/main.rs

mod app_logic;
mod core;

use crate::app_logic::DataGeneratorLogic;
use crate::app_logic::shell;
use crate::core::{
    CoreCatalogSource, CoreConfigManager, CoreMaterializer, CoreSelectionProfileManager,
    PROFILES_SUBFOLDER_NAME, path_utils,
};
use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

const APP_NAME: &str = "DataGenerator";

#[derive(Parser, Debug)]
#[command(name = "data-generator")]
#[command(about = "Generate placeholder files of configured sizes from a data item list")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Also write a detailed log to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the data items of a configuration file.
    List {
        /// Data item list (NAME:SIZE per line); defaults to the last one used.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Check a configuration file and print the lines with the wrong format.
    Check {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Create placeholder files for the named (or all) data items.
    Generate {
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory to create the files in; defaults to the last one used.
        #[arg(long)]
        target: Option<PathBuf>,
        /// Generate every data item of the list.
        #[arg(long, conflicts_with = "names")]
        all: bool,
        /// Data item names, generated in the given order.
        names: Vec<String>,
    },
    /// Start an interactive session.
    Shell {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<()> {
    let term_level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        loggers.push(WriteLogger::new(LevelFilter::Trace, config, file));
    }
    CombinedLogger::init(loggers).map_err(|e| anyhow!("initializing logger: {e}"))
}

fn build_logic() -> DataGeneratorLogic {
    let selections_dir = path_utils::get_base_app_config_local_dir(APP_NAME)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PROFILES_SUBFOLDER_NAME);
    DataGeneratorLogic::new(
        Arc::new(CoreCatalogSource::new()),
        Arc::new(CoreMaterializer::new()),
        Arc::new(CoreConfigManager::new()),
        Arc::new(CoreSelectionProfileManager::new(selections_dir)),
    )
}

fn load(logic: &mut DataGeneratorLogic, config: Option<PathBuf>) -> Result<Vec<String>> {
    let path = config.unwrap_or_else(|| logic.initial_catalog_path());
    let summary = logic
        .load_catalog(&path)
        .with_context(|| format!("loading data item list {}", path.display()))?;
    Ok(summary.rejects)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut logic = build_logic();
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::List { config } => {
            logic.set_remember_catalog_path(false);
            let rejects = load(&mut logic, config)?;
            for item in logic.catalog().iter() {
                println!("{}:{}", item.name, item.size_mb);
            }
            shell::print_rejects(&mut io::stderr(), &rejects)?;
        }
        Command::Check { config } => {
            logic.set_remember_catalog_path(false);
            let rejects = load(&mut logic, config)?;
            println!("{} data items accepted.", logic.catalog().len());
            shell::print_rejects(&mut stdout, &rejects)?;
            if !rejects.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Generate {
            config,
            target,
            all,
            names,
        } => {
            let rejects = load(&mut logic, config)?;
            shell::print_rejects(&mut io::stderr(), &rejects)?;
            let Some(target) = target.or_else(|| logic.last_target_dir().map(Path::to_path_buf))
            else {
                bail!("no target directory given and none remembered; use --target");
            };
            let unknown = if all {
                logic.select_all();
                Vec::new()
            } else {
                logic.select_names(&names)
            };
            for name in &unknown {
                eprintln!("Data item not found: {name}");
            }
            if logic.selection().is_empty() {
                bail!("nothing selected; pass data item names or --all");
            }
            let report = logic.generate(&target);
            shell::print_report(&mut stdout, &report)?;
            if !report.is_success() || !unknown.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Shell { config } => {
            // A missing default list is not fatal for an interactive session.
            if let Err(e) = load(&mut logic, config) {
                eprintln!("{e:#}");
            }
            shell::run_shell(&mut logic, io::stdin().lock(), &mut stdout)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

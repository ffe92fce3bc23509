// src/main.rs

use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{warn, Level};
use tweak_tool::{
    apps::{find_app, AppManager, AppPackage, APPS},
    backup::{store::BackupStore, BackupEntry},
    config::AppConfig,
    orchestrator::{TaskOrchestrator, TweakResult},
    services::{find_service, ServiceDescriptor, ServiceManager, StartupMode, SERVICES},
    state::default_state_reader,
    tweaks::{
        engine::TweakEngine, find_tweak, tweaks_in, Tweak, TweakCategory, CATALOG,
    },
    utils::{
        command::{CommandExecutor, SystemCommandExecutor},
        windows::{is_elevated, restart_explorer},
    },
};

#[derive(Parser, Debug)]
#[command(name = "tweak_tool")]
#[command(about = "Apply, revert and back up Windows registry tweaks", long_about = None)]
struct Cli {
    /// Directory holding backups and config.json.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[arg(long, global = true)]
    retention_days: Option<i64>,
    #[arg(long, global = true)]
    max_backups: Option<usize>,
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all tweaks with their live state.
    List {
        #[arg(long)]
        category: Option<TweakCategory>,
    },
    Status { id: String },
    Apply {
        id: String,
        /// Restart explorer.exe afterwards so shell changes show up.
        #[arg(long)]
        restart_explorer: bool,
    },
    Revert {
        id: String,
        #[arg(long)]
        restart_explorer: bool,
    },
    /// Apply every tweak of a category concurrently.
    ApplyAll {
        category: TweakCategory,
        #[arg(long)]
        restart_explorer: bool,
    },
    Backups {
        #[arg(long)]
        category: Option<String>,
    },
    Restore { backup_id: String },
    Delete { backup_id: String },
    Cleanup,
    Services,
    ServiceEnable {
        name: String,
        /// Startup type the service had before it was disabled.
        #[arg(long, default_value = "manual")]
        original: StartupMode,
    },
    ServiceDisable { name: String },
    Apps,
    AppRemove { name: String },
    RestartExplorer,
}

fn init_logging(verbose: bool) {
    let level = if verbose || cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(days) = cli.retention_days {
        config.retention_days = days;
    }
    if let Some(max) = cli.max_backups {
        config.max_backups = max;
    }
    config.validate().context("Invalid command-line override")?;
    Ok(config)
}

fn lookup(id: &str) -> Result<&'static Tweak> {
    find_tweak(id).ok_or_else(|| anyhow!("Unknown tweak '{}'", id))
}

fn lookup_service(name: &str) -> Result<&'static ServiceDescriptor> {
    find_service(name).ok_or_else(|| anyhow!("Unknown service '{}'", name))
}

fn lookup_app(name: &str) -> Result<&'static AppPackage> {
    find_app(name).ok_or_else(|| anyhow!("Unknown app '{}'", name))
}

fn print_backup(entry: &BackupEntry) {
    println!(
        "{}  {}  {:<12} {:<28} {} -> {}{}",
        entry.id,
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.category,
        entry.tweak_id,
        entry.previous_value.as_deref().unwrap_or("<absent>"),
        entry.new_value,
        if entry.restored { "  (restored)" } else { "" }
    );
}

fn print_result(result: &TweakResult) {
    let mark = if result.success() { "ok  " } else { "FAIL" };
    println!("{} {:<28} {}", mark, result.id, result.message());
}

fn maybe_restart_explorer(requested: bool, executor: &dyn CommandExecutor) -> Result<()> {
    if requested {
        restart_explorer(executor).context("Failed to restart explorer")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    if !is_elevated() {
        warn!("Not running as administrator; machine-wide tweaks will fail.");
    }

    let executor: Arc<dyn CommandExecutor> = Arc::new(SystemCommandExecutor::new());
    let store = BackupStore::new(&config.data_dir).with_policy(config.retention_policy());
    let engine = Arc::new(TweakEngine::new(
        executor.clone(),
        default_state_reader(executor.clone()),
        store,
    ));

    match cli.command {
        Commands::List { category } => {
            let tweaks: Vec<&Tweak> = match category {
                Some(category) => tweaks_in(category).collect(),
                None => CATALOG.values().collect(),
            };
            let states = engine.refresh_states(tweaks.iter().copied());
            for tweak in &tweaks {
                println!(
                    "[{}] {:<12} {:<28} {} ({})",
                    if states.is_enabled(tweak.id) { "x" } else { " " },
                    tweak.category,
                    tweak.id,
                    tweak.name,
                    tweak.impact
                );
            }
            println!("{} of {} active", states.enabled_count(), tweaks.len());
        }
        Commands::Status { id } => {
            let tweak = lookup(&id)?;
            println!("{}: {}", tweak.name, tweak.description);
            println!(
                "active: {}",
                if engine.is_active(tweak) { "yes" } else { "no" }
            );
            for entry in engine.list_backups().active_for(tweak.id) {
                print_backup(entry);
            }
        }
        Commands::Apply {
            id,
            restart_explorer,
        } => {
            let tweak = lookup(&id)?;
            let outcome = engine.apply(tweak, tweak.category.as_ref(), false)?;
            println!("{}", outcome.message());
            maybe_restart_explorer(restart_explorer, executor.as_ref())?;
        }
        Commands::Revert {
            id,
            restart_explorer,
        } => {
            let tweak = lookup(&id)?;
            let outcome = engine.apply(tweak, tweak.category.as_ref(), true)?;
            println!("{}", outcome.message());
            maybe_restart_explorer(restart_explorer, executor.as_ref())?;
        }
        Commands::ApplyAll {
            category,
            restart_explorer,
        } => {
            let orchestrator = TaskOrchestrator::new(engine.clone());
            let results = orchestrator.apply_category(category);
            for result in &results {
                print_result(result);
            }
            let failed = results.iter().filter(|r| !r.success()).count();
            println!("{} applied, {} failed", results.len() - failed, failed);
            maybe_restart_explorer(restart_explorer, executor.as_ref())?;
        }
        Commands::Backups { category } => {
            let entries: Vec<BackupEntry> = match category {
                Some(category) => engine.backups_by_category(&category),
                None => engine.list_backups().backups,
            };
            for entry in &entries {
                print_backup(entry);
            }
            println!("{} backups in {}", entries.len(), engine.store().path().display());
        }
        Commands::Restore { backup_id } => {
            let entry = engine.restore_backup(&backup_id)?;
            println!("Restored {} to '{}'", entry.tweak_name, entry.previous_value.unwrap_or_default());
        }
        Commands::Delete { backup_id } => {
            let entry = engine.delete_backup(&backup_id)?;
            println!("Deleted backup of {}", entry.tweak_name);
        }
        Commands::Cleanup => {
            let removed = engine.cleanup_backups()?;
            println!("Removed {} backups", removed);
        }
        Commands::Services => {
            let manager = ServiceManager::new(executor.clone());
            for service in SERVICES.iter() {
                let status = manager.status(service.name);
                println!(
                    "{:<20} {:<10} {:<8} {:<9} {}",
                    service.name,
                    service.recommendation,
                    if status.running { "running" } else if status.exists { "stopped" } else { "missing" },
                    status.startup_type,
                    service.display_name
                );
            }
        }
        Commands::ServiceEnable { name, original } => {
            let service = lookup_service(&name)?;
            let message = ServiceManager::new(executor.clone()).enable(service.name, original)?;
            println!("{}: {}", service.display_name, message);
        }
        Commands::ServiceDisable { name } => {
            let service = lookup_service(&name)?;
            let message = ServiceManager::new(executor.clone()).disable(service.name)?;
            println!("{}: {}", service.display_name, message);
        }
        Commands::Apps => {
            let manager = AppManager::new(executor.clone());
            for app in APPS.iter() {
                println!(
                    "[{}] {:<14} {:<14} {}",
                    if manager.is_installed(app.name) { "x" } else { " " },
                    app.category,
                    app.name,
                    app.display_name
                );
            }
        }
        Commands::AppRemove { name } => {
            let app = lookup_app(&name)?;
            let message = AppManager::new(executor.clone()).remove(app.name)?;
            println!("{}", message);
        }
        Commands::RestartExplorer => {
            maybe_restart_explorer(true, executor.as_ref())?;
        }
    }

    Ok(())
}

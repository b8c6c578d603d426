//! Command-line interface for inspecting hookhost hook directories.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hookhost_core::config::{env_vars, HooksConfig};
use hookhost_core::hooks::{HookInspection, InspectionStatus};
use hookhost_core::settings::{apply_overrides, env_overrides, override_variable, resolve_settings};
use hookhost_core::{AgentHookManager, HookManager, HookWalker, ServerHookManager};
use hookhost_sdk::{HookSettings, PROGRAM_AGENT, PROGRAM_SERVER};

/// Hookhost - inspect and dry-run native hook libraries.
#[derive(Parser, Debug)]
#[command(name = "hookhost")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Hook directory commands.
    Hooks {
        #[command(subcommand)]
        hooks_cmd: HooksCommand,
    },
}

/// Host program whose hooks are inspected.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Program {
    Agent,
    Server,
}

impl Program {
    fn id(self) -> &'static str {
        match self {
            Program::Agent => PROGRAM_AGENT,
            Program::Server => PROGRAM_SERVER,
        }
    }
}

/// Options shared by the hooks subcommands.
#[derive(clap::Args, Debug)]
struct HooksTarget {
    /// Program the hooks are built for.
    #[arg(short, long, value_enum)]
    program: Program,
    /// Hook directory (overrides the configuration file and environment).
    #[arg(short, long)]
    directory: Option<PathBuf>,
    /// TOML configuration file with a [hooks] section.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Hooks subcommands.
#[derive(Subcommand, Debug)]
enum HooksCommand {
    /// List every entry of the hook directory with its compatibility.
    List {
        #[command(flatten)]
        target: HooksTarget,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the settings prototypes of the compatible hooks.
    Settings {
        #[command(flatten)]
        target: HooksTarget,
        /// Print the settings each hook would be loaded with instead.
        #[arg(long)]
        resolved: bool,
    },
    /// Load every hook with its resolved settings, report, and close them.
    Load {
        #[command(flatten)]
        target: HooksTarget,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    match args.command {
        Command::Hooks { hooks_cmd } => run_hooks_cmd(hooks_cmd),
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "hookhost=debug" } else { "hookhost=info" };

    // Build the env filter for log level control
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    if env_vars::log_json() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .with_writer(std::io::stderr)
            .init();
    }
}

fn run_hooks_cmd(cmd: HooksCommand) -> Result<()> {
    match cmd {
        HooksCommand::List { target, json } => list_hooks(&target, json),
        HooksCommand::Settings { target, resolved } => show_settings(&target, resolved),
        HooksCommand::Load { target } => load_hooks(&target),
    }
}

/// Configuration file if given, otherwise the program defaults.
fn load_config(target: &HooksTarget) -> Result<HooksConfig> {
    match &target.config {
        Some(path) => HooksConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(HooksConfig::for_program(target.program.id())?),
    }
}

fn hook_directory(target: &HooksTarget, config: &HooksConfig) -> Result<PathBuf> {
    let directory = match &target.directory {
        Some(directory) => directory.clone(),
        None => config.directory_for(target.program.id())?,
    };
    tracing::debug!(program = target.program.id(), directory = %directory.display(), "Using hook directory");
    Ok(directory)
}

fn list_hooks(target: &HooksTarget, json: bool) -> Result<()> {
    let config = load_config(target)?;
    let directory = hook_directory(target, &config)?;

    let inspections = HookWalker::new().inspect(target.program.id(), &directory)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&inspections)?);
        return Ok(());
    }

    println!("Hooks in {}", directory.display());
    println!("==================\n");

    if inspections.is_empty() {
        println!("No hooks found.");
        return Ok(());
    }

    for inspection in &inspections {
        print_inspection(inspection);
    }

    let compatible = inspections
        .iter()
        .filter(|i| i.status == InspectionStatus::Compatible)
        .count();
    println!("Total: {} entries, {} compatible", inspections.len(), compatible);

    Ok(())
}

fn print_inspection(inspection: &HookInspection) {
    let status = match &inspection.status {
        InspectionStatus::Compatible => "compatible",
        InspectionStatus::Incompatible(_) => "incompatible",
        InspectionStatus::Unloadable(_) => "unloadable",
    };

    println!("  {} [{}]", inspection.name, status);
    println!("        Path: {}", inspection.path.display());
    if let (Some(program), Some(version)) = (&inspection.program, &inspection.version) {
        println!("        Built for: {} {}", program, version);
    }
    if let InspectionStatus::Incompatible(reason) | InspectionStatus::Unloadable(reason) =
        &inspection.status
    {
        println!("        Reason: {}", reason);
    }
    println!();
}

/// Prototypes of every compatible hook, and the settings they resolve to with
/// the configuration file and environment overrides applied.
fn negotiate_settings(
    walker: &HookWalker,
    target: &HooksTarget,
    config: &HooksConfig,
    directory: &Path,
) -> Result<(
    HashMap<String, Option<HookSettings>>,
    HashMap<String, HookSettings>,
)> {
    let program = target.program.id();
    let prototypes = walker.collect_proto_settings(program, directory)?;

    let mut configured = config.settings.clone();
    apply_overrides(&mut configured, env_overrides(program, &prototypes)?);
    let resolved = resolve_settings(&prototypes, &configured)?;

    Ok((prototypes, resolved))
}

fn show_settings(target: &HooksTarget, resolved: bool) -> Result<()> {
    let config = load_config(target)?;
    let directory = hook_directory(target, &config)?;
    let walker = HookWalker::new();

    let (prototypes, settings) = negotiate_settings(&walker, target, &config, &directory)?;

    if resolved {
        println!("{}", serde_json::to_string_pretty(&sorted(settings))?);
        return Ok(());
    }

    let mut names: Vec<_> = prototypes.keys().cloned().collect();
    names.sort();
    for name in names {
        match &prototypes[&name] {
            None => println!("{}: no settings", name),
            Some(prototype) => {
                println!("{}:", name);
                println!("{}", serde_json::to_string_pretty(prototype)?);
                if let Some(fields) = prototype.as_object() {
                    for key in fields.keys() {
                        println!(
                            "        env: {}",
                            override_variable(target.program.id(), &name, key)
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

fn load_hooks(target: &HooksTarget) -> Result<()> {
    let config = load_config(target)?;
    let directory = hook_directory(target, &config)?;
    let walker = HookWalker::new();

    let (_, settings) = negotiate_settings(&walker, target, &config, &directory)?;

    match target.program {
        Program::Agent => {
            let mut hooks = AgentHookManager::new();
            dry_run(&mut hooks, &walker, target.program, &directory, &settings)
        }
        Program::Server => {
            let mut hooks = ServerHookManager::new();
            dry_run(&mut hooks, &walker, target.program, &directory, &settings)
        }
    }
}

fn dry_run(
    hooks: &mut HookManager,
    walker: &HookWalker,
    program: Program,
    directory: &Path,
    settings: &HashMap<String, HookSettings>,
) -> Result<()> {
    hooks
        .register_hooks_with(walker, program.id(), directory, settings)
        .with_context(|| format!("Failed to load hooks from {}", directory.display()))?;

    let carriers = hooks.executor().carriers();
    println!("Loaded {} hook(s) for {}", carriers.len(), program.id());
    for carrier in carriers {
        println!("  {}", carrier.name());
    }
    println!(
        "Recognized callouts: {}",
        hooks.executor().supported_callouts().join(", ")
    );

    hooks.close()?;
    Ok(())
}

fn sorted(settings: HashMap<String, HookSettings>) -> std::collections::BTreeMap<String, HookSettings> {
    settings.into_iter().collect()
}

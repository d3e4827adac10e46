//! `tsp config` command - Configuration management
//!
//! Provides commands to view and modify TSP configuration.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::format_aql;
use crate::cli::GlobalOpts;
use crate::core::project::Project;
use crate::core::Config;
use crate::sampling::level::{Aql, InspectionLevel};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show paths to configuration files
    Path(PathArgs),

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Print the raw project config file
    #[arg(long = "project-only", conflicts_with = "global_only")]
    pub project_only: bool,

    /// Print the raw global (user) config file
    #[arg(long = "global-only")]
    pub global_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (e.g., default_level, major_aql)
    pub key: String,

    /// Value to set
    pub value: String,

    /// Write to the global (user) config instead of the project
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,

    /// Remove from the global (user) config instead of the project
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Print only the project config path
    #[arg(long = "project-only", conflicts_with = "global_only")]
    pub project_only: bool,

    /// Print only the global config path
    #[arg(long = "global-only")]
    pub global_only: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("author", "Inspector name printed on plan documents"),
    ("default_level", "Default inspection level (I, II, III)"),
    ("major_aql", "Default AQL for major defects"),
    ("minor_aql", "Default AQL for minor defects"),
    ("default_format", "Default output format (yaml, json, tsv, csv, md)"),
];

/// Which config file a command reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Global,
    Project,
}

impl Scope {
    const ALL: [Scope; 2] = [Scope::Global, Scope::Project];

    fn from_flag(global: bool) -> Self {
        if global {
            Scope::Global
        } else {
            Scope::Project
        }
    }

    /// Pick a single scope from `--project-only` / `--global-only`
    fn only(project_only: bool, global_only: bool) -> Option<Self> {
        match (project_only, global_only) {
            (true, _) => Some(Scope::Project),
            (_, true) => Some(Scope::Global),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Project => "project",
        }
    }

    fn path(self) -> Result<PathBuf> {
        match self {
            Scope::Global => Config::global_config_path()
                .ok_or_else(|| miette::miette!("Could not determine global config directory")),
            Scope::Project => {
                let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
                Ok(project.tsp_dir().join("config.yaml"))
            }
        }
    }
}

/// The raw key/value mapping stored in one config file
struct ConfigFile {
    path: PathBuf,
    entries: serde_yml::Mapping,
}

impl ConfigFile {
    /// Read the file for a scope; a missing or comment-only file is empty
    fn open(scope: Scope) -> Result<Self> {
        let path = scope.path()?;
        let entries = if path.exists() {
            let content = fs::read_to_string(&path).into_diagnostic()?;
            parse_entries(&content).map_err(|e| {
                miette::miette!("Invalid config file {}: {}", path.display(), e)
            })?
        } else {
            serde_yml::Mapping::new()
        };
        Ok(Self { path, entries })
    }

    fn set(&mut self, key: &str, value: serde_yml::Value) {
        self.entries
            .insert(serde_yml::Value::String(key.to_string()), value);
    }

    fn remove(&mut self, key: &str) -> bool {
        self.entries
            .remove(&serde_yml::Value::String(key.to_string()))
            .is_some()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }
        let yaml = serde_yml::to_string(&self.entries).into_diagnostic()?;
        fs::write(&self.path, yaml).into_diagnostic()
    }
}

fn parse_entries(content: &str) -> std::result::Result<serde_yml::Mapping, String> {
    let blank = content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    });
    if blank {
        return Ok(serde_yml::Mapping::new());
    }
    match serde_yml::from_str::<serde_yml::Value>(content).map_err(|e| e.to_string())? {
        serde_yml::Value::Null => Ok(serde_yml::Mapping::new()),
        serde_yml::Value::Mapping(map) => Ok(map),
        _ => Err("expected a mapping of keys to values".to_string()),
    }
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, _global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args),
        ConfigCommands::Set(args) => run_set(args),
        ConfigCommands::Unset(args) => run_unset(args),
        ConfigCommands::Path(args) => run_path(args),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        let value = effective_value(&config, key)
            .ok_or_else(|| miette::miette!("Key '{}' is not set", key))?;
        println!("{}", value);
        return Ok(());
    }

    if let Some(scope) = Scope::only(args.project_only, args.global_only) {
        return print_file(scope);
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        let shown = match effective_value(&config, key) {
            Some(v) => style(v).yellow().to_string(),
            None => style("(not set)".to_string()).dim().to_string(),
        };
        println!("  {}: {}", style(key).cyan(), shown);
    }

    println!();
    println!("{}", style("Config Sources (highest priority first):").dim());
    println!("  1. Environment (TSP_AUTHOR, TSP_LEVEL, TSP_MAJOR_AQL, TSP_MINOR_AQL)");
    println!("  2. Project config (.tsp/config.yaml)");
    println!("  3. Global config (~/.config/tsp/config.yaml)");
    Ok(())
}

fn print_file(scope: Scope) -> Result<()> {
    let path = scope.path()?;
    println!(
        "{} {}",
        style(format!("{} config:", scope.label())).bold(),
        style(path.display()).dim()
    );
    println!();
    if path.exists() {
        print!("{}", fs::read_to_string(&path).into_diagnostic()?);
    } else {
        println!("{}", style("(not created)").dim());
    }
    Ok(())
}

fn run_set(args: SetArgs) -> Result<()> {
    let value = validate_value(&args.key, &args.value)?;
    let scope = Scope::from_flag(args.global);

    let mut file = ConfigFile::open(scope)?;
    file.set(&args.key, value);
    file.save()?;

    println!(
        "{} Set {} {} {} in {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(&args.value).yellow(),
        scope.label()
    );
    Ok(())
}

fn run_unset(args: UnsetArgs) -> Result<()> {
    let scope = Scope::from_flag(args.global);
    let mut file = ConfigFile::open(scope)?;
    if !file.remove(&args.key) {
        return Err(miette::miette!(
            "Key '{}' is not set in {} config",
            args.key,
            scope.label()
        ));
    }
    file.save()?;

    println!(
        "{} Removed {} from {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        scope.label()
    );
    Ok(())
}

fn run_path(args: PathArgs) -> Result<()> {
    if let Some(scope) = Scope::only(args.project_only, args.global_only) {
        println!("{}", scope.path()?.display());
        return Ok(());
    }

    println!("{}", style("Configuration file paths:").bold());
    for scope in Scope::ALL {
        let status = match scope.path() {
            Ok(path) if path.exists() => format!("{} {}", path.display(), style("(exists)").green()),
            Ok(path) => format!("{} {}", path.display(), style("(not created)").dim()),
            Err(_) => style("(not in a TSP project)").dim().to_string(),
        };
        println!("  {:<8} {}", style(scope.label()).cyan(), status);
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();
    for (key, description) in VALID_KEYS {
        println!("  {:<16} {}", style(key).cyan(), style(description).dim());
    }
    println!();
    println!("{}", style("Use 'tsp config set <key> <value>' to set a value.").dim());
    Ok(())
}

/// Merged value of a key, formatted for display
fn effective_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "author" => config.author.clone(),
        "default_level" => config.default_level.map(|l| l.to_string()),
        "major_aql" => config.major_aql.map(format_aql),
        "minor_aql" => config.minor_aql.map(format_aql),
        "default_format" => config.default_format.clone(),
        _ => None,
    }
}

/// Check a key/value pair and convert it to the YAML value stored in the file
fn validate_value(key: &str, value: &str) -> Result<serde_yml::Value> {
    match key {
        "author" | "default_format" => Ok(serde_yml::Value::String(value.to_string())),
        "default_level" => {
            let level: InspectionLevel = value.parse().map_err(|e| miette::miette!("{}", e))?;
            Ok(serde_yml::Value::String(level.to_string()))
        }
        "major_aql" | "minor_aql" => {
            let aql = value
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Aql::from_value)
                .ok_or_else(|| {
                    miette::miette!(
                        "Unsupported AQL '{}'. Use one of: {}",
                        value,
                        Aql::ALL.map(|a| a.to_string()).join(", ")
                    )
                })?;
            Ok(serde_yml::Value::Number(aql.value().into()))
        }
        _ => Err(miette::miette!(
            "Unknown config key '{}'. Run 'tsp config keys' to list keys",
            key
        )),
    }
}

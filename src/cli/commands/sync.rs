//! `tsp sync` command - update an inspection context file
//!
//! Loads the context, applies the requested changes through the
//! [`SyncController`], and writes the file back only when something changed.

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{format_aql, parse_aql_arg, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::entities::context::InspectionContext;
use crate::sampling::level::InspectionLevel;
use crate::sampling::plan::parse_lot_size;
use crate::sampling::sync::{PlanInputs, SyncController};

#[derive(clap::Args, Debug)]
pub struct SyncArgs {
    /// Inspection context file (YAML); created if missing
    pub file: PathBuf,

    /// New lot size as a whole number (non-numeric, fractional or non-positive clears the plan)
    #[arg(long, short = 'n', allow_hyphen_values = true)]
    pub lot_size: Option<String>,

    /// New inspection level
    #[arg(long, short = 'l')]
    pub level: Option<InspectionLevel>,

    /// New AQL for major defects
    #[arg(long, value_parser = parse_aql_arg)]
    pub major: Option<f64>,

    /// New AQL for minor defects
    #[arg(long, value_parser = parse_aql_arg)]
    pub minor: Option<f64>,

    /// Override the sample size by hand
    #[arg(long, conflicts_with = "track_sample_size")]
    pub sample_size: Option<u32>,

    /// Drop a manual sample size and follow the plan again
    #[arg(long)]
    pub track_sample_size: bool,

    /// Number of tags to print
    #[arg(long)]
    pub tag_quantity: Option<u32>,
}

pub fn run(args: SyncArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let existed = args.file.exists();

    let loaded = if existed {
        InspectionContext::load(&args.file).into_diagnostic()?
    } else {
        InspectionContext {
            level: config.level(),
            major_aql: config.major_aql(),
            minor_aql: config.minor_aql(),
            ..Default::default()
        }
    };

    let controller = SyncController::new(loaded.clone());

    let current = PlanInputs::of(&controller.current());
    controller.update_inputs(PlanInputs {
        lot_size: match &args.lot_size {
            Some(raw) => parse_lot_size(raw),
            None => current.lot_size,
        },
        level: args.level.unwrap_or(current.level),
        major_aql: args.major.unwrap_or(current.major_aql),
        minor_aql: args.minor.unwrap_or(current.minor_aql),
    });

    if let Some(sample_size) = args.sample_size {
        controller.override_sample_size(sample_size);
    }
    if args.track_sample_size {
        controller.release_sample_size();
    }
    if let Some(tag_quantity) = args.tag_quantity {
        controller.set_tag_quantity(tag_quantity);
    }

    let ctx = controller.current();
    let changed = *ctx != loaded;
    if changed || !existed {
        ctx.save(&args.file).into_diagnostic()?;
    }

    match resolve_format(global, &config) {
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&*ctx).into_diagnostic()?),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&*ctx).into_diagnostic()?)
        }
        _ => {
            if changed || !existed {
                println!(
                    "{} Updated {}",
                    style("✓").green(),
                    style(args.file.display()).cyan()
                );
            } else {
                println!(
                    "{} {} already in sync",
                    style("✓").green(),
                    style(args.file.display()).cyan()
                );
            }
            if !global.quiet {
                print_context(&ctx);
            }
        }
    }

    Ok(())
}

fn print_context(ctx: &InspectionContext) {
    let lot = ctx
        .lot_size
        .map_or_else(|| "-".to_string(), |n| n.to_string());
    println!("  {}: {}", style("Lot Size").bold(), lot);
    println!(
        "  {}: {}  {}: {}  {}: {}",
        style("Level").bold(),
        ctx.level,
        style("Major AQL").bold(),
        format_aql(ctx.major_aql),
        style("Minor AQL").bold(),
        format_aql(ctx.minor_aql)
    );
    match &ctx.plan {
        Some(plan) => println!(
            "  {}: {} (n={}, major {}, minor {})",
            style("Plan").bold(),
            style(plan.code_letter).yellow(),
            plan.sample_size,
            plan.major,
            plan.minor
        ),
        None => println!("  {}: {}", style("Plan").bold(), style("(none)").dim()),
    }

    let sample = ctx
        .sample_size
        .map_or_else(|| "-".to_string(), |n| n.to_string());
    let manual = if ctx.sample_size_is_manual {
        style(" (manual)").yellow().to_string()
    } else {
        String::new()
    };
    println!("  {}: {}{}", style("Sample Size").bold(), sample, manual);

    let tags = ctx
        .tag_quantity
        .map_or_else(|| "-".to_string(), |n| n.to_string());
    println!("  {}: {}", style("Tag Quantity").bold(), tags);
}

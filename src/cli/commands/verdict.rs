//! `tsp verdict` command - lot disposition from sample defect counts

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::commands::plan::{render_pretty, PlanDocument};
use crate::cli::helpers::{parse_aql_arg, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::sampling::level::InspectionLevel;
use crate::sampling::plan::{LotDisposition, SamplingPlan, Verdict};

#[derive(clap::Args, Debug)]
pub struct VerdictArgs {
    /// Number of units in the lot (a whole number, e.g. 500, 1_200 or 1e3)
    #[arg(long, short = 'n', allow_hyphen_values = true)]
    pub lot_size: String,

    /// Inspection level (I, II, III) [default: from config, else II]
    #[arg(long, short = 'l')]
    pub level: Option<InspectionLevel>,

    /// AQL for major defects [default: from config, else 2.5]
    #[arg(long, value_parser = parse_aql_arg)]
    pub major: Option<f64>,

    /// AQL for minor defects [default: from config, else 4.0]
    #[arg(long, value_parser = parse_aql_arg)]
    pub minor: Option<f64>,

    /// Major defects found in the sample
    #[arg(long, default_value = "0")]
    pub major_defects: u32,

    /// Minor defects found in the sample
    #[arg(long, default_value = "0")]
    pub minor_defects: u32,
}

#[derive(Debug, Serialize)]
struct VerdictReport<'a> {
    #[serde(flatten)]
    inputs: &'a PlanDocument,
    major_defects: u32,
    minor_defects: u32,
    disposition: LotDisposition,
}

pub fn run(args: VerdictArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let doc = PlanDocument::derive(
        Some(&args.lot_size),
        args.level,
        args.major,
        args.minor,
        &config,
    );

    let plan: SamplingPlan = doc.plan.ok_or_else(|| {
        miette::miette!(
            "No sampling plan for lot size '{}': lot size must be a positive whole number",
            args.lot_size
        )
    })?;
    let disposition = plan.disposition(args.major_defects, args.minor_defects);

    let report = VerdictReport {
        inputs: &doc,
        major_defects: args.major_defects,
        minor_defects: args.minor_defects,
        disposition,
    };

    let format = resolve_format(global, &config);
    match format {
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&report).into_diagnostic()?),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?)
        }
        OutputFormat::Tsv | OutputFormat::Csv => {
            let sep = if format == OutputFormat::Csv { "," } else { "\t" };
            println!(
                "{}",
                ["MAJOR_DEFECTS", "MAJOR", "MINOR_DEFECTS", "MINOR", "LOT"].join(sep)
            );
            println!(
                "{}",
                [
                    args.major_defects.to_string(),
                    disposition.major.to_string(),
                    args.minor_defects.to_string(),
                    disposition.minor.to_string(),
                    disposition.lot.to_string(),
                ]
                .join(sep)
            );
        }
        OutputFormat::Auto | OutputFormat::Md => {
            if !global.quiet {
                print!("{}", render_pretty(&doc));
                println!(
                    "Major defects: {} ({})",
                    args.major_defects,
                    styled(disposition.major)
                );
                println!(
                    "Minor defects: {} ({})",
                    args.minor_defects,
                    styled(disposition.minor)
                );
            }
            println!("{}: {}", style("Lot").bold(), styled(disposition.lot));
        }
    }

    Ok(())
}

fn styled(verdict: Verdict) -> console::StyledObject<String> {
    match verdict {
        Verdict::Accept => style(verdict.to_string().to_uppercase()).green(),
        Verdict::Reject => style(verdict.to_string().to_uppercase()).red(),
    }
}

//! `tsp plan` command - derive a single sampling plan

use chrono::Utc;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{escape_csv, format_aql, parse_aql_arg, resolve_format, write_output};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::sampling::level::InspectionLevel;
use crate::sampling::plan::{derive_plan, parse_lot_size, SamplingPlan};

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Number of units in the lot (a whole number, e.g. 500, 1_200 or 1e3)
    #[arg(long, short = 'n', allow_hyphen_values = true)]
    pub lot_size: Option<String>,

    /// Inspection level (I, II, III) [default: from config, else II]
    #[arg(long, short = 'l')]
    pub level: Option<InspectionLevel>,

    /// AQL for major defects [default: from config, else 2.5]
    #[arg(long, value_parser = parse_aql_arg)]
    pub major: Option<f64>,

    /// AQL for minor defects [default: from config, else 4.0]
    #[arg(long, value_parser = parse_aql_arg)]
    pub minor: Option<f64>,

    /// Write to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// A derived plan together with the inputs it came from
#[derive(Debug, Clone, Serialize)]
pub struct PlanDocument {
    pub lot_size: Option<i64>,
    pub level: InspectionLevel,
    pub major_aql: f64,
    pub minor_aql: f64,
    pub plan: Option<SamplingPlan>,
}

impl PlanDocument {
    /// Resolve inputs against config defaults and derive the plan
    pub fn derive(
        lot_size: Option<&str>,
        level: Option<InspectionLevel>,
        major: Option<f64>,
        minor: Option<f64>,
        config: &Config,
    ) -> Self {
        let lot_size = lot_size.and_then(parse_lot_size);
        let level = level.unwrap_or_else(|| config.level());
        let major_aql = major.unwrap_or_else(|| config.major_aql());
        let minor_aql = minor.unwrap_or_else(|| config.minor_aql());
        let plan = lot_size.and_then(|n| derive_plan(n, level, major_aql, minor_aql));
        Self {
            lot_size,
            level,
            major_aql,
            minor_aql,
            plan,
        }
    }
}

pub fn run(args: PlanArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let doc = PlanDocument::derive(
        args.lot_size.as_deref(),
        args.level,
        args.major,
        args.minor,
        &config,
    );

    let format = resolve_format(global, &config);
    let rendered = match format {
        OutputFormat::Auto => render_pretty(&doc),
        OutputFormat::Yaml => serde_yml::to_string(&doc).into_diagnostic()?,
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&doc).into_diagnostic()?),
        OutputFormat::Tsv => render_delimited(&doc, "\t", |s| s.to_string()),
        OutputFormat::Csv => render_delimited(&doc, ",", escape_csv),
        OutputFormat::Md => render_markdown(&doc, &config.author()),
    };

    write_output(&rendered, args.output.as_deref(), global.quiet)
}

/// Terminal rendering
pub fn render_pretty(doc: &PlanDocument) -> String {
    let mut out = String::new();
    let rule = style("─".repeat(60)).dim().to_string();
    let lot = doc
        .lot_size
        .map_or_else(|| "-".to_string(), |n| n.to_string());

    out.push_str(&format!("{}\n", rule));
    out.push_str(&format!("{}: {}\n", style("Lot Size").bold(), style(lot).cyan()));

    match &doc.plan {
        Some(plan) => {
            out.push_str(&format!(
                "{}: {} (code letter {})\n",
                style("Inspection Level").bold(),
                doc.level,
                style(plan.code_letter).yellow()
            ));
            out.push_str(&format!(
                "{}: {}\n",
                style("Sample Size").bold(),
                style(plan.sample_size).green()
            ));
            out.push_str(&format!(
                "{} (AQL {}): Ac {} / Re {}\n",
                style("Major").bold(),
                format_aql(doc.major_aql),
                plan.major.ac,
                plan.major.re
            ));
            out.push_str(&format!(
                "{} (AQL {}): Ac {} / Re {}\n",
                style("Minor").bold(),
                format_aql(doc.minor_aql),
                plan.minor.ac,
                plan.minor.re
            ));
        }
        None => {
            out.push_str(&format!(
                "{} No sampling plan: lot size must be a positive whole number\n",
                style("!").yellow()
            ));
        }
    }
    out.push_str(&format!("{}\n", rule));
    out
}

/// One header line plus one row per plan; no row when there is no plan
pub fn render_delimited(doc: &PlanDocument, sep: &str, escape: fn(&str) -> String) -> String {
    let header = [
        "LOT_SIZE",
        "LEVEL",
        "CODE_LETTER",
        "SAMPLE_SIZE",
        "MAJOR_AQL",
        "MAJOR_AC",
        "MAJOR_RE",
        "MINOR_AQL",
        "MINOR_AC",
        "MINOR_RE",
    ];
    let mut out = format!("{}\n", header.join(sep));

    if let (Some(lot), Some(plan)) = (doc.lot_size, &doc.plan) {
        let row = [
            lot.to_string(),
            doc.level.to_string(),
            plan.code_letter.to_string(),
            plan.sample_size.to_string(),
            format_aql(doc.major_aql),
            plan.major.ac.to_string(),
            plan.major.re.to_string(),
            format_aql(doc.minor_aql),
            plan.minor.ac.to_string(),
            plan.minor.re.to_string(),
        ];
        let fields: Vec<String> = row.iter().map(|f| escape(f)).collect();
        out.push_str(&fields.join(sep));
        out.push('\n');
    }
    out
}

/// Printable plan record for the inspection file
pub fn render_markdown(doc: &PlanDocument, author: &str) -> String {
    let mut out = String::new();
    out.push_str("# Single Sampling Plan\n\n");
    out.push_str(&format!(
        "Generated {} by {}\n\n",
        Utc::now().format("%Y-%m-%d %H:%M UTC"),
        author
    ));

    let mut inputs = Builder::default();
    inputs.push_record(["Input", "Value"]);
    inputs.push_record([
        "Lot size".to_string(),
        doc.lot_size.map_or_else(|| "-".to_string(), |n| n.to_string()),
    ]);
    inputs.push_record(["Inspection level".to_string(), doc.level.to_string()]);
    inputs.push_record(["Major AQL".to_string(), format_aql(doc.major_aql)]);
    inputs.push_record(["Minor AQL".to_string(), format_aql(doc.minor_aql)]);
    out.push_str("## Inputs\n\n");
    out.push_str(&inputs.build().with(Style::markdown()).to_string());
    out.push_str("\n\n## Plan\n\n");

    match &doc.plan {
        Some(plan) => {
            out.push_str(&format!(
                "- **Code letter:** {}\n- **Sample size:** {}\n\n",
                plan.code_letter, plan.sample_size
            ));
            let mut limits = Builder::default();
            limits.push_record(["Severity", "AQL", "Ac", "Re"]);
            limits.push_record([
                "Major".to_string(),
                format_aql(doc.major_aql),
                plan.major.ac.to_string(),
                plan.major.re.to_string(),
            ]);
            limits.push_record([
                "Minor".to_string(),
                format_aql(doc.minor_aql),
                plan.minor.ac.to_string(),
                plan.minor.re.to_string(),
            ]);
            out.push_str(&limits.build().with(Style::markdown()).to_string());
            out.push('\n');
        }
        None => {
            out.push_str("No sampling plan: lot size must be a positive whole number.\n");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lot: &str) -> PlanDocument {
        PlanDocument::derive(Some(lot), Some(InspectionLevel::II), Some(2.5), Some(4.0), &Config::default())
    }

    #[test]
    fn test_document_uses_config_defaults() {
        let config = Config {
            default_level: Some(InspectionLevel::III),
            major_aql: Some(1.0),
            ..Default::default()
        };
        let d = PlanDocument::derive(Some("100"), None, None, None, &config);
        assert_eq!(d.level, InspectionLevel::III);
        assert_eq!(d.major_aql, 1.0);
        assert_eq!(d.minor_aql, 4.0);
        assert_eq!(d.plan.unwrap().sample_size, 32);
    }

    #[test]
    fn test_non_numeric_lot_size_has_no_plan() {
        let d = doc("a lot");
        assert!(d.lot_size.is_none());
        assert!(d.plan.is_none());
    }

    #[test]
    fn test_tsv_row() {
        let out = render_delimited(&doc("100"), "\t", |s| s.to_string());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "100\tII\tF\t20\t2.5\t2\t3\t4.0\t3\t4");
    }

    #[test]
    fn test_delimited_without_plan_is_header_only() {
        let out = render_delimited(&doc("0"), ",", escape_csv);
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_markdown_contains_limits() {
        let out = render_markdown(&doc("10000"), "qa");
        assert!(out.contains("# Single Sampling Plan"));
        assert!(out.contains("**Code letter:** L"));
        assert!(out.contains("**Sample size:** 200"));
        assert!(out.contains("by qa"));
    }

    #[test]
    fn test_json_no_plan_is_null() {
        let json = serde_json::to_value(doc("-5")).unwrap();
        assert!(json["plan"].is_null());
        assert_eq!(json["lot_size"], -5);
    }
}

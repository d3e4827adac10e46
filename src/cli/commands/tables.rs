//! `tsp table` command - print the lookup tables

use clap::Subcommand;
use miette::{IntoDiagnostic, Result};
use serde_json::json;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{escape_csv, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::sampling::level::{Aql, CodeLetter, InspectionLevel};
use crate::sampling::tables::{self, LOT_SIZE_THRESHOLDS};

#[derive(Subcommand, Debug)]
pub enum TableCommands {
    /// Lot size ranges and the code letter for each inspection level
    Letters,

    /// Sample size for each code letter
    SampleSizes {
        /// Show only this code letter
        #[arg(long, short = 'c')]
        letter: Option<CodeLetter>,
    },

    /// Accept/reject numbers by code letter and AQL
    Acceptance {
        /// Show only this code letter
        #[arg(long, short = 'c')]
        letter: Option<CodeLetter>,
    },
}

pub fn run(cmd: TableCommands, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let (header, rows) = match cmd {
        TableCommands::Letters => letters_table(),
        TableCommands::SampleSizes { letter } => only_letter(sample_size_table(), letter),
        TableCommands::Acceptance { letter } => only_letter(acceptance_table(), letter),
    };

    match resolve_format(global, &config) {
        OutputFormat::Json => {
            let records = as_records(&header, &rows);
            println!("{}", serde_json::to_string_pretty(&records).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            let records = as_records(&header, &rows);
            print!("{}", serde_yml::to_string(&records).into_diagnostic()?);
        }
        OutputFormat::Tsv => {
            println!("{}", header.join("\t"));
            for row in &rows {
                println!("{}", row.join("\t"));
            }
        }
        OutputFormat::Csv => {
            let line = |fields: &[String]| {
                fields.iter().map(|f| escape_csv(f)).collect::<Vec<_>>().join(",")
            };
            println!("{}", line(header.as_slice()));
            for row in &rows {
                println!("{}", line(row.as_slice()));
            }
        }
        OutputFormat::Auto | OutputFormat::Md => {
            print!("{}", render_markdown(&header, &rows));
        }
    }

    Ok(())
}

fn as_records(header: &[String], rows: &[Vec<String>]) -> Vec<serde_json::Value> {
    rows.iter()
        .map(|row| {
            let map: serde_json::Map<String, serde_json::Value> = header
                .iter()
                .zip(row)
                .map(|(k, v)| (k.clone(), json!(v)))
                .collect();
            serde_json::Value::Object(map)
        })
        .collect()
}

fn render_markdown(header: &[String], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(header.iter().cloned());
    for row in rows {
        builder.push_record(row.iter().cloned());
    }
    format!("{}\n", builder.build().with(Style::markdown()))
}

/// Human label for the lot size range at `index`
pub fn range_label(index: usize) -> String {
    let lower = if index == 0 {
        1
    } else {
        LOT_SIZE_THRESHOLDS[index - 1] + 1
    };
    match LOT_SIZE_THRESHOLDS.get(index) {
        Some(&u64::MAX) | None => format!("{}+", lower),
        Some(upper) => format!("{}-{}", lower, upper),
    }
}

type Table = (Vec<String>, Vec<Vec<String>>);

/// Keep the row for one code letter; tables keyed by letter put it first
fn only_letter((header, mut rows): Table, letter: Option<CodeLetter>) -> Table {
    if let Some(letter) = letter {
        let key = letter.to_string();
        rows.retain(|row| row.first() == Some(&key));
    }
    (header, rows)
}

fn letters_table() -> Table {
    let mut header = vec!["lot_size".to_string()];
    header.extend(InspectionLevel::ALL.iter().map(|l| format!("level_{}", l)));

    let rows = (0..LOT_SIZE_THRESHOLDS.len())
        .map(|i| {
            let mut row = vec![range_label(i)];
            row.extend(
                InspectionLevel::ALL
                    .iter()
                    .map(|&level| tables::letters_for(level)[i].to_string()),
            );
            row
        })
        .collect();
    (header, rows)
}

fn sample_size_table() -> Table {
    let header = vec!["code_letter".to_string(), "sample_size".to_string()];
    let rows = tables::sample_sizes()
        .map(|(letter, n)| vec![letter.to_string(), n.to_string()])
        .collect();
    (header, rows)
}

fn acceptance_table() -> Table {
    let mut header = vec!["code_letter".to_string()];
    header.extend(Aql::ALL.iter().map(|a| format!("aql_{}", a)));

    let rows = tables::acceptance_rows()
        .map(|(letter, cells)| {
            let mut row = vec![letter.to_string()];
            row.extend(cells.iter().map(|c| c.to_string()));
            row
        })
        .collect();
    (header, rows)
}

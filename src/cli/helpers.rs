//! Shared helper functions for CLI commands

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::sampling::level::Aql;

/// Pick the output format: an explicit `--format` wins, then `default_format` from config
pub fn resolve_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    config
        .default_format
        .as_deref()
        .and_then(|f| OutputFormat::from_str(f, true).ok())
        .unwrap_or(OutputFormat::Auto)
}

/// clap value parser for AQL arguments.
///
/// Any finite number is accepted; values outside the supported set are
/// resolved to a zero-tolerance plan by the engine.
pub fn parse_aql_arg(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !value.is_finite() {
        return Err(format!("'{}' is not a finite number", s));
    }
    Ok(value)
}

/// Format an AQL the way the tables print it
pub fn format_aql(value: f64) -> String {
    match Aql::from_value(value) {
        Some(aql) => aql.to_string(),
        None => format!("{}", value),
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Write rendered output to a file, or to stdout when no path is given
pub fn write_output(content: &str, output_path: Option<&Path>, quiet: bool) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            if !quiet {
                println!("Written to: {}", path.display());
            }
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(format: OutputFormat) -> GlobalOpts {
        GlobalOpts {
            format,
            quiet: false,
            verbose: false,
        }
    }

    #[test]
    fn test_resolve_format() {
        let config = Config {
            default_format: Some("json".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_format(&global(OutputFormat::Auto), &config), OutputFormat::Json);
        assert_eq!(resolve_format(&global(OutputFormat::Md), &config), OutputFormat::Md);
        assert_eq!(
            resolve_format(&global(OutputFormat::Auto), &Config::default()),
            OutputFormat::Auto
        );
    }

    #[test]
    fn test_parse_aql_arg() {
        assert_eq!(parse_aql_arg("2.5"), Ok(2.5));
        assert_eq!(parse_aql_arg("9.9"), Ok(9.9));
        assert!(parse_aql_arg("NaN").is_err());
        assert!(parse_aql_arg("high").is_err());
    }

    #[test]
    fn test_format_aql() {
        assert_eq!(format_aql(0.65), "0.65");
        assert_eq!(format_aql(4.0), "4.0");
        assert_eq!(format_aql(9.9), "9.9");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }
}

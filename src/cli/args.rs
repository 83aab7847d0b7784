//! Command-line argument definitions using clap

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::pipeline::{Dimension, FilterCriteria};

/// agelens - Analyze eldercare programme survey data
#[derive(Parser, Debug)]
#[command(name = "agelens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input survey file (CSV)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// JSON file with filter criteria, e.g. {"country": ["Ukraine"]}.
    /// Command-line filters override entries for the same dimension.
    #[arg(long)]
    pub criteria: Option<PathBuf>,

    /// Analysis report path (JSON).
    /// Defaults to the input directory with an '_analysis' suffix (e.g., survey.csv → survey_analysis.json).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the filtered records to this CSV file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Pack the report, the filtered records and the hypothesis metrics into a zip archive
    #[arg(long, default_value = "false")]
    pub bundle: bool,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,
}

/// Inclusion lists per dimension (comma-separated). An empty list means no restriction.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Countries to include
    #[arg(long, value_delimiter = ',')]
    pub country: Vec<String>,

    /// Regions to include
    #[arg(long, value_delimiter = ',')]
    pub region: Vec<String>,

    /// Partner organizations to include
    #[arg(long, value_delimiter = ',')]
    pub partner: Vec<String>,

    /// Age brackets to include (18-54, 55-69, 70-85, 85+, unknown)
    #[arg(long, value_delimiter = ',')]
    pub age_range: Vec<String>,

    /// Genders to include
    #[arg(long, value_delimiter = ',')]
    pub gender: Vec<String>,

    /// New-client flag values to include
    #[arg(long, value_delimiter = ',')]
    pub new_client: Vec<String>,

    /// Programme duration buckets to include
    #[arg(long, value_delimiter = ',')]
    pub duration: Vec<String>,

    /// Victim status values to include
    #[arg(long, value_delimiter = ',')]
    pub victim_status: Vec<String>,
}

impl FilterArgs {
    /// Criteria built from the flags alone
    pub fn to_criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        for (dim, values) in [
            (Dimension::Country, &self.country),
            (Dimension::Region, &self.region),
            (Dimension::Partner, &self.partner),
            (Dimension::AgeRange, &self.age_range),
            (Dimension::Gender, &self.gender),
            (Dimension::NewClient, &self.new_client),
            (Dimension::Duration, &self.duration),
            (Dimension::VictimStatus, &self.victim_status),
        ] {
            let values: Vec<String> = values
                .iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect();
            if !values.is_empty() {
                criteria.set(dim, values);
            }
        }
        criteria
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the values available for each filter dimension
    Options {
        /// Input survey file (CSV)
        input: PathBuf,

        /// Only list this dimension (country, region, partner, age_range, gender,
        /// new_client, duration, victim_status)
        #[arg(long, value_parser = parse_dimension)]
        dimension: Option<Dimension>,

        /// Current selection, used to narrow region and partner options
        #[command(flatten)]
        filters: FilterArgs,
    },
}

impl Cli {
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref()
    }

    /// Criteria file (if any) overlaid with the command-line filters
    pub fn criteria(&self) -> Result<FilterCriteria> {
        let mut criteria = match &self.criteria {
            Some(path) => FilterCriteria::from_json_file(path)
                .with_context(|| format!("Failed to load criteria from {}", path.display()))?,
            None => FilterCriteria::new(),
        };
        criteria.merge(&self.filters.to_criteria());
        Ok(criteria)
    }

    /// Get the report path, deriving from input if not explicitly provided.
    pub fn report_path(&self) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        Some(
            self.output
                .clone()
                .unwrap_or_else(|| derived_path(input, "analysis", "json")),
        )
    }

    /// Zip bundle path, next to the input
    pub fn bundle_path(&self) -> Option<PathBuf> {
        self.input
            .as_ref()
            .map(|input| derived_path(input, "analysis", "zip"))
    }

    /// Filtered CSV path: the explicit export path, or a derived one when bundling
    pub fn export_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.export {
            return Some(path.clone());
        }
        if self.bundle {
            return self
                .input
                .as_ref()
                .map(|input| derived_path(input, "filtered", "csv"));
        }
        None
    }

    /// Hypothesis metrics CSV, only written as part of a bundle
    pub fn hypothesis_csv_path(&self) -> Option<PathBuf> {
        if !self.bundle {
            return None;
        }
        self.input
            .as_ref()
            .map(|input| derived_path(input, "hypotheses", "csv"))
    }
}

/// `<dir>/<stem>_<suffix>.<extension>` next to the input file
pub fn derived_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("survey");
    parent.join(format!("{}_{}.{}", stem, suffix, extension))
}

/// Validator for dimension keys
fn parse_dimension(s: &str) -> Result<Dimension, String> {
    Dimension::from_key(s.trim()).ok_or_else(|| {
        let known: Vec<&str> = Dimension::ALL.iter().map(|d| d.key()).collect();
        format!("unknown dimension '{}', expected one of: {}", s, known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let cli = Cli::parse_from(["agelens", "-i", "/data/survey.csv"]);
        assert_eq!(
            cli.report_path(),
            Some(PathBuf::from("/data/survey_analysis.json"))
        );
        assert_eq!(cli.export_path(), None);
        assert_eq!(cli.hypothesis_csv_path(), None);
    }

    #[test]
    fn test_bundle_paths() {
        let cli = Cli::parse_from(["agelens", "-i", "/data/survey.csv", "--bundle"]);
        assert_eq!(
            cli.export_path(),
            Some(PathBuf::from("/data/survey_filtered.csv"))
        );
        assert_eq!(
            cli.bundle_path(),
            Some(PathBuf::from("/data/survey_analysis.zip"))
        );
    }

    #[test]
    fn test_comma_separated_filters() {
        let cli = Cli::parse_from([
            "agelens",
            "-i",
            "s.csv",
            "--country",
            "Ukraine,Moldova",
            "--age-range",
            "85+",
        ]);
        let criteria = cli.criteria().unwrap();
        assert_eq!(
            criteria.get(Dimension::Country),
            ["Ukraine".to_string(), "Moldova".to_string()]
        );
        assert_eq!(criteria.get(Dimension::AgeRange), ["85+".to_string()]);
        assert!(criteria.get(Dimension::Gender).is_empty());
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("age_range"), Ok(Dimension::AgeRange));
        assert!(parse_dimension("planet").is_err());
    }
}

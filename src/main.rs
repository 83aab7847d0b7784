//! agelens: eldercare survey analytics CLI
//!
//! Loads a survey export, applies the filter criteria and writes the
//! analysis report.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use agelens::cli::{confirm_overwrite, Cli, Commands, FilterArgs};
use agelens::pipeline::{
    analyze, cascading_options, filter_table, load_survey, Dimension, SurveyTable,
};
use agelens::report::{
    export_analysis_report, export_hypothesis_csv, headlines, package_analysis_bundle,
    AnalysisReport, AnalysisSummary, TimingInfo,
};
use agelens::utils::{
    create_spinner, finish_with_success, finish_with_warning, init_tracing, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header,
    print_step_time, print_success, print_warning,
};

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if let Some(command) = &cli.command {
        return match command {
            Commands::Options {
                input,
                dimension,
                filters,
            } => run_options(input, *dimension, filters),
        };
    }

    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;
    let report_path = cli
        .report_path()
        .context("Could not derive the report path from the input file")?;
    let criteria = cli.criteria()?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(input, &criteria, &report_path);

    let run_start = Instant::now();
    let mut timing = TimingInfo::default();

    // Step 1: Load
    print_step_header(1, "Load Survey");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading survey...");
    let table = load_survey(input)
        .with_context(|| format!("Failed to load survey from {}", input.display()))?;
    finish_with_success(&spinner, "Survey loaded");

    let (rows, cols) = table.shape();
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", table.estimated_size_mb());

    let disabled = table.capabilities().disabled_features();
    if !disabled.is_empty() {
        print_count(
            "disabled feature(s)",
            disabled.len(),
            Some("(columns absent from the survey)"),
        );
    }
    timing.load_ms = step_start.elapsed().as_millis() as u64;
    print_step_time(step_start.elapsed());

    let mut summary = AnalysisSummary::new(table.height());
    summary.disabled_features = disabled.len();

    // Step 2: Filter
    print_step_header(2, "Apply Filters");
    let step_start = Instant::now();
    let filtered = filter_table(&table, &criteria)?;
    summary.set_filtered(filtered.height(), criteria.active_dimensions());
    if criteria.active_dimensions() == 0 {
        print_info("No filters given, analyzing every record");
    } else {
        print_count(
            "matching record(s)",
            filtered.height(),
            Some(&format!("of {}", table.height())),
        );
    }
    if filtered.is_empty() {
        print_warning("No records match the filters; aggregates will be empty");
    }
    timing.filter_ms = step_start.elapsed().as_millis() as u64;
    print_step_time(step_start.elapsed());

    // Step 3: Analyze
    print_step_header(3, "Analyze");
    let step_start = Instant::now();
    let spinner = create_spinner("Computing distributions and hypotheses...");
    let analysis = analyze(&filtered);
    let lines = headlines(&analysis);
    if filtered.is_empty() {
        finish_with_warning(&spinner, "Analysis complete on an empty selection");
    } else {
        finish_with_success(&spinner, "Analysis complete");
    }
    summary.set_hypotheses(&analysis.hypotheses);
    summary.headlines = lines.clone();
    timing.analysis_ms = step_start.elapsed().as_millis() as u64;
    print_step_time(step_start.elapsed());

    // Step 4: Save
    print_step_header(4, "Save Results");
    timing.total_ms = run_start.elapsed().as_millis() as u64;
    let report = AnalysisReport::new(input, &table, &filtered, &criteria, analysis, lines)
        .with_timing(timing);

    let mut written: Vec<PathBuf> = Vec::new();
    if write_if_confirmed(&report_path, cli.no_confirm, |path| {
        export_analysis_report(&report, path)
    })? {
        written.push(report_path.clone());
    }

    if let Some(export_path) = cli.export_path() {
        if write_if_confirmed(&export_path, cli.no_confirm, |path| {
            filtered
                .export_csv(path)
                .with_context(|| format!("Failed to export records to {}", path.display()))
        })? {
            written.push(export_path);
        }
    }

    if let Some(hypothesis_path) = cli.hypothesis_csv_path() {
        if write_if_confirmed(&hypothesis_path, cli.no_confirm, |path| {
            export_hypothesis_csv(&report.analysis.hypotheses, path)
        })? {
            written.push(hypothesis_path);
        }
    }

    if cli.bundle {
        let zip_path = cli
            .bundle_path()
            .context("Could not derive the bundle path from the input file")?;
        if written.is_empty() {
            print_warning("Nothing was written, skipping the bundle");
        } else if confirm_overwrite(&zip_path, cli.no_confirm)? {
            let spinner = create_spinner("Packaging bundle...");
            let files: Vec<&Path> = written.iter().map(PathBuf::as_path).collect();
            package_analysis_bundle(&files, &zip_path)?;
            finish_with_success(&spinner, &format!("Bundle saved to {}", zip_path.display()));
        } else {
            print_info("Bundle skipped");
        }
    }

    summary.display();
    print_completion();
    Ok(())
}

/// Write one output file unless the user declines to overwrite it
fn write_if_confirmed<F>(path: &Path, no_confirm: bool, write: F) -> Result<bool>
where
    F: FnOnce(&Path) -> Result<()>,
{
    if !confirm_overwrite(path, no_confirm)? {
        print_info(&format!("Skipped {}", path.display()));
        return Ok(false);
    }
    write(path)?;
    print_success(&format!("Saved {}", path.display()));
    Ok(true)
}

/// List the available filter values
fn run_options(input: &Path, dimension: Option<Dimension>, filters: &FilterArgs) -> Result<()> {
    let spinner = create_spinner("Reading survey...");
    let table: SurveyTable = load_survey(input)
        .with_context(|| format!("Failed to load survey from {}", input.display()))?;
    finish_with_success(&spinner, &format!("{} records", table.height()));

    let criteria = filters.to_criteria();
    let dimensions: Vec<Dimension> = match dimension {
        Some(d) => vec![d],
        None => Dimension::ALL.to_vec(),
    };

    for dim in dimensions {
        println!();
        println!("    {}", style(dim.key()).cyan().bold());
        if !table.capabilities().has_dimension(dim) {
            print_warning("column not present in this survey");
            continue;
        }
        for value in cascading_options(&table, dim, &criteria) {
            println!("      {} {}", style("•").dim(), value);
        }
    }
    println!();
    Ok(())
}

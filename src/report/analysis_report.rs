//! Analysis report export
//!
//! Serializes the analysis of a filtered table to JSON, writes a flat CSV of
//! the hypothesis metrics and optionally packs everything into a zip bundle.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{FilterCriteria, HypothesisReport, SurveyAnalysis, SurveyTable};

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub timestamp: String,
    pub agelens_version: String,
    pub input_file: String,
    pub total_records: usize,
    pub filtered_records: usize,
    pub criteria: FilterCriteria,
    pub disabled_features: BTreeMap<String, String>,
}

/// Timing information in milliseconds
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimingInfo {
    pub load_ms: u64,
    pub filter_ms: u64,
    pub analysis_ms: u64,
    pub total_ms: u64,
}

/// Complete analysis report
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub timing: TimingInfo,
    pub headlines: Vec<String>,
    pub analysis: SurveyAnalysis,
}

impl AnalysisReport {
    pub fn new(
        input_file: &Path,
        full: &SurveyTable,
        filtered: &SurveyTable,
        criteria: &FilterCriteria,
        analysis: SurveyAnalysis,
        headlines: Vec<String>,
    ) -> Self {
        let disabled_features = full
            .capabilities()
            .disabled_features()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                agelens_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: input_file.display().to_string(),
                total_records: full.height(),
                filtered_records: filtered.height(),
                criteria: criteria.clone(),
                disabled_features,
            },
            timing: TimingInfo::default(),
            headlines,
            analysis,
        }
    }

    pub fn with_timing(mut self, timing: TimingInfo) -> Self {
        self.timing = timing;
        self
    }
}

/// Export the analysis report to a JSON file
pub fn export_analysis_report(report: &AnalysisReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize analysis report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write analysis report to {}", output_path.display()))?;

    Ok(())
}

/// Flatten the hypothesis results into `hypothesis,verdict,metric,value` rows
pub fn hypothesis_rows(report: &HypothesisReport) -> Vec<[String; 4]> {
    let mut rows = Vec::new();
    let fmt = |v: Option<f64>| v.map(|x| format!("{:.4}", x)).unwrap_or_default();

    if let Some(h1) = &report.age_preference {
        let verdict = h1.verdict.summary();
        let mut push = |metric: String, value: String| {
            rows.push(["H1".to_string(), verdict.to_string(), metric, value]);
        };
        push("younger_physical".into(), fmt(h1.younger_physical));
        push("older_physical".into(), fmt(h1.older_physical));
        push("younger_psychosocial".into(), fmt(h1.younger_psychosocial));
        push("older_psychosocial".into(), fmt(h1.older_psychosocial));
        for group in &h1.groups {
            push(
                format!("physical_percent[{}]", group.age_range),
                fmt(Some(group.physical_percent)),
            );
            push(
                format!("psychosocial_percent[{}]", group.age_range),
                fmt(Some(group.psychosocial_percent)),
            );
            push(format!("clients[{}]", group.age_range), group.clients.to_string());
        }
    }

    if let Some(h2) = &report.new_client_satisfaction {
        let verdict = h2.verdict.summary();
        let mut push = |metric: &str, value: String| {
            rows.push(["H2".to_string(), verdict.to_string(), metric.to_string(), value]);
        };
        push("new_mean", fmt(Some(h2.new_clients.mean)));
        push("new_count", h2.new_clients.count.to_string());
        push("existing_mean", fmt(Some(h2.existing_clients.mean)));
        push("existing_count", h2.existing_clients.count.to_string());
    }

    if let Some(h3) = &report.duration_health {
        let verdict = h3.verdict.summary();
        let mut push = |metric: String, value: String| {
            rows.push(["H3".to_string(), verdict.to_string(), metric, value]);
        };
        push("correlation".into(), fmt(h3.correlation));
        push("paired_rows".into(), h3.paired_rows.to_string());
        for bucket in &h3.buckets {
            push(
                format!("mean_health_score[{}]", bucket.duration),
                fmt(Some(bucket.mean_health_score)),
            );
            push(format!("count[{}]", bucket.duration), bucket.count.to_string());
        }
    }

    rows
}

/// Export the hypothesis metrics as CSV
pub fn export_hypothesis_csv(report: &HypothesisReport, output_path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(output_path)
        .with_context(|| format!("Failed to create CSV file: {}", output_path.display()))?;

    writeln!(file, "hypothesis,verdict,metric,value")?;
    for row in hypothesis_rows(report) {
        let fields: Vec<String> = row.iter().map(|f| escape_csv_field(f)).collect();
        writeln!(file, "{}", fields.join(","))?;
    }

    Ok(())
}

/// Escape a field for CSV (handle commas and quotes)
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Package the report files into a zip archive and remove the originals
pub fn package_analysis_bundle(files: &[&Path], zip_path: &Path) -> Result<()> {
    use std::io::Read;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let zip_file = std::fs::File::create(zip_path)
        .with_context(|| format!("Failed to create zip file: {}", zip_path.display()))?;

    let mut zip = ZipWriter::new(zip_file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for path in files {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid file name: {}", path.display()))?;
        zip.start_file(filename, options)
            .with_context(|| format!("Failed to add {} to zip", filename))?;
        let mut content = Vec::new();
        std::fs::File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?
            .read_to_end(&mut content)?;
        zip.write_all(&content)?;
    }

    zip.finish().context("Failed to finalize zip file")?;

    for path in files {
        std::fs::remove_file(path).ok();
    }

    Ok(())
}

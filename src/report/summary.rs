//! Console summary of an analysis run

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::HypothesisReport;

/// Figures collected while the pipeline runs
#[derive(Debug, Default)]
pub struct AnalysisSummary {
    pub total_records: usize,
    pub filtered_records: usize,
    pub active_filters: usize,
    pub disabled_features: usize,
    pub headlines: Vec<String>,
    pub verdicts: Vec<(String, String)>,
}

impl AnalysisSummary {
    pub fn new(total_records: usize) -> Self {
        Self {
            total_records,
            filtered_records: total_records,
            ..Default::default()
        }
    }

    pub fn set_filtered(&mut self, filtered_records: usize, active_filters: usize) {
        self.filtered_records = filtered_records;
        self.active_filters = active_filters;
    }

    pub fn set_hypotheses(&mut self, report: &HypothesisReport) {
        self.verdicts = verdict_lines(report);
    }

    /// Share of records kept by the filter, in percent
    pub fn retained_pct(&self) -> f64 {
        if self.total_records > 0 {
            self.filtered_records as f64 / self.total_records as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("ANALYSIS SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Total Records"),
            Cell::new(self.total_records),
        ]);
        table.add_row(vec![
            Cell::new("🔎 Active Filters"),
            Cell::new(self.active_filters),
        ]);
        table.add_row(vec![
            Cell::new("✅ Filtered Records"),
            Cell::new(self.filtered_records)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        let retained = self.retained_pct();
        let color = if retained < 10.0 {
            Color::Red
        } else if retained < 50.0 {
            Color::Yellow
        } else {
            Color::Cyan
        };
        table.add_row(vec![
            Cell::new("📉 Retained"),
            Cell::new(format!("{:.1}%", retained)).fg(color),
        ]);
        table.add_row(vec![
            Cell::new("⚠️  Disabled Features"),
            Cell::new(self.disabled_features).fg(if self.disabled_features == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.verdicts.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("🧪").cyan(),
                style("HYPOTHESES").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            for (name, verdict) in &self.verdicts {
                let styled = if verdict.starts_with("supported") || verdict.starts_with("hypothesis")
                {
                    style(verdict.as_str()).green()
                } else if verdict.starts_with("partially") {
                    style(verdict.as_str()).yellow()
                } else {
                    style(verdict.as_str()).red()
                };
                println!("      {} {}: {}", style("•").dim(), name, styled);
            }
        }

        if !self.headlines.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("HIGHLIGHTS").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            for line in &self.headlines {
                println!("      {} {}", style("•").dim(), line);
            }
        }
    }
}

/// `(hypothesis, verdict)` pairs for the hypotheses that could be evaluated
pub fn verdict_lines(report: &HypothesisReport) -> Vec<(String, String)> {
    let mut lines = Vec::new();
    if let Some(h1) = &report.age_preference {
        lines.push(("Age vs. activity type".to_string(), h1.verdict.summary().to_string()));
    }
    if let Some(h2) = &report.new_client_satisfaction {
        lines.push(("New client satisfaction".to_string(), h2.verdict.summary().to_string()));
    }
    if let Some(h3) = &report.duration_health {
        lines.push(("Duration vs. health".to_string(), h3.verdict.summary().to_string()));
    }
    lines
}

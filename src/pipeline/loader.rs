//! Survey table loader
//!
//! Parses the raw CSV with every column as text, normalizes blank cells to
//! null, coerces indicator and rating columns to numbers and derives the
//! per-group composite counts.

use std::io::{Cursor, Write};
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info, warn};

use super::capabilities::Capabilities;
use super::columns::{IndicatorGroup, ScalarField};
use super::error::{SurveyError, SurveyResult};
use super::frame::{has_column, numeric_values};

/// An immutable loaded survey plus its capability descriptor
#[derive(Debug, Clone)]
pub struct SurveyTable {
    df: DataFrame,
    capabilities: Capabilities,
}

impl SurveyTable {
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.df.shape()
    }

    pub fn estimated_size_mb(&self) -> f64 {
        self.df.estimated_size() as f64 / (1024.0 * 1024.0)
    }

    /// A table over a row subset of this one. The schema is unchanged, so the
    /// capability descriptor carries over.
    pub(crate) fn with_rows(&self, df: DataFrame) -> Self {
        Self {
            df,
            capabilities: self.capabilities.clone(),
        }
    }

    /// Serialize the table back to CSV
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> SurveyResult<()> {
        let mut df = self.df.clone();
        CsvWriter::new(writer).include_header(true).finish(&mut df)?;
        Ok(())
    }

    /// Write the table to a CSV file
    pub fn export_csv(&self, path: &Path) -> SurveyResult<()> {
        let mut file = std::fs::File::create(path).map_err(|source| SurveyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_csv(&mut file)
    }
}

/// Load a survey from a file. Only CSV is supported.
pub fn load_survey(path: &Path) -> SurveyResult<SurveyTable> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension != "csv" {
        return Err(SurveyError::UnsupportedFormat { extension });
    }

    let bytes = std::fs::read(path).map_err(|source| SurveyError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), bytes = bytes.len(), "loading survey");
    load_survey_from_bytes(bytes)
}

/// Load a survey from in-memory CSV bytes
pub fn load_survey_from_bytes(bytes: Vec<u8>) -> SurveyResult<SurveyTable> {
    let df = read_csv_text(bytes)?;
    prepare_survey(df)
}

/// Read CSV with every column typed as String so coercion stays under our control
fn read_csv_text(bytes: Vec<u8>) -> SurveyResult<DataFrame> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(SurveyError::EmptySchema);
    }

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| SurveyError::Malformed {
            message: e.to_string(),
        })
}

/// Normalize and enrich an already parsed table.
///
/// Steps, in order:
/// 1. Blank text cells become null
/// 2. Indicator columns become Float64 holding 0, 1 or null
/// 3. Rating columns become Float64
/// 4. Composite counts are added for every complete indicator group
pub fn prepare_survey(mut df: DataFrame) -> SurveyResult<SurveyTable> {
    if df.width() == 0 {
        return Err(SurveyError::EmptySchema);
    }

    normalize_blank_cells(&mut df)?;
    coerce_indicator_columns(&mut df)?;
    coerce_rating_columns(&mut df)?;

    let capabilities = Capabilities::detect(&df);
    add_composite_counts(&mut df, &capabilities)?;

    for (feature, reason) in capabilities.disabled_features() {
        warn!(feature, reason, "feature disabled");
    }
    info!(rows = df.height(), columns = df.width(), "survey loaded");

    Ok(SurveyTable { df, capabilities })
}

fn normalize_blank_cells(df: &mut DataFrame) -> SurveyResult<()> {
    let text_columns: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype() == &DataType::String)
        .map(|c| c.name().clone())
        .collect();

    for name in text_columns {
        let column = df.column(name.as_str())?;
        let ca = column.str()?;
        if !ca.into_iter().any(|v| matches!(v, Some(s) if s.trim().is_empty())) {
            continue;
        }
        let values: Vec<Option<String>> = ca
            .into_iter()
            .map(|v| v.filter(|s| !s.trim().is_empty()).map(str::to_string))
            .collect();
        df.with_column(Column::new(name, values))?;
    }
    Ok(())
}

fn coerce_indicator_columns(df: &mut DataFrame) -> SurveyResult<()> {
    for name in IndicatorGroup::all_columns() {
        let Some(raw) = numeric_values(df, name) else {
            continue;
        };
        let present = df.column(name)?.len() - df.column(name)?.null_count();

        let values: Vec<Option<f64>> = raw
            .into_iter()
            .map(|v| v.filter(|x| *x == 0.0 || *x == 1.0))
            .collect();

        let valid = values.iter().filter(|v| v.is_some()).count();
        if valid < present {
            warn!(
                column = name,
                malformed = present - valid,
                "non-binary indicator values treated as missing"
            );
        }

        df.with_column(Column::new(name.into(), values))?;
    }
    Ok(())
}

fn coerce_rating_columns(df: &mut DataFrame) -> SurveyResult<()> {
    for field in ScalarField::ALL.into_iter().filter(|f| f.is_rating()) {
        let name = field.column();
        if let Some(values) = numeric_values(df, name) {
            df.with_column(Column::new(name.into(), values))?;
        }
    }
    Ok(())
}

fn add_composite_counts(df: &mut DataFrame, capabilities: &Capabilities) -> SurveyResult<()> {
    for group in IndicatorGroup::ALL {
        if !capabilities.group(group).composite {
            continue;
        }
        let mut counts = vec![0u32; df.height()];
        for name in group.columns() {
            if !has_column(df, name) {
                continue;
            }
            let ca = df.column(name)?.f64()?.clone();
            for (count, value) in counts.iter_mut().zip(ca.into_iter()) {
                if value == Some(1.0) {
                    *count += 1;
                }
            }
        }
        debug!(column = group.composite_column(), "derived composite count");
        df.with_column(Column::new(group.composite_column().into(), counts))?;
    }
    Ok(())
}

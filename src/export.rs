//! Tabular export for downstream collaborators (visualization, risk dashboards)
//!
//! Flattens an assessment into one row per depth. Gaps stay gaps: a `None`
//! renders as an empty CSV field and a JSON `null`, never as zero.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{DepthSeries, LogCurve, ValidationError};
use crate::uncertainty::ProbabilisticAssessment;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// ============================================================================
// Row Types
// ============================================================================

/// One flattened depth row. Pressure columns carry the P50 of the ppg
/// envelope — the single-value view a dashboard plots by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Depth")]
    pub depth: f64,

    #[serde(rename = "PorePressure")]
    pub pore_pressure_ppg: Option<f64>,

    #[serde(rename = "FractureGradient")]
    pub fracture_gradient_ppg: Option<f64>,

    #[serde(rename = "Overburden")]
    pub overburden_psi: Option<f64>,
}

/// Export provenance for downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub well_name: String,
    pub generated_at: DateTime<Utc>,
    pub trials: usize,
}

/// A complete export: provenance plus per-depth rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportTable {
    pub metadata: ExportMetadata,
    pub rows: Vec<ExportRow>,
}

// ============================================================================
// Builders / Writers
// ============================================================================

/// Flatten an assessment into per-depth rows.
///
/// # Errors
/// `LengthMismatch` if the assessment profiles or the overburden curve are
/// not aligned with `depths`.
pub fn build_rows(
    depths: &DepthSeries,
    assessment: &ProbabilisticAssessment,
    obg_psi: &LogCurve,
) -> Result<Vec<ExportRow>, ValidationError> {
    assessment
        .pp_ppg
        .ensure_aligned(depths, "pore pressure envelope")?;
    assessment
        .fg_ppg
        .ensure_aligned(depths, "fracture gradient envelope")?;
    obg_psi.ensure_aligned(depths, "overburden curve")?;

    Ok((0..depths.len())
        .map(|i| ExportRow {
            depth: depths.get(i).unwrap_or_default(),
            pore_pressure_ppg: assessment.pp_ppg.p50[i],
            fracture_gradient_ppg: assessment.fg_ppg.p50[i],
            overburden_psi: obg_psi.get(i),
        })
        .collect())
}

/// Write rows as CSV with a header. `None` fields render empty.
pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Render rows as a CSV string.
pub fn to_csv_string(rows: &[ExportRow]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Render a full table (metadata + rows) as pretty JSON.
pub fn to_json(table: &ExportTable) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(table)?)
}

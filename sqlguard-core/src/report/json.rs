//! Machine-readable report rendering.

use crate::errors::AnalysisError;

use super::AnalysisReport;

/// Pretty-printed JSON mirroring the data model, issues in discovery order.
pub fn render(report: &AnalysisReport) -> Result<Vec<u8>, AnalysisError> {
    Ok(serde_json::to_vec_pretty(report)?)
}

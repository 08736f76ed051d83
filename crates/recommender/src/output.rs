//! Writing pipeline results to disk.

use std::fs;
use std::path::Path;

use study_plan::format_recommendations;
use tracing::info;

use crate::pipeline::{AnalysisResults, PipelineError};

pub const ANALYSIS_FILE: &str = "analysis_results.json";
pub const RECOMMENDATIONS_FILE: &str = "recommendations.txt";

/// Writes [`ANALYSIS_FILE`] and [`RECOMMENDATIONS_FILE`] into `output_dir`, creating it.
pub fn save_results(
    results: &AnalysisResults,
    output_dir: impl AsRef<Path>,
) -> Result<(), PipelineError> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let json = serde_json::to_string_pretty(results)?;
    fs::write(output_dir.join(ANALYSIS_FILE), json)?;
    fs::write(
        output_dir.join(RECOMMENDATIONS_FILE),
        format_recommendations(&results.recommendations),
    )?;

    info!("Results saved to {}", output_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_results_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("processed");

        save_results(&AnalysisResults::default(), &out).unwrap();

        let json = fs::read_to_string(out.join(ANALYSIS_FILE)).unwrap();
        let parsed: AnalysisResults = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, AnalysisResults::default());
        assert!(!json.contains("\"engine\""));

        let text = fs::read_to_string(out.join(RECOMMENDATIONS_FILE)).unwrap();
        assert_eq!(text, study_plan::NO_RECOMMENDATIONS);
    }
}

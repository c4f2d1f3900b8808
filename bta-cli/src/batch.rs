//! Batch analysis of recording files
//!
//! Each file is analysed independently. A file that cannot be analysed is
//! logged and listed in the report; the batch carries on with the next one.

use std::path::{Path, PathBuf};

use bta_common::{AnalysisParameters, Recording};
use tracing::{error, info, warn};

use crate::error::CliResult;
use crate::export;
use crate::summary::{BatchReport, FailedFile, RecordingSummary};

/// Where trimmed copies go
#[derive(Debug, Clone, PartialEq)]
pub struct TrimExport {
    pub dir: PathBuf,
    /// Samples kept either side of the shot
    pub radius: usize,
}

/// Runs the detectors over a list of recording files
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    params: AnalysisParameters,
    trim: Option<TrimExport>,
}

impl BatchProcessor {
    pub fn new(params: AnalysisParameters) -> Self {
        Self { params, trim: None }
    }

    /// Also write a trimmed copy of every analysed recording
    pub fn with_trim_export(mut self, trim: TrimExport) -> Self {
        self.trim = Some(trim);
        self
    }

    /// Analyse one file
    pub fn process_file(&self, path: &Path) -> CliResult<RecordingSummary> {
        let recording = Recording::from_file_with(path, &self.params)?;
        let summary = RecordingSummary::from_recording(&recording);

        info!(
            recording = %summary.name,
            shot_index = summary.shot.point.index,
            confidence = %summary.shot.confidence,
            hig_confidence = %summary.hig_shot.confidence,
            "Recording analysed"
        );

        if let Some(trim) = &self.trim {
            // Export is best-effort; the analysis result stands
            if let Err(e) = export::write_trimmed(&recording, &trim.dir, trim.radius) {
                warn!(recording = %summary.name, "Trimmed copy failed: {}", e);
            }
        }

        Ok(summary)
    }

    /// Analyse every file, collecting failures instead of stopping
    pub fn process(&self, files: &[PathBuf]) -> BatchReport {
        let mut recordings = Vec::with_capacity(files.len());
        let mut failures = Vec::new();

        for path in files {
            match self.process_file(path) {
                Ok(summary) => recordings.push(summary),
                Err(e) => {
                    error!(file = %path.display(), "Analysis failed: {}", e);
                    failures.push(FailedFile {
                        file: path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            analysed = recordings.len(),
            failed = failures.len(),
            "Batch complete"
        );
        BatchReport::new(recordings, failures)
    }
}

/// Simulated analysis pipeline
///
/// The "AI" step is an explicit finite-state sequence: a fixed list
/// of status stages advanced one per timer tick, then a single
/// finalization step that scores every file and partitions the batch.
/// The shell owns the timer (one tick ≈ 1.4 s) and cancels the run by
/// dropping the pipeline when the user leaves the screen. There is no
/// real concurrency here, only staged delay.

use std::path::PathBuf;
use std::time::Duration;

use super::bucketing::rebucket;
use super::data::{ImageRecord, Partition};
use super::score::ScoreSource;
use crate::error::CullError;

/// Status messages shown while "analysis" runs, in order.
pub const STAGES: [&str; 5] = [
    "Uploading images securely…",
    "Detecting sharpness and focus…",
    "Analyzing exposure and clarity…",
    "Grouping best shots…",
    "Finalizing results…",
];

/// Cadence of stage transitions.
pub const STAGE_INTERVAL: Duration = Duration::from_millis(1400);

/// Upload limits, enforced before a batch is accepted.
pub const MAX_FILES: usize = 20;
pub const MAX_TOTAL_BYTES: u64 = 10 * 1024 * 1024;

const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

/// Validate a candidate upload batch.
///
/// `total_bytes` is summed by the caller (it already has the file
/// metadata in hand). On failure the previous selection must be left
/// untouched; only a notice is shown.
pub fn validate_selection(files: &[PathBuf], total_bytes: u64) -> Result<(), CullError> {
    if files.is_empty() {
        return Err(CullError::precondition("No images selected"));
    }

    if files.len() > MAX_FILES {
        return Err(CullError::precondition(format!(
            "Maximum {MAX_FILES} images allowed"
        )));
    }

    if total_bytes > MAX_TOTAL_BYTES {
        return Err(CullError::precondition(format!(
            "Total size must be under {} MB",
            MAX_TOTAL_BYTES / (1024 * 1024)
        )));
    }

    let all_images = files.iter().all(|path| {
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                IMAGE_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    });
    if !all_images {
        return Err(CullError::precondition("Only image files are supported"));
    }

    Ok(())
}

/// Result of one timer tick.
pub enum StageAdvance {
    /// Still staging; show this status message
    InProgress(&'static str),
    /// Scoring done; the snapshot is ready to persist and display
    Finished(Partition),
}

/// One in-flight analysis run.
///
/// Dropped (never explicitly cancelled) when the user navigates away.
pub struct AnalysisPipeline {
    files: Vec<PathBuf>,
    threshold: u8,
    stage: usize,
}

impl AnalysisPipeline {
    pub fn new(files: Vec<PathBuf>, threshold: u8) -> Self {
        AnalysisPipeline {
            files,
            threshold,
            stage: 0,
        }
    }

    /// Message for the stage currently on screen.
    pub fn status(&self) -> &'static str {
        STAGES[self.stage.min(STAGES.len() - 1)]
    }

    /// Advance one stage. The tick that steps past the last status
    /// message performs the actual scoring and hands back the
    /// finished snapshot; the caller is expected to drop the pipeline
    /// at that point.
    pub fn advance(&mut self, source: &mut dyn ScoreSource) -> StageAdvance {
        self.stage += 1;

        if self.stage < STAGES.len() {
            return StageAdvance::InProgress(STAGES[self.stage]);
        }

        let records = self.files.iter().map(|file| {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.to_string_lossy().into_owned());
            ImageRecord::new(file.to_string_lossy().into_owned(), name, source.score(file))
        });

        let results = rebucket(records.collect::<Vec<_>>(), self.threshold);
        println!(
            "✅ Analysis complete: {} sharp, {} blurry (threshold {})",
            results.sharp.len(),
            results.blurry.len(),
            self.threshold
        );

        StageAdvance::Finished(results)
    }
}

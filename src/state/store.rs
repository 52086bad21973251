/// Result store
///
/// Owns the canonical culling session state: the original snapshot
/// (source of truth), the derived current view, the selection set,
/// the active threshold and filters, plus the derived stats and the
/// flat-list navigator. All state is encapsulated here and the
/// session storage is injected, so nothing reads from ambient scope
/// and the whole store runs headless in tests.
///
/// Consistency model: every mutation funnels through
/// `notify_changed()`, which wholesale-regenerates the current view
/// from (original snapshot × threshold × filters) and then rebuilds
/// stats and the flat list. Nothing is patched incrementally, so the
/// view can never drift from the snapshot. A future incremental
/// renderer only has to replace that one boundary.

use std::collections::HashSet;

use super::bucketing::{filter, FilterCriteria, LabelFilter};
use super::data::{Bucket, ImageRecord, Label, Partition};
use super::navigator::Navigator;
use super::session::{demo_results, SessionStorage, DEFAULT_THRESHOLD};
use super::stats::Stats;
use crate::error::CullError;

/// Which records a download action covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadSet {
    All,
    Sharp,
    Blurry,
    Selected,
}

pub struct ResultStore {
    session: Box<dyn SessionStorage>,
    /// Source of truth. Mutated by scoring, manual moves, and
    /// annotation edits; only ever *read* by re-thresholding and
    /// filtering.
    original: Partition,
    /// Derived view, regenerated wholesale on every mutation
    current: Partition,
    threshold: u8,
    min_rating: u8,
    label_filter: LabelFilter,
    /// Source references chosen for batch actions. Stale references
    /// (no longer in the data) are ignored at use sites, not purged.
    selected: HashSet<String>,
    stats: Stats,
    navigator: Navigator,
    /// True when running on the built-in demo snapshot
    demo_mode: bool,
}

impl ResultStore {
    /// Restore the previous session, falling back to the demo
    /// snapshot when nothing usable is stored. Never fails: storage
    /// problems are logged and absorbed here.
    pub fn restore(session: Box<dyn SessionStorage>) -> Self {
        let (original, demo_mode) = match session.load_results() {
            Ok(results) => (results, false),
            Err(err) => {
                eprintln!("⚠️  No stored results ({err}). Using demo data.");
                (demo_results(), true)
            }
        };
        let threshold = session.load_threshold().unwrap_or(DEFAULT_THRESHOLD);

        let mut store = ResultStore {
            session,
            original,
            current: Partition::default(),
            threshold,
            min_rating: 0,
            label_filter: LabelFilter::Any,
            selected: HashSet::new(),
            stats: Stats::default(),
            navigator: Navigator::default(),
            demo_mode,
        };
        store.notify_changed();
        store
    }

    /// Adopt a freshly scored snapshot (end of an analysis run):
    /// replaces the original, resets selection and filters, persists
    /// both the snapshot and the threshold that produced it.
    pub fn initialize(&mut self, snapshot: Partition, threshold: u8) {
        self.original = snapshot;
        self.threshold = threshold;
        self.min_rating = 0;
        self.label_filter = LabelFilter::Any;
        self.selected.clear();
        self.navigator.reset();
        self.demo_mode = false;

        self.persist_snapshot();
        self.persist_threshold();
        self.notify_changed();
    }

    // ---- derived state ----------------------------------------

    /// The partition every presentation component renders from.
    /// Never stale: regenerated by the mutation that preceded this
    /// call.
    pub fn current_view(&self) -> &Partition {
        &self.current
    }

    /// Canonical snapshot (read-only outside the store).
    pub fn original_snapshot(&self) -> &Partition {
        &self.original
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn min_rating(&self) -> u8 {
        self.min_rating
    }

    pub fn label_filter(&self) -> LabelFilter {
        self.label_filter
    }

    pub fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    // ---- threshold & filters ----------------------------------

    /// Re-bucket the original snapshot against a new threshold and
    /// remember it for the session.
    pub fn apply_threshold(&mut self, threshold: u8) {
        self.threshold = threshold.min(100);
        self.persist_threshold();
        self.notify_changed();
    }

    pub fn set_min_rating(&mut self, min_rating: u8) {
        self.min_rating = min_rating.min(5);
        self.notify_changed();
    }

    pub fn set_label_filter(&mut self, label_filter: LabelFilter) {
        self.label_filter = label_filter;
        self.notify_changed();
    }

    // ---- snapshot mutations -----------------------------------

    /// Manually move a record to a bucket of the *original* snapshot,
    /// so the move survives view regeneration. No-op for an unknown
    /// reference.
    ///
    /// Note the view derivation still buckets by score, so the next
    /// threshold application overwrites the visible effect of the
    /// move; the snapshot is truth, the score rules the view.
    pub fn move_image(&mut self, src: &str, target: Bucket) {
        if let Some(record) = self.original.remove(src) {
            println!("📦 Moved {} to {}", record.name, target.as_str());
            self.original.push(target, record);
            self.persist_snapshot();
            self.notify_changed();
        }
    }

    /// Set the star rating (0-5) on the canonical record, so it
    /// propagates through every future view derivation.
    pub fn set_rating(&mut self, src: &str, rating: u8) {
        if let Some(record) = self.original.find_mut(src) {
            record.rating = rating.min(5);
            self.persist_snapshot();
            self.notify_changed();
        }
    }

    pub fn set_label(&mut self, src: &str, label: Label) {
        if let Some(record) = self.original.find_mut(src) {
            record.label = label;
            self.persist_snapshot();
            self.notify_changed();
        }
    }

    /// Advance the label through none → green → yellow → red → none.
    pub fn cycle_label(&mut self, src: &str) {
        if let Some(record) = self.original.find_mut(src) {
            record.label = record.label.cycled();
            self.persist_snapshot();
            self.notify_changed();
        }
    }

    // ---- selection --------------------------------------------

    /// Toggle a record in the selection set. Does not touch bucket
    /// membership or the snapshot.
    pub fn toggle_selection(&mut self, src: &str) {
        if !self.selected.remove(src) {
            self.selected.insert(src.to_string());
        }
        self.notify_changed();
    }

    pub fn is_selected(&self, src: &str) -> bool {
        self.selected.contains(src)
    }

    /// Selected records present in the current view, in flat order.
    /// Stale selection references simply drop out here.
    pub fn selected_records(&self) -> Vec<ImageRecord> {
        self.current
            .iter_all()
            .filter(|img| self.selected.contains(&img.src))
            .cloned()
            .collect()
    }

    /// The compare action needs exactly two visible selected records.
    pub fn compare_pair(&self) -> Result<(ImageRecord, ImageRecord), CullError> {
        match <[ImageRecord; 2]>::try_from(self.selected_records()) {
            Ok([first, second]) => Ok((first, second)),
            Err(_) => Err(CullError::precondition(
                "Select exactly 2 images to compare",
            )),
        }
    }

    /// Records covered by a download action. An empty *selection* is
    /// a precondition failure; an empty bucket is just an empty list
    /// (the caller no-ops).
    pub fn download_records(&self, set: DownloadSet) -> Result<Vec<ImageRecord>, CullError> {
        let records = match set {
            DownloadSet::All => self.current.iter_all().cloned().collect(),
            DownloadSet::Sharp => self.current.sharp.clone(),
            DownloadSet::Blurry => self.current.blurry.clone(),
            DownloadSet::Selected => {
                let selected = self.selected_records();
                if selected.is_empty() {
                    return Err(CullError::precondition("No images selected"));
                }
                selected
            }
        };
        Ok(records)
    }

    // ---- keyboard navigation ----------------------------------

    /// Advance focus along the flat list; returns the newly focused
    /// record for the lightbox. None when the list is empty.
    pub fn focus_next(&mut self) -> Option<ImageRecord> {
        let src = self.navigator.next()?.to_owned();
        self.current.find(&src).cloned()
    }

    pub fn focus_prev(&mut self) -> Option<ImageRecord> {
        let src = self.navigator.prev()?.to_owned();
        self.current.find(&src).cloned()
    }

    pub fn focused(&self) -> Option<&ImageRecord> {
        self.navigator.active_src().and_then(|src| self.current.find(src))
    }

    pub fn clear_focus(&mut self) {
        self.navigator.reset();
    }

    /// Convenience wrappers that act on the focused record. Focus is
    /// kept where the record survives the view regeneration (the
    /// navigator follows it by source reference).
    pub fn toggle_focused_selection(&mut self) {
        if let Some(src) = self.navigator.active_src().map(str::to_owned) {
            self.toggle_selection(&src);
        }
    }

    pub fn move_focused(&mut self, target: Bucket) {
        if let Some(src) = self.navigator.active_src().map(str::to_owned) {
            self.move_image(&src, target);
        }
    }

    pub fn rate_focused(&mut self, rating: u8) {
        if let Some(src) = self.navigator.active_src().map(str::to_owned) {
            self.set_rating(&src, rating);
        }
    }

    pub fn label_focused(&mut self, label: Label) {
        if let Some(src) = self.navigator.active_src().map(str::to_owned) {
            self.set_label(&src, label);
        }
    }

    // ---- refresh boundary -------------------------------------

    /// The single consistency boundary: derive the current view from
    /// the snapshot, then rebuild everything downstream of it.
    fn notify_changed(&mut self) {
        let criteria = FilterCriteria {
            min_rating: self.min_rating,
            label: self.label_filter,
            threshold: self.threshold,
        };
        self.current = filter(self.original.iter_all().cloned(), &criteria);
        self.stats = Stats::compute(&self.current, self.selected.len());
        self.navigator.rebuild(&self.current);
    }

    fn persist_snapshot(&self) {
        if let Err(err) = self.session.save_results(&self.original) {
            eprintln!("⚠️  Could not persist results: {err}");
        }
    }

    fn persist_threshold(&self) {
        if let Err(err) = self.session.save_threshold(self.threshold) {
            eprintln!("⚠️  Could not persist threshold: {err}");
        }
    }
}

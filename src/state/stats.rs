/// Derived statistics over the current view
///
/// Always recomputed as a fresh full pass after every store mutation.
/// No caching: collections stay in the tens of images, so a linear
/// walk per mutation is fine.

use super::data::Partition;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub sharp: usize,
    pub blurry: usize,
    pub selected: usize,
    /// Rounded mean score. None when the view is empty ("no data",
    /// rendered as a dash), never 0 and never NaN.
    pub average: Option<u32>,
}

impl Stats {
    pub fn compute(view: &Partition, selected: usize) -> Self {
        let total = view.len();

        let average = if total > 0 {
            let sum: u32 = view.iter_all().map(|img| u32::from(img.score)).sum();
            // Round half up, matching the original rounding
            Some((sum + total as u32 / 2) / total as u32)
        } else {
            None
        };

        Stats {
            total,
            sharp: view.sharp.len(),
            blurry: view.blurry.len(),
            selected,
            average,
        }
    }

    /// Summary line shown under the result grids.
    pub fn summary_counts(&self) -> String {
        format!(
            "{} images • {} sharp • {} blurry",
            self.total, self.sharp, self.blurry
        )
    }

    pub fn summary_average(&self) -> String {
        match self.average {
            Some(avg) => format!("Avg sharpness: {avg}"),
            None => "Avg sharpness: —".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::ImageRecord;

    #[test]
    fn test_empty_view_reports_no_data() {
        let stats = Stats::compute(&Partition::default(), 0);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average, None);
        assert_eq!(stats.summary_average(), "Avg sharpness: —");
    }

    #[test]
    fn test_single_record_average_is_its_score() {
        let view = Partition {
            sharp: vec![ImageRecord::new("a", "a", 80)],
            blurry: vec![],
        };
        let stats = Stats::compute(&view, 0);
        assert_eq!(stats.average, Some(80));
        assert_eq!(stats.summary_average(), "Avg sharpness: 80");
    }

    #[test]
    fn test_counts_and_rounding() {
        let view = Partition {
            sharp: vec![ImageRecord::new("a", "a", 90), ImageRecord::new("b", "b", 80)],
            blurry: vec![ImageRecord::new("c", "c", 15)],
        };
        let stats = Stats::compute(&view, 2);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.sharp, 2);
        assert_eq!(stats.blurry, 1);
        assert_eq!(stats.selected, 2);
        // (90 + 80 + 15) / 3 = 61.66… rounds to 62
        assert_eq!(stats.average, Some(62));
        assert_eq!(stats.summary_counts(), "3 images • 2 sharp • 1 blurry");
    }
}

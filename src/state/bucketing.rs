/// Re-bucketing and filter engines
///
/// Pure functions that derive a fresh `{sharp, blurry}` partition
/// from the full set of records. Both always walk the complete input
/// (never accumulate across calls), so reapplying the same threshold
/// or filter is idempotent by construction.

use super::data::{ImageRecord, Label, Partition};

/// Bucketing policy: ties go to sharp (inclusive lower bound).
pub fn is_sharp(score: u8, threshold: u8) -> bool {
    score >= threshold
}

/// Partition records by score against a threshold.
///
/// Deterministic and total: every record lands in exactly one bucket.
pub fn rebucket<I>(images: I, threshold: u8) -> Partition
where
    I: IntoIterator<Item = ImageRecord>,
{
    let mut partition = Partition::default();

    for image in images {
        if is_sharp(image.score, threshold) {
            partition.sharp.push(image);
        } else {
            partition.blurry.push(image);
        }
    }

    partition
}

/// Label constraint for the filter engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelFilter {
    /// No constraint ("all" in the UI)
    #[default]
    Any,
    /// Only records carrying exactly this label
    Only(Label),
}

impl LabelFilter {
    pub fn matches(self, label: Label) -> bool {
        match self {
            LabelFilter::Any => true,
            LabelFilter::Only(wanted) => label == wanted,
        }
    }
}

/// Composite view criteria: rating floor AND label match AND threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterCriteria {
    /// Records with `rating < min_rating` are excluded entirely
    pub min_rating: u8,
    /// Records not matching the constraint are excluded entirely
    pub label: LabelFilter,
    /// Surviving records are re-bucketed by this threshold
    pub threshold: u8,
}

/// Derive a filtered partition.
///
/// Exclusion runs first (rating floor, label match); survivors are
/// then bucketed by the same score/threshold rule as `rebucket`.
/// Either bucket may come out empty; that is a valid result.
pub fn filter<I>(images: I, criteria: &FilterCriteria) -> Partition
where
    I: IntoIterator<Item = ImageRecord>,
{
    let retained = images.into_iter().filter(|img| {
        img.rating >= criteria.min_rating && criteria.label.matches(img.label)
    });

    rebucket(retained, criteria.threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(src: &str, score: u8) -> ImageRecord {
        ImageRecord::new(src, src, score)
    }

    fn sample() -> Vec<ImageRecord> {
        vec![
            record("a", 10),
            record("b", 49),
            record("c", 50),
            record("d", 51),
            record("e", 100),
        ]
    }

    #[test]
    fn test_rebucket_ties_go_to_sharp() {
        let partition = rebucket(sample(), 50);

        let sharp: Vec<&str> = partition.sharp.iter().map(|i| i.src.as_str()).collect();
        let blurry: Vec<&str> = partition.blurry.iter().map(|i| i.src.as_str()).collect();
        assert_eq!(sharp, vec!["c", "d", "e"]);
        assert_eq!(blurry, vec!["a", "b"]);
    }

    #[test]
    fn test_rebucket_is_idempotent() {
        let once = rebucket(sample(), 42);
        let twice = rebucket(once.iter_all().cloned(), 42);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rebucket_every_record_in_exactly_one_bucket() {
        let input = sample();
        let partition = rebucket(input.clone(), 37);

        assert_eq!(partition.len(), input.len());
        for img in &input {
            let in_sharp = partition.sharp.iter().any(|i| i.src == img.src);
            let in_blurry = partition.blurry.iter().any(|i| i.src == img.src);
            assert!(in_sharp != in_blurry, "{} must be in exactly one bucket", img.src);
            assert_eq!(in_sharp, img.score >= 37);
        }
    }

    #[test]
    fn test_rebucket_extreme_thresholds() {
        let all_sharp = rebucket(sample(), 0);
        assert_eq!(all_sharp.sharp.len(), 5);
        assert!(all_sharp.blurry.is_empty());

        // 100 is still reachable: a perfect score ties into sharp
        let top_only = rebucket(sample(), 100);
        assert_eq!(top_only.sharp.len(), 1);
        assert_eq!(top_only.blurry.len(), 4);
    }

    #[test]
    fn test_single_low_score_stays_blurry_until_threshold_drops() {
        let input = vec![record("a", 10)];

        let high = rebucket(input.clone(), 50);
        assert!(high.sharp.is_empty());
        assert_eq!(high.blurry.len(), 1);

        let low = rebucket(input, 5);
        assert_eq!(low.sharp.len(), 1);
        assert!(low.blurry.is_empty());
    }

    #[test]
    fn test_filter_rating_floor() {
        let mut images = sample();
        images[2].rating = 3; // "c"
        images[4].rating = 5; // "e"

        let criteria = FilterCriteria {
            min_rating: 3,
            label: LabelFilter::Any,
            threshold: 50,
        };
        let partition = filter(images, &criteria);

        let kept: Vec<&str> = partition.iter_all().map(|i| i.src.as_str()).collect();
        assert_eq!(kept, vec!["c", "e"]);
    }

    #[test]
    fn test_filter_label_match() {
        let mut images = sample();
        images[0].label = Label::Green; // "a", score 10
        images[3].label = Label::Green; // "d", score 51
        images[4].label = Label::Red; // "e"

        let criteria = FilterCriteria {
            min_rating: 0,
            label: LabelFilter::Only(Label::Green),
            threshold: 50,
        };
        let partition = filter(images, &criteria);

        let sharp: Vec<&str> = partition.sharp.iter().map(|i| i.src.as_str()).collect();
        let blurry: Vec<&str> = partition.blurry.iter().map(|i| i.src.as_str()).collect();
        assert_eq!(sharp, vec!["d"]);
        assert_eq!(blurry, vec!["a"]);
    }

    #[test]
    fn test_filter_composition_is_strict_intersection() {
        let mut images = sample();
        images[0].rating = 5; // "a": rated but unlabeled
        images[3].label = Label::Green; // "d": labeled but unrated
        images[4].rating = 4; // "e": both
        images[4].label = Label::Green;

        let criteria = FilterCriteria {
            min_rating: 3,
            label: LabelFilter::Only(Label::Green),
            threshold: 50,
        };
        let partition = filter(images, &criteria);

        let kept: Vec<&str> = partition.iter_all().map(|i| i.src.as_str()).collect();
        assert_eq!(kept, vec!["e"]);
    }

    #[test]
    fn test_filter_may_empty_both_buckets() {
        let criteria = FilterCriteria {
            min_rating: 5,
            label: LabelFilter::Any,
            threshold: 50,
        };
        let partition = filter(sample(), &criteria);
        assert!(partition.is_empty());
    }
}

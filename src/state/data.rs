/// Shared data structures for the culling workflow
///
/// These structs represent the data model that flows between
/// the session storage, the result store, and the UI layer.

use serde::{Deserialize, Serialize};

/// Color label used for manual culling categorization.
///
/// Independent of sharp/blurry bucketing. Cycles
/// none → green → yellow → red → none on the secondary gesture.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    #[default]
    None,
    Green,
    Yellow,
    Red,
}

impl Label {
    /// Next label in the cycle order.
    pub fn cycled(self) -> Self {
        match self {
            Label::None => Label::Green,
            Label::Green => Label::Yellow,
            Label::Yellow => Label::Red,
            Label::Red => Label::None,
        }
    }

    /// Display name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::None => "none",
            Label::Green => "green",
            Label::Yellow => "yellow",
            Label::Red => "red",
        }
    }
}

/// Older sessions stored the label as `null` rather than "none".
fn label_or_none<'de, D>(deserializer: D) -> Result<Label, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Label>::deserialize(deserializer)?.unwrap_or_default())
}

/// Represents a single analyzed image.
///
/// `src` is the only stable identity: it must be unique across the
/// whole snapshot, and every lookup resolves through it. Bucket
/// membership is derived state, never identity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ImageRecord {
    /// Opaque source reference (file path or URL), unique per session
    pub src: String,
    /// Display name (e.g. "DSC_0001.jpg")
    pub name: String,
    /// Sharpness score 0-100, immutable once assigned
    pub score: u8,
    /// Star rating 0-5, mutable
    #[serde(default)]
    pub rating: u8,
    /// Color label, mutable
    #[serde(default, deserialize_with = "label_or_none")]
    pub label: Label,
}

impl ImageRecord {
    pub fn new(src: impl Into<String>, name: impl Into<String>, score: u8) -> Self {
        ImageRecord {
            src: src.into(),
            name: name.into(),
            score,
            rating: 0,
            label: Label::None,
        }
    }
}

/// One of the two named partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Sharp,
    Blurry,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Sharp => "sharp",
            Bucket::Blurry => "blurry",
        }
    }
}

/// A two-bucket partition of image records.
///
/// Used both for the original snapshot (source of truth) and for the
/// derived current view.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub sharp: Vec<ImageRecord>,
    pub blurry: Vec<ImageRecord>,
}

impl Partition {
    /// Iterate sharp then blurry, the canonical flat order.
    pub fn iter_all(&self) -> impl Iterator<Item = &ImageRecord> {
        self.sharp.iter().chain(self.blurry.iter())
    }

    pub fn len(&self) -> usize {
        self.sharp.len() + self.blurry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sharp.is_empty() && self.blurry.is_empty()
    }

    /// Find the canonical record for a source reference.
    pub fn find(&self, src: &str) -> Option<&ImageRecord> {
        self.iter_all().find(|img| img.src == src)
    }

    /// Mutable lookup by source reference, searching both buckets.
    pub fn find_mut(&mut self, src: &str) -> Option<&mut ImageRecord> {
        self.sharp
            .iter_mut()
            .chain(self.blurry.iter_mut())
            .find(|img| img.src == src)
    }

    /// Remove a record from whichever bucket holds it.
    /// No-op (returns None) if the reference is absent.
    pub fn remove(&mut self, src: &str) -> Option<ImageRecord> {
        if let Some(pos) = self.sharp.iter().position(|img| img.src == src) {
            return Some(self.sharp.remove(pos));
        }
        if let Some(pos) = self.blurry.iter().position(|img| img.src == src) {
            return Some(self.blurry.remove(pos));
        }
        None
    }

    /// Append a record to the named bucket.
    pub fn push(&mut self, bucket: Bucket, record: ImageRecord) {
        match bucket {
            Bucket::Sharp => self.sharp.push(record),
            Bucket::Blurry => self.blurry.push(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_cycle_wraps() {
        let mut label = Label::None;
        label = label.cycled();
        assert_eq!(label, Label::Green);
        label = label.cycled();
        assert_eq!(label, Label::Yellow);
        label = label.cycled();
        assert_eq!(label, Label::Red);
        label = label.cycled();
        assert_eq!(label, Label::None);
    }

    #[test]
    fn test_record_defaults_for_missing_annotations() {
        // Records persisted before ratings/labels existed
        let json = r#"{"src":"a.jpg","name":"a.jpg","score":72}"#;
        let record: ImageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.rating, 0);
        assert_eq!(record.label, Label::None);
    }

    #[test]
    fn test_record_tolerates_null_label() {
        let json = r#"{"src":"a.jpg","name":"a.jpg","score":72,"rating":3,"label":null}"#;
        let record: ImageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.rating, 3);
        assert_eq!(record.label, Label::None);
    }

    #[test]
    fn test_record_round_trips_annotations() {
        let mut record = ImageRecord::new("b.jpg", "b.jpg", 55);
        record.rating = 4;
        record.label = Label::Yellow;

        let json = serde_json::to_string(&record).unwrap();
        let restored: ImageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, restored);
        assert!(json.contains(r#""label":"yellow""#));
    }

    #[test]
    fn test_partition_remove_is_idempotent() {
        let mut partition = Partition {
            sharp: vec![ImageRecord::new("a", "a", 90)],
            blurry: vec![ImageRecord::new("b", "b", 10)],
        };

        assert!(partition.remove("a").is_some());
        assert!(partition.remove("a").is_none());
        assert_eq!(partition.len(), 1);
    }

    #[test]
    fn test_flat_iteration_order_is_sharp_then_blurry() {
        let partition = Partition {
            sharp: vec![ImageRecord::new("s1", "s1", 90), ImageRecord::new("s2", "s2", 80)],
            blurry: vec![ImageRecord::new("b1", "b1", 10)],
        };

        let order: Vec<&str> = partition.iter_all().map(|img| img.src.as_str()).collect();
        assert_eq!(order, vec!["s1", "s2", "b1"]);
    }
}

//! # Domain Model: Diary Entries
//!
//! A [`DiaryEntry`] is one tasting record: an optional photo, a handful of free-text fields
//! and a rating. Every user-editable field is optional; an entry with nothing but a date is
//! still valid (the presentation layer shows a placeholder for a missing photo).
//!
//! ## Identity
//!
//! Entries are identified by an [`EntryId`] generated at creation. The `date` is assigned
//! once, at creation, and is only used for display and ordering, so two entries created in
//! the same clock tick no longer collide.
//!
//! ## Free-form Fields
//!
//! `abv`, `aged` and `rating_score` are kept as text exactly as the user typed them.
//! [`DiaryEntry::rating`] offers a parsed view of the score for callers that want a number.
//!
//! ## Images
//!
//! `image` holds JPEG bytes that the caller has already orientation-corrected and resized.
//! The store keeps them verbatim.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The user-editable part of an entry.
///
/// Update always rewrites the whole set; there is no partial-field update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryFields {
    pub name: Option<String>,
    pub distillery: Option<String>,
    pub abv: Option<String>,
    pub aged: Option<String>,
    pub cask: Option<String>,
    pub nose: Option<String>,
    pub palate: Option<String>,
    pub finish: Option<String>,
    pub rating_score: Option<String>,
    /// JPEG-encoded photo.
    #[serde(skip)]
    pub image: Option<Vec<u8>>,
}

impl EntryFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_distillery(mut self, distillery: impl Into<String>) -> Self {
        self.distillery = Some(distillery.into());
        self
    }

    pub fn with_abv(mut self, abv: impl Into<String>) -> Self {
        self.abv = Some(abv.into());
        self
    }

    pub fn with_aged(mut self, aged: impl Into<String>) -> Self {
        self.aged = Some(aged.into());
        self
    }

    pub fn with_cask(mut self, cask: impl Into<String>) -> Self {
        self.cask = Some(cask.into());
        self
    }

    /// Sets the three tasting notes at once.
    pub fn with_notes(
        mut self,
        nose: impl Into<String>,
        palate: impl Into<String>,
        finish: impl Into<String>,
    ) -> Self {
        self.nose = Some(nose.into());
        self.palate = Some(palate.into());
        self.finish = Some(finish.into());
        self
    }

    pub fn with_rating(mut self, rating_score: impl Into<String>) -> Self {
        self.rating_score = Some(rating_score.into());
        self
    }

    pub fn with_image(mut self, jpeg: Vec<u8>) -> Self {
        self.image = Some(jpeg);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiaryEntry {
    pub id: EntryId,
    /// Set once at creation.
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: EntryFields,
}

impl DiaryEntry {
    pub fn new(fields: EntryFields) -> Self {
        Self {
            id: EntryId::new(),
            date: Utc::now(),
            fields,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.name.as_deref()
    }

    pub fn has_image(&self) -> bool {
        self.fields.image.is_some()
    }

    /// The entry date as `yyyy-MM-dd`, the way list cells show it.
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// The rating as a number, if the stored text is one.
    pub fn rating(&self) -> Option<u8> {
        self.fields
            .rating_score
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
    }

    /// Cache key under which this entry's decoded photo is kept.
    pub fn image_key(&self) -> String {
        image_key(&self.id)
    }
}

pub fn image_key(id: &EntryId) -> String {
    format!("entry:{}", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_entry_gets_fresh_identity() {
        let a = DiaryEntry::new(EntryFields::new().with_name("Lagavulin"));
        let b = DiaryEntry::new(EntryFields::new().with_name("Lagavulin"));
        assert_ne!(a.id, b.id);
        assert_eq!(a.name(), Some("Lagavulin"));
    }

    #[test]
    fn date_string_uses_iso_day() {
        let mut entry = DiaryEntry::new(EntryFields::default());
        entry.date = Utc.with_ymd_and_hms(2023, 7, 20, 23, 59, 0).unwrap();
        assert_eq!(entry.date_string(), "2023-07-20");
    }

    #[test]
    fn rating_parses_numeric_text() {
        let entry = DiaryEntry::new(EntryFields::new().with_rating(" 4 "));
        assert_eq!(entry.rating(), Some(4));

        let entry = DiaryEntry::new(EntryFields::new().with_rating("great"));
        assert_eq!(entry.rating(), None);

        let entry = DiaryEntry::new(EntryFields::default());
        assert_eq!(entry.rating(), None);
    }

    #[test]
    fn builder_sets_notes() {
        let fields = EntryFields::new().with_notes("peat", "smoke", "long");
        assert_eq!(fields.nose.as_deref(), Some("peat"));
        assert_eq!(fields.palate.as_deref(), Some("smoke"));
        assert_eq!(fields.finish.as_deref(), Some("long"));
        assert!(fields.image.is_none());
    }

    #[test]
    fn image_key_is_stable_per_id() {
        let entry = DiaryEntry::new(EntryFields::default());
        assert_eq!(entry.image_key(), format!("entry:{}", entry.id));
    }
}

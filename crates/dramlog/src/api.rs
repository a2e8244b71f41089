//! # API Facade
//!
//! [`DiaryApi`] is the single entry point presentation code uses. It is a **thin facade**
//! over the command layer, plus the little state a diary screen needs.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Dispatches** to the command for each operation and relays its outcome unchanged
//! - **Owns the active view** (see [`crate::view`]): full list vs. latest search results
//! - **Batches deletes** of selected entries into independent single deletes
//! - **Feeds the image cache**: decodes photos on create/update, evicts on delete, serves
//!   thumbnails, and fetches remote or on-disk images
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Presentation**: Returns entries and messages, never strings for display
//! - **Reach global state**: The store is passed in, so tests can use an in-memory or
//!   temporary store
//!
//! ## Batch Delete Semantics
//!
//! Each selected entry is deleted on its own; there is no transaction around the batch.
//! An entry leaves the in-memory lists only after its own delete succeeded, so after a
//! partial failure the view and the store agree on every entry: the deleted ones are gone
//! from both, the failed ones remain in both.
//!
//! ## Generic Over RecordStore
//!
//! - Production: `DiaryApi<SqliteStore>` (via [`DiaryApi::open`])
//! - Testing: `DiaryApi<InMemoryStore>`

use crate::cache::{CachedImage, ImageCache};
use crate::commands::{self, CmdMessage, CmdResult};
use crate::config::DiaryConfig;
use crate::error::Result;
use crate::model::{image_key, DiaryEntry, EntryFields, EntryId};
use crate::store::sqlite::SqliteStore;
use crate::store::RecordStore;
use crate::view::{ActiveView, ViewMode};
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

pub struct DiaryApi<S: RecordStore> {
    store: S,
    images: Arc<ImageCache>,
    view: ActiveView,
}

impl DiaryApi<SqliteStore> {
    /// Opens the diary database and image cache described by `config`.
    pub fn open(config: &DiaryConfig) -> Result<Self> {
        let store = SqliteStore::open(config.database_path()?)?;
        let images = ImageCache::new(config.image_cache_capacity, config.fetch_timeout())?;
        Ok(Self::new(store, Arc::new(images)))
    }
}

impl<S: RecordStore> DiaryApi<S> {
    pub fn new(store: S, images: Arc<ImageCache>) -> Self {
        Self {
            store,
            images,
            view: ActiveView::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn images(&self) -> Arc<ImageCache> {
        Arc::clone(&self.images)
    }

    pub fn mode(&self) -> ViewMode {
        self.view.mode()
    }

    /// The list currently on screen.
    pub fn active_entries(&self) -> &[DiaryEntry] {
        self.view.entries()
    }

    /// Reloads the full diary and returns it.
    pub fn list(&mut self) -> CmdResult {
        let result = commands::list::run(&self.store);
        self.view.set_all(result.listed_entries.clone());
        result
    }

    /// Searches by name. The view switches to the results only if the term is non-empty
    /// and something matched.
    pub fn search(&mut self, term: &str) -> CmdResult {
        let result = commands::search::run(&self.store, term);
        self.view.set_search(term, result.listed_entries.clone());
        result
    }

    /// Leaves search mode and reloads the full diary.
    pub fn cancel_search(&mut self) -> CmdResult {
        self.view.cancel_search();
        self.list()
    }

    pub fn create(&mut self, fields: EntryFields) -> Result<CmdResult> {
        let mut result = commands::create::run(&mut self.store, fields)?;
        let warnings: Vec<_> = result
            .affected_entries
            .iter()
            .filter_map(|entry| self.cache_entry_image(entry))
            .collect();
        result.messages.extend(warnings);
        self.refresh();
        Ok(result)
    }

    pub fn update(&mut self, entry: &DiaryEntry) -> Result<CmdResult> {
        let mut result = commands::update::run(&mut self.store, entry)?;
        if let Some(message) = self.cache_entry_image(entry) {
            result.add_message(message);
        }
        self.refresh();
        Ok(result)
    }

    pub fn delete(&mut self, id: &EntryId) -> Result<CmdResult> {
        let result = commands::delete::run(&mut self.store, id)?;
        self.images.remove(&image_key(id));
        self.view.remove(id);
        Ok(result)
    }

    /// Deletes several entries one by one. Failures are reported as error messages and
    /// leave those entries in place; the rest are still deleted.
    pub fn delete_entries(&mut self, ids: &[EntryId]) -> CmdResult {
        let mut result = CmdResult::default();
        for id in ids {
            match self.delete(id) {
                Ok(deleted) => result.merge(deleted),
                Err(e) => {
                    warn!(id = %id, error = %e, "batch delete skipped entry");
                    result.add_message(CmdMessage::error(format!(
                        "Could not delete entry {}: {}",
                        id, e
                    )));
                }
            }
        }
        info!(
            requested = ids.len(),
            deleted = result.affected_entries.len(),
            "batch delete finished"
        );
        result
    }

    /// Deletes the entries at the given positions of the active view.
    /// Positions past the end of the list are ignored.
    pub fn delete_selected(&mut self, positions: &[usize]) -> CmdResult {
        let ids = self.view.resolve_positions(positions);
        self.delete_entries(&ids)
    }

    /// The decoded photo of an entry, decoded and cached on first use.
    pub fn thumbnail(&self, entry: &DiaryEntry) -> Option<CachedImage> {
        let key = entry.image_key();
        if let Some(image) = self.images.get(&key) {
            return Some(image);
        }
        let bytes = entry.fields.image.as_deref()?;
        match self.images.decode_and_put(key, bytes) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(id = %entry.id, error = %e, "could not decode entry image");
                None
            }
        }
    }

    /// Loads an image from a URL or path through the cache.
    ///
    /// The returned future owns a handle to the cache and nothing else, so it can be
    /// handed to `tokio::spawn` whatever the store type.
    pub fn fetch_image(
        &self,
        source: &str,
    ) -> impl Future<Output = Option<CachedImage>> + Send + 'static {
        let images = Arc::clone(&self.images);
        let source = source.to_string();
        async move { images.fetch(&source).await }
    }

    /// Keeps the cache in step with an entry's stored photo.
    fn cache_entry_image(&self, entry: &DiaryEntry) -> Option<CmdMessage> {
        let key = entry.image_key();
        match entry.fields.image.as_deref() {
            Some(bytes) => match self.images.decode_and_put(key.clone(), bytes) {
                Ok(_) => None,
                Err(e) => {
                    self.images.remove(&key);
                    warn!(id = %entry.id, error = %e, "stored image could not be decoded");
                    Some(CmdMessage::warning(format!(
                        "Image saved but could not be decoded: {}",
                        e
                    )))
                }
            },
            None => {
                self.images.remove(&key);
                None
            }
        }
    }

    /// Reloads the full list and re-runs the active search, if any.
    fn refresh(&mut self) {
        let all = commands::list::run(&self.store).listed_entries;
        self.view.set_all(all);
        if let Some(term) = self.view.search_term().map(str::to_string) {
            let results = commands::search::run(&self.store, &term).listed_entries;
            self.view.set_search(&term, results);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiaryError;
    use crate::store::memory::InMemoryStore;
    use crate::test_utils::{jpeg_bytes, test_cache};

    fn make_api() -> DiaryApi<InMemoryStore> {
        DiaryApi::new(InMemoryStore::new(), test_cache())
    }

    fn names(entries: &[DiaryEntry]) -> Vec<&str> {
        entries.iter().filter_map(|e| e.name()).collect()
    }

    fn create_named(api: &mut DiaryApi<InMemoryStore>, name: &str) -> DiaryEntry {
        api.create(EntryFields::new().with_name(name))
            .unwrap()
            .affected_entries
            .remove(0)
    }

    #[test]
    fn create_refreshes_active_view() {
        let mut api = make_api();
        create_named(&mut api, "Lagavulin");
        create_named(&mut api, "Glenlivet");

        assert_eq!(api.mode(), ViewMode::Browsing);
        assert_eq!(names(api.active_entries()), vec!["Glenlivet", "Lagavulin"]);
    }

    #[test]
    fn search_switches_view_only_with_results() {
        let mut api = make_api();
        create_named(&mut api, "Lagavulin");
        create_named(&mut api, "Laphroaig");
        create_named(&mut api, "Glenlivet");

        api.search("la");
        assert_eq!(api.mode(), ViewMode::Searching);
        assert_eq!(names(api.active_entries()), vec!["Laphroaig", "Lagavulin"]);

        let result = api.search("bowmore");
        assert!(result.listed_entries.is_empty());
        assert_eq!(api.mode(), ViewMode::Browsing);
        assert_eq!(api.active_entries().len(), 3);

        api.search("la");
        api.cancel_search();
        assert_eq!(api.mode(), ViewMode::Browsing);
        assert_eq!(api.active_entries().len(), 3);
    }

    #[test]
    fn update_keeps_search_results_current() {
        let mut api = make_api();
        let lagavulin = create_named(&mut api, "Lagavulin");
        create_named(&mut api, "Laphroaig");
        api.search("la");

        let mut renamed = lagavulin.clone();
        renamed.fields.name = Some("Talisker".into());
        api.update(&renamed).unwrap();

        assert_eq!(names(api.active_entries()), vec!["Laphroaig"]);
    }

    #[test]
    fn update_missing_entry_relays_not_found() {
        let mut api = make_api();
        let stray = DiaryEntry::new(EntryFields::new().with_name("Stray"));
        assert!(matches!(
            api.update(&stray),
            Err(DiaryError::EntryNotFound(_))
        ));
    }

    #[test]
    fn delete_selected_uses_visible_positions() {
        let mut api = make_api();
        create_named(&mut api, "Lagavulin");
        create_named(&mut api, "Laphroaig");
        create_named(&mut api, "Glenlivet");
        api.search("la");

        // Searching shows [Laphroaig, Lagavulin]; position 1 is Lagavulin.
        let result = api.delete_selected(&[1, 5]);
        assert_eq!(names(&result.affected_entries), vec!["Lagavulin"]);
        assert_eq!(names(api.active_entries()), vec!["Laphroaig"]);

        api.cancel_search();
        assert_eq!(names(api.active_entries()), vec!["Glenlivet", "Laphroaig"]);
    }

    #[test]
    fn batch_delete_partial_failure_keeps_view_and_store_consistent() {
        let mut api = make_api();
        let a = create_named(&mut api, "A");
        create_named(&mut api, "B");
        let c = create_named(&mut api, "C");
        api.store_mut().fail_writes_for(c.id);

        let result = api.delete_entries(&[a.id, c.id]);

        assert_eq!(names(&result.affected_entries), vec!["A"]);
        assert!(result.has_errors());
        assert_eq!(names(api.active_entries()), vec!["C", "B"]);
        assert_eq!(names(&api.store().list_all().unwrap()), vec!["C", "B"]);
    }

    #[test]
    fn create_with_image_populates_cache() {
        let mut api = make_api();
        let entry = api
            .create(EntryFields::new().with_name("Photo").with_image(jpeg_bytes()))
            .unwrap()
            .affected_entries
            .remove(0);

        assert!(api.images().contains(&entry.image_key()));
        let thumb = api.thumbnail(&entry).unwrap();
        assert_eq!(thumb.width(), 4);
    }

    #[test]
    fn undecodable_image_is_saved_with_warning() {
        let mut api = make_api();
        let result = api
            .create(EntryFields::new().with_name("Broken").with_image(vec![1, 2, 3]))
            .unwrap();
        let entry = &result.affected_entries[0];

        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("could not be decoded")));
        assert!(api.thumbnail(entry).is_none());
        assert_eq!(
            api.store().get(&entry.id).unwrap().fields.image,
            Some(vec![1, 2, 3])
        );
    }

    #[test]
    fn removing_image_on_update_evicts_cache() {
        let mut api = make_api();
        let mut entry = api
            .create(EntryFields::new().with_image(jpeg_bytes()))
            .unwrap()
            .affected_entries
            .remove(0);

        entry.fields.image = None;
        api.update(&entry).unwrap();
        assert!(!api.images().contains(&entry.image_key()));
        assert!(api.thumbnail(&entry).is_none());
    }

    #[test]
    fn delete_evicts_cached_image() {
        let mut api = make_api();
        let entry = api
            .create(EntryFields::new().with_image(jpeg_bytes()))
            .unwrap()
            .affected_entries
            .remove(0);

        api.delete(&entry.id).unwrap();
        assert!(!api.images().contains(&entry.image_key()));
        assert!(api.active_entries().is_empty());
    }

    #[test]
    fn unavailable_store_lists_empty() {
        let mut api = make_api();
        create_named(&mut api, "A");
        api.store_mut().set_unavailable(true);

        let result = api.list();
        assert!(result.listed_entries.is_empty());
        assert!(api.active_entries().is_empty());
        assert!(matches!(
            api.create(EntryFields::default()),
            Err(DiaryError::InvalidContext)
        ));
    }
}

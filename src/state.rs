//! Ephemeral session state: the debounced query pipeline, facet
//! selections, and the selected record. Everything derived (results,
//! map points) is recomputed on demand from the immutable store.

use std::time::{Duration, Instant};

use crate::constants::DEBOUNCE;
use crate::filter::{countries_available, FacetSelection};
use crate::index::SearchIndex;
use crate::normalize::{tokenize, Band, Status};
use crate::record::{RadarRecord, RecordStore};
use crate::search::search_tokens;
use crate::url;
use crate::view::{map_point, MapPoint};

/// Single-slot cancelable timer for coalescing keystrokes.
///
/// Each submit replaces the pending value and restarts the deadline, so
/// at most one commit is outstanding. Driven by explicit instants; the
/// event loop polls it (or sleeps until [`deadline`](Self::deadline)).
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer { delay, pending: None }
    }

    /// Schedule `value` to commit after the delay, cancelling any
    /// earlier pending value.
    pub fn submit(&mut self, value: &str, now: Instant) {
        self.pending = Some((value.to_string(), now + self.delay));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    /// Take the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, due)) if *due <= now => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE)
    }
}

/// Session state over one loaded catalog.
pub struct AppState {
    store: RecordStore,
    index: SearchIndex,
    countries: Vec<String>,
    raw_input: String,
    committed_query: String,
    tokens: Vec<String>,
    selection: FacetSelection,
    selected_id: Option<String>,
    debouncer: Debouncer,
}

impl AppState {
    /// Build session state: index and country list are derived exactly
    /// once here and never mutated afterwards.
    pub fn new(store: RecordStore) -> Self {
        let index = SearchIndex::build(store.records());
        let countries = countries_available(store.records());
        AppState {
            store,
            index,
            countries,
            raw_input: String::new(),
            committed_query: String::new(),
            tokens: Vec::new(),
            selection: FacetSelection::default(),
            selected_id: None,
            debouncer: Debouncer::default(),
        }
    }

    /// Like [`new`](Self::new), seeding the query from a location's
    /// query string. The seed commits immediately, bypassing the
    /// debounce.
    pub fn with_initial_query(store: RecordStore, query_string: &str) -> Self {
        let mut state = Self::new(store);
        if let Some(q) = url::initial_query(query_string) {
            state.set_query(&q);
        }
        state
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Static per-session country choices.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn committed_query(&self) -> &str {
        &self.committed_query
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// First committed token, used for display highlighting.
    pub fn first_token(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    pub fn selection(&self) -> &FacetSelection {
        &self.selection
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Keystroke entry point: updates the raw buffer synchronously and
    /// (re)starts the debounce timer.
    pub fn on_input(&mut self, text: &str, now: Instant) {
        self.raw_input = text.to_string();
        self.debouncer.submit(text, now);
    }

    /// Commit the pending input if its debounce deadline has passed.
    /// Returns whether a commit happened.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(value) => {
                self.commit(&value);
                true
            }
            None => false,
        }
    }

    /// Next instant at which [`tick`](Self::tick) would do work.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Commit a query immediately (URL seeding, programmatic callers).
    pub fn set_query(&mut self, query: &str) {
        self.raw_input = query.to_string();
        self.debouncer.cancel();
        self.commit(query);
    }

    fn commit(&mut self, query: &str) {
        self.committed_query = query.to_string();
        self.tokens = tokenize(query);
    }

    /// The escape gesture: drop the query and the selection highlight.
    /// Facet selections survive.
    pub fn clear(&mut self) {
        self.raw_input.clear();
        self.committed_query.clear();
        self.tokens.clear();
        self.selected_id = None;
        self.debouncer.cancel();
    }

    pub fn toggle_band(&mut self, band: Band) {
        if !self.selection.bands.remove(&band) {
            self.selection.bands.insert(band);
        }
    }

    pub fn toggle_status(&mut self, status: Status) {
        if !self.selection.statuses.remove(&status) {
            self.selection.statuses.insert(status);
        }
    }

    /// Exclusive country choice; `None` restores "All".
    pub fn set_country(&mut self, country: Option<String>) {
        self.selection.country = country;
    }

    pub fn clear_facets(&mut self) {
        self.selection = FacetSelection::default();
    }

    /// The full pipeline: committed query against the index, then the
    /// facet chain. Store order throughout.
    pub fn results(&self) -> Vec<&RadarRecord> {
        let records = self.store.records();
        let matched: Vec<&RadarRecord> = search_tokens(&self.tokens, &self.index, records.len())
            .into_iter()
            .map(|i| &records[i as usize])
            .collect();
        self.selection.apply(matched)
    }

    /// Map points of the current results.
    pub fn map_points(&self) -> Vec<MapPoint> {
        self.results().into_iter().filter_map(map_point).collect()
    }

    /// Row-click / jump action: mark the record selected and hand back
    /// its map point when it has coordinates.
    pub fn select(&mut self, id: &str) -> Option<MapPoint> {
        let record = self.store.records().iter().find(|r| r.id == id)?;
        let point = map_point(record);
        self.selected_id = Some(record.id.clone());
        point
    }

    /// The enter gesture: select the first current result.
    pub fn select_first(&mut self) -> Option<MapPoint> {
        let id = self.results().first().map(|r| r.id.clone())?;
        self.select(&id)
    }

    /// Query string for the current location, with `q` synced to the
    /// committed query (replace semantics).
    pub fn sync_location(&self, current_query_string: &str) -> String {
        url::sync_query(current_query_string, &self.committed_query)
    }
}

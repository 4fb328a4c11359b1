//! In-memory marker collections, one per facility kind

use std::fmt;

use hashbrown::HashMap;
use log::{info, warn};
use serde::Serialize;

use super::records::{ParseReport, parse_facilities, rows_from_payload};
use super::source::FacilitySource;
use crate::proximity::{Nearest, find_nearest};
use crate::{Error, Facility, FacilityKind, GeoPoint};

type LoadedListener = Box<dyn Fn(&MarkerStore) + Send + Sync>;

/// Result of one fetch of every facility table
#[derive(Debug, Clone, Default)]
pub struct LoadedFacilities {
    pub reports: Vec<(FacilityKind, ParseReport)>,
    /// Kinds whose fetch failed entirely
    pub failed: Vec<FacilityKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub shelters: usize,
    pub fire_stations: usize,
    pub hospitals: usize,
    pub skipped: usize,
    pub failed: Vec<FacilityKind>,
}

/// Facilities grouped by kind.
///
/// Read synchronously once populated; a new load replaces the previous
/// collections wholesale (last fetch wins).
#[derive(Default)]
pub struct MarkerStore {
    facilities: HashMap<FacilityKind, Vec<Facility>>,
    listeners: Vec<LoadedListener>,
    loaded: bool,
}

impl fmt::Debug for MarkerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerStore")
            .field("facilities", &self.facilities)
            .field("listeners", &self.listeners.len())
            .field("loaded", &self.loaded)
            .finish()
    }
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an already populated store
    pub fn from_facilities(facilities: impl IntoIterator<Item = Facility>) -> Self {
        let mut store = Self::new();
        for facility in facilities {
            store
                .facilities
                .entry(facility.kind)
                .or_default()
                .push(facility);
        }
        store.loaded = true;
        store
    }

    pub fn get_facilities(&self, kind: FacilityKind) -> &[Facility] {
        self.facilities.get(&kind).map_or(&[], Vec::as_slice)
    }

    pub fn count(&self, kind: FacilityKind) -> usize {
        self.get_facilities(kind).len()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Registers a callback run after every completed load.
    ///
    /// If the store is already populated the callback also runs immediately.
    pub fn on_facilities_loaded<F>(&mut self, callback: F)
    where
        F: Fn(&MarkerStore) + Send + Sync + 'static,
    {
        if self.loaded {
            callback(self);
        }
        self.listeners.push(Box::new(callback));
    }

    /// Nearest facility of `kind` to `user`
    ///
    /// # Errors
    ///
    /// [`Error::EmptyCollection`] when no facility of that kind is loaded
    pub fn nearest(&self, kind: FacilityKind, user: GeoPoint) -> Result<Nearest<'_>, Error> {
        find_nearest(user, self.get_facilities(kind))
    }

    /// Sum of the known shelter capacities
    pub fn total_capacity(&self) -> u64 {
        self.get_facilities(FacilityKind::Shelter)
            .iter()
            .filter_map(Facility::capacity)
            .map(u64::from)
            .sum()
    }

    /// Replaces the collections with a fresh load and notifies listeners
    pub fn apply(&mut self, loaded: LoadedFacilities) -> LoadSummary {
        let mut summary = LoadSummary {
            failed: loaded.failed,
            ..LoadSummary::default()
        };

        self.facilities.clear();
        for (kind, report) in loaded.reports {
            summary.skipped += report.skipped;
            match kind {
                FacilityKind::Shelter => summary.shelters += report.facilities.len(),
                FacilityKind::FireStation => summary.fire_stations += report.facilities.len(),
                FacilityKind::Hospital => summary.hospitals += report.facilities.len(),
            }
            self.facilities
                .entry(kind)
                .or_default()
                .extend(report.facilities);
        }
        self.loaded = true;

        let store: &MarkerStore = self;
        for listener in &store.listeners {
            listener(store);
        }
        summary
    }

    /// Fetches every facility table from `source` and replaces the store contents
    pub async fn load<S: FacilitySource>(&mut self, source: &S) -> LoadSummary {
        let loaded = fetch_all(source).await;
        self.apply(loaded)
    }
}

/// Fetches and parses all facility kinds concurrently.
///
/// A kind whose fetch fails comes back empty and is listed in `failed`; the
/// other kinds are unaffected.
pub async fn fetch_all<S: FacilitySource>(source: &S) -> LoadedFacilities {
    let (shelters, fire_stations, hospitals) = tokio::join!(
        fetch_kind(source, FacilityKind::Shelter),
        fetch_kind(source, FacilityKind::FireStation),
        fetch_kind(source, FacilityKind::Hospital),
    );

    let mut loaded = LoadedFacilities::default();
    for (kind, result) in [
        (FacilityKind::Shelter, shelters),
        (FacilityKind::FireStation, fire_stations),
        (FacilityKind::Hospital, hospitals),
    ] {
        match result {
            Ok(report) => loaded.reports.push((kind, report)),
            Err(e) => {
                warn!("Failed to load {kind} data: {e}");
                loaded.failed.push(kind);
                loaded.reports.push((kind, ParseReport::default()));
            }
        }
    }
    loaded
}

async fn fetch_kind<S: FacilitySource>(
    source: &S,
    kind: FacilityKind,
) -> Result<ParseReport, Error> {
    let payload = source.fetch(kind).await?;
    let rows = rows_from_payload(payload)?;
    let report = parse_facilities(kind, &rows);
    info!(
        "Loaded {} {kind} records ({} skipped)",
        report.facilities.len(),
        report.skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::{Value, json};

    use super::*;

    struct FakeSource {
        fail_hospitals: bool,
    }

    impl FacilitySource for FakeSource {
        async fn fetch(&self, kind: FacilityKind) -> Result<Value, Error> {
            match kind {
                FacilityKind::Shelter => Ok(json!([
                    { "id": 1, "adresse": "Rådhusgata 2", "plasser": "100", "geom": { "type": "Point", "coordinates": [8.02, 58.17] } },
                    { "id": 2, "adresse": "Kirkegata 1", "plasser": "250", "geom": { "type": "Point", "coordinates": [7.90, 58.10] } },
                    { "id": 3, "adresse": "Uten geometri", "plasser": "999", "geom": null }
                ])),
                FacilityKind::FireStation => Ok(json!([
                    { "sted": "Lund", "geom": { "type": "Point", "coordinates": [442349.014, 6448055.949] } }
                ])),
                FacilityKind::Hospital if self.fail_hospitals => Err(Error::HttpStatus(503)),
                FacilityKind::Hospital => Ok(json!([])),
            }
        }
    }

    #[tokio::test]
    async fn load_populates_every_kind_and_reports_skips() {
        let mut store = MarkerStore::new();
        let summary = store.load(&FakeSource { fail_hospitals: false }).await;

        assert_eq!(summary.shelters, 2);
        assert_eq!(summary.fire_stations, 1);
        assert_eq!(summary.hospitals, 0);
        assert_eq!(summary.skipped, 1);
        assert!(summary.failed.is_empty());
        assert_eq!(store.total_capacity(), 350);
        assert!(store.is_loaded());
    }

    #[tokio::test]
    async fn failed_kind_does_not_abort_the_others() {
        let mut store = MarkerStore::new();
        let summary = store.load(&FakeSource { fail_hospitals: true }).await;

        assert_eq!(summary.failed, vec![FacilityKind::Hospital]);
        assert_eq!(store.count(FacilityKind::Shelter), 2);
        assert!(store.get_facilities(FacilityKind::Hospital).is_empty());
        let user = GeoPoint::new(58.1599, 8.0182).unwrap();
        assert!(matches!(
            store.nearest(FacilityKind::Hospital, user),
            Err(Error::EmptyCollection)
        ));
    }

    #[tokio::test]
    async fn listeners_fire_after_each_load() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut store = MarkerStore::new();
        let counter = Arc::clone(&calls);
        store.on_facilities_loaded(move |s| {
            assert!(s.is_loaded());
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let source = FakeSource { fail_hospitals: false };
        store.load(&source).await;
        store.load(&source).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // Reload replaces rather than appends
        assert_eq!(store.count(FacilityKind::Shelter), 2);
    }

    #[test]
    fn late_listener_runs_immediately() {
        let loc = GeoPoint::new(58.0, 8.0).unwrap();
        let mut store =
            MarkerStore::from_facilities([Facility::new("h", FacilityKind::Hospital, loc)]);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        store.on_facilities_loaded(move |s| {
            assert_eq!(s.count(FacilityKind::Hospital), 1);
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn nearest_uses_the_requested_layer() {
        let store = MarkerStore::from_facilities([
            Facility::new("s", FacilityKind::Shelter, GeoPoint::new(58.10, 7.90).unwrap()),
            Facility::new("f", FacilityKind::FireStation, GeoPoint::new(58.17, 8.02).unwrap()),
        ]);
        let user = GeoPoint::new(58.1599, 8.0182).unwrap();
        assert_eq!(store.nearest(FacilityKind::Shelter, user).unwrap().facility.id, "s");
        assert_eq!(store.nearest(FacilityKind::FireStation, user).unwrap().facility.id, "f");
    }
}

// Catalog store: the single source of truth for tour data. Tours arrive
// via bulk load and are mutated through exactly one path, `commit_review`.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::filter::{self, TourFilter};

// A user review attached to a tour. Immutable once created apart from the
// like/dislike counters, which are driven from outside this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub rating: u8,
    pub content: String,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub dislikes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub country: String,
    pub duration: String,
    pub traveller_limit: u32,
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Default)]
struct StoreState {
    tours: Vec<Tour>,
    filter: TourFilter,
    search: String,
    filtered: Vec<Tour>,
}

impl StoreState {
    // Invariant: `filtered` is never stale relative to tours/filter/search.
    fn recompute(&mut self) {
        self.filtered = filter::filtered_view(&self.tours, &self.filter, &self.search);
    }
}

#[derive(Default)]
pub struct CatalogStore {
    state: RwLock<StoreState>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Bulk population; replaces any previous catalog and resets nothing else,
    // so an active filter keeps applying to the new data.
    pub fn load_tours(&self, tours: Vec<Tour>) {
        let mut state = self.state.write();
        tracing::debug!("loading {} tours into the catalog", tours.len());
        state.tours = tours;
        state.recompute();
    }

    pub fn tours(&self) -> Vec<Tour> {
        self.state.read().tours.clone()
    }

    pub fn tour(&self, tour_id: &str) -> Option<Tour> {
        self.state
            .read()
            .tours
            .iter()
            .find(|tour| tour.id == tour_id)
            .cloned()
    }

    pub fn set_filter(&self, filter: TourFilter) {
        let mut state = self.state.write();
        state.filter = filter;
        state.recompute();
    }

    pub fn set_search(&self, search: impl Into<String>) {
        let mut state = self.state.write();
        state.search = search.into();
        state.recompute();
    }

    pub fn reset_filters(&self) {
        let mut state = self.state.write();
        state.filter = TourFilter::None;
        state.search.clear();
        state.recompute();
    }

    pub fn filter(&self) -> TourFilter {
        self.state.read().filter.clone()
    }

    pub fn search(&self) -> String {
        self.state.read().search.clone()
    }

    pub fn filtered_view(&self) -> Vec<Tour> {
        self.state.read().filtered.clone()
    }

    // Options for the filter dropdowns, projected from the full catalog.

    pub fn price_options(&self) -> Vec<f64> {
        filter::distinct_prices(&self.state.read().tours)
    }

    pub fn country_options(&self) -> Vec<String> {
        filter::distinct_countries(&self.state.read().tours)
    }

    pub fn duration_options(&self) -> Vec<String> {
        filter::distinct_durations(&self.state.read().tours)
    }

    // The single authorized write path. Appends a committed review to its
    // tour and recomputes the view under the same lock, so the commit is
    // visible to every subsequent read. Returns false if the tour is not
    // in the catalog.
    pub fn commit_review(&self, tour_id: &str, review: Review) -> bool {
        let mut state = self.state.write();
        let Some(tour) = state.tours.iter_mut().find(|tour| tour.id == tour_id) else {
            tracing::warn!("review commit for unknown tour {}", tour_id);
            return false;
        };
        tour.reviews.push(review);
        tracing::info!("review committed for tour {}", tour_id);
        state.recompute();
        true
    }
}

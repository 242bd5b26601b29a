// Pure catalog filtering. Everything in this module is a deterministic
// function of its inputs and is cheap enough to rerun on every state change.

use crate::catalog::Tour;

// The structured filter is a tagged union: picking one dimension replaces
// whatever was selected before, so two dimensions can never be active at
// the same time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TourFilter {
    #[default]
    None,
    Price(f64),
    Location(String),
    Duration(String),
}

impl TourFilter {
    pub fn matches(&self, tour: &Tour) -> bool {
        match self {
            TourFilter::None => true,
            TourFilter::Price(price) => tour.price == *price,
            TourFilter::Location(country) => tour.country == *country,
            TourFilter::Duration(duration) => tour.duration == *duration,
        }
    }
}

// Computes the filtered view of the catalog. Non-empty search text always
// wins over the structured filter; title matching is case-insensitive.
// An empty result is a valid outcome, not an error.
pub fn filtered_view(tours: &[Tour], filter: &TourFilter, search: &str) -> Vec<Tour> {
    let search = search.trim();
    if !search.is_empty() {
        let needle = search.to_lowercase();
        return tours
            .iter()
            .filter(|tour| tour.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
    }

    match filter {
        TourFilter::None => tours.to_vec(),
        _ => tours
            .iter()
            .filter(|tour| filter.matches(tour))
            .cloned()
            .collect(),
    }
}

// Distinct-value projections used to populate the filter dropdowns.
// First-occurrence order; callers only rely on the set of values.

pub fn distinct_prices(tours: &[Tour]) -> Vec<f64> {
    let mut prices = Vec::new();
    for tour in tours {
        if !prices.contains(&tour.price) {
            prices.push(tour.price);
        }
    }
    prices
}

pub fn distinct_countries(tours: &[Tour]) -> Vec<String> {
    let mut countries = Vec::new();
    for tour in tours {
        if !countries.contains(&tour.country) {
            countries.push(tour.country.clone());
        }
    }
    countries
}

pub fn distinct_durations(tours: &[Tour]) -> Vec<String> {
    let mut durations = Vec::new();
    for tour in tours {
        if !durations.contains(&tour.duration) {
            durations.push(tour.duration.clone());
        }
    }
    durations
}

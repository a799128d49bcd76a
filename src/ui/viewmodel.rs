//! View model types representing renderable list state.
//!
//! View models are computed from a [`ListState`] snapshot and contain no
//! business logic, only display-ready data: formatted labels, indicator flags
//! and the character positions of the name filter match in each row.
//!
//! # Example
//!
//! ```rust
//! use dishlist::app::ListState;
//! use dishlist::ui::ListViewModel;
//! use dishlist::Query;
//!
//! let vm = ListViewModel::from_state(&ListState::new(Query::default()));
//! assert!(vm.rows.is_empty());
//! assert!(vm.empty_state.is_some());
//! ```

use crate::app::ListState;
use crate::domain::{Dish, DishId};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Complete view model for the dish list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListViewModel {
    pub rows: Vec<DishRow>,

    /// Full-screen spinner.
    ///
    /// Only shown while nothing is listed yet; fetches for later pages keep
    /// the current rows visible instead.
    pub show_loading_indicator: bool,

    /// Pull-to-refresh indicator.
    pub refreshing: bool,

    /// Whether the random button does anything.
    pub random_enabled: bool,

    /// Footer marker once every page has been loaded.
    pub end_of_results: bool,

    /// Shown instead of the rows when nothing matched.
    pub empty_state: Option<EmptyState>,
}

/// Display information for one dish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishRow {
    pub id: DishId,
    pub name: String,
    pub price_label: String,
    pub canteen_label: String,
    pub calorie_label: String,
    pub rating_label: String,
    pub picture_url: String,

    /// Character indices in `name` matched by the name filter.
    pub highlight_indices: Vec<usize>,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

impl ListViewModel {
    #[must_use]
    pub fn from_state(state: &ListState) -> Self {
        let name_filter = state.query.name_filter();
        let matcher = SkimMatcherV2::default();

        let rows: Vec<DishRow> = state
            .items
            .iter()
            .map(|dish| DishRow::new(dish, name_filter, &matcher))
            .collect();

        let empty_state = (rows.is_empty() && !state.loading).then(|| {
            let subtitle = if state.query == crate::domain::Query::default() {
                "Pull down to try again"
            } else {
                "Try loosening the filters"
            };
            EmptyState {
                message: "No dishes found".to_string(),
                subtitle: subtitle.to_string(),
            }
        });

        Self {
            show_loading_indicator: rows.is_empty() && state.loading,
            refreshing: state.refreshing,
            random_enabled: !rows.is_empty(),
            end_of_results: !state.has_more && !rows.is_empty(),
            empty_state,
            rows,
        }
    }
}

impl DishRow {
    fn new(dish: &Dish, name_filter: Option<&str>, matcher: &SkimMatcherV2) -> Self {
        let highlight_indices = name_filter
            .map(|filter| highlight(matcher, &dish.name, filter))
            .unwrap_or_default();

        Self {
            id: dish.id,
            name: dish.name.clone(),
            price_label: format!("¥{}", dish.price),
            canteen_label: dish.canteen.to_string(),
            calorie_label: format!("{} kcal", dish.calorie),
            rating_label: rating_label(dish),
            picture_url: dish.picture_url.clone(),
            highlight_indices,
        }
    }
}

fn rating_label(dish: &Dish) -> String {
    match dish.rate_number {
        0 => "No reviews".to_string(),
        1 => format!("{:.1} (1 review)", dish.rate),
        n => format!("{:.1} ({n} reviews)", dish.rate),
    }
}

/// Union of the per-token match positions, sorted and deduplicated.
fn highlight(matcher: &SkimMatcherV2, name: &str, filter: &str) -> Vec<usize> {
    let mut indices: Vec<usize> = filter
        .split_whitespace()
        .filter_map(|token| matcher.fuzzy_indices(name, token))
        .flat_map(|(_, positions)| positions)
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

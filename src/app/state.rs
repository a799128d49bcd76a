//! List state and view model computation.
//!
//! [`ListState`] is what the screen renders from. Only
//! [`ListController`](super::ListController) mutates it; everyone else works
//! on `&ListState` or a cloned snapshot.

use crate::domain::{Dish, DishId, Query};
use crate::ui::viewmodel::ListViewModel;
use serde::Serialize;

/// Snapshot of the filterable list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListState {
    /// Filter the items were fetched with.
    pub query: Query,

    /// 1-based page of the last requested fetch.
    ///
    /// Reset to 1 on filter change or refresh, advanced by one per
    /// "load more" and rolled back if that fetch fails.
    pub page: u32,

    /// Dishes in provider order. Ids are unique.
    pub items: Vec<Dish>,

    /// A current fetch is outstanding.
    pub loading: bool,

    /// False once a next-page fetch came back empty.
    pub has_more: bool,

    /// The outstanding fetch was started by pull-to-refresh.
    pub refreshing: bool,
}

impl ListState {
    #[must_use]
    pub const fn new(query: Query) -> Self {
        Self {
            query,
            page: 1,
            items: Vec::new(),
            loading: false,
            has_more: true,
            refreshing: false,
        }
    }

    #[must_use]
    pub fn get(&self, id: DishId) -> Option<&Dish> {
        self.items.iter().find(|d| d.id == id)
    }

    /// Builds the renderable view of this state.
    #[must_use]
    pub fn compute_viewmodel(&self) -> ListViewModel {
        ListViewModel::from_state(self)
    }
}

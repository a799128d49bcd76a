//! Filterable paginated list controller.
//!
//! [`ListController`] owns the [`ListState`] and is its only writer. It does
//! no I/O: every operation that needs data returns a [`SearchRequest`], and
//! the owner later feeds the provider's answer back through
//! [`ListController::complete`] together with the request's ticket.
//!
//! # Epochs
//!
//! Fetch completions may arrive in any order. The controller keeps an epoch
//! counter that advances on every [`set_filter`](ListController::set_filter)
//! and [`refresh`](ListController::refresh), and remembers the ticket of the
//! single fetch it is currently waiting for. A completion carrying any other
//! ticket is stale and is dropped without touching state, so the latest
//! intent always wins:
//!
//! ```text
//! set_filter(A) ─► ticket{epoch 1}  ──────────────────────┐ (late)
//! set_filter(B) ─► ticket{epoch 2} ──► applied            ▼
//!                                                  discarded
//! ```
//!
//! `load_more` does not advance the epoch. It is serialized by the `loading`
//! flag instead and is invalidated by any later filter change or refresh.

use super::state::ListState;
use crate::domain::{Dish, DishId, ProviderError, Query};
use crate::provider::{FetchKind, FetchTicket, SearchRequest};
use std::collections::HashSet;

/// What a completion did to the list.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// A first page replaced the list.
    Replaced { count: usize },
    /// A next page was appended. `dropped` counts items skipped because
    /// their id was already listed.
    Appended { added: usize, dropped: usize },
    /// A next page came back empty; there is nothing further to load.
    Exhausted,
    /// The completion belonged to a superseded fetch and was ignored.
    Stale,
    /// The provider failed; flags were cleared and the cursor restored.
    Failed(ProviderError),
}

impl Completion {
    /// Whether the completion changed anything a view would show.
    #[must_use]
    pub const fn changed_state(&self) -> bool {
        !matches!(self, Self::Stale)
    }
}

/// Owner of the list state and the fetch epoch.
#[derive(Debug, Clone)]
pub struct ListController {
    state: ListState,
    epoch: u64,
    in_flight: Option<FetchTicket>,
}

impl Default for ListController {
    fn default() -> Self {
        Self::new(Query::default())
    }
}

impl ListController {
    /// Creates an idle controller with `query` and no items.
    ///
    /// Nothing is fetched until [`set_filter`](Self::set_filter) or
    /// [`refresh`](Self::refresh) is called.
    #[must_use]
    pub fn new(query: Query) -> Self {
        Self {
            state: ListState::new(query),
            epoch: 0,
            in_flight: None,
        }
    }

    /// Creates a controller for a freshly mounted screen and issues its first fetch.
    ///
    /// `initial_canteen` is the value handed over from another screen, if any.
    #[must_use]
    pub fn mount(initial_canteen: Option<crate::domain::Canteen>) -> (Self, SearchRequest) {
        let query = initial_canteen.map_or_else(Query::default, Query::for_canteen);
        let mut controller = Self::new(Query::default());
        let request = controller.set_filter(query);
        (controller, request)
    }

    #[must_use]
    pub const fn state(&self) -> &ListState {
        &self.state
    }

    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The fetch the controller is waiting for, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref()
    }

    /// Replaces the query and restarts from page 1.
    ///
    /// Clears the list immediately and supersedes any fetch still in flight.
    pub fn set_filter(&mut self, query: Query) -> SearchRequest {
        self.restart(query, FetchKind::Reset)
    }

    /// Reloads page 1 of the current query and raises the refresh indicator.
    pub fn refresh(&mut self) -> SearchRequest {
        let query = self.state.query.clone();
        self.restart(query, FetchKind::Refresh)
    }

    fn restart(&mut self, query: Query, kind: FetchKind) -> SearchRequest {
        self.epoch = self.epoch.wrapping_add(1);

        let _span = tracing::debug_span!("list_restart",
            epoch = self.epoch,
            kind = ?kind,
            superseded = self.in_flight.is_some()
        )
        .entered();

        self.state.query = query;
        self.state.page = 1;
        self.state.items.clear();
        self.state.loading = true;
        self.state.has_more = true;
        self.state.refreshing = kind == FetchKind::Refresh;

        let ticket = FetchTicket {
            epoch: self.epoch,
            page: 1,
            kind,
        };
        self.in_flight = Some(ticket);

        tracing::debug!(query = ?self.state.query, "fetching first page");
        SearchRequest::new(ticket, self.state.query.clone())
    }

    /// Requests the next page, unless a fetch is running or the list is exhausted.
    ///
    /// Returns `None` when the trigger is ignored; repeated scroll events
    /// therefore never produce overlapping page requests.
    pub fn load_more(&mut self) -> Option<SearchRequest> {
        if self.state.loading || !self.state.has_more {
            tracing::trace!(
                loading = self.state.loading,
                has_more = self.state.has_more,
                "load more ignored"
            );
            return None;
        }

        self.state.loading = true;
        self.state.page = self.state.page.saturating_add(1);

        let ticket = FetchTicket {
            epoch: self.epoch,
            page: self.state.page,
            kind: FetchKind::Append,
        };
        self.in_flight = Some(ticket);

        tracing::debug!(epoch = self.epoch, page = self.state.page, "fetching next page");
        Some(SearchRequest::new(ticket, self.state.query.clone()))
    }

    /// Applies the outcome of the fetch identified by `ticket`.
    ///
    /// Anything but the outstanding ticket is stale and leaves state alone.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Dish>, ProviderError>,
    ) -> Completion {
        let _span = tracing::debug_span!("list_complete",
            epoch = ticket.epoch,
            page = ticket.page,
            kind = ?ticket.kind
        )
        .entered();

        if self.in_flight != Some(ticket) {
            tracing::debug!(
                current_epoch = self.epoch,
                "discarding stale search response"
            );
            return Completion::Stale;
        }
        self.in_flight = None;
        self.state.loading = false;

        let completion = match (ticket.kind, result) {
            (FetchKind::Reset | FetchKind::Refresh, Ok(dishes)) => {
                self.state.refreshing = false;
                let (items, dropped) = dedup_by_id(dishes, &HashSet::new());
                if dropped > 0 {
                    tracing::warn!(dropped, "first page contained repeated dish ids");
                }
                self.state.items = items;
                Completion::Replaced {
                    count: self.state.items.len(),
                }
            }
            (FetchKind::Append, Ok(dishes)) if dishes.is_empty() => {
                self.state.has_more = false;
                Completion::Exhausted
            }
            (FetchKind::Append, Ok(dishes)) => {
                let listed: HashSet<DishId> = self.state.items.iter().map(|d| d.id).collect();
                let (fresh, dropped) = dedup_by_id(dishes, &listed);
                if dropped > 0 {
                    tracing::warn!(dropped, "next page repeated already listed dishes");
                }
                let added = fresh.len();
                self.state.items.extend(fresh);
                Completion::Appended { added, dropped }
            }
            (kind, Err(error)) => {
                self.state.refreshing = false;
                if kind == FetchKind::Append {
                    self.state.page = ticket.page.saturating_sub(1).max(1);
                }
                tracing::warn!(error = %error, "search failed");
                Completion::Failed(error)
            }
        };

        tracing::debug!(
            items = self.state.items.len(),
            page = self.state.page,
            has_more = self.state.has_more,
            "search response applied"
        );
        completion
    }

    /// Replaces the dish with identifier `id` in place.
    ///
    /// Returns `false` and leaves the list untouched when `id` is not listed
    /// (it may simply not be loaded) or when `updated` carries a different id,
    /// since identities are stable.
    pub fn update_item(&mut self, id: DishId, updated: Dish) -> bool {
        if updated.id != id {
            tracing::warn!(id, updated_id = updated.id, "refusing update that changes dish id");
            return false;
        }

        match self.state.items.iter_mut().find(|d| d.id == id) {
            Some(slot) => {
                tracing::debug!(id, "replacing dish in place");
                *slot = updated;
                true
            }
            None => {
                tracing::debug!(id, "dish to update is not listed");
                false
            }
        }
    }

    /// Picks a dish for the "random" button.
    ///
    /// `roll` is a uniform sample from `[0, 1)`; values outside are clamped.
    /// Returns `None` when the list is empty.
    #[must_use]
    pub fn pick(&self, roll: f64) -> Option<&Dish> {
        let len = self.state.items.len();
        if len == 0 {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let index = (roll.clamp(0.0, 1.0) * len as f64).floor() as usize;
        self.state.items.get(index.min(len - 1))
    }
}

/// Drops dishes whose id is in `listed` or repeats earlier in `dishes`.
fn dedup_by_id(dishes: Vec<Dish>, listed: &HashSet<DishId>) -> (Vec<Dish>, usize) {
    let mut seen = HashSet::with_capacity(dishes.len());
    let before = dishes.len();
    let kept: Vec<Dish> = dishes
        .into_iter()
        .filter(|d| !listed.contains(&d.id) && seen.insert(d.id))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Canteen;

    fn dish(id: DishId) -> Dish {
        Dish::new(id, format!("dish-{id}"), 5, Canteen::XueYi)
    }

    fn dishes(ids: &[DishId]) -> Vec<Dish> {
        ids.iter().copied().map(dish).collect()
    }

    fn ids(controller: &ListController) -> Vec<DishId> {
        controller.state().items.iter().map(|d| d.id).collect()
    }

    fn loaded(ids: &[DishId]) -> ListController {
        let mut controller = ListController::default();
        let request = controller.set_filter(Query::default());
        controller.complete(request.ticket, Ok(dishes(ids)));
        controller
    }

    #[test]
    fn test_initial_load() {
        let (mut controller, request) = ListController::mount(None);
        assert_eq!(request.page(), 1);
        assert_eq!(request.query, Query::default());
        assert!(controller.state().loading);

        let completion = controller.complete(request.ticket, Ok(dishes(&[1])));
        assert_eq!(completion, Completion::Replaced { count: 1 });

        let state = controller.state();
        assert_eq!(ids(&controller), vec![1]);
        assert_eq!(state.page, 1);
        assert!(!state.loading);
        assert!(state.has_more);
    }

    #[test]
    fn test_mount_uses_handed_over_canteen() {
        let (controller, request) = ListController::mount(Some(Canteen::NongYuan2));
        assert_eq!(request.query.canteen, Some(Canteen::NongYuan2));
        assert_eq!(controller.state().query, request.query);
    }

    #[test]
    fn test_set_filter_never_accumulates() {
        let mut controller = loaded(&[1, 2]);
        let more = controller.load_more().unwrap();
        controller.complete(more.ticket, Ok(dishes(&[3])));

        for (n, batch) in [[10, 11], [20, 21], [30, 31]].iter().enumerate() {
            let query = Query {
                max_calorie: Some(100 * (n as u32 + 1)),
                ..Query::default()
            };
            let request = controller.set_filter(query);
            assert!(controller.state().items.is_empty());
            controller.complete(request.ticket, Ok(dishes(batch)));
            assert_eq!(controller.state().page, 1);
            assert_eq!(ids(&controller), batch.to_vec());
        }
    }

    #[test]
    fn test_load_more_ignored_while_loading() {
        let mut controller = ListController::default();
        let _first = controller.set_filter(Query::default());
        let before = controller.state().clone();

        assert!(controller.load_more().is_none());
        assert_eq!(controller.state(), &before);
    }

    #[test]
    fn test_load_more_ignored_when_exhausted() {
        let mut controller = loaded(&[1]);
        let more = controller.load_more().unwrap();
        controller.complete(more.ticket, Ok(vec![]));
        let before = controller.state().clone();

        assert!(controller.load_more().is_none());
        assert_eq!(controller.state(), &before);
    }

    #[test]
    fn test_empty_next_page_exhausts_list() {
        let mut controller = loaded(&[1, 2]);
        let more = controller.load_more().unwrap();
        assert_eq!(more.page(), 2);

        let completion = controller.complete(more.ticket, Ok(vec![]));
        assert_eq!(completion, Completion::Exhausted);
        assert!(!controller.state().has_more);
        assert!(!controller.state().loading);
        assert_eq!(ids(&controller), vec![1, 2]);
    }

    #[test]
    fn test_next_page_appends_in_order() {
        let mut controller = loaded(&[1, 2]);
        let more = controller.load_more().unwrap();
        let completion = controller.complete(more.ticket, Ok(dishes(&[5, 3, 4])));

        assert_eq!(completion, Completion::Appended { added: 3, dropped: 0 });
        assert_eq!(ids(&controller), vec![1, 2, 5, 3, 4]);
        assert_eq!(controller.state().page, 2);
        assert!(controller.state().has_more);
    }

    #[test]
    fn test_repeated_ids_across_pages_are_dropped() {
        let mut controller = loaded(&[1, 2]);
        let more = controller.load_more().unwrap();
        let completion = controller.complete(more.ticket, Ok(dishes(&[2, 3, 3])));

        assert_eq!(completion, Completion::Appended { added: 1, dropped: 2 });
        assert_eq!(ids(&controller), vec![1, 2, 3]);
    }

    #[test]
    fn test_update_item_replaces_in_place() {
        let mut controller = loaded(&[1, 2, 3]);
        let reviewed = dish(2).with_review(5.0);

        assert!(controller.update_item(2, reviewed.clone()));
        let items = &controller.state().items;
        assert_eq!(items.len(), 3);
        assert_eq!(items[1], reviewed);
        assert_eq!(items[0], dish(1));
        assert_eq!(items[2], dish(3));
    }

    #[test]
    fn test_update_item_missing_is_noop() {
        let mut controller = loaded(&[1, 2]);
        let before = controller.state().clone();
        assert!(!controller.update_item(9, dish(9)));
        assert_eq!(controller.state(), &before);
    }

    #[test]
    fn test_update_item_refuses_identity_change() {
        let mut controller = loaded(&[1, 2]);
        assert!(!controller.update_item(1, dish(2)));
        assert_eq!(ids(&controller), vec![1, 2]);
    }

    #[test]
    fn test_stale_filter_response_is_discarded() {
        let mut controller = ListController::default();
        let a = controller.set_filter(Query::for_canteen(Canteen::XueYi));
        let b = controller.set_filter(Query::for_canteen(Canteen::JiaYuan4));

        assert_eq!(controller.complete(a.ticket, Ok(dishes(&[1]))), Completion::Stale);
        assert!(controller.state().items.is_empty());
        assert!(controller.state().loading);
        assert_eq!(controller.state().query.canteen, Some(Canteen::JiaYuan4));

        controller.complete(b.ticket, Ok(dishes(&[2])));
        assert_eq!(ids(&controller), vec![2]);
        assert!(!controller.state().loading);
    }

    #[test]
    fn test_stale_response_after_newer_one_is_discarded() {
        let mut controller = ListController::default();
        let a = controller.set_filter(Query::for_canteen(Canteen::XueYi));
        let b = controller.set_filter(Query::for_canteen(Canteen::JiaYuan4));

        controller.complete(b.ticket, Ok(dishes(&[2])));
        assert_eq!(controller.complete(a.ticket, Ok(dishes(&[1]))), Completion::Stale);
        assert_eq!(ids(&controller), vec![2]);
    }

    #[test]
    fn test_filter_change_invalidates_pending_page() {
        let mut controller = loaded(&[1]);
        let more = controller.load_more().unwrap();
        let reset = controller.set_filter(Query::for_canteen(Canteen::NongYuan1));

        assert_eq!(controller.complete(more.ticket, Ok(dishes(&[2]))), Completion::Stale);
        controller.complete(reset.ticket, Ok(dishes(&[7])));
        assert_eq!(ids(&controller), vec![7]);
        assert_eq!(controller.state().page, 1);
    }

    #[test]
    fn test_refresh_replaces_list() {
        let mut controller = loaded(&[1]);
        let more = controller.load_more().unwrap();
        controller.complete(more.ticket, Ok(dishes(&[2])));
        assert_eq!(controller.state().page, 2);

        let request = controller.refresh();
        assert!(controller.state().refreshing);
        assert_eq!(request.query, controller.state().query);

        controller.complete(request.ticket, Ok(dishes(&[3])));
        assert_eq!(ids(&controller), vec![3]);
        assert_eq!(controller.state().page, 1);
        assert!(!controller.state().refreshing);
    }

    #[test]
    fn test_refresh_failure_releases_indicator() {
        let mut controller = loaded(&[1]);
        let request = controller.refresh();
        let completion =
            controller.complete(request.ticket, Err(ProviderError::Transport("offline".into())));

        assert!(matches!(completion, Completion::Failed(_)));
        assert!(!controller.state().refreshing);
        assert!(!controller.state().loading);
        assert!(controller.state().has_more);
        assert!(controller.state().items.is_empty());
        assert_eq!(controller.state().page, 1);
    }

    #[test]
    fn test_set_filter_lowers_refresh_indicator() {
        let mut controller = loaded(&[1]);
        let _refresh = controller.refresh();
        let _reset = controller.set_filter(Query::default());
        assert!(!controller.state().refreshing);
    }

    #[test]
    fn test_load_more_failure_restores_cursor() {
        let mut controller = loaded(&[1]);
        let more = controller.load_more().unwrap();
        assert_eq!(controller.state().page, 2);

        let completion =
            controller.complete(more.ticket, Err(ProviderError::Timeout { after_ms: 100 }));
        assert_eq!(
            completion,
            Completion::Failed(ProviderError::Timeout { after_ms: 100 })
        );

        let state = controller.state();
        assert_eq!(ids(&controller), vec![1]);
        assert_eq!(state.page, 1);
        assert!(!state.loading);
        assert!(state.has_more);

        let retry = controller.load_more().unwrap();
        assert_eq!(retry.page(), 2);
    }

    #[test]
    fn test_duplicate_completion_is_stale() {
        let mut controller = ListController::default();
        let request = controller.set_filter(Query::default());
        controller.complete(request.ticket, Ok(dishes(&[1])));
        assert_eq!(
            controller.complete(request.ticket, Ok(dishes(&[2]))),
            Completion::Stale
        );
        assert_eq!(ids(&controller), vec![1]);
    }

    #[test]
    fn test_epoch_advances_only_on_restart() {
        let mut controller = loaded(&[1]);
        let epoch = controller.epoch();
        let more = controller.load_more().unwrap();
        assert_eq!(more.ticket.epoch, epoch);
        controller.complete(more.ticket, Ok(dishes(&[2])));
        let _ = controller.refresh();
        assert_eq!(controller.epoch(), epoch + 1);
    }

    #[test]
    fn test_pick_maps_roll_onto_items() {
        let controller = loaded(&[1, 2, 3, 4]);
        assert_eq!(controller.pick(0.0).map(|d| d.id), Some(1));
        assert_eq!(controller.pick(0.6).map(|d| d.id), Some(3));
        assert_eq!(controller.pick(0.999).map(|d| d.id), Some(4));
        assert_eq!(controller.pick(1.0).map(|d| d.id), Some(4));
        assert!(ListController::default().pick(0.5).is_none());
    }
}

//! Event handling and state transition logic.
//!
//! Translates screen events and search completions into controller calls
//! and the actions the runtime must carry out.
//!
//! # Architecture
//!
//! 1. The screen or the runtime produces an [`Event`]
//! 2. [`handle_event`] pattern-matches it and drives the [`ListController`]
//! 3. The returned flag says whether the view needs re-rendering
//! 4. The returned [`Action`]s are executed in order by the runtime
//!
//! # Event Types
//!
//! - **Lifecycle**: `Activated`
//! - **Filtering**: `FilterReplaced`, `FilterEdited`, `PullToRefresh`
//! - **Paging**: `ScrolledToBottom`
//! - **Navigation**: `ItemActivated`, `RandomRequested`, `DetailClosed`
//! - **Provider**: `SearchCompleted`
//!
//! # Example
//!
//! ```rust
//! use dishlist::app::{handle_event, Action, Event, ListController};
//! use dishlist::{Canteen, FilterEdit};
//!
//! let mut controller = ListController::default();
//! let (render, actions) = handle_event(
//!     &mut controller,
//!     Event::FilterEdited(FilterEdit::Canteen(Some(Canteen::XueYi))),
//! );
//! assert!(render);
//! assert!(matches!(actions.as_slice(), [Action::Search(_)]));
//! ```

use super::{Action, Completion, ListController};
use crate::domain::{Canteen, Dish, DishId, FilterEdit, ProviderError, Query};
use crate::provider::FetchTicket;

/// Things that can happen to the dish list screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The screen became visible again.
    ///
    /// Carries whatever was taken from the
    /// [`PendingFilter`](super::PendingFilter) slot.
    Activated { pending_canteen: Option<Canteen> },

    /// The whole filter was replaced.
    FilterReplaced(Query),

    /// One selector changed.
    FilterEdited(FilterEdit),

    PullToRefresh,

    /// The list was scrolled to its end.
    ScrolledToBottom,

    /// A row was tapped.
    ItemActivated { id: DishId },

    /// The random button was pressed. `roll` is uniform in `[0, 1)`.
    RandomRequested { roll: f64 },

    /// The detail screen for `id` closed, with the edited dish if any.
    DetailClosed { id: DishId, updated: Option<Dish> },

    /// A search started by [`Action::Search`] settled.
    SearchCompleted {
        ticket: FetchTicket,
        result: Result<Vec<Dish>, ProviderError>,
    },
}

/// Processes an event and returns `(needs_render, actions)`.
///
/// Nothing here fails: provider errors arrive as events and leave as
/// [`Action::ReportFailure`].
pub fn handle_event(controller: &mut ListController, event: Event) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(&event)).entered();

    match event {
        Event::Activated { pending_canteen } => match pending_canteen {
            Some(canteen) => {
                tracing::debug!(%canteen, "applying pending canteen filter");
                let request = controller.set_filter(Query::for_canteen(canteen));
                (true, vec![Action::Search(request)])
            }
            None => (false, vec![]),
        },
        Event::FilterReplaced(query) => {
            let request = controller.set_filter(query);
            (true, vec![Action::Search(request)])
        }
        Event::FilterEdited(edit) => {
            let current = &controller.state().query;
            let next = current.apply(edit);
            if &next == current {
                tracing::debug!("filter unchanged, skipping search");
                return (false, vec![]);
            }
            let request = controller.set_filter(next);
            (true, vec![Action::Search(request)])
        }
        Event::PullToRefresh => {
            let request = controller.refresh();
            (true, vec![Action::Search(request)])
        }
        Event::ScrolledToBottom => controller
            .load_more()
            .map_or_else(|| (false, vec![]), |request| (true, vec![Action::Search(request)])),
        Event::ItemActivated { id } => match controller.state().get(id) {
            Some(dish) => (false, vec![Action::OpenDetail(dish.clone())]),
            None => {
                tracing::debug!(id, "activated dish is not listed");
                (false, vec![])
            }
        },
        Event::RandomRequested { roll } => match controller.pick(roll) {
            Some(dish) => {
                tracing::debug!(id = dish.id, "random dish picked");
                (false, vec![Action::OpenDetail(dish.clone())])
            }
            None => {
                tracing::debug!("random pick ignored on empty list");
                (false, vec![])
            }
        },
        Event::DetailClosed { id, updated } => match updated {
            Some(dish) => (controller.update_item(id, dish), vec![]),
            None => (false, vec![]),
        },
        Event::SearchCompleted { ticket, result } => match controller.complete(ticket, result) {
            Completion::Stale => (false, vec![]),
            Completion::Failed(error) => (true, vec![Action::ReportFailure(error)]),
            Completion::Replaced { .. }
            | Completion::Appended { .. }
            | Completion::Exhausted => (true, vec![]),
        },
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Activated { .. } => "activated",
        Event::FilterReplaced(_) => "filter_replaced",
        Event::FilterEdited(_) => "filter_edited",
        Event::PullToRefresh => "pull_to_refresh",
        Event::ScrolledToBottom => "scrolled_to_bottom",
        Event::ItemActivated { .. } => "item_activated",
        Event::RandomRequested { .. } => "random_requested",
        Event::DetailClosed { .. } => "detail_closed",
        Event::SearchCompleted { .. } => "search_completed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryId, PriceRange};
    use crate::provider::SearchRequest;

    fn dish(id: DishId) -> Dish {
        Dish::new(id, format!("dish-{id}"), 6, Canteen::JiaYuan2)
    }

    fn expect_search(actions: Vec<Action>) -> SearchRequest {
        match actions.as_slice() {
            [Action::Search(request)] => request.clone(),
            other => panic!("expected a single search, got {other:?}"),
        }
    }

    fn complete(controller: &mut ListController, request: &SearchRequest, ids: &[DishId]) {
        let result = Ok(ids.iter().copied().map(dish).collect());
        handle_event(
            controller,
            Event::SearchCompleted {
                ticket: request.ticket,
                result,
            },
        );
    }

    #[test]
    fn test_activation_without_pending_value_is_noop() {
        let mut controller = ListController::default();
        let (render, actions) = handle_event(
            &mut controller,
            Event::Activated {
                pending_canteen: None,
            },
        );
        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_activation_with_pending_canteen_resets_filter() {
        let mut controller = ListController::default();
        let (render, actions) = handle_event(
            &mut controller,
            Event::Activated {
                pending_canteen: Some(Canteen::NongYuan1),
            },
        );
        assert!(render);
        let request = expect_search(actions);
        assert_eq!(request.query, Query::for_canteen(Canteen::NongYuan1));
        assert_eq!(request.page(), 1);
    }

    #[test]
    fn test_unchanged_edit_issues_no_search() {
        let mut controller = ListController::default();
        let first = expect_search(
            handle_event(
                &mut controller,
                Event::FilterEdited(FilterEdit::MaxCalorie(Some(600))),
            )
            .1,
        );
        complete(&mut controller, &first, &[1]);

        let (render, actions) = handle_event(
            &mut controller,
            Event::FilterEdited(FilterEdit::MaxCalorie(Some(600))),
        );
        assert!(!render);
        assert!(actions.is_empty());
        assert!(!controller.state().loading);
    }

    #[test]
    fn test_category_toggle_clears_on_second_tap() {
        let mut controller = ListController::default();
        let rice = CategoryId::new("rice");

        let first = expect_search(
            handle_event(&mut controller, Event::FilterEdited(FilterEdit::ToggleCategory(rice.clone()))).1,
        );
        assert_eq!(first.query.category, Some(rice.clone()));

        let second = expect_search(
            handle_event(&mut controller, Event::FilterEdited(FilterEdit::ToggleCategory(rice))).1,
        );
        assert_eq!(second.query.category, None);
    }

    #[test]
    fn test_edits_accumulate_on_current_query() {
        let mut controller = ListController::default();
        handle_event(
            &mut controller,
            Event::FilterEdited(FilterEdit::Canteen(Some(Canteen::XueYi))),
        );
        let request = expect_search(
            handle_event(
                &mut controller,
                Event::FilterEdited(FilterEdit::Price(Some(PriceRange::new(5, 10)))),
            )
            .1,
        );
        assert_eq!(request.query.canteen, Some(Canteen::XueYi));
        assert_eq!(request.query.price, Some(PriceRange::new(5, 10)));
    }

    #[test]
    fn test_scroll_while_loading_is_ignored() {
        let mut controller = ListController::default();
        handle_event(&mut controller, Event::FilterReplaced(Query::default()));

        let (render, actions) = handle_event(&mut controller, Event::ScrolledToBottom);
        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_scroll_requests_next_page() {
        let mut controller = ListController::default();
        let first = expect_search(handle_event(&mut controller, Event::FilterReplaced(Query::default())).1);
        complete(&mut controller, &first, &[1, 2]);

        let next = expect_search(handle_event(&mut controller, Event::ScrolledToBottom).1);
        assert_eq!(next.page(), 2);
        assert_eq!(next.ticket.epoch, first.ticket.epoch);
    }

    #[test]
    fn test_stale_completion_does_not_render() {
        let mut controller = ListController::default();
        let old = expect_search(handle_event(&mut controller, Event::FilterReplaced(Query::default())).1);
        let _new = handle_event(&mut controller, Event::PullToRefresh);

        let (render, actions) = handle_event(
            &mut controller,
            Event::SearchCompleted {
                ticket: old.ticket,
                result: Ok(vec![dish(1)]),
            },
        );
        assert!(!render);
        assert!(actions.is_empty());
        assert!(controller.state().items.is_empty());
    }

    #[test]
    fn test_failure_is_reported() {
        let mut controller = ListController::default();
        let request = expect_search(handle_event(&mut controller, Event::PullToRefresh).1);

        let (render, actions) = handle_event(
            &mut controller,
            Event::SearchCompleted {
                ticket: request.ticket,
                result: Err(ProviderError::Decode("truncated".into())),
            },
        );
        assert!(render);
        assert_eq!(
            actions,
            vec![Action::ReportFailure(ProviderError::Decode("truncated".into()))]
        );
    }

    #[test]
    fn test_item_activation_opens_detail() {
        let mut controller = ListController::default();
        let request = expect_search(handle_event(&mut controller, Event::FilterReplaced(Query::default())).1);
        complete(&mut controller, &request, &[1, 2]);

        let (_, actions) = handle_event(&mut controller, Event::ItemActivated { id: 2 });
        assert_eq!(actions, vec![Action::OpenDetail(dish(2))]);

        let (_, actions) = handle_event(&mut controller, Event::ItemActivated { id: 3 });
        assert!(actions.is_empty());
    }

    #[test]
    fn test_random_pick_disabled_on_empty_list() {
        let mut controller = ListController::default();
        let (_, actions) = handle_event(&mut controller, Event::RandomRequested { roll: 0.3 });
        assert!(actions.is_empty());

        let request = expect_search(handle_event(&mut controller, Event::FilterReplaced(Query::default())).1);
        complete(&mut controller, &request, &[1, 2]);
        let (_, actions) = handle_event(&mut controller, Event::RandomRequested { roll: 0.5 });
        assert_eq!(actions, vec![Action::OpenDetail(dish(2))]);
    }

    #[test]
    fn test_detail_close_splices_update() {
        let mut controller = ListController::default();
        let request = expect_search(handle_event(&mut controller, Event::FilterReplaced(Query::default())).1);
        complete(&mut controller, &request, &[1, 2, 3]);

        let (render, _) = handle_event(&mut controller, Event::DetailClosed { id: 2, updated: None });
        assert!(!render);

        let reviewed = dish(2).with_review(3.0);
        let (render, _) = handle_event(
            &mut controller,
            Event::DetailClosed {
                id: 2,
                updated: Some(reviewed.clone()),
            },
        );
        assert!(render);
        assert_eq!(controller.state().items[1], reviewed);
    }
}

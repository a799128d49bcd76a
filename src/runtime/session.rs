//! Async driver for the list controller.
//!
//! [`ListSession`] feeds events to [`handle_event`] and executes the actions
//! that come back: searches go to the provider, detail requests to a
//! navigator, failures into the notice queue. The controller lock is only
//! held while an event is being handled, never across an `.await`, so any
//! number of operations may be in flight at once. Which of them gets to
//! change the list is decided by the controller's epoch check.

use crate::app::{handle_event, Action, Event, ListController, ListState, PendingFilter};
use crate::domain::{Dish, DishId, FilterEdit, ProviderError, Query};
use crate::provider::{DetailNavigator, SearchProvider, SearchRequest, TraceContext};
use crate::ui::ListViewModel;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// How a fetching operation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The result was applied; carries the state right after.
    Applied(ListState),
    /// A newer operation superseded this one before its result arrived.
    Discarded,
    /// The provider failed. A notice was queued and the list stays usable.
    Failed(ProviderError),
    /// Nothing to do: already loading, exhausted or an unchanged filter.
    Skipped,
}

impl Outcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// A non-fatal failure for the screen to surface (as a toast, for example).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub at: DateTime<Utc>,
    pub error: ProviderError,
}

impl Notice {
    #[must_use]
    pub fn message(&self) -> String {
        format!("Could not load dishes: {}", self.error)
    }
}

/// One mounted dish list screen.
pub struct ListSession<P> {
    controller: Mutex<ListController>,
    provider: P,
    pending: PendingFilter,
    notices: Mutex<Vec<Notice>>,
}

impl<P: SearchProvider> ListSession<P> {
    /// Creates an idle session. Call [`mount`](Self::mount) to load the first page.
    pub fn new(provider: P, pending: PendingFilter) -> Self {
        Self {
            controller: Mutex::new(ListController::default()),
            provider,
            pending,
            notices: Mutex::new(Vec::new()),
        }
    }

    /// The hand-off slot other screens offer a canteen through.
    pub const fn pending(&self) -> &PendingFilter {
        &self.pending
    }

    /// Loads the first page, filtered by a pending canteen if one was offered.
    pub async fn mount(&self) -> Outcome {
        let query = self
            .pending
            .take()
            .map_or_else(Query::default, Query::for_canteen);
        tracing::debug!(canteen = ?query.canteen, "mounting dish list");
        self.drive(Event::FilterReplaced(query)).await
    }

    /// Re-checks the pending slot after the screen became visible again.
    pub async fn activate(&self) -> Outcome {
        let pending_canteen = self.pending.take();
        self.drive(Event::Activated { pending_canteen }).await
    }

    pub async fn set_filter(&self, query: Query) -> Outcome {
        self.drive(Event::FilterReplaced(query)).await
    }

    /// Applies one selector change; an edit that changes nothing is skipped.
    pub async fn edit_filter(&self, edit: FilterEdit) -> Outcome {
        self.drive(Event::FilterEdited(edit)).await
    }

    pub async fn refresh(&self) -> Outcome {
        self.drive(Event::PullToRefresh).await
    }

    pub async fn load_more(&self) -> Outcome {
        self.drive(Event::ScrolledToBottom).await
    }

    /// Replaces a listed dish in place. Returns whether anything changed.
    pub fn update_item(&self, id: DishId, updated: Dish) -> bool {
        self.lock().update_item(id, updated)
    }

    /// Opens the detail screen for `id` and splices back any edit.
    ///
    /// Returns whether the list changed.
    pub async fn open_detail<N>(&self, navigator: &N, id: DishId) -> bool
    where
        N: DetailNavigator + ?Sized,
    {
        let (_, actions) = self.dispatch(Event::ItemActivated { id });
        self.navigate(navigator, actions).await
    }

    /// Opens the detail screen for a random listed dish.
    ///
    /// `roll` is uniform in `[0, 1)`. Does nothing on an empty list.
    pub async fn pick_random<N>(&self, navigator: &N, roll: f64) -> bool
    where
        N: DetailNavigator + ?Sized,
    {
        let (_, actions) = self.dispatch(Event::RandomRequested { roll });
        self.navigate(navigator, actions).await
    }

    #[must_use]
    pub fn snapshot(&self) -> ListState {
        self.lock().state().clone()
    }

    #[must_use]
    pub fn view(&self) -> ListViewModel {
        self.lock().state().compute_viewmodel()
    }

    /// Drains the queued failure notices, oldest first.
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn lock(&self) -> MutexGuard<'_, ListController> {
        self.controller.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, event: Event) -> (bool, Vec<Action>) {
        handle_event(&mut self.lock(), event)
    }

    async fn drive(&self, event: Event) -> Outcome {
        let (_, actions) = self.dispatch(event);

        let mut outcome = Outcome::Skipped;
        for action in actions {
            match action {
                Action::Search(request) => outcome = self.fetch(request).await,
                Action::ReportFailure(error) => self.report(error),
                Action::OpenDetail(dish) => {
                    tracing::warn!(id = dish.id, "detail request without a navigator ignored");
                }
            }
        }
        outcome
    }

    async fn fetch(&self, request: SearchRequest) -> Outcome {
        let span = tracing::debug_span!(
            "search",
            epoch = request.ticket.epoch,
            page = request.page(),
            kind = ?request.ticket.kind
        );
        if let Some(parent) = request.trace_context.as_ref().and_then(TraceContext::to_context) {
            span.set_parent(parent);
        }

        let result = self
            .provider
            .search(&request.query, request.page())
            .instrument(span)
            .await;

        let (applied, actions, snapshot) = {
            let mut controller = self.lock();
            let (render, actions) = handle_event(
                &mut controller,
                Event::SearchCompleted {
                    ticket: request.ticket,
                    result,
                },
            );
            (render, actions, controller.state().clone())
        };

        for action in actions {
            if let Action::ReportFailure(error) = action {
                self.report(error.clone());
                return Outcome::Failed(error);
            }
        }

        if applied {
            Outcome::Applied(snapshot)
        } else {
            Outcome::Discarded
        }
    }

    async fn navigate<N>(&self, navigator: &N, actions: Vec<Action>) -> bool
    where
        N: DetailNavigator + ?Sized,
    {
        let mut changed = false;
        for action in actions {
            if let Action::OpenDetail(dish) = action {
                let id = dish.id;
                let updated = navigator.open(dish).await;
                let (render, _) = self.dispatch(Event::DetailClosed { id, updated });
                changed |= render;
            }
        }
        changed
    }

    fn report(&self, error: ProviderError) {
        tracing::warn!(error = %error, "queueing failure notice");
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notice {
                at: Utc::now(),
                error,
            });
    }
}

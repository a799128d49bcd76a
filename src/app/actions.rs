//! Side effects requested by the event handler.
//!
//! [`handle_event`](super::handle_event) never performs I/O. It returns
//! actions, and the runtime executes them: searches go to the
//! [`SearchProvider`](crate::provider::SearchProvider), detail requests to the
//! [`DetailNavigator`](crate::provider::DetailNavigator), and failures to
//! whatever the screen uses for non-fatal notices.

use crate::domain::{Dish, ProviderError};
use crate::provider::SearchRequest;

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Run a search and feed the result back as
    /// [`Event::SearchCompleted`](super::Event::SearchCompleted) with the
    /// request's ticket.
    Search(SearchRequest),

    /// Navigate to the detail screen for a dish.
    ///
    /// When the screen closes, report
    /// [`Event::DetailClosed`](super::Event::DetailClosed).
    OpenDetail(Dish),

    /// Show a non-fatal failure notice. The list stays usable.
    ReportFailure(ProviderError),
}

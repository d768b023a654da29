//! Shared handler state, injected into the depot once at startup.

use std::sync::Arc;

use feast_app::context::AppContext;

/// Service handles for users, restaurants, carts, orders, and auth.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,

    /// Render the underlying `error` detail in failed envelopes. Off in production.
    pub(crate) expose_error_detail: bool,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, expose_error_detail: bool) -> Arc<Self> {
        Arc::new(Self {
            app,
            expose_error_detail,
        })
    }
}

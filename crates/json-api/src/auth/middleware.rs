//! Auth middleware.
//!
//! Resolves `Authorization: Bearer <token>` to an [`AuthenticatedUser`] stored in the
//! depot for downstream handlers.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;

use feast_app::auth::AuthServiceError;

use crate::{envelope::ApiError, extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        ApiError::unauthorized("No token, authorization denied")
            .write(req, depot, res)
            .await;
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>().map(Arc::clone) {
        Ok(state) => state,
        Err(error) => {
            error.write(req, depot, res).await;
            ctrl.skip_rest();

            return;
        }
    };

    let user = match state.app.auth.authenticate_bearer(token).await {
        Ok(user) => user,
        Err(AuthServiceError::NotFound | AuthServiceError::UserNotFound) => {
            ApiError::unauthorized("Token is not valid")
                .write(req, depot, res)
                .await;
            ctrl.skip_rest();

            return;
        }
        Err(AuthServiceError::Sql(source)) => {
            error!("failed to validate api token: {source}");

            ApiError::internal("Failed to validate token")
                .with_detail(source)
                .write(req, depot, res)
                .await;
            ctrl.skip_rest();

            return;
        }
        Err(AuthServiceError::Token(source)) => {
            error!("failed to process api token: {source}");

            ApiError::internal("Failed to validate token")
                .with_detail(source)
                .write(req, depot, res)
                .await;
            ctrl.skip_rest();

            return;
        }
    };

    tracing::Span::current().record("user_uuid", tracing::field::display(user.uuid));

    depot.insert_authenticated_user(user);

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

//! JSON response envelope.
//!
//! Every endpoint answers with `{ "success", "message"?, "data"?, "error"? }`. Errors
//! carry a human-readable `message`; the underlying `error` detail is only rendered when
//! [`State::expose_error_detail`] is set.

use std::{fmt::Display, sync::Arc};

use salvo::{
    Depot, FlowCtrl, Request, Scribe, Writer, async_trait, handler,
    http::{ResBody, StatusCode},
    oapi::{
        self, BasicType, Components, EndpointOutRegister, Object, Operation, RefOr, Schema,
        ToSchema,
    },
    prelude::{Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::State;

/// Successful response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Payload type for responses that only carry a message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NoData {}

impl<T> ApiResponse<T> {
    pub(crate) fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub(crate) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<NoData> {
    pub(crate) fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl<T> Scribe for ApiResponse<T>
where
    T: Serialize + Send,
{
    fn render(self, res: &mut Response) {
        res.render(Json(self));
    }
}

impl<T> EndpointOutRegister for ApiResponse<T>
where
    T: ToSchema,
{
    fn register(components: &mut Components, operation: &mut Operation) {
        let envelope: RefOr<Schema> = Object::new()
            .property("success", Object::with_type(BasicType::Boolean))
            .required("success")
            .property("message", Object::with_type(BasicType::String))
            .property("data", T::to_schema(components))
            .into();

        operation.responses.insert(
            "200",
            oapi::Response::new("Success envelope").add_content("application/json", envelope),
        );
    }
}

/// Error response, rendered as a failed envelope with the matching status code.
#[derive(Debug, Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ErrorBody {
    pub success: bool,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub(crate) fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub(crate) fn with_detail(mut self, detail: impl Display) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }

    fn into_body(self, expose_detail: bool) -> ErrorBody {
        ErrorBody {
            success: false,
            message: self.message,
            error: self.detail.filter(|_| expose_detail),
        }
    }
}

#[async_trait]
impl Writer for ApiError {
    async fn write(self, _req: &mut Request, depot: &mut Depot, res: &mut Response) {
        let expose_detail = depot
            .obtain::<Arc<State>>()
            .is_ok_and(|state| state.expose_error_detail);

        res.status_code(self.status);
        res.render(Json(self.into_body(expose_detail)));
    }
}

/// Catcher hoop that renders errors raised outside handlers, such as extractor
/// rejections and unmatched routes, as a failed envelope.
#[handler]
pub(crate) async fn catch_errors(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let status = res
        .status_code
        .filter(|status| status.is_client_error() || status.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = status.canonical_reason().unwrap_or("Request failed");

    let error = match res.take_body() {
        ResBody::Error(source) => {
            let detail = source
                .cause
                .as_ref()
                .map(ToString::to_string)
                .or(source.detail)
                .unwrap_or(source.brief);

            ApiError::new(status, message).with_detail(detail)
        }
        _ => ApiError::new(status, message),
    };

    error.write(req, depot, res).await;
    ctrl.skip_rest();
}

impl EndpointOutRegister for ApiError {
    // Error statuses are listed per endpoint in `#[endpoint(responses(...))]`.
    fn register(_components: &mut Components, _operation: &mut Operation) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_omits_empty_fields() -> Result<(), serde_json::Error> {
        let body = serde_json::to_value(ApiResponse::message("Cart cleared successfully"))?;

        assert_eq!(
            body,
            serde_json::json!({ "success": true, "message": "Cart cleared successfully" })
        );

        let body = serde_json::to_value(ApiResponse::ok(42))?;

        assert_eq!(body, serde_json::json!({ "success": true, "data": 42 }));

        Ok(())
    }

    #[test]
    fn error_detail_is_only_exposed_on_request() {
        let error = || ApiError::internal("Failed to create order").with_detail("storage error");

        assert_eq!(error().into_body(true).error.as_deref(), Some("storage error"));
        assert_eq!(error().into_body(false).error, None);
    }

    #[test]
    fn envelope_deserializes_without_optional_fields() -> Result<(), serde_json::Error> {
        let body: ApiResponse<NoData> =
            serde_json::from_value(serde_json::json!({ "success": true }))?;

        assert!(body.success);
        assert!(body.data.is_none(), "missing data should be None");
        assert!(body.message.is_none(), "missing message should be None");

        Ok(())
    }
}

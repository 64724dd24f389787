//! 请求体 / 查询参数提取器
//!
//! 包装 `axum::Json` 与 `axum::extract::Query`，把解析失败转成
//! [`AppError`] (400 + 统一错误体)，而不是 axum 默认的纯文本响应。

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::utils::{AppError, ErrorCode};

/// JSON body extractor and response, rejecting with [`AppError`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Query string extractor, rejecting with [`AppError`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(Query(value)),
            Err(rejection) => Err(query_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection, "Rejected JSON body");
    match rejection {
        JsonRejection::MissingJsonContentType(_) => AppError::with_message(
            ErrorCode::ValidationFailed,
            "Expected request with `Content-Type: application/json`",
        ),
        JsonRejection::JsonSyntaxError(e) => {
            AppError::validation(format!("Malformed JSON body: {}", e.body_text()))
        }
        other => AppError::validation(other.body_text()),
    }
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    tracing::debug!(error = %rejection, "Rejected query string");
    AppError::validation(rejection.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use serde::Deserialize;
    use shared::models::LeaveType;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(rename = "type")]
        leave_type: LeaveType,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_accepts_valid_body() {
        let Json(payload) = Json::<Payload>::from_request(json_request(r#"{"type":"sick"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.leave_type, LeaveType::Sick);
    }

    #[tokio::test]
    async fn test_json_unknown_variant_is_validation_error() {
        let err = Json::<Payload>::from_request(json_request(r#"{"type":"maternity"}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert!(err.message.contains("maternity"));
    }

    #[tokio::test]
    async fn test_json_missing_field_and_bad_syntax() {
        let err = Json::<Payload>::from_request(json_request("{}"), &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("type"));

        let err = Json::<Payload>::from_request(json_request("{\"type\":"), &())
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_json_requires_content_type() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"type":"sick"}"#))
            .unwrap();
        let err = Json::<Payload>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_query_rejection_is_validation_error() {
        #[derive(Debug, Deserialize)]
        struct Filter {
            #[allow(dead_code)]
            limit: Option<i64>,
        }

        let req = Request::builder().uri("/?limit=ten").body(()).unwrap();
        let (mut parts, _) = req.into_parts();
        let err = Query::<Filter>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }
}

//! Extractors whose rejections render as `ApiError`, so malformed bodies,
//! path ids and query strings get the same `{"error": ...}` 400 as any
//! other validation failure.

use axum::extract::{FromRequest, FromRequestParts};

use super::ApiError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::community_recipes::rate::RateRequest;
    use crate::api::saved::save::SaveRecipeRequest;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn json_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn error_body(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_rating_value_is_validation_error() {
        let err = ApiJson::<RateRequest>::from_request(json_request("{}"), &())
            .await
            .unwrap_err();

        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("value"));
    }

    #[tokio::test]
    async fn test_malformed_recipe_id_in_body_is_validation_error() {
        let err = ApiJson::<SaveRecipeRequest>::from_request(
            json_request(r#"{"recipe_id": "not-a-uuid"}"#),
            &(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_validation_error() {
        let request = Request::builder()
            .method("POST")
            .body(Body::from(r#"{"value": 3}"#))
            .unwrap();
        let err = ApiJson::<RateRequest>::from_request(request, &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_path_id_gets_error_envelope() {
        let app: Router = Router::new().route(
            "/recipes/{id}",
            get(|ApiPath(id): ApiPath<Uuid>| async move { id.to_string() }),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/recipes/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }

    #[derive(Debug, Deserialize)]
    struct Paging {
        #[allow(dead_code)]
        page: Option<i64>,
    }

    #[tokio::test]
    async fn test_bad_query_is_validation_error() {
        let request = Request::builder()
            .uri("/?page=first")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        let err = ApiQuery::<Paging>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}

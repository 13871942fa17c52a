// apps/server/src/routes.rs
//! REST 路由

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use search_core::{DocumentService, not_found_message};

type SharedService = Arc<DocumentService>;

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/api/documents", get(list_documents))
        .route("/api/documents/{id}", get(get_document))
        .route("/api/documents/{id}/summary", get(summarize_document))
        .route("/api/search", get(search_documents))
        .with_state(service)
}

async fn list_documents(State(service): State<SharedService>) -> Response {
    Json(service.list_documents()).into_response()
}

async fn get_document(State(service): State<SharedService>, Path(id): Path<String>) -> Response {
    match service.get_document(&id) {
        Some(doc) => Json(doc).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn search_documents(
    State(service): State<SharedService>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let Some(q) = query.q.filter(|q| !q.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Query parameter 'q' is required" })),
        )
            .into_response();
    };

    Json(service.search_documents(&q)).into_response()
}

async fn summarize_document(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Response {
    let text = service
        .summarize_document(&id)
        .unwrap_or_else(|| not_found_message(&id));

    // 与文本适配层保持一致：按文本内容判断是否找到
    if text.to_lowercase().contains("not found") {
        (StatusCode::NOT_FOUND, Json(json!({ "error": text }))).into_response()
    } else {
        Json(json!({ "summary": text })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use search_core::{Document, FileSystemDocumentStore};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let date = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let documents = vec![
            Document::new(
                "policy",
                "Leave Policy",
                date,
                "1. Annual leave\n- Sick leave\nLeave requests go to HR.",
                "/docs/policy.md",
            ),
            Document::new("readme", "Readme", date, "Nothing to see", "/docs/readme.txt"),
            Document::new(
                "errata",
                "Errata",
                date,
                "- Fixed: page not found on the help link",
                "/docs/errata.txt",
            ),
        ];
        let store = FileSystemDocumentStore::from_documents(documents);
        router(Arc::new(DocumentService::new(&store)))
    }

    async fn get_json(uri: &str) -> (StatusCode, Option<Value>) {
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&bytes).unwrap())
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_list_documents() {
        let (status, body) = get_json("/api/documents").await;
        let body = body.unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[0]["id"], "policy");
        assert_eq!(body[0]["filePath"], "/docs/policy.md");
    }

    #[tokio::test]
    async fn test_get_document_found_and_missing() {
        let (status, body) = get_json("/api/documents/POLICY").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap()["title"], "Leave Policy");

        let (status, body) = get_json("/api/documents/unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_none());
    }

    #[rstest]
    #[case("/api/search")]
    #[case("/api/search?q=")]
    #[case("/api/search?q=%20%20")]
    #[tokio::test]
    async fn test_search_requires_query(#[case] uri: &str) {
        let (status, body) = get_json(uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.unwrap(), json!({ "error": "Query parameter 'q' is required" }));
    }

    #[tokio::test]
    async fn test_search_returns_ranked_results() {
        let (status, body) = get_json("/api/search?q=leave").await;
        let body = body.unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["documentId"], "policy");
        assert_eq!(body[0]["relevanceScore"], 31);
    }

    #[tokio::test]
    async fn test_summary_found_and_missing() {
        let (status, body) = get_json("/api/documents/policy/summary").await;
        assert_eq!(status, StatusCode::OK);
        let summary = body.unwrap()["summary"].as_str().unwrap().to_string();
        assert!(summary.contains("KEY SECTIONS:\n1. Annual leave\n- Sick leave\n"));

        let (status, body) = get_json("/api/documents/ghost/summary").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.unwrap(), json!({ "error": "Document 'ghost' not found." }));
    }

    #[rstest]
    #[case("/api/documents/policy/summary", StatusCode::OK, "summary")]
    #[case("/api/documents/errata/summary", StatusCode::NOT_FOUND, "error")]
    #[case("/api/documents/ghost/summary", StatusCode::NOT_FOUND, "error")]
    #[tokio::test]
    async fn test_summary_status_follows_text(
        #[case] uri: &str,
        #[case] expected_status: StatusCode,
        #[case] key: &str,
    ) {
        let (status, body) = get_json(uri).await;
        let body = body.unwrap();

        assert_eq!(status, expected_status);
        assert!(body[key].is_string());
    }

    #[tokio::test]
    async fn test_existing_summary_mentioning_not_found_is_404() {
        let (status, body) = get_json("/api/documents/errata/summary").await;
        let text = body.unwrap()["error"].as_str().unwrap().to_string();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(text.starts_with("DOCUMENT SUMMARY\n"));
        assert!(text.contains("- Fixed: page not found on the help link"));
    }
}

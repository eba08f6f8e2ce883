pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::extraction::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resume/analyze", post(handlers::handle_analyze))
        .route("/api/v1/resume/tips", post(handlers::handle_tips))
        .route(
            "/api/v1/resume/upload",
            post(handlers::handle_upload)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::engine::ResumeAnalyzer;
    use crate::extraction::test_support::build_docx;
    use crate::analysis::recommendations::{
        test_support::FixedResponse, EnrichmentSettings, RecommendationGenerator,
    };

    const DOCX_MEDIA_TYPE: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

    const RESUME: &str = "Jane Doe\njane@example.com | 555-123-4567\n\n\
        SUMMARY\nBackend engineer focused on reliable distributed systems.\n\n\
        EXPERIENCE\nSenior Engineer, Acme (2018 - 2024)\n- Led migration to Rust services\n\n\
        EDUCATION\nB.S. Computer Science, State University\n\n\
        SKILLS\nRust, Python, SQL, Docker, AWS\n";

    fn app_with(recommender: RecommendationGenerator) -> Router {
        build_router(AppState {
            analyzer: Arc::new(ResumeAnalyzer::new(recommender)),
        })
    }

    fn app() -> Router {
        app_with(RecommendationGenerator::rule_based())
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let boundary = "X-RESUME-BOUNDARY";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/resume/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-analyzer");
    }

    #[tokio::test]
    async fn test_analyze_returns_camel_case_report() {
        let response = app()
            .oneshot(json_request(
                "/api/v1/resume/analyze",
                serde_json::json!({ "text": RESUME }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert!(body["overallScore"].is_u64());
        assert_eq!(body["aiPowered"], false);
        assert!(body["sections"]["contactInfo"]["score"].is_u64());
        assert!(body["atsCompatibility"]["issues"].is_array());
        assert!(body["keywords"].as_array().unwrap().len() <= 10);
    }

    #[tokio::test]
    async fn test_analyze_empty_text_is_bad_request() {
        let response = app()
            .oneshot(json_request(
                "/api/v1/resume/analyze",
                serde_json::json!({ "text": "   " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_analyze_uses_ai_recommendations_when_available() {
        let ai = r#"{"strengths":["Clear impact"],"weaknesses":[],"recommendations":["Add metrics"]}"#;
        let recommender = RecommendationGenerator::new(
            Some(Arc::new(FixedResponse(ai.to_string()))),
            EnrichmentSettings::default(),
        );
        let response = app_with(recommender)
            .oneshot(json_request(
                "/api/v1/resume/analyze",
                serde_json::json!({ "text": RESUME }),
            ))
            .await
            .unwrap();

        let body = read_json(response).await;
        assert_eq!(body["aiPowered"], true);
        assert_eq!(body["strengths"], serde_json::json!(["Clear impact"]));
        assert_eq!(body["recommendations"], serde_json::json!(["Add metrics"]));
    }

    #[tokio::test]
    async fn test_tips_lists_sections_with_suggestions() {
        let response = app()
            .oneshot(json_request(
                "/api/v1/resume/tips",
                serde_json::json!({ "text": "just a few words about me" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        let sections: Vec<&str> = body["tips"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["section"].as_str().unwrap())
            .collect();
        assert_eq!(sections.first(), Some(&"ContactInfo"));
        assert_eq!(sections.last(), Some(&"ATS Compatibility"));
        assert!(body["overallScore"].is_u64());
    }

    #[tokio::test]
    async fn test_upload_plain_text() {
        let response = app()
            .oneshot(multipart_request(
                "resume",
                "jane.txt",
                "text/plain",
                RESUME.as_bytes(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["msg"], "Resume uploaded and analyzed successfully");
        assert_eq!(body["originalName"], "jane.txt");
        assert_eq!(body["analysis"]["sections"]["contactInfo"]["found"], true);
    }

    #[tokio::test]
    async fn test_upload_docx() {
        let body: String = RESUME
            .lines()
            .map(|line| format!(r#"<w:p><w:r><w:t xml:space="preserve">{line}</w:t></w:r></w:p>"#))
            .collect();
        let docx = build_docx(&body);

        let response = app()
            .oneshot(multipart_request("resume", "jane.docx", DOCX_MEDIA_TYPE, &docx))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["originalName"], "jane.docx");
        assert_eq!(body["analysis"]["sections"]["contactInfo"]["found"], true);
        assert_eq!(body["analysis"]["sections"]["skills"]["found"], true);
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_type() {
        let response = app()
            .oneshot(multipart_request("resume", "me.png", "image/png", b"\x89PNG"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_upload_without_resume_field() {
        let response = app()
            .oneshot(multipart_request("avatar", "a.txt", "text/plain", b"hello"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"]["message"], "No file uploaded");
    }

    #[tokio::test]
    async fn test_upload_empty_text_file() {
        let response = app()
            .oneshot(multipart_request("resume", "blank.txt", "text/plain", b"  \n "))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"]["message"], "No text content found in the file");
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_rejected() {
        let big = vec![b'a'; MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES + 1];
        let response = app()
            .oneshot(multipart_request("resume", "big.txt", "text/plain", &big))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}

//! End-to-end tests: request line in, response line out, with every
//! upstream served by a mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use librarian::generative::GenerativeClient;
use librarian::host::stdio::run_bridge;
use librarian::sources::{KnowledgeSource, SearchGroundedSource, StoreSource};
use librarian::{Request, Response, TropeAgent};
use serde_json::json;
use trope_fusion::{EvidenceSource, FusionConfig, Normalizer, SourceOutcome, SourceTag};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KNOWLEDGE_PATH: &str = "/v1beta/models/knowledge-model:generateContent";
const SEARCH_PATH: &str = "/v1beta/models/search-model:generateContent";

fn agent_for(server: &MockServer, fusion: FusionConfig) -> TropeAgent {
    let normalizer = Arc::new(Normalizer::default());
    let client = Arc::new(
        GenerativeClient::new(server.uri(), "test-key", Duration::from_secs(5))
            .unwrap_or_else(|e| panic!("client: {e}")),
    );
    let store = StoreSource::new(server.uri(), Duration::from_secs(5), Arc::clone(&normalizer))
        .unwrap_or_else(|e| panic!("store: {e}"));

    let sources: Vec<Arc<dyn EvidenceSource>> = vec![
        Arc::new(KnowledgeSource::new(
            Arc::clone(&client),
            "knowledge-model",
            Arc::clone(&normalizer),
        )),
        Arc::new(SearchGroundedSource::new(
            client,
            "search-model",
            Arc::clone(&normalizer),
        )),
        Arc::new(store),
    ];
    TropeAgent::with_sources(sources, fusion)
}

async fn mount_standard_upstreams(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(KNOWLEDGE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{
                "text": "{\"tropes\": [{\"name\": \"Hero's Journey\", \"confidence\": 0.9}]}"
            }]}}]
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tropes": [
                {"name": "Hero's Journey", "confidence": 0.95},
                {"name": "Magic System", "confidence": 0.7}
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_search_failure_still_fuses_knowledge_and_store() {
    let server = MockServer::start().await;
    mount_standard_upstreams(&server).await;
    let agent = agent_for(&server, FusionConfig::default());

    let response = agent
        .process(&Request::new("The Name of the Wind", "Patrick Rothfuss").with_top_n(2))
        .await;

    assert_eq!(
        serde_json::to_value(&response).unwrap_or_default(),
        json!({
            "status": "success",
            "tropes": [
                {"name": "Hero's Journey", "confidence": 1.0, "sources": ["knowledge", "store"]},
                {"name": "Magic System", "confidence": 0.84, "sources": ["store"]}
            ]
        })
    );
}

#[tokio::test]
async fn test_processed_response_survives_json_round_trip() {
    let server = MockServer::start().await;
    mount_standard_upstreams(&server).await;
    let agent = agent_for(&server, FusionConfig::default());

    let response = agent.process(&Request::new("Mistborn", "Brandon Sanderson")).await;
    match &response {
        Response::Success { tropes } => {
            assert_eq!(tropes.len(), 2);
            assert!(tropes.iter().any(|t| t.first_seen_order > 0));
        }
        Response::Error { message } => panic!("Expected success, got error: {message}"),
    }

    let line = serde_json::to_string(&response).unwrap_or_else(|e| panic!("serialize: {e}"));
    let parsed: Response =
        serde_json::from_str(&line).unwrap_or_else(|e| panic!("deserialize: {e}"));
    assert_eq!(parsed, response);
}

#[tokio::test]
async fn test_detailed_identification_reports_search_failure() {
    let server = MockServer::start().await;
    mount_standard_upstreams(&server).await;
    let agent = agent_for(&server, FusionConfig::default());

    let id = agent
        .identify_detailed("The Name of the Wind", "Patrick Rothfuss", 5)
        .await
        .unwrap_or_else(|e| panic!("identify: {e}"));

    let tags: Vec<SourceTag> = id.reports.iter().map(|r| r.tag).collect();
    assert_eq!(tags, SourceTag::all().to_vec());
    assert!(matches!(id.reports[1].outcome, SourceOutcome::Failed(_)));
    assert!(id.reports[0].outcome.is_evidence());
    assert!(id.reports[2].outcome.is_evidence());
}

#[tokio::test]
async fn test_slow_store_is_dropped_by_fusion_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(KNOWLEDGE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{
                "text": "{\"tropes\": [{\"name\": \"Prophecy\", \"confidence\": 0.5}]}"
            }]}}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "{\"tropes\": []}"}]}}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"tropes": [{"name": "Dark Lord", "confidence": 1.0}]}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let fusion = FusionConfig {
        store_timeout_secs: 1,
        ..Default::default()
    };
    let agent = agent_for(&server, fusion);

    match agent.process(&Request::new("t", "a")).await {
        Response::Success { tropes } => {
            let names: Vec<&str> = tropes.iter().map(|t| t.name.as_str()).collect();
            assert_eq!(names, vec!["Prophecy"]);
        }
        Response::Error { message } => panic!("Expected success, got error: {message}"),
    }
}

#[tokio::test]
async fn test_bridge_answers_each_line_in_order() {
    let server = MockServer::start().await;
    mount_standard_upstreams(&server).await;
    let agent = agent_for(&server, FusionConfig::default());

    let input = concat!(
        "{\"title\": \"Mistborn\", \"author\": \"Brandon Sanderson\", \"top_n\": 1}\n",
        "{\"author\": \"Brandon Sanderson\"}\n",
        "not json\n",
        "{\"title\": \"Mistborn\", \"author\": \"Brandon Sanderson\", \"top_n\": 0}\n",
    );
    let mut output = Vec::new();
    run_bridge(&agent, input.as_bytes(), &mut output)
        .await
        .unwrap_or_else(|e| panic!("bridge: {e}"));

    let lines: Vec<serde_json::Value> = String::from_utf8_lossy(&output)
        .lines()
        .map(|l| serde_json::from_str(l).unwrap_or_default())
        .collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0]["tropes"][0]["name"], "Hero's Journey");
    assert_eq!(lines[0]["tropes"].as_array().map(Vec::len), Some(1));
    assert_eq!(
        lines[1],
        json!({"status": "error", "message": "Both 'title' and 'author' are required fields"})
    );
    assert_eq!(lines[2]["status"], "error");
    assert!(lines[2]["message"]
        .as_str()
        .is_some_and(|m| m.starts_with("Error processing request: ")));
    assert_eq!(lines[3], json!({"status": "success", "tropes": []}));
}

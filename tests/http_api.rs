//! End-to-end checks of the REST router through `tower::ServiceExt::oneshot`,
//! including the chat relay against a local stand-in for the Messages API.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use vpp_matcher::chat::ChatClient;
use vpp_matcher::config::{ChatConfig, Config};
use vpp_matcher::programs::ProgramRegistry;
use vpp_matcher::server::{router, ApiState};

fn app() -> Router {
    router(ApiState::new(
        Config::default(),
        ProgramRegistry::with_defaults(),
        None,
    ))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router dispatch");
    let status = response.status();
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let payload: Value = serde_json::from_slice(&body).expect("json");
    (status, payload)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Serves a fixed Messages API reply on an ephemeral port and returns its URL.
async fn fake_upstream(status: StatusCode, reply: Value) -> String {
    let upstream = Router::new().route(
        "/v1/messages",
        post(move || {
            let reply = reply.clone();
            async move { (status, Json(reply)) }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.expect("serve");
    });
    format!("http://{addr}/v1/messages")
}

fn app_with_chat(base_url: String) -> Router {
    let chat_config = ChatConfig {
        base_url,
        ..ChatConfig::default()
    };
    let client = ChatClient::new(&chat_config, "sk-ant-test-key").expect("client");
    let config = Config {
        chat: chat_config,
        ..Config::default()
    };
    router(ApiState::new(
        config,
        ProgramRegistry::with_defaults(),
        Some(client),
    ))
}

#[tokio::test]
async fn health_reports_catalog_size_and_chat_state() {
    let (status, payload) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["ok"], json!(true));
    assert_eq!(payload["data"]["programs"], json!(11));
    assert_eq!(payload["data"]["chat_enabled"], json!(false));
}

#[tokio::test]
async fn match_ranks_programs_for_sydney_tesla_owner() {
    let request = post_json(
        "/v1/match",
        json!({
            "battery": "Tesla Powerwall 2",
            "location": "2000",
            "solar": 6.6,
            "preference": "open"
        }),
    );
    let (status, payload) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    let data = &payload["data"];
    assert_eq!(data["summary"]["region"], json!("NSW"));
    assert_eq!(data["summary"]["top_program"], json!("amber-smartshift"));
    assert_eq!(data["matches"][0]["program"]["id"], json!("amber-smartshift"));
    assert_eq!(data["matches"][0]["percentage"], json!(90));

    let scores = data["matches"]
        .as_array()
        .expect("matches array")
        .iter()
        .map(|m| m["score"].as_i64().expect("score"))
        .collect::<Vec<_>>();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    assert!(scores.iter().all(|score| *score > 0));
}

#[tokio::test]
async fn match_defaults_to_top_filter() {
    let request = post_json(
        "/v1/match",
        json!({"battery": "Tesla Powerwall 2", "location": "3000", "solar": 10}),
    );
    let (status, payload) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    let returned = payload["data"]["matches"].as_array().expect("matches").len();
    let total = payload["data"]["summary"]["total"].as_u64().expect("total");
    assert_eq!(returned, 4);
    assert!(total > 4);
}

#[tokio::test]
async fn match_top_filter_limits_results() {
    let request = post_json(
        "/v1/match",
        json!({
            "battery": "Sungrow SBR096",
            "location": "4000",
            "preference": "keep",
            "filter": "top"
        }),
    );
    let (status, payload) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    let matches = payload["data"]["matches"].as_array().expect("matches");
    assert!(matches.len() <= 4);
    assert!(payload["data"]["summary"]["total"].as_u64().expect("total") >= matches.len() as u64);
}

#[tokio::test]
async fn match_rejects_bad_postcode_and_unknown_preference() {
    let bad_postcode = post_json(
        "/v1/match",
        json!({"battery": "Tesla", "location": "12", "preference": "open"}),
    );
    let (status, payload) = send(app(), bad_postcode).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["ok"], json!(false));
    assert!(payload["error"].as_str().expect("error").contains("postcode"));

    let bad_preference = post_json(
        "/v1/match",
        json!({"battery": "Tesla", "location": "3000", "preference": "sometimes"}),
    );
    let (status, _) = send(app(), bad_preference).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn program_lookup_returns_404_for_unknown_id() {
    let (status, payload) = send(app(), get("/v1/programs/amber-smartshift")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["data"]["provider"], json!("Amber Electric"));

    let (status, payload) = send(app(), get("/v1/programs/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(payload["ok"], json!(false));
}

#[tokio::test]
async fn programs_can_be_filtered_by_region_and_lockin() {
    let (status, payload) = send(app(), get("/v1/programs?region=TAS&independent=true")).await;
    assert_eq!(status, StatusCode::OK);
    let ids = payload["data"]
        .as_array()
        .expect("programs")
        .iter()
        .map(|p| p["id"].as_str().expect("id").to_string())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["shinehub-vpp", "sonnen-connect"]);

    let (status, payload) = send(app(), get("/v1/programs?region=Mars")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["ok"], json!(false));
}

#[tokio::test]
async fn malformed_query_and_body_use_error_envelope() {
    let (status, payload) = send(app(), get("/v1/programs?independent=yes")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["ok"], json!(false));
    assert!(payload["error"].is_string());

    let missing_battery = post_json("/v1/match", json!({"location": "2000"}));
    let (status, payload) = send(app(), missing_battery).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["ok"], json!(false));
    assert!(payload["error"].as_str().expect("error").contains("battery"));

    let not_json = Request::builder()
        .method("POST")
        .uri("/v1/detect")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let (status, payload) = send(app(), not_json).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["ok"], json!(false));
}

#[tokio::test]
async fn region_lookup_flags_invalid_postcodes() {
    let (_, payload) = send(app(), get("/v1/regions/0800")).await;
    assert_eq!(payload["data"]["region"], json!("NT"));
    assert_eq!(payload["data"]["valid"], json!(true));
    assert_eq!(payload["data"]["earnings_multiplier"].as_f64(), Some(0.7));

    let (_, payload) = send(app(), get("/v1/regions/abcd")).await;
    assert_eq!(payload["data"]["region"], json!("NSW"));
    assert_eq!(payload["data"]["valid"], json!(false));
}

#[tokio::test]
async fn detect_reads_signals_from_free_text() {
    let request = post_json(
        "/v1/detect",
        json!({"text": "Tesla Powerwall in 5000 with 6.6kW of solar, happy to switch retailer"}),
    );
    let (status, payload) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["data"]["battery_brand"], json!("tesla"));
    assert_eq!(payload["data"]["postcode"], json!("5000"));
    assert_eq!(payload["data"]["solar_mentioned"], json!(true));
    assert_eq!(payload["data"]["retailer_preference"], json!("open"));
}

#[tokio::test]
async fn qualify_strips_sentinel_and_ranks_profile() {
    let request = post_json(
        "/v1/qualify",
        json!({
            "text": "Perfect, let me find the best programs for you!\nQUALIFIED: battery=Tesla Powerwall 2|location=2000|solar=6.6|preference=open"
        }),
    );
    let (status, payload) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    let data = &payload["data"];
    assert_eq!(
        data["message"],
        json!("Perfect, let me find the best programs for you!")
    );
    assert_eq!(data["qualified"]["location"], json!("2000"));
    assert_eq!(
        data["results"]["matches"][0]["program"]["id"],
        json!("amber-smartshift")
    );
}

#[tokio::test]
async fn qualify_without_sentinel_returns_message_only() {
    let request = post_json("/v1/qualify", json!({"text": "What battery do you have?"}));
    let (status, payload) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["data"]["message"], json!("What battery do you have?"));
    assert!(payload["data"]["qualified"].is_null());
    assert!(payload["data"]["results"].is_null());
}

#[tokio::test]
async fn chat_is_unavailable_without_api_key() {
    let request = post_json(
        "/v1/chat",
        json!({"messages": [{"role": "user", "content": "hi"}]}),
    );
    let (status, payload) = send(app(), request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(payload["ok"], json!(false));
}

#[tokio::test]
async fn chat_relays_reply_and_ranks_qualified_profile() {
    let base_url = fake_upstream(
        StatusCode::OK,
        json!({
            "content": [{
                "type": "text",
                "text": "Great, here are your matches.\nQUALIFIED: battery=Sungrow|location=5000|solar=10|preference=open"
            }]
        }),
    )
    .await;
    let request = post_json(
        "/v1/chat",
        json!({"messages": [{"role": "user", "content": "Sungrow in Adelaide, 10kW solar"}]}),
    );
    let (status, payload) = send(app_with_chat(base_url), request).await;
    assert_eq!(status, StatusCode::OK);
    let data = &payload["data"];
    assert_eq!(data["message"], json!("Great, here are your matches."));
    assert_eq!(data["results"]["summary"]["region"], json!("SA"));
    assert!(!data["results"]["matches"]
        .as_array()
        .expect("matches")
        .is_empty());
}

#[tokio::test]
async fn chat_maps_upstream_failure_to_bad_gateway() {
    let base_url = fake_upstream(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": {"type": "api_error", "message": "overloaded"}}),
    )
    .await;
    let request = post_json(
        "/v1/chat",
        json!({"messages": [{"role": "user", "content": "hello"}]}),
    );
    let (status, payload) = send(app_with_chat(base_url.clone()), request).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(payload["error"].as_str().expect("error").contains("500"));

    let empty = post_json("/v1/chat", json!({"messages": []}));
    let (status, _) = send(app_with_chat(base_url), empty).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

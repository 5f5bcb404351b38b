//! End-to-end behaviour of every route over a real socket.

use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn string_routes() {
    let server = common::spawn_server(common::config_with_upstream(None)).await;
    let client = common::client();

    let res = client
        .post(server.url("/string/uppercase"))
        .json(&json!({ "s": "hello, world" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "v": "HELLO, WORLD" }));

    let res = client
        .post(server.url("/string/uppercase"))
        .json(&json!({ "s": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({ "v": "", "err": "empty string" })
    );

    let res = client
        .post(server.url("/string/count"))
        .json(&json!({ "s": "héllo" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "v": 6 }));

    let res = client
        .post(server.url("/string/count"))
        .body("{\"s\":")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn fib_route() {
    let server = common::spawn_server(common::config_with_upstream(None)).await;
    let client = common::client();

    let res = client.get(server.url("/fib/90")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_eq!(res.text().await.unwrap(), "2880067194370816120");

    let res = client.get(server.url("/fib/100")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "354224848179261915075");

    for bad in ["/fib/abc", "/fib/-3"] {
        let res = client.get(server.url(bad)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{bad}");
    }

    let rendered = server.metrics.render();
    assert_eq!(common::counter(&rendered, "fib", "fib", false), 2);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn headers_route() {
    let server = common::spawn_server(common::config_with_upstream(None)).await;
    let client = common::client();

    let res = client
        .post(server.url("/headers"))
        .header("x-trace-tag", "alpha")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/plain; charset=utf-8");
    let body = res.text().await.unwrap();
    assert!(body.lines().any(|line| line == "X-Trace-Tag: alpha"), "{body}");
    assert!(!body.lines().any(|line| line.starts_with("Host:")), "{body}");
    assert!(body.ends_with('\n'));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn ip_route_reports_address_or_error() {
    let ok_upstream = common::start_upstream(|| async { (200, "203.0.113.9\n".to_string()) }).await;
    let server = common::spawn_server(common::config_with_upstream(Some(ok_upstream))).await;
    let res = common::client().get(server.url("/ip")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "ip": "203.0.113.9" }));
    server.stop().await.unwrap();

    let failing = common::start_upstream(|| async { (500, "boom".to_string()) }).await;
    let server = common::spawn_server(common::config_with_upstream(Some(failing))).await;
    let res = common::client().get(server.url("/ip")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await.unwrap();
    assert!(body["error"].is_string(), "{body}");
    assert!(body.get("ip").is_none());

    let rendered = server.metrics.render();
    assert_eq!(common::counter(&rendered, "ip", "getip", true), 1);
    assert_eq!(common::counter(&rendered, "ip", "getip", false), 0);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn cors_and_preflight() {
    let server = common::spawn_server(common::config_with_upstream(None)).await;
    let client = common::client();

    let res = client
        .request(reqwest::Method::OPTIONS, server.url("/string/uppercase"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert_eq!(res.headers()["access-control-allow-methods"], "GET, POST, OPTIONS");
    assert_eq!(res.headers()["access-control-allow-headers"], "Origin, Content-Type");
    assert!(res.text().await.unwrap().is_empty());

    let rendered = server.metrics.render();
    assert_eq!(common::counter(&rendered, "string", "uppercase", false), 0);
    assert_eq!(common::counter(&rendered, "string", "uppercase", true), 0);

    let res = client.get(server.url("/missing")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn metrics_and_probes() {
    let server = common::spawn_server(common::config_with_upstream(None)).await;
    let client = common::client();

    client
        .post(server.url("/string/count"))
        .json(&json!({ "s": "abc" }))
        .send()
        .await
        .unwrap();

    let res = client.get(server.url("/metrics")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert!(body.contains("api_string_request_count"));
    assert!(body.contains("api_string_request_latency_seconds"));
    assert_eq!(common::counter(&body, "string", "count", false), 1);

    let res = client.get(server.url("/live")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let res = client.get(server.url("/ready")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "{}");

    server.stop().await.unwrap();
}

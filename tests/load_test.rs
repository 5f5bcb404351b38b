//! Concurrent load against a running server: results match sequential
//! execution and metric totals are exact.

use std::time::{Duration, Instant};

use num_bigint::BigUint;
use serde_json::{json, Value};

mod common;

fn fib_reference(n: u64) -> BigUint {
    let (mut a, mut b) = (BigUint::from(0u8), BigUint::from(1u8));
    for _ in 0..n {
        let next = &a + &b;
        a = std::mem::replace(&mut b, next);
    }
    a
}

#[tokio::test]
async fn test_concurrent_calls() {
    let server = common::spawn_server(common::config_with_upstream(None)).await;
    let client = common::client();

    let concurrency = 10;
    let requests_per_task = 5;
    let total_requests = concurrency * requests_per_task;
    let start = Instant::now();

    let mut tasks = Vec::new();
    for task in 0..concurrency {
        let client = client.clone();
        let base = server.url("");
        tasks.push(tokio::spawn(async move {
            let mut latencies = Vec::new();
            for i in 0..requests_per_task {
                let n = (task * requests_per_task + i) as u64 * 3;
                let req_start = Instant::now();
                let res = client.get(format!("{base}/fib/{n}")).send().await.unwrap();
                assert!(res.status().is_success());
                let body = res.text().await.unwrap();
                latencies.push(req_start.elapsed());
                assert_eq!(body, fib_reference(n).to_string(), "fib({n})");

                // Every other caller hits the empty-string failure path.
                let s = if i % 2 == 0 { "load" } else { "" };
                let res = client
                    .post(format!("{base}/string/uppercase"))
                    .json(&json!({ "s": s }))
                    .send()
                    .await
                    .unwrap();
                let body: Value = res.json().await.unwrap();
                if s.is_empty() {
                    assert_eq!(body, json!({ "v": "", "err": "empty string" }));
                } else {
                    assert_eq!(body, json!({ "v": "LOAD" }));
                }
            }
            latencies
        }));
    }

    let mut all_latencies: Vec<Duration> = Vec::new();
    for task in tasks {
        all_latencies.extend(task.await.unwrap());
    }
    let duration = start.elapsed();

    all_latencies.sort();
    let p50 = all_latencies[all_latencies.len() / 2];
    let p99 = all_latencies[(all_latencies.len() as f64 * 0.99) as usize];
    println!("\n--- Load Test Results ---");
    println!("Total Requests: {}", total_requests * 2);
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!("P50 fib:        {:?}", p50);
    println!("P99 fib:        {:?}", p99);
    println!("-------------------------\n");

    let rendered = server.metrics.render();
    let expected_ok = (concurrency * ((requests_per_task + 1) / 2)) as u64;
    let expected_err = (concurrency * (requests_per_task / 2)) as u64;
    assert_eq!(common::counter(&rendered, "fib", "fib", false), total_requests as u64);
    assert_eq!(common::counter(&rendered, "fib", "fib", true), 0);
    assert_eq!(common::counter(&rendered, "string", "uppercase", false), expected_ok);
    assert_eq!(common::counter(&rendered, "string", "uppercase", true), expected_err);

    server.stop().await.unwrap();
}

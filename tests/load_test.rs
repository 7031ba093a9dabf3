//! Load testing for the postback receiver.

use std::collections::HashSet;
use std::time::Instant;

use serde_json::Value;

mod common;

#[tokio::test]
async fn test_concurrent_postbacks_each_persist_one_line() {
    let receiver = common::start_receiver().await;

    let concurrency = 20;
    let requests_per_task = 10;
    let total_requests = concurrency * requests_per_task;

    let client = common::client();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for task_id in 0..concurrency {
        let client = client.clone();
        let url = receiver.url("/sailthru_postback");
        tasks.push(tokio::spawn(async move {
            let mut ok = 0;
            for n in 0..requests_per_task {
                let res = client
                    .post(&url)
                    .query(&[("task", task_id.to_string()), ("n", n.to_string())])
                    .header("Content-Type", "application/json")
                    .body(format!(r#"{{"event":"open","seq":{}}}"#, n))
                    .send()
                    .await;
                if matches!(res, Ok(ref r) if r.status().is_success()) {
                    ok += 1;
                }
            }
            ok
        }));
    }

    let mut successes = 0;
    for task in tasks {
        successes += task.await.unwrap();
    }
    let duration = start.elapsed();

    println!("\n--- Load Test Results ---");
    println!("Total Requests: {}", total_requests);
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!(
        "Requests/sec:   {:.2}",
        total_requests as f64 / duration.as_secs_f64()
    );
    println!("-------------------------\n");

    assert_eq!(successes, total_requests);

    // Lines written across a local midnight land in two files; count them all.
    let lines = receiver.persisted_lines();
    assert_eq!(lines.len(), total_requests);

    let mut seen = HashSet::new();
    for line in &lines {
        let (_, json) = line.split_once(" | ").unwrap();
        let envelope: Value = serde_json::from_str(json).expect("line is whole");
        let params = &envelope["captured"]["query_params"];
        seen.insert((
            params["task"].as_str().unwrap().to_string(),
            params["n"].as_str().unwrap().to_string(),
        ));
    }
    assert_eq!(seen.len(), total_requests);
}

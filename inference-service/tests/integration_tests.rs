//! Integration tests for the inference service.
//!
//! These run against a live server and are ignored by default:
//! 1. `cargo run -p trainer`
//! 2. `cargo run -p inference-service`
//! 3. `cargo test -p inference-service --test integration_tests -- --ignored`

fn base_url() -> String {
    std::env::var("PREDICT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn sample_record() -> serde_json::Value {
    serde_json::json!({
        "age": 63, "sex": 1, "cp": 3, "trestbps": 145, "chol": 233,
        "fbs": 1, "restecg": 0, "thalach": 150, "exang": 0,
        "oldpeak": 2.3, "slope": 0, "ca": 0, "thal": 1
    })
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_health_endpoint() {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
#[ignore = "Requires running server with a trained artifact"]
async fn test_info_endpoint() {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/info", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["model_path"].is_string());
    assert!(body["model_type"].is_string());
    assert!(body["features"].is_array());
}

#[tokio::test]
#[ignore = "Requires running server with a trained artifact"]
async fn test_predict_endpoint() {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/predict", base_url()))
        .json(&sample_record())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["heart_disease"].is_boolean());
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_predict_rejects_incomplete_record() {
    let mut record = sample_record();
    record.as_object_mut().unwrap().remove("age");

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/predict", base_url()))
        .json(&record)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
}

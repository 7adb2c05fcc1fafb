use axum::http::StatusCode;
use rstest::*;
use serde_json::json;

use crate::server::types::ApiResponse;
use crate::tests::common::{wait_for_status, write_artifact, TestConfigBuilder, TestServices};
use crate::types::artifact::ArtifactType;
use crate::types::call_id::CallId;
use crate::types::job::{CallStatus, CleanupReport, InputDocument, PodSpec, ScoreAccepted, StatusReport};

#[fixture]
async fn setup_server() -> TestServices {
    TestConfigBuilder::new().configure_api_server().build().await
}

fn hartmann6_request() -> serde_json::Value {
    json!({"inputs": {"x1": 0.1, "x2": 0.2, "x3": 0.3, "x4": 0.4, "x5": 0.5, "x6": 0.6}})
}

async fn submit(
    client: &reqwest::Client,
    base_url: &str,
    function: &str,
    body: &serde_json::Value,
) -> reqwest::Response {
    client.post(format!("{}/api/v1/score/{}", base_url, function)).json(body).send().await.unwrap()
}

async fn submit_and_wait(client: &reqwest::Client, services: &TestServices) -> CallId {
    let response = submit(client, &services.base_url(), "Hartmann6", &hartmann6_request()).await;
    assert_eq!(response.status().as_u16(), StatusCode::ACCEPTED.as_u16());
    let body: ApiResponse<ScoreAccepted> = response.json().await.unwrap();
    let call_uuid = body.data.unwrap().call_uuid;
    wait_for_status(client, &services.base_url(), &call_uuid, CallStatus::Succeeded).await;
    call_uuid
}

#[rstest]
#[tokio::test]
async fn test_async_score_lifecycle(#[future] setup_server: TestServices) {
    let services = setup_server.await;
    let client = reqwest::Client::new();
    let base_url = services.base_url();

    let response = submit(&client, &base_url, "Hartmann6", &hartmann6_request()).await;
    assert_eq!(response.status().as_u16(), StatusCode::ACCEPTED.as_u16());
    let body: ApiResponse<ScoreAccepted> = response.json().await.unwrap();
    assert!(body.success);
    let accepted = body.data.unwrap();
    assert_eq!(accepted.status, CallStatus::Running);
    assert!(accepted.call_uuid.as_str().starts_with("wsm-"));
    assert_eq!(body.message, Some(format!("Call {} started", accepted.call_uuid)));

    let call_uuid = accepted.call_uuid;
    let input: InputDocument = serde_json::from_slice(
        &std::fs::read(services.artifact_path(&call_uuid, ArtifactType::ModelInput)).unwrap(),
    )
    .unwrap();
    assert_eq!(input.call_uuid, call_uuid);
    assert_eq!(input.inputs.len(), 6);

    let report = wait_for_status(&client, &base_url, &call_uuid, CallStatus::Succeeded).await;
    assert_eq!(report.error, None);

    // Retrieval without cleanup keeps the artifacts
    let response = client.get(format!("{}/api/v1/calls/{}/result", base_url, call_uuid)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), StatusCode::OK.as_u16());
    assert_eq!(response.headers()["content-type"], "text/csv");
    let csv = response.text().await.unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines[0], "metric_name,mean,sem");
    assert!(lines[1].starts_with("hartmann6,-"));
    assert!(lines[2].starts_with("l2norm,"));
    assert!(services.artifact_path(&call_uuid, ArtifactType::ModelOutput).exists());

    let response =
        client.get(format!("{}/api/v1/calls/{}/result?cleanup=true", base_url, call_uuid)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), StatusCode::OK.as_u16());
    assert_eq!(response.text().await.unwrap(), csv);

    assert!(!services.artifact_path(&call_uuid, ArtifactType::ModelInput).exists());
    assert!(!services.artifact_path(&call_uuid, ArtifactType::ModelOutput).exists());
    assert!(!services.config.layout().call_dir(&call_uuid).exists());

    let response = client.get(format!("{}/api/v1/calls/{}/status", base_url, call_uuid)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), StatusCode::NOT_FOUND.as_u16());
    let body: ApiResponse<StatusReport> = response.json().await.unwrap();
    assert!(!body.success);
    assert_eq!(body.data.unwrap().status, CallStatus::NotFound);
}

#[rstest]
#[tokio::test]
async fn test_run_id_is_appended_to_call_uuid(#[future] setup_server: TestServices) {
    let services = setup_server.await;
    let client = reqwest::Client::new();

    let body = json!({"inputs": {"x1": 1.0, "x2": 1.0, "x3": 1.0, "x4": 1.0}, "run_id": "run_7"});
    let response = submit(&client, &services.base_url(), "colville", &body).await;

    assert_eq!(response.status().as_u16(), StatusCode::ACCEPTED.as_u16());
    let body: ApiResponse<ScoreAccepted> = response.json().await.unwrap();
    assert!(body.data.unwrap().call_uuid.as_str().ends_with("-run_7"));
}

#[rstest]
#[case("Hartmann6", json!({"inputs": {"x1": 0.1}}), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(
    "Colville",
    json!({"inputs": {"x1": 1, "x2": 1, "x3": 1, "x4": 1}, "run_id": "../up"}),
    StatusCode::UNPROCESSABLE_ENTITY
)]
#[case("Colville", json!({"x1": 1, "x2": 1, "x3": 1, "x4": 1}), StatusCode::UNPROCESSABLE_ENTITY)]
#[case("Rosenbrock", json!({"inputs": {}}), StatusCode::NOT_FOUND)]
#[tokio::test]
async fn test_invalid_score_requests_leave_no_artifacts(
    #[future] setup_server: TestServices,
    #[case] function: &str,
    #[case] body: serde_json::Value,
    #[case] expected_status: StatusCode,
) {
    let services = setup_server.await;

    let response = submit(&reqwest::Client::new(), &services.base_url(), function, &body).await;

    assert_eq!(response.status().as_u16(), expected_status.as_u16());
    let body: ApiResponse = response.json().await.unwrap();
    assert!(!body.success);
    assert_eq!(std::fs::read_dir(services.data_dir.path()).unwrap().count(), 0);
    assert!(services.config.tracker().is_empty().await);
}

#[rstest]
#[case("bad.id")]
#[case("wsm%2F..%2Fetc")]
#[tokio::test]
async fn test_invalid_call_uuid_is_rejected(#[future] setup_server: TestServices, #[case] call_uuid: &str) {
    let services = setup_server.await;

    let response = reqwest::get(format!("{}/api/v1/calls/{}/status", services.base_url(), call_uuid)).await.unwrap();

    assert_eq!(response.status().as_u16(), StatusCode::BAD_REQUEST.as_u16());
    let body: ApiResponse = response.json().await.unwrap();
    assert!(body.message.unwrap().starts_with("Invalid call id"));
}

#[rstest]
#[tokio::test]
async fn test_result_of_unknown_call_is_not_found(#[future] setup_server: TestServices) {
    let services = setup_server.await;

    let response = reqwest::get(format!("{}/api/v1/calls/wsm-2020-01-01-00-00-00-abcde/result", services.base_url()))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), StatusCode::NOT_FOUND.as_u16());
}

/// A call whose input exists without output is running, even when this
/// process never issued it.
#[rstest]
#[tokio::test]
async fn test_result_of_running_call_conflicts(#[future] setup_server: TestServices) {
    let services = setup_server.await;
    let call_uuid = CallId::parse("wsm-2020-01-01-00-00-00-abcde").unwrap();
    write_artifact(&services.artifact_path(&call_uuid, ArtifactType::ModelInput), b"{}").await;

    let status = reqwest::get(format!("{}/api/v1/calls/{}/status", services.base_url(), call_uuid)).await.unwrap();
    let body: ApiResponse<StatusReport> = status.json().await.unwrap();
    assert_eq!(body.data.unwrap().status, CallStatus::Running);

    let response = reqwest::get(format!("{}/api/v1/calls/{}/result", services.base_url(), call_uuid)).await.unwrap();
    assert_eq!(response.status().as_u16(), StatusCode::CONFLICT.as_u16());
    let body: ApiResponse = response.json().await.unwrap();
    assert!(body.message.unwrap().contains("still running"));

    let response = reqwest::Client::new()
        .delete(format!("{}/api/v1/calls/{}", services.base_url(), call_uuid))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), StatusCode::CONFLICT.as_u16());
    assert!(services.artifact_path(&call_uuid, ArtifactType::ModelInput).exists());
}

#[rstest]
#[tokio::test]
async fn test_output_left_by_previous_process_is_served(#[future] setup_server: TestServices) {
    let services = setup_server.await;
    let call_uuid = CallId::parse("wsm-2020-01-01-00-00-00-abcde").unwrap();
    write_artifact(&services.artifact_path(&call_uuid, ArtifactType::ModelOutput), b"metric_name,mean,sem\n").await;

    let response = reqwest::get(format!("{}/api/v1/calls/{}/result", services.base_url(), call_uuid)).await.unwrap();

    assert_eq!(response.status().as_u16(), StatusCode::OK.as_u16());
    assert_eq!(response.text().await.unwrap(), "metric_name,mean,sem\n");
}

#[rstest]
#[tokio::test]
async fn test_pod_spec_is_written_and_cleaned_up() {
    let services = TestConfigBuilder::new().write_pod_spec(true).configure_api_server().build().await;
    let client = reqwest::Client::new();

    let call_uuid = submit_and_wait(&client, &services).await;

    let pod_spec_path = services.artifact_path(&call_uuid, ArtifactType::ModelPodSpec);
    let pod_spec: PodSpec = serde_json::from_slice(&std::fs::read(&pod_spec_path).unwrap()).unwrap();
    assert_eq!(pod_spec.call_uuid, call_uuid);
    assert_eq!(pod_spec.function.to_string(), "Hartmann6");
    assert!(pod_spec.output_path.ends_with(&format!("output_{}.csv", call_uuid)));

    let response =
        client.delete(format!("{}/api/v1/calls/{}", services.base_url(), call_uuid)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), StatusCode::OK.as_u16());
    let body: ApiResponse<CleanupReport> = response.json().await.unwrap();
    assert_eq!(body.data.unwrap().removed, vec!["model_input", "model_output", "model_pod_spec"]);
    assert!(!pod_spec_path.exists());

    let response =
        client.delete(format!("{}/api/v1/calls/{}", services.base_url(), call_uuid)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), StatusCode::NOT_FOUND.as_u16());
}

#[rstest]
#[case(None, false)]
#[case(Some("false"), true)]
#[tokio::test]
async fn test_configured_cleanup_on_retrieval(#[case] query: Option<&str>, #[case] kept: bool) {
    let services = TestConfigBuilder::new().cleanup_on_retrieval(true).configure_api_server().build().await;
    let client = reqwest::Client::new();
    let call_uuid = submit_and_wait(&client, &services).await;

    let mut url = format!("{}/api/v1/calls/{}/result", services.base_url(), call_uuid);
    if let Some(cleanup) = query {
        url.push_str(&format!("?cleanup={}", cleanup));
    }
    let response = client.get(url).send().await.unwrap();

    assert_eq!(response.status().as_u16(), StatusCode::OK.as_u16());
    assert_eq!(services.artifact_path(&call_uuid, ArtifactType::ModelOutput).exists(), kept);
}

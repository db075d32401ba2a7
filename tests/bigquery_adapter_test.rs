//! Integration tests for the BigQuery source against a mock REST API

mod common;

use common::predicate;
use mockito::{Matcher, Server};
use quarry::adapters::bigquery::BigQuerySource;
use quarry::adapters::source::RowSource;
use quarry::config::{secret_string, BigQueryConfig};
use quarry::domain::{BatchRow, RowQuery, SourceError};

fn config(server: &Server) -> BigQueryConfig {
    BigQueryConfig {
        project_id: "proj".to_string(),
        access_token: Some(secret_string("test-token".to_string())),
        api_base_url: server.url(),
        timeout_seconds: 5,
        ..Default::default()
    }
}

fn rows_json(rows: &[(&str, &str, &str)]) -> String {
    let rows: Vec<String> = rows
        .iter()
        .map(|(cep, lat, lon)| format!(r#"{{"f":[{{"v":"{cep}"}},{{"v":"{lat}"}},{{"v":"{lon}"}}]}}"#))
        .collect();
    format!("[{}]", rows.join(","))
}

#[tokio::test]
async fn test_count_sends_token_and_parses_integer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/projects/proj/queries")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::PartialJsonString(
            r#"{"useLegacySql": false}"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"jobReference":{"projectId":"proj","jobId":"job_1"},
                "jobComplete":true,"totalRows":"1","rows":[{"f":[{"v":"90123456"}]}]}"#,
        )
        .create_async()
        .await;

    let source = BigQuerySource::new(&config(&server)).unwrap();
    let count = source.count(&predicate()).await.unwrap();

    assert_eq!(count, 90_123_456);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_count_without_rows_is_empty_result() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/projects/proj/queries")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"jobReference":{"projectId":"proj","jobId":"job_1"},"jobComplete":true}"#)
        .create_async()
        .await;

    let source = BigQuerySource::new(&config(&server)).unwrap();
    let err = source.count(&predicate()).await.unwrap_err();
    assert!(matches!(err, SourceError::EmptyResult(_)));
}

#[tokio::test]
async fn test_fetch_follows_page_tokens() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/projects/proj/queries")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"jobReference":{{"projectId":"proj","jobId":"job_2","location":"US"}},
                "jobComplete":true,"pageToken":"page-2","rows":{}}}"#,
            rows_json(&[("01001000", "-23.55", "-46.63"), ("01001001", "-23.56", "-46.64")])
        ))
        .create_async()
        .await;
    let page_two = server
        .mock("GET", "/projects/proj/queries/job_2")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("pageToken".into(), "page-2".into()),
            Matcher::UrlEncoded("location".into(), "US".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"jobComplete":true,"rows":{}}}"#,
            rows_json(&[("01001002", "-23.57", "-46.65")])
        ))
        .create_async()
        .await;

    let source = BigQuerySource::new(&config(&server)).unwrap();
    let query = RowQuery::page(&predicate(), 3, 0);
    let rows = source.fetch(&predicate(), &query).await.unwrap();

    assert_eq!(
        rows,
        vec![
            BatchRow::new("01001000", -23.55, -46.63),
            BatchRow::new("01001001", -23.56, -46.64),
            BatchRow::new("01001002", -23.57, -46.65),
        ]
    );
    page_two.assert_async().await;
}

#[tokio::test]
async fn test_fetch_polls_until_job_completes() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/projects/proj/queries")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"jobReference":{"projectId":"proj","jobId":"job_3"},"jobComplete":false}"#)
        .create_async()
        .await;
    let poll = server
        .mock("GET", "/projects/proj/queries/job_3")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"jobComplete":true,"rows":{}}}"#,
            rows_json(&[("69900000", "-9.97", "-67.81")])
        ))
        .expect(1)
        .create_async()
        .await;

    let source = BigQuerySource::new(&config(&server)).unwrap();
    let rows = source
        .fetch(&predicate(), &RowQuery::unbounded())
        .await
        .unwrap();

    assert_eq!(rows, vec![BatchRow::new("69900000", -9.97, -67.81)]);
    poll.assert_async().await;
}

#[tokio::test]
async fn test_null_cell_is_invalid_response() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/projects/proj/queries")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"jobReference":{"projectId":"proj","jobId":"job_4"},"jobComplete":true,
                "rows":[{"f":[{"v":"01001000"},{"v":null},{"v":"-46.6"}]}]}"#,
        )
        .create_async()
        .await;

    let source = BigQuerySource::new(&config(&server)).unwrap();
    let err = source
        .fetch(&predicate(), &RowQuery::preview(1))
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_http_errors_are_classified() {
    let cases = [
        (401, r#"{"error":{"code":401,"message":"Invalid Credentials"}}"#, "authorization"),
        (
            403,
            r#"{"error":{"code":403,"message":"Quota exceeded","errors":[{"reason":"quotaExceeded"}]}}"#,
            "unavailable",
        ),
        (400, r#"{"error":{"code":400,"message":"Unrecognized name: cepp"}}"#, "malformed_request"),
        (404, r#"{"error":{"code":404,"message":"Not found: Table"}}"#, "malformed_request"),
        (503, "Service Unavailable", "unavailable"),
    ];

    for (status, body, kind) in cases {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/projects/proj/queries")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let source = BigQuerySource::new(&config(&server)).unwrap();
        let err = source.count(&predicate()).await.unwrap_err();
        assert_eq!(err.kind(), kind, "HTTP {status}");
        assert!(err.to_string().contains(&status.to_string()));
    }
}

#[tokio::test]
async fn test_unreachable_server_is_connectivity_error() {
    let config = BigQueryConfig {
        project_id: "proj".to_string(),
        api_base_url: "http://127.0.0.1:1".to_string(),
        timeout_seconds: 5,
        ..Default::default()
    };

    let source = BigQuerySource::new(&config).unwrap();
    let err = source.count(&predicate()).await.unwrap_err();
    assert!(matches!(err, SourceError::Connectivity(_)));
    assert!(err.is_retryable());
}

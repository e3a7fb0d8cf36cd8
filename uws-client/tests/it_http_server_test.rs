//! Integration tests for the HTTP transport against a mock UWS service

use std::io::Write;
use std::time::Duration;

use mockito::{Matcher, Server};
use uws_client::{ClientError, ServerConfig, UwsClient};
use uws_core::domain::Phase;
use uws_core::dto::{ListFilter, WaitRequest};

const JOB_LIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<uws:jobs xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0"
    xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1">
  <uws:jobref id="2014-06-03T15:33:29:4235-1" xlink:type="simple"
      xlink:href="https://example.org/uws/2014-06-03T15:33:29:4235-1">
    <uws:phase>EXECUTING</uws:phase>
  </uws:jobref>
  <uws:jobref id="2014-06-03T15:33:29:4235-2" xlink:type="simple"
      xlink:href="https://example.org/uws/2014-06-03T15:33:29:4235-2">
    <uws:phase>EXECUTING</uws:phase>
  </uws:jobref>
</uws:jobs>"#;

fn job(phase: &str) -> String {
    format!(
        r#"<uws:job xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <uws:jobId>42</uws:jobId>
  <uws:ownerId>admin</uws:ownerId>
  <uws:phase>{}</uws:phase>
  <uws:startTime xsi:nil="true"/>
  <uws:endTime xsi:nil="true"/>
  <uws:executionDuration>0</uws:executionDuration>
  <uws:destruction>2015-11-03T01:12:00</uws:destruction>
  <uws:parameters>
    <uws:parameter id="QUERY">SELECT 1</uws:parameter>
  </uws:parameters>
</uws:job>"#,
        phase
    )
}

fn client_for(server: &Server) -> UwsClient {
    let config =
        ServerConfig::new(format!("{}/uws", server.url())).with_credentials("admin", "admin");
    UwsClient::connect(&config).expect("Failed to build client")
}

#[tokio::test]
async fn job_list_sends_filter_and_basic_auth() {
    //* Given
    let mut server = Server::new_async().await;
    let list_mock = server
        .mock("GET", "/uws")
        .match_header("authorization", "Basic YWRtaW46YWRtaW4=")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("PHASE".into(), "EXECUTING".into()),
            Matcher::UrlEncoded("AFTER".into(), "2015-10-02T23:12:00.000000".into()),
            Matcher::UrlEncoded("LAST".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(JOB_LIST)
        .expect(1)
        .create_async()
        .await;

    //* When
    let filter = ListFilter::new()
        .with_phase("EXECUTING")
        .with_after("2015-10-03T01:12+2:00")
        .with_last("2");
    let jobs = client_for(&server)
        .get_job_list(&filter)
        .await
        .expect("Failed to list jobs");

    //* Then
    list_mock.assert_async().await;
    assert_eq!(jobs.version, "1.1");
    assert_eq!(jobs.len(), 2);
    assert!(jobs.iter().all(|job_ref| job_ref.known_phase() == Some(Phase::Executing)));
}

#[tokio::test]
async fn blocking_wait_is_sent_as_query() {
    //* Given
    let mut server = Server::new_async().await;
    let job_mock = server
        .mock("GET", "/uws/42")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("WAIT".into(), "-1".into()),
            Matcher::UrlEncoded("PHASE".into(), "QUEUED".into()),
        ]))
        .with_status(200)
        .with_body(job("EXECUTING"))
        .create_async()
        .await;

    //* When
    let wait = WaitRequest::new("-1").with_phase("QUEUED");
    let job = client_for(&server)
        .get_job_waiting("42", &wait)
        .await
        .expect("Failed to wait on job");

    //* Then
    job_mock.assert_async().await;
    assert_eq!(job.phase(), Some(Phase::Executing));
}

#[tokio::test]
async fn blocking_wait_outlasts_request_timeout() {
    //* Given
    let mut server = Server::new_async().await;
    let body = job("COMPLETED");
    let job_mock = server
        .mock("GET", "/uws/42")
        .match_query(Matcher::UrlEncoded("WAIT".into(), "5".into()))
        .with_status(200)
        .with_chunked_body(move |writer| {
            // The service holds the request while the job runs
            std::thread::sleep(Duration::from_secs(2));
            writer.write_all(body.as_bytes())
        })
        .create_async()
        .await;
    let config = ServerConfig::new(format!("{}/uws", server.url()))
        .with_timeout(Duration::from_secs(1));
    let client = UwsClient::connect(&config).expect("Failed to build client");

    //* When
    let job = client
        .get_job_waiting("42", &WaitRequest::new("5"))
        .await
        .expect("Wait was cut short by the request timeout");

    //* Then
    job_mock.assert_async().await;
    assert_eq!(job.phase(), Some(Phase::Completed));
}

#[tokio::test]
async fn plain_requests_keep_the_configured_timeout() {
    //* Given
    let mut server = Server::new_async().await;
    let body = job("COMPLETED");
    let _job_mock = server
        .mock("GET", "/uws/42")
        .with_status(200)
        .with_chunked_body(move |writer| {
            std::thread::sleep(Duration::from_secs(2));
            writer.write_all(body.as_bytes())
        })
        .create_async()
        .await;
    let config = ServerConfig::new(format!("{}/uws", server.url()))
        .with_timeout(Duration::from_secs(1));
    let client = UwsClient::connect(&config).expect("Failed to build client");

    //* When
    let err = client.get_job("42").await.expect_err("Expected a timeout");

    //* Then
    assert!(matches!(err, ClientError::RequestFailed(_)));
}

#[tokio::test]
async fn run_follows_redirect_to_job() {
    //* Given
    let mut server = Server::new_async().await;
    let run_mock = server
        .mock("POST", "/uws/42/phase")
        .match_body(Matcher::UrlEncoded("PHASE".into(), "RUN".into()))
        .with_status(303)
        .with_header("location", &format!("{}/uws/42", server.url()))
        .create_async()
        .await;
    let job_mock = server
        .mock("GET", "/uws/42")
        .with_status(200)
        .with_body(job("QUEUED"))
        .create_async()
        .await;

    //* When
    let job = client_for(&server)
        .run_job("42")
        .await
        .expect("Failed to run job");

    //* Then
    run_mock.assert_async().await;
    job_mock.assert_async().await;
    assert_eq!(job.phase(), Some(Phase::Queued));
    assert_eq!(job.owner_id.as_deref(), Some("admin"));
    assert_eq!(job.start_time, None);
    assert_eq!(job.parameters[0].value, "SELECT 1");
}

#[tokio::test]
async fn phase_endpoint_returns_plain_text() {
    //* Given
    let mut server = Server::new_async().await;
    let _phase_mock = server
        .mock("GET", "/uws/42/phase")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("COMPLETED\n")
        .create_async()
        .await;

    //* When
    let phase = client_for(&server).get_phase("42").await;

    //* Then
    assert_eq!(phase.expect("Failed to get phase"), Phase::Completed);
}

#[tokio::test]
async fn missing_job_is_not_found() {
    //* Given
    let mut server = Server::new_async().await;
    let _job_mock = server
        .mock("GET", "/uws/nope")
        .with_status(404)
        .with_body("No such job")
        .create_async()
        .await;

    //* When
    let err = client_for(&server)
        .get_job("nope")
        .await
        .expect_err("Expected a 404");

    //* Then
    assert!(err.is_not_found());
    assert!(matches!(
        err,
        ClientError::ApiError { status: 404, ref message } if message == "No such job"
    ));
}

#[tokio::test]
async fn invalid_wait_never_reaches_the_service() {
    //* Given
    let mut server = Server::new_async().await;
    let job_mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    //* When
    let wait = WaitRequest::new("30.587");
    let err = client_for(&server)
        .get_job_waiting("42", &wait)
        .await
        .expect_err("Expected a rejected wait");

    //* Then
    job_mock.assert_async().await;
    assert!(err.is_client_error());
}

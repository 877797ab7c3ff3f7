//! Compile-and-submit against a mocked TAP service.

use skyarc_adql::ConstraintSet;
use skyarc_archive::{ArchiveClient, ArchiveConfig, ArchiveError};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_query_posts_compiled_adql() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tap/sync"))
        .and(body_string_contains("LANG=ADQL"))
        .and(body_string_contains("QUERY=select+*+from+tap_schema.obscore"))
        .and(body_string_contains("spatial_resolution%3D5"))
        .and(body_string_contains("MAXREC=10"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<VOTABLE/>"))
        .expect(1)
        .mount(&server)
        .await;

    let config = ArchiveConfig::with_archive_url(server.uri());
    let client = ArchiveClient::new(&config).unwrap();
    let constraints = ConstraintSet::new().with("spatial_resolution", "5");

    let body = client.query(&constraints, Some(10)).await.unwrap();
    assert_eq!(body, "<VOTABLE/>");
}

#[tokio::test]
async fn test_tap_handle_reused_across_queries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tap/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<VOTABLE/>"))
        .expect(2)
        .mount(&server)
        .await;

    let config = ArchiveConfig::with_archive_url(server.uri());
    let client = ArchiveClient::new(&config).unwrap();
    let constraints = ConstraintSet::new().with("fov", ">10");

    client.query(&constraints, None).await.unwrap();
    client.query(&constraints, None).await.unwrap();

    let tap = client.tap().await.unwrap();
    assert_eq!(tap.base_url(), format!("{}/tap", server.uri()));
}

#[tokio::test]
async fn test_service_error_surfaced_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tap/sync"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad query"))
        .mount(&server)
        .await;

    let config = ArchiveConfig::with_archive_url(server.uri());
    let client = ArchiveClient::new(&config).unwrap();
    let constraints = ConstraintSet::new().with("fov", "5");

    let err = client.query(&constraints, None).await.unwrap_err();
    match err {
        ArchiveError::Service { status, body } => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(body, "bad query");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_query_object_sets_source_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tap/sync"))
        .and(body_string_contains("target_name%3D%27M83%27"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<VOTABLE/>"))
        .expect(1)
        .mount(&server)
        .await;

    let config = ArchiveConfig::with_archive_url(server.uri());
    let client = ArchiveClient::new(&config).unwrap();

    client.query_object("M83", None, None).await.unwrap();
}

use slugharvest_client::ReqwestFetcher;
use slugharvest_core::AppError;
use slugharvest_core::traits::Fetcher;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::local_fetcher;

#[tokio::test]
async fn sends_browser_headers_on_every_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/abc123"))
        .and(header("referer", "https://prnt.sc/"))
        .and(header("dnt", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let body = local_fetcher()
        .fetch(&format!("{}/abc123", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "<html>ok</html>");

    // Matchers split values on commas, so compare the raw header instead.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;
    assert_eq!(
        headers.get("accept-language").unwrap().to_str().unwrap(),
        "ru,en;q=0.9,la;q=0.8"
    );
    assert_eq!(
        headers.get("accept").unwrap().to_str().unwrap(),
        "image/webp,image/apng,image/*,*/*;q=0.8"
    );
    assert!(
        headers
            .get("user-agent")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("Nexus 5")
    );
}

#[tokio::test]
async fn custom_headers_replace_the_default_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "slugharvest-test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hi"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::with_headers(
        &[("user-agent", "slugharvest-test")],
        std::time::Duration::from_secs(5),
    )
    .unwrap()
    .allow_private_urls();

    assert_eq!(fetcher.fetch(&server.uri()).await.unwrap(), "hi");
}

#[tokio::test]
async fn fetch_bytes_returns_raw_body() {
    let server = MockServer::start().await;
    let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];
    Mock::given(method("GET"))
        .and(path("/img/shot.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png.clone()))
        .mount(&server)
        .await;

    let bytes = local_fetcher()
        .fetch_bytes(&format!("{}/img/shot.png", server.uri()))
        .await
        .unwrap();

    assert_eq!(bytes, png);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = local_fetcher()
        .fetch(&format!("{}/gone", server.uri()))
        .await
        .unwrap_err();

    match err {
        AppError::HttpError(msg) => assert!(msg.contains("503"), "unexpected message: {msg}"),
        other => panic!("expected HttpError, got {other:?}"),
    }
}

#[tokio::test]
async fn private_addresses_are_refused_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = ReqwestFetcher::new()
        .unwrap()
        .fetch_bytes(&format!("{}/x.png", server.uri()))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("reserved address 127.0.0.1"));
}

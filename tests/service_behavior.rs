//! Behavior tests for the feed service: endpoint chains, cache modes, and
//! refresh coordination.

use quakewatch_tests::*;

fn service_over(mock: &Arc<SequenceHttpClient>) -> EarthquakeService {
    EarthquakeService::new(mock.clone()).with_policy(RetryPolicy::no_retry())
}

#[tokio::test]
async fn cached_feeds_avoid_repeat_round_trips() {
    let mock = Arc::new(SequenceHttpClient::new().push_ok(&wolfx_single_event()));
    let service = service_over(&mock);

    let first = service.cenc_events(CacheMode::Use).await.unwrap();
    let second = service.cenc_events(CacheMode::Use).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn refresh_mode_ignores_the_cached_copy() {
    let mock = Arc::new(
        SequenceHttpClient::new()
            .push_ok(&wolfx_single_event())
            .push_ok(&wolfx_single_event()),
    );
    let service = service_over(&mock);

    service.cenc_events(CacheMode::Use).await.unwrap();
    service.cenc_events(CacheMode::Refresh).await.unwrap();

    assert_eq!(mock.request_count(), 2);
}

#[tokio::test]
async fn proxy_endpoints_fall_back_to_the_direct_upstream() {
    // Given: a relay that is down and a healthy direct upstream
    let mock = Arc::new(
        SequenceHttpClient::new()
            .push_err("connection refused")
            .push_ok(&wolfx_single_event()),
    );
    let service = service_over(&mock)
        .with_endpoints(FeedEndpoints::with_proxy_base("http://localhost:3001"));

    // When: events are requested
    let records = service.cenc_events(CacheMode::Use).await.unwrap();

    // Then: the relay was tried first, then the direct URL
    assert_eq!(records.len(), 1);
    let urls = mock.requests();
    assert_eq!(urls[0], "http://localhost:3001/api/wolfx");
    assert_eq!(urls[1], wolfx::DIRECT_URL);
}

#[tokio::test]
async fn a_garbled_feed_degrades_to_an_empty_batch() {
    // A fetchable but unrecognizable payload must not error out a caller.
    let mock = Arc::new(SequenceHttpClient::new().push_ok(r#"{"maintenance": true}"#));
    let service = service_over(&mock);

    let records = service.usgs_events(CacheMode::Use).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn when_every_source_is_down_the_error_names_them_all() {
    let mock = Arc::new(SequenceHttpClient::new());
    let service = service_over(&mock)
        .with_endpoints(FeedEndpoints::with_proxy_base("http://localhost:3001"));

    let error = service.usgs_events(CacheMode::Use).await.unwrap_err();

    let rendered = error.to_string();
    assert!(rendered.contains("http://localhost:3001/api/usgs"));
    assert!(rendered.contains(usgs::DIRECT_URL));
}

#[tokio::test]
async fn refresh_all_reports_partial_failure_per_feed() {
    // CENC responds, USGS is down.
    let mock = Arc::new(SequenceHttpClient::new().push_ok(&wolfx_single_event()));
    let service = service_over(&mock);

    let outcome = service.refresh_all().await.expect("no refresh in flight");

    assert_eq!(outcome.cenc.len(), 1);
    assert!(outcome.usgs.is_empty());
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].0, FeedSource::Usgs);
}

#[tokio::test]
async fn cache_survives_a_refresh_failure() {
    // First call populates the cache; the forced refresh fails, but the
    // cached copy still serves subsequent reads.
    let mock = Arc::new(SequenceHttpClient::new().push_ok(&wolfx_single_event()));
    let service = service_over(&mock);

    let first = service.cenc_events(CacheMode::Use).await.unwrap();
    assert!(service.cenc_events(CacheMode::Refresh).await.is_err());

    let after = service.cenc_events(CacheMode::Use).await.unwrap();
    assert_eq!(first, after);
}

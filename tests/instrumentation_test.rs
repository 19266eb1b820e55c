//! Tests for the observability wrapper contract: exactly one counter
//! increment, one span, and one processing-time observation per request,
//! with outcome-dependent status and exception accounting.

mod common;

use course_catalog::observability::SpanStatus;

const VALID_FORM: &[(&str, &str)] = &[
    ("code", "CS101"),
    ("name", "Intro"),
    ("instructor", "Dr. A"),
];

fn histogram_count(app: &common::TestApp, route: &str) -> u64 {
    app.sink
        .snapshot()
        .processing_time_ms
        .iter()
        .find(|(name, _)| name == route)
        .map(|(_, summary)| summary.count)
        .unwrap_or(0)
}

#[tokio::test]
async fn every_request_increments_the_counter_exactly_once() {
    let app = common::spawn_app().await;

    app.get("/").await;
    app.get("/catalog").await;
    app.get("/catalog").await;
    app.get("/course/CS999").await; // not-found outcome
    app.post_form("/add_course", &[("code", " ")]).await; // validation outcome

    assert_eq!(app.sink.requests_for("index"), 1);
    assert_eq!(app.sink.requests_for("course-catalog"), 2);
    assert_eq!(app.sink.requests_for("course-details"), 1);
    assert_eq!(app.sink.requests_for("add-course"), 1);
}

#[tokio::test]
async fn histogram_records_on_every_exit_path() {
    let app = common::spawn_app().await;

    app.get("/catalog").await; // success
    app.get("/course/CS999").await; // not-found redirect
    app.post_form("/add_course", &[("code", "")]).await; // validation redirect

    assert_eq!(histogram_count(&app, "course-catalog"), 1);
    assert_eq!(histogram_count(&app, "course-details"), 1);
    assert_eq!(histogram_count(&app, "add-course"), 1);
}

#[tokio::test]
async fn each_request_produces_exactly_one_span() {
    let app = common::spawn_app().await;

    app.get("/").await;
    app.get("/catalog").await;
    app.post_form("/add_course", VALID_FORM).await;

    assert_eq!(app.spans.named("index").len(), 1);
    assert_eq!(app.spans.named("course-catalog").len(), 1);
    assert_eq!(app.spans.named("add-course").len(), 1);
    assert_eq!(app.spans.finished().len(), 3);
}

#[tokio::test]
async fn success_spans_carry_standard_attributes_and_ok_status() {
    let app = common::spawn_app().await;

    app.get("/catalog").await;

    let spans = app.spans.named("course-catalog");
    let span = &spans[0];
    assert_eq!(span.status, Some(SpanStatus::Ok));

    let keys: Vec<&str> = span.attributes.iter().map(|(k, _)| k.as_str()).collect();
    for key in ["http.method", "http.url", "user.ip", "request.id", "courses.count"] {
        assert!(keys.contains(&key), "missing attribute {key}");
    }
    assert!(span.events.iter().any(|e| e.text == "request completed"));
}

#[tokio::test]
async fn lookup_miss_is_error_span_but_not_exception() {
    let app = common::spawn_app().await;

    let response = app.get("/course/CS999").await;
    assert_eq!(response.status(), 303);

    let spans = app.spans.named("course-details");
    assert_eq!(spans[0].status, Some(SpanStatus::Error));
    assert_eq!(app.sink.exceptions(), 0);
}

#[tokio::test]
async fn validation_failure_leaves_span_status_unset() {
    let app = common::spawn_app().await;

    app.post_form("/add_course", &[("name", "Intro")]).await;

    let spans = app.spans.named("add-course");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].status, None);
    assert_eq!(app.sink.exceptions(), 0);
}

#[tokio::test]
async fn storage_fault_follows_the_error_contract() {
    let app = common::spawn_app().await;

    // Corrupt the backing file so the next load fails.
    tokio::fs::write(&app.catalog_path, "{ not json").await.unwrap();

    let response = app.get("/catalog").await;
    assert_eq!(response.status(), 500);
    let body = response.text().await.unwrap();
    assert!(body.contains("500 - Server Error"));
    // Raw fault text never reaches the caller.
    assert!(!body.contains("corrupt"));
    assert!(!body.contains("course_catalog.json"));

    assert_eq!(app.sink.exceptions(), 1);
    assert_eq!(app.spans.named("course-catalog")[0].status, Some(SpanStatus::Error));
    assert_eq!(histogram_count(&app, "course-catalog"), 1);
}

#[tokio::test]
async fn fallback_route_is_observed_like_a_fault() {
    let app = common::spawn_app().await;

    app.get("/definitely/not/here").await;

    assert_eq!(app.sink.requests_for("not-found"), 1);
    assert_eq!(app.sink.exceptions(), 1);
    let spans = app.spans.named("not-found");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].status, Some(SpanStatus::Error));
}

#[tokio::test]
async fn add_course_span_carries_course_attributes() {
    let app = common::spawn_app().await;

    app.post_form("/add_course", VALID_FORM).await;

    let spans = app.spans.named("add-course");
    let attrs = &spans[0].attributes;
    assert!(attrs.contains(&("course.code".to_string(), "CS101".to_string())));
    assert!(attrs.contains(&("course.name".to_string(), "Intro".to_string())));
}

#[tokio::test]
async fn manual_trace_span_records_custom_event() {
    let app = common::spawn_app().await;

    app.get("/manual-trace").await;

    let spans = app.spans.named("manual-trace");
    assert_eq!(spans.len(), 1);
    assert!(spans[0].events.iter().any(|e| e.text == "Processing request"));
}

#[tokio::test]
async fn auto_instrumented_route_bypasses_the_wrapper() {
    let app = common::spawn_app().await;

    app.get("/auto-instrumented").await;

    // Ambient TraceLayer only: no wrapper span, no counter.
    assert!(app.spans.finished().is_empty());
    assert_eq!(app.sink.snapshot().requests.len(), 0);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = common::spawn_app().await;

    let response = app.get("/").await;
    let id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header present")
        .to_str()
        .unwrap()
        .to_string();
    assert!(uuid::Uuid::parse_str(&id).is_ok());

    // The span saw the same ID the client did.
    let spans = app.spans.named("index");
    assert!(spans[0]
        .attributes
        .contains(&("request.id".to_string(), id)));
}

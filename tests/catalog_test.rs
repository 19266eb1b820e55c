//! End-to-end tests for the catalog CRUD surface.

mod common;

const VALID_FORM: &[(&str, &str)] = &[
    ("code", "CS101"),
    ("name", "Intro"),
    ("instructor", "Dr. A"),
    ("semester", "Fall 2026"),
    ("schedule", "MWF 10:00"),
    ("classroom", "B12"),
    ("prerequisites", "None"),
    ("grading", "Letter"),
    ("description", "First steps."),
];

#[tokio::test]
async fn empty_store_lists_zero_courses() {
    let app = common::spawn_app().await;

    let response = app.get("/catalog").await;
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("No courses yet."));

    // No backing file is not a fault.
    assert_eq!(app.sink.exceptions(), 0);
}

#[tokio::test]
async fn added_course_round_trips_through_list_and_detail() {
    let app = common::spawn_app().await;

    let response = app.post_form("/add_course", VALID_FORM).await;
    assert_eq!(response.status(), 303);
    let location = response.headers()["location"].to_str().unwrap().to_string();
    assert!(location.starts_with("/catalog"), "redirects to catalog: {location}");

    let listing = app.get("/catalog").await.text().await.unwrap();
    assert!(listing.contains("CS101"));
    assert!(listing.contains("Intro"));

    // Detail lookup preserves every submitted field verbatim.
    let detail = app.get("/course/CS101").await;
    assert_eq!(detail.status(), 200);
    let body = detail.text().await.unwrap();
    for (_, value) in VALID_FORM {
        assert!(body.contains(value), "detail page missing {value:?}");
    }
}

#[tokio::test]
async fn repeated_list_is_idempotent() {
    let app = common::spawn_app().await;
    app.post_form("/add_course", VALID_FORM).await;

    let first = app.get("/catalog").await.text().await.unwrap();
    let second = app.get("/catalog").await.text().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn blank_required_field_never_persists() {
    let app = common::spawn_app().await;

    for field in ["code", "name", "instructor"] {
        let form: Vec<(&str, &str)> = VALID_FORM
            .iter()
            .map(|&(k, v)| if k == field { (k, "   ") } else { (k, v) })
            .collect();

        let response = app.post_form("/add_course", &form).await;
        assert_eq!(response.status(), 303);
        let location = response.headers()["location"].to_str().unwrap();
        assert!(
            location.starts_with("/add_course") && location.contains(field),
            "redirect names the missing field: {location}"
        );
    }

    // Nothing was written.
    assert!(!app.catalog_path.exists());
    let listing = app.get("/catalog").await.text().await.unwrap();
    assert!(listing.contains("No courses yet."));
}

#[tokio::test]
async fn validation_redirect_renders_field_warning() {
    let app = common::spawn_app().await;

    let form: Vec<(&str, &str)> = VALID_FORM
        .iter()
        .map(|&(k, v)| if k == "instructor" { (k, "") } else { (k, v) })
        .collect();
    let response = app.post_form("/add_course", &form).await;
    let location = response.headers()["location"].to_str().unwrap().to_string();

    let body = app.get(&location).await.text().await.unwrap();
    assert!(body.contains("Field &#39;instructor&#39; is required."));
}

#[tokio::test]
async fn lookup_miss_redirects_with_not_found_flash() {
    let app = common::spawn_app().await;
    app.post_form("/add_course", VALID_FORM).await;

    let response = app.get("/course/CS999").await;
    assert_eq!(response.status(), 303);
    let location = response.headers()["location"].to_str().unwrap().to_string();
    assert!(location.starts_with("/catalog"));

    let body = app.get(&location).await.text().await.unwrap();
    assert!(body.contains("No course found with code &#39;CS999&#39;."));
}

#[tokio::test]
async fn duplicate_codes_are_representable() {
    let app = common::spawn_app().await;

    app.post_form("/add_course", VALID_FORM).await;
    let second: Vec<(&str, &str)> = VALID_FORM
        .iter()
        .map(|&(k, v)| if k == "name" { (k, "Intro Again") } else { (k, v) })
        .collect();
    app.post_form("/add_course", &second).await;

    let listing = app.get("/catalog").await.text().await.unwrap();
    assert_eq!(listing.matches("CS101").count(), 2);

    // Detail view resolves to the first insertion.
    let detail = app.get("/course/CS101").await.text().await.unwrap();
    assert!(detail.contains("Intro"));
}

#[tokio::test]
async fn diagnostic_routes_respond() {
    let app = common::spawn_app().await;

    let manual = app.get("/manual-trace").await;
    assert_eq!(manual.status(), 200);
    assert_eq!(manual.text().await.unwrap(), "Manual trace recorded!");

    let auto = app.get("/auto-instrumented").await;
    assert_eq!(auto.status(), 200);
    assert_eq!(auto.text().await.unwrap(), "This route is auto-instrumented!");
}

#[tokio::test]
async fn unknown_path_gets_error_page() {
    let app = common::spawn_app().await;

    let response = app.get("/no/such/page").await;
    assert_eq!(response.status(), 404);
    let body = response.text().await.unwrap();
    assert!(body.contains("404 - Page Not Found"));
    // Generic text only, no internals.
    assert!(!body.contains("RouteNotFound"));
}

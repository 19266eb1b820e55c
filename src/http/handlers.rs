//! Route handlers.
//!
//! Each handler is a thin body run inside the instrumentation wrapper:
//! the wrapper owns the counter increment, the span lifecycle, the terminal
//! log event, and the processing-time observation; the body does the
//! catalog work and attaches route-specific span attributes.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Form;
use serde::Deserialize;

use crate::catalog::CourseForm;
use crate::error::AppError;
use crate::http::pages;
use crate::http::request::RequestMeta;
use crate::http::server::AppState;
use crate::observability::{instrument, Handled};

/// Flash parameters accepted by the catalog page.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// Course code that a detail lookup failed to find.
    missing: Option<String>,
    /// Name of a course that was just added.
    added: Option<String>,
}

impl CatalogQuery {
    fn flash_message(&self) -> Option<String> {
        if let Some(code) = &self.missing {
            return Some(format!("No course found with code '{code}'."));
        }
        self.added
            .as_ref()
            .map(|name| format!("Course '{name}' added successfully!"))
    }
}

/// Flash parameters accepted by the add form.
#[derive(Debug, Default, Deserialize)]
pub struct AddFormQuery {
    /// Required field that was blank on the last submission.
    missing: Option<String>,
}

impl AddFormQuery {
    fn flash_message(&self) -> Option<String> {
        self.missing
            .as_ref()
            .map(|field| format!("Field '{field}' is required."))
    }
}

/// `GET /` - landing page.
pub async fn index(State(state): State<AppState>, meta: RequestMeta) -> Response {
    let telemetry = state.telemetry.clone();
    instrument(&telemetry, meta.into_context("index"), |_span| async move {
        Ok(Handled::new(pages::index(), "index_page_loaded"))
    })
    .await
}

/// `GET /catalog` - list all courses.
pub async fn course_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
    meta: RequestMeta,
) -> Response {
    let telemetry = state.telemetry.clone();
    instrument(
        &telemetry,
        meta.into_context("course-catalog"),
        move |span| async move {
            let courses = state.store.load().await?;
            span.set_attribute("courses.count", courses.len().to_string());

            let flash = query.flash_message();
            Ok(
                Handled::new(pages::catalog(&courses, flash.as_deref()), "course_catalog_loaded")
                    .with_field("courses_count", courses.len().to_string()),
            )
        },
    )
    .await
}

/// `GET /add_course` - render the add form.
pub async fn add_course_form(
    State(state): State<AppState>,
    Query(query): Query<AddFormQuery>,
    meta: RequestMeta,
) -> Response {
    let telemetry = state.telemetry.clone();
    instrument(
        &telemetry,
        meta.into_context("add-course"),
        move |_span| async move {
            let flash = query.flash_message();
            Ok(Handled::new(
                pages::add_form(flash.as_deref()),
                "add_course_page_loaded",
            ))
        },
    )
    .await
}

/// `POST /add_course` - validate and append a course.
pub async fn add_course_submit(
    State(state): State<AppState>,
    meta: RequestMeta,
    Form(form): Form<CourseForm>,
) -> Response {
    let telemetry = state.telemetry.clone();
    instrument(
        &telemetry,
        meta.into_context("add-course"),
        move |span| async move {
            if let Some(field) = form.first_missing_field() {
                return Err(AppError::Validation { field });
            }

            let course = form.into_course();
            span.set_attribute("course.code", course.code.clone());
            span.set_attribute("course.name", course.name.clone());

            let name = course.name.clone();
            state.store.append(course).await?;

            Ok(Handled::new(
                pages::redirect_with_flash("/catalog", "added", &name),
                "course_added",
            )
            .with_field("course_name", name))
        },
    )
    .await
}

/// `GET /course/{code}` - detail view.
pub async fn course_details(
    State(state): State<AppState>,
    Path(code): Path<String>,
    meta: RequestMeta,
) -> Response {
    let telemetry = state.telemetry.clone();
    instrument(
        &telemetry,
        meta.into_context("course-details"),
        move |span| async move {
            span.set_attribute("course.code", code.clone());

            let course = state
                .store
                .find(&code)
                .await?
                .ok_or_else(|| AppError::NotFound { code: code.clone() })?;

            Ok(Handled::new(pages::details(&course), "course_details_loaded")
                .with_field("course_code", code))
        },
    )
    .await
}

/// `GET /manual-trace` - diagnostic route exercising the span API by hand.
pub async fn manual_trace(State(state): State<AppState>, meta: RequestMeta) -> Response {
    let telemetry = state.telemetry.clone();
    instrument(
        &telemetry,
        meta.into_context("manual-trace"),
        |span| async move {
            span.add_event("Processing request");
            Ok(Handled::new("Manual trace recorded!", "manual_trace_recorded"))
        },
    )
    .await
}

/// `GET /auto-instrumented` - diagnostic route that deliberately bypasses
/// the wrapper and relies on the ambient `TraceLayer` alone.
pub async fn auto_instrumented() -> &'static str {
    "This route is auto-instrumented!"
}

/// Fallback for unmatched paths. Follows the same contract as in-handler
/// faults: span with ERROR status, exception increment, error log.
pub async fn not_found(State(state): State<AppState>, meta: RequestMeta) -> Response {
    let telemetry = state.telemetry.clone();
    let path = meta.url.clone();
    instrument(
        &telemetry,
        meta.into_context("not-found"),
        move |_span| async move { Err(AppError::RouteNotFound { path }) },
    )
    .await
}

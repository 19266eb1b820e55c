//! Minimal inline HTML rendering.
//!
//! # Responsibilities
//! - Render the index, catalog, add-form, detail, and error pages
//! - Escape user-supplied values before they reach markup
//! - Build redirect targets carrying flash-style messages as query params
//!
//! # Design Decisions
//! - No template engine; pages are small enough to format inline
//! - Error pages carry generic text only, never fault internals

use axum::response::{Html, Redirect};
use url::form_urlencoded;

use crate::catalog::Course;

/// Escape a value for inclusion in HTML text or attribute context.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Redirect to a path with a single flash parameter.
pub fn redirect_with_flash(path: &str, key: &str, value: &str) -> Redirect {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish();
    Redirect::to(&format!("{path}?{query}"))
}

fn page(title: &str, flash: Option<&str>, body: &str) -> Html<String> {
    let flash_html = flash
        .map(|message| format!("<p class=\"flash\">{}</p>", escape(message)))
        .unwrap_or_default();
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{title}</title></head>\n<body>\n\
         <h1>{title}</h1>\n{flash_html}{body}\n</body>\n</html>",
        title = escape(title),
    ))
}

/// Landing page.
pub fn index() -> Html<String> {
    page(
        "Course Catalog",
        None,
        "<ul>\n\
         <li><a href=\"/catalog\">Browse the catalog</a></li>\n\
         <li><a href=\"/add_course\">Add a course</a></li>\n\
         </ul>",
    )
}

/// Catalog listing.
pub fn catalog(courses: &[Course], flash: Option<&str>) -> Html<String> {
    let body = if courses.is_empty() {
        "<p>No courses yet.</p>".to_string()
    } else {
        let rows: String = courses
            .iter()
            .map(|course| {
                format!(
                    "<tr><td><a href=\"/course/{code_attr}\">{code}</a></td>\
                     <td>{name}</td><td>{instructor}</td></tr>\n",
                    code_attr = escape(&course.code),
                    code = escape(&course.code),
                    name = escape(&course.name),
                    instructor = escape(&course.instructor),
                )
            })
            .collect();
        format!(
            "<table>\n<tr><th>Code</th><th>Name</th><th>Instructor</th></tr>\n{rows}</table>"
        )
    };
    page("Course Catalog", flash, &body)
}

/// Add-course form.
pub fn add_form(flash: Option<&str>) -> Html<String> {
    let fields: String = [
        "code",
        "name",
        "instructor",
        "semester",
        "schedule",
        "classroom",
        "prerequisites",
        "grading",
        "description",
    ]
    .iter()
    .map(|field| {
        format!(
            "<label>{field} <input type=\"text\" name=\"{field}\"></label><br>\n"
        )
    })
    .collect();
    let body = format!(
        "<form method=\"post\" action=\"/add_course\">\n{fields}\
         <button type=\"submit\">Add course</button>\n</form>"
    );
    page("Add Course", flash, &body)
}

/// Course detail view.
pub fn details(course: &Course) -> Html<String> {
    let rows: String = [
        ("Code", &course.code),
        ("Name", &course.name),
        ("Instructor", &course.instructor),
        ("Semester", &course.semester),
        ("Schedule", &course.schedule),
        ("Classroom", &course.classroom),
        ("Prerequisites", &course.prerequisites),
        ("Grading", &course.grading),
        ("Description", &course.description),
    ]
    .iter()
    .map(|(label, value)| {
        format!(
            "<tr><th>{label}</th><td>{value}</td></tr>\n",
            value = escape(value)
        )
    })
    .collect();
    page(
        "Course Details",
        None,
        &format!("<table>\n{rows}</table>\n<p><a href=\"/catalog\">Back to catalog</a></p>"),
    )
}

/// Generic error page. `error_type` and `message` are fixed strings chosen
/// by the error taxonomy, never raw fault text.
pub fn error_page(error_type: &str, message: &str, description: &str) -> Html<String> {
    page(
        error_type,
        None,
        &format!(
            "<p>{}</p>\n<p>{}</p>\n<p><a href=\"/\">Home</a></p>",
            escape(message),
            escape(description)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn catalog_rows_are_escaped() {
        let course = Course {
            code: "<script>".to_string(),
            name: "X".to_string(),
            instructor: "Y".to_string(),
            semester: String::new(),
            schedule: String::new(),
            classroom: String::new(),
            prerequisites: String::new(),
            grading: String::new(),
            description: String::new(),
        };
        let Html(body) = catalog(&[course], None);
        assert!(body.contains("&lt;script&gt;"));
        assert!(!body.contains("<script>"));
    }
}

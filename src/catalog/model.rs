//! Course record and form validation.

use serde::{Deserialize, Serialize};

/// A single catalog entry.
///
/// Immutable once created; stored in insertion order. `code` is the lookup
/// key for the detail view but uniqueness is not enforced on append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub instructor: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub classroom: String,
    #[serde(default)]
    pub prerequisites: String,
    #[serde(default)]
    pub grading: String,
    #[serde(default)]
    pub description: String,
}

/// Caller-submitted course fields, all optional at the wire level.
///
/// Validation decides which submissions become a `Course`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseForm {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub classroom: String,
    #[serde(default)]
    pub prerequisites: String,
    #[serde(default)]
    pub grading: String,
    #[serde(default)]
    pub description: String,
}

impl CourseForm {
    /// Name of the first required field that is blank after trimming,
    /// or `None` if the form is acceptable.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        let checks: [(&'static str, &str); 3] = [
            ("code", &self.code),
            ("name", &self.name),
            ("instructor", &self.instructor),
        ];
        checks
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
    }

    /// Convert into a `Course`, carrying all submitted fields verbatim.
    ///
    /// Callers must have validated the form first; this does not trim or
    /// reject anything.
    pub fn into_course(self) -> Course {
        Course {
            code: self.code,
            name: self.name,
            instructor: self.instructor,
            semester: self.semester,
            schedule: self.schedule,
            classroom: self.classroom,
            prerequisites: self.prerequisites,
            grading: self.grading,
            description: self.description,
        }
    }
}

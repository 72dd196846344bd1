//! Submitted resume and its field identifiers.

use serde::{Deserialize, Serialize};

use crate::constants::RESUME_FIELD_COUNT;

/// A resume as submitted by the client.
///
/// Every field is required and must be a string; `certifications` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resume {
    pub summary: String,
    pub skills: String,
    pub education: String,
    pub projects: String,
    pub experience: String,
    pub certifications: String,
}

/// Resume fields, in embedding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResumeField {
    Summary,
    Skills,
    Education,
    Projects,
    Experience,
    Certifications,
}

impl ResumeField {
    /// All fields in the order their vectors are produced.
    pub const ALL: [ResumeField; RESUME_FIELD_COUNT] = [
        ResumeField::Summary,
        ResumeField::Skills,
        ResumeField::Education,
        ResumeField::Projects,
        ResumeField::Experience,
        ResumeField::Certifications,
    ];

    /// Row of this field in [`ResumeVectors`](crate::scoring::ResumeVectors).
    pub fn index(self) -> usize {
        match self {
            ResumeField::Summary => 0,
            ResumeField::Skills => 1,
            ResumeField::Education => 2,
            ResumeField::Projects => 3,
            ResumeField::Experience => 4,
            ResumeField::Certifications => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResumeField::Summary => "summary",
            ResumeField::Skills => "skills",
            ResumeField::Education => "education",
            ResumeField::Projects => "projects",
            ResumeField::Experience => "experience",
            ResumeField::Certifications => "certifications",
        }
    }
}

impl std::fmt::Display for ResumeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Resume {
    /// Returns the text of one field.
    pub fn field(&self, field: ResumeField) -> &str {
        match field {
            ResumeField::Summary => &self.summary,
            ResumeField::Skills => &self.skills,
            ResumeField::Education => &self.education,
            ResumeField::Projects => &self.projects,
            ResumeField::Experience => &self.experience,
            ResumeField::Certifications => &self.certifications,
        }
    }

    /// Field texts in embedding order.
    pub fn texts(&self) -> [&str; RESUME_FIELD_COUNT] {
        ResumeField::ALL.map(|field| self.field(field))
    }
}

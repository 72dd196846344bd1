use serde::{Deserialize, Serialize};

use crate::constants::POSTING_VECTOR_FIELDS;

/// One internship posting from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
}

/// Posting fields that carry an embedding (company and location are never scored).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostingField {
    Title,
    Description,
    Requirements,
}

impl PostingField {
    /// Embedded fields, in the order they are stored per vector row.
    pub const ALL: [PostingField; POSTING_VECTOR_FIELDS] = [
        PostingField::Title,
        PostingField::Description,
        PostingField::Requirements,
    ];

    pub fn index(self) -> usize {
        match self {
            PostingField::Title => 0,
            PostingField::Description => 1,
            PostingField::Requirements => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PostingField::Title => "title",
            PostingField::Description => "description",
            PostingField::Requirements => "requirements",
        }
    }
}

impl std::fmt::Display for PostingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Posting {
    pub fn field(&self, field: PostingField) -> &str {
        match field {
            PostingField::Title => &self.title,
            PostingField::Description => &self.description,
            PostingField::Requirements => &self.requirements,
        }
    }

    /// Embedded field texts in storage order.
    pub fn embedded_texts(&self) -> [&str; POSTING_VECTOR_FIELDS] {
        PostingField::ALL.map(|field| self.field(field))
    }
}

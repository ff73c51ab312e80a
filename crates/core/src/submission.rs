//! Create-post payload and required-field validation.

use serde_json::{Map, Value};

use crate::error::CoreError;

pub const FIELD_TITLE: &str = "title";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_META_TITLE: &str = "meta_title";
pub const FIELD_META_KEYWORDS: &str = "meta_keywords";
pub const FIELD_META_DESCRIPTION: &str = "meta_description";
pub const FIELD_IMG_URL: &str = "img_url";

/// Required fields in the order they are checked. The first empty one is
/// the one reported.
pub const REQUIRED_FIELDS: [&str; 6] = [
    FIELD_TITLE,
    FIELD_DESCRIPTION,
    FIELD_META_TITLE,
    FIELD_META_KEYWORDS,
    FIELD_META_DESCRIPTION,
    FIELD_IMG_URL,
];

/// A validated create-post payload. Values are still raw (unsanitized).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub title: String,
    pub description: String,
    pub meta_title: String,
    pub meta_keywords: String,
    pub meta_description: String,
    pub img_url: String,
}

impl Submission {
    /// Validate a raw request body.
    ///
    /// A body that is not a JSON object is treated as having no fields at
    /// all, so it fails on the first required field.
    pub fn from_body(body: &[u8]) -> Result<Self, CoreError> {
        let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        Self::from_json(&value)
    }

    /// Validate an already-parsed JSON document.
    pub fn from_json(value: &Value) -> Result<Self, CoreError> {
        let empty = Map::new();
        let fields = value.as_object().unwrap_or(&empty);

        // Field initializers run top to bottom, matching REQUIRED_FIELDS.
        Ok(Self {
            title: required(fields, FIELD_TITLE)?,
            description: required(fields, FIELD_DESCRIPTION)?,
            meta_title: required(fields, FIELD_META_TITLE)?,
            meta_keywords: required(fields, FIELD_META_KEYWORDS)?,
            meta_description: required(fields, FIELD_META_DESCRIPTION)?,
            img_url: required(fields, FIELD_IMG_URL)?,
        })
    }

    /// The SEO meta fields as `(key, raw value)` pairs, in storage order.
    pub fn meta_fields(&self) -> [(&'static str, &str); 3] {
        [
            (FIELD_META_TITLE, self.meta_title.as_str()),
            (FIELD_META_KEYWORDS, self.meta_keywords.as_str()),
            (FIELD_META_DESCRIPTION, self.meta_description.as_str()),
        ]
    }
}

/// A field counts as present only when it is a non-empty string.
fn required(fields: &Map<String, Value>, name: &'static str) -> Result<String, CoreError> {
    match fields.get(name) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(CoreError::MissingField(name)),
    }
}

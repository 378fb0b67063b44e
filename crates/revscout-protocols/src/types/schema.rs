//! Locator schema inferred for one crawl.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SchemaInferenceError;

/// The six locators a crawl needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocatorKey {
    ReviewContainer,
    Title,
    Body,
    Rating,
    Reviewer,
    NextPage,
}

impl LocatorKey {
    pub const ALL: [LocatorKey; 6] = [
        LocatorKey::ReviewContainer,
        LocatorKey::Title,
        LocatorKey::Body,
        LocatorKey::Rating,
        LocatorKey::Reviewer,
        LocatorKey::NextPage,
    ];

    /// Wire name used in inference replies.
    pub fn as_str(&self) -> &'static str {
        match self {
            LocatorKey::ReviewContainer => "review_container",
            LocatorKey::Title => "title",
            LocatorKey::Body => "body",
            LocatorKey::Rating => "rating",
            LocatorKey::Reviewer => "reviewer",
            LocatorKey::NextPage => "next_page",
        }
    }

    /// Alternate spelling accepted in replies.
    fn alias(&self) -> Option<&'static str> {
        match self {
            LocatorKey::ReviewContainer => Some("reviewContainer"),
            LocatorKey::NextPage => Some("nextPage"),
            _ => None,
        }
    }
}

impl std::fmt::Display for LocatorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element locators for one site.
///
/// Only constructed through a validating parse, so every instance carries six
/// non-empty locators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocatorSchema {
    review_container: String,
    title: String,
    body: String,
    rating: String,
    reviewer: String,
    next_page: String,
}

impl LocatorSchema {
    /// Validate a decoded inference reply.
    ///
    /// Keys other than the six locators are ignored. Locator values are kept
    /// byte-for-byte.
    pub fn from_reply_value(value: &Value) -> Result<Self, SchemaInferenceError> {
        let object = value.as_object().ok_or_else(|| {
            SchemaInferenceError::Malformed(format!(
                "expected a JSON object, got {}",
                json_kind(value)
            ))
        })?;

        let mut missing = Vec::new();
        let mut found: Vec<(LocatorKey, String)> = Vec::with_capacity(LocatorKey::ALL.len());
        for key in LocatorKey::ALL {
            match lookup(object, key) {
                Some(locator) => found.push((key, locator.to_string())),
                None => missing.push(key.as_str()),
            }
        }
        if !missing.is_empty() {
            return Err(SchemaInferenceError::MissingLocators { keys: missing });
        }

        Self::from_pairs(found)
    }

    /// Build a schema from explicit locators, applying the same validation.
    pub fn from_locators(
        review_container: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        rating: impl Into<String>,
        reviewer: impl Into<String>,
        next_page: impl Into<String>,
    ) -> Result<Self, SchemaInferenceError> {
        Self::from_pairs(vec![
            (LocatorKey::ReviewContainer, review_container.into()),
            (LocatorKey::Title, title.into()),
            (LocatorKey::Body, body.into()),
            (LocatorKey::Rating, rating.into()),
            (LocatorKey::Reviewer, reviewer.into()),
            (LocatorKey::NextPage, next_page.into()),
        ])
    }

    fn from_pairs(pairs: Vec<(LocatorKey, String)>) -> Result<Self, SchemaInferenceError> {
        if let Some((key, _)) = pairs.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(SchemaInferenceError::EmptyLocator { key: key.as_str() });
        }

        let mut schema = Self {
            review_container: String::new(),
            title: String::new(),
            body: String::new(),
            rating: String::new(),
            reviewer: String::new(),
            next_page: String::new(),
        };
        for (key, locator) in pairs {
            *schema.slot_mut(key) = locator;
        }
        Ok(schema)
    }

    fn slot_mut(&mut self, key: LocatorKey) -> &mut String {
        match key {
            LocatorKey::ReviewContainer => &mut self.review_container,
            LocatorKey::Title => &mut self.title,
            LocatorKey::Body => &mut self.body,
            LocatorKey::Rating => &mut self.rating,
            LocatorKey::Reviewer => &mut self.reviewer,
            LocatorKey::NextPage => &mut self.next_page,
        }
    }

    /// Locator for the given key.
    pub fn get(&self, key: LocatorKey) -> &str {
        match key {
            LocatorKey::ReviewContainer => &self.review_container,
            LocatorKey::Title => &self.title,
            LocatorKey::Body => &self.body,
            LocatorKey::Rating => &self.rating,
            LocatorKey::Reviewer => &self.reviewer,
            LocatorKey::NextPage => &self.next_page,
        }
    }

    pub fn review_container(&self) -> &str {
        &self.review_container
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn rating(&self) -> &str {
        &self.rating
    }

    pub fn reviewer(&self) -> &str {
        &self.reviewer
    }

    pub fn next_page(&self) -> &str {
        &self.next_page
    }
}

fn lookup<'a>(object: &'a Map<String, Value>, key: LocatorKey) -> Option<&'a str> {
    object
        .get(key.as_str())
        .or_else(|| key.alias().and_then(|alias| object.get(alias)))
        .and_then(Value::as_str)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ValidationError;
use crate::types::{ContentItem, CustomFields, HeroContent, TestimonialFields};

/// Value-level checks applied after a record deserializes.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError> { Ok(()) }
}

impl Validate for CustomFields {}

impl Validate for Value {}

impl<F: Validate> Validate for ContentItem<F> {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.id == 0 {
            return Err(ValidationError::new("id", "must be a positive integer"));
        }
        match &self.acf {
            Some(acf) => acf.validate(),
            None => Ok(()),
        }
    }
}

impl Validate for TestimonialFields {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError::new("acf.rating", format!("{} is outside 1..=5", self.rating)));
        }
        Ok(())
    }
}

impl Validate for HeroContent {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::new("title", "must not be empty"));
        }
        Ok(())
    }
}

/// Deserialize then check one element of a response.
pub fn validate_item<T>(item: Value) -> Result<T, ValidationError>
where T: DeserializeOwned + Validate {
    let parsed: T = serde_json::from_value(item).map_err(|e| ValidationError::new("shape", e.to_string()))?;
    parsed.validate()?;
    Ok(parsed)
}

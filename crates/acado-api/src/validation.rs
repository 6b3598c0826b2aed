//! Declarative request-body schemas.
//!
//! Every write endpoint describes its body as a [`Schema`]. The schema is
//! checked against the raw JSON before deserialization, so a request that
//! fails it never reaches a service or repository.
//!
//! ```
//! use acado_api::validation::{Field, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::new()
//!     .field(Field::string("title").required().max_len(200))
//!     .field(Field::email("authorEmail").required())
//!     .field(Field::one_of("visibility", &["public", "staff"]))
//!     .field(Field::string_array("keywords"));
//!
//! assert!(schema.validate(&json!({"title": "Hi", "authorEmail": "a@b.io"})).is_ok());
//! assert!(schema.validate(&json!({"title": "Hi", "authorEmail": "nope"})).is_err());
//! ```

use std::sync::LazyLock;

use acado_core::Error;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Expected JSON type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Any string.
    String,
    /// A string in `local@domain.tld` form.
    Email,
    /// A string drawn from a fixed set.
    OneOf(&'static [&'static str]),
    /// An array whose items are all strings.
    StringArray,
    /// `true` or `false`.
    Boolean,
}

/// One field of a [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: &'static str,
    kind: FieldKind,
    required: bool,
    non_blank: bool,
    max_len: Option<usize>,
}

impl Field {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            non_blank: false,
            max_len: None,
        }
    }

    /// Optional string field.
    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::String)
    }

    /// Optional email field.
    pub fn email(name: &'static str) -> Self {
        Self::new(name, FieldKind::Email)
    }

    /// Optional enum field.
    pub fn one_of(name: &'static str, values: &'static [&'static str]) -> Self {
        Self::new(name, FieldKind::OneOf(values))
    }

    /// Optional array-of-strings field.
    pub fn string_array(name: &'static str) -> Self {
        Self::new(name, FieldKind::StringArray)
    }

    /// Optional boolean field.
    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// Require the field to be present, non-null and, for strings, non-blank.
    pub fn required(mut self) -> Self {
        self.required = true;
        self.non_blank = true;
        self
    }

    /// Limit string length (in characters). Applies to each item of a
    /// string array.
    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Field name as it appears in the JSON body.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn check(&self, value: Option<&Value>) -> Result<(), Error> {
        let value = match value {
            None | Some(Value::Null) if self.required => {
                return Err(Error::validation_field(self.name, "is required"));
            }
            None | Some(Value::Null) => return Ok(()),
            Some(value) => value,
        };

        match &self.kind {
            FieldKind::String => {
                let text = self.expect_str(value)?;
                if self.non_blank && text.trim().is_empty() {
                    return Err(Error::validation_field(self.name, "must not be empty"));
                }
                self.check_len(text)
            }
            FieldKind::Email => {
                let text = self.expect_str(value)?;
                if !EMAIL.is_match(text.trim()) {
                    return Err(Error::validation_field(self.name, "must be a valid email address"));
                }
                self.check_len(text)
            }
            FieldKind::OneOf(values) => {
                let text = self.expect_str(value)?;
                if values.contains(&text) {
                    Ok(())
                } else {
                    Err(Error::validation_field(
                        self.name,
                        format!("must be one of: {}", values.join(", ")),
                    ))
                }
            }
            FieldKind::StringArray => {
                let items = value.as_array().ok_or_else(|| {
                    Error::validation_field(self.name, "must be an array of strings")
                })?;
                for item in items {
                    let text = item.as_str().ok_or_else(|| {
                        Error::validation_field(self.name, "must be an array of strings")
                    })?;
                    self.check_len(text)?;
                }
                Ok(())
            }
            FieldKind::Boolean => {
                if value.is_boolean() {
                    Ok(())
                } else {
                    Err(Error::validation_field(self.name, "must be a boolean"))
                }
            }
        }
    }

    fn expect_str<'v>(&self, value: &'v Value) -> Result<&'v str, Error> {
        value
            .as_str()
            .ok_or_else(|| Error::validation_field(self.name, "must be a string"))
    }

    fn check_len(&self, text: &str) -> Result<(), Error> {
        match self.max_len {
            Some(max) if text.chars().count() > max => Err(Error::validation_field(
                self.name,
                format!("must be at most {max} characters"),
            )),
            _ => Ok(()),
        }
    }
}

/// A JSON object schema: named fields, no unknown keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Empty schema; only `{}` passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// The same schema with every field optional, for partial updates.
    ///
    /// Fields that were required still reject a blank string when present.
    pub fn partial(mut self) -> Self {
        for field in &mut self.fields {
            field.required = false;
        }
        self
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Check a request body. Reports the first failing field.
    pub fn validate(&self, body: &Value) -> Result<(), Error> {
        let object = body
            .as_object()
            .ok_or_else(|| Error::validation("request body must be a JSON object"))?;

        if let Some(unknown) = object
            .keys()
            .find(|key| !self.fields.iter().any(|f| f.name == key.as_str()))
        {
            return Err(Error::validation_field(unknown.as_str(), "is not allowed"));
        }

        for field in &self.fields {
            field.check(object.get(field.name))?;
        }
        Ok(())
    }

    /// Validate, then deserialize into `T`.
    pub fn parse<T: DeserializeOwned>(&self, body: Value) -> Result<T, Error> {
        self.validate(&body)?;
        serde_json::from_value(body).map_err(|e| Error::validation(e.to_string()))
    }
}

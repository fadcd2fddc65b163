//! Typed accessors over a resolved payload.
//!
//! A field is a list of JSON pointers tried in order plus a reader that turns the
//! first matching value into `T`. Whether the field is required is part of its
//! type: a missing [`Required`] fails the whole extraction, a missing
//! [`Optional`] yields `T::default()`.

use serde_json::Value;

use crate::ScrapeError;

pub type Reader<T> = fn(&Value) -> Option<T>;

fn first_match<T>(payload: &Value, pointers: &[&str], read: Reader<T>) -> Option<T> {
    pointers
        .iter()
        .filter_map(|pointer| payload.pointer(pointer))
        .find_map(read)
}

pub struct Required<T> {
    pub name: &'static str,
    pub pointers: &'static [&'static str],
    pub read: Reader<T>,
}

impl<T> Required<T> {
    pub fn extract(&self, payload: &Value) -> Result<T, ScrapeError> {
        let value = first_match(payload, self.pointers, self.read)
            .ok_or(ScrapeError::MalformedPayload { field: self.name })?;
        tracing::debug!(field = self.name, "extracted");
        Ok(value)
    }
}

pub struct Optional<T> {
    pub name: &'static str,
    pub pointers: &'static [&'static str],
    pub read: Reader<T>,
}

impl<T: Default> Optional<T> {
    pub fn extract(&self, payload: &Value) -> T {
        match first_match(payload, self.pointers, self.read) {
            Some(value) => value,
            None => {
                tracing::debug!(field = self.name, "absent, using default");
                T::default()
            }
        }
    }
}

/// Non-empty string
pub fn string(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn boolean(value: &Value) -> Option<bool> {
    value.as_bool()
}

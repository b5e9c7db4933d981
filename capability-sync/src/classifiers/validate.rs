//! Structural validators for entitlement values.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsValidator {
    /// `true` or `false`.
    Boolean,
    /// A single string from the allowed set.
    StringEnum(&'static [&'static str]),
    /// An array whose every element is in the allowed set.
    StringArray(&'static [&'static str]),
    /// An array of arbitrary strings.
    AnyStringArray,
    /// An array whose every element starts with one of the prefixes and has
    /// something after it.
    PrefixedStringArray(&'static [&'static str]),
}

impl OptionsValidator {
    pub fn validate(&self, value: &Value) -> bool {
        match self {
            Self::Boolean => value.is_boolean(),
            Self::StringEnum(allowed) => value.as_str().is_some_and(|s| allowed.contains(&s)),
            Self::StringArray(allowed) => {
                string_items(value).is_some_and(|items| items.iter().all(|s| allowed.contains(s)))
            }
            Self::AnyStringArray => string_items(value).is_some(),
            Self::PrefixedStringArray(prefixes) => string_items(value).is_some_and(|items| {
                items.iter().all(|s| {
                    prefixes
                        .iter()
                        .any(|p| s.len() > p.len() && s.starts_with(p))
                })
            }),
        }
    }
}

/// The elements of a string array, or `None` if `value` is not one.
pub fn string_items(value: &Value) -> Option<Vec<&str>> {
    value.as_array()?.iter().map(Value::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boolean() {
        assert!(OptionsValidator::Boolean.validate(&json!(true)));
        assert!(OptionsValidator::Boolean.validate(&json!(false)));
        assert!(!OptionsValidator::Boolean.validate(&json!("true")));
    }

    #[test]
    fn test_string_enum() {
        let v = OptionsValidator::StringEnum(&["development", "production"]);
        assert!(v.validate(&json!("production")));
        assert!(!v.validate(&json!("staging")));
        assert!(!v.validate(&json!(["production"])));
    }

    #[test]
    fn test_string_array() {
        let v = OptionsValidator::StringArray(&["NDEF", "TAG"]);
        assert!(v.validate(&json!(["NDEF"])));
        assert!(v.validate(&json!(["NDEF", "TAG"])));
        assert!(!v.validate(&json!(["NDEF", "PACE"])));
        assert!(!v.validate(&json!("NDEF")));
    }

    #[test]
    fn test_any_string_array() {
        assert!(OptionsValidator::AnyStringArray.validate(&json!(["anything"])));
        assert!(!OptionsValidator::AnyStringArray.validate(&json!([1, 2])));
    }

    #[test]
    fn test_prefixed_string_array() {
        let v = OptionsValidator::PrefixedStringArray(&["merchant."]);
        assert!(v.validate(&json!(["merchant.com.example"])));
        assert!(!v.validate(&json!(["com.example"])));
        assert!(!v.validate(&json!(["merchant."])));
        assert!(!v.validate(&json!(["merchant.a", 7])));
    }
}

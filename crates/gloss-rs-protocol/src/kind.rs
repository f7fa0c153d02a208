//! Failure kinds reported by the document mapper.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Category of a single-field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Required,
    Min,
    Max,
    MinLength,
    MaxLength,
    Enum,
    Regexp,
    /// Value could not be cast to the declared type.
    Type,
    /// Duplicate-key constraint violation.
    Unique,
    /// User-supplied validator; its own message is authoritative.
    Validate,
    /// Any kind the mapper reports that has no dedicated handling.
    Other(String),
}

impl FailureKind {
    /// Parse a raw kind token. The mapper reports custom validators as
    /// `"user defined"`, which maps to [`FailureKind::Validate`].
    pub fn parse(raw: &str) -> Self {
        match raw {
            "required" => Self::Required,
            "min" => Self::Min,
            "max" => Self::Max,
            "minlength" => Self::MinLength,
            "maxlength" => Self::MaxLength,
            "enum" => Self::Enum,
            "regexp" => Self::Regexp,
            "type" => Self::Type,
            "unique" => Self::Unique,
            "validate" | "user defined" => Self::Validate,
            other => Self::Other(other.to_string()),
        }
    }

    /// Key used for template and context-map lookups.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Min => "min",
            Self::Max => "max",
            Self::MinLength => "minlength",
            Self::MaxLength => "maxlength",
            Self::Enum => "enum",
            Self::Regexp => "regexp",
            Self::Type => "type",
            Self::Unique => "unique",
            Self::Validate => "validate",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FailureKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FailureKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::FailureKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn user_defined_maps_to_validate() {
        assert_eq!(FailureKind::parse("user defined"), FailureKind::Validate);
        assert_eq!(FailureKind::Validate.as_str(), "validate");
    }

    #[test]
    fn unknown_kinds_round_trip_their_token() {
        let kind = FailureKind::parse("ObjectId");
        assert_eq!(kind, FailureKind::Other("ObjectId".to_string()));
        assert_eq!(kind.to_string(), "ObjectId");
    }
}

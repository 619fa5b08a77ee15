use std::fmt;

use serde::{Deserialize, Serialize};

pub const ALTERED_GROUP_NAME: &str = "Altered group";
pub const UNALTERED_GROUP_NAME: &str = "Unaltered group";

/// Policy for samples that belong to more than one selected group.
///
/// Values read back from a parameter store are kept verbatim, so an
/// unrecognised strategy survives as [`OverlapStrategy::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum OverlapStrategy {
    Include,
    #[default]
    Exclude,
    Other(String),
}

impl OverlapStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            OverlapStrategy::Include => "Include",
            OverlapStrategy::Exclude => "Exclude",
            OverlapStrategy::Other(value) => value,
        }
    }
}

impl fmt::Display for OverlapStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for OverlapStrategy {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Include" => OverlapStrategy::Include,
            "Exclude" => OverlapStrategy::Exclude,
            _ => OverlapStrategy::Other(value),
        }
    }
}

impl From<&str> for OverlapStrategy {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl Serialize for OverlapStrategy {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupOrigin {
    #[default]
    BuiltIn,
    UserCreated,
}

/// A named cohort. Membership is owned by whoever produced the group and is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub origin: GroupOrigin,
    #[serde(default)]
    pub members: serde_json::Value,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: GroupOrigin::BuiltIn,
            members: serde_json::Value::Null,
        }
    }

    pub fn user_created(name: impl Into<String>) -> Self {
        Self {
            origin: GroupOrigin::UserCreated,
            ..Self::new(name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionGroup {
    pub name: String,
    #[serde(default)]
    pub members: serde_json::Value,
}

/// Groups the user created during a comparison, as stored by the session
/// service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComparisonSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub groups: Vec<SessionGroup>,
    #[serde(default)]
    pub origin: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

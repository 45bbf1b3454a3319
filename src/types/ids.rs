use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use uuid::Uuid;

/// NotionId - A general-purpose Notion ID that can represent any type of object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotionId(String); // Store the non-hyphenated version internally

impl NotionId {
    /// Returns the ID as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the hyphenated UUID format for API compatibility.
    pub fn to_hyphenated(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            &self.0[0..8],
            &self.0[8..12],
            &self.0[12..16],
            &self.0[16..20],
            &self.0[20..32]
        )
    }

    /// Returns the ID as a UUID.
    pub fn to_uuid(&self) -> Uuid {
        // The inner string is always 32 validated hex characters.
        Uuid::parse_str(&self.0).unwrap_or_default()
    }

    /// Creates a NotionId from a validated hex string.
    fn from_hex(hex: &str) -> Result<Self, ValidationError> {
        if hex.len() == 32 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(NotionId(hex.to_lowercase()))
        } else {
            Err(ValidationError::InvalidId(format!(
                "Invalid Notion ID format: {}",
                hex
            )))
        }
    }

    /// Parses various Notion ID formats: dashed UUIDs, bare hex and Notion URLs.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim().trim_end_matches('/');

        // 1. UUID format with dashes
        if let Ok(uuid) = Uuid::parse_str(cleaned) {
            return Ok(NotionId(uuid.as_simple().to_string()));
        }

        // 2. Direct 32-char hex ID
        if cleaned.len() == 32 && cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
            return Self::from_hex(cleaned);
        }

        // 3. Extract from URLs
        if cleaned.contains("notion") {
            return Self::extract_from_url(cleaned);
        }

        Err(ValidationError::InvalidId(format!(
            "Could not parse Notion ID from: {}",
            input
        )))
    }

    /// Extracts ID from Notion URLs.
    fn extract_from_url(url: &str) -> Result<Self, ValidationError> {
        lazy_static::lazy_static! {
            static ref ID_REGEX: Regex = Regex::new(
                r"(?:[/-])([a-fA-F0-9]{32}|[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12})(?:[/?#]|$)"
            ).expect("Failed to compile Notion ID regex - this is a bug in the code");
        }

        if let Some(captures) = ID_REGEX.captures(url) {
            if let Some(id_match) = captures.get(1) {
                let id = id_match.as_str().replace('-', "");
                return Self::from_hex(&id);
            }
        }

        Err(ValidationError::InvalidId(format!(
            "No valid ID found in URL: {}",
            url
        )))
    }
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NotionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for NotionId {
    fn from(uuid: Uuid) -> Self {
        NotionId(uuid.as_simple().to_string())
    }
}

impl Serialize for NotionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_hyphenated().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NotionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NotionId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Strong typing for IDs with phantom types
pub struct Id<T> {
    id: NotionId,
    _phantom: PhantomData<T>,
}

/// Marker types for different ID kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserMarker;

pub type PageId = Id<PageMarker>;
pub type DatabaseId = Id<DatabaseMarker>;
pub type UserId = Id<UserMarker>;

impl<T> Id<T> {
    /// Parse various Notion ID formats into a typed ID
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        NotionId::parse(input).map(Self::from_notion_id)
    }

    pub fn from_notion_id(id: NotionId) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Create a new random v4 UUID ID
    pub fn new_v4() -> Self {
        Self::from_notion_id(NotionId::from(Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        self.id.as_str()
    }

    pub fn as_notion_id(&self) -> &NotionId {
        &self.id
    }

    pub fn to_hyphenated(&self) -> String {
        self.id.to_hyphenated()
    }
}

// Manual impls so the marker type needs no bounds of its own.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::from_notion_id(self.id.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.id.as_str()).finish()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.id.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        NotionId::deserialize(deserializer).map(Self::from_notion_id)
    }
}

impl<T> From<Id<T>> for NotionId {
    fn from(id: Id<T>) -> Self {
        id.id
    }
}

impl<T> From<&Id<T>> for NotionId {
    fn from(id: &Id<T>) -> Self {
        id.id.clone()
    }
}

/// Anything a caller may use to point at a Notion object.
///
/// Strings (ids or URLs) are validated when resolved; typed ids and UUIDs
/// resolve infallibly.
pub trait ObjRef {
    fn resolve(&self) -> Result<NotionId, ValidationError>;
}

impl ObjRef for str {
    fn resolve(&self) -> Result<NotionId, ValidationError> {
        NotionId::parse(self)
    }
}

impl ObjRef for String {
    fn resolve(&self) -> Result<NotionId, ValidationError> {
        NotionId::parse(self)
    }
}

impl ObjRef for Uuid {
    fn resolve(&self) -> Result<NotionId, ValidationError> {
        Ok(NotionId::from(*self))
    }
}

impl ObjRef for NotionId {
    fn resolve(&self) -> Result<NotionId, ValidationError> {
        Ok(self.clone())
    }
}

impl<T> ObjRef for Id<T> {
    fn resolve(&self) -> Result<NotionId, ValidationError> {
        Ok(self.id.clone())
    }
}

impl<R: ObjRef + ?Sized> ObjRef for &R {
    fn resolve(&self) -> Result<NotionId, ValidationError> {
        (**self).resolve()
    }
}

//! Wire DTOs for the client/backend boundary.
//!
//! DESIGN
//! ======
//! The backend's user payloads are loosely shaped (mixed casing, numeric or
//! string ids, missing fields). Everything passes through `UserRecord`, an
//! all-optional lenient decode, and only a `User` that survives
//! `User::try_from` flows further into the session core.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// A validated ChirpNest identity.
///
/// Serialized in camelCase; this is the exact form written to durable storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable unique identifier. Never empty.
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined_date: Option<String>,
}

/// Why a user payload was refused.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UserShapeError {
    #[error("user payload is not valid JSON: {0}")]
    Json(String),
    #[error("user payload has an unexpected shape: {0}")]
    Shape(String),
    #[error("user id is missing or empty")]
    MissingId,
}

/// Lenient decode target for backend and storage user payloads.
#[derive(Debug, Default, Deserialize)]
struct UserRecord {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default, rename = "_id")]
    object_id: Option<serde_json::Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "fullName", alias = "full_name")]
    full_name: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default, rename = "avatarUrl", alias = "avatar_url")]
    avatar_url: Option<String>,
    #[serde(default)]
    verified: Option<bool>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default, rename = "joinedDate", alias = "joined_date")]
    joined_date: Option<String>,
}

/// Accept string ids and non-zero numeric ids; everything else is falsy.
fn truthy_id(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        serde_json::Value::Number(n) => {
            let is_zero = n.as_f64().is_some_and(|f| f == 0.0);
            (!is_zero).then(|| n.to_string())
        }
        _ => None,
    }
}

impl TryFrom<UserRecord> for User {
    type Error = UserShapeError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let id = truthy_id(record.id)
            .or_else(|| truthy_id(record.object_id))
            .ok_or(UserShapeError::MissingId)?;
        Ok(Self {
            id,
            name: record.name.or(record.full_name).unwrap_or_default(),
            username: record.username.unwrap_or_default(),
            email: record.email.unwrap_or_default(),
            avatar: record.avatar.or(record.avatar_url),
            verified: record.verified.unwrap_or(false),
            bio: record.bio,
            location: record.location,
            website: record.website,
            joined_date: record.joined_date,
        })
    }
}

impl User {
    /// Validate an already-decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns `UserShapeError` when the value is not an object of the expected
    /// field types or carries no truthy `id`.
    pub fn from_value(value: serde_json::Value) -> Result<Self, UserShapeError> {
        if !value.is_object() {
            return Err(UserShapeError::Shape("expected a JSON object".to_owned()));
        }
        let record: UserRecord =
            serde_json::from_value(value).map_err(|e| UserShapeError::Shape(e.to_string()))?;
        Self::try_from(record)
    }

    /// Parse and validate a serialized user.
    ///
    /// # Errors
    ///
    /// Returns `UserShapeError::Json` for unparsable text, otherwise as
    /// [`User::from_value`].
    pub fn from_json_str(raw: &str) -> Result<Self, UserShapeError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| UserShapeError::Json(e.to_string()))?;
        Self::from_value(value)
    }

    /// Whether this identity is usable for an authenticated session.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

/// Partial profile update merged into the current user. `id` is not patchable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub verified: Option<bool>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
}

impl UserPatch {
    pub(crate) fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if self.avatar.is_some() {
            user.avatar = self.avatar;
        }
        if let Some(verified) = self.verified {
            user.verified = verified;
        }
        if self.bio.is_some() {
            user.bio = self.bio;
        }
        if self.location.is_some() {
            user.location = self.location;
        }
        if self.website.is_some() {
            user.website = self.website;
        }
    }
}

/// Body for the authentication endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body for the registration endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub username: &'a str,
    pub full_name: &'a str,
}

/// Body for the generic query endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest<'a> {
    pub query: &'a str,
    pub db_url: &'a str,
    pub db_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_schema: Option<bool>,
}

/// Response envelope shared by the login and signup endpoints.
///
/// `data` stays untyped here; it is validated into a `User` by the caller so a
/// malformed user never becomes a decode error indistinguishable from a
/// transport failure.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

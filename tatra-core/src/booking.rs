use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::ValidationError;

/// Fields owned by the server. Clients never set them on create.
pub const SERVER_FIELDS: [&str; 3] = ["id", "status", "createdAt"];

/// A tour reservation as persisted in the bookings document.
///
/// Only `id`, `status` and `createdAt` are interpreted. Everything the booking
/// form sends (tour, dates, traveler and emergency contact details, notes) is
/// kept verbatim in `details` and flattened back into the same JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub status: BookingStatus,
    /// Always written with millisecond precision (`2024-06-10T08:53:20.000Z`)
    #[serde(serialize_with = "rfc3339_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

fn rfc3339_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Older documents may hold numeric ids sent by clients.
fn id_from_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "booking id must be a string or number, got {other}"
        ))),
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(ValidationError::invalid(
                "status",
                format!("unknown status {other:?}"),
            )),
        }
    }
}

impl Booking {
    /// Build a fresh `pending` booking from a client payload.
    ///
    /// Any `id`, `status` or `createdAt` in the payload is dropped.
    pub fn new(id: String, mut payload: Map<String, Value>, now: DateTime<Utc>) -> Self {
        for field in SERVER_FIELDS {
            payload.remove(field);
        }
        Self {
            id,
            status: BookingStatus::Pending,
            created_at: now.trunc_subsecs(3),
            details: payload,
        }
    }

    /// Shallow merge: patch fields override, everything else is kept.
    pub fn apply(&mut self, patch: BookingPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.details.extend(patch.fields);
    }

    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(Value::as_str)
    }
}

/// Partial update for an existing booking
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingPatch {
    pub status: Option<BookingStatus>,
    pub fields: Map<String, Value>,
}

impl BookingPatch {
    pub fn status(status: BookingStatus) -> Self {
        Self {
            status: Some(status),
            fields: Map::new(),
        }
    }
}

impl TryFrom<Map<String, Value>> for BookingPatch {
    type Error = ValidationError;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        for immutable in ["id", "createdAt"] {
            if fields.contains_key(immutable) {
                return Err(ValidationError::Immutable(immutable.to_string()));
            }
        }

        let status = match fields.remove("status") {
            None => None,
            Some(Value::String(s)) => Some(s.parse()?),
            Some(other) => {
                return Err(ValidationError::invalid(
                    "status",
                    format!("expected a string, got {other}"),
                ))
            }
        };

        Ok(Self { status, fields })
    }
}

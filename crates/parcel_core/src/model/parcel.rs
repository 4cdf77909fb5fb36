//! Parcel record and status values.
//!
//! # Responsibility
//! - Define the canonical shipment record stored in the `parcel` table.
//! - Map status values to and from their stored text form.
//!
//! # Invariants
//! - Only `ParcelStatus::Registered` unlocks address changes and deletion.
//! - Unknown stored statuses round-trip unchanged through `ParcelStatus::Other`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Storage-assigned parcel identifier (SQLite rowid).
pub type ParcelNumber = i64;

/// Identifier of the client that owns a parcel. Opaque to this crate.
pub type ClientId = i64;

/// Text stored for `ParcelStatus::Registered`.
pub const STATUS_REGISTERED: &str = "registered";
/// Text stored for `ParcelStatus::Sent`.
pub const STATUS_SENT: &str = "sent";
/// Text stored for `ParcelStatus::Delivered`.
pub const STATUS_DELIVERED: &str = "delivered";

/// Status text outside the known set.
///
/// Only built by `ParcelStatus::parse` and the `From` conversions, so it never
/// holds `registered`, `sent` or `delivered`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownStatus(String);

impl UnknownStatus {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Delivery state of a parcel.
///
/// Storage accepts any status text, so values outside the known set are kept
/// verbatim in `Other` instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParcelStatus {
    /// Accepted for shipping; address and existence are still mutable.
    Registered,
    /// Handed over to the carrier.
    Sent,
    /// Received by the addressee.
    Delivered,
    /// Any other stored value.
    Other(UnknownStatus),
}

impl ParcelStatus {
    /// Returns the text persisted in `parcel.status`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Registered => STATUS_REGISTERED,
            Self::Sent => STATUS_SENT,
            Self::Delivered => STATUS_DELIVERED,
            Self::Other(value) => value.as_str(),
        }
    }

    /// Parses stored status text. Never fails.
    pub fn parse(value: &str) -> Self {
        Self::known(value).unwrap_or_else(|| Self::Other(UnknownStatus(value.to_string())))
    }

    fn known(value: &str) -> Option<Self> {
        match value {
            STATUS_REGISTERED => Some(Self::Registered),
            STATUS_SENT => Some(Self::Sent),
            STATUS_DELIVERED => Some(Self::Delivered),
            _ => None,
        }
    }

    /// Returns whether address changes and deletion are allowed.
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered)
    }

    /// Returns the next state on the forward delivery path.
    ///
    /// `Delivered` and unknown statuses have no successor.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Registered => Some(Self::Sent),
            Self::Sent => Some(Self::Delivered),
            Self::Delivered | Self::Other(_) => None,
        }
    }
}

impl Display for ParcelStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ParcelStatus {
    fn from(value: String) -> Self {
        Self::known(&value).unwrap_or_else(|| Self::Other(UnknownStatus(value)))
    }
}

impl From<&str> for ParcelStatus {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<ParcelStatus> for String {
    fn from(value: ParcelStatus) -> Self {
        match value {
            ParcelStatus::Other(UnknownStatus(text)) => text,
            known => known.as_str().to_string(),
        }
    }
}

/// Shipment record as stored in the `parcel` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Assigned by storage on insert; ignored by `add`.
    pub number: ParcelNumber,
    pub client: ClientId,
    pub status: ParcelStatus,
    pub address: String,
    /// Creation timestamp text, written once.
    pub created_at: String,
}

impl Parcel {
    /// Creates an unsaved `registered` parcel.
    ///
    /// `number` stays `0` until the repository assigns one.
    pub fn new(client: ClientId, address: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            number: 0,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: created_at.into(),
        }
    }

    /// Returns whether the parcel may still change address or be deleted.
    pub fn is_mutable(&self) -> bool {
        self.status.is_registered()
    }
}

#[cfg(test)]
mod tests {
    use super::{Parcel, ParcelStatus};

    #[test]
    fn parse_maps_known_values_and_keeps_unknown_text() {
        assert_eq!(ParcelStatus::parse("registered"), ParcelStatus::Registered);
        assert_eq!(ParcelStatus::parse("sent"), ParcelStatus::Sent);
        assert_eq!(ParcelStatus::parse("delivered"), ParcelStatus::Delivered);
        assert!(matches!(ParcelStatus::parse("lost"), ParcelStatus::Other(_)));
        assert_eq!(ParcelStatus::parse("lost").as_str(), "lost");
    }

    #[test]
    fn known_text_never_becomes_other() {
        for text in ["registered", "sent", "delivered"] {
            assert!(!matches!(ParcelStatus::parse(text), ParcelStatus::Other(_)));
            assert!(!matches!(
                ParcelStatus::from(text.to_string()),
                ParcelStatus::Other(_)
            ));
        }
        assert!(ParcelStatus::from("registered".to_string()).is_registered());
    }

    #[test]
    fn next_walks_forward_and_stops_at_delivered() {
        assert_eq!(ParcelStatus::Registered.next(), Some(ParcelStatus::Sent));
        assert_eq!(ParcelStatus::Sent.next(), Some(ParcelStatus::Delivered));
        assert_eq!(ParcelStatus::Delivered.next(), None);
        assert_eq!(ParcelStatus::parse("lost").next(), None);
    }

    #[test]
    fn new_parcel_starts_registered_and_unnumbered() {
        let parcel = Parcel::new(7, "Main st 1", "2026-01-01T00:00:00Z");
        assert_eq!(parcel.number, 0);
        assert_eq!(parcel.status, ParcelStatus::Registered);
        assert!(parcel.is_mutable());
    }
}

//! The `room` event payload exchanged between the detector and the hub.
//!
//! On the wire the flag is a **string** (`"true"` / `"false"`), not a JSON
//! boolean; receivers written against that format depend on it. Inbound
//! parsing is lenient and also accepts real booleans.

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::presence::TransitionEvent;

/// Name of the event carried by the inbound webhook.
pub const ROOM_EVENT: &str = "room";

/// `{"person_in_room": "true" | "false"}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPayload {
    #[serde(
        serialize_with = "serialize_flag",
        deserialize_with = "deserialize_flag"
    )]
    pub person_in_room: bool,
}

impl From<&TransitionEvent> for RoomPayload {
    fn from(event: &TransitionEvent) -> Self {
        Self {
            person_in_room: event.person_in_room,
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "true" } else { "false" })
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    struct FlagVisitor;

    impl Visitor<'_> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a boolean or the string \"true\" / \"false\"")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            match v.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(E::custom(
                    crate::error::ValidationError::InvalidPresenceValue(v.to_string()),
                )),
            }
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_flag_as_string() {
        let body = serde_json::to_string(&RoomPayload {
            person_in_room: true,
        })
        .unwrap();
        assert_eq!(body, r#"{"person_in_room":"true"}"#);

        let body = serde_json::to_string(&RoomPayload {
            person_in_room: false,
        })
        .unwrap();
        assert_eq!(body, r#"{"person_in_room":"false"}"#);
    }

    #[test]
    fn should_accept_string_flag() {
        let payload: RoomPayload = serde_json::from_str(r#"{"person_in_room":"false"}"#).unwrap();
        assert!(!payload.person_in_room);
    }

    #[test]
    fn should_accept_boolean_flag() {
        let payload: RoomPayload = serde_json::from_str(r#"{"person_in_room":true}"#).unwrap();
        assert!(payload.person_in_room);
    }

    #[test]
    fn should_accept_capitalised_string() {
        let payload: RoomPayload = serde_json::from_str(r#"{"person_in_room":"True"}"#).unwrap();
        assert!(payload.person_in_room);
    }

    #[test]
    fn should_reject_other_strings() {
        let err = serde_json::from_str::<RoomPayload>(r#"{"person_in_room":"yes"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid person_in_room value `yes`"));
    }

    #[test]
    fn should_reject_missing_flag() {
        assert!(serde_json::from_str::<RoomPayload>("{}").is_err());
    }
}

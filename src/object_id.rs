//! The native 12-byte document identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ObjectIdError;

/// A 12-byte identifier, written as 24 hexadecimal characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Length of the hex encoding.
    pub const HEX_LEN: usize = 24;

    /// Wrap raw identifier bytes.
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// The raw identifier bytes.
    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Parse the 24-character hex form. Upper and lower case are accepted.
    pub fn parse_str(s: &str) -> Result<Self, ObjectIdError> {
        let length = s.chars().count();
        if length != Self::HEX_LEN {
            return Err(ObjectIdError::InvalidLength { length });
        }

        let mut bytes = [0u8; 12];
        let mut high = 0u8;
        for (index, character) in s.chars().enumerate() {
            let nibble = character
                .to_digit(16)
                .ok_or(ObjectIdError::InvalidCharacter { character, index })?
                as u8;
            if index % 2 == 0 {
                high = nibble;
            } else {
                bytes[index / 2] = (high << 4) | nibble;
            }
        }
        Ok(Self(bytes))
    }

    /// Render as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId(\"{}\")", self.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "52f044dee2896a8264d7ec2f";

    #[test]
    fn parse_and_render_round_trip() {
        let id = ObjectId::parse_str(HEX).unwrap();
        assert_eq!(id.to_hex(), HEX);
        assert_eq!(id.to_string(), HEX);
        assert_eq!(id.bytes()[0], 0x52);
        assert_eq!(id.bytes()[11], 0x2f);
    }

    #[test]
    fn parse_accepts_upper_case_and_renders_lower() {
        let id: ObjectId = "52F044DEE2896A8264D7EC2F".parse().unwrap();
        assert_eq!(id.to_hex(), HEX);
    }

    #[test]
    fn parse_rejects_short_string() {
        let err = ObjectId::parse_str("52f044dee2896a8264d7ec2").unwrap_err();
        assert_eq!(err, ObjectIdError::InvalidLength { length: 23 });
    }

    #[test]
    fn parse_rejects_non_hex() {
        let err = ObjectId::parse_str("52f044dee2896a8264d7ec2g").unwrap_err();
        assert_eq!(
            err,
            ObjectIdError::InvalidCharacter {
                character: 'g',
                index: 23
            }
        );
    }

    #[test]
    fn parse_rejects_multibyte_input_without_panicking() {
        assert!(ObjectId::parse_str("é2f044dee2896a8264d7ec2f").is_err());
        assert!(ObjectId::parse_str("é2f044dee2896a8264d7ec2").is_err());
    }

    #[test]
    fn serde_uses_hex_string() {
        let id = ObjectId::parse_str(HEX).unwrap();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::json!(HEX));

        let back: ObjectId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_value::<ObjectId>(serde_json::json!("xyz")).is_err());
    }

    #[test]
    fn debug_shows_hex() {
        let id = ObjectId::parse_str(HEX).unwrap();
        assert_eq!(format!("{id:?}"), format!("ObjectId(\"{HEX}\")"));
    }
}

use core::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};
use serde::{
    de::{Error, Unexpected, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

/// Opaque twelve-byte record identifier. The first four bytes hold the creation second and the
/// remaining eight a process-wide counter, so identifiers sort in creation order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id([u8; 12]);

/// The string was not 24 hexadecimal digits.
#[derive(Debug, PartialEq, Eq)]
pub struct InvalidId;

impl Id {
    pub const fn new(seconds: u32, counter: u64) -> Self {
        let secs = seconds.to_be_bytes();
        let count = counter.to_be_bytes();
        Self([
            secs[0], secs[1], secs[2], secs[3], count[0], count[1], count[2], count[3], count[4], count[5], count[6],
            count[7],
        ])
    }

    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(self) -> [u8; 12] {
        self.0
    }

    fn encode(self, buf: &mut [u8; 24]) -> &str {
        // Both buffers have fixed lengths that always agree.
        if hex::encode_to_slice(self.0, &mut buf[..]).is_err() {
            return "";
        }
        core::str::from_utf8(&buf[..]).unwrap_or_default()
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut buf = [0; 24];
        f.write_str(self.encode(&mut buf))
    }
}

impl Debug for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Id({self})")
    }
}

impl FromStr for Id {
    type Err = InvalidId;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0; 12];
        hex::decode_to_slice(text, &mut bytes).map_err(|_| InvalidId)?;
        Ok(Self(bytes))
    }
}

impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut buf = [0; 24];
        serializer.serialize_str(self.encode(&mut buf))
    }
}

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = Id;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a 24-digit hexadecimal identifier")
    }

    fn visit_str<E>(self, text: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        text.parse().map_err(|_| E::invalid_value(Unexpected::Str(text), &self))
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(IdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{Id, InvalidId};
    use std::string::ToString;

    #[test]
    fn displays_as_lowercase_hex() {
        let id = Id::new(0x0102_0304, 0xAB);
        assert_eq!(id.to_string(), "0102030400000000000000ab");
        assert_eq!("0102030400000000000000ab".parse::<Id>(), Ok(id));
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!("".parse::<Id>(), Err(InvalidId));
        assert_eq!("0102".parse::<Id>(), Err(InvalidId));
        assert_eq!("zz02030400000000000000ab".parse::<Id>(), Err(InvalidId));
        assert_eq!("0102030400000000000000ab00".parse::<Id>(), Err(InvalidId));
    }

    #[test]
    fn orders_by_creation() {
        assert!(Id::new(5, 1) < Id::new(5, 2));
        assert!(Id::new(5, 9) < Id::new(6, 0));
    }

    #[test]
    fn json_round_trip() {
        let id = Id::new(42, 7);
        let text = serde_json::to_string(&id).unwrap();
        assert_eq!(text, "\"0000002a0000000000000007\"");
        assert_eq!(serde_json::from_str::<Id>(&text).unwrap(), id);
        assert!(serde_json::from_str::<Id>("\"nope\"").is_err());
    }
}

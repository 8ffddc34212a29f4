use std::fmt;

use serde::{de::Visitor, Deserialize, Serialize};

use crate::bytes::FixedString;

impl<const N: usize> Serialize for FixedString<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.as_str())
    }
}

struct FixedStringVisitor<const N: usize>;

impl<'de, const N: usize> Visitor<'de> for FixedStringVisitor<N> {
    type Value = FixedString<N>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a string of at most {} bytes", N.saturating_sub(1))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(FixedString::new(value))
    }
}

impl<'de, const N: usize> Deserialize<'de> for FixedString<N> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(FixedStringVisitor::<N>)
    }
}

//! Tolerant decoding helpers for vendor payloads.
//!
//! The cloud reports fields with shapes that drift between firmware
//! versions. A field or channel that does not match the model decodes as
//! "absent" instead of failing the whole device.

use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::channel::FunctionalChannel;

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

impl<T> Lenient<T> {
    fn valid(self) -> Option<T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }
}

/// Decode an optional field; a value of the wrong shape becomes `None`.
pub(crate) fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Lenient<T>>::deserialize(deserializer)?.and_then(Lenient::valid))
}

/// Decode a channel map; a channel that cannot be decoded becomes
/// [`FunctionalChannel::Unsupported`].
pub(crate) fn channels<'de, D>(deserializer: D) -> Result<BTreeMap<u32, FunctionalChannel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<u32, Lenient<FunctionalChannel>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(index, channel)| {
            (
                index,
                channel.valid().unwrap_or(FunctionalChannel::Unsupported),
            )
        })
        .collect())
}

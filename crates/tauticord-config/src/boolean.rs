// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lenient boolean and id parsing for configuration values.
//!
//! Booleans accept `true/false`, `yes/no`, `on/off`, `1/0` and
//! `enable/disable` in any case. Anything else is an error.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};

const TRUTHY: [&str; 5] = ["true", "yes", "on", "1", "enable"];
const FALSY: [&str; 5] = ["false", "no", "off", "0", "disable"];

/// Parse a boolean spelling.
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    let lowered = raw.trim().to_ascii_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSY.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(format!(
            "`{raw}` is not a boolean (expected one of true/false, yes/no, on/off, 1/0, enable/disable)"
        ))
    }
}

struct FlexibleBool;

impl<'de> Visitor<'de> for FlexibleBool {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean or one of yes/no, on/off, 1/0, enable/disable")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
        match v {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(E::custom(format!("`{other}` is not a boolean"))),
        }
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
        match v {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(E::custom(format!("`{other}` is not a boolean"))),
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
        parse_bool(v).map_err(E::custom)
    }
}

/// `deserialize_with` target for `bool` fields.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    deserializer.deserialize_any(FlexibleBool)
}

struct OptionalFlexibleBool;

impl<'de> Visitor<'de> for OptionalFlexibleBool {
    type Value = Option<bool>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null or a boolean")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserialize(deserializer).map(Some)
    }
}

/// `deserialize_with` target for `Option<bool>` fields.
pub fn deserialize_option<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<bool>, D::Error> {
    deserializer.deserialize_option(OptionalFlexibleBool)
}

struct LenientId;

impl<'de> Visitor<'de> for LenientId {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a numeric id, as a number or a string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
        u64::try_from(v).map_err(|_| E::custom(format!("`{v}` is not a valid id")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed
            .parse()
            .map_err(|_| E::custom(format!("`{v}` is not a valid id")))
    }
}

/// `deserialize_with` target for snowflake ids that may be quoted.
pub fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    deserializer.deserialize_any(LenientId)
}

struct LenientIds;

impl<'de> Visitor<'de> for LenientIds {
    type Value = Vec<u64>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of ids or a comma-separated string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Vec<u64>, E> {
        v.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| LenientId.visit_str(s))
            .collect()
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Vec<u64>, E> {
        Ok(vec![v])
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Vec<u64>, E> {
        LenientId.visit_i64(v).map(|id| vec![id])
    }

    fn visit_unit<E: de::Error>(self) -> Result<Vec<u64>, E> {
        Ok(Vec::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Vec<u64>, E> {
        Ok(Vec::new())
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<u64>, A::Error> {
        #[derive(serde::Deserialize)]
        #[serde(transparent)]
        struct Id(#[serde(deserialize_with = "deserialize_id")] u64);

        let mut ids = Vec::new();
        while let Some(Id(id)) = seq.next_element()? {
            ids.push(id);
        }
        Ok(ids)
    }
}

/// `deserialize_with` target for id lists.
pub fn deserialize_ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
    deserializer.deserialize_any(LenientIds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_documented_spellings_in_any_case() {
        for raw in ["true", "TRUE", "Yes", "on", "1", "Enable", " yes "] {
            assert_eq!(parse_bool(raw), Ok(true), "{raw}");
        }
        for raw in ["false", "No", "OFF", "0", "disable", "DISABLE"] {
            assert_eq!(parse_bool(raw), Ok(false), "{raw}");
        }
    }

    #[test]
    fn rejects_everything_else() {
        for raw in ["", "y", "n", "t", "f", "2", "enabled", "disabled", "truthy", "nope"] {
            assert!(parse_bool(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[derive(serde::Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "deserialize")]
        flag: bool,
        #[serde(default, deserialize_with = "deserialize_option")]
        maybe: Option<bool>,
        #[serde(default, deserialize_with = "deserialize_ids")]
        ids: Vec<u64>,
    }

    #[test]
    fn yaml_values_go_through_the_parser() {
        let sample: Sample = serde_yaml::from_str("flag: 'on'\nmaybe: no\nids: ['12', 34]").unwrap();
        assert!(sample.flag);
        assert_eq!(sample.maybe, Some(false));
        assert_eq!(sample.ids, vec![12, 34]);

        let sample: Sample = serde_yaml::from_str("flag: 0\nmaybe: null").unwrap();
        assert!(!sample.flag);
        assert_eq!(sample.maybe, None);

        assert!(serde_yaml::from_str::<Sample>("flag: maybe").is_err());
    }

    #[test]
    fn comma_separated_ids() {
        let sample: Sample = serde_yaml::from_str("flag: true\nids: '1, 2,3'").unwrap();
        assert_eq!(sample.ids, vec![1, 2, 3]);
    }
}

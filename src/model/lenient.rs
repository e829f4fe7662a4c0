// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scalar decoding shared by the XML and JSON representations.
//!
//! The router writes booleans as `1`/`0`, numbers as element text, and leaves
//! elements empty when a value is unknown. JSON carries the same values as
//! native booleans and numbers. The helpers here accept every one of those
//! spellings so a single set of model types serves both formats. An empty
//! value decodes to the type's default.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};

/// A scalar as it appeared on the wire, before conversion.
enum Raw {
    Empty,
    Bool(bool),
    Text(String),
}

#[derive(Clone, Copy)]
struct RawVisitor;

impl<'de> Visitor<'de> for RawVisitor {
    type Value = Raw;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, a number, or their text form")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Raw, E> {
        Ok(Raw::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Raw, E> {
        Ok(Raw::Text(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Raw, E> {
        Ok(Raw::Text(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Raw, E> {
        Ok(Raw::Text(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Raw, E> {
        let v = v.trim();
        if v.is_empty() {
            Ok(Raw::Empty)
        } else {
            Ok(Raw::Text(v.to_string()))
        }
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Raw, E> {
        self.visit_str(&v)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Raw, E> {
        Ok(Raw::Empty)
    }

    fn visit_none<E: de::Error>(self) -> Result<Raw, E> {
        Ok(Raw::Empty)
    }

    // XML elements reach `deserialize_any` as maps holding a `$text` entry.
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Raw, A::Error> {
        let mut raw = Raw::Empty;
        while let Some(key) = map.next_key::<String>()? {
            if key == "$text" || key == "$value" {
                let text: String = map.next_value()?;
                raw = self.visit_str(&text)?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(raw)
    }
}

/// Decodes `1`/`0`, `true`/`false`, native booleans and empty values.
pub(crate) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match deserializer.deserialize_any(RawVisitor)? {
        Raw::Empty => Ok(false),
        Raw::Bool(v) => Ok(v),
        Raw::Text(text) => match text.as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Str(other),
                &"1, 0, true or false",
            )),
        },
    }
}

/// Decodes numbers from native or text form; empty values become the default.
pub(crate) fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    match deserializer.deserialize_any(RawVisitor)? {
        Raw::Empty => Ok(T::default()),
        Raw::Bool(v) => T::from_str(if v { "1" } else { "0" }).map_err(de::Error::custom),
        Raw::Text(text) => text.parse().map_err(de::Error::custom),
    }
}

/// Like [`number`], but an empty value means "absent".
pub(crate) fn optional_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    struct OptionVisitor<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for OptionVisitor<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        type Value = Option<T>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an optional number")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            match d.deserialize_any(RawVisitor)? {
                Raw::Empty | Raw::Bool(_) => Ok(None),
                Raw::Text(text) => text.parse().map(Some).map_err(de::Error::custom),
            }
        }
    }

    deserializer.deserialize_option(OptionVisitor(PhantomData))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        #[serde(deserialize_with = "flag", default)]
        on: bool,
        #[serde(deserialize_with = "number", default)]
        level: u8,
        #[serde(deserialize_with = "optional_number", default)]
        battery: Option<u8>,
    }

    #[test]
    fn json_native_values() {
        let s: Sample = serde_json::from_str(r#"{"on":true,"level":200,"battery":80}"#).unwrap();
        assert_eq!(
            s,
            Sample {
                on: true,
                level: 200,
                battery: Some(80)
            }
        );
    }

    #[test]
    fn json_text_values() {
        let s: Sample = serde_json::from_str(r#"{"on":"1","level":"12","battery":""}"#).unwrap();
        assert!(s.on);
        assert_eq!(s.level, 12);
        assert_eq!(s.battery, None);
    }

    #[test]
    fn xml_text_values() {
        let s: Sample =
            quick_xml::de::from_str("<s><on>1</on><level>255</level><battery>5</battery></s>")
                .unwrap();
        assert!(s.on);
        assert_eq!(s.level, 255);
        assert_eq!(s.battery, Some(5));
    }

    #[test]
    fn xml_empty_elements_are_defaults() {
        let s: Sample = quick_xml::de::from_str("<s><on/><level></level></s>").unwrap();
        assert!(!s.on);
        assert_eq!(s.level, 0);
        assert_eq!(s.battery, None);
    }

    #[test]
    fn xml_map_values() {
        let mut map = serde_json::Map::new();
        map.insert("unit".into(), "pct".into());
        map.insert("$text".into(), " 42 ".into());
        let raw = serde::de::Deserializer::deserialize_any(
            serde_json::Value::Object(map),
            RawVisitor,
        )
        .unwrap();
        assert!(matches!(raw, Raw::Text(ref t) if t == "42"));

        let s: Sample = serde_json::from_str(r#"{"level":{"$text":"7"},"on":{"$value":"1"}}"#)
            .unwrap();
        assert_eq!(s.level, 7);
        assert!(s.on);
    }

    #[test]
    fn rejects_non_boolean_text() {
        let r: Result<Sample, _> = serde_json::from_str(r#"{"on":"maybe"}"#);
        assert!(r.is_err());
    }
}

//! Decode rules for loosely-typed wire fields
//!
//! The backend sends some integers as either numbers or strings, and some
//! booleans as bools, strings or 0/1. These helpers are only used in
//! `deserialize_with` attributes; everything past the decode boundary works
//! with plain `i64` / `bool`.

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;

struct FlexIntVisitor;

impl<'de> Visitor<'de> for FlexIntVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer or a string containing an integer")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        if v.fract() == 0.0 {
            Ok(v as i64)
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed
            .parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }

    fn visit_none<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<i64, D::Error> {
        d.deserialize_any(self)
    }
}

struct FlexBoolVisitor;

impl<'de> Visitor<'de> for FlexBoolVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a boolean, 0/1, or a string containing either")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
        Ok(v != 0)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
        Ok(v != 0)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
        parse_bool(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
        Ok(false)
    }

    fn visit_none<E: de::Error>(self) -> Result<bool, E> {
        Ok(false)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<bool, D::Error> {
        d.deserialize_any(self)
    }
}

struct FlexTextVisitor;

impl<'de> Visitor<'de> for FlexTextVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number or boolean")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<String, D::Error> {
        d.deserialize_any(self)
    }
}

/// Accepted boolean spellings; the empty string is false.
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "" | "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Integer that may arrive as a JSON number or string. `null` decodes to 0.
pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    d.deserialize_any(FlexIntVisitor)
}

/// Boolean that may arrive as a JSON bool, number or string. `null` decodes to false.
pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    d.deserialize_any(FlexBoolVisitor)
}

/// Scalar rendered as a string (exit codes and cpu units arrive as either)
pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    d.deserialize_any(FlexTextVisitor)
}

/// Treat an explicit `null` as the type's default (nil slices and maps).
pub fn nullable<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "int")]
        id: i64,
        #[serde(default, deserialize_with = "boolean")]
        beta: bool,
        #[serde(default, deserialize_with = "nullable")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "text")]
        code: String,
    }

    fn probe(v: serde_json::Value) -> Probe {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_int_from_number_and_string() {
        assert_eq!(probe(json!({"id": 42})).id, 42);
        assert_eq!(probe(json!({"id": "42"})).id, 42);
        assert_eq!(probe(json!({"id": null})).id, 0);
        assert_eq!(probe(json!({})).id, 0);
    }

    #[test]
    fn test_int_rejects_garbage() {
        let res: Result<Probe, _> = serde_json::from_value(json!({"id": "forty"}));
        assert!(res.is_err());
    }

    #[test]
    fn test_bool_spellings() {
        assert!(probe(json!({"beta": true})).beta);
        assert!(probe(json!({"beta": "1"})).beta);
        assert!(probe(json!({"beta": 1})).beta);
        assert!(probe(json!({"beta": "true"})).beta);
        assert!(!probe(json!({"beta": "0"})).beta);
        assert!(!probe(json!({"beta": ""})).beta);
        assert!(!probe(json!({"beta": null})).beta);
    }

    #[test]
    fn test_text_from_scalars() {
        assert_eq!(probe(json!({"code": 137})).code, "137");
        assert_eq!(probe(json!({"code": "137"})).code, "137");
        assert_eq!(probe(json!({"code": null})).code, "");
    }

    #[test]
    fn test_nullable_slice() {
        assert!(probe(json!({"tags": null})).tags.is_empty());
        assert_eq!(probe(json!({"tags": ["a"]})).tags, vec!["a"]);
    }
}

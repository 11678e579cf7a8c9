//! `POST /registro` body decoding.
//!
//! # Responsibility
//! - Turn a request body into a `RegistrationRequest` with the lenient
//!   rules existing clients rely on.
//!
//! # Invariants
//! - Only the first JSON value is read; bytes after it are ignored.
//! - `cpf` / `numero` keys match ASCII case-insensitively; the last
//!   occurrence in document order wins.
//! - `null` (top-level or per field) leaves the default in place.
//! - Missing fields keep `""` / `0` and then fail validation, so a partial
//!   body is reported as an invalid CPF or code, not as malformed JSON.

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt::Formatter;

const CPF_KEY: &str = "cpf";
const NUMERO_KEY: &str = "numero";

/// Wire body of `POST /registro`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub cpf: String,
    pub numero: i64,
}

impl<'de> Deserialize<'de> for RegistrationRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RegistrationRequestVisitor)
    }
}

struct RegistrationRequestVisitor;

impl<'de> Visitor<'de> for RegistrationRequestVisitor {
    type Value = RegistrationRequest;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a registration object with `cpf` and `numero`")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(RegistrationRequest::default())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut request = RegistrationRequest::default();
        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case(CPF_KEY) {
                if let Some(cpf) = map.next_value::<Option<String>>()? {
                    request.cpf = cpf;
                }
            } else if key.eq_ignore_ascii_case(NUMERO_KEY) {
                if let Some(numero) = map.next_value::<Option<i64>>()? {
                    request.numero = numero;
                }
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(request)
    }
}

/// Decodes the first JSON value in `body`.
///
/// # Errors
/// Returns the JSON error when the body is empty, is not valid JSON up to
/// the end of its first value, or has wrongly typed `cpf` / `numero` values.
pub fn decode_registration(body: &[u8]) -> Result<RegistrationRequest, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    // No `end()`: trailing bytes after the first value are not inspected.
    RegistrationRequest::deserialize(&mut deserializer)
}

#[cfg(test)]
mod tests {
    use super::{decode_registration, RegistrationRequest};

    fn request(cpf: &str, numero: i64) -> RegistrationRequest {
        RegistrationRequest {
            cpf: cpf.to_string(),
            numero,
        }
    }

    #[test]
    fn decodes_plain_body() {
        let decoded =
            decode_registration(br#"{"cpf": "111.444.777-35", "numero": 12345678901}"#).unwrap();
        assert_eq!(decoded, request("111.444.777-35", 12_345_678_901));
    }

    #[test]
    fn keys_match_case_insensitively() {
        let decoded =
            decode_registration(br#"{"CPF": "11144477735", "NuMeRo": 12345678901}"#).unwrap();
        assert_eq!(decoded, request("11144477735", 12_345_678_901));
    }

    #[test]
    fn last_duplicate_key_wins_across_case_variants() {
        let decoded = decode_registration(
            br#"{"numero": 1, "cpf": "a", "Numero": 12345678901, "CPF": "11144477735"}"#,
        )
        .unwrap();
        assert_eq!(decoded, request("11144477735", 12_345_678_901));
    }

    #[test]
    fn null_keeps_defaults_and_earlier_values() {
        assert_eq!(decode_registration(b"null").unwrap(), request("", 0));
        assert_eq!(
            decode_registration(br#"{"cpf": null, "numero": null}"#).unwrap(),
            request("", 0)
        );
        assert_eq!(
            decode_registration(br#"{"cpf": "11144477735", "cpf": null}"#).unwrap(),
            request("11144477735", 0)
        );
    }

    #[test]
    fn bytes_after_first_value_are_ignored() {
        let decoded =
            decode_registration(br#"{"cpf": "11144477735", "numero": 12345678901} trailing {"#)
                .unwrap();
        assert_eq!(decoded, request("11144477735", 12_345_678_901));
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let decoded = decode_registration(
            br#"{"nome": {"deep": [1, 2]}, "cpf": "11144477735", "numero": 12345678901}"#,
        )
        .unwrap();
        assert_eq!(decoded, request("11144477735", 12_345_678_901));
    }

    #[test]
    fn wrong_shapes_are_errors() {
        let bodies: [&[u8]; 8] = [
            b"",
            b"   ",
            b"[]",
            b"\"cpf\"",
            br#"{"cpf": 11144477735}"#,
            br#"{"numero": "12345678901"}"#,
            br#"{"numero": 1.5}"#,
            br#"{"cpf": "11144477735""#,
        ];
        for body in bodies {
            assert!(
                decode_registration(body).is_err(),
                "{} should not decode",
                String::from_utf8_lossy(body)
            );
        }
    }
}

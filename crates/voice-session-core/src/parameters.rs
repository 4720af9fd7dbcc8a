//! Audio parameter strings
//!
//! The audio HAL receives `key=value;key=value` strings. Only the `vsid` and
//! `call_state` keys belong to voice session handling; a string without `vsid`
//! is meant for some other subsystem.

use crate::errors::{VoiceError, VoiceResult};

pub const KEY_VSID: &str = "vsid";
pub const KEY_CALL_STATE: &str = "call_state";

/// Parsed parameter string, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceParameters {
    pairs: Vec<(String, String)>,
}

/// Raw call state request extracted from parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallStateRequest {
    pub vsid: u32,
    pub call_state: i32,
}

impl VoiceParameters {
    /// Parse `key=value` pairs separated by `;`
    ///
    /// Empty segments are skipped. A key without `=` gets an empty value.
    /// Later duplicates override earlier ones on lookup.
    pub fn parse(input: &str) -> Self {
        let pairs = input
            .split(';')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
                None => (segment.to_string(), String::new()),
            })
            .collect();
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Integer value of a key; decimal or `0x` hex, optionally signed
    pub fn get_int(&self, key: &str) -> Option<VoiceResult<i64>> {
        self.get(key)
            .map(|value| parse_int(value).ok_or_else(|| VoiceError::malformed(key, value)))
    }

    /// Remove every occurrence of a key
    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Extract the voice call state request, if these parameters carry one
    ///
    /// Returns `Ok(None)` when there is no `vsid` key. A `vsid` without
    /// `call_state` is an error.
    pub fn call_state_request(&self) -> VoiceResult<Option<CallStateRequest>> {
        let vsid = match self.get_int(KEY_VSID) {
            None => return Ok(None),
            Some(value) => value?,
        };
        let vsid = u32::try_from(vsid).map_err(|_| VoiceError::malformed(KEY_VSID, vsid.to_string()))?;

        let call_state = self
            .get_int(KEY_CALL_STATE)
            .ok_or(VoiceError::MissingParameter(KEY_CALL_STATE))??;
        let call_state = i32::try_from(call_state)
            .map_err(|_| VoiceError::malformed(KEY_CALL_STATE, call_state.to_string()))?;

        Ok(Some(CallStateRequest { vsid, call_state }))
    }
}

impl std::fmt::Display for VoiceParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

/// Parse one optional sign followed by decimal or `0x` hex digits
fn parse_int(value: &str) -> Option<i64> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) if is_digits(hex, 16) => i64::from_str_radix(hex, 16).ok()?,
        None if is_digits(digits, 10) => digits.parse::<i64>().ok()?,
        _ => return None,
    };
    if negative {
        magnitude.checked_neg()
    } else {
        Some(magnitude)
    }
}

// `parse` and `from_str_radix` accept their own sign; only bare digits reach them.
fn is_digits(digits: &str, radix: u32) -> bool {
    !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let params = VoiceParameters::parse("vsid=281022464;call_state=2; routing=2");
        assert_eq!(params.get("routing"), Some("2"));
        assert_eq!(
            params.call_state_request().unwrap(),
            Some(CallStateRequest { vsid: 0x10C0_1000, call_state: 2 })
        );
        assert_eq!(params.to_string(), "vsid=281022464;call_state=2;routing=2");
    }

    #[test]
    fn test_hex_and_signed_values() {
        assert_eq!(parse_int("0x10C01000"), Some(0x10C0_1000));
        assert_eq!(parse_int("-1"), Some(-1));
        assert_eq!(parse_int("+4"), Some(4));
        assert_eq!(parse_int("0xZZ"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("0x"), None);
    }

    #[test]
    fn test_second_sign_rejected() {
        for value in ["--2", "+-2", "-+2", "0x-2", "-0x-2", "0x+2", "--9223372036854775808"] {
            assert_eq!(parse_int(value), None, "{}", value);

            let params = VoiceParameters::parse(&format!("vsid=0x10C01000;call_state={}", value));
            assert!(
                matches!(
                    params.call_state_request(),
                    Err(VoiceError::MalformedParameter { .. })
                ),
                "{}",
                value
            );
        }
    }

    #[test]
    fn test_signed_extremes() {
        assert_eq!(parse_int("-9223372036854775807"), Some(-i64::MAX));
        assert_eq!(parse_int("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_int("9223372036854775808"), None);

        let params = VoiceParameters::parse("vsid=0x10C01000;call_state=-9223372036854775807");
        assert!(matches!(
            params.call_state_request(),
            Err(VoiceError::MalformedParameter { .. })
        ));
    }

    #[test]
    fn test_not_for_voice() {
        let params = VoiceParameters::parse("routing=2;screen_state=on");
        assert_eq!(params.call_state_request().unwrap(), None);
    }

    #[test]
    fn test_missing_call_state() {
        let params = VoiceParameters::parse("vsid=0x10C01000");
        assert!(matches!(
            params.call_state_request(),
            Err(VoiceError::MissingParameter(KEY_CALL_STATE))
        ));
    }

    #[test]
    fn test_malformed_values() {
        let params = VoiceParameters::parse("vsid=abc;call_state=2");
        assert!(matches!(
            params.call_state_request(),
            Err(VoiceError::MalformedParameter { .. })
        ));

        let params = VoiceParameters::parse("vsid=-5;call_state=2");
        assert!(params.call_state_request().is_err());
    }

    #[test]
    fn test_remove() {
        let mut params = VoiceParameters::parse("vsid=1;vsid=2;call_state=1");
        assert_eq!(params.get("vsid"), Some("2"));
        params.remove("vsid");
        assert_eq!(params.get("vsid"), None);
        assert!(!params.is_empty());
    }
}

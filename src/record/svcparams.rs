//! RFC 9460 SVCB/HTTPS parameter list, presentation format.
//!
//! Parses and serializes the space-separated `key` / `key=value` parameter
//! string carried by SVCB and HTTPS records, including quoting, `\DDD`
//! decimal-octet escapes and per-key comma-separated value lists.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum accepted length of a SvcParams presentation string, in bytes.
pub const MAX_SVC_PARAMS_LEN: usize = 4096;

/// Error produced while parsing a SvcParams presentation string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SvcParamsError {
    /// Input exceeds [`MAX_SVC_PARAMS_LEN`].
    #[error("SvcParams string too long: {len} bytes (maximum {MAX_SVC_PARAMS_LEN})")]
    TooLong {
        /// Length of the rejected input.
        len: usize,
    },

    /// An unescaped character that may not appear in a value.
    #[error("illegal unescaped character '{ch}' in SvcParams value at byte {pos}")]
    IllegalCharacter {
        /// The offending character.
        ch: char,
        /// Byte offset into the input.
        pos: usize,
    },

    /// A quoted value with no closing quote.
    #[error("unterminated quoted value in SvcParams")]
    UnterminatedQuote,

    /// A `\` escape that is neither a 3-digit decimal octet nor a visible
    /// non-digit ASCII character.
    #[error("illegal escape sequence in SvcParams value at byte {pos}")]
    IllegalEscape {
        /// Byte offset of the backslash.
        pos: usize,
    },
}

/// One `key=value-list` parameter of an SVCB/HTTPS record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvcParam {
    /// Lowercase parameter key (e.g. `"alpn"`).
    pub key: String,
    /// Parameter values; empty for bare flag keys such as `no-default-alpn`.
    pub values: Vec<String>,
}

/// The parameter list of an SVCB/HTTPS record, in discovery order.
///
/// Keys are kept in the order they were inserted or parsed; equality compares
/// keys and value lists in order. A key with an empty value list is a bare
/// flag and serializes without `=`.
///
/// ```
/// use zonekit::record::SvcParams;
///
/// let params = SvcParams::parse(r#"alpn="h2,h3" no-default-alpn port=443"#)?;
/// assert_eq!(params.get("alpn"), Some(&["h2".to_string(), "h3".to_string()][..]));
/// assert_eq!(params.get("no-default-alpn"), Some(&[][..]));
/// # Ok::<(), zonekit::record::SvcParamsError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvcParams(pub Vec<SvcParam>);

impl SvcParams {
    /// Creates an empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the list holds no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends a parameter; the key is lowercased.
    pub fn push(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.0.push(SvcParam {
            key: key.into().to_ascii_lowercase(),
            values,
        });
    }

    /// Returns the value list of the first parameter with the given key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.values.as_slice())
    }

    /// Parses an RFC 9460 presentation-format parameter string.
    ///
    /// Surrounding whitespace is trimmed. An empty input yields an empty list.
    /// A `key=` token with an empty value is normalized to a bare flag.
    pub fn parse(input: &str) -> Result<Self, SvcParamsError> {
        let input = input.trim();
        if input.len() > MAX_SVC_PARAMS_LEN {
            return Err(SvcParamsError::TooLong { len: input.len() });
        }

        let bytes = input.as_bytes();
        let mut params = Self::new();
        let mut i = 0;

        while i < bytes.len() {
            // Skip inter-token whitespace.
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }

            // Key runs until '=' or whitespace.
            let key_start = i;
            while i < bytes.len() && bytes[i] != b'=' && !bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let key = input[key_start..i].to_ascii_lowercase();

            if i >= bytes.len() || bytes[i] != b'=' {
                // Bare flag key with no value.
                params.0.push(SvcParam {
                    key,
                    values: Vec::new(),
                });
                continue;
            }
            i += 1; // consume '='

            let (values, next) = parse_value_list(input, i)?;
            i = next;
            params.0.push(SvcParam { key, values });
        }

        Ok(params)
    }
}

/// Parses one (possibly quoted) value starting at byte `i`, resolving escapes
/// and splitting on unescaped commas. Returns the value list and the offset of
/// the first byte after the value.
fn parse_value_list(input: &str, mut i: usize) -> Result<(Vec<String>, usize), SvcParamsError> {
    let bytes = input.as_bytes();
    let mut quoted = false;
    if i < bytes.len() && bytes[i] == b'"' {
        quoted = true;
        i += 1;
    }

    let mut values = Vec::new();
    let mut current = String::new();

    loop {
        if i >= bytes.len() {
            if quoted {
                return Err(SvcParamsError::UnterminatedQuote);
            }
            break;
        }
        match bytes[i] {
            b'"' if quoted => {
                i += 1;
                break;
            }
            b'"' => {
                return Err(SvcParamsError::IllegalCharacter { ch: '"', pos: i });
            }
            b';' | b'(' | b')' => {
                return Err(SvcParamsError::IllegalCharacter {
                    ch: bytes[i] as char,
                    pos: i,
                });
            }
            b'\\' => {
                let (ch, next) = parse_escape(bytes, i)?;
                current.push(ch);
                i = next;
            }
            b',' => {
                values.push(std::mem::take(&mut current));
                i += 1;
            }
            b if b.is_ascii_whitespace() && !quoted => break,
            b if b.is_ascii() => {
                current.push(b as char);
                i += 1;
            }
            _ => {
                // i only ever lands on char boundaries, so this picks up the
                // whole multi-byte character.
                let Some(ch) = input[i..].chars().next() else {
                    break;
                };
                current.push(ch);
                i += ch.len_utf8();
            }
        }
    }

    // "key=" with nothing after it degrades to a bare flag; otherwise the
    // trailing piece (possibly empty, after a comma) belongs to the list.
    if !current.is_empty() || !values.is_empty() {
        values.push(current);
    }

    Ok((values, i))
}

/// Resolves a `\`-escape at byte `pos`: either `\DDD` (three decimal digits,
/// one literal octet 0-255) or `\X` for a visible non-digit ASCII `X`.
fn parse_escape(bytes: &[u8], pos: usize) -> Result<(char, usize), SvcParamsError> {
    let first = match bytes.get(pos + 1) {
        Some(&b) => b,
        None => return Err(SvcParamsError::IllegalEscape { pos }),
    };

    if first.is_ascii_digit() {
        let digits = bytes
            .get(pos + 1..pos + 4)
            .filter(|d| d.iter().all(u8::is_ascii_digit))
            .ok_or(SvcParamsError::IllegalEscape { pos })?;
        let code = u32::from(digits[0] - b'0') * 100
            + u32::from(digits[1] - b'0') * 10
            + u32::from(digits[2] - b'0');
        if code > 255 {
            return Err(SvcParamsError::IllegalEscape { pos });
        }
        // The octet is carried as a single char; values above 0x7F survive
        // the serialize side through re-escaping in Display.
        Ok((code as u8 as char, pos + 4))
    } else if first.is_ascii_graphic() {
        Ok((first as char, pos + 2))
    } else {
        Err(SvcParamsError::IllegalEscape { pos })
    }
}

impl fmt::Display for SvcParams {
    /// Serializes back to presentation format.
    ///
    /// A key emits `=` only when at least one of its values is non-empty. The
    /// whole comma-joined value list is quoted when any value contains a quote
    /// or a space; `"`, `,` and `\` inside values are always
    /// backslash-escaped, and non-printable characters below U+0100 are
    /// emitted as `\DDD`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, param) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&param.key)?;

            let has_value = param.values.iter().any(|v| !v.is_empty());
            let needs_quotes = param
                .values
                .iter()
                .any(|v| v.contains('"') || v.contains(' '));

            if has_value {
                f.write_str("=")?;
            }
            if needs_quotes {
                f.write_str("\"")?;
            }
            for (vi, value) in param.values.iter().enumerate() {
                if vi > 0 {
                    f.write_str(",")?;
                }
                write_escaped(f, value)?;
            }
            if needs_quotes {
                f.write_str("\"")?;
            }
        }
        Ok(())
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    for ch in value.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            ',' => f.write_str("\\,")?,
            '\\' => f.write_str("\\\\")?,
            c if (c as u32) < 0x100 && !c.is_ascii_graphic() && c != ' ' => {
                write!(f, "\\{:03}", c as u32)?;
            }
            c => write!(f, "{c}")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vals(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    // ---- parsing ----

    #[test]
    fn parse_mixed_flags_and_values() {
        let input = r#"alpn="h2,h3" no-default-alpn ipv6hint=2001:db8::1 port=443"#;
        let params = SvcParams::parse(input).unwrap();

        assert_eq!(params.get("alpn"), Some(&vals(&["h2", "h3"])[..]));
        assert_eq!(params.get("no-default-alpn"), Some(&[][..]));
        assert_eq!(params.get("ipv6hint"), Some(&vals(&["2001:db8::1"])[..]));
        assert_eq!(params.get("port"), Some(&vals(&["443"])[..]));
        assert_eq!(params.0.len(), 4);
    }

    #[test]
    fn parse_empty_input() {
        let params = SvcParams::parse("").unwrap();
        assert!(params.is_empty());
        let params = SvcParams::parse("   ").unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn parse_unquoted_value() {
        let params = SvcParams::parse("port=8443").unwrap();
        assert_eq!(params.get("port"), Some(&vals(&["8443"])[..]));
    }

    #[test]
    fn parse_keys_are_lowercased() {
        let params = SvcParams::parse("ALPN=h2").unwrap();
        assert_eq!(params.get("alpn"), Some(&vals(&["h2"])[..]));
    }

    #[test]
    fn parse_quoted_value_with_space() {
        let params = SvcParams::parse(r#"key="a b""#).unwrap();
        assert_eq!(params.get("key"), Some(&vals(&["a b"])[..]));
    }

    #[test]
    fn parse_escaped_quote_inside_quotes() {
        let params = SvcParams::parse(r#"key="a\"b""#).unwrap();
        assert_eq!(params.get("key"), Some(&vals(&["a\"b"])[..]));
    }

    #[test]
    fn parse_escaped_comma_does_not_split() {
        let params = SvcParams::parse(r"key=a\,b").unwrap();
        assert_eq!(params.get("key"), Some(&vals(&["a,b"])[..]));
    }

    #[test]
    fn parse_decimal_octet_escape() {
        let params = SvcParams::parse(r"key=a\044b").unwrap();
        assert_eq!(params.get("key"), Some(&vals(&["a,b"])[..]));
    }

    #[test]
    fn parse_high_octet_escape() {
        let params = SvcParams::parse(r"key=\255").unwrap();
        assert_eq!(params.get("key"), Some(&vals(&["\u{ff}"])[..]));
    }

    #[test]
    fn parse_multibyte_value() {
        let params = SvcParams::parse("key=caf\u{e9}").unwrap();
        assert_eq!(params.get("key"), Some(&vals(&["caf\u{e9}"])[..]));
    }

    #[test]
    fn parse_escaped_backslash() {
        let params = SvcParams::parse(r"key=a\\b").unwrap();
        assert_eq!(params.get("key"), Some(&vals(&[r"a\b"])[..]));
    }

    #[test]
    fn parse_empty_value_is_flag() {
        let params = SvcParams::parse("key=").unwrap();
        assert_eq!(params.get("key"), Some(&[][..]));
    }

    #[test]
    fn parse_trailing_comma_keeps_empty_value() {
        let params = SvcParams::parse("key=a,").unwrap();
        assert_eq!(params.get("key"), Some(&vals(&["a", ""])[..]));
    }

    #[test]
    fn parse_too_long_rejected() {
        let input = format!("key={}", "a".repeat(MAX_SVC_PARAMS_LEN));
        let err = SvcParams::parse(&input).unwrap_err();
        assert!(matches!(err, SvcParamsError::TooLong { .. }));
    }

    #[test]
    fn parse_unquoted_quote_rejected() {
        let err = SvcParams::parse(r#"key=a"b"#).unwrap_err();
        assert!(matches!(
            err,
            SvcParamsError::IllegalCharacter { ch: '"', .. }
        ));
    }

    #[test]
    fn parse_unterminated_quote_rejected() {
        let err = SvcParams::parse(r#"key="abc"#).unwrap_err();
        assert_eq!(err, SvcParamsError::UnterminatedQuote);
    }

    #[test]
    fn parse_semicolon_rejected() {
        let err = SvcParams::parse("key=a;b").unwrap_err();
        assert!(matches!(
            err,
            SvcParamsError::IllegalCharacter { ch: ';', .. }
        ));
    }

    #[test]
    fn parse_parens_rejected() {
        assert!(matches!(
            SvcParams::parse("key=(a)").unwrap_err(),
            SvcParamsError::IllegalCharacter { ch: '(', .. }
        ));
    }

    #[test]
    fn parse_escaped_semicolon_accepted() {
        let params = SvcParams::parse(r"key=a\;b").unwrap();
        assert_eq!(params.get("key"), Some(&vals(&["a;b"])[..]));
    }

    #[test]
    fn parse_bad_escape_rejected() {
        // Two digits only.
        assert!(matches!(
            SvcParams::parse(r"key=a\04").unwrap_err(),
            SvcParamsError::IllegalEscape { .. }
        ));
        // Octet out of range.
        assert!(matches!(
            SvcParams::parse(r"key=a\299b").unwrap_err(),
            SvcParamsError::IllegalEscape { .. }
        ));
        // Dangling backslash.
        assert!(matches!(
            SvcParams::parse(r"key=a\").unwrap_err(),
            SvcParamsError::IllegalEscape { .. }
        ));
    }

    // ---- serialization ----

    #[test]
    fn display_flag_without_equals() {
        let mut params = SvcParams::new();
        params.push("no-default-alpn", Vec::new());
        assert_eq!(params.to_string(), "no-default-alpn");
    }

    #[test]
    fn display_comma_joined_values() {
        let mut params = SvcParams::new();
        params.push("alpn", vals(&["h2", "h3"]));
        assert_eq!(params.to_string(), "alpn=h2,h3");
    }

    #[test]
    fn display_escapes_comma_inside_value() {
        let mut params = SvcParams::new();
        params.push("key", vals(&["a,b"]));
        assert_eq!(params.to_string(), r"key=a\,b");
    }

    #[test]
    fn display_escapes_backslash() {
        let mut params = SvcParams::new();
        params.push("key", vals(&[r"a\b"]));
        assert_eq!(params.to_string(), r"key=a\\b");
    }

    #[test]
    fn display_quotes_values_with_spaces() {
        let mut params = SvcParams::new();
        params.push("key", vals(&["a b"]));
        assert_eq!(params.to_string(), r#"key="a b""#);
    }

    #[test]
    fn display_escapes_quotes() {
        let mut params = SvcParams::new();
        params.push("key", vals(&["a\"b"]));
        assert_eq!(params.to_string(), r#"key="a\"b""#);
    }

    // ---- round trip ----

    #[test]
    fn round_trip_preserves_structure() {
        let inputs = [
            r#"alpn="h2,h3" no-default-alpn ipv6hint=2001:db8::1 port=443"#,
            r"key=a\,b other=1,2,3",
            "mandatory=alpn,port port=443",
            r#"echconfig="AB CD""#,
            "flag",
        ];
        for input in inputs {
            let parsed = SvcParams::parse(input).unwrap();
            let reparsed = SvcParams::parse(&parsed.to_string()).unwrap();
            assert_eq!(parsed, reparsed, "round trip failed for {input:?}");
        }
    }

    #[test]
    fn round_trip_constructed_value() {
        let mut params = SvcParams::new();
        params.push("alpn", vals(&["h2", "h3"]));
        params.push("no-default-alpn", Vec::new());
        params.push("key", vals(&["with space", "and\"quote"]));

        let reparsed = SvcParams::parse(&params.to_string()).unwrap();
        assert_eq!(reparsed, params);
    }

    #[test]
    fn round_trip_high_octet() {
        let mut params = SvcParams::new();
        params.push("key", vals(&["\u{ff}"]));
        let reparsed = SvcParams::parse(&params.to_string()).unwrap();
        assert_eq!(reparsed, params);
    }

    #[test]
    fn round_trip_backslash_and_multibyte() {
        let mut params = SvcParams::new();
        params.push("key", vals(&[r"a\b", "caf\u{e9}", "\u{65e5}\u{672c}"]));
        let reparsed = SvcParams::parse(&params.to_string()).unwrap();
        assert_eq!(reparsed, params);
    }
}

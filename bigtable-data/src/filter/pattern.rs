use std::fmt::Write;

use regex::bytes::RegexBuilder;

use crate::error::ValidationError;

const MAX_LABEL_LEN: usize = 15;

/// Checks that `pattern` is a usable byte regex.
///
/// Patterns are evaluated by the service with RE2 semantics over raw bytes, so
/// validation runs with Unicode disabled. RE2's `\C` (any single byte) has no
/// direct counterpart here and is rewritten before compiling.
pub(crate) fn validate_bytes_regex(pattern: &[u8]) -> Result<(), ValidationError> {
    let translated = translate_re2(pattern);
    RegexBuilder::new(&translated)
        .unicode(false)
        .build()
        .map(|_| ())
        .map_err(|err| ValidationError::InvalidRegex {
            pattern: String::from_utf8_lossy(pattern).to_string(),
            reason: err.to_string(),
        })
}

pub(crate) fn validate_family_regex(pattern: &str) -> Result<(), ValidationError> {
    if pattern.contains(':') {
        return Err(ValidationError::FamilyRegexContainsColon(
            pattern.to_string(),
        ));
    }
    validate_bytes_regex(pattern.as_bytes())
}

/// Column family ids have the form `[_a-zA-Z0-9][-_.a-zA-Z0-9]*`.
pub(crate) fn validate_family_id(family: &str) -> Result<(), ValidationError> {
    let mut chars = family.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphanumeric() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidFamilyId(family.to_string()))
    }
}

pub(crate) fn validate_label(label: &str) -> Result<(), ValidationError> {
    let valid = !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidLabel(label.to_string()))
    }
}

fn translate_re2(pattern: &[u8]) -> String {
    let mut translated = String::with_capacity(pattern.len());
    let mut escaped = false;
    for chunk in pattern.utf8_chunks() {
        for c in chunk.valid().chars() {
            match (escaped, c) {
                (false, '\\') => escaped = true,
                (false, c) => translated.push(c),
                (true, 'C') => {
                    translated.push_str("(?s-u:.)");
                    escaped = false;
                }
                (true, c) => {
                    translated.push('\\');
                    translated.push(c);
                    escaped = false;
                }
            }
        }
        // A raw byte matches itself whether or not it was escaped.
        for byte in chunk.invalid() {
            escaped = false;
            let _ = write!(translated, "\\x{:02X}", byte);
        }
    }
    if escaped {
        translated.push('\\');
    }
    translated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_byte_escape_is_accepted() {
        assert!(validate_bytes_regex(br"row-\C*").is_ok());
        assert_eq!(translate_re2(br"a\Cb"), "a(?s-u:.)b");
        // An escaped backslash followed by C is a literal, not the any-byte class.
        assert_eq!(translate_re2(br"a\\C"), r"a\\C");
    }

    #[test]
    fn test_non_utf8_bytes_become_escapes() {
        assert_eq!(translate_re2(&[b'a', 0xFF]), r"a\xFF");
        assert!(validate_bytes_regex(&[b'a', 0xFF, b'+']).is_ok());
    }

    #[test]
    fn test_escaped_non_utf8_byte_stays_a_byte() {
        assert_eq!(translate_re2(&[b'a', b'\\', 0xFF]), r"a\xFF");
        assert_eq!(translate_re2(&[b'\\', b'\\', 0xFF]), r"\\\xFF");
        assert!(validate_bytes_regex(&[b'\\', 0xFF, b'+']).is_ok());
    }

    #[test]
    fn test_invalid_regex() {
        let err = validate_bytes_regex(b"key-[").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRegex { .. }));
    }

    #[test]
    fn test_family_regex_rejects_colon() {
        assert_eq!(
            validate_family_regex("cf:q"),
            Err(ValidationError::FamilyRegexContainsColon("cf:q".to_string()))
        );
        assert!(validate_family_regex("cf[0-9]+").is_ok());
    }

    #[test]
    fn test_family_ids() {
        assert!(validate_family_id("cf1").is_ok());
        assert!(validate_family_id("_meta.v2-x").is_ok());
        assert!(validate_family_id("").is_err());
        assert!(validate_family_id("-cf").is_err());
        assert!(validate_family_id("cf:q").is_err());
    }

    #[test]
    fn test_labels() {
        assert!(validate_label("hot-path-1").is_ok());
        assert!(validate_label("").is_err());
        assert!(validate_label("Upper").is_err());
        assert!(validate_label("sixteen-chars-xx").is_err());
    }
}

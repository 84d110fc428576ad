//! RFC 2616 byte classification predicates used throughout the parser and
//! percent-codec.

/// `CHAR` — any byte from the US-ASCII range.
#[inline]
pub(crate) fn is_char(b: u8) -> bool {
    b <= 0x7F
}

/// `CTL` — a control byte (0x00..=0x1F or 0x7F).
#[inline]
pub(crate) fn is_control(b: u8) -> bool {
    b <= 0x1F || b == 0x7F
}

#[inline]
pub(crate) fn is_space(b: u8) -> bool {
    b == b' '
}

#[inline]
pub(crate) fn is_tab(b: u8) -> bool {
    b == b'\t'
}

#[inline]
pub(crate) fn is_space_or_tab(b: u8) -> bool {
    is_space(b) || is_tab(b)
}

#[inline]
pub(crate) fn is_carriage_return(b: u8) -> bool {
    b == b'\r'
}

#[inline]
pub(crate) fn is_line_feed(b: u8) -> bool {
    b == b'\n'
}

#[inline]
pub(crate) fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

/// RFC 2616 `separators` — bytes that delimit tokens and are therefore not
/// themselves valid inside one.
#[inline]
fn is_separator(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')'
            | b'<'
            | b'>'
            | b'@'
            | b','
            | b';'
            | b':'
            | b'\\'
            | b'"'
            | b'/'
            | b'['
            | b']'
            | b'?'
            | b'='
            | b'{'
            | b'}'
    ) || is_space_or_tab(b)
}

/// `token` — a `CHAR` that is neither a `CTL` nor a separator. Used for
/// header field names.
#[inline]
pub(crate) fn is_token(b: u8) -> bool {
    is_char(b) && !is_control(b) && !is_separator(b)
}

/// Bytes permitted inside a header field value: any non-control byte. The
/// parser's own SP/HT handling for OWS and LWS is layered on top of this.
#[inline]
pub(crate) fn is_field_value_byte(b: u8) -> bool {
    !is_control(b)
}

/// Characters that pass through percent-encoding unescaped.
#[inline]
pub(crate) fn is_url_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_accepts_tchars_rejects_separators_and_ctl() {
        for &b in b"abcXYZ019!#$%&'*+-.^_`|~" {
            assert!(is_token(b), "expected token byte 0x{b:02X}");
        }
        for &b in b" \t\r\n@[]{}():;\"" {
            assert!(!is_token(b), "expected non-token byte 0x{b:02X}");
        }
    }

    #[test]
    fn field_value_byte_accepts_sp_htab_obs_text_rejects_ctl() {
        assert!(is_field_value_byte(b' '));
        assert!(is_field_value_byte(b'\t'));
        assert!(is_field_value_byte(0x80));
        assert!(is_field_value_byte(0xFF));
        assert!(!is_field_value_byte(0x00));
        assert!(!is_field_value_byte(0x1F));
        assert!(!is_field_value_byte(0x7F));
    }

    #[test]
    fn url_safe_matches_percent_codec_contract() {
        assert!(is_url_safe(b'a'));
        assert!(is_url_safe(b'Z'));
        assert!(is_url_safe(b'9'));
        assert!(is_url_safe(b'_'));
        assert!(!is_url_safe(b' '));
        assert!(!is_url_safe(b'-'));
        assert!(!is_url_safe(b'%'));
    }
}

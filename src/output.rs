//! JSON/debug/headers-only formatting of a parsed message, used by the CLI
//! binary.

use serde::Serialize;

use crate::parser::Parser;

/// A snapshot of a [`Parser`]'s result, shaped for serialization.
#[derive(Debug, Serialize)]
pub struct ParsedMessage {
    pub first_token: String,
    pub second_token: String,
    pub third_token: String,
    pub headers: Vec<(String, String)>,
    #[serde(serialize_with = "serialize_body")]
    pub body: Vec<u8>,
}

impl ParsedMessage {
    /// Builds a snapshot from a completed parse and its collected body
    /// bytes.
    pub fn from_parser(parser: &Parser, body: Vec<u8>) -> Self {
        Self {
            first_token: parser.first_token().to_string(),
            second_token: parser.second_token().to_string(),
            third_token: parser.third_token().to_string(),
            headers: parser.headers().iter().map(|(n, v)| (n.to_string(), v.to_string())).collect(),
            body,
        }
    }
}

fn serialize_body<S>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&String::from_utf8_lossy(body))
}

/// Renders `message` as JSON, pretty-printed if `pretty` is set.
pub fn format_json(message: &ParsedMessage, pretty: bool) -> String {
    let body = if pretty {
        serde_json::to_string_pretty(message)
    } else {
        serde_json::to_string(message)
    };
    let mut out = body.expect("ParsedMessage always serializes");
    out.push('\n');
    out
}

/// Renders `message` as a human-readable multi-line summary.
pub fn format_debug(message: &ParsedMessage) -> String {
    let mut out = format!("{} {} {}\n", message.first_token, message.second_token, message.third_token);
    for (name, value) in &message.headers {
        out.push_str(&format!("  {name}: {value}\n"));
    }
    out.push_str(&format!("body: {} bytes\n", message.body.len()));
    if !message.body.is_empty() {
        out.push_str(&String::from_utf8_lossy(&message.body));
        out.push('\n');
    }
    out
}

/// Renders just the start-line and headers of `message`, one per line.
pub fn format_headers_only(message: &ParsedMessage) -> String {
    let mut out = format!("{} {} {}\n", message.first_token, message.second_token, message.third_token);
    for (name, value) in &message.headers {
        out.push_str(&format!("{name}: {value}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn parsed(raw: &[u8]) -> ParsedMessage {
        let mut parser = Parser::new(16, 8192, 32);
        let mut body = Vec::new();
        parser.parse(raw, |b| body.push(b)).unwrap();
        ParsedMessage::from_parser(&parser, body)
    }

    #[test]
    fn json_output_round_trips_through_serde_value() {
        let msg = parsed(b"GET / HTTP/1.1\r\nHost: h\r\n\r\n");
        let json = format_json(&msg, false);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["first_token"], "GET");
        assert_eq!(value["headers"][0][0], "Host");
    }

    #[test]
    fn debug_output_includes_body_length() {
        let msg = parsed(b"POST / HTTP/1.1\r\nContent-Length: 2\r\n\r\nhi");
        let out = format_debug(&msg);
        assert!(out.contains("body: 2 bytes"));
        assert!(out.contains("hi"));
    }

    #[test]
    fn headers_only_output_omits_body() {
        let msg = parsed(b"POST / HTTP/1.1\r\nContent-Length: 2\r\n\r\nhi");
        let out = format_headers_only(&msg);
        assert!(!out.contains("hi"));
        assert!(out.contains("Content-Length: 2"));
    }
}

use crate::char_class::{
    is_carriage_return, is_char, is_control, is_hex_digit, is_line_feed, is_space_or_tab, is_token,
};
use crate::error::{ParseError, ParseErrorKind};
use crate::headers::Headers;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configurable limits for the HTTP/1.x message parser.
///
/// The three token caps have no default — a raw HTTP service must size
/// them to its own risk tolerance — so [`ParserConfig::new`] requires them
/// up front; the header caps default to the values below and can be
/// overridden with struct-update syntax.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Maximum length of the first start-line token.
    pub max_first_token_len: usize,
    /// Maximum length of the second start-line token.
    pub max_second_token_len: usize,
    /// Maximum length of the third start-line token.
    pub max_third_token_len: usize,
    /// Maximum length of any single header field name (default: 256).
    pub max_header_name_len: usize,
    /// Maximum length of any single header field value (default: 4096).
    pub max_header_value_len: usize,
    /// Maximum number of headers, main section plus trailers (default: 256).
    pub max_headers_amount: usize,
}

impl ParserConfig {
    /// Default maximum header field name length.
    pub const DEFAULT_MAX_HEADER_NAME_LEN: usize = 256;
    /// Default maximum header field value length.
    pub const DEFAULT_MAX_HEADER_VALUE_LEN: usize = 4096;
    /// Default maximum number of headers (main + trailer combined).
    pub const DEFAULT_MAX_HEADERS_AMOUNT: usize = 256;

    /// Creates a config with the mandatory token caps and default header
    /// caps.
    pub fn new(max_first_token_len: usize, max_second_token_len: usize, max_third_token_len: usize) -> Self {
        Self {
            max_first_token_len,
            max_second_token_len,
            max_third_token_len,
            max_header_name_len: Self::DEFAULT_MAX_HEADER_NAME_LEN,
            max_header_value_len: Self::DEFAULT_MAX_HEADER_VALUE_LEN,
            max_headers_amount: Self::DEFAULT_MAX_HEADERS_AMOUNT,
        }
    }
}

// ---------------------------------------------------------------------------
// Observer
// ---------------------------------------------------------------------------

/// Notification hooks invoked as each start-line token is committed.
///
/// This is the Rust re-expression of the original library's protected
/// virtual event hooks: a capability injected at construction instead of
/// a base class to override. The default implementations are no-ops.
pub trait ParserObserver {
    /// Called once the first start-line token has been fully read.
    fn on_first_token(&mut self, _token: &str) {}
    /// Called once the second start-line token has been fully read.
    fn on_second_token(&mut self, _token: &str) {}
    /// Called once the third start-line token has been fully read.
    fn on_third_token(&mut self, _token: &str) {}
}

struct NoopObserver;
impl ParserObserver for NoopObserver {}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    LeadingSp,
    FirstToken,
    FirstTokenSp,
    SecondToken,
    SecondTokenSp,
    ThirdToken,
    FirstLineLf,
    Header,
    HeaderName,
    HeaderValue,
    HeaderValueLf,
    HeaderValueLws,
    EndOfHeader,
    IdentityBody,
    ChunkSize,
    ChunkSizeLf,
    ChunkExtension,
    Chunk,
    ChunkCr,
    ChunkLf,
    TrailerHeader,
    TrailerHeaderName,
    TrailerHeaderValue,
    TrailerHeaderValueLf,
    TrailerHeaderValueLws,
    FinalLf,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// A streaming, resumable, byte-driven HTTP/1.x message parser.
///
/// Drives purely off bytes the caller feeds it — it owns no socket and no
/// event loop. A single instance reconstructs one message at a time; once
/// a message completes the same instance can be fed the next one (either
/// implicitly, or after an explicit [`Parser::reset`]).
///
/// # Usage
///
/// ```rust
/// use wireframe::Parser;
///
/// let mut parser = Parser::new(16, 8192, 32);
/// let mut body = Vec::new();
/// let (complete, consumed) = parser
///     .parse(b"GET /x HTTP/1.1\r\nHost: h\r\n\r\n", |b| body.push(b))
///     .unwrap();
/// assert!(complete);
/// assert_eq!(consumed, 28);
/// assert_eq!(parser.second_token(), "/x");
/// ```
pub struct Parser {
    state: State,
    config: ParserConfig,
    observer: Box<dyn ParserObserver>,

    pos: usize,
    line: usize,
    col: usize,

    first_token: String,
    second_token: String,
    third_token: String,
    header_name: Vec<u8>,
    header_value: Vec<u8>,
    headers: Headers,

    content_length: usize,
    identity_body_bytes_parsed: usize,

    chunk_size_str: Vec<u8>,
    chunk_size: usize,
    chunk_bytes_parsed: usize,
}

impl Parser {
    /// Creates a parser with the mandatory token-length caps and default
    /// header caps.
    pub fn new(max_first_token_len: usize, max_second_token_len: usize, max_third_token_len: usize) -> Self {
        Self::with_config(ParserConfig::new(
            max_first_token_len,
            max_second_token_len,
            max_third_token_len,
        ))
    }

    /// Creates a parser with fully custom limits.
    pub fn with_config(config: ParserConfig) -> Self {
        Self::with_config_and_observer(config, Box::new(NoopObserver))
    }

    /// Creates a parser with custom limits and a token-commit observer.
    pub fn with_config_and_observer(config: ParserConfig, observer: Box<dyn ParserObserver>) -> Self {
        Self {
            state: State::Initial,
            config,
            observer,
            pos: 0,
            line: 1,
            col: 1,
            first_token: String::new(),
            second_token: String::new(),
            third_token: String::new(),
            header_name: Vec::new(),
            header_value: Vec::new(),
            headers: Headers::new(),
            content_length: 0,
            identity_body_bytes_parsed: 0,
            chunk_size_str: Vec::new(),
            chunk_size: 0,
            chunk_bytes_parsed: 0,
        }
    }

    /// Explicitly resets the parser to its initial state, discarding any
    /// partially-parsed message.
    pub fn reset(&mut self) {
        self.state = State::Initial;
        self.pos = 0;
        self.line = 1;
        self.col = 1;
        self.first_token.clear();
        self.second_token.clear();
        self.third_token.clear();
        self.header_name.clear();
        self.header_value.clear();
        self.headers.clear();
        self.content_length = 0;
        self.identity_body_bytes_parsed = 0;
        self.chunk_size_str.clear();
        self.chunk_size = 0;
        self.chunk_bytes_parsed = 0;
    }

    // ----- accessors --------------------------------------------------

    /// Zero-based byte offset into the current message.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// One-based line number into the current message.
    pub fn line(&self) -> usize {
        self.line
    }

    /// One-based column number into the current message.
    pub fn col(&self) -> usize {
        self.col
    }

    /// The first start-line token, verbatim.
    pub fn first_token(&self) -> &str {
        &self.first_token
    }

    /// The second start-line token, verbatim.
    pub fn second_token(&self) -> &str {
        &self.second_token
    }

    /// The third start-line token, verbatim.
    pub fn third_token(&self) -> &str {
        &self.third_token
    }

    /// The header container (main-section and, once parsed, trailer
    /// headers) of the current or just-completed message.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// `true` once a complete message has been parsed and no subsequent
    /// byte has started a new one.
    pub fn is_completed(&self) -> bool {
        self.state == State::Initial
    }

    /// `true` if the next byte fed to the parser is expected to be a body
    /// byte (identity or chunk data).
    pub fn body_expected(&self) -> bool {
        matches!(self.state, State::IdentityBody | State::Chunk)
    }

    // ----- per-byte parsing --------------------------------------------

    /// Parses a single byte.
    ///
    /// Returns `Ok(true)` once `ch` was the last byte of a complete
    /// message. If `is_body_byte` is supplied, it is set to whether `ch`
    /// itself is a body byte (never a framing byte).
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] on any grammar violation or limit breach.
    /// After an error the parser's internal state is unspecified until
    /// [`Parser::reset`] is called.
    pub fn parse_byte(&mut self, ch: u8, is_body_byte: Option<&mut bool>) -> Result<bool, ParseError> {
        let body_byte_extracted = self.body_expected();
        self.step(ch)?;
        self.pos += 1;
        if is_line_feed(ch) {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        if let Some(flag) = is_body_byte {
            *flag = body_byte_extracted;
        }
        Ok(self.state == State::Initial)
    }

    /// Parses a chunk of bytes, calling `sink` with every byte classified
    /// as body data (never framing bytes), in order.
    ///
    /// Stops as soon as a complete message has been parsed, so the caller
    /// can re-enter on the remainder of `data` for a pipelined next
    /// message. Returns `(complete, bytes_consumed)`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] on any grammar violation or limit breach.
    pub fn parse<F: FnMut(u8)>(&mut self, data: &[u8], mut sink: F) -> Result<(bool, usize), ParseError> {
        let mut consumed = 0usize;
        let mut complete = false;
        while consumed < data.len() {
            let ch = data[consumed];
            let mut is_body = false;
            complete = self.parse_byte(ch, Some(&mut is_body))?;
            consumed += 1;
            if is_body {
                sink(ch);
            }
            if complete {
                break;
            }
        }
        Ok((complete, consumed))
    }

    fn err(&self, byte: u8, kind: ParseErrorKind) -> ParseError {
        ParseError::new(byte, self.pos, self.line, self.col, kind)
    }

    // ----- the state machine -------------------------------------------

    fn step(&mut self, ch: u8) -> Result<(), ParseError> {
        use ParseErrorKind::*;
        use State::*;

        match self.state {
            Initial => {
                if is_space_or_tab(ch) {
                    self.reset();
                    self.state = LeadingSp;
                } else if is_char(ch) && !is_control(ch) {
                    self.reset();
                    self.first_token.push(ch as char);
                    self.state = FirstToken;
                } else {
                    return Err(self.err(ch, InvalidFirstToken));
                }
            }
            LeadingSp => {
                if is_space_or_tab(ch) {
                    // ignore further leading whitespace
                } else if is_char(ch) && !is_control(ch) {
                    self.first_token.push(ch as char);
                    self.state = FirstToken;
                } else {
                    return Err(self.err(ch, InvalidFirstToken));
                }
            }
            FirstToken => {
                if is_space_or_tab(ch) {
                    self.observer.on_first_token(&self.first_token);
                    self.state = FirstTokenSp;
                } else if is_char(ch) && !is_control(ch) {
                    if self.first_token.len() >= self.config.max_first_token_len {
                        return Err(self.err(ch, FirstTokenIsTooLong));
                    }
                    self.first_token.push(ch as char);
                } else {
                    return Err(self.err(ch, InvalidFirstToken));
                }
            }
            FirstTokenSp => {
                if is_space_or_tab(ch) {
                    // ignore
                } else if is_char(ch) && !is_control(ch) {
                    self.second_token.push(ch as char);
                    self.state = SecondToken;
                } else {
                    return Err(self.err(ch, InvalidSecondToken));
                }
            }
            SecondToken => {
                if is_space_or_tab(ch) {
                    self.observer.on_second_token(&self.second_token);
                    self.state = SecondTokenSp;
                } else if is_char(ch) && !is_control(ch) {
                    if self.second_token.len() >= self.config.max_second_token_len {
                        return Err(self.err(ch, SecondTokenIsTooLong));
                    }
                    self.second_token.push(ch as char);
                } else {
                    return Err(self.err(ch, InvalidSecondToken));
                }
            }
            SecondTokenSp => {
                if is_space_or_tab(ch) {
                    // ignore
                } else if is_char(ch) && !is_control(ch) {
                    self.third_token.push(ch as char);
                    self.state = ThirdToken;
                } else {
                    return Err(self.err(ch, InvalidThirdToken));
                }
            }
            ThirdToken => {
                if is_carriage_return(ch) {
                    self.observer.on_third_token(&self.third_token);
                    self.state = FirstLineLf;
                } else if is_char(ch) && !is_control(ch) {
                    if self.third_token.len() >= self.config.max_third_token_len {
                        return Err(self.err(ch, ThirdTokenIsTooLong));
                    }
                    self.third_token.push(ch as char);
                } else {
                    return Err(self.err(ch, InvalidThirdToken));
                }
            }
            FirstLineLf => {
                if is_line_feed(ch) {
                    self.state = Header;
                } else {
                    return Err(self.err(ch, InvalidFirstLineLf));
                }
            }

            Header => self.parse_header(ch, false)?,
            HeaderName => self.parse_header_name(ch, false)?,
            HeaderValue => self.parse_header_value(ch, false)?,
            HeaderValueLf => self.parse_header_value_lf(ch, false)?,
            HeaderValueLws => self.parse_header_value_lws(ch, false)?,

            EndOfHeader => {
                if is_line_feed(ch) {
                    self.dispatch_end_of_header(ch)?;
                } else {
                    return Err(self.err(ch, InvalidHeaderLf));
                }
            }

            IdentityBody => {
                self.identity_body_bytes_parsed += 1;
                if self.identity_body_bytes_parsed >= self.content_length {
                    self.state = Initial;
                }
            }

            ChunkSize => {
                if is_hex_digit(ch) {
                    self.chunk_size_str.push(ch);
                } else if self.chunk_size_str.is_empty() {
                    return Err(self.err(ch, EmptyChunkSize));
                } else {
                    let size = parse_hex(&self.chunk_size_str).ok_or_else(|| self.err(ch, InvalidChunkSize))?;
                    self.chunk_size = size;
                    self.chunk_bytes_parsed = 0;
                    self.chunk_size_str.clear();
                    self.state = if is_carriage_return(ch) { ChunkSizeLf } else { ChunkExtension };
                }
            }
            ChunkExtension => {
                if is_carriage_return(ch) {
                    self.state = ChunkSizeLf;
                }
            }
            ChunkSizeLf => {
                if is_line_feed(ch) {
                    self.state = if self.chunk_size > 0 { Chunk } else { TrailerHeader };
                } else {
                    return Err(self.err(ch, InvalidChunkSizeLf));
                }
            }
            Chunk => {
                self.chunk_bytes_parsed += 1;
                if self.chunk_bytes_parsed >= self.chunk_size {
                    self.state = ChunkCr;
                }
            }
            ChunkCr => {
                if is_carriage_return(ch) {
                    self.state = ChunkLf;
                } else {
                    return Err(self.err(ch, InvalidChunkDataCr));
                }
            }
            ChunkLf => {
                if is_line_feed(ch) {
                    self.chunk_size_str.clear();
                    self.state = ChunkSize;
                } else {
                    return Err(self.err(ch, InvalidChunkDataLf));
                }
            }

            TrailerHeader => self.parse_header(ch, true)?,
            TrailerHeaderName => self.parse_header_name(ch, true)?,
            TrailerHeaderValue => self.parse_header_value(ch, true)?,
            TrailerHeaderValueLf => self.parse_header_value_lf(ch, true)?,
            TrailerHeaderValueLws => self.parse_header_value_lws(ch, true)?,

            FinalLf => {
                if is_line_feed(ch) {
                    self.state = Initial;
                } else {
                    return Err(self.err(ch, InvalidFinalLf));
                }
            }
        }
        Ok(())
    }

    fn dispatch_end_of_header(&mut self, ch: u8) -> Result<(), ParseError> {
        use ParseErrorKind::InvalidContentLength;
        use State::*;

        if self.headers.has_value("Transfer-Encoding", "chunked") {
            self.chunk_size_str.clear();
            self.state = ChunkSize;
        } else if self.headers.has("Content-Length") {
            let raw = self.headers.get("Content-Length");
            let len = parse_decimal(trim_http_ws(raw.as_bytes())).ok_or_else(|| self.err(ch, InvalidContentLength))?;
            if len == 0 {
                self.state = Initial;
            } else {
                self.content_length = len;
                self.identity_body_bytes_parsed = 0;
                self.state = IdentityBody;
            }
        } else {
            self.state = Initial;
        }
        Ok(())
    }

    fn append_header(&mut self, ch: u8) -> Result<(), ParseError> {
        if self.headers.len() >= self.config.max_headers_amount {
            return Err(self.err(ch, ParseErrorKind::TooManyHeaders));
        }
        let name = String::from_utf8_lossy(trim_http_ws(&self.header_name)).into_owned();
        let value = String::from_utf8_lossy(trim_http_ws(&self.header_value)).into_owned();
        self.headers.append(name, value);
        self.header_name.clear();
        self.header_value.clear();
        Ok(())
    }

    fn parse_header(&mut self, ch: u8, is_trailer: bool) -> Result<(), ParseError> {
        use ParseErrorKind::*;
        use State::*;

        self.header_name.clear();
        self.header_value.clear();
        if is_carriage_return(ch) {
            self.state = if is_trailer { FinalLf } else { EndOfHeader };
        } else if ch == b':' {
            return Err(self.err(ch, EmptyHeaderName));
        } else if is_token(ch) {
            self.header_name.push(ch);
            self.state = if is_trailer { TrailerHeaderName } else { HeaderName };
        } else {
            return Err(self.err(ch, InvalidHeaderName));
        }
        Ok(())
    }

    fn parse_header_name(&mut self, ch: u8, is_trailer: bool) -> Result<(), ParseError> {
        use ParseErrorKind::*;
        use State::*;

        if is_carriage_return(ch) {
            return Err(self.err(ch, HeaderIsMissingColon));
        } else if ch == b':' {
            self.state = if is_trailer { TrailerHeaderValue } else { HeaderValue };
        } else if is_token(ch) {
            if self.header_name.len() < self.config.max_header_name_len {
                self.header_name.push(ch);
            } else {
                return Err(self.err(ch, HeaderNameIsTooLong));
            }
        } else {
            return Err(self.err(ch, InvalidHeaderName));
        }
        Ok(())
    }

    fn parse_header_value(&mut self, ch: u8, is_trailer: bool) -> Result<(), ParseError> {
        use ParseErrorKind::*;
        use State::*;

        if is_carriage_return(ch) {
            self.state = if is_trailer { TrailerHeaderValueLf } else { HeaderValueLf };
        } else if !is_control(ch) {
            if self.header_value.len() < self.config.max_header_value_len {
                self.header_value.push(ch);
            } else {
                return Err(self.err(ch, HeaderValueIsTooLong));
            }
        } else {
            return Err(self.err(ch, InvalidHeaderValue));
        }
        Ok(())
    }

    fn parse_header_value_lf(&mut self, ch: u8, is_trailer: bool) -> Result<(), ParseError> {
        use ParseErrorKind::InvalidHeaderLf;
        use State::*;

        if is_line_feed(ch) {
            self.state = if is_trailer { TrailerHeaderValueLws } else { HeaderValueLws };
        } else {
            return Err(self.err(ch, InvalidHeaderLf));
        }
        Ok(())
    }

    fn parse_header_value_lws(&mut self, ch: u8, is_trailer: bool) -> Result<(), ParseError> {
        use ParseErrorKind::*;
        use State::*;

        if is_carriage_return(ch) {
            self.append_header(ch)?;
            self.state = if is_trailer { FinalLf } else { EndOfHeader };
        } else if ch == b':' {
            return Err(self.err(ch, EmptyHeaderName));
        } else if is_space_or_tab(ch) {
            if self.header_value.len() < self.config.max_header_value_len {
                self.header_value.push(b' ');
                self.state = if is_trailer { TrailerHeaderValue } else { HeaderValue };
            } else {
                return Err(self.err(ch, HeaderValueIsTooLong));
            }
        } else if is_token(ch) {
            self.append_header(ch)?;
            self.header_name.push(ch);
            self.state = if is_trailer { TrailerHeaderName } else { HeaderName };
        } else {
            return Err(self.err(ch, InvalidHeaderName));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Integer parsing helpers
// ---------------------------------------------------------------------------

fn trim_http_ws(bytes: &[u8]) -> &[u8] {
    fn is_ws(b: u8) -> bool {
        matches!(b, b' ' | b'\t' | b'\r' | b'\n')
    }
    let mut start = 0;
    let mut end = bytes.len();
    while start < end && is_ws(bytes[start]) {
        start += 1;
    }
    while end > start && is_ws(bytes[end - 1]) {
        end -= 1;
    }
    &bytes[start..end]
}

/// Decimal unsigned integer: optional leading `+`, at least one digit,
/// overflow detected.
fn parse_decimal(bytes: &[u8]) -> Option<usize> {
    let start = if bytes.first() == Some(&b'+') { 1 } else { 0 };
    if start >= bytes.len() {
        return None;
    }
    let mut result: usize = 0;
    for &b in &bytes[start..] {
        if !b.is_ascii_digit() {
            return None;
        }
        result = result.checked_mul(10)?.checked_add((b - b'0') as usize)?;
    }
    Some(result)
}

/// Hexadecimal unsigned integer: case-insensitive, at least one digit,
/// overflow detected.
fn parse_hex(bytes: &[u8]) -> Option<usize> {
    if bytes.is_empty() {
        return None;
    }
    let mut result: usize = 0;
    for &b in bytes {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            _ => return None,
        };
        result = result.checked_mul(16)?.checked_add(digit as usize)?;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    fn parser() -> Parser {
        Parser::new(16, 8192, 32)
    }

    fn parse_all(p: &mut Parser, data: &[u8]) -> (bool, usize, Vec<u8>) {
        let mut body = Vec::new();
        let (complete, consumed) = p.parse(data, |b| body.push(b)).unwrap();
        (complete, consumed, body)
    }

    #[test]
    fn bodyless_request_with_permissive_leading_whitespace() {
        let mut p = parser();
        let (complete, _consumed, body) = parse_all(
            &mut p,
            b" GET /index.html  HTTP/1.1\r\nHost: localhost\r\nX-Foo: bar\r\n\r\n",
        );
        assert!(complete);
        assert_eq!(p.first_token(), "GET");
        assert_eq!(p.second_token(), "/index.html");
        assert_eq!(p.third_token(), "HTTP/1.1");
        assert_eq!(p.headers().get("host"), "localhost");
        assert_eq!(p.headers().get("x-foo"), "bar");
        assert!(body.is_empty());
    }

    #[test]
    fn identity_encoded_response_with_tabs() {
        let mut p = parser();
        let (complete, _consumed, body) = parse_all(
            &mut p,
            b"\tHTTP/1.1\t200\t\tOK\r\nConnection: close\r\nx-bar: foo\r\nContent-Length: 10\r\n\r\n1234567890",
        );
        assert!(complete);
        assert_eq!(p.first_token(), "HTTP/1.1");
        assert_eq!(p.second_token(), "200");
        assert_eq!(p.third_token(), "OK");
        assert_eq!(p.headers().len(), 3);
        assert_eq!(body, b"1234567890");
    }

    #[test]
    fn chunked_response_with_lws_folded_header_and_trailer() {
        let mut p = parser();
        let raw = b"HTTP/1.1 404 Not found\r\nConnection: close\r\nx-header: foobar\r\nx-multiline: multiline\r\n\tLWS value\r\nTransfer-Encoding:\r\n chunked\r\n\r\na\r\n1234567890\r\nb\r\n12345678901\r\n0\r\nX-Trailer: barfoo\r\n\r\n";
        let (complete, _consumed, body) = parse_all(&mut p, raw);
        assert!(complete);
        assert_eq!(p.first_token(), "HTTP/1.1");
        assert_eq!(p.second_token(), "404");
        assert_eq!(p.third_token(), "Not found");
        assert_eq!(p.headers().get("x-multiline"), "multiline LWS value");
        assert_eq!(p.headers().get("transfer-encoding"), "chunked");
        assert_eq!(p.headers().get("x-trailer"), "barfoo");
        assert_eq!(body, b"123456789012345678901");
    }

    #[test]
    fn three_back_to_back_messages() {
        let msg1 = &b"GET / HTTP/1.1\r\nHost: h\r\n\r\n"[..];
        let msg2 = &b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nOK"[..];
        let msg3 = &b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nabc\r\n0\r\n\r\n"[..];
        let mut combined = Vec::new();
        combined.extend_from_slice(msg1);
        combined.extend_from_slice(msg2);
        combined.extend_from_slice(msg3);

        let mut p = parser();
        let mut offset = 0;
        let mut bodies = Vec::new();
        for _ in 0..3 {
            let mut body = Vec::new();
            let (complete, consumed) = p.parse(&combined[offset..], |b| body.push(b)).unwrap();
            assert!(complete);
            offset += consumed;
            bodies.push(body);
        }
        assert_eq!(offset, combined.len());
        assert!(bodies[0].is_empty());
        assert_eq!(bodies[1], b"OK");
        assert_eq!(bodies[2], b"abc");
    }

    #[test]
    fn byte_at_a_time_matches_bulk_feed() {
        let raw = b"GET /x?y=1 HTTP/1.1\r\nHost: h\r\nContent-Length: 3\r\n\r\nabc";

        let mut whole = parser();
        let (c1, _n1, b1) = parse_all(&mut whole, raw);

        let mut per_byte = parser();
        let mut body = Vec::new();
        let mut complete = false;
        for &byte in raw {
            let mut is_body = false;
            complete = per_byte.parse_byte(byte, Some(&mut is_body)).unwrap();
            if is_body {
                body.push(byte);
            }
            if complete {
                break;
            }
        }

        assert_eq!(c1, complete);
        assert_eq!(b1, body);
        assert_eq!(whole.second_token(), per_byte.second_token());
    }

    #[test]
    fn content_length_zero_completes_immediately() {
        let mut p = parser();
        let (complete, _consumed, body) = parse_all(&mut p, b"GET / HTTP/1.1\r\nContent-Length: 0\r\n\r\n");
        assert!(complete);
        assert!(body.is_empty());
    }

    #[test]
    fn bare_zero_chunk_terminator_is_empty_body() {
        let mut p = parser();
        let (complete, _consumed, body) =
            parse_all(&mut p, b"GET / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n0\r\n\r\n");
        assert!(complete);
        assert!(body.is_empty());
    }

    #[test]
    fn zero_headers_parses() {
        let mut p = parser();
        let (complete, _consumed, _body) = parse_all(&mut p, b"GET / HTTP/1.1\r\n\r\n");
        assert!(complete);
        assert!(p.headers().is_empty());
    }

    #[test]
    fn chunk_extension_is_ignored() {
        let mut p = parser();
        let (complete, _consumed, body) = parse_all(
            &mut p,
            b"GET / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n5;foo=bar\r\nHello\r\n0\r\n\r\n",
        );
        assert!(complete);
        assert_eq!(body, b"Hello");
    }

    #[test]
    fn first_token_too_long_errors_with_position() {
        let mut p = Parser::new(3, 8192, 32);
        let ok1 = p.parse_byte(b'G', None).unwrap();
        assert!(!ok1);
        p.parse_byte(b'E', None).unwrap();
        p.parse_byte(b'T', None).unwrap();
        let e = p.parse_byte(b'X', None).unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::FirstTokenIsTooLong);
        assert_eq!(e.byte, b'X');
        assert_eq!(e.pos, 3);
        assert_eq!(e.line, 1);
        assert_eq!(e.col, 4);
    }

    #[test]
    fn exact_cap_length_is_accepted() {
        let mut p = Parser::new(3, 8192, 32);
        for &b in b"GET" {
            assert!(!p.parse_byte(b, None).unwrap());
        }
        assert!(!p.parse_byte(b' ', None).unwrap());
    }

    #[test]
    fn invalid_content_length_is_reported() {
        let mut p = parser();
        let err = p.parse(b"GET / HTTP/1.1\r\nContent-Length: abc\r\n\r\n", |_| {}).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidContentLength);
    }

    #[test]
    fn empty_chunk_size_is_reported() {
        let mut p = parser();
        let err = p
            .parse(b"GET / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n\r\n", |_| {})
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyChunkSize);
    }

    #[test]
    fn header_name_too_long_is_reported() {
        let mut config = ParserConfig::new(16, 8192, 32);
        config.max_header_name_len = 4;
        let mut p = Parser::with_config(config);
        let err = p.parse(b"GET / HTTP/1.1\r\nVeryLong: v\r\n\r\n", |_| {}).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::HeaderNameIsTooLong);
    }

    #[test]
    fn too_many_headers_is_reported() {
        let mut config = ParserConfig::new(16, 8192, 32);
        config.max_headers_amount = 1;
        let mut p = Parser::with_config(config);
        let err = p.parse(b"GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\n\r\n", |_| {}).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TooManyHeaders);
    }

    #[test]
    fn reset_allows_reuse_after_completion() {
        let mut p = parser();
        let (c1, _n1, _b1) = parse_all(&mut p, b"GET / HTTP/1.1\r\n\r\n");
        assert!(c1);
        p.reset();
        let (c2, _n2, body2) = parse_all(&mut p, b"POST /b HTTP/1.1\r\nContent-Length: 2\r\n\r\nOK");
        assert!(c2);
        assert_eq!(p.second_token(), "/b");
        assert_eq!(body2, b"OK");
    }

    #[test]
    fn observer_receives_committed_tokens() {
        struct Recorder;
        impl ParserObserver for Recorder {
            fn on_first_token(&mut self, token: &str) {
                assert_eq!(token, "GET");
            }
        }
        let mut p = Parser::with_config_and_observer(ParserConfig::new(16, 8192, 32), Box::new(Recorder));
        p.parse(b"GET / HTTP/1.1\r\n\r\n", |_| {}).unwrap();
        assert_eq!(p.first_token(), "GET");
    }

    #[test]
    fn transfer_encoding_wins_over_content_length() {
        let mut p = parser();
        let (complete, _consumed, body) = parse_all(
            &mut p,
            b"POST / HTTP/1.1\r\nContent-Length: 999\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nabc\r\n0\r\n\r\n",
        );
        assert!(complete);
        assert_eq!(body, b"abc");
    }

    #[test]
    fn obs_text_allowed_in_header_value() {
        let mut p = parser();
        let mut raw = b"GET / HTTP/1.1\r\nX-Custom: hello".to_vec();
        raw.push(0x80);
        raw.extend_from_slice(b"world\r\n\r\n");
        let (complete, _consumed, _body) = parse_all(&mut p, &raw);
        assert!(complete);
        assert!(p.headers().get("x-custom").contains('\u{FFFD}'));
    }
}

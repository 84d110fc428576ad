//! HTTP-message envelope composition: the write-side counterpart to
//! [`crate::parser::Parser`].

use crate::error::ComposeError;
use crate::headers::Headers;

const CONTENT_LENGTH: &str = "Content-Length";
const TRANSFER_ENCODING: &str = "Transfer-Encoding";

/// Composes HTTP/1.x start-lines, header blocks and chunk framing for a
/// fixed `(first-token, second-token, third-token)` triple.
///
/// A `Composer` owns no payload and does no I/O; it only produces the
/// framing bytes (the "envelope") that wrap a payload the caller already
/// holds. [`Composer::prepend_envelope`] and its chunk counterparts write
/// that envelope right-justified into a caller-supplied buffer so the
/// envelope and an already-placed payload form one contiguous region,
/// suitable for a single write call.
#[derive(Debug, Clone)]
pub struct Composer {
    first_token: String,
    second_token: String,
    third_token: String,
}

impl Composer {
    /// Creates a composer for a fixed start-line triple, e.g.
    /// `("HTTP/1.1", "200", "OK")` or `("GET", "/", "HTTP/1.1")`.
    pub fn new(
        first_token: impl Into<String>,
        second_token: impl Into<String>,
        third_token: impl Into<String>,
    ) -> Self {
        Self {
            first_token: first_token.into(),
            second_token: second_token.into(),
            third_token: third_token.into(),
        }
    }

    /// Replaces the start-line triple used by subsequent `compose_*` calls.
    pub fn reset(
        &mut self,
        first_token: impl Into<String>,
        second_token: impl Into<String>,
        third_token: impl Into<String>,
    ) {
        self.first_token = first_token.into();
        self.second_token = second_token.into();
        self.third_token = third_token.into();
    }

    fn first_line_len(&self) -> usize {
        self.first_token.len() + 1 + self.second_token.len() + 1 + self.third_token.len() + 2
    }

    fn write_first_line(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.first_token.as_bytes());
        out.push(b' ');
        out.extend_from_slice(self.second_token.as_bytes());
        out.push(b' ');
        out.extend_from_slice(self.third_token.as_bytes());
        out.extend_from_slice(b"\r\n");
    }

    // ----- identity-encoded envelope ------------------------------------

    fn envelope_headers(headers: &Headers, payload_len: usize) -> Headers {
        let mut out: Headers = headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(CONTENT_LENGTH) && !name.eq_ignore_ascii_case(TRANSFER_ENCODING))
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect();
        if payload_len > 0 {
            out.append(CONTENT_LENGTH, payload_len.to_string());
        }
        out
    }

    /// Byte length [`Composer::compose_envelope`] would produce, without
    /// allocating it.
    pub fn envelope_size(&self, headers: &Headers, payload_len: usize) -> usize {
        let actual = Self::envelope_headers(headers, payload_len);
        self.first_line_len() + actual.composed_len() + 2
    }

    /// Composes a start-line, `headers` (with any existing `Content-Length`
    /// / `Transfer-Encoding` dropped and a fresh `Content-Length` added
    /// when `payload_len > 0`), and the blank line that ends the header
    /// block.
    pub fn compose_envelope(&self, headers: &Headers, payload_len: usize) -> Vec<u8> {
        let actual = Self::envelope_headers(headers, payload_len);
        let mut out = Vec::with_capacity(self.first_line_len() + actual.composed_len() + 2);
        self.write_first_line(&mut out);
        actual.compose(&mut out);
        out.extend_from_slice(b"\r\n");
        out
    }

    /// Writes [`Composer::compose_envelope`]'s output into `buffer`,
    /// starting at offset 0.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::BufferTooSmall`] if `buffer` cannot hold the
    /// envelope.
    pub fn compose_envelope_into(
        &self,
        buffer: &mut [u8],
        headers: &Headers,
        payload_len: usize,
    ) -> Result<usize, ComposeError> {
        let envelope = self.compose_envelope(headers, payload_len);
        write_into(buffer, &envelope)
    }

    /// Writes the envelope right-justified into `buffer[..envelope_part_len]`
    /// so that `buffer[start..start + total_len]` — where `total_len` is the
    /// envelope length plus `payload_len` — is ready to send in one call,
    /// given the payload already sits at `buffer[envelope_part_len..]`.
    ///
    /// Returns `(start, total_len)`.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::BufferTooSmall`] if the envelope does not
    /// fit in the first `envelope_part_len` bytes of `buffer`.
    pub fn prepend_envelope(
        &self,
        buffer: &mut [u8],
        envelope_part_len: usize,
        headers: &Headers,
        payload_len: usize,
    ) -> Result<(usize, usize), ComposeError> {
        let envelope = self.compose_envelope(headers, payload_len);
        prepend_into(buffer, envelope_part_len, &envelope, payload_len)
    }

    // ----- chunked-encoded envelope --------------------------------------

    fn first_chunk_headers(headers: &Headers) -> Headers {
        let mut out: Headers = headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(CONTENT_LENGTH) && !name.eq_ignore_ascii_case(TRANSFER_ENCODING))
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect();
        out.append(TRANSFER_ENCODING, "chunked");
        out
    }

    /// Byte length [`Composer::compose_first_chunk_envelope`] would produce
    /// for a chunk of `payload_len` bytes, without allocating it.
    pub fn first_chunk_envelope_size(&self, headers: &Headers, payload_len: usize) -> usize {
        let actual = Self::first_chunk_headers(headers);
        self.first_line_len() + actual.composed_len() + 2 + hex_len(payload_len) + 2
    }

    /// Composes a start-line, `headers` (with `Transfer-Encoding: chunked`
    /// forced and any `Content-Length` dropped), the blank line ending the
    /// header block, and the first chunk-size line for a chunk of
    /// `payload_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::EmptyChunkPayload`] if `payload_len` is 0.
    pub fn compose_first_chunk_envelope(&self, headers: &Headers, payload_len: usize) -> Result<Vec<u8>, ComposeError> {
        if payload_len == 0 {
            return Err(ComposeError::EmptyChunkPayload);
        }
        let actual = Self::first_chunk_headers(headers);
        let mut out = Vec::with_capacity(self.first_line_len() + actual.composed_len() + 2 + hex_len(payload_len) + 2);
        self.write_first_line(&mut out);
        actual.compose(&mut out);
        out.extend_from_slice(b"\r\n");
        write_hex_line(&mut out, payload_len);
        Ok(out)
    }

    /// Writes [`Composer::compose_first_chunk_envelope`]'s output into
    /// `buffer`, starting at offset 0.
    pub fn compose_first_chunk_envelope_into(
        &self,
        buffer: &mut [u8],
        headers: &Headers,
        payload_len: usize,
    ) -> Result<usize, ComposeError> {
        let envelope = self.compose_first_chunk_envelope(headers, payload_len)?;
        write_into(buffer, &envelope)
    }

    /// Right-justified variant of [`Composer::compose_first_chunk_envelope`],
    /// analogous to [`Composer::prepend_envelope`].
    pub fn prepend_first_chunk_envelope(
        &self,
        buffer: &mut [u8],
        envelope_part_len: usize,
        headers: &Headers,
        payload_len: usize,
    ) -> Result<(usize, usize), ComposeError> {
        let envelope = self.compose_first_chunk_envelope(headers, payload_len)?;
        prepend_into(buffer, envelope_part_len, &envelope, payload_len)
    }

    /// Byte length [`Composer::compose_next_chunk_envelope`] would produce
    /// for a chunk of `payload_len` bytes, without allocating it.
    pub fn next_chunk_envelope_size(&self, payload_len: usize) -> usize {
        2 + hex_len(payload_len) + 2
    }

    /// Composes the trailing CRLF of the previous chunk and the chunk-size
    /// line for the next chunk of `payload_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::EmptyChunkPayload`] if `payload_len` is 0.
    pub fn compose_next_chunk_envelope(&self, payload_len: usize) -> Result<Vec<u8>, ComposeError> {
        if payload_len == 0 {
            return Err(ComposeError::EmptyChunkPayload);
        }
        let mut out = Vec::with_capacity(2 + hex_len(payload_len) + 2);
        out.extend_from_slice(b"\r\n");
        write_hex_line(&mut out, payload_len);
        Ok(out)
    }

    /// Writes [`Composer::compose_next_chunk_envelope`]'s output into
    /// `buffer`, starting at offset 0.
    pub fn compose_next_chunk_envelope_into(&self, buffer: &mut [u8], payload_len: usize) -> Result<usize, ComposeError> {
        let envelope = self.compose_next_chunk_envelope(payload_len)?;
        write_into(buffer, &envelope)
    }

    /// Right-justified variant of [`Composer::compose_next_chunk_envelope`].
    pub fn prepend_next_chunk_envelope(
        &self,
        buffer: &mut [u8],
        envelope_part_len: usize,
        payload_len: usize,
    ) -> Result<(usize, usize), ComposeError> {
        let envelope = self.compose_next_chunk_envelope(payload_len)?;
        prepend_into(buffer, envelope_part_len, &envelope, payload_len)
    }

    /// Byte length [`Composer::compose_last_chunk`] would produce, without
    /// allocating it.
    pub fn last_chunk_size(&self, trailer_headers: &Headers) -> usize {
        5 + trailer_headers.composed_len() + 2
    }

    /// Composes the trailing CRLF of the previous chunk, the zero-size
    /// chunk line, any trailer headers, and the final blank line.
    pub fn compose_last_chunk(&self, trailer_headers: &Headers) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.last_chunk_size(trailer_headers));
        out.extend_from_slice(b"\r\n0\r\n");
        trailer_headers.compose(&mut out);
        out.extend_from_slice(b"\r\n");
        out
    }

    /// Writes [`Composer::compose_last_chunk`]'s output into `buffer`,
    /// starting at offset 0.
    pub fn compose_last_chunk_into(&self, buffer: &mut [u8], trailer_headers: &Headers) -> Result<usize, ComposeError> {
        let envelope = self.compose_last_chunk(trailer_headers);
        write_into(buffer, &envelope)
    }
}

fn write_into(buffer: &mut [u8], envelope: &[u8]) -> Result<usize, ComposeError> {
    if envelope.len() > buffer.len() {
        return Err(ComposeError::BufferTooSmall { need: envelope.len(), have: buffer.len() });
    }
    buffer[..envelope.len()].copy_from_slice(envelope);
    Ok(envelope.len())
}

fn prepend_into(
    buffer: &mut [u8],
    envelope_part_len: usize,
    envelope: &[u8],
    payload_len: usize,
) -> Result<(usize, usize), ComposeError> {
    if envelope.len() > envelope_part_len {
        return Err(ComposeError::BufferTooSmall { need: envelope.len(), have: envelope_part_len });
    }
    let start = envelope_part_len - envelope.len();
    buffer[start..envelope_part_len].copy_from_slice(envelope);
    Ok((start, envelope.len() + payload_len))
}

fn hex_len(n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    let mut n = n;
    let mut len = 0;
    while n > 0 {
        len += 1;
        n >>= 4;
    }
    len
}

fn write_hex_line(out: &mut Vec<u8>, n: usize) {
    out.extend_from_slice(format!("{n:x}").as_bytes());
    out.extend_from_slice(b"\r\n");
}

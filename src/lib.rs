//! # WireFrame
//!
//! A **strict, streaming HTTP/1.x message parser and composer** implemented
//! as byte-driven state machines, designed for use both as a Rust library
//! and as a CLI tool.
//!
//! WireFrame processes HTTP requests and responses incrementally
//! (byte-by-byte or in arbitrarily-sized chunks), making it suitable for
//! both synchronous and asynchronous contexts, and for both requests and
//! responses — the parser and composer are generic over the three
//! start-line tokens rather than hard-coded to "method, URI, version".
//! It supports identity (`Content-Length`) and chunked transfer encoding,
//! including chunk extensions and trailer headers.
//!
//! ## Quick start — streaming parsing
//!
//! ```rust
//! use wireframe::Parser;
//!
//! let mut parser = Parser::new(16, 8192, 32);
//! let mut body = Vec::new();
//! let (complete, _consumed) = parser
//!     .parse(b"GET /hello HTTP/1.1\r\nHost: example.com\r\n\r\n", |b| body.push(b))
//!     .expect("valid request");
//! assert!(complete);
//! assert_eq!(parser.first_token(), "GET");
//! assert_eq!(parser.second_token(), "/hello");
//! assert_eq!(parser.headers().get("host"), "example.com");
//! ```
//!
//! ## Quick start — composing a message
//!
//! ```rust
//! use wireframe::{Composer, Headers};
//!
//! let composer = Composer::new("HTTP/1.1", "200", "OK");
//! let mut headers = Headers::new();
//! headers.append("Content-Type", "text/plain");
//! let envelope = composer.compose_envelope(&headers, 5);
//! assert_eq!(envelope, b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\n");
//! ```

mod char_class;
mod composer;
mod error;
mod headers;
mod output;
mod params;
mod parser;
mod percent;
mod uri;

pub use composer::Composer;
pub use error::{ComposeError, ParseError, ParseErrorKind};
pub use headers::Headers;
pub use output::{format_debug, format_headers_only, format_json, ParsedMessage};
pub use params::Params;
pub use parser::{Parser, ParserConfig, ParserObserver};
pub use uri::Uri;

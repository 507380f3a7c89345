//! Request and response contract for the caching agent.
//!
//! The agent mediates standard request/response semantics only: a request is
//! a method, an absolute URL, and a resource-kind hint; a response is an
//! immutable snapshot of status, headers, and body bytes. No wire protocol
//! is introduced.

use bytes::Bytes;
use url::Url;

/// Hint describing what kind of resource a request is for.
///
/// Mirrors the destination hint supplied by the host platform alongside
/// each intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// HTML document navigation.
    Document,
    /// Stylesheet.
    Style,
    /// Script.
    Script,
    /// Image of any format.
    Image,
    /// Anything else (fonts, JSON, media, ...).
    Other,
}

/// An intercepted request.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method (e.g., "GET").
    pub method: String,
    /// Absolute request URL.
    pub url: Url,
    /// Resource-kind hint from the host platform.
    pub kind: ResourceKind,
}

impl Request {
    /// Create a new request.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `url` - Absolute URL
    /// * `kind` - Resource-kind hint
    pub fn new(method: impl Into<String>, url: Url, kind: ResourceKind) -> Self {
        Self {
            method: method.into(),
            url,
            kind,
        }
    }

    /// Convenience constructor for a GET request.
    pub fn get(url: Url, kind: ResourceKind) -> Self {
        Self::new("GET", url, kind)
    }

    /// Whether this is a GET request.
    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// Whether this request targets the same origin as `origin`.
    pub fn same_origin(&self, origin: &Url) -> bool {
        self.url.origin() == origin.origin()
    }

    /// Whether the agent may cache and answer this request.
    ///
    /// Only same-origin GET requests are cacheable; all others pass through
    /// untouched. This is an invariant of the agent, not a per-strategy
    /// policy choice.
    pub fn is_cacheable(&self, origin: &Url) -> bool {
        self.is_get() && self.same_origin(origin)
    }

    /// Cache key for this request: the normalized absolute URL.
    pub fn key(&self) -> String {
        self.url.as_str().to_string()
    }
}

/// An immutable snapshot of a response.
///
/// Entries are immutable once stored; a later fetch for the same key
/// overwrites the snapshot rather than mutating it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSnapshot {
    /// HTTP status code.
    pub status: u16,
    /// Response headers as name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Body bytes.
    pub body: Bytes,
    /// Whether the status indicates success (2xx).
    pub ok: bool,
}

impl ResponseSnapshot {
    /// Create a snapshot from status, headers, and body.
    ///
    /// The success flag is derived from the status code.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
            ok: (200..300).contains(&status),
        }
    }

    /// Successful 200 snapshot with the given body.
    pub fn ok_with_body(body: impl Into<Bytes>) -> Self {
        Self::new(200, Vec::new(), body.into())
    }

    /// Typed not-found placeholder (404, empty body).
    ///
    /// Returned by image strategies instead of the raw network error, and
    /// by the network-first strategy when no cached fallback exists.
    pub fn not_found() -> Self {
        Self::new(404, Vec::new(), Bytes::new())
    }

    /// Typed unavailable response (503, empty body).
    pub fn unavailable() -> Self {
        Self::new(503, Vec::new(), Bytes::new())
    }

    /// Offline fallback response (503, "Offline" body).
    ///
    /// Used by the document strategy when neither the network nor any
    /// cached document is available.
    pub fn offline() -> Self {
        Self::new(503, Vec::new(), Bytes::from_static(b"Offline"))
    }
}

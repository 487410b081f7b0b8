// Copyright 2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! <https://url.spec.whatwg.org/#origin>

use crate::host::Host;
use crate::{default_port, Url};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// <https://url.spec.whatwg.org/#concept-url-origin>
pub(crate) fn url_origin(url: &Url) -> Origin {
    match url.scheme() {
        "ftp" | "http" | "https" | "ws" | "wss" => Origin::Tuple(
            url.scheme().to_owned(),
            url.host().clone(),
            url.port_or_known_default(),
        ),
        _ => Origin::new_opaque(),
    }
}

/// The origin of a URL, either a `(scheme, host, port)` tuple or an opaque,
/// per-URL unique identifier.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Origin {
    /// A globally unique identifier, equal only to itself (and to clones of
    /// itself made via `Clone`, per `OpaqueOrigin`'s own equality).
    Opaque(OpaqueOrigin),

    /// The URL's scheme, host, and port (using the scheme's default port
    /// when none was given explicitly).
    Tuple(String, Host<String>, Option<u16>),
}

impl Origin {
    /// A new opaque origin, unequal to every other origin including ones
    /// created by a later call to this function.
    pub fn new_opaque() -> Self {
        Origin::Opaque(OpaqueOrigin(Arc::new(NEXT_OPAQUE_ORIGIN_ID.fetch_add(1, Ordering::Relaxed))))
    }

    /// <https://html.spec.whatwg.org/multipage/origin.html#ascii-serialisation-of-an-origin>
    pub fn ascii_serialization(&self) -> String {
        match self {
            Origin::Opaque(_) => "null".to_owned(),
            Origin::Tuple(scheme, host, port) => {
                let mut out = format!("{scheme}://{host}");
                if let Some(port) = port {
                    if Some(*port) != default_port(scheme) {
                        out.push(':');
                        out.push_str(&port.to_string());
                    }
                }
                out
            }
        }
    }
}

static NEXT_OPAQUE_ORIGIN_ID: AtomicUsize = AtomicUsize::new(0);

/// Opaque identifier for cannot-be-a-base and non-special URLs. Equal to its
/// own clones (same underlying `Arc`), unequal to every other instance,
/// including ones produced by a separate call to `Origin::new_opaque()`.
#[derive(Clone, Debug)]
pub struct OpaqueOrigin(Arc<usize>);

impl PartialEq for OpaqueOrigin {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for OpaqueOrigin {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Url;

    #[test]
    fn http_origin_is_a_scheme_host_port_tuple() {
        let url = Url::parse("http://example.com/a").unwrap();
        assert_eq!(
            url.origin().ascii_serialization(),
            "http://example.com"
        );
    }

    #[test]
    fn opaque_origins_are_never_equal() {
        assert_ne!(Origin::new_opaque(), Origin::new_opaque());
    }

    #[test]
    fn data_url_origin_is_opaque() {
        let url = Url::parse("data:text/plain,hi").unwrap();
        assert_eq!(url.origin().ascii_serialization(), "null");
    }
}

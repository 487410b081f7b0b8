// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! URL library for Rust, implementing the [WHATWG URL Standard](
//! https://url.spec.whatwg.org/): parsing, validation, origin computation
//! and the search-parameters (`URLSearchParams`) view.

mod host;
mod origin;
mod parser;

use std::borrow::Cow;
use std::cmp;
use std::fmt;
use std::hash;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

pub use crate::host::Host;
pub use crate::origin::{OpaqueOrigin, Origin};
pub use crate::parser::{ParseError, SyntaxViolation};
use crate::parser::{Parser, StartOverride};

pub use form_urlencoded;

/// <https://url.spec.whatwg.org/#special-scheme>
pub(crate) fn default_port(scheme: &str) -> Option<u16> {
    Some(match scheme {
        "ftp" => 21,
        "http" | "ws" => 80,
        "https" | "wss" => 443,
        "file" => return None,
        _ => return None,
    })
}

/// <https://url.spec.whatwg.org/#special-scheme>
pub(crate) fn is_special(scheme: &str) -> bool {
    matches!(scheme, "ftp" | "file" | "http" | "https" | "ws" | "wss")
}

/// The shape of a URL's path: either an ordered list of segments (every
/// "special" scheme, and any non-special URL with an authority), or a single
/// opaque percent-encoded string (a non-special, cannot-be-a-base URL, e.g.
/// `mailto:` or `data:`).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) enum PathKind {
    List(Vec<String>),
    Opaque(String),
}

impl PathKind {
    fn to_serialized(&self) -> String {
        match self {
            PathKind::Opaque(s) => s.clone(),
            PathKind::List(segments) => {
                let mut out = String::new();
                for segment in segments {
                    out.push('/');
                    out.push_str(segment);
                }
                out
            }
        }
    }
}

/// A parsed, validated URL, produced by the basic URL parser (C9) and kept
/// in the component form spec.md §3 describes rather than as a single
/// serialized string.
///
/// `Eq`, `Ord`, and `Hash` all go through the serialized string (`as_str`),
/// matching `Display`, rather than comparing components structurally.
#[derive(Clone, Debug)]
pub struct Url {
    pub(crate) scheme: String,
    pub(crate) username: String,
    pub(crate) password: Option<String>,
    pub(crate) host: Host<String>,
    pub(crate) port: Option<u16>,
    pub(crate) path: PathKind,
    pub(crate) query: Option<String>,
    pub(crate) fragment: Option<String>,
    pub(crate) cannot_be_a_base_url: bool,
}

impl Url {
    pub(crate) fn new_with_scheme(scheme: String) -> Self {
        Url {
            scheme,
            username: String::new(),
            password: None,
            host: Host::None,
            port: None,
            path: PathKind::List(Vec::new()),
            query: None,
            fragment: None,
            cannot_be_a_base_url: false,
        }
    }

    /// Parse `input` as an absolute URL, or (when `base` is given) a
    /// possibly-relative reference against it.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Parser::new(&|_| {}).parse(input, None)
    }

    /// Like [`Url::parse`], but resolving relative references against `base`.
    pub fn join(base: &Url, input: &str) -> Result<Self, ParseError> {
        Parser::new(&|_| {}).parse(input, Some(base))
    }

    /// Like [`Url::parse`], invoking `violation_fn` for every non-fatal
    /// validation error encountered along the way.
    pub fn parse_with_violations(
        input: &str,
        violation_fn: &dyn Fn(SyntaxViolation),
    ) -> Result<Self, ParseError> {
        Parser::new(violation_fn).parse(input, None)
    }

    /// `true` for a "cannot-be-a-base-URL" URL (spec.md §3): opaque path,
    /// no host, no port.
    pub fn cannot_be_a_base(&self) -> bool {
        self.cannot_be_a_base_url
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn host(&self) -> &Host<String> {
        &self.host
    }

    /// The host, serialized: `""` if there is none.
    pub fn host_str(&self) -> Cow<'_, str> {
        match &self.host {
            Host::None => Cow::Borrowed(""),
            Host::Domain(d) => Cow::Borrowed(d.as_str()),
            Host::Opaque(d) => Cow::Borrowed(d.as_str()),
            Host::Ipv4(addr) => Cow::Owned(addr.to_string()),
            Host::Ipv6(_) => Cow::Owned(self.host.to_string()),
        }
    }

    /// The host, formatted the way the `host` accessor in spec.md §4.11
    /// returns it for `WHATWG`-style consumers: bracketed for IPv6.
    pub fn hostname(&self) -> String {
        self.host.to_string()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// `port()`, falling back to the scheme's default port.
    pub fn port_or_known_default(&self) -> Option<u16> {
        self.port.or_else(|| default_port(&self.scheme))
    }

    pub fn is_ipv4(&self) -> bool {
        matches!(self.host, Host::Ipv4(_))
    }

    pub fn is_ipv6(&self) -> bool {
        matches!(self.host, Host::Ipv6(_))
    }

    pub fn ipv4_address(&self) -> Option<Ipv4Addr> {
        match self.host {
            Host::Ipv4(addr) => Some(addr),
            _ => None,
        }
    }

    pub fn ipv6_address(&self) -> Option<Ipv6Addr> {
        match self.host {
            Host::Ipv6(addr) => Some(addr),
            _ => None,
        }
    }

    /// The domain name, if the host is a `Domain`.
    pub fn domain(&self) -> Option<&str> {
        match &self.host {
            Host::Domain(d) => Some(d),
            _ => None,
        }
    }

    /// The path, as a single percent-encoded string (the `pathname`
    /// accessor of spec.md §4.11). `"/"`-joined for list paths, verbatim
    /// for opaque ones.
    pub fn path(&self) -> String {
        match &self.path {
            PathKind::Opaque(s) => s.clone(),
            PathKind::List(_) => self.path.to_serialized(),
        }
    }

    /// The path, as an ordered list of percent-encoded segments; `None` for
    /// a cannot-be-a-base URL.
    pub fn path_segments(&self) -> Option<&[String]> {
        match &self.path {
            PathKind::List(segments) => Some(segments),
            PathKind::Opaque(_) => None,
        }
    }

    /// The query string, without its leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// The query string with its leading `?`, or `""` if there is none
    /// (the `search` accessor of spec.md §4.11).
    pub fn search(&self) -> Cow<'_, str> {
        match &self.query {
            Some(q) => Cow::Owned(format!("?{q}")),
            None => Cow::Borrowed(""),
        }
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// The fragment with its leading `#`, or `""` (the `hash` accessor).
    pub fn hash(&self) -> Cow<'_, str> {
        match &self.fragment {
            Some(f) => Cow::Owned(format!("#{f}")),
            None => Cow::Borrowed(""),
        }
    }

    /// A read-only view over the query string's name/value pairs (C12).
    pub fn query_pairs(&self) -> form_urlencoded::Parse<'_> {
        form_urlencoded::parse(self.query.as_deref().unwrap_or("").as_bytes())
    }

    /// A mutable view over the query string's name/value pairs (C12),
    /// writing through to this `Url`'s query component as pairs are
    /// appended, replaced, removed, sorted, or cleared.
    pub fn query_pairs_mut(&mut self) -> form_urlencoded::Serializer<UrlQuery<'_>> {
        form_urlencoded::Serializer::for_suffix(UrlQuery { url: self }, 0)
    }

    /// The search-parameters view over this URL's query component (C12): a
    /// mutable ordered list of name/value pairs with a back-pointer to this
    /// `Url`, supporting both the reading operations (`get`, `get_all`,
    /// `contains`, `to_string`) and, through [`query_pairs_mut`], the
    /// mutating ones (`append`, `remove`, `set`, `sort`, `clear`).
    ///
    /// [`query_pairs_mut`]: Url::query_pairs_mut
    pub fn search_parameters(&mut self) -> SearchParams<'_> {
        SearchParams { url: self }
    }

    /// The URL's origin (spec.md's origin concept, §4.11/glossary).
    pub fn origin(&self) -> Origin {
        origin::url_origin(self)
    }

    /// Set the scheme, re-running the basic parser from the `scheme-start`
    /// state override.
    pub fn set_scheme(&mut self, scheme: &str) -> Result<(), ParseError> {
        let mut input = scheme.to_owned();
        input.push(':');
        let parsed = Parser::new(&|_| {}).parse_with_override(&input, self, StartOverride::SchemeStart)?;
        if is_special(&self.scheme) != is_special(&parsed.scheme) {
            return Err(ParseError::MissingSchemeNonRelativeUrl);
        }
        self.scheme = parsed.scheme;
        Ok(())
    }

    pub fn set_username(&mut self, username: &str) -> Result<(), ParseError> {
        if self.cannot_have_a_username_password_port() {
            return Err(ParseError::CannotHaveACredentialsOrPortWithoutHost);
        }
        self.username = percent_encoding::utf8_percent_encode(username, percent_encoding::USERINFO)
            .collect();
        Ok(())
    }

    pub fn set_password(&mut self, password: Option<&str>) -> Result<(), ParseError> {
        if self.cannot_have_a_username_password_port() {
            return Err(ParseError::CannotHaveACredentialsOrPortWithoutHost);
        }
        self.password = password
            .map(|p| percent_encoding::utf8_percent_encode(p, percent_encoding::USERINFO).collect());
        Ok(())
    }

    /// <https://url.spec.whatwg.org/#cannot-have-a-username-password-port>
    fn cannot_have_a_username_password_port(&self) -> bool {
        self.cannot_be_a_base_url
            || self.scheme == "file"
            || matches!(&self.host, Host::None)
            || matches!(&self.host, Host::Opaque(s) if s.is_empty())
    }

    pub fn set_host(&mut self, host: Option<&str>) -> Result<(), ParseError> {
        if self.cannot_be_a_base_url {
            return Err(ParseError::CannotHaveACredentialsOrPortWithoutHost);
        }
        match host {
            None if self.scheme == "file" => {
                self.host = Host::None;
                Ok(())
            }
            None => Err(ParseError::EmptyHost),
            Some(host) => {
                let parsed =
                    Parser::new(&|_| {}).parse_with_override(host, self, StartOverride::Host)?;
                self.host = parsed.host;
                self.port = parsed.port;
                Ok(())
            }
        }
    }

    /// Like [`Url::set_host`], but leaves the port untouched (the `hostname`
    /// accessor of spec.md §4.11, as distinct from `host`).
    pub fn set_hostname(&mut self, host: &str) -> Result<(), ParseError> {
        if self.cannot_be_a_base_url {
            return Err(ParseError::CannotHaveACredentialsOrPortWithoutHost);
        }
        let parsed = Parser::new(&|_| {}).parse_with_override(host, self, StartOverride::Hostname)?;
        self.host = parsed.host;
        Ok(())
    }

    pub fn set_port(&mut self, port: Option<u16>) -> Result<(), ParseError> {
        if self.cannot_have_a_username_password_port() {
            return Err(ParseError::CannotHaveACredentialsOrPortWithoutHost);
        }
        self.port = port.filter(|p| Some(*p) != default_port(&self.scheme));
        Ok(())
    }

    pub fn set_path(&mut self, path: &str) {
        if self.cannot_be_a_base_url {
            return;
        }
        let parsed =
            Parser::new(&|_| {}).parse_with_override(path, self, StartOverride::PathStart);
        if let Ok(parsed) = parsed {
            self.path = parsed.path;
        }
    }

    pub fn set_query(&mut self, query: Option<&str>) {
        match query {
            None => self.query = None,
            Some(q) => {
                self.query = Some(String::new());
                let input = format!("?{q}");
                if let Ok(parsed) =
                    Parser::new(&|_| {}).parse_with_override(&input, self, StartOverride::Query)
                {
                    self.query = parsed.query;
                }
            }
        }
    }

    pub fn set_fragment(&mut self, fragment: Option<&str>) {
        match fragment {
            None => self.fragment = None,
            Some(f) => {
                self.fragment = Some(String::new());
                let input = format!("#{f}");
                if let Ok(parsed) =
                    Parser::new(&|_| {}).parse_with_override(&input, self, StartOverride::Fragment)
                {
                    self.fragment = parsed.fragment;
                }
            }
        }
    }

    /// The URL serializer (C10): <https://url.spec.whatwg.org/#url-serializing>.
    pub fn as_str(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.scheme);
        out.push(':');

        if !matches!(self.host, Host::None) || self.scheme == "file" {
            out.push_str("//");
            if !self.username.is_empty() || self.password.is_some() {
                out.push_str(&self.username);
                if let Some(password) = &self.password {
                    out.push(':');
                    out.push_str(password);
                }
                out.push('@');
            }
            out.push_str(&self.host.to_string());
            if let Some(port) = self.port {
                out.push(':');
                out.push_str(&port.to_string());
            }
        } else if self.cannot_be_a_base_url {
            // No authority marker at all; the opaque path follows the colon directly.
        }

        if self.cannot_be_a_base_url {
            out.push_str(&self.path());
        } else {
            let serialized_path = self.path.to_serialized();
            if serialized_path.is_empty() {
                out.push('/');
            } else {
                out.push_str(&serialized_path);
            }
        }

        if let Some(query) = &self.query {
            out.push('?');
            out.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }
}

impl PartialEq for Url {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Url {}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl FromStr for Url {
    type Err = ParseError;
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Url::parse(input)
    }
}

impl PartialOrd for Url {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Url {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.as_str().cmp(&other.as_str())
    }
}

impl hash::Hash for Url {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

/// [`form_urlencoded::Target`] for [`Url::query_pairs_mut`]: writes pairs
/// directly into the owning `Url`'s query component instead of a
/// free-standing `String`.
pub struct UrlQuery<'a> {
    url: &'a mut Url,
}

impl<'a> form_urlencoded::Target for UrlQuery<'a> {
    fn as_mut_string(&mut self) -> &mut String {
        if self.url.query.is_none() {
            self.url.query = Some(String::new());
        }
        self.url.query.as_mut().unwrap()
    }

    fn finish(self) -> &'a mut Url {
        self.url
    }

    type Finished = &'a mut Url;
}

/// The search-parameters view (C12, spec.md §4.12) reachable through
/// [`Url::search_parameters`]: a mutable ordered list of (name, value)
/// pairs with a back-pointer to the owning `Url`.
pub struct SearchParams<'a> {
    url: &'a mut Url,
}

impl<'a> SearchParams<'a> {
    /// Append a new (name, value) pair.
    pub fn append(&mut self, name: &str, value: &str) -> &mut Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Remove every pair whose name is `name`.
    pub fn remove(&mut self, name: &str) -> &mut Self {
        self.url.query_pairs_mut().remove(name);
        self
    }

    /// Set the first pair named `name` to `value`, removing any other pairs
    /// with that name; appends a new pair if none existed.
    pub fn set(&mut self, name: &str, value: &str) -> &mut Self {
        self.url.query_pairs_mut().set(name, value);
        self
    }

    /// Sort pairs by name, stably.
    pub fn sort(&mut self) -> &mut Self {
        self.url.query_pairs_mut().sort();
        self
    }

    /// Remove every pair.
    pub fn clear(&mut self) -> &mut Self {
        self.url.query_pairs_mut().clear();
        self
    }

    /// The value of the first pair named `name`.
    pub fn get(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// The values of every pair named `name`, in order.
    pub fn get_all(&self, name: &str) -> Vec<String> {
        self.url
            .query_pairs()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
            .collect()
    }

    /// Whether any pair is named `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.url.query_pairs().any(|(k, _)| k == name)
    }

    /// The serialized query string (without a leading `?`).
    pub fn to_string(&self) -> String {
        self.url.query().unwrap_or("").to_owned()
    }
}

#[cfg(feature = "serde")]
mod serde_support {
    use super::Url;
    use serde::{de, ser};
    use std::fmt;

    impl ser::Serialize for Url {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: ser::Serializer,
        {
            serializer.serialize_str(self.as_str().as_str())
        }
    }

    impl<'de> de::Deserialize<'de> for Url {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: de::Deserializer<'de>,
        {
            struct UrlVisitor;
            impl de::Visitor<'_> for UrlVisitor {
                type Value = Url;
                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a URL string")
                }
                fn visit_str<E: de::Error>(self, v: &str) -> Result<Url, E> {
                    Url::parse(v).map_err(E::custom)
                }
            }
            deserializer.deserialize_str(UrlVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_http_url() {
        let url = Url::parse("http://example.com/a/b?q=1#frag").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), "example.com");
        assert_eq!(url.path(), "/a/b");
        assert_eq!(url.query(), Some("q=1"));
        assert_eq!(url.fragment(), Some("frag"));
    }

    #[test]
    fn default_port_is_omitted_on_serialization() {
        let url = Url::parse("http://example.com:80/").unwrap();
        assert_eq!(url.port(), None);
        assert_eq!(url.as_str(), "http://example.com/");
    }

    #[test]
    fn relative_reference_resolves_against_base() {
        let base = Url::parse("http://example.com/a/b").unwrap();
        let url = Url::join(&base, "../c").unwrap();
        assert_eq!(url.as_str(), "http://example.com/c");
    }

    #[test]
    fn cannot_be_a_base_url_keeps_an_opaque_path() {
        let url = Url::parse("mailto:user@example.com").unwrap();
        assert!(url.cannot_be_a_base());
        assert_eq!(url.path(), "user@example.com");
    }

    #[test]
    fn ipv6_host_round_trips_in_brackets() {
        let url = Url::parse("http://[::1]:8080/").unwrap();
        assert_eq!(url.hostname(), "[::1]");
        assert_eq!(url.as_str(), "http://[::1]:8080/");
    }

    #[test]
    fn query_pairs_mut_writes_through_to_the_url() {
        let mut url = Url::parse("http://example.com/search").unwrap();
        url.query_pairs_mut().append_pair("q", "rust url");
        assert_eq!(url.query(), Some("q=rust+url"));
        assert_eq!(url.as_str(), "http://example.com/search?q=rust+url");
    }

    #[test]
    fn file_url_without_host_is_allowed() {
        let url = Url::parse("file:///etc/hosts").unwrap();
        assert_eq!(url.host_str(), "");
        assert_eq!(url.path(), "/etc/hosts");
    }

    #[test]
    fn set_query_does_not_split_on_a_literal_hash() {
        let mut url = Url::parse("http://example.com/").unwrap();
        url.set_query(Some("a=1#2"));
        assert_eq!(url.query(), Some("a=1%232"));
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn set_hostname_leaves_port_untouched() {
        let mut url = Url::parse("http://example.com:8080/").unwrap();
        url.set_hostname("example.org").unwrap();
        assert_eq!(url.host_str(), "example.org");
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn file_scheme_rejects_setting_username() {
        let mut url = Url::parse("file:///etc/hosts").unwrap();
        assert!(url.set_username("root").is_err());
    }

    #[test]
    fn query_pairs_mut_appends_to_an_already_nonempty_query() {
        let mut url = Url::parse("http://example.com/search?a=1").unwrap();
        url.query_pairs_mut().append_pair("b", "2");
        assert_eq!(url.query(), Some("a=1&b=2"));
    }

    #[test]
    fn search_parameters_round_trips_append_get_and_contains() {
        let mut url = Url::parse("http://example.com/search").unwrap();
        url.search_parameters().append("q", "rust").append("q", "url");
        assert!(url.search_parameters().contains("q"));
        assert_eq!(url.search_parameters().get("q").as_deref(), Some("rust"));
        assert_eq!(
            url.search_parameters().get_all("q"),
            vec!["rust".to_string(), "url".to_string()]
        );
    }

    #[test]
    fn search_parameters_set_replaces_and_remove_deletes() {
        let mut url = Url::parse("http://example.com/search?a=1&b=2&a=3").unwrap();
        url.search_parameters().set("a", "new");
        assert_eq!(url.query(), Some("a=new&b=2"));
        url.search_parameters().remove("b");
        assert_eq!(url.query(), Some("a=new"));
    }

    #[test]
    fn search_parameters_sort_and_clear() {
        let mut url = Url::parse("http://example.com/search?b=2&a=1").unwrap();
        url.search_parameters().sort();
        assert_eq!(url.search_parameters().to_string(), "a=1&b=2");
        url.search_parameters().clear();
        assert_eq!(url.query(), Some(""));
    }
}

// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The 14-state "basic URL parser" (C9), plus the parse/validation error
//! taxonomy it and its collaborators (C1–C8) share.

use crate::host::{parse_host, Host};
use crate::{default_port, is_special, PathKind, Url};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS, FRAGMENT, PATH, QUERY, SPECIAL_QUERY, USERINFO};
use std::fmt;

/// Fatal parse errors: the attempted parse or setter failed and the URL
/// (or the field being set) is left untouched. See spec.md §7.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ParseError {
    EmptyHost,
    IdnaError,
    InvalidPort,
    InvalidIpv4Address,
    InvalidIpv6Address,
    InvalidUrlUnit,
    FileInvalidWindowsDriveLetterHost,
    SpecialSchemeMissingFollowingSolidus,
    MissingSchemeNonRelativeUrl,
    CannotBeABaseUrl,
    CannotHaveACredentialsOrPortWithoutHost,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseError::EmptyHost => "empty host",
            ParseError::IdnaError => "invalid international domain name",
            ParseError::InvalidPort => "invalid port number",
            ParseError::InvalidIpv4Address => "invalid IPv4 address",
            ParseError::InvalidIpv6Address => "invalid IPv6 address",
            ParseError::InvalidUrlUnit => "invalid character in URL",
            ParseError::FileInvalidWindowsDriveLetterHost => {
                "a `file:` URL's host is a Windows drive letter"
            }
            ParseError::SpecialSchemeMissingFollowingSolidus => {
                "special scheme missing following solidus"
            }
            ParseError::MissingSchemeNonRelativeUrl => "relative URL without a base",
            ParseError::CannotBeABaseUrl => "URL cannot be a base URL",
            ParseError::CannotHaveACredentialsOrPortWithoutHost => {
                "cannot set a username, password, or port without a host"
            }
        })
    }
}

impl std::error::Error for ParseError {}

/// Non-fatal spec deviations observed during a parse; delivered through the
/// `violation_fn` callback threaded through the parser, the non-fatal
/// channel described in spec.md §7.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum SyntaxViolation {
    Backslash,
    C0SpaceIgnored,
    EmbeddedCredentials,
    ExpectedDoubleSlash,
    FileWithHostAndWindowsDrive,
    NonUrlCodePoint,
    NullInFragment,
    PercentDecode,
    TabOrNewlineIgnored,
    UnencodedAtSign,
}

impl fmt::Display for SyntaxViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyntaxViolation::Backslash => "backslash",
            SyntaxViolation::C0SpaceIgnored => {
                "leading or trailing control or space character are ignored in URLs"
            }
            SyntaxViolation::EmbeddedCredentials => {
                "embedding authentication information (username or password) in a URL is not recommended"
            }
            SyntaxViolation::ExpectedDoubleSlash => "expected //",
            SyntaxViolation::FileWithHostAndWindowsDrive => {
                "file: with host and Windows drive letter"
            }
            SyntaxViolation::NonUrlCodePoint => "non-URL code point",
            SyntaxViolation::NullInFragment => "NULL characters are ignored in fragments",
            SyntaxViolation::PercentDecode => "expected 2 hex digits after %",
            SyntaxViolation::TabOrNewlineIgnored => "tabs or newlines are ignored in URLs",
            SyntaxViolation::UnencodedAtSign => "unencoded @ sign in username or password",
        })
    }
}

/// C9's state set (spec.md §4.9).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    SpecialRelativeOrAuthority,
    PathOrAuthority,
    Relative,
    RelativeSlash,
    SpecialAuthoritySlashes,
    SpecialAuthorityIgnoreSlashes,
    Authority,
    Host,
    Hostname,
    Port,
    File,
    FileSlash,
    FileHost,
    PathStart,
    Path,
    CannotBeABaseUrlPath,
    Query,
    Fragment,
}

/// C11's state-override entry points.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum StartOverride {
    SchemeStart,
    Host,
    Hostname,
    Port,
    PathStart,
    Query,
    Fragment,
}

/// Drop any ASCII tab or newline anywhere in the input, and trim leading and
/// trailing C0-control-or-space, recording a [`SyntaxViolation`] for each
/// kind observed. <https://url.spec.whatwg.org/#url-parsing> steps 1–2.
fn clean_input(input: &str, violation_fn: &dyn Fn(SyntaxViolation)) -> String {
    let trimmed = input.trim_matches(|c: char| c <= ' ');
    if trimmed.len() != input.len() {
        violation_fn(SyntaxViolation::C0SpaceIgnored);
    }
    let mut out = String::with_capacity(trimmed.len());
    let mut saw_tab_or_newline = false;
    for c in trimmed.chars() {
        if matches!(c, '\t' | '\n' | '\r') {
            saw_tab_or_newline = true;
        } else {
            out.push(c);
        }
    }
    if saw_tab_or_newline {
        violation_fn(SyntaxViolation::TabOrNewlineIgnored);
    }
    out
}

/// <https://url.spec.whatwg.org/#url-code-points>
fn is_url_code_point(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | '-' | '.' | '/' | ':' | ';'
                | '=' | '?' | '@' | '_' | '~'
        )
        || (c as u32 >= 0xA0
            && !matches!(c as u32, 0xD800..=0xDFFF | 0xFDD0..=0xFDEF)
            && (c as u32) & 0xFFFE != 0xFFFE)
}

fn check_url_code_points(input: &str, violation_fn: &dyn Fn(SyntaxViolation)) {
    for c in input.chars() {
        if c != '%' && !is_url_code_point(c) {
            violation_fn(SyntaxViolation::NonUrlCodePoint);
        }
    }
}

fn is_single_dot_segment(s: &str) -> bool {
    s == "." || s.eq_ignore_ascii_case("%2e")
}

fn is_double_dot_segment(s: &str) -> bool {
    matches!(s.to_ascii_lowercase().as_str(), ".." | ".%2e" | "%2e." | "%2e%2e")
}

fn is_windows_drive_letter(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && matches!(bytes[1], b':' | b'|')
}

/// True if `rest` (the remaining input from some position) begins with a
/// Windows drive letter: an ASCII alpha followed by `:` or `|`, then either
/// the end of that substring or one of `/ \ ? #`.
fn starts_with_windows_drive_letter(rest: &[char]) -> bool {
    rest.len() >= 2
        && rest[0].is_ascii_alphabetic()
        && matches!(rest[1], ':' | '|')
        && (rest.len() == 2 || matches!(rest[2], '/' | '\\' | '?' | '#'))
}

fn split_scheme(input: &str) -> Option<(&str, &str)> {
    let mut chars = input.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }
    for (i, c) in chars {
        if c == ':' {
            return Some((&input[..i], &input[i + 1..]));
        }
        if !(c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
            return None;
        }
    }
    None
}

/// The query encode set depends on whether the URL's scheme is special.
fn query_encode_set(is_special: bool) -> &'static AsciiSet {
    if is_special {
        SPECIAL_QUERY
    } else {
        QUERY
    }
}

pub(crate) struct Parser<'a> {
    violation_fn: &'a dyn Fn(SyntaxViolation),
}

impl<'a> Parser<'a> {
    pub(crate) fn new(violation_fn: &'a dyn Fn(SyntaxViolation)) -> Self {
        Parser { violation_fn }
    }

    fn violation(&self, v: SyntaxViolation) {
        (self.violation_fn)(v);
    }

    /// C9's entry point for a fresh (non-override) parse.
    pub(crate) fn parse(&self, input: &str, base: Option<&Url>) -> Result<Url, ParseError> {
        let cleaned = clean_input(input, self.violation_fn);
        check_url_code_points(&cleaned, self.violation_fn);

        if let Some((scheme, rest)) = split_scheme(&cleaned) {
            let scheme = scheme.to_ascii_lowercase();
            let chars: Vec<char> = rest.chars().collect();

            if scheme == "file" {
                let url = Url::new_with_scheme(scheme);
                return self.run(State::File, &chars, 0, base, url, false);
            }

            if is_special(&scheme) {
                let url = Url::new_with_scheme(scheme.clone());
                if base.is_some_and(|b| b.scheme == scheme) {
                    return self.run(State::SpecialRelativeOrAuthority, &chars, 0, base, url, false);
                }
                return self.run(State::SpecialAuthoritySlashes, &chars, 0, base, url, false);
            }

            let mut url = Url::new_with_scheme(scheme);
            if chars.first() == Some(&'/') {
                return self.run(State::PathOrAuthority, &chars, 0, None, url, false);
            }
            url.cannot_be_a_base_url = true;
            url.path = PathKind::Opaque(String::new());
            return self.run(State::CannotBeABaseUrlPath, &chars, 0, None, url, false);
        }

        let base = base.ok_or(ParseError::MissingSchemeNonRelativeUrl)?;
        let chars: Vec<char> = cleaned.chars().collect();
        if base.cannot_be_a_base_url {
            if chars.first() == Some(&'#') {
                let mut url = base.clone();
                return self.run(
                    State::Fragment,
                    &chars,
                    1,
                    None,
                    {
                        url.fragment = Some(String::new());
                        url
                    },
                    false,
                );
            }
            return Err(ParseError::MissingSchemeNonRelativeUrl);
        }
        let url = Url::new_with_scheme(base.scheme.clone());
        self.run(State::Relative, &chars, 0, Some(base), url, false)
    }

    /// A setter's state-override entry point (C11).
    pub(crate) fn parse_with_override(
        &self,
        input: &str,
        base: &Url,
        start: StartOverride,
    ) -> Result<Url, ParseError> {
        let cleaned = clean_input(input, self.violation_fn);
        if start == StartOverride::SchemeStart {
            let (scheme, rest) =
                split_scheme(&cleaned).ok_or(ParseError::MissingSchemeNonRelativeUrl)?;
            let scheme = scheme.to_ascii_lowercase();
            let chars: Vec<char> = rest.chars().collect();
            let url = Url::new_with_scheme(scheme.clone());
            let state = if scheme == "file" {
                State::File
            } else if is_special(&scheme) {
                State::SpecialAuthoritySlashes
            } else if chars.first() == Some(&'/') {
                State::PathOrAuthority
            } else {
                State::CannotBeABaseUrlPath
            };
            let mut url = url;
            if state == State::CannotBeABaseUrlPath {
                url.cannot_be_a_base_url = true;
                url.path = PathKind::Opaque(String::new());
            }
            return self.run(state, &chars, 0, None, url, false);
        }

        let chars: Vec<char> = cleaned.chars().collect();
        let url = base.clone();
        let state = match start {
            StartOverride::SchemeStart => unreachable!(),
            StartOverride::Host => State::Host,
            StartOverride::Hostname => State::Hostname,
            StartOverride::Port => State::Port,
            StartOverride::PathStart => State::PathStart,
            StartOverride::Query => State::Query,
            StartOverride::Fragment => State::Fragment,
        };
        self.run(state, &chars, 0, None, url, true)
    }

    /// The core state-machine loop, shared by fresh parses and overrides.
    #[allow(clippy::too_many_lines)]
    fn run(
        &self,
        mut state: State,
        chars: &[char],
        mut pos: usize,
        base: Option<&Url>,
        mut url: Url,
        override_mode: bool,
    ) -> Result<Url, ParseError> {
        let is_special_scheme = is_special(&url.scheme);
        let mut buffer = String::new();
        let mut at_sign_seen = false;
        let mut inside_brackets = false;
        let mut password_token_seen = false;

        loop {
            let c = chars.get(pos).copied();
            match state {
                State::SpecialRelativeOrAuthority => {
                    if c == Some('/') && chars.get(pos + 1) == Some(&'/') {
                        state = State::SpecialAuthorityIgnoreSlashes;
                        pos += 2;
                    } else {
                        self.violation(SyntaxViolation::ExpectedDoubleSlash);
                        state = State::Relative;
                    }
                }

                State::PathOrAuthority => {
                    if c == Some('/') {
                        state = State::Authority;
                        pos += 1;
                    } else {
                        state = State::Path;
                    }
                }

                State::Relative => {
                    let base = base.expect("relative state always has a base");
                    url.username = base.username.clone();
                    url.password = base.password.clone();
                    url.host = base.host.clone();
                    url.port = base.port;
                    url.path = base.path.clone();
                    url.query = base.query.clone();
                    match c {
                        None => {
                            return Ok(url);
                        }
                        Some('/') => {
                            state = State::RelativeSlash;
                            pos += 1;
                        }
                        Some('\\') if is_special_scheme => {
                            self.violation(SyntaxViolation::Backslash);
                            state = State::RelativeSlash;
                            pos += 1;
                        }
                        Some('?') => {
                            url.query = Some(String::new());
                            state = State::Query;
                            pos += 1;
                        }
                        Some('#') => {
                            url.fragment = Some(String::new());
                            state = State::Fragment;
                            pos += 1;
                        }
                        Some(_) => {
                            shorten_path(&mut url);
                            state = State::Path;
                        }
                    }
                }

                State::RelativeSlash => {
                    let base = base.expect("relative-slash state always has a base");
                    if is_special_scheme && matches!(c, Some('/') | Some('\\')) {
                        if c == Some('\\') {
                            self.violation(SyntaxViolation::Backslash);
                        }
                        state = State::SpecialAuthorityIgnoreSlashes;
                        pos += 1;
                    } else if c == Some('/') {
                        state = State::Authority;
                        pos += 1;
                    } else {
                        url.username = String::new();
                        url.password = None;
                        url.host = base.host.clone();
                        url.port = base.port;
                        state = State::Path;
                    }
                }

                State::SpecialAuthoritySlashes => {
                    if c == Some('/') && chars.get(pos + 1) == Some(&'/') {
                        pos += 2;
                    } else {
                        self.violation(SyntaxViolation::ExpectedDoubleSlash);
                    }
                    state = State::SpecialAuthorityIgnoreSlashes;
                }

                State::SpecialAuthorityIgnoreSlashes => {
                    if matches!(c, Some('/') | Some('\\')) {
                        pos += 1;
                    } else {
                        state = State::Authority;
                    }
                }

                State::Authority => match c {
                    Some('@') => {
                        if at_sign_seen {
                            buffer.insert_str(0, "%40");
                        }
                        at_sign_seen = true;
                        self.violation(SyntaxViolation::EmbeddedCredentials);
                        flush_userinfo(&buffer, &mut url, &mut password_token_seen);
                        buffer.clear();
                        pos += 1;
                    }
                    None | Some('/') | Some('?') | Some('#') => {
                        if at_sign_seen && buffer.is_empty() {
                            return Err(ParseError::EmptyHost);
                        }
                        pos -= buffer.chars().count();
                        buffer.clear();
                        state = State::Host;
                    }
                    Some('\\') if is_special_scheme => {
                        if at_sign_seen && buffer.is_empty() {
                            return Err(ParseError::EmptyHost);
                        }
                        pos -= buffer.chars().count();
                        buffer.clear();
                        state = State::Host;
                    }
                    Some(ch) => {
                        buffer.push(ch);
                        pos += 1;
                    }
                },

                State::Host | State::Hostname => {
                    if c == Some(':') && !inside_brackets {
                        if buffer.is_empty() && is_special_scheme {
                            return Err(ParseError::EmptyHost);
                        }
                        url.host = parse_host(&buffer, is_special_scheme, url.scheme == "file", self.violation_fn)?;
                        buffer.clear();
                        if state == State::Hostname {
                            return Ok(url);
                        }
                        state = State::Port;
                        pos += 1;
                    } else if c.is_none()
                        || c == Some('/')
                        || c == Some('?')
                        || c == Some('#')
                        || (is_special_scheme && c == Some('\\'))
                    {
                        if buffer.is_empty() && is_special_scheme {
                            return Err(ParseError::EmptyHost);
                        }
                        url.host = parse_host(&buffer, is_special_scheme, url.scheme == "file", self.violation_fn)?;
                        buffer.clear();
                        state = State::PathStart;
                    } else {
                        if c == Some('[') {
                            inside_brackets = true;
                        } else if c == Some(']') {
                            inside_brackets = false;
                        }
                        buffer.push(c.unwrap());
                        pos += 1;
                    }
                }

                State::Port => {
                    match c {
                        Some(ch) if ch.is_ascii_digit() => {
                            buffer.push(ch);
                            pos += 1;
                        }
                        None | Some('/') | Some('?') | Some('#') => {
                            finish_port(&buffer, &mut url)?;
                            buffer.clear();
                            if override_mode {
                                return Ok(url);
                            }
                            state = State::PathStart;
                        }
                        Some('\\') if is_special_scheme => {
                            finish_port(&buffer, &mut url)?;
                            buffer.clear();
                            if override_mode {
                                return Ok(url);
                            }
                            state = State::PathStart;
                        }
                        Some(_) => return Err(ParseError::InvalidPort),
                    }
                }

                State::File => {
                    url.host = Host::None;
                    match c {
                        Some('/') | Some('\\') => {
                            if c == Some('\\') {
                                self.violation(SyntaxViolation::Backslash);
                            }
                            state = State::FileSlash;
                            pos += 1;
                        }
                        _ => {
                            if let Some(base) = base.filter(|b| b.scheme == "file") {
                                url.host = base.host.clone();
                                match c {
                                    None => {
                                        url.path = base.path.clone();
                                        url.query = base.query.clone();
                                        return Ok(url);
                                    }
                                    Some('?') => {
                                        url.path = base.path.clone();
                                        url.query = Some(String::new());
                                        state = State::Query;
                                        pos += 1;
                                    }
                                    Some('#') => {
                                        url.path = base.path.clone();
                                        url.query = base.query.clone();
                                        url.fragment = Some(String::new());
                                        state = State::Fragment;
                                        pos += 1;
                                    }
                                    _ => {
                                        if starts_with_windows_drive_letter(&chars[pos..]) {
                                            self.violation(SyntaxViolation::FileWithHostAndWindowsDrive);
                                            url.path = PathKind::List(vec![]);
                                        } else {
                                            url.path = base.path.clone();
                                            shorten_path(&mut url);
                                        }
                                        state = State::Path;
                                    }
                                }
                            } else {
                                url.path = PathKind::List(vec![]);
                                state = State::Path;
                            }
                        }
                    }
                }

                State::FileSlash => {
                    if matches!(c, Some('/') | Some('\\')) {
                        if c == Some('\\') {
                            self.violation(SyntaxViolation::Backslash);
                        }
                        state = State::FileHost;
                        pos += 1;
                    } else {
                        if let Some(base) = base.filter(|b| b.scheme == "file") {
                            if !starts_with_windows_drive_letter(&chars[pos..]) {
                                url.host = base.host.clone();
                            }
                        }
                        url.path = PathKind::List(vec![]);
                        state = State::Path;
                    }
                }

                State::FileHost => {
                    if c.is_none() || matches!(c, Some('/') | Some('?') | Some('#')) {
                        if is_windows_drive_letter(&buffer) {
                            self.violation(SyntaxViolation::FileWithHostAndWindowsDrive);
                            pos -= buffer.chars().count();
                            buffer.clear();
                            url.path = PathKind::List(vec![]);
                            state = State::Path;
                        } else if buffer.is_empty() {
                            url.host = Host::None;
                            buffer.clear();
                            url.path = PathKind::List(vec![]);
                            state = State::PathStart;
                        } else {
                            url.host = parse_host(&buffer, true, true, self.violation_fn)?;
                            buffer.clear();
                            url.path = PathKind::List(vec![]);
                            state = State::PathStart;
                        }
                    } else {
                        buffer.push(c.unwrap());
                        pos += 1;
                    }
                }

                State::PathStart => {
                    if !matches!(url.path, PathKind::List(_)) {
                        url.path = PathKind::List(vec![]);
                    }
                    match c {
                        Some('\\') if is_special_scheme => {
                            self.violation(SyntaxViolation::Backslash);
                            pos += 1;
                        }
                        Some('/') => {
                            pos += 1;
                        }
                        None if override_mode => return Ok(url),
                        _ => {}
                    }
                    state = State::Path;
                }

                State::Path => {
                    let boundary = matches!(c, None | Some('/') | Some('?') | Some('#'))
                        || (is_special_scheme && c == Some('\\'));
                    if !boundary {
                        if c == Some('%') {
                            let h = chars.get(pos + 1).copied();
                            let l = chars.get(pos + 2).copied();
                            if !matches!((h, l), (Some(h), Some(l)) if h.is_ascii_hexdigit() && l.is_ascii_hexdigit())
                            {
                                self.violation(SyntaxViolation::PercentDecode);
                            }
                        }
                        buffer.push(c.unwrap());
                        pos += 1;
                        continue;
                    }

                    if is_double_dot_segment(&buffer) {
                        shorten_path(&mut url);
                        if !matches!(c, Some('/')) && !(is_special_scheme && c == Some('\\')) {
                            push_segment(&mut url, String::new());
                        }
                    } else if is_single_dot_segment(&buffer) {
                        if !matches!(c, Some('/')) && !(is_special_scheme && c == Some('\\')) {
                            push_segment(&mut url, String::new());
                        }
                    } else {
                        if url.scheme == "file"
                            && path_is_empty(&url)
                            && is_windows_drive_letter(&buffer)
                        {
                            let mut chars2 = buffer.chars();
                            let letter = chars2.next().unwrap();
                            buffer = alloc_string(letter, ':');
                        }
                        let encoded: String = utf8_percent_encode(&buffer, PATH).collect();
                        push_segment(&mut url, encoded);
                    }
                    buffer.clear();

                    match c {
                        Some('/') => {
                            pos += 1;
                        }
                        Some('\\') if is_special_scheme => {
                            pos += 1;
                        }
                        Some('?') => {
                            url.query = Some(String::new());
                            state = State::Query;
                            pos += 1;
                        }
                        Some('#') => {
                            url.fragment = Some(String::new());
                            state = State::Fragment;
                            pos += 1;
                        }
                        None => return Ok(url),
                        _ => unreachable!("boundary implies one of the above"),
                    }
                }

                State::CannotBeABaseUrlPath => {
                    match c {
                        None => return Ok(url),
                        Some('?') => {
                            url.query = Some(String::new());
                            state = State::Query;
                            pos += 1;
                        }
                        Some('#') => {
                            url.fragment = Some(String::new());
                            state = State::Fragment;
                            pos += 1;
                        }
                        Some(ch) => {
                            if ch == '%' {
                                let h = chars.get(pos + 1).copied();
                                let l = chars.get(pos + 2).copied();
                                if !matches!((h, l), (Some(h), Some(l)) if h.is_ascii_hexdigit() && l.is_ascii_hexdigit())
                                {
                                    self.violation(SyntaxViolation::PercentDecode);
                                }
                                if let PathKind::Opaque(s) = &mut url.path {
                                    s.push('%');
                                }
                            } else if let PathKind::Opaque(s) = &mut url.path {
                                let mut buf = [0u8; 4];
                                let encoded: String =
                                    utf8_percent_encode(ch.encode_utf8(&mut buf), CONTROLS).collect();
                                s.push_str(&encoded);
                            }
                            pos += 1;
                        }
                    }
                }

                State::Query => match c {
                    None => return Ok(url),
                    Some('#') if !override_mode => {
                        url.fragment = Some(String::new());
                        state = State::Fragment;
                        pos += 1;
                    }
                    Some(ch) => {
                        let mut buf = [0u8; 4];
                        let encoded: String = utf8_percent_encode(
                            ch.encode_utf8(&mut buf),
                            query_encode_set(is_special_scheme),
                        )
                        .collect();
                        if let Some(q) = &mut url.query {
                            q.push_str(&encoded);
                        }
                        pos += 1;
                    }
                },

                State::Fragment => match c {
                    None => return Ok(url),
                    Some(ch) => {
                        if ch == '\0' {
                            self.violation(SyntaxViolation::NullInFragment);
                        } else {
                            let mut buf = [0u8; 4];
                            let encoded: String =
                                utf8_percent_encode(ch.encode_utf8(&mut buf), FRAGMENT).collect();
                            if let Some(f) = &mut url.fragment {
                                f.push_str(&encoded);
                            }
                        }
                        pos += 1;
                    }
                },
            }
        }
    }
}

fn alloc_string(a: char, b: char) -> String {
    let mut s = String::with_capacity(2);
    s.push(a);
    s.push(b);
    s
}

fn path_is_empty(url: &Url) -> bool {
    matches!(&url.path, PathKind::List(v) if v.is_empty())
}

fn push_segment(url: &mut Url, segment: String) {
    if let PathKind::List(v) = &mut url.path {
        v.push(segment);
    }
}

/// <https://url.spec.whatwg.org/#shorten-a-urls-path>
fn shorten_path(url: &mut Url) {
    if let PathKind::List(v) = &mut url.path {
        if url.scheme == "file" && v.len() == 1 && is_normalized_drive_letter(&v[0]) {
            return;
        }
        v.pop();
    }
}

fn is_normalized_drive_letter(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// <https://url.spec.whatwg.org/#authority-state>, the "process buffer as
/// userinfo" substep. `password_token_seen` persists across every `@` seen
/// in the authority, not just the current `buffer`: once a `:` has been
/// seen anywhere, every later code point (even from a buffer with no `:`
/// of its own, after a second `@`) is a password character.
fn flush_userinfo(buffer: &str, url: &mut Url, password_token_seen: &mut bool) {
    for c in buffer.chars() {
        if c == ':' && !*password_token_seen {
            *password_token_seen = true;
            if url.password.is_none() {
                url.password = Some(String::new());
            }
            continue;
        }
        let mut buf = [0u8; 4];
        let encoded: String = utf8_percent_encode(c.encode_utf8(&mut buf), USERINFO).collect();
        if *password_token_seen {
            url.password.get_or_insert_with(String::new).push_str(&encoded);
        } else {
            url.username.push_str(&encoded);
        }
    }
}

fn finish_port(buffer: &str, url: &mut Url) -> Result<(), ParseError> {
    if buffer.is_empty() {
        url.port = None;
        return Ok(());
    }
    let value: u32 = buffer.parse().map_err(|_| ParseError::InvalidPort)?;
    if value > u16::from(u16::MAX) as u32 {
        return Err(ParseError::InvalidPort);
    }
    let value = value as u16;
    url.port = if default_port(&url.scheme) == Some(value) {
        None
    } else {
        Some(value)
    };
    Ok(())
}

// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The host parser (C8), dispatching among the opaque, domain, IPv4, and
//! IPv6 branches, plus the IPv4 (C6) and IPv6 (C7) number parsers themselves.

use crate::parser::{ParseError, SyntaxViolation};
use percent_encoding::{utf8_percent_encode, CONTROLS};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// A parsed host, tagged by which of C8's four branches produced it.
///
/// `S` is generic so the parser can build a `Host<&str>` against borrowed
/// input before committing to an owned `Host<String>` in the URL record,
/// the same trick upstream `url` uses.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Host<S = String> {
    /// No host: only possible for a non-special scheme with no authority.
    None,
    /// A DNS domain name, after IDNA `ToASCII`, in ASCII lowercase.
    Domain(S),
    /// An IPv4 address.
    Ipv4(Ipv4Addr),
    /// An IPv6 address.
    Ipv6(Ipv6Addr),
    /// A host for a non-special scheme, kept percent-encoded but otherwise
    /// opaque to this library.
    Opaque(S),
}

impl<S: AsRef<str>> fmt::Display for Host<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::None => Ok(()),
            Host::Domain(domain) => domain.as_ref().fmt(f),
            Host::Ipv4(addr) => addr.fmt(f),
            Host::Ipv6(addr) => {
                f.write_str("[")?;
                write_ipv6(*addr, f)?;
                f.write_str("]")
            }
            Host::Opaque(label) => label.as_ref().fmt(f),
        }
    }
}

/// Bytes forbidden in a non-opaque host, and in an opaque host other than `%`.
/// <https://url.spec.whatwg.org/#forbidden-host-code-point>
fn is_forbidden_host_code_point(c: char) -> bool {
    matches!(
        c,
        '\0' | '\t' | '\n' | '\r' | ' ' | '#' | '/' | ':' | '<' | '>' | '?' | '@' | '[' | '\\'
            | ']' | '^' | '|'
    )
}

fn is_forbidden_domain_code_point(c: char) -> bool {
    is_forbidden_host_code_point(c) || matches!(c, '\u{0}'..='\u{1f}' | '%' | '\u{7f}')
}

/// C8. Parses `input` into a tagged `Host`; `is_special` selects the opaque
/// branch vs. the domain/IPv4/IPv6 branches.
pub(crate) fn parse_host<'a>(
    input: &'a str,
    is_special: bool,
    is_file: bool,
    violation_fn: &dyn Fn(SyntaxViolation),
) -> Result<Host<String>, ParseError> {
    if let Some(rest) = input.strip_prefix('[') {
        return if let Some(address) = rest.strip_suffix(']') {
            parse_ipv6(address).map(Host::Ipv6)
        } else {
            Err(ParseError::InvalidIpv6Address)
        };
    }

    if !is_special {
        if input.is_empty() {
            return Ok(Host::Opaque(String::new()));
        }
        return parse_opaque_host(input, violation_fn).map(Host::Opaque);
    }

    if input.is_empty() {
        return if is_file {
            Ok(Host::None)
        } else {
            Err(ParseError::EmptyHost)
        };
    }

    let domain = percent_encoding::percent_decode(input.as_bytes())
        .decode_utf8()
        .map_err(|_| ParseError::IdnaError)?;
    let domain = idna::domain_to_ascii(&domain).map_err(|_| ParseError::IdnaError)?;

    if domain.is_empty() {
        return Err(ParseError::EmptyHost);
    }
    if domain
        .chars()
        .any(is_forbidden_domain_code_point)
    {
        return Err(ParseError::IdnaError);
    }

    match parse_ipv4(&domain)? {
        Some(address) => Ok(Host::Ipv4(address)),
        None => Ok(Host::Domain(domain)),
    }
}

/// C8's opaque-host branch: percent-encode any byte not already valid for a
/// host, rejecting forbidden host code points other than `%`.
fn parse_opaque_host(
    input: &str,
    violation_fn: &dyn Fn(SyntaxViolation),
) -> Result<String, ParseError> {
    for c in input.chars() {
        if c != '%' && is_forbidden_host_code_point(c) {
            return Err(ParseError::InvalidUrlUnit);
        }
        if c == '%' {
            violation_fn(SyntaxViolation::PercentDecode);
        }
    }
    const OPAQUE_HOST: &percent_encoding::AsciiSet = &CONTROLS
        .add(b' ')
        .add(b'"')
        .add(b'<')
        .add(b'>')
        .add(b'`')
        .add(b'#')
        .add(b'?')
        .add(b'{')
        .add(b'}');
    Ok(utf8_percent_encode(input, OPAQUE_HOST).to_string())
}

/// C6. `None` means `input` does not look numeric at all (not IPv4 syntax,
/// fall through to domain); `Some` is a successfully parsed address;
/// `Err` is a syntactically-numeric input that overflowed or had an
/// out-of-range segment.
pub(crate) fn parse_ipv4(input: &str) -> Result<Option<Ipv4Addr>, ParseError> {
    let parts: Vec<&str> = input.split('.').collect();
    // Trailing empty part from a trailing dot is allowed by WHATWG's ends-in-
    // a-number check but not meaningful here as a segment; drop it if present
    // and non-empty otherwise.
    let parts: Vec<&str> = if parts.len() > 1 && parts.last() == Some(&"") {
        parts[..parts.len() - 1].to_vec()
    } else {
        parts
    };
    if parts.is_empty() || parts.len() > 4 {
        return Ok(None);
    }

    let mut numbers: Vec<u64> = Vec::with_capacity(parts.len());
    for part in &parts {
        match parse_ipv4_number(part) {
            Some(n) => numbers.push(n),
            None => return Ok(None),
        }
    }

    let last_index = numbers.len() - 1;
    for &n in &numbers[..last_index] {
        if n > 255 {
            return Err(ParseError::InvalidIpv4Address);
        }
    }
    if numbers[last_index] >= 256u64.pow((5 - numbers.len()) as u32) {
        return Err(ParseError::InvalidIpv4Address);
    }

    let mut value = numbers[last_index];
    for (i, &n) in numbers[..last_index].iter().enumerate() {
        value += n * 256u64.pow((3 - i) as u32);
    }
    Ok(Some(Ipv4Addr::from(value as u32)))
}

/// Parses a single dotted-quad segment, returning `None` if it is not
/// numeric syntax at all (distinct from `Err`, which is for numeric-but-
/// out-of-range input, handled by the caller).
fn parse_ipv4_number(mut input: &str) -> Option<u64> {
    if input.is_empty() {
        return None;
    }
    let radix = if let Some(rest) = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        input = rest;
        16
    } else if input.len() > 1 && input.starts_with('0') {
        input = &input[1..];
        8
    } else {
        10
    };
    if input.is_empty() {
        return Some(0);
    }
    if !input.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(input, radix).ok()
}

/// C7: parses the contents of `[...]` (without the brackets) into an
/// `Ipv6Addr`.
pub(crate) fn parse_ipv6(input: &str) -> Result<Ipv6Addr, ParseError> {
    let input = input.as_bytes();
    let len = input.len();
    let mut is_ip_v4 = false;
    let mut pieces = [0u16; 8];
    let mut piece_pointer = 0;
    let mut compress_pointer = None;
    let mut i = 0;

    if len < 2 {
        return Err(ParseError::InvalidIpv6Address);
    }

    if input[0] == b':' {
        if input[1] != b':' {
            return Err(ParseError::InvalidIpv6Address);
        }
        i = 2;
        piece_pointer = 1;
        compress_pointer = Some(1usize);
    }

    while i < len {
        if piece_pointer == 8 {
            return Err(ParseError::InvalidIpv6Address);
        }
        if input[i] == b':' {
            if compress_pointer.is_some() {
                return Err(ParseError::InvalidIpv6Address);
            }
            i += 1;
            piece_pointer += 1;
            compress_pointer = Some(piece_pointer);
            continue;
        }

        let start = i;
        let mut value: u32 = 0;
        let mut length = 0;
        while length < 4 && i < len && (input[i] as char).is_ascii_hexdigit() {
            value = value * 0x10 + (input[i] as char).to_digit(16).unwrap();
            i += 1;
            length += 1;
        }

        if i < len && input[i] == b'.' {
            if length == 0 {
                return Err(ParseError::InvalidIpv6Address);
            }
            i = start;
            is_ip_v4 = true;
            break;
        } else if i < len && input[i] == b':' {
            i += 1;
            if i >= len {
                return Err(ParseError::InvalidIpv6Address);
            }
        } else if i < len {
            return Err(ParseError::InvalidIpv6Address);
        }
        pieces[piece_pointer] = value as u16;
        piece_pointer += 1;
    }

    if is_ip_v4 {
        if piece_pointer > 6 {
            return Err(ParseError::InvalidIpv6Address);
        }
        let mut numbers_seen = 0;
        let rest = core::str::from_utf8(&input[i..]).map_err(|_| ParseError::InvalidIpv6Address)?;
        for part in rest.split('.') {
            numbers_seen += 1;
            if numbers_seen > 4 {
                return Err(ParseError::InvalidIpv6Address);
            }
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseError::InvalidIpv6Address);
            }
            if part.len() > 1 && part.starts_with('0') {
                return Err(ParseError::InvalidIpv6Address);
            }
            let value: u32 = part.parse().map_err(|_| ParseError::InvalidIpv6Address)?;
            if value > 255 {
                return Err(ParseError::InvalidIpv6Address);
            }
            let shift = if piece_pointer % 2 == 0 { 8 } else { 0 };
            pieces[piece_pointer] =
                pieces[piece_pointer].wrapping_add((value as u16) << shift);
            if numbers_seen == 2 || numbers_seen == 4 {
                piece_pointer += 1;
            }
        }
        if numbers_seen != 4 {
            return Err(ParseError::InvalidIpv6Address);
        }
    }

    match compress_pointer {
        Some(compress_pointer) => {
            let mut swaps = piece_pointer - compress_pointer;
            piece_pointer = 7;
            while piece_pointer != 0 && swaps > 0 {
                pieces.swap(piece_pointer, compress_pointer + swaps - 1);
                piece_pointer -= 1;
                swaps -= 1;
            }
        }
        None if piece_pointer != 8 => return Err(ParseError::InvalidIpv6Address),
        None => {}
    }

    Ok(Ipv6Addr::from(pieces))
}

/// <https://url.spec.whatwg.org/#find-the-ipv6-address-serializer>
fn write_ipv6(addr: Ipv6Addr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let pieces = addr.segments();

    // Find the longest run of consecutive zero pieces (length >= 2, ties
    // broken by the earliest run).
    let (mut best_start, mut best_len) = (None, 0usize);
    let (mut cur_start, mut cur_len) = (0usize, 0usize);
    for (idx, &piece) in pieces.iter().enumerate() {
        if piece == 0 {
            if cur_len == 0 {
                cur_start = idx;
            }
            cur_len += 1;
            if cur_len > best_len {
                best_len = cur_len;
                best_start = Some(cur_start);
            }
        } else {
            cur_len = 0;
        }
    }

    let hex_join = |group: &[u16]| {
        group
            .iter()
            .map(|p| format!("{:x}", p))
            .collect::<Vec<_>>()
            .join(":")
    };

    match best_start.filter(|_| best_len >= 2) {
        None => f.write_str(&hex_join(&pieces)),
        Some(start) => write!(
            f,
            "{}::{}",
            hex_join(&pieces[..start]),
            hex_join(&pieces[start + best_len..])
        ),
    }
}

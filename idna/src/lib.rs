// Copyright 2013-2014 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! IDNA (Internationalizing Domain Names in Applications,
//! [UTS #46](http://www.unicode.org/reports/tr46/)) and Punycode
//! ([RFC 3492](http://tools.ietf.org/html/rfc3492)).
//!
//! This implements the `domain to ASCII` and `domain to Unicode` algorithms
//! from the WHATWG URL Standard, as used by the companion `url` crate's
//! domain processor.
//!
//! ```
//! assert_eq!(idna::domain_to_ascii("example.com").unwrap(), "example.com");
//! assert_eq!(idna::domain_to_ascii("мойдомен.рф").unwrap(), "xn--80ajglfv4b.xn--p1ai");
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

use alloc::string::String;

mod punycode;
mod tables;
mod uts46;

pub use crate::uts46::{Config, Errors};

/// The default ToASCII configuration, matching
/// <https://url.spec.whatwg.org/#concept-domain-to-ascii>: transitional
/// processing off, `VerifyDnsLength` off, STD3 rules off.
fn default_config() -> Config {
    Config::default()
}

/// `domain to ASCII` with the default (lenient, WHATWG-URL-compatible) profile.
pub fn domain_to_ascii(domain: &str) -> Result<String, Errors> {
    default_config().to_ascii(domain)
}

/// `domain to ASCII` with `VerifyDnsLength`, `CheckHyphens`, and
/// `UseSTD3ASCIIRules` all turned on, for callers that want a strict
/// DNS-conformance check rather than the lenient URL-parsing behavior.
pub fn domain_to_ascii_strict(domain: &str) -> Result<String, Errors> {
    Config::strict().to_ascii(domain)
}

/// `domain to Unicode`: maps and validates `domain`, returning the mapped
/// string even on failure (the caller decides whether to use a partially
/// mapped domain), alongside a `Result` recording any validity errors.
pub fn domain_to_unicode(domain: &str) -> (String, Result<(), Errors>) {
    default_config().to_unicode(domain)
}

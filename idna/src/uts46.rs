// Copyright 2013-2014 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [*Unicode IDNA Compatibility Processing*
//! (Unicode Technical Standard #46)](http://www.unicode.org/reports/tr46/)

use crate::punycode;
use crate::tables::find_char;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use unicode_bidi::{bidi_class, BidiClass};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const PUNYCODE_PREFIX: &str = "xn--";

/// The maximum number of dot-separated labels a domain may have; an
/// implementation hard cap (spec.md §4.5 step 3), independent of DNS length
/// limits, to keep label processing `O(n)` with a small constant.
const MAX_LABELS: usize = 32;

#[derive(Debug)]
pub(crate) enum Mapping {
    Valid,
    Ignored,
    Mapped(&'static str),
    Deviation(&'static str),
    Disallowed,
    DisallowedStd3Valid,
    DisallowedStd3Mapped(&'static str),
}

fn map_char(codepoint: char, config: Config, output: &mut String, errors: &mut Vec<Error>) {
    match *find_char(codepoint) {
        Mapping::Valid => output.push(codepoint),
        Mapping::Ignored => {}
        Mapping::Mapped(replacement) => output.push_str(replacement),
        Mapping::Deviation(replacement) => {
            if config.transitional_processing {
                output.push_str(replacement)
            } else {
                output.push(codepoint)
            }
        }
        Mapping::Disallowed => {
            errors.push(Error::DisallowedCodePoint);
            output.push(codepoint);
        }
        Mapping::DisallowedStd3Valid => {
            if config.use_std3_ascii_rules {
                errors.push(Error::DisallowedByStd3AsciiRules);
            }
            output.push(codepoint)
        }
        Mapping::DisallowedStd3Mapped(replacement) => {
            if config.use_std3_ascii_rules {
                errors.push(Error::DisallowedMappedInStd3);
            }
            output.push_str(replacement)
        }
    }
}

/// <https://tools.ietf.org/html/rfc5893#section-2>
fn passes_bidi(label: &str, is_bidi_domain: bool) -> bool {
    if !is_bidi_domain {
        return true;
    }

    let mut chars = label.chars();
    let first_char_class = match chars.next() {
        Some(c) => bidi_class(c),
        None => return true,
    };

    match first_char_class {
        // Rule 1: the first character must be L, R, or AL.
        BidiClass::L => {
            // Rule 5: only L, EN, ES, CS, ET, ON, BN, NSM may follow.
            for c in chars.clone() {
                if !matches!(
                    bidi_class(c),
                    BidiClass::L
                        | BidiClass::EN
                        | BidiClass::ES
                        | BidiClass::CS
                        | BidiClass::ET
                        | BidiClass::ON
                        | BidiClass::BN
                        | BidiClass::NSM
                ) {
                    return false;
                }
            }
            // Rule 6: must end in L or EN, ignoring any trailing NSM run.
            let last_non_nsm = label
                .chars()
                .rev()
                .find(|&c| bidi_class(c) != BidiClass::NSM);
            !matches!(last_non_nsm, Some(c) if bidi_class(c) != BidiClass::L && bidi_class(c) != BidiClass::EN)
        }
        BidiClass::R | BidiClass::AL => {
            let mut found_en = false;
            let mut found_an = false;
            for c in chars.clone() {
                let class = bidi_class(c);
                if class == BidiClass::EN {
                    found_en = true;
                } else if class == BidiClass::AN {
                    found_an = true;
                }
                if !matches!(
                    class,
                    BidiClass::R
                        | BidiClass::AL
                        | BidiClass::AN
                        | BidiClass::EN
                        | BidiClass::ES
                        | BidiClass::CS
                        | BidiClass::ET
                        | BidiClass::ON
                        | BidiClass::BN
                        | BidiClass::NSM
                ) {
                    return false;
                }
            }
            let last = label
                .chars()
                .rev()
                .find(|&c| bidi_class(c) != BidiClass::NSM);
            let ends_ok = matches!(
                last,
                Some(c) if matches!(bidi_class(c), BidiClass::R | BidiClass::AL | BidiClass::EN | BidiClass::AN)
            );
            ends_ok && !(found_an && found_en)
        }
        _ => false,
    }
}

/// Validity criteria from <http://www.unicode.org/reports/tr46/#Validity_Criteria>.
///
/// V1 (NFC) and V8 (Bidi) are checked by the caller to avoid duplicate work.
fn is_valid(label: &str, config: Config) -> bool {
    let first_char = match label.chars().next() {
        Some(c) => c,
        None => return true,
    };

    // V3: must not begin or end with a hyphen-minus, when CheckHyphens.
    if config.check_hyphens && (label.starts_with('-') || label.ends_with('-')) {
        return false;
    }

    // V2: CheckHyphens also forbids a hyphen in both the third and fourth positions.
    if config.check_hyphens {
        let bytes: Vec<char> = label.chars().collect();
        if bytes.len() >= 4 && bytes[2] == '-' && bytes[3] == '-' {
            return false;
        }
    }

    // V5: must not begin with a combining mark.
    if is_combining_mark(first_char) {
        return false;
    }

    // V6: every code point must still be valid (or an allowed deviation) post-mapping.
    if label.chars().any(|c| match *find_char(c) {
        Mapping::Valid => false,
        Mapping::Deviation(_) => config.transitional_processing,
        Mapping::DisallowedStd3Valid => config.use_std3_ascii_rules,
        _ => true,
    }) {
        return false;
    }

    // V7 (CheckJoiners / ContextJ rules) is not implemented: doing so needs the
    // Unicode Joining_Type property, which this crate's embedded table does not
    // carry. See DESIGN.md.

    true
}

fn is_bidi_domain(s: &str) -> bool {
    s.chars()
        .any(|c| matches!(bidi_class(c), BidiClass::R | BidiClass::AL | BidiClass::AN))
}

/// <http://www.unicode.org/reports/tr46/#Processing>
fn processing(domain: &str, config: Config, errors: &mut Vec<Error>) -> String {
    if domain.is_empty() {
        errors.push(Error::EmptyString);
        return String::new();
    }

    let mut mapped = String::with_capacity(domain.len());
    for c in domain.chars() {
        map_char(c, config, &mut mapped, errors)
    }

    let mut normalized = String::with_capacity(mapped.len());
    normalized.extend(mapped.nfc());

    let labels: Vec<&str> = normalized.split('.').collect();
    if labels.len() > MAX_LABELS {
        errors.push(Error::TooManyLabels);
        return normalized;
    }

    let mut validated = String::new();
    let (mut valid, mut has_bidi_labels) = (true, false);
    for (i, label) in labels.iter().enumerate() {
        if i != 0 {
            validated.push('.');
        }
        if let Some(rest) = label.strip_prefix(PUNYCODE_PREFIX) {
            match punycode::decode_to_string(rest) {
                Some(decoded_label) => {
                    has_bidi_labels |= is_bidi_domain(&decoded_label);
                    let decoded_config = config.transitional_processing(false);
                    if decoded_label.nfc().ne(decoded_label.chars())
                        || !is_valid(&decoded_label, decoded_config)
                    {
                        valid = false;
                    }
                    validated.push_str(&decoded_label)
                }
                None => {
                    has_bidi_labels = true;
                    errors.push(Error::PunycodeError);
                }
            }
        } else {
            has_bidi_labels |= is_bidi_domain(label);
            valid &= is_valid(label, config);
            validated.push_str(label)
        }
    }

    if config.check_bidi {
        for label in validated.split('.') {
            if !passes_bidi(label, has_bidi_labels) {
                valid = false;
                break;
            }
        }
    }

    if !valid {
        errors.push(Error::ValidityCriteria);
    }

    validated
}

fn verify_dns_length(domain: &str, errors: &mut Vec<Error>) {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    if domain.is_empty() || domain.split('.').any(|label| label.is_empty()) {
        errors.push(Error::InvalidLength);
        return;
    }
    if domain.len() > 253 || domain.split('.').any(|label| label.chars().count() > 63) {
        errors.push(Error::InvalidLength);
    }
}

/// Configuration for [`Config::to_ascii`] / [`Config::to_unicode`], matching
/// spec.md §4.5's fixed-flag `ToASCII` profile. `UseSTD3ASCIIRules` and
/// `CheckHyphens` default to `false`, with a [`Config::strict`] shorthand
/// that turns both (plus `VerifyDnsLength`) on at once, per spec.md's
/// "`UseSTD3ASCIIRules = false` by default but set for strict mode".
#[derive(Clone, Copy, Debug)]
pub struct Config {
    use_std3_ascii_rules: bool,
    transitional_processing: bool,
    verify_dns_length: bool,
    check_hyphens: bool,
    check_bidi: bool,
}

/// The defaults match <https://url.spec.whatwg.org/#idna>.
impl Default for Config {
    fn default() -> Self {
        Config {
            use_std3_ascii_rules: false,
            transitional_processing: false,
            check_hyphens: false,
            check_bidi: true,
            verify_dns_length: false,
        }
    }
}

impl Config {
    /// `UseSTD3ASCIIRules = true, CheckHyphens = true, VerifyDnsLength = true`.
    pub fn strict() -> Self {
        Config::default()
            .use_std3_ascii_rules(true)
            .check_hyphens(true)
            .verify_dns_length(true)
    }

    #[inline]
    pub fn use_std3_ascii_rules(mut self, value: bool) -> Self {
        self.use_std3_ascii_rules = value;
        self
    }

    #[inline]
    pub fn transitional_processing(mut self, value: bool) -> Self {
        self.transitional_processing = value;
        self
    }

    #[inline]
    pub fn verify_dns_length(mut self, value: bool) -> Self {
        self.verify_dns_length = value;
        self
    }

    #[inline]
    pub fn check_hyphens(mut self, value: bool) -> Self {
        self.check_hyphens = value;
        self
    }

    #[inline]
    pub fn check_bidi(mut self, value: bool) -> Self {
        self.check_bidi = value;
        self
    }

    /// <http://www.unicode.org/reports/tr46/#ToASCII>
    pub fn to_ascii(self, domain: &str) -> Result<String, Errors> {
        let mut errors = Vec::new();
        let mut result = String::new();
        let processed = processing(domain, self, &mut errors);
        for (i, label) in processed.split('.').enumerate() {
            if i != 0 {
                result.push('.');
            }
            if label.is_ascii() {
                result.push_str(label);
            } else {
                match punycode::encode_str(label) {
                    Some(encoded) => {
                        result.push_str(PUNYCODE_PREFIX);
                        result.push_str(&encoded);
                    }
                    None => errors.push(Error::Overflow),
                }
            }
        }

        if self.verify_dns_length {
            verify_dns_length(&result, &mut errors);
        }

        if errors.is_empty() {
            Ok(result)
        } else {
            Err(Errors(errors))
        }
    }

    /// <http://www.unicode.org/reports/tr46/#ToUnicode>
    ///
    /// Per spec.md §9's Open Questions resolution, this re-runs IDNA mapping
    /// and validation (it is not purely "invert Punycode"); only the
    /// `to_ascii`-only Punycode *encode* step is skipped.
    pub fn to_unicode(self, domain: &str) -> (String, Result<(), Errors>) {
        let mut errors = Vec::new();
        let domain = processing(domain, self, &mut errors);
        let result = if errors.is_empty() {
            Ok(())
        } else {
            Err(Errors(errors))
        };
        (domain, result)
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(crate) enum Error {
    PunycodeError,
    ValidityCriteria,
    DisallowedByStd3AsciiRules,
    DisallowedMappedInStd3,
    DisallowedCodePoint,
    InvalidLength,
    EmptyString,
    TooManyLabels,
    Overflow,
}

impl Error {
    fn as_str(&self) -> &str {
        match self {
            Error::PunycodeError => "bad_input: malformed punycode label",
            Error::ValidityCriteria => "failed UTS #46 validity criteria",
            Error::DisallowedByStd3AsciiRules => "disallowed_code_point: ASCII character forbidden by STD3",
            Error::DisallowedMappedInStd3 => "disallowed_code_point: mapped ASCII character forbidden by STD3",
            Error::DisallowedCodePoint => "disallowed_code_point",
            Error::InvalidLength => "invalid_length",
            Error::EmptyString => "empty_string",
            Error::TooManyLabels => "too_many_labels",
            Error::Overflow => "overflow: punycode encoding overflow",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors recorded during UTS #46 processing; see spec.md §4.5's failure kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Errors(pub(crate) Vec<Error>);

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            err.fmt(f)?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Errors {}

impl Errors {
    /// `true` if the only failure was exceeding the 32-label cap.
    pub fn is_too_many_labels(&self) -> bool {
        matches!(self.0.as_slice(), [Error::TooManyLabels])
    }
}

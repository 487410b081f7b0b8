// Copyright 2013-2014 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[test]
fn ascii_domain_round_trips_unchanged() {
    assert_eq!(idna::domain_to_ascii("example.com").unwrap(), "example.com");
}

#[test]
fn ascii_domain_is_lowercased() {
    assert_eq!(idna::domain_to_ascii("EXAMPLE.COM").unwrap(), "example.com");
}

#[test]
fn unicode_domain_is_punycode_encoded() {
    assert_eq!(
        idna::domain_to_ascii("мойдомен.рф").unwrap(),
        "xn--80ajglfv4b.xn--p1ai"
    );
}

#[test]
fn punycode_label_round_trips_to_unicode() {
    let (domain, result) = idna::domain_to_unicode("xn--mnchen-3ya.de");
    assert!(result.is_ok());
    assert_eq!(domain, "münchen.de");
}

#[test]
fn trailing_dot_is_preserved() {
    assert_eq!(idna::domain_to_ascii("example.com.").unwrap(), "example.com.");
}

#[test]
fn empty_domain_is_an_error() {
    assert!(idna::domain_to_ascii("").is_err());
}

#[test]
fn disallowed_code_point_is_rejected() {
    // U+0000..U+002C are disallowed by the embedded mapping table.
    assert!(idna::domain_to_ascii("exa\u{0}mple.com").is_err());
}

#[test]
fn underscore_is_allowed_without_std3_rules() {
    assert!(idna::domain_to_ascii("foo_bar.example").is_ok());
}

#[test]
fn underscore_is_rejected_under_strict_profile() {
    assert!(idna::domain_to_ascii_strict("foo_bar.example").is_err());
}

#[test]
fn leading_hyphen_is_rejected_under_strict_profile() {
    assert!(idna::domain_to_ascii_strict("-foo.example").is_err());
}

#[test]
fn leading_hyphen_is_allowed_by_default() {
    assert!(idna::domain_to_ascii("-foo.example").is_ok());
}

#[test]
fn malformed_punycode_label_is_an_error() {
    assert!(idna::domain_to_ascii("xn--\u{1}.example").is_err());
}

#[test]
fn too_many_labels_is_rejected() {
    let many = "a.".repeat(40) + "com";
    let err = idna::domain_to_ascii(&many).unwrap_err();
    assert!(err.is_too_many_labels());
}

#[test]
fn strict_profile_enforces_dns_length_limit() {
    let long_label = "a".repeat(64);
    assert!(idna::domain_to_ascii_strict(&format!("{long_label}.com")).is_err());
}

// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A small, inline stand-in for the WHATWG `urltestdata.json` corpus
//! (spec.md §8's testable properties), driven the same way the full corpus
//! would be: deserialize a list of cases, parse each, compare against the
//! expected serialization.

use serde::Deserialize;
use url::Url;

#[derive(Deserialize)]
struct Case {
    input: &'static str,
    base: Option<&'static str>,
    expected: Option<&'static str>,
}

const CASES_JSON: &str = r#"
[
  {"input": "http://example.com/a/b?q=1#frag", "base": null, "expected": "http://example.com/a/b?q=1#frag"},
  {"input": "http://EXAMPLE.com/", "base": null, "expected": "http://example.com/"},
  {"input": "http://example.com:80/", "base": null, "expected": "http://example.com/"},
  {"input": "http://example.com:8080/", "base": null, "expected": "http://example.com:8080/"},
  {"input": "file:///etc/hosts", "base": null, "expected": "file:///etc/hosts"},
  {"input": "file:///C:/a/b", "base": null, "expected": "file:///C:/a/b"},
  {"input": "mailto:user@example.com", "base": null, "expected": "mailto:user@example.com"},
  {"input": "../c", "base": "http://example.com/a/b", "expected": "http://example.com/c"},
  {"input": "/c", "base": "http://example.com/a/b", "expected": "http://example.com/c"},
  {"input": "?q=2", "base": "http://example.com/a/b", "expected": "http://example.com/a/b?q=2"},
  {"input": "#frag2", "base": "http://example.com/a/b", "expected": "http://example.com/a/b#frag2"},
  {"input": "http://[::1]:8080/", "base": null, "expected": "http://[::1]:8080/"},
  {"input": "http://0x7f.1/", "base": null, "expected": "http://127.0.0.1/"},
  {"input": "https://xn--80ajglfv4b.xn--p1ai/", "base": null, "expected": "https://xn--80ajglfv4b.xn--p1ai/"},
  {"input": "http://example.com/a/../b", "base": null, "expected": "http://example.com/b"},
  {"input": "http://example.com/a/./b", "base": null, "expected": "http://example.com/a/b"}
]
"#;

#[test]
fn whatwg_style_corpus() {
    let cases: Vec<Case> = serde_json::from_str(CASES_JSON).unwrap();
    for case in cases {
        let base = case.base.map(|b| Url::parse(b).unwrap());
        let result = match &base {
            Some(base) => Url::join(base, case.input),
            None => Url::parse(case.input),
        };
        match case.expected {
            Some(expected) => {
                let url = result.unwrap_or_else(|e| {
                    panic!("expected {:?} to parse to {expected:?}, got error {e}", case.input)
                });
                assert_eq!(
                    url.as_str(),
                    expected,
                    "parsing {:?} against base {:?}",
                    case.input,
                    case.base
                );
            }
            None => {
                assert!(
                    result.is_err(),
                    "expected {:?} to fail to parse, got {:?}",
                    case.input,
                    result.unwrap().as_str()
                );
            }
        }
    }
}

#[test]
fn failure_cases_are_rejected() {
    assert!(Url::parse("not a url").is_err());
    assert!(Url::parse("http://").is_err());
    assert!(Url::parse("http://[::%zz]/").is_err());
}

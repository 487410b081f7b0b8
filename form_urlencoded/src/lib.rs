// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parser and serializer for the [`application/x-www-form-urlencoded`](
//! https://url.spec.whatwg.org/#application-x-www-form-urlencoded) syntax,
//! used by HTML forms and by the `query`/`search` component of `Url`.

#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::{borrow::Cow, string::String, vec::Vec};
use core::str;
use percent_encoding::{percent_decode, percent_encode_byte, AsciiSet};

/// The [form-urlencoded byte serialize](https://url.spec.whatwg.org/#concept-urlencoded-byte-serializer)
/// set: every byte except ASCII alphanumerics and `*`, `-`, `.`, `_` is escaped, and
/// U+0020 SPACE is rewritten to `+` rather than `%20`.
const FORM_URLENCODED: &AsciiSet = &percent_encoding::CONTROLS
    .add(b' ')
    .add(b'!')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}')
    .add(b'~');

/// Convert a byte string in the `application/x-www-form-urlencoded` syntax
/// into a iterator of (name, value) pairs.
///
/// Use [`Parse::into_owned`] to obtain `(String, String)` pairs rather than
/// pairs of `Cow<str>`.
///
/// ```
/// let pairs = form_urlencoded::parse(b"foo=1&bar=2").collect::<Vec<_>>();
/// assert_eq!(pairs, vec![
///     (std::borrow::Cow::Borrowed("foo"), std::borrow::Cow::Borrowed("1")),
///     (std::borrow::Cow::Borrowed("bar"), std::borrow::Cow::Borrowed("2")),
/// ]);
/// ```
#[cfg(feature = "alloc")]
pub fn parse(input: &[u8]) -> Parse<'_> {
    Parse { input }
}

/// The return type of [`parse`].
#[cfg(feature = "alloc")]
#[derive(Copy, Clone)]
pub struct Parse<'a> {
    input: &'a [u8],
}

#[cfg(feature = "alloc")]
impl<'a> Iterator for Parse<'a> {
    type Item = (Cow<'a, str>, Cow<'a, str>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.input.is_empty() {
                return None;
            }
            let next_amp = self.input.iter().position(|&b| b == b'&');
            let (sequence, remainder) = match next_amp {
                Some(index) => (&self.input[..index], &self.input[index + 1..]),
                None => (self.input, &[][..]),
            };
            self.input = remainder;
            if sequence.is_empty() {
                continue;
            }
            // Split on the first `=` only; a value may itself contain `=`.
            let (name, value) = match sequence.iter().position(|&b| b == b'=') {
                Some(at) => (&sequence[..at], &sequence[at + 1..]),
                None => (sequence, &[][..]),
            };
            return Some((decode(name), decode(value)));
        }
    }
}

#[cfg(feature = "alloc")]
impl<'a> Parse<'a> {
    /// Return a new iterator that copies the input pairs rather than borrowing from it.
    pub fn into_owned(self) -> ParseIntoOwned<'a> {
        ParseIntoOwned { inner: self }
    }
}

/// Like [`Parse`], but yields owned `(String, String)` pairs.
#[cfg(feature = "alloc")]
pub struct ParseIntoOwned<'a> {
    inner: Parse<'a>,
}

#[cfg(feature = "alloc")]
impl<'a> Iterator for ParseIntoOwned<'a> {
    type Item = (String, String);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
    }
}

#[cfg(feature = "alloc")]
fn decode(input: &[u8]) -> Cow<'_, str> {
    let replaced = replace_plus(input);
    let decoded = percent_decode(&replaced).collect_to_vec();
    Cow::Owned(String::from_utf8_lossy(&decoded).into_owned())
}

#[cfg(feature = "alloc")]
fn replace_plus(input: &[u8]) -> Cow<'_, [u8]> {
    if input.contains(&b'+') {
        Cow::Owned(
            input
                .iter()
                .map(|&b| if b == b'+' { b' ' } else { b })
                .collect(),
        )
    } else {
        Cow::Borrowed(input)
    }
}

/// The [form-urlencoded byte serializer](https://url.spec.whatwg.org/#concept-urlencoded-byte-serializer),
/// as a lazy iterator of `&str` chunks.
pub fn byte_serialize(input: &[u8]) -> ByteSerialize<'_> {
    ByteSerialize { bytes: input }
}

/// The return type of [`byte_serialize`].
#[derive(Clone)]
pub struct ByteSerialize<'a> {
    bytes: &'a [u8],
}

impl<'a> Iterator for ByteSerialize<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let (&first, remaining) = self.bytes.split_first()?;
        if first == b' ' {
            self.bytes = remaining;
            return Some("+");
        }
        if !FORM_URLENCODED.contains_for_serialize(first) {
            let mut i = 1;
            while let Some(&byte) = remaining.get(i - 1) {
                if byte == b' ' || FORM_URLENCODED.contains_for_serialize(byte) {
                    break;
                }
                i += 1;
            }
            let (unescaped, rest) = self.bytes.split_at(i);
            self.bytes = rest;
            return Some(unsafe { str::from_utf8_unchecked(unescaped) });
        }
        self.bytes = remaining;
        Some(percent_encode_byte(first, FORM_URLENCODED).as_str())
    }
}

#[cfg(feature = "alloc")]
impl<'a> core::fmt::Display for ByteSerialize<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for chunk in self.clone() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

/// A write-through target for [`Serializer`]: either a plain `String`, or
/// (from the `url` crate) the owning `Url`'s query component.
///
/// This is the seam spec.md §4.12 calls the search-parameters view's
/// "back-reference to its owning URL": `Serializer` holds a `Target`,
/// `url::UrlQuery` is a `Target` impl that writes into `Url`'s internal
/// string buffer instead of a free-standing `String`.
pub trait Target {
    #[doc(hidden)]
    fn as_mut_string(&mut self) -> &mut String;
    #[doc(hidden)]
    fn finish(self) -> Self::Finished
    where
        Self: Sized,
    {
        self.as_mut_string();
        unreachable!("overridden by implementors that need a different `Finished` type")
    }
    #[doc(hidden)]
    type Finished;
}

#[cfg(feature = "alloc")]
impl Target for String {
    fn as_mut_string(&mut self) -> &mut String {
        self
    }
    fn finish(self) -> Self {
        self
    }
    type Finished = Self;
}

#[cfg(feature = "alloc")]
impl<'a> Target for &'a mut String {
    fn as_mut_string(&mut self) -> &mut String {
        &mut **self
    }
    fn finish(self) -> Self {
        self
    }
    type Finished = Self;
}

/// Build an `application/x-www-form-urlencoded` string one pair at a time.
///
/// ```
/// let encoded = form_urlencoded::Serializer::new(String::new())
///     .append_pair("foo", "bar & baz")
///     .append_pair("saison", "Été+hiver")
///     .finish();
/// assert_eq!(encoded, "foo=bar+%26+baz&saison=%C3%89t%C3%A9%2Bhiver");
/// ```
#[cfg(feature = "alloc")]
pub struct Serializer<T: Target> {
    target: Option<T>,
    start_position: usize,
}

#[cfg(feature = "alloc")]
impl<T: Target> Serializer<T> {
    /// Create a new `Serializer` that appends to `target`, which is typically
    /// an empty `String` but can already contain data (e.g. a previously
    /// serialized query string being extended).
    pub fn new(target: T) -> Self {
        let mut target = target;
        let start_position = target.as_mut_string().len();
        Serializer {
            target: Some(target),
            start_position,
        }
    }

    /// Create a new `Serializer` that treats everything in `target` at or
    /// after `start_position` as its own content, rather than (as [`new`]
    /// does) everything already in `target` at construction time.
    ///
    /// Used when `target`'s string *is* the editable area itself (e.g.
    /// `url::UrlQuery`, whose `as_mut_string` returns the URL's query
    /// component on its own): there, `start_position` is `0`, so `clear()`
    /// empties the whole query and the first `append_pair` never needs a
    /// leading `&`, regardless of what the query already contained.
    ///
    /// [`new`]: Serializer::new
    pub fn for_suffix(target: T, start_position: usize) -> Self {
        let mut target = target;
        debug_assert!(target.as_mut_string().len() >= start_position);
        Serializer {
            target: Some(target),
            start_position,
        }
    }

    /// Remove any existing name/value pairs.
    pub fn clear(&mut self) -> &mut Self {
        self.string().truncate(self.start_position);
        self
    }

    /// Remove every pair whose name is `name`.
    pub fn remove(&mut self, name: &str) -> &mut Self {
        let remaining: Vec<(String, String)> = self
            .existing_pairs()
            .into_iter()
            .filter(|(k, _)| k != name)
            .collect();
        self.rewrite_pairs(remaining)
    }

    /// Set the first pair named `name` to `value`, removing any other pairs
    /// with that name; appends a new pair if none existed.
    pub fn set(&mut self, name: &str, value: &str) -> &mut Self {
        let mut replaced = false;
        let mut pairs: Vec<(String, String)> = self
            .existing_pairs()
            .into_iter()
            .filter_map(|(k, v)| {
                if k != name {
                    return Some((k, v));
                }
                if replaced {
                    return None;
                }
                replaced = true;
                Some((k, String::from(value)))
            })
            .collect();
        if !replaced {
            pairs.push((String::from(name), String::from(value)));
        }
        self.rewrite_pairs(pairs)
    }

    /// Sort pairs by name, stably (pairs with equal names keep their
    /// relative order).
    pub fn sort(&mut self) -> &mut Self {
        let mut pairs = self.existing_pairs();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        self.rewrite_pairs(pairs)
    }

    fn existing_pairs(&mut self) -> Vec<(String, String)> {
        let start_position = self.start_position;
        let tail = self.string()[start_position..].to_owned();
        parse(tail.as_bytes()).into_owned().collect()
    }

    fn rewrite_pairs(&mut self, pairs: Vec<(String, String)>) -> &mut Self {
        self.clear();
        for (name, value) in &pairs {
            self.append_pair(name, value);
        }
        self
    }

    /// Serialize and append a name/value pair.
    pub fn append_pair(&mut self, name: &str, value: &str) -> &mut Self {
        self.start_pair();
        append_pair(
            self.target.as_mut().unwrap().as_mut_string(),
            name,
            value,
        );
        self
    }

    /// Serialize and append a name/value pair, where the value is empty.
    pub fn append_key_only(&mut self, name: &str) -> &mut Self {
        self.start_pair();
        append_pair(self.target.as_mut().unwrap().as_mut_string(), name, "");
        self
    }

    /// Serialize and append a number of name/value pairs.
    pub fn extend_pairs<I, K, V>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: core::borrow::Borrow<(K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for pair in iter {
            let &(ref k, ref v) = pair.borrow();
            self.start_pair();
            append_pair(
                self.target.as_mut().unwrap().as_mut_string(),
                k.as_ref(),
                v.as_ref(),
            );
        }
        self
    }

    fn start_pair(&mut self) {
        let string = self.string();
        if string.len() > self.start_position {
            string.push('&');
        }
    }

    fn string(&mut self) -> &mut String {
        self.target.as_mut().unwrap().as_mut_string()
    }

    /// Consume this `Serializer` and return the underlying `Target`.
    pub fn finish(&mut self) -> T::Finished {
        self.target.take().unwrap().finish()
    }
}

#[cfg(feature = "alloc")]
fn append_pair(string: &mut String, name: &str, value: &str) {
    string.extend(byte_serialize(name.as_bytes()));
    string.push('=');
    string.extend(byte_serialize(value.as_bytes()));
}

trait AsciiSetExt {
    fn contains_for_serialize(&self, byte: u8) -> bool;
}

impl AsciiSetExt for AsciiSet {
    fn contains_for_serialize(&self, byte: u8) -> bool {
        !(byte.is_ascii_alphanumeric() || matches!(byte, b'*' | b'-' | b'.' | b'_'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn parses_plus_as_space() {
        let pairs: Vec<_> = parse(b"a+b=c+d").map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        assert_eq!(pairs, vec![("a b".to_string(), "c d".to_string())]);
    }

    #[test]
    fn parses_value_less_pairs() {
        let pairs: Vec<_> = parse(b"a&b=1").into_owned().collect();
        assert_eq!(pairs, vec![("a".to_string(), "".to_string()), ("b".to_string(), "1".to_string())]);
    }

    #[test]
    fn serializer_round_trips_through_parse() {
        let encoded = Serializer::new(String::new())
            .append_pair("q", "hello world")
            .append_pair("key", "e1f7bc78")
            .finish();
        let decoded: Vec<_> = parse(encoded.as_bytes()).into_owned().collect();
        assert_eq!(
            decoded,
            vec![
                ("q".to_string(), "hello world".to_string()),
                ("key".to_string(), "e1f7bc78".to_string()),
            ]
        );
    }

    #[test]
    fn byte_serialize_uses_plus_for_space() {
        assert_eq!(byte_serialize(b"a b").to_string(), "a+b");
    }

    #[test]
    fn remove_drops_every_pair_with_that_name() {
        let encoded = Serializer::new(String::new())
            .append_pair("a", "1")
            .append_pair("b", "2")
            .append_pair("a", "3")
            .remove("a")
            .finish();
        assert_eq!(encoded, "b=2");
    }

    #[test]
    fn set_replaces_the_first_match_and_drops_the_rest() {
        let encoded = Serializer::new(String::new())
            .append_pair("a", "1")
            .append_pair("b", "2")
            .append_pair("a", "3")
            .set("a", "new")
            .finish();
        assert_eq!(encoded, "a=new&b=2");
    }

    #[test]
    fn set_appends_when_the_name_is_not_already_present() {
        let encoded = Serializer::new(String::new()).append_pair("a", "1").set("b", "2").finish();
        assert_eq!(encoded, "a=1&b=2");
    }

    #[test]
    fn sort_orders_pairs_by_name_stably() {
        let encoded = Serializer::new(String::new())
            .append_pair("b", "1")
            .append_pair("a", "1")
            .append_pair("a", "2")
            .sort()
            .finish();
        assert_eq!(encoded, "a=1&a=2&b=1");
    }

    #[test]
    fn for_suffix_treats_everything_before_start_position_as_fixed() {
        let mut target = "prefix".to_string();
        target.push_str("a=1");
        let mut serializer = Serializer::for_suffix(target, "prefix".len());
        serializer.append_pair("b", "2");
        assert_eq!(serializer.finish(), "prefixa=1&b=2");
    }
}

// Copyright 2013-2014 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The UTS #46 IDNA mapping table, as a sorted array of ranges searched by
//! binary search (spec.md §4.3). In upstream `idna`, this file is emitted by
//! `build.rs` from Unicode's `IdnaMappingTable.txt`; here it is hand-embedded
//! as a representative subset covering ASCII, Latin-1, and the common script
//! blocks, with every unassigned gap collapsed into a single `Valid` or
//! `Disallowed` bucket so the table stays total over all of `char` (see
//! DESIGN.md for the coverage tradeoff).

use crate::uts46::Mapping;
use core::cmp::Ordering;

/// A contiguous range of code points sharing one mapping rule.
pub(crate) struct Range {
    pub(crate) from: char,
    pub(crate) to: char,
    pub(crate) mapping: RangeMapping,
}

/// Either every code point in the range maps the same way, or each maps
/// independently (e.g. `A`..`Z`, each to its own lowercase letter).
pub(crate) enum RangeMapping {
    Single(Mapping),
    PerCodepoint(&'static [Mapping]),
}

macro_rules! single {
    ($from:expr, $to:expr, $mapping:expr) => {
        Range {
            from: $from,
            to: $to,
            mapping: RangeMapping::Single($mapping),
        }
    };
}

/// `A`..`Z` -> `a`..`z`, one distinct mapping per code point.
static ASCII_UPPER_MAPPED: [Mapping; 26] = [
    Mapping::Mapped("a"),
    Mapping::Mapped("b"),
    Mapping::Mapped("c"),
    Mapping::Mapped("d"),
    Mapping::Mapped("e"),
    Mapping::Mapped("f"),
    Mapping::Mapped("g"),
    Mapping::Mapped("h"),
    Mapping::Mapped("i"),
    Mapping::Mapped("j"),
    Mapping::Mapped("k"),
    Mapping::Mapped("l"),
    Mapping::Mapped("m"),
    Mapping::Mapped("n"),
    Mapping::Mapped("o"),
    Mapping::Mapped("p"),
    Mapping::Mapped("q"),
    Mapping::Mapped("r"),
    Mapping::Mapped("s"),
    Mapping::Mapped("t"),
    Mapping::Mapped("u"),
    Mapping::Mapped("v"),
    Mapping::Mapped("w"),
    Mapping::Mapped("x"),
    Mapping::Mapped("y"),
    Mapping::Mapped("z"),
];

/// `À`..`Ö` (U+00C0..U+00D6) -> their lowercase forms.
static LATIN1_UPPER_MAPPED_1: [Mapping; 23] = [
    Mapping::Mapped("\u{00e0}"),
    Mapping::Mapped("\u{00e1}"),
    Mapping::Mapped("\u{00e2}"),
    Mapping::Mapped("\u{00e3}"),
    Mapping::Mapped("\u{00e4}"),
    Mapping::Mapped("\u{00e5}"),
    Mapping::Mapped("\u{00e6}"),
    Mapping::Mapped("\u{00e7}"),
    Mapping::Mapped("\u{00e8}"),
    Mapping::Mapped("\u{00e9}"),
    Mapping::Mapped("\u{00ea}"),
    Mapping::Mapped("\u{00eb}"),
    Mapping::Mapped("\u{00ec}"),
    Mapping::Mapped("\u{00ed}"),
    Mapping::Mapped("\u{00ee}"),
    Mapping::Mapped("\u{00ef}"),
    Mapping::Mapped("\u{00f0}"),
    Mapping::Mapped("\u{00f1}"),
    Mapping::Mapped("\u{00f2}"),
    Mapping::Mapped("\u{00f3}"),
    Mapping::Mapped("\u{00f4}"),
    Mapping::Mapped("\u{00f5}"),
    Mapping::Mapped("\u{00f6}"),
];

/// `Ø`..`Þ` (U+00D8..U+00DE) -> their lowercase forms.
static LATIN1_UPPER_MAPPED_2: [Mapping; 7] = [
    Mapping::Mapped("\u{00f8}"),
    Mapping::Mapped("\u{00f9}"),
    Mapping::Mapped("\u{00fa}"),
    Mapping::Mapped("\u{00fb}"),
    Mapping::Mapped("\u{00fc}"),
    Mapping::Mapped("\u{00fd}"),
    Mapping::Mapped("\u{00fe}"),
];

/// Sorted, non-overlapping, and exhaustive over every valid `char` (the
/// natural gap at the surrogate range U+D800..=U+DFFF needs no entry, since
/// no `char` value can ever fall inside it).
pub(crate) static TABLE: &[Range] = &[
    single!('\u{0000}', '\u{002c}', Mapping::Disallowed), // C0 controls, !"#$%&'()*+
    single!('\u{002d}', '\u{002d}', Mapping::Valid),      // '-'
    single!('\u{002e}', '\u{002e}', Mapping::Valid),      // '.' (label separator)
    single!('\u{002f}', '\u{002f}', Mapping::Disallowed), // '/'
    single!('\u{0030}', '\u{0039}', Mapping::Valid),      // '0'..'9'
    single!('\u{003a}', '\u{0040}', Mapping::Disallowed), // ':;<=>?@'
    Range {
        from: '\u{0041}',
        to: '\u{005a}',
        mapping: RangeMapping::PerCodepoint(&ASCII_UPPER_MAPPED),
    }, // 'A'..'Z'
    single!('\u{005b}', '\u{005e}', Mapping::Disallowed), // '[\]^'
    single!('\u{005f}', '\u{005f}', Mapping::DisallowedStd3Valid), // '_'
    single!('\u{0060}', '\u{0060}', Mapping::Disallowed), // '`'
    single!('\u{0061}', '\u{007a}', Mapping::Valid),      // 'a'..'z'
    single!('\u{007b}', '\u{007f}', Mapping::Disallowed), // '{|}~' DEL
    single!('\u{0080}', '\u{00bf}', Mapping::Disallowed), // C1 controls, Latin-1 symbols
    Range {
        from: '\u{00c0}',
        to: '\u{00d6}',
        mapping: RangeMapping::PerCodepoint(&LATIN1_UPPER_MAPPED_1),
    }, // À..Ö
    single!('\u{00d7}', '\u{00d7}', Mapping::Disallowed), // × (multiplication sign)
    Range {
        from: '\u{00d8}',
        to: '\u{00de}',
        mapping: RangeMapping::PerCodepoint(&LATIN1_UPPER_MAPPED_2),
    }, // Ø..Þ
    single!('\u{00df}', '\u{00f6}', Mapping::Valid), // ß, à..ö
    single!('\u{00f7}', '\u{00f7}', Mapping::Disallowed), // ÷ (division sign)
    single!('\u{00f8}', '\u{036f}', Mapping::Valid), // ø..ÿ, Latin Extended, combining marks
    single!('\u{0370}', '\u{1fff}', Mapping::Valid), // Greek, Cyrillic, Hebrew, Arabic, ...
    single!('\u{2000}', '\u{200b}', Mapping::Disallowed), // general punctuation (spaces, dashes, quotes)
    single!('\u{200c}', '\u{200d}', Mapping::Deviation("")), // ZWNJ, ZWJ: dropped under transitional processing
    single!('\u{200e}', '\u{206f}', Mapping::Disallowed), // bidi marks, remaining punctuation
    single!('\u{2070}', '\u{d7ff}', Mapping::Valid),      // symbols, CJK, Hangul, ...
    single!('\u{e000}', '\u{f8ff}', Mapping::Disallowed), // private use area
    single!('\u{f900}', '\u{fdcf}', Mapping::Valid),      // CJK compatibility ideographs, ...
    single!('\u{fdd0}', '\u{fdef}', Mapping::Disallowed), // noncharacters
    single!('\u{fdf0}', '\u{fffd}', Mapping::Valid),      // remaining BMP, excluding the two trailing noncharacters
    single!('\u{fffe}', '\u{ffff}', Mapping::Disallowed), // noncharacters
    single!('\u{10000}', '\u{10ffff}', Mapping::Valid),   // supplementary planes
];

pub(crate) fn find_char(codepoint: char) -> &'static Mapping {
    let index = TABLE
        .binary_search_by(|range| {
            if codepoint > range.to {
                Ordering::Less
            } else if codepoint < range.from {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
        .expect("tables.rs::TABLE must be exhaustive over every `char`");
    let range = &TABLE[index];
    match &range.mapping {
        RangeMapping::Single(mapping) => mapping,
        RangeMapping::PerCodepoint(mappings) => {
            &mappings[(codepoint as u32 - range.from as u32) as usize]
        }
    }
}

//! Canonicalization of Norwegian text mangled by encoding round trips
//!
//! Rows from the reporting API and older imports sometimes carry UTF-8 that
//! was decoded as Windows-1252 ("Ã¸" for "ø") or HTML entities. One table
//! covers both; every replacement is a literal pair.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

pub const REPLACEMENTS: &[(&str, &str)] = &[
    ("Ã¸", "ø"),
    ("Ã˜", "Ø"),
    ("Ã¥", "å"),
    ("Ã…", "Å"),
    ("Ã¦", "æ"),
    ("Ã†", "Æ"),
    ("Ã©", "é"),
    ("Ã¶", "ö"),
    ("Ã–", "Ö"),
    ("Ã¤", "ä"),
    ("Ã„", "Ä"),
    ("Ã¼", "ü"),
    ("&oslash;", "ø"),
    ("&Oslash;", "Ø"),
    ("&aring;", "å"),
    ("&Aring;", "Å"),
    ("&aelig;", "æ"),
    ("&AElig;", "Æ"),
    ("&eacute;", "é"),
    ("&amp;", "&"),
];

lazy_static! {
    static ref LOOKUP: HashMap<&'static str, &'static str> = REPLACEMENTS.iter().copied().collect();
    static ref PATTERN: Regex = {
        let mut keys: Vec<&str> = REPLACEMENTS.iter().map(|(k, _)| *k).collect();
        keys.sort_by_key(|k| std::cmp::Reverse(k.len()));
        let alternation = keys.iter().map(|k| regex::escape(k)).collect::<Vec<_>>().join("|");
        Regex::new(&alternation).unwrap()
    };
}

/// Replace every known mojibake sequence with the intended character
pub fn normalize_text(input: &str) -> String {
    if !input.contains('Ã') && !input.contains('&') {
        return input.to_string();
    }
    PATTERN
        .replace_all(input, |caps: &regex::Captures| {
            LOOKUP.get(&caps[0]).copied().unwrap_or_default().to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pairs() {
        for (broken, fixed) in REPLACEMENTS {
            assert_eq!(normalize_text(broken), *fixed, "pair {}", broken);
        }
    }

    #[test]
    fn test_words() {
        assert_eq!(normalize_text("BjÃ¸rn Ã…sheim"), "Bjørn Åsheim");
        assert_eq!(normalize_text("TrÃ¦lasthandel"), "Trælasthandel");
        assert_eq!(normalize_text("Bl&aring;b&aelig;r &amp; S&oslash;nn"), "Blåbær & Sønn");
        assert_eq!(normalize_text("BÃ…RD SKJÃ˜LBERG"), "BÅRD SKJØLBERG");
    }

    #[test]
    fn test_clean_text_is_untouched() {
        assert_eq!(normalize_text("Ærlige Øyvind på Å"), "Ærlige Øyvind på Å");
        assert_eq!(normalize_text("A & B"), "A & B");
        assert_eq!(normalize_text(""), "");
    }
}

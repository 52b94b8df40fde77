//! Rule-based Indonesian stemmer.
//!
//! Affixes are stripped in the classic confix order: particle, possessive
//! pronoun, first-order prefix, derivational suffix, second-order prefix. Every
//! removal requires the word to carry more than two vowels, which keeps short
//! roots such as `makan` or `lucu` intact. The word is looked up in the root
//! table before the first step and after every step; a hit stops stripping.

use std::collections::HashSet;
use std::sync::OnceLock;

use super::roots::INDONESIAN_ROOT_WORDS;

const PARTICLES: &[&str] = &["kah", "lah", "pun"];
const POSSESSIVES: &[&str] = &["nya", "ku", "mu"];
const MIN_MEASURE: usize = 2;

static ROOTS: OnceLock<HashSet<&'static str>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrefixKind {
    None,
    /// `di-`, `me-` family, `ter-`.
    Verbal,
    /// `ke-`, `pe-` nasal family.
    Nominal,
    /// `ber-`, `be-`, `bel-`.
    Ber,
    /// `per-`, `pe-`, `pel-`.
    Per,
}

/// True when `word` is a known root and must not lose any affix.
pub fn is_root(word: &str) -> bool {
    ROOTS
        .get_or_init(|| INDONESIAN_ROOT_WORDS.iter().copied().collect())
        .contains(word)
}

/// Stems a single lowercase token.
pub fn stem_word(word: &str) -> String {
    let mut stem = word.to_string();
    if is_root(&stem) || measure(&stem) <= MIN_MEASURE {
        return stem;
    }

    strip_any_suffix(&mut stem, PARTICLES);
    if is_root(&stem) {
        return stem;
    }
    if measure(&stem) > MIN_MEASURE {
        strip_any_suffix(&mut stem, POSSESSIVES);
    }
    if is_root(&stem) || measure(&stem) <= MIN_MEASURE {
        return stem;
    }

    let mut unsuffixed = stem.clone();
    if remove_suffix(&mut unsuffixed, PrefixKind::None) && is_root(&unsuffixed) {
        return unsuffixed;
    }

    match remove_first_order_prefix(&mut stem) {
        PrefixKind::None => {
            let kind = remove_second_order_prefix(&mut stem);
            if !is_root(&stem) && measure(&stem) > MIN_MEASURE {
                remove_suffix(&mut stem, kind);
            }
        }
        kind => {
            if !is_root(&stem)
                && measure(&stem) > MIN_MEASURE
                && remove_suffix(&mut stem, kind)
                && !is_root(&stem)
                && measure(&stem) > MIN_MEASURE
            {
                remove_second_order_prefix(&mut stem);
            }
        }
    }
    stem
}

fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn measure(word: &str) -> usize {
    word.chars().filter(|ch| is_vowel(*ch)).count()
}

fn starts_with_vowel(word: &str) -> bool {
    word.chars().next().is_some_and(is_vowel)
}

fn strip_any_suffix(word: &mut String, suffixes: &[&str]) -> bool {
    for suffix in suffixes {
        if word.len() > suffix.len() && word.ends_with(suffix) {
            word.truncate(word.len() - suffix.len());
            return true;
        }
    }
    false
}

fn is_root_after_suffix(word: &str) -> bool {
    let mut stem = word.to_string();
    remove_suffix(&mut stem, PrefixKind::None) && is_root(&stem)
}

fn replace_prefix(word: &mut String, prefix_len: usize, replacement: &str) {
    let rest = word[prefix_len..].to_string();
    *word = format!("{replacement}{rest}");
}

fn remove_first_order_prefix(word: &mut String) -> PrefixKind {
    // Longest prefixes first so `meng` wins over `me`. Before a vowel a nasal
    // prefix may have swallowed the root's first letter: each recoding is tried
    // against the root table and the first one is the fallback.
    let nasal: [(&str, &[&str], PrefixKind); 8] = [
        ("meng", &["", "k"], PrefixKind::Verbal),
        ("peng", &["", "k"], PrefixKind::Nominal),
        ("meny", &["s", "ny"], PrefixKind::Verbal),
        ("peny", &["s", "ny"], PrefixKind::Nominal),
        ("mem", &["p", "m"], PrefixKind::Verbal),
        ("pem", &["p", "m"], PrefixKind::Nominal),
        ("men", &["t", "n"], PrefixKind::Verbal),
        ("pen", &["t", "n"], PrefixKind::Nominal),
    ];
    for (prefix, recodings, kind) in nasal {
        if word.len() <= prefix.len() || !word.starts_with(prefix) {
            continue;
        }
        let rest = &word[prefix.len()..];
        if !starts_with_vowel(rest) {
            if prefix.ends_with('y') {
                // `meny`/`peny` before a consonant is not a nasal prefix.
                continue;
            }
            replace_prefix(word, prefix.len(), "");
            return kind;
        }
        let fallback = format!("{}{rest}", recodings.first().copied().unwrap_or(""));
        let recoded = recodings
            .iter()
            .map(|head| format!("{head}{rest}"))
            .find(|candidate| is_root(candidate) || is_root_after_suffix(candidate))
            .unwrap_or(fallback);
        *word = recoded;
        return kind;
    }

    let plain = [
        ("ter", PrefixKind::Verbal),
        ("me", PrefixKind::Verbal),
        ("di", PrefixKind::Verbal),
        ("ke", PrefixKind::Nominal),
    ];
    for (prefix, kind) in plain {
        if word.len() > prefix.len() && word.starts_with(prefix) {
            replace_prefix(word, prefix.len(), "");
            return kind;
        }
    }
    PrefixKind::None
}

fn remove_second_order_prefix(word: &mut String) -> PrefixKind {
    if word.starts_with("belajar") {
        replace_prefix(word, 3, "");
        return PrefixKind::Ber;
    }
    if word.starts_with("pelajar") {
        replace_prefix(word, 3, "");
        return PrefixKind::Per;
    }
    let rules = [
        ("ber", PrefixKind::Ber),
        ("per", PrefixKind::Per),
        ("be", PrefixKind::Ber),
        ("pe", PrefixKind::Per),
    ];
    for (prefix, kind) in rules {
        if word.len() > prefix.len() + 1 && word.starts_with(prefix) {
            let rest = &word[prefix.len()..];
            // `be-` only attaches to roots whose first syllable is `-er`, e.g. `bekerja`.
            if prefix == "be" && !rest.get(1..3).is_some_and(|s| s == "er") {
                continue;
            }
            replace_prefix(word, prefix.len(), "");
            return kind;
        }
    }
    PrefixKind::None
}

fn remove_suffix(word: &mut String, prefix: PrefixKind) -> bool {
    if word.ends_with("kan") && word.len() > 3 {
        if prefix == PrefixKind::Nominal {
            return false;
        }
        word.truncate(word.len() - 3);
        return true;
    }
    if word.ends_with("an") && word.len() > 2 {
        if prefix == PrefixKind::Verbal {
            return false;
        }
        word.truncate(word.len() - 2);
        return true;
    }
    if word.ends_with('i') && word.len() > 1 {
        if matches!(prefix, PrefixKind::Ber | PrefixKind::Nominal) {
            return false;
        }
        let before = &word[..word.len() - 1];
        if before.ends_with('s') {
            return false;
        }
        word.truncate(word.len() - 1);
        return true;
    }
    false
}

//! Plural/singular variant detection for substituted tokens.
//!
//! Suffix heuristics (`dogs`/`dog`, `boxes`/`box`) are always available.
//! Irregular forms (`children`/`child`) go through the [`LemmaLookup`]
//! capability; when no lookup is injected the predicate degrades to the
//! suffix checks rather than failing.

use std::collections::HashMap;

/// Pluggable singular-form lookup for irregular plurals.
///
/// Implementations return the singular form for a plural input and
/// `None` for anything else. Inputs arrive lowercased.
pub trait LemmaLookup: Send + Sync {
    fn singular_of(&self, word: &str) -> Option<String>;
}

/// Built-in table of common English irregular plurals.
pub struct IrregularPlurals {
    map: HashMap<&'static str, &'static str>,
}

impl IrregularPlurals {
    pub fn new() -> Self {
        let map = HashMap::from([
            ("children", "child"),
            ("people", "person"),
            ("men", "man"),
            ("women", "woman"),
            ("feet", "foot"),
            ("teeth", "tooth"),
            ("geese", "goose"),
            ("mice", "mouse"),
            ("lice", "louse"),
            ("oxen", "ox"),
            ("dice", "die"),
            ("criteria", "criterion"),
            ("phenomena", "phenomenon"),
            ("data", "datum"),
            ("wives", "wife"),
            ("knives", "knife"),
            ("lives", "life"),
            ("leaves", "leaf"),
            ("halves", "half"),
            ("selves", "self"),
        ]);
        Self { map }
    }
}

impl Default for IrregularPlurals {
    fn default() -> Self {
        Self::new()
    }
}

impl LemmaLookup for IrregularPlurals {
    fn singular_of(&self, word: &str) -> Option<String> {
        self.map.get(word).map(|s| (*s).to_owned())
    }
}

/// True when `a`/`b` look like plural and singular forms of the same
/// word, case-insensitively.
///
/// Identical or empty inputs are never a mismatch. Checks trailing-`s`
/// and trailing-`es` stripping in both directions, then consults the
/// lookup (if any) for irregular forms.
pub fn is_plural_singular_mismatch(a: &str, b: &str, lookup: Option<&dyn LemmaLookup>) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return false;
    }
    if a.strip_suffix('s') == Some(b.as_str()) || b.strip_suffix('s') == Some(a.as_str()) {
        return true;
    }
    if a.strip_suffix("es") == Some(b.as_str()) || b.strip_suffix("es") == Some(a.as_str()) {
        return true;
    }
    if let Some(lookup) = lookup {
        if lookup.singular_of(&a).as_deref() == Some(b.as_str())
            || lookup.singular_of(&b).as_deref() == Some(a.as_str())
        {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::{IrregularPlurals, is_plural_singular_mismatch};

    fn check(a: &str, b: &str) -> bool {
        let table = IrregularPlurals::new();
        is_plural_singular_mismatch(a, b, Some(&table))
    }

    #[test]
    fn trailing_s() {
        assert!(check("cats", "cat"));
        assert!(check("cat", "cats"));
    }

    #[test]
    fn trailing_es() {
        assert!(check("boxes", "box"));
        assert!(check("box", "boxes"));
    }

    #[test]
    fn unrelated_words() {
        assert!(!check("cat", "dog"));
    }

    #[test]
    fn identical_is_not_a_mismatch() {
        assert!(!check("cat", "cat"));
        assert!(!check("Cat", "cat"));
    }

    #[test]
    fn empty_inputs() {
        assert!(!check("", "cat"));
        assert!(!check("cat", ""));
        assert!(!check("", ""));
    }

    #[test]
    fn irregular_via_lookup() {
        assert!(check("children", "child"));
        assert!(check("child", "children"));
        assert!(check("Mice", "mouse"));
    }

    #[test]
    fn degrades_without_lookup() {
        assert!(!is_plural_singular_mismatch("children", "child", None));
        // suffix checks still work
        assert!(is_plural_singular_mismatch("dogs", "dog", None));
    }
}

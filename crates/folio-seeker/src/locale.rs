//! Locales and locale-aware string collation.
//!
//! [`Collator`] orders strings the way readers expect rather than by code
//! point: base letters first (`"é"` sorts with `"e"`), then accents, then case
//! with lowercase first. Base letters come from `deunicode` transliteration,
//! which gives a root ordering shared by all Latin-script locales.
//!
//! Some languages treat accented letters as letters of their own. The
//! collator tailors the root ordering for those: Spanish sorts `ñ` after
//! `n`, Swedish and Finnish put `å ä ö` after `z`, Danish and Norwegian put
//! `æ ø å` after `z`, and Polish and Czech sort their accented letters after
//! the base letter.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use deunicode::deunicode_char;
use serde::{Deserialize, Serialize};

/// A BCP 47 style language tag such as `en`, `es-ES` or `pt-BR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale {
    tag: String,
}

impl Locale {
    /// Creates a locale, normalizing `_` separators to `-`.
    pub fn new(tag: impl AsRef<str>) -> Self {
        let tag = tag.as_ref().trim().replace('_', "-");
        if tag.is_empty() {
            return Locale::default();
        }
        Locale { tag }
    }

    /// The full tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The language subtag, lowercased.
    pub fn language(&self) -> String {
        self.tag
            .split('-')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale {
            tag: "en".to_string(),
        }
    }
}

impl FromStr for Locale {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Locale::new(s))
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Locale::new(tag)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

/// How many collation levels take part in a comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strength {
    /// Base letters only: `"a" == "á" == "A"`.
    Primary,
    /// Base letters and accents: `"a" == "A"`, `"a" < "á"`.
    Secondary,
    /// Base letters, accents and case.
    #[default]
    Tertiary,
}

/// A letter sorted as its own base letter: `(letter, anchor, rank)` places
/// `letter` after every other letter equal to `anchor`, ordered by `rank`.
type Tailoring = &'static [(char, char, u8)];

const SPANISH: Tailoring = &[('ñ', 'n', 1)];

const SWEDISH: Tailoring = &[
    ('å', 'z', 1),
    ('ä', 'z', 2),
    ('æ', 'z', 2),
    ('ö', 'z', 3),
    ('ø', 'z', 3),
];

const DANISH_NORWEGIAN: Tailoring = &[
    ('æ', 'z', 1),
    ('ä', 'z', 1),
    ('ø', 'z', 2),
    ('ö', 'z', 2),
    ('å', 'z', 3),
];

const POLISH: Tailoring = &[
    ('ą', 'a', 1),
    ('ć', 'c', 1),
    ('ę', 'e', 1),
    ('ł', 'l', 1),
    ('ń', 'n', 1),
    ('ó', 'o', 1),
    ('ś', 's', 1),
    ('ź', 'z', 1),
    ('ż', 'z', 2),
];

const CZECH: Tailoring = &[('č', 'c', 1), ('ř', 'r', 1), ('š', 's', 1), ('ž', 'z', 1)];

fn tailoring_for(locale: &Locale) -> Tailoring {
    match locale.language().as_str() {
        "es" | "gl" => SPANISH,
        "sv" | "fi" => SWEDISH,
        "da" | "nb" | "nn" | "no" => DANISH_NORWEGIAN,
        "pl" => POLISH,
        "cs" => CZECH,
        _ => &[],
    }
}

/// Locale-aware string comparator.
///
/// ```
/// use std::cmp::Ordering;
/// use folio_seeker::{Collator, Locale};
///
/// let collator = Collator::new(&Locale::new("es"));
/// assert_eq!(collator.compare("éclair", "eclipse"), Ordering::Less);
/// assert_eq!(collator.compare("apple", "Banana"), Ordering::Less);
/// assert_eq!(collator.compare("ñu", "nz"), Ordering::Greater);
/// ```
#[derive(Debug, Clone)]
pub struct Collator {
    locale: Locale,
    strength: Strength,
    tailoring: Tailoring,
}

impl Collator {
    /// Creates a tertiary-strength collator for `locale`.
    pub fn new(locale: &Locale) -> Self {
        Collator {
            locale: locale.clone(),
            strength: Strength::default(),
            tailoring: tailoring_for(locale),
        }
    }

    /// Returns a copy using the given strength.
    pub fn with_strength(mut self, strength: Strength) -> Self {
        self.strength = strength;
        self
    }

    /// The locale this collator was built for.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Compares two strings.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let primary = self.primary_key(a).cmp(&self.primary_key(b));
        if primary != Ordering::Equal || self.strength == Strength::Primary {
            return primary;
        }

        let secondary = a.to_lowercase().cmp(&b.to_lowercase());
        if secondary != Ordering::Equal || self.strength == Strength::Secondary {
            return secondary;
        }

        // Lowercase sorts before uppercase at the same position
        a.chars()
            .map(char::is_uppercase)
            .cmp(b.chars().map(char::is_uppercase))
            .then_with(|| a.cmp(b))
    }

    /// Base letters of `s`, each with its tailoring rank (0 for root letters).
    fn primary_key(&self, s: &str) -> Vec<(char, u8)> {
        let mut key = Vec::with_capacity(s.len());
        for c in s.chars().flat_map(char::to_lowercase) {
            if let Some(&(_, anchor, rank)) = self.tailoring.iter().find(|(l, ..)| *l == c) {
                key.push((anchor, rank));
                continue;
            }
            match deunicode_char(c) {
                Some(base) => {
                    key.extend(base.chars().flat_map(char::to_lowercase).map(|b| (b, 0)))
                }
                None => key.push((c, 0)),
            }
        }
        key
    }
}

use std::ops::RangeInclusive;

/// Palette de départ : les dix chiffres.
pub const CHARSET_DIGITS: &str = "0123456789";

/// Printable ASCII, space through tilde.
pub const PRINTABLE_ASCII: RangeInclusive<char> = ' '..='~';

/// A set of characters named by a shell-style token.
///
/// # Example
/// ```
/// use ink_core::charset::CharSelection;
/// let sel = CharSelection::parse("a-c").unwrap();
/// assert_eq!(sel.chars(), vec!['a', 'b', 'c']);
/// assert!(CharSelection::parse("pm").is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CharSelection {
    /// Every printable ASCII character.
    All,
    /// A single character.
    Single(char),
    /// Inclusive range, stored low→high.
    Range(char, char),
}

impl CharSelection {
    /// Parse a selection token.
    ///
    /// Accepted forms: `all`, `space`, a single character, or `x-y` where the
    /// bounds may come in either order.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "all" => return Some(Self::All),
            "space" => return Some(Self::Single(' ')),
            _ => {}
        }

        let chars: Vec<char> = token.chars().collect();
        match chars.as_slice() {
            [c] => Some(Self::Single(*c)),
            [a, '-', b] => Some(Self::Range(*a.min(b), *a.max(b))),
            _ => None,
        }
    }

    /// Expand into the concrete characters, ascending.
    #[must_use]
    pub fn chars(&self) -> Vec<char> {
        match *self {
            Self::All => PRINTABLE_ASCII.collect(),
            Self::Single(c) => vec![c],
            Self::Range(lo, hi) => (lo..=hi).collect(),
        }
    }
}

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, Mutex};

use ink_core::error::CoreError;
use ink_core::traits::GlyphScorer;

/// Palette partagée entre threads : un verrou unique par instance.
pub type SharedPalette<S> = Arc<Mutex<CharPalette<S>>>;

/// Score normalisé dans [0, 1], ordonné par `f64::total_cmp`.
#[derive(Clone, Copy, Debug)]
struct NormScore(f64);

impl PartialEq for NormScore {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NormScore {}

impl PartialOrd for NormScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NormScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// `(score - min) / (max - min)`, or 0 when the range is degenerate.
#[inline]
fn normalize(score: u32, (min, max): (u32, u32)) -> f64 {
    if max == min {
        0.0
    } else {
        f64::from(score - min) / f64::from(max - min)
    }
}

/// Exact decomposition `x = m / 2^k` of an `f64` in [0, 1].
fn dyadic(x: f64) -> (u64, u32) {
    let bits = x.to_bits();
    let exp = ((bits >> 52) & 0x7ff) as u32;
    let frac = bits & ((1 << 52) - 1);
    if exp == 0 {
        (frac, 1074)
    } else {
        (frac | (1 << 52), 1075 - exp)
    }
}

/// Whether `target` (in [0, 1]) is at least as close to `lo / span` as to
/// `hi / span`, where `lo < hi` are offsets from the minimum score.
///
/// Evaluated in integers: `target · span <= (lo + hi) / 2`.
fn prefers_lower(target: f64, lo: u32, hi: u32, span: u32) -> bool {
    let (m, k) = dyadic(target);
    let lhs = 2 * u128::from(m) * u128::from(span);
    let sum = u128::from(lo) + u128::from(hi);
    if sum == 0 {
        return lhs == 0;
    }
    // lhs < 2^86 <= sum · 2^k
    if k >= 86 {
        return true;
    }
    lhs <= sum << k
}

/// Editable character palette with nearest-brightness lookup.
///
/// Each member is scored once by the [`GlyphScorer`]. Scores are rescaled
/// into [0, 1] against the current min/max; the normalized index is rebuilt
/// only when an edit moves one of those extremes.
///
/// # Example
/// ```
/// use ink_ascii::palette::CharPalette;
/// use ink_core::traits::GlyphScorer;
///
/// struct Digits;
/// impl GlyphScorer for Digits {
///     fn score(&self, c: char) -> u32 { c.to_digit(10).unwrap_or(0) }
/// }
///
/// let mut palette = CharPalette::new(Digits, "0123456789".chars());
/// assert_eq!(palette.best_match(0.0).unwrap(), '0');
/// assert_eq!(palette.best_match(1.0).unwrap(), '9');
/// palette.remove('9');
/// assert_eq!(palette.best_match(1.0).unwrap(), '8');
/// ```
pub struct CharPalette<S> {
    scorer: S,
    /// Membres → score brut.
    members: BTreeMap<char, u32>,
    /// Score brut → membres. Premier/dernier = min/max.
    by_score: BTreeMap<u32, BTreeSet<char>>,
    /// Score normalisé → (score brut, membres).
    index: BTreeMap<NormScore, (u32, BTreeSet<char>)>,
    /// Plage (min, max) utilisée par `index`. `None` si vide.
    range: Option<(u32, u32)>,
}

impl<S: GlyphScorer> CharPalette<S> {
    /// Build a palette from an initial set of characters. Duplicates are ignored.
    pub fn new(scorer: S, chars: impl IntoIterator<Item = char>) -> Self {
        let mut palette = Self::empty(scorer);
        for c in chars {
            if !palette.members.contains_key(&c) {
                let score = palette.scorer.score(c);
                palette.insert_raw(c, score);
            }
        }
        palette.range = palette.true_range();
        palette.rebuild_index();
        palette
    }

    /// A palette with no characters. Queries fail until something is added.
    pub fn empty(scorer: S) -> Self {
        Self {
            scorer,
            members: BTreeMap::new(),
            by_score: BTreeMap::new(),
            index: BTreeMap::new(),
            range: None,
        }
    }

    /// Add `c`. Returns `false` (and changes nothing) if it was already present.
    pub fn add(&mut self, c: char) -> bool {
        if self.members.contains_key(&c) {
            return false;
        }
        let score = self.scorer.score(c);
        self.insert_raw(c, score);

        match self.range {
            Some(range) if (range.0..=range.1).contains(&score) => {
                self.index
                    .entry(NormScore(normalize(score, range)))
                    .or_insert_with(|| (score, BTreeSet::new()))
                    .1
                    .insert(c);
            }
            _ => {
                self.range = self.true_range();
                self.rebuild_index();
            }
        }
        true
    }

    /// Remove `c`. Returns `false` (and changes nothing) if it was absent.
    pub fn remove(&mut self, c: char) -> bool {
        let Some(score) = self.members.remove(&c) else {
            return false;
        };
        if let Some(chars) = self.by_score.get_mut(&score) {
            chars.remove(&c);
            if chars.is_empty() {
                self.by_score.remove(&score);
            }
        }

        let new_range = self.true_range();
        match (self.range, new_range) {
            (_, None) => {
                self.index.clear();
                self.range = None;
            }
            (Some(old), Some(new)) if old == new => {
                let key = NormScore(normalize(score, old));
                if let Some((_, chars)) = self.index.get_mut(&key) {
                    chars.remove(&c);
                    if chars.is_empty() {
                        self.index.remove(&key);
                    }
                }
            }
            (_, Some(_)) => {
                self.range = new_range;
                self.rebuild_index();
            }
        }
        true
    }

    /// Add every character of `chars`.
    pub fn add_all(&mut self, chars: impl IntoIterator<Item = char>) {
        for c in chars {
            self.add(c);
        }
    }

    /// Remove every character of `chars`.
    pub fn remove_all(&mut self, chars: impl IntoIterator<Item = char>) {
        for c in chars {
            self.remove(c);
        }
    }

    /// Character whose normalized score is closest to `brightness`.
    ///
    /// `brightness` is clamped into [0, 1] (NaN is treated as 0). On equal
    /// distance the smaller score wins; among characters sharing a score,
    /// the smallest character code wins. O(log n).
    ///
    /// The index only locates the two neighbours; the final comparison uses
    /// raw scores so that exact midpoints always go to the smaller one.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyPalette`] if the palette is empty.
    pub fn best_match(&self, brightness: f64) -> Result<char, CoreError> {
        let target = if brightness.is_nan() {
            0.0
        } else {
            brightness.clamp(0.0, 1.0)
        };
        let key = NormScore(target);

        let above = self.index.range(key..).next();
        let below = self.index.range(..key).next_back();

        let chars = match (below, above) {
            (Some((_, (lo, lo_chars))), Some((_, (hi, hi_chars)))) => {
                let (min, max) = self.range.ok_or(CoreError::EmptyPalette)?;
                if prefers_lower(target, lo - min, hi - min, max - min) {
                    lo_chars
                } else {
                    hi_chars
                }
            }
            (Some((_, (_, chars))), None) | (None, Some((_, (_, chars)))) => chars,
            (None, None) => return Err(CoreError::EmptyPalette),
        };

        chars.first().copied().ok_or(CoreError::EmptyPalette)
    }
}

impl<S> CharPalette<S> {
    /// Members in ascending character-code order.
    #[must_use]
    pub fn characters(&self) -> Vec<char> {
        self.members.keys().copied().collect()
    }

    /// Number of characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the palette has no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Raw glyph score of a member.
    #[must_use]
    pub fn score_of(&self, c: char) -> Option<u32> {
        self.members.get(&c).copied()
    }

    /// Current (min, max) raw score, `None` when empty.
    #[must_use]
    pub fn score_range(&self) -> Option<(u32, u32)> {
        self.range
    }

    /// Normalized position of a member, as stored in the index.
    #[must_use]
    pub fn normalized(&self, c: char) -> Option<f64> {
        self.index
            .iter()
            .find(|(_, (_, chars))| chars.contains(&c))
            .map(|(key, _)| key.0)
    }

    /// The scorer used for new members.
    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    fn insert_raw(&mut self, c: char, score: u32) {
        self.members.insert(c, score);
        self.by_score.entry(score).or_default().insert(c);
    }

    fn true_range(&self) -> Option<(u32, u32)> {
        let (&min, _) = self.by_score.first_key_value()?;
        let (&max, _) = self.by_score.last_key_value()?;
        Some((min, max))
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        let Some(range) = self.range else {
            return;
        };
        for (&score, chars) in &self.by_score {
            self.index.insert(
                NormScore(normalize(score, range)),
                (score, chars.clone()),
            );
        }
        log::debug!(
            "Réindexation complète : {} caractères, plage {}..={}",
            self.members.len(),
            range.0,
            range.1
        );
    }
}

impl<S> fmt::Debug for CharPalette<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharPalette")
            .field("members", &self.members)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Digits score 10 × value; anything else scores its code point.
    struct TableScorer;

    impl GlyphScorer for TableScorer {
        fn score(&self, c: char) -> u32 {
            c.to_digit(10).map_or(c as u32, |d| d * 10)
        }
    }

    fn digits() -> CharPalette<TableScorer> {
        CharPalette::new(TableScorer, "0123456789".chars())
    }

    /// Rebuild the index from scratch and compare with the maintained one.
    fn assert_consistent<S: GlyphScorer>(palette: &CharPalette<S>) {
        let expected_range = palette
            .members
            .values()
            .min()
            .copied()
            .zip(palette.members.values().max().copied());
        assert_eq!(palette.range, expected_range);

        let mut expected: BTreeMap<NormScore, (u32, BTreeSet<char>)> = BTreeMap::new();
        if let Some(range) = expected_range {
            for (&c, &score) in &palette.members {
                expected
                    .entry(NormScore(normalize(score, range)))
                    .or_insert_with(|| (score, BTreeSet::new()))
                    .1
                    .insert(c);
            }
        }
        assert_eq!(palette.index, expected);
    }

    /// Linear-scan reference for `best_match`, exact in integers.
    ///
    /// With `b = m / 2^k`, the distance to a member at offset `a` from the
    /// minimum, scaled by `2^k · span`, is `|m · span - a · 2^k|`.
    fn brute_force<S: GlyphScorer>(palette: &CharPalette<S>, b: f64) -> Option<char> {
        let (min, max) = palette.range?;
        let span = i128::from(max - min);
        let (m, k) = dyadic(b.clamp(0.0, 1.0));
        let distance = |score: u32| -> i128 {
            let offset = i128::from(score - min);
            if m == 0 {
                return offset;
            }
            assert!(k < 90, "query {b} too fine for the reference");
            (i128::from(m) * span - (offset << k)).abs()
        };
        palette
            .members
            .iter()
            .min_by_key(|&(&c, &score)| (distance(score), score, c))
            .map(|(&c, _)| c)
    }

    /// Exact midpoints between every pair of neighbouring scores.
    fn midpoints<S>(palette: &CharPalette<S>) -> Vec<f64> {
        let Some((min, max)) = palette.range else {
            return Vec::new();
        };
        if min == max {
            return Vec::new();
        }
        let scores: Vec<u32> = palette.by_score.keys().copied().collect();
        scores
            .windows(2)
            .map(|w| f64::from(w[0] + w[1] - 2 * min) / f64::from(2 * (max - min)))
            .collect()
    }

    #[test]
    fn digits_extremes() {
        let palette = digits();
        assert_eq!(palette.best_match(0.0), Ok('0'));
        assert_eq!(palette.best_match(1.0), Ok('9'));
        assert_eq!(palette.score_range(), Some((0, 90)));
    }

    #[test]
    fn removing_interior_digit_falls_back_to_neighbour() {
        let mut palette = digits();
        assert_eq!(palette.best_match(0.45), Ok('4'));
        assert!(palette.remove('4'));
        assert_eq!(palette.best_match(0.45), Ok('5'));
        assert_eq!(palette.best_match(0.43), Ok('3'));
        assert_consistent(&palette);
    }

    #[test]
    fn empty_palette_rejects_queries() {
        let palette = CharPalette::empty(TableScorer);
        assert_eq!(palette.best_match(0.5), Err(CoreError::EmptyPalette));
        assert!(palette.is_empty());
        assert_eq!(palette.score_range(), None);
    }

    #[test]
    fn removing_last_character_empties_palette() {
        let mut palette = CharPalette::new(TableScorer, ['7']);
        assert!(palette.remove('7'));
        assert_eq!(palette.best_match(0.0), Err(CoreError::EmptyPalette));
        assert_consistent(&palette);
        assert!(palette.add('2'));
        assert_eq!(palette.best_match(0.9), Ok('2'));
    }

    #[test]
    fn singleton_normalizes_to_zero() {
        let palette = CharPalette::new(TableScorer, ['5']);
        assert_eq!(palette.normalized('5'), Some(0.0));
        assert_eq!(palette.best_match(1.0), Ok('5'));
    }

    #[test]
    fn equidistant_candidates_prefer_smaller_score() {
        let palette = CharPalette::new(TableScorer, ['0', '2', '4']);
        // Normalized 0.0, 0.5, 1.0: 0.25 is halfway between '0' and '2'.
        assert_eq!(palette.best_match(0.25), Ok('0'));
        assert_eq!(palette.best_match(0.75), Ok('2'));
    }

    #[test]
    fn thirds_midpoint_prefers_smaller_score() {
        // Scores 0, 10, 20, 30 normalize to 0, 1/3, 2/3, 1. In floats
        // 0.5 - 1/3 > 2/3 - 0.5, yet 0.5 is exactly halfway.
        let palette = CharPalette::new(TableScorer, "0123".chars());
        assert_eq!(palette.best_match(0.5), Ok('1'));
        assert_eq!(brute_force(&palette, 0.5), Some('1'));

        // Sixths: 0.25 sits between 1/6 and 2/6, 0.75 between 4/6 and 5/6.
        let palette = CharPalette::new(TableScorer, "0123456".chars());
        assert_eq!(palette.best_match(0.25), Ok('1'));
        assert_eq!(palette.best_match(0.75), Ok('4'));
    }

    #[test]
    fn prefers_lower_is_exact() {
        assert!(prefers_lower(0.5, 1, 2, 3));
        assert!(!prefers_lower(0.500_000_000_000_001, 1, 2, 3));
        assert!(prefers_lower(0.0, 0, 1, 1));
        assert!(!prefers_lower(1.0, 0, 1, 1));
        assert!(prefers_lower(f64::MIN_POSITIVE, 0, 1, 1));
    }

    #[test]
    fn shared_score_prefers_smallest_char() {
        struct Flat;
        impl GlyphScorer for Flat {
            fn score(&self, c: char) -> u32 {
                if c == '.' { 1 } else { 9 }
            }
        }
        let palette = CharPalette::new(Flat, ['z', 'b', 'm', '.']);
        assert_eq!(palette.best_match(1.0), Ok('b'));
        assert_eq!(palette.best_match(0.0), Ok('.'));
    }

    #[test]
    fn add_is_idempotent() {
        let mut palette = digits();
        assert!(palette.add('A'));
        let range = palette.score_range();
        let chars = palette.characters();
        let positions: Vec<_> = chars.iter().map(|&c| palette.normalized(c)).collect();

        assert!(!palette.add('A'));
        assert_eq!(palette.score_range(), range);
        assert_eq!(palette.characters(), chars);
        let again: Vec<_> = chars.iter().map(|&c| palette.normalized(c)).collect();
        assert_eq!(again, positions);
        assert_consistent(&palette);
    }

    #[test]
    fn add_then_remove_restores_state() {
        // 'A' (65) lands inside 10..=90, '~' (126) extends it upward, '0' downward.
        for extra in ['A', '~', '0'] {
            let mut palette = CharPalette::new(TableScorer, "13579".chars());
            let range = palette.score_range();
            let before: Vec<_> = palette
                .characters()
                .into_iter()
                .map(|c| (c, palette.normalized(c)))
                .collect();

            assert!(palette.add(extra));
            assert_consistent(&palette);
            assert!(palette.remove(extra));
            assert_consistent(&palette);

            let after: Vec<_> = palette
                .characters()
                .into_iter()
                .map(|c| (c, palette.normalized(c)))
                .collect();
            assert_eq!(palette.score_range(), range);
            assert_eq!(after, before, "extra = {extra:?}");
        }
    }

    #[test]
    fn add_inside_range_keeps_other_positions() {
        let mut palette = CharPalette::new(TableScorer, ['0', '8']);
        let zero = palette.normalized('0');
        assert!(palette.add('4'));
        assert_eq!(palette.normalized('0'), zero);
        assert_eq!(palette.normalized('4'), Some(0.5));
        assert_consistent(&palette);
    }

    #[test]
    fn removing_extreme_recomputes_range() {
        let mut palette = digits();
        palette.remove('9');
        assert_eq!(palette.score_range(), Some((0, 80)));
        assert_eq!(palette.normalized('8'), Some(1.0));
        palette.remove('0');
        assert_eq!(palette.score_range(), Some((10, 80)));
        assert_eq!(palette.normalized('1'), Some(0.0));
        assert_consistent(&palette);
    }

    #[test]
    fn removing_one_of_two_extremes_keeps_range() {
        struct Pairs;
        impl GlyphScorer for Pairs {
            fn score(&self, c: char) -> u32 {
                match c {
                    'a' | 'b' => 0,
                    'y' | 'z' => 100,
                    _ => 50,
                }
            }
        }
        let mut palette = CharPalette::new(Pairs, ['a', 'b', 'm', 'y', 'z']);
        palette.remove('z');
        assert_eq!(palette.score_range(), Some((0, 100)));
        assert_eq!(palette.best_match(1.0), Ok('y'));
        palette.remove('a');
        assert_eq!(palette.best_match(0.0), Ok('b'));
        assert_consistent(&palette);
    }

    #[test]
    fn absent_removal_is_noop() {
        let mut palette = digits();
        assert!(!palette.remove('x'));
        assert_eq!(palette.len(), 10);
        assert_consistent(&palette);
    }

    #[test]
    fn characters_are_sorted_by_code() {
        let palette = CharPalette::new(TableScorer, "9a0 Z".chars());
        assert_eq!(palette.characters(), vec![' ', '0', '9', 'Z', 'a']);
    }

    #[test]
    fn out_of_range_brightness_is_clamped() {
        let palette = digits();
        assert_eq!(palette.best_match(-3.0), Ok('0'));
        assert_eq!(palette.best_match(7.5), Ok('9'));
        assert_eq!(palette.best_match(f64::NAN), Ok('0'));
    }

    #[test]
    fn random_edits_match_linear_scan() {
        let pool: Vec<char> = (' '..='~').collect();
        let mut palette = CharPalette::new(TableScorer, "0123456789".chars());

        // Deterministic LCG.
        let mut seed = 0x1234_5678_u32;
        let mut rand = || {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            seed >> 8
        };

        for step in 0..2_000 {
            let c = pool[rand() as usize % pool.len()];
            if rand() % 3 == 0 {
                palette.remove(c);
            } else {
                palette.add(c);
            }
            assert_consistent(&palette);

            let grid = (0..=20).map(|i| f64::from(i) / 20.0);
            for b in grid.chain(midpoints(&palette)) {
                assert_eq!(
                    palette.best_match(b).ok(),
                    brute_force(&palette, b),
                    "step {step}, b = {b}"
                );
            }
        }
    }

    #[test]
    fn shared_palette_serializes_edits() {
        let shared: SharedPalette<TableScorer> = Arc::new(Mutex::new(digits()));
        let handles: Vec<_> = ['A', 'B', 'C']
            .into_iter()
            .map(|c| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    shared.lock().unwrap().add(c);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let palette = shared.lock().unwrap();
        assert_eq!(palette.len(), 13);
        assert_consistent(&palette);
    }
}

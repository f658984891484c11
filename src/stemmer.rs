//! Porter suffix-stripping stemmer.
//!
//! Deterministic five-step reduction of an English word to its stem.
//! Defined only over lowercase ASCII alphabetic input; anything else should
//! be filtered out before stemming. Words of length 1 or 2 are returned
//! unchanged. Stemming never increases word length.

/// Suffix-stripping stemmer with a reusable internal buffer.
///
/// The buffer is re-seeded on every [`stem`](PorterStemmer::stem) call, so a
/// single instance can be used across a whole corpus scan.
#[derive(Debug, Default)]
pub struct PorterStemmer {
    /// Word being stemmed, lowercase ASCII bytes.
    b: Vec<u8>,
    /// Index of the last live byte of the stem.
    k: isize,
    /// Boundary left behind by the most recent suffix match.
    j: isize,
}

impl PorterStemmer {
    pub fn new() -> Self {
        Self {
            b: Vec::new(),
            k: 0,
            j: 0,
        }
    }

    /// Stem a single lowercase token.
    pub fn stem(&mut self, word: &str) -> String {
        if word.len() <= 2 {
            return word.to_string();
        }
        self.b.clear();
        self.b.extend_from_slice(word.as_bytes());
        self.k = self.b.len() as isize - 1;
        self.j = 0;

        self.step1ab();
        self.step1c();
        self.step2();
        self.step3();
        self.step4();
        self.step5();

        String::from_utf8_lossy(&self.b[..=self.k as usize]).into_owned()
    }

    #[inline]
    fn at(&self, i: isize) -> u8 {
        self.b[i as usize]
    }

    /// True when `b[i]` acts as a consonant. `y` flips on the preceding
    /// character, resolved by walking left through any run of `y`s so the
    /// check stays iterative whatever the input looks like.
    fn cons(&self, i: isize) -> bool {
        let mut i = i;
        let mut parity = true;
        loop {
            match self.at(i) {
                b'a' | b'e' | b'i' | b'o' | b'u' => return !parity,
                b'y' => {
                    if i == 0 {
                        return parity;
                    }
                    parity = !parity;
                    i -= 1;
                }
                _ => return parity,
            }
        }
    }

    /// Number of consonant sequences between the start of the word and `j`.
    ///
    ///    <c><v>       gives 0
    ///    <c>vc<v>     gives 1
    ///    <c>vcvc<v>   gives 2
    ///
    /// Recomputed on every call; the boundary `j` moves as suffixes are
    /// stripped, so a cached value would go stale.
    fn m(&self) -> usize {
        let mut n = 0;
        let mut i = 0;
        loop {
            if i > self.j {
                return n;
            }
            if !self.cons(i) {
                break;
            }
            i += 1;
        }
        i += 1;
        loop {
            loop {
                if i > self.j {
                    return n;
                }
                if self.cons(i) {
                    break;
                }
                i += 1;
            }
            i += 1;
            n += 1;
            loop {
                if i > self.j {
                    return n;
                }
                if !self.cons(i) {
                    break;
                }
                i += 1;
            }
            i += 1;
        }
    }

    /// True when the region up to `j` contains a vowel.
    fn vowel_in_stem(&self) -> bool {
        let mut i = 0;
        while i <= self.j {
            if !self.cons(i) {
                return true;
            }
            i += 1;
        }
        false
    }

    /// True when `b[i-1..=i]` is a doubled consonant.
    fn doublec(&self, i: isize) -> bool {
        if i < 1 {
            return false;
        }
        self.at(i) == self.at(i - 1) && self.cons(i)
    }

    /// True when `b[i-2..=i]` has the shape consonant-vowel-consonant and the
    /// final consonant is not `w`, `x` or `y`. Used to restore a trailing `e`
    /// on short stems: cav(e), lov(e), hop(e) but not snow, box, tray.
    fn cvc(&self, i: isize) -> bool {
        if i < 2 || !self.cons(i) || self.cons(i - 1) || !self.cons(i - 2) {
            return false;
        }
        !matches!(self.at(i), b'w' | b'x' | b'y')
    }

    /// True when the live region ends with `s`; on success `j` is left at the
    /// character just before the suffix.
    fn ends(&mut self, s: &[u8]) -> bool {
        let len = s.len() as isize;
        if s[s.len() - 1] != self.at(self.k) {
            return false;
        }
        if len > self.k + 1 {
            return false;
        }
        let start = (self.k - len + 1) as usize;
        if &self.b[start..=self.k as usize] != s {
            return false;
        }
        self.j = self.k - len;
        true
    }

    /// Replace everything after `j` with `s`, readjusting `k`.
    fn set_to(&mut self, s: &[u8]) {
        self.b.truncate((self.j + 1) as usize);
        self.b.extend_from_slice(s);
        self.k = self.j + s.len() as isize;
    }

    /// `set_to`, gated on at least one consonant sequence before the suffix.
    fn r(&mut self, s: &[u8]) {
        if self.m() > 0 {
            self.set_to(s);
        }
    }

    /// Step 1ab: plurals and -ed / -ing.
    ///
    ///    caresses -> caress     agreed  -> agree
    ///    ponies   -> poni       matting -> mat
    ///    cats     -> cat        mating  -> mate
    fn step1ab(&mut self) {
        if self.at(self.k) == b's' {
            if self.ends(b"sses") {
                self.k -= 2;
            } else if self.ends(b"ies") {
                self.set_to(b"i");
            } else if self.at(self.k - 1) != b's' {
                self.k -= 1;
            }
        }
        if self.ends(b"eed") {
            if self.m() > 0 {
                self.k -= 1;
            }
        } else if (self.ends(b"ed") || self.ends(b"ing")) && self.vowel_in_stem() {
            self.k = self.j;
            if self.ends(b"at") {
                self.set_to(b"ate");
            } else if self.ends(b"bl") {
                self.set_to(b"ble");
            } else if self.ends(b"iz") {
                self.set_to(b"ize");
            } else if self.doublec(self.k) {
                self.k -= 1;
                if matches!(self.at(self.k), b'l' | b's' | b'z') {
                    self.k += 1;
                }
            } else if self.m() == 1 && self.cvc(self.k) {
                self.set_to(b"e");
            }
        }
    }

    /// Step 1c: terminal `y` becomes `i` when a vowel precedes it.
    fn step1c(&mut self) {
        if self.ends(b"y") && self.vowel_in_stem() {
            self.b[self.k as usize] = b'i';
        }
    }

    /// Step 2: double suffixes map to single ones, so -ization (-ize plus
    /// -ation) becomes -ize. The string before the suffix must give m() > 0.
    fn step2(&mut self) {
        if self.k < 1 {
            return;
        }
        match self.at(self.k - 1) {
            b'a' => {
                if self.ends(b"ational") {
                    self.r(b"ate");
                } else if self.ends(b"tional") {
                    self.r(b"tion");
                }
            }
            b'c' => {
                if self.ends(b"enci") {
                    self.r(b"ence");
                } else if self.ends(b"anci") {
                    self.r(b"ance");
                }
            }
            b'e' => {
                if self.ends(b"izer") {
                    self.r(b"ize");
                }
            }
            b'l' => {
                if self.ends(b"bli") {
                    self.r(b"ble");
                } else if self.ends(b"alli") {
                    self.r(b"al");
                } else if self.ends(b"entli") {
                    self.r(b"ent");
                } else if self.ends(b"eli") {
                    self.r(b"e");
                } else if self.ends(b"ousli") {
                    self.r(b"ous");
                }
            }
            b'o' => {
                if self.ends(b"ization") {
                    self.r(b"ize");
                } else if self.ends(b"ation") {
                    self.r(b"ate");
                } else if self.ends(b"ator") {
                    self.r(b"ate");
                }
            }
            b's' => {
                if self.ends(b"alism") {
                    self.r(b"al");
                } else if self.ends(b"iveness") {
                    self.r(b"ive");
                } else if self.ends(b"fulness") {
                    self.r(b"ful");
                } else if self.ends(b"ousness") {
                    self.r(b"ous");
                }
            }
            b't' => {
                if self.ends(b"aliti") {
                    self.r(b"al");
                } else if self.ends(b"iviti") {
                    self.r(b"ive");
                } else if self.ends(b"biliti") {
                    self.r(b"ble");
                }
            }
            b'g' => {
                if self.ends(b"logi") {
                    self.r(b"log");
                }
            }
            _ => {}
        }
    }

    /// Step 3: -ic-, -full, -ness and friends.
    fn step3(&mut self) {
        match self.at(self.k) {
            b'e' => {
                if self.ends(b"icate") {
                    self.r(b"ic");
                } else if self.ends(b"ative") {
                    self.r(b"");
                } else if self.ends(b"alize") {
                    self.r(b"al");
                }
            }
            b'i' => {
                if self.ends(b"iciti") {
                    self.r(b"ic");
                }
            }
            b'l' => {
                if self.ends(b"ical") {
                    self.r(b"ic");
                } else if self.ends(b"ful") {
                    self.r(b"");
                }
            }
            b's' => {
                if self.ends(b"ness") {
                    self.r(b"");
                }
            }
            _ => {}
        }
    }

    /// Step 4: -ant, -ence and the rest, in context <c>vcvc<v>.
    fn step4(&mut self) {
        if self.k < 1 {
            return;
        }
        let matched = match self.at(self.k - 1) {
            b'a' => self.ends(b"al"),
            b'c' => self.ends(b"ance") || self.ends(b"ence"),
            b'e' => self.ends(b"er"),
            b'i' => self.ends(b"ic"),
            b'l' => self.ends(b"able") || self.ends(b"ible"),
            b'n' => {
                self.ends(b"ant")
                    || self.ends(b"ement")
                    || self.ends(b"ment")
                    || self.ends(b"ent")
            }
            b'o' => {
                (self.ends(b"ion")
                    && self.j >= 0
                    && matches!(self.at(self.j), b's' | b't'))
                    || self.ends(b"ou")
            }
            b's' => self.ends(b"ism"),
            b't' => self.ends(b"ate") || self.ends(b"iti"),
            b'u' => self.ends(b"ous"),
            b'v' => self.ends(b"ive"),
            b'z' => self.ends(b"ize"),
            _ => false,
        };
        if matched && self.m() > 1 {
            self.k = self.j;
        }
    }

    /// Step 5: drop a final -e when m() > 1 (or m() == 1 without a short CVC
    /// ending), and collapse a trailing -ll when m() > 1.
    fn step5(&mut self) {
        self.j = self.k;
        if self.at(self.k) == b'e' {
            let a = self.m();
            if a > 1 || (a == 1 && !self.cvc(self.k - 1)) {
                self.k -= 1;
            }
        }
        if self.at(self.k) == b'l' && self.doublec(self.k) && self.m() > 1 {
            self.k -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stem(word: &str) -> String {
        PorterStemmer::new().stem(word)
    }

    #[test]
    fn test_plurals_and_participles() {
        assert_eq!(stem("caresses"), "caress");
        assert_eq!(stem("ponies"), "poni");
        assert_eq!(stem("ties"), "ti");
        assert_eq!(stem("caress"), "caress");
        assert_eq!(stem("cats"), "cat");
        assert_eq!(stem("feed"), "feed");
        assert_eq!(stem("agreed"), "agre");
        assert_eq!(stem("matting"), "mat");
        assert_eq!(stem("mating"), "mate");
        assert_eq!(stem("meeting"), "meet");
        assert_eq!(stem("milling"), "mill");
        assert_eq!(stem("messing"), "mess");
        assert_eq!(stem("meetings"), "meet");
    }

    #[test]
    fn test_terminal_y() {
        assert_eq!(stem("happy"), "happi");
        assert_eq!(stem("sky"), "sky");
    }

    #[test]
    fn test_long_suffixes() {
        assert_eq!(stem("relational"), "relat");
        assert_eq!(stem("conditional"), "condit");
        assert_eq!(stem("vietnamization"), "vietnam");
        assert_eq!(stem("hopeful"), "hope");
        assert_eq!(stem("goodness"), "good");
    }

    #[test]
    fn test_short_words_untouched() {
        assert_eq!(stem("a"), "a");
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("by"), "by");
    }

    #[test]
    fn test_never_lengthens() {
        for w in [
            "caresses",
            "ponies",
            "running",
            "singing",
            "controlling",
            "generalization",
            "oscillators",
            "y",
            "yyy",
        ] {
            assert!(stem(w).len() <= w.len(), "stem grew for {w}");
        }
    }

    #[test]
    fn test_idempotent_on_minimal_stems() {
        let mut stemmer = PorterStemmer::new();
        for w in [
            "caresses", "ponies", "meeting", "feed", "relational", "happy", "mating", "cats",
            "milling",
        ] {
            let once = stemmer.stem(w);
            let twice = stemmer.stem(&once);
            assert_eq!(once, twice, "not idempotent for {w}");
        }
    }

    #[test]
    fn test_buffer_reseeded_between_calls() {
        let mut stemmer = PorterStemmer::new();
        let first = stemmer.stem("generalization");
        let _ = stemmer.stem("cats");
        let again = stemmer.stem("generalization");
        assert_eq!(first, again);
    }
}

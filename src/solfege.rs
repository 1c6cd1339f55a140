//! Solfège vocabulary
//!
//! The recognizer grammar is restricted to these syllables. Both the
//! "so"/"sol" and "ti"/"si" spellings are accepted since singers use either.

/// Closed grammar handed to the speech engine
pub const VOCABULARY: [&str; 9] = ["do", "re", "mi", "fa", "so", "sol", "la", "ti", "si"];

/// A solfège syllable of the major scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syllable {
    Do,
    Re,
    Mi,
    Fa,
    Sol,
    La,
    Ti,
}

impl Syllable {
    /// Map a recognized word to a syllable.
    ///
    /// Matching is case-insensitive; if the word does not match as-is,
    /// non-letter characters are stripped and the lookup is retried.
    pub fn from_word(word: &str) -> Option<Self> {
        let lower = word.to_lowercase();
        Self::lookup(&lower).or_else(|| {
            let letters: String = lower.chars().filter(|c| c.is_ascii_lowercase()).collect();
            Self::lookup(&letters)
        })
    }

    fn lookup(word: &str) -> Option<Self> {
        match word {
            "do" => Some(Self::Do),
            "re" => Some(Self::Re),
            "mi" => Some(Self::Mi),
            "fa" => Some(Self::Fa),
            "so" | "sol" => Some(Self::Sol),
            "la" => Some(Self::La),
            "ti" | "si" => Some(Self::Ti),
            _ => None,
        }
    }

    /// Scale degree (1 = tonic, 7 = leading tone)
    pub fn degree(self) -> u8 {
        match self {
            Self::Do => 1,
            Self::Re => 2,
            Self::Mi => 3,
            Self::Fa => 4,
            Self::Sol => 5,
            Self::La => 6,
            Self::Ti => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_vocabulary_word_maps_to_a_syllable() {
        for word in VOCABULARY {
            assert!(Syllable::from_word(word).is_some(), "{word} should map");
        }
    }

    #[test]
    fn test_alternate_spellings_share_a_degree() {
        assert_eq!(Syllable::from_word("so"), Some(Syllable::Sol));
        assert_eq!(Syllable::from_word("sol"), Some(Syllable::Sol));
        assert_eq!(Syllable::from_word("ti"), Some(Syllable::Ti));
        assert_eq!(Syllable::from_word("si"), Some(Syllable::Ti));
        assert_eq!(Syllable::Sol.degree(), 5);
        assert_eq!(Syllable::Ti.degree(), 7);
    }

    #[test]
    fn test_normalization() {
        assert_eq!(Syllable::from_word("MI"), Some(Syllable::Mi));
        assert_eq!(Syllable::from_word("la!"), Some(Syllable::La));
        assert_eq!(Syllable::from_word("[unk]"), None);
        assert_eq!(Syllable::from_word(""), None);
    }

    #[test]
    fn test_degrees_ascend() {
        let scale = ["do", "re", "mi", "fa", "sol", "la", "ti"];
        let degrees: Vec<u8> = scale
            .iter()
            .filter_map(|w| Syllable::from_word(w))
            .map(Syllable::degree)
            .collect();
        assert_eq!(degrees, vec![1, 2, 3, 4, 5, 6, 7]);
    }
}

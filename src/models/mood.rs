use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The genres a user currently wants considered for matching
///
/// An empty mood means "no restriction": every genre counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mood(BTreeSet<String>);

impl Mood {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, genre: &str) -> bool {
        self.0.contains(genre)
    }

    /// Genres present in both moods
    pub fn intersection(&self, other: &Mood) -> Mood {
        Mood(self.0.intersection(&other.0).cloned().collect())
    }

    /// Genres in ascending order
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds the genre if absent, removes it otherwise
    pub fn toggle(&mut self, genre: &str) {
        if !self.0.remove(genre) {
            self.0.insert(genre.to_string());
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Mood {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Mood(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unrestricted() {
        assert!(Mood::new().is_unrestricted());
    }

    #[test]
    fn test_intersection() {
        let a: Mood = ["Action", "Comedy"].into_iter().collect();
        let b: Mood = ["Comedy", "Drama"].into_iter().collect();
        let both = a.intersection(&b);
        assert_eq!(both.genres().collect::<Vec<_>>(), vec!["Comedy"]);
    }

    #[test]
    fn test_toggle() {
        let mut mood = Mood::new();
        mood.toggle("Horror");
        assert!(mood.contains("Horror"));
        mood.toggle("Horror");
        assert!(mood.is_unrestricted());
    }

    #[test]
    fn test_duplicates_collapse() {
        let mood: Mood = ["Action", "Action"].into_iter().collect();
        assert_eq!(mood.len(), 1);
    }
}

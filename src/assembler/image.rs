use crate::spec::types::hw::{Addr, Word, ADDR_MAX, MEMORY_WORDS};

/// The full contents of program memory, one word per address. Every word which was not
/// assembled into is zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    words: Vec<Word>,
}

impl Default for Image {
    fn default() -> Self {
        Image::new()
    }
}

impl Image {
    pub fn new() -> Self {
        Image {
            words: vec![0; MEMORY_WORDS],
        }
    }

    /// Returns `None` unless exactly `MEMORY_WORDS` words are given.
    pub fn from_words(words: Vec<Word>) -> Option<Self> {
        if words.len() == MEMORY_WORDS {
            Some(Image { words })
        } else {
            None
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn get(&self, addr: Addr) -> Word {
        self.words[usize::from(addr & ADDR_MAX)]
    }

    pub fn set(&mut self, addr: Addr, word: Word) {
        self.words[usize::from(addr & ADDR_MAX)] = word;
    }

    /// The addresses holding a non-zero word, in ascending order.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, Word)> + '_ {
        self.words
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, word)| *word != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let image = Image::new();
        assert_eq!(image.words().len(), MEMORY_WORDS);
        assert_eq!(image.nonzero().count(), 0);
    }

    #[test]
    fn set_and_scan() {
        let mut image = Image::new();
        image.set(0xFFF, 0x1234);
        image.set(0x010, 0x00FF);
        assert_eq!(image.get(0xFFF), 0x1234);
        assert_eq!(
            image.nonzero().collect::<Vec<_>>(),
            vec![(0x010, 0x00FF), (0xFFF, 0x1234)]
        );
    }

    #[test]
    fn wrong_size_is_rejected() {
        assert!(Image::from_words(vec![0; 12]).is_none());
        assert!(Image::from_words(vec![0; MEMORY_WORDS]).is_some());
    }
}

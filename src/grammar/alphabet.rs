// Hands out the uppercase letters a grammar is not using yet.
// Letters are handed out in alphabetical order.
#[derive(Debug, PartialEq, Clone)]
pub struct NonterminalPool {
    free: Vec<char>,
}

impl Default for NonterminalPool {
    fn default() -> Self {
        NonterminalPool {
            free: ('A'..='Z').collect(),
        }
    }
}

impl NonterminalPool {
    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    pub fn contains(&self, letter: char) -> bool {
        self.free.binary_search(&letter).is_ok()
    }

    // Marks a letter as used without handing it out
    pub fn claim(&mut self, letter: char) -> bool {
        match self.free.binary_search(&letter) {
            Ok(index) => {
                self.free.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    pub fn reserve(&mut self) -> Option<char> {
        if self.free.is_empty() {
            None
        } else {
            Some(self.free.remove(0))
        }
    }

    pub fn release(&mut self, letter: char) {
        if !letter.is_ascii_uppercase() {
            return;
        }
        if let Err(index) = self.free.binary_search(&letter) {
            self.free.insert(index, letter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_in_order() {
        let mut pool = NonterminalPool::default();
        pool.claim('A');
        pool.claim('S');

        assert_eq!(pool.reserve(), Some('B'));
        assert_eq!(pool.reserve(), Some('C'));
        assert_eq!(pool.len(), 21);
    }

    #[test]
    fn release_returns_letter() {
        let mut pool = NonterminalPool::default();
        assert!(pool.claim('M'));
        assert!(!pool.claim('M'));
        assert!(!pool.contains('M'));

        pool.release('M');
        pool.release('M');
        pool.release('m');
        assert!(pool.contains('M'));
        assert_eq!(pool.len(), 26);
    }

    #[test]
    fn exhausted_pool() {
        let mut pool = NonterminalPool::default();
        for letter in 'A'..='Z' {
            pool.claim(letter);
        }

        assert!(pool.is_empty());
        assert_eq!(pool.reserve(), None);
    }
}

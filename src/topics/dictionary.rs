// Term dictionary and bag-of-words corpus.
//
// Terms get ids in order of first appearance across the documents, which
// makes the mapping deterministic for a given document order.

use std::collections::HashMap;

/// Bidirectional term ↔ id mapping built from a document set.
#[derive(Debug, Default)]
pub struct Dictionary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Dictionary {
    /// Build a dictionary from tokenized documents.
    pub fn from_documents(documents: &[Vec<String>]) -> Self {
        let mut dict = Dictionary::default();
        for doc in documents {
            for term in doc {
                if !dict.index.contains_key(term) {
                    dict.index.insert(term.clone(), dict.terms.len());
                    dict.terms.push(term.clone());
                }
            }
        }
        dict
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn term(&self, id: usize) -> Option<&str> {
        self.terms.get(id).map(String::as_str)
    }

    pub fn id(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Convert one tokenized document into a sparse bag-of-words vector,
    /// sorted by term id. Terms not in the dictionary are ignored.
    pub fn doc2bow(&self, document: &[String]) -> Vec<(usize, u32)> {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for term in document {
            if let Some(id) = self.index.get(term) {
                *counts.entry(*id).or_insert(0) += 1;
            }
        }
        let mut bow: Vec<(usize, u32)> = counts.into_iter().collect();
        bow.sort_by_key(|&(id, _)| id);
        bow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<Vec<String>> {
        vec![
            vec!["rate".into(), "rise".into(), "rate".into()],
            vec!["market".into(), "rise".into()],
        ]
    }

    #[test]
    fn ids_follow_first_appearance() {
        let dict = Dictionary::from_documents(&docs());
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.id("rate"), Some(0));
        assert_eq!(dict.id("rise"), Some(1));
        assert_eq!(dict.id("market"), Some(2));
        assert_eq!(dict.term(2), Some("market"));
    }

    #[test]
    fn doc2bow_counts_and_sorts() {
        let dict = Dictionary::from_documents(&docs());
        let bow = dict.doc2bow(&docs()[0]);
        assert_eq!(bow, vec![(0, 2), (1, 1)]);
    }

    #[test]
    fn doc2bow_ignores_unknown_terms() {
        let dict = Dictionary::from_documents(&docs());
        let bow = dict.doc2bow(&["unknown".into(), "rate".into()]);
        assert_eq!(bow, vec![(0, 1)]);
    }
}

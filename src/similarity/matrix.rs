// Document-term count matrix and pairwise cosine distance.
//
// Vectorization here is deliberately raw — plain word tokens, no stop
// word removal or stemming — matching how the stored article files are
// compared as whole documents. The vocabulary is sorted so the matrix is
// identical across runs for the same files.

use std::collections::{BTreeSet, HashMap};

use crate::text;

/// Dense document-term count matrix over named documents.
pub struct DocumentTermMatrix {
    /// Document names, in input order
    pub names: Vec<String>,
    /// Sorted vocabulary
    pub vocab: Vec<String>,
    /// counts[doc][term_index]
    pub counts: Vec<Vec<f64>>,
}

/// Count-vectorize (name, text) documents.
pub fn vectorize(documents: &[(String, String)]) -> DocumentTermMatrix {
    let tokenized: Vec<Vec<String>> = documents
        .iter()
        .map(|(_, content)| text::tokenize(content))
        .collect();

    let vocab: Vec<String> = tokenized
        .iter()
        .flatten()
        .cloned()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect();
    let index: HashMap<&str, usize> = vocab
        .iter()
        .enumerate()
        .map(|(i, term)| (term.as_str(), i))
        .collect();

    let counts: Vec<Vec<f64>> = tokenized
        .iter()
        .map(|tokens| {
            let mut row = vec![0.0; vocab.len()];
            for token in tokens {
                if let Some(&i) = index.get(token.as_str()) {
                    row[i] += 1.0;
                }
            }
            row
        })
        .collect();

    DocumentTermMatrix {
        names: documents.iter().map(|(name, _)| name.clone()).collect(),
        vocab,
        counts,
    }
}

/// Cosine similarity between two count vectors. Zero vectors have no
/// direction and score 0 against everything.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}

/// Pairwise distance matrix, `1 − cosine_similarity`.
///
/// Symmetric with a zero diagonal by construction: each pair is computed
/// once and mirrored, and the diagonal is pinned rather than recomputed
/// (a document is at distance 0 from itself even when its vector is
/// empty).
pub fn cosine_distance_matrix(dtm: &DocumentTermMatrix) -> Vec<Vec<f64>> {
    let n = dtm.counts.len();
    let mut dist = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let d = 1.0 - cosine_similarity(&dtm.counts[i], &dtm.counts[j]);
            dist[i][j] = d;
            dist[j][i] = d;
        }
    }

    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<(String, String)> {
        vec![
            ("a".into(), "rates rise as markets rally".into()),
            ("b".into(), "rates rise as markets rally".into()),
            ("c".into(), "volcano erupts near coastal village".into()),
        ]
    }

    #[test]
    fn vocab_is_sorted_and_counts_match() {
        let dtm = vectorize(&[("d".into(), "b a b".into())]);
        assert_eq!(dtm.vocab, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(dtm.counts[0], vec![1.0, 2.0]);
    }

    #[test]
    fn distance_matrix_symmetric_zero_diagonal() {
        let dtm = vectorize(&docs());
        let dist = cosine_distance_matrix(&dtm);
        for i in 0..3 {
            assert_eq!(dist[i][i], 0.0);
            for j in 0..3 {
                assert!(
                    (dist[i][j] - dist[j][i]).abs() < 1e-12,
                    "asymmetry at ({i},{j})"
                );
            }
        }
    }

    #[test]
    fn identical_documents_are_close_distinct_are_far() {
        let dtm = vectorize(&docs());
        let dist = cosine_distance_matrix(&dtm);
        assert!(dist[0][1] < 1e-9, "identical docs should be at distance 0");
        assert!((dist[0][2] - 1.0).abs() < 1e-9, "disjoint docs at distance 1");
    }

    #[test]
    fn zero_vector_has_zero_similarity() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }
}

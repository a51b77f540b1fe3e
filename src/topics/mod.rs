// Topic extraction over preprocessed article text.
//
// The seam is the TopicModel trait: the pipeline hands it tokenized
// documents and gets back the top terms per topic. The default
// implementation is a seeded Gibbs-sampling LDA; anything that can rank
// terms into a fixed number of topics could slot in behind the trait.

pub mod dictionary;
pub mod lda;

use anyhow::Result;

/// One fitted topic: its highest-probability terms and the fraction of
/// the corpus tokens assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub terms: Vec<String>,
    pub share: f64,
}

/// Trait for fitting a topic model to a set of tokenized documents.
pub trait TopicModel {
    /// Fit the model and return the topics, top terms first within each.
    fn topic_terms(&self, documents: &[Vec<String>]) -> Result<Vec<Topic>>;
}

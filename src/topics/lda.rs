// Latent Dirichlet Allocation by collapsed Gibbs sampling.
//
// Small corpora (one article's lines) and a fixed topic count keep this
// cheap: the sampler walks every token `passes` times, reassigning its
// topic from the conditional distribution
//
//   p(k) ∝ (n_dk + α) · (n_kw + β) / (n_k + V·β)
//
// where n_dk counts topic k in the token's document, n_kw counts term w
// in topic k, and n_k is topic k's total. The RNG is seeded so a given
// corpus always produces the same topics.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::dictionary::Dictionary;
use super::{Topic, TopicModel};

/// LDA configuration. Defaults mirror the analysis this tool exists to
/// run: 3 topics, 50 sampling passes.
pub struct LdaModel {
    pub num_topics: usize,
    pub passes: usize,
    /// Document-topic smoothing
    pub alpha: f64,
    /// Topic-term smoothing
    pub beta: f64,
    pub seed: u64,
}

impl Default for LdaModel {
    fn default() -> Self {
        Self {
            num_topics: 3,
            passes: 50,
            alpha: 0.1,
            beta: 0.01,
            seed: 1,
        }
    }
}

/// Topic-term counts left behind by the sampler.
pub struct FittedLda {
    num_topics: usize,
    topic_term: Vec<Vec<u32>>,
    topic_totals: Vec<u32>,
}

impl LdaModel {
    /// Run the Gibbs sampler over a bag-of-words corpus.
    pub fn fit(&self, corpus: &[Vec<(usize, u32)>], dictionary: &Dictionary) -> Result<FittedLda> {
        if self.num_topics == 0 {
            anyhow::bail!("num_topics must be at least 1");
        }
        if dictionary.is_empty() {
            anyhow::bail!("cannot fit a topic model on an empty dictionary");
        }

        let k = self.num_topics;
        let v = dictionary.len();

        // Expand the sparse counts into one (doc, term) entry per token
        let mut tokens: Vec<(usize, usize)> = Vec::new();
        for (doc_id, bow) in corpus.iter().enumerate() {
            for &(term_id, count) in bow {
                for _ in 0..count {
                    tokens.push((doc_id, term_id));
                }
            }
        }
        if tokens.is_empty() {
            anyhow::bail!("cannot fit a topic model on an empty corpus");
        }

        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut doc_topic = vec![vec![0u32; k]; corpus.len()];
        let mut topic_term = vec![vec![0u32; v]; k];
        let mut topic_totals = vec![0u32; k];

        // Random initial assignment
        let mut assignments: Vec<usize> = Vec::with_capacity(tokens.len());
        for &(doc, term) in &tokens {
            let topic = rng.random_range(0..k);
            doc_topic[doc][topic] += 1;
            topic_term[topic][term] += 1;
            topic_totals[topic] += 1;
            assignments.push(topic);
        }

        let mut weights = vec![0.0f64; k];
        for _ in 0..self.passes {
            for (i, &(doc, term)) in tokens.iter().enumerate() {
                let old = assignments[i];
                doc_topic[doc][old] -= 1;
                topic_term[old][term] -= 1;
                topic_totals[old] -= 1;

                let mut total = 0.0;
                for (topic, weight) in weights.iter_mut().enumerate() {
                    *weight = (doc_topic[doc][topic] as f64 + self.alpha)
                        * (topic_term[topic][term] as f64 + self.beta)
                        / (topic_totals[topic] as f64 + v as f64 * self.beta);
                    total += *weight;
                }

                let mut draw = rng.random::<f64>() * total;
                let mut new = k - 1;
                for (topic, &weight) in weights.iter().enumerate() {
                    if draw < weight {
                        new = topic;
                        break;
                    }
                    draw -= weight;
                }

                doc_topic[doc][new] += 1;
                topic_term[new][term] += 1;
                topic_totals[new] += 1;
                assignments[i] = new;
            }
        }

        Ok(FittedLda {
            num_topics: k,
            topic_term,
            topic_totals,
        })
    }
}

impl FittedLda {
    /// The `top_n` highest-count terms for each topic, resolved back to
    /// text through the dictionary.
    pub fn top_terms(&self, dictionary: &Dictionary, top_n: usize) -> Vec<Vec<String>> {
        (0..self.num_topics)
            .map(|topic| {
                let mut ranked: Vec<(usize, u32)> = self.topic_term[topic]
                    .iter()
                    .enumerate()
                    .filter(|&(_, &count)| count > 0)
                    .map(|(id, &count)| (id, count))
                    .collect();
                // Count desc, term id asc for a stable order on ties
                ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
                ranked
                    .into_iter()
                    .take(top_n)
                    .filter_map(|(id, _)| dictionary.term(id).map(str::to_string))
                    .collect()
            })
            .collect()
    }

    /// Fraction of all tokens assigned to each topic.
    pub fn topic_shares(&self) -> Vec<f64> {
        let total: u32 = self.topic_totals.iter().sum();
        if total == 0 {
            return vec![0.0; self.num_topics];
        }
        self.topic_totals
            .iter()
            .map(|&n| n as f64 / total as f64)
            .collect()
    }
}

impl TopicModel for LdaModel {
    fn topic_terms(&self, documents: &[Vec<String>]) -> Result<Vec<Topic>> {
        let dictionary = Dictionary::from_documents(documents);
        let corpus: Vec<Vec<(usize, u32)>> = documents
            .iter()
            .map(|doc| dictionary.doc2bow(doc))
            .collect();
        let fitted = self.fit(&corpus, &dictionary)?;
        let topics = fitted
            .top_terms(&dictionary, 3)
            .into_iter()
            .zip(fitted.topic_shares())
            .map(|(terms, share)| Topic { terms, share })
            .collect();
        Ok(topics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Vec<String>> {
        let mut docs = Vec::new();
        for _ in 0..5 {
            docs.push(vec!["rate".into(), "bank".into(), "inflat".into()]);
            docs.push(vec!["goal".into(), "match".into(), "leagu".into()]);
        }
        docs
    }

    #[test]
    fn produces_requested_shape() {
        let model = LdaModel::default();
        let topics = model.topic_terms(&corpus()).unwrap();
        assert_eq!(topics.len(), 3);
        for topic in &topics {
            assert!(topic.terms.len() <= 3);
        }
    }

    #[test]
    fn same_seed_same_topics() {
        let model = LdaModel::default();
        let a = model.topic_terms(&corpus()).unwrap();
        let b = model.topic_terms(&corpus()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn terms_come_from_the_corpus() {
        let model = LdaModel::default();
        let vocab = ["rate", "bank", "inflat", "goal", "match", "leagu"];
        for topic in model.topic_terms(&corpus()).unwrap() {
            for term in topic.terms {
                assert!(vocab.contains(&term.as_str()), "unexpected term {term}");
            }
        }
    }

    #[test]
    fn empty_corpus_fails() {
        let model = LdaModel::default();
        assert!(model.topic_terms(&[]).is_err());
    }

    #[test]
    fn topic_shares_sum_to_one() {
        let model = LdaModel::default();
        let dictionary = Dictionary::from_documents(&corpus());
        let bow: Vec<_> = corpus().iter().map(|d| dictionary.doc2bow(d)).collect();
        let fitted = model.fit(&bow, &dictionary).unwrap();
        let sum: f64 = fitted.topic_shares().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn reported_topics_carry_their_shares() {
        let model = LdaModel::default();
        let topics = model.topic_terms(&corpus()).unwrap();
        let sum: f64 = topics.iter().map(|t| t.share).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(topics.iter().all(|t| t.share >= 0.0));
    }
}

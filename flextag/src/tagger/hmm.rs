use hashbrown::HashMap;
use log::debug;

use crate::corpus::TaggedSentence;
use crate::errors::{FlextagError, Result};
use crate::freq_dist::FreqDist;
use crate::tagger::Tagger;

// Additive smoothing parameter of every distribution.
const LIDSTONE_GAMMA: f64 = 0.1;

fn lidstone_log2(count: usize, total: usize, n_bins: usize) -> f64 {
    ((count as f64 + LIDSTONE_GAMMA) / (total as f64 + n_bins as f64 * LIDSTONE_GAMMA)).log2()
}

/// Hidden Markov model tagger trained by supervised estimation.
///
/// Initial, transition and emission distributions are Lidstone-smoothed counts. Decoding uses
/// the Viterbi algorithm in log space.
pub struct HmmTagger {
    tags: Vec<String>,
    initial: Vec<f64>,
    // transitions[from][to]
    transitions: Vec<Vec<f64>>,
    // word -> log probability for each tag
    emissions: HashMap<String, Vec<f64>>,
    unseen_emission: Vec<f64>,
}

impl HmmTagger {
    /// Trains a model.
    ///
    /// # Errors
    ///
    /// [`FlextagError::EmptyTrainingSplit`] is returned if `train` contains no tokens.
    pub fn train(train: &[TaggedSentence]) -> Result<Self> {
        let mut tag_ids = HashMap::<&str, usize>::new();
        let mut tags = vec![];
        let mut symbols = FreqDist::<String>::new();
        for token in train.iter().flat_map(TaggedSentence::tokens) {
            if !tag_ids.contains_key(token.tag()) {
                tag_ids.insert(token.tag(), tags.len());
                tags.push(token.tag().to_string());
            }
            symbols.add(token.surface());
        }
        let n_tags = tags.len();
        if n_tags == 0 {
            return Err(FlextagError::EmptyTrainingSplit);
        }
        let n_symbols = symbols.len();

        let mut initial_counts = vec![0; n_tags];
        let mut transition_counts = vec![vec![0; n_tags]; n_tags];
        let mut tag_counts = vec![0; n_tags];
        let mut emission_counts = HashMap::<&str, Vec<usize>>::new();
        let mut n_sents = 0;
        for sent in train {
            let mut prev: Option<usize> = None;
            for token in sent.tokens() {
                let id = tag_ids[token.tag()];
                match prev {
                    Some(p) => transition_counts[p][id] += 1,
                    None => initial_counts[id] += 1,
                }
                tag_counts[id] += 1;
                emission_counts
                    .entry(token.surface())
                    .or_insert_with(|| vec![0; n_tags])[id] += 1;
                prev = Some(id);
            }
            if prev.is_some() {
                n_sents += 1;
            }
        }

        let initial = initial_counts
            .iter()
            .map(|&c| lidstone_log2(c, n_sents, n_tags))
            .collect();
        let transitions = transition_counts
            .iter()
            .map(|row| {
                let total: usize = row.iter().sum();
                row.iter()
                    .map(|&c| lidstone_log2(c, total, n_tags))
                    .collect()
            })
            .collect();
        let emissions = emission_counts
            .into_iter()
            .map(|(word, counts)| {
                let probs = counts
                    .iter()
                    .zip(&tag_counts)
                    .map(|(&c, &total)| lidstone_log2(c, total, n_symbols))
                    .collect();
                (word.to_string(), probs)
            })
            .collect();
        let unseen_emission = tag_counts
            .iter()
            .map(|&total| lidstone_log2(0, total, n_symbols))
            .collect();
        debug!("HMM: {n_tags} tags, {n_symbols} symbols, {n_sents} sentences");

        Ok(Self {
            tags,
            initial,
            transitions,
            emissions,
            unseen_emission,
        })
    }

    /// Tags known to the model, in first-seen order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    fn emission(&self, word: &str) -> &[f64] {
        self.emissions
            .get(word)
            .map_or(self.unseen_emission.as_slice(), Vec::as_slice)
    }

    /// Finds the most probable tag sequence.
    fn best_path(&self, words: &[&str]) -> Vec<usize> {
        let Some((first, rest)) = words.split_first() else {
            return vec![];
        };
        let n_tags = self.tags.len();
        let mut scores: Vec<f64> = self
            .initial
            .iter()
            .zip(self.emission(first))
            .map(|(p, e)| p + e)
            .collect();
        let mut backpointers: Vec<Vec<usize>> = Vec::with_capacity(rest.len());
        for word in rest {
            let emission = self.emission(word);
            let mut next_scores = vec![f64::NEG_INFINITY; n_tags];
            let mut pointers = vec![0; n_tags];
            for (j, (next_score, pointer)) in
                next_scores.iter_mut().zip(&mut pointers).enumerate()
            {
                for (i, score) in scores.iter().enumerate() {
                    let s = score + self.transitions[i][j];
                    if s > *next_score {
                        *next_score = s;
                        *pointer = i;
                    }
                }
                *next_score += emission[j];
            }
            backpointers.push(pointers);
            scores = next_scores;
        }

        let mut best = 0;
        for (i, &score) in scores.iter().enumerate() {
            if score > scores[best] {
                best = i;
            }
        }
        let mut path = vec![best];
        for pointers in backpointers.iter().rev() {
            best = pointers[best];
            path.push(best);
        }
        path.reverse();
        path
    }
}

impl Tagger for HmmTagger {
    fn tag<'a>(&'a self, words: &[&str]) -> Vec<&'a str> {
        self.best_path(words)
            .into_iter()
            .map(|id| self.tags[id].as_str())
            .collect()
    }
}

//! Topic clustering over document sections
//!
//! Treats each heading-delimited section as a pseudo-document,
//! vectorizes with TF-IDF over unigrams and bigrams, and groups the
//! sections with iterative centroid clustering. Initialization is
//! deterministic: the top-k distinct terms by aggregate frequency seed
//! the centroids, so identical input always yields identical clusters.
//! No randomness anywhere.

use crate::document::Structure;
use crate::keywords::is_stop_word;
use crate::models::TopicCluster;
use crate::text;
use std::collections::BTreeMap;

/// Sections shorter than this many words are skipped
const MIN_SECTION_WORDS: usize = 10;

/// Cap on the vocabulary, by aggregate term frequency
const MAX_FEATURES: usize = 100;

/// Terms reported per cluster
const TERMS_PER_CLUSTER: usize = 5;

const MAX_ITERATIONS: usize = 10;

/// Cluster a document's sections into topic groups.
///
/// Returns an empty list when fewer than three substantial sections
/// exist; clustering two sections tells you nothing.
pub fn cluster_sections(structure: &Structure) -> Vec<TopicCluster> {
    // Substantial sections only, remembering their original indices
    let sections: Vec<(usize, Vec<String>)> = structure
        .sections
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            let tokens = section_terms(&s.text());
            (tokens.len() >= MIN_SECTION_WORDS).then_some((i, tokens))
        })
        .collect();

    if sections.len() < 3 {
        return Vec::new();
    }

    let k = (sections.len() / 2).clamp(2, 5);

    // Vocabulary: top terms by aggregate frequency, ties lexicographic,
    // then indexed in sorted order for stable vectors.
    let mut term_freq: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, tokens) in &sections {
        for token in tokens {
            *term_freq.entry(token).or_insert(0) += 1;
        }
    }
    let mut by_freq: Vec<(&str, usize)> = term_freq.iter().map(|(t, c)| (*t, *c)).collect();
    by_freq.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    let mut vocab: Vec<&str> = by_freq.iter().take(MAX_FEATURES).map(|(t, _)| *t).collect();
    vocab.sort_unstable();
    let index: BTreeMap<&str, usize> = vocab.iter().enumerate().map(|(i, t)| (*t, i)).collect();

    // TF-IDF vectors, l2-normalized
    let n = sections.len() as f64;
    let mut doc_freq = vec![0usize; vocab.len()];
    let counts: Vec<Vec<f64>> = sections
        .iter()
        .map(|(_, tokens)| {
            let mut row = vec![0.0; vocab.len()];
            for token in tokens {
                if let Some(&j) = index.get(token.as_str()) {
                    row[j] += 1.0;
                }
            }
            for (j, &c) in row.iter().enumerate() {
                if c > 0.0 {
                    doc_freq[j] += 1;
                }
            }
            row
        })
        .collect();

    let idf: Vec<f64> = doc_freq
        .iter()
        .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
        .collect();

    let vectors: Vec<Vec<f64>> = counts
        .into_iter()
        .map(|row| {
            let weighted: Vec<f64> = row.iter().zip(&idf).map(|(tf, idf)| tf * idf).collect();
            normalize(weighted)
        })
        .collect();

    // Deterministic seeding: unit centroids on the k most frequent terms
    let mut centroids: Vec<Vec<f64>> = by_freq
        .iter()
        .take(k)
        .map(|(term, _)| {
            let mut c = vec![0.0; vocab.len()];
            if let Some(&j) = index.get(*term) {
                c[j] = 1.0;
            }
            c
        })
        .collect();

    let mut assignment = vec![0usize; vectors.len()];
    for _ in 0..MAX_ITERATIONS {
        // Assign each section to the nearest centroid; ties break to
        // the lower cluster index.
        let mut changed = false;
        for (i, v) in vectors.iter().enumerate() {
            let mut best = 0usize;
            let mut best_sim = f64::NEG_INFINITY;
            for (c, centroid) in centroids.iter().enumerate() {
                let sim = dot(v, centroid);
                if sim > best_sim {
                    best_sim = sim;
                    best = c;
                }
            }
            if assignment[i] != best {
                assignment[i] = best;
                changed = true;
            }
        }

        // Recompute centroids; an empty cluster keeps its seed
        for (c, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<&Vec<f64>> = vectors
                .iter()
                .zip(&assignment)
                .filter(|&(_, &a)| a == c)
                .map(|(v, _)| v)
                .collect();
            if members.is_empty() {
                continue;
            }
            let mut mean = vec![0.0; centroid.len()];
            for m in &members {
                for (j, value) in m.iter().enumerate() {
                    mean[j] += value;
                }
            }
            for value in &mut mean {
                *value /= members.len() as f64;
            }
            *centroid = normalize(mean);
        }

        if !changed {
            break;
        }
    }

    // Report each non-empty cluster's top centroid terms
    let mut clusters = Vec::new();
    for (c, centroid) in centroids.iter().enumerate() {
        let members: Vec<usize> = assignment
            .iter()
            .enumerate()
            .filter(|(_, &a)| a == c)
            .map(|(i, _)| sections[i].0)
            .collect();
        if members.is_empty() {
            continue;
        }

        let mut ranked: Vec<(usize, f64)> = centroid
            .iter()
            .enumerate()
            .filter(|(_, &w)| w > 0.0)
            .map(|(j, &w)| (j, w))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(vocab[a.0].cmp(vocab[b.0]))
        });
        ranked.truncate(TERMS_PER_CLUSTER);

        let weight = if ranked.is_empty() {
            0.0
        } else {
            let sum: f64 = ranked.iter().map(|(_, w)| w).sum();
            round3(sum / ranked.len() as f64)
        };

        clusters.push(TopicCluster {
            id: clusters.len(),
            terms: ranked.iter().map(|(j, _)| vocab[*j].to_string()).collect(),
            weight,
            sections: members,
        });
    }

    clusters
}

/// Unigrams and bigrams for one section, stop words excluded.
fn section_terms(section_text: &str) -> Vec<String> {
    let tokens: Vec<String> = text::words(section_text)
        .iter()
        .map(|w| text::normalize_token(w))
        .filter(|t| t.len() >= 3 && t.chars().all(|c| c.is_ascii_alphanumeric()))
        .collect();

    let mut terms: Vec<String> = tokens
        .iter()
        .filter(|t| !is_stop_word(t))
        .cloned()
        .collect();
    for window in tokens.windows(2) {
        if !window.iter().any(|t| is_stop_word(t)) {
            terms.push(window.join(" "));
        }
    }
    terms
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn normalize(mut v: Vec<f64>) -> Vec<f64> {
    let norm = dot(&v, &v).sqrt();
    if norm > 0.0 {
        for value in &mut v {
            *value /= norm;
        }
    }
    v
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn clustered_doc() -> Document {
        Document::from_string(
            "\
# Growing a Podcast

Podcast episodes need steady publishing schedules and good audio quality for \
listeners to stay subscribed over many months of episodes.

## Audio Equipment

Microphone choice and audio interface quality shape the sound. A quiet room \
beats an expensive microphone when recording audio for episodes.

## Marketing Channels

Social media clips and newsletter mentions drive new listeners. Marketing \
spend works best after the show finds its audience niche.

## Paid Advertising

Advertising budgets and marketing funnels convert casual listeners into \
subscribers when the targeting matches the audience niche.

## Editing Workflow

Editing software and audio cleanup take most of the production time. Good \
editing keeps episodes tight and listenable.
",
            None,
            None,
        )
    }

    #[test]
    fn test_too_few_sections_no_clusters() {
        let doc = Document::from_string(
            "# One\n\nJust a single short section here with a few words only.\n",
            None,
            None,
        );
        assert!(cluster_sections(&doc.structure()).is_empty());
    }

    #[test]
    fn test_clusters_cover_all_sections() {
        let structure = clustered_doc().structure();
        let clusters = cluster_sections(&structure);
        assert!(!clusters.is_empty());

        let mut covered: Vec<usize> = clusters.iter().flat_map(|c| c.sections.clone()).collect();
        covered.sort_unstable();
        // Every substantial section is assigned to exactly one cluster
        assert_eq!(covered.len(), 5);
        for cluster in &clusters {
            assert!(!cluster.terms.is_empty());
            assert!(cluster.terms.len() <= TERMS_PER_CLUSTER);
            assert!(cluster.weight > 0.0);
        }
    }

    #[test]
    fn test_clustering_determinism() {
        let structure = clustered_doc().structure();
        let a = cluster_sections(&structure);
        let b = cluster_sections(&structure);
        assert_eq!(a, b);
    }
}

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Sparse vector as (feature index, weight), sorted by index
pub type SparseVector = Vec<(usize, f64)>;

/// Split a pseudo-document into terms: runs of word characters, at least two long
pub fn analyze_terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.chars().count() >= 2)
        .map(str::to_lowercase)
}

/// Sorted term vocabulary of a document collection
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn fit(documents: &[String]) -> Self {
        let terms: BTreeSet<String> = documents.iter().flat_map(|d| analyze_terms(d)).collect();
        Self::from_terms(terms.into_iter().collect())
    }

    pub fn from_terms(terms: Vec<String>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { terms, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn term(&self, index: usize) -> &str {
        &self.terms[index]
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Raw term counts of one document; unknown terms are ignored
    pub fn counts(&self, document: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in analyze_terms(document) {
            if let Some(&i) = self.index.get(&term) {
                *counts.entry(i).or_insert(0.0) += 1.0;
            }
        }
        counts.into_iter().collect()
    }
}

/// TF-IDF document vectors with smooth idf (`ln((1 + n) / (1 + df)) + 1`),
/// L2-normalized
pub fn tfidf(vocabulary: &Vocabulary, documents: &[String]) -> Vec<SparseVector> {
    let counts: Vec<SparseVector> = documents.iter().map(|d| vocabulary.counts(d)).collect();

    let mut df = vec![0.0; vocabulary.len()];
    for row in &counts {
        for &(i, _) in row {
            df[i] += 1.0;
        }
    }
    let n = documents.len() as f64;
    let idf: Vec<f64> = df.iter().map(|d| ((1.0 + n) / (1.0 + d)).ln() + 1.0).collect();

    counts
        .into_iter()
        .map(|row| {
            let mut weighted: SparseVector = row.into_iter().map(|(i, c)| (i, c * idf[i])).collect();
            let norm = weighted.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, w) in weighted.iter_mut() {
                    *w /= norm;
                }
            }
            weighted
        })
        .collect()
}

/// Class-based TF-IDF: one dense row per class (topic id).
///
/// Term frequencies are summed per class and L1-normalized, then weighted by
/// `ln(1 + A / f)` where `A` is the average number of words per class and
/// `f` the frequency of the term over all classes.
pub fn class_tfidf(
    vocabulary: &Vocabulary,
    documents: &[String],
    classes: &[i32],
) -> BTreeMap<i32, Vec<f64>> {
    let mut rows: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for (document, &class) in documents.iter().zip(classes) {
        let row = rows
            .entry(class)
            .or_insert_with(|| vec![0.0; vocabulary.len()]);
        for (i, c) in vocabulary.counts(document) {
            row[i] += c;
        }
    }
    if rows.is_empty() {
        return rows;
    }

    let mut frequency = vec![0.0; vocabulary.len()];
    let mut total_words = 0.0;
    for row in rows.values() {
        for (i, c) in row.iter().enumerate() {
            frequency[i] += c;
            total_words += c;
        }
    }
    let average = (total_words / rows.len() as f64).floor();
    let idf: Vec<f64> = frequency
        .iter()
        .map(|&f| if f > 0.0 { (average / f + 1.0).ln() } else { 0.0 })
        .collect();

    for row in rows.values_mut() {
        let sum: f64 = row.iter().sum();
        for (i, value) in row.iter_mut().enumerate() {
            *value = if sum > 0.0 { *value / sum * idf[i] } else { 0.0 };
        }
    }
    rows
}

pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

pub fn sparse_cosine(a: &SparseVector, b: &[f64]) -> f64 {
    let dot: f64 = a.iter().map(|&(i, w)| w * b[i]).sum();
    let norm_a = a.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

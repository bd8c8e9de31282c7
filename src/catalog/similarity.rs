use std::collections::HashMap;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

// Sequences at least this long drop their most frequent elements from the
// match index; see `SequenceMatcher::new`.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Longest-matching-block comparison against a fixed second sequence.
///
/// Matching blocks are found by taking the longest common run, then recursing
/// into the unmatched text on either side of it. The ratio is
/// `2 * matched / (len(a) + len(b))`, computed over Unicode scalar values.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    b: Vec<char>,
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    pub fn new(b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, ch) in b.iter().enumerate() {
            b2j.entry(*ch).or_default().push(j);
        }

        // Characters that make up more than 1% of a long sequence are treated
        // as noise when seeding matches. They can still extend a match.
        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, indices| indices.len() <= limit);
        }

        Self { b, b2j }
    }

    fn find_longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let b = &self.b;
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);

        // run length of the match ending at (i - 1, j), keyed by j
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(indices) = self.b2j.get(ch) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }

    fn matched_len(&self, a: &[char]) -> usize {
        let mut total = 0usize;
        let mut pending = vec![(0usize, a.len(), 0usize, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.find_longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }

    /// Similarity of `a` to this matcher's sequence, in `[0, 1]`.
    pub fn ratio(&self, a: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let total = a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * self.matched_len(&a) as f64 / total as f64
    }
}

/// A fuzzy lookup: the strings to look for and how close a value must be.
#[derive(Debug, Clone)]
pub struct SimilarityQuery {
    threshold: f64,
    matchers: Vec<SequenceMatcher>,
}

impl SimilarityQuery {
    pub fn new<S: AsRef<str>>(targets: &[S]) -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            matchers: targets
                .iter()
                .map(|t| SequenceMatcher::new(t.as_ref()))
                .collect(),
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// True when `value` reaches the threshold against at least one target.
    pub fn matches(&self, value: &str) -> bool {
        self.matchers
            .iter()
            .any(|matcher| matcher.ratio(value) >= self.threshold)
    }

    /// Keep the records whose selected field matches, in their original order.
    pub fn filter<T, F>(&self, records: impl IntoIterator<Item = T>, field: F) -> Vec<T>
    where
        F: Fn(&T) -> &str,
    {
        records
            .into_iter()
            .filter(|record| self.matches(field(record)))
            .collect()
    }
}

pub fn filter_by_similarity<T, F, S>(
    records: impl IntoIterator<Item = T>,
    field: F,
    targets: &[S],
    threshold: f64,
) -> Vec<T>
where
    F: Fn(&T) -> &str,
    S: AsRef<str>,
{
    SimilarityQuery::new(targets)
        .with_threshold(threshold)
        .filter(records, field)
}

//! BM25 scoring.

/// BM25 scorer for a single term in a single field.
#[derive(Debug, Clone)]
pub struct BM25Scorer {
    /// Document frequency of the term.
    doc_freq: u64,
    /// Total number of documents in the index.
    total_docs: u64,
    /// Average field length.
    avg_field_length: f64,
    /// Boost factor.
    boost: f32,
    /// BM25 k1 parameter.
    k1: f32,
    /// BM25 b parameter.
    b: f32,
}

impl BM25Scorer {
    /// Create a new BM25 scorer.
    pub fn new(doc_freq: u64, total_docs: u64, avg_field_length: f64, boost: f32) -> Self {
        BM25Scorer {
            doc_freq,
            total_docs,
            avg_field_length,
            boost,
            k1: 1.2,
            b: 0.75,
        }
    }

    /// Create a new BM25 scorer with custom parameters.
    pub fn with_params(
        doc_freq: u64,
        total_docs: u64,
        avg_field_length: f64,
        boost: f32,
        k1: f32,
        b: f32,
    ) -> Self {
        BM25Scorer {
            doc_freq,
            total_docs,
            avg_field_length,
            boost,
            k1,
            b,
        }
    }

    /// IDF = ln(1 + (N - df + 0.5) / (df + 0.5)), never negative.
    fn idf(&self) -> f32 {
        if self.doc_freq == 0 || self.total_docs == 0 {
            return 0.0;
        }

        let n = self.total_docs as f32;
        let df = self.doc_freq as f32;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// TF = (tf * (k1 + 1)) / (tf + k1 * (1 - b + b * len / avg_len))
    fn tf(&self, term_freq: f32, field_length: f32) -> f32 {
        if term_freq == 0.0 {
            return 0.0;
        }

        let avg_len = if self.avg_field_length > 0.0 {
            self.avg_field_length as f32
        } else {
            field_length.max(1.0)
        };
        let norm_factor = 1.0 - self.b + self.b * (field_length / avg_len);
        (term_freq * (self.k1 + 1.0)) / (term_freq + self.k1 * norm_factor)
    }

    /// Score one document.
    pub fn score(&self, term_freq: f32, field_length: f32) -> f32 {
        self.idf() * self.tf(term_freq, field_length) * self.boost
    }

    /// Get the k1 parameter.
    pub fn k1(&self) -> f32 {
        self.k1
    }

    /// Get the b parameter.
    pub fn b(&self) -> f32 {
        self.b
    }
}

use crate::model::clip01;
use crate::signals::Embedder;

#[derive(Debug, Clone, PartialEq)]
pub struct Similarity {
    pub score: f64,
    pub degraded: Option<String>,
}

/// Embedding similarity mapped onto [0,1]. Never fails: an unusable
/// embedding counts as orthogonal (cosine 0, score 0.5) and is reported
/// through `degraded`.
pub struct SemanticSimilarityScorer<'a> {
    embedder: &'a dyn Embedder,
}

impl<'a> SemanticSimilarityScorer<'a> {
    pub fn new(embedder: &'a dyn Embedder) -> Self {
        Self { embedder }
    }

    pub fn similarity(&self, text: &str, reference: &str) -> Similarity {
        let vectors = self
            .embedder
            .embed(text)
            .and_then(|a| self.embedder.embed(reference).map(|b| (a, b)));
        match vectors {
            Ok((a, b)) => {
                if a.len() != b.len() {
                    return Similarity {
                        score: map_cosine(0.0),
                        degraded: Some(format!(
                            "{}: embedding sizes differ ({} vs {})",
                            self.embedder.name(),
                            a.len(),
                            b.len()
                        )),
                    };
                }
                Similarity {
                    score: map_cosine(cosine_similarity(&a, &b).unwrap_or(0.0)),
                    degraded: None,
                }
            }
            Err(err) => Similarity {
                score: map_cosine(0.0),
                degraded: Some(err.to_string()),
            },
        }
    }
}

/// `None` when either vector has no magnitude or the sizes differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let mut dot = 0f64;
    let mut mag_a = 0f64;
    let mut mag_b = 0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }
    if mag_a < 1e-12 || mag_b < 1e-12 {
        return None;
    }
    let cos = dot / (mag_a.sqrt() * mag_b.sqrt());
    if cos.is_finite() { Some(cos) } else { None }
}

pub fn map_cosine(cos: f64) -> f64 {
    clip01((cos + 1.0) / 2.0)
}

//! Deterministic embeddings for fixtures
//!
//! Real embedding models are out of scope for this workspace, but the
//! integration tests need embeddings whose similarity ordering is exact and
//! stable across runs. `VocabularyEmbeddings` counts occurrences of a fixed
//! vocabulary in the text, one dimension per word, plus a constant tail
//! component so no vector has zero norm. Cosine scores are then fully
//! determined by which vocabulary words a text contains.

/// Vocabulary used by the animal fixture
pub const ANIMAL_VOCABULARY: &[&str] = &[
    "small", "agile", "mammal", "reptile", "bird", "insect", "fish",
    "nocturnal", "domestic", "venomous", "burrowing", "forest", "desert",
    "savanna", "wetland", "ocean", "mountain", "grazes", "climbs", "swims",
    "flies", "pack", "solitary", "fur", "feathers", "scales", "snake",
];

/// Word-count embeddings over a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct VocabularyEmbeddings {
    vocabulary: Vec<String>,
}

impl VocabularyEmbeddings {
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocabulary: vocabulary.into_iter().map(Into::into).collect(),
        }
    }

    /// Embeddings over [`ANIMAL_VOCABULARY`]
    pub fn animals() -> Self {
        Self::new(ANIMAL_VOCABULARY.iter().copied())
    }

    /// Vector dimension: one slot per vocabulary word plus the constant tail
    pub fn dimension(&self) -> usize {
        self.vocabulary.len() + 1
    }

    /// Embed a text as vocabulary word counts
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let tokens: Vec<String> = text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let mut vector: Vec<f32> = self
            .vocabulary
            .iter()
            .map(|word| tokens.iter().filter(|t| *t == word).count() as f32)
            .collect();
        vector.push(1.0);
        vector
    }
}

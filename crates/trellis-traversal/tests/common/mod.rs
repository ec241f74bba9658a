//! Shared fixture loading for traversal integration tests

use trellis_core::test_support::VocabularyEmbeddings;
use trellis_core::{EdgeFields, Metadata, Node};
use trellis_memory::MemoryStore;

pub const ANIMALS_QUERY: &str = "small agile mammal";
pub const ANIMALS_DEPTH_0_EXPECTED: [&str; 2] = ["fox", "mongoose"];

/// Edge fields used by the animal fixture: shared habitat or any shared
/// keyword links two animals.
pub fn animal_edge_fields() -> EdgeFields {
    EdgeFields::new(["habitat", "keywords"]).unwrap()
}

/// Embed the animal query with the fixture embeddings
pub fn animal_query_vector() -> Vec<f32> {
    VocabularyEmbeddings::animals().embed(ANIMALS_QUERY)
}

/// Load `tests/data/animals.jsonl` into a fresh in-memory store, embedding
/// each document's text with the deterministic fixture embeddings.
pub async fn animal_store() -> MemoryStore {
    let embeddings = VocabularyEmbeddings::animals();
    let store = MemoryStore::new(embeddings.dimension());

    let raw = std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/data/animals.jsonl"
    ))
    .expect("animal fixture present");

    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        let doc: serde_json::Value = serde_json::from_str(line).expect("valid fixture line");
        let id = doc["id"].as_str().expect("fixture id").to_string();
        let text = doc["text"].as_str().expect("fixture text").to_string();
        let metadata: Metadata =
            serde_json::from_value(doc["metadata"].clone()).expect("fixture metadata");

        let embedding = embeddings.embed(&text);
        store
            .insert(Node::new(id, text, embedding).with_metadata(metadata))
            .await
            .expect("fixture insert");
    }

    store
}

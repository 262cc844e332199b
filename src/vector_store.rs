//! # VectorStore
//!
//! In-memory embedding index for one document session.
//!
//! This module wraps a [HNSW](https://arxiv.org/abs/1603.09320) approximate
//! nearest-neighbor index (`hora` crate) together with an ID↔chunk mapping.
//! Vectors arrive pre-computed (the embedding endpoint is remote), so the
//! store only owns indexing and lookup. The index lives exactly as long as
//! the process; nothing is persisted.
//!
//! ## Quick Example
//! ```no_run
//! use askpdf::vector_store::VectorStore;
//! use askpdf::chunker::Chunk;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = VectorStore::new(3);
//! store.add_chunk(vec![0.1, 0.2, 0.3], Chunk::new("Rust is great!".into()))?;
//! store.build()?;
//! let hits = store.search(&[0.1, 0.2, 0.3], 1)?;
//! println!("Top match: {hits:?}");
//! # Ok(()) }
//! ```

use hora::core::ann_index::ANNIndex;
use hora::core::metrics::Metric;
use hora::core::node::Node;
use hora::index::hnsw_idx::HNSWIndex;
use hora::index::hnsw_params::HNSWParams;
use std::collections::HashMap;

use crate::chunker::Chunk;

/// Session-scoped embedding store.
///
/// Internally holds a HNSW index and an ID→chunk map for recall.
pub struct VectorStore {
    /// ANN index for similarity search.
    index: HNSWIndex<f32, usize>,
    /// Dimensionality of vectors, fixed by the embedding model.
    dimension: usize,
    /// Auto-incrementing ID counter for new vectors.
    current_id: usize,
    /// Mapping from ID → associated chunk.
    id_to_chunk: HashMap<usize, Chunk>,
}

impl VectorStore {
    /// Create an empty store with a fresh HNSW index.
    ///
    /// # Parameters
    /// - `dimension`: Dimensionality expected by the index and all vectors.
    pub fn new(dimension: usize) -> Self {
        let index = HNSWIndex::new(dimension, &HNSWParams::default());

        Self {
            index,
            dimension,
            current_id: 0,
            id_to_chunk: HashMap::new(),
        }
    }

    /// Add a vector and its associated chunk to the index and map.
    ///
    /// # Returns
    /// The assigned integer ID for this vector.
    ///
    /// # Errors
    /// - Returns `"dimension mismatch"` if `vector.len() != self.dimension`.
    /// - Returns `"add failed"` if the HNSW index rejects the insert (rare).
    ///
    /// # Notes
    /// You must call [`build`](Self::build) before queries reflect new inserts.
    pub fn add_chunk(&mut self, vector: Vec<f32>, chunk: Chunk) -> Result<usize, &'static str> {
        if vector.len() != self.dimension {
            return Err("dimension mismatch");
        }
        let id = self.current_id;
        self.index.add(&vector, id).map_err(|_| "add failed")?;
        self.id_to_chunk.insert(id, chunk);
        self.current_id += 1;
        Ok(id)
    }

    /// Finalize (build) the HNSW index.
    ///
    /// Must be called **after** a batch of [`add_chunk`](Self::add_chunk)
    /// operations and **before** running [`search`](Self::search), otherwise
    /// queries won't see the new data.
    pub fn build(&mut self) -> Result<(), &'static str> {
        self.index
            .build(Metric::Euclidean)
            .map_err(|_| "build failed")
    }

    /// Query the index for the `top_k` nearest vectors to `vector`.
    ///
    /// # Returns
    /// `(id, distance)` pairs sorted by increasing distance (best first).
    ///
    /// # Errors
    /// `"dimension mismatch"` if `vector.len() != self.dimension`.
    pub fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<(usize, f32)>, &'static str> {
        if vector.len() != self.dimension {
            return Err("dimension mismatch");
        }

        let neighbors = self.index.search_nodes(vector, top_k);
        let hits = neighbors
            .iter()
            .filter_map(|pair| {
                let (node, distance): &(Node<f32, usize>, f32) = pair;
                (*node.idx()).map(|id| (id, *distance))
            })
            .collect();

        Ok(hits)
    }

    /// Look up the stored chunk by internal vector ID.
    ///
    /// Returns `None` if the ID is unknown.
    pub fn chunk(&self, id: usize) -> Option<&Chunk> {
        self.id_to_chunk.get(&id)
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.id_to_chunk.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_chunk.is_empty()
    }
}

//! # Query engine
//!
//! Ties the pieces together: chunk the document, embed every chunk in one
//! batch request, index the vectors, and answer questions by retrieving the
//! nearest chunks and fetching a completion with them as context.
//!
//! The [`QueryEngine`] trait is the seam between the interactive session and
//! the remote services, so the loop can be exercised with a test double.

use async_openai::{Client, config::OpenAIConfig};
use std::error::Error;

use crate::{
    api,
    chunker::{self, Chunk},
    config::AskPdfConfig,
    document::Document,
    vector_store::VectorStore,
};
use tracing::debug;

/// Anything that can answer a natural-language prompt.
#[allow(async_fn_in_trait)]
pub trait QueryEngine {
    /// Answer `prompt`, returning the synthesized response text.
    async fn query(&mut self, prompt: &str) -> Result<String, Box<dyn Error>>;
}

/// Production engine: remote embeddings + HNSW retrieval + remote completion.
///
/// Constructed only through [`DocumentQueryEngine::build`], which guarantees
/// the index is populated and built before any query runs.
pub struct DocumentQueryEngine {
    chat_client: Client<OpenAIConfig>,
    embedding_client: Client<OpenAIConfig>,
    config: AskPdfConfig,
    store: VectorStore,
}

impl DocumentQueryEngine {
    /// Chunk and index a loaded document.
    ///
    /// All chunks are embedded with a single batch request and inserted into
    /// a fresh vector store, which is built before the engine is returned.
    ///
    /// # Errors
    /// - The document yields no chunks.
    /// - Remote embedding failures.
    /// - Index construction failures.
    pub async fn build(
        config: AskPdfConfig,
        document: &Document,
    ) -> Result<Self, Box<dyn Error>> {
        let chunks = chunker::chunk_text(&document.text, config.chunk_max_tokens)?;
        if chunks.is_empty() {
            return Err(format!(
                "Document {} produced no text chunks",
                document.source.display()
            )
            .into());
        }
        debug!(
            "Indexing {} chunks from {}",
            chunks.len(),
            document.source.display()
        );

        let chat_client = api::create_client(&config);
        let embedding_client = api::create_embedding_client(&config);

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = api::embed(&embedding_client, &config.embedding_model, texts).await?;

        let dimension = vectors
            .first()
            .map(|v| v.len())
            .ok_or("Embedding endpoint returned no vectors")?;

        let mut store = VectorStore::new(dimension);
        for (vector, chunk) in vectors.into_iter().zip(chunks) {
            store.add_chunk(vector, chunk)?;
        }
        store.build()?;

        Ok(Self {
            chat_client,
            embedding_client,
            config,
            store,
        })
    }

    /// Retrieve the chunks nearest to `vector`, best first.
    fn retrieve(&self, vector: &[f32]) -> Result<Vec<&Chunk>, Box<dyn Error>> {
        let hits = self.store.search(vector, self.config.top_k)?;
        debug!("Retrieved {} neighbors", hits.len());

        Ok(hits
            .into_iter()
            .filter_map(|(id, _distance)| self.store.chunk(id))
            .collect())
    }

    /// Number of indexed chunks.
    pub fn indexed_chunks(&self) -> usize {
        self.store.len()
    }
}

impl QueryEngine for DocumentQueryEngine {
    async fn query(&mut self, prompt: &str) -> Result<String, Box<dyn Error>> {
        let query_vectors = api::embed(
            &self.embedding_client,
            &self.config.embedding_model,
            vec![prompt.to_string()],
        )
        .await?;
        let query_vector = query_vectors
            .first()
            .ok_or("Embedding endpoint returned no vector for the query")?;

        let context_chunks = self.retrieve(query_vector)?;
        let context: Vec<&str> = context_chunks.iter().map(|c| c.text.as_str()).collect();

        let messages = api::build_messages(&self.config.system_prompt, &context, prompt);
        api::fetch_completion(&self.chat_client, &self.config, messages).await
    }
}

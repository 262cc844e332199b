//! # Chunker
//!
//! Splits extracted document text into passages small enough to embed and to
//! stuff into a completion prompt. Splitting respects paragraph boundaries
//! where it can: paragraphs are packed greedily into chunks of at most
//! `max_tokens` tokens (counted with `tiktoken_rs::cl100k_base`), and a
//! paragraph that alone exceeds the budget is hard-split on word boundaries.
//!
//! The whole input is covered, in order, and no empty chunks are produced.

use std::error::Error;
use tiktoken_rs::{CoreBPE, cl100k_base};

/// One indexed passage of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// The passage text.
    pub text: String,
}

impl Chunk {
    pub fn new(text: String) -> Self {
        Self { text }
    }
}

fn token_count(bpe: &CoreBPE, text: &str) -> usize {
    bpe.encode_with_special_tokens(text).len()
}

/// Hard-split a paragraph that exceeds the budget on its own, packing words
/// greedily. A single word larger than the budget still becomes its own piece.
fn split_oversized(bpe: &CoreBPE, paragraph: &str, max_tokens: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for word in paragraph.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if !current.is_empty() && token_count(bpe, &candidate) > max_tokens {
            pieces.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

/// Split `text` into chunks of at most `max_tokens` tokens each.
///
/// # Parameters
/// - `text`: Full document text.
/// - `max_tokens`: Token budget per chunk (the default configuration uses 512).
///
/// # Returns
/// The ordered list of chunks. Empty or whitespace-only input yields an empty
/// list; callers decide whether that is an error.
///
/// # Errors
/// Returns an error if the tokenizer fails to initialize.
pub fn chunk_text(text: &str, max_tokens: usize) -> Result<Vec<Chunk>, Box<dyn Error>> {
    let bpe = cl100k_base()?;

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut current = String::new();

    let paragraphs = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty());

    for paragraph in paragraphs {
        let pieces = if token_count(&bpe, paragraph) > max_tokens {
            split_oversized(&bpe, paragraph, max_tokens)
        } else {
            vec![paragraph.to_string()]
        };

        for piece in pieces {
            let candidate = if current.is_empty() {
                piece.clone()
            } else {
                format!("{current}\n\n{piece}")
            };

            if !current.is_empty() && token_count(&bpe, &candidate) > max_tokens {
                chunks.push(Chunk::new(std::mem::take(&mut current)));
                current = piece;
            } else {
                current = candidate;
            }
        }
    }

    if !current.is_empty() {
        chunks.push(Chunk::new(current));
    }

    tracing::debug!("Chunked document into {} chunks", chunks.len());
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = chunk_text("A short paragraph.", 512).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "A short paragraph.");
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunks = chunk_text("   \n\n  \n", 512).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_paragraphs_pack_into_budget() {
        let text = "First paragraph.\n\nSecond paragraph.\n\nThird paragraph.";
        let chunks = chunk_text(text, 512).unwrap();
        // All three fit comfortably into one 512-token chunk.
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].text.contains("First paragraph."));
        assert!(chunks[0].text.contains("Third paragraph."));
    }

    #[test]
    fn test_chunks_respect_token_budget() {
        let bpe = cl100k_base().unwrap();
        let text = (0..200)
            .map(|i| format!("Sentence number {i} about something in the document."))
            .collect::<Vec<_>>()
            .join("\n\n");

        let chunks = chunk_text(&text, 64).unwrap();
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(token_count(&bpe, &chunk.text) <= 64);
            assert!(!chunk.text.trim().is_empty());
        }
    }

    #[test]
    fn test_oversized_paragraph_is_hard_split() {
        // One giant paragraph with no blank lines.
        let paragraph = (0..500)
            .map(|i| format!("word{i}"))
            .collect::<Vec<_>>()
            .join(" ");

        let chunks = chunk_text(&paragraph, 32).unwrap();
        assert!(chunks.len() > 1);

        // Order and coverage: reassembling the chunks gives back every word.
        let rejoined = chunks
            .iter()
            .map(|c| c.text.replace("\n\n", " "))
            .collect::<Vec<_>>()
            .join(" ");
        assert!(rejoined.starts_with("word0 "));
        assert!(rejoined.ends_with("word499"));
    }
}

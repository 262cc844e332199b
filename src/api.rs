//! # API Module
//!
//! This module handles interactions with the OpenAI-compatible endpoints: one
//! for chat completions and one for embeddings.
//!
//! It provides functions to create clients from configuration, embed batches
//! of text, build the retrieval prompt, and fetch a single non-streaming
//! completion. Remote failures (auth, timeout, malformed response) are not
//! handled here; they propagate to the caller.

use crate::config::AskPdfConfig;
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        chat::{
            ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
            ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
            ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs,
        },
        embeddings::CreateEmbeddingRequestArgs,
    },
};
use std::error::Error;

use tracing::debug;

/// Creates a client for the chat-completion endpoint.
pub fn create_client(config: &AskPdfConfig) -> Client<OpenAIConfig> {
    let openai_config = OpenAIConfig::new()
        .with_api_key(config.api_key.clone())
        .with_api_base(config.api_base.clone());
    debug!("Chat client created with config: {:?}", openai_config);
    Client::with_config(openai_config)
}

/// Creates a client for the embedding endpoint.
///
/// The embedding service may live at a different base URL than the chat
/// service; credentials are shared.
pub fn create_embedding_client(config: &AskPdfConfig) -> Client<OpenAIConfig> {
    let openai_config = OpenAIConfig::new()
        .with_api_key(config.api_key.clone())
        .with_api_base(config.embedding_api_base.clone());
    debug!("Embedding client created with config: {:?}", openai_config);
    Client::with_config(openai_config)
}

/// Embed a batch of texts in a single request.
///
/// # Returns
/// One vector per input, in input order.
///
/// # Errors
/// - Remote API errors.
/// - A response carrying a different number of embeddings than inputs.
pub async fn embed(
    client: &Client<OpenAIConfig>,
    model: &str,
    inputs: Vec<String>,
) -> Result<Vec<Vec<f32>>, Box<dyn Error>> {
    let expected = inputs.len();

    let request = CreateEmbeddingRequestArgs::default()
        .model(model)
        .input(inputs)
        .build()?;

    debug!("Sending embedding request for {} inputs", expected);
    let response = client.embeddings().create(request).await?;

    let mut data = response.data;
    data.sort_by_key(|e| e.index);
    let vectors: Vec<Vec<f32>> = data.into_iter().map(|e| e.embedding).collect();

    if vectors.len() != expected {
        return Err(format!(
            "Embedding endpoint returned {} vectors for {} inputs",
            vectors.len(),
            expected
        )
        .into());
    }

    Ok(vectors)
}

/// Build the message list for one retrieval-augmented question.
///
/// The system prompt comes from configuration; the user message carries the
/// retrieved context block followed by the query.
pub fn build_messages(
    system_prompt: &str,
    context_chunks: &[&str],
    question: &str,
) -> Vec<ChatCompletionRequestMessage> {
    let context = context_chunks.join("\n\n");

    let user_content = format!(
        "Context information is below.\n\
         ---------------------\n\
         {context}\n\
         ---------------------\n\
         Given the context information and not prior knowledge, answer the query.\n\
         Query: {question}\n\
         Answer:"
    );

    vec![
        ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
            content: ChatCompletionRequestSystemMessageContent::Text(system_prompt.to_string()),
            name: None,
        }),
        ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(user_content),
            name: None,
        }),
    ]
}

/// Fetch a single completion, streaming disabled.
///
/// # Parameters
/// - `client`: Chat endpoint client.
/// - `config`: Supplies model name and token limit.
/// - `messages`: Full message list for the request.
///
/// # Returns
/// The assistant's response text, concatenated across choices.
pub async fn fetch_completion(
    client: &Client<OpenAIConfig>,
    config: &AskPdfConfig,
    messages: Vec<ChatCompletionRequestMessage>,
) -> Result<String, Box<dyn Error>> {
    let request = CreateChatCompletionRequestArgs::default()
        .max_tokens(config.max_response_tokens)
        .model(config.model.clone())
        .messages(messages)
        .stream(false)
        .build()?;

    debug!("Sending request: {:?}", request);

    let response = client.chat().create(request).await?;

    let mut response_string = String::new();
    response.choices.iter().for_each(|chat_choice| {
        if let Some(ref message_text) = chat_choice.message.content {
            response_string.push_str(message_text);
        }
    });

    Ok(response_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_config() -> AskPdfConfig {
        AskPdfConfig {
            api_key: "mock_api_key".to_string(),
            api_base: "http://mock.api.base/v1".to_string(),
            embedding_api_base: "http://mock.api.base/v1".to_string(),
            model: "mock_model".to_string(),
            embedding_model: "mock_embedding_model".to_string(),
            ..AskPdfConfig::default()
        }
    }

    #[test]
    fn test_create_clients() {
        let config = mock_config();
        let _chat = create_client(&config);
        let _embedding = create_embedding_client(&config);
    }

    #[test]
    fn test_build_messages_shape() {
        let messages = build_messages(
            "Follow instructions.",
            &["First passage.", "Second passage."],
            "What is the abstract about?",
        );
        assert_eq!(messages.len(), 2);

        match &messages[0] {
            ChatCompletionRequestMessage::System(system) => {
                let ChatCompletionRequestSystemMessageContent::Text(text) = &system.content else {
                    panic!("system content is not text");
                };
                assert_eq!(text, "Follow instructions.");
            }
            other => panic!("unexpected first message: {other:?}"),
        }

        match &messages[1] {
            ChatCompletionRequestMessage::User(user) => {
                let ChatCompletionRequestUserMessageContent::Text(text) = &user.content else {
                    panic!("user content is not text");
                };
                assert!(text.contains("First passage."));
                assert!(text.contains("Second passage."));
                assert!(text.contains("Query: What is the abstract about?"));
            }
            other => panic!("unexpected second message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_embed_against_mock_server() {
        use httpmock::prelude::*;

        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/v1/embeddings");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::json!({
                    "object": "list",
                    "model": "mock_embedding_model",
                    "data": [
                        { "object": "embedding", "index": 1, "embedding": [0.4, 0.5, 0.6] },
                        { "object": "embedding", "index": 0, "embedding": [0.1, 0.2, 0.3] }
                    ],
                    "usage": { "prompt_tokens": 4, "total_tokens": 4 }
                }));
        });

        let mut config = mock_config();
        config.embedding_api_base = server.url("/v1");

        let client = create_embedding_client(&config);
        let vectors = embed(
            &client,
            &config.embedding_model,
            vec!["first".to_string(), "second".to_string()],
        )
        .await
        .unwrap();

        mock.assert();
        // Out-of-order response data is re-sorted by index.
        assert_eq!(vectors, vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]]);
    }

    #[tokio::test]
    async fn test_fetch_completion_against_mock_server() {
        use httpmock::prelude::*;

        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .json_body_includes(r#"{ "model": "mock_model", "stream": false }"#.to_string());
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::json!({
                    "id": "chatcmpl-1",
                    "object": "chat.completion",
                    "created": 1700000000,
                    "model": "mock_model",
                    "choices": [{
                        "index": 0,
                        "message": { "role": "assistant", "content": "The abstract is about birds." },
                        "finish_reason": "stop"
                    }],
                    "usage": { "prompt_tokens": 10, "completion_tokens": 6, "total_tokens": 16 }
                }));
        });

        let mut config = mock_config();
        config.api_base = server.url("/v1");

        let client = create_client(&config);
        let messages = build_messages(&config.system_prompt, &["context"], "question");
        let answer = fetch_completion(&client, &config, messages).await.unwrap();

        mock.assert();
        assert_eq!(answer, "The abstract is about birds.");
    }

    #[tokio::test]
    async fn test_fetch_completion_propagates_api_error() {
        use httpmock::prelude::*;

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(401)
                .header("content-type", "application/json")
                .json_body(serde_json::json!({
                    "error": {
                        "message": "Invalid API key",
                        "type": "invalid_request_error",
                        "param": null,
                        "code": "invalid_api_key"
                    }
                }));
        });

        let mut config = mock_config();
        config.api_base = server.url("/v1");

        let client = create_client(&config);
        let messages = build_messages(&config.system_prompt, &[], "question");
        let result = fetch_completion(&client, &config, messages).await;
        assert!(result.is_err());
    }
}

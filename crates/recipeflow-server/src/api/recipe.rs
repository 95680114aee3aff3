//! Recipe streaming relay: one upstream completion per connection, forwarded
//! to the browser as SSE events.

use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Sse, sse::Event},
};
use futures::StreamExt;
use recipeflow_ai::{CompletionRequest, FinishReason, Message, RecipeParams, Role, StreamChunk};
use serde::Serialize;

use crate::api::state::AppState;

/// Downstream event vocabulary sent to the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum RecipeEvent {
    Start,
    Chunk {
        #[serde(skip_serializing_if = "Option::is_none")]
        chunk: Option<String>,
    },
    Close,
}

/// Map one upstream chunk to its downstream event. First match wins: a
/// "stop" finish reason closes the stream, an assistant role marker with no
/// content announces the start, and everything else is forwarded as a
/// fragment (absent and empty fragments included).
pub fn map_chunk(chunk: StreamChunk) -> RecipeEvent {
    if chunk.finish_reason == Some(FinishReason::Stop) {
        RecipeEvent::Close
    } else if chunk.role == Some(Role::Assistant) && chunk.text.as_deref().unwrap_or("").is_empty()
    {
        RecipeEvent::Start
    } else {
        RecipeEvent::Chunk { chunk: chunk.text }
    }
}

// GET /recipeStream
//
// Events are emitted in upstream arrival order, one `data: <JSON>` frame per
// chunk, flushed as produced. A `close` event ends the stream; an upstream
// error ends it without one (the fragments already sent stand as the only
// output). Client disconnect drops this stream, which drops the upstream
// call with it.
pub async fn stream_recipe(
    State(state): State<AppState>,
    Query(params): Query<RecipeParams>,
) -> impl IntoResponse {
    tracing::info!(model = state.llm.model(), "Recipe stream requested");

    let prompt = params.build_prompt();
    let request = CompletionRequest::new(vec![Message::system(prompt)]).with_temperature(1.0);
    let llm = state.llm.clone();

    let stream = async_stream::stream! {
        let mut upstream = llm.complete_stream(request);
        while let Some(item) = upstream.next().await {
            match item {
                Ok(chunk) => {
                    let event = map_chunk(chunk);
                    let closing = matches!(event, RecipeEvent::Close);
                    match Event::default().json_data(&event) {
                        Ok(frame) => yield Ok::<_, Infallible>(frame),
                        Err(e) => {
                            tracing::error!("Failed to serialize recipe event: {}", e);
                            break;
                        }
                    }
                    if closing {
                        tracing::debug!("Recipe stream closed normally");
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Error fetching data from OpenAI API: {}", e);
                    break;
                }
            }
        }
    };

    ([(header::CONNECTION, "keep-alive")], Sse::new(stream))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_json(event: &RecipeEvent, expected: &str) {
        assert_eq!(serde_json::to_string(event).unwrap(), expected);
    }

    #[test]
    fn stop_maps_to_close() {
        let event = map_chunk(StreamChunk::finished(FinishReason::Stop));
        assert_eq!(event, RecipeEvent::Close);
    }

    #[test]
    fn assistant_role_marker_maps_to_start() {
        let event = map_chunk(StreamChunk::role_marker(Role::Assistant));
        assert_eq!(event, RecipeEvent::Start);

        // The provider sends the marker with an empty content field
        let marker = StreamChunk {
            role: Some(Role::Assistant),
            text: Some(String::new()),
            finish_reason: None,
        };
        assert_eq!(map_chunk(marker), RecipeEvent::Start);
    }

    #[test]
    fn fragments_map_to_chunk_verbatim() {
        let event = map_chunk(StreamChunk::text("2 cups flour"));
        assert_eq!(
            event,
            RecipeEvent::Chunk {
                chunk: Some("2 cups flour".into())
            }
        );

        // Empty fragments are forwarded, not dropped
        let event = map_chunk(StreamChunk::text(""));
        assert_eq!(
            event,
            RecipeEvent::Chunk {
                chunk: Some(String::new())
            }
        );
    }

    #[test]
    fn non_stop_finish_reason_maps_to_empty_chunk() {
        // Only "stop" closes the stream; other terminal reasons fall through
        // to a fragment with no payload, matching the upstream contract.
        let event = map_chunk(StreamChunk::finished(FinishReason::MaxTokens));
        assert_eq!(event, RecipeEvent::Chunk { chunk: None });
    }

    #[test]
    fn wire_shapes() {
        assert_json(&RecipeEvent::Start, r#"{"action":"start"}"#);
        assert_json(
            &RecipeEvent::Chunk {
                chunk: Some("basil".into()),
            },
            r#"{"action":"chunk","chunk":"basil"}"#,
        );
        assert_json(&RecipeEvent::Chunk { chunk: None }, r#"{"action":"chunk"}"#);
        assert_json(&RecipeEvent::Close, r#"{"action":"close"}"#);
    }
}

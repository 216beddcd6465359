//! OpenAI vision chat completions
//!
//! The image is sent grayscale as a JPEG data URL next to the numbered
//! question list. Cost is estimated from `usage.total_tokens` at $0.01 per
//! 1K tokens (vision pricing calculator, https://openai.com/pricing).

use super::image::{prepare_image, ImageOptions};
use super::prompt::{build_user_message, SYSTEM_MESSAGE};
use super::ProviderReply;
use crate::config::OpenAiConfig;
use crate::error::{EvalError, Result};
use crate::eval::parse_answers;
use crate::metrics::METRICS;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// USD per 1K tokens
const PRICE_PER_1K_TOKENS: f64 = 0.01;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u64,
}

/// Estimated USD cost for a completion
pub fn estimate_cost(total_tokens: u64) -> f64 {
    (total_tokens as f64 / 1000.0) * PRICE_PER_1K_TOKENS
}

/// Ask `questions` about the image at `path`
pub async fn ask(
    http: &Client,
    config: &OpenAiConfig,
    api_key: &SecretString,
    path: &Path,
    questions: &[String],
) -> Result<ProviderReply> {
    let image = prepare_image(
        path,
        ImageOptions {
            grayscale: true,
            upscale_small: false,
        },
    )?;

    let user_message = build_user_message(questions);
    let request = ChatCompletionRequest {
        model: config.model.clone(),
        messages: vec![
            ChatMessage {
                role: "system",
                content: MessageContent::Text(SYSTEM_MESSAGE.to_string()),
            },
            ChatMessage {
                role: "user",
                content: MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: user_message.trim().to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_url(),
                        },
                    },
                ]),
            },
        ],
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };

    let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
    debug!("Calling OpenAI chat completions: model={}, {} questions", config.model, questions.len());

    let start = Instant::now();
    let response = http
        .post(&url)
        .bearer_auth(api_key.expose_secret())
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(EvalError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    let completion: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|e| EvalError::InvalidResponse(e.to_string()))?;
    let elapsed = start.elapsed();
    info!("Time taken: {:.2} seconds", elapsed.as_secs_f64());

    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| EvalError::InvalidResponse("No choices in response".to_string()))?;

    let cost_usd = estimate_cost(completion.usage.total_tokens);
    METRICS.record_cost("openai", cost_usd);
    info!("TOTAL COST: {}", cost_usd);
    info!("RAW CONTENT\n{}", content);

    let answers = parse_answers(&content, questions.len())?;

    Ok(ProviderReply::from_texts(answers, cost_usd, elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_cost() {
        assert!((estimate_cost(1000) - 0.01).abs() < 1e-12);
        assert!((estimate_cost(1250) - 0.0125).abs() < 1e-12);
    }

    #[test]
    fn test_request_shape() {
        let request = ChatCompletionRequest {
            model: "gpt-4-vision-preview".to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: MessageContent::Parts(vec![
                    ContentPart::Text { text: "QUESTIONS:\n1. q".to_string() },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: "data:image/jpeg;base64,AA==".to_string() },
                    },
                ]),
            }],
            max_tokens: 2048,
            temperature: 0.1,
        };

        let value = serde_json::to_value(&request).unwrap();
        let parts = &value["messages"][0]["content"];
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/jpeg;base64,AA==");
        assert_eq!(value["max_tokens"], 2048);
    }
}

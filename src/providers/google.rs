//! Vertex AI generative vision (`generateContent`)
//!
//! Small images are upscaled x2 and sent grayscale. Pricing is per character
//! (https://cloud.google.com/vertex-ai/pricing): a flat $0.0025 per image,
//! $0.000125 per 1K input characters, $0.000375 per 1K output characters.

use super::image::{prepare_image, ImageOptions};
use super::prompt::{build_user_message, SYSTEM_MESSAGE};
use super::ProviderReply;
use crate::config::GoogleConfig;
use crate::error::{EvalError, Result};
use crate::eval::parse_answers;
use crate::metrics::METRICS;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

const IMAGE_PRICE: f64 = 0.0025;
const INPUT_PRICE_PER_1K_CHARS: f64 = 0.000125;
const OUTPUT_PRICE_PER_1K_CHARS: f64 = 0.000375;

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: &'static str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Estimated USD cost for one call, from character counts
pub fn estimate_cost(prompt_chars: usize, response_chars: usize) -> f64 {
    IMAGE_PRICE
        + (prompt_chars as f64 / 1000.0) * INPUT_PRICE_PER_1K_CHARS
        + (response_chars as f64 / 1000.0) * OUTPUT_PRICE_PER_1K_CHARS
}

/// Access token from config, else from the gcloud CLI
async fn access_token(config: &GoogleConfig) -> Result<SecretString> {
    if let Some(token) = &config.access_token {
        return Ok(SecretString::new(token.expose_secret().clone()));
    }

    debug!("No Vertex AI access token configured, asking gcloud");
    let output = tokio::process::Command::new("gcloud")
        .args(["auth", "print-access-token"])
        .output()
        .await
        .map_err(|e| EvalError::MissingCredential(format!("gcloud access token: {e}")))?;

    if !output.status.success() {
        return Err(EvalError::MissingCredential(format!(
            "gcloud access token: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(SecretString::new(
        String::from_utf8_lossy(&output.stdout).trim().to_string(),
    ))
}

fn generate_content_url(config: &GoogleConfig, project: &str) -> String {
    format!(
        "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
        config.endpoint(),
        project,
        config.location,
        config.model
    )
}

/// Ask `questions` about the image at `path`
pub async fn ask(
    http: &Client,
    config: &GoogleConfig,
    path: &Path,
    questions: &[String],
) -> Result<ProviderReply> {
    let project = config
        .project
        .as_deref()
        .ok_or_else(|| EvalError::MissingCredential("GOOGLE_CLOUD_PROJECT".to_string()))?;

    let image = prepare_image(
        path,
        ImageOptions {
            grayscale: true,
            upscale_small: true,
        },
    )?;

    let user_message = build_user_message(questions);
    let request = GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![
                Part::Text {
                    text: SYSTEM_MESSAGE.to_string(),
                },
                Part::InlineData {
                    inline_data: Blob {
                        mime_type: "image/jpeg",
                        data: image.to_base64(),
                    },
                },
                Part::Text {
                    text: user_message.clone(),
                },
            ],
        }],
    };

    let token = access_token(config).await?;
    let url = generate_content_url(config, project);
    debug!("Calling Vertex AI generateContent: model={}, {} questions", config.model, questions.len());

    let start = Instant::now();
    let response = http
        .post(&url)
        .bearer_auth(token.expose_secret())
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

    let generated: GenerateContentResponse = response
        .json()
        .await
        .map_err(|e| EvalError::InvalidResponse(e.to_string()))?;
    let elapsed = start.elapsed();
    info!("Time taken: {:.2} seconds", elapsed.as_secs_f64());

    let content: String = generated
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .ok_or_else(|| EvalError::InvalidResponse("No candidates in response".to_string()))?
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    let cost_usd = estimate_cost(
        SYSTEM_MESSAGE.chars().count() + user_message.chars().count(),
        content.chars().count(),
    );
    METRICS.record_cost("google", cost_usd);
    info!("TOTAL COST: {:.5}", cost_usd);
    info!("RAW CONTENT\n{}", content);

    let answers = parse_answers(&content, questions.len())?;

    Ok(ProviderReply::from_texts(answers, cost_usd, elapsed))
}

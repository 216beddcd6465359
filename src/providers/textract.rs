//! AWS Textract AnalyzeDocument with the QUERIES feature
//!
//! Each question becomes one query. Answers are read from the QUERY_RESULT
//! blocks linked to each QUERY block, together with Textract's confidence.
//! Queries are billed at $0.015 per page ($0.025 for custom queries).

use super::{Answer, ProviderReply};
use super::image::{prepare_image, ImageOptions};
use crate::config::TextractConfig;
use crate::error::{EvalError, Result};
use crate::metrics::METRICS;
use aws_sdk_textract::error::DisplayErrorContext;
use aws_sdk_textract::primitives::Blob;
use aws_sdk_textract::types::{
    Block, BlockType, Document, FeatureType, QueriesConfig, Query, RelationshipType,
};
use aws_sdk_textract::Client;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// USD per analysed page
const PRICE_PER_PAGE: f64 = 0.015;

/// Estimated USD cost for `pages` analysed pages; at least one page is billed
pub fn estimate_cost(pages: i32) -> f64 {
    pages.max(1) as f64 * PRICE_PER_PAGE
}

/// Build a Textract client from the named AWS profile
pub async fn build_client(config: &TextractConfig) -> Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .profile_name(&config.profile);

    if let Some(region) = &config.region {
        loader = loader.region(aws_sdk_textract::config::Region::new(region.clone()));
    }

    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    let shared = loader.load().await;
    Client::new(&shared)
}

/// Resolve one answer per question from the returned blocks.
///
/// QUERY blocks are matched to questions by their query text, so the result
/// stays aligned even if Textract reorders blocks.
pub fn collect_query_answers(blocks: &[Block], questions: &[String]) -> Vec<Answer> {
    let by_id: HashMap<&str, &Block> = blocks
        .iter()
        .filter_map(|block| block.id().map(|id| (id, block)))
        .collect();

    let mut by_query: HashMap<&str, Answer> = HashMap::new();
    for block in blocks {
        if block.block_type() != Some(&BlockType::Query) {
            continue;
        }
        let Some(query) = block.query() else {
            continue;
        };

        let result = block
            .relationships()
            .iter()
            .filter(|rel| rel.r#type() == Some(&RelationshipType::Answer))
            .flat_map(|rel| rel.ids())
            .filter_map(|id| by_id.get(id.as_str()))
            .find(|b| b.block_type() == Some(&BlockType::QueryResult));

        let answer = match result {
            Some(result) => Answer {
                text: result.text().map(str::to_string),
                confidence: result.confidence(),
            },
            None => Answer::missing(),
        };
        by_query.entry(query.text()).or_insert(answer);
    }

    questions
        .iter()
        .map(|q| by_query.remove(q.as_str()).unwrap_or_else(Answer::missing))
        .collect()
}

/// Ask `questions` about the image at `path`
pub async fn ask(client: &Client, path: &Path, questions: &[String]) -> Result<ProviderReply> {
    let image = prepare_image(path, ImageOptions::default())?;

    let queries = questions
        .iter()
        .map(|q| {
            Query::builder()
                .text(q)
                .build()
                .map_err(|e| EvalError::RequestFailed(e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    let queries_config = QueriesConfig::builder()
        .set_queries(Some(queries))
        .build()
        .map_err(|e| EvalError::RequestFailed(e.to_string()))?;

    let document = Document::builder().bytes(Blob::new(image.jpeg)).build();

    debug!("Calling Textract AnalyzeDocument with {} queries", questions.len());
    let start = Instant::now();
    let output = client
        .analyze_document()
        .document(document)
        .feature_types(FeatureType::Queries)
        .queries_config(queries_config)
        .send()
        .await
        .map_err(|e| EvalError::RequestFailed(DisplayErrorContext(&e).to_string()))?;
    let elapsed = start.elapsed();
    info!("Time taken: {:.2} seconds", elapsed.as_secs_f64());

    let pages = output
        .document_metadata()
        .and_then(|meta| meta.pages())
        .unwrap_or(1);
    let cost_usd = estimate_cost(pages);
    METRICS.record_cost("textract", cost_usd);
    info!("TOTAL COST: {:.5}", cost_usd);

    let answers = collect_query_answers(output.blocks(), questions);
    for (question, answer) in questions.iter().zip(&answers) {
        match (&answer.text, answer.confidence) {
            (Some(text), Some(confidence)) => {
                info!("{}\n\tAnswer: {}\n\tConfidence: {}", question, text, confidence)
            }
            (Some(text), None) => info!("{}\n\tAnswer: {}", question, text),
            (None, _) => info!("{}\n\tNo Answer", question),
        }
    }

    Ok(ProviderReply {
        answers,
        cost_usd,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_textract::types::Relationship;

    fn query_block(id: &str, text: &str, answer_id: Option<&str>) -> Block {
        let mut builder = Block::builder()
            .block_type(BlockType::Query)
            .id(id)
            .query(Query::builder().text(text).build().unwrap());
        if let Some(answer_id) = answer_id {
            builder = builder.relationships(
                Relationship::builder()
                    .r#type(RelationshipType::Answer)
                    .ids(answer_id)
                    .build(),
            );
        }
        builder.build()
    }

    fn result_block(id: &str, text: &str, confidence: f32) -> Block {
        Block::builder()
            .block_type(BlockType::QueryResult)
            .id(id)
            .text(text)
            .confidence(confidence)
            .build()
    }

    #[test]
    fn test_estimate_cost_per_page() {
        assert!((estimate_cost(1) - 0.015).abs() < 1e-12);
        assert!((estimate_cost(3) - 0.045).abs() < 1e-12);
        // a missing or zero page count bills one page
        assert!((estimate_cost(0) - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_collect_answers_by_query_text() {
        let blocks = vec![
            result_block("r2", "Pfizer", 95.0),
            query_block("q2", "Who is the manufacturer?", Some("r2")),
            query_block("q1", "What is the MI?", Some("r1")),
            result_block("r1", "M", 88.5),
        ];
        let questions = vec![
            "What is the MI?".to_string(),
            "Who is the manufacturer?".to_string(),
        ];

        let answers = collect_query_answers(&blocks, &questions);
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].text.as_deref(), Some("M"));
        assert_eq!(answers[0].confidence, Some(88.5));
        assert_eq!(answers[1].text.as_deref(), Some("Pfizer"));
    }

    #[test]
    fn test_unanswered_query_is_missing() {
        let blocks = vec![query_block("q1", "What is the patient number", None)];
        let questions = vec![
            "What is the patient number".to_string(),
            "MI".to_string(),
        ];

        let answers = collect_query_answers(&blocks, &questions);
        assert_eq!(answers.len(), 2);
        assert!(answers.iter().all(|a| a.text.is_none()));
    }
}

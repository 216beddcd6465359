//! Question/answer pairs, test cases and scoring

use super::parser::{extract_and_format_numbers, Number};
use crate::error::Result;
use crate::metrics::METRICS;
use crate::providers::{Answer, OcrClient, Provider};
use std::path::{Path, PathBuf};
use tracing::info;

/// A question with every acceptable answer string
#[derive(Debug, Clone)]
pub struct QA {
    pub question: String,
    pub valid_answers: Vec<String>,
}

/// How an answer was matched
#[derive(Debug, Clone, PartialEq)]
pub enum MatchKind {
    /// A valid answer appears verbatim in the response
    Literal,
    /// A number extracted from the response matches a valid answer
    Number(Number),
}

impl QA {
    pub fn new(question: impl Into<String>, valid_answers: &[&str]) -> Self {
        Self {
            question: question.into(),
            valid_answers: valid_answers.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// True if any valid answer is a substring of `response`
    pub fn has_answer(&self, response: &str) -> bool {
        self.valid_answers
            .iter()
            .any(|answer| response.contains(answer.as_str()))
    }

    /// Literal containment first, then each extracted number in turn
    pub fn score(&self, response: &str) -> Option<MatchKind> {
        if self.has_answer(response) {
            return Some(MatchKind::Literal);
        }

        extract_and_format_numbers(response)
            .into_iter()
            .find(|n| self.has_answer(&n.to_string()))
            .map(MatchKind::Number)
    }
}

/// Scoring outcome for one question
#[derive(Debug, Clone)]
pub struct QuestionOutcome {
    pub question: String,
    pub answer: Option<String>,
    pub matched: Option<MatchKind>,
}

/// Scoring outcome for one test case
#[derive(Debug, Clone)]
pub struct CaseScore {
    pub marks: usize,
    pub total: usize,
    pub outcomes: Vec<QuestionOutcome>,
}

/// A document image and the questions asked about it
#[derive(Debug, Clone)]
pub struct TestCase {
    pub filename: PathBuf,
    pub qa: Vec<QA>,
}

impl TestCase {
    pub fn new(filename: impl Into<PathBuf>, qa: Vec<QA>) -> Self {
        Self {
            filename: filename.into(),
            qa,
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.qa.iter().map(|qa| qa.question.clone()).collect()
    }

    /// Score answers aligned by position with `self.qa`.
    ///
    /// Callers guarantee `answers.len() == self.qa.len()`; a missing answer
    /// never matches.
    pub fn score(&self, answers: &[Answer]) -> CaseScore {
        let outcomes: Vec<QuestionOutcome> = self
            .qa
            .iter()
            .zip(answers)
            .map(|(qa, answer)| QuestionOutcome {
                question: qa.question.clone(),
                answer: answer.text.clone(),
                matched: answer.text.as_deref().and_then(|text| qa.score(text)),
            })
            .collect();

        CaseScore {
            marks: outcomes.iter().filter(|o| o.matched.is_some()).count(),
            total: self.qa.len(),
            outcomes,
        }
    }

    /// Ask every question in one provider call and score the answers
    pub async fn run(
        &self,
        client: &OcrClient,
        provider: Provider,
        data_dir: &Path,
        suite: &str,
    ) -> Result<CaseScore> {
        let image = data_dir.join(&self.filename);
        let questions = self.questions();
        info!("Running test for {}", image.display());
        info!("Questions: {:?}", questions);

        let answers = client.ocr(provider, &image, &questions).await?;
        let score = self.score(&answers);

        for (i, outcome) in score.outcomes.iter().enumerate() {
            let answer = outcome.answer.as_deref().unwrap_or("No Answer");
            info!("Answer for QA {}: {}", i + 1, answer);
            match &outcome.matched {
                Some(kind) => {
                    info!(
                        "Found valid answer for QA {}: question={:?} valid_answers={:?} match={:?}",
                        i + 1,
                        outcome.question,
                        self.qa[i].valid_answers,
                        kind
                    );
                }
                None => info!("No valid answer for QA {}", i + 1),
            }
            METRICS.record_answer(suite, outcome.matched.is_some());
        }

        Ok(score)
    }
}

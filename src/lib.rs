//! Document question-answering evaluation harness
//!
//! Sends fixed question lists about document images (receipts, truck
//! tickets, vaccination cards, insurance cards, mortgage notes, paystubs) to
//! AWS Textract, OpenAI vision chat or Vertex AI, and scores the answers
//! against known values.

pub mod config;
pub mod documents;
pub mod error;
pub mod eval;
pub mod metrics;
pub mod providers;

pub use config::Config;
pub use documents::DocumentKind;
pub use error::{EvalError, Result};
pub use eval::{run_suites, Suite, SuiteReport, TestCase, QA};
pub use providers::{Answer, OcrClient, Provider};

//! Scoring harness
//!
//! Fixtures pair each question with its acceptable answers; a question scores
//! when an acceptable answer appears in the provider's answer, either
//! verbatim or via a number extracted from it.

pub mod parser;
pub mod qa;
pub mod runner;
pub mod suites;

pub use parser::{extract_and_format_numbers, parse_answers, parse_response, Number};
pub use qa::{CaseScore, MatchKind, QuestionOutcome, TestCase, QA};
pub use runner::{run_suites, SuiteReport};
pub use suites::Suite;

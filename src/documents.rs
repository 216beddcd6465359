//! Document kinds and their ad hoc query sets

use crate::error::EvalError;
use crate::eval::Suite;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Textract query list for the vaccination card.
///
/// The first two name the label explicitly; without it Textract returns the
/// first name it encounters rather than the labelled field.
pub const VACCINATION_QUERIES: &[&str] = &[
    "What is the label first name value",
    "What is the label last name value",
    "Which clinic site was the 1st dose COVID-19 administrated?",
    "Who is the manufacturer for 1st dose of COVID-19?",
    "What is the date for the 2nd dose covid-19?",
    "What is the patient number",
    "Who is the manufacturer for 2nd dose of COVID-19?",
    "Which clinic site was the 2nd dose covid-19 administrated?",
    "What is the lot number for 2nd dose covid-19?",
    "What is the date for the 1st dose covid-19?",
    "What is the lot number for 1st dose covid-19?",
    "What is the MI?",
    "MI",
];

/// Kind of document an image holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Receipt,
    TruckTicket,
    Vaccination,
    Insurance,
    Mortgage,
    Paystub,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 6] = [
        Self::Receipt,
        Self::TruckTicket,
        Self::Vaccination,
        Self::Insurance,
        Self::Mortgage,
        Self::Paystub,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receipt => "receipt",
            Self::TruckTicket => "truckticket",
            Self::Vaccination => "vaccination",
            Self::Insurance => "insurance",
            Self::Mortgage => "mortgage",
            Self::Paystub => "paystub",
        }
    }

    /// Suite whose fixtures cover this kind
    pub fn suite(&self) -> Suite {
        match self {
            Self::Receipt => Suite::Receipts,
            Self::TruckTicket => Suite::TruckTickets,
            Self::Vaccination => Suite::Vaccination,
            Self::Insurance => Suite::Insurance,
            Self::Mortgage => Suite::Mortgage,
            Self::Paystub => Suite::Paystub,
        }
    }

    /// Fixed query set for ad hoc extraction.
    ///
    /// Vaccination uses the Textract query list; every other kind asks the
    /// questions of its first suite fixture.
    pub fn queries(&self) -> Vec<String> {
        if *self == Self::Vaccination {
            return VACCINATION_QUERIES.iter().map(|q| q.to_string()).collect();
        }

        self.suite()
            .cases()
            .first()
            .map(|case| case.questions())
            .unwrap_or_default()
    }

    /// Fixture image path, relative to the data directory
    pub fn default_image(&self) -> PathBuf {
        let relative = match self {
            Self::Receipt => "receipts/grocery1.jpg",
            Self::TruckTicket => "trucktickets/1.webp",
            Self::Vaccination => "aws/vaccination.jpg",
            Self::Insurance => "aws/insurance.png",
            Self::Mortgage => "aws/mortgage.jpg",
            Self::Paystub => "aws/paystub.jpg",
        };
        PathBuf::from(relative)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "receipt" | "receipts" => Ok(Self::Receipt),
            "truckticket" | "truck-ticket" | "trucktickets" => Ok(Self::TruckTicket),
            "vaccination" => Ok(Self::Vaccination),
            "insurance" => Ok(Self::Insurance),
            "mortgage" => Ok(Self::Mortgage),
            "paystub" => Ok(Self::Paystub),
            _ => Err(EvalError::UnknownDocumentType(s.to_string())),
        }
    }
}

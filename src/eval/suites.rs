//! Fixture suites: document images with their expected answers
//!
//! Paths are relative to the configured data directory. Some fixtures are
//! known to score poorly and are kept as-is:
//! - the truck ticket questions are not valid for the sample ticket
//! - the label-based name questions are only reliable on Textract when the
//!   label is spelled out

use super::qa::{TestCase, QA};
use std::fmt;

/// A named group of test cases sharing a document category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    Receipts,
    TruckTickets,
    Vaccination,
    Mortgage,
    Insurance,
    Paystub,
}

impl Suite {
    /// Execution order
    pub const ALL: [Suite; 6] = [
        Self::Receipts,
        Self::TruckTickets,
        Self::Vaccination,
        Self::Mortgage,
        Self::Insurance,
        Self::Paystub,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Receipts => "Receipt Tests",
            Self::TruckTickets => "Truck Ticket Tests",
            Self::Vaccination => "Vaccination Tests",
            Self::Mortgage => "Mortgage Tests",
            Self::Insurance => "Insurance Tests",
            Self::Paystub => "Paystub Tests",
        }
    }

    pub fn cases(&self) -> Vec<TestCase> {
        match self {
            Self::Receipts => receipt_tests(),
            Self::TruckTickets => truck_ticket_tests(),
            Self::Vaccination => vaccination_tests(),
            Self::Mortgage => mortgage_tests(),
            Self::Insurance => insurance_tests(),
            Self::Paystub => paystub_tests(),
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn bill_total(filename: &str, total: &str) -> TestCase {
    TestCase::new(
        format!("receipts/{filename}"),
        vec![QA::new("What is the bill total?", &[total])],
    )
}

fn receipt_tests() -> Vec<TestCase> {
    vec![
        bill_total("grocery1.jpg", "203.07"),
        bill_total("img1.png", "1591600"),
        bill_total("img3.png", "75000"),
        bill_total("img4.png", "93500"),
        bill_total("img5.png", "54000"),
        bill_total("img6.png", "365000"),
        bill_total("img7.png", "17000"),
        bill_total("img8.png", "47000"),
        bill_total("img10.png", "20"),
        bill_total("img12.png", "48"),
    ]
}

fn truck_ticket_tests() -> Vec<TestCase> {
    vec![TestCase::new(
        "trucktickets/1.webp",
        vec![
            QA::new("What is the net payload?", &["13180"]),
            QA::new(
                "What is the net payload unit?",
                &["kg", "KG", "kilograms", "Kilograms"],
            ),
            QA::new("What is the gross payload?", &["32350"]),
            QA::new("What is the ticket number?", &["22837"]),
            QA::new("What is the license plate?", &["6637DN"]),
            QA::new("What is the truck identifier?", &["BERTRAM14"]),
            QA::new(
                "What is the material being delivered?",
                &["BOULDERS", "GRANITE / LIMESTONE BOULDERS"],
            ),
            QA::new("How many loads were delivered so far?", &["9"]),
        ],
    )]
}

// Textract queries: $0.015 per page, $0.025 for custom queries
fn vaccination_tests() -> Vec<TestCase> {
    vec![TestCase::new(
        "aws/vaccination.jpg",
        vec![
            QA::new("What is the label first name value", &["Major"]),
            QA::new("What is the label last name value", &["Mary"]),
            QA::new(
                "Which clinic site was the 1st dose COVID-19 administrated?",
                &["XYZ"],
            ),
            QA::new("Who is the manufacturer for 1st dose of COVID-19?", &["Pfizer"]),
            QA::new(
                "What is the date for the 2nd dose covid-19?",
                &["2/8/2021", "2021-02-08", "February 8, 2021"],
            ),
            QA::new("What is the patient number", &["012345abcd67"]),
            QA::new("Who is the manufacturer for 2nd dose of COVID-19?", &["Pfizer"]),
            QA::new(
                "Which clinic site was the 2nd dose covid-19 administrated?",
                &["CVS"],
            ),
            QA::new("What is the lot number for 2nd dose covid-19?", &["BB5678"]),
            QA::new(
                "What is the date for the 1st dose covid-19?",
                &["1/18/21", "2021-01-18", "January 18, 2021"],
            ),
            QA::new("What is the lot number for 1st dose covid-19?", &["AA1234"]),
            QA::new("What is the MI?", &["M"]),
            QA::new("MI?", &["M"]),
        ],
    )]
}

fn insurance_tests() -> Vec<TestCase> {
    vec![TestCase::new(
        "aws/insurance.png",
        vec![
            QA::new("What is the insured name?", &["Jacob Michael"]),
            QA::new("What is the level of benefits?", &["SILVER", "Silver"]),
            QA::new("What is medical insurance provider?", &["AnyInsurance Co."]),
            QA::new("What is the OOP max?", &["$6000/$12000"]),
            QA::new(
                "What is the effective date?",
                &["11/02/2021", "2021-11-02", "November 2, 2021"],
            ),
            QA::new("What is the office visit copay?", &["$55/0%", "55"]),
            QA::new("What is the specialist visit copay?", &["$65/0%", "65"]),
            QA::new("What is the member id?", &["XZ 9147589652"]),
            QA::new("What is the plan type?", &["AnyPlan X-EPO"]),
            QA::new("What is the coinsurance amount?", &["30%"]),
        ],
    )]
}

fn mortgage_tests() -> Vec<TestCase> {
    const PAYMENT_START: &[&str] = &["April, 2022", "4/2022", "April 1, 2022", "4/1/22"];

    vec![TestCase::new(
        "aws/mortgage.jpg",
        vec![
            QA::new("When is this document dated?", &["March 4, 2022", "3/4/22"]),
            QA::new("What is the note date?", &["March 4, 2022", "3/4/22"]),
            QA::new(
                "When is the Maturity date the borrower has to pay in full?",
                &["April, 2032", "4/2032", "April 1, 2032", "4/1/32"],
            ),
            QA::new("What is the note city and state?", &["Anytown, ZZ"]),
            QA::new("What is the yearly interest rate?", &["4.150%", "4.150"]),
            QA::new("Who is the lender?", &["AnyCompany"]),
            QA::new("When does payments begin?", PAYMENT_START),
            QA::new("What is the beginning date of payment?", PAYMENT_START),
            QA::new("What is the initial monthly payments?", &["2500"]),
            QA::new("What is the interest rate?", &["4.150%", "4.150"]),
            QA::new(
                "What is the principal amount borrower has to pay?",
                &["500000"],
            ),
        ],
    )]
}

fn paystub_tests() -> Vec<TestCase> {
    vec![TestCase::new(
        "aws/paystub.jpg",
        vec![
            QA::new(
                "What is the year to date gross pay",
                &["23526.80", "$23526.80", "23526.8", "$23526.8"],
            ),
            QA::new("What is the current gross pay", &["452.43", "$452.43"]),
        ],
    )]
}

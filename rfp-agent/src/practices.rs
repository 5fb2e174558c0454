//! The RFP best-practice vocabulary.
//!
//! Every suggestion is annotated with the practices its text appears to
//! apply. Detection is a case-insensitive keyword match and is advisory
//! only: a tag means a keyword was found, not that the practice was
//! actually followed.

use serde::{Deserialize, Serialize};

/// A best-practice tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BestPractice {
    Clarity,
    MeasurableOutcomes,
    StakeholderNeeds,
    VendorResponsibilities,
    TimelineBudget,
    TechnicalSpecifications,
}

impl BestPractice {
    /// All tags, in the order they are reported.
    pub const ALL: [BestPractice; 6] = [
        BestPractice::Clarity,
        BestPractice::MeasurableOutcomes,
        BestPractice::StakeholderNeeds,
        BestPractice::VendorResponsibilities,
        BestPractice::TimelineBudget,
        BestPractice::TechnicalSpecifications,
    ];

    /// Wire name of the tag.
    pub fn as_str(self) -> &'static str {
        match self {
            BestPractice::Clarity => "clarity",
            BestPractice::MeasurableOutcomes => "measurable_outcomes",
            BestPractice::StakeholderNeeds => "stakeholder_needs",
            BestPractice::VendorResponsibilities => "vendor_responsibilities",
            BestPractice::TimelineBudget => "timeline_budget",
            BestPractice::TechnicalSpecifications => "technical_specifications",
        }
    }

    /// Lowercase keywords whose presence marks the practice as applied.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            BestPractice::Clarity => &["clear", "unambiguous", "specific", "well-defined"],
            BestPractice::MeasurableOutcomes => &["measurable", "quantifiable", "kpi", "metrics"],
            BestPractice::StakeholderNeeds => &["stakeholder", "user needs", "requirements"],
            BestPractice::VendorResponsibilities => &["responsibility", "role", "duties"],
            BestPractice::TimelineBudget => &[
                "timeline",
                "schedule",
                "milestone",
                "deadline",
                "budget",
                "cost",
                "payment",
                "financial",
            ],
            BestPractice::TechnicalSpecifications => &[
                "technical",
                "integration",
                "security",
                "compliance",
                "specification",
            ],
        }
    }

    fn heading(self) -> &'static str {
        match self {
            BestPractice::Clarity => "CLARITY & SCOPE",
            BestPractice::MeasurableOutcomes => "MEASURABLE OUTCOMES",
            BestPractice::StakeholderNeeds => "STAKEHOLDER NEEDS",
            BestPractice::VendorResponsibilities => "VENDOR RESPONSIBILITIES",
            BestPractice::TimelineBudget => "TIMELINE & BUDGET",
            BestPractice::TechnicalSpecifications => "TECHNICAL SPECIFICATIONS",
        }
    }

    fn checklist(self) -> &'static [&'static str] {
        match self {
            BestPractice::Clarity => &[
                "Clear, unambiguous objectives and goals",
                "Well-defined scope of work",
                "Specific deliverables and outcomes",
            ],
            BestPractice::MeasurableOutcomes => &[
                "Quantifiable success metrics",
                "Key Performance Indicators (KPIs)",
                "Evaluation criteria",
            ],
            BestPractice::StakeholderNeeds => &[
                "Identified stakeholders and their requirements",
                "User needs and pain points",
                "Business requirements",
            ],
            BestPractice::VendorResponsibilities => &[
                "Clear vendor roles and responsibilities",
                "Required qualifications and experience",
                "Performance expectations",
            ],
            BestPractice::TimelineBudget => &[
                "Realistic project timeline",
                "Budget constraints and payment terms",
                "Milestone definitions",
            ],
            BestPractice::TechnicalSpecifications => &[
                "Detailed technical requirements",
                "Integration requirements",
                "Security and compliance needs",
            ],
        }
    }
}

impl std::fmt::Display for BestPractice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guidance-only checklist section. It never yields a tag.
const EXAMPLES_HEADING: &str = "EXAMPLES & CONTEXT";
const EXAMPLES_CHECKLIST: [&str; 3] = [
    "Real-world examples and use cases",
    "Industry-specific terminology",
    "Context for requirements",
];

/// Render the checklist embedded in every editor prompt.
pub fn guidelines() -> String {
    let mut out = String::from("RFP BEST PRACTICES CHECKLIST:\n");
    let mut section = |heading: &str, items: &[&str]| {
        out.push_str(&format!("\n{heading}:\n"));
        for item in items {
            out.push_str(&format!("- {item}\n"));
        }
    };

    for practice in &BestPractice::ALL[..5] {
        section(practice.heading(), practice.checklist());
    }
    section(EXAMPLES_HEADING, &EXAMPLES_CHECKLIST);
    let technical = BestPractice::TechnicalSpecifications;
    section(technical.heading(), technical.checklist());
    out
}

/// Tags whose keywords occur in `text`, in [`BestPractice::ALL`] order.
pub fn extract_applied_practices(text: &str) -> Vec<BestPractice> {
    let lower = text.to_lowercase();
    BestPractice::ALL
        .into_iter()
        .filter(|p| p.keywords().iter().any(|k| lower.contains(k)))
        .collect()
}

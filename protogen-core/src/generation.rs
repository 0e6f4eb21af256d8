//! Generation collaborator seam.
//!
//! `ProtocolGenerator` is the only way section prose and similar-protocol
//! rankings enter the crate. `MockGenerator` serves canned content; a real
//! backend implements the same trait and plugs into `Session` unchanged.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ProtogenError, Result};
use crate::form::FormInputs;
use crate::similar::SimilarProtocolEntry;

/// The three generated protocol sections, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Abstract,
    Background,
    Methodology,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Abstract, Section::Background, Section::Methodology];

    /// Card title
    pub fn title(&self) -> &'static str {
        match self {
            Section::Abstract => "Abstract",
            Section::Background => "Background & Rationale",
            Section::Methodology => "Research Methodology",
        }
    }

    /// Card subtitle
    pub fn description(&self) -> &'static str {
        match self {
            Section::Abstract => {
                "High-level summary of the study design, objectives, and expected outcomes"
            }
            Section::Background => {
                "Scientific context, prior research, and justification for the study"
            }
            Section::Methodology => {
                "Study design, endpoints, statistical approach, and analysis plan"
            }
        }
    }

    /// Heading used in the exported report
    pub fn report_heading(&self) -> &'static str {
        match self {
            Section::Abstract => "ABSTRACT",
            Section::Background => "BACKGROUND & RATIONALE",
            Section::Methodology => "RESEARCH METHODOLOGY",
        }
    }

    /// Text revealed when no generated content is available
    pub fn placeholder(&self) -> String {
        format!(
            "[Generated {} content will appear here]\n\n\
             This section will be populated with AI-generated content based on your \
             study parameters and retrieved similar protocols from the knowledge base.",
            self.title()
        )
    }

    pub fn index(&self) -> usize {
        match self {
            Section::Abstract => 0,
            Section::Background => 1,
            Section::Methodology => 2,
        }
    }
}

/// Everything the generator returns for one accepted form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedProtocol {
    pub title: String,
    pub abstract_text: String,
    pub background_text: String,
    pub methodology_text: String,
    /// Ranked by the generator, most similar first
    pub similar: Vec<SimilarProtocolEntry>,
}

impl GeneratedProtocol {
    pub fn section(&self, section: Section) -> &str {
        match section {
            Section::Abstract => &self.abstract_text,
            Section::Background => &self.background_text,
            Section::Methodology => &self.methodology_text,
        }
    }
}

/// Title shown on the workspace for a set of inputs
pub fn generated_title(inputs: &FormInputs) -> String {
    format!("{}: {}", inputs.study_type, inputs.title)
}

/// Source of generated section prose and similarity rankings
#[async_trait]
pub trait ProtocolGenerator: Send + Sync {
    async fn generate(&self, inputs: &FormInputs) -> Result<GeneratedProtocol>;
}

/// Run the generator with an upper bound on how long it may take
pub async fn generate_with_timeout(
    generator: &dyn ProtocolGenerator,
    inputs: &FormInputs,
    timeout: Duration,
) -> Result<GeneratedProtocol> {
    match tokio::time::timeout(timeout, generator.generate(inputs)).await {
        Ok(result) => result,
        Err(_) => Err(ProtogenError::GenerationTimeout {
            after_ms: timeout.as_millis() as u64,
        }),
    }
}

const MOCK_ABSTRACT: &str = "This study aims to evaluate the efficacy and safety of a novel therapeutic approach in patients with advanced-stage disease. The primary endpoint focuses on overall response rate, while secondary endpoints include progression-free survival, duration of response, and safety profile assessment.

The study will employ a randomized, double-blind, placebo-controlled design with approximately 300 participants across 25 clinical sites. Participants will be stratified based on prior treatment history and biomarker status.

Key inclusion criteria include confirmed diagnosis, adequate organ function, and Eastern Cooperative Oncology Group (ECOG) performance status of 0-1. The study is expected to run for approximately 24 months with interim analyses planned at 6 and 12 months.";

const MOCK_BACKGROUND: &str = "The therapeutic landscape for this disease has evolved significantly over the past decade, with the introduction of targeted therapies and immunotherapies providing new treatment options. Despite these advances, a substantial proportion of patients still experience disease progression, highlighting the need for novel therapeutic strategies.

Previous research has demonstrated that the targeted pathway plays a critical role in disease pathogenesis. Preclinical studies have shown promising activity with selective inhibition of this pathway, leading to tumor regression in multiple disease models.

The current standard of care includes combination chemotherapy, which is associated with significant toxicity and limited efficacy in advanced disease. This study builds upon the foundation of prior research to evaluate a potentially more effective and better-tolerated treatment approach.";

const MOCK_METHODOLOGY: &str = "Study Design: This is a Phase 2, randomized, double-blind, placebo-controlled, multicenter study evaluating the investigational agent versus placebo in patients with confirmed disease.

Sample Size: Approximately 300 patients will be enrolled, with a 2:1 randomization ratio (active treatment: placebo).

Treatment Arms:
• Arm A: Investigational agent administered orally once daily
• Arm B: Matching placebo administered orally once daily

Primary Endpoint: Overall Response Rate (ORR) per RECIST v1.1 criteria, assessed by independent central review.

Statistical Analysis: The study is powered at 90% to detect a clinically meaningful improvement in ORR. Kaplan-Meier methodology will be used for time-to-event endpoints. Subgroup analyses will be performed based on pre-specified biomarker status.";

fn mock_similar() -> Vec<SimilarProtocolEntry> {
    vec![
        SimilarProtocolEntry::new("Protocol_A_2023_Phase2_Oncology.pdf", 94, "2023"),
        SimilarProtocolEntry::new("Study_B_Immunotherapy_Response.pdf", 87, "2023"),
        SimilarProtocolEntry::new("Clinical_Trial_C_Biomarker_Analysis.pdf", 82, "2022"),
        SimilarProtocolEntry::new("Research_D_Patient_Stratification.pdf", 76, "2022"),
        SimilarProtocolEntry::new("Protocol_E_Endpoint_Design.pdf", 71, "2021"),
    ]
}

/// Canned generator used until a real backend exists
#[derive(Debug, Default)]
pub struct MockGenerator {
    sections: Option<[String; 3]>,
    failure: Mutex<Option<String>>,
    latency: Option<Duration>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the canned section prose (abstract, background, methodology)
    pub fn with_sections(
        mut self,
        abstract_text: impl Into<String>,
        background_text: impl Into<String>,
        methodology_text: impl Into<String>,
    ) -> Self {
        self.sections = Some([
            abstract_text.into(),
            background_text.into(),
            methodology_text.into(),
        ]);
        self
    }

    /// Simulate backend latency before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every call fail with `GenerationFailed`
    pub fn failing(self, reason: impl Into<String>) -> Self {
        self.set_failure(Some(reason.into()));
        self
    }

    pub fn set_failure(&self, reason: Option<String>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = reason;
        }
    }
}

#[async_trait]
impl ProtocolGenerator for MockGenerator {
    async fn generate(&self, inputs: &FormInputs) -> Result<GeneratedProtocol> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let failure = self.failure.lock().ok().and_then(|f| f.clone());
        if let Some(reason) = failure {
            return Err(ProtogenError::generation_failed(reason));
        }

        let [abstract_text, background_text, methodology_text] = match &self.sections {
            Some(sections) => sections.clone(),
            None => [MOCK_ABSTRACT, MOCK_BACKGROUND, MOCK_METHODOLOGY].map(String::from),
        };

        Ok(GeneratedProtocol {
            title: generated_title(inputs),
            abstract_text,
            background_text,
            methodology_text,
            similar: mock_similar(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> FormInputs {
        FormInputs::new("T", "O", "Oncology", "Phase II Clinical Trial")
    }

    #[tokio::test]
    async fn test_mock_generates_title_and_ranked_list() {
        let generated = MockGenerator::new().generate(&inputs()).await.unwrap();

        assert_eq!(generated.title, "Phase II Clinical Trial: T");
        assert_eq!(generated.similar.len(), 5);
        assert_eq!(generated.similar[0].similarity_percent, 94);
        assert!(generated.section(Section::Methodology).contains("RECIST"));
    }

    #[tokio::test]
    async fn test_mock_custom_sections() {
        let generated = MockGenerator::new()
            .with_sections("A", "B", "C")
            .generate(&inputs())
            .await
            .unwrap();

        let texts: Vec<&str> = Section::ALL.iter().map(|s| generated.section(*s)).collect();
        assert_eq!(texts, ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let err = MockGenerator::new()
            .failing("backend offline")
            .generate(&inputs())
            .await
            .unwrap_err();
        assert!(matches!(err, ProtogenError::GenerationFailed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_maps_to_generation_timeout() {
        let slow = MockGenerator::new().with_latency(Duration::from_secs(60));
        let err = generate_with_timeout(&slow, &inputs(), Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, ProtogenError::GenerationTimeout { after_ms: 50 }));
    }

    #[test]
    fn test_section_index_matches_display_order() {
        for (idx, section) in Section::ALL.into_iter().enumerate() {
            assert_eq!(section.index(), idx);
        }
    }

    #[test]
    fn test_placeholder_names_section() {
        assert!(Section::Background
            .placeholder()
            .starts_with("[Generated Background & Rationale content will appear here]"));
    }
}

//! Plain-text protocol report export

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::form::FormInputs;
use crate::generation::{generated_title, GeneratedProtocol, Section};

pub const REPORT_FILENAME: &str = "study_protocol_report.txt";
pub const REPORT_MIME: &str = "text/plain";

/// Everything that goes into the downloadable report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolReport {
    pub generated_title: String,
    pub disease_area: String,
    pub study_type: String,
    pub abstract_text: String,
    pub background_text: String,
    pub methodology_text: String,
}

impl ProtocolReport {
    /// Report for the given inputs. Sections fall back to their placeholder
    /// text when generation produced nothing.
    pub fn new(inputs: &FormInputs, generated: Option<&GeneratedProtocol>) -> Self {
        let text = |section: Section| {
            generated
                .map(|g| g.section(section).to_string())
                .unwrap_or_else(|| section.placeholder())
        };

        Self {
            generated_title: generated
                .map(|g| g.title.clone())
                .unwrap_or_else(|| generated_title(inputs)),
            disease_area: inputs.disease_area.clone(),
            study_type: inputs.study_type.clone(),
            abstract_text: text(Section::Abstract),
            background_text: text(Section::Background),
            methodology_text: text(Section::Methodology),
        }
    }

    fn section_text(&self, section: Section) -> &str {
        match section {
            Section::Abstract => &self.abstract_text,
            Section::Background => &self.background_text,
            Section::Methodology => &self.methodology_text,
        }
    }

    /// Render the fixed report layout
    pub fn render(&self) -> String {
        let mut out = String::new();
        push_heading(&mut out, "STUDY PROTOCOL REPORT", '=');
        out.push('\n');
        out.push_str(&format!("Title: {}\n", self.generated_title));
        out.push('\n');
        out.push_str(&format!("Disease Area: {}\n", self.disease_area));
        out.push_str(&format!("Study Type: {}\n", self.study_type));

        for section in Section::ALL {
            out.push('\n');
            push_heading(&mut out, section.report_heading(), '-');
            out.push_str(self.section_text(section));
            out.push('\n');
        }
        out
    }

    /// Write the report as `study_protocol_report.txt` inside `dir`
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(REPORT_FILENAME);
        let body = self.render();
        fs::write(&path, &body)?;
        info!(path = %path.display(), bytes = body.len(), mime = REPORT_MIME, "exported report");
        Ok(path)
    }
}

/// A heading followed by an underline of the same width
fn push_heading(out: &mut String, heading: &str, underline: char) {
    out.push_str(heading);
    out.push('\n');
    out.extend(std::iter::repeat(underline).take(heading.chars().count()));
    out.push('\n');
}

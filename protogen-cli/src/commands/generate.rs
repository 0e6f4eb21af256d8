use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use protogen_core::{
    FormField, FormInputs, Handled, MockGenerator, ProtocolGenerator, ProtogenConfig,
    ProtogenError, Section, Session, SubmitOutcome,
};
use tracing::{info, warn};

use crate::ui;

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Study title
    #[arg(long, default_value = "")]
    pub title: String,

    /// Primary objective of the study
    #[arg(long, default_value = "")]
    pub objective: String,

    /// Disease area (see `protogen config show` for the option set)
    #[arg(long = "disease-area", default_value = "")]
    pub disease_area: String,

    /// Study type (see `protogen config show` for the option set)
    #[arg(long = "study-type", default_value = "")]
    pub study_type: String,

    /// Directory to write study_protocol_report.txt into (default: config export.output_dir)
    #[arg(long = "out", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Print only the report to stdout instead of writing a file
    #[arg(long, conflicts_with = "json")]
    pub stdout: bool,

    /// Reveal every section card and print the sections as they load
    #[arg(long)]
    pub sections: bool,

    /// Print a JSON summary (title, similar protocols, report path)
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    fn inputs(&self) -> FormInputs {
        FormInputs::new(
            &self.title,
            &self.objective,
            &self.disease_area,
            &self.study_type,
        )
    }
}

/// Headless run of the setup → workspace flow
pub async fn run_generate(args: GenerateArgs) -> Result<()> {
    let config = ProtogenConfig::load().context("Failed to load config")?;
    let inputs = args.inputs();

    // No submit button to disable here, so name the missing fields
    let missing = inputs.missing_fields();
    if !missing.is_empty() {
        return Err(ProtogenError::IncompleteForm { missing }.into());
    }
    warn_unknown_option(&config.options.disease_areas, FormField::DiseaseArea, &inputs);
    warn_unknown_option(&config.options.study_types, FormField::StudyType, &inputs);

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.export.output_dir());

    let generator: Arc<dyn ProtocolGenerator> = Arc::new(MockGenerator::new());
    let mut session = Session::new(config, generator);
    let form = session
        .setup_mut()
        .ok_or_else(|| anyhow!("session did not start on the setup screen"))?;
    for field in FormField::ALL {
        form.set_field(field, inputs.get(field));
    }

    let pb = ui::spinner("Analyzing past protocols…");
    if session.submit() != SubmitOutcome::Accepted {
        ui::finish_error(pb, "Submission rejected");
        anyhow::bail!("submission was not accepted");
    }
    wait_for(&mut session, |handled| handled == Handled::Navigated).await?;

    let workspace = session
        .workspace()
        .ok_or_else(|| anyhow!("navigation did not reach the workspace"))?;
    let (headline, detail) = workspace.banner();
    match workspace.generation_failure() {
        None => ui::finish_success(pb, format!("{headline}: {detail}")),
        Some(reason) => {
            warn!(%reason, "continuing with placeholder sections");
            ui::finish_error(pb, format!("{headline}: {detail}"));
        }
    }

    // stdout carries nothing but the report with --stdout
    let show_summary = !args.json && !args.stdout;
    if show_summary {
        println!("{}", workspace.title());
        println!("{} • {}\n", workspace.inputs().disease_area, workspace.inputs().study_type);
        for (rank, entry) in workspace.similar().iter().enumerate() {
            println!(
                "  #{} {} ({}) {}",
                rank + 1,
                entry.name,
                entry.year,
                entry.similarity_label()
            );
        }
    }

    if args.sections {
        reveal_sections(&mut session, show_summary).await?;
    }

    let workspace = session
        .workspace()
        .ok_or_else(|| anyhow!("workspace closed unexpectedly"))?;
    let report = workspace.report();

    let report_path = if args.stdout {
        print!("{}", report.render());
        None
    } else {
        let path = report
            .export_to(&output_dir)
            .with_context(|| format!("Failed to write report into {}", output_dir.display()))?;
        Some(path)
    };

    if args.json {
        let summary = serde_json::json!({
            "title": workspace.title(),
            "inputs": workspace.inputs(),
            "similar": workspace.similar(),
            "generationFailure": workspace.generation_failure(),
            "reportPath": report_path,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if let Some(path) = report_path {
        println!("\nReport written to {}", path.display());
    }

    Ok(())
}

/// Activate every card, then apply completions until all are loaded
async fn reveal_sections(session: &mut Session, print: bool) -> Result<()> {
    for section in Section::ALL {
        session.activate(section);
    }

    let mut remaining = Section::ALL.len();
    while remaining > 0 {
        let event = session
            .next_event()
            .await
            .ok_or_else(|| anyhow!("event channel closed"))?;
        if let Handled::CardLoaded(section) = session.handle(event) {
            remaining -= 1;
            info!(?section, "section revealed");
            if print {
                if let Some(content) = session
                    .workspace()
                    .and_then(|w| w.card(section).state().content())
                {
                    println!("\n== {} ==\n{}", section.title(), content);
                }
            }
        }
    }
    Ok(())
}

async fn wait_for(session: &mut Session, done: impl Fn(Handled) -> bool) -> Result<()> {
    loop {
        let event = session
            .next_event()
            .await
            .ok_or_else(|| anyhow!("event channel closed"))?;
        if done(session.handle(event)) {
            return Ok(());
        }
    }
}

fn warn_unknown_option(options: &[String], field: FormField, inputs: &FormInputs) {
    let value = inputs.get(field);
    if !options.iter().any(|o| o == value) {
        warn!(field = %field, value, "value is not in the configured option set");
    }
}

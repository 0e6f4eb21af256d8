//! End-to-end session scenarios on a paused tokio clock

use std::sync::Arc;
use std::time::Duration;

use protogen_core::{
    Activation, FormField, FormInputs, Handled, MockGenerator, Phase, ProtocolGenerator,
    ProtogenConfig, Section, Session, SubmitOutcome,
};

fn session_with(generator: MockGenerator) -> Session {
    let generator: Arc<dyn ProtocolGenerator> = Arc::new(generator);
    Session::new(ProtogenConfig::default(), generator)
}

fn fill(session: &mut Session, inputs: &FormInputs) {
    let form = session.setup_mut().expect("session starts on setup");
    for field in FormField::ALL {
        form.set_field(field, inputs.get(field));
    }
}

fn sample_inputs() -> FormInputs {
    FormInputs::new("T", "O", "Oncology", "Phase II Clinical Trial")
}

async fn submit_and_navigate(session: &mut Session) {
    assert_eq!(session.submit(), SubmitOutcome::Accepted);
    let event = session.next_event().await.expect("submission completes");
    assert_eq!(session.handle(event), Handled::Navigated);
}

#[tokio::test(start_paused = true)]
async fn submit_navigates_to_workspace_with_idle_cards() {
    let mut session = session_with(MockGenerator::new());
    fill(&mut session, &sample_inputs());
    let started = tokio::time::Instant::now();

    submit_and_navigate(&mut session).await;

    assert!(started.elapsed() >= Duration::from_millis(2500));
    let workspace = session.workspace().expect("on workspace");
    assert_eq!(workspace.title(), "Phase II Clinical Trial: T");
    assert_eq!(workspace.inputs(), &sample_inputs());
    assert_eq!(workspace.cards().len(), 3);
    for card in workspace.cards() {
        assert_eq!(card.state().phase(), Phase::Idle);
        assert!(!card.state().is_expanded());
        assert_eq!(card.state().content(), None);
    }
}

#[tokio::test(start_paused = true)]
async fn incomplete_form_stays_on_setup() {
    let mut session = session_with(MockGenerator::new());
    let mut inputs = sample_inputs();
    inputs.study_type.clear();
    fill(&mut session, &inputs);

    assert_eq!(session.submit(), SubmitOutcome::Rejected);
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert!(session.try_next_event().is_none());
    assert!(session.setup().is_some());
}

#[tokio::test(start_paused = true)]
async fn double_activation_yields_single_completion() {
    let mut session = session_with(MockGenerator::new());
    fill(&mut session, &sample_inputs());
    submit_and_navigate(&mut session).await;

    assert_eq!(session.activate(Section::Abstract), Some(Activation::StartLoad));
    assert_eq!(session.activate(Section::Abstract), Some(Activation::Ignored));

    let event = session.next_event().await.expect("card completes");
    assert_eq!(session.handle(event), Handled::CardLoaded(Section::Abstract));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(session.try_next_event().is_none());

    let card = session.workspace().unwrap().card(Section::Abstract);
    assert_eq!(card.state().phase(), Phase::Loaded);
    assert!(card.state().is_expanded());
    assert!(card
        .state()
        .content()
        .unwrap()
        .starts_with("This study aims to evaluate"));
}

#[tokio::test(start_paused = true)]
async fn loaded_card_toggles_without_reloading() {
    let mut session = session_with(MockGenerator::new().with_sections("A", "B", "C"));
    fill(&mut session, &sample_inputs());
    submit_and_navigate(&mut session).await;

    session.activate(Section::Background);
    let event = session.next_event().await.unwrap();
    session.handle(event);

    assert_eq!(session.activate(Section::Background), Some(Activation::Toggled(false)));
    assert_eq!(session.activate(Section::Background), Some(Activation::Toggled(true)));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(session.try_next_event().is_none());
    let state = session.workspace().unwrap().card(Section::Background).state();
    assert_eq!(state.content(), Some("B"));
    assert_eq!(state.phase(), Phase::Loaded);
}

#[tokio::test(start_paused = true)]
async fn leaving_workspace_cancels_pending_cards() {
    let mut session = session_with(MockGenerator::new());
    fill(&mut session, &sample_inputs());
    submit_and_navigate(&mut session).await;

    for section in Section::ALL {
        session.activate(section);
    }
    session.back_to_setup();

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(session.drain_events(), 0);
    assert_eq!(session.setup().unwrap().inputs(), &FormInputs::default());
}

#[tokio::test(start_paused = true)]
async fn failed_generation_reveals_placeholders() {
    let mut session = session_with(MockGenerator::new().failing("retrieval index offline"));
    fill(&mut session, &sample_inputs());
    submit_and_navigate(&mut session).await;

    let workspace = session.workspace().unwrap();
    assert!(workspace.similar().is_empty());
    assert!(workspace
        .generation_failure()
        .unwrap()
        .contains("retrieval index offline"));

    session.activate(Section::Methodology);
    let event = session.next_event().await.unwrap();
    session.handle(event);

    let state = session.workspace().unwrap().card(Section::Methodology).state();
    assert_eq!(state.content(), Some(Section::Methodology.placeholder().as_str()));
}

#[tokio::test(start_paused = true)]
async fn report_for_sample_matches_layout() {
    let mut session = session_with(MockGenerator::new().with_sections("A", "B", "C"));
    fill(&mut session, &sample_inputs());
    submit_and_navigate(&mut session).await;

    let rendered = session.workspace().unwrap().report().render();
    let expected = "STUDY PROTOCOL REPORT\n=====================\n\nTitle: Phase II Clinical Trial: T\n\nDisease Area: Oncology\nStudy Type: Phase II Clinical Trial\n\nABSTRACT\n--------\nA\n\nBACKGROUND & RATIONALE\n----------------------\nB\n\nRESEARCH METHODOLOGY\n--------------------\nC\n";
    assert_eq!(rendered, expected);
}

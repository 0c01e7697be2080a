// Integration tests for the practice session orchestrator
//
// A scripted recognizer stands in for the speech engine and an in-memory
// backend records every request.

mod common;

use anyhow::Result;
use common::{harness, spoken, FakeBackend, ViewEvent};
use speech_coach::recognition::{ScriptFailure, ScriptStep};
use speech_coach::session::COMPLETION_MESSAGE;
use speech_coach::store::SESSION_KEY;
use speech_coach::{AttemptOutcome, PromptSequence, SessionError, SessionPhase, SessionStore};

fn five_takes() -> Vec<Vec<ScriptStep>> {
    vec![
        spoken("I want to explain my idea clearly and confidently today"),
        spoken("today I am going to describe my favorite hobby in detail"),
        spoken("please read this sentence at a steady and comfortable speed"),
        spoken("the students completed their assignments before the deadline"),
        spoken("sally sees seven shiny seashells by the seashore"),
    ]
}

#[tokio::test]
async fn test_full_session_submits_each_prompt_once_then_fetches_results() -> Result<()> {
    let mut h = harness(PromptSequence::default(), five_takes(), FakeBackend::new());

    for expected_next in 1..5 {
        match h.session.record_attempt().await? {
            AttemptOutcome::Advanced { next_index, .. } => assert_eq!(next_index, expected_next),
            other => panic!("expected to advance, got {:?}", other),
        }
        assert_eq!(h.session.phase(), SessionPhase::Idle);
    }

    let outcome = h.session.record_attempt().await?;
    let metrics = match outcome {
        AttemptOutcome::Completed { metrics, .. } => metrics,
        other => panic!("expected completion, got {:?}", other),
    };
    assert_eq!(h.session.phase(), SessionPhase::Complete);
    assert_eq!(h.session.metrics(), Some(&metrics));

    // Exactly five analyze calls, indices 0..4, then one results call
    let indices: Vec<usize> = h.backend.analyze_calls().iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    assert_eq!(h.backend.results_calls().len(), 1);
    assert!(matches!(
        h.backend.calls().last(),
        Some(common::BackendCall::Results(_))
    ));

    // One token across every request
    let token = h.session.session_id().to_string();
    assert!(h.backend.analyze_calls().iter().all(|r| r.session_id == token));
    assert_eq!(h.backend.results_calls(), vec![token.clone()]);

    // Proceed action offered, token persisted for deep-linking
    assert_eq!(h.view.offers(), vec![token.clone()]);
    assert_eq!(h.store.get(SESSION_KEY).await?, Some(token));

    let events = h.view.events();
    assert!(events.contains(&ViewEvent::Status(COMPLETION_MESSAGE.to_string())));
    assert!(events.contains(&ViewEvent::RecordingEnabled(false)));
    assert!(events.contains(&ViewEvent::Metrics(metrics)));

    Ok(())
}

#[tokio::test]
async fn test_empty_transcript_still_submitted_and_advances() -> Result<()> {
    let takes = vec![vec![ScriptStep::Pause(20)], spoken("second")];
    let prompts = PromptSequence::new(vec!["first".into(), "second".into()])?;
    let mut h = harness(prompts, takes, FakeBackend::new());

    let outcome = h.session.record_attempt().await?;
    assert!(matches!(outcome, AttemptOutcome::Advanced { next_index: 1, .. }));

    let calls = h.backend.analyze_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].speech, "");
    assert!(calls[0].duration > 0.0);
    assert_eq!(h.session.prompt_index(), 1);

    Ok(())
}

#[tokio::test]
async fn test_buffer_joins_finals_and_ignores_interims() -> Result<()> {
    let takes = vec![vec![
        ScriptStep::Interim("sally".into()),
        ScriptStep::Final("sally sees".into()),
        ScriptStep::Interim("seven".into()),
        ScriptStep::Interim("seven shiny".into()),
        ScriptStep::Final("seven shiny seashells".into()),
        ScriptStep::Interim("by the".into()),
        ScriptStep::Final(" by the seashore ".into()),
    ]];
    let prompts = PromptSequence::new(vec!["Sally sees seven shiny seashells by the seashore.".into()])?;
    let mut h = harness(prompts, takes, FakeBackend::new());

    let attempt = match h.session.record_attempt().await? {
        AttemptOutcome::Completed { attempt, .. } => attempt,
        other => panic!("expected completion, got {:?}", other),
    };

    // Fragments are joined with one space and keep their own padding; only the ends are trimmed
    assert_eq!(attempt.speech, "sally sees seven shiny seashells  by the seashore");
    assert_eq!(attempt.prompt_index, 0);
    assert!(attempt.duration_secs >= 0.0);
    assert_eq!(
        attempt.duration_secs,
        attempt.ended_at.signed_duration_since(attempt.started_at).num_milliseconds() as f64 / 1000.0
    );

    // Live display shows finals plus the pending interim
    let transcripts = h.view.transcripts();
    assert!(transcripts.contains(&"sally sees seven shiny".to_string()));
    assert!(transcripts.contains(&"sally sees seven shiny seashells by the".to_string()));

    Ok(())
}

#[tokio::test]
async fn test_failed_submission_surfaces_error_and_stays_on_prompt() -> Result<()> {
    let backend = FakeBackend::new();
    backend.script_analyze(&[false, true]);
    let takes = vec![spoken("one"), spoken("two"), spoken("two again"), spoken("three")];
    let prompts = PromptSequence::new(vec!["one".into(), "two".into(), "three".into()])?;
    let mut h = harness(prompts, takes, backend);

    h.session.record_attempt().await?;
    assert_eq!(h.session.prompt_index(), 1);

    let err = h.session.record_attempt().await.unwrap_err();
    assert!(matches!(err, SessionError::Backend(_)));
    assert_eq!(h.session.phase(), SessionPhase::Idle);
    assert_eq!(h.session.prompt_index(), 1);
    assert_eq!(h.view.errors().len(), 1);

    // Manual restart re-records the same prompt
    let outcome = h.session.record_attempt().await?;
    assert!(matches!(outcome, AttemptOutcome::Advanced { next_index: 2, .. }));

    let indices: Vec<usize> = h.backend.analyze_calls().iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1]);
    let speech: Vec<String> = h.backend.analyze_calls().into_iter().map(|r| r.speech).collect();
    assert_eq!(speech, vec!["one", "two again"]);

    Ok(())
}

#[tokio::test]
async fn test_recognition_error_returns_to_idle_without_submitting() -> Result<()> {
    let takes = vec![
        vec![
            ScriptStep::Final("half a".into()),
            ScriptStep::Fail(ScriptFailure::NoSpeech),
        ],
        spoken("the whole sentence"),
    ];
    let prompts = PromptSequence::new(vec!["one".into(), "two".into()])?;
    let mut h = harness(prompts, takes, FakeBackend::new());

    let err = h.session.record_attempt().await.unwrap_err();
    assert!(matches!(err, SessionError::Recognition(_)));
    assert_eq!(h.session.phase(), SessionPhase::Idle);
    assert!(h.backend.analyze_calls().is_empty());
    assert!(h.view.events().contains(&ViewEvent::Recording(false)));

    h.session.record_attempt().await?;
    let calls = h.backend.analyze_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].speech, "the whole sentence");
    assert_eq!(calls[0].index, 0);

    Ok(())
}

#[tokio::test]
async fn test_double_start_is_an_error() -> Result<()> {
    let takes = vec![vec![ScriptStep::Pause(50), ScriptStep::Final("hello".into())]];
    let prompts = PromptSequence::new(vec!["hello".into(), "again".into()])?;
    let mut h = harness(prompts, takes, FakeBackend::new());

    h.session.start_recording().await?;
    let err = h.session.start_recording().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidTransition {
            phase: SessionPhase::Recording,
            ..
        }
    ));

    // The live recording is unaffected
    h.session.finish_attempt().await?;
    assert_eq!(h.backend.analyze_calls().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_manual_stop_submits_what_was_heard() -> Result<()> {
    let takes = vec![vec![
        ScriptStep::Final("I want to".into()),
        ScriptStep::Pause(60_000),
        ScriptStep::Final("never heard".into()),
    ]];
    let prompts = PromptSequence::new(vec!["one".into(), "two".into()])?;
    let mut h = harness(prompts, takes, FakeBackend::new());

    h.session.start_recording().await?;
    assert!(h.session.process_next_event().await?.is_none());
    h.session.stop_recording().await?;

    let outcome = tokio::time::timeout(std::time::Duration::from_secs(5), h.session.finish_attempt()).await??;
    match outcome {
        AttemptOutcome::Advanced { attempt, .. } => assert_eq!(attempt.speech, "I want to"),
        other => panic!("expected to advance, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_no_recording_after_complete() -> Result<()> {
    let prompts = PromptSequence::new(vec!["only".into()])?;
    let mut h = harness(prompts, vec![spoken("only"), spoken("extra")], FakeBackend::new());

    h.session.record_attempt().await?;
    let err = h.session.record_attempt().await.unwrap_err();
    assert!(matches!(err, SessionError::SessionComplete));
    assert_eq!(h.backend.analyze_calls().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_results_failure_keeps_proceed_unavailable_until_refetch() -> Result<()> {
    let backend = FakeBackend::new();
    backend.set_fail_results(true);
    let prompts = PromptSequence::new(vec!["only".into()])?;
    let mut h = harness(prompts, vec![spoken("only")], backend);

    let err = h.session.record_attempt().await.unwrap_err();
    assert!(matches!(err, SessionError::Backend(_)));
    assert_eq!(h.session.phase(), SessionPhase::Complete);
    assert!(h.view.offers().is_empty());
    assert_eq!(h.store.get(SESSION_KEY).await?, None);

    h.backend.set_fail_results(false);
    let metrics = h.session.fetch_results().await?;
    assert_eq!(metrics.entries().len(), 5);
    assert_eq!(h.view.offers().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_stop_outside_recording_is_rejected() -> Result<()> {
    let mut h = harness(PromptSequence::default(), vec![], FakeBackend::new());

    let err = h.session.stop_recording().await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidTransition { phase: SessionPhase::Idle, .. }));

    // Recognizer refusing to start leaves the session idle
    let err = h.session.start_recording().await.unwrap_err();
    assert!(matches!(err, SessionError::Recognition(_)));
    assert_eq!(h.session.phase(), SessionPhase::Idle);

    Ok(())
}

use assert_matches::assert_matches;
use typelab::clock::{ClockEvent, SessionState};
use typelab::runtime::FixedTicker;
use typelab::scoring::{self, Submission};
use typelab::session::WordCommit;
use typelab::{
    ConfigurationError, PoolRegistry, Session, SessionConfig, SessionId, TypingLab, WordGenerator,
};

fn classic_session(duration: u32) -> Session {
    let words = ["kernel", "buffer", "socket", "thread", "vector", "stream"]
        .iter()
        .map(|w| w.to_string())
        .collect();
    Session::new(SessionId(1), &SessionConfig::new("classic", duration), words).unwrap()
}

fn type_text(session: &mut Session, text: &str) {
    for c in text.chars() {
        session.type_char(c);
    }
}

#[test]
fn exact_first_word_starts_session() {
    let mut session = classic_session(30);
    assert_eq!(session.state(), SessionState::NotStarted);

    type_text(&mut session, "kernel ");

    assert_eq!(session.state(), SessionState::Running);
    assert!(session.submissions()[0].is_correct);
    assert_eq!(session.cursor(), 1);
}

#[test]
fn misspelled_word_is_recorded_and_skipped() {
    let mut session = classic_session(30);
    type_text(&mut session, "kernel ");

    type_text(&mut session, "bufer ");

    let last = session.submissions().last().unwrap();
    assert_eq!(last.input_text, "bufer");
    assert_eq!(last.expected_text, "buffer");
    assert!(!last.is_correct);
    assert_eq!(session.cursor(), 2);
    assert_eq!(session.current_word(), Some("socket"));
}

#[test]
fn three_correct_words_in_thirty_seconds() {
    let mut session = classic_session(30);
    type_text(&mut session, "kernel buffer socket ");
    for _ in 0..15 {
        session.tick();
    }
    assert_eq!(session.state(), SessionState::Running);

    let mut finished = 0;
    for _ in 0..15 {
        if session.tick() == ClockEvent::Finished {
            finished += 1;
        }
    }

    assert_eq!(finished, 1);
    let result = session.result().unwrap();
    assert_eq!(result.correct_character_count, 18);
    assert_eq!(result.wpm, 7);
    assert_eq!(result.accuracy_percent, 100);
}

#[test]
fn finishing_without_submissions_scores_zero() {
    let mut session = classic_session(15);
    session.type_char('k');
    while session.tick() != ClockEvent::Finished {}

    let result = session.result().unwrap();
    assert_eq!(result.accuracy_percent, 0);
    assert_eq!(result.wpm, 0);
    assert_eq!(result.correct_character_count, 0);
}

#[test]
fn reset_mid_session_yields_fresh_session() {
    let registry = PoolRegistry::builtin().unwrap();
    let mut lab = TypingLab::new(
        registry,
        WordGenerator::seeded(99),
        SessionConfig::new("classic", 30),
        FixedTicker::seconds(),
        None,
    )
    .unwrap();
    let first = lab.session().target_words()[0].clone();
    lab.submit_word(&first);
    let old = lab.session().id();
    lab.on_tick(old);
    assert_eq!(lab.session().remaining_secs(), 29);

    lab.set_duration(60).unwrap();

    let session = lab.session();
    assert_eq!(session.state(), SessionState::NotStarted);
    assert_eq!(session.remaining_secs(), 60);
    assert!(session.submissions().is_empty());
    assert_eq!(session.cursor(), 0);

    // A stray tick from the superseded session changes nothing.
    assert_eq!(lab.on_tick(old), ClockEvent::Ignored);
    assert_eq!(lab.session().remaining_secs(), 60);
    assert_eq!(lab.session().state(), SessionState::NotStarted);
}

#[test]
fn unknown_theme_is_a_configuration_error() {
    let registry = PoolRegistry::builtin().unwrap();

    let err = WordGenerator::seeded(1)
        .generate(&registry, "unknown-theme", 10)
        .unwrap_err();

    assert_matches!(err, ConfigurationError::UnknownPool(theme) if theme == "unknown-theme");
}

#[test]
fn cursor_tracks_submissions_throughout() {
    let mut session = classic_session(60);
    for text in ["kernel", "bufer", "", "socket", "Thread"] {
        session.submit_word(text);
        assert_eq!(session.cursor(), session.submissions().len());
    }
    while session.tick() != ClockEvent::Finished {}

    assert_eq!(session.submit_word("vector"), WordCommit::Ignored);
    assert_eq!(session.cursor(), session.submissions().len());
}

#[test]
fn scores_stay_in_range() {
    let subs: Vec<Submission> = (0..40)
        .map(|i| {
            if i % 3 == 0 {
                Submission::evaluate("nope", "kernel")
            } else {
                Submission::evaluate("kernel", "kernel")
            }
        })
        .collect();

    for (duration, remaining) in [(15, 0), (30, 0), (60, 60), (60, 59)] {
        let result = scoring::finalize(&subs, duration, remaining);
        assert!(result.accuracy_percent <= 100);
        assert_eq!(result.accuracy_percent, 65);
        assert!(result.correct_character_count > 0);
    }
}

#[test]
fn same_seed_builds_same_session() {
    let registry = PoolRegistry::builtin().unwrap();
    let config = SessionConfig::new("playful", 15);

    let a = Session::create(SessionId(1), &config, &registry, &mut WordGenerator::seeded(2024)).unwrap();
    let b = Session::create(SessionId(2), &config, &registry, &mut WordGenerator::seeded(2024)).unwrap();

    assert_eq!(a.target_words(), b.target_words());
    assert_eq!(a.target_words().len(), 160);
}

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use jiff::Timestamp;
use rand::SeedableRng;
use rand::rngs::StdRng;
use uuid::Uuid;

use pretriaje_core::models::answer::{AnswerMap, AnswerValue};
use pretriaje_core::models::interaction::AiInteraction;
use pretriaje_core::models::session::Session;
use pretriaje_triage::compute_triage;
use pretriaje_triage::content::EXTRA_QUESTIONS_POOL;
use pretriaje_triage::error::ReviewError;
use pretriaje_triage::review::{InteractionSink, QuestionPool, REGENERATE_COUNT, ReviewSession};

#[derive(Default)]
struct RecordingSink {
    writes: RefCell<Vec<(Uuid, Vec<AiInteraction>)>>,
}

impl InteractionSink for RecordingSink {
    type Error = std::convert::Infallible;

    fn save_interactions(
        &self,
        id: Uuid,
        interactions: &[AiInteraction],
    ) -> Result<(), Self::Error> {
        self.writes.borrow_mut().push((id, interactions.to_vec()));
        Ok(())
    }
}

#[derive(Default)]
struct FailingSink {
    attempts: Cell<usize>,
}

impl InteractionSink for FailingSink {
    type Error = std::io::Error;

    fn save_interactions(&self, _: Uuid, _: &[AiInteraction]) -> Result<(), Self::Error> {
        self.attempts.set(self.attempts.get() + 1);
        Err(std::io::Error::other("disk full"))
    }
}

fn submitted_session() -> Session {
    let mut session = Session::new("demo-campaign", Timestamp::UNIX_EPOCH);
    let answers = AnswerMap::from([
        ("q_red_flags".to_string(), AnswerValue::from(vec!["Dolor en el pecho"])),
        ("q_red_flags_now".to_string(), AnswerValue::from("Sí")),
        ("q_pain_level".to_string(), AnswerValue::from("9")),
    ]);
    session.apply_triage(compute_triage(&answers));
    session.answers = answers;
    session
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn now() -> Timestamp {
    Timestamp::from_second(1_700_000_000).unwrap()
}

#[test]
fn opening_offers_the_engine_questions() {
    let session = submitted_session();
    let review = ReviewSession::open(&session);
    assert_eq!(review.session_id(), session.id);
    assert_eq!(review.offered(), session.triage.as_ref().unwrap().ai_questions.as_slice());
    assert!(review.interactions().is_empty());
}

#[test]
fn reopening_skips_answered_questions() {
    let mut session = submitted_session();
    let first = session.triage.as_ref().unwrap().ai_questions[0].clone();
    session.ai_interactions.push(AiInteraction {
        question: first.clone(),
        answer: "Hace una hora".to_string(),
        added_at: now(),
    });

    let review = ReviewSession::open(&session);
    assert_eq!(review.offered().len(), 2);
    assert!(!review.offered().contains(&first));
    assert_eq!(review.interactions().len(), 1);
}

#[test]
fn answering_replaces_the_question_and_saves_the_full_list() {
    let session = submitted_session();
    let mut review = ReviewSession::open(&session);
    let sink = RecordingSink::default();
    let mut rng = rng();

    let question = review.offered()[1].clone();
    let replacement = review
        .answer(&question, "Sí, con náuseas", now(), &mut rng, &sink)
        .unwrap()
        .expect("the extra pool is untouched");

    assert!(EXTRA_QUESTIONS_POOL.contains(&replacement.as_str()));
    assert_eq!(review.offered().len(), 3);
    assert!(!review.offered().contains(&question));
    assert_eq!(review.offered().last(), Some(&replacement));

    let writes = sink.writes.borrow();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, session.id);
    assert_eq!(
        writes[0].1,
        vec![AiInteraction {
            question,
            answer: "Sí, con náuseas".to_string(),
            added_at: now(),
        }]
    );
}

#[test]
fn answered_questions_never_return() {
    let session = submitted_session();
    let mut review = ReviewSession::open(&session);
    let sink = RecordingSink::default();
    let mut rng = rng();

    let mut answered = HashSet::new();
    for round in 0..4 {
        let question = review.offered()[0].clone();
        review.answer(&question, "respuesta", now(), &mut rng, &sink).unwrap();
        answered.insert(question);

        for _ in 0..25 {
            let offered = review.regenerate(&mut rng).to_vec();
            assert!(offered.len() <= REGENERATE_COUNT);
            assert!(
                offered.iter().all(|q| !answered.contains(q)),
                "answered question re-offered in round {round}"
            );
            let unique: HashSet<_> = offered.iter().collect();
            assert_eq!(unique.len(), offered.len());
        }
    }
}

#[test]
fn answering_twice_is_rejected() {
    let session = submitted_session();
    let mut review = ReviewSession::open(&session);
    let sink = RecordingSink::default();
    let mut rng = rng();

    let question = review.offered()[0].clone();
    review.answer(&question, "primera", now(), &mut rng, &sink).unwrap();
    let err = review
        .answer(&question, "segunda", now(), &mut rng, &sink)
        .unwrap_err();
    assert!(matches!(err, ReviewError::AlreadyAnswered(q) if q == question));
    assert_eq!(review.interactions().len(), 1);
    assert_eq!(sink.writes.borrow().len(), 1);
}

#[test]
fn blank_question_is_rejected() {
    let mut review = ReviewSession::open(&submitted_session());
    let err = review
        .answer("   ", "algo", now(), &mut rng(), &RecordingSink::default())
        .unwrap_err();
    assert!(matches!(err, ReviewError::BlankQuestion));
}

#[test]
fn exhausting_the_pool_shrinks_the_offer() {
    let session = submitted_session();
    let mut review = ReviewSession::open(&session);
    let sink = RecordingSink::default();
    let mut rng = rng();

    let mut answered = 0;
    while let Some(question) = review.offered().first().cloned() {
        review.answer(&question, "ok", now(), &mut rng, &sink).unwrap();
        answered += 1;
        assert!(answered <= 3 + EXTRA_QUESTIONS_POOL.len());
    }

    assert_eq!(answered, 3 + EXTRA_QUESTIONS_POOL.len());
    assert!(review.regenerate(&mut rng).is_empty());
    assert_eq!(review.interactions().len(), answered);
}

#[test]
fn regenerate_draws_from_suggestions_and_extras() {
    let session = submitted_session();
    let suggested = session.triage.as_ref().unwrap().ai_questions.clone();
    let mut review = ReviewSession::open(&session);
    let mut rng = rng();

    let mut seen = HashSet::new();
    for _ in 0..200 {
        seen.extend(review.regenerate(&mut rng).iter().cloned());
    }
    for question in suggested.iter().map(String::as_str).chain(EXTRA_QUESTIONS_POOL) {
        assert!(seen.contains(question), "never drew {question}");
    }
}

#[test]
fn edit_overwrites_only_the_answer() {
    let session = submitted_session();
    let mut review = ReviewSession::open(&session);
    let sink = RecordingSink::default();
    let question = review.offered()[0].clone();
    review.answer(&question, "ayer", now(), &mut rng(), &sink).unwrap();

    review.edit(0, "hace dos días", &sink).unwrap();

    let edited = &review.interactions()[0];
    assert_eq!(edited.question, question);
    assert_eq!(edited.answer, "hace dos días");
    assert_eq!(edited.added_at, now());
    assert_eq!(sink.writes.borrow().len(), 2);
}

#[test]
fn edit_out_of_range_fails() {
    let mut review = ReviewSession::open(&submitted_session());
    let err = review.edit(0, "x", &RecordingSink::default()).unwrap_err();
    assert!(matches!(err, ReviewError::IndexOutOfRange { index: 0, len: 0 }));
}

#[test]
fn failed_write_keeps_local_state_for_retry() {
    let session = submitted_session();
    let mut review = ReviewSession::open(&session);
    let failing = FailingSink::default();
    let question = review.offered()[0].clone();

    let err = review
        .answer(&question, "sí", now(), &mut rng(), &failing)
        .unwrap_err();
    let ReviewError::Persist(source) = &err else {
        panic!("expected a persist error, got {err:?}");
    };
    let io = source.downcast_ref::<std::io::Error>().unwrap();
    assert_eq!(io.to_string(), "disk full");
    assert_eq!(failing.attempts.get(), 1);
    assert_eq!(review.interactions().len(), 1);
    assert!(!review.offered().contains(&question));

    let sink = RecordingSink::default();
    review.persist(&sink).unwrap();
    assert_eq!(sink.writes.borrow()[0].1, review.interactions());
}

#[test]
fn pool_without_suggestions_only_draws_extras() {
    let mut pool = QuestionPool::new(&[], &[]);
    assert!(pool.offered().is_empty());
    let drawn = pool.regenerate(&mut rng()).to_vec();
    assert_eq!(drawn.len(), REGENERATE_COUNT);
    assert!(drawn.iter().all(|q| EXTRA_QUESTIONS_POOL.contains(&q.as_str())));
}

#[test]
fn duplicate_suggestions_are_offered_once() {
    let suggested = vec!["¿Uno?".to_string(), "¿Uno?".to_string(), "¿Dos?".to_string()];
    let pool = QuestionPool::new(&suggested, &[]);
    assert_eq!(pool.offered(), ["¿Uno?".to_string(), "¿Dos?".to_string()]);
}

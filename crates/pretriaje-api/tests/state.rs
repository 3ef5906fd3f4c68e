use std::convert::Infallible;

use jiff::{SignedDuration, Timestamp};

use pretriaje_api::state::{OpenReviews, REVIEW_IDLE_TTL};
use pretriaje_core::models::answer::{AnswerMap, AnswerValue};
use pretriaje_core::models::session::Session;
use pretriaje_triage::compute_triage;
use pretriaje_triage::review::ReviewSession;

fn t(minutes: i64) -> Timestamp {
    Timestamp::from_second(1_700_000_000).unwrap() + SignedDuration::from_mins(minutes)
}

fn review() -> ReviewSession {
    let mut session = Session::new("demo-campaign", t(0));
    session.answers = AnswerMap::from([("q_pain_level".to_string(), AnswerValue::from("6"))]);
    session.apply_triage(compute_triage(&session.answers));
    ReviewSession::open(&session)
}

fn open(reviews: &mut OpenReviews, at: Timestamp) -> uuid::Uuid {
    let review = review();
    let id = review.session_id();
    reviews
        .get_or_open(id, at, || Ok::<_, Infallible>(review))
        .unwrap();
    id
}

#[test]
fn idle_reviews_are_pruned() {
    let mut reviews = OpenReviews::default();
    let stale = open(&mut reviews, t(0));
    let fresh = open(&mut reviews, t(90));
    assert_eq!(reviews.len(), 2);

    let ttl_minutes = REVIEW_IDLE_TTL.as_secs() / 60;
    assert_eq!(reviews.prune_idle(t(ttl_minutes)), 0);
    assert_eq!(reviews.prune_idle(t(ttl_minutes + 1)), 1);
    assert!(!reviews.contains(stale));
    assert!(reviews.contains(fresh));
}

#[test]
fn using_a_review_keeps_it_open() {
    let mut reviews = OpenReviews::default();
    let id = open(&mut reviews, t(0));

    let ttl_minutes = REVIEW_IDLE_TTL.as_secs() / 60;
    let reused = reviews
        .get_or_open(id, t(ttl_minutes - 1), || -> Result<ReviewSession, Infallible> {
            panic!("an open review must not be rebuilt")
        })
        .unwrap();
    assert_eq!(reused.session_id(), id);

    assert_eq!(reviews.prune_idle(t(ttl_minutes + 30)), 0);
    assert!(reviews.contains(id));
    assert!(reviews.remove(id));
    assert!(reviews.is_empty());
}

#[test]
fn failed_open_leaves_nothing_behind() {
    let mut reviews = OpenReviews::default();
    let id = uuid::Uuid::new_v4();
    let result = reviews.get_or_open(id, t(0), || Err::<ReviewSession, _>("gone"));
    assert_eq!(result.err(), Some("gone"));
    assert!(!reviews.contains(id));
}

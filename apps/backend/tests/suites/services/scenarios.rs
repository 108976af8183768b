// End-to-end game flows through GameService with a scripted judge.

use std::sync::Arc;
use std::time::Duration;

use beats_backend::domain::Persona;
use beats_backend::oracle::OracleError;
use beats_backend::services::GuessOutcome;

use crate::support::oracle::ScriptedOracle;
use crate::support::state::{state_with, state_with_timeout};

#[tokio::test]
async fn correct_then_duplicate_ends_game() {
    let oracle = Arc::new(ScriptedOracle::new().with("Rock", "Paper", true));
    let state = state_with(oracle.clone()).await;

    let started = state.games.start_session(Persona::Default).await;
    assert_eq!(started.history, vec!["Rock".to_string()]);
    assert_eq!(started.score, 0);
    assert_eq!(started.message, "Game started! What beats Rock?");

    let first = state
        .games
        .submit_guess(started.session_id, "Paper")
        .await
        .unwrap();
    assert_eq!(first.outcome, GuessOutcome::Correct);
    assert_eq!(first.history, vec!["Rock".to_string(), "Paper".to_string()]);
    assert_eq!(first.score, 1);
    assert!(!first.game_over);
    assert_eq!(first.new_word.as_deref(), Some("Paper"));
    assert_eq!(first.message, "Correct! 'Paper' beats 'Rock'. What beats Paper?");

    let second = state
        .games
        .submit_guess(started.session_id, "Paper")
        .await
        .unwrap();
    assert_eq!(second.outcome, GuessOutcome::DuplicateWord);
    assert!(second.game_over);
    assert_eq!(second.score, 1);
    assert_eq!(second.history, vec!["Rock".to_string(), "Paper".to_string()]);
    assert_eq!(
        second.message,
        "Game over! 'Paper' has already been used in this game."
    );

    assert_eq!(oracle.calls(), 1, "duplicates never reach the judge");
}

#[tokio::test]
async fn incorrect_guess_ends_game_without_growing_chain() {
    let oracle = Arc::new(ScriptedOracle::new().with("Rock", "Pebble", false));
    let state = state_with(oracle).await;

    let started = state.games.start_session(Persona::Default).await;
    let result = state
        .games
        .submit_guess(started.session_id, "Pebble")
        .await
        .unwrap();

    assert_eq!(result.outcome, GuessOutcome::Incorrect);
    assert!(result.game_over);
    assert!(!result.accepted);
    assert_eq!(result.score, 0);
    assert_eq!(result.history, vec!["Rock".to_string()]);
    assert_eq!(result.message, "Game over! 'Pebble' doesn't beat 'Rock'.");
    assert_eq!(result.feedback.as_deref(), Some("Pebble does not beat Rock."));
}

#[tokio::test]
async fn failed_judgment_is_not_consumed_and_retry_succeeds() {
    let oracle = Arc::new(ScriptedOracle::new().failing_first(1, OracleError::Timeout));
    let state = state_with(oracle.clone()).await;
    let started = state.games.start_session(Persona::Default).await;

    let failed = state
        .games
        .submit_guess(started.session_id, "Paper")
        .await
        .unwrap();
    assert_eq!(failed.outcome, GuessOutcome::OracleUnavailable);
    assert!(!failed.game_over);
    assert_eq!(failed.score, 0);
    assert_eq!(failed.history, vec!["Rock".to_string()]);
    assert_eq!(
        failed.message,
        "The judge is unavailable right now. Please try again."
    );

    let retried = state
        .games
        .submit_guess(started.session_id, "Paper")
        .await
        .unwrap();
    assert_eq!(retried.outcome, GuessOutcome::Correct);
    assert_eq!(retried.score, 1);
    assert_eq!(oracle.calls(), 2);
}

#[tokio::test]
async fn slow_judge_times_out_without_mutating_session() {
    let oracle = Arc::new(ScriptedOracle::new().with_delay(Duration::from_secs(5)));
    let state = state_with_timeout(oracle, Duration::from_millis(30)).await;
    let started = state.games.start_session(Persona::Default).await;

    let result = state
        .games
        .submit_guess(started.session_id, "Paper")
        .await
        .unwrap();
    assert_eq!(result.outcome, GuessOutcome::OracleUnavailable);
    assert!(result.outcome.is_retryable());
    assert!(result.retryable);

    let history = state.games.history(started.session_id).await.unwrap();
    assert_eq!(history.history, vec!["Rock".to_string()]);
    assert_eq!(history.score, 0);
    assert!(!history.game_over);
    assert_eq!(state.verdicts.inflight_len(), 0);
}

#[tokio::test]
async fn long_chain_keeps_every_word_in_history() {
    let oracle = Arc::new(ScriptedOracle::new().with("Lava", "Ice Age", false));
    let state = state_with(oracle).await;
    let started = state.games.start_session(Persona::Default).await;
    let id = started.session_id;

    let words = ["Paper", "Scissors", "Hammer", "Anvil", "Gravity", "Time", "Lava"];
    for word in words {
        let result = state.games.submit_guess(id, word).await.unwrap();
        assert_eq!(result.outcome, GuessOutcome::Correct);
        assert!(result.history.len() <= 5);
        assert_eq!(result.history.last().map(String::as_str), Some(word));
    }

    let over = state.games.submit_guess(id, "Ice Age").await.unwrap();
    assert!(over.game_over);
    assert_eq!(over.score, words.len() as u32);
    assert_eq!(over.history.len(), words.len() + 1, "game over carries full chain");

    let history = state.games.history(id).await.unwrap();
    assert_eq!(history.history, over.history);
    assert!(history.game_over);
}

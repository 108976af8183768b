// Finished-game statistics, leaderboard and popular words.

use std::sync::Arc;

use beats_backend::domain::Persona;

use crate::support::oracle::ScriptedOracle;
use crate::support::state::state_with;

#[tokio::test]
async fn finished_games_feed_statistics_once() {
    let oracle = Arc::new(
        ScriptedOracle::new()
            .with("Paper", "Feather", false)
            .with("Rock", "Feather", false),
    );
    let state = state_with(oracle).await;

    // Scores 2, 0 and 1.
    let a = state.games.start_session(Persona::Default).await.session_id;
    state.games.submit_guess(a, "Paper").await.unwrap();
    state.games.submit_guess(a, "Scissors").await.unwrap();
    state.games.submit_guess(a, "Paper").await.unwrap();

    let b = state.games.start_session(Persona::Default).await.session_id;
    state.games.submit_guess(b, "Feather").await.unwrap();

    let c = state.games.start_session(Persona::Default).await.session_id;
    state.games.submit_guess(c, "Paper").await.unwrap();
    state.games.submit_guess(c, "Feather").await.unwrap();

    // Guesses on finished games change nothing.
    state.games.submit_guess(a, "Lava").await.unwrap();
    state.games.submit_guess(b, "Lava").await.unwrap();

    let stats = state.games.statistics().await;
    assert_eq!(stats.total_games, 3);
    assert_eq!(stats.max_score, 2);
    assert!((stats.average_score - 1.0).abs() < f64::EPSILON);
    assert_eq!(stats.active_sessions, 3);

    let board = state.games.leaderboard();
    let scores: Vec<u32> = board.iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![2, 1, 0]);
    let positions: Vec<usize> = board.iter().map(|e| e.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[tokio::test]
async fn open_games_are_not_counted() {
    let state = state_with(Arc::new(ScriptedOracle::new())).await;
    let id = state.games.start_session(Persona::Default).await.session_id;
    state.games.submit_guess(id, "Paper").await.unwrap();

    let stats = state.games.statistics().await;
    assert_eq!(stats.total_games, 0);
    assert_eq!(stats.max_score, 0);
    assert!(state.games.leaderboard().is_empty());
}

#[tokio::test]
async fn popular_words_are_capped_at_five() {
    let state = state_with(Arc::new(ScriptedOracle::new())).await;
    let words = ["Paper", "Fire", "Water", "Wind", "Lava", "Ice", "Steel"];

    for (i, word) in words.iter().enumerate() {
        // Earlier words get guessed more often.
        for _ in 0..(words.len() - i) {
            let id = state.games.start_session(Persona::Default).await.session_id;
            state.games.submit_guess(id, word).await.unwrap();
        }
    }

    let stats = state.games.statistics().await;
    let top: Vec<(&str, u64)> = stats
        .popular_words
        .iter()
        .map(|w| (w.word.as_str(), w.count))
        .collect();
    assert_eq!(
        top,
        vec![("paper", 7), ("fire", 6), ("water", 5), ("wind", 4), ("lava", 3)]
    );
}

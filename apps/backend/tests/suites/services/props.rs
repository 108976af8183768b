// Property tests for the session state machine.

use beats_backend::domain::{GameSession, Persona, Rejection, SessionId, Verdict};
use proptest::prelude::*;

use crate::common::proptest_config;

const WORDS: &[&str] = &["Paper", "paper", " PAPER ", "Scissors", "Fire", "Water", "Rock"];

fn moves() -> impl Strategy<Value = Vec<(usize, bool)>> {
    prop::collection::vec((0..WORDS.len(), any::<bool>()), 0..24)
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn chain_length_tracks_score(moves in moves()) {
        let mut session = GameSession::start(SessionId::generate(), "Rock", Persona::Default);

        for (index, beats) in moves {
            let score_before = session.score();
            let was_over = session.is_over();

            match session.validate(WORDS[index]) {
                Ok(guess) => {
                    prop_assert!(!was_over);
                    let applied = session
                        .apply(&guess, &Verdict::new(beats, "scripted"))
                        .expect("validated guess applies");
                    let expected = if beats { score_before + 1 } else { score_before };
                    prop_assert_eq!(applied.score, expected);
                    prop_assert_eq!(applied.game_over, !beats);
                }
                Err(Rejection::DuplicateWord { .. }) => {
                    prop_assert!(!was_over);
                    prop_assert_eq!(session.score(), score_before);
                    session.end_round();
                }
                Err(Rejection::SessionOver) => prop_assert!(was_over),
                Err(Rejection::EmptyInput) => prop_assert!(false, "words are never empty"),
            }

            prop_assert_eq!(session.history().len(), session.score() as usize + 1);
            prop_assert!(session.score() >= score_before);
            if was_over {
                prop_assert!(session.is_over(), "over is terminal");
            }
        }
    }

    #[test]
    fn history_holds_no_duplicate_keys(moves in moves()) {
        let mut session = GameSession::start(SessionId::generate(), "Rock", Persona::Default);

        for (index, beats) in moves {
            if let Ok(guess) = session.validate(WORDS[index]) {
                let _ = session.apply(&guess, &Verdict::new(beats, "scripted"));
            }
        }

        let mut keys: Vec<String> = session
            .history()
            .iter()
            .map(|w| beats_backend::domain::normalize_word(w))
            .collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        prop_assert_eq!(keys.len(), total);
    }
}

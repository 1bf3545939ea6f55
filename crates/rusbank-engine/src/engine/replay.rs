use crate::core::{Card, Move, PileLocation, PlayerId};

use super::state::GameState;

/// Failure while replaying a notation log.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ReplayError {
    #[display("malformed notation entry `{entry}`")]
    Parse { entry: String },
    #[display("entry `{entry}` is not legal at step {step}")]
    IllegalEntry { entry: String, step: usize },
}

/// Replays a notation log from `initial`, returning the reconstructed
/// final state.
///
/// The log is the side channel every game emits: one entry per applied
/// move (`<card>:<from>-<to>`) or draw (`D1` / `D2`). Replaying the log of
/// a seeded game against `GameState::new(Some(seed))` reproduces the final
/// piles exactly.
pub fn replay_notation(log: &[String], initial: &GameState) -> Result<GameState, ReplayError> {
    let mut state = initial.clone();
    for (step, entry) in log.iter().enumerate() {
        state = apply_entry(&state, entry, step)?;
    }
    Ok(state)
}

fn apply_entry(state: &GameState, entry: &str, step: usize) -> Result<GameState, ReplayError> {
    if let Some(player) = parse_draw(entry) {
        if state.current_turn() != player {
            return Err(ReplayError::IllegalEntry {
                entry: entry.to_owned(),
                step,
            });
        }
        let outcome = state.draw_from_hand().map_err(|_| ReplayError::IllegalEntry {
            entry: entry.to_owned(),
            step,
        })?;
        return Ok(outcome.state);
    }

    let mv = parse_move(entry).ok_or_else(|| ReplayError::Parse {
        entry: entry.to_owned(),
    })?;
    state.apply_move(&mv).map_err(|_| ReplayError::IllegalEntry {
        entry: entry.to_owned(),
        step,
    })
}

fn parse_draw(entry: &str) -> Option<PlayerId> {
    let mut chars = entry.chars();
    (chars.next()? == 'D').then_some(())?;
    let player = PlayerId::from_digit(chars.next()?)?;
    chars.next().is_none().then_some(player)
}

fn parse_move(entry: &str) -> Option<Move> {
    let (card, rest) = entry.split_once(':')?;
    let (from, to) = rest.split_once('-')?;
    Some(Move::new(
        PileLocation::from_notation(from)?,
        PileLocation::from_notation(to)?,
        Card::from_notation(card)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rules::legal_moves;

    /// Plays a pseudo-random but deterministic game for a while, then
    /// checks that replaying the log reproduces the final state.
    #[test]
    fn test_notation_round_trip() {
        let initial = GameState::new(Some(4242));
        let mut state = initial.clone();

        let mut operations = 0;
        while !state.phase().is_ended() && operations < 200 {
            let moves = legal_moves(&state);
            // Alternate between playing and drawing so both entry kinds
            // appear in the log.
            if let Some(mv) = moves.first().filter(|_| operations % 3 != 2) {
                state = state.apply_move(mv).unwrap();
            } else if state.current_player().drawn_card().is_none() {
                match state.draw_from_hand() {
                    Ok(outcome) => state = outcome.state,
                    Err(_) => break,
                }
            } else {
                state = state.apply_move(&moves[0]).unwrap();
            }
            operations += 1;
        }
        assert!(operations > 0);

        let replayed = replay_notation(state.notation_log(), &initial).unwrap();
        assert_eq!(replayed, state);
    }

    #[test]
    fn test_replay_rejects_malformed_entry() {
        let initial = GameState::new(Some(1));
        let log = vec!["garbage".to_owned()];
        assert!(matches!(
            replay_notation(&log, &initial),
            Err(ReplayError::Parse { .. })
        ));
    }

    #[test]
    fn test_replay_rejects_illegal_move() {
        let initial = GameState::new(Some(1));
        // Syntactically valid but almost certainly not legal from the
        // opening position: a drawn-slot move with no draw before it.
        let log = vec!["AH1:G1-F1".to_owned()];
        assert!(matches!(
            replay_notation(&log, &initial),
            Err(ReplayError::IllegalEntry { step: 0, .. })
        ));
    }

    #[test]
    fn test_parse_move_examples() {
        let mv = parse_move("AH1:R1-F1").unwrap();
        assert_eq!(mv.from, PileLocation::Reserve(PlayerId::One));
        assert_eq!(mv.to, PileLocation::Foundation(0));
        assert_eq!(mv.card.notation(), "AH1");

        assert_eq!(parse_draw("D2"), Some(PlayerId::Two));
        assert_eq!(parse_draw("D3"), None);
        assert_eq!(parse_draw("D11"), None);
    }
}

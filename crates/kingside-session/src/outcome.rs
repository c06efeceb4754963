//! Game outcome
//!
//! Resolvable only from rules-engine terminal detection or an explicit
//! resignation / draw-agreement event supplied by the caller. The core
//! never infers resignation on its own.

use kingside_rules::Side;
use serde::{Deserialize, Serialize};

/// Final (or not yet final) result of a game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    WhiteWins,
    BlackWins,
    Draw,
    #[default]
    Undetermined,
}

impl Outcome {
    /// Whether the game has a determined result
    pub fn is_decided(&self) -> bool {
        !matches!(self, Outcome::Undetermined)
    }

    /// The winning side, if one side won
    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::WhiteWins => Some(Side::White),
            Outcome::BlackWins => Some(Side::Black),
            _ => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }

    /// The outcome in which the given side wins
    pub fn win_for(side: Side) -> Outcome {
        match side {
            Side::White => Outcome::WhiteWins,
            Side::Black => Outcome::BlackWins,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::WhiteWins => write!(f, "white wins"),
            Outcome::BlackWins => write!(f, "black wins"),
            Outcome::Draw => write!(f, "draw"),
            Outcome::Undetermined => write!(f, "undetermined"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_undetermined() {
        assert_eq!(Outcome::default(), Outcome::Undetermined);
        assert!(!Outcome::default().is_decided());
    }

    #[test]
    fn test_winner_only_for_decisive_outcomes() {
        assert_eq!(Outcome::WhiteWins.winner(), Some(Side::White));
        assert_eq!(Outcome::BlackWins.winner(), Some(Side::Black));
        assert_eq!(Outcome::Draw.winner(), None);
        assert_eq!(Outcome::Undetermined.winner(), None);
    }

    #[test]
    fn test_win_for_maps_sides() {
        assert_eq!(Outcome::win_for(Side::White), Outcome::WhiteWins);
        assert_eq!(Outcome::win_for(Side::Black), Outcome::BlackWins);
    }

    #[test]
    fn test_all_decided_outcomes() {
        for outcome in [Outcome::WhiteWins, Outcome::BlackWins, Outcome::Draw] {
            assert!(outcome.is_decided(), "{outcome} should be decided");
        }
    }
}

//! Alpha-beta minimax search
//!
//! Depth-limited minimax with alpha-beta pruning over the rules engine's
//! legal move enumeration. No move ordering, no transposition table, no
//! quiescence: pruning is the only optimization, so a plain minimax at the
//! same depth returns the same move and value. Ties are broken by the first
//! move encountered in the rules engine's stable enumeration order.
//!
//! Positions are immutable values; exploring a candidate move applies it to
//! a fresh position, so no intermediate state is ever observable.

use kingside_rules::Rules;
use tracing::trace;

use crate::evaluation::evaluate;

/// Result of one search invocation
#[derive(Debug, Clone)]
pub struct SearchReport<M> {
    /// Best move found, or `None` when the position has no legal moves or
    /// the depth was zero
    pub best_move: Option<M>,
    /// Minimax value of the position, from White's perspective
    pub score: i32,
    /// Positions visited, including the root
    pub nodes: u64,
}

/// Search the position to `depth` plies
///
/// `maximizing` selects whose interest the root serves: `true` picks the
/// move maximizing the White-perspective score, `false` the move minimizing
/// it. Never fails on well-formed input; an error below this boundary is a
/// programming defect, not a runtime condition.
pub fn search<R: Rules>(
    rules: &R,
    position: &R::Position,
    depth: u8,
    maximizing: bool,
) -> SearchReport<R::Move> {
    let mut nodes = 0;
    let (best_move, score) = alphabeta(
        rules,
        position,
        depth,
        i32::MIN,
        i32::MAX,
        maximizing,
        &mut nodes,
    );
    trace!(depth, maximizing, score, nodes, "search complete");
    SearchReport {
        best_move,
        score,
        nodes,
    }
}

fn alphabeta<R: Rules>(
    rules: &R,
    position: &R::Position,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    nodes: &mut u64,
) -> (Option<R::Move>, i32) {
    *nodes += 1;

    if depth == 0 || rules.is_terminal(position) {
        return (None, evaluate(rules, position));
    }

    let moves = rules.legal_moves(position);
    if moves.is_empty() {
        return (None, evaluate(rules, position));
    }

    let mut best_move = None;
    let mut best_score = if maximizing { i32::MIN } else { i32::MAX };

    for mv in moves {
        let Ok(child) = rules.apply_move(position, &mv) else {
            // legal_moves guarantees applicability
            continue;
        };
        let (_, value) = alphabeta(rules, &child, depth - 1, alpha, beta, !maximizing, nodes);

        if maximizing {
            if value > best_score {
                best_score = value;
                best_move = Some(mv);
            }
            alpha = alpha.max(best_score);
        } else {
            if value < best_score {
                best_score = value;
                best_move = Some(mv);
            }
            beta = beta.min(best_score);
        }

        if beta <= alpha {
            break;
        }
    }

    (best_move, best_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kingside_rules::ShakmatyRules;
    use shakmaty::fen::Fen;
    use shakmaty::{CastlingMode, Chess};

    fn position(fen: &str) -> Chess {
        fen.parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap()
    }

    #[test]
    fn test_depth_zero_returns_evaluation_only() {
        let rules = ShakmatyRules::new();
        let report = search(&rules, &rules.initial_position(), 0, true);

        assert!(report.best_move.is_none());
        assert_eq!(report.score, 0);
        assert_eq!(report.nodes, 1);
    }

    #[test]
    fn test_terminal_position_returns_no_move() {
        let rules = ShakmatyRules::new();
        // Fool's mate final position, White checkmated
        let mated = position("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");

        let report = search(&rules, &mated, 3, true);
        assert!(report.best_move.is_none());
    }

    #[test]
    fn test_search_is_deterministic() {
        let rules = ShakmatyRules::new();
        let start = rules.initial_position();

        let first = search(&rules, &start, 2, true);
        let second = search(&rules, &start, 2, true);

        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.score, second.score);
        assert_eq!(first.nodes, second.nodes);
    }

    #[test]
    fn test_maximizer_takes_hanging_queen() {
        let rules = ShakmatyRules::new();
        // White rook on a1 can capture the undefended queen on a8
        let pos = position("q3k3/8/8/8/8/8/8/R3K3 w - - 0 1");

        let report = search(&rules, &pos, 1, true);
        let mv = report.best_move.expect("a capture is available");
        assert_eq!(
            rules.move_to_notation(&pos, &mv),
            "Rxa8+",
            "search should win the queen"
        );
    }

    #[test]
    fn test_minimizer_prefers_low_scores() {
        let rules = ShakmatyRules::new();
        // Black to move, black rook can capture the undefended white queen
        let pos = position("r3k3/8/8/8/8/8/8/Q3K3 b - - 0 1");

        let report = search(&rules, &pos, 1, false);
        let mv = report.best_move.expect("a capture is available");
        assert_eq!(rules.move_to_notation(&pos, &mv), "Rxa1+");
        assert!(report.score < 0);
    }

    #[test]
    fn test_pruning_never_expands_more_nodes() {
        let rules = ShakmatyRules::new();
        let start = rules.initial_position();

        let shallow = search(&rules, &start, 1, true);
        let deep = search(&rules, &start, 3, true);

        assert!(deep.nodes > shallow.nodes);
        // 20 root moves and 20 replies each, plus the root itself
        assert_eq!(shallow.nodes, 21);
    }
}

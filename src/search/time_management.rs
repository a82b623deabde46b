//! Reusable time-management strategies for per-move budgeting.
//!
//! Callers pass raw clock data (`wtime/btime/winc/binc/movestogo`); the
//! strategy turns the mover's clock into a per-move allocation.

use crate::game_state::board::Board;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeManagementStrategy {
    /// Fixed rule: spend 1/20th of remaining clock.
    Fraction20,
    /// Adaptive rule using clock, increment, moves to go and game phase.
    #[default]
    Adaptive,
}

impl TimeManagementStrategy {
    pub fn from_option_value(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "fraction20" => Some(TimeManagementStrategy::Fraction20),
            "adaptive" => Some(TimeManagementStrategy::Adaptive),
            _ => None,
        }
    }

    pub const fn option_value(self) -> &'static str {
        match self {
            TimeManagementStrategy::Fraction20 => "fraction20",
            TimeManagementStrategy::Adaptive => "adaptive",
        }
    }
}

/// Milliseconds to spend on this move. `movestogo == 0` means unknown.
pub fn move_budget_ms(
    strategy: TimeManagementStrategy,
    board: &Board,
    remaining_ms: u64,
    inc_ms: u64,
    movestogo: u64,
) -> u64 {
    match strategy {
        TimeManagementStrategy::Fraction20 => (remaining_ms / 20).max(1),
        TimeManagementStrategy::Adaptive => adaptive_budget_ms(board, remaining_ms, inc_ms, movestogo),
    }
}

fn adaptive_budget_ms(board: &Board, remaining_ms: u64, inc_ms: u64, movestogo: u64) -> u64 {
    let ply = u64::from(board.fullmove_number().saturating_sub(1)) * 2;
    let expected_moves_left = if movestogo > 0 {
        movestogo
    } else if ply < 20 {
        40
    } else if ply < 60 {
        28
    } else {
        18
    };

    let reserve = (remaining_ms / 25).max(100).min(remaining_ms.saturating_sub(1));
    let usable = remaining_ms.saturating_sub(reserve);
    let base = usable / expected_moves_left;
    let inc_bonus = inc_ms.saturating_mul(3) / 4;
    let panic = if remaining_ms < 2_000 {
        remaining_ms / 12
    } else {
        0
    };
    let target = base.saturating_add(inc_bonus).saturating_add(panic);

    let min_budget = if remaining_ms < 1_000 { 5 } else { 15 };
    let max_budget = (remaining_ms / 4).max(1);
    target.clamp(min_budget.min(max_budget), max_budget)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction20_spends_a_twentieth() {
        let board = Board::default();
        assert_eq!(move_budget_ms(TimeManagementStrategy::Fraction20, &board, 60_000, 0, 0), 3_000);
        assert_eq!(move_budget_ms(TimeManagementStrategy::Fraction20, &board, 5, 0, 0), 1);
    }

    #[test]
    fn adaptive_budget_stays_within_a_quarter_of_the_clock() {
        let board = Board::default();
        for remaining in [1, 50, 900, 5_000, 60_000, 3_600_000] {
            for movestogo in [0, 1, 10, 40] {
                let budget = move_budget_ms(
                    TimeManagementStrategy::Adaptive,
                    &board,
                    remaining,
                    1_000,
                    movestogo,
                );
                assert!(budget >= 1);
                assert!(budget <= (remaining / 4).max(1), "{budget} > {remaining}/4");
            }
        }
    }

    #[test]
    fn adaptive_budget_grows_with_increment_and_fewer_moves() {
        let board = Board::default();
        let plain = move_budget_ms(TimeManagementStrategy::Adaptive, &board, 60_000, 0, 0);
        let with_inc = move_budget_ms(TimeManagementStrategy::Adaptive, &board, 60_000, 2_000, 0);
        let last_moves = move_budget_ms(TimeManagementStrategy::Adaptive, &board, 60_000, 0, 5);
        assert!(with_inc > plain);
        assert!(last_moves > plain);
    }

    #[test]
    fn option_values_round_trip() {
        for strategy in [TimeManagementStrategy::Fraction20, TimeManagementStrategy::Adaptive] {
            assert_eq!(
                TimeManagementStrategy::from_option_value(strategy.option_value()),
                Some(strategy)
            );
        }
        assert_eq!(TimeManagementStrategy::from_option_value("sudden"), None);
    }
}

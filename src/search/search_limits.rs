//! Search limits: caller parameters, cooperative cancellation and the single
//! resolved budget every search strategy checks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::game_state::board::Board;
use crate::game_state::chess_types::Color;
use crate::search::time_management::{move_budget_ms, TimeManagementStrategy};

/// Hard ceiling on iterative deepening.
pub const MAX_SEARCH_DEPTH: u8 = 64;
pub const DEFAULT_SEARCH_DEPTH: u8 = 4;
/// Depth cap for an `infinite` search that has no stop token to end it.
pub const MAX_UNCANCELLED_DEPTH: u8 = 5;

/// Caller-supplied limits, UCI `go` style. Zero (or `false`) means unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub wtime: u64,
    pub btime: u64,
    pub winc: u64,
    pub binc: u64,
    pub movestogo: u64,
    pub depth: u64,
    pub nodes: u64,
    pub mate: u64,
    pub movetime: u64,
    pub infinite: bool,
}

impl SearchParams {
    pub fn depth(depth: u64) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    pub fn movetime(movetime_ms: u64) -> Self {
        Self {
            movetime: movetime_ms,
            ..Self::default()
        }
    }

    pub fn nodes(nodes: u64) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }

    pub fn mate(moves: u64) -> Self {
        Self {
            mate: moves,
            ..Self::default()
        }
    }

    fn clock_for(&self, color: Color) -> (u64, u64) {
        match color {
            Color::White => (self.wtime, self.winc),
            Color::Black => (self.btime, self.binc),
        }
    }
}

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Budget resolved once at search start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub started_at: Instant,
    pub max_depth: u8,
    pub deadline: Option<Instant>,
    pub node_budget: Option<u64>,
    pub mate_moves: Option<u64>,
}

impl SearchLimits {
    pub fn resolve(
        params: &SearchParams,
        board: &Board,
        strategy: TimeManagementStrategy,
        default_depth: u8,
    ) -> Self {
        let started_at = Instant::now();
        let (clock, increment) = params.clock_for(board.side_to_move());

        let open_ended = params.infinite || params.nodes > 0 || params.movetime > 0 || clock > 0;
        let requested_depth = if params.depth > 0 {
            params.depth.min(u64::from(MAX_SEARCH_DEPTH)) as u8
        } else if params.mate > 0 {
            params.mate.saturating_mul(2).saturating_sub(1).min(u64::from(MAX_SEARCH_DEPTH)) as u8
        } else if open_ended {
            MAX_SEARCH_DEPTH
        } else {
            default_depth.min(MAX_SEARCH_DEPTH)
        };
        let max_depth = requested_depth.max(1);

        let budget_ms = if params.movetime > 0 {
            Some(params.movetime)
        } else if clock > 0 {
            Some(move_budget_ms(strategy, board, clock, increment, params.movestogo))
        } else {
            None
        };
        let deadline = budget_ms.map(|ms| started_at + Duration::from_millis(ms));

        let limits = Self {
            started_at,
            max_depth,
            deadline,
            node_budget: (params.nodes > 0).then_some(params.nodes),
            mate_moves: (params.mate > 0).then_some(params.mate),
        };
        trace!(
            max_depth = limits.max_depth,
            budget_ms = ?budget_ms,
            node_budget = ?limits.node_budget,
            mate_moves = ?limits.mate_moves,
            "resolved search limits"
        );
        limits
    }
}

/// Per-search node accounting and the one cancellation point the search
/// polls at every node.
#[derive(Debug)]
pub struct SearchControl {
    limits: SearchLimits,
    stop: StopToken,
    nodes: u64,
    stopped: bool,
}

impl SearchControl {
    pub fn new(limits: SearchLimits, stop: StopToken) -> Self {
        Self {
            limits,
            stop,
            nodes: 0,
            stopped: false,
        }
    }

    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Counts one visited node.
    #[inline]
    pub fn visit(&mut self) {
        self.nodes += 1;
    }

    /// True once any limit is hit. Latches, so an interrupted iteration
    /// unwinds consistently.
    pub fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        let node_limit_hit = self
            .limits
            .node_budget
            .is_some_and(|budget| self.nodes >= budget);
        let deadline_hit = self
            .limits
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline);
        self.stopped = node_limit_hit || deadline_hit || self.stop.is_stopped();
        self.stopped
    }

    pub fn elapsed(&self) -> Duration {
        self.limits.started_at.elapsed()
    }
}

//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! Deepens one ply at a time until the resolved [`SearchLimits`] say stop.
//! Only a completed iteration may replace the best move; an interrupted one
//! is used solely when nothing has completed yet. Leaves are extended with a
//! capture-only quiescence search unless disabled.

use std::cmp::Reverse;

use tracing::debug;

use crate::game_state::board::Board;
use crate::game_state::chess_types::PieceKind;
use crate::move_generation::legal_move_generator::{GeneratedMove, LegalMoveGenerator, MoveGenerator};
use crate::moves::chess_move::{Move, MoveKind};
use crate::search::board_scoring::{BoardScorer, PieceSquareScorer, DRAW_SCORE, MATE_SCORE};
use crate::search::search_limits::{
    SearchControl, SearchLimits, SearchParams, StopToken, DEFAULT_SEARCH_DEPTH,
    MAX_UNCANCELLED_DEPTH,
};
use crate::search::time_management::TimeManagementStrategy;

const INFINITY: i32 = MATE_SCORE + 1_000;
/// Scores at or beyond this magnitude encode a forced mate.
const MATE_THRESHOLD: i32 = MATE_SCORE - 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Extend horizon nodes with a capture-only search.
    pub quiescence: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { quiescence: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` only when the root has no legal moves.
    pub best_move: Option<Move>,
    pub best_score: i32,
    /// Deepest fully completed iteration.
    pub reached_depth: u8,
    pub nodes: u64,
    pub elapsed_ms: u64,
    pub pv: Vec<Move>,
}

impl SearchResult {
    /// Moves until mate when the score proves one: positive when the side to
    /// move mates, negative when it gets mated.
    pub fn mate_in(&self) -> Option<i32> {
        mate_distance(self.best_score)
    }
}

/// Chooses a move for `board`. Returns [`Move::NULL`] when there is no legal
/// move (checkmate or stalemate).
///
/// Nothing can stop this search from outside, so `infinite` without a depth,
/// node or time bound is capped at [`MAX_UNCANCELLED_DEPTH`].
pub fn search(params: &SearchParams, board: &Board) -> Move {
    search_with(
        board,
        &LegalMoveGenerator,
        &PieceSquareScorer,
        uncancelled_limits(params, board),
        StopToken::new(),
        SearchConfig::default(),
        |_| {},
    )
    .best_move
    .unwrap_or(Move::NULL)
}

fn uncancelled_limits(params: &SearchParams, board: &Board) -> SearchLimits {
    let mut limits = SearchLimits::resolve(
        params,
        board,
        TimeManagementStrategy::default(),
        DEFAULT_SEARCH_DEPTH,
    );
    let unbounded = params.infinite
        && params.depth == 0
        && params.mate == 0
        && limits.deadline.is_none()
        && limits.node_budget.is_none();
    if unbounded {
        limits.max_depth = limits.max_depth.min(MAX_UNCANCELLED_DEPTH);
    }
    limits
}

/// Full iterative deepening driver. `on_iteration` sees the running result
/// after every completed depth.
pub fn search_with<G, S, F>(
    board: &Board,
    generator: &G,
    scorer: &S,
    limits: SearchLimits,
    stop: StopToken,
    config: SearchConfig,
    mut on_iteration: F,
) -> SearchResult
where
    G: MoveGenerator,
    S: BoardScorer,
    F: FnMut(&SearchResult),
{
    let mut ctx = SearchContext {
        generator,
        scorer,
        config,
        control: SearchControl::new(limits, stop),
    };

    let mut root_moves = generator.generate_moves_with_successors(board);
    if root_moves.is_empty() {
        ctx.control.visit();
        return SearchResult {
            best_move: None,
            best_score: terminal_score(board, 0),
            reached_depth: 0,
            nodes: ctx.control.nodes(),
            elapsed_ms: ctx.control.elapsed().as_millis() as u64,
            pv: Vec::new(),
        };
    }
    order_moves(board, &mut root_moves);

    let mut result = SearchResult {
        best_move: Some(root_moves[0].mv),
        best_score: scorer.score(board),
        ..SearchResult::default()
    };

    for depth in 1..=limits.max_depth {
        let outcome = search_root(&mut ctx, &root_moves, depth);
        result.nodes = ctx.control.nodes();
        result.elapsed_ms = ctx.control.elapsed().as_millis() as u64;

        match outcome {
            RootOutcome::Completed { best_index, score, pv } => {
                result.best_move = Some(root_moves[best_index].mv);
                result.best_score = score;
                result.reached_depth = depth;
                result.pv = pv;
                // Previous best is searched first next iteration.
                root_moves[..=best_index].rotate_right(1);

                debug!(
                    depth,
                    score,
                    nodes = result.nodes,
                    elapsed_ms = result.elapsed_ms,
                    best_move = %root_moves[0].mv,
                    "iteration complete"
                );
                on_iteration(&result);

                if mate_goal_reached(&limits, score) || score >= MATE_SCORE - i32::from(depth) {
                    break;
                }
            }
            RootOutcome::Interrupted { best } => {
                if result.reached_depth == 0 {
                    if let Some((index, score, pv)) = best {
                        result.best_move = Some(root_moves[index].mv);
                        result.best_score = score;
                        result.pv = pv;
                    }
                }
                debug!(depth, nodes = result.nodes, "iteration interrupted by search limit");
                break;
            }
        }

        if ctx.control.should_stop() {
            break;
        }
    }

    result
}

struct SearchContext<'a, G, S> {
    generator: &'a G,
    scorer: &'a S,
    config: SearchConfig,
    control: SearchControl,
}

enum RootOutcome {
    Completed {
        best_index: usize,
        score: i32,
        pv: Vec<Move>,
    },
    /// Best fully searched root move of the unfinished iteration, if any.
    Interrupted { best: Option<(usize, i32, Vec<Move>)> },
}

fn search_root<G: MoveGenerator, S: BoardScorer>(
    ctx: &mut SearchContext<'_, G, S>,
    root_moves: &[GeneratedMove],
    depth: u8,
) -> RootOutcome {
    let mut alpha = -INFINITY;
    let beta = INFINITY;
    let mut best: Option<(usize, i32, Vec<Move>)> = None;

    for (index, child) in root_moves.iter().enumerate() {
        let mut child_pv = Vec::new();
        let score = -negamax(ctx, &child.board_after, depth - 1, -beta, -alpha, 1, &mut child_pv);
        if ctx.control.should_stop() {
            return RootOutcome::Interrupted { best };
        }

        if best.as_ref().map_or(true, |(_, best_score, _)| score > *best_score) {
            let mut pv = Vec::with_capacity(child_pv.len() + 1);
            pv.push(child.mv);
            pv.extend(child_pv);
            best = Some((index, score, pv));
        }
        alpha = alpha.max(score);
    }

    match best {
        Some((best_index, score, pv)) => RootOutcome::Completed {
            best_index,
            score,
            pv,
        },
        None => RootOutcome::Interrupted { best: None },
    }
}

fn negamax<G: MoveGenerator, S: BoardScorer>(
    ctx: &mut SearchContext<'_, G, S>,
    board: &Board,
    depth: u8,
    mut alpha: i32,
    beta: i32,
    ply: u32,
    pv: &mut Vec<Move>,
) -> i32 {
    // Quiescence counts the horizon node itself.
    if depth == 0 && ctx.config.quiescence {
        return quiescence(ctx, board, alpha, beta, ply);
    }

    ctx.control.visit();
    if ctx.control.should_stop() {
        return 0;
    }

    if depth == 0 {
        // Terminal positions must dominate material even at the horizon.
        if ctx.generator.generate_legal_moves(board).is_empty() {
            return terminal_score(board, ply);
        }
        return ctx.scorer.score(board);
    }

    let mut children = ctx.generator.generate_moves_with_successors(board);
    if children.is_empty() {
        return terminal_score(board, ply);
    }
    order_moves(board, &mut children);

    let mut best = -INFINITY;
    for child in &children {
        let mut child_pv = Vec::new();
        let score = -negamax(ctx, &child.board_after, depth - 1, -beta, -alpha, ply + 1, &mut child_pv);
        if ctx.control.should_stop() {
            return 0;
        }

        if score > best {
            best = score;
            pv.clear();
            pv.push(child.mv);
            pv.extend(child_pv);
        }
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }

    best
}

fn quiescence<G: MoveGenerator, S: BoardScorer>(
    ctx: &mut SearchContext<'_, G, S>,
    board: &Board,
    mut alpha: i32,
    beta: i32,
    ply: u32,
) -> i32 {
    ctx.control.visit();
    if ctx.control.should_stop() {
        return 0;
    }

    let mut children = ctx.generator.generate_moves_with_successors(board);
    if children.is_empty() {
        return terminal_score(board, ply);
    }

    let stand_pat = ctx.scorer.score(board);
    if stand_pat >= beta {
        return stand_pat;
    }
    alpha = alpha.max(stand_pat);

    children.retain(|child| child.mv.is_capture());
    order_moves(board, &mut children);

    let mut best = stand_pat;
    for child in &children {
        let score = -quiescence(ctx, &child.board_after, -beta, -alpha, ply + 1);
        if ctx.control.should_stop() {
            return 0;
        }

        best = best.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }

    best
}

/// Sorts `children` best-first: promotions and captures by most valuable
/// victim / least valuable attacker, then quiet moves in generation order.
pub fn order_moves(board: &Board, children: &mut [GeneratedMove]) {
    children.sort_by_cached_key(|child| Reverse(ordering_score(board, child.mv)));
}

fn ordering_score(board: &Board, mv: Move) -> i32 {
    let mut score = 0;
    if let Some(kind) = mv.promotion_kind() {
        score += 10_000 + ordering_value(kind);
    }
    if mv.is_capture() {
        let victim = if mv.kind == MoveKind::EnPassant {
            PieceKind::Pawn
        } else {
            board.at(mv.to).map_or(PieceKind::Pawn, |piece| piece.kind)
        };
        let attacker = board.at(mv.from).map_or(PieceKind::Pawn, |piece| piece.kind);
        score += 10_000 + 10 * ordering_value(victim) - ordering_value(attacker) / 10;
    }
    score
}

const fn ordering_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 300,
        PieceKind::Bishop => 300,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 2_000,
    }
}

fn terminal_score(board: &Board, ply: u32) -> i32 {
    if board.is_in_check() {
        -MATE_SCORE + ply as i32
    } else {
        DRAW_SCORE
    }
}

fn mate_goal_reached(limits: &SearchLimits, score: i32) -> bool {
    limits.mate_moves.is_some_and(|moves| {
        let plies = moves.saturating_mul(2).saturating_sub(1).min(u64::from(u16::MAX)) as i32;
        score >= MATE_SCORE - plies
    })
}

/// Full moves to mate encoded by `score`, signed from the side to move.
pub fn mate_distance(score: i32) -> Option<i32> {
    if score >= MATE_THRESHOLD {
        Some((MATE_SCORE - score + 1) / 2)
    } else if score <= -MATE_THRESHOLD {
        Some(-((MATE_SCORE + score) / 2))
    } else {
        None
    }
}

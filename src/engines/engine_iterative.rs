use crate::engines::engine_trait::{Engine, EngineOption, EngineOptionKind, EngineOutput};
use crate::errors::UciError;
use crate::game_state::board::Board;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::search::board_scoring::EvaluationKind;
use crate::search::iterative_deepening::{search_with, SearchConfig, SearchResult};
use crate::search::search_limits::{SearchLimits, SearchParams, StopToken, DEFAULT_SEARCH_DEPTH};
use crate::search::time_management::TimeManagementStrategy;

const MIN_DEFAULT_DEPTH: u8 = 1;
const MAX_DEFAULT_DEPTH: u8 = 32;

/// Default engine: iterative deepening alpha-beta over the legal move
/// generator, configured through UCI options.
pub struct IterativeEngine {
    default_depth: u8,
    time_strategy: TimeManagementStrategy,
    evaluation: EvaluationKind,
    config: SearchConfig,
    move_generator: LegalMoveGenerator,
}

impl IterativeEngine {
    pub fn new(default_depth: u8) -> Self {
        Self {
            default_depth: default_depth.clamp(MIN_DEFAULT_DEPTH, MAX_DEFAULT_DEPTH),
            time_strategy: TimeManagementStrategy::default(),
            evaluation: EvaluationKind::default(),
            config: SearchConfig::default(),
            move_generator: LegalMoveGenerator,
        }
    }

    pub fn default_depth(&self) -> u8 {
        self.default_depth
    }

    pub fn time_strategy(&self) -> TimeManagementStrategy {
        self.time_strategy
    }

    pub fn evaluation(&self) -> EvaluationKind {
        self.evaluation
    }

    pub fn quiescence(&self) -> bool {
        self.config.quiescence
    }
}

impl Default for IterativeEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEPTH)
    }
}

impl Engine for IterativeEngine {
    fn name(&self) -> &str {
        "Plum Core"
    }

    fn author(&self) -> &str {
        "plum_core developers"
    }

    fn options(&self) -> Vec<EngineOption> {
        vec![
            EngineOption {
                name: "DefaultDepth",
                kind: EngineOptionKind::Spin {
                    default: i64::from(DEFAULT_SEARCH_DEPTH),
                    min: i64::from(MIN_DEFAULT_DEPTH),
                    max: i64::from(MAX_DEFAULT_DEPTH),
                },
            },
            EngineOption {
                name: "TimeStrategy",
                kind: EngineOptionKind::Combo {
                    default: TimeManagementStrategy::default().option_value(),
                    vars: &["adaptive", "fraction20"],
                },
            },
            EngineOption {
                name: "Quiescence",
                kind: EngineOptionKind::Check {
                    default: SearchConfig::default().quiescence,
                },
            },
            EngineOption {
                name: "Evaluation",
                kind: EngineOptionKind::Combo {
                    default: EvaluationKind::default().option_value(),
                    vars: &["pst", "material"],
                },
            },
        ]
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), UciError> {
        let value = value.trim();
        let invalid = || UciError::InvalidOptionValue {
            name: name.to_owned(),
            value: value.to_owned(),
        };

        if name.eq_ignore_ascii_case("DefaultDepth") {
            let parsed = value.parse::<u8>().map_err(|_| invalid())?;
            if !(MIN_DEFAULT_DEPTH..=MAX_DEFAULT_DEPTH).contains(&parsed) {
                return Err(invalid());
            }
            self.default_depth = parsed;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("TimeStrategy") {
            self.time_strategy = TimeManagementStrategy::from_option_value(value).ok_or_else(invalid)?;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Quiescence") {
            self.config.quiescence = match value.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                _ => return Err(invalid()),
            };
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Evaluation") {
            self.evaluation = EvaluationKind::from_option_value(value).ok_or_else(invalid)?;
            return Ok(());
        }
        Err(UciError::UnknownOption(name.to_owned()))
    }

    fn choose_move(&mut self, board: &Board, params: &SearchParams, stop: StopToken) -> EngineOutput {
        let limits = SearchLimits::resolve(params, board, self.time_strategy, self.default_depth);
        let mut out = EngineOutput::default();

        let result = search_with(
            board,
            &self.move_generator,
            &self.evaluation,
            limits,
            stop,
            self.config,
            |iteration| out.info_lines.push(info_line(iteration)),
        );

        if result.reached_depth == 0 {
            out.info_lines.push(format!(
                "info string search stopped before depth 1, nodes {}",
                result.nodes
            ));
        }
        out.best_move = result.best_move;
        out
    }
}

/// Formats one completed iteration as a UCI `info` line.
pub fn info_line(result: &SearchResult) -> String {
    let score = match result.mate_in() {
        Some(moves) => format!("mate {moves}"),
        None => format!("cp {}", result.best_score),
    };
    let nps = result.nodes.saturating_mul(1_000) / result.elapsed_ms.max(1);
    let mut line = format!(
        "info depth {} score {score} nodes {} nps {nps} time {}",
        result.reached_depth, result.nodes, result.elapsed_ms
    );
    if !result.pv.is_empty() {
        line.push_str(" pv");
        for mv in &result.pv {
            line.push(' ');
            line.push_str(&mv.to_string());
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::chess_move::Move;
    use crate::search::board_scoring::MATE_SCORE;

    #[test]
    fn options_update_configuration() {
        let mut engine = IterativeEngine::default();
        assert_eq!(engine.default_depth(), 4);

        engine.set_option("DefaultDepth", "6").expect("depth should be accepted");
        engine.set_option("timestrategy", "Fraction20").expect("strategy should be accepted");
        engine.set_option("Quiescence", "false").expect("flag should be accepted");
        engine.set_option("Evaluation", "material").expect("evaluator should be accepted");

        assert_eq!(engine.default_depth(), 6);
        assert_eq!(engine.time_strategy(), TimeManagementStrategy::Fraction20);
        assert!(!engine.quiescence());
        assert_eq!(engine.evaluation(), EvaluationKind::Material);
    }

    #[test]
    fn invalid_options_are_rejected_without_side_effects() {
        let mut engine = IterativeEngine::default();
        assert!(matches!(
            engine.set_option("DefaultDepth", "0"),
            Err(UciError::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            engine.set_option("DefaultDepth", "deep"),
            Err(UciError::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            engine.set_option("Hash", "64"),
            Err(UciError::UnknownOption(name)) if name == "Hash"
        ));
        assert_eq!(engine.default_depth(), 4);
    }

    #[test]
    fn choose_move_reports_each_iteration() {
        let mut engine = IterativeEngine::default();
        let board = Board::default();
        let out = engine.choose_move(&board, &SearchParams::depth(2), StopToken::new());

        let best = out.best_move.expect("start position has moves");
        assert!(board.legal_moves().contains(&best));
        assert_eq!(out.info_lines.len(), 2);
        assert!(out.info_lines[0].starts_with("info depth 1 score cp "));
        assert!(out.info_lines[1].starts_with("info depth 2 score cp "));
        assert!(out.info_lines[1].contains(" pv "));
    }

    #[test]
    fn choose_move_on_terminal_board_has_no_move() {
        let mut engine = IterativeEngine::default();
        let mate = Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .expect("FEN should parse");
        let out = engine.choose_move(&mate, &SearchParams::default(), StopToken::new());
        assert_eq!(out.best_move, None);
    }

    #[test]
    fn info_line_reports_mate_scores() {
        let result = SearchResult {
            best_move: Some(Move::NULL),
            best_score: MATE_SCORE - 3,
            reached_depth: 3,
            nodes: 500,
            elapsed_ms: 0,
            pv: Vec::new(),
        };
        assert_eq!(
            info_line(&result),
            "info depth 3 score mate 2 nodes 500 nps 500000 time 0"
        );
    }
}

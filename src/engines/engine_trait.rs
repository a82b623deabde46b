//! Engine abstraction layer used by the UCI subsystem.
//!
//! Defines the output payload and the trait the protocol front end drives, so
//! engine strategies can be swapped without touching command handling.

use crate::errors::UciError;
use crate::game_state::board::Board;
use crate::moves::chess_move::Move;
use crate::search::search_limits::{SearchParams, StopToken};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// `None` when the position has no legal move.
    pub best_move: Option<Move>,
    pub info_lines: Vec<String>,
}

/// How an option is advertised in reply to `uci`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOptionKind {
    Spin { default: i64, min: i64, max: i64 },
    Combo { default: &'static str, vars: &'static [&'static str] },
    Check { default: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOption {
    pub name: &'static str,
    pub kind: EngineOptionKind,
}

impl EngineOption {
    /// The `option name ...` line sent during the `uci` handshake.
    pub fn uci_line(&self) -> String {
        match &self.kind {
            EngineOptionKind::Spin { default, min, max } => format!(
                "option name {} type spin default {default} min {min} max {max}",
                self.name
            ),
            EngineOptionKind::Combo { default, vars } => {
                let mut line = format!("option name {} type combo default {default}", self.name);
                for var in *vars {
                    line.push_str(" var ");
                    line.push_str(var);
                }
                line
            }
            EngineOptionKind::Check { default } => {
                format!("option name {} type check default {default}", self.name)
            }
        }
    }
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn author(&self) -> &str;

    fn options(&self) -> Vec<EngineOption> {
        Vec::new()
    }

    fn new_game(&mut self) {}

    fn set_option(&mut self, name: &str, _value: &str) -> Result<(), UciError> {
        Err(UciError::UnknownOption(name.to_owned()))
    }

    /// Searches `board` until `params` or `stop` end the search.
    fn choose_move(&mut self, board: &Board, params: &SearchParams, stop: StopToken) -> EngineOutput;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_lines_follow_uci_grammar() {
        let spin = EngineOption {
            name: "DefaultDepth",
            kind: EngineOptionKind::Spin { default: 4, min: 1, max: 32 },
        };
        assert_eq!(
            spin.uci_line(),
            "option name DefaultDepth type spin default 4 min 1 max 32"
        );

        let combo = EngineOption {
            name: "Evaluation",
            kind: EngineOptionKind::Combo { default: "pst", vars: &["pst", "material"] },
        };
        assert_eq!(
            combo.uci_line(),
            "option name Evaluation type combo default pst var pst var material"
        );

        let check = EngineOption {
            name: "Quiescence",
            kind: EngineOptionKind::Check { default: true },
        };
        assert_eq!(check.uci_line(), "option name Quiescence type check default true");
    }
}

//! UCI protocol front-end and command loop.
//!
//! Parses UCI commands, maintains the current position, runs `go` on a
//! worker thread that `stop` can interrupt, and emits protocol output through
//! a channel drained by a single printer.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::engines::engine_iterative::IterativeEngine;
use crate::engines::engine_trait::Engine;
use crate::errors::UciError;
use crate::game_state::board::Board;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::perft::perft_divide;
use crate::moves::chess_move::Move;
use crate::search::search_limits::{SearchParams, StopToken};
use crate::utils::long_algebraic::{move_to_long_algebraic, parse_long_algebraic};

/// Reads commands from stdin until `quit` or end of input. Output goes to
/// stdout; diagnostics go through `tracing`.
pub fn run_stdio_loop() -> io::Result<()> {
    let (tx, rx) = mpsc::channel::<String>();
    let printer = thread::spawn(move || -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for line in rx {
            writeln!(out, "{line}")?;
            out.flush()?;
        }
        Ok(())
    });

    let mut uci = UciState::new(tx);
    let mut quit = false;
    for line in io::stdin().lock().lines() {
        if uci.handle_command(&line?) {
            quit = true;
            break;
        }
    }
    if !quit {
        uci.finish_at_end_of_input();
    }
    // Dropping the state closes the channel and lets the printer finish.
    drop(uci);

    printer
        .join()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "output thread panicked"))?
}

/// What a `go` command asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoCommand {
    Search(SearchParams),
    Perft(u8),
}

struct ActiveSearch {
    stop: StopToken,
    infinite: bool,
    handle: JoinHandle<Box<dyn Engine>>,
}

pub struct UciState {
    board: Board,
    engine: Option<Box<dyn Engine>>,
    search: Option<ActiveSearch>,
    output: Sender<String>,
}

impl UciState {
    pub fn new(output: Sender<String>) -> Self {
        Self::with_engine(Box::new(IterativeEngine::default()), output)
    }

    pub fn with_engine(engine: Box<dyn Engine>, output: Sender<String>) -> Self {
        Self {
            board: Board::default(),
            engine: Some(engine),
            search: None,
            output,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    /// Handles one input line. Returns `true` once `quit` is received.
    /// Errors never end the session; they are reported as `info string`.
    pub fn handle_command(&mut self, line: &str) -> bool {
        match self.dispatch(line) {
            Ok(quit) => quit,
            Err(UciError::EmptyCommand) => false,
            Err(err) => {
                warn!(command = line.trim(), error = %err, "rejected UCI command");
                self.send(format!("info string error: {err}"));
                false
            }
        }
    }

    /// Blocks until the running search, if any, reports its move.
    pub fn wait_for_search(&mut self) {
        self.join_search();
    }

    fn dispatch(&mut self, line: &str) -> Result<bool, UciError> {
        let trimmed = line.trim();
        let mut tokens = trimmed.split_whitespace();
        let cmd = tokens.next().ok_or(UciError::EmptyCommand)?;
        debug!(command = trimmed, "received UCI command");

        match cmd {
            "uci" => {
                let engine = self.idle_engine();
                let mut lines = vec![
                    format!("id name {}", engine.name()),
                    format!("id author {}", engine.author()),
                ];
                lines.extend(engine.options().iter().map(|option| option.uci_line()));
                lines.push("uciok".to_owned());
                for line in lines {
                    self.send(line);
                }
            }
            "isready" => self.send("readyok".to_owned()),
            "ucinewgame" => {
                self.idle_engine().new_game();
                self.board = Board::default();
            }
            "setoption" => {
                let (name, value) = parse_setoption(tokens)?;
                self.idle_engine().set_option(&name, &value)?;
            }
            "position" => self.board = parse_position(tokens)?,
            "go" => match parse_go(tokens)? {
                GoCommand::Search(params) => self.start_search(params),
                GoCommand::Perft(depth) => self.run_perft(depth),
            },
            "stop" => self.stop_search(),
            "d" => {
                for line in self.board.to_string().lines() {
                    self.send(line.to_owned());
                }
            }
            "quit" => {
                self.stop_search();
                return Ok(true);
            }
            other => return Err(UciError::UnknownCommand(other.to_owned())),
        }
        Ok(false)
    }

    fn start_search(&mut self, params: SearchParams) {
        self.stop_search();
        let mut engine = self.take_engine();
        let board = self.board.clone();
        let stop = StopToken::new();
        let token = stop.clone();
        let output = self.output.clone();

        let handle = thread::spawn(move || {
            let result = engine.choose_move(&board, &params, token);
            for line in result.info_lines {
                let _ = output.send(line);
            }
            let best = result.best_move.unwrap_or(Move::NULL);
            let _ = output.send(format!("bestmove {}", move_to_long_algebraic(best)));
            engine
        });

        self.search = Some(ActiveSearch {
            stop,
            infinite: params.infinite,
            handle,
        });
    }

    fn run_perft(&mut self, depth: u8) {
        let mut total = 0u64;
        for (mv, nodes) in perft_divide(&LegalMoveGenerator, &self.board, depth) {
            total += nodes;
            self.send(format!("{mv}: {nodes}"));
        }
        self.send(String::new());
        self.send(format!("Nodes searched: {total}"));
    }

    fn stop_search(&mut self) {
        if let Some(search) = &self.search {
            search.stop.request_stop();
        }
        self.join_search();
    }

    /// A finite search is allowed to complete; an infinite one is stopped.
    fn finish_at_end_of_input(&mut self) {
        if self.search.as_ref().is_some_and(|search| search.infinite) {
            self.stop_search();
        } else {
            self.join_search();
        }
    }

    fn join_search(&mut self) {
        let Some(search) = self.search.take() else {
            return;
        };
        match search.handle.join() {
            Ok(engine) => self.engine = Some(engine),
            Err(_) => {
                warn!("search thread panicked; restoring a default engine");
                self.engine = Some(Box::new(IterativeEngine::default()));
            }
        }
    }

    /// Engine access for commands that must not race a search.
    fn idle_engine(&mut self) -> &mut Box<dyn Engine> {
        self.stop_search();
        self.engine
            .get_or_insert_with(|| Box::new(IterativeEngine::default()))
    }

    fn take_engine(&mut self) -> Box<dyn Engine> {
        self.join_search();
        self.engine
            .take()
            .unwrap_or_else(|| Box::new(IterativeEngine::default()))
    }

    fn send(&self, line: String) {
        let _ = self.output.send(line);
    }
}

impl Drop for UciState {
    fn drop(&mut self) {
        self.stop_search();
    }
}

/// `setoption name <id...> [value <x...>]`. Names may contain spaces.
fn parse_setoption<'a>(tokens: impl Iterator<Item = &'a str>) -> Result<(String, String), UciError> {
    let mut name = Vec::new();
    let mut value = Vec::new();
    // None before `name`, then false while reading the name, true for the value.
    let mut in_value: Option<bool> = None;

    for token in tokens {
        match token {
            "name" if in_value.is_none() => in_value = Some(false),
            "value" if in_value == Some(false) => in_value = Some(true),
            _ => match in_value {
                Some(false) => name.push(token),
                Some(true) => value.push(token),
                None => {
                    return Err(UciError::InvalidArgument {
                        name: "setoption",
                        value: token.to_owned(),
                    })
                }
            },
        }
    }

    if name.is_empty() {
        return Err(UciError::MissingArgument("name"));
    }
    Ok((name.join(" "), value.join(" ")))
}

/// `position (startpos | fen <fields...>) [moves <m1> <m2> ...]`. The
/// current board is only replaced when every move applies.
fn parse_position<'a>(tokens: impl Iterator<Item = &'a str>) -> Result<Board, UciError> {
    let mut tokens = tokens.peekable();
    let mut board = match tokens.next() {
        Some("startpos") => Board::default(),
        Some("fen") => {
            let mut fields = Vec::new();
            while let Some(&token) = tokens.peek() {
                if token == "moves" {
                    break;
                }
                fields.push(token);
                tokens.next();
            }
            if fields.is_empty() {
                return Err(UciError::MissingArgument("fen"));
            }
            Board::from_fen(&fields.join(" "))?
        }
        Some(other) => {
            return Err(UciError::InvalidArgument {
                name: "position",
                value: other.to_owned(),
            })
        }
        None => return Err(UciError::MissingArgument("position")),
    };

    match tokens.next() {
        Some("moves") => {
            for text in tokens {
                let mv = parse_long_algebraic(text, &board)?;
                board = board.do_move(mv);
            }
        }
        Some(other) => {
            return Err(UciError::InvalidArgument {
                name: "position",
                value: other.to_owned(),
            })
        }
        None => {}
    }
    Ok(board)
}

/// Parses the arguments after `go`. Unsupported tokens such as `ponder` are
/// ignored.
pub fn parse_go<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Result<GoCommand, UciError> {
    let mut params = SearchParams::default();

    while let Some(token) = tokens.next() {
        match token {
            "wtime" => params.wtime = next_number("wtime", &mut tokens)?,
            "btime" => params.btime = next_number("btime", &mut tokens)?,
            "winc" => params.winc = next_number("winc", &mut tokens)?,
            "binc" => params.binc = next_number("binc", &mut tokens)?,
            "movestogo" => params.movestogo = next_number("movestogo", &mut tokens)?,
            "depth" => params.depth = next_number("depth", &mut tokens)?,
            "nodes" => params.nodes = next_number("nodes", &mut tokens)?,
            "mate" => params.mate = next_number("mate", &mut tokens)?,
            "movetime" => params.movetime = next_number("movetime", &mut tokens)?,
            "infinite" => params.infinite = true,
            "perft" => {
                let depth = next_number("perft", &mut tokens)?;
                let depth = u8::try_from(depth).map_err(|_| UciError::InvalidArgument {
                    name: "perft",
                    value: depth.to_string(),
                })?;
                return Ok(GoCommand::Perft(depth));
            }
            other => debug!(token = other, "ignoring unsupported go token"),
        }
    }
    Ok(GoCommand::Search(params))
}

fn next_number<'a>(name: &'static str, tokens: &mut impl Iterator<Item = &'a str>) -> Result<u64, UciError> {
    let value = tokens.next().ok_or(UciError::MissingArgument(name))?;
    // Clocks may go negative in some GUIs; treat that as an empty clock.
    if let Some(negative) = value.strip_prefix('-') {
        if negative.parse::<u64>().is_ok() {
            return Ok(0);
        }
    }
    value.parse::<u64>().map_err(|_| UciError::InvalidArgument {
        name,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::Receiver;

    use super::*;

    fn session() -> (UciState, Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        (UciState::new(tx), rx)
    }

    fn drain(rx: &Receiver<String>) -> Vec<String> {
        rx.try_iter().collect()
    }

    fn go(text: &str) -> Result<GoCommand, UciError> {
        parse_go(text.split_whitespace().skip(1))
    }

    #[test]
    fn uci_handshake_lists_identity_and_options() {
        let (mut uci, rx) = session();
        assert!(!uci.handle_command("uci"));
        let lines = drain(&rx);
        assert!(lines[0].starts_with("id name "));
        assert!(lines[1].starts_with("id author "));
        assert!(lines
            .iter()
            .any(|line| line == "option name DefaultDepth type spin default 4 min 1 max 32"));
        assert!(lines.iter().any(|line| line.starts_with("option name Evaluation type combo")));
        assert_eq!(lines.last().map(String::as_str), Some("uciok"));

        uci.handle_command("isready");
        assert_eq!(drain(&rx), vec!["readyok".to_owned()]);
    }

    #[test]
    fn position_startpos_with_moves_updates_board() {
        let (mut uci, rx) = session();
        uci.handle_command("position startpos moves e2e4 e7e5 g1f3");
        assert!(drain(&rx).is_empty());
        assert_eq!(
            uci.board().fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );
    }

    #[test]
    fn position_fen_with_moves_updates_board() {
        let (mut uci, _rx) = session();
        uci.handle_command("position fen 4k3/P7/8/8/8/8/8/4K3 w - - 0 1 moves a7a8q");
        assert_eq!(uci.board().fen(), "Q3k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn bad_position_keeps_previous_board_and_reports_error() {
        let (mut uci, rx) = session();
        uci.handle_command("position startpos moves e2e4");
        let before = uci.board().clone();

        uci.handle_command("position startpos moves e2e5");
        uci.handle_command("position fen 8/8/8 w - - 0 1");
        uci.handle_command("position sideways");

        assert_eq!(uci.board(), &before);
        let lines = drain(&rx);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.starts_with("info string error: ")));
    }

    #[test]
    fn go_depth_reports_info_and_a_legal_bestmove() {
        let (mut uci, rx) = session();
        uci.handle_command("position startpos moves e2e4");
        uci.handle_command("go depth 2");
        uci.wait_for_search();

        let lines = drain(&rx);
        assert!(lines[0].starts_with("info depth 1 "));
        let bestmove = lines.last().expect("search should report a move");
        let text = bestmove.strip_prefix("bestmove ").expect("last line is bestmove");
        let mv = parse_long_algebraic(text, uci.board()).expect("bestmove should be legal");
        assert!(uci.board().legal_moves().contains(&mv));
    }

    #[test]
    fn stop_interrupts_infinite_search() {
        let (mut uci, rx) = session();
        uci.handle_command("go infinite");
        assert!(uci.is_searching());
        uci.handle_command("stop");
        assert!(!uci.is_searching());

        let lines = drain(&rx);
        let bestmove = lines.last().expect("stopped search still answers");
        assert!(bestmove.starts_with("bestmove "));
        assert_ne!(bestmove, "bestmove 0000");
    }

    #[test]
    fn go_on_terminal_position_answers_null_move() {
        let (mut uci, rx) = session();
        uci.handle_command("position fen k7/8/1QK5/8/8/8/8/8 b - - 0 1");
        uci.handle_command("go depth 3");
        uci.wait_for_search();
        assert_eq!(drain(&rx).last().map(String::as_str), Some("bestmove 0000"));
    }

    #[test]
    fn go_perft_prints_divide_and_total() {
        let (mut uci, rx) = session();
        uci.handle_command("go perft 2");
        let lines = drain(&rx);
        assert_eq!(lines.len(), 22);
        assert!(lines.contains(&"e2e4: 20".to_owned()));
        assert_eq!(lines.last().map(String::as_str), Some("Nodes searched: 400"));
    }

    #[test]
    fn setoption_routes_to_engine_and_reports_bad_values() {
        let (mut uci, rx) = session();
        uci.handle_command("setoption name Evaluation value material");
        uci.handle_command("setoption name DefaultDepth value 2");
        assert!(drain(&rx).is_empty());

        uci.handle_command("setoption name DefaultDepth value 99");
        uci.handle_command("setoption name Ponder value true");
        uci.handle_command("setoption value 3");
        let lines = drain(&rx);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("unknown option 'Ponder'"));
    }

    #[test]
    fn setoption_names_may_contain_spaces() {
        let tokens = "name Skill Level value 10".split_whitespace();
        assert_eq!(
            parse_setoption(tokens).expect("setoption should parse"),
            ("Skill Level".to_owned(), "10".to_owned())
        );
    }

    #[test]
    fn display_and_unknown_commands() {
        let (mut uci, rx) = session();
        uci.handle_command("d");
        let lines = drain(&rx);
        assert_eq!(lines.len(), 11);
        assert!(lines[10].starts_with("Fen: rnbqkbnr/"));

        uci.handle_command("   ");
        uci.handle_command("castle please");
        assert_eq!(
            drain(&rx),
            vec!["info string error: unknown command 'castle'".to_owned()]
        );
    }

    #[test]
    fn ucinewgame_resets_position_and_quit_ends_session() {
        let (mut uci, _rx) = session();
        uci.handle_command("position startpos moves d2d4");
        uci.handle_command("ucinewgame");
        assert_eq!(uci.board(), &Board::default());
        assert!(uci.handle_command("quit"));
    }

    #[test]
    fn parse_go_reads_clock_and_limit_fields() {
        let parsed = go("go wtime 120000 btime 60000 winc 1000 binc 500 movestogo 24 depth 6")
            .expect("go should parse");
        assert_eq!(
            parsed,
            GoCommand::Search(SearchParams {
                wtime: 120_000,
                btime: 60_000,
                winc: 1_000,
                binc: 500,
                movestogo: 24,
                depth: 6,
                ..SearchParams::default()
            })
        );

        let parsed = go("go nodes 50000 mate 3 ponder infinite").expect("go should parse");
        assert_eq!(
            parsed,
            GoCommand::Search(SearchParams {
                nodes: 50_000,
                mate: 3,
                infinite: true,
                ..SearchParams::default()
            })
        );

        assert_eq!(go("go perft 3").expect("perft should parse"), GoCommand::Perft(3));
        assert_eq!(
            go("go wtime -20").expect("negative clock should parse"),
            GoCommand::Search(SearchParams::default())
        );
    }

    #[test]
    fn parse_go_rejects_missing_and_malformed_numbers() {
        assert!(matches!(go("go depth"), Err(UciError::MissingArgument("depth"))));
        assert!(matches!(
            go("go movetime soon"),
            Err(UciError::InvalidArgument { name: "movetime", .. })
        ));
        assert!(matches!(
            go("go perft 300"),
            Err(UciError::InvalidArgument { name: "perft", .. })
        ));
    }
}

//! Blocking UCI wrapper around an external engine process.

use crate::Evaluation;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use thiserror::Error;
use tracing::{debug, trace};

/// Maximum number of lines to read before giving up on a UCI response.
pub const MAX_UCI_LINES: usize = 10_000;

/// Errors that can occur when working with chess engines.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine executable was not found at the specified path.
    #[error("Engine not found at path: {0}")]
    NotFound(String),
    /// Failed to spawn or talk to the engine process.
    #[error("Failed to spawn engine: {0}")]
    SpawnError(#[from] std::io::Error),
    /// Engine failed to complete the UCI handshake.
    #[error("Engine initialization failed")]
    InitFailed,
    /// Engine returned an invalid or unexpected response.
    #[error("Invalid engine response: {0}")]
    InvalidResponse(String),
    /// The position handed to the engine is not a legal chess position.
    #[error("Invalid position {fen:?}: {reason}")]
    InvalidPosition { fen: String, reason: String },
}

/// Search limits for a single `go` command.
///
/// Both limits are sent; the engine stops at whichever it reaches first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineLimits {
    pub depth: u32,
    pub movetime_ms: u64,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            depth: 15,
            movetime_ms: 1_000,
        }
    }
}

impl EngineLimits {
    fn go_command(&self) -> String {
        format!("go depth {} movetime {}", self.depth, self.movetime_ms)
    }
}

/// Result of analyzing a chess position.
#[derive(Debug, Clone)]
pub struct PositionAnalysis {
    /// The best move found in UCI notation, `(none)` when the side to move has no moves.
    pub best_move: String,
    /// Evaluation relative to the side to move.
    pub evaluation: Evaluation,
    /// The search depth reached.
    pub depth: u32,
    /// The number of nodes searched.
    pub nodes: u64,
    /// The principal variation.
    pub pv: Vec<String>,
}

/// Fields of interest from one `info` line.
#[derive(Debug, Clone, PartialEq)]
struct SearchInfo {
    depth: u32,
    evaluation: Evaluation,
    nodes: u64,
    pv: Vec<String>,
}

/// Wrapper for UCI-compatible analysis engines like Stockfish.
pub struct AnalysisEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    name: String,
    author: String,
}

impl AnalysisEngine {
    /// Spawns the engine at `engine_path` and completes the UCI handshake.
    ///
    /// # Errors
    ///
    /// - `EngineError::NotFound` if the engine path doesn't exist
    /// - `EngineError::SpawnError` if the engine process fails to start
    /// - `EngineError::InitFailed` if the handshake does not complete
    ///
    /// A bare program name such as `stockfish` is looked up on `PATH`.
    pub fn new(engine_path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let requested = engine_path.as_ref();
        let engine_path = resolve_engine_path(requested)
            .ok_or_else(|| EngineError::NotFound(requested.display().to_string()))?;

        let mut process = Command::new(engine_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdin = process.stdin.take().ok_or(EngineError::InitFailed)?;
        let stdout = process.stdout.take().ok_or(EngineError::InitFailed)?;

        let mut engine = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            name: String::new(),
            author: String::new(),
        };
        engine.handshake()?;
        debug!(name = %engine.name, author = %engine.author, "engine ready");

        Ok(engine)
    }

    fn handshake(&mut self) -> Result<(), EngineError> {
        self.send_command("uci")?;

        let mut name = None;
        let mut author = None;
        let mut found = false;
        for _ in 0..MAX_UCI_LINES {
            let line = self.read_line()?;
            if let Some(value) = line.strip_prefix("id name ") {
                name = Some(value.to_string());
            } else if let Some(value) = line.strip_prefix("id author ") {
                author = Some(value.to_string());
            } else if line == "uciok" {
                found = true;
                break;
            }
        }
        if !found {
            return Err(EngineError::InitFailed);
        }

        self.name = name.unwrap_or_else(|| "Unknown".to_string());
        self.author = author.unwrap_or_else(|| "Unknown".to_string());
        self.wait_ready()
    }

    /// Returns the engine's name as reported via `id name`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the engine's author as reported via `id author`.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Analyzes a position given in FEN notation.
    ///
    /// Illegal setups are rejected with `InvalidPosition` before anything is sent.
    pub fn analyze_fen(
        &mut self,
        fen: &str,
        limits: &EngineLimits,
    ) -> Result<PositionAnalysis, EngineError> {
        validate_fen(fen)?;
        self.send_command(&format!("position fen {fen}"))?;
        self.search(limits)
    }

    /// Analyzes the position reached by playing `moves` from the start position.
    pub fn analyze_moves(
        &mut self,
        moves: &[String],
        limits: &EngineLimits,
    ) -> Result<PositionAnalysis, EngineError> {
        if moves.is_empty() {
            self.send_command("position startpos")?;
        } else {
            self.send_command(&format!("position startpos moves {}", moves.join(" ")))?;
        }
        self.search(limits)
    }

    /// Returns the engine's preferred move, or `None` when there is no legal move.
    pub fn best_move(
        &mut self,
        fen: &str,
        limits: &EngineLimits,
    ) -> Result<Option<String>, EngineError> {
        let analysis = self.analyze_fen(fen, limits)?;
        Ok(Some(analysis.best_move).filter(|mv| mv != "(none)"))
    }

    fn search(&mut self, limits: &EngineLimits) -> Result<PositionAnalysis, EngineError> {
        self.send_command(&limits.go_command())?;

        let mut latest: Option<SearchInfo> = None;
        for _ in 0..MAX_UCI_LINES {
            let line = self.read_line()?;

            if line.starts_with("info ") {
                if let Some(info) = parse_info_line(&line) {
                    latest = Some(info);
                }
            } else if let Some(rest) = line.strip_prefix("bestmove") {
                let best_move = rest
                    .split_whitespace()
                    .next()
                    .ok_or_else(|| EngineError::InvalidResponse(line.clone()))?
                    .to_string();
                let info = latest.ok_or_else(|| {
                    EngineError::InvalidResponse("bestmove without a score".to_string())
                })?;
                return Ok(PositionAnalysis {
                    best_move,
                    evaluation: info.evaluation,
                    depth: info.depth,
                    nodes: info.nodes,
                    pv: info.pv,
                });
            }
        }

        Err(EngineError::InvalidResponse(
            "Too many lines without bestmove".to_string(),
        ))
    }

    /// Stops the current search.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        self.send_command("stop")
    }

    /// Clears the engine's hash tables and waits until it is ready again.
    pub fn clear_hash(&mut self) -> Result<(), EngineError> {
        self.send_command("ucinewgame")?;
        self.wait_ready()
    }

    fn wait_ready(&mut self) -> Result<(), EngineError> {
        self.send_command("isready")?;
        for _ in 0..MAX_UCI_LINES {
            if self.read_line()? == "readyok" {
                return Ok(());
            }
        }
        Err(EngineError::InitFailed)
    }

    fn send_command(&mut self, command: &str) -> Result<(), EngineError> {
        trace!(">> {command}");
        writeln!(self.stdin, "{command}")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(EngineError::InvalidResponse(
                "Engine closed unexpectedly".to_string(),
            ));
        }
        let line = line.trim().to_string();
        trace!("<< {line}");
        Ok(line)
    }
}

impl Drop for AnalysisEngine {
    fn drop(&mut self) {
        let _ = self.send_command("quit");
        let _ = self.process.wait();
    }
}

fn resolve_engine_path(path: &Path) -> Option<PathBuf> {
    if path.exists() {
        return Some(path.to_path_buf());
    }
    if path.components().count() != 1 {
        return None;
    }
    let search = std::env::var_os("PATH")?;
    std::env::split_paths(&search)
        .map(|dir| dir.join(path))
        .find(|candidate| candidate.is_file())
}

fn validate_fen(fen: &str) -> Result<(), EngineError> {
    let invalid = |reason: String| EngineError::InvalidPosition {
        fen: fen.to_string(),
        reason,
    };
    let setup = Fen::from_ascii(fen.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    setup
        .into_position::<Chess>(CastlingMode::Standard)
        .map_err(|e| invalid(e.to_string()))?;
    Ok(())
}

/// Parses `info ... depth D ... score (cp X | mate Y) ... nodes N ... pv ...`.
///
/// Lines without both a depth and a score (e.g. `info string`, `currmove`
/// updates) yield `None`.
fn parse_info_line(line: &str) -> Option<SearchInfo> {
    let mut tokens = line.split_whitespace();
    let mut depth = None;
    let mut cp = None;
    let mut mate = None;
    let mut nodes = 0;
    let mut pv = Vec::new();

    while let Some(token) = tokens.next() {
        match token {
            "string" => return None,
            "depth" => depth = tokens.next().and_then(|t| t.parse().ok()),
            "nodes" => nodes = tokens.next().and_then(|t| t.parse().ok()).unwrap_or(0),
            "score" => match tokens.next() {
                Some("cp") => cp = tokens.next().and_then(|t| t.parse().ok()),
                Some("mate") => mate = tokens.next().and_then(|t| t.parse().ok()),
                _ => {}
            },
            "pv" => {
                pv = tokens.by_ref().map(str::to_string).collect();
            }
            _ => {}
        }
    }

    Some(SearchInfo {
        depth: depth?,
        evaluation: Evaluation::from_uci_score(cp, mate)?,
        nodes,
        pv,
    })
}

//! 串口 JSON 协议
//!
//! 每行一个 JSON 对象。入站命令以 `command` 字段区分（MOVE / RESET / MODE），
//! 出站消息以 `type` 字段区分（info / board / win_status / error / game_status / game_mode）。

use crate::ai::{AIConfig, AIStrategy, RandomAI};
use crate::board::GameState;
use crate::types::{GameMode, GameResult, Player, Position, BOARD_SIZE};
use serde::{Deserialize, Serialize};

/// 启动横幅
pub const BANNER: &str = "Tic-Tac-Toe ready.";

/// 入站命令
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "UPPERCASE")]
pub enum Command {
    /// 当前玩家落子
    Move { row: i64, col: i64 },
    /// 在当前模式下重新开局
    Reset,
    /// 切换模式并重新开局
    Mode { mode: i64 },
}

/// 出站消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Info { message: String },
    Board { board: [[String; BOARD_SIZE]; BOARD_SIZE] },
    WinStatus { message: String },
    Error { message: String },
    GameStatus { message: String },
    GameMode { message: String },
}

impl Message {
    pub fn info(msg: &str) -> Self {
        Message::Info {
            message: msg.to_string(),
        }
    }

    pub fn board(state: &GameState) -> Self {
        Message::Board {
            board: state.board().to_rows(),
        }
    }

    pub fn result(result: GameResult) -> Self {
        Message::WinStatus {
            message: result.message(),
        }
    }

    pub fn error(msg: &str) -> Self {
        Message::Error {
            message: msg.to_string(),
        }
    }

    pub fn game_status(msg: &str) -> Self {
        Message::GameStatus {
            message: msg.to_string(),
        }
    }

    pub fn game_mode(mode: GameMode) -> Self {
        Message::GameMode {
            message: format!("Game mode set to {}", mode.code()),
        }
    }

    /// 编码为一行 JSON（不含换行符）
    pub fn to_line(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Failed to encode message: {}", e))
    }
}

/// 解析一行入站数据
pub fn parse_command(line: &str) -> Result<Command, String> {
    serde_json::from_str(line.trim()).map_err(|e| format!("Invalid command: {}", e))
}

/// 无法解析的帧如何处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseErrorPolicy {
    /// 丢弃，不回复
    #[default]
    Silent,
    /// 回复 error 消息
    Report,
}

/// 引擎配置
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub ai: AIConfig,
    pub parse_errors: ParseErrorPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            ai: AIConfig::default(),
            parse_errors: ParseErrorPolicy::Silent,
        }
    }
}

/// 协议处理器
///
/// 持有唯一的对局状态；每条命令的状态修改和全部回复在一次调用内完成
pub struct ProtocolHandler {
    state: GameState,
    ai: Box<dyn AIStrategy>,
    parse_errors: ParseErrorPolicy,
    dropped_frames: u64,
}

impl ProtocolHandler {
    /// 使用随机 AI 创建
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_strategy(Box::new(RandomAI::new(config.ai.seed)), config.parse_errors)
    }

    /// 使用指定策略创建
    pub fn with_strategy(ai: Box<dyn AIStrategy>, parse_errors: ParseErrorPolicy) -> Self {
        ProtocolHandler {
            state: GameState::new(),
            ai,
            parse_errors,
            dropped_frames: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// 被丢弃（或被拒绝）的无法解析帧数量
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    /// 处理一帧原始字节（不含换行符），非 UTF-8 的帧按无法解析处理
    pub fn handle_frame(&mut self, bytes: &[u8]) -> Vec<Message> {
        match std::str::from_utf8(bytes) {
            Ok(line) => self.handle_line(line),
            Err(e) => self.reject_frame(&format!("{} bytes, {}", bytes.len(), e)),
        }
    }

    /// 处理一行原始输入
    pub fn handle_line(&mut self, line: &str) -> Vec<Message> {
        match parse_command(line) {
            Ok(cmd) => self.handle_command(cmd),
            Err(e) => self.reject_frame(&format!("{:?}: {}", line, e)),
        }
    }

    /// 丢弃一帧无法解析的数据，按策略决定是否回复
    pub fn reject_frame(&mut self, reason: &str) -> Vec<Message> {
        self.dropped_frames += 1;
        log::warn!("Dropping frame {}", reason);
        match self.parse_errors {
            ParseErrorPolicy::Silent => Vec::new(),
            ParseErrorPolicy::Report => vec![Message::error("Invalid command.")],
        }
    }

    /// 处理一条命令，返回按顺序发送的全部消息
    pub fn handle_command(&mut self, cmd: Command) -> Vec<Message> {
        log::debug!("Command: {:?}", cmd);
        let mut out = Vec::new();

        match cmd {
            Command::Move { row, col } => self.handle_move(Position::new(row, col), &mut out),
            Command::Reset => self.handle_reset(&mut out),
            Command::Mode { mode } => self.handle_mode(mode, &mut out),
        }

        if self.state.mode() == GameMode::AIvAI && !self.state.is_game_over() {
            self.run_autoplay(&mut out);
        }

        out
    }

    fn handle_move(&mut self, pos: Position, out: &mut Vec<Message>) {
        let player = self.state.current_player();
        if !self.state.apply_move(pos, player) {
            log::warn!(
                "Rejected move {} for {} (game_over={})",
                pos,
                player,
                self.state.is_game_over()
            );
            out.push(Message::error("Invalid move."));
            return;
        }

        out.push(Message::board(&self.state));
        match self.state.settle(player) {
            Some(result) => {
                log::info!("Game over: {}", result.message());
                out.push(Message::result(result));
            }
            None => self.state.switch_player(),
        }

        if self.state.mode() == GameMode::PvAI
            && self.state.current_player() == Player::O
            && !self.state.is_game_over()
        {
            self.ai_reply(out);
        }
    }

    /// 人机模式下 AI（O）立即应对一步
    fn ai_reply(&mut self, out: &mut Vec<Message>) {
        match self.state.random_move(Player::O, self.ai.as_mut()) {
            Some(pos) => {
                log::debug!("AI O -> {}", pos);
                out.push(Message::board(&self.state));
                if let Some(result) = self.state.settle(Player::O) {
                    log::info!("Game over: {}", result.message());
                    out.push(Message::result(result));
                }
            }
            None => log::warn!("AI had no move for O"),
        }
        // 无论对局是否结束都交还给 X
        self.state.set_current_player(Player::X);
    }

    fn handle_reset(&mut self, out: &mut Vec<Message>) {
        self.state.reset();
        log::info!("Game reset (mode={})", self.state.mode());
        out.push(Message::game_status("Game reset."));
        out.push(Message::board(&self.state));
    }

    fn handle_mode(&mut self, code: i64, out: &mut Vec<Message>) {
        let Some(mode) = GameMode::from_code(code) else {
            log::warn!("Rejected mode {}", code);
            out.push(Message::error("Invalid mode."));
            return;
        };

        self.state.set_mode(mode);
        log::info!("Game mode set to {} ({})", mode.code(), mode);
        out.push(Message::game_mode(mode));
        out.push(Message::game_status("Game reset."));
        out.push(Message::board(&self.state));
    }

    /// AI 对 AI：同步下到终局
    fn run_autoplay(&mut self, out: &mut Vec<Message>) {
        while !self.state.is_game_over() {
            if self.state.check_draw() {
                self.state.finish();
                log::info!("Game over: {}", GameResult::Draw.message());
                out.push(Message::result(GameResult::Draw));
                break;
            }

            let player = self.state.current_player();
            let Some(pos) = self.state.random_move(player, self.ai.as_mut()) else {
                log::warn!("AI had no move for {}, stopping autoplay", player);
                break;
            };
            log::debug!("AI {} -> {}", player, pos);
            out.push(Message::board(&self.state));

            if self.state.check_win(player) {
                self.state.finish();
                let result = GameResult::Win(player);
                log::info!("Game over: {}", result.message());
                out.push(Message::result(result));
                break;
            }
            self.state.switch_player();
        }
    }
}

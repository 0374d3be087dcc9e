//! Tic-Tac-Toe Serial Engine
//!
//! 井字棋引擎 - 通过行分隔 JSON 串口协议控制

pub mod ai;
pub mod board;
pub mod protocol;
pub mod server;
pub mod types;

pub use ai::{AIConfig, AIStrategy, RandomAI};
pub use board::{Board, GameState};
pub use protocol::{
    parse_command, Command, EngineConfig, Message, ParseErrorPolicy, ProtocolHandler, BANNER,
};
pub use server::{run_server, ServerOptions, ServerStats};
pub use types::{Cell, GameMode, GameResult, Player, Position};

//! 井字棋核心类型定义
//!
//! 定义棋盘、玩家、模式等基础数据类型

use std::fmt;

/// 棋盘边长
pub const BOARD_SIZE: usize = 3;

/// 格子总数
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 玩家
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// 获取对手
    pub fn opposite(&self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// 从字符解析
    pub fn from_char(c: char) -> Option<Player> {
        match c {
            'X' => Some(Player::X),
            'O' => Some(Player::O),
            _ => None,
        }
    }

    /// 转换为字符
    pub fn to_char(&self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// 格子状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Cell::Empty
    }

    /// 格子上的玩家，空格为 None
    pub fn player(&self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
        }
    }

    /// 协议中的单字符表示（" ", "X", "O"）
    pub fn to_wire_str(&self) -> &'static str {
        match self {
            Cell::Empty => " ",
            Cell::X => "X",
            Cell::O => "O",
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

/// 游戏模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    /// 人对人
    #[default]
    PvP,
    /// 人对 AI（AI 执 O）
    PvAI,
    /// AI 对 AI，自动下完整局
    AIvAI,
}

impl GameMode {
    /// 从协议中的模式编号解析
    pub fn from_code(code: i64) -> Option<GameMode> {
        match code {
            0 => Some(GameMode::PvP),
            1 => Some(GameMode::PvAI),
            2 => Some(GameMode::AIvAI),
            _ => None,
        }
    }

    /// 协议中的模式编号
    pub fn code(&self) -> u8 {
        match self {
            GameMode::PvP => 0,
            GameMode::PvAI => 1,
            GameMode::AIvAI => 2,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameMode::PvP => "User vs User",
            GameMode::PvAI => "User vs AI",
            GameMode::AIvAI => "AI vs AI",
        };
        write!(f, "{}", name)
    }
}

/// 棋盘位置 (row, col)
///
/// 使用有符号整数，越界坐标（包括负数）可以被表示并由 `is_valid` 拒绝
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i64,
    pub col: i64,
}

impl Position {
    pub fn new(row: i64, col: i64) -> Self {
        Position { row, col }
    }

    /// 检查位置是否在棋盘范围内
    pub fn is_valid(&self) -> bool {
        (0..BOARD_SIZE as i64).contains(&self.row) && (0..BOARD_SIZE as i64).contains(&self.col)
    }

    /// 转换为行优先数组索引（调用方保证 is_valid）
    #[inline]
    pub fn to_index(&self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// 从数组索引创建
    #[inline]
    pub fn from_index(index: usize) -> Position {
        Position {
            row: (index / BOARD_SIZE) as i64,
            col: (index % BOARD_SIZE) as i64,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Win(Player),
    Draw,
}

impl GameResult {
    /// win_status 消息文本
    pub fn message(&self) -> String {
        match self {
            GameResult::Win(player) => format!("Player {} wins!", player),
            GameResult::Draw => "It's a draw!".to_string(),
        }
    }
}

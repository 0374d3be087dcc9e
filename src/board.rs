//! 井字棋棋盘与对局状态
//!
//! `Board` 只负责 3x3 格子；`GameState` 在其上维护当前玩家、结束标志和模式。

use crate::ai::AIStrategy;
use crate::types::{Cell, GameMode, GameResult, Player, Position, BOARD_SIZE, CELL_COUNT};
use rand::seq::SliceRandom;
use rand::Rng;

/// 8 条获胜线（行优先索引）
const WIN_LINES: [[usize; 3]; 8] = [
    // 行
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // 列
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // 对角线
    [0, 4, 8],
    [2, 4, 6],
];

/// 3x3 棋盘，行优先存储
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    squares: [Cell; CELL_COUNT],
}

impl Board {
    /// 创建空棋盘
    pub fn new() -> Self {
        Board::default()
    }

    /// 获取格子，越界返回 None
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if pos.is_valid() {
            Some(self.squares[pos.to_index()])
        } else {
            None
        }
    }

    /// 放置棋子，仅当位置合法且为空格时成功
    fn place(&mut self, pos: Position, player: Player) -> bool {
        if !pos.is_valid() {
            return false;
        }
        let idx = pos.to_index();
        if !self.squares[idx].is_empty() {
            return false;
        }
        self.squares[idx] = player.into();
        true
    }

    fn clear(&mut self) {
        self.squares = [Cell::Empty; CELL_COUNT];
    }

    /// 所有空格位置（行优先顺序）
    pub fn empty_positions(&self) -> Vec<Position> {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(i, _)| Position::from_index(i))
            .collect()
    }

    /// 空格数量
    pub fn empty_count(&self) -> usize {
        self.squares.iter().filter(|c| c.is_empty()).count()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.squares.iter().all(|c| !c.is_empty())
    }

    /// 某玩家是否占满任意一条获胜线
    pub fn has_line(&self, player: Player) -> bool {
        let target = Cell::from(player);
        WIN_LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.squares[i] == target))
    }

    /// 从空格中均匀随机选一个位置；棋盘已满时返回 None
    pub fn random_empty<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        self.empty_positions().choose(rng).copied()
    }

    /// 协议中的 3x3 字符串快照
    pub fn to_rows(&self) -> [[String; BOARD_SIZE]; BOARD_SIZE] {
        std::array::from_fn(|row| {
            std::array::from_fn(|col| self.squares[row * BOARD_SIZE + col].to_wire_str().to_string())
        })
    }

    /// 从字符串网格创建（'X'、'O'，其它字符视为空），主要用于测试和调试
    pub fn from_rows(rows: &[&str; BOARD_SIZE]) -> Result<Board, String> {
        let mut board = Board::new();
        for (r, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != BOARD_SIZE {
                return Err(format!(
                    "Invalid board row {}: expected {} cells, got {:?}",
                    r, BOARD_SIZE, line
                ));
            }
            for (c, ch) in chars.into_iter().enumerate() {
                if let Some(player) = Player::from_char(ch) {
                    board.squares[r * BOARD_SIZE + c] = player.into();
                }
            }
        }
        Ok(board)
    }
}

/// 对局状态
///
/// 进程内唯一，由协议处理器持有；RESET / MODE 时原地重置
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current_player: Player,
    game_over: bool,
    mode: GameMode,
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl GameState {
    /// 初始状态：空棋盘，X 先手，人对人模式
    pub fn new() -> Self {
        GameState {
            board: Board::new(),
            current_player: Player::X,
            game_over: false,
            mode: GameMode::PvP,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[inline]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// 重置棋盘，不改变模式
    pub fn reset(&mut self) {
        self.board.clear();
        self.current_player = Player::X;
        self.game_over = false;
    }

    /// 切换模式并重新开局
    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.reset();
    }

    /// 落子
    ///
    /// 位置越界、格子非空或对局已结束时返回 false，状态不变
    pub fn apply_move(&mut self, pos: Position, player: Player) -> bool {
        if self.game_over {
            return false;
        }
        self.board.place(pos, player)
    }

    pub fn check_win(&self, player: Player) -> bool {
        self.board.has_line(player)
    }

    /// 平局判定：棋盘已满（调用方需先排除获胜）
    pub fn check_draw(&self) -> bool {
        self.board.is_full()
    }

    /// 检查刚落子的玩家是否结束对局，结束时设置 game_over
    pub fn settle(&mut self, mover: Player) -> Option<GameResult> {
        let result = if self.check_win(mover) {
            Some(GameResult::Win(mover))
        } else if self.check_draw() {
            Some(GameResult::Draw)
        } else {
            None
        };
        if result.is_some() {
            self.game_over = true;
        }
        result
    }

    /// 标记对局结束
    pub fn finish(&mut self) {
        self.game_over = true;
    }

    pub fn switch_player(&mut self) {
        self.current_player = self.current_player.opposite();
    }

    /// 强制设置当前玩家（人机模式中 AI 落子后交还给 X）
    pub fn set_current_player(&mut self, player: Player) {
        self.current_player = player;
    }

    /// 由策略为 `player` 选一个空格并落子
    ///
    /// 没有空格、对局已结束或策略给出非法位置时返回 None
    pub fn random_move(&mut self, player: Player, policy: &mut dyn AIStrategy) -> Option<Position> {
        let pos = policy.select_move(&self.board)?;
        if self.apply_move(pos, player) {
            Some(pos)
        } else {
            None
        }
    }
}

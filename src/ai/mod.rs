//! AI 策略模块
//!
//! 井字棋 AI 只做随机落子，不做任何搜索

mod random;

pub use random::RandomAI;

use crate::board::Board;
use crate::types::Position;

/// AI 配置
#[derive(Debug, Clone, Default)]
pub struct AIConfig {
    /// 随机种子，None 时使用系统熵
    pub seed: Option<u64>,
}

/// AI 策略接口
pub trait AIStrategy {
    /// 为当前棋盘选择一个空格；没有空格时返回 None
    fn select_move(&mut self, board: &Board) -> Option<Position>;
}

//! 随机 AI 策略

use super::AIStrategy;
use crate::board::Board;
use crate::types::Position;
use rand::prelude::*;

/// 随机 AI - 在空格中均匀随机选择
pub struct RandomAI {
    rng: StdRng,
}

impl RandomAI {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        RandomAI { rng }
    }
}

impl AIStrategy for RandomAI {
    fn select_move(&mut self, board: &Board) -> Option<Position> {
        let pos = board.random_empty(&mut self.rng);
        if let Some(p) = pos {
            log::debug!("RandomAI picked {} of {} empty cells", p, board.empty_count());
        }
        pos
    }
}

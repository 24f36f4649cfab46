use crate::card::{Card, Deck};
use crate::settings::Settings;
use serde::{Deserialize, Serialize};

/// 每一局的完整状态，由主循环独占持有，只能通过 `logic` 中的转移函数修改
#[derive(Debug, Clone)]
pub struct RoundState {
    pub player_money: i64, // 玩家资金，可以变为 <= 0 (触发游戏结束)
    pub pot: i64,          // 庄家奖池
    // 牌堆只存在于状态机内部，快照中只暴露剩余张数
    pub deck: Deck,

    pub current_card: Card,
    pub next_card: Option<Card>,
    // 上一次结算的两张牌，只用于展示结果
    pub last_resolved_pair: Option<(Card, Card)>,

    pub bet_amount: i64,
    // 下注额是否已通过一次完整的拖动-松开确认
    pub bet_ready: bool,
    pub guess: Option<Guess>,

    pub phase: Phase,
    pub outcome: Option<Outcome>,
    pub message: String,
    // 本次结算后资金耗尽，下一次“继续”点击进入 GameOver
    pub game_over_pending: bool,
    pub animation_progress: f32, // 0.0 ..= 1.0

    // 重新开始时使用的初始资金
    pub settings: Settings,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    AwaitingBet,
    Animating,
    ShowingResult,
    GameOver,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Guess {
    Higher,
    Lower,
}

/// 最近一次结算(或操作)的分类，决定提示信息的样式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
    Tie,
    Pass,
    Quit,
}

/// 交给展示层的只读快照
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundSnapshot {
    pub player_money: i64,
    pub pot: i64,
    pub deck_remaining: usize,
    pub current_card: Card,
    pub next_card: Option<Card>,
    pub last_resolved_pair: Option<(Card, Card)>,
    pub bet_amount: i64,
    pub bet_ready: bool,
    pub guess: Option<Guess>,
    pub phase: Phase,
    pub outcome: Option<Outcome>,
    pub message: String,
    pub game_over_pending: bool,
    pub animation_progress: f32,
}

/// 最小下注额
pub const MIN_BET: i64 = 1;

// --- RoundState 的实现方法 ---

impl RoundState {
    /// 当前允许的最大下注额
    pub fn max_bet(&self) -> i64 {
        self.player_money.min(self.pot)
    }

    pub fn is_valid_bet(&self, amount: i64) -> bool {
        (MIN_BET..=self.max_bet()).contains(&amount)
    }

    /// 玩家或奖池任意一方耗尽即游戏结束
    pub fn funds_exhausted(&self) -> bool {
        self.player_money <= 0 || self.pot <= 0
    }

    /// 资金守恒量，任何结算前后都不变
    pub fn total_funds(&self) -> i64 {
        self.player_money + self.pot
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            player_money: self.player_money,
            pot: self.pot,
            deck_remaining: self.deck.len(),
            current_card: self.current_card,
            next_card: self.next_card,
            last_resolved_pair: self.last_resolved_pair,
            bet_amount: self.bet_amount,
            bet_ready: self.bet_ready,
            guess: self.guess,
            phase: self.phase,
            outcome: self.outcome,
            message: self.message.clone(),
            game_over_pending: self.game_over_pending,
            animation_progress: self.animation_progress,
        }
    }
}

impl RoundSnapshot {
    pub fn max_bet(&self) -> i64 {
        self.player_money.min(self.pot)
    }

    pub fn can_place_guess(&self) -> bool {
        self.phase == Phase::AwaitingBet && self.bet_ready
    }

    pub fn can_quit(&self) -> bool {
        matches!(self.phase, Phase::AwaitingBet | Phase::ShowingResult)
    }
}

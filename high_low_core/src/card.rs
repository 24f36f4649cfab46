use rand::Rng;
use rand::prelude::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// --- 核心数据结构定义 ---

/// 一副完整扑克牌的张数
pub const FULL_DECK_SIZE: usize = 52;

/// 牌堆剩余张数低于该值时，下一次抽牌前先重新洗牌
pub const RESHUFFLE_FLOOR: usize = 3;

/// 花色 (Suit)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Suit {
    Heart,   // 红心 ♥️
    Diamond, // 方块 ♦️
    Club,    // 梅花 ♣️
    Spade,   // 黑桃 ♠️
}

/// 点数 (Rank)
/// 在比大小游戏里 Ace 永远是最大的 (14)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

/// 单张扑克牌 (Card)
///
/// 派生的 `Ord` 会把花色也算进去，游戏中的比较请使用 [`Card::cmp_rank`]。
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Heart, Suit::Diamond, Suit::Club, Suit::Spade];

    /// 花色的英文名，用于查找卡面资源文件
    pub fn name(self) -> &'static str {
        match self {
            Suit::Heart => "hearts",
            Suit::Diamond => "diamonds",
            Suit::Club => "clubs",
            Suit::Spade => "spades",
        }
    }

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Heart | Suit::Diamond)
    }
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven,
        Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace,
    ];

    /// 点数的数值，范围 2..=14 (J=11, Q=12, K=13, A=14)
    pub fn value(self) -> u8 {
        self as u8 + 2
    }

    pub fn from_value(value: u8) -> Option<Rank> {
        match value {
            2..=14 => Some(Rank::ALL[(value - 2) as usize]),
            _ => None,
        }
    }

    /// 资源文件名里使用的点数写法
    pub fn file_stem(self) -> String {
        match self {
            Rank::Jack => "jack".to_string(),
            Rank::Queen => "queen".to_string(),
            Rank::King => "king".to_string(),
            Rank::Ace => "ace".to_string(),
            _ => self.value().to_string(),
        }
    }
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    /// 只按点数比较，花色不参与胜负判定
    pub fn cmp_rank(&self, other: &Card) -> std::cmp::Ordering {
        self.rank.cmp(&other.rank)
    }
}

// --- 实现辅助功能 ---

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Suit::Heart => "♥",
            Suit::Diamond => "♦",
            Suit::Club => "♣",
            Suit::Spade => "♠",
        })
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rank::Jack => write!(f, "J"),
            Rank::Queen => write!(f, "Q"),
            Rank::King => write!(f, "K"),
            Rank::Ace => write!(f, "A"),
            _ => write!(f, "{}", self.value()),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

// --- 牌堆 ---

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("牌堆已空，无法抽牌")]
    Empty,
}

/// 牌堆 (Deck)
///
/// 抽牌从 `cards` 的末尾取出，和 `Vec::pop` 一致。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

/// 按花色、点数顺序生成完整的 52 张扑克牌
fn create_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(FULL_DECK_SIZE);
    for &suit in &Suit::ALL {
        for &rank in &Rank::ALL {
            deck.push(Card { rank, suit });
        }
    }
    deck
}

impl Deck {
    /// 一副洗好的新牌
    pub fn new_shuffled() -> Deck {
        Deck::new_shuffled_with(&mut rand::rng())
    }

    pub fn new_shuffled_with<R: Rng + ?Sized>(rng: &mut R) -> Deck {
        let mut cards = create_deck();
        cards.shuffle(rng);
        Deck { cards }
    }

    /// 用指定顺序的牌构造牌堆，最后一张最先被抽到
    pub fn from_cards(cards: Vec<Card>) -> Deck {
        Deck { cards }
    }

    pub fn draw(&mut self) -> Result<Card, DeckError> {
        self.cards.pop().ok_or(DeckError::Empty)
    }

    pub fn needs_reshuffle(&self) -> bool {
        self.cards.len() < RESHUFFLE_FLOOR
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

// --- 单元测试 ---

use crate::card::Card;
use crate::input::{InputReducer, RegionId};
use crate::state::{MIN_BET, Outcome, Phase, RoundSnapshot};
use std::f32::consts::PI;
use std::time::Duration;

// --- 展示层契约 ---
// Scene 是对一帧画面的纯数据描述，具体的绘制由前端完成。
// 展示层只读取快照，任何修改都必须通过输入归约器产生的意图。

/// 一个牌位上应该画什么
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardFace {
    FaceDown,
    FaceUp(Card),
    /// 翻牌动画中：`width` 为相对宽度 (0..=1)，过半后显示正面
    Flipping { card: Card, face_up: bool, width: f32 },
}

/// 提示信息的样式，由最近一次结果决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Neutral,
    Win,
    Lose,
    Tie,
    Pass,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonView {
    pub id: RegionId,
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderView {
    pub min: i64,
    pub max: i64,
    pub value: i64,
    pub dragging: bool,
}

/// 结果展示时闪烁的“继续”提示
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuePrompt {
    pub pulse: f32, // 0.5 ..= 1.0
    // 下一次点击将结束游戏
    pub final_round: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub deck_count: usize,
    pub left: CardFace,
    pub right: CardFace,
    pub player_money: i64,
    pub pot: i64,
    pub bet: i64,
    pub message: String,
    pub style: MessageStyle,
    pub continue_prompt: Option<ContinuePrompt>,
    pub slider: Option<SliderView>,
    pub buttons: Vec<ButtonView>,
}

/// 根据快照和输入层的拖动状态生成一帧画面描述
///
/// `elapsed` 为程序启动以来的时间，只用于提示的闪烁效果。
pub fn build_scene(snapshot: &RoundSnapshot, reducer: &InputReducer, elapsed: Duration) -> Scene {
    let (left, right) = card_faces(snapshot);
    let bet = reducer.pending_bet().unwrap_or(snapshot.bet_amount);

    let continue_prompt = (snapshot.phase == Phase::ShowingResult).then(|| ContinuePrompt {
        pulse: pulse(elapsed),
        final_round: snapshot.game_over_pending,
    });

    let slider = (snapshot.phase == Phase::AwaitingBet).then(|| SliderView {
        min: MIN_BET,
        max: snapshot.max_bet().max(MIN_BET),
        value: bet,
        dragging: reducer.is_dragging(),
    });

    Scene {
        deck_count: snapshot.deck_remaining,
        left,
        right,
        player_money: snapshot.player_money,
        pot: snapshot.pot,
        bet,
        message: snapshot.message.clone(),
        style: message_style(snapshot.outcome),
        continue_prompt,
        slider,
        buttons: buttons(snapshot),
    }
}

fn card_faces(snapshot: &RoundSnapshot) -> (CardFace, CardFace) {
    if let Some((current, next)) = snapshot.last_resolved_pair {
        return (CardFace::FaceUp(current), CardFace::FaceUp(next));
    }

    let left = CardFace::FaceUp(snapshot.current_card);
    let right = match (snapshot.phase, snapshot.next_card) {
        (Phase::Animating, Some(card)) => {
            let progress = snapshot.animation_progress;
            CardFace::Flipping { card, face_up: progress > 0.5, width: flip_width(progress) }
        }
        (_, Some(card)) => CardFace::FaceUp(card),
        (_, None) => CardFace::FaceDown,
    };
    (left, right)
}

/// 按钮是否可用只取决于阶段和下注是否已确认
fn buttons(snapshot: &RoundSnapshot) -> Vec<ButtonView> {
    let can_bet = snapshot.can_place_guess();
    vec![
        ButtonView { id: RegionId::Higher, label: "大", enabled: can_bet },
        ButtonView { id: RegionId::Lower, label: "小", enabled: can_bet },
        ButtonView { id: RegionId::Pass, label: "跳过", enabled: can_bet },
        ButtonView { id: RegionId::Quit, label: "退出", enabled: snapshot.can_quit() },
        ButtonView { id: RegionId::Restart, label: "重新开始", enabled: snapshot.phase == Phase::GameOver },
    ]
}

pub fn message_style(outcome: Option<Outcome>) -> MessageStyle {
    match outcome {
        None => MessageStyle::Neutral,
        Some(Outcome::Win) => MessageStyle::Win,
        Some(Outcome::Lose) => MessageStyle::Lose,
        Some(Outcome::Tie) => MessageStyle::Tie,
        Some(Outcome::Pass) => MessageStyle::Pass,
        Some(Outcome::Quit) => MessageStyle::Quit,
    }
}

/// 翻牌时牌面的相对宽度：先收窄到 0，再展开
pub fn flip_width(progress: f32) -> f32 {
    (progress.clamp(0.0, 1.0) * PI).cos().abs()
}

/// 提示闪烁的亮度，在 0.5 和 1.0 之间摆动
pub fn pulse(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f32() * 3.0).sin().abs() * 0.5 + 0.5
}

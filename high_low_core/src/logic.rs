use crate::card::*;
use crate::intent::Intent;
use crate::settings::Settings;
use crate::state::*;
use std::cmp::Ordering;
use tracing::{debug, info};

/// 每帧动画前进的固定步长 (60 帧下约 1/3 秒)
pub const ANIMATION_STEP: f32 = 0.05;

const PROMPT_BET: &str = "调整下注额，然后选择 大 / 小 / 跳过。";

// --- 核心游戏流程函数 ---

/// 开始一局新游戏
///
/// - 按配置设置玩家资金和奖池。
/// - 创建一副新牌并洗牌，翻开第一张牌。
/// - 进入 AwaitingBet 阶段，下注额为最小值但尚未确认。
pub fn new_game(settings: Settings) -> RoundState {
    let mut deck = Deck::new_shuffled();
    let current_card = deck.draw().expect("新牌堆不应为空");
    info!("新游戏开始: 资金 {}, 奖池 {}", settings.starting_money, settings.starting_pot);

    RoundState {
        player_money: settings.starting_money,
        pot: settings.starting_pot,
        deck,
        current_card,
        next_card: None,
        last_resolved_pair: None,
        bet_amount: MIN_BET,
        bet_ready: false,
        guess: None,
        phase: Phase::AwaitingBet,
        outcome: None,
        message: PROMPT_BET.to_string(),
        game_over_pending: false,
        animation_progress: 0.0,
        settings,
    }
}

/// 处理一个意图
///
/// 这是状态机唯一的入口。不满足守卫条件的意图会被静默忽略，
/// 状态保持不变，并返回 `false`。
pub fn apply_intent(state: &mut RoundState, intent: Intent) -> bool {
    let accepted = match (state.phase, intent) {
        (Phase::AwaitingBet, Intent::SetBet(amount)) => set_bet(state, amount),
        (Phase::AwaitingBet, Intent::Guess(guess)) => place_guess(state, guess),
        (Phase::AwaitingBet, Intent::Pass) => pass_card(state),
        (Phase::AwaitingBet | Phase::ShowingResult, Intent::Quit) => quit(state),
        (Phase::ShowingResult, Intent::Continue) => continue_round(state),
        (Phase::GameOver, Intent::Restart) => {
            *state = new_game(state.settings);
            true
        }
        _ => false,
    };

    if !accepted {
        debug!("忽略意图 {:?} (阶段 {:?})", intent, state.phase);
    }
    accepted
}

/// 每帧调用一次，推进翻牌动画；动画完成时进行结算
pub fn tick(state: &mut RoundState) {
    if state.phase != Phase::Animating {
        return;
    }
    state.animation_progress += ANIMATION_STEP;
    if state.animation_progress >= 1.0 {
        state.animation_progress = 1.0;
        resolve(state);
    }
}

// --- 辅助逻辑函数 ---

fn set_bet(state: &mut RoundState, amount: i64) -> bool {
    if !state.is_valid_bet(amount) {
        return false;
    }
    state.bet_amount = amount;
    state.bet_ready = true;
    debug!("下注额确认为 {}", amount);
    true
}

fn place_guess(state: &mut RoundState, guess: Guess) -> bool {
    if !state.bet_ready {
        return false;
    }
    let next = draw_card(state);
    state.next_card = Some(next);
    state.guess = Some(guess);
    state.animation_progress = 0.0;
    state.phase = Phase::Animating;
    debug!("猜测 {:?}，下一张牌 {}", guess, next);
    true
}

fn pass_card(state: &mut RoundState) -> bool {
    if !state.bet_ready {
        return false;
    }
    state.current_card = draw_card(state);
    state.next_card = None;
    state.bet_amount = MIN_BET;
    state.bet_ready = false;
    state.outcome = Some(Outcome::Pass);
    state.message = "已跳过这张牌，请重新下注。".to_string();
    debug!("跳过，新的牌 {}", state.current_card);
    true
}

fn quit(state: &mut RoundState) -> bool {
    state.phase = Phase::GameOver;
    state.outcome = Some(Outcome::Quit);
    state.message = "你已退出本局。点击 重新开始 再来一次。".to_string();
    info!("玩家退出: 资金 {}, 奖池 {}", state.player_money, state.pot);
    true
}

/// 结果展示后的“继续”点击
///
/// 如果上一次结算已经耗尽资金，这次点击进入 GameOver；
/// 否则翻开新的一张牌，开始下一轮下注。
fn continue_round(state: &mut RoundState) -> bool {
    if state.game_over_pending || state.funds_exhausted() {
        state.phase = Phase::GameOver;
        state.message = "游戏结束！资金已耗尽，点击 重新开始 或 退出。".to_string();
        info!("资金耗尽，游戏结束: 资金 {}, 奖池 {}", state.player_money, state.pot);
        return true;
    }

    state.current_card = draw_card(state);
    state.next_card = None;
    state.last_resolved_pair = None;
    state.guess = None;
    state.bet_amount = MIN_BET;
    state.bet_ready = false;
    state.outcome = None;
    state.animation_progress = 0.0;
    state.message = PROMPT_BET.to_string();
    state.phase = Phase::AwaitingBet;
    debug!("新一轮开始，当前牌 {}", state.current_card);
    true
}

/// 结算
///
/// 只比较点数：
/// - 点数相同为平局，玩家输掉双倍下注额。
/// - 猜对方向为赢，奖池付给玩家下注额。
/// - 否则为输，下注额进入奖池。
///
/// 无论结果如何，资金总额 `player_money + pot` 保持不变。
fn resolve(state: &mut RoundState) {
    let (Some(next), Some(guess)) = (state.next_card, state.guess) else {
        panic!("结算时缺少下一张牌或猜测: {:?}", state.phase);
    };
    let current = state.current_card;
    let bet = state.bet_amount;
    let ordering = next.cmp_rank(&current);
    let sign = match ordering {
        Ordering::Greater => "<",
        Ordering::Less => ">",
        Ordering::Equal => "=",
    };

    let outcome = match (ordering, guess) {
        (Ordering::Equal, _) => Outcome::Tie,
        (Ordering::Greater, Guess::Higher) | (Ordering::Less, Guess::Lower) => Outcome::Win,
        _ => Outcome::Lose,
    };

    match outcome {
        Outcome::Tie => {
            state.player_money -= 2 * bet;
            state.pot += 2 * bet;
            state.message = format!("平局！输掉双倍 ${}：{} {} {}", 2 * bet, current, sign, next);
        }
        Outcome::Win => {
            state.player_money += bet;
            state.pot -= bet;
            state.message = format!("你赢了 ${}：{} {} {}", bet, current, sign, next);
        }
        _ => {
            state.player_money -= bet;
            state.pot += bet;
            state.message = format!("你输了 ${}：{} {} {}", bet, current, sign, next);
        }
    }

    state.outcome = Some(outcome);
    state.last_resolved_pair = Some((current, next));
    state.bet_amount = 0;
    state.bet_ready = false;
    state.phase = Phase::ShowingResult;
    state.game_over_pending = state.funds_exhausted();
    info!(
        "结算 {:?}: {} -> {}，资金 {}，奖池 {}",
        outcome, current, next, state.player_money, state.pot
    );
}

/// 从牌堆抽一张牌，剩余不足时先换一副新牌
fn draw_card(state: &mut RoundState) -> Card {
    if state.deck.needs_reshuffle() {
        state.deck = Deck::new_shuffled();
        info!("牌堆重新洗牌");
    }
    state.deck.draw().expect("抽牌前已保证牌堆至少有 3 张")
}

// --- 单元测试 ---

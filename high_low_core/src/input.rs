use crate::intent::Intent;
use crate::state::{Guess, MIN_BET, Phase, RoundSnapshot};
use std::time::{Duration, Instant};
use tracing::debug;

/// 两次被接受的点击之间的最小间隔，防止一次物理点击在多帧中被重复处理
pub const CLICK_COOLDOWN: Duration = Duration::from_millis(200);

// --- 输入相关的数据结构 ---

/// 指针坐标，单位由展示层决定 (终端中为字符格)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// 可点击区域 (左上角 + 宽高)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionId {
    Higher,
    Lower,
    Pass,
    Quit,
    Restart,
    BetSlider,
}

/// 展示层每帧提供的可交互区域列表
#[derive(Debug, Clone, Default)]
pub struct Regions {
    entries: Vec<(RegionId, Region)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press(Point),
    Release(Point),
    Motion(Point),
}

/// 键盘快捷键，和鼠标操作归约为同样的意图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Higher,
    Lower,
    Pass,
    Quit,
    Restart,
    /// 确认正在调整的下注额，或在结果展示时继续
    Confirm,
    IncreaseBet,
    DecreaseBet,
}

/// 正在调整中的下注额
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BetDrag {
    pending: i64,
    by_pointer: bool,
}

/// 输入归约器
///
/// 把原始的指针/键盘事件和当前的区域表转换为状态机的意图。
/// 它只持有点击冷却和滑块拖动这两项输入层自己的状态。
#[derive(Debug, Clone)]
pub struct InputReducer {
    cooldown: Duration,
    last_click: Option<Instant>,
    drag: Option<BetDrag>,
}

// --- 实现 ---

impl Point {
    pub fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Region {
        Region { x, y, width, height }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

impl Regions {
    pub fn new() -> Regions {
        Regions::default()
    }

    /// 同一个 id 只保留最后一次登记的区域
    pub fn insert(&mut self, id: RegionId, region: Region) {
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.push((id, region));
    }

    pub fn get(&self, id: RegionId) -> Option<Region> {
        self.entries.iter().find(|(existing, _)| *existing == id).map(|(_, r)| *r)
    }

    /// 命中测试，返回包含该点的第一个区域
    pub fn hit(&self, p: Point) -> Option<RegionId> {
        self.entries.iter().find(|(_, r)| r.contains(p)).map(|(id, _)| *id)
    }
}

impl Default for InputReducer {
    fn default() -> Self {
        InputReducer::new(CLICK_COOLDOWN)
    }
}

impl InputReducer {
    pub fn new(cooldown: Duration) -> InputReducer {
        InputReducer { cooldown, last_click: None, drag: None }
    }

    /// 拖动中尚未确认的下注额
    pub fn pending_bet(&self) -> Option<i64> {
        self.drag.map(|d| d.pending)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// 处理一个指针事件
    ///
    /// 点击顺序：结果展示阶段的任意点击都是“继续”，优先于按钮命中测试；
    /// 否则在滑块上按下开始拖动，最后才检查按钮。
    pub fn reduce(
        &mut self,
        event: PointerEvent,
        now: Instant,
        snapshot: &RoundSnapshot,
        regions: &Regions,
    ) -> Option<Intent> {
        self.sync_phase(snapshot);

        match event {
            PointerEvent::Press(p) => {
                if !self.cooled_down(now) {
                    debug!("点击冷却中，忽略 {:?}", p);
                    return None;
                }

                if snapshot.phase == Phase::ShowingResult {
                    self.last_click = Some(now);
                    return Some(Intent::Continue);
                }

                let hit = regions.hit(p)?;
                if hit == RegionId::BetSlider {
                    if snapshot.phase != Phase::AwaitingBet {
                        return None;
                    }
                    let slider = regions.get(RegionId::BetSlider)?;
                    let pending = slider_value(&slider, p.x, snapshot.max_bet());
                    self.drag = Some(BetDrag { pending, by_pointer: true });
                    self.last_click = Some(now);
                    debug!("开始拖动下注滑块: {}", pending);
                    return None;
                }

                let intent = self.button_intent(hit)?;
                self.last_click = Some(now);
                Some(intent)
            }
            PointerEvent::Motion(p) => {
                let slider = regions.get(RegionId::BetSlider);
                if let (Some(drag), Some(slider)) = (self.drag.as_mut(), slider) {
                    if drag.by_pointer {
                        drag.pending = slider_value(&slider, p.x, snapshot.max_bet());
                    }
                }
                None
            }
            PointerEvent::Release(_) => match self.drag {
                Some(drag) if drag.by_pointer => {
                    self.drag = None;
                    debug!("滑块松开，确认下注 {}", drag.pending);
                    Some(Intent::SetBet(drag.pending))
                }
                _ => None,
            },
        }
    }

    /// 处理一个键盘命令
    pub fn reduce_key(&mut self, key: KeyCommand, now: Instant, snapshot: &RoundSnapshot) -> Option<Intent> {
        self.sync_phase(snapshot);

        match key {
            KeyCommand::IncreaseBet | KeyCommand::DecreaseBet => {
                if snapshot.phase != Phase::AwaitingBet || self.drag.is_some_and(|d| d.by_pointer) {
                    return None;
                }
                let base = self.pending_bet().unwrap_or(snapshot.bet_amount);
                let step = if key == KeyCommand::IncreaseBet { 1 } else { -1 };
                let pending = clamp_bet(base + step, snapshot.max_bet());
                self.drag = Some(BetDrag { pending, by_pointer: false });
                None
            }
            _ => {
                if !self.cooled_down(now) {
                    return None;
                }
                let intent = match key {
                    KeyCommand::Confirm => match (snapshot.phase, self.drag) {
                        (Phase::ShowingResult, _) => Some(Intent::Continue),
                        (_, Some(drag)) if !drag.by_pointer => {
                            self.drag = None;
                            Some(Intent::SetBet(drag.pending))
                        }
                        (Phase::AwaitingBet, None) => Some(Intent::SetBet(snapshot.bet_amount)),
                        _ => None,
                    },
                    KeyCommand::Higher => self.button_intent(RegionId::Higher),
                    KeyCommand::Lower => self.button_intent(RegionId::Lower),
                    KeyCommand::Pass => self.button_intent(RegionId::Pass),
                    KeyCommand::Quit => self.button_intent(RegionId::Quit),
                    KeyCommand::Restart => self.button_intent(RegionId::Restart),
                    KeyCommand::IncreaseBet | KeyCommand::DecreaseBet => None,
                }?;
                self.last_click = Some(now);
                Some(intent)
            }
        }
    }

    // 拖动中的下注额不能用于猜测或跳过
    fn button_intent(&self, id: RegionId) -> Option<Intent> {
        match id {
            RegionId::Higher if !self.is_dragging() => Some(Intent::Guess(Guess::Higher)),
            RegionId::Lower if !self.is_dragging() => Some(Intent::Guess(Guess::Lower)),
            RegionId::Pass if !self.is_dragging() => Some(Intent::Pass),
            RegionId::Quit => Some(Intent::Quit),
            RegionId::Restart => Some(Intent::Restart),
            _ => None,
        }
    }

    fn cooled_down(&self, now: Instant) -> bool {
        self.last_click
            .is_none_or(|last| now.saturating_duration_since(last) >= self.cooldown)
    }

    // 离开下注阶段时丢弃未确认的拖动
    fn sync_phase(&mut self, snapshot: &RoundSnapshot) {
        if snapshot.phase != Phase::AwaitingBet && self.drag.take().is_some() {
            debug!("阶段变为 {:?}，取消拖动", snapshot.phase);
        }
    }
}

fn clamp_bet(value: i64, max_bet: i64) -> i64 {
    value.clamp(MIN_BET, max_bet.max(MIN_BET))
}

/// 把指针在滑块上的横向偏移按比例换算为下注额
pub fn slider_value(slider: &Region, x: i32, max_bet: i64) -> i64 {
    let span = (slider.width - 1).max(1);
    let offset = (x - slider.x).clamp(0, span) as i128;
    // 乘积在 i128 中计算，商不超过 max_bet
    let step = (max_bet.max(MIN_BET) - MIN_BET) as i128 * offset / span as i128;
    clamp_bet(MIN_BET + step as i64, max_bet)
}

/// 下注额在滑块上对应的横坐标
pub fn slider_position(slider: &Region, value: i64, max_bet: i64) -> i32 {
    let span = (slider.width - 1).max(1) as i128;
    if max_bet <= MIN_BET {
        return slider.x;
    }
    let steps = (max_bet - MIN_BET) as i128;
    // 向上取整，保证滑块足够宽时 slider_value(slider_position(v)) == v
    let offset = ((clamp_bet(value, max_bet) - MIN_BET) as i128 * span + steps - 1) / steps;
    slider.x + offset as i32
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{apply_intent, new_game};
    use crate::settings::Settings;

    fn layout() -> Regions {
        let mut regions = Regions::new();
        regions.insert(RegionId::BetSlider, Region::new(10, 10, 50, 1));
        regions.insert(RegionId::Higher, Region::new(0, 20, 10, 3));
        regions.insert(RegionId::Lower, Region::new(12, 20, 10, 3));
        regions.insert(RegionId::Pass, Region::new(24, 20, 10, 3));
        regions.insert(RegionId::Quit, Region::new(36, 20, 10, 3));
        regions.insert(RegionId::Restart, Region::new(48, 20, 10, 3));
        regions
    }

    fn snapshot(phase: Phase, bet_ready: bool) -> RoundSnapshot {
        let mut snap = new_game(Settings::default()).snapshot();
        snap.phase = phase;
        snap.bet_ready = bet_ready;
        snap
    }

    #[test]
    fn test_region_hit_testing() {
        let r = Region::new(2, 3, 4, 2);
        assert!(r.contains(Point::new(2, 3)));
        assert!(r.contains(Point::new(5, 4)));
        assert!(!r.contains(Point::new(6, 4)));
        assert!(!r.contains(Point::new(2, 5)));

        let regions = layout();
        assert_eq!(regions.hit(Point::new(13, 21)), Some(RegionId::Lower));
        assert_eq!(regions.hit(Point::new(100, 100)), None);
    }

    #[test]
    fn test_drag_release_sets_bet() {
        let mut reducer = InputReducer::default();
        let regions = layout();
        let snap = snapshot(Phase::AwaitingBet, false);
        let t0 = Instant::now();

        // 最大下注额 min(100, 50) = 50，滑块宽 50 格，每格 1
        assert_eq!(reducer.reduce(PointerEvent::Press(Point::new(10, 10)), t0, &snap, &regions), None);
        assert!(reducer.is_dragging());
        assert_eq!(reducer.pending_bet(), Some(1));

        reducer.reduce(PointerEvent::Motion(Point::new(30, 12)), t0, &snap, &regions);
        assert_eq!(reducer.pending_bet(), Some(21));

        // 拖出滑块右侧后被截断到最大值
        reducer.reduce(PointerEvent::Motion(Point::new(90, 10)), t0, &snap, &regions);
        assert_eq!(reducer.pending_bet(), Some(50));

        let intent = reducer.reduce(PointerEvent::Release(Point::new(90, 10)), t0, &snap, &regions);
        assert_eq!(intent, Some(Intent::SetBet(50)));
        assert!(!reducer.is_dragging());
    }

    #[test]
    fn test_motion_without_drag_does_nothing() {
        let mut reducer = InputReducer::default();
        let snap = snapshot(Phase::AwaitingBet, false);
        let regions = layout();
        let t0 = Instant::now();
        assert_eq!(reducer.reduce(PointerEvent::Motion(Point::new(30, 10)), t0, &snap, &regions), None);
        assert_eq!(reducer.reduce(PointerEvent::Release(Point::new(30, 10)), t0, &snap, &regions), None);
        assert_eq!(reducer.pending_bet(), None);
    }

    #[test]
    fn test_click_cooldown() {
        let mut reducer = InputReducer::default();
        let regions = layout();
        let snap = snapshot(Phase::AwaitingBet, true);
        let t0 = Instant::now();
        let higher = Point::new(1, 21);

        assert_eq!(
            reducer.reduce(PointerEvent::Press(higher), t0, &snap, &regions),
            Some(Intent::Guess(Guess::Higher))
        );
        let too_soon = t0 + Duration::from_millis(150);
        assert_eq!(reducer.reduce(PointerEvent::Press(higher), too_soon, &snap, &regions), None);
        let later = t0 + Duration::from_millis(200);
        assert_eq!(
            reducer.reduce(PointerEvent::Press(higher), later, &snap, &regions),
            Some(Intent::Guess(Guess::Higher))
        );
    }

    #[test]
    fn test_continue_click_takes_priority() {
        let mut reducer = InputReducer::default();
        let regions = layout();
        let snap = snapshot(Phase::ShowingResult, false);
        // 点在 Quit 按钮上也是“继续”
        let intent = reducer.reduce(PointerEvent::Press(Point::new(37, 21)), Instant::now(), &snap, &regions);
        assert_eq!(intent, Some(Intent::Continue));
    }

    #[test]
    fn test_buttons_map_to_intents() {
        let regions = layout();
        let snap = snapshot(Phase::AwaitingBet, true);
        let cases = [
            (Point::new(13, 21), Intent::Guess(Guess::Lower)),
            (Point::new(25, 21), Intent::Pass),
            (Point::new(37, 21), Intent::Quit),
            (Point::new(49, 21), Intent::Restart),
        ];
        for (p, expected) in cases {
            let mut reducer = InputReducer::default();
            assert_eq!(reducer.reduce(PointerEvent::Press(p), Instant::now(), &snap, &regions), Some(expected));
        }
    }

    #[test]
    fn test_slider_ignored_outside_betting() {
        let mut reducer = InputReducer::default();
        let regions = layout();
        let snap = snapshot(Phase::GameOver, false);
        assert_eq!(reducer.reduce(PointerEvent::Press(Point::new(20, 10)), Instant::now(), &snap, &regions), None);
        assert!(!reducer.is_dragging());
    }

    #[test]
    fn test_phase_change_cancels_drag() {
        let mut reducer = InputReducer::default();
        let regions = layout();
        let t0 = Instant::now();
        reducer.reduce(PointerEvent::Press(Point::new(20, 10)), t0, &snapshot(Phase::AwaitingBet, false), &regions);
        assert!(reducer.is_dragging());

        let over = snapshot(Phase::GameOver, false);
        assert_eq!(reducer.reduce(PointerEvent::Release(Point::new(20, 10)), t0, &over, &regions), None);
        assert!(!reducer.is_dragging());
    }

    #[test]
    fn test_keyboard_bet_adjust_and_confirm() {
        let mut reducer = InputReducer::default();
        let snap = snapshot(Phase::AwaitingBet, false);
        let t0 = Instant::now();

        reducer.reduce_key(KeyCommand::IncreaseBet, t0, &snap);
        reducer.reduce_key(KeyCommand::IncreaseBet, t0, &snap);
        assert_eq!(reducer.pending_bet(), Some(3));
        // 调整中不能猜测
        assert_eq!(reducer.reduce_key(KeyCommand::Higher, t0, &snap), None);

        assert_eq!(reducer.reduce_key(KeyCommand::Confirm, t0, &snap), Some(Intent::SetBet(3)));
        assert_eq!(reducer.pending_bet(), None);

        reducer.reduce_key(KeyCommand::DecreaseBet, t0, &snap);
        reducer.reduce_key(KeyCommand::DecreaseBet, t0, &snap);
        assert_eq!(reducer.pending_bet(), Some(MIN_BET));
    }

    #[test]
    fn test_keyboard_confirm_readies_current_bet() {
        // Enter 直接确认当前下注额，相当于键盘上的一次“松开”
        let mut state = new_game(Settings::default());
        let mut reducer = InputReducer::default();
        let intent = reducer.reduce_key(KeyCommand::Confirm, Instant::now(), &state.snapshot());
        assert_eq!(intent, Some(Intent::SetBet(MIN_BET)));
        assert!(apply_intent(&mut state, intent.unwrap()));
        assert!(state.snapshot().can_place_guess());
    }

    #[test]
    fn test_keyboard_confirm_continues_result() {
        let mut reducer = InputReducer::default();
        let snap = snapshot(Phase::ShowingResult, false);
        assert_eq!(reducer.reduce_key(KeyCommand::Confirm, Instant::now(), &snap), Some(Intent::Continue));
    }

    #[test]
    fn test_slider_value_and_position_agree() {
        let slider = Region::new(4, 0, 31, 1);
        for bet in 1..=30 {
            let x = slider_position(&slider, bet, 30);
            assert_eq!(slider_value(&slider, x, 30), bet);
        }
        assert_eq!(slider_value(&slider, -10, 30), 1);
        assert_eq!(slider_value(&slider, 1000, 30), 30);
        // 最大下注额不足 1 时仍然给出最小值，由状态机拒绝
        assert_eq!(slider_value(&slider, 20, 0), MIN_BET);
    }

    #[test]
    fn test_slider_handles_largest_bets() {
        let slider = Region::new(10, 10, 50, 1);
        let max = crate::settings::MAX_FUNDS;
        assert_eq!(slider_value(&slider, 10, max), MIN_BET);
        assert_eq!(slider_value(&slider, 59, max), max);
        assert_eq!(slider_position(&slider, max, max), 59);
        assert_eq!(slider_value(&slider, 59, i64::MAX), i64::MAX);

        let mut reducer = InputReducer::default();
        let mut snap = snapshot(Phase::AwaitingBet, false);
        snap.player_money = max;
        snap.pot = max;
        reducer.reduce(PointerEvent::Press(Point::new(34, 10)), Instant::now(), &snap, &layout());
        let pending = reducer.pending_bet().unwrap();
        assert!(pending > MIN_BET && pending < max);
    }

    #[test]
    fn test_full_round_through_reducer() {
        let mut state = new_game(Settings::default());
        let mut reducer = InputReducer::default();
        let regions = layout();
        let t0 = Instant::now();

        let snap = state.snapshot();
        assert_eq!(reducer.reduce(PointerEvent::Press(Point::new(1, 21)), t0, &snap, &regions), Some(Intent::Guess(Guess::Higher)));
        // 下注未确认，状态机忽略猜测
        assert!(!apply_intent(&mut state, Intent::Guess(Guess::Higher)));

        let t1 = t0 + CLICK_COOLDOWN;
        reducer.reduce(PointerEvent::Press(Point::new(19, 10)), t1, &state.snapshot(), &regions);
        let set = reducer.reduce(PointerEvent::Release(Point::new(19, 10)), t1, &state.snapshot(), &regions);
        assert_eq!(set, Some(Intent::SetBet(10)));
        assert!(apply_intent(&mut state, Intent::SetBet(10)));

        let t2 = t1 + CLICK_COOLDOWN;
        let guess = reducer.reduce(PointerEvent::Press(Point::new(13, 21)), t2, &state.snapshot(), &regions);
        assert!(apply_intent(&mut state, guess.unwrap()));
        assert_eq!(state.phase, Phase::Animating);
    }
}

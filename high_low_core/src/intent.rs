use crate::state::Guess;
use serde::{Deserialize, Serialize};

// --- 输入层 -> 状态机 的意图 ---
// 输入层只产生这些离散的意图，状态机是唯一修改 RoundState 的地方。

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// 确认下注额 (拖动滑块后松开)
    SetBet(i64),
    /// 猜下一张牌更大或更小
    Guess(Guess),
    /// 跳过当前这张牌，不下注
    Pass,
    /// 放弃本次游戏
    Quit,
    /// 查看完结果后点击任意位置继续
    Continue,
    /// 游戏结束后重新开始
    Restart,
}

//! # 比大小 (High-Low) 核心逻辑库
//!
//! 这个 `core` crate 包含了比大小游戏的状态机、下注结算、
//! 输入归约以及展示层契约。它不依赖任何终端或图形库，
//! 前端只需要提供指针事件和可点击区域，并绘制 [`Scene`]。

mod card;
mod input;
mod intent;
mod logic;
mod scene;
mod settings;
mod state;

pub use card::*;

pub use input::*;

pub use intent::*;

pub use logic::{ANIMATION_STEP, apply_intent, new_game, tick};

pub use scene::*;

pub use settings::*;

pub use state::*;

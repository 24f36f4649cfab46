use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_MONEY: i64 = 100;
pub const DEFAULT_POT: i64 = 50;
/// 初始资金和奖池的上限，保证结算和滑块换算不会溢出
pub const MAX_FUNDS: i64 = 1_000_000_000_000;

/// 初始资金配置，对应 `settings.json`
///
/// ```json
/// { "starting_money": 100, "starting_pot": 50 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_money")]
    pub starting_money: i64,
    #[serde(default = "default_pot")]
    pub starting_pot: i64,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("无法读取配置文件: {0}")]
    Io(#[from] std::io::Error),
    #[error("配置文件格式错误: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} 必须为正数，实际为 {value}")]
    NonPositive { field: &'static str, value: i64 },
    #[error("{field} 超出上限 {max}，实际为 {value}", max = MAX_FUNDS)]
    TooLarge { field: &'static str, value: i64 },
}

fn default_money() -> i64 {
    DEFAULT_MONEY
}

fn default_pot() -> i64 {
    DEFAULT_POT
}

impl Default for Settings {
    fn default() -> Self {
        Settings { starting_money: DEFAULT_MONEY, starting_pot: DEFAULT_POT }
    }
}

impl Settings {
    /// 读取配置文件。任何错误都不会向上抛出，而是记录日志并回退到默认值。
    pub fn load(path: impl AsRef<Path>) -> Settings {
        let path = path.as_ref();
        match Settings::try_load(path) {
            Ok(settings) => {
                info!("已加载配置 {}: {:?}", path.display(), settings);
                settings
            }
            Err(e) => {
                warn!("无法加载配置 {}: {}，使用默认值", path.display(), e);
                Settings::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Settings, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Settings::from_json(&text)
    }

    /// 缺失的字段单独取默认值；数值必须在 `1..=MAX_FUNDS` 之内
    pub fn from_json(text: &str) -> Result<Settings, SettingsError> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        for (field, value) in [("starting_money", self.starting_money), ("starting_pot", self.starting_pot)] {
            if value <= 0 {
                return Err(SettingsError::NonPositive { field, value });
            }
            if value > MAX_FUNDS {
                return Err(SettingsError::TooLarge { field, value });
            }
        }
        Ok(())
    }
}

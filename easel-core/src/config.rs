use serde::{Deserialize, Serialize};
use crate::activity::DEFAULT_SCREEN;
use crate::navigation::NavigationRule;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    pub log_path:  String,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreloadConfig {
    pub assets_path: String,
    pub audio_enabled: bool,
    /// 权重单位 (字节)；文件大小除以它得到权重，最小为 1
    pub weight_unit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default)]
    pub rules: Vec<NavigationRule>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_path:  "logs/".into(),
            log_level: "info".into(),
        }
    }
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            assets_path: "assets/".into(),
            audio_enabled: true,
            weight_unit: 1024,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                NavigationRule { from: DEFAULT_SCREEN.into(), action: "next".into(), to: "menu".into() },
                NavigationRule { from: "menu".into(), action: "next".into(), to: "game".into() },
                NavigationRule { from: "game".into(), action: "back".into(), to: "menu".into() },
                NavigationRule { from: "game".into(), action: "cancel".into(), to: "menu".into() },
            ],
        }
    }
}

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use crate::config::NavigationConfig;

pub const NEXT: &str = "next";
pub const BACK: &str = "back";
pub const CANCEL: &str = "cancel";

/// 一条跳转规则：在 `from` 页面上做了 `action`，去 `to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRule {
    pub from: String,
    pub action: String,
    pub to: String,
}

/// 跳转表：(当前页面, 动作) -> 下一个页面
///
/// 按 origin 分两层存，查找时不用拼接字符串。
#[derive(Debug, Clone, Default)]
pub struct NavigationTable {
    rules: FxHashMap<String, FxHashMap<String, String>>,
}

impl NavigationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = NavigationRule>,
    {
        let mut table = Self::new();
        for rule in rules {
            table.register(rule.from, rule.action, rule.to);
        }
        table
    }

    /// 读取全局配置里的 `[navigation]` 节
    pub fn from_config() -> Self {
        let cfg: NavigationConfig = easel_shared::config::get("navigation");
        log::info!("Loading {} navigation rules from config", cfg.rules.len());
        Self::from_rules(cfg.rules)
    }

    /// 同一 (from, action) 再次注册会直接覆盖
    pub fn register(&mut self, from: impl Into<String>, action: impl Into<String>, to: impl Into<String>) {
        let (from, action, to) = (from.into(), action.into(), to.into());
        log::debug!("Navigation rule: {} --{}--> {}", from, action, to);
        if let Some(previous) = self.rules.entry(from).or_default().insert(action, to) {
            log::debug!("Navigation rule overwrote previous destination '{}'", previous);
        }
    }

    /// 找不到规则就留在原地
    pub fn resolve<'a>(&'a self, origin: &'a str, action: &str) -> &'a str {
        self.lookup(origin, action).unwrap_or(origin)
    }

    pub fn lookup(&self, origin: &str, action: &str) -> Option<&str> {
        self.rules
            .get(origin)
            .and_then(|actions| actions.get(action))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(|actions| actions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! 页面 (activity) 生命周期：同一时刻只有一个页面拥有输入和绘制权。
//!
//! 页面之间通过在总线上发布 [`TransitionRequest`] 来切换，去哪一页由
//! [`NavigationTable`](crate::navigation::NavigationTable) 决定。

mod manager;

pub use manager::{ActivityManager, InputRoute};

use std::collections::BTreeMap;
use std::sync::Arc;
use serde_json::Value;

use crate::bus::EventBus;
use crate::input::KeyCode;
use crate::navigation::{BACK, CANCEL, NEXT};
use crate::surface::Surface;

/// 保留的默认页面 key
pub const DEFAULT_SCREEN: &str = "default";

/// 所有页面都要实现的 Trait；除了 `start` 全部有空的默认实现，按需覆盖
pub trait Screen {
    fn on_click(&mut self, _x: f32, _y: f32) {}

    fn on_focus(&mut self) {}

    fn on_blur(&mut self) {}

    fn on_key_press(&mut self, _ch: char) {}

    fn on_key_down(&mut self, _key: KeyCode) {}

    fn on_mouse_move(&mut self, _x: f32, _y: f32) {}

    /// 每次进入页面时、`start` 之前调用，带上一个页面交接过来的数据
    fn init(&mut self, _context: &HandOff) {}

    /// 页面成为当前页面。`bus` 可以克隆保存，之后用来发布跳转请求
    fn start(&mut self, surface: &mut dyn Surface, bus: &EventBus);

    /// 页面被替换或管理器关闭时调用
    fn stop(&mut self) {}

    /// 逐帧更新 / 重绘
    fn update(&mut self, _dt: f32, _surface: &mut dyn Surface) {}
}

/// 页面之间交接的只读数据
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandOff(Arc<BTreeMap<String, Value>>);

impl HandOff {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<BTreeMap<String, Value>> for HandOff {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(Arc::new(map))
    }
}

// 缺失的上下文一律当成空表
impl From<Option<BTreeMap<String, Value>>> for HandOff {
    fn from(map: Option<BTreeMap<String, Value>>) -> Self {
        map.map(Self::from).unwrap_or_default()
    }
}

/// 非 object 的 JSON 值得到空表
impl From<Value> for HandOff {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => Self::default(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for HandOff {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(Arc::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect()))
    }
}

/// 切换请求：动作 + 交接数据
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRequest {
    action: String,
    context: HandOff,
}

impl TransitionRequest {
    pub fn new(action: impl Into<String>, context: impl Into<HandOff>) -> Self {
        Self { action: action.into(), context: context.into() }
    }

    pub fn next(context: impl Into<HandOff>) -> Self {
        Self::new(NEXT, context)
    }

    pub fn back(context: impl Into<HandOff>) -> Self {
        Self::new(BACK, context)
    }

    pub fn cancel(context: impl Into<HandOff>) -> Self {
        Self::new(CANCEL, context)
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn context(&self) -> &HandOff {
        &self.context
    }

    pub fn into_parts(self) -> (String, HandOff) {
        (self.action, self.context)
    }
}

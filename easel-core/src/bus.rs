use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};

use crate::activity::TransitionRequest;

/// 总线上流动的所有事件
#[derive(Debug, Clone)]
pub enum BusEvent {
    /// 屏幕请求切换 (next / back / cancel / 自定义)
    Transition(TransitionRequest),
    /// 单个资源加载完成，附带总体进度 [0, 1]
    ResourceLoaded { key: Option<String>, percentage: f32 },
    /// 本轮预加载全部完成 (每轮只发一次)
    AllResourcesLoaded { batch: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Transition,
    ResourceLoaded,
    AllResourcesLoaded,
}

impl BusEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            BusEvent::Transition(_) => EventKind::Transition,
            BusEvent::ResourceLoaded { .. } => EventKind::ResourceLoaded,
            BusEvent::AllResourcesLoaded { .. } => EventKind::AllResourcesLoaded,
        }
    }
}

struct Subscriber {
    kind: EventKind,
    tx: Sender<BusEvent>,
}

/// 进程内发布/订阅总线。克隆得到的是同一条总线的句柄。
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, kind: EventKind) -> Subscription {
        let (tx, rx) = mpsc::channel();
        self.lock().push(Subscriber { kind, tx });
        Subscription { kind, rx }
    }

    /// 投递给所有同类订阅者；已被 drop 的订阅在这里顺便清理掉
    pub fn publish(&self, event: BusEvent) {
        let kind = event.kind();
        let mut subscribers = self.lock();
        subscribers.retain(|s| s.kind != kind || s.tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.lock().iter().filter(|s| s.kind == kind).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.lock().len())
            .finish()
    }
}

/// 某一类事件的接收端，读取永不阻塞
#[derive(Debug)]
pub struct Subscription {
    kind: EventKind,
    rx: Receiver<BusEvent>,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn try_next(&self) -> Option<BusEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn drain(&self) -> Vec<BusEvent> {
        self.rx.try_iter().collect()
    }
}

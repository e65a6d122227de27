use rustc_hash::FxHashMap;

use super::{HandOff, Screen, TransitionRequest, DEFAULT_SCREEN};
use crate::bus::{BusEvent, EventBus, EventKind, Subscription};
use crate::input::InputEvent;
use crate::navigation::NavigationTable;
use crate::surface::Surface;

/// 原始输入当前转发给哪个页面。每次切换整体替换，不会叠加。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRoute {
    pub target: String,
    pub generation: u64,
}

/// 页面管理器：持有画布、总线、跳转表和唯一的"当前页面"槽位
pub struct ActivityManager<S: Surface> {
    surface: S,
    bus: EventBus,
    navigation: NavigationTable,
    screens: FxHashMap<String, Box<dyn Screen>>,

    current_key: String,
    // 正在运行的页面 key；为 None 时没有任何页面处于 start 状态
    active: Option<String>,
    route: Option<InputRoute>,
    generation: u64,

    requests: Subscription,
}

impl<S: Surface> ActivityManager<S> {
    pub fn new(surface: S, bus: EventBus, navigation: NavigationTable) -> Self {
        let requests = bus.subscribe(EventKind::Transition);
        Self {
            surface,
            bus,
            navigation,
            screens: FxHashMap::default(),
            current_key: DEFAULT_SCREEN.to_string(),
            active: None,
            route: None,
            generation: 0,
            requests,
        }
    }

    pub fn register_screen(&mut self, key: impl Into<String>, screen: Box<dyn Screen>) {
        let key = key.into();
        // 替换正在运行的页面：旧实例先 stop，新实例等下一次 start / 切换才启动
        if self.active.as_deref() == Some(key.as_str()) {
            if let Some(old) = self.screens.get_mut(&key) {
                log::warn!("Replacing running screen '{}', stopping the old instance", key);
                old.stop();
            }
            self.active = None;
            self.route = None;
        }
        log::debug!("Registered screen '{}'", key);
        self.screens.insert(key, screen);
    }

    pub fn register_default_screen(&mut self, screen: Box<dyn Screen>) {
        self.register_screen(DEFAULT_SCREEN, screen);
    }

    /// 显示当前 key 对应的页面 (不调用 init，因为没有上一个页面)。
    /// 已经有页面在运行时什么都不做。
    pub fn start(&mut self) {
        if let Some(active) = &self.active {
            log::debug!("Screen '{}' is already running, start ignored", active);
            return;
        }
        let key = self.current_key.clone();
        if !self.screens.contains_key(&key) {
            log::info!("No screen registered under '{}', manager stays idle", key);
            return;
        }

        self.rebind_input(&key);
        if let Some(screen) = self.screens.get_mut(&key) {
            log::info!("Starting screen '{}'", key);
            screen.start(&mut self.surface, &self.bus);
        }
        self.active = Some(key);
    }

    /// 切换页面：stop 旧页面 -> 查表 -> 重新绑定输入 -> init -> start
    pub fn request_transition(&mut self, action: &str, context: HandOff) {
        if let Some(key) = self.active.take() {
            if let Some(screen) = self.screens.get_mut(&key) {
                log::debug!("Stopping screen '{}'", key);
                screen.stop();
            }
        }
        self.route = None;

        if self.current_key.is_empty() {
            self.current_key = DEFAULT_SCREEN.to_string();
        }

        let next = self.navigation.resolve(&self.current_key, action).to_string();
        log::info!("Transition '{}' --{}--> '{}'", self.current_key, action, next);
        self.current_key = next.clone();

        if !self.screens.contains_key(&next) {
            log::warn!("No screen registered under '{}', no screen is active now", next);
            return;
        }

        self.rebind_input(&next);
        if let Some(screen) = self.screens.get_mut(&next) {
            screen.init(&context);
            screen.start(&mut self.surface, &self.bus);
        }
        self.active = Some(next);
    }

    /// 处理总线上积压的切换请求，返回处理数量。
    /// 页面在 start 里发布的请求也会在同一次调用里被处理。
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.requests.try_next() {
            if let BusEvent::Transition(request) = event {
                let (action, context) = request.into_parts();
                self.request_transition(&action, context);
                handled += 1;
            }
        }
        handled
    }

    pub fn submit(&mut self, request: TransitionRequest) {
        let (action, context) = request.into_parts();
        self.request_transition(&action, context);
    }

    /// 把原始输入交给当前绑定的页面；没有页面接收时返回 false
    pub fn dispatch_input(&mut self, event: InputEvent) -> bool {
        let Some(route) = &self.route else {
            log::debug!("Dropped {} event: no input route", event.name());
            return false;
        };
        if self.active.as_deref() != Some(route.target.as_str()) {
            log::debug!("Dropped {} event: route target '{}' is not running", event.name(), route.target);
            return false;
        }
        let Some(screen) = self.screens.get_mut(&route.target) else {
            return false;
        };

        match event {
            InputEvent::Click { x, y } => screen.on_click(x, y),
            InputEvent::Focus => screen.on_focus(),
            InputEvent::Blur => screen.on_blur(),
            InputEvent::KeyPress(ch) => screen.on_key_press(ch),
            InputEvent::KeyDown(key) => screen.on_key_down(key),
            InputEvent::MouseMove { x, y } => screen.on_mouse_move(x, y),
        }

        if event == InputEvent::Blur {
            self.surface.request_focus();
        }
        true
    }

    pub fn tick(&mut self, dt: f32) {
        if let Some(key) = &self.active {
            if let Some(screen) = self.screens.get_mut(key) {
                screen.update(dt, &mut self.surface);
            }
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(key) = self.active.take() {
            if let Some(screen) = self.screens.get_mut(&key) {
                log::info!("Shutting down, stopping screen '{}'", key);
                screen.stop();
            }
        }
        self.route = None;
    }

    fn rebind_input(&mut self, key: &str) {
        self.generation += 1;
        self.route = Some(InputRoute { target: key.to_string(), generation: self.generation });
        log::debug!("Input routed to '{}' (generation {})", key, self.generation);
    }

    pub fn current_key(&self) -> &str {
        &self.current_key
    }

    pub fn active_key(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn has_active_screen(&self) -> bool {
        self.active.is_some()
    }

    pub fn route(&self) -> Option<&InputRoute> {
        self.route.as_ref()
    }

    pub fn navigation_mut(&mut self) -> &mut NavigationTable {
        &mut self.navigation
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
}

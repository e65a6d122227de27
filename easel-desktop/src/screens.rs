use serde_json::json;
use easel_core::bus::{BusEvent, EventBus, EventKind, Subscription};
use easel_core::{HandOff, KeyCode, Screen, Surface, TransitionRequest};

fn publish(bus: &Option<EventBus>, request: TransitionRequest) {
    if let Some(bus) = bus {
        bus.publish(BusEvent::Transition(request));
    }
}

/// 默认页面：显示预加载进度，全部完成后自动进入下一页
#[derive(Default)]
pub struct LoadingScreen {
    bus: Option<EventBus>,
    progress: Option<Subscription>,
    done: Option<Subscription>,
    shown: i32,
}

impl Screen for LoadingScreen {
    fn start(&mut self, surface: &mut dyn Surface, bus: &EventBus) {
        self.progress = Some(bus.subscribe(EventKind::ResourceLoaded));
        self.done = Some(bus.subscribe(EventKind::AllResourcesLoaded));
        self.bus = Some(bus.clone());
        self.shown = -1;
        surface.clear();
        surface.draw_text("Loading...", 2.0, 0.0);
    }

    fn stop(&mut self) {
        // 订阅随之 drop，总线下次发布时清理
        self.progress = None;
        self.done = None;
        self.bus = None;
    }

    fn update(&mut self, _dt: f32, surface: &mut dyn Surface) {
        if let Some(progress) = &self.progress {
            let latest = progress.drain().into_iter().filter_map(|e| match e {
                BusEvent::ResourceLoaded { percentage, .. } => Some(percentage),
                _ => None,
            }).last();
            if let Some(p) = latest {
                let percent = (p * 100.0).round() as i32;
                if percent != self.shown {
                    self.shown = percent;
                    let filled = (percent / 5) as usize;
                    surface.draw_text(&format!("[{:<20}] {:>3}%", "#".repeat(filled), percent), 2.0, 1.0);
                }
            }
        }

        let finished = self.done.as_ref().is_some_and(|d| d.try_next().is_some());
        if finished {
            publish(&self.bus, TransitionRequest::next(HandOff::empty()));
        }
    }
}

#[derive(Default)]
pub struct MenuScreen {
    bus: Option<EventBus>,
    best: i64,
}

impl MenuScreen {
    fn play(&self) {
        publish(&self.bus, TransitionRequest::next(json!({ "best": self.best })));
    }
}

impl Screen for MenuScreen {
    fn init(&mut self, context: &HandOff) {
        if let Some(score) = context.get("score").and_then(|v| v.as_i64()) {
            self.best = self.best.max(score);
        }
    }

    fn start(&mut self, surface: &mut dyn Surface, bus: &EventBus) {
        self.bus = Some(bus.clone());
        surface.clear();
        surface.draw_text("== Easel ==", 2.0, 0.0);
        surface.draw_text(&format!("Best score: {}", self.best), 2.0, 1.0);
        surface.draw_text("'n' or enter: play    'q': quit", 2.0, 2.0);
    }

    fn stop(&mut self) {
        self.bus = None;
    }

    fn on_key_press(&mut self, ch: char) {
        if ch == 'n' {
            self.play();
        }
    }

    fn on_key_down(&mut self, key: KeyCode) {
        if key == KeyCode::Enter {
            self.play();
        }
    }
}

/// 点击计分；'b' 带分数返回菜单，esc 放弃本局
#[derive(Default)]
pub struct GameScreen {
    bus: Option<EventBus>,
    score: i64,
    best: i64,
}

impl Screen for GameScreen {
    fn on_click(&mut self, x: f32, y: f32) {
        self.score += 1;
        log::debug!("Click at ({}, {}), score {}", x, y, self.score);
        println!("  score: {}", self.score);
    }

    fn on_key_press(&mut self, ch: char) {
        if ch == 'b' {
            publish(&self.bus, TransitionRequest::back(json!({ "score": self.score })));
        }
    }

    fn on_key_down(&mut self, key: KeyCode) {
        if key == KeyCode::Escape {
            publish(&self.bus, TransitionRequest::cancel(HandOff::empty()));
        }
    }

    fn on_blur(&mut self) {
        println!("  (paused)");
    }

    fn init(&mut self, context: &HandOff) {
        self.score = 0;
        self.best = context.get("best").and_then(|v| v.as_i64()).unwrap_or(0);
    }

    fn start(&mut self, surface: &mut dyn Surface, bus: &EventBus) {
        self.bus = Some(bus.clone());
        surface.clear();
        surface.draw_text(&format!("Click to score! (best {})", self.best), 2.0, 0.0);
        surface.draw_text("'click x y': score    'b': back    esc: give up", 2.0, 1.0);
    }

    fn stop(&mut self) {
        self.bus = None;
    }
}

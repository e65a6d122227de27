mod assets;
mod config_gen;
mod screens;
mod setup;
mod terminal;

use std::env;
use std::sync::mpsc::TryRecvError;
use std::thread;
use std::time::{Duration, Instant};
use easel_core::config::PreloadConfig;
use easel_core::{ActivityManager, BusEvent, EventBus, HandOff, NavigationTable, ResourcePreloader, TransitionRequest};
use crate::assets::FsLoader;
use crate::screens::{GameScreen, LoadingScreen, MenuScreen};
use crate::terminal::{Command, TerminalSurface};

const FRAME: Duration = Duration::from_millis(16);

fn main() {
    let config_path = env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    setup::init(&config_path);
    log::info!(">>> Easel Desktop Started <<<");

    let bus = EventBus::new();

    let preload_cfg: PreloadConfig = easel_shared::config::get("preload");
    let mut preloader = ResourcePreloader::new(FsLoader::new(preload_cfg.audio_enabled), bus.clone());
    assets::register_dir(&mut preloader, &preload_cfg);

    let mut manager = ActivityManager::new(TerminalSurface::new(60.0, 20.0), bus.clone(), NavigationTable::from_config());
    manager.register_default_screen(Box::new(LoadingScreen::default()));
    manager.register_screen("menu", Box::new(MenuScreen::default()));
    manager.register_screen("game", Box::new(GameScreen::default()));
    manager.start();

    preloader.preload();
    if preloader.progress().total == 0 {
        // 没有任何资源，完成通知永远不会来
        log::warn!("No assets to preload under '{}', skipping loading screen", preload_cfg.assets_path);
        bus.publish(BusEvent::Transition(TransitionRequest::next(HandOff::empty())));
    }

    let input = terminal::spawn_input();
    let mut last_frame = Instant::now();

    'main: loop {
        preloader.poll();

        loop {
            match input.try_recv() {
                Ok(Command::Input(event)) => {
                    manager.dispatch_input(event);
                }
                Ok(Command::Quit) | Err(TryRecvError::Disconnected) => break 'main,
                Err(TryRecvError::Empty) => break,
            }
        }

        manager.pump();

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        manager.tick(dt);
        // tick 里页面可能又发了跳转请求
        manager.pump();

        thread::sleep(FRAME);
    }

    manager.shutdown();
    log::info!("Bye (last screen '{}')", manager.current_key());
}

use easel_core::bus::{BusEvent, EventBus, EventKind, Subscription};
use easel_core::preload::{AssetLoader, AssetState, Completion};
use easel_core::ResourcePreloader;

/// 把回执攒起来，由测试决定何时、以什么顺序完成
#[derive(Default)]
struct ManualLoader {
    audio: bool,
    resets: usize,
    pending: Vec<Completion<String>>,
    audio_sources: Vec<Vec<String>>,
}

impl ManualLoader {
    fn with_audio() -> Self {
        Self { audio: true, ..Self::default() }
    }

    fn finish(&mut self, key: &str) {
        let idx = self
            .pending
            .iter()
            .position(|c| c.ticket().key == key)
            .unwrap_or_else(|| panic!("no pending load for {key}"));
        self.pending.remove(idx).complete(format!("data:{key}"));
    }
}

impl AssetLoader for ManualLoader {
    type Image = String;
    type Audio = String;

    fn audio_supported(&self) -> bool {
        self.audio
    }

    fn reset(&mut self) {
        self.resets += 1;
    }

    fn load_image(&mut self, _url: &str, done: Completion<String>) {
        self.pending.push(done);
    }

    fn load_audio(&mut self, urls: &[String], done: Completion<String>) {
        self.audio_sources.push(urls.to_vec());
        self.pending.push(done);
    }
}

fn completions(sub: &Subscription) -> usize {
    sub.drain()
        .into_iter()
        .filter(|e| matches!(e, BusEvent::AllResourcesLoaded { .. }))
        .count()
}

fn percentages(sub: &Subscription) -> Vec<f32> {
    sub.drain()
        .into_iter()
        .filter_map(|e| match e {
            BusEvent::ResourceLoaded { percentage, .. } => Some(percentage),
            _ => None,
        })
        .collect()
}

#[test]
fn percentage_is_zero_without_assets() {
    let mut preloader = ResourcePreloader::new(ManualLoader::default(), EventBus::new());
    assert_eq!(preloader.loaded_percentage(), 0.0);

    preloader.preload();
    assert_eq!(preloader.loaded_percentage(), 0.0);
    assert_eq!(preloader.poll(), 0);
    assert!(!preloader.is_complete());

    preloader.add_loaded_weight(5);
    assert_eq!(preloader.progress().loaded, 0);
    assert_eq!(preloader.loaded_percentage(), 0.0);
    assert!(!preloader.is_complete());
}

#[test]
fn weighted_progress_and_single_completion() {
    let bus = EventBus::new();
    let progress = bus.subscribe(EventKind::ResourceLoaded);
    let done = bus.subscribe(EventKind::AllResourcesLoaded);
    let mut preloader = ResourcePreloader::new(ManualLoader::default(), bus);
    preloader.register_image("bg", "img/bg.png", 10);
    preloader.register_image("logo", "img/logo.png", 5);

    preloader.preload();
    assert_eq!(preloader.image("bg").map(|a| a.state), Some(AssetState::Loading));

    preloader.loader_mut().finish("bg");
    assert_eq!(preloader.poll(), 1);
    assert!((preloader.loaded_percentage() - 10.0 / 15.0).abs() < 1e-6);
    assert_eq!(completions(&done), 0);

    preloader.loader_mut().finish("logo");
    preloader.poll();
    assert_eq!(preloader.loaded_percentage(), 1.0);
    assert_eq!(completions(&done), 1);
    assert!(preloader.is_complete());
    assert_eq!(preloader.image("logo").map(|a| a.state), Some(AssetState::Loaded));

    let reported = percentages(&progress);
    assert_eq!(reported.len(), 2);
    assert_eq!(reported[1], 1.0);
}

#[test]
fn simultaneous_completions_fire_once() {
    let bus = EventBus::new();
    let done = bus.subscribe(EventKind::AllResourcesLoaded);
    let mut preloader = ResourcePreloader::new(ManualLoader::default(), bus);
    preloader.register_image("a", "a.png", 3);
    preloader.register_image("b", "b.png", 7);

    preloader.preload();
    preloader.loader_mut().finish("b");
    preloader.loader_mut().finish("a");
    assert_eq!(preloader.poll(), 2);

    assert_eq!(completions(&done), 1);
    preloader.add_loaded_weight(1);
    assert_eq!(completions(&done), 0);
}

#[test]
fn audio_sources_accumulate_under_first_weight() {
    let mut preloader = ResourcePreloader::new(ManualLoader::with_audio(), EventBus::new());
    preloader.register_audio("theme", "snd/theme.ogg", 4);
    preloader.register_audio("theme", "snd/theme.mp3", 99);

    let theme = preloader.audio("theme").cloned().unwrap();
    assert_eq!(theme.weight, 4);
    assert_eq!(theme.urls, vec!["snd/theme.ogg", "snd/theme.mp3"]);

    preloader.preload();
    assert_eq!(preloader.progress().total, 4);
    assert_eq!(
        preloader.loader().audio_sources,
        vec![vec!["snd/theme.ogg".to_string(), "snd/theme.mp3".to_string()]]
    );

    preloader.loader_mut().finish("theme");
    preloader.poll();
    assert!(preloader.is_complete());
}

#[test]
fn unsupported_audio_is_left_out_of_total() {
    let bus = EventBus::new();
    let done = bus.subscribe(EventKind::AllResourcesLoaded);
    let mut preloader = ResourcePreloader::new(ManualLoader::default(), bus);
    preloader.register_image("bg", "bg.png", 2);
    preloader.register_audio("theme", "theme.ogg", 8);

    preloader.preload();
    assert_eq!(preloader.progress().total, 2);
    assert_eq!(preloader.loader().pending.len(), 1);
    assert_eq!(preloader.audio("theme").map(|a| a.state), Some(AssetState::Registered));

    preloader.loader_mut().finish("bg");
    preloader.poll();
    assert_eq!(completions(&done), 1);
}

#[test]
fn second_preload_resets_counters() {
    let bus = EventBus::new();
    let done = bus.subscribe(EventKind::AllResourcesLoaded);
    let mut preloader = ResourcePreloader::new(ManualLoader::default(), bus);
    preloader.register_image("bg", "bg.png", 10);

    let first = preloader.preload();
    preloader.loader_mut().finish("bg");
    preloader.poll();
    assert!(preloader.is_complete());
    assert_eq!(completions(&done), 1);

    preloader.register_image("logo", "logo.png", 10);
    let second = preloader.preload();
    assert_eq!(second, first + 1);
    assert_eq!(preloader.loader().resets, 2);

    let progress = preloader.progress();
    assert_eq!((progress.loaded, progress.total, progress.fired), (0, 20, false));
    assert_eq!(preloader.image("bg").map(|a| a.state), Some(AssetState::Loading));

    preloader.loader_mut().finish("bg");
    preloader.loader_mut().finish("logo");
    preloader.poll();
    assert_eq!(completions(&done), 1);
}

#[test]
fn stale_completions_from_previous_batch_are_ignored() {
    let mut preloader = ResourcePreloader::new(ManualLoader::default(), EventBus::new());
    preloader.register_image("bg", "bg.png", 10);
    preloader.register_image("logo", "logo.png", 10);

    let first = preloader.preload();
    let second = preloader.preload();
    let stale = preloader
        .loader()
        .pending
        .iter()
        .filter(|c| c.ticket().batch == first)
        .count();
    assert_eq!(stale, 2);

    // finish 总是先找到更早挂起的那一个
    preloader.loader_mut().finish("bg");
    preloader.loader_mut().finish("logo");
    assert_eq!(preloader.poll(), 0);
    assert_eq!(preloader.progress().loaded, 0);

    preloader.loader_mut().finish("bg");
    preloader.loader_mut().finish("logo");
    assert_eq!(preloader.poll(), 2);
    assert!(preloader.is_complete());
    assert_eq!(preloader.batch(), second);
}

#[test]
fn lookup_of_unknown_key_is_none() {
    let mut preloader = ResourcePreloader::new(ManualLoader::default(), EventBus::new());
    preloader.register_image("bg", "bg.png", 1);

    assert!(preloader.image("missing").is_none());
    assert!(preloader.audio("bg").is_none());
    assert_eq!(preloader.image("bg").map(|a| a.url.as_str()), Some("bg.png"));
}

#[test]
fn manual_weight_never_pushes_past_full() {
    let bus = EventBus::new();
    let progress = bus.subscribe(EventKind::ResourceLoaded);
    let mut preloader = ResourcePreloader::new(ManualLoader::default(), bus);
    preloader.register_image("bg", "bg.png", 10);
    preloader.preload();

    preloader.add_loaded_weight(4);
    preloader.add_loaded_weight(40);
    assert_eq!(preloader.progress().loaded, 10);
    assert_eq!(preloader.loaded_percentage(), 1.0);
    assert!(preloader.is_complete());

    preloader.loader_mut().finish("bg");
    preloader.poll();
    preloader.add_loaded_weight(1);
    assert_eq!(preloader.progress().loaded, 10);
    assert_eq!(preloader.loaded_percentage(), 1.0);

    let reported = percentages(&progress);
    assert_eq!(reported.len(), 2);
    assert!(reported.iter().all(|p| *p <= 1.0));
}

#[test]
fn reregistering_a_loading_image_still_completes_the_batch() {
    let bus = EventBus::new();
    let done = bus.subscribe(EventKind::AllResourcesLoaded);
    let mut preloader = ResourcePreloader::new(ManualLoader::default(), bus);
    preloader.register_image("bg", "bg.png", 10);
    preloader.preload();

    preloader.register_image("bg", "bg-hd.png", 30);
    let bg = preloader.image("bg").cloned().unwrap();
    assert_eq!(bg.state, AssetState::Loading);
    assert_eq!(bg.url, "bg-hd.png");

    preloader.loader_mut().finish("bg");
    assert_eq!(preloader.poll(), 1);
    assert_eq!(preloader.progress().loaded, 10);
    assert_eq!(completions(&done), 1);

    // 新的权重从下一轮开始计入
    preloader.preload();
    assert_eq!(preloader.progress().total, 30);
}

#[test]
fn loaded_handles_are_kept_per_key() {
    let mut preloader = ResourcePreloader::new(ManualLoader::with_audio(), EventBus::new());
    preloader.register_image("bg", "bg.png", 1);
    preloader.register_audio("theme", "theme.ogg", 1);

    preloader.preload();
    assert!(preloader.image_handle("bg").is_none());

    preloader.loader_mut().finish("bg");
    preloader.loader_mut().finish("theme");
    preloader.poll();

    assert_eq!(preloader.image_handle("bg").map(String::as_str), Some("data:bg"));
    assert_eq!(preloader.audio_handle("theme").map(String::as_str), Some("data:theme"));
    assert!(preloader.image_handle("theme").is_none());

    // 新一轮开始时旧句柄清空，等本轮回执
    preloader.preload();
    assert!(preloader.image_handle("bg").is_none());
}

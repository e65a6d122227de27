use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};

use super::{AssetKind, AssetLoader, AssetState, AudioAsset, Completion, ImageAsset, LoadTicket, Progress};
use crate::bus::{BusEvent, EventBus};

pub struct ResourcePreloader<L: AssetLoader> {
    loader: L,
    bus: EventBus,

    images: BTreeMap<String, ImageAsset<L::Image>>,
    audios: BTreeMap<String, AudioAsset<L::Audio>>,

    progress: Progress,
    // 每次 preload 自增；旧批次的回执直接丢弃
    batch: u64,

    image_tx: Sender<(LoadTicket, L::Image)>,
    image_rx: Receiver<(LoadTicket, L::Image)>,
    audio_tx: Sender<(LoadTicket, L::Audio)>,
    audio_rx: Receiver<(LoadTicket, L::Audio)>,
}

impl<L: AssetLoader> ResourcePreloader<L> {
    pub fn new(loader: L, bus: EventBus) -> Self {
        let (image_tx, image_rx) = mpsc::channel();
        let (audio_tx, audio_rx) = mpsc::channel();
        Self {
            loader,
            bus,
            images: BTreeMap::new(),
            audios: BTreeMap::new(),
            progress: Progress::default(),
            batch: 0,
            image_tx,
            image_rx,
            audio_tx,
            audio_rx,
        }
    }

    /// 同 key 再次登记会覆盖。
    /// 正在加载中的图片保持 Loading，新的 url 和权重从下一轮 preload 开始生效。
    pub fn register_image(&mut self, key: impl Into<String>, url: impl Into<String>, weight: u32) {
        let key = key.into();
        let url = url.into();
        log::debug!("Register image '{}' -> {} (weight {})", key, url, weight);

        match self.images.get_mut(&key) {
            Some(image) if image.state == AssetState::Loading => {
                log::debug!("Image '{}' is loading, new source applies to the next batch", key);
                image.url = url;
                image.weight = weight;
            }
            _ => {
                self.images.insert(key, ImageAsset { url, weight, state: AssetState::Registered, handle: None });
            }
        }
    }

    /// 同 key 再次登记只追加音源，权重以第一次为准
    pub fn register_audio(&mut self, key: impl Into<String>, url: impl Into<String>, weight: u32) {
        let key = key.into();
        let url = url.into();
        log::debug!("Register audio '{}' source {}", key, url);
        self.audios
            .entry(key)
            .or_insert_with(|| AudioAsset { urls: Vec::new(), weight, state: AssetState::Registered, handle: None })
            .urls
            .push(url);
    }

    pub fn image(&self, key: &str) -> Option<&ImageAsset<L::Image>> {
        self.images.get(key)
    }

    pub fn audio(&self, key: &str) -> Option<&AudioAsset<L::Audio>> {
        self.audios.get(key)
    }

    /// 已加载完成的图片句柄
    pub fn image_handle(&self, key: &str) -> Option<&L::Image> {
        self.images.get(key).and_then(|a| a.handle.as_ref())
    }

    pub fn audio_handle(&self, key: &str) -> Option<&L::Audio> {
        self.audios.get(key).and_then(|a| a.handle.as_ref())
    }

    /// 开始新一轮预加载，返回批次号
    pub fn preload(&mut self) -> u64 {
        self.batch += 1;
        self.progress = Progress::default();
        self.loader.reset();

        let batch = self.batch;
        for (key, image) in self.images.iter_mut() {
            image.state = AssetState::Loading;
            image.handle = None;
            self.progress.total += u64::from(image.weight);
            let ticket = LoadTicket { batch, kind: AssetKind::Image, key: key.clone(), weight: image.weight };
            self.loader.load_image(&image.url, Completion::new(ticket, self.image_tx.clone()));
        }

        if self.loader.audio_supported() {
            for (key, audio) in self.audios.iter_mut() {
                audio.state = AssetState::Loading;
                audio.handle = None;
                self.progress.total += u64::from(audio.weight);
                let ticket = LoadTicket { batch, kind: AssetKind::Audio, key: key.clone(), weight: audio.weight };
                self.loader.load_audio(&audio.urls, Completion::new(ticket, self.audio_tx.clone()));
            }
        } else if !self.audios.is_empty() {
            log::info!("Audio not supported, skipping {} audio assets", self.audios.len());
            for audio in self.audios.values_mut() {
                audio.state = AssetState::Registered;
                audio.handle = None;
            }
        }

        log::info!(
            "Preload batch {} started: {} images, {} audio, total weight {}",
            batch, self.images.len(), self.audios.len(), self.progress.total
        );
        batch
    }

    /// 处理所有已到达的加载回执，返回实际计入进度的数量
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok((ticket, handle)) = self.image_rx.try_recv() {
            if self.accept(&ticket) {
                if let Some(image) = self.images.get_mut(&ticket.key) {
                    image.state = AssetState::Loaded;
                    image.handle = Some(handle);
                }
                self.record_loaded(Some(ticket.key), ticket.weight);
                applied += 1;
            }
        }
        while let Ok((ticket, handle)) = self.audio_rx.try_recv() {
            if self.accept(&ticket) {
                if let Some(audio) = self.audios.get_mut(&ticket.key) {
                    audio.state = AssetState::Loaded;
                    audio.handle = Some(handle);
                }
                self.record_loaded(Some(ticket.key), ticket.weight);
                applied += 1;
            }
        }
        applied
    }

    /// 回执是否属于本轮、且对应的资源还在 Loading
    fn accept(&self, ticket: &LoadTicket) -> bool {
        if ticket.batch != self.batch {
            log::warn!("Ignoring stale completion for '{}' from batch {} (current {})", ticket.key, ticket.batch, self.batch);
            return false;
        }

        let state = match ticket.kind {
            AssetKind::Image => self.images.get(&ticket.key).map(|a| a.state),
            AssetKind::Audio => self.audios.get(&ticket.key).map(|a| a.state),
        };
        match state {
            Some(AssetState::Loading) => true,
            Some(_) => {
                log::debug!("Duplicate completion for '{}' ignored", ticket.key);
                false
            }
            None => {
                log::warn!("Completion for unknown {:?} asset '{}'", ticket.kind, ticket.key);
                false
            }
        }
    }

    /// 手动计入权重。已加载量封顶在总权重，完成通知发出后不再变化。
    pub fn add_loaded_weight(&mut self, weight: u32) {
        self.record_loaded(None, weight);
    }

    fn record_loaded(&mut self, key: Option<String>, weight: u32) {
        if self.progress.fired {
            log::debug!("Batch {} already complete, ignoring weight {}", self.batch, weight);
            return;
        }
        self.progress.loaded = (self.progress.loaded + u64::from(weight)).min(self.progress.total);
        let percentage = self.progress.percentage();
        log::debug!("Loaded {}/{} ({:.1}%)", self.progress.loaded, self.progress.total, percentage * 100.0);
        self.bus.publish(BusEvent::ResourceLoaded { key, percentage });

        // 闩锁：同一帧里多个资源同时完成也只通知一次；空批次永远不算完成
        if self.progress.total > 0 && self.progress.loaded >= self.progress.total {
            self.progress.fired = true;
            log::info!("All resources loaded (batch {})", self.batch);
            self.bus.publish(BusEvent::AllResourcesLoaded { batch: self.batch });
        }
    }

    pub fn loaded_percentage(&self) -> f32 {
        self.progress.percentage()
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.progress.fired
    }

    pub fn batch(&self) -> u64 {
        self.batch
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }
}

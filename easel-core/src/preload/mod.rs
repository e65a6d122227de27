//! 资源预加载：登记图片/音频，异步加载，汇总成一个总体进度，
//! 全部完成时在总线上发一次 `AllResourcesLoaded`。

mod manager;

pub use manager::ResourcePreloader;

use std::sync::mpsc::Sender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Image,
    Audio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetState {
    #[default]
    Registered,
    Loading,
    Loaded,
}

/// 标识某一轮预加载里的某个资源；`weight` 是发起加载时计入总权重的值
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub batch: u64,
    pub kind: AssetKind,
    pub key: String,
    pub weight: u32,
}

/// 加载完成的回执。`complete` 消耗自身，所以同一次加载最多回报一次。
#[derive(Debug)]
pub struct Completion<T> {
    ticket: LoadTicket,
    tx: Sender<(LoadTicket, T)>,
}

impl<T> Completion<T> {
    pub(crate) fn new(ticket: LoadTicket, tx: Sender<(LoadTicket, T)>) -> Self {
        Self { ticket, tx }
    }

    pub fn ticket(&self) -> &LoadTicket {
        &self.ticket
    }

    /// 交回加载好的句柄，预加载器在下一次 `poll` 时保存它
    pub fn complete(self, handle: T) {
        // 预加载器已经不在了，没人关心这个结果
        if self.tx.send((self.ticket, handle)).is_err() {
            log::debug!("Completion dropped: preloader is gone");
        }
    }
}

/// 真正去取图片/音频的一方 (浏览器 DOM、文件系统、网络……)
pub trait AssetLoader {
    /// 加载完成后的图片句柄
    type Image;
    /// 加载完成后的音频句柄
    type Audio;

    /// 宿主能否播放音频；不支持时音频资源整体跳过，也不计入总权重
    fn audio_supported(&self) -> bool;

    /// 新一轮预加载开始前，清掉上一轮挂上去的所有元素
    fn reset(&mut self) {}

    fn load_image(&mut self, url: &str, done: Completion<Self::Image>);

    /// `urls` 是同一段音频的多个备选格式，按顺序挑第一个能用的。
    ///
    /// 在"可以不卡顿地播完"时回执。播放结束 (ended) 后重新加载，
    /// 让同一个句柄可以再次播放，也由加载器负责；重新加载不会再回执。
    fn load_audio(&mut self, urls: &[String], done: Completion<Self::Audio>);
}

/// 登记的图片；`handle` 在本轮加载完成后才有值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset<H> {
    pub url: String,
    pub weight: u32,
    pub state: AssetState,
    pub handle: Option<H>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAsset<H> {
    pub urls: Vec<String>,
    pub weight: u32,
    pub state: AssetState,
    pub handle: Option<H>,
}

/// (已加载权重, 总权重, 是否已经发过完成通知)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub loaded: u64,
    pub total: u64,
    pub fired: bool,
}

impl Progress {
    /// [0, 1]；总权重为 0 时定义为 0
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.loaded as f32 / self.total as f32).min(1.0)
    }
}

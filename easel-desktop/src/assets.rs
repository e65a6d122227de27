use std::fs;
use std::path::Path;
use std::thread::{self, JoinHandle};
use anyhow::Context;
use walkdir::WalkDir;
use easel_core::config::PreloadConfig;
use easel_core::preload::{AssetLoader, Completion};
use easel_core::ResourcePreloader;

/// 在后台线程里读文件的加载器；读完即回执，读失败只记日志 (进度会停在那里)
pub struct FsLoader {
    audio_enabled: bool,
    workers: Vec<JoinHandle<()>>,
}

impl FsLoader {
    pub fn new(audio_enabled: bool) -> Self {
        Self { audio_enabled, workers: Vec::new() }
    }

    fn spawn<F: FnOnce() + Send + 'static>(&mut self, job: F) {
        self.workers.push(thread::spawn(job));
    }
}

/// 读进内存的音频：实际选中的音源和它的原始字节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub source: String,
    pub bytes: Vec<u8>,
}

fn read_asset(path: &str) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read asset {:?}", path))
}

impl AssetLoader for FsLoader {
    type Image = Vec<u8>;
    type Audio = AudioClip;

    fn audio_supported(&self) -> bool {
        self.audio_enabled
    }

    fn reset(&mut self) {
        // 已经发出去的读取没法取消，只清理跑完的线程
        self.workers.retain(|h| !h.is_finished());
        if !self.workers.is_empty() {
            log::debug!("{} loads from a previous batch still running", self.workers.len());
        }
    }

    fn load_image(&mut self, url: &str, done: Completion<Vec<u8>>) {
        let url = url.to_string();
        self.spawn(move || match read_asset(&url) {
            Ok(bytes) => {
                log::debug!("Image '{}' read: {} bytes", done.ticket().key, bytes.len());
                done.complete(bytes);
            }
            Err(e) => log::error!("{:#}", e),
        });
    }

    // 终端里没有播放，所以也没有 ended 之后的重新加载
    fn load_audio(&mut self, urls: &[String], done: Completion<AudioClip>) {
        let urls = urls.to_vec();
        self.spawn(move || {
            // 按登记顺序取第一个能读的音源
            for url in &urls {
                match read_asset(url) {
                    Ok(bytes) => {
                        log::debug!("Audio '{}' ready from {}: {} bytes", done.ticket().key, url, bytes.len());
                        done.complete(AudioClip { source: url.clone(), bytes });
                        return;
                    }
                    Err(e) => log::warn!("{:#}", e),
                }
            }
            log::error!("No playable source for audio '{}'", done.ticket().key);
        });
    }
}

/// 扫描资源目录，按文件名 (不含后缀) 登记；同名的多种音频格式合并为一个音频
pub fn register_dir<L: AssetLoader>(preloader: &mut ResourcePreloader<L>, cfg: &PreloadConfig) -> (usize, usize) {
    let root = Path::new(&cfg.assets_path);
    log::info!("Scanning assets in {:?}...", root);

    let unit = cfg.weight_unit.max(1);
    let (mut images, mut audios) = (0, 0);

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let (Some(ext), Some(stem)) = (
            path.extension().and_then(|s| s.to_str()),
            path.file_stem().and_then(|s| s.to_str()),
        ) else {
            continue;
        };

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let weight = u32::try_from(size / unit).unwrap_or(u32::MAX).max(1);
        let url = path.to_string_lossy().to_string();

        match ext.to_lowercase().as_str() {
            "png" | "jpg" | "jpeg" => {
                if preloader.image(stem).is_some() {
                    log::warn!("Duplicate image name detected: '{}'. Overwriting with {:?}", stem, path);
                }
                preloader.register_image(stem, url, weight);
                images += 1;
            }
            "mp3" | "wav" | "ogg" | "flac" => {
                if preloader.audio(stem).is_none() {
                    audios += 1;
                }
                preloader.register_audio(stem, url, weight);
            }
            _ => {}
        }
    }

    log::info!("Asset scan complete. Images: {}, Audio: {}", images, audios);
    (images, audios)
}

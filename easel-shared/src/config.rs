use std::sync::{PoisonError, RwLock};
use std::path::Path;
use std::fs;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use toml::Table;

static GLOBAL_CONFIG: OnceCell<RwLock<Table>> = OnceCell::new();

/// 从磁盘加载全局配置，文件缺失时使用空表
pub fn init<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
    let path = path.as_ref();

    let content = if path.exists() {
        log::info!("Loading config from {:?}", path);
        fs::read_to_string(path)?
    } else {
        log::warn!("Config file not found at {:?}, using defaults.", path);
        String::new()
    };

    init_from_str(&content)
}

/// 直接从字符串初始化 (测试 / 内嵌配置用)
pub fn init_from_str(content: &str) -> anyhow::Result<()> {
    let table: Table = toml::from_str(content).unwrap_or_else(|e| {
        log::error!("Config syntax error: {}, using empty config.", e);
        Table::new()
    });

    GLOBAL_CONFIG.set(RwLock::new(table))
        .map_err(|_| anyhow::anyhow!("Config already initialized"))?;

    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}

/// 读取一个配置节；未初始化、缺失或类型不匹配时返回默认值
pub fn get<T: DeserializeOwned + Default>(key: &str) -> T {
    let Some(store) = GLOBAL_CONFIG.get() else {
        log::debug!("Config not initialized, section '[{}]' uses defaults.", key);
        return T::default();
    };
    let read_guard = store.read().unwrap_or_else(PoisonError::into_inner);

    if let Some(value) = read_guard.get(key) {
        value.clone().try_into().unwrap_or_else(|e| {
            log::warn!("Config section '[{}]' mismatch: {}. Using default.", key, e);
            T::default()
        })
    } else {
        T::default()
    }
}

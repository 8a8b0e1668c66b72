//! 编译期内嵌的 `.ts` 目录
//!
//! `linguist_macro::include_catalogs!` 会在 `main` 之前调用 [`register`]，
//! 把每个文件按文件名（不含扩展名）登记到这里。

use std::collections::BTreeMap;
use std::sync::{Mutex, OnceLock};

use tracing::warn;

fn registry() -> &'static Mutex<BTreeMap<&'static str, &'static str>> {
    static REGISTRY: OnceLock<Mutex<BTreeMap<&'static str, &'static str>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(BTreeMap::new()))
}

/// 登记一个内嵌目录；同名重复登记时保留第一次的内容
pub fn register(stem: &'static str, contents: &'static str) {
    let mut map = registry().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if map.contains_key(stem) {
        warn!("Embedded catalog '{}' already registered, ignoring", stem);
        return;
    }
    map.insert(stem, contents);
}

pub fn get(stem: &str) -> Option<&'static str> {
    let map = registry().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    map.get(stem).copied()
}

/// 已登记的全部文件名，按字典序
pub fn stems() -> Vec<&'static str> {
    let map = registry().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    map.keys().copied().collect()
}

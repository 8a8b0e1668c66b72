//! 当前语言的翻译器
//!
//! 持有当前生效的目录；切换语言时整体替换，不做局部修改。读取方克隆
//! `Arc` 后即释放锁。

use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};

use tracing::{debug, error, info, warn};

use crate::catalog::{Catalog, LoadOptions};
use crate::config::I18nConfig;
use crate::embedded;
use crate::error::{Error, Result};
use crate::locale::candidate_stems;

#[derive(Debug)]
pub struct Translator {
    active: RwLock<Arc<Catalog>>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::untranslated()
    }
}

/// 进程级翻译器，初始为未翻译模式
pub fn global() -> &'static Translator {
    static GLOBAL: OnceLock<Translator> = OnceLock::new();
    GLOBAL.get_or_init(Translator::untranslated)
}

impl Translator {
    /// 未翻译模式：所有查询返回原文
    pub fn untranslated() -> Self {
        Self::new(Catalog::empty())
    }

    pub fn new(catalog: Catalog) -> Self {
        Self {
            active: RwLock::new(Arc::new(catalog)),
        }
    }

    /// 当前生效的目录
    pub fn current(&self) -> Arc<Catalog> {
        let guard = self.active.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// 整体替换当前目录
    pub fn install(&self, catalog: Catalog) -> Arc<Catalog> {
        let catalog = Arc::new(catalog);
        let mut guard = self.active.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::clone(&catalog);
        catalog
    }

    /// 按配置切换语言
    ///
    /// 依次尝试每个偏好语言的候选文件，最后尝试不带语言后缀的文件。任何失败
    /// （解析错误、读取错误、找不到文件）都会装入空目录，即退回未翻译模式，
    /// 并把错误返回给调用方。
    pub fn switch_locale(&self, config: &I18nConfig) -> Result<Arc<Catalog>> {
        let stems = search_order(config);
        let options = config.load_options();

        for stem in &stems {
            debug!("Trying catalog '{}'", stem);
            let loaded = match &config.dir {
                Some(dir) => load_from_dir(dir, stem, options),
                None => load_embedded(stem, options),
            };
            match loaded {
                Some(Ok(catalog)) => {
                    info!(
                        "Switched locale to '{}' ({} translated messages)",
                        stem,
                        catalog.translated_count()
                    );
                    return Ok(self.install(catalog));
                }
                Some(Err(err)) => {
                    error!("Failed to load catalog '{}', falling back to source text: {}", stem, err);
                    self.install(Catalog::empty());
                    return Err(err);
                }
                None => {}
            }
        }

        warn!(
            "No catalog found for locale '{}', falling back to source text",
            config.locale
        );
        self.install(Catalog::empty());
        Err(Error::LocaleNotFound {
            locale: config.locale.clone(),
            searched: stems,
        })
    }

    pub fn tr(&self, context: &str, source: &str) -> String {
        self.current().lookup(context, source).to_string()
    }

    pub fn tr_disambiguated(&self, context: &str, source: &str, comment: &str) -> String {
        self.current()
            .lookup_disambiguated(context, source, comment)
            .to_string()
    }

    pub fn tr_plural(&self, context: &str, source: &str, comment: &str, n: i64) -> String {
        self.current().lookup_plural(context, source, comment, n)
    }
}

/// 所有偏好语言的带后缀候选在前，裸前缀文件最后
fn search_order(config: &I18nConfig) -> Vec<String> {
    let mut stems: Vec<String> = Vec::new();
    for locale in config.locales() {
        for stem in candidate_stems(&config.prefix, &locale) {
            if stem != config.prefix && !stems.contains(&stem) {
                stems.push(stem);
            }
        }
    }
    if !config.prefix.is_empty() {
        stems.push(config.prefix.clone());
    }
    stems
}

fn load_from_dir(dir: &Path, stem: &str, options: LoadOptions) -> Option<Result<Catalog>> {
    let path = dir.join(format!("{stem}.ts"));
    if !path.is_file() {
        return None;
    }
    Some(Catalog::load_file(&path, options))
}

fn load_embedded(stem: &str, options: LoadOptions) -> Option<Result<Catalog>> {
    let contents = embedded::get(stem)?;
    Some(Catalog::load_with(contents.as_bytes(), options).map_err(Error::from))
}

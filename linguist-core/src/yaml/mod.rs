//! YAML 配置加载器，支持环境变量替换
//!
//! `${NAME}` 替换为环境变量值，`${NAME:default}` 在变量缺失时使用默认值。

use dotenvy::dotenv;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// YAML 加载器错误
#[derive(Debug, Error)]
pub enum YamlLoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
    #[error("Invalid variable format: {0}")]
    InvalidVariable(String),
}

/// 替换 YAML 中的环境变量占位符
fn replace_vars(yaml_content: &str) -> Result<String, YamlLoaderError> {
    // .env 只读取一次，缺失时忽略（生产环境通常没有 .env 文件）
    static DOTENV: OnceLock<()> = OnceLock::new();
    DOTENV.get_or_init(|| {
        let _ = dotenv();
    });

    static VAR_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = VAR_REGEX.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::([^\}]*))?\}").expect("Invalid regex pattern")
    });

    // 只检查原始输入里闭合的 `${...}`：名字不合法才算错误，未闭合的 `${` 按字面保留
    static BRACED_REGEX: OnceLock<Regex> = OnceLock::new();
    let braced = BRACED_REGEX.get_or_init(|| Regex::new(r"\$\{[^\}\n]*\}").expect("Invalid regex pattern"));
    for found in braced.find_iter(yaml_content) {
        let valid = re
            .find(found.as_str())
            .is_some_and(|m| m.start() == 0 && m.end() == found.len());
        if !valid {
            return Err(YamlLoaderError::InvalidVariable(found.as_str().to_string()));
        }
    }

    let result = re.replace_all(yaml_content, |caps: &regex::Captures| {
        let default = caps.get(2).map(|m| m.as_str());
        match env::var(&caps[1]) {
            Ok(val) => val,
            Err(_) => default.unwrap_or("").to_string(),
        }
    });

    Ok(result.into_owned())
}

/// 从文件加载 YAML 配置
pub fn load_from_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, YamlLoaderError> {
    let content = fs::read_to_string(path)?;
    load_from_str(&content)
}

/// 从字符串加载 YAML 配置
pub fn load_from_str<T: DeserializeOwned>(yaml_content: &str) -> Result<T, YamlLoaderError> {
    let replaced = replace_vars(yaml_content)?;
    let data = serde_yaml::from_str(&replaced)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_replace_vars_basic() {
        unsafe {
            env::set_var("LINGUIST_TEST_VAR_BASIC", "basic_value");
        }
        let output = replace_vars("key: ${LINGUIST_TEST_VAR_BASIC}").unwrap();
        assert_eq!(output, "key: basic_value");
    }

    #[test]
    fn test_replace_vars_default() {
        let output = replace_vars("key: ${LINGUIST_TEST_MISSING:zh_HK}").unwrap();
        assert_eq!(output, "key: zh_HK");
    }

    #[test]
    fn test_replace_vars_no_default() {
        let output = replace_vars("key: ${LINGUIST_TEST_MISSING_NO_DEFAULT}").unwrap();
        assert_eq!(output, "key: ");
    }

    #[test]
    fn test_replace_vars_invalid() {
        let err = replace_vars("key: ${1BAD}").unwrap_err();
        assert!(matches!(err, YamlLoaderError::InvalidVariable(ref v) if v == "${1BAD}"));

        let err = replace_vars("key: ${bad name}").unwrap_err();
        assert!(matches!(err, YamlLoaderError::InvalidVariable(_)));
    }

    #[test]
    fn test_replace_vars_keeps_literal_dollar_brace() {
        let output = replace_vars("prefix: \"viewer ${literal\"").unwrap();
        assert_eq!(output, "prefix: \"viewer ${literal\"");
    }

    #[test]
    fn test_replace_vars_value_containing_dollar_brace() {
        unsafe {
            env::set_var("LINGUIST_TEST_VAR_DOLLAR", "zh_HK${x");
        }
        let output = replace_vars("locale: ${LINGUIST_TEST_VAR_DOLLAR}").unwrap();
        assert_eq!(output, "locale: zh_HK${x");

        // 变量值不会被再次展开或校验
        unsafe {
            env::set_var("LINGUIST_TEST_VAR_NESTED", "${1BAD}");
        }
        let output = replace_vars("locale: ${LINGUIST_TEST_VAR_NESTED}").unwrap();
        assert_eq!(output, "locale: ${1BAD}");
    }

    #[test]
    fn test_load_from_str() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Config {
            prefix: String,
            locale: String,
        }

        unsafe {
            env::set_var("LINGUIST_TEST_PREFIX", "deepin-image-viewer");
        }
        let yaml = r#"
        prefix: ${LINGUIST_TEST_PREFIX}
        locale: ${LINGUIST_TEST_LOCALE:zh_HK}
        "#;

        let config: Config = load_from_str(yaml).unwrap();
        assert_eq!(config.prefix, "deepin-image-viewer");
        assert_eq!(config.locale, "zh_HK");
    }
}

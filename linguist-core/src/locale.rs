//! 语言标识的规范化与候选文件名

/// 规范化语言标识：`zh_HK.UTF-8`、`zh-HK`、`sr_RS@latin` -> `zh_HK`、`zh_HK`、`sr_RS`
pub fn normalize_locale(raw: &str) -> String {
    let base = raw
        .trim()
        .split(['.', '@'])
        .next()
        .unwrap_or("")
        .replace('-', "_");

    let mut parts = base.split('_').filter(|part| !part.is_empty());
    let Some(lang) = parts.next() else {
        return String::new();
    };

    let mut out = lang.to_ascii_lowercase();
    for part in parts {
        out.push('_');
        // 地区码大写，文字码（如 Hant）保持首字母大写
        if part.len() == 4 {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                out.push_str(&chars.as_str().to_ascii_lowercase());
            }
        } else {
            out.push_str(&part.to_ascii_uppercase());
        }
    }
    out
}

/// 解析偏好语言列表，按优先级从高到低返回
///
/// 同时接受 `LANGUAGE` 风格（`zh_HK:zh_TW:en`）与 `Accept-Language` 风格
/// （`zh-HK,zh;q=0.9,en;q=0.8`）。`C`、`POSIX` 与空项会被忽略。
pub fn preferred_locales(list: &str) -> Vec<String> {
    let mut langs: Vec<(f32, usize, String)> = list
        .split([',', ':'])
        .enumerate()
        .filter_map(|(order, part)| {
            let mut sections = part.split(';');
            let lang = normalize_locale(sections.next()?);
            if lang.is_empty() || lang == "c" || lang == "posix" {
                return None;
            }
            let q_value = sections
                .next()
                .and_then(|q| q.trim().strip_prefix("q="))
                .and_then(|v| v.parse::<f32>().ok())
                .unwrap_or(1.0);
            Some((q_value, order, lang))
        })
        .collect();

    // 按权重降序，权重相同保持原顺序
    langs.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });

    let mut out: Vec<String> = Vec::with_capacity(langs.len());
    for (_, _, lang) in langs {
        if !out.contains(&lang) {
            out.push(lang);
        }
    }
    out
}

/// Qt 翻译器会依次尝试的文件名（不含扩展名）
///
/// `candidate_stems("viewer", "zh_Hant_HK")` -> `viewer_zh_Hant_HK`、`viewer_zh_Hant`、
/// `viewer_zh`、`viewer`
pub fn candidate_stems(prefix: &str, locale: &str) -> Vec<String> {
    let locale = normalize_locale(locale);
    let parts: Vec<&str> = locale.split('_').filter(|part| !part.is_empty()).collect();

    let mut stems: Vec<String> = (1..=parts.len())
        .rev()
        .map(|n| join_stem(prefix, &parts[..n].join("_")))
        .collect();
    if !prefix.is_empty() {
        stems.push(prefix.to_string());
    }
    stems
}

fn join_stem(prefix: &str, locale: &str) -> String {
    if prefix.is_empty() {
        locale.to_string()
    } else {
        format!("{prefix}_{locale}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("zh_HK.UTF-8"), "zh_HK");
        assert_eq!(normalize_locale("zh-hk"), "zh_HK");
        assert_eq!(normalize_locale("sr_RS@latin"), "sr_RS");
        assert_eq!(normalize_locale(" EN "), "en");
        assert_eq!(normalize_locale("zh-hant-tw"), "zh_Hant_TW");
        assert_eq!(normalize_locale(""), "");
    }

    #[test]
    fn test_preferred_locales() {
        assert_eq!(preferred_locales("zh_HK:zh_TW:en"), vec!["zh_HK", "zh_TW", "en"]);
        assert_eq!(
            preferred_locales("fr;q=0.5, zh-HK, en;q=0.8"),
            vec!["zh_HK", "en", "fr"]
        );
        assert_eq!(preferred_locales("C:zh_HK.UTF-8:zh_HK"), vec!["zh_HK"]);
        assert!(preferred_locales("").is_empty());
    }

    #[test]
    fn test_candidate_stems() {
        assert_eq!(
            candidate_stems("deepin-image-viewer", "zh_HK.UTF-8"),
            vec!["deepin-image-viewer_zh_HK", "deepin-image-viewer_zh", "deepin-image-viewer"]
        );
        assert_eq!(candidate_stems("", "zh_HK"), vec!["zh_HK", "zh"]);
        assert_eq!(candidate_stems("app", ""), vec!["app"]);
    }
}

//! 复数规则（numerus forms）
//!
//! 与 Qt 的 numerus 规则表保持一致：根据目录的 `language` 属性决定
//! `<numerusform>` 的数量以及给定数量 `n` 应选用哪一个。

/// 语言对应的复数规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PluralRule {
    /// 只有一种形式（中文、日文、韩文等）
    Single,
    /// `n == 1` 为第一种，其余为第二种
    #[default]
    OneOther,
    /// `n <= 1` 为第一种，其余为第二种
    French,
    /// 俄语、乌克兰语等东斯拉夫规则
    EastSlavic,
    Polish,
    /// 捷克语、斯洛伐克语
    Czech,
}

impl PluralRule {
    /// 根据语言标签（如 `zh_HK`、`pt-BR`）选择规则，未知语言按 `OneOther` 处理
    pub fn for_language(tag: &str) -> Self {
        let tag = tag.replace('-', "_");
        let mut parts = tag.split('_');
        let lang = parts.next().unwrap_or("").to_ascii_lowercase();
        let region = parts.next().unwrap_or("").to_ascii_uppercase();

        match lang.as_str() {
            "zh" | "ja" | "ko" | "vi" | "th" | "id" | "ms" | "lo" | "my" => Self::Single,
            "fr" | "hy" => Self::French,
            "pt" if region == "BR" => Self::French,
            "ru" | "uk" | "be" | "sr" | "hr" | "bs" => Self::EastSlavic,
            "pl" => Self::Polish,
            "cs" | "sk" => Self::Czech,
            _ => Self::OneOther,
        }
    }

    /// 该规则需要的复数形式数量
    pub fn form_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::OneOther | Self::French => 2,
            Self::EastSlavic | Self::Polish | Self::Czech => 3,
        }
    }

    /// 数量 `n` 对应的形式下标（未截断）
    pub fn form_index(self, n: u64) -> usize {
        let mod10 = n % 10;
        let mod100 = n % 100;
        match self {
            Self::Single => 0,
            Self::OneOther => usize::from(n != 1),
            Self::French => usize::from(n > 1),
            Self::EastSlavic => {
                if mod10 == 1 && mod100 != 11 {
                    0
                } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
                    1
                } else {
                    2
                }
            }
            Self::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
        }
    }

    /// 在 `forms` 中选出 `n` 对应的文本；形式不足时取最后一个
    pub fn select<'a>(self, forms: &'a [String], n: u64) -> Option<&'a str> {
        let last = forms.len().checked_sub(1)?;
        forms.get(self.form_index(n).min(last)).map(String::as_str)
    }
}

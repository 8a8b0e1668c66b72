use proc_macro::TokenStream;
use quote::quote;
use syn::{LitStr, parse_macro_input};

/// 在编译期内嵌目录下的全部 `.ts` 文件
///
/// 路径相对于调用方的 `CARGO_MANIFEST_DIR`。每个文件都会在编译期解析一次，
/// 解析失败直接报编译错误；通过后在 `main` 之前按文件名（不含扩展名）注册到
/// `linguist_core::embedded`。
#[proc_macro]
pub fn include_catalogs(input: TokenStream) -> TokenStream {
    let lit = parse_macro_input!(input as LitStr);
    match expand(&lit.value()) {
        Ok(tokens) => tokens.into(),
        Err(message) => syn::Error::new(lit.span(), message).to_compile_error().into(),
    }
}

fn expand(dir: &str) -> Result<proc_macro2::TokenStream, String> {
    let manifest_dir =
        std::env::var("CARGO_MANIFEST_DIR").map_err(|e| format!("CARGO_MANIFEST_DIR: {e}"))?;

    let dir_path = std::path::Path::new(&manifest_dir).join(dir);
    if !dir_path.is_dir() {
        return Err(format!("translations directory not found: {}", dir_path.display()));
    }

    let pattern = format!("{}/*.ts", dir_path.display());
    let paths = glob::glob(&pattern).map_err(|e| format!("invalid glob {pattern}: {e}"))?;

    let mut tracked_files = Vec::new();
    let mut registrations = Vec::new();

    for entry in paths {
        let path = entry.map_err(|e| format!("path error: {e}"))?;
        if path.is_dir() {
            continue;
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| format!("non UTF-8 file name: {}", path.display()))?
            .to_string();
        let abs_path = path
            .canonicalize()
            .map_err(|e| format!("{}: {e}", path.display()))?;
        let abs_path_str = abs_path
            .to_str()
            .ok_or_else(|| format!("non UTF-8 path: {}", abs_path.display()))?
            .to_string();

        // 编译期校验，避免运行时才发现目录损坏
        let bytes = std::fs::read(&abs_path).map_err(|e| format!("{abs_path_str}: {e}"))?;
        linguist_core::Catalog::load(&bytes).map_err(|e| format!("{abs_path_str}: {e}"))?;

        // 强制编译器监视文件（修改 .ts 后会触发重新编译）
        tracked_files.push(quote! { const _: &[u8] = include_bytes!(#abs_path_str); });
        registrations.push(quote! {
            ::linguist_core::embedded::register(#stem, include_str!(#abs_path_str));
        });
    }

    if registrations.is_empty() {
        return Err(format!("no .ts files found in {}", dir_path.display()));
    }

    Ok(quote! {
        #(#tracked_files)*

        #[::linguist_core::ctor::ctor(crate_path = ::linguist_core::ctor)]
        fn __linguist_register_catalogs() {
            #(#registrations)*
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_valid_dir() {
        let tokens = expand("tests/translations").unwrap().to_string();
        assert!(tokens.contains("viewer_zh_HK"));
        assert!(tokens.contains("viewer_en"));
        assert!(tokens.contains("include_str"));
    }

    #[test]
    fn test_expand_errors() {
        let missing = expand("tests/no_such_dir").unwrap_err();
        assert!(missing.contains("not found"));

        // 损坏的目录在编译期就报错
        let broken = expand("tests/broken").unwrap_err();
        assert!(broken.contains("viewer_zh_HK.ts"));
    }
}

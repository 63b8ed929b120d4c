//! Import source to file path matching

/// Decides whether an import specifier refers to a file
pub trait ImportMatcher: Send + Sync {
    fn matches(&self, import_source: &str, file_path: &str) -> bool;
}

const EXTENSIONS: &[&str] = &[".js", ".jsx", ".mjs", ".cjs", ".ts", ".tsx", ".mts", ".cts"];

/// Extension-tolerant path matching for relative and bare specifiers
///
/// `./utils/math` matches `src/utils/math.js`, `utils/math/index.ts` and,
/// as a last resort, any path containing `utils/math`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSuffix;

impl ImportMatcher for PathSuffix {
    fn matches(&self, import_source: &str, file_path: &str) -> bool {
        let import = normalize_import(import_source);
        if import.is_empty() {
            return false;
        }
        let file = strip_extension(file_path.trim_start_matches("./"));

        let suffix_of = |target: &str| {
            file == target
                || file
                    .strip_suffix(target)
                    .is_some_and(|prefix| prefix.ends_with('/'))
        };

        suffix_of(import) || suffix_of(format!("{import}/index").as_str()) || file.contains(import)
    }
}

/// Drop leading `./` and `../` segments and any known extension
fn normalize_import(source: &str) -> &str {
    let mut rest = source.trim();
    loop {
        if let Some(r) = rest.strip_prefix("./") {
            rest = r;
        } else if let Some(r) = rest.strip_prefix("../") {
            rest = r;
        } else {
            break;
        }
    }
    strip_extension(rest.trim_end_matches('/'))
}

fn strip_extension(path: &str) -> &str {
    EXTENSIONS
        .iter()
        .find_map(|ext| path.strip_suffix(ext))
        .unwrap_or(path)
}

//! Path and filter utilities

use std::path::{Component, Path, PathBuf};

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Resolve `dir` against `cwd` into an absolute, lexically normalized path.
///
/// An absolute `dir` wins over `cwd`. A relative `cwd` is anchored at `fallback`
/// (normally the working directory captured when the options were built).
/// `.` and `..` are folded without touching the filesystem, so a missing
/// directory still resolves and only fails later at the listing call.
pub fn resolve_root(cwd: &Path, dir: &Path, fallback: &Path) -> PathBuf {
    let base = if cwd.is_absolute() {
        cwd.to_path_buf()
    } else {
        fallback.join(cwd)
    };
    normalize(&base.join(dir))
}

/// Lexical normalization: drop `.`, pop on `..`, never climb above the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::Prefix(_) | Component::RootDir => out.push(comp.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.components().next_back();
                let at_name = matches!(last, Some(Component::Normal(_)));
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                if at_name {
                    out.pop();
                } else if !at_root {
                    out.push("..");
                }
            }
            Component::Normal(name) => out.push(name),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Dotfile check on an entry name (`.git`, `.editorconfig`).
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Simple glob pattern matching (supports * and ?)
///
/// Bounded by `pattern.len() * text.len()`: only the most recent `*` is ever retried.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    // Remove leading '!' if present (negation handled by caller)
    let pattern = pattern.strip_prefix('!').unwrap_or(pattern);

    let pat: Vec<char> = pattern.chars().collect();
    let txt: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    // (index of the last '*', text position it currently extends to)
    let mut star: Option<(usize, usize)> = None;

    while ti < txt.len() {
        match pat.get(pi) {
            Some('*') => {
                star = Some((pi, ti));
                pi += 1;
            }
            Some(&p) if p == '?' || p == txt[ti] => {
                pi += 1;
                ti += 1;
            }
            _ => match star {
                Some((star_pi, star_ti)) => {
                    pi = star_pi + 1;
                    ti = star_ti + 1;
                    star = Some((star_pi, star_ti + 1));
                }
                None => return false,
            },
        }
    }

    pat[pi..].iter().all(|&c| c == '*')
}

/// Keep the names matching any of `patterns`, in their original order.
/// A pattern with a leading `!` removes matches instead.
pub fn filter_by_globs(names: Vec<String>, patterns: &[String]) -> Vec<String> {
    let (negated, positive): (Vec<&String>, Vec<&String>) =
        patterns.iter().partition(|p| p.starts_with('!'));
    names
        .into_iter()
        .filter(|name| positive.is_empty() || positive.iter().any(|p| glob_match(p, name)))
        .filter(|name| !negated.iter().any(|p| glob_match(p, name)))
        .collect()
}

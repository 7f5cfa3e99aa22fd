use clap::Parser;
use dirstream::engine::{
    Cli, RunSettings, build_readdir, filter_by_globs, glob_match, normalize, path_relative_to,
    resolve_root,
};
use dirstream::error::ERROR_TAG;
use dirstream::utils::{apply_file_to_settings, parse_dirstream_toml};
use dirstream::{DirInput, FileDefaults, FileDescriptor, PluginSpec, ReaddirError, StaticLister};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// --- path_relative_to ---

#[test]
fn test_path_relative_under_base() {
    let base = PathBuf::from("/foo/bar");
    let path = PathBuf::from("/foo/bar/baz/qux");
    assert_eq!(
        path_relative_to(&path, &base),
        Some(PathBuf::from("baz/qux"))
    );
}

#[test]
fn test_path_relative_not_under_base() {
    let base = PathBuf::from("/foo/bar");
    let path = PathBuf::from("/other/qux");
    assert_eq!(path_relative_to(&path, &base), None);
}

// --- resolve_root / normalize ---

#[test]
fn test_resolve_relative_dir_against_cwd() {
    let root = resolve_root(Path::new("/work"), Path::new("./src"), Path::new("/"));
    assert_eq!(root, PathBuf::from("/work/src"));
}

#[test]
fn test_resolve_absolute_dir_ignores_cwd() {
    let root = resolve_root(Path::new("/work"), Path::new("/etc/conf.d"), Path::new("/"));
    assert_eq!(root, PathBuf::from("/etc/conf.d"));
}

#[test]
fn test_resolve_folds_parent_components() {
    let root = resolve_root(Path::new("/work/a"), Path::new("../b/./c/.."), Path::new("/"));
    assert_eq!(root, PathBuf::from("/work/b"));
}

#[test]
fn test_resolve_relative_cwd_uses_fallback() {
    let root = resolve_root(Path::new("proj"), Path::new("src"), Path::new("/home/me"));
    assert_eq!(root, PathBuf::from("/home/me/proj/src"));
}

#[test]
fn test_resolve_empty_dir_is_cwd() {
    let root = resolve_root(Path::new("/work"), Path::new(""), Path::new("/"));
    assert_eq!(root, PathBuf::from("/work"));
}

#[test]
fn test_normalize_never_climbs_above_root() {
    assert_eq!(normalize(Path::new("/../..")), PathBuf::from("/"));
    assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
}

// --- glob_match / filter_by_globs ---

#[test]
fn test_glob_match_literal() {
    assert!(glob_match("index.js", "index.js"));
    assert!(!glob_match("index.js", "index.jsx"));
}

#[test]
fn test_glob_match_star() {
    assert!(glob_match("*.log", "foo.log"));
    assert!(glob_match("*.log", ".log"));
    assert!(!glob_match("*.log", "foo.log.txt"));
    assert!(glob_match("node_*", "node_modules"));
    assert!(glob_match("a*b*c", "axxbyyc"));
    assert!(!glob_match("a*b*c", "axxbyy"));
}

#[test]
fn test_glob_match_question_mark() {
    assert!(glob_match("?.rs", "a.rs"));
    assert!(!glob_match("?.rs", "ab.rs"));
}

#[test]
fn test_glob_match_edges() {
    assert!(glob_match("*", ""));
    assert!(glob_match("**", "abc"));
    assert!(!glob_match("?", ""));
    assert!(glob_match("a*", "a"));
    assert!(glob_match("*a*b", "xaxxab"));
    assert!(!glob_match("*a*b", "xaxxa"));
    assert!(glob_match("!*.md", "readme.md"));
}

#[test]
fn test_glob_match_many_stars_is_fast() {
    let start = Instant::now();
    let text = "a".repeat(40);
    assert!(!glob_match("*a*a*a*a*a*a*b", &text));
    assert!(glob_match("*a*a*a*a*a*a*a", &text));
    let names = vec!["a".repeat(200), format!("{}b", "a".repeat(200))];
    let kept = filter_by_globs(names, &["*a*a*a*a*a*a*a*a*b".into()]);
    assert_eq!(kept.len(), 1);
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_filter_by_globs_keeps_order_and_negation() {
    let names: Vec<String> = ["c.js", "a.md", "b.js", "x.min.js"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let kept = filter_by_globs(names.clone(), &["*.js".into(), "!*.min.js".into()]);
    assert_eq!(kept, vec!["c.js", "b.js"]);

    let only_negated = filter_by_globs(names, &["!*.js".into()]);
    assert_eq!(only_negated, vec!["a.md"]);
}

// --- FileDescriptor ---

fn record(path: &str) -> FileDescriptor {
    FileDescriptor::new(
        &FileDefaults::default(),
        Path::new("/work"),
        Path::new("/work/src"),
        PathBuf::from(path),
    )
}

#[test]
fn test_descriptor_projections() {
    let file = record("/work/src/index.test.js");
    assert_eq!(file.basename(), "index.test.js");
    assert_eq!(file.extname(), ".js");
    assert_eq!(file.stem(), "index.test");
    assert_eq!(file.dirname(), PathBuf::from("/work/src"));
    assert_eq!(file.relative(), PathBuf::from("index.test.js"));
    assert!(file.is_emitted());
}

#[test]
fn test_descriptor_dotfiles_have_no_extension() {
    assert_eq!(record("/work/src/.editorconfig").extname(), "");
    assert_eq!(record("/work/src/.editorconfig").stem(), ".editorconfig");
    assert_eq!(record("/work/src/LICENSE").extname(), "");
    assert_eq!(record("/work/src/trailing.").extname(), ".");
}

#[test]
fn test_descriptor_set_path_tracks_history() {
    let mut file = record("/work/src/a.ts");
    file.set_path("/work/src/a.ts");
    assert_eq!(file.history().len(), 1);
    file.set_path("/work/src/a.js");
    assert_eq!(file.extname(), ".js");
    assert_eq!(
        file.history(),
        &[PathBuf::from("/work/src/a.ts"), PathBuf::from("/work/src/a.js")]
    );
}

#[test]
fn test_descriptor_emit_rule() {
    let mut file = record("/work/src/a");
    file.exclude = true;
    assert!(!file.is_emitted());
    file.exclude = false;
    file.include = false;
    assert!(!file.is_emitted());
}

#[test]
fn test_descriptor_serializes_fields() {
    let mut file = record("/work/src/a.js");
    file.set("tag", "x");
    let v = serde_json::to_value(&file).unwrap();
    assert_eq!(v["path"], json!("/work/src/a.js"));
    assert_eq!(v["base"], json!("/work/src"));
    assert_eq!(v["include"], json!(true));
    assert_eq!(v["options"]["tag"], json!("x"));
}

// --- DirInput ---

#[test]
fn test_dir_input_conversions() {
    assert_eq!(DirInput::from("src").into_path().unwrap(), PathBuf::from("src"));
    assert_eq!(
        DirInput::from(b"src".to_vec()).into_path().unwrap(),
        PathBuf::from("src")
    );
    assert_eq!(DirInput::from(json!("lib")), DirInput::Str("lib".into()));
    assert_eq!(DirInput::from(json!([115, 114, 99])), DirInput::Bytes(b"src".to_vec()));
    assert_eq!(
        DirInput::from(json!([1, 300])),
        DirInput::Unsupported { kind: "array" }
    );
    assert_eq!(
        DirInput::from(json!(1.5)),
        DirInput::Unsupported { kind: "number" }
    );
}

#[test]
fn test_dir_input_unsupported_is_invalid_argument() {
    let err = DirInput::from(json!(123)).into_path().unwrap_err();
    assert!(matches!(err, ReaddirError::InvalidArgument(_)));
    assert!(err.to_string().contains("got number"));
}

#[test]
fn test_every_error_carries_the_tag() {
    let errors = [
        ReaddirError::invalid("bad"),
        ReaddirError::ListingFailed {
            root: PathBuf::from("/x"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        },
        ReaddirError::EmptyDirectory(PathBuf::from("/x")),
        ReaddirError::ListingInProgress,
        ReaddirError::Cancelled(PathBuf::from("/x")),
        ReaddirError::Disconnected,
        ReaddirError::Stage("nope".into()),
    ];
    for err in errors {
        let msg = err.to_string();
        assert!(msg.starts_with(&format!("{ERROR_TAG} ")), "{msg}");
    }
    assert_eq!(
        ReaddirError::EmptyDirectory(PathBuf::from("/x")).to_string(),
        "[dirstream] .list: directory is empty: /x"
    );
}

// --- PluginSpec ---

#[test]
fn test_plugin_spec_parse() {
    assert_eq!("no-hidden".parse::<PluginSpec>().unwrap(), PluginSpec::NoHidden);
    assert_eq!(
        "ext: rs, .toml".parse::<PluginSpec>().unwrap(),
        PluginSpec::Ext(vec![".rs".into(), ".toml".into()])
    );
    assert_eq!(
        "tag:kind=src".parse::<PluginSpec>().unwrap(),
        PluginSpec::Tag("kind".into(), "src".into())
    );
    assert_eq!(
        "exclude:*.log".parse::<PluginSpec>().unwrap().to_string(),
        "exclude:*.log"
    );
}

#[test]
fn test_plugin_spec_unknown_is_invalid_argument() {
    let err = "glob:*".parse::<PluginSpec>().unwrap_err();
    assert!(matches!(err, ReaddirError::InvalidArgument(_)));
    assert!(err.to_string().contains("unknown plugin `glob`"));
}

// --- config file and CLI ---

const SAMPLE_TOML: &str = r#"
[settings]
cwd = "/srv"
plugins = ["no-hidden"]
exclude = ["*.log"]
match = ["*.rs"]
json = true
channel_cap = 8

[file]
origin = "config"
"#;

#[test]
fn test_config_file_applies_to_settings() {
    let file = parse_dirstream_toml(SAMPLE_TOML).unwrap();
    let mut settings = RunSettings::default();
    apply_file_to_settings(&file, &mut settings);
    assert_eq!(settings.cwd, Some(PathBuf::from("/srv")));
    assert_eq!(settings.plugins, vec!["no-hidden"]);
    assert_eq!(settings.exclude, vec!["*.log"]);
    assert_eq!(settings.matches, vec!["*.rs"]);
    assert!(settings.json);
    assert!(!settings.verbose);
    assert_eq!(settings.channel_cap, Some(8));
    assert_eq!(settings.file_options.get("origin"), Some(&json!("config")));
}

#[test]
fn test_config_file_rejects_bad_types() {
    assert!(parse_dirstream_toml("[settings]\njson = \"yes\"\n").is_err());
}

#[test]
fn test_cli_flags_override_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join(".dirstream.toml"),
        "[settings]\njson = true\nplugins = [\"no-hidden\"]\n",
    )
    .unwrap();
    let dir = tmp.path().to_str().unwrap();
    let cli = Cli::try_parse_from(["dirstream", dir, "--json", "false", "-p", "ext:.rs"]).unwrap();
    let settings = RunSettings::from_cli(&cli);
    assert!(!settings.json);
    assert_eq!(settings.plugins, vec!["no-hidden", "ext:.rs"]);
}

#[test]
fn test_cli_parse_defaults() {
    let cli = Cli::try_parse_from(["dirstream"]).unwrap();
    assert_eq!(cli.dir, PathBuf::from("."));
    assert!(cli.plugin.is_empty());
    assert_eq!(cli.json, None);
}

#[test]
fn test_build_readdir_from_settings() {
    let settings = RunSettings {
        cwd: Some(PathBuf::from("/virtual")),
        plugins: vec!["tag:kind=x".into()],
        exclude: vec!["b*".into()],
        matches: vec!["*.rs".into()],
        ..Default::default()
    };
    let mut readdir = build_readdir(&settings)
        .unwrap()
        .with_lister(StaticLister::new(["a.rs", "b.rs", "c.md"]));
    let files = readdir.list(".").unwrap().collect_files().unwrap();
    let names: Vec<String> = files.iter().map(|f| f.basename()).collect();
    assert_eq!(names, vec!["a.rs"]);
    assert_eq!(files[0].get("kind"), Some(&json!("x")));
}

#[test]
fn test_build_readdir_bad_plugin_fails() {
    let settings = RunSettings {
        plugins: vec!["bogus".into()],
        ..Default::default()
    };
    let err = build_readdir(&settings).err().unwrap();
    assert!(format!("{err:#}").contains("unknown plugin `bogus`"));
}

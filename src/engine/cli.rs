//! CLI run handler: merge `.dirstream.toml` with flags, build the pipeline, print the stream.

use anyhow::{Context, Result};
use log::debug;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::PathBuf;

use crate::engine::arg_parser::Cli;
use crate::pipeline::WalkdirLister;
use crate::plugin::{GlobExt, record_hook};
use crate::utils::{
    Colors, PackagePaths, apply_file_to_settings, load_dirstream_toml, setup_logging,
};
use crate::{FileDefaults, Readdir, ReaddirOpts};

/// Effective CLI settings: `.dirstream.toml` first, then flags on top.
#[derive(Clone, Debug, Default)]
pub struct RunSettings {
    pub dir: PathBuf,
    pub cwd: Option<PathBuf>,
    pub plugins: Vec<String>,
    pub exclude: Vec<String>,
    pub matches: Vec<String>,
    pub json: bool,
    pub verbose: bool,
    pub follow_links: bool,
    pub channel_cap: Option<usize>,
    /// Extra fields for every record, from the `[file]` table.
    pub file_options: Map<String, Value>,
}

impl RunSettings {
    pub fn from_cli(cli: &Cli) -> Self {
        let mut settings = RunSettings {
            dir: cli.dir.clone(),
            ..Default::default()
        };
        let config_dir = match &cli.cwd {
            Some(cwd) => cwd.join(&cli.dir),
            None => cli.dir.clone(),
        };
        if let Some(file) = load_dirstream_toml(&config_dir) {
            apply_file_to_settings(&file, &mut settings);
        }
        settings.apply_cli(cli);
        settings
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if cli.cwd.is_some() {
            self.cwd = cli.cwd.clone();
        }
        // List flags extend what the file configured.
        self.plugins.extend(cli.plugin.iter().cloned());
        self.exclude.extend(cli.exclude.iter().cloned());
        self.matches.extend(cli.matches.iter().cloned());
        if let Some(v) = cli.json {
            self.json = v;
        }
        if let Some(v) = cli.verbose {
            self.verbose = v;
        }
        if let Some(v) = cli.follow_links {
            self.follow_links = v;
        }
        if cli.channel_cap.is_some() {
            self.channel_cap = cli.channel_cap;
        }
    }
}

/// Build the pipeline for `settings`: named plugins in order, then exclude globs, then the match filter.
pub fn build_readdir(settings: &RunSettings) -> Result<Readdir> {
    let mut opts = ReaddirOpts {
        file: FileDefaults {
            options: settings.file_options.clone(),
            ..Default::default()
        },
        ..Default::default()
    };
    if let Some(cwd) = &settings.cwd {
        opts.cwd = cwd.clone();
    }
    if let Some(cap) = settings.channel_cap {
        opts.channel_cap = cap;
    }
    let mut readdir = Readdir::new(opts).with_lister(WalkdirLister {
        follow_links: settings.follow_links,
    });

    for spec in &settings.plugins {
        readdir
            .register_spec(spec)
            .with_context(|| format!("register plugin `{spec}`"))?;
    }
    for pattern in &settings.exclude {
        readdir
            .register_spec(&format!("exclude:{pattern}"))
            .with_context(|| format!("exclude pattern `{pattern}`"))?;
    }
    if !settings.matches.is_empty() {
        readdir.src(&settings.matches);
    }
    if settings.verbose {
        readdir.register(|_| {
            record_hook(|file| {
                if !file.is_emitted() {
                    debug!("skip {}", file.basename());
                }
            })
        });
    }
    Ok(readdir)
}

/// List the directory and print each record. Fails on the stream's terminal error.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let settings = RunSettings::from_cli(cli);
    setup_logging(settings.verbose);
    debug!("{} settings: {:#?}", PackagePaths::get().pkg_name(), settings);

    let mut readdir = build_readdir(&settings)?;
    let cancel = readdir.cancel_token();
    ctrlc::set_handler(move || cancel.cancel()).context("set Ctrl+C handler")?;

    let stream = readdir.list(settings.dir.as_path())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut count = 0_usize;
    for item in stream {
        let file = item?;
        if settings.json {
            writeln!(out, "{}", serde_json::to_string(&file)?)?;
        } else {
            let base = file.base.display().to_string();
            let relative = file.relative().display().to_string();
            writeln!(out, "{}", Colors::entry(&base, &relative))?;
        }
        count += 1;
    }
    out.flush()?;
    if let Some(root) = readdir.root_dir() {
        debug!("{} entries from {}", count, root.display());
    }
    Ok(())
}

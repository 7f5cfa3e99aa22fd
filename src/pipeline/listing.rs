//! Directory-listing collaborator: one call, one level, names in the order the OS returns them.

use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// The single I/O operation of a listing. Implementations must not sort or recurse.
pub trait DirLister: Send + Sync {
    fn read_names(&self, dir: &Path) -> io::Result<Vec<String>>;
}

/// Default lister: a depth-1 walkdir pass over `dir`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WalkdirLister {
    pub follow_links: bool,
}

impl DirLister for WalkdirLister {
    fn read_names(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        let walk = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links);
        for entry in walk {
            let entry = entry.map_err(io::Error::from)?;
            // Records are keyed by name; a lossy name would point at a file that does not exist.
            let name = entry.file_name().to_str().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "entry name is not valid UTF-8: {}",
                        entry.path().display()
                    ),
                )
            })?;
            names.push(name.to_string());
        }
        // walkdir yields a plain file as its own depth-0 entry; report it the way read_dir would.
        if names.is_empty() && !dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("not a directory: {}", dir.display()),
            ));
        }
        Ok(names)
    }
}

/// Fixed listing, returned for any directory. Useful where OS ordering would make output unstable.
#[derive(Clone, Debug, Default)]
pub struct StaticLister {
    names: Vec<String>,
}

impl StaticLister {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl DirLister for StaticLister {
    fn read_names(&self, _dir: &Path) -> io::Result<Vec<String>> {
        Ok(self.names.clone())
    }
}

//! Host save mechanism for downloaded payloads.
//!
//! A download is first staged as a transient local resource, then the host
//! saves it, then the staged resource is released. [`Staged`] owns the
//! handle between acquire and release and releases it when dropped, so a
//! failed save still releases exactly once.

use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;

use crate::download::Download;
use crate::{Result, SeekError};

/// Saved file name used when the backend path yields no usable name.
pub const FALLBACK_FILE_NAME: &str = "download";

/// Something that can store a downloaded payload for the user.
pub trait SaveHost {
    /// Transient resource holding a staged payload.
    type Handle;
    /// What a completed save produces (e.g. the saved file's path).
    type Saved;

    /// Stage the payload as a locally addressable resource.
    fn acquire(&mut self, download: &Download) -> Result<Self::Handle>;

    /// Save a staged payload.
    fn save(&mut self, download: &Download, handle: &Self::Handle) -> Result<Self::Saved>;

    /// Free a staged resource. Called once per acquired handle.
    fn release(&mut self, handle: Self::Handle);
}

/// A staged payload, released on drop.
pub struct Staged<'a, H: SaveHost> {
    host: &'a mut H,
    handle: Option<H::Handle>,
}

impl<'a, H: SaveHost> Staged<'a, H> {
    pub fn acquire(host: &'a mut H, download: &Download) -> Result<Self> {
        let handle = host.acquire(download)?;
        Ok(Self {
            host,
            handle: Some(handle),
        })
    }

    pub fn save(&mut self, download: &Download) -> Result<H::Saved> {
        match &self.handle {
            Some(handle) => self.host.save(download, handle),
            None => Err(SeekError::InvalidOperation(
                "staged download already released".to_string(),
            )),
        }
    }
}

impl<H: SaveHost> Drop for Staged<'_, H> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.host.release(handle);
        }
    }
}

/// Stage, save, release.
pub fn save_with<H: SaveHost>(host: &mut H, download: &Download) -> Result<H::Saved> {
    let mut staged = Staged::acquire(host, download)?;
    staged.save(download)
}

/// Saves downloads into a directory on disk, staging them in temp files.
#[derive(Debug, Clone)]
pub struct DirectorySaveHost {
    dest_dir: PathBuf,
}

impl DirectorySaveHost {
    pub fn new(dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            dest_dir: dest_dir.into(),
        }
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }
}

impl SaveHost for DirectorySaveHost {
    type Handle = NamedTempFile;
    type Saved = PathBuf;

    fn acquire(&mut self, download: &Download) -> Result<NamedTempFile> {
        use std::io::Write;

        let mut staged = tempfile::Builder::new().prefix("seek-").tempfile()?;
        staged.write_all(&download.bytes)?;
        staged.flush()?;
        tracing::debug!("Staged {} bytes at {:?}", download.bytes.len(), staged.path());
        Ok(staged)
    }

    fn save(&mut self, download: &Download, handle: &NamedTempFile) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dest_dir)?;
        let name = safe_file_name(&download.name);
        let dest = unique_destination(&self.dest_dir, &name);
        if dest.parent() != Some(self.dest_dir.as_path()) {
            return Err(SeekError::InvalidOperation(format!(
                "refusing to save {:?} outside {:?}",
                download.name, self.dest_dir
            )));
        }
        std::fs::copy(handle.path(), &dest)?;
        tracing::info!("Saved {} to {:?}", download.path, dest);
        Ok(dest)
    }

    fn release(&mut self, handle: NamedTempFile) {
        if let Err(e) = handle.close() {
            tracing::warn!("Failed to remove staged download: {}", e);
        }
    }
}

/// A single plain file name taken from a backend path.
///
/// Trailing separators are ignored and only the last segment is kept.
/// Segments that are empty, `.`, `..` or carry a drive prefix become
/// [`FALLBACK_FILE_NAME`].
pub fn safe_file_name(path: &str) -> String {
    let segment = path
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let mut components = Path::new(segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if !segment.contains(':') => {
            name.to_string_lossy().into_owned()
        }
        _ => FALLBACK_FILE_NAME.to_string(),
    }
}

/// `dir/name`, or `dir/stem (n).ext` if that already exists.
fn unique_destination(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());

    (1..)
        .map(|n| match &ext {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

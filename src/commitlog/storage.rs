use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// DurableFile is the single-file storage primitive the durable log is built on.
///
/// Implementations must make `atomic_append()` all-or-nothing and durable before returning.
/// `write_all()` replaces the whole file and is NOT crash atomic: a crash part way through a rewrite
/// can leave a corrupt file behind, which recovery will refuse to load.
pub(crate) trait DurableFile: Send + 'static {
    /// Read the entire file. A file that does not exist yet reads as empty.
    fn read_all(&self) -> io::Result<Vec<u8>>;

    fn atomic_append(&mut self, data: &[u8]) -> io::Result<()>;

    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;
}

/// DiskFile is a `DurableFile` backed by one file on the local filesystem.
pub(crate) struct DiskFile {
    path: PathBuf,
    // Opened with O_APPEND, so writes land at the end even after a rewrite truncates the file.
    append_handle: File,
}

impl DiskFile {
    pub(crate) fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let append_handle = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(DiskFile { path, append_handle })
    }
}

impl DurableFile for DiskFile {
    fn read_all(&self) -> io::Result<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn atomic_append(&mut self, data: &[u8]) -> io::Result<()> {
        self.append_handle.write_all(data)?;
        self.append_handle.sync_data()
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let mut file = File::create(&self.path)?;
        file.write_all(data)?;
        file.sync_all()
    }
}

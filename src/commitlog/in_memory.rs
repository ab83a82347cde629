use crate::commitlog::DurableFile;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

// Models a file on a disk that survives a process crash. Cloning the handle yields the same
// underlying "disk", so a test can drop a replica and recover a new one from the clone.
#[derive(Clone, Default)]
pub(crate) struct InMemoryFile {
    data: Arc<Mutex<Vec<u8>>>,
}

impl InMemoryFile {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Vec<u8>>> {
        self.data
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "in-memory file lock poisoned"))
    }
}

impl DurableFile for InMemoryFile {
    fn read_all(&self) -> io::Result<Vec<u8>> {
        Ok(self.lock()?.clone())
    }

    fn atomic_append(&mut self, data: &[u8]) -> io::Result<()> {
        self.lock()?.extend_from_slice(data);
        Ok(())
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let mut contents = self.lock()?;
        contents.clear();
        contents.extend_from_slice(data);
        Ok(())
    }
}

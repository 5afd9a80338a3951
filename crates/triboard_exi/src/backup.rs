use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::{BaseboardError, Result};

/// The baseboard's non-volatile memory: a flat blob addressed by a 16-bit
/// offset.
///
/// The store has a single cursor. `seek` positions it; reads and writes then
/// advance it one byte at a time. Reading at the end of the blob yields
/// nothing and leaves the cursor where it is.
pub struct BackupStore<S: Read + Write + Seek = File> {
    storage: S,
}

impl BackupStore<File> {
    /// Open the store at `path`, creating an empty one if it does not exist.
    /// Existing contents are kept.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|source| BaseboardError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("backup store opened at {}", path.display());
        Ok(Self::from_storage(file))
    }
}

impl<S: Read + Write + Seek> BackupStore<S> {
    pub fn from_storage(storage: S) -> Self {
        Self { storage }
    }

    pub fn seek(&mut self, offset: u16) -> Result<()> {
        self.storage.seek(SeekFrom::Start(u64::from(offset)))?;
        Ok(())
    }

    /// Read the byte under the cursor and step past it. At the end of the
    /// blob there is nothing to read: `None`, and the cursor stays put.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        let cursor = self.storage.stream_position()?;
        let mut byte = [0u8; 1];
        match self.storage.read_exact(&mut byte) {
            Ok(()) => Ok(Some(byte[0])),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                self.storage.seek(SeekFrom::Start(cursor))?;
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.storage.write_all(&[byte])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.storage.flush()?;
        Ok(())
    }

    /// Current cursor, as an absolute byte offset.
    pub fn cursor(&mut self) -> Result<u64> {
        Ok(self.storage.stream_position()?)
    }

    pub fn set_cursor(&mut self, cursor: u64) -> Result<()> {
        self.storage.seek(SeekFrom::Start(cursor))?;
        Ok(())
    }

    pub fn get_ref(&self) -> &S {
        &self.storage
    }

    /// Flush and release the underlying storage.
    pub fn close(mut self) -> Result<S> {
        self.storage.flush()?;
        Ok(self.storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn store(bytes: &[u8]) -> BackupStore<Cursor<Vec<u8>>> {
        BackupStore::from_storage(Cursor::new(bytes.to_vec()))
    }

    #[test]
    fn reads_advance_the_cursor() {
        let mut s = store(&[0x10, 0x20, 0x30]);
        s.seek(1).unwrap();
        assert_eq!(s.read_byte().unwrap(), Some(0x20));
        assert_eq!(s.read_byte().unwrap(), Some(0x30));
        assert_eq!(s.cursor().unwrap(), 3);
    }

    #[test]
    fn reads_past_end_yield_nothing_and_keep_the_cursor() {
        let mut s = store(&[0xAA]);
        s.seek(0).unwrap();
        assert_eq!(s.read_byte().unwrap(), Some(0xAA));
        assert_eq!(s.read_byte().unwrap(), None);
        assert_eq!(s.cursor().unwrap(), 1);

        // Also when the cursor was seeked beyond the end.
        s.seek(5).unwrap();
        assert_eq!(s.read_byte().unwrap(), None);
        assert_eq!(s.cursor().unwrap(), 5);
    }

    #[test]
    fn writes_extend_the_blob() {
        let mut s = store(&[]);
        s.seek(4).unwrap();
        s.write_byte(0x5A).unwrap();
        s.write_byte(0x5B).unwrap();
        s.flush().unwrap();
        assert_eq!(s.get_ref().get_ref(), &vec![0, 0, 0, 0, 0x5A, 0x5B]);
    }

    #[test]
    fn file_store_keeps_contents_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.bin");

        let mut s = BackupStore::open(&path).unwrap();
        s.seek(0x0102).unwrap();
        s.write_byte(0xC3).unwrap();
        s.close().unwrap();

        let mut s = BackupStore::open(&path).unwrap();
        s.seek(0x0102).unwrap();
        assert_eq!(s.read_byte().unwrap(), Some(0xC3));
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0x0103);
    }

    #[test]
    fn open_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("store.bin");
        match BackupStore::open(&path) {
            Err(BaseboardError::Open { path: reported, .. }) => assert_eq!(reported, path),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("opened a store in a missing directory"),
        }
    }
}

// Bank Account Manager - Record Store
// Random-access access to the 100-slot credit.dat file

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::entities::account::SLOT_COUNT;
use crate::error::{BankError, Result};
use crate::record::{Record, RECORD_SIZE};

/// The account table on disk.
///
/// Slot `i` holds account `i + 1`. The file may be shorter than
/// [`SLOT_COUNT`] records; missing slots read as blank and are created on
/// first write.
#[derive(Debug)]
pub struct CreditFile {
    path: PathBuf,
    file: File,
}

impl CreditFile {
    /// Open an existing data file for reading and writing
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => BankError::DataFileMissing(path.clone()),
                _ => BankError::Io(e),
            })?;

        debug!("Opened data file {}", path.display());
        Ok(CreditFile { path, file })
    }

    /// Create (or truncate) a data file holding only blank records
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        let blank = Record::blank().encode();
        for _ in 0..SLOT_COUNT {
            file.write_all(&blank)?;
        }
        file.flush()?;

        info!("Created data file {} with {} blank records", path.display(), SLOT_COUNT);
        Ok(CreditFile { path, file })
    }

    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        match CreditFile::open(path.as_ref()) {
            Err(BankError::DataFileMissing(_)) => CreditFile::create(path),
            other => other,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read one slot; a slot past the end of the file is blank
    pub fn read_slot(&mut self, slot: usize) -> Result<Record> {
        check_slot(slot)?;
        self.file.seek(SeekFrom::Start(offset(slot)))?;

        let mut buf = [0u8; RECORD_SIZE];
        match self.file.read_exact(&mut buf) {
            Ok(()) => Ok(Record::decode(&buf)),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(Record::blank()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn write_slot(&mut self, slot: usize, record: &Record) -> Result<()> {
        check_slot(slot)?;
        self.file.seek(SeekFrom::Start(offset(slot)))?;
        self.file.write_all(&record.encode())?;
        self.file.flush()?;
        Ok(())
    }

    pub fn clear_slot(&mut self, slot: usize) -> Result<()> {
        self.write_slot(slot, &Record::blank())
    }

    /// Every complete record in slot order, stopping at end of file
    pub fn scan(&mut self) -> Result<Vec<Record>> {
        self.file.seek(SeekFrom::Start(0))?;

        let mut records = Vec::with_capacity(SLOT_COUNT);
        let mut buf = [0u8; RECORD_SIZE];
        for _ in 0..SLOT_COUNT {
            match self.file.read_exact(&mut buf) {
                Ok(()) => records.push(Record::decode(&buf)),
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(records)
    }

    /// Number of complete records currently on disk
    pub fn slots_on_disk(&self) -> Result<usize> {
        let len = self.file.metadata()?.len() as usize;
        Ok((len / RECORD_SIZE).min(SLOT_COUNT))
    }
}

fn offset(slot: usize) -> u64 {
    (slot * RECORD_SIZE) as u64
}

fn check_slot(slot: usize) -> Result<()> {
    if slot >= SLOT_COUNT {
        return Err(BankError::InvalidAccountNumber(slot as i64 + 1));
    }
    Ok(())
}

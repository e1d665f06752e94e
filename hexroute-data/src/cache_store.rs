//! CSV-backed [`CacheStore`].
//!
//! The file layout is a header row `args_key,result` followed by one row per
//! record, written with CRLF terminators and quoting only where needed.
//! Existing cache files in that layout load unchanged.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

use camino::{Utf8Path, Utf8PathBuf};
use csv::{ErrorKind, ReaderBuilder, Terminator, WriterBuilder};
use hexroute_core::{CacheRecord, CacheStore, CacheStoreError, StoredRow};
use log::{info, warn};

/// Header row written to new cache files.
pub const CACHE_HEADER: [&str; 2] = ["args_key", "result"];

/// Append-only cache file.
///
/// The first row of the file is always treated as the header. Each append
/// is flushed before returning.
///
/// # Examples
///
/// ```no_run
/// use hexroute_core::PersistentCache;
/// use hexroute_data::CsvCacheStore;
///
/// let store = CsvCacheStore::open("travel_durations_cache.csv")?;
/// let cache = PersistentCache::initialize(store)?;
/// println!("{} cached entries", cache.len());
/// # Ok::<(), hexroute_core::CacheStoreError>(())
/// ```
#[derive(Debug)]
pub struct CsvCacheStore {
    path: Utf8PathBuf,
    file: File,
}

impl CsvCacheStore {
    /// Open the cache file at `target`, creating it with a header row when it
    /// is missing or empty.
    ///
    /// A file whose last row lacks a terminator (for example after a crash
    /// mid-write) is terminated first so the next append starts a new row.
    ///
    /// # Errors
    ///
    /// Returns [`CacheStoreError::Open`] when the file cannot be opened,
    /// created or prepared.
    pub fn open(target: impl Into<Utf8PathBuf>) -> Result<Self, CacheStoreError> {
        let path: Utf8PathBuf = target.into();
        let location = path.to_string();
        let open_error = |source: io::Error| CacheStoreError::Open {
            location: location.clone(),
            source,
        };

        let mut file = hexroute_fs::open_append(&path)
            .map_err(open_error)?
            .into_std();
        let len = file.metadata().map_err(open_error)?.len();
        if len == 0 {
            write_row(&file, &CACHE_HEADER).map_err(|err| open_error(io::Error::other(err)))?;
            info!("created cache store at {path}");
        } else if !ends_with_newline(&mut file).map_err(open_error)? {
            warn!("cache store at {path} ends mid-row; terminating it before appending");
            file.write_all(b"\r\n").map_err(open_error)?;
        }
        Ok(Self { path, file })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

fn ends_with_newline(file: &mut File) -> Result<bool, io::Error> {
    let mut last = [0_u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last == *b"\n")
}

fn write_row(file: &File, fields: &[&str]) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(file);
    writer.write_record(fields)?;
    writer.flush()?;
    Ok(())
}

impl CacheStore for CsvCacheStore {
    fn load(&mut self) -> Result<Vec<StoredRow>, CacheStoreError> {
        self.file
            .seek(SeekFrom::Start(0))
            .map_err(|err| CacheStoreError::Read {
                location: self.location(),
                message: err.to_string(),
            })?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(&self.file);

        let mut rows = Vec::new();
        for result in reader.records() {
            match result {
                Ok(record) => rows.push(record.iter().map(str::to_owned).collect()),
                Err(err) if matches!(err.kind(), ErrorKind::Utf8 { .. }) => {
                    warn!("skipping unreadable cache row in {}: {err}", self.path);
                }
                Err(err) => {
                    warn!(
                        "stopped reading cache store {} after {} rows: {err}",
                        self.path,
                        rows.len()
                    );
                    break;
                }
            }
        }
        Ok(rows)
    }

    fn append(&mut self, record: &CacheRecord) -> Result<(), CacheStoreError> {
        let value = record.value.to_string();
        write_row(&self.file, &[record.key.as_str(), value.as_str()]).map_err(|err| {
            CacheStoreError::Append {
                location: self.location(),
                message: err.to_string(),
            }
        })
    }

    fn location(&self) -> String {
        self.path.to_string()
    }
}

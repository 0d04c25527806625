#![forbid(unsafe_code)]

//! Resolving uploaded files to their content.
//!
//! An [`Upload`] only describes a file. Handlers that need the bytes go
//! through an [`UploadResolver`], which looks the file up by id and
//! creation date.

use std::io::{self, Cursor, Read};
use std::sync::{Arc, RwLock};

use formgraph_core::ControlId;
use formgraph_view::Upload;
use rustc_hash::FxHashMap;
use time::Date;

/// Source of uploaded file content.
pub trait UploadResolver: Send + Sync {
    /// Open the content of `upload` for reading.
    fn open(&self, upload: &Upload) -> io::Result<Box<dyn Read + Send>>;

    /// Read the whole content of `upload`.
    fn read(&self, upload: &Upload) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(usize::try_from(upload.length).unwrap_or(0));
        self.open(upload)?.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

type Key = (Date, String);

/// In-process upload store.
#[derive(Debug, Default, Clone)]
pub struct MemoryUploads {
    files: Arc<RwLock<FxHashMap<Key, Arc<[u8]>>>>,
}

impl MemoryUploads {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store content under the id and date of `upload`, replacing any
    /// previous content.
    pub fn insert(&self, upload: &Upload, bytes: impl Into<Arc<[u8]>>) {
        let mut files = self
            .files
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        files.insert((upload.created_date, upload.id.clone()), bytes.into());
    }

    /// Store `bytes` under a fresh id and return the descriptor.
    pub fn store(&self, file_name: impl Into<String>, bytes: &[u8], created_date: Date) -> Upload {
        let upload = Upload::new(
            ControlId::generate().as_str(),
            file_name,
            bytes.len() as u64,
            created_date,
        );
        self.insert(&upload, bytes);
        upload
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UploadResolver for MemoryUploads {
    fn open(&self, upload: &Upload) -> io::Result<Box<dyn Read + Send>> {
        let files = self
            .files
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let bytes = files
            .get(&(upload.created_date, upload.id.clone()))
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("upload {} ({}) not found", upload.id, upload.created_date),
                )
            })?;
        Ok(Box::new(Cursor::new(bytes)))
    }
}

use std::io;
use thiserror::Error;

use super::PageId;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File handle not initialized")]
    HandleNotInitialized,

    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// `page` is `None` when the cursor points before the first page
    #[error(
        "Read non-existing page: page={}, total_pages={total_pages}",
        page_label(.page)
    )]
    ReadNonExistingPage {
        page: Option<PageId>,
        total_pages: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl FileError {
    /// Stable numeric result code, `0` being reserved for success
    pub fn code(&self) -> i32 {
        match self {
            FileError::FileNotFound(_) => 1,
            FileError::HandleNotInitialized => 2,
            FileError::WriteFailed(_) => 3,
            FileError::ReadNonExistingPage { .. } => 4,
            FileError::Io(_) => 5,
        }
    }
}

fn page_label(page: &Option<PageId>) -> String {
    match page {
        Some(page_id) => page_id.to_string(),
        None => "none".to_string(),
    }
}

pub type FileResult<T> = Result<T, FileError>;

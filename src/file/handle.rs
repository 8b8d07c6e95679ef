use std::path::{Path, PathBuf};

use super::error::{FileError, FileResult};
use super::{PAGE_SIZE, PageId};

/// In-memory descriptor of an open page file.
///
/// The handle holds no file descriptor between calls; every operation opens
/// the backing file, does its work, and drops it before returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    file_name: PathBuf,
    total_num_pages: usize,
    /// Byte offset just past the most recently accessed page, 0 if none
    cur_page_pos: usize,
    initialized: bool,
}

impl FileHandle {
    pub(crate) fn new(file_name: PathBuf, total_num_pages: usize) -> Self {
        Self {
            file_name,
            total_num_pages,
            cur_page_pos: 0,
            initialized: true,
        }
    }

    /// Path of the backing file
    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    /// Number of complete pages in the file
    pub fn total_num_pages(&self) -> usize {
        self.total_num_pages
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Drop the association with the backing file.
    ///
    /// Closing an already closed handle is not an error.
    pub fn close(&mut self) -> FileResult<()> {
        if self.initialized {
            log::debug!("close {}", self.file_name.display());
        }
        self.initialized = false;
        Ok(())
    }

    pub(crate) fn ensure_initialized(&self) -> FileResult<()> {
        if !self.initialized {
            return Err(FileError::HandleNotInitialized);
        }
        Ok(())
    }

    /// Page index of the cursor's page, `None` before any access
    pub(crate) fn current_page(&self) -> Option<PageId> {
        self.pages_passed().checked_sub(1)
    }

    /// Number of pages up to and including the cursor's page
    pub(crate) fn pages_passed(&self) -> usize {
        self.cur_page_pos / PAGE_SIZE
    }

    /// Validate `page` against the recorded page count
    pub(crate) fn check_readable(&self, page: Option<PageId>) -> FileResult<PageId> {
        match page {
            Some(page_id) if page_id < self.total_num_pages => Ok(page_id),
            _ => Err(FileError::ReadNonExistingPage {
                page,
                total_pages: self.total_num_pages,
            }),
        }
    }

    /// Move the cursor just past `page_id`, which must already be addressable
    pub(crate) fn move_past(&mut self, page_id: PageId) {
        self.cur_page_pos = (page_id + 1) * PAGE_SIZE;
    }

    pub(crate) fn cur_page_pos(&self) -> usize {
        self.cur_page_pos
    }

    pub(crate) fn grow_by_one(&mut self) {
        self.total_num_pages += 1;
        self.cur_page_pos = self.total_num_pages * PAGE_SIZE;
    }
}

/// Byte offset of `page_id` within the file
pub(crate) fn page_offset(page_id: PageId) -> u64 {
    (page_id as u64) * PAGE_SIZE as u64
}

/// Byte offset just past `page_id`, `None` if it does not fit in a `usize`
pub(crate) fn page_end(page_id: PageId) -> Option<usize> {
    page_id.checked_add(1)?.checked_mul(PAGE_SIZE)
}

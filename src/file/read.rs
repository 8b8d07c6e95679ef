use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use super::PageId;
use super::error::{FileError, FileResult};
use super::handle::{FileHandle, page_offset};
use super::page::Page;

impl FileHandle {
    /// Read page `page_id` into `page`
    pub fn read_block(&mut self, page_id: PageId, page: &mut Page) -> FileResult<()> {
        self.ensure_initialized()?;
        let page_id = self.check_readable(Some(page_id))?;
        self.read_checked(page_id, page)
    }

    /// Read page 0 without consulting the recorded page count.
    ///
    /// An empty file therefore fails with a short-read `Io` error rather than
    /// `ReadNonExistingPage`.
    pub fn read_first_block(&mut self, page: &mut Page) -> FileResult<()> {
        self.ensure_initialized()?;

        let mut file = self.open_for_read()?;
        file.read_exact(page.as_bytes_mut())?;

        self.move_past(0);
        Ok(())
    }

    /// Re-read the page the cursor is on
    pub fn read_current_block(&mut self, page: &mut Page) -> FileResult<()> {
        self.ensure_initialized()?;
        self.read_relative(self.current_page(), page)
    }

    /// Read the page before the cursor's page
    pub fn read_previous_block(&mut self, page: &mut Page) -> FileResult<()> {
        self.ensure_initialized()?;

        let previous = self.pages_passed().checked_sub(2);
        self.read_relative(previous, page)
    }

    /// Read the page after the cursor's page
    pub fn read_next_block(&mut self, page: &mut Page) -> FileResult<()> {
        self.ensure_initialized()?;

        self.read_relative(Some(self.pages_passed()), page)
    }

    /// Read the final page of the file
    pub fn read_last_block(&mut self, page: &mut Page) -> FileResult<()> {
        self.ensure_initialized()?;
        self.read_relative(self.total_num_pages().checked_sub(1), page)
    }

    /// Cursor byte position, `None` once the handle is closed
    pub fn block_pos(&self) -> Option<usize> {
        self.is_initialized().then_some(self.cur_page_pos())
    }

    fn read_relative(&mut self, page_id: Option<PageId>, page: &mut Page) -> FileResult<()> {
        let page_id = self.check_readable(page_id)?;
        self.read_checked(page_id, page)
    }

    fn read_checked(&mut self, page_id: PageId, page: &mut Page) -> FileResult<()> {
        let mut file = self.open_for_read()?;
        // Seek and short-read failures both surface as the generic `Io` error
        file.seek(SeekFrom::Start(page_offset(page_id)))?;
        file.read_exact(page.as_bytes_mut())?;

        log::debug!("read page {} of {}", page_id, self.file_name().display());
        self.move_past(page_id);
        Ok(())
    }

    fn open_for_read(&self) -> FileResult<File> {
        File::open(self.file_name())
            .map_err(|_| FileError::FileNotFound(self.file_name().display().to_string()))
    }
}

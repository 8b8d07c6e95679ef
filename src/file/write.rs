use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};

use super::PageId;
use super::error::{FileError, FileResult};
use super::handle::{FileHandle, page_end, page_offset};
use super::page::Page;

impl FileHandle {
    /// Write `page` at `page_id`, growing the file first if needed
    pub fn write_block(&mut self, page_id: PageId, page: &Page) -> FileResult<()> {
        self.ensure_initialized()?;

        if page_end(page_id).is_none() {
            return Err(FileError::WriteFailed(format!(
                "page {} is past the addressable end of {}",
                page_id,
                self.file_name().display()
            )));
        }
        if page_id >= self.total_num_pages() {
            self.ensure_capacity(page_id + 1)?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(self.file_name())
            .map_err(|_| FileError::FileNotFound(self.file_name().display().to_string()))?;

        file.seek(SeekFrom::Start(page_offset(page_id)))
            .map_err(|e| self.write_failed(page_id, e))?;
        file.write_all(page.as_bytes())
            .map_err(|e| self.write_failed(page_id, e))?;

        log::debug!("wrote page {} of {}", page_id, self.file_name().display());
        self.move_past(page_id);
        Ok(())
    }

    /// Overwrite the page the cursor is on
    pub fn write_current_block(&mut self, page: &Page) -> FileResult<()> {
        self.ensure_initialized()?;

        match self.current_page() {
            Some(current) => self.write_block(current, page),
            None => Err(FileError::WriteFailed(format!(
                "no current page in {}",
                self.file_name().display()
            ))),
        }
    }

    /// Append one zero-filled page and move the cursor past it
    pub fn append_empty_block(&mut self) -> FileResult<()> {
        self.ensure_initialized()?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(self.file_name())
            .map_err(|_| FileError::FileNotFound(self.file_name().display().to_string()))?;

        let page_id = self.total_num_pages();
        let len_before = file.metadata()?.len();
        if let Err(e) = file.write_all(Page::new().as_bytes()) {
            // Drop any partial page so the length stays a multiple of PAGE_SIZE
            if let Err(trunc) = file.set_len(len_before) {
                log::warn!(
                    "{}: could not truncate back to {} bytes: {}",
                    self.file_name().display(),
                    len_before,
                    trunc
                );
            }
            return Err(self.write_failed(page_id, e));
        }

        self.grow_by_one();
        log::debug!(
            "appended page {} to {}",
            page_id,
            self.file_name().display()
        );
        Ok(())
    }

    /// Grow the file one page at a time until it holds `number_of_pages`.
    ///
    /// Stops at the first failed append; pages appended before it remain.
    pub fn ensure_capacity(&mut self, number_of_pages: usize) -> FileResult<()> {
        self.ensure_initialized()?;

        if self.total_num_pages() < number_of_pages {
            log::debug!(
                "growing {} from {} to {} pages",
                self.file_name().display(),
                self.total_num_pages(),
                number_of_pages
            );
        }
        while self.total_num_pages() < number_of_pages {
            self.append_empty_block()?;
        }
        Ok(())
    }

    fn write_failed(&self, page_id: PageId, err: std::io::Error) -> FileError {
        FileError::WriteFailed(format!(
            "page {} of {}: {}",
            page_id,
            self.file_name().display(),
            err
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{PAGE_SIZE, create_page_file, open_page_file};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn setup_test_file() -> (TempDir, PathBuf, FileHandle) {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("test.bin");
        create_page_file(&test_file).unwrap();
        let handle = open_page_file(&test_file).unwrap();
        (temp_dir, test_file, handle)
    }

    fn file_len(path: &Path) -> u64 {
        fs::metadata(path).unwrap().len()
    }

    #[test]
    fn test_write_then_read_block() {
        let (_temp, _path, mut handle) = setup_test_file();

        let mut write_page = Page::new();
        write_page.as_bytes_mut()[0] = 42;
        write_page.as_bytes_mut()[100] = 99;
        write_page.as_bytes_mut()[PAGE_SIZE - 1] = 255;
        handle.write_block(0, &write_page).unwrap();
        assert_eq!(handle.block_pos(), Some(PAGE_SIZE));

        let mut read_page = Page::new();
        handle.read_block(0, &mut read_page).unwrap();
        assert_eq!(read_page, write_page);
    }

    #[test]
    fn test_write_beyond_end_grows_file() {
        let (_temp, path, mut handle) = setup_test_file();

        let page = Page::from_bytes(b"AAAA").unwrap();
        handle.write_block(5, &page).unwrap();

        assert_eq!(handle.total_num_pages(), 6);
        assert_eq!(file_len(&path), 6 * PAGE_SIZE as u64);
        assert_eq!(handle.block_pos(), Some(6 * PAGE_SIZE));

        let mut read_page = Page::new();
        for page_id in 1..5 {
            handle.read_block(page_id, &mut read_page).unwrap();
            assert!(read_page.is_zeroed(), "page {} should be zeroed", page_id);
        }
        handle.read_block(5, &mut read_page).unwrap();
        assert_eq!(read_page, page);
    }

    #[test]
    fn test_write_current_block() {
        let (_temp, _path, mut handle) = setup_test_file();
        handle.ensure_capacity(3).unwrap();

        let mut page = Page::new();
        handle.read_block(1, &mut page).unwrap();

        let updated = Page::from_bytes(b"updated").unwrap();
        handle.write_current_block(&updated).unwrap();
        assert_eq!(handle.block_pos(), Some(2 * PAGE_SIZE));

        handle.read_block(1, &mut page).unwrap();
        assert_eq!(page, updated);
    }

    #[test]
    fn test_write_current_block_without_cursor() {
        let (_temp, _path, mut handle) = setup_test_file();

        let result = handle.write_current_block(&Page::new());
        assert!(matches!(result, Err(FileError::WriteFailed(_))));
    }

    #[test]
    fn test_append_empty_block() {
        let (_temp, path, mut handle) = setup_test_file();

        for k in 1..=3 {
            handle.append_empty_block().unwrap();
            assert_eq!(handle.total_num_pages(), k + 1);
            assert_eq!(file_len(&path), ((k + 1) * PAGE_SIZE) as u64);
            assert_eq!(handle.block_pos(), Some((k + 1) * PAGE_SIZE));
        }
    }

    #[test]
    fn test_ensure_capacity_zero_fills() {
        let (_temp, _path, mut handle) = setup_test_file();

        let marker = Page::from_bytes(&[0xAB; 16]).unwrap();
        handle.write_block(0, &marker).unwrap();

        handle.ensure_capacity(4).unwrap();
        assert_eq!(handle.total_num_pages(), 4);

        let mut page = Page::new();
        for page_id in 1..4 {
            handle.read_block(page_id, &mut page).unwrap();
            assert!(page.is_zeroed());
        }
        handle.read_block(0, &mut page).unwrap();
        assert_eq!(page, marker);
    }

    #[test]
    fn test_ensure_capacity_never_shrinks() {
        let (_temp, path, mut handle) = setup_test_file();
        handle.ensure_capacity(3).unwrap();

        handle.ensure_capacity(1).unwrap();
        assert_eq!(handle.total_num_pages(), 3);
        assert_eq!(file_len(&path), 3 * PAGE_SIZE as u64);
    }

    #[test]
    fn test_append_to_unopenable_path() {
        let (_temp, path, mut handle) = setup_test_file();
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let result = handle.ensure_capacity(2);
        assert!(matches!(result, Err(FileError::FileNotFound(_))));
        assert_eq!(handle.total_num_pages(), 1);
    }

    #[test]
    fn test_write_unaddressable_page() {
        let (_temp, path, mut handle) = setup_test_file();

        let page = Page::from_bytes(b"x").unwrap();
        let result = handle.write_block(usize::MAX, &page);
        assert!(matches!(result, Err(FileError::WriteFailed(_))));

        let result = handle.write_block(usize::MAX / PAGE_SIZE, &page);
        assert!(matches!(result, Err(FileError::WriteFailed(_))));

        assert_eq!(handle.total_num_pages(), 1);
        assert_eq!(handle.block_pos(), Some(0));
        assert_eq!(file_len(&path), PAGE_SIZE as u64);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_append_to_full_device() {
        let mut handle = open_page_file("/dev/full").unwrap();
        assert_eq!(handle.total_num_pages(), 0);

        let result = handle.append_empty_block();
        assert!(matches!(result, Err(FileError::WriteFailed(_))));
        assert_eq!(handle.total_num_pages(), 0);
        assert_eq!(handle.block_pos(), Some(0));

        let result = handle.ensure_capacity(3);
        assert!(matches!(result, Err(FileError::WriteFailed(_))));
        assert_eq!(handle.total_num_pages(), 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_block_to_full_device() {
        let mut handle = open_page_file("/dev/full").unwrap();

        let result = handle.write_block(0, &Page::from_bytes(b"data").unwrap());
        assert!(matches!(result, Err(FileError::WriteFailed(_))));
        assert_eq!(handle.total_num_pages(), 0);
    }

    #[test]
    fn test_write_after_close() {
        let (_temp, _path, mut handle) = setup_test_file();
        handle.close().unwrap();

        let page = Page::new();
        assert!(matches!(
            handle.write_block(0, &page),
            Err(FileError::HandleNotInitialized)
        ));
        assert!(matches!(
            handle.append_empty_block(),
            Err(FileError::HandleNotInitialized)
        ));
        assert!(matches!(
            handle.ensure_capacity(5),
            Err(FileError::HandleNotInitialized)
        ));
    }
}

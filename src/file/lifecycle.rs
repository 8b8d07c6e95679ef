use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::PAGE_SIZE;
use super::error::{FileError, FileResult};
use super::handle::FileHandle;
use super::page::Page;

/// Create a page file holding a single zero-filled page.
///
/// Existing content at `path` is truncated.
pub fn create_page_file<P: AsRef<Path>>(path: P) -> FileResult<()> {
    let path = path.as_ref();

    let mut file =
        File::create(path).map_err(|_| FileError::FileNotFound(path.display().to_string()))?;

    file.write_all(Page::new().as_bytes())
        .map_err(|e| FileError::WriteFailed(format!("{}: {}", path.display(), e)))?;

    log::info!("created page file {}", path.display());
    Ok(())
}

/// Open an existing page file and describe it with a fresh handle
pub fn open_page_file<P: AsRef<Path>>(path: P) -> FileResult<FileHandle> {
    let path = path.as_ref();

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|_| FileError::FileNotFound(path.display().to_string()))?;

    let file_size = file.metadata()?.len();
    let total_num_pages = (file_size / PAGE_SIZE as u64) as usize;

    let trailing = file_size % PAGE_SIZE as u64;
    if trailing != 0 {
        log::warn!(
            "{}: ignoring {} trailing bytes past page {}",
            path.display(),
            trailing,
            total_num_pages
        );
    }

    log::debug!("open {} ({} pages)", path.display(), total_num_pages);
    Ok(FileHandle::new(path.to_path_buf(), total_num_pages))
}

/// Close `handle`; subsequent operations on it fail
pub fn close_page_file(handle: &mut FileHandle) -> FileResult<()> {
    handle.close()
}

/// Delete the page file at `path`
pub fn destroy_page_file<P: AsRef<Path>>(path: P) -> FileResult<()> {
    let path = path.as_ref();

    fs::remove_file(path).map_err(|_| FileError::FileNotFound(path.display().to_string()))?;

    log::info!("destroyed page file {}", path.display());
    Ok(())
}

use super::PAGE_SIZE;
use super::error::{FileError, FileResult};

/// A single page worth of bytes, owned by the caller
#[derive(Clone, PartialEq, Eq)]
pub struct Page {
    data: Box<[u8; PAGE_SIZE]>,
}

impl Page {
    /// Create a zero-filled page
    pub fn new() -> Self {
        Self {
            data: Box::new([0u8; PAGE_SIZE]),
        }
    }

    /// Copy `bytes` into a fresh page, zero-padding the remainder
    pub fn from_bytes(bytes: &[u8]) -> FileResult<Self> {
        if bytes.len() > PAGE_SIZE {
            return Err(FileError::WriteFailed(format!(
                "{} bytes do not fit in a {} byte page",
                bytes.len(),
                PAGE_SIZE
            )));
        }

        let mut page = Self::new();
        page.data[..bytes.len()].copy_from_slice(bytes);
        Ok(page)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data[..]
    }

    /// True if every byte is zero
    pub fn is_zeroed(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Number of non-zero bytes
    pub fn used_bytes(&self) -> usize {
        self.data.iter().filter(|&&b| b != 0).count()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("used_bytes", &self.used_bytes())
            .finish()
    }
}

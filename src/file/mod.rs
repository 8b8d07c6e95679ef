mod error;
mod handle;
mod lifecycle;
mod page;
mod read;
mod write;

pub use error::{FileError, FileResult};
pub use handle::FileHandle;
pub use lifecycle::{close_page_file, create_page_file, destroy_page_file, open_page_file};
pub use page::Page;

/// Page size in bytes (4KB)
pub const PAGE_SIZE: usize = 4096;

/// Page ID type, 0-based
pub type PageId = usize;

pub mod cli;
pub mod file;

pub use file::{
    FileError, FileHandle, FileResult, PAGE_SIZE, Page, PageId, close_page_file,
    create_page_file, destroy_page_file, open_page_file,
};

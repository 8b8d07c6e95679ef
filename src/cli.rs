use clap::{Parser, Subcommand};
use prettytable::{Table, row};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::file::{
    FileError, FileResult, PAGE_SIZE, Page, PageId, create_page_file, destroy_page_file,
    open_page_file,
};

/// Inspect and edit fixed-size page files
#[derive(Parser, Debug)]
#[command(name = "pagefile", version, about = "Page file inspection tool")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a page file holding one zeroed page (truncates existing files)
    Create { path: PathBuf },
    /// Delete a page file
    Destroy { path: PathBuf },
    /// Show page count and size
    Info {
        path: PathBuf,
        /// Print a single JSON object
        #[arg(long)]
        json: bool,
    },
    /// Hex dump one page
    Read { path: PathBuf, page: PageId },
    /// Write UTF-8 text, zero-padded, to a page (grows the file if needed)
    Write {
        path: PathBuf,
        page: PageId,
        text: String,
    },
    /// Append zeroed pages
    Append {
        path: PathBuf,
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Grow the file to at least the given number of pages
    Ensure { path: PathBuf, pages: usize },
    /// List every page with its offset and number of non-zero bytes
    Pages { path: PathBuf },
}

#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub file_name: String,
    pub page_size: usize,
    pub total_pages: usize,
    pub file_bytes: u64,
    pub trailing_bytes: u64,
}

/// Parse process arguments and run the selected command
pub fn run() -> FileResult<()> {
    let cli = Cli::parse();
    let output = execute(cli.cmd)?;
    if !output.is_empty() {
        print!("{}", output);
    }
    Ok(())
}

/// Run one command, returning what it would print
pub fn execute(cmd: Command) -> FileResult<String> {
    match cmd {
        Command::Create { path } => {
            create_page_file(&path)?;
            Ok(String::new())
        }
        Command::Destroy { path } => {
            destroy_page_file(&path)?;
            Ok(String::new())
        }
        Command::Info { path, json } => {
            let info = file_info(&path)?;
            if json {
                let mut out = serde_json::to_string(&info)
                    .map_err(|e| FileError::Io(std::io::Error::other(e)))?;
                out.push('\n');
                Ok(out)
            } else {
                Ok(format!(
                    "file:     {}\npages:    {}\nbytes:    {}\ntrailing: {}\n",
                    info.file_name, info.total_pages, info.file_bytes, info.trailing_bytes
                ))
            }
        }
        Command::Read { path, page } => {
            let mut handle = open_page_file(&path)?;
            let mut buf = Page::new();
            handle.read_block(page, &mut buf)?;
            handle.close()?;
            Ok(hex_dump(&buf))
        }
        Command::Write { path, page, text } => {
            let mut handle = open_page_file(&path)?;
            let buf = Page::from_bytes(text.as_bytes())?;
            handle.write_block(page, &buf)?;
            handle.close()?;
            Ok(String::new())
        }
        Command::Append { path, count } => {
            let mut handle = open_page_file(&path)?;
            for _ in 0..count {
                handle.append_empty_block()?;
            }
            let total = handle.total_num_pages();
            handle.close()?;
            Ok(format!("{} pages\n", total))
        }
        Command::Ensure { path, pages } => {
            let mut handle = open_page_file(&path)?;
            handle.ensure_capacity(pages)?;
            let total = handle.total_num_pages();
            handle.close()?;
            Ok(format!("{} pages\n", total))
        }
        Command::Pages { path } => page_table(&path),
    }
}

fn file_info(path: &Path) -> FileResult<FileInfo> {
    let mut handle = open_page_file(path)?;
    let file_bytes = fs::metadata(path)?.len();
    let info = FileInfo {
        file_name: handle.file_name().display().to_string(),
        page_size: PAGE_SIZE,
        total_pages: handle.total_num_pages(),
        file_bytes,
        trailing_bytes: file_bytes % PAGE_SIZE as u64,
    };
    handle.close()?;
    Ok(info)
}

fn page_table(path: &Path) -> FileResult<String> {
    let mut handle = open_page_file(path)?;
    let mut table = Table::new();
    table.set_titles(row!["page", "offset", "used bytes"]);

    let mut page = Page::new();
    if handle.total_num_pages() > 0 {
        handle.read_first_block(&mut page)?;
        let mut page_id: PageId = 0;
        loop {
            table.add_row(row![page_id, page_id * PAGE_SIZE, page.used_bytes()]);

            match handle.read_next_block(&mut page) {
                Ok(()) => page_id += 1,
                Err(FileError::ReadNonExistingPage { .. }) => break,
                Err(e) => return Err(e),
            }
        }
    }
    handle.close()?;

    Ok(table.to_string())
}

/// Hex dump of a page, 16 bytes per row, collapsing the all-zero tail
pub fn hex_dump(page: &Page) -> String {
    let bytes = page.as_bytes();
    let used_rows = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last / 16 + 1);

    let mut out = String::new();
    for (i, row) in bytes.chunks(16).take(used_rows).enumerate() {
        let _ = write!(out, "{:08x} ", i * 16);
        for b in row {
            let _ = write!(out, " {:02x}", b);
        }
        out.push_str("  |");
        out.extend(
            row.iter()
                .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' }),
        );
        out.push_str("|\n");
    }
    if used_rows * 16 < bytes.len() {
        out.push_str("*\n");
    }
    let _ = writeln!(out, "{:08x}", bytes.len());
    out
}

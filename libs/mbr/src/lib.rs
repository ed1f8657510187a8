use thiserror::Error;

#[derive(Error, Debug)]
pub enum MbrError {
    #[error("Invalid buffer length: expected {expected} bytes, found {found}")]
    InvalidBufferLength { expected: usize, found: usize },
    #[error("Source read failure: {0}")]
    SourceRead(#[from] std::io::Error),
    #[error("Decode error: {0}")]
    Decode(#[from] binrw::Error),
}

pub type Result<T> = core::result::Result<T, MbrError>;

/// Size of a disk sector, and of the MBR itself.
pub const SECTOR_SIZE: usize = 512;

mod chs;
mod entry;
mod record;
mod types;

pub use crate::{chs::*, entry::*, record::*, types::*};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VmdkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown disk type: {0} (expected one of ide, buslogic, lsilogic, legacyESX)")]
    UnknownDiskType(String),
}

pub type Result<T> = core::result::Result<T, VmdkError>;

mod descriptor;
mod template;

pub use crate::{descriptor::*, template::*};

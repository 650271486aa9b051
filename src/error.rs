use std::fmt::Debug;

use thiserror::Error;

#[derive(Error)]
pub enum LintError {
    #[error("Empty or truncated class file")]
    TruncatedFile,

    #[error("Bad class file magic")]
    BadFileMagic,

    #[error("Unknown constant pool tag {tag} at index {index}")]
    UnknownConstantTag { tag: u8, index: u16 },

    #[error("Index({index}) to {item_ty} should be less than {max}")]
    PoolIndexError {
        index: u16,
        max: usize,
        item_ty: &'static str,
    },

    #[error("Expected {expected} at constant pool index {index}")]
    UnexpectedConstant {
        index: u16,
        expected: &'static str,
    },

    #[error("Nonzero {insn} padding byte at code offset {offset}")]
    BadSwitchPadding { insn: &'static str, offset: u32 },

    #[error("Bad tableswitch bounds at code offset {offset}: low {low}, high {high}")]
    BadSwitchBounds { offset: u32, low: i32, high: i32 },

    #[error("Unknown tag {tag:#04x} found in annotation element value")]
    UnknownElementTag { tag: u8 },

    #[error("Malformed type descriptor: {0:?}")]
    BadDescriptor(String),

    #[error("Archive has no META-INF/MANIFEST.MF")]
    ManifestMissing,

    #[error("Manifest has no Main-Class attribute")]
    MainClassMissing,

    #[error("Entry {0:?} not found in archive")]
    EntryMissing(String),

    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    IoError(#[from] std::io::Error),
}

#[macro_export]
macro_rules! lint_err {
    ($name:ident) => {
        Err($crate::error::LintError::$name)
    };
    ($name:ident { $($arg:tt)* }) => {
        Err($crate::error::LintError::$name { $($arg)* })
    };
    ($name:ident, $($arg:tt)*) => {
        Err($crate::error::LintError::$name($($arg)*))
    };
}

impl Debug for LintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

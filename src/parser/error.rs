use std::fmt;

use thiserror::Error;

/// Which of the five primitive-size bytes in the header failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeField {
    Int,
    SizeT,
    Instruction,
    Integer,
    Number,
}

impl fmt::Display for SizeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SizeField::Int => "int",
            SizeField::SizeT => "size_t",
            SizeField::Instruction => "Instruction",
            SizeField::Integer => "lua_Integer",
            SizeField::Number => "lua_Number",
        };
        f.write_str(name)
    }
}

/// Every way decoding a chunk can fail. All of them are fatal for the
/// `undump` call that produced them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UndumpError {
    #[error("truncated chunk: needed {needed} byte(s) at offset {offset}, {remaining} remaining")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("not a precompiled chunk (signature {found:02x?})")]
    SignatureMismatch { found: [u8; 4] },

    #[error("version mismatch: expected 0x53, found 0x{found:02x}")]
    VersionMismatch { found: u8 },

    #[error("format mismatch: expected 0, found {found}")]
    FormatMismatch { found: u8 },

    #[error("corrupted chunk header (integrity marker {found:02x?})")]
    IntegrityMismatch { found: [u8; 6] },

    #[error("{field} size mismatch: expected {expected}, found {found}")]
    SizeFieldMismatch {
        field: SizeField,
        expected: u8,
        found: u8,
    },

    #[error("endianness mismatch: reference integer read as 0x{found:x}")]
    EndiannessMismatch { found: i64 },

    #[error("float format mismatch: reference number read as {found}")]
    FloatFormatMismatch { found: f64 },

    #[error("corrupt constant: unknown tag 0x{tag:02x} at offset {offset}")]
    CorruptConstant { tag: u8, offset: usize },

    #[error("function prototypes nested deeper than {depth} levels")]
    NestingTooDeep { depth: usize },
}

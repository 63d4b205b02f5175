use super::cursor::Cursor;
use super::error::{SizeField, UndumpError};
use log::debug;

// Constants for validation
pub const LUA_SIGNATURE: &[u8; 4] = b"\x1BLua";
pub const LUAC_VERSION: u8 = 0x53;
pub const LUAC_FORMAT: u8 = 0;
pub const LUAC_DATA: &[u8; 6] = b"\x19\x93\r\n\x1a\n";
pub const CINT_SIZE: u8 = 4;
pub const CSIZET_SIZE: u8 = 8;
pub const INSTRUCTION_SIZE: u8 = 4;
pub const LUA_INTEGER_SIZE: u8 = 8;
pub const LUA_NUMBER_SIZE: u8 = 8;
pub const LUAC_INT: i64 = 0x5678;
pub const LUAC_NUM: f64 = 370.5;

/// Total size of the header in bytes
pub const HEADER_SIZE: usize = 4 + 1 + 1 + 6 + 5 + 8 + 8;

mod checks {
    use super::*;

    pub fn check_size(cursor: &mut Cursor<'_>, field: SizeField, expected: u8) -> Result<(), UndumpError> {
        let found = cursor.read_byte()?;
        if found != expected {
            return Err(UndumpError::SizeFieldMismatch {
                field,
                expected,
                found,
            });
        }
        Ok(())
    }

    pub fn check_signature(cursor: &mut Cursor<'_>) -> Result<(), UndumpError> {
        let found = cursor.read_bytes(LUA_SIGNATURE.len())?;
        if found != LUA_SIGNATURE {
            let mut signature = [0; 4];
            signature.copy_from_slice(found);
            return Err(UndumpError::SignatureMismatch { found: signature });
        }
        Ok(())
    }

    pub fn check_data(cursor: &mut Cursor<'_>) -> Result<(), UndumpError> {
        let found = cursor.read_bytes(LUAC_DATA.len())?;
        if found != LUAC_DATA {
            let mut data = [0; 6];
            data.copy_from_slice(found);
            return Err(UndumpError::IntegrityMismatch { found: data });
        }
        Ok(())
    }
}

use checks::*;

/// Validates the chunk header, stopping at the first field that does not
/// match the Lua 5.3 / 64-bit little-endian profile.
pub fn check_header(cursor: &mut Cursor<'_>) -> Result<(), UndumpError> {
    check_signature(cursor)?;

    let version = cursor.read_byte()?;
    if version != LUAC_VERSION {
        return Err(UndumpError::VersionMismatch { found: version });
    }
    let format = cursor.read_byte()?;
    if format != LUAC_FORMAT {
        return Err(UndumpError::FormatMismatch { found: format });
    }

    check_data(cursor)?;

    check_size(cursor, SizeField::Int, CINT_SIZE)?;
    check_size(cursor, SizeField::SizeT, CSIZET_SIZE)?;
    check_size(cursor, SizeField::Instruction, INSTRUCTION_SIZE)?;
    check_size(cursor, SizeField::Integer, LUA_INTEGER_SIZE)?;
    check_size(cursor, SizeField::Number, LUA_NUMBER_SIZE)?;

    let int = cursor.read_i64()?;
    if int != LUAC_INT {
        return Err(UndumpError::EndiannessMismatch { found: int });
    }
    let num = cursor.read_f64()?;
    if num != LUAC_NUM {
        return Err(UndumpError::FloatFormatMismatch { found: num });
    }

    debug!("Validated Lua 5.3 header ({HEADER_SIZE} bytes)");

    Ok(())
}

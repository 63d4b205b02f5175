pub mod bytecode;
pub mod constants;
pub mod cursor;
pub mod debug;
pub mod error;
pub mod function;
pub mod header;

pub use cursor::Cursor;
pub use error::{SizeField, UndumpError};
pub use function::{Prototype, Upvalue, decode_prototype};
pub use header::check_header;

use log::warn;

/// Main entry point for decoding a Lua 5.3 binary chunk
pub fn undump(input: &[u8]) -> Result<Prototype, UndumpError> {
    let mut cursor = Cursor::new(input);
    check_header(&mut cursor)?;

    // Upvalue count of the main function; repeated inside the prototype
    cursor.read_byte()?;

    let prototype = decode_prototype(&mut cursor, "")?;

    if cursor.remaining() > 0 {
        warn!(
            "{} trailing byte(s) after the main function at offset {}",
            cursor.remaining(),
            cursor.offset()
        );
    }

    Ok(prototype)
}

use super::constants::{Constant, ConstantTag};
use super::cursor::Cursor;
use super::debug::{DebugInfoIssue, LocalVariable};
use super::error::UndumpError;

use log::{debug, trace};

/// Most prototype levels a chunk may stack, the main function included (LUAI_MAXCCALLS)
pub const MAX_NESTING: usize = 200;

/// How a closure finds one of its upvalues when it is instantiated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upvalue {
    pub in_stack: u8, // 1 if captured from the enclosing function's registers
    pub index: u8,    // register or enclosing-upvalue index
}

/// Represents a Lua function prototype
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub source: String,                // Source name, inherited from the parent when stripped
    pub line_defined: u32,             // Line number where the function is defined
    pub last_line_defined: u32,        // Last line number of the definition
    pub num_params: u8,                // Number of fixed parameters
    pub is_vararg: bool,               // Whether the function accepts variable arguments
    pub max_stack_size: u8,            // Number of registers needed
    pub code: Vec<u32>,                // Bytecode instructions
    pub constants: Vec<Constant>,      // Constants used in the function
    pub upvalues: Vec<Upvalue>,        // Upvalue descriptors
    pub prototypes: Vec<Prototype>,    // Nested function prototypes
    pub line_info: Vec<u32>,           // Source line per instruction, empty when stripped
    pub loc_vars: Vec<LocalVariable>,  // Local variable scopes
    pub upvalue_names: Vec<String>,    // Upvalue names, empty when stripped
}

impl Prototype {
    /// The top-level chunk is the only prototype defined on line 0
    pub fn is_main(&self) -> bool {
        self.line_defined == 0
    }

    /// Source line of the instruction at `pc`, if debug info covers it
    pub fn line_at(&self, pc: usize) -> Option<u32> {
        self.line_info.get(pc).copied()
    }

    pub fn upvalue_name(&self, index: usize) -> Option<&str> {
        self.upvalue_names.get(index).map(String::as_str)
    }

    /// Reports debug tables that are present but do not line up with the
    /// tables they describe.
    pub fn debug_info_issues(&self) -> Vec<DebugInfoIssue> {
        let mut issues = Vec::new();
        if !self.line_info.is_empty() && self.line_info.len() != self.code.len() {
            issues.push(DebugInfoIssue::LineInfoLength {
                code: self.code.len(),
                line_info: self.line_info.len(),
            });
        }
        if !self.upvalue_names.is_empty() && self.upvalue_names.len() != self.upvalues.len() {
            issues.push(DebugInfoIssue::UpvalueNamesLength {
                upvalues: self.upvalues.len(),
                names: self.upvalue_names.len(),
            });
        }
        issues
    }

    /// Visits this prototype and all of its descendants, parents first.
    pub fn walk<'p, F>(&'p self, f: &mut F)
    where
        F: FnMut(&'p Prototype),
    {
        f(self);
        for child in &self.prototypes {
            child.walk(f);
        }
    }
}

/// Decoding functions module
mod decoders {
    use super::*;

    pub fn decode_name(cursor: &mut Cursor<'_>) -> Result<String, UndumpError> {
        let bytes = cursor.read_string()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn decode_constant(cursor: &mut Cursor<'_>) -> Result<Constant, UndumpError> {
        let offset = cursor.offset();
        let tag = cursor.read_byte()?;
        let tag = ConstantTag::try_from(tag)
            .map_err(|_| UndumpError::CorruptConstant { tag, offset })?;

        Ok(match tag {
            ConstantTag::Nil => Constant::Nil,
            ConstantTag::Boolean => Constant::Boolean(cursor.read_byte()? != 0),
            ConstantTag::Integer => Constant::Integer(cursor.read_i64()?),
            ConstantTag::Float => Constant::Float(cursor.read_f64()?),
            ConstantTag::ShortString | ConstantTag::LongString => {
                Constant::String(cursor.read_string()?)
            }
        })
    }

    pub fn decode_upvalue(cursor: &mut Cursor<'_>) -> Result<Upvalue, UndumpError> {
        Ok(Upvalue {
            in_stack: cursor.read_byte()?,
            index: cursor.read_byte()?,
        })
    }

    pub fn decode_local_variable(cursor: &mut Cursor<'_>) -> Result<LocalVariable, UndumpError> {
        Ok(LocalVariable {
            name: decode_name(cursor)?,
            start_pc: cursor.read_u32()?,
            end_pc: cursor.read_u32()?,
        })
    }

    pub fn decode_nested(
        cursor: &mut Cursor<'_>,
        parent_source: &str,
        depth: usize,
    ) -> Result<Prototype, UndumpError> {
        if depth >= MAX_NESTING {
            return Err(UndumpError::NestingTooDeep { depth: MAX_NESTING });
        }

        let mut source = decode_name(cursor)?;
        if source.is_empty() {
            source = parent_source.to_owned();
        }
        let line_defined = cursor.read_u32()?;
        let last_line_defined = cursor.read_u32()?;
        let num_params = cursor.read_byte()?;
        let is_vararg = cursor.read_byte()? != 0;
        let max_stack_size = cursor.read_byte()?;

        let code = cursor.read_table(|c| c.read_u32())?;
        trace!("{} instruction(s) at depth {depth}", code.len());
        let constants = cursor.read_table(decode_constant)?;
        trace!("{} constant(s) at depth {depth}", constants.len());
        let upvalues = cursor.read_table(decode_upvalue)?;
        let prototypes = cursor.read_table(|c| decode_nested(c, &source, depth + 1))?;
        let line_info = cursor.read_table(|c| c.read_u32())?;
        let loc_vars = cursor.read_table(decode_local_variable)?;
        let upvalue_names = cursor.read_table(decode_name)?;

        let proto = Prototype {
            source,
            line_defined,
            last_line_defined,
            num_params,
            is_vararg,
            max_stack_size,
            code,
            constants,
            upvalues,
            prototypes,
            line_info,
            loc_vars,
            upvalue_names,
        };

        debug!(
            "Decoded prototype <{}:{},{}>: {} instructions, {} constants, {} children",
            proto.source,
            proto.line_defined,
            proto.last_line_defined,
            proto.code.len(),
            proto.constants.len(),
            proto.prototypes.len()
        );

        Ok(proto)
    }
}

use decoders::*;

/// Decode a function prototype and all of its nested prototypes.
///
/// `parent_source` stands in for the source name when the encoded one is
/// empty, as it is for every nested function in an unstripped chunk.
pub fn decode_prototype(cursor: &mut Cursor<'_>, parent_source: &str) -> Result<Prototype, UndumpError> {
    decode_nested(cursor, parent_source, 0)
}

use std::fmt;

/// Represents a local variable debug information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariable {
    pub name: String,  // Variable name
    pub start_pc: u32, // First instruction index where the variable is live
    pub end_pc: u32,   // First instruction index where it is dead again
}

/// A debug table whose length disagrees with the table it annotates.
///
/// The chunk format does not forbid this, so it is reported rather than
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugInfoIssue {
    LineInfoLength { code: usize, line_info: usize },
    UpvalueNamesLength { upvalues: usize, names: usize },
}

impl fmt::Display for DebugInfoIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugInfoIssue::LineInfoLength { code, line_info } => write!(
                f,
                "line info has {line_info} entries for {code} instructions"
            ),
            DebugInfoIssue::UpvalueNamesLength { upvalues, names } => {
                write!(f, "{names} upvalue names for {upvalues} upvalues")
            }
        }
    }
}

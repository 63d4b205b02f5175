//! Decoder and lister for precompiled Lua 5.3 chunks.
//!
//! [`undump`] turns the bytes written by `luac` into a tree of
//! [`Prototype`]s; [`listing`] renders that tree the way `luac -l` does.

pub mod listing;
pub mod parser;

pub use listing::{ListingOptions, write_listing};
pub use parser::constants::Constant;
pub use parser::debug::{DebugInfoIssue, LocalVariable};
pub use parser::{Prototype, SizeField, UndumpError, Upvalue, undump};

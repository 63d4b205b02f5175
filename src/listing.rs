//! `luac -l` style listing of a decoded prototype tree.

use std::io::{self, Write};

use crate::parser::Prototype;
use crate::parser::bytecode::Instruction;

/// Rendering switches, filled from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    /// Append the decoded mnemonic and operands to every instruction
    pub decode: bool,
    /// Descend into nested prototypes
    pub recursive: bool,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            decode: false,
            recursive: true,
        }
    }
}

/// Writes the listing of `proto`, followed depth-first by its children
/// when `options.recursive` is set.
pub fn write_listing<W: Write>(out: &mut W, proto: &Prototype, options: ListingOptions) -> io::Result<()> {
    write_header(out, proto)?;
    write_code(out, proto, options)?;
    write_detail(out, proto)?;

    if options.recursive {
        for child in &proto.prototypes {
            write_listing(out, child, options)?;
        }
    }
    Ok(())
}

fn write_header<W: Write>(out: &mut W, proto: &Prototype) -> io::Result<()> {
    let kind = if proto.is_main() { "main" } else { "function" };
    let vararg = if proto.is_vararg { "+" } else { "" };

    writeln!(
        out,
        "\n{kind} <{}:{},{}> ({} instructions)",
        proto.source,
        proto.line_defined,
        proto.last_line_defined,
        proto.code.len()
    )?;
    writeln!(
        out,
        "{}{vararg} params, {} slots, {} upvalues, {} locals, {} constants, {} functions",
        proto.num_params,
        proto.max_stack_size,
        proto.upvalues.len(),
        proto.loc_vars.len(),
        proto.constants.len(),
        proto.prototypes.len()
    )
}

fn write_code<W: Write>(out: &mut W, proto: &Prototype, options: ListingOptions) -> io::Result<()> {
    for (pc, &word) in proto.code.iter().enumerate() {
        let line = proto
            .line_at(pc)
            .map_or_else(|| "-".to_owned(), |line| line.to_string());
        write!(out, "\t{}\t[{line}]\t0x{word:08X}", pc + 1)?;
        if options.decode {
            write!(out, "\t{}", Instruction::new(word))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_detail<W: Write>(out: &mut W, proto: &Prototype) -> io::Result<()> {
    writeln!(out, "constants ({}):", proto.constants.len())?;
    for (i, constant) in proto.constants.iter().enumerate() {
        writeln!(out, "\t{}\t{constant}", i + 1)?;
    }

    writeln!(out, "locals ({}):", proto.loc_vars.len())?;
    for (i, local) in proto.loc_vars.iter().enumerate() {
        writeln!(
            out,
            "\t{i}\t{}\t{}\t{}",
            local.name,
            u64::from(local.start_pc) + 1,
            u64::from(local.end_pc) + 1
        )?;
    }

    writeln!(out, "upvalues ({}):", proto.upvalues.len())?;
    for (i, upvalue) in proto.upvalues.iter().enumerate() {
        writeln!(
            out,
            "\t{i}\t{}\t{}\t{}",
            proto.upvalue_name(i).unwrap_or("-"),
            upvalue.in_stack,
            upvalue.index
        )?;
    }
    Ok(())
}

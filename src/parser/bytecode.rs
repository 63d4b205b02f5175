/*
  Lua 5.3 instruction words
*/

use std::fmt;

use num_enum::TryFromPrimitive;

//////////////////////////////// Variables ////////////////////////////////

// lopcodes.h:296
const TOTAL_OPS: usize = 47;

// lopcodes.h:162
const BITRK: u32 = 1 << (Instruction::SIZE_B - 1);

//////////////////////////////// Structs ////////////////////////////////

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InstructionFormat {
    IABC,
    IABx,
    IAsBx,
    IAx,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum OperandMask {
    OpArgN, /* argument is not used */
    OpArgU, /* argument is used */
    OpArgR, /* argument is a register or a jump offset */
    OpArgK, /* argument is a constant or register/constant */
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[rustfmt::skip]
#[repr(u8)]
pub enum Opcode {
    MOVE,     LOADK,    LOADKX,   LOADBOOL,
    LOADNIL,  GETUPVAL, GETTABUP, GETTABLE,
    SETTABUP, SETUPVAL, SETTABLE, NEWTABLE,
    SELF,     ADD,      SUB,      MUL,
    MOD,      POW,      DIV,      IDIV,
    BAND,     BOR,      BXOR,     SHL,
    SHR,      UNM,      BNOT,     NOT,
    LEN,      CONCAT,   JMP,      EQ,
    LT,       LE,       TEST,     TESTSET,
    CALL,     TAILCALL, RETURN,   FORLOOP,
    FORPREP,  TFORCALL, TFORLOOP, SETLIST,
    CLOSURE,  VARARG,   EXTRAARG,
}

impl Opcode {
    pub fn name(self) -> &'static str {
        OPNAMES[self as usize]
    }

    pub fn format(self) -> InstructionFormat {
        OPMODES[self as usize].0
    }

    pub fn b_mode(self) -> OperandMask {
        OPMODES[self as usize].1
    }

    pub fn c_mode(self) -> OperandMask {
        OPMODES[self as usize].2
    }
}

/// A single 32-bit instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction(u32);

impl Instruction {
    pub const SIZE_OP: u32 = 6;
    pub const SIZE_A: u32 = 8;
    pub const SIZE_B: u32 = 9;
    pub const SIZE_C: u32 = 9;
    pub const SIZE_BX: u32 = Instruction::SIZE_C + Instruction::SIZE_B;
    pub const SIZE_AX: u32 = Instruction::SIZE_C + Instruction::SIZE_B + Instruction::SIZE_A;

    pub const POS_OP: u32 = 0;
    pub const POS_A: u32 = Instruction::POS_OP + Instruction::SIZE_OP;
    pub const POS_C: u32 = Instruction::POS_A + Instruction::SIZE_A;
    pub const POS_B: u32 = Instruction::POS_C + Instruction::SIZE_C;
    pub const POS_BX: u32 = Instruction::POS_C;
    pub const POS_AX: u32 = Instruction::POS_A;

    pub const MAXARG_SBX: i32 = ((1 << Instruction::SIZE_BX) - 1) >> 1;

    pub const fn new(instr: u32) -> Self {
        Self(instr)
    }

    pub const fn raw(&self) -> u32 {
        self.0
    }

    const fn field(&self, pos: u32, size: u32) -> u32 {
        (self.0 >> pos) & ((1 << size) - 1)
    }

    /// Raw 6-bit opcode number, which may not name a Lua 5.3 opcode
    pub const fn op(&self) -> u8 {
        self.field(Instruction::POS_OP, Instruction::SIZE_OP) as u8
    }

    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::try_from(self.op()).ok()
    }

    // Operands //

    pub const fn a(&self) -> u32 {
        self.field(Instruction::POS_A, Instruction::SIZE_A)
    }

    pub const fn b(&self) -> u32 {
        self.field(Instruction::POS_B, Instruction::SIZE_B)
    }

    pub const fn c(&self) -> u32 {
        self.field(Instruction::POS_C, Instruction::SIZE_C)
    }

    pub const fn bx(&self) -> u32 {
        self.field(Instruction::POS_BX, Instruction::SIZE_BX)
    }

    pub const fn sbx(&self) -> i32 {
        self.bx() as i32 - Instruction::MAXARG_SBX
    }

    pub const fn ax(&self) -> u32 {
        self.field(Instruction::POS_AX, Instruction::SIZE_AX)
    }
}

/// Constant index as luac prints it
const fn myk(index: u32) -> i64 {
    -1 - index as i64
}

/// An RK operand: a register, or a constant when the top bit is set
fn rk(value: u32) -> i64 {
    if value & BITRK != 0 {
        myk(value & !BITRK)
    } else {
        i64::from(value)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(opcode) = self.opcode() else {
            return write!(
                f,
                "UNKNOWN({})\t{} {} {}",
                self.op(),
                self.a(),
                self.b(),
                self.c()
            );
        };

        write!(f, "{:<9}\t", opcode.name())?;
        match opcode.format() {
            InstructionFormat::IABC => {
                write!(f, "{}", self.a())?;
                for (mode, value) in [(opcode.b_mode(), self.b()), (opcode.c_mode(), self.c())] {
                    match mode {
                        OperandMask::OpArgN => {}
                        OperandMask::OpArgK => write!(f, " {}", rk(value))?,
                        _ => write!(f, " {value}")?,
                    }
                }
                Ok(())
            }
            InstructionFormat::IABx => {
                write!(f, "{}", self.a())?;
                match opcode.b_mode() {
                    OperandMask::OpArgK => write!(f, " {}", myk(self.bx())),
                    OperandMask::OpArgU => write!(f, " {}", self.bx()),
                    _ => Ok(()),
                }
            }
            InstructionFormat::IAsBx => write!(f, "{} {}", self.a(), self.sbx()),
            InstructionFormat::IAx => write!(f, "{}", myk(self.ax())),
        }
    }
}

//////////////////////////////// Lookup Tables ////////////////////////////////

use InstructionFormat::{IABC, IABx, IAsBx, IAx};
use OperandMask::{OpArgK, OpArgN, OpArgR, OpArgU};

#[rustfmt::skip]
const OPMODES: [(InstructionFormat, OperandMask, OperandMask); TOTAL_OPS] = [
    /* Format  Operand B  Operand C */
    (IABC,  OpArgR, OpArgN), // OP_MOVE
    (IABx,  OpArgK, OpArgN), // OP_LOADK
    (IABx,  OpArgN, OpArgN), // OP_LOADKX
    (IABC,  OpArgU, OpArgU), // OP_LOADBOOL
    (IABC,  OpArgU, OpArgN), // OP_LOADNIL
    (IABC,  OpArgU, OpArgN), // OP_GETUPVAL
    (IABC,  OpArgU, OpArgK), // OP_GETTABUP
    (IABC,  OpArgR, OpArgK), // OP_GETTABLE
    (IABC,  OpArgK, OpArgK), // OP_SETTABUP
    (IABC,  OpArgU, OpArgN), // OP_SETUPVAL
    (IABC,  OpArgK, OpArgK), // OP_SETTABLE
    (IABC,  OpArgU, OpArgU), // OP_NEWTABLE
    (IABC,  OpArgR, OpArgK), // OP_SELF
    (IABC,  OpArgK, OpArgK), // OP_ADD
    (IABC,  OpArgK, OpArgK), // OP_SUB
    (IABC,  OpArgK, OpArgK), // OP_MUL
    (IABC,  OpArgK, OpArgK), // OP_MOD
    (IABC,  OpArgK, OpArgK), // OP_POW
    (IABC,  OpArgK, OpArgK), // OP_DIV
    (IABC,  OpArgK, OpArgK), // OP_IDIV
    (IABC,  OpArgK, OpArgK), // OP_BAND
    (IABC,  OpArgK, OpArgK), // OP_BOR
    (IABC,  OpArgK, OpArgK), // OP_BXOR
    (IABC,  OpArgK, OpArgK), // OP_SHL
    (IABC,  OpArgK, OpArgK), // OP_SHR
    (IABC,  OpArgR, OpArgN), // OP_UNM
    (IABC,  OpArgR, OpArgN), // OP_BNOT
    (IABC,  OpArgR, OpArgN), // OP_NOT
    (IABC,  OpArgR, OpArgN), // OP_LEN
    (IABC,  OpArgR, OpArgR), // OP_CONCAT
    (IAsBx, OpArgR, OpArgN), // OP_JMP
    (IABC,  OpArgK, OpArgK), // OP_EQ
    (IABC,  OpArgK, OpArgK), // OP_LT
    (IABC,  OpArgK, OpArgK), // OP_LE
    (IABC,  OpArgN, OpArgU), // OP_TEST
    (IABC,  OpArgR, OpArgU), // OP_TESTSET
    (IABC,  OpArgU, OpArgU), // OP_CALL
    (IABC,  OpArgU, OpArgU), // OP_TAILCALL
    (IABC,  OpArgU, OpArgN), // OP_RETURN
    (IAsBx, OpArgR, OpArgN), // OP_FORLOOP
    (IAsBx, OpArgR, OpArgN), // OP_FORPREP
    (IABC,  OpArgN, OpArgU), // OP_TFORCALL
    (IAsBx, OpArgR, OpArgN), // OP_TFORLOOP
    (IABC,  OpArgU, OpArgU), // OP_SETLIST
    (IABx,  OpArgU, OpArgN), // OP_CLOSURE
    (IABC,  OpArgU, OpArgN), // OP_VARARG
    (IAx,   OpArgU, OpArgU), // OP_EXTRAARG
];

#[rustfmt::skip]
const OPNAMES: [&str; TOTAL_OPS] = [
    "MOVE",     "LOADK",    "LOADKX",   "LOADBOOL",
    "LOADNIL",  "GETUPVAL", "GETTABUP", "GETTABLE",
    "SETTABUP", "SETUPVAL", "SETTABLE", "NEWTABLE",
    "SELF",     "ADD",      "SUB",      "MUL",
    "MOD",      "POW",      "DIV",      "IDIV",
    "BAND",     "BOR",      "BXOR",     "SHL",
    "SHR",      "UNM",      "BNOT",     "NOT",
    "LEN",      "CONCAT",   "JMP",      "EQ",
    "LT",       "LE",       "TEST",     "TESTSET",
    "CALL",     "TAILCALL", "RETURN",   "FORLOOP",
    "FORPREP",  "TFORCALL", "TFORLOOP", "SETLIST",
    "CLOSURE",  "VARARG",   "EXTRAARG",
];

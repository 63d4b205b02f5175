//! Hand assembly of Lua 5.3 chunks for the integration tests.

#![allow(dead_code)]

pub const HEADER_LEN: usize = 33;

pub fn header() -> Vec<u8> {
    let mut bytes = b"\x1bLua".to_vec();
    bytes.extend_from_slice(&[0x53, 0x00]);
    bytes.extend_from_slice(b"\x19\x93\r\n\x1a\n");
    bytes.extend_from_slice(&[4, 8, 4, 8, 8]);
    bytes.extend_from_slice(&0x5678i64.to_le_bytes());
    bytes.extend_from_slice(&370.5f64.to_le_bytes());
    bytes
}

/// Encodes `bytes` the way luac 5.3 writes strings
pub fn string(bytes: &[u8]) -> Vec<u8> {
    if bytes.is_empty() {
        return vec![0];
    }
    let size = bytes.len() + 1;
    let mut out = if size < 0xFF {
        vec![size as u8]
    } else {
        let mut out = vec![0xFF];
        out.extend_from_slice(&(size as u64).to_le_bytes());
        out
    };
    out.extend_from_slice(bytes);
    out
}

pub fn nil() -> Vec<u8> {
    vec![0x00]
}

pub fn boolean(value: bool) -> Vec<u8> {
    vec![0x01, value as u8]
}

pub fn integer(value: i64) -> Vec<u8> {
    let mut out = vec![0x13];
    out.extend_from_slice(&value.to_le_bytes());
    out
}

pub fn float(value: f64) -> Vec<u8> {
    let mut out = vec![0x03];
    out.extend_from_slice(&value.to_le_bytes());
    out
}

pub fn short_string(bytes: &[u8]) -> Vec<u8> {
    let mut out = vec![0x04];
    out.extend(string(bytes));
    out
}

pub fn long_string(bytes: &[u8]) -> Vec<u8> {
    let mut out = vec![0x14];
    out.extend(string(bytes));
    out
}

/// One function prototype, encoded on demand
#[derive(Debug, Clone, Default)]
pub struct Function {
    pub source: Vec<u8>,
    pub line_defined: u32,
    pub last_line_defined: u32,
    pub num_params: u8,
    pub is_vararg: u8,
    pub max_stack_size: u8,
    pub code: Vec<u32>,
    /// Already-encoded constants, tag byte included
    pub constants: Vec<Vec<u8>>,
    pub upvalues: Vec<(u8, u8)>,
    pub children: Vec<Function>,
    pub line_info: Vec<u32>,
    pub loc_vars: Vec<(Vec<u8>, u32, u32)>,
    pub upvalue_names: Vec<Vec<u8>>,
}

impl Function {
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend(string(&self.source));
        out.extend_from_slice(&self.line_defined.to_le_bytes());
        out.extend_from_slice(&self.last_line_defined.to_le_bytes());
        out.extend_from_slice(&[self.num_params, self.is_vararg, self.max_stack_size]);

        count(out, self.code.len());
        for word in &self.code {
            out.extend_from_slice(&word.to_le_bytes());
        }
        count(out, self.constants.len());
        for constant in &self.constants {
            out.extend_from_slice(constant);
        }
        count(out, self.upvalues.len());
        for &(in_stack, index) in &self.upvalues {
            out.extend_from_slice(&[in_stack, index]);
        }
        count(out, self.children.len());
        for child in &self.children {
            child.encode(out);
        }
        count(out, self.line_info.len());
        for line in &self.line_info {
            out.extend_from_slice(&line.to_le_bytes());
        }
        count(out, self.loc_vars.len());
        for (name, start_pc, end_pc) in &self.loc_vars {
            out.extend(string(name));
            out.extend_from_slice(&start_pc.to_le_bytes());
            out.extend_from_slice(&end_pc.to_le_bytes());
        }
        count(out, self.upvalue_names.len());
        for name in &self.upvalue_names {
            out.extend(string(name));
        }
    }
}

fn count(out: &mut Vec<u8>, n: usize) {
    out.extend_from_slice(&(n as u32).to_le_bytes());
}

/// Header, main upvalue count and the encoded main function
pub fn chunk(main: &Function) -> Vec<u8> {
    let mut bytes = header();
    bytes.push(main.upvalues.len() as u8);
    main.encode(&mut bytes);
    bytes
}

/// `print("hello")` as luac 5.3 compiles it from `hello.lua`, with a
/// nested `local function greet(name) end` on lines 2..3
pub fn hello() -> Function {
    let greet = Function {
        source: Vec::new(),
        line_defined: 2,
        last_line_defined: 3,
        num_params: 1,
        max_stack_size: 2,
        code: vec![0x0080_0026],
        line_info: vec![3],
        loc_vars: vec![(b"name".to_vec(), 0, 1)],
        ..Function::default()
    };
    Function {
        source: b"@hello.lua".to_vec(),
        line_defined: 0,
        last_line_defined: 0,
        num_params: 0,
        is_vararg: 1,
        max_stack_size: 2,
        code: vec![0x0040_0006, 0x0000_4041, 0x0100_4024, 0x0000_006C, 0x0080_0026],
        constants: vec![short_string(b"print"), short_string(b"hello")],
        upvalues: vec![(1, 0)],
        children: vec![greet],
        line_info: vec![1, 1, 1, 3, 3],
        loc_vars: vec![(b"greet".to_vec(), 4, 5)],
        upvalue_names: vec![b"_ENV".to_vec()],
    }
}

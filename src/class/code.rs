use super::attribute::{read_attributes, Attribute};
use super::insn::{self, Insn};
use super::pool::ConstantPool;
use super::reader::ByteReader;
use crate::Result;

/// Decoded `Code` attribute payload.
pub struct Code {
    pub max_stack: u16,
    pub max_locals: u16,
    /// Instructions in bytecode order; offsets and sizes cover the code
    /// array exactly.
    pub insns: Vec<Insn>,
    pub exceptions: Vec<ExceptionEntry>,
    /// Nested attributes (line tables and the like), kept raw.
    pub attributes: Vec<Attribute>,
}

pub struct ExceptionEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type: u16,
}

impl Code {
    pub fn parse(info: &[u8], pool: &ConstantPool) -> Result<Code> {
        let mut r = ByteReader::new(info);
        let max_stack = r.u16()?;
        let max_locals = r.u16()?;
        let code_length = r.u32()? as usize;
        let insns = disassemble(r.bytes(code_length)?)?;

        let exception_count = r.u16()?;
        let mut exceptions = Vec::with_capacity(exception_count as usize);
        for _ in 0..exception_count {
            exceptions.push(ExceptionEntry {
                start_pc: r.u16()?,
                end_pc: r.u16()?,
                handler_pc: r.u16()?,
                catch_type: r.u16()?,
            });
        }

        let attribute_count = r.u16()?;
        let attributes = read_attributes(&mut r, attribute_count, pool)?;

        Ok(Code {
            max_stack,
            max_locals,
            insns,
            exceptions,
            attributes,
        })
    }
}

/// Decodes from offset 0 until the cursor reaches the end of the code
/// array, preserving order and byte offsets.
pub fn disassemble(code: &[u8]) -> Result<Vec<Insn>> {
    let mut insns = Vec::new();
    let mut offset = 0u32;
    while (offset as usize) < code.len() {
        let insn = insn::decode(code, offset)?;
        offset += insn.size;
        insns.push(insn);
    }
    Ok(insns)
}

use super::reader::ByteReader;
use crate::{lint_err, Result};

/// One decoded JVM instruction.
///
/// `opcode` is `None` for bytes outside the published table; those decode
/// to a width-1 instruction instead of failing, so one exotic opcode does
/// not take the whole method with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Insn {
    pub opcode: Option<Opcode>,
    pub byte: u8,
    /// Byte offset of this instruction within the method's code array.
    pub offset: u32,
    /// Encoded width in bytes, switch padding included.
    pub size: u32,
    pub operand: Operand,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    None,
    /// Local variable index (`iload` family, `ret`).
    Local(u16),
    /// Immediate constant (`bipush`, `sipush`).
    Imm(i32),
    /// Constant pool index (`ldc` family, field/method refs, `new`, ...).
    Pool(u16),
    /// `invokeinterface`: pool index plus historical count byte.
    PoolCount { index: u16, count: u8 },
    /// Signed branch offset relative to this instruction.
    Branch(i32),
    Iinc { index: u16, delta: i32 },
    /// `newarray` primitive element type code.
    ArrayType(u8),
    MultiArray { index: u16, dims: u8 },
    TableSwitch {
        default: i32,
        low: i32,
        high: i32,
        jumps: Vec<i32>,
    },
    LookupSwitch {
        default: i32,
        pairs: Vec<(i32, i32)>,
    },
    /// `wide` prefix: the widened inner opcode and its 16-bit operands.
    Wide {
        inner: Option<Opcode>,
        index: u16,
        constant: Option<i16>,
    },
}

impl Insn {
    pub fn mnemonic(&self) -> &'static str {
        match self.opcode {
            Some(op) => op.mnemonic(),
            None => "?",
        }
    }

    pub fn is_invoke(&self) -> bool {
        self.opcode.is_some_and(Opcode::is_invoke)
    }

    /// Constant pool index for pool-carrying operands, if any.
    pub fn pool_index(&self) -> Option<u16> {
        match self.operand {
            Operand::Pool(index)
            | Operand::PoolCount { index, .. }
            | Operand::MultiArray { index, .. } => Some(index),
            _ => None,
        }
    }
}

/// Operand encoding of an opcode; fixed formats imply the byte width.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    /// Bare opcode, width 1.
    Plain,
    /// u8 local variable index, width 2.
    Local,
    /// i8 immediate, width 2.
    Imm8,
    /// i16 immediate, width 3.
    Imm16,
    /// u8 constant pool index (`ldc`), width 2.
    Pool8,
    /// u16 constant pool index, width 3.
    Pool16,
    /// u16 pool index + count + zero (`invokeinterface`), width 5.
    PoolCount,
    /// u16 pool index + two zero bytes (`invokedynamic`), width 5.
    PoolZero2,
    /// i16 branch offset, width 3.
    Branch16,
    /// i32 branch offset (`goto_w`/`jsr_w`), width 5.
    Branch32,
    /// u8 index + i8 delta, width 3.
    Iinc,
    /// u8 primitive array type, width 2.
    NewArray,
    /// u16 pool index + u8 dimensions, width 4.
    MultiArray,
    /// 0-3 alignment padding bytes, then default/low/high + jump table.
    TableSwitch,
    /// 0-3 alignment padding bytes, then default/npairs + match pairs.
    LookupSwitch,
    /// Prefix widening the following opcode; width 6 for `iinc`, else 4.
    Wide,
}

pub struct OpDesc {
    pub mnemonic: &'static str,
    pub format: Format,
}

macro_rules! opcode_table {
    ($({$byte:literal, $name:ident, $mnemonic:literal, $format:ident},)*) => {
        #[repr(u8)]
        #[allow(non_camel_case_types)]
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub enum Opcode {
            $($name,)*
        }

        impl Opcode {
            pub const fn from_byte(byte: u8) -> Option<Opcode> {
                match byte {
                    $($byte => Some(Opcode::$name),)*
                    _ => None,
                }
            }

            pub const fn desc(self) -> &'static OpDesc {
                match self {
                    $(Opcode::$name => &OpDesc {
                        mnemonic: $mnemonic,
                        format: Format::$format,
                    },)*
                }
            }
        }
    };
}

opcode_table!(
 /* 0x00 */ {0x00, NOP, "nop", Plain},
 /* 0x01 */ {0x01, ACONST_NULL, "aconst_null", Plain},
 /* 0x02 */ {0x02, ICONST_M1, "iconst_m1", Plain},
 /* 0x03 */ {0x03, ICONST_0, "iconst_0", Plain},
 /* 0x04 */ {0x04, ICONST_1, "iconst_1", Plain},
 /* 0x05 */ {0x05, ICONST_2, "iconst_2", Plain},
 /* 0x06 */ {0x06, ICONST_3, "iconst_3", Plain},
 /* 0x07 */ {0x07, ICONST_4, "iconst_4", Plain},
 /* 0x08 */ {0x08, ICONST_5, "iconst_5", Plain},
 /* 0x09 */ {0x09, LCONST_0, "lconst_0", Plain},
 /* 0x0a */ {0x0a, LCONST_1, "lconst_1", Plain},
 /* 0x0b */ {0x0b, FCONST_0, "fconst_0", Plain},
 /* 0x0c */ {0x0c, FCONST_1, "fconst_1", Plain},
 /* 0x0d */ {0x0d, FCONST_2, "fconst_2", Plain},
 /* 0x0e */ {0x0e, DCONST_0, "dconst_0", Plain},
 /* 0x0f */ {0x0f, DCONST_1, "dconst_1", Plain},
 /* 0x10 */ {0x10, BIPUSH, "bipush", Imm8},
 /* 0x11 */ {0x11, SIPUSH, "sipush", Imm16},
 /* 0x12 */ {0x12, LDC, "ldc", Pool8},
 /* 0x13 */ {0x13, LDC_W, "ldc_w", Pool16},
 /* 0x14 */ {0x14, LDC2_W, "ldc2_w", Pool16},
 /* 0x15 */ {0x15, ILOAD, "iload", Local},
 /* 0x16 */ {0x16, LLOAD, "lload", Local},
 /* 0x17 */ {0x17, FLOAD, "fload", Local},
 /* 0x18 */ {0x18, DLOAD, "dload", Local},
 /* 0x19 */ {0x19, ALOAD, "aload", Local},
 /* 0x1a */ {0x1a, ILOAD_0, "iload_0", Plain},
 /* 0x1b */ {0x1b, ILOAD_1, "iload_1", Plain},
 /* 0x1c */ {0x1c, ILOAD_2, "iload_2", Plain},
 /* 0x1d */ {0x1d, ILOAD_3, "iload_3", Plain},
 /* 0x1e */ {0x1e, LLOAD_0, "lload_0", Plain},
 /* 0x1f */ {0x1f, LLOAD_1, "lload_1", Plain},
 /* 0x20 */ {0x20, LLOAD_2, "lload_2", Plain},
 /* 0x21 */ {0x21, LLOAD_3, "lload_3", Plain},
 /* 0x22 */ {0x22, FLOAD_0, "fload_0", Plain},
 /* 0x23 */ {0x23, FLOAD_1, "fload_1", Plain},
 /* 0x24 */ {0x24, FLOAD_2, "fload_2", Plain},
 /* 0x25 */ {0x25, FLOAD_3, "fload_3", Plain},
 /* 0x26 */ {0x26, DLOAD_0, "dload_0", Plain},
 /* 0x27 */ {0x27, DLOAD_1, "dload_1", Plain},
 /* 0x28 */ {0x28, DLOAD_2, "dload_2", Plain},
 /* 0x29 */ {0x29, DLOAD_3, "dload_3", Plain},
 /* 0x2a */ {0x2a, ALOAD_0, "aload_0", Plain},
 /* 0x2b */ {0x2b, ALOAD_1, "aload_1", Plain},
 /* 0x2c */ {0x2c, ALOAD_2, "aload_2", Plain},
 /* 0x2d */ {0x2d, ALOAD_3, "aload_3", Plain},
 /* 0x2e */ {0x2e, IALOAD, "iaload", Plain},
 /* 0x2f */ {0x2f, LALOAD, "laload", Plain},
 /* 0x30 */ {0x30, FALOAD, "faload", Plain},
 /* 0x31 */ {0x31, DALOAD, "daload", Plain},
 /* 0x32 */ {0x32, AALOAD, "aaload", Plain},
 /* 0x33 */ {0x33, BALOAD, "baload", Plain},
 /* 0x34 */ {0x34, CALOAD, "caload", Plain},
 /* 0x35 */ {0x35, SALOAD, "saload", Plain},
 /* 0x36 */ {0x36, ISTORE, "istore", Local},
 /* 0x37 */ {0x37, LSTORE, "lstore", Local},
 /* 0x38 */ {0x38, FSTORE, "fstore", Local},
 /* 0x39 */ {0x39, DSTORE, "dstore", Local},
 /* 0x3a */ {0x3a, ASTORE, "astore", Local},
 /* 0x3b */ {0x3b, ISTORE_0, "istore_0", Plain},
 /* 0x3c */ {0x3c, ISTORE_1, "istore_1", Plain},
 /* 0x3d */ {0x3d, ISTORE_2, "istore_2", Plain},
 /* 0x3e */ {0x3e, ISTORE_3, "istore_3", Plain},
 /* 0x3f */ {0x3f, LSTORE_0, "lstore_0", Plain},
 /* 0x40 */ {0x40, LSTORE_1, "lstore_1", Plain},
 /* 0x41 */ {0x41, LSTORE_2, "lstore_2", Plain},
 /* 0x42 */ {0x42, LSTORE_3, "lstore_3", Plain},
 /* 0x43 */ {0x43, FSTORE_0, "fstore_0", Plain},
 /* 0x44 */ {0x44, FSTORE_1, "fstore_1", Plain},
 /* 0x45 */ {0x45, FSTORE_2, "fstore_2", Plain},
 /* 0x46 */ {0x46, FSTORE_3, "fstore_3", Plain},
 /* 0x47 */ {0x47, DSTORE_0, "dstore_0", Plain},
 /* 0x48 */ {0x48, DSTORE_1, "dstore_1", Plain},
 /* 0x49 */ {0x49, DSTORE_2, "dstore_2", Plain},
 /* 0x4a */ {0x4a, DSTORE_3, "dstore_3", Plain},
 /* 0x4b */ {0x4b, ASTORE_0, "astore_0", Plain},
 /* 0x4c */ {0x4c, ASTORE_1, "astore_1", Plain},
 /* 0x4d */ {0x4d, ASTORE_2, "astore_2", Plain},
 /* 0x4e */ {0x4e, ASTORE_3, "astore_3", Plain},
 /* 0x4f */ {0x4f, IASTORE, "iastore", Plain},
 /* 0x50 */ {0x50, LASTORE, "lastore", Plain},
 /* 0x51 */ {0x51, FASTORE, "fastore", Plain},
 /* 0x52 */ {0x52, DASTORE, "dastore", Plain},
 /* 0x53 */ {0x53, AASTORE, "aastore", Plain},
 /* 0x54 */ {0x54, BASTORE, "bastore", Plain},
 /* 0x55 */ {0x55, CASTORE, "castore", Plain},
 /* 0x56 */ {0x56, SASTORE, "sastore", Plain},
 /* 0x57 */ {0x57, POP, "pop", Plain},
 /* 0x58 */ {0x58, POP2, "pop2", Plain},
 /* 0x59 */ {0x59, DUP, "dup", Plain},
 /* 0x5a */ {0x5a, DUP_X1, "dup_x1", Plain},
 /* 0x5b */ {0x5b, DUP_X2, "dup_x2", Plain},
 /* 0x5c */ {0x5c, DUP2, "dup2", Plain},
 /* 0x5d */ {0x5d, DUP2_X1, "dup2_x1", Plain},
 /* 0x5e */ {0x5e, DUP2_X2, "dup2_x2", Plain},
 /* 0x5f */ {0x5f, SWAP, "swap", Plain},
 /* 0x60 */ {0x60, IADD, "iadd", Plain},
 /* 0x61 */ {0x61, LADD, "ladd", Plain},
 /* 0x62 */ {0x62, FADD, "fadd", Plain},
 /* 0x63 */ {0x63, DADD, "dadd", Plain},
 /* 0x64 */ {0x64, ISUB, "isub", Plain},
 /* 0x65 */ {0x65, LSUB, "lsub", Plain},
 /* 0x66 */ {0x66, FSUB, "fsub", Plain},
 /* 0x67 */ {0x67, DSUB, "dsub", Plain},
 /* 0x68 */ {0x68, IMUL, "imul", Plain},
 /* 0x69 */ {0x69, LMUL, "lmul", Plain},
 /* 0x6a */ {0x6a, FMUL, "fmul", Plain},
 /* 0x6b */ {0x6b, DMUL, "dmul", Plain},
 /* 0x6c */ {0x6c, IDIV, "idiv", Plain},
 /* 0x6d */ {0x6d, LDIV, "ldiv", Plain},
 /* 0x6e */ {0x6e, FDIV, "fdiv", Plain},
 /* 0x6f */ {0x6f, DDIV, "ddiv", Plain},
 /* 0x70 */ {0x70, IREM, "irem", Plain},
 /* 0x71 */ {0x71, LREM, "lrem", Plain},
 /* 0x72 */ {0x72, FREM, "frem", Plain},
 /* 0x73 */ {0x73, DREM, "drem", Plain},
 /* 0x74 */ {0x74, INEG, "ineg", Plain},
 /* 0x75 */ {0x75, LNEG, "lneg", Plain},
 /* 0x76 */ {0x76, FNEG, "fneg", Plain},
 /* 0x77 */ {0x77, DNEG, "dneg", Plain},
 /* 0x78 */ {0x78, ISHL, "ishl", Plain},
 /* 0x79 */ {0x79, LSHL, "lshl", Plain},
 /* 0x7a */ {0x7a, ISHR, "ishr", Plain},
 /* 0x7b */ {0x7b, LSHR, "lshr", Plain},
 /* 0x7c */ {0x7c, IUSHR, "iushr", Plain},
 /* 0x7d */ {0x7d, LUSHR, "lushr", Plain},
 /* 0x7e */ {0x7e, IAND, "iand", Plain},
 /* 0x7f */ {0x7f, LAND, "land", Plain},
 /* 0x80 */ {0x80, IOR, "ior", Plain},
 /* 0x81 */ {0x81, LOR, "lor", Plain},
 /* 0x82 */ {0x82, IXOR, "ixor", Plain},
 /* 0x83 */ {0x83, LXOR, "lxor", Plain},
 /* 0x84 */ {0x84, IINC, "iinc", Iinc},
 /* 0x85 */ {0x85, I2L, "i2l", Plain},
 /* 0x86 */ {0x86, I2F, "i2f", Plain},
 /* 0x87 */ {0x87, I2D, "i2d", Plain},
 /* 0x88 */ {0x88, L2I, "l2i", Plain},
 /* 0x89 */ {0x89, L2F, "l2f", Plain},
 /* 0x8a */ {0x8a, L2D, "l2d", Plain},
 /* 0x8b */ {0x8b, F2I, "f2i", Plain},
 /* 0x8c */ {0x8c, F2L, "f2l", Plain},
 /* 0x8d */ {0x8d, F2D, "f2d", Plain},
 /* 0x8e */ {0x8e, D2I, "d2i", Plain},
 /* 0x8f */ {0x8f, D2L, "d2l", Plain},
 /* 0x90 */ {0x90, D2F, "d2f", Plain},
 /* 0x91 */ {0x91, I2B, "i2b", Plain},
 /* 0x92 */ {0x92, I2C, "i2c", Plain},
 /* 0x93 */ {0x93, I2S, "i2s", Plain},
 /* 0x94 */ {0x94, LCMP, "lcmp", Plain},
 /* 0x95 */ {0x95, FCMPL, "fcmpl", Plain},
 /* 0x96 */ {0x96, FCMPG, "fcmpg", Plain},
 /* 0x97 */ {0x97, DCMPL, "dcmpl", Plain},
 /* 0x98 */ {0x98, DCMPG, "dcmpg", Plain},
 /* 0x99 */ {0x99, IFEQ, "ifeq", Branch16},
 /* 0x9a */ {0x9a, IFNE, "ifne", Branch16},
 /* 0x9b */ {0x9b, IFLT, "iflt", Branch16},
 /* 0x9c */ {0x9c, IFGE, "ifge", Branch16},
 /* 0x9d */ {0x9d, IFGT, "ifgt", Branch16},
 /* 0x9e */ {0x9e, IFLE, "ifle", Branch16},
 /* 0x9f */ {0x9f, IF_ICMPEQ, "if_icmpeq", Branch16},
 /* 0xa0 */ {0xa0, IF_ICMPNE, "if_icmpne", Branch16},
 /* 0xa1 */ {0xa1, IF_ICMPLT, "if_icmplt", Branch16},
 /* 0xa2 */ {0xa2, IF_ICMPGE, "if_icmpge", Branch16},
 /* 0xa3 */ {0xa3, IF_ICMPGT, "if_icmpgt", Branch16},
 /* 0xa4 */ {0xa4, IF_ICMPLE, "if_icmple", Branch16},
 /* 0xa5 */ {0xa5, IF_ACMPEQ, "if_acmpeq", Branch16},
 /* 0xa6 */ {0xa6, IF_ACMPNE, "if_acmpne", Branch16},
 /* 0xa7 */ {0xa7, GOTO, "goto", Branch16},
 /* 0xa8 */ {0xa8, JSR, "jsr", Branch16},
 /* 0xa9 */ {0xa9, RET, "ret", Local},
 /* 0xaa */ {0xaa, TABLESWITCH, "tableswitch", TableSwitch},
 /* 0xab */ {0xab, LOOKUPSWITCH, "lookupswitch", LookupSwitch},
 /* 0xac */ {0xac, IRETURN, "ireturn", Plain},
 /* 0xad */ {0xad, LRETURN, "lreturn", Plain},
 /* 0xae */ {0xae, FRETURN, "freturn", Plain},
 /* 0xaf */ {0xaf, DRETURN, "dreturn", Plain},
 /* 0xb0 */ {0xb0, ARETURN, "areturn", Plain},
 /* 0xb1 */ {0xb1, RETURN, "return", Plain},
 /* 0xb2 */ {0xb2, GETSTATIC, "getstatic", Pool16},
 /* 0xb3 */ {0xb3, PUTSTATIC, "putstatic", Pool16},
 /* 0xb4 */ {0xb4, GETFIELD, "getfield", Pool16},
 /* 0xb5 */ {0xb5, PUTFIELD, "putfield", Pool16},
 /* 0xb6 */ {0xb6, INVOKEVIRTUAL, "invokevirtual", Pool16},
 /* 0xb7 */ {0xb7, INVOKESPECIAL, "invokespecial", Pool16},
 /* 0xb8 */ {0xb8, INVOKESTATIC, "invokestatic", Pool16},
 /* 0xb9 */ {0xb9, INVOKEINTERFACE, "invokeinterface", PoolCount},
 /* 0xba */ {0xba, INVOKEDYNAMIC, "invokedynamic", PoolZero2},
 /* 0xbb */ {0xbb, NEW, "new", Pool16},
 /* 0xbc */ {0xbc, NEWARRAY, "newarray", NewArray},
 /* 0xbd */ {0xbd, ANEWARRAY, "anewarray", Pool16},
 /* 0xbe */ {0xbe, ARRAYLENGTH, "arraylength", Plain},
 /* 0xbf */ {0xbf, ATHROW, "athrow", Plain},
 /* 0xc0 */ {0xc0, CHECKCAST, "checkcast", Pool16},
 /* 0xc1 */ {0xc1, INSTANCEOF, "instanceof", Pool16},
 /* 0xc2 */ {0xc2, MONITORENTER, "monitorenter", Plain},
 /* 0xc3 */ {0xc3, MONITOREXIT, "monitorexit", Plain},
 /* 0xc4 */ {0xc4, WIDE, "wide", Wide},
 /* 0xc5 */ {0xc5, MULTIANEWARRAY, "multianewarray", MultiArray},
 /* 0xc6 */ {0xc6, IFNULL, "ifnull", Branch16},
 /* 0xc7 */ {0xc7, IFNONNULL, "ifnonnull", Branch16},
 /* 0xc8 */ {0xc8, GOTO_W, "goto_w", Branch32},
 /* 0xc9 */ {0xc9, JSR_W, "jsr_w", Branch32},
 /* 0xca */ {0xca, BREAKPOINT, "breakpoint", Plain},
 /* 0xfe */ {0xfe, IMPDEP1, "impdep1", Plain},
 /* 0xff */ {0xff, IMPDEP2, "impdep2", Plain},
);

impl Opcode {
    pub const fn mnemonic(self) -> &'static str {
        self.desc().mnemonic
    }

    pub const fn format(self) -> Format {
        self.desc().format
    }

    pub fn is_invoke(self) -> bool {
        self.mnemonic().starts_with("invoke")
    }

    /// The `ldc` forms whose operand can reference a `ClassRef`.
    pub fn is_ldc(self) -> bool {
        matches!(self, Opcode::LDC | Opcode::LDC_W)
    }
}

/// Decodes the instruction starting at `offset` within `code`.
///
/// The offset matters beyond addressing: `tableswitch` and `lookupswitch`
/// pad to a 4-byte boundary relative to the start of the code array.
pub fn decode(code: &[u8], offset: u32) -> Result<Insn> {
    let at = offset as usize;
    if at >= code.len() {
        return lint_err!(TruncatedFile);
    }
    let byte = code[at];
    let Some(opcode) = Opcode::from_byte(byte) else {
        return Ok(Insn {
            opcode: None,
            byte,
            offset,
            size: 1,
            operand: Operand::None,
        });
    };

    let mut r = ByteReader::new(&code[at + 1..]);
    let operand = match opcode.format() {
        Format::Plain => Operand::None,
        Format::Local => Operand::Local(r.u8()? as u16),
        Format::Imm8 => Operand::Imm(r.i8()? as i32),
        Format::Imm16 => Operand::Imm(r.i16()? as i32),
        Format::Pool8 => Operand::Pool(r.u8()? as u16),
        Format::Pool16 => Operand::Pool(r.u16()?),
        Format::PoolCount => {
            let index = r.u16()?;
            let count = r.u8()?;
            r.u8()?;
            Operand::PoolCount { index, count }
        }
        Format::PoolZero2 => {
            let index = r.u16()?;
            r.u16()?;
            Operand::Pool(index)
        }
        Format::Branch16 => Operand::Branch(r.i16()? as i32),
        Format::Branch32 => Operand::Branch(r.i32()?),
        Format::Iinc => Operand::Iinc {
            index: r.u8()? as u16,
            delta: r.i8()? as i32,
        },
        Format::NewArray => Operand::ArrayType(r.u8()?),
        Format::MultiArray => Operand::MultiArray {
            index: r.u16()?,
            dims: r.u8()?,
        },
        Format::TableSwitch => read_table_switch(&mut r, offset)?,
        Format::LookupSwitch => read_lookup_switch(&mut r, offset)?,
        Format::Wide => read_wide(&mut r)?,
    };

    Ok(Insn {
        opcode: Some(opcode),
        byte,
        offset,
        size: 1 + r.pos() as u32,
        operand,
    })
}

/// Zero padding to the next 4-byte boundary after the opcode byte.
fn skip_switch_padding(
    r: &mut ByteReader<'_>,
    insn: &'static str,
    offset: u32,
) -> Result<()> {
    let pad = (4 - ((offset + 1) & 3)) & 3;
    for b in r.bytes(pad as usize)? {
        if *b != 0 {
            return lint_err!(BadSwitchPadding { insn, offset });
        }
    }
    Ok(())
}

fn read_table_switch(r: &mut ByteReader<'_>, offset: u32) -> Result<Operand> {
    skip_switch_padding(r, "tableswitch", offset)?;
    let default = r.i32()?;
    let low = r.i32()?;
    let high = r.i32()?;
    if high < low {
        return lint_err!(BadSwitchBounds { offset, low, high });
    }
    let count = (high as i64 - low as i64 + 1) as usize;
    let mut jumps = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        jumps.push(r.i32()?);
    }
    Ok(Operand::TableSwitch {
        default,
        low,
        high,
        jumps,
    })
}

fn read_lookup_switch(r: &mut ByteReader<'_>, offset: u32) -> Result<Operand> {
    skip_switch_padding(r, "lookupswitch", offset)?;
    let default = r.i32()?;
    let npairs = r.u32()? as usize;
    let mut pairs = Vec::with_capacity(npairs.min(4096));
    for _ in 0..npairs {
        pairs.push((r.i32()?, r.i32()?));
    }
    Ok(Operand::LookupSwitch { default, pairs })
}

fn read_wide(r: &mut ByteReader<'_>) -> Result<Operand> {
    let inner = Opcode::from_byte(r.u8()?);
    let index = r.u16()?;
    let constant = if inner == Some(Opcode::IINC) {
        Some(r.i16()?)
    } else {
        None
    };
    Ok(Operand::Wide {
        inner,
        index,
        constant,
    })
}

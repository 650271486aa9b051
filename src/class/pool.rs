use super::reader::ByteReader;
use crate::{lint_err, Result};

// JVMS table 4.4-A. Tags 15-18 (method handles, invokedynamic) are out of
// scope for this analysis; classes using them fail to parse and are skipped
// by the loader.
const TAG_UTF8: u8 = 1;
const TAG_INTEGER: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_LONG: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_CLASS: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_FIELDREF: u8 = 9;
const TAG_METHODREF: u8 = 10;
const TAG_INTERFACE_METHODREF: u8 = 11;
const TAG_NAME_AND_TYPE: u8 = 12;

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    ClassRef(u16),
    StringRef(u16),
    FieldRef { class: u16, name_and_type: u16 },
    MethodRef { class: u16, name_and_type: u16 },
    InterfaceMethodRef { class: u16, name_and_type: u16 },
    NameAndType { name: u16, descriptor: u16 },
    /// Index 0 and the slot after every `Long`/`Double`.
    Reserved,
}

impl Constant {
    /// Number of pool slots this entry occupies.
    fn slots(&self) -> u16 {
        match self {
            Constant::Long(_) | Constant::Double(_) => 2,
            _ => 1,
        }
    }
}

/// The class file constant pool, indexed from 1 as the JVM does.
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    pub fn parse(reader: &mut ByteReader<'_>, count: u16) -> Result<ConstantPool> {
        let mut entries = Vec::with_capacity(count as usize);
        entries.push(Constant::Reserved);
        let mut index = 1u16;
        while index < count {
            let constant = read_constant(reader, index)?;
            let slots = constant.slots();
            entries.push(constant);
            if slots == 2 {
                entries.push(Constant::Reserved);
            }
            index += slots;
        }
        Ok(ConstantPool { entries })
    }

    /// Total slot count, including index 0; equals `constant_pool_count`
    /// when every two-slot entry is fully materialized.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    pub fn get(&self, index: u16) -> Result<&Constant> {
        match self.entries.get(index as usize) {
            Some(c) if index > 0 => Ok(c),
            _ => lint_err!(PoolIndexError {
                index,
                max: self.entries.len(),
                item_ty: "constant",
            }),
        }
    }

    pub fn utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Constant::Utf8(s) => Ok(s),
            _ => lint_err!(UnexpectedConstant {
                index,
                expected: "Utf8",
            }),
        }
    }

    /// Resolves a `ClassRef` entry to the internal class name it references.
    pub fn class_name(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Constant::ClassRef(name) => self.utf8(*name),
            _ => lint_err!(UnexpectedConstant {
                index,
                expected: "ClassRef",
            }),
        }
    }

    pub fn name_and_type(&self, index: u16) -> Result<(&str, &str)> {
        match self.get(index)? {
            Constant::NameAndType { name, descriptor } => {
                Ok((self.utf8(*name)?, self.utf8(*descriptor)?))
            }
            _ => lint_err!(UnexpectedConstant {
                index,
                expected: "NameAndType",
            }),
        }
    }

    /// Iterator over `(index, entry)` pairs, reserved slots included.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Constant)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, c)| (i as u16, c))
    }
}

fn read_constant(reader: &mut ByteReader<'_>, index: u16) -> Result<Constant> {
    let tag = reader.u8()?;
    Ok(match tag {
        TAG_UTF8 => {
            let len = reader.u16()? as usize;
            let bytes = reader.bytes(len)?;
            // Identifiers never hit the corners where MUTF-8 and UTF-8
            // disagree, so a lossy decode is sufficient here.
            Constant::Utf8(String::from_utf8_lossy(bytes).into_owned())
        }
        TAG_INTEGER => Constant::Integer(reader.i32()?),
        TAG_FLOAT => Constant::Float(reader.f32()?),
        TAG_LONG => Constant::Long(reader.i64()?),
        TAG_DOUBLE => Constant::Double(reader.f64()?),
        TAG_CLASS => Constant::ClassRef(reader.u16()?),
        TAG_STRING => Constant::StringRef(reader.u16()?),
        TAG_FIELDREF => Constant::FieldRef {
            class: reader.u16()?,
            name_and_type: reader.u16()?,
        },
        TAG_METHODREF => Constant::MethodRef {
            class: reader.u16()?,
            name_and_type: reader.u16()?,
        },
        TAG_INTERFACE_METHODREF => Constant::InterfaceMethodRef {
            class: reader.u16()?,
            name_and_type: reader.u16()?,
        },
        TAG_NAME_AND_TYPE => Constant::NameAndType {
            name: reader.u16()?,
            descriptor: reader.u16()?,
        },
        _ => return lint_err!(UnknownConstantTag { tag, index }),
    })
}

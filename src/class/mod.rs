//! Decoder for the JVM `.class` binary format: constant pool, access
//! tables, fields, methods, attributes, annotations, and bytecode.

use std::collections::HashMap;

pub mod attribute;
pub mod code;
pub mod insn;
pub mod pool;
pub mod reader;

pub use attribute::{Annotation, Attribute, ElementValue};
pub use code::Code;
pub use insn::{Insn, Opcode, Operand};
pub use pool::{Constant, ConstantPool};
pub use reader::ByteReader;

use crate::{lint_err, Result};

const CLASS_MAGIC: u32 = 0xCAFE_BABE;

pub struct Field {
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<Attribute>,
}

pub struct Method {
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<Attribute>,
    /// Decoded `Code` attribute; absent for abstract and native methods.
    pub code: Option<Code>,
}

impl Field {
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.attributes
            .iter()
            .filter_map(|a| a.annotations.as_deref())
            .flatten()
    }
}

impl Method {
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.attributes
            .iter()
            .filter_map(|a| a.annotations.as_deref())
            .flatten()
    }

    pub fn parameter_annotations(&self) -> Option<&[Vec<Annotation>]> {
        self.attributes
            .iter()
            .find_map(|a| a.parameter_annotations.as_deref())
    }
}

/// Fully parsed class file. The raw buffer is consumed during parsing and
/// not retained; everything here is owned.
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: u16,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub attributes: Vec<Attribute>,
    /// Every `ClassRef` in the pool, keyed by internal name.
    pub classes: HashMap<String, u16>,
    /// Method indices by simple name; overloads share an entry.
    pub methods_by_name: HashMap<String, Vec<usize>>,
}

impl ClassFile {
    pub fn parse(data: &[u8]) -> Result<ClassFile> {
        let mut r = ByteReader::new(data);
        if r.u32()? != CLASS_MAGIC {
            return lint_err!(BadFileMagic);
        }
        let minor_version = r.u16()?;
        let major_version = r.u16()?;
        let constant_pool_count = r.u16()?;
        let constant_pool = ConstantPool::parse(&mut r, constant_pool_count)?;

        let mut classes = HashMap::new();
        for (index, constant) in constant_pool.iter() {
            if let Constant::ClassRef(name) = constant {
                classes.insert(constant_pool.utf8(*name)?.to_string(), index);
            }
        }

        let access_flags = r.u16()?;
        let this_class = r.u16()?;
        let super_class = r.u16()?;

        let interface_count = r.u16()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            interfaces.push(r.u16()?);
        }

        let field_count = r.u16()?;
        let mut fields = Vec::with_capacity(field_count as usize);
        for _ in 0..field_count {
            let access_flags = r.u16()?;
            let name_index = r.u16()?;
            let descriptor_index = r.u16()?;
            let attribute_count = r.u16()?;
            let attributes = attribute::read_attributes(&mut r, attribute_count, &constant_pool)?;
            fields.push(Field {
                access_flags,
                name_index,
                descriptor_index,
                attributes,
            });
        }

        let method_count = r.u16()?;
        let mut methods = Vec::with_capacity(method_count as usize);
        let mut methods_by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for index in 0..method_count as usize {
            let access_flags = r.u16()?;
            let name_index = r.u16()?;
            let descriptor_index = r.u16()?;
            let attribute_count = r.u16()?;
            let attributes = attribute::read_attributes(&mut r, attribute_count, &constant_pool)?;
            let code = find_code(&attributes, &constant_pool)?;
            methods_by_name
                .entry(constant_pool.utf8(name_index)?.to_string())
                .or_default()
                .push(index);
            methods.push(Method {
                access_flags,
                name_index,
                descriptor_index,
                attributes,
                code,
            });
        }

        let attribute_count = r.u16()?;
        let attributes = attribute::read_attributes(&mut r, attribute_count, &constant_pool)?;

        Ok(ClassFile {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
            classes,
            methods_by_name,
        })
    }

    pub fn this_class_name(&self) -> Result<&str> {
        self.constant_pool.class_name(self.this_class)
    }

    pub fn super_class_name(&self) -> Result<&str> {
        self.constant_pool.class_name(self.super_class)
    }

    pub fn method_name(&self, method: &Method) -> Result<&str> {
        self.constant_pool.utf8(method.name_index)
    }

    pub fn method_descriptor(&self, method: &Method) -> Result<&str> {
        self.constant_pool.utf8(method.descriptor_index)
    }

    pub fn field_descriptor(&self, field: &Field) -> Result<&str> {
        self.constant_pool.utf8(field.descriptor_index)
    }

    pub fn methods_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Method> {
        self.methods_by_name
            .get(name)
            .into_iter()
            .flatten()
            .map(move |&index| &self.methods[index])
    }

    /// Whether the pool references `name` through any `ClassRef`.
    pub fn has_class_ref(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }
}

fn find_code(attributes: &[Attribute], pool: &ConstantPool) -> Result<Option<Code>> {
    for attribute in attributes {
        if pool.utf8(attribute.name_index)? == attribute::ATTR_CODE {
            return Ok(Some(Code::parse(&attribute.info, pool)?));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PoolBuilder {
        bytes: Vec<u8>,
        count: u16,
    }

    impl PoolBuilder {
        fn new() -> PoolBuilder {
            PoolBuilder {
                bytes: Vec::new(),
                count: 1,
            }
        }

        fn utf8(&mut self, s: &str) -> u16 {
            self.bytes.push(1);
            self.bytes.extend_from_slice(&(s.len() as u16).to_be_bytes());
            self.bytes.extend_from_slice(s.as_bytes());
            self.count += 1;
            self.count - 1
        }

        fn class(&mut self, name_index: u16) -> u16 {
            self.bytes.push(7);
            self.bytes.extend_from_slice(&name_index.to_be_bytes());
            self.count += 1;
            self.count - 1
        }
    }

    fn minimal_class() -> Vec<u8> {
        let mut pool = PoolBuilder::new();
        let this_name = pool.utf8("com/example/Main");
        let this_class = pool.class(this_name);
        let super_name = pool.utf8("java/lang/Object");
        let super_class = pool.class(super_name);
        let main_name = pool.utf8("main");
        let main_desc = pool.utf8("([Ljava/lang/String;)V");
        let code_name = pool.utf8("Code");

        let mut out = Vec::new();
        out.extend_from_slice(&CLASS_MAGIC.to_be_bytes());
        out.extend_from_slice(&[0, 0, 0, 52]); // minor 0, major 52
        out.extend_from_slice(&pool.count.to_be_bytes());
        out.extend(&pool.bytes);
        out.extend_from_slice(&0x0021u16.to_be_bytes()); // access flags
        out.extend_from_slice(&this_class.to_be_bytes());
        out.extend_from_slice(&super_class.to_be_bytes());
        out.extend_from_slice(&[0, 0]); // interfaces
        out.extend_from_slice(&[0, 0]); // fields
        out.extend_from_slice(&[0, 1]); // methods
        out.extend_from_slice(&0x0009u16.to_be_bytes());
        out.extend_from_slice(&main_name.to_be_bytes());
        out.extend_from_slice(&main_desc.to_be_bytes());
        out.extend_from_slice(&[0, 1]); // one attribute: Code
        out.extend_from_slice(&code_name.to_be_bytes());
        let code_body: &[u8] = &[0xb1]; // return
        let mut info = Vec::new();
        info.extend_from_slice(&[0, 1, 0, 1]); // max_stack, max_locals
        info.extend_from_slice(&(code_body.len() as u32).to_be_bytes());
        info.extend_from_slice(code_body);
        info.extend_from_slice(&[0, 0, 0, 0]); // exceptions, attributes
        out.extend_from_slice(&(info.len() as u32).to_be_bytes());
        out.extend(info);
        out.extend_from_slice(&[0, 0]); // class attributes
        out
    }

    #[test]
    fn test_parse_minimal_class() {
        let class = ClassFile::parse(&minimal_class()).unwrap();
        assert_eq!(class.major_version, 52);
        assert_eq!(class.this_class_name().unwrap(), "com/example/Main");
        assert_eq!(class.super_class_name().unwrap(), "java/lang/Object");
        assert!(class.has_class_ref("com/example/Main"));
        assert!(class.has_class_ref("java/lang/Object"));

        let main = class.methods_named("main").next().unwrap();
        assert_eq!(
            class.method_descriptor(main).unwrap(),
            "([Ljava/lang/String;)V"
        );
        let code = main.code.as_ref().unwrap();
        assert_eq!(code.insns.len(), 1);
        assert_eq!(code.insns[0].opcode, Some(Opcode::RETURN));
    }

    #[test]
    fn test_pool_len_matches_count() {
        let data = minimal_class();
        let class = ClassFile::parse(&data).unwrap();
        // slot count read from the header equals materialized pool length
        let count = u16::from_be_bytes([data[8], data[9]]);
        assert_eq!(class.constant_pool.len(), count as usize);
    }

    #[test]
    fn test_bad_magic() {
        let mut data = minimal_class();
        data[0] = 0xCB;
        assert!(matches!(
            ClassFile::parse(&data),
            Err(crate::error::LintError::BadFileMagic)
        ));
    }

    #[test]
    fn test_truncated_class() {
        let data = minimal_class();
        assert!(ClassFile::parse(&data[..data.len() - 6]).is_err());
    }
}

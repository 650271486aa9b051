use super::pool::ConstantPool;
use super::reader::ByteReader;
use crate::descriptor::FieldType;
use crate::{lint_err, Result};

pub const ATTR_CODE: &str = "Code";
pub const ATTR_RUNTIME_VISIBLE_ANNOTATIONS: &str = "RuntimeVisibleAnnotations";
pub const ATTR_RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS: &str =
    "RuntimeVisibleParameterAnnotations";

/// A raw attribute plus structural overlays for the two annotation
/// attributes this analysis cares about. Everything else stays as bytes.
pub struct Attribute {
    pub name_index: u16,
    pub info: Vec<u8>,
    pub annotations: Option<Vec<Annotation>>,
    pub parameter_annotations: Option<Vec<Vec<Annotation>>>,
}

pub struct Annotation {
    /// The annotation's type, parsed from its field descriptor.
    pub ty: FieldType,
    /// `(element_name_index, value)` pairs in declaration order.
    pub pairs: Vec<(u16, ElementValue)>,
}

/// Annotation element value, keyed by the one-byte tag grammar
/// `B C D F I J S Z s e c [ @`.
pub enum ElementValue {
    /// Primitive or string constant; `index` points into the pool.
    Const { tag: u8, index: u16 },
    Enum { type_name: u16, const_name: u16 },
    Class(u16),
    Nested(Box<Annotation>),
    Array(Vec<ElementValue>),
}

impl Annotation {
    pub fn is_type(&self, internal_name: &str) -> bool {
        self.ty.class_name() == Some(internal_name)
    }

    /// The annotation's first element when it is a string constant, the
    /// shape `@Named("tag")` stores its value in.
    pub fn string_value<'p>(&self, pool: &'p ConstantPool) -> Option<&'p str> {
        match self.pairs.first() {
            Some((_, ElementValue::Const { tag: b's', index })) => pool.utf8(*index).ok(),
            _ => None,
        }
    }
}

/// Reads `count` attributes from the cursor, decoding annotation overlays
/// where the attribute name calls for them.
pub fn read_attributes(
    reader: &mut ByteReader<'_>,
    count: u16,
    pool: &ConstantPool,
) -> Result<Vec<Attribute>> {
    let mut attributes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name_index = reader.u16()?;
        let length = reader.u32()? as usize;
        let info = reader.bytes(length)?.to_vec();

        let mut annotations = None;
        let mut parameter_annotations = None;
        match pool.utf8(name_index)? {
            ATTR_RUNTIME_VISIBLE_ANNOTATIONS => {
                let mut r = ByteReader::new(&info);
                annotations = Some(read_annotations(&mut r, pool)?);
            }
            ATTR_RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS => {
                let mut r = ByteReader::new(&info);
                parameter_annotations = Some(read_parameter_annotations(&mut r, pool)?);
            }
            _ => {}
        }

        attributes.push(Attribute {
            name_index,
            info,
            annotations,
            parameter_annotations,
        });
    }
    Ok(attributes)
}

fn read_annotations(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
) -> Result<Vec<Annotation>> {
    let count = reader.u16()?;
    let mut annotations = Vec::with_capacity(count as usize);
    for _ in 0..count {
        annotations.push(read_annotation(reader, pool)?);
    }
    Ok(annotations)
}

/// Parameter index order is preserved; parameters without annotations
/// still occupy their slot.
fn read_parameter_annotations(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
) -> Result<Vec<Vec<Annotation>>> {
    let num_params = reader.u8()?;
    let mut parameters = Vec::with_capacity(num_params as usize);
    for _ in 0..num_params {
        parameters.push(read_annotations(reader, pool)?);
    }
    Ok(parameters)
}

fn read_annotation(reader: &mut ByteReader<'_>, pool: &ConstantPool) -> Result<Annotation> {
    let type_index = reader.u16()?;
    let (ty, _) = FieldType::parse(pool.utf8(type_index)?)?;
    let num_pairs = reader.u16()?;
    let mut pairs = Vec::with_capacity(num_pairs as usize);
    for _ in 0..num_pairs {
        let element_name = reader.u16()?;
        let value = read_element_value(reader, pool)?;
        pairs.push((element_name, value));
    }
    Ok(Annotation { ty, pairs })
}

fn read_element_value(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
) -> Result<ElementValue> {
    let tag = reader.u8()?;
    Ok(match tag {
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' => ElementValue::Const {
            tag,
            index: reader.u16()?,
        },
        b'e' => ElementValue::Enum {
            type_name: reader.u16()?,
            const_name: reader.u16()?,
        },
        b'c' => ElementValue::Class(reader.u16()?),
        b'@' => ElementValue::Nested(Box::new(read_annotation(reader, pool)?)),
        b'[' => {
            let count = reader.u16()?;
            let mut values = Vec::with_capacity(count as usize);
            for _ in 0..count {
                values.push(read_element_value(reader, pool)?);
            }
            ElementValue::Array(values)
        }
        _ => return lint_err!(UnknownElementTag { tag }),
    })
}

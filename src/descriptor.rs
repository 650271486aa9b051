//! JVM type descriptor parsing: `Lpkg/Name;`, `[` array prefixes, the
//! single-letter primitives, and `(args)ret` method shapes.

use crate::{lint_err, Result};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Primitive {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
    Void,
}

impl Primitive {
    pub fn from_tag(tag: u8) -> Option<Primitive> {
        Some(match tag {
            b'B' => Primitive::Byte,
            b'C' => Primitive::Char,
            b'D' => Primitive::Double,
            b'F' => Primitive::Float,
            b'I' => Primitive::Int,
            b'J' => Primitive::Long,
            b'S' => Primitive::Short,
            b'Z' => Primitive::Boolean,
            b'V' => Primitive::Void,
            _ => return None,
        })
    }

    /// Internal name of the wrapper class Guice boxes this primitive to.
    pub fn boxed_name(self) -> Option<&'static str> {
        Some(match self {
            Primitive::Byte => "java/lang/Byte",
            Primitive::Char => "java/lang/Character",
            Primitive::Double => "java/lang/Double",
            Primitive::Float => "java/lang/Float",
            Primitive::Int => "java/lang/Integer",
            Primitive::Long => "java/lang/Long",
            Primitive::Short => "java/lang/Short",
            Primitive::Boolean => "java/lang/Boolean",
            Primitive::Void => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Object(String),
    Primitive(Primitive),
    Array { dims: usize, element: Box<FieldType> },
}

impl FieldType {
    /// Parses one type at the front of `s`, returning it with the number
    /// of bytes consumed.
    pub fn parse(s: &str) -> Result<(FieldType, usize)> {
        let bytes = s.as_bytes();
        match bytes.first() {
            Some(b'L') => match s.find(';') {
                Some(end) => Ok((FieldType::Object(s[1..end].to_string()), end + 1)),
                None => lint_err!(BadDescriptor, s.to_string()),
            },
            Some(b'[') => {
                let dims = bytes.iter().take_while(|b| **b == b'[').count();
                let (element, consumed) = FieldType::parse(&s[dims..])?;
                Ok((
                    FieldType::Array {
                        dims,
                        element: Box::new(element),
                    },
                    dims + consumed,
                ))
            }
            Some(tag) => match Primitive::from_tag(*tag) {
                Some(p) => Ok((FieldType::Primitive(p), 1)),
                None => lint_err!(BadDescriptor, s.to_string()),
            },
            None => lint_err!(BadDescriptor, s.to_string()),
        }
    }

    /// The internal class name of an object type, `None` otherwise.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            FieldType::Object(name) => Some(name),
            _ => None,
        }
    }

    /// The class name a Guice binding for this type resolves to: object
    /// types name themselves, primitives box. Arrays have no binding name.
    pub fn binding_name(&self) -> Option<&str> {
        match self {
            FieldType::Object(name) => Some(name),
            FieldType::Primitive(p) => p.boxed_name(),
            // TODO(resolver): array-typed bindings are not modeled.
            FieldType::Array { .. } => None,
        }
    }

    /// The class name an injected field of this type demands. Arrays of
    /// objects demand their element class.
    pub fn demand_name(&self) -> Option<&str> {
        match self {
            FieldType::Object(name) => Some(name),
            FieldType::Array { element, .. } => element.demand_name(),
            FieldType::Primitive(_) => None,
        }
    }
}

/// Splits a `(args)ret` method descriptor into argument and return types.
pub fn parse_method(s: &str) -> Result<(Vec<FieldType>, FieldType)> {
    let inner = s
        .strip_prefix('(')
        .and_then(|rest| rest.split_once(')'));
    let Some((args, ret)) = inner else {
        return lint_err!(BadDescriptor, s.to_string());
    };

    let mut arguments = Vec::new();
    let mut rest = args;
    while !rest.is_empty() {
        let (ty, consumed) = FieldType::parse(rest)?;
        arguments.push(ty);
        rest = &rest[consumed..];
    }
    let (ret_ty, consumed) = FieldType::parse(ret)?;
    if consumed != ret.len() {
        // trailing bytes after the return type
        return lint_err!(BadDescriptor, s.to_string());
    }
    Ok((arguments, ret_ty))
}

/// The binding name of a method descriptor's return type, boxing
/// primitives, as `@Provides` enumeration needs it.
pub fn return_binding_name(descriptor: &str) -> Option<String> {
    let (_, ret) = parse_method(descriptor).ok()?;
    ret.binding_name().map(str::to_string)
}

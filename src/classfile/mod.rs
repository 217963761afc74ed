//! Binary class-file parsing.
//!
//! A class file is parsed in a single pass into a flat list of typed records
//! (constant-pool classes and descriptors, supertypes, member descriptors,
//! generic signatures, annotations). A separate pure function in [`extract`]
//! maps those records to the set of referenced class names. There is no
//! visitor hierarchy; the records are plain data.

mod attributes;
mod constant_pool;
pub mod extract;
mod reader;

pub use attributes::{Annotation, ElementValue};
pub use extract::{ExtractedClass, ExtractionStats, COUNTER_NOT_FOUND};

use constant_pool::{Constant, ConstantPool};
use reader::Reader;
use thiserror::Error;

const MAGIC: u32 = 0xCAFE_BABE;

#[derive(Debug, Error)]
pub enum ClassFileError {
    #[error("not a class file (bad magic)")]
    BadMagic,
    #[error("truncated class file at offset {0}")]
    Truncated(usize),
    #[error("invalid constant pool index {0}")]
    BadConstantIndex(u16),
    #[error("unknown constant pool tag {0}")]
    UnknownConstantTag(u8),
    #[error("unknown annotation element value tag {0}")]
    UnknownElementValueTag(u8),
}

/// A field or method, reduced to the pieces that can reference other classes.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    /// Internal names from the `Exceptions` attribute (methods only).
    pub exceptions: Vec<String>,
    pub annotations: Vec<Annotation>,
}

/// Flat structural view of one parsed class file.
///
/// All names are in internal (slash-separated) form exactly as stored.
#[derive(Debug)]
pub struct ClassFile {
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub signature: Option<String>,
    pub annotations: Vec<Annotation>,
    pub fields: Vec<Member>,
    pub methods: Vec<Member>,
    /// Every `CONSTANT_Class` entry in the pool. This catches references that
    /// no structural record carries, e.g. types used only in method bodies or
    /// via `Foo.class` literals.
    pub constant_classes: Vec<String>,
    /// Descriptors from `CONSTANT_NameAndType` and `CONSTANT_MethodType`
    /// entries, which embed further type references.
    pub constant_descriptors: Vec<String>,
}

impl ClassFile {
    /// Parse a complete class file. Any structural problem (truncation,
    /// out-of-range pool index, unknown tag) surfaces as an error so the
    /// caller can skip the class without aborting the batch.
    pub fn parse(bytes: &[u8]) -> Result<Self, ClassFileError> {
        let mut reader = Reader::new(bytes);

        if reader.read_u32()? != MAGIC {
            return Err(ClassFileError::BadMagic);
        }
        // minor, major
        reader.skip(4)?;

        let pool = ConstantPool::parse(&mut reader)?;

        // access_flags
        reader.skip(2)?;
        let this_class = pool.class_name(reader.read_u16()?)?.to_string();
        let super_index = reader.read_u16()?;
        let super_class = if super_index == 0 {
            None
        } else {
            Some(pool.class_name(super_index)?.to_string())
        };

        let interface_count = reader.read_u16()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            interfaces.push(pool.class_name(reader.read_u16()?)?.to_string());
        }

        let fields = parse_members(&mut reader, &pool)?;
        let methods = parse_members(&mut reader, &pool)?;

        let (signature, annotations) = parse_class_attributes(&mut reader, &pool)?;

        let mut constant_classes = Vec::new();
        let mut constant_descriptors = Vec::new();
        for entry in pool.entries() {
            match entry {
                Constant::Class { name_index } => {
                    constant_classes.push(pool.utf8(*name_index)?.to_string());
                }
                Constant::NameAndType { descriptor_index }
                | Constant::MethodType { descriptor_index } => {
                    constant_descriptors.push(pool.utf8(*descriptor_index)?.to_string());
                }
                _ => {}
            }
        }

        Ok(Self {
            this_class,
            super_class,
            interfaces,
            signature,
            annotations,
            fields,
            methods,
            constant_classes,
            constant_descriptors,
        })
    }
}

fn parse_members(
    reader: &mut Reader<'_>,
    pool: &ConstantPool,
) -> Result<Vec<Member>, ClassFileError> {
    let count = reader.read_u16()?;
    let mut members = Vec::with_capacity(count as usize);

    for _ in 0..count {
        // access_flags
        reader.skip(2)?;
        let name = pool.utf8(reader.read_u16()?)?.to_string();
        let descriptor = pool.utf8(reader.read_u16()?)?.to_string();

        let mut signature = None;
        let mut exceptions = Vec::new();
        let mut annotations = Vec::new();

        let attribute_count = reader.read_u16()?;
        for _ in 0..attribute_count {
            let attr_name = pool.utf8(reader.read_u16()?)?.to_string();
            let attr_len = reader.read_u32()? as usize;
            let body = reader.take(attr_len)?;
            let mut attr = Reader::new(body);

            match attr_name.as_str() {
                "Signature" => {
                    signature = Some(pool.utf8(attr.read_u16()?)?.to_string());
                }
                "Exceptions" => {
                    let exception_count = attr.read_u16()?;
                    for _ in 0..exception_count {
                        exceptions.push(pool.class_name(attr.read_u16()?)?.to_string());
                    }
                }
                "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
                    annotations.extend(attributes::parse_annotations(&mut attr, pool)?);
                }
                "RuntimeVisibleParameterAnnotations"
                | "RuntimeInvisibleParameterAnnotations" => {
                    annotations.extend(attributes::parse_parameter_annotations(&mut attr, pool)?);
                }
                _ => {}
            }
        }

        members.push(Member {
            name,
            descriptor,
            signature,
            exceptions,
            annotations,
        });
    }

    Ok(members)
}

fn parse_class_attributes(
    reader: &mut Reader<'_>,
    pool: &ConstantPool,
) -> Result<(Option<String>, Vec<Annotation>), ClassFileError> {
    let mut signature = None;
    let mut annotations = Vec::new();

    let attribute_count = reader.read_u16()?;
    for _ in 0..attribute_count {
        let attr_name = pool.utf8(reader.read_u16()?)?.to_string();
        let attr_len = reader.read_u32()? as usize;
        let body = reader.take(attr_len)?;
        let mut attr = Reader::new(body);

        match attr_name.as_str() {
            "Signature" => {
                signature = Some(pool.utf8(attr.read_u16()?)?.to_string());
            }
            "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
                annotations.extend(attributes::parse_annotations(&mut attr, pool)?);
            }
            _ => {}
        }
    }

    Ok((signature, annotations))
}

use super::constant_pool::ConstantPool;
use super::reader::Reader;
use super::ClassFileError;

/// A parsed annotation with the element values that can carry class
/// references (nested annotations, enum constants, class literals, arrays).
#[derive(Debug, Clone)]
pub struct Annotation {
    /// Field descriptor of the annotation type, e.g. `Lcom/example/Tag;`.
    pub type_descriptor: String,
    pub values: Vec<ElementValue>,
}

#[derive(Debug, Clone)]
pub enum ElementValue {
    /// Primitive or string constant - no class reference.
    Const,
    /// Enum constant: the enum type's field descriptor.
    Enum { type_descriptor: String },
    /// Class literal: a field or void descriptor.
    Class { descriptor: String },
    Annotation(Annotation),
    Array(Vec<ElementValue>),
}

/// Parse a `RuntimeVisibleAnnotations` / `RuntimeInvisibleAnnotations`
/// attribute body.
pub fn parse_annotations(
    reader: &mut Reader<'_>,
    pool: &ConstantPool,
) -> Result<Vec<Annotation>, ClassFileError> {
    let count = reader.read_u16()?;
    let mut annotations = Vec::with_capacity(count as usize);
    for _ in 0..count {
        annotations.push(parse_annotation(reader, pool)?);
    }
    Ok(annotations)
}

/// Parse a `RuntimeVisibleParameterAnnotations` /
/// `RuntimeInvisibleParameterAnnotations` attribute body, flattened over all
/// parameters.
pub fn parse_parameter_annotations(
    reader: &mut Reader<'_>,
    pool: &ConstantPool,
) -> Result<Vec<Annotation>, ClassFileError> {
    let num_parameters = reader.read_u8()?;
    let mut annotations = Vec::new();
    for _ in 0..num_parameters {
        annotations.extend(parse_annotations(reader, pool)?);
    }
    Ok(annotations)
}

fn parse_annotation(
    reader: &mut Reader<'_>,
    pool: &ConstantPool,
) -> Result<Annotation, ClassFileError> {
    let type_index = reader.read_u16()?;
    let type_descriptor = pool.utf8(type_index)?.to_string();

    let num_pairs = reader.read_u16()?;
    let mut values = Vec::with_capacity(num_pairs as usize);
    for _ in 0..num_pairs {
        // element name
        reader.skip(2)?;
        values.push(parse_element_value(reader, pool)?);
    }

    Ok(Annotation {
        type_descriptor,
        values,
    })
}

fn parse_element_value(
    reader: &mut Reader<'_>,
    pool: &ConstantPool,
) -> Result<ElementValue, ClassFileError> {
    let tag = reader.read_u8()?;
    match tag {
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' => {
            reader.skip(2)?;
            Ok(ElementValue::Const)
        }
        b'e' => {
            let type_name_index = reader.read_u16()?;
            // const name
            reader.skip(2)?;
            Ok(ElementValue::Enum {
                type_descriptor: pool.utf8(type_name_index)?.to_string(),
            })
        }
        b'c' => {
            let class_info_index = reader.read_u16()?;
            Ok(ElementValue::Class {
                descriptor: pool.utf8(class_info_index)?.to_string(),
            })
        }
        b'@' => Ok(ElementValue::Annotation(parse_annotation(reader, pool)?)),
        b'[' => {
            let len = reader.read_u16()?;
            let mut values = Vec::with_capacity(len as usize);
            for _ in 0..len {
                values.push(parse_element_value(reader, pool)?);
            }
            Ok(ElementValue::Array(values))
        }
        other => Err(ClassFileError::UnknownElementValueTag(other)),
    }
}

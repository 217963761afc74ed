use super::reader::Reader;
use super::ClassFileError;

/// One parsed constant pool entry.
///
/// Only the pieces the reference extractor needs are retained: class name
/// indices and descriptor indices. Numeric and string constants carry no
/// class references and are parsed purely to keep the cursor aligned.
#[derive(Debug, Clone)]
pub enum Constant {
    Utf8(String),
    Class { name_index: u16 },
    NameAndType { descriptor_index: u16 },
    MethodType { descriptor_index: u16 },
    /// Integer, Float, String, Fieldref, Methodref, MethodHandle, Module,
    /// Package, Dynamic - nothing to extract beyond what Class/NameAndType
    /// entries already cover.
    Other,
    /// Long and Double occupy two pool slots; the second is a placeholder.
    Padding,
}

/// The constant pool, indexed 1..count as the JVM spec numbers it.
#[derive(Debug)]
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    pub fn parse(reader: &mut Reader<'_>) -> Result<Self, ClassFileError> {
        let count = reader.read_u16()?;
        let mut entries = Vec::with_capacity(count as usize);
        // Index 0 is unused by the format.
        entries.push(Constant::Padding);

        let mut index = 1;
        while index < count {
            let tag = reader.read_u8()?;
            let entry = match tag {
                // CONSTANT_Utf8
                1 => {
                    let len = reader.read_u16()? as usize;
                    let bytes = reader.take(len)?;
                    Constant::Utf8(decode_modified_utf8(bytes))
                }
                // CONSTANT_Integer, CONSTANT_Float
                3 | 4 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                // CONSTANT_Long, CONSTANT_Double (two slots)
                5 | 6 => {
                    reader.skip(8)?;
                    entries.push(Constant::Other);
                    index += 1;
                    Constant::Padding
                }
                // CONSTANT_Class
                7 => Constant::Class {
                    name_index: reader.read_u16()?,
                },
                // CONSTANT_String
                8 => {
                    reader.skip(2)?;
                    Constant::Other
                }
                // CONSTANT_Fieldref, CONSTANT_Methodref, CONSTANT_InterfaceMethodref
                9 | 10 | 11 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                // CONSTANT_NameAndType
                12 => {
                    reader.skip(2)?;
                    Constant::NameAndType {
                        descriptor_index: reader.read_u16()?,
                    }
                }
                // CONSTANT_MethodHandle
                15 => {
                    reader.skip(3)?;
                    Constant::Other
                }
                // CONSTANT_MethodType
                16 => Constant::MethodType {
                    descriptor_index: reader.read_u16()?,
                },
                // CONSTANT_Dynamic, CONSTANT_InvokeDynamic
                17 | 18 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                // CONSTANT_Module, CONSTANT_Package
                19 | 20 => {
                    reader.skip(2)?;
                    Constant::Other
                }
                other => return Err(ClassFileError::UnknownConstantTag(other)),
            };
            entries.push(entry);
            index += 1;
        }

        Ok(Self { entries })
    }

    pub fn get(&self, index: u16) -> Result<&Constant, ClassFileError> {
        self.entries
            .get(index as usize)
            .ok_or(ClassFileError::BadConstantIndex(index))
    }

    /// Resolve a Utf8 entry.
    pub fn utf8(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.get(index)? {
            Constant::Utf8(s) => Ok(s),
            _ => Err(ClassFileError::BadConstantIndex(index)),
        }
    }

    /// Resolve a Class entry to its internal (slash-separated) name.
    pub fn class_name(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.get(index)? {
            Constant::Class { name_index } => self.utf8(*name_index),
            _ => Err(ClassFileError::BadConstantIndex(index)),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &Constant> {
        self.entries.iter()
    }
}

/// Decode the JVM's modified UTF-8. Class names and descriptors are ASCII in
/// practice; the 0xC0 0x80 NUL encoding and encoded surrogate pairs are
/// tolerated by lossy replacement rather than rejected.
fn decode_modified_utf8(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

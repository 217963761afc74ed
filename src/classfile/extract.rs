//! Mapping from parsed class-file records to referenced class names.

use super::{Annotation, ClassFile, ClassFileError, ElementValue};
use crate::class_name::ClassName;
use std::collections::BTreeSet;

/// Counter value meaning "the owning location could not be found at all",
/// as opposed to zero things visited.
pub const COUNTER_NOT_FOUND: i64 = -1;

/// Diagnostic counters for one analysis run. Owned by the analyzer and reset
/// with it; never process-wide state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub types: i64,
    pub fields: i64,
    pub methods: i64,
    pub annotations: i64,
}

impl ExtractionStats {
    /// Sentinel stats for an output location that does not exist.
    pub fn not_found() -> Self {
        Self {
            types: COUNTER_NOT_FOUND,
            fields: COUNTER_NOT_FOUND,
            methods: COUNTER_NOT_FOUND,
            annotations: COUNTER_NOT_FOUND,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.types == COUNTER_NOT_FOUND
    }

    /// Fold another class's counters into this run's totals. A sentinel on
    /// either side wins: "nothing found" is not the same as "nothing visited".
    pub fn merge(&mut self, other: &Self) {
        if self.is_not_found() || other.is_not_found() {
            *self = Self::not_found();
            return;
        }
        self.types += other.types;
        self.fields += other.fields;
        self.methods += other.methods;
        self.annotations += other.annotations;
    }
}

/// One project class and every class it symbolically references.
#[derive(Debug)]
pub struct ExtractedClass {
    pub name: ClassName,
    pub references: BTreeSet<ClassName>,
}

/// Extract all class names referenced by one class file: constant pool,
/// supertypes, member descriptors, generic signatures, throws clauses, and
/// annotation types/values. Primitives, array dimensions, and
/// `java.lang.Object` never appear in the result.
pub fn extract_references(
    bytes: &[u8],
    stats: &mut ExtractionStats,
) -> Result<ExtractedClass, ClassFileError> {
    let class = ClassFile::parse(bytes)?;
    stats.types += 1;

    let mut refs = BTreeSet::new();

    if let Some(super_class) = &class.super_class {
        add_internal_name(super_class, &mut refs);
    }
    for interface in &class.interfaces {
        add_internal_name(interface, &mut refs);
    }
    if let Some(signature) = &class.signature {
        add_signature_classes(signature, &mut refs);
    }
    collect_annotations(&class.annotations, &mut refs, stats);

    for name in &class.constant_classes {
        add_internal_name(name, &mut refs);
    }
    for descriptor in &class.constant_descriptors {
        add_descriptor_classes(descriptor, &mut refs);
    }

    for field in &class.fields {
        stats.fields += 1;
        add_descriptor_classes(&field.descriptor, &mut refs);
        if let Some(signature) = &field.signature {
            add_signature_classes(signature, &mut refs);
        }
        collect_annotations(&field.annotations, &mut refs, stats);
    }

    for method in &class.methods {
        stats.methods += 1;
        add_descriptor_classes(&method.descriptor, &mut refs);
        if let Some(signature) = &method.signature {
            add_signature_classes(signature, &mut refs);
        }
        for exception in &method.exceptions {
            add_internal_name(exception, &mut refs);
        }
        collect_annotations(&method.annotations, &mut refs, stats);
    }

    let name = ClassName::new(&class.this_class);
    refs.remove(&name);

    Ok(ExtractedClass {
        name,
        references: refs,
    })
}

fn collect_annotations(
    annotations: &[Annotation],
    refs: &mut BTreeSet<ClassName>,
    stats: &mut ExtractionStats,
) {
    for annotation in annotations {
        stats.annotations += 1;
        add_descriptor_classes(&annotation.type_descriptor, refs);
        for value in &annotation.values {
            collect_element_value(value, refs, stats);
        }
    }
}

fn collect_element_value(
    value: &ElementValue,
    refs: &mut BTreeSet<ClassName>,
    stats: &mut ExtractionStats,
) {
    match value {
        ElementValue::Const => {}
        ElementValue::Enum { type_descriptor } => add_descriptor_classes(type_descriptor, refs),
        ElementValue::Class { descriptor } => add_descriptor_classes(descriptor, refs),
        ElementValue::Annotation(inner) => {
            collect_annotations(std::slice::from_ref(inner), refs, stats);
        }
        ElementValue::Array(values) => {
            for value in values {
                collect_element_value(value, refs, stats);
            }
        }
    }
}

/// Record an internal class name from the constant pool or a supertype slot.
/// Constant pool Class entries may hold array descriptors (`[Lcom/Foo;`),
/// whose element type is what counts; primitive arrays name no class.
fn add_internal_name(name: &str, refs: &mut BTreeSet<ClassName>) {
    if let Some(element) = name.strip_prefix('[') {
        let element = element.trim_start_matches('[');
        if let Some(stripped) = element.strip_prefix('L') {
            add_class(stripped.trim_end_matches(';'), refs);
        }
    } else {
        add_class(name, refs);
    }
}

/// Collect every `L<name>;` reference type in a field or method descriptor.
fn add_descriptor_classes(descriptor: &str, refs: &mut BTreeSet<ClassName>) {
    let bytes = descriptor.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'L' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end] != b';' {
                end += 1;
            }
            add_class(&descriptor[start..end], refs);
            i = end + 1;
        } else {
            i += 1;
        }
    }
}

/// Collect reference types embedded in a generic signature. Signatures differ
/// from descriptors: a leading `<...>` section declares type parameters with
/// class/interface bounds, a class type may carry type arguments
/// (`Lcom/Map<...>;`), type variable uses appear as `TT;`, and inner classes
/// follow as `.Inner;`. Bounds and type arguments are real class references;
/// type-variable uses and bare inner-class suffixes are not.
fn add_signature_classes(signature: &str, refs: &mut BTreeSet<ClassName>) {
    let bytes = signature.as_bytes();
    let mut i = 0;
    if bytes.first() == Some(&b'<') {
        i = scan_formal_type_parameters(signature, refs);
    }
    while i < bytes.len() {
        match bytes[i] {
            b'L' | b'T' | b'[' => i = scan_type(signature, i, refs),
            _ => i += 1,
        }
    }
}

/// `<Ident:classbound(:ifacebound)*...>`; the class bound may be empty
/// (`<T::Lcom/Iface;>`). Returns the index past the closing `>`.
fn scan_formal_type_parameters(signature: &str, refs: &mut BTreeSet<ClassName>) -> usize {
    let bytes = signature.as_bytes();
    let mut i = 1;
    while i < bytes.len() && bytes[i] != b'>' {
        // parameter name
        while i < bytes.len() && bytes[i] != b':' {
            i += 1;
        }
        while i < bytes.len() && bytes[i] == b':' {
            i += 1;
            if matches!(bytes.get(i), Some(b'L' | b'T' | b'[')) {
                i = scan_type(signature, i, refs);
            }
        }
    }
    i + 1
}

/// One field-type signature starting at `i`: records the classes it names and
/// returns the index just past it.
fn scan_type(signature: &str, mut i: usize, refs: &mut BTreeSet<ClassName>) -> usize {
    let bytes = signature.as_bytes();
    match bytes.get(i) {
        Some(b'[') => scan_type(signature, i + 1, refs),
        // type-variable use, no class reference
        Some(b'T') => {
            while i < bytes.len() && bytes[i] != b';' {
                i += 1;
            }
            i + 1
        }
        Some(b'L') => {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && !matches!(bytes[end], b';' | b'<' | b'.') {
                end += 1;
            }
            add_class(&signature[start..end], refs);
            i = end;
            loop {
                match bytes.get(i) {
                    Some(b'<') => {
                        i += 1;
                        while i < bytes.len() && bytes[i] != b'>' {
                            match bytes[i] {
                                b'L' | b'T' | b'[' => i = scan_type(signature, i, refs),
                                // wildcards and their variance markers
                                _ => i += 1,
                            }
                        }
                        i += 1;
                    }
                    // inner-class suffix; the outer type is already recorded
                    // and the suffix alone is not a full name
                    Some(b'.') => {
                        i += 1;
                        while i < bytes.len() && !matches!(bytes[i], b';' | b'<' | b'.') {
                            i += 1;
                        }
                    }
                    Some(b';') => return i + 1,
                    _ => return i,
                }
            }
        }
        // primitive descriptor character
        Some(_) => i + 1,
        None => i,
    }
}

fn add_class(internal_name: &str, refs: &mut BTreeSet<ClassName>) {
    if internal_name.is_empty() || internal_name == "java/lang/Object" {
        return;
    }
    refs.insert(ClassName::new(internal_name));
}

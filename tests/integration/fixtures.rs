//! Shared builders for synthesizing class files, jars and resolution files.
#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;

/// Minimal but valid class-file builder: constant pool, supertypes, and
/// member descriptors. Enough surface for reference extraction; no code
/// attributes are emitted.
pub struct ClassFileBuilder {
    constants: Vec<u8>,
    constant_count: u16,
    this_class: u16,
    super_class: u16,
    interfaces: Vec<u16>,
    fields: Vec<(u16, u16)>,
    methods: Vec<(u16, u16)>,
}

impl ClassFileBuilder {
    pub fn new(this_class: &str) -> Self {
        let mut builder = Self {
            constants: Vec::new(),
            constant_count: 0,
            this_class: 0,
            super_class: 0,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        };
        builder.this_class = builder.class(this_class);
        builder.super_class = builder.class("java/lang/Object");
        builder
    }

    /// Internal (slash-separated) name of the superclass.
    pub fn extends(mut self, name: &str) -> Self {
        self.super_class = self.class(name);
        self
    }

    pub fn implements(mut self, name: &str) -> Self {
        let index = self.class(name);
        self.interfaces.push(index);
        self
    }

    /// Add a field with the given descriptor, e.g. `Lcom/example/Foo;`.
    pub fn field(mut self, name: &str, descriptor: &str) -> Self {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        self.fields.push((name, descriptor));
        self
    }

    /// Add a method with the given descriptor, e.g. `(Lcom/a/B;)V`.
    pub fn method(mut self, name: &str, descriptor: &str) -> Self {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        self.methods.push((name, descriptor));
        self
    }

    /// Add a bare `CONSTANT_Class` entry, the shape left by method-body-only
    /// references and `Foo.class` literals.
    pub fn references(mut self, name: &str) -> Self {
        self.class(name);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes()); // minor
        out.extend_from_slice(&52u16.to_be_bytes()); // major (Java 8)

        out.extend_from_slice(&(self.constant_count + 1).to_be_bytes());
        out.extend_from_slice(&self.constants);

        out.extend_from_slice(&0x0021u16.to_be_bytes()); // ACC_PUBLIC | ACC_SUPER
        out.extend_from_slice(&self.this_class.to_be_bytes());
        out.extend_from_slice(&self.super_class.to_be_bytes());

        out.extend_from_slice(&(self.interfaces.len() as u16).to_be_bytes());
        for interface in &self.interfaces {
            out.extend_from_slice(&interface.to_be_bytes());
        }

        for members in [&self.fields, &self.methods] {
            out.extend_from_slice(&(members.len() as u16).to_be_bytes());
            for (name, descriptor) in members.iter() {
                out.extend_from_slice(&0x0001u16.to_be_bytes()); // ACC_PUBLIC
                out.extend_from_slice(&name.to_be_bytes());
                out.extend_from_slice(&descriptor.to_be_bytes());
                out.extend_from_slice(&0u16.to_be_bytes()); // attributes_count
            }
        }

        out.extend_from_slice(&0u16.to_be_bytes()); // class attributes_count
        out
    }

    fn utf8(&mut self, text: &str) -> u16 {
        self.constants.push(1); // CONSTANT_Utf8
        self.constants
            .extend_from_slice(&(text.len() as u16).to_be_bytes());
        self.constants.extend_from_slice(text.as_bytes());
        self.constant_count += 1;
        self.constant_count
    }

    fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        self.constants.push(7); // CONSTANT_Class
        self.constants.extend_from_slice(&name_index.to_be_bytes());
        self.constant_count += 1;
        self.constant_count
    }
}

/// Write compiled classes into a directory tree, internal names as paths.
pub fn write_class_dir(root: &Path, classes: &[(&str, Vec<u8>)]) {
    for (internal_name, bytes) in classes {
        let path = root.join(format!("{internal_name}.class"));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, bytes).unwrap();
    }
}

/// Write a jar whose `.class` entries carry stub bodies. Dependency jars are
/// only enumerated, never parsed, so the bodies do not matter.
pub fn write_stub_jar(path: &Path, class_names: &[&str]) {
    let file = std::fs::File::create(path).unwrap();
    let mut jar = zip::ZipWriter::new(file);
    for name in class_names {
        jar.start_file(format!("{name}.class"), FileOptions::default())
            .unwrap();
        jar.write_all(b"stub").unwrap();
    }
    jar.finish().unwrap();
}

/// One dependency line for a resolution YAML file.
pub struct ResolutionDep {
    pub coordinate: String,
    pub scope: String,
    pub origin: String,
    pub file: Option<PathBuf>,
    pub children: Vec<String>,
}

impl ResolutionDep {
    pub fn new(coordinate: &str, origin: &str) -> Self {
        Self {
            coordinate: coordinate.to_string(),
            scope: "compile".to_string(),
            origin: origin.to_string(),
            file: None,
            children: Vec::new(),
        }
    }

    pub fn scope(mut self, scope: &str) -> Self {
        self.scope = scope.to_string();
        self
    }

    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn child(mut self, coordinate: &str) -> Self {
        self.children.push(coordinate.to_string());
        self
    }
}

/// Render and write a resolution YAML file.
pub fn write_resolution(path: &Path, project: &str, dependencies: &[ResolutionDep]) {
    let mut out = format!("project: \"{project}\"\ndependencies:\n");
    for dep in dependencies {
        out.push_str(&format!("  - coordinate: \"{}\"\n", dep.coordinate));
        out.push_str(&format!("    scope: \"{}\"\n", dep.scope));
        out.push_str(&format!("    origin: {}\n", dep.origin));
        if let Some(file) = &dep.file {
            out.push_str(&format!("    file: \"{}\"\n", file.display()));
        }
        if !dep.children.is_empty() {
            let children: Vec<String> = dep
                .children
                .iter()
                .map(|child| format!("\"{child}\""))
                .collect();
            out.push_str(&format!("    children: [{}]\n", children.join(", ")));
        }
    }
    std::fs::write(path, out).unwrap();
}

//! Test support: assembles synthetic class files and JAR archives so the
//! analysis can run end-to-end without fixtures on disk.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;

use guicelint::archive::{internal_name, JarFile};
use guicelint::loader::ClassLoader;
use guicelint::resolve::{Binding, Resolver};

pub const OBJECT: &str = "java/lang/Object";
pub const ABSTRACT_MODULE: &str = "com/google/inject/AbstractModule";
pub const GUICE: &str = "com/google/inject/Guice";
pub const INJECTOR: &str = "com/google/inject/Injector";
pub const BINDING_BUILDER: &str = "com/google/inject/binder/AnnotatedBindingBuilder";
pub const INJECT: &str = "com/google/inject/Inject";
pub const PROVIDES: &str = "com/google/inject/Provides";
pub const NAMED: &str = "com/google/inject/name/Named";

/// Annotation to attach: a bare marker or one with a string `value`.
#[derive(Clone, Copy)]
pub enum Anno {
    Marker(&'static str),
    Str(&'static str, &'static str),
}

/// Emits a class file little by little: constant pool entries are interned
/// on demand while code snippets and members are assembled.
pub struct ClassBuilder {
    pool_bytes: Vec<u8>,
    pool_next: u16,
    utf8s: HashMap<String, u16>,
    classes: HashMap<String, u16>,
    this_class: u16,
    super_class: u16,
    field_count: u16,
    fields: Vec<u8>,
    method_count: u16,
    methods: Vec<u8>,
}

impl ClassBuilder {
    pub fn new(this_class: &str, super_class: &str) -> ClassBuilder {
        let mut builder = ClassBuilder {
            pool_bytes: Vec::new(),
            pool_next: 1,
            utf8s: HashMap::new(),
            classes: HashMap::new(),
            this_class: 0,
            super_class: 0,
            field_count: 0,
            fields: Vec::new(),
            method_count: 0,
            methods: Vec::new(),
        };
        builder.this_class = builder.class(this_class);
        builder.super_class = builder.class(super_class);
        builder
    }

    pub fn utf8(&mut self, s: &str) -> u16 {
        if let Some(&index) = self.utf8s.get(s) {
            return index;
        }
        self.pool_bytes.push(1);
        self.pool_bytes
            .extend_from_slice(&(s.len() as u16).to_be_bytes());
        self.pool_bytes.extend_from_slice(s.as_bytes());
        let index = self.pool_next;
        self.pool_next += 1;
        self.utf8s.insert(s.to_string(), index);
        index
    }

    pub fn class(&mut self, name: &str) -> u16 {
        if let Some(&index) = self.classes.get(name) {
            return index;
        }
        let name_index = self.utf8(name);
        self.pool_bytes.push(7);
        self.pool_bytes.extend_from_slice(&name_index.to_be_bytes());
        let index = self.pool_next;
        self.pool_next += 1;
        self.classes.insert(name.to_string(), index);
        index
    }

    pub fn string(&mut self, value: &str) -> u16 {
        let value_index = self.utf8(value);
        self.pool_bytes.push(8);
        self.pool_bytes.extend_from_slice(&value_index.to_be_bytes());
        let index = self.pool_next;
        self.pool_next += 1;
        index
    }

    fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        self.pool_bytes.push(12);
        self.pool_bytes.extend_from_slice(&name_index.to_be_bytes());
        self.pool_bytes
            .extend_from_slice(&descriptor_index.to_be_bytes());
        let index = self.pool_next;
        self.pool_next += 1;
        index
    }

    fn member_ref(&mut self, tag: u8, owner: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(owner);
        let nat_index = self.name_and_type(name, descriptor);
        self.pool_bytes.push(tag);
        self.pool_bytes.extend_from_slice(&class_index.to_be_bytes());
        self.pool_bytes.extend_from_slice(&nat_index.to_be_bytes());
        let index = self.pool_next;
        self.pool_next += 1;
        index
    }

    // -- code snippets

    pub fn ldc_class(&mut self, name: &str) -> Vec<u8> {
        let index = self.class(name);
        assert!(index <= u8::MAX as u16, "pool too large for ldc");
        vec![0x12, index as u8]
    }

    pub fn ldc_w_class(&mut self, name: &str) -> Vec<u8> {
        let index = self.class(name).to_be_bytes();
        vec![0x13, index[0], index[1]]
    }

    pub fn ldc_string(&mut self, value: &str) -> Vec<u8> {
        let index = self.string(value);
        assert!(index <= u8::MAX as u16, "pool too large for ldc");
        vec![0x12, index as u8]
    }

    pub fn invokevirtual(&mut self, owner: &str, name: &str, descriptor: &str) -> Vec<u8> {
        let index = self.member_ref(10, owner, name, descriptor).to_be_bytes();
        vec![0xb6, index[0], index[1]]
    }

    pub fn invokespecial(&mut self, owner: &str, name: &str, descriptor: &str) -> Vec<u8> {
        let index = self.member_ref(10, owner, name, descriptor).to_be_bytes();
        vec![0xb7, index[0], index[1]]
    }

    pub fn invokestatic(&mut self, owner: &str, name: &str, descriptor: &str) -> Vec<u8> {
        let index = self.member_ref(10, owner, name, descriptor).to_be_bytes();
        vec![0xb8, index[0], index[1]]
    }

    pub fn invokeinterface(&mut self, owner: &str, name: &str, descriptor: &str) -> Vec<u8> {
        let index = self.member_ref(11, owner, name, descriptor).to_be_bytes();
        vec![0xb9, index[0], index[1], 1, 0]
    }

    pub fn new_instance(&mut self, name: &str) -> Vec<u8> {
        let index = self.class(name).to_be_bytes();
        vec![0xbb, index[0], index[1]]
    }

    // -- members

    pub fn method(&mut self, name: &str, descriptor: &str, code: Vec<u8>) {
        self.method_full(name, descriptor, Some(code), &[], None);
    }

    pub fn method_full(
        &mut self,
        name: &str,
        descriptor: &str,
        code: Option<Vec<u8>>,
        annotations: &[Anno],
        parameter_annotations: Option<&[Vec<Anno>]>,
    ) {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        let mut attributes: Vec<Vec<u8>> = Vec::new();
        if let Some(code) = code {
            attributes.push(self.code_attribute(&code));
        }
        if !annotations.is_empty() {
            attributes.push(self.annotations_attribute(annotations));
        }
        if let Some(params) = parameter_annotations {
            attributes.push(self.parameter_annotations_attribute(params));
        }

        self.methods.extend_from_slice(&0x0001u16.to_be_bytes());
        self.methods.extend_from_slice(&name_index.to_be_bytes());
        self.methods
            .extend_from_slice(&descriptor_index.to_be_bytes());
        self.methods
            .extend_from_slice(&(attributes.len() as u16).to_be_bytes());
        for attribute in attributes {
            self.methods.extend(attribute);
        }
        self.method_count += 1;
    }

    pub fn field(&mut self, name: &str, descriptor: &str, annotations: &[Anno]) {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        let mut attributes: Vec<Vec<u8>> = Vec::new();
        if !annotations.is_empty() {
            attributes.push(self.annotations_attribute(annotations));
        }

        self.fields.extend_from_slice(&0x0002u16.to_be_bytes());
        self.fields.extend_from_slice(&name_index.to_be_bytes());
        self.fields
            .extend_from_slice(&descriptor_index.to_be_bytes());
        self.fields
            .extend_from_slice(&(attributes.len() as u16).to_be_bytes());
        for attribute in attributes {
            self.fields.extend(attribute);
        }
        self.field_count += 1;
    }

    fn attribute(&mut self, name: &str, info: Vec<u8>) -> Vec<u8> {
        let name_index = self.utf8(name);
        let mut out = Vec::new();
        out.extend_from_slice(&name_index.to_be_bytes());
        out.extend_from_slice(&(info.len() as u32).to_be_bytes());
        out.extend(info);
        out
    }

    fn code_attribute(&mut self, code: &[u8]) -> Vec<u8> {
        let mut info = Vec::new();
        info.extend_from_slice(&[0, 8, 0, 8]); // max_stack, max_locals
        info.extend_from_slice(&(code.len() as u32).to_be_bytes());
        info.extend_from_slice(code);
        info.extend_from_slice(&[0, 0, 0, 0]); // exceptions, attributes
        self.attribute("Code", info)
    }

    fn annotation_bytes(&mut self, annotation: Anno) -> Vec<u8> {
        let mut out = Vec::new();
        match annotation {
            Anno::Marker(name) => {
                let type_index = self.utf8(&format!("L{};", name));
                out.extend_from_slice(&type_index.to_be_bytes());
                out.extend_from_slice(&[0, 0]);
            }
            Anno::Str(name, value) => {
                let type_index = self.utf8(&format!("L{};", name));
                let element_name = self.utf8("value");
                let value_index = self.utf8(value);
                out.extend_from_slice(&type_index.to_be_bytes());
                out.extend_from_slice(&[0, 1]);
                out.extend_from_slice(&element_name.to_be_bytes());
                out.push(b's');
                out.extend_from_slice(&value_index.to_be_bytes());
            }
        }
        out
    }

    fn annotations_attribute(&mut self, annotations: &[Anno]) -> Vec<u8> {
        let mut info = Vec::new();
        info.extend_from_slice(&(annotations.len() as u16).to_be_bytes());
        for annotation in annotations {
            let bytes = self.annotation_bytes(*annotation);
            info.extend(bytes);
        }
        self.attribute("RuntimeVisibleAnnotations", info)
    }

    fn parameter_annotations_attribute(&mut self, parameters: &[Vec<Anno>]) -> Vec<u8> {
        let mut info = vec![parameters.len() as u8];
        for parameter in parameters {
            info.extend_from_slice(&(parameter.len() as u16).to_be_bytes());
            for annotation in parameter {
                let bytes = self.annotation_bytes(*annotation);
                info.extend(bytes);
            }
        }
        self.attribute("RuntimeVisibleParameterAnnotations", info)
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&[0, 0, 0, 52]); // minor, major
        out.extend_from_slice(&self.pool_next.to_be_bytes());
        out.extend(self.pool_bytes);
        out.extend_from_slice(&0x0021u16.to_be_bytes());
        out.extend_from_slice(&self.this_class.to_be_bytes());
        out.extend_from_slice(&self.super_class.to_be_bytes());
        out.extend_from_slice(&[0, 0]); // interfaces
        out.extend_from_slice(&self.field_count.to_be_bytes());
        out.extend(self.fields);
        out.extend_from_slice(&self.method_count.to_be_bytes());
        out.extend(self.methods);
        out.extend_from_slice(&[0, 0]); // class attributes
        out
    }
}

/// A constructor that chains to the superclass and returns.
pub fn default_ctor(builder: &mut ClassBuilder, super_class: &str) {
    let mut code = vec![0x2a]; // aload_0
    code.extend(builder.invokespecial(super_class, "<init>", "()V"));
    code.push(0xb1);
    builder.method("<init>", "()V", code);
}

/// `main` that bootstraps an injector over `module` and requests
/// `get_instance_of` from it.
pub fn main_class(module: &str, get_instance_of: &str) -> Vec<u8> {
    let mut builder = ClassBuilder::new("com/example/Main", OBJECT);
    let mut code = Vec::new();
    code.extend(builder.new_instance(module));
    code.push(0x59); // dup
    code.extend(builder.invokespecial(module, "<init>", "()V"));
    code.extend(builder.invokestatic(
        GUICE,
        "createInjector",
        "([Lcom/google/inject/Module;)Lcom/google/inject/Injector;",
    ));
    code.extend(builder.ldc_class(get_instance_of));
    code.extend(builder.invokevirtual(
        INJECTOR,
        "getInstance",
        "(Ljava/lang/Class;)Ljava/lang/Object;",
    ));
    code.push(0x57); // pop
    code.push(0xb1); // return
    builder.method("main", "([Ljava/lang/String;)V", code);
    builder.build()
}

/// Packs classes under their internal names plus a manifest naming the
/// entry point.
pub fn build_jar(main_class_dotted: &str, classes: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer
        .start_file("META-INF/MANIFEST.MF", options)
        .unwrap();
    write!(
        writer,
        "Manifest-Version: 1.0\nMain-Class: {}\n",
        main_class_dotted
    )
    .unwrap();
    for (name, data) in classes {
        writer
            .start_file(format!("{}.class", name), options)
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Runs the whole pipeline over an in-memory archive.
pub fn analyze(jar_bytes: Vec<u8>) -> guicelint::Result<Vec<Binding>> {
    let mut jar = JarFile::from_reader(Cursor::new(jar_bytes))?;
    let main = jar.main_class()?;
    let entry_class = internal_name(&main);
    let mut loader = ClassLoader::new(jar);
    Resolver::new(&mut loader).analyze(&entry_class)
}

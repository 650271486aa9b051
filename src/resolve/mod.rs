//! Binding resolution: walks bytecode from the program entry point,
//! discovers installed Guice modules, enumerates providers and injection
//! demands, and closes the demand set transitively over `@Inject`.

use std::collections::{BTreeSet, HashSet};
use std::io::{Read, Seek};
use std::rc::Rc;

use crate::archive::class_entry_name;
use crate::class::{Annotation, ClassFile, Constant, ConstantPool, Insn, Method, Operand};
use crate::descriptor::{self, FieldType};
use crate::loader::ClassLoader;
use crate::{lint_err, Result};

pub mod report;

pub const ABSTRACT_MODULE: &str = "com/google/inject/AbstractModule";
pub const INJECTOR_GET_INSTANCE: &str = "com/google/inject/Injector.getInstance";
pub const BINDING_BUILDER_TO: &str = "com/google/inject/binder/AnnotatedBindingBuilder.to";
pub const BINDING_BUILDER_TO_INSTANCE: &str =
    "com/google/inject/binder/AnnotatedBindingBuilder.toInstance";
pub const PROVIDES_ANNOTATION: &str = "com/google/inject/Provides";
pub const INJECT_ANNOTATION: &str = "com/google/inject/Inject";
pub const NAMED_ANNOTATION: &str = "com/google/inject/name/Named";

const GUICE_PREFIX: &str = "com/google/inject";
const JDK_PREFIX: &str = "java";
const ENTRY_METHOD: &str = "main";

/// A requested type plus optional `@Named` qualifier. Equality and
/// ordering are structural over `(class, named)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Binding {
    pub class: String,
    pub named: Option<String>,
}

impl Binding {
    pub fn unnamed(class: impl Into<String>) -> Binding {
        Binding {
            class: class.into(),
            named: None,
        }
    }

    pub fn named(class: impl Into<String>, tag: impl Into<String>) -> Binding {
        Binding {
            class: class.into(),
            named: Some(tag.into()),
        }
    }
}

/// The analysis driver. Owns no state beyond the loader borrow and the
/// generation bound; every run starts fresh.
pub struct Resolver<'a, R: Read + Seek> {
    loader: &'a mut ClassLoader<R>,
    depth: usize,
}

impl<'a, R: Read + Seek> Resolver<'a, R> {
    pub fn new(loader: &'a mut ClassLoader<R>) -> Resolver<'a, R> {
        Resolver::with_depth(loader, 3)
    }

    pub fn with_depth(loader: &'a mut ClassLoader<R>, depth: usize) -> Resolver<'a, R> {
        Resolver { loader, depth }
    }

    /// Runs the full analysis from `entry_class`'s `main` method(s) and
    /// returns the sorted set of unsatisfied demands.
    pub fn analyze(&mut self, entry_class: &str) -> Result<Vec<Binding>> {
        let Some(class) = self.loader.load(entry_class) else {
            return lint_err!(EntryMissing, class_entry_name(entry_class));
        };

        let mut unsatisfied = BTreeSet::new();
        let entry_methods = class
            .methods_by_name
            .get(ENTRY_METHOD)
            .cloned()
            .unwrap_or_default();
        for index in entry_methods {
            let (providers, injected) = self.providers_and_injected(&class, index)?;
            let provided: HashSet<Binding> = providers.into_iter().collect();
            unsatisfied.extend(injected.into_iter().filter(|b| !provided.contains(b)));
        }
        Ok(unsatisfied.into_iter().collect())
    }

    fn providers_and_injected(
        &mut self,
        class: &Rc<ClassFile>,
        method_index: usize,
    ) -> Result<(Vec<Binding>, Vec<Binding>)> {
        let method = &class.methods[method_index];
        let seed = format!(
            "{}.{}",
            class.this_class_name()?,
            class.method_name(method)?
        );

        // Phase 1: bounded call-graph generations from the entry method.
        let mut injected = Vec::new();
        let mut fanout: Vec<Vec<String>> = Vec::new();
        let mut frontier = vec![seed];
        for _ in 0..self.depth {
            let (called, demands) = self.called_from(&frontier);
            injected.extend(demands);
            frontier = called.clone();
            fanout.push(called);
        }
        let all_called: HashSet<String> = fanout.into_iter().flatten().collect();
        tracing::debug!("{} reachable call targets", all_called.len());

        // Phase 2: module discovery.
        let modules = self.find_modules(&all_called);

        // Phases 3 and 4: bindings and @Provides over the module worklist.
        let (mut providers, demands) = self.find_all_bindings(modules);
        injected.extend(demands);

        // Phase 5: transitive closure over @Inject.
        let (closure_providers, closed) = self.injected_closure(injected);
        providers.extend(closure_providers);
        Ok((providers, closed))
    }

    /// One call-graph generation: all `Class.method` targets invoked from
    /// the named methods, plus `getInstance` demands found along the way.
    fn called_from(&mut self, names: &[String]) -> (Vec<String>, Vec<Binding>) {
        let mut called = Vec::new();
        let mut injected = Vec::new();
        for name in names {
            let Some((class_name, method_name)) = name.split_once('.') else {
                continue;
            };
            let Some(class) = self.loader.load(class_name) else {
                continue;
            };
            let Some(indices) = class.methods_by_name.get(method_name) else {
                continue;
            };
            for &index in indices {
                let method = &class.methods[index];
                let direct = called_targets(&class, method);
                if direct.iter().any(|t| t == INJECTOR_GET_INSTANCE) {
                    injected.extend(instance_demands(&class, method));
                }
                called.extend(direct);
            }
        }
        (called, injected)
    }

    /// A called class is a module iff the invoked method exists on it and
    /// its direct superclass is `AbstractModule`. No transitive chains.
    fn find_modules(&mut self, all_called: &HashSet<String>) -> Vec<String> {
        let mut modules = Vec::new();
        for name in all_called {
            let Some((class_name, method_name)) = name.split_once('.') else {
                continue;
            };
            let Some(class) = self.loader.load(class_name) else {
                continue;
            };
            if !class.methods_by_name.contains_key(method_name) {
                continue;
            }
            if class.super_class_name().ok() == Some(ABSTRACT_MODULE) {
                tracing::debug!("module {}", class_name);
                modules.push(class_name.to_string());
            }
        }
        modules
    }

    /// Fixed point over the module worklist: `configure` bindings plus
    /// `@Provides` methods, with `install(...)` feeding the worklist.
    fn find_all_bindings(&mut self, modules: Vec<String>) -> (Vec<Binding>, Vec<Binding>) {
        let mut providers = Vec::new();
        let mut injected = Vec::new();
        let mut worklist = modules;
        let mut done = HashSet::new();
        while let Some(module) = worklist.pop() {
            if !done.insert(module.clone()) {
                continue;
            }
            let Some(class) = self.loader.load(&module) else {
                continue;
            };
            let configured = bindings_in_configure(&class);
            providers.extend(configured.providers);
            injected.extend(configured.injected);
            worklist.extend(configured.installed);
            providers.extend(provides_methods(&class));
        }
        (providers, injected)
    }

    /// Worklist closure over injection demands. Each demand is satisfied
    /// by a no-arg constructor or an `@Inject` constructor, whose own
    /// arguments and `@Inject` fields become fresh demands.
    fn injected_closure(&mut self, injected: Vec<Binding>) -> (Vec<Binding>, Vec<Binding>) {
        let mut providers = Vec::new();
        let mut reached = Vec::new();
        let mut done: HashSet<Binding> = HashSet::new();
        let mut todo = injected;
        while let Some(demand) = todo.pop() {
            if !done.insert(demand.clone()) {
                continue;
            }
            reached.push(demand.clone());
            let Some(class) = self.loader.load(&demand.class) else {
                continue;
            };
            if !class.has_class_ref(&demand.class) {
                continue;
            }

            let constructors: Vec<&Method> = class.methods_named("<init>").collect();
            if constructors
                .iter()
                .any(|m| class.method_descriptor(m).ok() == Some("()V"))
            {
                // Guice synthesizes the injection itself.
                providers.push(Binding::unnamed(demand.class.clone()));
                continue;
            }

            let mut found_inject = false;
            for method in &constructors {
                if !method.annotations().any(|a| a.is_type(INJECT_ANNOTATION)) {
                    continue;
                }
                found_inject = true;
                providers.push(Binding::unnamed(demand.class.clone()));
                if let Ok(descriptor) = class.method_descriptor(method) {
                    let args = argument_demands(
                        descriptor,
                        method.parameter_annotations(),
                        &class.constant_pool,
                    );
                    todo.extend(
                        args.into_iter()
                            .filter(|b| !b.class.starts_with(GUICE_PREFIX)),
                    );
                }
                break;
            }
            if !found_inject {
                continue;
            }
            let fields = self.injected_fields(&demand.class);
            todo.extend(fields);
        }
        (providers, reached)
    }

    /// `@Inject` field demands of a class and its non-JDK superclasses.
    fn injected_fields(&mut self, class_name: &str) -> Vec<Binding> {
        let Some(class) = self.loader.load(class_name) else {
            return Vec::new();
        };
        let mut needed = Vec::new();
        for field in &class.fields {
            let mut inject = false;
            let mut named = None;
            for annotation in field.annotations() {
                if annotation.is_type(INJECT_ANNOTATION) {
                    inject = true;
                } else if annotation.is_type(NAMED_ANNOTATION) {
                    named = annotation
                        .string_value(&class.constant_pool)
                        .map(str::to_string);
                }
            }
            if !inject {
                continue;
            }
            let Ok(descriptor) = class.field_descriptor(field) else {
                continue;
            };
            let Ok((ty, _)) = FieldType::parse(descriptor) else {
                continue;
            };
            if let Some(name) = ty.demand_name() {
                needed.push(Binding {
                    class: name.to_string(),
                    named,
                });
            }
        }
        match class.super_class_name() {
            Ok(super_name) if !super_name.starts_with(JDK_PREFIX) => {
                let super_name = super_name.to_string();
                needed.extend(self.injected_fields(&super_name));
            }
            _ => {}
        }
        needed
    }
}

/// What one module's `configure` bytecode declares.
struct ConfigureScan {
    providers: Vec<Binding>,
    injected: Vec<Binding>,
    /// Modules passed to `install(...)`, for the worklist.
    installed: Vec<String>,
}

fn bindings_in_configure(class: &ClassFile) -> ConfigureScan {
    let mut scan = ConfigureScan {
        providers: Vec::new(),
        injected: Vec::new(),
        installed: Vec::new(),
    };
    for method in class.methods_named("configure") {
        let Some(code) = &method.code else {
            continue;
        };
        let mut prev: Option<&Insn> = None;
        let mut bind: Option<String> = None;
        for insn in &code.insns {
            if let Some(target) = call_target(class, insn) {
                if target.ends_with(".install") {
                    if let Some(prev_target) = prev.and_then(|p| call_target(class, p)) {
                        if let Some(owner) = prev_target.split('.').next() {
                            scan.installed.push(owner.to_string());
                        }
                    }
                }
                if target.ends_with(".bind") {
                    if let Some(name) = ldc_class_ref(class, prev) {
                        bind = Some(name);
                    }
                }
                if target == BINDING_BUILDER_TO {
                    // No ldc -> .bind sequence seen yet: skip silently.
                    if let Some(bound) = &bind {
                        scan.providers.push(Binding::unnamed(bound.clone()));
                    }
                    if let Some(name) = ldc_class_ref(class, prev) {
                        scan.injected.push(Binding::unnamed(name));
                    }
                }
                if target == BINDING_BUILDER_TO_INSTANCE {
                    if let Some(bound) = &bind {
                        scan.providers.push(Binding::unnamed(bound.clone()));
                    }
                }
            }
            prev = Some(insn);
        }
    }
    scan
}

/// `(binding, named)` pairs for every `@Provides` method of a module.
fn provides_methods(class: &ClassFile) -> Vec<Binding> {
    let mut providers = Vec::new();
    for method in &class.methods {
        let mut provides = None;
        let mut named = None;
        for annotation in method.annotations() {
            if annotation.is_type(PROVIDES_ANNOTATION) {
                provides = class.method_descriptor(method).ok();
            } else if annotation.is_type(NAMED_ANNOTATION) {
                named = annotation
                    .string_value(&class.constant_pool)
                    .map(str::to_string);
            }
        }
        if let Some(descriptor) = provides {
            if let Some(name) = descriptor::return_binding_name(descriptor) {
                providers.push(Binding { class: name, named });
            }
        }
    }
    providers
}

/// All `Class.method` invocation targets in a method body.
fn called_targets(class: &ClassFile, method: &Method) -> Vec<String> {
    let Some(code) = &method.code else {
        return Vec::new();
    };
    code.insns
        .iter()
        .filter_map(|insn| call_target(class, insn))
        .collect()
}

/// Demands from `ldc Klass.class; invokevirtual Injector.getInstance`
/// sequences in a method body.
fn instance_demands(class: &ClassFile, method: &Method) -> Vec<Binding> {
    let Some(code) = &method.code else {
        return Vec::new();
    };
    let mut demands = Vec::new();
    let mut prev: Option<&Insn> = None;
    for insn in &code.insns {
        if call_target(class, insn).as_deref() == Some(INJECTOR_GET_INSTANCE) {
            if let Some(name) = ldc_class_ref(class, prev) {
                demands.push(Binding::unnamed(name));
            }
        }
        prev = Some(insn);
    }
    demands
}

/// Resolves an `invoke*` instruction to `owner_class.method_name`.
/// Anything that does not resolve cleanly is `None`, never an error.
pub fn call_target(class: &ClassFile, insn: &Insn) -> Option<String> {
    if !insn.is_invoke() {
        return None;
    }
    let index = insn.pool_index()?;
    let (class_index, nat_index) = match class.constant_pool.get(index).ok()? {
        Constant::MethodRef {
            class,
            name_and_type,
        }
        | Constant::InterfaceMethodRef {
            class,
            name_and_type,
        } => (*class, *name_and_type),
        _ => return None,
    };
    let owner = class.constant_pool.class_name(class_index).ok()?;
    let (name, _) = class.constant_pool.name_and_type(nat_index).ok()?;
    Some(format!("{}.{}", owner, name))
}

/// The one-step data-flow lookback: the class a preceding `ldc`/`ldc_w`
/// loads, when its operand is a `ClassRef`.
pub fn ldc_class_ref(class: &ClassFile, insn: Option<&Insn>) -> Option<String> {
    let insn = insn?;
    if !insn.opcode?.is_ldc() {
        return None;
    }
    let Operand::Pool(index) = insn.operand else {
        return None;
    };
    match class.constant_pool.get(index).ok()? {
        Constant::ClassRef(name) => class
            .constant_pool
            .utf8(*name)
            .ok()
            .map(str::to_string),
        _ => None,
    }
}

/// Demands for an `@Inject` constructor's arguments: object types always,
/// primitives only when `@Named` (boxed), arrays never.
fn argument_demands(
    descriptor: &str,
    parameter_annotations: Option<&[Vec<Annotation>]>,
    pool: &ConstantPool,
) -> Vec<Binding> {
    let Ok((args, _)) = descriptor::parse_method(descriptor) else {
        return Vec::new();
    };
    let mut demands = Vec::new();
    for (index, ty) in args.iter().enumerate() {
        let named = parameter_annotations
            .and_then(|params| params.get(index))
            .and_then(|annotations| annotations.iter().find(|a| a.is_type(NAMED_ANNOTATION)))
            .and_then(|a| a.string_value(pool))
            .map(str::to_string);
        match ty {
            FieldType::Object(name) => demands.push(Binding {
                class: name.clone(),
                named,
            }),
            _ if named.is_some() => {
                if let Some(boxed) = ty.binding_name() {
                    demands.push(Binding {
                        class: boxed.to_string(),
                        named,
                    });
                }
            }
            _ => {}
        }
    }
    demands
}

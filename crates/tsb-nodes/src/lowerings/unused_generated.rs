use crate::nodes::{
    ClassLikeNode, DocumentRootNode, HeritageNode, InterfaceNode, MemberNode, SourceSetNode, TopLevelNode,
    TypeParameterDefinitionNode,
};
use crate::types::{ParameterNode, TypeMeta, TypeNode};
use crate::visitor::{NodeLowering, NodeScope, walk_declarations};
use rustc_hash::FxHashSet;
use tracing::debug;
use tsb_common::{DiagnosticBag, Uid};

/// References to generated interfaces, by uid and, for references the
/// qualified-name pass could not attach, by name.
#[derive(Default)]
struct GeneratedUsage {
    uids: FxHashSet<Uid>,
    names: FxHashSet<String>,
}

impl GeneratedUsage {
    fn is_used(&self, interface: &InterfaceNode) -> bool {
        self.uids.contains(&interface.uid) || self.names.contains(interface.name.rightmost())
    }

    /// Scan every declaration under `root` except generated interfaces,
    /// which are collected into `generated` instead.
    fn root<'a>(&mut self, root: &'a DocumentRootNode, generated: &mut Vec<&'a InterfaceNode>) {
        for declaration in &root.declarations {
            match declaration {
                TopLevelNode::ClassLike(ClassLikeNode::Interface(interface)) if interface.generated => {
                    generated.push(interface);
                }
                TopLevelNode::Module(nested) => self.root(nested, generated),
                declaration => self.declaration(declaration),
            }
        }
    }

    fn declaration(&mut self, declaration: &TopLevelNode) {
        match declaration {
            TopLevelNode::ClassLike(ClassLikeNode::Class(class)) => {
                self.type_parameters(&class.type_parameters);
                self.heritages(&class.parent_entities);
                self.members(&class.members);
                if let Some(constructor) = &class.primary_constructor {
                    self.parameters(&constructor.parameters);
                }
            }
            TopLevelNode::ClassLike(ClassLikeNode::Interface(interface)) => self.interface(interface),
            TopLevelNode::ClassLike(ClassLikeNode::Enum(_)) => {}
            TopLevelNode::Object(object) => {
                self.heritages(&object.parent_entities);
                self.members(&object.members);
            }
            TopLevelNode::TypeAlias(alias) => {
                self.type_parameters(&alias.type_parameters);
                self.ty(&alias.type_reference);
            }
            TopLevelNode::Function(function) => {
                self.type_parameters(&function.type_parameters);
                self.parameters(&function.parameters);
                self.ty(&function.return_type);
            }
            TopLevelNode::Variable(variable) => self.ty(&variable.type_),
            TopLevelNode::Module(_) => {}
        }
    }

    fn interface(&mut self, interface: &InterfaceNode) {
        self.type_parameters(&interface.type_parameters);
        self.heritages(&interface.parent_entities);
        self.members(&interface.members);
    }

    fn members(&mut self, members: &[MemberNode]) {
        for member in members {
            match member {
                MemberNode::Method(method) => {
                    self.type_parameters(&method.type_parameters);
                    self.parameters(&method.parameters);
                    self.ty(&method.return_type);
                }
                MemberNode::Property(property) => self.ty(&property.type_),
                MemberNode::Constructor(constructor) => self.parameters(&constructor.parameters),
            }
        }
    }

    fn heritages(&mut self, heritages: &[HeritageNode]) {
        for heritage in heritages {
            match &heritage.reference {
                Some(reference) => self.record_uid(&reference.uid),
                None => self.record_name(heritage.name.rightmost()),
            }
            self.types(&heritage.type_arguments);
        }
    }

    fn type_parameters(&mut self, parameters: &[TypeParameterDefinitionNode]) {
        for parameter in parameters {
            self.types(&parameter.constraints);
        }
    }

    fn parameters(&mut self, parameters: &[ParameterNode]) {
        for parameter in parameters {
            self.ty(&parameter.type_);
        }
    }

    fn types(&mut self, types: &[TypeNode]) {
        for ty in types {
            self.ty(ty);
        }
    }

    fn ty(&mut self, ty: &TypeNode) {
        match ty {
            TypeNode::Value(node) => {
                if let Some(reference) = &node.reference {
                    self.record_uid(&reference.uid);
                }
                self.types(&node.params);
            }
            TypeNode::GeneratedInterface(node) => {
                match &node.reference {
                    Some(reference) => self.record_uid(&reference.uid),
                    None => self.record_name(node.name.rightmost()),
                }
                self.types(&node.type_arguments);
            }
            TypeNode::Function(node) => {
                self.parameters(&node.parameters);
                self.ty(&node.return_type);
            }
            TypeNode::Union(node) => self.types(&node.params),
            TypeNode::Tuple(node) => self.types(&node.params),
            TypeNode::Intersection(node) => self.types(&node.params),
            TypeNode::TypeParameter(_) | TypeNode::This(_) => {}
        }
        if let Some(TypeMeta::Intersection(types) | TypeMeta::Constraint(types)) = ty.meta() {
            self.types(types);
        }
    }

    fn record_uid(&mut self, uid: &Uid) {
        self.uids.insert(uid.clone());
    }

    fn record_name(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }
}

/// Generated interfaces unreachable from any non-generated declaration.
/// Reachability follows references out of each reached generated
/// interface, so cycles among unreachable ones are dropped together.
fn unreachable_generated(source_set: &SourceSetNode) -> FxHashSet<Uid> {
    let mut usage = GeneratedUsage::default();
    let mut generated = Vec::new();
    for file in &source_set.sources {
        usage.root(&file.root, &mut generated);
    }
    let mut reached: FxHashSet<Uid> = FxHashSet::default();
    loop {
        let newly: Vec<&InterfaceNode> = generated
            .iter()
            .copied()
            .filter(|interface| !reached.contains(&interface.uid) && usage.is_used(interface))
            .collect();
        if newly.is_empty() {
            break;
        }
        for interface in newly {
            reached.insert(interface.uid.clone());
            usage.interface(interface);
        }
    }
    generated
        .into_iter()
        .filter(|interface| !reached.contains(&interface.uid))
        .map(|interface| interface.uid.clone())
        .collect()
}

struct RemoveGenerated {
    removed: FxHashSet<Uid>,
}

impl NodeLowering for RemoveGenerated {
    fn lower_declarations(&mut self, declarations: Vec<TopLevelNode>, scope: &NodeScope) -> Vec<TopLevelNode> {
        let mut declarations = walk_declarations(self, declarations, scope);
        declarations.retain(|declaration| {
            !matches!(declaration, TopLevelNode::ClassLike(ClassLikeNode::Interface(interface))
                if interface.generated && self.removed.contains(&interface.uid))
        });
        declarations
    }
}

/// Drop generated interfaces that no user-written declaration reaches,
/// directly or through other generated interfaces.
pub fn remove_unused_generated_entities(source_set: SourceSetNode, _diagnostics: &mut DiagnosticBag) -> SourceSetNode {
    let removed = unreachable_generated(&source_set);
    if removed.is_empty() {
        return source_set;
    }
    debug!(count = removed.len(), "removing unused generated interfaces");
    RemoveGenerated { removed }.lower_source_set(source_set)
}

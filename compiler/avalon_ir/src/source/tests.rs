use super::*;
use crate::build::{class, def, module, pass};

#[test]
fn definition_kind_and_name_come_from_the_statement() {
    let scope = Arc::new(ModuleScope::new("app"));
    let func = SourceObject::from_definition(ObjectId::new(1), scope.clone(), def("f", &[], vec![pass()]));
    assert_eq!(func.kind, SourceKind::Function);
    assert_eq!(func.name, "f");
    assert_eq!(func.tree.body.len(), 1);

    let cls = SourceObject::from_definition(ObjectId::new(2), scope.clone(), class("C", vec![], vec![pass()]));
    assert_eq!(cls.kind, SourceKind::Class);
    assert_eq!(cls.name, "C");

    let stray = SourceObject::from_definition(ObjectId::new(3), scope, pass());
    assert_eq!(stray.kind, SourceKind::Module);
    assert_eq!(stray.name, "app");
}

#[test]
fn module_bindings_are_looked_up_by_name() {
    let scope = ModuleScope::new("app")
        .with_binding("session", ObjectId::new(10))
        .with_binding("db", ObjectId::new(11));
    assert_eq!(scope.binding("session"), Some(ObjectId::new(10)));
    assert_eq!(scope.binding("missing"), None);

    let object = SourceObject::from_module(ObjectId::new(4), Arc::new(scope), module(vec![]));
    assert_eq!(object.name, "app");
    assert_eq!(object.id.to_string(), "#4");
}

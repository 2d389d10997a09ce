//! Snapshot and restore integration tests.

use std::sync::Arc;

use game_attrs::core::{AttrError, OwnerClass, OwnerId, Tag, TagSet};
use game_attrs::kinds::{Group, KindId, GROUP, INTEGER, TAG_SET, TEXT};
use game_attrs::schema::Schema;
use game_attrs::store::{restrict_to, AttributeStore, StoreSnapshot};

const SCHEMA: &str = "\
name,kind,default,tags,readable,display,settings,ignore,rank
gph,integer,0,stat-mod,yes,Gold Per Hour,signed-color:plus,0,1
title,text,,,yes,Title,,,0
traits,tagset,,,no
group,group,neutral,,yes,Group,,neutral,2
beast,boolean,false,creature-only,no
";

fn populated() -> AttributeStore {
    let mut store = AttributeStore::new(Arc::new(Schema::parse(SCHEMA).unwrap()));
    store.register(OwnerId(1)).unwrap();
    store.register(OwnerId(2)).unwrap();

    let mut manager = store.manager(OwnerId(1)).unwrap();
    manager.generate_with("gph", 12, INTEGER).unwrap();
    manager.generate_with("title", "Baron".to_string(), TEXT).unwrap();
    manager
        .generate_with("traits", TagSet::new().with(Tag::ItemOnly), TAG_SET)
        .unwrap();
    manager.generate_with("group", Group::Construct, GROUP).unwrap();
    manager.append_description("title", " of Rust").unwrap();
    store
}

#[test]
fn test_bytes_restore_same_schema() {
    let store = populated();
    let bytes = store.snapshot().to_bytes().unwrap();

    let snapshot = StoreSnapshot::from_bytes(&bytes).unwrap();
    let (mut restored, report) =
        AttributeStore::restore(Arc::clone(store.schema()), snapshot).unwrap();

    assert!(report.is_complete());
    assert_eq!(report.restored, 4);
    assert_eq!(restored.owners(), vec![OwnerId(1), OwnerId(2)]);
    assert_eq!(
        restored.description(OwnerId(1)).unwrap(),
        store.description(OwnerId(1)).unwrap()
    );

    let manager = restored.manager(OwnerId(1)).unwrap();
    assert_eq!(*manager.value("gph", INTEGER).unwrap(), 12);
    assert_eq!(*manager.value("group", GROUP).unwrap(), Group::Construct);
    assert!(manager.value("traits", TAG_SET).unwrap().contains(Tag::ItemOnly));
    assert_eq!(
        manager.attribute("title", TEXT).unwrap().extra_description(),
        " of Rust"
    );
}

#[test]
fn test_restore_against_changed_schema() {
    let store = populated();
    let snapshot = store.snapshot();

    // `title` is gone and `gph` changed kind
    let schema = Schema::parse(
        "header\n\
         gph,real,0,,yes,Gold Per Hour,,,1\n\
         traits,tagset,,,no\n\
         group,group,neutral,,yes,Group,,neutral,2\n",
    )
    .unwrap();
    let (restored, report) = AttributeStore::restore(Arc::new(schema), snapshot).unwrap();

    assert_eq!(report.restored, 2);
    assert_eq!(report.skipped.len(), 2);
    let skipped: Vec<_> = report
        .skipped
        .iter()
        .map(|s| (s.name.as_str(), s.kind))
        .collect();
    assert!(skipped.contains(&("gph", KindId::Integer)));
    assert!(skipped.contains(&("title", KindId::Text)));

    assert!(!restored.contains(OwnerId(1), "gph"));
    assert!(restored.contains(OwnerId(1), "group"));
    assert_eq!(restored.description(OwnerId(1)).unwrap(), "Group: construct");
}

#[test]
fn test_restored_store_keeps_insertion_order() {
    let store = populated();
    let (mut restored, _) =
        AttributeStore::restore(Arc::clone(store.schema()), store.snapshot()).unwrap();

    let mut manager = restored.manager(OwnerId(2)).unwrap();
    manager.copy_from(OwnerId(1)).unwrap();
    let names: Vec<_> = manager
        .attributes()
        .unwrap()
        .iter()
        .map(|a| a.name().to_string())
        .collect();
    assert_eq!(names, vec!["gph", "title", "traits", "group"]);
}

#[test]
fn test_restore_keeps_class_restriction() {
    let mut store = populated();
    store
        .manager(OwnerId(2))
        .unwrap()
        .set_validation(restrict_to(OwnerClass::Item))
        .unwrap();
    let bytes = store.snapshot().to_bytes().unwrap();

    let snapshot = StoreSnapshot::from_bytes(&bytes).unwrap();
    let (mut restored, _) =
        AttributeStore::restore(Arc::clone(store.schema()), snapshot).unwrap();

    let mut item = restored.manager(OwnerId(2)).unwrap();
    assert!(matches!(
        item.generate("beast"),
        Err(AttrError::Validation { owner: OwnerId(2), .. })
    ));
    assert!(!item.contains("beast"));
    item.generate("gph").unwrap();

    // The unrestricted owner stays unrestricted
    restored.manager(OwnerId(1)).unwrap().generate("beast").unwrap();
}

use codeblocks_format::{Catalog, CatalogUpdate, IoKind, SchemaError, ValueType};
use serde_json::json;

fn initial_batch() -> serde_json::Value {
    json!([
        {
            "id": "print",
            "name": "@print",
            "category": 0,
            "lines": [[{"type": "text", "value": "@print"}, {"type": "code", "value": "TEXT_IN"}]]
        },
        {
            "id": "add",
            "category": 1,
            "returns": "NUM",
            "lines": [[{"type": "code", "value": "NUM_IN"}, {"type": "text", "value": "+"}, {"type": "code", "value": "NUM_IN"}]]
        },
        {
            "id": "beep",
            "category": 0,
            "lines": [[{"type": "text", "value": "beep"}]]
        }
    ])
}

#[test]
fn remote_sync_bundle_refreshes_everything() {
    let mut catalog = Catalog::new();
    assert_eq!(catalog.register(initial_batch()).unwrap(), 3);

    let update: CatalogUpdate = serde_json::from_value(json!({
        "formats": [
            {
                "id": "print",
                "name": "@print",
                "category": 0,
                "lines": [[{"type": "text", "value": "@print"}, {"type": "code", "value": "TEXT_IN"}]]
            },
            {
                "id": "pi",
                "category": 1,
                "returns": "NUM",
                "lines": [[{"type": "text", "value": "pi"}]]
            }
        ],
        "translations": {
            "default": {"print": "print", "control": "Control"},
            "de": {"print": "drucke"}
        },
        "categories": [{"name": "@control", "hue": 30}, {"name": "Math", "hue": 200}]
    }))
    .unwrap();

    let summary = catalog.apply_update(update).unwrap().unwrap();
    assert_eq!(summary.added, vec!["pi"]);
    assert_eq!(summary.replaced, vec!["print"]);
    assert_eq!(summary.retired, vec!["add", "beep"]);

    // Retired formats still resolve but leave the palette.
    assert!(catalog.lookup("beep").unwrap().deprecated);
    let insertable: Vec<_> = catalog.formats(true).iter().map(|f| f.id.clone()).collect();
    assert_eq!(insertable, vec!["pi", "print"]);

    let palette = catalog.palette();
    assert_eq!(palette.len(), 2);
    assert_eq!(palette[0].name, "Control");
    assert_eq!(palette[0].hue, 30);
    assert_eq!(
        palette[0].entries,
        vec![("print".to_string(), "print".to_string())]
    );

    catalog.set_language("de");
    let print = catalog.lookup("print").unwrap();
    assert_eq!(catalog.name_of(&print), "drucke");
    assert_eq!(catalog.translations().languages(), vec!["de"]);
}

#[test]
fn failed_sync_keeps_previous_catalog() {
    let mut catalog = Catalog::new();
    catalog.register(initial_batch()).unwrap();

    let update = CatalogUpdate {
        formats: Some(json!([{"id": "broken", "category": 0}])),
        ..CatalogUpdate::default()
    };

    let err = catalog.apply_update(update).unwrap_err();
    assert!(matches!(err, SchemaError::MissingField { index: 0, field: "lines" }));
    assert!(!catalog.is_refreshing());
    assert!(!catalog.contains("broken"));
    assert_eq!(catalog.formats(true).len(), 3);
}

#[test]
fn compatibility_follows_slot_kinds() {
    let mut catalog = Catalog::new();
    catalog.register(initial_batch()).unwrap();

    let add = catalog.lookup("add").unwrap();
    let print = catalog.lookup("print").unwrap();
    assert_eq!(add.produces, ValueType::Num);

    assert!(catalog.compatible(&add, IoKind::NumIn));
    assert!(catalog.compatible(&add, IoKind::TextIn));
    assert!(!catalog.compatible(&add, IoKind::BoolIn));
    assert!(!catalog.compatible(&print, IoKind::TextIn));
    assert!(catalog.compatible(&print, IoKind::None));
}

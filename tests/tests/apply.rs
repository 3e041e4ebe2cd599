use tests::{catalogue, prelude::*};

use relmap::{apply, apply_immediate, BaseMapping, Context, FieldMap, Result};
use std::cell::Cell;

/// Maps products to resources, counting the objects it maps.
#[derive(Default)]
struct CountingMapping {
    mapped: Cell<usize>,
}

impl Mapping for CountingMapping {
    type FromObj = Product;
    type ToObj = ProductResource;
    type Context = Context;

    fn map_fields(&self, product: &Product, _cx: &mut Context) -> Result<FieldValues> {
        self.mapped.set(self.mapped.get() + 1);

        let mut values = FieldValues::new();
        values.insert("id".to_string(), product.id.into());
        values.insert("title".to_string(), (&product.title).into());
        Ok(values)
    }
}

fn products(db: &Db) -> Vec<Product> {
    let loaded = assert_ok!(db.objects::<Product>().all().fetch());
    assert_ok!(loaded.load::<Product>())
}

#[test]
fn apply_is_lazy() {
    let (db, _log) = assert_ok!(catalogue::setup());
    let products = products(&db);
    let mapping = CountingMapping::default();
    let mut cx = Context::new();

    let mut results = apply(&mapping, &products, &mut cx);
    assert_eq!(mapping.mapped.get(), 0);

    let first = assert_ok!(results.next().expect("one result"));
    assert_eq!(first.id, 1);
    assert_eq!(mapping.mapped.get(), 1);

    assert_eq!(results.count(), 209);
    assert_eq!(mapping.mapped.get(), 210);
}

#[test]
fn apply_immediate_stops_at_first_error() {
    let (db, _log) = assert_ok!(catalogue::setup());
    let products = products(&db);

    // `upc` is missing on variants, and the resource requires a string.
    let mapping = BaseMapping::<Product, ProductResource>::new(
        FieldMap::new()
            .map("id", "id")
            .map("title", "title")
            .transform("upc", "upc", |value| value.into_string().map(Value::from)),
    );

    let err = assert_err!(apply_immediate(&mapping, &products, &mut Context::new()));
    assert_eq!(
        err.to_string(),
        "mapping `upc` to `upc`: cannot convert Null to String"
    );
}

#[test]
fn settable_destination_is_built_by_assignment() {
    let (db, _log) = assert_ok!(catalogue::setup());
    let products = products(&db);

    let fields = FieldMap::new()
        .map("id", "id")
        .map("title", "title")
        .map("parent_id", "parent_id");
    let mapping = BaseMapping::<Product, Product>::new(fields);

    let copies = assert_ok!(apply_immediate(&mapping, &products[..12], &mut Context::new()));

    assert_eq!(copies[8].parent_id, Some(catalogue::PARENT_PRODUCT));
    assert_eq!(copies[8].upc, None);
    assert_eq!(copies[0].title, "Product 1");
}

#[test]
fn unsettable_attribute_falls_back_to_constructor() {
    let (db, _log) = assert_ok!(catalogue::setup());
    let products = products(&db);

    // `Product` rejects assignment of `children`; its constructor rejects it
    // too, so the fallback error surfaces.
    let mapping = BaseMapping::<Product, Product>::new(
        FieldMap::new()
            .map("id", "id")
            .transform("id", "children", |_| Ok(Value::List(vec![]))),
    );

    let err = assert_err!(mapping.apply_one(&products[0], &mut Context::new()));
    assert!(err.is_attribute_unsettable());
}

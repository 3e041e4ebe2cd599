use tests::{
    catalogue::{self, product_queryset_to_resources, product_to_resource},
    prelude::*,
};

use pretty_assertions::assert_eq;

fn load_product(db: &Db, id: i64) -> Product {
    let query_set = assert_ok!(db.objects::<Product>().filter_by("id", id));
    let mut products = assert_ok!(assert_ok!(query_set.fetch()).load::<Product>());
    assert_eq!(products.len(), 1);
    products.remove(0)
}

#[test]
fn product_to_resource_copies_basic_fields() {
    let (db, _log) = assert_ok!(catalogue::setup());
    let product = load_product(&db, 1);

    let resource = assert_ok!(product_to_resource(&db, &product, false));

    assert_eq!(resource.title, product.title);
    assert_eq!(resource.upc, product.upc);
    assert_eq!(resource.category.as_deref(), Some("Category 1"));
}

#[test]
fn parent_product_without_children() {
    let (db, mut log) = assert_ok!(catalogue::setup());
    let product = load_product(&db, catalogue::PARENT_PRODUCT);
    log.clear();

    let resource = assert_ok!(product_to_resource(&db, &product, false));

    assert_eq!(resource.title, product.title);
    assert_eq!(resource.children, None);

    // Only the category lookup.
    assert_eq!(log.queries_for(Category::id()), 1);
    assert_eq!(log.queries_for(Product::id()), 0);
}

#[test]
fn parent_product_with_children() {
    let (db, _log) = assert_ok!(catalogue::setup());
    let product = load_product(&db, catalogue::PARENT_PRODUCT);

    let resource = assert_ok!(product_to_resource(&db, &product, true));

    assert_eq!(resource.title, product.title);
    let children = resource.children.expect("children included");
    assert_eq!(children.len(), 3);

    for (child, id) in children.iter().zip(catalogue::VARIANTS) {
        assert_eq!(child.id, id);
        assert_eq!(child.category, None);
        assert_eq!(child.children, None);
    }
}

#[test]
fn variant_maps_without_category() {
    let (db, _log) = assert_ok!(catalogue::setup());
    let product = load_product(&db, catalogue::VARIANTS[0]);

    let resource = assert_ok!(product_to_resource(&db, &product, true));

    assert_eq!(resource.category, None);
    assert_eq!(resource.upc, None);
    assert_eq!(resource.children, Some(vec![]));
}

#[test]
fn queryset_to_resources() {
    let (db, _log) = assert_ok!(catalogue::setup());

    let resources = assert_ok!(product_queryset_to_resources(
        &db,
        db.objects::<Product>().all()
    ));

    assert_eq!(resources.len(), 210);

    let parent = &resources[catalogue::PARENT_PRODUCT as usize - 1];
    assert_eq!(parent.children.as_ref().map(Vec::len), Some(3));
    assert_eq!(resources[4].category.as_deref(), Some("Category 5"));
}

#[test]
fn queryset_to_resources_num_queries() {
    let (db, log) = assert_ok!(catalogue::setup());

    assert_ok!(product_queryset_to_resources(
        &db,
        db.objects::<Product>().all()
    ));

    // The rows, the categories and the variants.
    assert_eq!(log.len(), 3);
    assert_eq!(log.queries_for(Product::id()), 2);
    assert_eq!(log.queries_for(Category::id()), 1);
}

#[test]
fn num_queries_does_not_grow_with_rows() {
    let (db, mut log) = assert_ok!(catalogue::setup());

    let subset = assert_ok!(db.objects::<Product>().filter_by("category", 3));
    let resources = assert_ok!(product_queryset_to_resources(&db, subset));
    assert_eq!(resources.len(), 42);
    assert_eq!(log.len(), 3);

    log.clear();

    let single = assert_ok!(db.objects::<Product>().filter_by("id", 1));
    assert_ok!(product_queryset_to_resources(&db, single));
    assert_eq!(log.len(), 3);
}

#[test]
fn resources_through_values() {
    let (db, _log) = assert_ok!(catalogue::setup());
    let product = load_product(&db, catalogue::PARENT_PRODUCT);

    let resource = assert_ok!(product_to_resource(&db, &product, true));
    let decoded = assert_ok!(ProductResource::from_value(resource.clone().into_value()));

    assert_eq!(decoded, resource);
}

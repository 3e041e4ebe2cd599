use tests::{catalogue, prelude::*};

use pretty_assertions::assert_eq;
use relmap::{apply_immediate, map_queryset, FieldMap, ModelMapping, RelatedItems, Result};
use std::sync::Arc;

mod shop {
    use super::*;
    use relmap::Error;

    #[derive(Debug, Default)]
    pub struct Category {
        pub id: i64,
        pub name: String,
    }

    #[derive(Debug, Default)]
    pub struct Product {
        pub id: i64,
        pub title: String,
    }

    #[derive(Debug, Default)]
    pub struct Variant {
        pub id: i64,
        pub sku: String,
    }

    impl Model for Category {
        fn id() -> ModelId {
            relmap::model_id!()
        }

        fn schema() -> schema::Model {
            schema::Model::builder(Self::id(), "Category")
                .primary_key("id", Type::I64)
                .field("name", Type::String)
                .build()
        }

        fn load(mut record: ValueRecord) -> Result<Self> {
            Ok(Self {
                id: record.take(0).to_i64()?,
                name: record.take(1).into_string()?,
            })
        }
    }

    impl Model for Product {
        fn id() -> ModelId {
            relmap::model_id!()
        }

        fn schema() -> schema::Model {
            schema::Model::builder(Self::id(), "Product")
                .primary_key("id", Type::I64)
                .field("title", Type::String)
                .foreign_key("category", Category::id())
                .relation_via("variants", RelationKind::OneToMany, Variant::id(), "product")
                .build()
        }

        fn load(mut record: ValueRecord) -> Result<Self> {
            Ok(Self {
                id: record.take(0).to_i64()?,
                title: record.take(1).into_string()?,
            })
        }
    }

    impl Object for Product {
        fn get_attr(&self, name: &str) -> Option<Value> {
            match name {
                "id" => Some(self.id.into()),
                "title" => Some((&self.title).into()),
                _ => None,
            }
        }

        fn empty() -> Option<Self> {
            Some(Self::default())
        }

        fn set_attr(&mut self, name: &str, value: Value) -> Result<()> {
            match name {
                "id" => self.id = value.to_i64()?,
                "title" => self.title = value.into_string()?,
                _ => return Err(Error::attribute_unsettable("Product", Some(name))),
            }
            Ok(())
        }

        fn construct(_values: FieldValues) -> Result<Self> {
            Err(Error::attribute_unsettable("Product", None))
        }
    }

    impl Model for Variant {
        fn id() -> ModelId {
            relmap::model_id!()
        }

        fn schema() -> schema::Model {
            schema::Model::builder(Self::id(), "Variant")
                .primary_key("id", Type::I64)
                .field("sku", Type::String)
                .foreign_key("product", Product::id())
                .build()
        }

        fn load(mut record: ValueRecord) -> Result<Self> {
            Ok(Self {
                id: record.take(0).to_i64()?,
                sku: record.take(1).into_string()?,
            })
        }
    }

    /// Submitted product data, with its related rows inline.
    #[derive(Debug)]
    pub struct ProductForm {
        pub id: i64,
        pub title: String,
        pub category: Value,
        pub variants: Vec<Value>,
    }

    impl Object for ProductForm {
        fn field_names() -> &'static [&'static str] {
            &["id", "title", "category", "variants"]
        }

        fn get_attr(&self, name: &str) -> Option<Value> {
            match name {
                "id" => Some(self.id.into()),
                "title" => Some((&self.title).into()),
                "category" => Some(self.category.clone()),
                "variants" => Some(Value::List(self.variants.clone())),
                _ => None,
            }
        }

        fn construct(_values: FieldValues) -> Result<Self> {
            Err(Error::attribute_unsettable("ProductForm", None))
        }
    }
}

/// A destination with one related field of every kind.
mod market {
    use super::*;
    use relmap::Error;

    #[derive(Debug, Default)]
    pub struct Brand;

    #[derive(Debug, Default)]
    pub struct Label;

    #[derive(Debug, Default)]
    pub struct Listing {
        pub id: i64,
        pub title: String,
    }

    impl Model for Brand {
        fn id() -> ModelId {
            relmap::model_id!()
        }

        fn schema() -> schema::Model {
            schema::Model::builder(Self::id(), "Brand")
                .primary_key("id", Type::I64)
                .build()
        }

        fn load(_record: ValueRecord) -> Result<Self> {
            Ok(Self)
        }
    }

    impl Model for Label {
        fn id() -> ModelId {
            relmap::model_id!()
        }

        fn schema() -> schema::Model {
            schema::Model::builder(Self::id(), "Label")
                .primary_key("id", Type::I64)
                .build()
        }

        fn load(_record: ValueRecord) -> Result<Self> {
            Ok(Self)
        }
    }

    impl Model for Listing {
        fn id() -> ModelId {
            relmap::model_id!()
        }

        fn schema() -> schema::Model {
            schema::Model::builder(Self::id(), "Listing")
                .primary_key("id", Type::I64)
                .field("title", Type::String)
                .foreign_key("category", shop::Category::id())
                .relation("offers", RelationKind::OneToMany, shop::Variant::id())
                .relation("brand", RelationKind::ManyToOne, Brand::id())
                .relation("labels", RelationKind::ManyToMany, Label::id())
                .build()
        }

        fn load(mut record: ValueRecord) -> Result<Self> {
            Ok(Self {
                id: record.take(0).to_i64()?,
                title: record.take(1).into_string()?,
            })
        }
    }

    impl Object for Listing {
        fn get_attr(&self, name: &str) -> Option<Value> {
            match name {
                "id" => Some(self.id.into()),
                "title" => Some((&self.title).into()),
                _ => None,
            }
        }

        fn empty() -> Option<Self> {
            Some(Self::default())
        }

        fn set_attr(&mut self, name: &str, value: Value) -> Result<()> {
            match name {
                "id" => self.id = value.to_i64()?,
                "title" => self.title = value.into_string()?,
                _ => return Err(Error::attribute_unsettable("Listing", Some(name))),
            }
            Ok(())
        }

        fn construct(_values: FieldValues) -> Result<Self> {
            Err(Error::attribute_unsettable("Listing", None))
        }
    }

    /// Submitted values, read back by name.
    #[derive(Debug)]
    pub struct ListingForm {
        pub values: FieldValues,
    }

    impl Object for ListingForm {
        fn field_names() -> &'static [&'static str] {
            &["id", "title", "category", "offers", "brand", "labels"]
        }

        fn get_attr(&self, name: &str) -> Option<Value> {
            self.values.get(name).cloned()
        }

        fn construct(values: FieldValues) -> Result<Self> {
            Ok(Self { values })
        }
    }
}

use shop::ProductForm;

fn shop_db() -> Db {
    let builder = models!(shop::Category, shop::Product, shop::Variant);
    let (db, _log) = assert_ok!(setup_db(builder, MemDriver::new()));
    db
}

fn form_mapping(db: &Db) -> Result<ModelMapping<ProductForm, shop::Product>> {
    let fields = FieldMap::new()
        .map("id", "id")
        .map("title", "title")
        .map("category", "category")
        .map("variants", "variants");

    ModelMapping::with_fields(db, fields)
}

fn shoe() -> (ProductForm, Value, Vec<Value>) {
    let category = Value::record_from_vec(vec![1.into(), "Footwear".into()]);
    let variants = vec![
        Value::record_from_vec(vec![10.into(), "SHOE-41".into()]),
        Value::record_from_vec(vec![11.into(), "SHOE-42".into()]),
    ];

    let form = ProductForm {
        id: 1,
        title: "Shoe".to_string(),
        category: category.clone(),
        variants: variants.clone(),
    };

    (form, category, variants)
}

#[test]
fn related_values_are_deferred() {
    let db = shop_db();
    let mapping = assert_ok!(form_mapping(&db));
    let (form, category, variants) = shoe();

    let mut cx = RelatedItems::new();
    let product = assert_ok!(mapping.apply_one(&form, &mut cx));

    assert_eq!(product.title, "Shoe");
    assert_eq!(product.id, 1);

    assert_eq!(cx.foreign_key_items.len(), 1);
    let item = &cx.foreign_key_items[0];
    assert!(Arc::ptr_eq(&item.parent, &product));
    assert_eq!(item.field.app_name(), "category");
    assert_eq!(item.value, category);

    assert_eq!(cx.one_to_many_items.len(), 1);
    let item = &cx.one_to_many_items[0];
    assert!(Arc::ptr_eq(&item.parent, &product));
    assert_eq!(item.field.app_name(), "variants");
    assert_eq!(item.value, Value::List(variants));

    assert!(cx.many_to_one_items.is_empty());
    assert!(cx.many_to_many_items.is_empty());
}

fn names(fields: &[schema::Field]) -> Vec<&str> {
    fields.iter().map(|field| field.app_name()).collect()
}

#[test]
fn related_fields_are_computed_once() {
    let db = shop_db();
    let mapping = assert_ok!(form_mapping(&db));
    let related = mapping.related_fields();

    assert_eq!(names(&related.foreign_key_fields), ["category"]);
    assert_eq!(names(&related.one_to_many_fields), ["variants"]);
    assert!(related.many_to_one_fields.is_empty());
    assert!(related.many_to_many_fields.is_empty());
}

#[test]
fn auto_fields_use_stored_names() {
    let db = shop_db();
    let mapping = assert_ok!(ModelMapping::<ProductForm, shop::Product>::new(&db));

    let rules: Vec<_> = mapping.fields().rules().collect();
    assert_eq!(rules, [("id", "id"), ("title", "title")]);
}

#[test]
fn unregistered_destination() {
    let (db, _log) = assert_ok!(setup_db(models!(Tag), MemDriver::new()));

    let err = assert_err!(ModelMapping::<ProductForm, shop::Product>::new(&db));
    assert!(err.is_metadata_unavailable());
}

#[test]
fn items_accumulate_over_a_batch() {
    let db = shop_db();
    let mapping = assert_ok!(form_mapping(&db));

    let forms: Vec<_> = (1..=3)
        .map(|id| {
            let (mut form, _, _) = shoe();
            form.id = id;
            form
        })
        .collect();

    let mut cx = RelatedItems::new();
    let products = assert_ok!(apply_immediate(&mapping, &forms, &mut cx));

    assert_eq!(products.len(), 3);
    assert_eq!(cx.len(), 6);

    for (product, item) in products.iter().zip(&cx.one_to_many_items) {
        assert!(Arc::ptr_eq(product, &item.parent));
    }
}

#[test]
fn model_to_model_over_a_queryset() {
    let (db, _log) = assert_ok!(catalogue::setup());

    let fields = FieldMap::new()
        .map("id", "id")
        .map("title", "title")
        .map("category", "category");
    let mapping = assert_ok!(ModelMapping::<Product, Product>::with_fields(&db, fields));

    let query_set = db.objects::<Product>().all().prefetch_related("category");
    let mut cx = RelatedItems::new();
    let products = assert_ok!(map_queryset(&mapping, query_set, Some(&mut cx)));

    assert_eq!(products.len(), 210);
    assert_eq!(cx.foreign_key_items.len(), 210);

    let first = &cx.foreign_key_items[0];
    assert_eq!(first.parent.id, 1);
    assert_eq!(first.parent.category_id, None);
    assert_eq!(
        first.value,
        Value::record_from_vec(vec![1.into(), "Category 1".into(), Value::Null])
    );

    let variant = &cx.foreign_key_items[catalogue::VARIANTS[0] as usize - 1];
    assert_eq!(variant.value, Value::Null);
}

#[test]
fn one_item_per_relation_kind() {
    let builder = models!(
        shop::Category,
        shop::Product,
        shop::Variant,
        market::Brand,
        market::Label,
        market::Listing
    );
    let (db, log) = assert_ok!(setup_db(builder, MemDriver::new()));

    let fields = ["id", "title", "category", "offers", "brand", "labels"]
        .into_iter()
        .fold(FieldMap::new(), |fields, name| fields.map(name, name));
    let mapping = assert_ok!(ModelMapping::<market::ListingForm, market::Listing>::with_fields(
        &db, fields
    ));

    let category = Value::from(3);
    let offers = Value::List(vec![Value::from(10), Value::from(11)]);
    let brand = Value::from(5);
    let labels = Value::List(vec![Value::from(1)]);

    let form = market::ListingForm {
        values: [
            ("id", Value::from(1)),
            ("title", Value::from("Boots")),
            ("category", category.clone()),
            ("offers", offers.clone()),
            ("brand", brand.clone()),
            ("labels", labels.clone()),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect(),
    };

    let mut cx = RelatedItems::new();
    let listing = assert_ok!(mapping.apply_one(&form, &mut cx));

    assert_eq!(listing.id, 1);
    assert_eq!(listing.title, "Boots");

    let lists = [
        (&cx.foreign_key_items, "category", category),
        (&cx.one_to_many_items, "offers", offers),
        (&cx.many_to_one_items, "brand", brand),
        (&cx.many_to_many_items, "labels", labels),
    ];

    for (items, name, value) in lists {
        assert_eq!(items.len(), 1, "{name}");
        assert!(Arc::ptr_eq(&items[0].parent, &listing));
        assert_eq!(items[0].field.app_name(), name);
        assert_eq!(items[0].value, value);
    }

    // Building the listing never touches the store.
    assert!(log.is_empty());
}

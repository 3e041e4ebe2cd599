use super::{
    Field, FieldId, FieldName, FieldPrimitive, FieldTy, ForeignKey, Name, Relation, RelationKind,
};
use crate::stmt;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name of the model
    pub name: Name,

    /// Model this one inherits from, if any. A child model can be mapped
    /// wherever its parent's rows are expected.
    pub parent: Option<ModelId>,

    /// Fields contained by the model, in declaration order
    pub fields: Vec<Field>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

impl Model {
    pub fn builder(id: ModelId, name: &str) -> ModelBuilder {
        ModelBuilder {
            model: Model {
                id,
                name: Name::new(name),
                parent: None,
                fields: vec![],
            },
        }
    }

    #[track_caller]
    pub fn field(&self, field: impl Into<FieldId>) -> &Field {
        let field_id = field.into();
        assert_eq!(self.id, field_id.model);
        &self.fields[field_id.index]
    }

    /// Find a field by its declared name.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name.app_name == name)
    }

    /// Find a field by its stored attribute name.
    pub fn field_by_storage_name(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.is_concrete() && field.storage_name() == name)
    }

    /// Fields stored on the model's own rows: primitives and foreign keys.
    pub fn concrete_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| field.is_concrete())
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| field.is_foreign_key())
    }

    /// Related-object descriptors, with their relation metadata.
    pub fn related_objects(&self) -> impl Iterator<Item = (&Field, &Relation)> + '_ {
        self.fields
            .iter()
            .filter_map(|field| field.ty.as_relation().map(|relation| (field, relation)))
    }

    pub fn primary_key_field(&self) -> Option<&Field> {
        self.fields.iter().find(|field| field.primary_key)
    }
}

/// Declares a model's fields in order.
///
/// Field ids are assigned from declaration order, so a model's records line
/// up with the order fields are added here.
#[derive(Debug)]
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    /// Declare the model this one inherits from.
    pub fn parent(mut self, parent: ModelId) -> Self {
        self.model.parent = Some(parent);
        self
    }

    pub fn primary_key(self, name: &str, ty: stmt::Type) -> Self {
        self.push(FieldName::new(name), FieldPrimitive { ty }.into(), false, true)
    }

    pub fn field(self, name: &str, ty: stmt::Type) -> Self {
        self.push(FieldName::new(name), FieldPrimitive { ty }.into(), false, false)
    }

    pub fn nullable_field(self, name: &str, ty: stmt::Type) -> Self {
        self.push(FieldName::new(name), FieldPrimitive { ty }.into(), true, false)
    }

    /// A stored reference to `target`, kept in the `<name>_id` attribute.
    pub fn foreign_key(self, name: &str, target: ModelId) -> Self {
        self.push(Self::fk_name(name), ForeignKey { target }.into(), false, false)
    }

    pub fn nullable_foreign_key(self, name: &str, target: ModelId) -> Self {
        self.push(Self::fk_name(name), ForeignKey { target }.into(), true, false)
    }

    /// A related-object descriptor with no back-reference.
    pub fn relation(self, name: &str, kind: RelationKind, target: ModelId) -> Self {
        let relation = Relation {
            kind,
            target,
            pair: None,
        };
        self.push(FieldName::new(name), relation.into(), true, false)
    }

    /// A related-object descriptor whose rows point back through the
    /// foreign key `pair` on `target`.
    pub fn relation_via(self, name: &str, kind: RelationKind, target: ModelId, pair: &str) -> Self {
        let relation = Relation {
            kind,
            target,
            pair: Some(pair.to_string()),
        };
        self.push(FieldName::new(name), relation.into(), true, false)
    }

    pub fn build(self) -> Model {
        self.model
    }

    fn fk_name(name: &str) -> FieldName {
        FieldName {
            app_name: name.to_string(),
            storage_name: Some(format!("{name}_id")),
        }
    }

    fn push(mut self, name: FieldName, ty: FieldTy, nullable: bool, primary_key: bool) -> Self {
        let id = self.model.id.field(self.model.fields.len());
        self.model.fields.push(Field {
            id,
            name,
            ty,
            nullable,
            primary_key,
        });
        self
    }
}

impl ModelId {
    /// Create a `FieldId` representing the current model's field at index
    /// `index`.
    pub const fn field(self, index: usize) -> FieldId {
        FieldId { model: self, index }
    }
}

impl From<&Self> for ModelId {
    fn from(src: &Self) -> Self {
        *src
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}

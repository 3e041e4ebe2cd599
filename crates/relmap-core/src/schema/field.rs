use super::{ModelId, Relation, RelationKind};
use crate::stmt;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Field {
    /// Uniquely identifies the field within the containing model.
    pub id: FieldId,

    /// The field name
    pub name: FieldName,

    /// Primitive, foreign key or relation
    pub ty: FieldTy,

    /// True if the field can be null.
    pub nullable: bool,

    /// True if the field is the primary key
    pub primary_key: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FieldId {
    pub model: ModelId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldName {
    /// Name of the attribute on the model type
    pub app_name: String,

    /// Name of the stored column, when it differs from `app_name`
    pub storage_name: Option<String>,
}

impl FieldName {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            storage_name: None,
        }
    }

    pub fn storage_name(&self) -> &str {
        self.storage_name.as_ref().unwrap_or(&self.app_name)
    }
}

#[derive(Clone)]
pub enum FieldTy {
    /// A stored scalar column
    Primitive(FieldPrimitive),

    /// A stored reference to a row of another model
    ForeignKey(ForeignKey),

    /// A related-object descriptor, not stored on this model's rows
    Relation(Relation),
}

#[derive(Debug, Clone)]
pub struct FieldPrimitive {
    pub ty: stmt::Type,
}

#[derive(Debug, Clone)]
pub struct ForeignKey {
    /// Model the key references, by primary key
    pub target: ModelId,
}

impl Field {
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> &FieldName {
        &self.name
    }

    pub fn ty(&self) -> &FieldTy {
        &self.ty
    }

    /// The attribute name as declared on the model.
    pub fn app_name(&self) -> &str {
        &self.name.app_name
    }

    /// The stored attribute name. Foreign keys are stored as `<name>_id`.
    pub fn storage_name(&self) -> &str {
        self.name.storage_name()
    }

    /// True if the field has a column on the model's own rows.
    pub fn is_concrete(&self) -> bool {
        !self.ty.is_relation()
    }

    pub fn is_foreign_key(&self) -> bool {
        self.ty.is_foreign_key()
    }

    pub fn is_relation(&self) -> bool {
        self.ty.is_relation()
    }

    /// The model this field points at, for foreign keys and relations.
    pub fn target(&self) -> Option<ModelId> {
        match &self.ty {
            FieldTy::Primitive(_) => None,
            FieldTy::ForeignKey(fk) => Some(fk.target),
            FieldTy::Relation(relation) => Some(relation.target),
        }
    }

    /// Returns true if `value` is acceptable for this field.
    pub fn accepts(&self, value: &stmt::Value) -> bool {
        if value.is_null() {
            return self.nullable || self.is_relation();
        }

        match &self.ty {
            FieldTy::Primitive(primitive) => primitive.ty.accepts(value),
            // A key, or the loaded row it refers to.
            FieldTy::ForeignKey(_) => matches!(value, stmt::Value::I64(_) | stmt::Value::Record(_)),
            FieldTy::Relation(relation) if relation.kind.is_collection() => value.is_list(),
            FieldTy::Relation(_) => true,
        }
    }
}

impl FieldTy {
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(..))
    }

    pub fn as_primitive(&self) -> Option<&FieldPrimitive> {
        match self {
            Self::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    pub fn is_foreign_key(&self) -> bool {
        matches!(self, Self::ForeignKey(..))
    }

    pub fn as_foreign_key(&self) -> Option<&ForeignKey> {
        match self {
            Self::ForeignKey(fk) => Some(fk),
            _ => None,
        }
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, Self::Relation(..))
    }

    pub fn as_relation(&self) -> Option<&Relation> {
        match self {
            Self::Relation(relation) => Some(relation),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_relation(&self) -> &Relation {
        match self {
            Self::Relation(relation) => relation,
            _ => panic!("expected relation field, but was {self:?}"),
        }
    }

    /// The relation kind, for related-object descriptors.
    pub fn relation_kind(&self) -> Option<RelationKind> {
        self.as_relation().map(|relation| relation.kind)
    }
}

impl fmt::Debug for FieldTy {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(ty) => ty.fmt(fmt),
            Self::ForeignKey(ty) => ty.fmt(fmt),
            Self::Relation(ty) => ty.fmt(fmt),
        }
    }
}

impl From<FieldPrimitive> for FieldTy {
    fn from(value: FieldPrimitive) -> Self {
        Self::Primitive(value)
    }
}

impl From<ForeignKey> for FieldTy {
    fn from(value: ForeignKey) -> Self {
        Self::ForeignKey(value)
    }
}

impl From<Relation> for FieldTy {
    fn from(value: Relation) -> Self {
        Self::Relation(value)
    }
}

impl From<&Self> for FieldId {
    fn from(val: &Self) -> Self {
        *val
    }
}

impl From<&Field> for FieldId {
    fn from(val: &Field) -> Self {
        val.id
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "FieldId({}/{})", self.model.0, self.index)
    }
}

use super::ModelId;

/// A related-object descriptor.
///
/// Relations are not stored on the declaring model's rows. The values they
/// stand for live in other tables and are set once the declaring row exists.
#[derive(Debug, Clone)]
pub struct Relation {
    pub kind: RelationKind,

    /// Model on the other side of the relation
    pub target: ModelId,

    /// Name of the foreign key on `target` that points back at the declaring
    /// model, when there is one.
    pub pair: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RelationKind {
    OneToMany,
    ManyToOne,
    ManyToMany,
    OneToOne,
}

impl RelationKind {
    pub fn is_one_to_many(self) -> bool {
        matches!(self, Self::OneToMany)
    }

    pub fn is_many_to_one(self) -> bool {
        matches!(self, Self::ManyToOne)
    }

    pub fn is_many_to_many(self) -> bool {
        matches!(self, Self::ManyToMany)
    }

    pub fn is_one_to_one(self) -> bool {
        matches!(self, Self::OneToOne)
    }

    /// True if the relation yields a collection of related objects.
    pub fn is_collection(self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToMany)
    }
}

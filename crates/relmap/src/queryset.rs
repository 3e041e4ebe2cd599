use crate::{
    db::Rows,
    mapping::{self, Mapping},
    Error, Model, Result,
};

/// Map a row collection to a list of objects.
///
/// The mapping's source model must be the rows' model, or inherit from it;
/// otherwise this fails before anything is fetched. A manager is expanded
/// to its full query, and the query is run exactly once, up front, so the
/// mapping only ever iterates rows that are already in memory. Objects are
/// built eagerly, in row order.
///
/// Without a `context`, the mapping gets a fresh default one.
pub fn map_queryset<'a, M>(
    mapping: &M,
    rows: impl Into<Rows<'a>>,
    context: Option<&mut M::Context>,
) -> Result<Vec<M::ToObj>>
where
    M: Mapping,
    M::FromObj: Model,
{
    let rows = rows.into();
    let schema = rows.db().schema();

    let from = schema.get(M::FromObj::id())?;
    if !schema.is_subtype(from.id, rows.model()) {
        let rows_model = schema
            .get(rows.model())
            .map(|model| model.name.to_string())
            .unwrap_or_else(|_| format!("{:?}", rows.model()));

        return Err(Error::incompatible_mapping(
            mapping.name(),
            from.name.to_string(),
            rows_model,
        ));
    }

    let loaded = rows.materialize()?;

    tracing::debug!(
        mapping = mapping.name(),
        rows = loaded.len(),
        "mapping queryset"
    );

    let sources = loaded.load::<M::FromObj>()?;

    let mut default_cx;
    let cx = match context {
        Some(cx) => cx,
        None => {
            default_cx = M::Context::default();
            &mut default_cx
        }
    };

    mapping::apply_immediate(mapping, &sources, cx)
}

use crate::{err, resolver::FieldResolver, FieldValues, Object, Result};
use relmap_core::stmt::Value;
use std::{fmt, sync::Arc};

type Action = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// The field-level rules of a mapping: which source attribute feeds which
/// destination attribute, and how the value is converted on the way.
///
/// Built once, when the mapping is defined, and read-only afterwards.
#[derive(Clone, Default)]
pub struct FieldMap {
    rules: Vec<Rule>,
}

#[derive(Clone)]
struct Rule {
    from: String,
    to: String,
    action: Option<Action>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy every attribute both sides share by name, in the destination's
    /// attribute order.
    pub fn auto(from: &impl FieldResolver, to: &impl FieldResolver) -> Self {
        let from = from.field_names();

        let rules = to
            .field_names()
            .into_iter()
            .filter(|name| from.contains(name))
            .map(|name| Rule {
                from: name.clone(),
                to: name,
                action: None,
            })
            .collect();

        Self { rules }
    }

    /// Fill `to` from the source attribute `from`, replacing any rule that
    /// already fills `to`.
    pub fn map(self, from: &str, to: &str) -> Self {
        self.push(from, to, None)
    }

    /// Like [`map`](Self::map), converting the value with `action`.
    pub fn transform<F>(self, from: &str, to: &str, action: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.push(from, to, Some(Arc::new(action)))
    }

    /// Stop filling the destination attribute `to`.
    pub fn exclude(mut self, to: &str) -> Self {
        self.rules.retain(|rule| rule.to != to);
        self
    }

    /// `(from, to)` pairs, in the order values are produced.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.rules
            .iter()
            .map(|rule| (rule.from.as_str(), rule.to.as_str()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Read the source and produce the destination's attribute values.
    pub fn apply<S: Object>(&self, source: &S) -> Result<FieldValues> {
        let mut values = FieldValues::with_capacity(self.rules.len());

        for rule in &self.rules {
            let value = source.get_attr(&rule.from).ok_or_else(|| {
                err!(
                    "`{}` has no attribute `{}`",
                    std::any::type_name::<S>(),
                    rule.from
                )
            })?;

            let value = match &rule.action {
                Some(action) => action(value)
                    .map_err(|e| e.context(err!("mapping `{}` to `{}`", rule.from, rule.to)))?,
                None => value,
            };

            values.insert(rule.to.clone(), value);
        }

        Ok(values)
    }

    fn push(mut self, from: &str, to: &str, action: Option<Action>) -> Self {
        let rule = Rule {
            from: from.to_string(),
            to: to.to_string(),
            action,
        };

        match self.rules.iter_mut().find(|existing| existing.to == to) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }

        self
    }
}

impl fmt::Debug for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.rules()).finish()
    }
}

use crate::error::ModelError;
use crate::graph::{Graph, Value};
use crate::reference::{Handle, Resolution, ValueLoc};
use crate::schema::ValueKind;
use fxhash::FxHashMap;
use rune_domain::roles::KeyKind;
use tracing::{debug, warn};

/// Call-scoped table from `(key kind, key)` to the keyed object or value.
///
/// A registry lives for one deserialize or resolve call. Duplicate keys are
/// remembered and reported by [`ObjectRegistry::resolve_all`], so the order
/// in which keyed nodes are built does not matter.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    entries: FxHashMap<(KeyKind, String), Handle>,
    collisions: Vec<(KeyKind, String)>,
}

impl ObjectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key` for `handle`. The first registration of a key wins.
    ///
    /// # Errors
    /// Returns [`ModelError::Structural`] for a blank key.
    pub fn register(
        &mut self,
        kind: KeyKind,
        key: &str,
        handle: Handle,
    ) -> Result<(), ModelError> {
        if key.trim().is_empty() {
            return Err(ModelError::structural(format!("empty {kind} key on {handle}")));
        }
        let slot = (kind, key.to_owned());
        if self.entries.contains_key(&slot) {
            warn!(%kind, key, "Duplicate key registration");
            self.collisions.push(slot);
        } else {
            self.entries.insert(slot, handle);
        }
        Ok(())
    }

    #[must_use]
    pub fn lookup(&self, kind: KeyKind, key: &str) -> Option<Handle> {
        self.entries.get(&(kind, key.to_owned())).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// # Errors
    /// Returns [`ModelError::RegistryKeyCollision`] for the first key registered twice.
    pub fn ensure_unique(&self) -> Result<(), ModelError> {
        match self.collisions.first() {
            Some((kind, key)) => Err(ModelError::RegistryKeyCollision {
                key: key.clone(),
                kind: *kind,
                context: (self.collisions.len() > 1)
                    .then(|| format!("{} duplicate keys", self.collisions.len()).into()),
            }),
            None => Ok(()),
        }
    }

    /// Works out the resolution of every pending reference (given by its
    /// location in `graph`) without touching the graph. Only handles are
    /// looked up; targets are never walked, so cyclic graphs bind in one pass.
    ///
    /// A missing target binds to [`Resolution::Failed`].
    ///
    /// # Errors
    /// * [`ModelError::RegistryKeyCollision`] when any key was registered twice.
    /// * [`ModelError::ReferenceResolution`] when a target's type does not fit the
    ///   referencing field.
    pub fn bind(
        &self,
        graph: &Graph,
        pending: &[ValueLoc],
    ) -> Result<Vec<(ValueLoc, Resolution)>, ModelError> {
        self.ensure_unique()?;

        pending
            .iter()
            .map(|&site| {
                let (kind, key) = reference_at(graph, site)?;
                let resolution = match self.lookup(kind, key) {
                    Some(handle) => {
                        check_target(graph, site, handle, kind, key)?;
                        Resolution::Resolved(handle)
                    }
                    None => Resolution::Failed,
                };
                Ok((site, resolution))
            })
            .collect()
    }

    /// Binds every pending reference and writes the outcome into `graph`.
    ///
    /// The graph is only written once every binding is known: a collision or an
    /// incompatible target leaves all references as they were. Missing targets
    /// leave their reference `Failed`.
    ///
    /// # Errors
    /// * Everything [`ObjectRegistry::bind`] reports.
    /// * [`ModelError::ReferenceResolution`] for the first missing target.
    pub fn resolve_all(
        &self,
        graph: &mut Graph,
        pending: Vec<ValueLoc>,
    ) -> Result<usize, ModelError> {
        let bindings = self.bind(graph, &pending)?;

        let mut failed = Vec::new();
        let mut bound = 0;
        for (site, resolution) in bindings {
            graph.rebind(site, resolution)?;
            match resolution {
                Resolution::Resolved(_) => bound += 1,
                _ => failed.push(site),
            }
        }

        if let Some(&site) = failed.first() {
            let (kind, key) = reference_at(graph, site)?;
            return Err(ModelError::ReferenceResolution {
                key: key.to_owned(),
                kind,
                message: "no object or value carries this key".into(),
                context: (failed.len() > 1)
                    .then(|| format!("{} unresolved references", failed.len()).into()),
            });
        }

        debug!(bound, "References resolved");
        Ok(bound)
    }
}

fn reference_at(graph: &Graph, site: ValueLoc) -> Result<(KeyKind, &str), ModelError> {
    match graph.value_at(site)? {
        Value::Reference(reference) => Ok((reference.kind(), reference.target_key())),
        _ => Err(ModelError::Internal {
            message: format!("no reference at {}", Handle::Value(site)).into(),
            context: None,
        }),
    }
}

/// The target must fit the field holding the reference: an object of the field's
/// type or a subtype, or a keyed value of the same scalar kind or enumeration.
fn check_target(
    graph: &Graph,
    site: ValueLoc,
    target: Handle,
    kind: KeyKind,
    key: &str,
) -> Result<(), ModelError> {
    let (ty, def) = graph.field_at(site)?;
    let (fits, found) = match (def.kind(), target) {
        (ValueKind::Object(expected), Handle::Object(id)) => {
            let found = graph.type_of(id)?;
            (found.is_a(expected), format!("a `{}` object", found.name()))
        }
        (ValueKind::Scalar(expected), Handle::Value(loc)) => match graph.value_at(loc)? {
            Value::Scalar(v) => {
                let found = v.value().kind();
                (found == *expected, format!("a {found} value"))
            }
            other => (false, other.describe()),
        },
        (ValueKind::Enum(expected), Handle::Value(loc)) => match graph.value_at(loc)? {
            Value::Enum(v) => {
                let found = v.value().enumeration();
                (found == expected, format!("a `{found}` member"))
            }
            other => (false, other.describe()),
        },
        (_, Handle::Object(id)) => (false, format!("a `{}` object", graph.type_of(id)?.name())),
        (_, Handle::Value(loc)) => (false, graph.value_at(loc)?.describe()),
    };

    if fits {
        Ok(())
    } else {
        Err(ModelError::unresolved(
            key,
            kind,
            format!(
                "field `{}.{}` expects {} but the key names {found}",
                ty.name(),
                def.name(),
                def.kind()
            ),
        ))
    }
}

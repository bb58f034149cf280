use crate::error::SerializationError;
use crate::scalar;
use fxhash::{FxHashMap, FxHashSet};
use rune_domain::config::SerializationConfig;
use rune_domain::constants::{DATA, KEY, MODEL, REF, SCHEME, TYPE, VERSION};
use rune_kernel::safe_nanoid;
use rune_model::{Document, Graph, Handle, Meta, ObjectId, ObjectRef, Value, ValueKind, ValueLoc};
use serde_json::{Map, Value as Json};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Writes one document. Every object reachable from the root is written in
/// full at exactly one site, its home; every other encounter becomes a pointer
/// token.
pub(crate) struct Writer<'g> {
    graph: &'g Graph,
    config: &'g SerializationConfig,
    homes: FxHashMap<ObjectId, ValueLoc>,
    generated: FxHashMap<ObjectId, String>,
    written: usize,
}

impl<'g> Writer<'g> {
    pub(crate) fn new(graph: &'g Graph, config: &'g SerializationConfig) -> Self {
        Self {
            graph,
            config,
            homes: FxHashMap::default(),
            generated: FxHashMap::default(),
            written: 0,
        }
    }

    pub(crate) fn write(mut self, document: &Document) -> Result<Json, SerializationError> {
        let pointed = self.place_objects(document.root)?;
        self.name_pointed_objects(pointed)?;
        let json = self.write_object(document.root, None)?;
        debug!(objects = self.written, generated_keys = self.generated.len(), "Document written");
        Ok(json)
    }

    /// Picks the home of every reachable object: its first containing field,
    /// or for objects no written object contains, the first resolved reference
    /// to it. Returns the objects that also appear as a contained value
    /// somewhere other than their home.
    fn place_objects(
        &mut self,
        root: ObjectId,
    ) -> Result<FxHashSet<ObjectId>, SerializationError> {
        let graph = self.graph;
        let mut placed: FxHashSet<ObjectId> = FxHashSet::default();
        placed.insert(root);
        let mut pointed = FxHashSet::default();
        let mut queue = VecDeque::from([root]);
        let mut referenced: VecDeque<(ValueLoc, ObjectId)> = VecDeque::new();

        loop {
            while let Some(owner) = queue.pop_front() {
                let object = graph.object(owner)?;
                for (field, def) in object.type_def().fields().iter().enumerate() {
                    for (position, value) in object.values(def.name())?.iter().enumerate() {
                        let loc = ValueLoc { owner, field, position };
                        match value {
                            Value::Object(child) if placed.insert(*child) => {
                                self.homes.insert(*child, loc);
                                queue.push_back(*child);
                            }
                            Value::Object(child) => {
                                pointed.insert(*child);
                            }
                            Value::Reference(reference) => {
                                if let Some(Handle::Object(target)) = reference.handle() {
                                    referenced.push_back((loc, target));
                                }
                            }
                            Value::Scalar(_) | Value::Enum(_) => {}
                        }
                    }
                }
            }

            let Some((loc, target)) = referenced.pop_front() else { break };
            if placed.insert(target) {
                trace!(%target, owner = %loc.owner, "Object written at its reference");
                self.homes.insert(target, loc);
                queue.push_back(target);
            }
        }

        let reachable = graph.reachable(root)?;
        if let Some(stray) = reachable.into_iter().find(|id| !placed.contains(id)) {
            return Err(SerializationError::format(format!(
                "object {stray} is only reachable through a keyed value and cannot be written"
            )));
        }
        Ok(pointed)
    }

    /// Pointer tokens need a key; pointed objects without one get a generated key.
    fn name_pointed_objects(
        &mut self,
        pointed: FxHashSet<ObjectId>,
    ) -> Result<(), SerializationError> {
        let graph = self.graph;
        let mut taken: FxHashSet<String> = graph
            .ids()
            .filter_map(|id| graph.object(id).ok())
            .flat_map(|object| {
                object.meta().keys().map(|(_, key)| key.to_owned()).collect::<Vec<_>>()
            })
            .collect();

        for id in pointed {
            if graph.object(id)?.meta().has_keys() {
                continue;
            }
            let key = loop {
                let candidate = safe_nanoid!(self.config.generated_key_length);
                if taken.insert(candidate.clone()) {
                    break candidate;
                }
            };
            trace!(%id, key, "Generated key for shared object");
            self.generated.insert(id, key);
        }
        Ok(())
    }

    fn write_object(
        &mut self,
        id: ObjectId,
        declared: Option<&str>,
    ) -> Result<Json, SerializationError> {
        let graph = self.graph;
        let object = graph.object(id)?;
        self.written += 1;

        let mut map = Map::new();
        match declared {
            None => {
                let schema = graph.schema();
                if self.config.emit_model_header {
                    map.insert(MODEL.to_owned(), Json::from(schema.model()));
                }
                map.insert(TYPE.to_owned(), Json::from(object.type_name()));
                if let Some(version) = schema.version().filter(|_| self.config.emit_model_header) {
                    map.insert(VERSION.to_owned(), Json::from(version));
                }
            }
            Some(declared) if declared != object.type_name() => {
                map.insert(TYPE.to_owned(), Json::from(object.type_name()));
            }
            Some(_) => {}
        }

        write_meta(&mut map, object.meta());
        if let Some(key) = self.generated.get(&id) {
            map.insert(KEY.to_owned(), Json::from(key.as_str()));
        }

        for (field, def) in object.type_def().fields().iter().enumerate() {
            let values = object.values(def.name())?;
            if values.is_empty() {
                continue;
            }
            let declared = match def.kind() {
                ValueKind::Object(name) => Some(name.as_str()),
                _ => None,
            };
            let mut items = values
                .iter()
                .enumerate()
                .map(|(position, value)| {
                    self.write_value(ValueLoc { owner: id, field, position }, value, declared)
                })
                .collect::<Result<Vec<_>, _>>()?;
            let json = if def.is_multi() {
                Json::Array(items)
            } else {
                items.pop().unwrap_or(Json::Null)
            };
            map.insert(def.name().to_owned(), json);
        }

        Ok(Json::Object(map))
    }

    fn write_value(
        &mut self,
        loc: ValueLoc,
        value: &Value,
        declared: Option<&str>,
    ) -> Result<Json, SerializationError> {
        match value {
            Value::Object(id) if self.is_home(*id, loc) => self.write_object(*id, declared),
            Value::Object(id) => Ok(self.pointer(self.graph.object(*id)?)),
            Value::Reference(reference) => match reference.handle() {
                Some(Handle::Object(target)) if self.is_home(target, loc) => {
                    self.write_object(target, declared)
                }
                _ => Ok(token(reference.kind().ref_token(), reference.target_key())),
            },
            Value::Scalar(v) => Ok(with_meta(scalar::to_json(v.value())?, v.meta())),
            Value::Enum(v) => Ok(with_meta(Json::from(v.value().member()), v.meta())),
        }
    }

    fn is_home(&self, id: ObjectId, loc: ValueLoc) -> bool {
        self.homes.get(&id) == Some(&loc)
    }

    fn pointer(&self, object: ObjectRef<'_>) -> Json {
        match object.meta().keys().next() {
            Some((kind, key)) => token(kind.ref_token(), key),
            None => token(REF, self.generated.get(&object.id()).map_or("", String::as_str)),
        }
    }
}

fn token(name: &str, key: &str) -> Json {
    let mut map = Map::new();
    map.insert(name.to_owned(), Json::from(key));
    Json::Object(map)
}

fn write_meta(map: &mut Map<String, Json>, meta: &Meta) {
    for (kind, key) in meta.keys() {
        map.insert(kind.key_token().to_owned(), Json::from(key));
    }
    if let Some(scheme) = &meta.scheme {
        map.insert(SCHEME.to_owned(), Json::from(scheme.as_str()));
    }
}

fn with_meta(data: Json, meta: &Meta) -> Json {
    if meta.is_empty() {
        return data;
    }
    let mut map = Map::new();
    map.insert(DATA.to_owned(), data);
    write_meta(&mut map, meta);
    Json::Object(map)
}

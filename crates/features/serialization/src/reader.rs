use crate::error::{SerializationError, SerializationErrorExt};
use crate::scalar;
use rune_domain::constants::{DATA, MODEL, SCHEME, TYPE, is_metadata_token};
use rune_model::{
    Document, EnumValue, FieldDef, Graph, KeyKind, Meta, ObjectId, ObjectRegistry, Reference,
    Schema, Value, ValueKind, ValueLoc, WithMeta,
};
use serde_json::{Map, Value as Json};
use std::sync::Arc;
use tracing::{debug, trace};

/// Builds one document. Keys are registered as objects complete and references
/// are bound in one pass after the whole document is built, so forward
/// references and cycles need no special handling.
pub(crate) struct Reader {
    graph: Graph,
    registry: ObjectRegistry,
    pending: Vec<ValueLoc>,
    strict: bool,
}

impl Reader {
    pub(crate) fn new(schema: Arc<Schema>, strict: bool) -> Self {
        Self {
            graph: Graph::new(schema),
            registry: ObjectRegistry::new(),
            pending: Vec::new(),
            strict,
        }
    }

    pub(crate) fn read(
        mut self,
        json: &Json,
        root_type: Option<&str>,
    ) -> Result<Document, SerializationError> {
        let Json::Object(map) = json else {
            return Err(SerializationError::format("a document must be a JSON object"));
        };

        let schema = Arc::clone(self.graph.schema());
        if let Some(model) = map.get(MODEL)
            && model.as_str() != Some(schema.model())
        {
            return Err(SerializationError::format(format!(
                "document model {model} is not `{}`",
                schema.model()
            )));
        }

        let declared = match (root_type, map.get(TYPE)) {
            (Some(name), _) => name,
            (None, Some(Json::String(name))) => name.as_str(),
            (None, _) => {
                return Err(SerializationError::format(format!(
                    "the root object needs a `{TYPE}` entry"
                )));
            }
        };

        let root = self.read_object(map, declared)?;
        let bound = self.registry.resolve_all(&mut self.graph, self.pending)?;

        debug!(objects = self.graph.len(), references = bound, "Document read");
        Ok(Document { graph: self.graph, root })
    }

    fn read_object(
        &mut self,
        map: &Map<String, Json>,
        declared: &str,
    ) -> Result<ObjectId, SerializationError> {
        let type_name = match map.get(TYPE) {
            Some(Json::String(name)) => name.as_str(),
            Some(other) => {
                return Err(SerializationError::format(format!(
                    "`{TYPE}` must be a string, found {other}"
                )));
            }
            None => declared,
        };
        let ty = Arc::clone(self.graph.schema().type_def(type_name)?);
        if !ty.is_a(declared) {
            return Err(SerializationError::format(format!(
                "`{type_name}` cannot stand where `{declared}` is expected"
            )));
        }

        let id = self.graph.create(type_name)?;
        self.graph.set_meta(id, read_meta(map)?)?;

        for (name, json) in map {
            if is_metadata_token(name) {
                continue;
            }
            if name.starts_with('@') {
                return Err(SerializationError::format(format!(
                    "unknown token `{name}` on `{type_name}`"
                )));
            }

            let (_, def) = ty.lookup(name)?;
            let values = match (def.is_multi(), json) {
                (_, Json::Null) => continue,
                (true, Json::Array(items)) => items
                    .iter()
                    .map(|item| self.read_value(def, item))
                    .collect::<Result<Vec<_>, _>>()?,
                (false, Json::Array(_)) => {
                    return Err(SerializationError::format(format!(
                        "field `{type_name}.{name}` holds a single value, found a list"
                    )));
                }
                (_, single) => vec![self.read_value(def, single)?],
            };
            self.graph
                .set_many(id, name, values)
                .context(format!("reading `{type_name}.{name}`"))?;
        }

        if self.strict {
            self.graph.check_cardinality(id)?;
        }
        self.pending.extend(self.graph.register_keys(id, &mut self.registry)?);

        trace!(%id, r#type = type_name, "Object read");
        Ok(id)
    }

    fn read_value(&mut self, def: &FieldDef, json: &Json) -> Result<Value, SerializationError> {
        if let Json::Object(map) = json
            && let Some(reference) = read_reference(map)?
        {
            return Ok(Value::Reference(reference));
        }

        match def.kind() {
            ValueKind::Object(type_name) => match json {
                Json::Object(map) => Ok(Value::Object(self.read_object(map, type_name)?)),
                other => Err(SerializationError::format(format!(
                    "field `{}` expects an object, found {other}",
                    def.name()
                ))),
            },
            ValueKind::Scalar(kind) => {
                let (data, meta) = unwrap_data(json)?;
                let value = scalar::from_json(*kind, data)?;
                Ok(Value::Scalar(WithMeta::new(value).with_meta(meta)))
            }
            ValueKind::Enum(enumeration) => {
                let (data, meta) = unwrap_data(json)?;
                let member = data.as_str().ok_or_else(|| {
                    SerializationError::format(format!(
                        "field `{}` expects a `{enumeration}` member, found {data}",
                        def.name()
                    ))
                })?;
                let value = EnumValue::new(enumeration.as_str(), member);
                Ok(Value::Enum(WithMeta::new(value).with_meta(meta)))
            }
        }
    }
}

fn read_meta(map: &Map<String, Json>) -> Result<Meta, SerializationError> {
    let mut meta = Meta::default();
    for kind in KeyKind::ALL {
        if let Some(key) = map.get(kind.key_token()) {
            meta.set_key(kind, string_entry(kind.key_token(), key)?);
        }
    }
    if let Some(scheme) = map.get(SCHEME) {
        meta.scheme = Some(string_entry(SCHEME, scheme)?.to_owned());
    }
    Ok(meta)
}

/// A reference token stands alone: `{"@ref": "p1"}` and nothing else.
fn read_reference(map: &Map<String, Json>) -> Result<Option<Reference>, SerializationError> {
    for kind in KeyKind::ALL {
        let token = kind.ref_token();
        if let Some(key) = map.get(token) {
            if let Some(extra) = map.keys().find(|name| name.as_str() != token) {
                return Err(SerializationError::format(format!(
                    "unexpected entry `{extra}` next to `{token}`"
                )));
            }
            return Ok(Some(Reference::of_kind(kind, string_entry(token, key)?)));
        }
    }
    Ok(None)
}

/// Splits `{"@data": v, "@key": ..}` into the value and its metadata.
fn unwrap_data(json: &Json) -> Result<(&Json, Meta), SerializationError> {
    match json {
        Json::Object(map) => {
            let data = map.get(DATA).ok_or_else(|| {
                SerializationError::format(format!(
                    "expected a value or a `{DATA}` entry, found {json}"
                ))
            })?;
            if let Some(extra) = map.keys().find(|name| !is_metadata_token(name)) {
                return Err(SerializationError::format(format!(
                    "unexpected entry `{extra}` next to `{DATA}`"
                )));
            }
            Ok((data, read_meta(map)?))
        }
        other => Ok((other, Meta::default())),
    }
}

fn string_entry<'j>(token: &str, json: &'j Json) -> Result<&'j str, SerializationError> {
    json.as_str().ok_or_else(|| {
        SerializationError::format(format!("`{token}` must be a string, found {json}"))
    })
}

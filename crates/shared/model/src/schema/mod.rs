mod types;

pub use types::{Cardinality, EnumDef, FieldDef, TypeDef, ValueKind};

use crate::error::ModelError;
use fxhash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::debug;

/// Immutable registry of type and enumeration descriptors for one model.
#[derive(Debug)]
pub struct Schema {
    model: String,
    version: Option<String>,
    types: FxHashMap<String, Arc<TypeDef>>,
    order: Vec<String>,
    enums: FxHashMap<String, EnumDef>,
}

impl Schema {
    pub fn builder(model: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder { model: model.into(), version: None, types: Vec::new(), enums: Vec::new() }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// # Errors
    /// Returns [`ModelError::UnknownType`] for undeclared names.
    pub fn type_def(&self, name: &str) -> Result<&Arc<TypeDef>, ModelError> {
        self.types
            .get(name)
            .ok_or_else(|| ModelError::UnknownType { name: name.to_owned(), context: None })
    }

    #[must_use]
    pub fn enumeration(&self, name: &str) -> Option<&EnumDef> {
        self.enums.get(name)
    }

    /// Types in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &Arc<TypeDef>> {
        self.order.iter().filter_map(|name| self.types.get(name))
    }

    /// `true` when `sub` names `sup` or one of its subtypes.
    #[must_use]
    pub fn is_assignable(&self, sub: &str, sup: &str) -> bool {
        self.types.get(sub).is_some_and(|t| t.is_a(sup))
    }
}

/// Collects declarations; [`SchemaBuilder::build`] resolves inheritance and
/// checks every cross reference.
#[derive(Debug)]
pub struct SchemaBuilder {
    model: String,
    version: Option<String>,
    types: Vec<TypeDef>,
    enums: Vec<EnumDef>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn enumeration(mut self, def: EnumDef) -> Self {
        self.enums.push(def);
        self
    }

    #[must_use]
    pub fn data_type(mut self, def: TypeDef) -> Self {
        self.types.push(def);
        self
    }

    /// # Errors
    /// Returns [`ModelError::Schema`] for duplicate declarations, inheritance
    /// cycles, duplicate inherited fields and choice rules naming unknown fields,
    /// and [`ModelError::UnknownType`] for dangling type names.
    pub fn build(self) -> Result<Arc<Schema>, ModelError> {
        let mut enums = FxHashMap::default();
        for def in self.enums {
            let name = def.name().to_owned();
            if enums.insert(name.clone(), def).is_some() {
                return Err(ModelError::schema(format!("enumeration `{name}` is declared twice")));
            }
        }

        let mut declared = FxHashMap::default();
        let mut order = Vec::with_capacity(self.types.len());
        for def in self.types {
            let name = def.name().to_owned();
            if enums.contains_key(&name) || declared.contains_key(&name) {
                return Err(ModelError::schema(format!("type `{name}` is declared twice")));
            }
            order.push(name.clone());
            declared.insert(name, def);
        }

        let mut types = FxHashMap::default();
        for name in &order {
            let flat = flatten(name, &declared)?;
            check_members(&flat, &declared, &enums)?;
            types.insert(name.clone(), Arc::new(flat));
        }

        debug!(model = %self.model, types = types.len(), enums = enums.len(), "Schema built");

        Ok(Arc::new(Schema { model: self.model, version: self.version, types, order, enums }))
    }
}

fn flatten(name: &str, declared: &FxHashMap<String, TypeDef>) -> Result<TypeDef, ModelError> {
    let mut chain: Vec<&TypeDef> = Vec::new();
    let mut seen = FxHashSet::default();
    let mut cursor = Some(name);

    while let Some(current) = cursor {
        if !seen.insert(current) {
            return Err(ModelError::schema(format!("inheritance cycle through `{current}`")));
        }
        let def = declared.get(current).ok_or_else(|| ModelError::UnknownType {
            name: current.to_owned(),
            context: Some(format!("supertype of `{name}`").into()),
        })?;
        chain.push(def);
        cursor = def.supertype();
    }

    let ancestors = chain.iter().skip(1).map(|t| t.name().to_owned()).collect();
    let mut fields = Vec::new();
    let mut conditions = Vec::new();
    for def in chain.iter().rev() {
        let (own_fields, own_conditions) = def.own_parts();
        fields.extend_from_slice(own_fields);
        conditions.extend_from_slice(own_conditions);
    }

    let mut flat = declared[name].clone();
    flat.flatten(ancestors, fields, conditions)?;

    let all: Vec<String> = flat.fields().iter().map(|f| f.name().to_owned()).collect();
    for condition in flat.conditions_mut() {
        if let Some(rule) = condition.choice_rule_mut()
            && rule.fields.is_empty()
        {
            rule.fields.clone_from(&all);
        }
    }

    Ok(flat)
}

fn check_members(
    flat: &TypeDef,
    declared: &FxHashMap<String, TypeDef>,
    enums: &FxHashMap<String, EnumDef>,
) -> Result<(), ModelError> {
    for field in flat.fields() {
        let known = match field.kind() {
            ValueKind::Scalar(_) => true,
            ValueKind::Object(target) => declared.contains_key(target),
            ValueKind::Enum(target) => enums.contains_key(target),
        };
        if !known {
            return Err(ModelError::UnknownType {
                name: field.kind().to_string(),
                context: Some(format!("field `{}.{}`", flat.name(), field.name()).into()),
            });
        }
    }

    for condition in flat.conditions() {
        if let crate::condition::Check::Choice(rule) = condition.check()
            && let Some(missing) = rule.fields.iter().find(|f| flat.field_index(f).is_none())
        {
            return Err(ModelError::schema(format!(
                "condition `{}` on `{}` names unknown field `{missing}`",
                condition.name(),
                flat.name()
            )));
        }
    }

    Ok(())
}

use crate::condition::Condition;
use crate::error::ModelError;
use crate::scalar::ScalarKind;
use fxhash::FxHashMap;
use rune_domain::roles::MetaRoles;
use std::fmt::{self, Display};

/// `lower..upper` bounds on the number of values a field holds; `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cardinality {
    pub lower: usize,
    pub upper: Option<usize>,
}

impl Cardinality {
    pub const OPTIONAL: Self = Self { lower: 0, upper: Some(1) };
    pub const REQUIRED: Self = Self { lower: 1, upper: Some(1) };
    pub const MANY: Self = Self { lower: 0, upper: None };
    pub const AT_LEAST_ONE: Self = Self { lower: 1, upper: None };

    #[must_use]
    pub const fn new(lower: usize, upper: Option<usize>) -> Self {
        Self { lower, upper }
    }

    /// Holds at most one value.
    #[must_use]
    pub const fn is_single(self) -> bool {
        matches!(self.upper, Some(upper) if upper <= 1)
    }

    #[must_use]
    pub const fn is_multi(self) -> bool {
        !self.is_single()
    }

    #[must_use]
    pub const fn is_required(self) -> bool {
        self.lower > 0
    }

    #[must_use]
    pub const fn admits(self, count: usize) -> bool {
        count >= self.lower
            && match self.upper {
                Some(upper) => count <= upper,
                None => true,
            }
    }
}

impl Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upper {
            Some(upper) => write!(f, "({}..{upper})", self.lower),
            None => write!(f, "({}..*)", self.lower),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar(ScalarKind),
    /// A nested object of the named type or one of its subtypes.
    Object(String),
    /// A member of the named enumeration.
    Enum(String),
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Object(name) | Self::Enum(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    name: String,
    kind: ValueKind,
    cardinality: Cardinality,
    roles: MetaRoles,
}

impl FieldDef {
    /// An optional single-valued field.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            cardinality: Cardinality::OPTIONAL,
            roles: MetaRoles::empty(),
        }
    }

    pub fn scalar(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::new(name, ValueKind::Scalar(kind))
    }

    pub fn object(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Object(type_name.into()))
    }

    pub fn enumeration(name: impl Into<String>, enum_name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Enum(enum_name.into()))
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.cardinality.lower = 1;
        self
    }

    /// Unbounded upper cardinality.
    #[must_use]
    pub const fn multi(mut self) -> Self {
        self.cardinality.upper = None;
        self
    }

    #[must_use]
    pub const fn cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    #[must_use]
    pub const fn roles(mut self, roles: MetaRoles) -> Self {
        self.roles = roles;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> &ValueKind {
        &self.kind
    }

    #[must_use]
    pub const fn bounds(&self) -> Cardinality {
        self.cardinality
    }

    #[must_use]
    pub const fn allowed_roles(&self) -> MetaRoles {
        self.roles
    }

    #[must_use]
    pub const fn is_multi(&self) -> bool {
        self.cardinality.is_multi()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    name: String,
    members: Vec<String>,
}

impl EnumDef {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { name: name.into(), members: members.into_iter().map(Into::into).collect() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    #[must_use]
    pub fn contains(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member)
    }
}

/// Descriptor of one data type. Once registered in a [`super::Schema`] the
/// field list is flattened (supertype fields first) and indexed by name.
#[derive(Debug, Clone)]
pub struct TypeDef {
    name: String,
    supertype: Option<String>,
    ancestors: Vec<String>,
    fields: Vec<FieldDef>,
    index: FxHashMap<String, usize>,
    conditions: Vec<Condition>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertype: None,
            ancestors: Vec::new(),
            fields: Vec::new(),
            index: FxHashMap::default(),
            conditions: Vec::new(),
        }
    }

    #[must_use]
    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertype = Some(supertype.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn supertype(&self) -> Option<&str> {
        self.supertype.as_deref()
    }

    /// Supertype chain, nearest first.
    #[must_use]
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Conditions in evaluation order, inherited ones first.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Accessor-table lookup of a field by name.
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownField`] when the type has no such field.
    pub fn lookup(&self, name: &str) -> Result<(usize, &FieldDef), ModelError> {
        self.field_index(name).map(|i| (i, &self.fields[i])).ok_or_else(|| {
            ModelError::UnknownField {
                type_name: self.name.clone(),
                field: name.to_owned(),
                context: None,
            }
        })
    }

    #[must_use]
    pub fn field_at(&self, index: usize) -> Option<&FieldDef> {
        self.fields.get(index)
    }

    /// `true` when values of this type may stand where `other` is expected.
    #[must_use]
    pub fn is_a(&self, other: &str) -> bool {
        self.name == other || self.ancestors.iter().any(|a| a == other)
    }

    pub(crate) fn own_parts(&self) -> (&[FieldDef], &[Condition]) {
        (&self.fields, &self.conditions)
    }

    /// Installs the flattened member lists and builds the accessor table.
    pub(crate) fn flatten(
        &mut self,
        ancestors: Vec<String>,
        fields: Vec<FieldDef>,
        conditions: Vec<Condition>,
    ) -> Result<(), ModelError> {
        let mut index = FxHashMap::default();
        for (i, field) in fields.iter().enumerate() {
            if index.insert(field.name().to_owned(), i).is_some() {
                return Err(ModelError::schema(format!(
                    "field `{}` is declared twice on `{}` or its supertypes",
                    field.name(),
                    self.name
                )));
            }
        }
        self.ancestors = ancestors;
        self.fields = fields;
        self.index = index;
        self.conditions = conditions;
        Ok(())
    }

    pub(crate) fn conditions_mut(&mut self) -> &mut [Condition] {
        &mut self.conditions
    }
}

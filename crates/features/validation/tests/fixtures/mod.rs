use rune_model::*;
use rust_decimal::Decimal;
use std::sync::Arc;

fn positive_or_unset(object: ObjectRef<'_>, allow_zero: bool) -> Result<bool, ModelError> {
    let value = object.scalar("value")?.and_then(Scalar::as_decimal);
    Ok(value.is_none_or(|v| if allow_zero { v >= Decimal::ZERO } else { v > Decimal::ZERO }))
}

/// Quantities with units, a non-negative subtype and baskets of quantities.
/// # Panics
/// * If the schema declarations are inconsistent.
#[must_use]
pub fn quantity_schema() -> Arc<Schema> {
    Schema::builder("demo.quantity")
        .data_type(
            TypeDef::new("UnitType")
                .field(FieldDef::scalar("currency", ScalarKind::String).roles(MetaRoles::KEYED_REF))
                .field(FieldDef::scalar("capacityUnit", ScalarKind::String))
                .condition(Condition::one_of("UnitChoice", ["currency", "capacityUnit"])),
        )
        .data_type(
            TypeDef::new("Frequency")
                .field(FieldDef::scalar("periodMultiplier", ScalarKind::Int).required()),
        )
        .data_type(
            TypeDef::new("Quantity")
                .field(FieldDef::scalar("value", ScalarKind::Number))
                .field(FieldDef::object("unit", "UnitType").required())
                .field(FieldDef::object("frequency", "Frequency"))
                .condition(
                    Condition::rule("ValueExists", |q| q.is_set("value"))
                        .describe("a quantity needs a value"),
                ),
        )
        .data_type(
            TypeDef::new("NonNegativeQuantity")
                .extends("Quantity")
                .condition(Condition::rule("NonNegative", |q| positive_or_unset(q, true))),
        )
        .data_type(
            TypeDef::new("Basket")
                .field(FieldDef::scalar("label", ScalarKind::String))
                .field(FieldDef::scalar("code", ScalarKind::String))
                .field(FieldDef::object("item", "Quantity").multi())
                .field(FieldDef::object("next", "Basket"))
                .condition(Condition::optional_choice("LabelOrCode", ["label", "code"]))
                .condition(
                    Condition::rule("AllPositive", |o| {
                        if o.type_def().is_a("Quantity") {
                            positive_or_unset(o, false)
                        } else {
                            Ok(true)
                        }
                    })
                    .recursive(),
                ),
        )
        .build()
        .expect("Quantity schema is consistent")
}

#[must_use]
pub fn eur() -> DataObject {
    DataObject::new("UnitType").set("currency", "EUR")
}

#[must_use]
pub fn quantity(type_name: &str, value: i64) -> DataObject {
    DataObject::new(type_name).set("value", Decimal::from(value)).set("unit", eur())
}

/// # Panics
/// * If `draft` does not satisfy the field cardinalities.
#[must_use]
pub fn document(draft: DataObject) -> Document {
    let mut graph = Graph::new(quantity_schema());
    let root = graph.insert(draft).expect("Draft inserts");
    graph.resolve_references().expect("References resolve");
    Document { graph, root }
}

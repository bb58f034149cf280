use rune_model::*;
use std::sync::Arc;

/// A small trade model: parties with accounts, a trade pointing at its parties.
/// # Panics
/// * If the schema declarations are inconsistent.
#[must_use]
pub fn trade_schema() -> Arc<Schema> {
    Schema::builder("demo.trade")
        .version("1.0.0")
        .enumeration(EnumDef::new("Currency", ["EUR", "USD", "GBP"]))
        .data_type(
            TypeDef::new("Account")
                .field(FieldDef::scalar("number", ScalarKind::String).required())
                .field(FieldDef::enumeration("currency", "Currency")),
        )
        .data_type(
            TypeDef::new("Party")
                .field(FieldDef::scalar("name", ScalarKind::String).required())
                .field(FieldDef::object("account", "Account").multi()),
        )
        .data_type(
            TypeDef::new("LegalEntity")
                .extends("Party")
                .field(FieldDef::scalar("lei", ScalarKind::String)),
        )
        .data_type(
            TypeDef::new("Trade")
                .field(FieldDef::scalar("tradeId", ScalarKind::String).required())
                .field(
                    FieldDef::scalar("tradeDate", ScalarKind::Date).roles(MetaRoles::KEYED_REF),
                )
                .field(
                    FieldDef::scalar("settlementDate", ScalarKind::Date)
                        .roles(MetaRoles::KEYED_REF),
                )
                .field(FieldDef::object("party", "Party").multi())
                .field(FieldDef::object("buyer", "Party"))
                .field(FieldDef::object("seller", "Party")),
        )
        .build()
        .expect("Trade schema is consistent")
}

/// Assets hold exactly one of their options, and every option has an identifier.
/// # Panics
/// * If the schema declarations are inconsistent.
#[must_use]
pub fn asset_schema() -> Arc<Schema> {
    Schema::builder("demo.asset")
        .enumeration(EnumDef::new("Currency", ["EUR", "USD", "GBP"]))
        .data_type(
            TypeDef::new("Cash")
                .field(FieldDef::scalar("identifier", ScalarKind::String).required())
                .field(FieldDef::enumeration("currency", "Currency")),
        )
        .data_type(
            TypeDef::new("Security")
                .field(FieldDef::scalar("identifier", ScalarKind::String).required())
                .field(FieldDef::scalar("isin", ScalarKind::String)),
        )
        .data_type(
            TypeDef::new("Asset")
                .field(FieldDef::object("cash", "Cash"))
                .field(FieldDef::object("security", "Security"))
                .condition(Condition::one_of("AssetChoice", ["cash", "security"])),
        )
        .data_type(
            TypeDef::new("Holding")
                .field(FieldDef::object("asset", "Asset"))
                .field(FieldDef::scalar("quantity", ScalarKind::Int)),
        )
        .build()
        .expect("Asset schema is consistent")
}

#[must_use]
pub fn cash(identifier: &str) -> DataObject {
    DataObject::new("Cash")
        .set("identifier", identifier)
        .set("currency", EnumValue::new("Currency", "EUR"))
}

#[must_use]
pub fn security(identifier: &str, isin: &str) -> DataObject {
    DataObject::new("Security").set("identifier", identifier).set("isin", isin)
}

#[must_use]
pub fn account(number: &str) -> DataObject {
    DataObject::new("Account")
        .set("number", number)
        .set("currency", EnumValue::new("Currency", "EUR"))
}

#[must_use]
pub fn party(key: &str, name: &str) -> DataObject {
    DataObject::new("Party").key(key).set("name", name)
}

/// Two parties, the first with two accounts, referenced as buyer and seller.
/// # Panics
/// * If the graph cannot be built or resolved.
#[must_use]
pub fn sample_trade() -> Document {
    let mut graph = Graph::new(trade_schema());
    let root = graph
        .insert(
            DataObject::new("Trade")
                .set("tradeId", "T-1")
                .push(
                    "party",
                    party("p1", "Alpha")
                        .push("account", account("A-1"))
                        .push("account", account("A-2")),
                )
                .push("party", party("p2", "Beta"))
                .set("buyer", Reference::new("p1"))
                .set("seller", Reference::new("p2")),
        )
        .expect("Trade inserts");
    graph.resolve_references().expect("References resolve");
    Document { graph, root }
}

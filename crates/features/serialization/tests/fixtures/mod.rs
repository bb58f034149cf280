use rune_model::*;
use rune_serialization::JsonCodec;
use std::sync::Arc;

/// Trades, parties and accounts, plus a self-referencing `Node` for cycles.
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
                .field(FieldDef::enumeration("currency", "Currency").roles(MetaRoles::KEYED_REF)),
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
                .field(FieldDef::scalar("price", ScalarKind::Number))
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
        .data_type(
            TypeDef::new("Node")
                .field(FieldDef::scalar("name", ScalarKind::String))
                .field(FieldDef::object("next", "Node"))
                .field(FieldDef::object("peer", "Node").multi()),
        )
        .build()
        .expect("Trade schema is consistent")
}

#[must_use]
pub fn codec() -> JsonCodec {
    JsonCodec::new(trade_schema())
}

/// A trade whose buyer is referenced before the party list declares it.
pub const FORWARD_REFERENCE: &str = r#"{
    "@model": "demo.trade",
    "@type": "Trade",
    "@version": "1.0.0",
    "tradeId": "T-1",
    "buyer": { "@ref": "p1" },
    "seller": { "@ref:external": "LEI-2" },
    "party": [
        { "@key": "p1", "name": "Alpha", "account": [ { "number": "A-1", "currency": "EUR" } ] },
        { "@type": "LegalEntity", "@key:external": "LEI-2", "name": "Beta", "lei": "LEI-2" }
    ]
}"#;

/// # Panics
/// * If the graph cannot be built.
#[must_use]
pub fn node(graph: &mut Graph, name: &str) -> ObjectId {
    let id = graph.create("Node").expect("Node is declared");
    graph.set(id, "name", name).expect("name is declared");
    id
}

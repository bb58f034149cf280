use rune::model::*;
use std::sync::Arc;

/// Parties and trades; a trade must not buy from itself.
/// # Panics
/// * If the schema declarations are inconsistent.
#[must_use]
pub fn trade_schema() -> Arc<Schema> {
    Schema::builder("demo.trade")
        .version("1.0.0")
        .data_type(
            TypeDef::new("Party")
                .field(FieldDef::scalar("name", ScalarKind::String).required())
                .field(FieldDef::scalar("lei", ScalarKind::String)),
        )
        .data_type(
            TypeDef::new("Trade")
                .field(FieldDef::scalar("tradeId", ScalarKind::String).required())
                .field(FieldDef::scalar("price", ScalarKind::Number))
                .field(FieldDef::object("party", "Party").multi())
                .field(FieldDef::object("buyer", "Party"))
                .field(FieldDef::object("seller", "Party"))
                .condition(
                    Condition::rule("BuyerIsNotSeller", |trade| {
                        let buyer = trade.get("buyer")?.objects();
                        let seller = trade.get("seller")?.objects();
                        Ok(buyer.first().is_none() || buyer.first() != seller.first())
                    })
                    .describe("a trade needs two distinct counterparties"),
                ),
        )
        .build()
        .expect("Trade schema is consistent")
}

pub const VALID_TRADE: &str = r#"{
    "@model": "demo.trade",
    "@type": "Trade",
    "@version": "1.0.0",
    "tradeId": "T-1",
    "price": 99.50,
    "buyer": { "@ref": "p1" },
    "seller": { "@ref": "p2" },
    "party": [ { "@key": "p1", "name": "Alpha" }, { "@key": "p2", "name": "Beta" } ]
}"#;

pub const SELF_TRADE: &str = r#"{
    "@type": "Trade",
    "tradeId": "T-2",
    "buyer": { "@ref": "p1" },
    "seller": { "@ref": "p1" },
    "party": [ { "@key": "p1", "name": "Alpha" } ]
}"#;

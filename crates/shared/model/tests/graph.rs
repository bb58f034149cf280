pub mod fixtures;

use chrono::NaiveDate;
use fixtures::*;
use rune_model::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn missing_required_field_is_structural() {
    let mut graph = Graph::new(trade_schema());
    let draft = DataObject::new("Trade").push("party", party("p1", "Alpha"));
    let err = graph.insert(draft).unwrap_err();
    assert_eq!(err.kind(), "Structural");
    assert!(err.to_string().contains("tradeId"), "{err}");
}

#[test]
fn single_valued_field_rejects_a_second_value() {
    let mut graph = Graph::new(trade_schema());
    let trade = graph.create("Trade").unwrap();
    graph.set(trade, "tradeId", "T-1").unwrap();

    let err = graph.push(trade, "tradeId", "T-2").unwrap_err();
    assert_eq!(err.kind(), "Structural");
}

#[test]
fn values_must_match_the_declared_kind() {
    let mut graph = Graph::new(trade_schema());
    let trade = graph.create("Trade").unwrap();

    assert_eq!(graph.set(trade, "tradeId", 42_i64).unwrap_err().kind(), "Structural");
    assert_eq!(
        graph.set(trade, "tradeId", EnumValue::new("Currency", "EUR")).unwrap_err().kind(),
        "Structural"
    );

    let account = graph.create("Account").unwrap();
    assert_eq!(
        graph.set(account, "currency", EnumValue::new("Currency", "JPY")).unwrap_err().kind(),
        "Structural"
    );
    assert_eq!(graph.set(trade, "buyer", account).unwrap_err().kind(), "Structural");
}

#[test]
fn subtypes_fit_supertype_fields() {
    let mut graph = Graph::new(trade_schema());
    let root = graph
        .insert(
            DataObject::new("Trade")
                .set("tradeId", "T-1")
                .set(
                    "buyer",
                    DataObject::new("LegalEntity").set("name", "Gamma").set("lei", "LEI-1"),
                ),
        )
        .unwrap();

    let trade = graph.object(root).unwrap();
    let buyer = trade.get("buyer").unwrap().objects()[0];
    assert_eq!(buyer.type_name(), "LegalEntity");
    assert!(buyer.type_def().is_a("Party"));
    assert_eq!(buyer.scalar("lei").unwrap().and_then(Scalar::as_str), Some("LEI-1"));
}

#[test]
fn undeclared_metadata_roles_are_rejected() {
    let mut graph = Graph::new(trade_schema());
    let trade = graph.create("Trade").unwrap();

    let keyed = WithMeta::new(Scalar::from("T-1")).key("id");
    let err = graph.set(trade, "tradeId", keyed).unwrap_err();
    assert_eq!(err.kind(), "Structural");

    let err = graph.set(trade, "tradeId", Reference::new("id")).unwrap_err();
    assert_eq!(err.kind(), "Structural");

    graph.set(trade, "tradeDate", WithMeta::new(Scalar::from(date(2024, 1, 2))).key("td")).unwrap();
    let err = graph.set(trade, "settlementDate", Reference::scoped("td")).unwrap_err();
    assert_eq!(err.kind(), "Structural");
}

#[test]
fn blank_keys_are_rejected() {
    let mut graph = Graph::new(trade_schema());
    let trade = graph.create("Trade").unwrap();
    let blank = Meta::default().with_key(KeyKind::Internal, " ");
    assert_eq!(graph.set_meta(trade, blank).unwrap_err().kind(), "Structural");
    assert_eq!(graph.set(trade, "buyer", Reference::new("")).unwrap_err().kind(), "Structural");
}

#[test]
fn keyed_scalars_can_be_referenced() {
    let mut graph = Graph::new(trade_schema());
    let root = graph
        .insert(
            DataObject::new("Trade")
                .set("tradeId", "T-1")
                .set("tradeDate", WithMeta::new(Scalar::from(date(2024, 3, 1))).key("trade-date"))
                .set("settlementDate", Reference::new("trade-date")),
        )
        .unwrap();

    assert_eq!(graph.resolve_references().unwrap(), 1);
    let trade = graph.object(root).unwrap();
    assert_eq!(trade.scalar("settlementDate").unwrap(), Some(&Scalar::Date(date(2024, 3, 1))));

    let stored = &trade.values("settlementDate").unwrap()[0];
    let reference = stored.as_reference().unwrap();
    assert!(matches!(
        reference.state(),
        Resolution::Resolved(Handle::Value(loc)) if loc.owner == root
    ));
}

#[test]
fn forward_references_and_cycles_resolve() {
    let mut graph = Graph::new(trade_schema());
    let trade = graph.create("Trade").unwrap();
    graph.set(trade, "tradeId", "T-1").unwrap();
    graph.set(trade, "buyer", Reference::new("late")).unwrap();

    let late = graph.create("Party").unwrap();
    graph.set_meta(late, Meta::default().with_key(KeyKind::Internal, "late")).unwrap();
    graph.set(late, "name", "Late").unwrap();
    graph.push(trade, "party", late).unwrap();

    assert_eq!(graph.resolve_references().unwrap(), 1);
    let reached = graph.reachable(trade).unwrap();
    assert_eq!(reached, vec![trade, late]);

    let buyer = graph.object(trade).unwrap().get("buyer").unwrap().objects()[0];
    assert_eq!(buyer.id(), late);
}

#[test]
fn missing_target_fails_the_reference() {
    let mut graph = Graph::new(trade_schema());
    let trade = graph.create("Trade").unwrap();
    graph.set(trade, "tradeId", "T-1").unwrap();
    graph.set(trade, "buyer", Reference::new("ghost")).unwrap();

    let err = graph.resolve_references().unwrap_err();
    assert!(matches!(
        err,
        ModelError::ReferenceResolution { ref key, kind: KeyKind::Internal, .. } if key == "ghost"
    ));

    let object = graph.object(trade).unwrap();
    let reference = object.values("buyer").unwrap()[0].as_reference().unwrap();
    assert_eq!(reference.state(), Resolution::Failed);
    assert_eq!(object.get("buyer").unwrap_err().kind(), "ReferenceResolution");
}

#[test]
fn references_only_match_their_own_key_kind() {
    let mut graph = Graph::new(trade_schema());
    graph
        .insert(
            DataObject::new("Trade")
                .set("tradeId", "T-1")
                .push("party", party("p1", "Alpha"))
                .set("buyer", Reference::external("p1")),
        )
        .unwrap();

    let err = graph.resolve_references().unwrap_err();
    assert!(matches!(err, ModelError::ReferenceResolution { kind: KeyKind::External, .. }));
}

#[test]
fn incompatible_targets_are_rejected() {
    let mut graph = Graph::new(trade_schema());
    graph
        .insert(
            DataObject::new("Trade")
                .set("tradeId", "T-1")
                .push("party", party("p1", "Alpha").push("account", account("A-1").key("acc")))
                .set("buyer", Reference::new("acc")),
        )
        .unwrap();

    let err = graph.resolve_references().unwrap_err();
    assert_eq!(err.kind(), "ReferenceResolution");
    assert!(err.to_string().contains("Account"), "{err}");
}

#[test]
fn duplicate_keys_collide() {
    let mut graph = Graph::new(trade_schema());
    graph
        .insert(
            DataObject::new("Trade")
                .set("tradeId", "T-1")
                .push("party", party("p1", "Alpha"))
                .push("party", party("p1", "Beta")),
        )
        .unwrap();

    let err = graph.resolve_references().unwrap_err();
    assert!(matches!(err, ModelError::RegistryKeyCollision { ref key, .. } if key == "p1"));
}

#[test]
fn failed_resolution_keeps_earlier_bindings() {
    let mut document = sample_trade();
    let before = document.root().get("buyer").unwrap().objects()[0].id();

    let duplicate = document.graph.insert(party("p1", "Gamma")).unwrap();
    document.graph.push(document.root, "party", duplicate).unwrap();
    document.graph.set(document.root, "seller", Reference::new("ghost")).unwrap();

    let err = document.graph.resolve_references().unwrap_err();
    assert_eq!(err.kind(), "RegistryKeyCollision");

    let root = document.root();
    let seller = root.values("seller").unwrap()[0].as_reference().unwrap();
    assert_eq!(seller.state(), Resolution::Unresolved);
    let buyer = root.values("buyer").unwrap()[0].as_reference().unwrap();
    assert_eq!(buyer.state(), Resolution::Resolved(Handle::Object(before)));
    assert_eq!(root.get("buyer").unwrap().objects()[0].id(), before);
}

#[test]
fn deep_equality_follows_identity() {
    let left = sample_trade();
    let right = sample_trade();
    assert!(left.deep_eq(&right));

    // Same values, but the buyer is a copy instead of the first party.
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
                .set(
                    "buyer",
                    DataObject::new("Party")
                        .set("name", "Alpha")
                        .push("account", account("A-1"))
                        .push("account", account("A-2")),
                )
                .set("seller", Reference::new("p2")),
        )
        .unwrap();
    graph.resolve_references().unwrap();
    let copied = Document { graph, root };
    assert!(!left.deep_eq(&copied));

    let mut changed = sample_trade();
    let first = changed.root().get("party").unwrap().objects()[0].id();
    changed.graph.set(first, "name", "Alpha Ltd").unwrap();
    assert!(!left.deep_eq(&changed));
}

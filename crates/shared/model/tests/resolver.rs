pub mod fixtures;

use fixtures::*;
use pretty_assertions::assert_eq;
use rune_model::*;

fn names(projection: &Projection<'_>) -> Vec<String> {
    projection.scalars().iter().filter_map(|s| s.as_str()).map(ToOwned::to_owned).collect()
}

#[test]
fn single_object_yields_field_value_or_absent() {
    let doc = sample_trade();
    let trade = doc.root();

    let id = trade.get("tradeId").unwrap();
    assert_eq!(id.single().and_then(|item| item.as_scalar()).and_then(Scalar::as_str), Some("T-1"));
    assert!(trade.get("tradeDate").unwrap().is_absent());
    assert_eq!(trade.scalar("tradeId").unwrap(), Some(&Scalar::from("T-1")));
}

#[test]
fn single_valued_field_projects_one_entry_per_element() {
    let doc = sample_trade();
    let projection = doc.root().path("party.name").unwrap();

    assert!(matches!(projection, Projection::Many(ref items) if items.len() == 2));
    assert_eq!(names(&projection), ["Alpha", "Beta"]);
}

#[test]
fn multi_valued_field_concatenates_in_element_order() {
    let doc = sample_trade();
    let trade = doc.root();

    let accounts = trade.path("party.account").unwrap();
    assert_eq!(accounts.count(), 2);

    let numbers = trade.path("party.account.number").unwrap();
    assert_eq!(names(&numbers), ["A-1", "A-2"]);
}

#[test]
fn explicit_absences_are_kept_when_some_elements_are_set() {
    let mut graph = Graph::new(trade_schema());
    let root = graph
        .insert(
            DataObject::new("Trade")
                .set("tradeId", "T-2")
                .push("party", party("p1", "Alpha").push("account", account("A-1")))
                .push(
                    "party",
                    party("p2", "Beta")
                        .push("account", DataObject::new("Account").set("number", "B-1")),
                ),
        )
        .unwrap();
    let trade = graph.object(root).unwrap();

    let currencies = trade.path("party.account.currency").unwrap();
    let Projection::Many(items) = &currencies else {
        panic!("expected a collection, got {currencies:?}");
    };
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].and_then(|item| item.as_enum()).map(EnumValue::member), Some("EUR"));
    assert!(items[1].is_none());
    assert_eq!(currencies.count(), 1);
}

#[test]
fn collection_where_no_element_is_set_is_absent() {
    let mut graph = Graph::new(trade_schema());
    let root = graph
        .insert(
            DataObject::new("Trade")
                .set("tradeId", "T-3")
                .push("party", party("p1", "Alpha"))
                .push("party", party("p2", "Beta")),
        )
        .unwrap();

    let trade = graph.object(root).unwrap();
    assert!(trade.path("party.account").unwrap().is_absent());
    assert!(trade.path("party.account.number").unwrap().is_absent());
}

#[test]
fn resolved_references_read_as_their_targets() {
    let doc = sample_trade();
    let trade = doc.root();

    assert_eq!(names(&trade.path("buyer.name").unwrap()), ["Alpha"]);
    assert_eq!(names(&trade.path("seller.name").unwrap()), ["Beta"]);

    let buyer = trade.get("buyer").unwrap().single().and_then(|item| item.as_object()).unwrap();
    let first_party = trade.get("party").unwrap().objects()[0];
    assert_eq!(buyer, first_party);
    assert_eq!(names(&trade.path("buyer.account.number").unwrap()), ["A-1", "A-2"]);
}

#[test]
fn enum_receivers_have_no_attributes() {
    let doc = sample_trade();
    let projection = doc.root().path("party.account.currency.code").unwrap();
    assert!(projection.is_absent());
}

#[test]
fn scalar_receivers_are_not_navigable() {
    let doc = sample_trade();
    let err = doc.root().path("tradeId.length").unwrap_err();
    assert_eq!(err.kind(), "NotNavigable");
}

#[test]
fn unknown_fields_are_rejected() {
    let doc = sample_trade();
    let err = doc.root().get("notional").unwrap_err();
    assert!(matches!(err, ModelError::UnknownField { ref field, .. } if field == "notional"));

    let err = doc.root().path("party.notional").unwrap_err();
    assert_eq!(err.kind(), "UnknownField");
}

#[test]
fn slices_of_objects_and_free_function_agree() {
    let doc = sample_trade();
    let trade = doc.root();

    let parties = trade.get("party").unwrap().objects();
    let from_slice = parties.as_slice().resolve("name").unwrap();
    assert_eq!(from_slice, trade.path("party.name").unwrap());

    let via_fn = resolve(&trade, "tradeId").unwrap();
    assert_eq!(via_fn, trade.get("tradeId").unwrap());
}

#[test]
fn existence_counts_present_items() {
    let doc = sample_trade();
    let trade = doc.root();

    let parties = trade.get("party").unwrap();
    assert!(parties.exists(Necessity::Any));
    assert!(parties.exists(Necessity::Multiple));
    assert!(!parties.exists(Necessity::Single));

    let buyer = trade.get("buyer").unwrap();
    assert!(buyer.exists(Necessity::Single));
    assert!(!buyer.exists(Necessity::Multiple));

    let unset = trade.get("tradeDate").unwrap();
    assert!(!unset.exists(Necessity::Any));
    assert!(!unset.exists(Necessity::Single));

    // Only the first party has accounts, so one of the two entries is set.
    assert!(trade.path("party.account.number").unwrap().exists(Necessity::Multiple));
    assert!(trade.path("party.name").unwrap().exists(Necessity::default()));
}

#[test]
fn only_element_needs_exactly_one_present_item() {
    let doc = sample_trade();
    let trade = doc.root();

    let buyer = trade.get("buyer").unwrap().only_element().and_then(|item| item.as_object());
    assert_eq!(buyer, Some(trade.get("party").unwrap().objects()[0]));
    assert_eq!(trade.get("party").unwrap().only_element(), None);
    assert_eq!(trade.get("tradeDate").unwrap().only_element(), None);

    let mut graph = Graph::new(trade_schema());
    let root = graph
        .insert(
            DataObject::new("Trade")
                .set("tradeId", "T-4")
                .push("party", party("p1", "Alpha").push("account", account("A-1")))
                .push("party", party("p2", "Beta")),
        )
        .unwrap();
    let numbers = graph.object(root).unwrap().path("party.account.number").unwrap();
    let only = numbers.only_element().and_then(|item| item.as_scalar());
    assert_eq!(only.and_then(Scalar::as_str), Some("A-1"));
}

#[test]
fn only_exists_rejects_other_set_fields() {
    let mut graph = Graph::new(asset_schema());
    let cash_only = graph.insert(DataObject::new("Asset").set("cash", cash("C-1"))).unwrap();
    let both = graph
        .insert(
            DataObject::new("Asset")
                .set("cash", cash("C-2"))
                .set("security", security("S-2", "XS0000000002")),
        )
        .unwrap();

    let asset = graph.object(cash_only).unwrap();
    assert!(asset.only_exists(&["cash"]).unwrap());
    assert!(!asset.only_exists(&["security"]).unwrap());
    assert!(!asset.only_exists(&["cash", "security"]).unwrap());

    let asset = graph.object(both).unwrap();
    assert!(!asset.only_exists(&["cash"]).unwrap());
    assert!(asset.only_exists(&["cash", "security"]).unwrap());

    let err = asset.only_exists(&["bond"]).unwrap_err();
    assert_eq!(err.kind(), "UnknownField");
}

#[test]
fn only_exists_checks_fields_of_the_holding_object() {
    let mut graph = Graph::new(asset_schema());
    let held = graph
        .insert(
            DataObject::new("Holding")
                .set("asset", DataObject::new("Asset").set("cash", cash("C-1")))
                .set("quantity", 10_i64),
        )
        .unwrap();
    let empty = graph.insert(DataObject::new("Holding").set("quantity", 5_i64)).unwrap();

    let holding = graph.object(held).unwrap();
    assert!(holding.only_exists(&["asset.cash"]).unwrap());
    assert!(!holding.only_exists(&["asset.security"]).unwrap());
    // `quantity` is set as well, so `asset` is not the only field of the holding.
    assert!(!holding.only_exists(&["asset"]).unwrap());
    assert!(holding.only_exists(&["asset", "quantity"]).unwrap());

    assert!(!graph.object(empty).unwrap().only_exists(&["asset.cash"]).unwrap());
}

#[test]
fn deep_resolution_reads_whichever_option_is_set() {
    let mut graph = Graph::new(asset_schema());
    let by_cash = graph.insert(DataObject::new("Asset").set("cash", cash("C-1"))).unwrap();
    let by_security = graph
        .insert(DataObject::new("Asset").set("security", security("S-1", "XS0000000001")))
        .unwrap();
    let unset = graph.insert(DataObject::new("Asset")).unwrap();
    let nested = DataObject::new("Asset").set("cash", cash("C-9"));
    let holding = graph.insert(DataObject::new("Holding").set("asset", nested)).unwrap();

    let asset = graph.object(by_cash).unwrap();
    assert_eq!(names(&asset.resolve_deep("identifier").unwrap()), ["C-1"]);
    assert!(asset.resolve_deep("isin").unwrap().is_absent());

    let asset = graph.object(by_security).unwrap();
    assert_eq!(names(&asset.resolve_deep("identifier").unwrap()), ["S-1"]);
    assert_eq!(names(&asset.resolve_deep("isin").unwrap()), ["XS0000000001"]);

    assert!(graph.object(unset).unwrap().resolve_deep("identifier").unwrap().is_absent());

    // Fields the type declares itself are read directly, nested choices are searched.
    let holding = graph.object(holding).unwrap();
    assert_eq!(holding.resolve_deep("quantity").unwrap(), holding.get("quantity").unwrap());
    assert_eq!(names(&holding.resolve_deep("identifier").unwrap()), ["C-9"]);

    let err = asset.resolve_deep("notional").unwrap_err();
    assert!(matches!(err, ModelError::UnknownField { ref field, .. } if field == "notional"));
}

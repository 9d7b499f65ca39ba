// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn typed_getters_only_match_their_kind() {
    let mut attrs = Attributes::new();
    attrs.set("server.home.dir", "/opt/wildfly");
    attrs.set("server.autopublish", true);
    attrs.set("server.port", 8080i64);

    assert_eq!(attrs.get_string("server.home.dir"), Some("/opt/wildfly"));
    assert_eq!(attrs.get_bool("server.autopublish"), Some(true));
    assert_eq!(attrs.get_int("server.port"), Some(8080));

    // Wrong-kind lookups return None rather than coercing.
    assert_eq!(attrs.get_string("server.port"), None);
    assert_eq!(attrs.get_int("server.home.dir"), None);
    assert_eq!(attrs.get_bool("missing"), None);
}

#[test]
fn set_default_does_not_overwrite() {
    let mut attrs = Attributes::new();
    attrs.set("server.host", "example.org");
    attrs.set_default("server.host", "localhost");
    attrs.set_default("server.port", 8080i64);

    assert_eq!(attrs.get_string("server.host"), Some("example.org"));
    assert_eq!(attrs.get_int("server.port"), Some(8080));
}

#[test]
fn value_kinds() {
    assert_eq!(AttributeValue::from(true).kind(), AttributeKind::Bool);
    assert_eq!(AttributeValue::from(1i64).kind(), AttributeKind::Int);
    assert_eq!(AttributeValue::from("x").kind(), AttributeKind::String);
    assert_eq!(AttributeValue::List(vec![]).kind(), AttributeKind::List);
    assert_eq!(AttributeValue::Map(HashMap::new()).kind(), AttributeKind::Map);
}

#[test]
fn attribute_kind_tags() {
    assert_eq!(AttributeKind::None.to_string(), "none");
    assert_eq!(AttributeKind::Bool.to_string(), "bool");
    assert_eq!(AttributeKind::Map.to_string(), "map");
}

#[test]
fn untagged_serde_round_trip() {
    let mut attrs = Attributes::new();
    attrs.set("flag", true);
    attrs.set("count", 3i64);
    attrs.set("name", "wfly");
    let json = serde_json::to_string(&attrs).unwrap();
    let parsed: Attributes = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, attrs);
}

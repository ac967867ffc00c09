use tpe_core::{
    Compound, Error, MemoryProvider, Operator, QueryParams, TagKind, TagNode, TagPath, TypeHint,
    check_requirement, children, coerce, evaluate, query_value, read, set_value, write,
    write_with,
};

fn compound(entries: Vec<(&str, TagNode)>) -> Compound {
    entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn path(s: &str) -> TagPath {
    TagPath::parse(s).unwrap()
}

// {Data: {LevelName: "Old", GameType: 0}}
fn level() -> Compound {
    compound(vec![(
        "Data",
        TagNode::Compound(compound(vec![
            ("LevelName", TagNode::from("Old")),
            ("GameType", TagNode::Int(0)),
        ])),
    )])
}

fn provider() -> MemoryProvider {
    MemoryProvider::new().with_world("My World", level())
}

#[test]
fn render_leaves_and_containers() {
    assert_eq!(TagNode::Byte(-3).render(), "-3");
    assert_eq!(TagNode::Short(300).render(), "300");
    assert_eq!(TagNode::Int(5).render(), "5");
    assert_eq!(TagNode::Long(9_000_000_000).render(), "9000000000");
    assert_eq!(TagNode::Float(1.0).render(), "1.0");
    assert_eq!(TagNode::Float(0.5).render(), "0.5");
    assert_eq!(TagNode::Double(2.25).render(), "2.25");
    assert_eq!(TagNode::from("hi there").render(), "hi there");
    assert_eq!(TagNode::Compound(Compound::new()).render(), "{compound}");
    let list = TagNode::List(vec![TagNode::Int(1), TagNode::Int(2), TagNode::Int(3)]);
    assert_eq!(list.render(), "[list:3]");
}

#[test]
fn render_floats_outside_plain_range_in_exponent_form() {
    assert_eq!(TagNode::Double(1e300).render(), "1.0E300");
    assert_eq!(TagNode::Double(-2.5e10).render(), "-2.5E10");
    assert_eq!(TagNode::Double(1.5e-5).render(), "1.5E-5");
    assert_eq!(TagNode::Float(1e7).render(), "1.0E7");
    assert_eq!(TagNode::Double(9_999_999.0).render(), "9999999.0");
    assert_eq!(TagNode::Double(0.001).render(), "0.001");
    assert_eq!(TagNode::Double(0.0).render(), "0.0");
    assert_eq!(TagNode::Double(f64::INFINITY).render(), "Infinity");
    assert_eq!(TagNode::Float(f32::NAN).render(), "NaN");
}

#[test]
fn path_parse_rejects_empty_segments() {
    assert_eq!(path("Data.LevelName").segments(), ["Data", "LevelName"]);
    assert_eq!(path("a.b.c").to_string(), "a.b.c");
    assert!(matches!(TagPath::parse(""), Err(Error::Format(_))));
    assert!(matches!(TagPath::parse("a..b"), Err(Error::Format(_))));
    assert!(matches!(TagPath::parse(".a"), Err(Error::Format(_))));
}

#[test]
fn read_descends_compounds_and_lists() {
    let root = compound(vec![(
        "Inventory",
        TagNode::List(vec![TagNode::Compound(compound(vec![(
            "id",
            TagNode::from("minecraft:stone"),
        )]))]),
    )]);
    assert_eq!(
        read(&root, &path("Inventory.0.id")),
        Some(&TagNode::from("minecraft:stone"))
    );
    assert_eq!(read(&root, &path("Inventory")).map(TagNode::render).as_deref(), Some("[list:1]"));
    assert!(read(&root, &path("Inventory.5.id")).is_none());
    assert!(read(&root, &path("Inventory.first")).is_none());
    assert!(read(&root, &path("Inventory.0.id.more")).is_none());
    assert!(read(&root, &path("Missing")).is_none());
}

#[test]
fn children_lists_keys_and_indices() {
    let mut root = level();
    write(
        &mut root,
        &path("Data.Inventory"),
        TagNode::List(vec![TagNode::Compound(Compound::new()), TagNode::Int(3)]),
    )
    .unwrap();

    let top = children(&root, None).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].key_or_index, "Data");
    assert_eq!(top[0].kind, TagKind::Compound);
    assert_eq!(top[0].len, Some(3));

    let data = children(&root, Some(&path("Data"))).unwrap();
    let keys: Vec<_> = data.iter().map(|c| c.key_or_index.as_str()).collect();
    assert_eq!(keys, ["LevelName", "GameType", "Inventory"]);
    assert_eq!(data[1].kind, TagKind::Int);
    assert_eq!(data[1].len, None);

    let items = children(&root, Some(&path("Data.Inventory"))).unwrap();
    let idx: Vec<_> = items.iter().map(|c| (c.key_or_index.as_str(), c.len)).collect();
    assert_eq!(idx, [("0", Some(0)), ("1", None)]);

    assert!(children(&root, Some(&path("Data.GameType"))).unwrap().is_empty());
    assert!(children(&root, Some(&path("Data.Missing"))).is_none());
    assert!(children(&root, Some(&path("Data.Inventory.9"))).is_none());
}

#[test]
fn write_autovivifies_intermediate_compounds() {
    let mut root = Compound::new();
    write(&mut root, &path("a.b.c"), TagNode::Int(7)).unwrap();
    let a = read(&root, &path("a")).unwrap();
    assert!(a.as_compound().is_some());
    assert!(read(&root, &path("a.b")).unwrap().as_compound().is_some());
    assert_eq!(read(&root, &path("a.b.c")), Some(&TagNode::Int(7)));
    assert_eq!(a.child_count(), Some(1));
}

#[test]
fn write_conflict_leaves_tree_unmodified() {
    let mut root = compound(vec![("a", TagNode::from("x"))]);
    let before = root.clone();
    let err = write(&mut root, &path("a.b"), TagNode::Int(1)).unwrap_err();
    match err {
        Error::PathConflict { segment, found } => {
            assert_eq!(segment, "a");
            assert_eq!(found, tpe_core::TagKind::String);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(root, before);

    let mut root = compound(vec![("items", TagNode::List(vec![Compound::new().into()]))]);
    let before = root.clone();
    assert!(matches!(
        write(&mut root, &path("items.0.count"), TagNode::Int(1)),
        Err(Error::PathConflict { .. })
    ));
    assert_eq!(root, before);
}

#[test]
fn write_replaces_any_previous_variant() {
    let mut root = compound(vec![("x", TagNode::Compound(compound(vec![("y", TagNode::Int(1))])))]);
    write(&mut root, &path("x"), TagNode::from("flat")).unwrap();
    assert_eq!(read(&root, &path("x")), Some(&TagNode::from("flat")));
}

#[test]
fn failed_build_does_not_create_containers() {
    let mut root = Compound::new();
    let res = write_with(&mut root, &path("new.branch.leaf"), |prev| {
        coerce("abc", TypeHint::Int, prev)
    });
    assert!(matches!(res, Err(Error::Parse { hint: TypeHint::Int, .. })));
    assert!(root.is_empty());
}

#[test]
fn write_keeps_key_order_on_replace() {
    let mut root = level();
    write(&mut root, &path("Data.LevelName"), TagNode::from("New")).unwrap();
    let data = read(&root, &path("Data")).unwrap().as_compound().unwrap();
    let keys: Vec<&str> = data.keys().map(String::as_str).collect();
    assert_eq!(keys, ["LevelName", "GameType"]);
}

#[test]
fn type_hints_parse_case_insensitively() {
    assert_eq!("AUTO".parse::<TypeHint>().unwrap(), TypeHint::Auto);
    assert_eq!("".parse::<TypeHint>().unwrap(), TypeHint::Auto);
    assert_eq!("Bool".parse::<TypeHint>().unwrap(), TypeHint::Byte);
    assert_eq!("boolean".parse::<TypeHint>().unwrap(), TypeHint::Byte);
    assert_eq!("Integer".parse::<TypeHint>().unwrap(), TypeHint::Int);
    assert_eq!("DOUBLE".parse::<TypeHint>().unwrap(), TypeHint::Double);
    assert!(matches!("uuid".parse::<TypeHint>(), Err(Error::UnknownType(t)) if t == "uuid"));
}

#[test]
fn auto_type_preserves_existing_variant() {
    let mut root = compound(vec![("n", TagNode::Int(5))]);
    write_with(&mut root, &path("n"), |prev| coerce("7", TypeHint::Auto, prev)).unwrap();
    assert_eq!(read(&root, &path("n")), Some(&TagNode::Int(7)));

    assert_eq!(coerce("7", TypeHint::Auto, None).unwrap(), TagNode::from("7"));
    let prev = TagNode::List(vec![]);
    assert_eq!(coerce("7", TypeHint::Auto, Some(&prev)).unwrap(), TagNode::from("7"));
    let prev = TagNode::Double(1.5);
    assert_eq!(coerce("2", TypeHint::Auto, Some(&prev)).unwrap(), TagNode::Double(2.0));
}

#[test]
fn explicit_hint_wins_over_previous() {
    let prev = TagNode::Int(5);
    assert_eq!(coerce("5", TypeHint::String, Some(&prev)).unwrap(), TagNode::from("5"));
    assert_eq!(coerce("5", TypeHint::Long, Some(&prev)).unwrap(), TagNode::Long(5));
}

#[test]
fn boolean_literals_map_to_bytes() {
    assert_eq!(coerce("true", TypeHint::Byte, None).unwrap(), TagNode::Byte(1));
    assert_eq!(coerce("TRUE", TypeHint::Byte, None).unwrap(), TagNode::Byte(1));
    assert_eq!(coerce("False", TypeHint::Byte, None).unwrap(), TagNode::Byte(0));
    assert_eq!(coerce("2", TypeHint::Byte, None).unwrap(), TagNode::Byte(2));
    assert_eq!(coerce("-128", TypeHint::Byte, None).unwrap(), TagNode::Byte(-128));
    assert!(matches!(
        coerce("300", TypeHint::Byte, None),
        Err(Error::Parse { hint: TypeHint::Byte, text }) if text == "300"
    ));
}

#[test]
fn numeric_coercion() {
    assert_eq!(coerce("-12", TypeHint::Short, None).unwrap(), TagNode::Short(-12));
    assert_eq!(coerce("123456", TypeHint::Int, None).unwrap(), TagNode::Int(123456));
    assert_eq!(
        coerce("9000000000", TypeHint::Long, None).unwrap(),
        TagNode::Long(9_000_000_000)
    );
    assert_eq!(coerce("1e3", TypeHint::Float, None).unwrap(), TagNode::Float(1000.0));
    assert_eq!(coerce("0.25", TypeHint::Double, None).unwrap(), TagNode::Double(0.25));
    assert!(matches!(coerce("1.5", TypeHint::Int, None), Err(Error::Parse { .. })));
    assert!(matches!(coerce("70000", TypeHint::Short, None), Err(Error::Parse { .. })));
    assert!(matches!(coerce("1,5", TypeHint::Double, None), Err(Error::Parse { .. })));
}

#[test]
fn non_finite_floats_are_rejected() {
    for text in ["NaN", "nan", "inf", "-infinity", "Infinity"] {
        assert!(
            matches!(coerce(text, TypeHint::Float, None), Err(Error::Parse { hint: TypeHint::Float, .. })),
            "{text}"
        );
        assert!(
            matches!(coerce(text, TypeHint::Double, None), Err(Error::Parse { hint: TypeHint::Double, .. })),
            "{text}"
        );
    }
    // overflows to infinity when narrowed to f32
    assert!(matches!(coerce("1e40", TypeHint::Float, None), Err(Error::Parse { .. })));
    assert_eq!(coerce("1e40", TypeHint::Double, None).unwrap(), TagNode::Double(1e40));
}

#[test]
fn comparison_operators() {
    assert!(Operator::Eq.apply("1", "1"));
    assert!(!Operator::Eq.apply("1", "1.0"));
    assert!(Operator::Ne.apply("1", "1.0"));
    assert!(!Operator::Eq.apply("Test", "test"));
    assert!(Operator::Contains.apply("My Test World", "test"));
    assert!(!Operator::Contains.apply("My World", "test"));
    assert!(Operator::Gt.apply("2", "1.5"));
    assert!(Operator::Le.apply("1.0", "1"));
    assert!(Operator::Ge.apply("3", "3"));
    assert!(!Operator::Lt.apply("3", "3"));
    // ordering on non-numeric text is never satisfied
    assert!(!Operator::Gt.apply("abc", "1"));
    assert!(!Operator::Lt.apply("abc", "1"));
    assert!(!Operator::Ge.apply("{compound}", "0"));
}

#[test]
fn operator_spellings() {
    for (text, op) in [
        ("==", Operator::Eq),
        ("Equals", Operator::Eq),
        ("notequals", Operator::Ne),
        ("CONTAINS", Operator::Contains),
        ("greater", Operator::Gt),
        ("less", Operator::Lt),
        ("GreaterOrEquals", Operator::Ge),
        ("lessorequals", Operator::Le),
    ] {
        assert_eq!(text.parse::<Operator>().unwrap(), op, "{text}");
    }
    assert!(evaluate("5", ">", "1").unwrap());
    assert!(matches!(evaluate("5", "~=", "1"), Err(Error::UnknownOperator(op)) if op == "~="));
}

#[test]
fn scenario_a_set_level_name() {
    let p = provider();
    let outcome = set_value(&p, "My World|Data.LevelName|New Name|auto").unwrap();
    assert_eq!(outcome.value, TagNode::from("New Name"));
    assert_eq!(outcome.previous, Some(TagNode::from("Old")));
    assert_eq!(p.persist_count(), 1);

    let expected = compound(vec![(
        "Data",
        TagNode::Compound(compound(vec![
            ("LevelName", TagNode::from("New Name")),
            ("GameType", TagNode::Int(0)),
        ])),
    )]);
    assert_eq!(p.world("My World").unwrap(), expected);
}

#[test]
fn set_defaults_to_auto_and_keeps_int() {
    let p = provider();
    let outcome = set_value(&p, " My World | Data.GameType | 1 ").unwrap();
    assert_eq!(outcome.value, TagNode::Int(1));
    assert_eq!(outcome.to_string(), "My World -> Data.GameType = 1 (int)");
    let root = p.world("My World").unwrap();
    assert_eq!(read(&root, &path("Data.GameType")), Some(&TagNode::Int(1)));
}

#[test]
fn set_creates_new_typed_leaf() {
    let p = provider();
    set_value(&p, "My World|Data.Flags.hardcore|true|bool").unwrap();
    let root = p.world("My World").unwrap();
    assert_eq!(read(&root, &path("Data.Flags.hardcore")), Some(&TagNode::Byte(1)));
}

#[test]
fn set_failures_do_not_mutate_or_persist() {
    let p = provider();
    assert!(matches!(
        set_value(&p, "My World|Data.New.Score|many|int"),
        Err(Error::Parse { .. })
    ));
    assert!(matches!(
        set_value(&p, "My World|Data.LevelName.Sub|x"),
        Err(Error::PathConflict { .. })
    ));
    assert!(matches!(
        set_value(&p, "My World|Data.X|1|uuid"),
        Err(Error::UnknownType(_))
    ));
    assert!(matches!(set_value(&p, "My World|Data.X"), Err(Error::Format(_))));
    assert!(matches!(set_value(&p, "   "), Err(Error::Format(_))));
    assert!(matches!(set_value(&p, "|Data.X|1"), Err(Error::Format(_))));
    assert!(matches!(
        set_value(&p, "Other World|Data.X|1"),
        Err(Error::NotFound(w)) if w == "Other World"
    ));
    assert_eq!(p.persist_count(), 0);
    assert_eq!(p.world("My World").unwrap(), level());
}

#[test]
fn set_twice_is_idempotent() {
    let once = provider();
    set_value(&once, "My World|a.b.c|42|long").unwrap();
    let twice = provider();
    set_value(&twice, "My World|a.b.c|42|long").unwrap();
    set_value(&twice, "My World|a.b.c|42|long").unwrap();
    assert_eq!(once.world("My World"), twice.world("My World"));
}

#[test]
fn scenario_b_requirement_checks() {
    let p = provider();
    assert!(check_requirement(&p, "My World|Data.GameType|==|0"));
    assert!(!check_requirement(&p, "My World|Data.GameType|>|1"));
    assert!(check_requirement(&p, "My World|Data.GameType|<=|0"));
    assert!(check_requirement(&p, "My World|Data.LevelName|contains|OL"));
    assert!(!check_requirement(&p, "My World|Data.LevelName|>|1"));
}

#[test]
fn requirement_failures_are_false() {
    let p = provider();
    assert!(!check_requirement(&p, "My World|Data.GameType|==")); // 3 fields
    assert!(!check_requirement(&p, "My World|Data.GameType|==|0|extra"));
    assert!(!check_requirement(&p, "My World|Data.GameType|~|0"));
    assert!(!check_requirement(&p, "Nowhere|Data.GameType|==|0"));
    assert!(!check_requirement(&p, "My World|Data.Missing|!=|0"));
    assert!(!check_requirement(&p, ""));
}

#[test]
fn scenario_c_query_default() {
    let p = provider();
    let params = QueryParams::new("Data.Missing").world("My World").default_value("n/a");
    assert_eq!(query_value(&p, &params), "n/a");
    let params = QueryParams::new("Data.LevelName").world("My World");
    assert_eq!(query_value(&p, &params), "Old");
    let params = QueryParams::new("Data").world("My World");
    assert_eq!(query_value(&p, &params), "{compound}");
}

#[test]
fn query_degrades_to_text() {
    let p = provider();
    // no current world configured and no default given
    assert_eq!(query_value(&p, &QueryParams::new("Data.LevelName")), "null");
    let params = QueryParams::new("Data.LevelName").world("Nowhere").default_value("none");
    assert_eq!(query_value(&p, &params), "none");
    let params = QueryParams { world: Some("My World".into()), ..QueryParams::default() };
    assert_eq!(query_value(&p, &params), "ERROR: path not specified");
    assert_eq!(query_value(&MemoryProvider::new(), &QueryParams::default()), "ERROR: path not specified");
    assert_eq!(query_value(&p, &QueryParams::new("  ")), "ERROR: path not specified");
    let params = QueryParams::new("Data..Name").world("My World");
    assert!(query_value(&p, &params).starts_with("ERROR:"));
}

#[test]
fn current_world_sentinel() {
    let p = provider().with_current("My World");
    assert_eq!(query_value(&p, &QueryParams::new("Data.LevelName")), "Old");
    assert!(check_requirement(&p, "CURRENT|Data.GameType|==|0"));
    set_value(&p, "current|Data.GameType|3").unwrap();
    let root = p.world("My World").unwrap();
    assert_eq!(read(&root, &path("Data.GameType")), Some(&TagNode::Int(3)));
}

#[test]
fn query_params_from_json() {
    let bare = QueryParams::from_json(r#"{"world":"My World","path":"Data.GameType"}"#).unwrap();
    assert_eq!(bare, QueryParams::new("Data.GameType").world("My World"));

    let wrapped = QueryParams::from_json(
        r#"{"placeholder":"nbt_value","values":{"path":"Data.LevelName","default":"?"}}"#,
    )
    .unwrap();
    assert_eq!(wrapped, QueryParams::new("Data.LevelName").default_value("?"));
    assert!(QueryParams::from_json("not json").is_err());
}

use methodql_core::EntityProperties;
use methodql_query::{Defect, Direction, GrammarConfig, IgnoreCaseMode, OperatorKind, QueryGrammar};
use serde_json::json;

const PERSON: &str = r#"[
    {"name": "firstName", "category": "String"},
    {"name": "lastName", "category": "String"},
    {"name": "age", "category": "PrimitiveNumber"},
    {"name": "salary", "category": "BoxedNumber"},
    {"name": "birthday", "category": "Date"},
    {"name": "status", "category": "Other"}
]"#;

fn person() -> EntityProperties {
    EntityProperties::from_json(PERSON).unwrap()
}

#[test]
fn parses_a_full_query_name() {
    let tree = methodql_query::parse(
        "findDistinctTop5ByLastNameIgnoreCaseAndAgeBetweenOrStatusIsNotNullOrderByBirthdayDescFirstNameAsc",
        &person(),
    )
    .unwrap();

    assert!(tree.is_valid());
    assert!(tree.is_distinct());
    assert_eq!(tree.max_results(), Some(5));
    assert_eq!(tree.predicate().branches().len(), 2);
    assert_eq!(tree.parameter_count(), 3);

    let parts: Vec<_> = tree.parts().collect();
    assert_eq!(parts[0].ignore_case(), IgnoreCaseMode::PerProperty);
    assert_eq!(parts[1].operator(), OperatorKind::Between);
    assert_eq!(parts[2].operator(), OperatorKind::IsNotNull);

    let order = tree.order().items();
    assert_eq!(order[0].property().name(), "birthday");
    assert_eq!(tree.direction_of(&order[0]), Direction::Desc);
}

#[test]
fn completes_while_typing() {
    let props = person();
    let options = methodql_query::options("findByFirstNameStartsWithOr", &props).unwrap();
    assert!(options.contains("findByFirstNameStartsWithOrLastName"));
    assert!(options.contains("findByFirstNameStartsWithOrderBy"));
    assert!(!options.contains("findByFirstNameStartsWithOr"));

    let options = methodql_query::options("findByBirthdayBe", &props).unwrap();
    let expected: Vec<String> = vec![
        "findByBirthdayBefore".to_string(),
        "findByBirthdayBetween".to_string(),
    ];
    assert_eq!(options.into_iter().collect::<Vec<_>>(), expected);
}

#[test]
fn grammar_from_json_config() {
    let config = GrammarConfig::from_json(
        &json!({ "prefixes": ["fetch"], "missing_direction": "Ascending" }).to_string(),
    )
    .unwrap();
    let grammar = QueryGrammar::new(config).unwrap();
    let props = person();

    assert!(grammar.is_valid("fetchBySalaryGreaterThanOrderByAge", &props));
    let tree = grammar.parse("findBySalary", &props).unwrap();
    assert_eq!(tree.defects(), &[Defect::MissingPrefix]);
}

#[test]
fn exports_parse_results_as_json() {
    let tree = methodql_query::parse("readByStatusOrAgeLessThan", &person()).unwrap();
    let value = serde_json::to_value(&tree).unwrap();

    assert_eq!(value["source"], "readByStatusOrAgeLessThan");
    assert_eq!(value["prefix"], "read");
    let branches = value["predicate"]["branches"].as_array().unwrap();
    assert_eq!(branches.len(), 2);
    assert_eq!(branches[1]["parts"][0]["operator"], "LessThan");
}

#[test]
fn malformed_names_are_errors() {
    let props = person();
    let err = methodql_query::parse("findByAgeOrOrStatus", &props).unwrap_err();
    assert!(err.is_malformed_grammar());

    let err = methodql_query::parse("findBy-Age", &props).unwrap_err();
    assert!(err.is_invalid_argument());
}

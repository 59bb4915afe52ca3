use graphql_parser::query::{Definition, OperationDefinition};
use litmus::queries;

fn operation_name(document: &str) -> Option<String> {
    let parsed = graphql_parser::parse_query::<String>(document).expect("valid graphql document");
    assert_eq!(parsed.definitions.len(), 1, "one operation per document");

    match &parsed.definitions[0] {
        Definition::Operation(OperationDefinition::Query(query)) => query.name.clone(),
        Definition::Operation(OperationDefinition::Mutation(mutation)) => mutation.name.clone(),
        other => panic!("unexpected definition: {other:?}"),
    }
}

#[test]
fn every_document_parses_and_is_named() {
    for (name, document) in queries::ALL {
        assert_eq!(operation_name(document).as_deref(), Some(*name), "{name}");
    }
}

#[test]
fn document_names_are_unique() {
    let mut names: Vec<_> = queries::ALL.iter().map(|(name, _)| *name).collect();
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), total);
}

#[test]
fn mutations_and_queries_are_declared_as_such() {
    for document in [
        queries::CREATE_ENVIRONMENT,
        queries::SAVE_EXPERIMENT,
        queries::RUN_EXPERIMENT,
        queries::REGISTER_INFRA,
        queries::DELETE_INFRA,
        queries::ADD_PROBE,
        queries::DELETE_PROBE,
    ] {
        assert!(document.trim_start().starts_with("mutation "), "{document}");
    }
    for document in [queries::LIST_ENVIRONMENTS, queries::GET_PROBE, queries::SERVER_VERSION] {
        assert!(document.trim_start().starts_with("query "), "{document}");
    }
}

#[test]
fn run_document_takes_variables() {
    let parsed = graphql_parser::parse_query::<String>(queries::RUN_EXPERIMENT).unwrap();
    let Definition::Operation(OperationDefinition::Mutation(mutation)) = &parsed.definitions[0] else {
        panic!("run is a mutation");
    };
    let variables: Vec<_> = mutation
        .variable_definitions
        .iter()
        .map(|variable| variable.name.as_str())
        .collect();
    assert_eq!(variables, vec!["experimentID", "projectID"]);
}

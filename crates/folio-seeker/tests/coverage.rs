//! Integration tests across resolution, formatting and sorting.

use std::cmp::Ordering;

use folio_seeker::{
    classify, AccessError, Classification, FnFormatter, FormatterRegistry, Locale,
    PropertyPath, PropertyResolver, Record, SeekerError, SortEngine, SortState, Strength,
    Collator, Value, ValueType,
};
use serde_json::{json, Map};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Clone)]
struct Label(&'static str);

#[derive(Debug, Clone)]
struct Book {
    title: &'static str,
    label: Label,
    author: Option<Author>,
}

#[derive(Debug, Clone)]
struct Author {
    surname: &'static str,
}

impl Record for Author {
    fn property(&self, name: &str) -> Result<Value<'_>, AccessError> {
        match name {
            "surname" => Ok(Value::from(self.surname)),
            _ => Err(AccessError::Unknown),
        }
    }
}

impl Record for Book {
    fn property(&self, name: &str) -> Result<Value<'_>, AccessError> {
        match name {
            "title" => Ok(Value::from(self.title)),
            "label" => Ok(Value::Custom(&self.label)),
            "author" => Ok(self.author.as_ref().map_or(Value::Null, |a| Value::Record(a))),
            _ => Err(AccessError::Unknown),
        }
    }
}

fn book(title: &'static str, label: &'static str, surname: Option<&'static str>) -> Book {
    Book {
        title,
        label: Label(label),
        author: surname.map(|surname| Author { surname }),
    }
}

fn label_formatter() -> FormatterRegistry {
    FormatterRegistry::new().with(FnFormatter::new(ValueType::custom::<Label>(), |v, _| {
        v.downcast_ref::<Label>().map(|l| l.0.to_string()).unwrap_or_default()
    }))
}

fn path(raw: &str) -> PropertyPath {
    PropertyPath::parse(raw).unwrap()
}

fn titles(books: &[Book]) -> Vec<&'static str> {
    books.iter().map(|b| b.title).collect()
}

// ============================================================================
// Sorting by nested paths
// ============================================================================

#[test]
fn sorts_by_nested_path_with_null_links_first() {
    let resolver = PropertyResolver::new();
    let formatters = FormatterRegistry::new();
    let engine = SortEngine::new(&resolver, &formatters, &Locale::default());

    let mut books = vec![
        book("Dune", "x", Some("Herbert")),
        book("Anonymous", "x", None),
        book("Emma", "x", Some("Austen")),
    ];
    engine
        .apply_if_requested(&mut books, &SortState::ascending(path("author.surname")))
        .unwrap();

    assert_eq!(titles(&books), ["Anonymous", "Emma", "Dune"]);
}

// ============================================================================
// Formatter-driven collation
// ============================================================================

#[test]
fn formatted_values_sort_with_collation() {
    let resolver = PropertyResolver::new();
    let formatters = label_formatter();
    let engine = SortEngine::new(&resolver, &formatters, &Locale::new("fr"));

    let mut books = vec![
        book("a", "zèbre", None),
        book("b", "Éclair", None),
        book("c", "abricot", None),
    ];
    engine
        .apply_if_requested(&mut books, &SortState::ascending(path("label")))
        .unwrap();
    assert_eq!(titles(&books), ["c", "b", "a"]);

    engine
        .apply_if_requested(&mut books, &SortState::descending(path("label")))
        .unwrap();
    assert_eq!(titles(&books), ["a", "b", "c"]);
}

#[test]
fn collator_strength_controls_ties() {
    let resolver = PropertyResolver::new();
    let formatters = label_formatter();
    let engine = SortEngine::new(&resolver, &formatters, &Locale::default())
        .with_collator(Collator::new(&Locale::default()).with_strength(Strength::Primary));

    let a = book("a", "Resume", None);
    let b = book("b", "résumé", None);
    let state = SortState::ascending(path("label"));

    assert_eq!(engine.compare(&a, &b, &state).unwrap(), Ordering::Equal);
}

#[test]
fn formatter_for_another_type_does_not_apply() {
    #[derive(Debug)]
    struct Other;

    let registry =
        FormatterRegistry::new().with(FnFormatter::new(ValueType::custom::<Other>(), |_, _| {
            String::new()
        }));
    let label = Label("x");

    assert!(matches!(
        classify(&Value::Custom(&label), &registry),
        Classification::Incomparable
    ));
}

#[test]
fn unformatted_custom_values_fail_to_sort() {
    let resolver = PropertyResolver::new();
    let formatters = FormatterRegistry::new();
    let engine = SortEngine::new(&resolver, &formatters, &Locale::default());

    let mut books = vec![book("a", "x", None), book("b", "y", None)];
    let err = engine
        .apply_if_requested(&mut books, &SortState::ascending(path("label")))
        .unwrap_err();

    assert!(matches!(err, SeekerError::NotComparable { .. }));
    assert!(err.to_string().contains("label"));
}

// ============================================================================
// JSON records
// ============================================================================

#[test]
fn sorts_json_objects() {
    let resolver = PropertyResolver::new();
    let formatters = FormatterRegistry::new();
    let engine = SortEngine::new(&resolver, &formatters, &Locale::default());

    let mut rows: Vec<Map<String, serde_json::Value>> = [
        json!({ "name": "b", "meta": { "rank": 2 } }),
        json!({ "name": "a", "meta": { "rank": 3 } }),
        json!({ "name": "c", "meta": null }),
    ]
    .into_iter()
    .filter_map(|v| v.as_object().cloned())
    .collect();

    engine
        .apply_if_requested(&mut rows, &SortState::descending(path("meta.rank")))
        .unwrap();

    let names: Vec<_> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["c", "a", "b"]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn error_messages_name_the_path() {
    let err = PropertyPath::parse("a..b").unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid property path 'a..b': every segment must be an identifier"
    );

    let resolver = PropertyResolver::new();
    let err = resolver
        .resolve(&book("a", "x", None), &path("isbn"))
        .unwrap_err();
    assert!(err.to_string().contains("'isbn'"));
}

//! The six worked example programs, run through the full
//! `lex -> parse -> standardize -> build_control -> Machine` pipeline.

use pretty_assertions::assert_eq;

#[test]
fn identity_and_arithmetic() {
    assert_eq!(rpal::run_source("let f x = x+1 in f 41").unwrap(), "42");
}

#[test]
fn conditional_absolute_value() {
    assert_eq!(rpal::run_source("let abs n = n ls 0 -> -n | n in abs (-7)").unwrap(), "7");
}

#[test]
fn tuple_indexing_and_order() {
    assert_eq!(rpal::run_source("let t = 1,2,3 in (t 2) + (Order t)").unwrap(), "5");
}

#[test]
fn recursion_via_ystar() {
    assert_eq!(rpal::run_source("let rec fact n = n eq 0 -> 1 | n * fact(n-1) in fact 5").unwrap(), "120");
}

#[test]
fn string_primitives_stem_stern_conc() {
    assert_eq!(rpal::run_source("Conc (Stem 'Hello') (Stern 'World')").unwrap(), "Horld");
}

#[test]
fn istuple_type_predicate() {
    assert_eq!(rpal::run_source("Istuple (1,2)").unwrap(), "true");
    assert_eq!(rpal::run_source("Istuple 3").unwrap(), "false");
}

#[test]
fn aug_associativity_matches_flattened_tuple_construction() {
    let chained = rpal::run_source("((1,2) aug 3) aug 4").unwrap();
    let flattened = rpal::run_source("(1,2) aug (3,4)").unwrap();
    assert_eq!(chained, flattened);
    assert_eq!(chained, "(1, 2, 3, 4)");
}

#[test]
fn calling_an_unbound_name_surfaces_as_an_evaluation_error() {
    assert!(rpal::run_source("let x = 1 in y 3").is_err());
}

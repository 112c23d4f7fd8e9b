//! Renders the final stack-top symbol as the program's answer (spec §4.E
//! "Result formatter").

use crate::symbol::Symbol;

/// `Tup` renders as `(e1, e2, ..., en)`, recursively; every other symbol
/// renders as its own textual data (spec §4.E, "all other symbols render as
/// their data").
pub fn format(symbol: &Symbol) -> String {
    symbol.to_string()
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn scalar_renders_as_its_own_text() {
        assert_eq!(format(&Symbol::Int(42)), "42");
        assert_eq!(format(&Symbol::Bool(true)), "true");
    }

    #[test]
    fn tuple_renders_recursively() {
        let inner = Symbol::Tup(Rc::new(vec![Symbol::Int(1), Symbol::Int(2)]));
        let outer = Symbol::Tup(Rc::new(vec![inner, Symbol::Str("x".into())]));
        assert_eq!(format(&outer), "((1, 2), x)");
    }
}

//! Rewrites `let`/`where`/`fn`(multi-param)/`within`/`and`/`rec`/
//! `function_form`/`@` nodes into the canonical `lambda`/`gamma`/`->`/`tau`
//! form the control builder consumes, by the standard RPAL rewrite rules.
//!
//! Every rule here produces a `=` node shaped `(binder, value)` for
//! definitions, or rewrites an expression node in place; nothing is dropped,
//! only desugared.

use crate::ast::AstNode;
use crate::error::RpalError;

pub fn standardize(tree: &AstNode) -> Result<AstNode, RpalError> {
    standardize_expr(tree)
}

fn err(message: impl Into<String>) -> RpalError {
    RpalError::Standardize { message: message.into() }
}

fn standardize_expr(node: &AstNode) -> Result<AstNode, RpalError> {
    match node.label.as_str() {
        "let" => {
            let [d, e] = require_children(node, 2)?;
            let (binder, rhs) = standardize_definition(d)?;
            let body = standardize_expr(e)?;
            Ok(AstNode::new("gamma", vec![AstNode::new("lambda", vec![binder, body]), rhs]))
        }
        "where" => {
            let [e, dr] = require_children(node, 2)?;
            let (binder, rhs) = standardize_definition(dr)?;
            let body = standardize_expr(e)?;
            Ok(AstNode::new("gamma", vec![AstNode::new("lambda", vec![binder, body]), rhs]))
        }
        "lambda" => standardize_lambda(&node.children),
        "@" => {
            let [e1, name, e2] = require_children(node, 3)?;
            let e1 = standardize_expr(e1)?;
            let e2 = standardize_expr(e2)?;
            Ok(AstNode::new("gamma", vec![AstNode::new("gamma", vec![name.clone(), e1]), e2]))
        }
        _ => {
            let children =
                node.children.iter().map(standardize_expr).collect::<Result<Vec<_>, _>>()?;
            Ok(AstNode::new(node.label.clone(), children))
        }
    }
}

/// Right-folds a flat `lambda(Vb1, .., Vbn, body)` node into nested
/// single-parameter lambdas.
fn standardize_lambda(children: &[AstNode]) -> Result<AstNode, RpalError> {
    if children.len() < 2 {
        return Err(err("lambda node needs at least one parameter and a body"));
    }
    let (params, body) = children.split_at(children.len() - 1);
    let body = standardize_expr(&body[0])?;
    Ok(params.iter().rev().fold(body, |acc, param| AstNode::new("lambda", vec![param.clone(), acc])))
}

/// Standardizes a definition (`D`/`Da`/`Dr`/`Db` node) into a `(binder,
/// value)` pair, ready to be wrapped as `lambda(binder, ...)` by the caller.
fn standardize_definition(node: &AstNode) -> Result<(AstNode, AstNode), RpalError> {
    match node.label.as_str() {
        "=" => {
            let [binder, rhs] = require_children(node, 2)?;
            Ok((binder.clone(), standardize_expr(rhs)?))
        }
        "function_form" => {
            let (name, rest) = node
                .children
                .split_first()
                .ok_or_else(|| err("function_form node needs a name"))?;
            let lambda_chain = standardize_lambda(rest)?;
            Ok((name.clone(), lambda_chain))
        }
        "within" => {
            let [d1, d2] = require_children(node, 2)?;
            let (x1, e1) = standardize_definition(d1)?;
            let (x2, e2) = standardize_definition(d2)?;
            Ok((x2, AstNode::new("gamma", vec![AstNode::new("lambda", vec![x1, e2]), e1])))
        }
        "and" => {
            let mut binders = Vec::with_capacity(node.children.len());
            let mut values = Vec::with_capacity(node.children.len());
            for child in &node.children {
                let (x, e) = standardize_definition(child)?;
                binders.push(x);
                values.push(e);
            }
            Ok((AstNode::new(",", binders), AstNode::new("tau", values)))
        }
        "rec" => {
            let [db] = require_children(node, 1)?;
            let (x, e) = standardize_definition(db)?;
            let y_star = AstNode::leaf("<Y*>");
            let knot = AstNode::new("gamma", vec![y_star, AstNode::new("lambda", vec![x.clone(), e])]);
            Ok((x, knot))
        }
        other => Err(err(format!("unrecognized definition node '{other}'"))),
    }
}

/// Borrows exactly `N` children as a fixed-size array, or reports a clear
/// arity error naming the offending node label.
fn require_children<const N: usize>(node: &AstNode, n: usize) -> Result<[&AstNode; N], RpalError> {
    debug_assert_eq!(N, n, "call site's array-pattern arity must match the arity it asked for");
    if node.children.len() != n {
        return Err(err(format!(
            "'{}' node expects {n} children, found {}",
            node.label,
            node.children.len()
        )));
    }
    let mut out = [None; N];
    for (slot, child) in out.iter_mut().zip(&node.children) {
        *slot = Some(child);
    }
    Ok(out.map(Option::unwrap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::parse;

    fn standardize_src(src: &str) -> AstNode {
        standardize(&parse(&lex(src).unwrap()).unwrap()).unwrap()
    }

    #[test]
    fn let_becomes_gamma_lambda() {
        let tree = standardize_src("let x = 1 in x + 1");
        assert_eq!(tree.label, "gamma");
        assert_eq!(tree.children[0].label, "lambda");
    }

    #[test]
    fn multi_param_lambda_nests() {
        let tree = standardize_src("let f x y = x + y in f 1 2");
        // f x y = ... standardizes to =(f, lambda(x, lambda(y, body)))
        // wrapped in gamma(lambda(f, ...), lambda(x, lambda(y, body)))
        let rhs = &tree.children[1];
        assert_eq!(rhs.label, "lambda");
        assert_eq!(rhs.children[1].label, "lambda");
    }

    #[test]
    fn rec_introduces_ystar() {
        let tree = standardize_src("let rec fact n = n eq 0 -> 1 | n * fact(n - 1) in fact 5");
        let rhs = &tree.children[1];
        assert_eq!(rhs.label, "gamma");
        assert_eq!(rhs.children[0].label, "<Y*>");
    }

    #[test]
    fn and_builds_tuple_binding() {
        let tree = standardize_src("let a = 1 and b = 2 in a + b");
        let binder = &tree.children[0].children[0];
        let rhs = &tree.children[1];
        assert_eq!(binder.label, ",");
        assert_eq!(rhs.label, "tau");
    }

    #[test]
    fn within_chains_definitions() {
        let tree = standardize_src("let a = 1 within b = a + 1 in b");
        let rhs = &tree.children[1];
        assert_eq!(rhs.label, "gamma");
    }

    #[test]
    fn infix_at_becomes_double_gamma() {
        let tree = standardize_src("let x = 0 in 1 @ Conc 2");
        // body of the let is `1 @ Conc 2` -> gamma(gamma(Conc,1),2)
        let body = &tree.children[0].children[1];
        assert_eq!(body.label, "gamma");
        assert_eq!(body.children[0].label, "gamma");
    }
}

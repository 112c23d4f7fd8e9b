//! The CSE (Control-Stack-Environment) machine: the step loop that consumes
//! `control` and drives `stack`/`envs` to a final answer (spec §4.D).
//!
//! `control` is a `Vec` popped from the end (its top), mirroring how the
//! control builder appends a node's flattened body onto whatever already
//! follows it. `stack` is a `VecDeque` pushed and popped from the front
//! (its top), since several rules need to reach the second-from-top item
//! directly — the same shape the source this machine is modeled on used a
//! plain list for, with `insert(0, _)`/`pop(0)`.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::control::ControlOutput;
use crate::env::Envs;
use crate::error::RpalError;
use crate::format;
use crate::ops;
use crate::symbol::{Eta, EnvId, Lambda, Symbol};

pub struct Machine {
    control: Vec<Symbol>,
    stack: VecDeque<Symbol>,
    envs: Envs,
    current_env: EnvId,
}

impl Machine {
    pub fn new(output: ControlOutput) -> Self {
        Self { control: output.control, stack: output.stack, envs: output.envs, current_env: Envs::ROOT }
    }

    /// Drives the machine to completion (spec §4.D: "runs until `control` is
    /// empty").
    pub fn run(&mut self) -> Result<(), RpalError> {
        while let Some(symbol) = self.control.pop() {
            self.step(symbol)?;
        }
        Ok(())
    }

    /// Renders `stack`'s top symbol once `control` is exhausted (spec §4.E).
    pub fn get_answer(&self) -> String {
        match self.stack.front() {
            Some(symbol) => format::format(symbol),
            None => String::new(),
        }
    }

    fn step(&mut self, symbol: Symbol) -> Result<(), RpalError> {
        match symbol {
            Symbol::Id(name) => {
                let value = self.envs.lookup(self.current_env, &name);
                self.stack.push_front(value);
                Ok(())
            }
            Symbol::Lambda(mut lambda) => {
                lambda.environment = Some(self.current_env);
                self.stack.push_front(Symbol::Lambda(lambda));
                Ok(())
            }
            Symbol::Gamma => self.apply_gamma(),
            Symbol::Env(id) => {
                if self.stack.len() < 2 {
                    return Err(eval_err("environment marker reached with fewer than 2 stack items"));
                }
                self.stack.remove(1);
                self.envs.deactivate(id);
                self.current_env = self.envs.deepest_active();
                Ok(())
            }
            Symbol::Uop(op) => {
                let operand = self.pop_stack("unary operator")?;
                self.stack.push_front(ops::apply_unary(op, operand)?);
                Ok(())
            }
            Symbol::Bop(op) => {
                let rand1 = self.pop_stack("binary operator")?;
                let rand2 = self.pop_stack("binary operator")?;
                self.stack.push_front(ops::apply_binary(op, rand1, rand2)?);
                Ok(())
            }
            Symbol::Beta => self.apply_beta(),
            Symbol::Tau(arity) => self.apply_tau(arity),
            Symbol::Delta(delta) => {
                self.control.extend(delta.body.iter().cloned());
                Ok(())
            }
            Symbol::B(body) => {
                self.control.extend(body.iter().cloned());
                Ok(())
            }
            // Scalars, and every other symbol the builder can place directly
            // on control, push onto the stack unchanged (spec §4.D, the
            // verbatim-push fallback).
            other => {
                self.stack.push_front(other);
                Ok(())
            }
        }
    }

    fn pop_stack(&mut self, context: &str) -> Result<Symbol, RpalError> {
        self.stack.pop_front().ok_or_else(|| eval_err(format!("{context}: stack is empty")))
    }

    fn apply_gamma(&mut self) -> Result<(), RpalError> {
        let rator = self.pop_stack("gamma application")?;
        match rator {
            Symbol::Lambda(lambda) => self.apply_lambda(lambda),
            Symbol::Ystar => self.apply_ystar(),
            Symbol::Eta(eta) => self.apply_eta(eta),
            Symbol::Tup(items) => self.apply_tuple_rator(items),
            Symbol::PartialConc(bound) => {
                let second = self.pop_stack("Conc application")?;
                self.stack.push_front(ops::conc(&bound, &second)?);
                Ok(())
            }
            Symbol::Id(name) => self.apply_builtin_rator(&name),
            other => Err(eval_err(format!("cannot apply {other} as a function"))),
        }
    }

    fn apply_lambda(&mut self, lambda: Lambda) -> Result<(), RpalError> {
        let captured = lambda.environment.ok_or_else(|| eval_err("lambda applied before its environment was captured"))?;
        let bindings = if lambda.bound.len() == 1 {
            let rand = self.pop_stack("lambda application")?;
            HashMap::from([(lambda.bound[0].clone(), rand)])
        } else {
            let rand = self.pop_stack("lambda application")?;
            let items = rand
                .as_tup()
                .ok_or_else(|| eval_err(format!("expected a {}-tuple argument, found {rand}", lambda.bound.len())))?;
            if items.len() != lambda.bound.len() {
                return Err(eval_err(format!(
                    "expected a {}-tuple argument, found one of length {}",
                    lambda.bound.len(),
                    items.len()
                )));
            }
            lambda.bound.iter().cloned().zip(items.iter().cloned()).collect()
        };
        let new_env = self.envs.activate(captured, bindings);
        self.control.push(Symbol::Env(new_env));
        self.control.extend(lambda.delta.body.iter().cloned());
        self.stack.push_front(Symbol::Env(new_env));
        self.current_env = new_env;
        Ok(())
    }

    /// `Y* f` is applied lazily: it just wraps `f` in an `Eta` so the knot
    /// is tied the first time it's actually called (spec GLOSSARY "η").
    fn apply_ystar(&mut self) -> Result<(), RpalError> {
        let rand = self.pop_stack("Y* application")?;
        let Symbol::Lambda(lambda) = rand else {
            return Err(eval_err(format!("Y* expects a function, found {rand}")));
        };
        let environment = lambda
            .environment
            .ok_or_else(|| eval_err("Y* applied to a lambda with no captured environment"))?;
        let identifier = lambda.bound.first().cloned().unwrap_or_default();
        let eta = Eta { index: lambda.index, environment, identifier, lambda: Rc::new(lambda) };
        self.stack.push_front(Symbol::Eta(eta));
        Ok(())
    }

    /// `gamma(eta, x)` unfolds into two `gamma`s: the first ties the knot by
    /// applying the original `lambda f. e` to the `eta` itself (binding the
    /// recursive name to its own fixed point), producing the real callee;
    /// the second applies that callee to `x`, which is left untouched on the
    /// stack throughout (spec GLOSSARY "η", spec §4.D rule 3 "Eta").
    fn apply_eta(&mut self, eta: Eta) -> Result<(), RpalError> {
        self.stack.push_front(Symbol::Eta(eta.clone()));
        self.stack.push_front(Symbol::Lambda((*eta.lambda).clone()));
        self.control.push(Symbol::Gamma);
        self.control.push(Symbol::Gamma);
        Ok(())
    }

    fn apply_tuple_rator(&mut self, items: Rc<Vec<Symbol>>) -> Result<(), RpalError> {
        let index = self.pop_stack("tuple selection")?;
        let n = index.as_int().ok_or_else(|| eval_err(format!("tuple selection expects an integer index, found {index}")))?;
        let selected = usize::try_from(n - 1)
            .ok()
            .and_then(|i| items.get(i))
            .ok_or_else(|| eval_err(format!("tuple index {n} out of range for a {}-tuple", items.len())))?;
        self.stack.push_front(selected.clone());
        Ok(())
    }

    /// `Conc` is the one 2-ary builtin (spec §4.D "Builtins"); its first
    /// application is curried into a `PartialConc`, unfolded by the `Gamma`
    /// branch above on the second `gamma`.
    fn apply_builtin_rator(&mut self, name: &str) -> Result<(), RpalError> {
        if name == "Conc" {
            let bound = self.pop_stack("Conc application")?;
            self.stack.push_front(Symbol::PartialConc(Box::new(bound)));
            return Ok(());
        }
        let arg = self.pop_stack(name)?;
        self.stack.push_front(ops::apply_builtin(name, arg)?);
        Ok(())
    }

    /// Discards one of the two `δ` branches based on the popped condition
    /// (spec GLOSSARY "β"). The two deltas sit on control just below the
    /// already-evaluated condition, `else` nearer the top.
    fn apply_beta(&mut self) -> Result<(), RpalError> {
        let cond = self.pop_stack("beta")?;
        let cond = cond.as_bool().ok_or_else(|| eval_err(format!("conditional expects a truth value, found {cond}")))?;
        let delta_else = self.control.pop().ok_or_else(|| eval_err("beta: missing else-branch delta"))?;
        let delta_then = self.control.pop().ok_or_else(|| eval_err("beta: missing then-branch delta"))?;
        let chosen = if cond { delta_then } else { delta_else };
        let Symbol::Delta(chosen) = chosen else {
            return Err(eval_err("beta: expected a delta on either side of the branch"));
        };
        self.control.extend(chosen.body.iter().cloned());
        Ok(())
    }

    fn apply_tau(&mut self, arity: usize) -> Result<(), RpalError> {
        let mut items = Vec::with_capacity(arity);
        for _ in 0..arity {
            items.push(self.pop_stack("tau construction")?);
        }
        self.stack.push_front(Symbol::Tup(Rc::new(items)));
        Ok(())
    }
}

fn eval_err(message: impl Into<String>) -> RpalError {
    RpalError::Eval { message: message.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::build_control;
    use crate::lexer::lex;
    use crate::parser::parse;
    use crate::standardize::standardize;

    fn run(src: &str) -> String {
        let ast = standardize(&parse(&lex(src).unwrap()).unwrap()).unwrap();
        let mut machine = Machine::new(build_control(&ast).unwrap());
        machine.run().unwrap();
        machine.get_answer()
    }

    #[test]
    fn arithmetic_and_identity() {
        assert_eq!(run("let id = fn x. x in id 40 + 2"), "42");
    }

    #[test]
    fn conditional_picks_the_right_branch() {
        assert_eq!(run("let abs n = n ls 0 -> -n | n in abs (-7)"), "7");
    }

    #[test]
    fn tuple_order_and_index() {
        assert_eq!(run("let t = (3, 5, 7) in Order t eq 3 -> t 2 | 0"), "5");
    }

    #[test]
    fn ystar_recursion_computes_factorial() {
        assert_eq!(run("let rec fact n = n eq 0 -> 1 | n * fact(n - 1) in fact 5"), "120");
    }

    #[test]
    fn conc_stem_stern_build_a_greeting() {
        assert_eq!(run("Conc (Stem 'Hello') (Stern 'World')"), "Horld");
    }

    #[test]
    fn istuple_predicate() {
        assert_eq!(run("Istuple (1, 2)"), "true");
        assert_eq!(run("Istuple 1"), "false");
    }

    #[test]
    fn and_bound_names_do_not_leak_across_calls() {
        assert_eq!(run("let f x = x + 1 in let g y = y + 2 in f 1 + g 1"), "5");
    }
}

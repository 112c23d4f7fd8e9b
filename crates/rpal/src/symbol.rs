//! The closed tagged union the CSE machine manipulates (spec §3 "Symbols").
//!
//! The source this evaluator is modeled on used a two-dozen-subclass class
//! hierarchy with runtime `isinstance` dispatch; here that collapses to one
//! enum and a single `match`. Every symbol has value semantics — operators
//! that looked like in-place mutation in the source (`Stem`, `Stern`,
//! `Conc`, `aug`) construct a new `Symbol` here instead, so the same value
//! appearing in two stack positions or inside a tuple can never alias.

use std::fmt;
use std::rc::Rc;

/// Unary operator names recognized by the evaluator (spec §4.D "Primitive
/// operators").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uop {
    Neg,
    Not,
}

/// Binary operator names recognized by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bop {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    And,
    Or,
    Eq,
    Ne,
    Ls,
    Le,
    Gr,
    Ge,
    Aug,
}

impl Uop {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "neg" => Some(Self::Neg),
            "not" => Some(Self::Not),
            _ => None,
        }
    }
}

impl Bop {
    pub fn from_label(label: &str) -> Option<Self> {
        Some(match label {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "**" => Self::Pow,
            "&" => Self::And,
            "or" => Self::Or,
            "eq" => Self::Eq,
            "ne" => Self::Ne,
            "ls" => Self::Ls,
            "le" => Self::Le,
            "gr" => Self::Gr,
            "ge" => Self::Ge,
            "aug" => Self::Aug,
            _ => return None,
        })
    }
}

/// Index identifying one `Lambda` or `Delta` node, unique within a program
/// (spec §3 invariant 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Index identifying one environment frame (spec §4.D, the `j` counter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvId(pub u32);

/// A deferred block of control symbols (spec GLOSSARY "δ").
#[derive(Debug, Clone, PartialEq)]
pub struct Delta {
    pub index: NodeId,
    pub body: Rc<Vec<Symbol>>,
}

/// A closure descriptor: bound identifiers, its deferred body, and (once
/// captured, spec invariant 2) the environment it closed over.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub index: NodeId,
    pub bound: Rc<Vec<String>>,
    pub delta: Delta,
    pub environment: Option<EnvId>,
}

/// A recursion knot produced by applying `Ystar` to a `Lambda` (spec
/// GLOSSARY "η"). Carries a back-pointer to the original `Lambda` so each
/// subsequent application can re-tie the knot.
#[derive(Debug, Clone, PartialEq)]
pub struct Eta {
    pub index: NodeId,
    pub environment: EnvId,
    pub identifier: String,
    pub lambda: Rc<Lambda>,
}

/// The closed set of tagged values the CSE machine pushes, pops, and
/// splices (spec §3 "Symbols" table).
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Int(i64),
    Str(String),
    Bool(bool),
    Dummy,
    Tup(Rc<Vec<Symbol>>),
    Id(String),
    Uop(Uop),
    Bop(Bop),
    Gamma,
    Lambda(Lambda),
    Delta(Delta),
    Beta,
    Tau(usize),
    /// An inline condition block: the flattened control sequence for a
    /// `->` node's condition expression.
    B(Rc<Vec<Symbol>>),
    Eta(Eta),
    Ystar,
    /// An environment marker on the control sequence, naming the frame
    /// whose activation/deactivation it delimits (spec §4.D rule 4).
    Env(EnvId),
    /// `Conc`'s first argument, bound while waiting for the second (spec
    /// §4.D "Builtins", `Conc`). Never produced by the control builder, so
    /// it can't collide with a user-constructed tuple the way a tagged
    /// `Tup` marker would.
    PartialConc(Box<Symbol>),
    Err,
}

impl Symbol {
    pub fn bool_str(value: bool) -> &'static str {
        if value { "true" } else { "false" }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tup(&self) -> Option<&Rc<Vec<Symbol>>> {
        match self {
            Self::Tup(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{}", Self::bool_str(*b)),
            Self::Dummy => write!(f, "dummy"),
            Self::Tup(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Self::Id(name) => write!(f, "{name}"),
            Self::Err => write!(f, ""),
            Self::Uop(op) => write!(f, "{op:?}"),
            Self::Bop(op) => write!(f, "{op:?}"),
            Self::Gamma => write!(f, "gamma"),
            Self::Lambda(l) => write!(f, "[lambda closure: {:?}]", l.bound),
            Self::Delta(d) => write!(f, "[delta {}]", d.index.0),
            Self::Beta => write!(f, "beta"),
            Self::Tau(n) => write!(f, "[tau {n}]"),
            Self::B(_) => write!(f, "[B]"),
            Self::Eta(_) => write!(f, "[eta closure]"),
            Self::Ystar => write!(f, "<Y*>"),
            Self::Env(id) => write!(f, "[env {}]", id.0),
            Self::PartialConc(bound) => write!(f, "[Conc partially applied to {bound}]"),
        }
    }
}

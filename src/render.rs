//! Symbols and a minimal text renderer for formulas.
//!
//! Rendering is a fold over the formula tree (see [`Formula::fold`]): each node
//! receives its children's renderings together with their [`Kind`], and decides
//! on parentheses from the symbol table below.
//!
//! # Examples
//!
//! ```
//! use worlds_rs::formula::Formula;
//! use worlds_rs::predicate::Predicate;
//! use worlds_rs::render::{render, Style};
//! use worlds_rs::types::Domain;
//!
//! let d = Domain::default();
//! let a = Predicate::new(d, "a", 0).atom();
//! let b = Predicate::new(d, "b", 0).atom();
//! let f = Formula::or([Formula::and([a.clone(), b.clone()]).unwrap(), !a]).unwrap();
//!
//! assert_eq!(f.to_string(), "(a and b) or not[a]");
//! assert_eq!(render(&f, Style::Latex), r"(a \land b) \lor \neg[a]");
//! ```

use std::fmt;

use crate::formula::{Formula, Kind, Layer, Op, Quantifier};
use crate::predicate::Predicate;
use crate::types::Term;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Style {
    Plain,
    Latex,
}

/// Display data for one kind of node.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Symbol {
    pub plain: &'static str,
    pub latex: &'static str,
    /// Whether the node never needs parentheses when embedded in an operator.
    pub no_parenthesis: bool,
}

impl Symbol {
    const fn new(plain: &'static str, latex: &'static str, no_parenthesis: bool) -> Self {
        Self {
            plain,
            latex,
            no_parenthesis,
        }
    }

    pub fn text(&self, style: Style) -> &'static str {
        match style {
            Style::Plain => self.plain,
            Style::Latex => self.latex,
        }
    }
}

/// Symbol table keyed by node kind.
pub fn symbol(kind: Kind) -> Symbol {
    match kind {
        Kind::Atom => Symbol::new("", "", true),
        Kind::Truth => Symbol::new("true", r"\textsf{true}", true),
        Kind::Falsity => Symbol::new("false", r"\textsf{false}", true),
        Kind::Named => Symbol::new("", "", true),
        Kind::Op(Op::And) => Symbol::new("and", r"\land", false),
        Kind::Op(Op::Or) => Symbol::new("or", r"\lor", false),
        Kind::Op(Op::Not) => Symbol::new("not", r"\neg", true),
        Kind::Op(Op::Nand) => Symbol::new("nand", r"\nand", false),
        Kind::Op(Op::Nor) => Symbol::new("nor", r"\nor", false),
        Kind::Op(Op::Xor) => Symbol::new("xor", r"\xor", false),
        Kind::Op(Op::Iff) => Symbol::new("iff", r"\iff", false),
        Kind::Op(Op::OnlyL) => Symbol::new("onlyl", r"\onlyl", false),
        Kind::Op(Op::OnlyR) => Symbol::new("onlyr", r"\onlyr", false),
        Kind::Quant(Quantifier::Forall) => Symbol::new("forall", r"\forall", true),
        Kind::Quant(Quantifier::Exists) => Symbol::new("exists", r"\exists", true),
    }
}

/// Renders a formula as a single line of text.
pub fn render(formula: &Formula, style: Style) -> String {
    formula
        .fold(&mut |node, layer| (render_layer(style, layer), node.kind()))
        .0
}

fn render_layer(style: Style, layer: Layer<'_, (String, Kind)>) -> String {
    match layer {
        Layer::Atom(pred, args) => render_atom(pred, args),
        Layer::Truth => symbol(Kind::Truth).text(style).to_string(),
        Layer::Falsity => symbol(Kind::Falsity).text(style).to_string(),
        Layer::Named(name, latex, _) => match style {
            Style::Plain => name.to_string(),
            Style::Latex => latex.unwrap_or(name).to_string(),
        },
        Layer::Op(op, children) => {
            let sym = symbol(Kind::Op(op)).text(style);
            if let [(child, _)] = children.as_slice() {
                return format!("{}[{}]", sym, child);
            }
            let parts: Vec<String> = children
                .into_iter()
                .map(|(text, kind)| {
                    let flat = kind == Kind::Op(op) && matches!(op, Op::And | Op::Or);
                    if flat || symbol(kind).no_parenthesis {
                        text
                    } else {
                        format!("({})", text)
                    }
                })
                .collect();
            parts.join(&format!(" {} ", sym))
        }
        Layer::Quant(quantifier, var, (text, kind)) => {
            let sym = symbol(Kind::Quant(quantifier)).text(style);
            if symbol(kind).no_parenthesis {
                format!("{} {}, {}", sym, var, text)
            } else {
                format!("{} {}, ({})", sym, var, text)
            }
        }
    }
}

fn render_atom(pred: &Predicate, args: &[Term]) -> String {
    if args.is_empty() {
        return pred.name().to_string();
    }
    let args: Vec<String> = args.iter().map(Term::to_string).collect();
    format!("{}({})", pred.name(), args.join(", "))
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render(self, Style::Plain))
    }
}

//! Expression-tree genomes for symbolic regression
//!
//! A solution is a tree of constants, input variables and operators.
//! Subtrees are addressed by their preorder position, which is what the
//! crossover and mutation operators in [`manipulator`] pick at random.

pub mod manipulator;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::genome::Genome;
use crate::metric::Model;

pub use self::manipulator::ExprManipulator;

/// Operators available to expression trees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Sin,
    Cos,
    Exp,
    Log,
    Abs,
}

impl Operator {
    pub fn arity(self) -> usize {
        match self {
            Operator::Add | Operator::Subtract | Operator::Multiply | Operator::Divide => 2,
            Operator::Sin | Operator::Cos | Operator::Exp | Operator::Log | Operator::Abs => 1,
        }
    }

    fn apply_unary(self, a: f64) -> f64 {
        match self {
            Operator::Sin => a.sin(),
            Operator::Cos => a.cos(),
            Operator::Exp => a.exp(),
            // log of the magnitude keeps the domain total except at zero
            Operator::Log => a.abs().ln(),
            Operator::Abs => a.abs(),
            _ => f64::NAN,
        }
    }

    fn apply_binary(self, a: f64, b: f64) -> f64 {
        match self {
            Operator::Add => a + b,
            Operator::Subtract => a - b,
            Operator::Multiply => a * b,
            Operator::Divide => a / b,
            _ => f64::NAN,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Sin => "sin",
            Operator::Cos => "cos",
            Operator::Exp => "exp",
            Operator::Log => "log",
            Operator::Abs => "abs",
        }
    }
}

/// Node of an expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Constant(f64),
    Variable(usize),
    Unary(Operator, Box<Node>),
    Binary(Operator, Box<Node>, Box<Node>),
}

impl Node {
    pub fn unary(op: Operator, child: Node) -> Self {
        Node::Unary(op, Box::new(child))
    }

    pub fn binary(op: Operator, left: Node, right: Node) -> Self {
        Node::Binary(op, Box::new(left), Box::new(right))
    }

    /// Evaluate against one input row; missing variables evaluate to NaN
    pub fn evaluate(&self, row: &[f64]) -> f64 {
        match self {
            Node::Constant(c) => *c,
            Node::Variable(i) => row.get(*i).copied().unwrap_or(f64::NAN),
            Node::Unary(op, child) => op.apply_unary(child.evaluate(row)),
            Node::Binary(op, left, right) => {
                op.apply_binary(left.evaluate(row), right.evaluate(row))
            }
        }
    }

    /// Number of nodes in this subtree
    pub fn size(&self) -> usize {
        match self {
            Node::Constant(_) | Node::Variable(_) => 1,
            Node::Unary(_, child) => 1 + child.size(),
            Node::Binary(_, left, right) => 1 + left.size() + right.size(),
        }
    }

    /// Depth of this subtree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        match self {
            Node::Constant(_) | Node::Variable(_) => 1,
            Node::Unary(_, child) => 1 + child.depth(),
            Node::Binary(_, left, right) => 1 + left.depth().max(right.depth()),
        }
    }

    /// Subtree at preorder position `index`
    pub fn subtree(&self, index: usize) -> Option<&Node> {
        if index == 0 {
            return Some(self);
        }
        let mut index = index - 1;
        for child in self.children() {
            let size = child.size();
            if index < size {
                return child.subtree(index);
            }
            index -= size;
        }
        None
    }

    /// Mutable subtree at preorder position `index`
    pub fn subtree_mut(&mut self, index: usize) -> Option<&mut Node> {
        if index == 0 {
            return Some(self);
        }
        let mut index = index - 1;
        match self {
            Node::Constant(_) | Node::Variable(_) => None,
            Node::Unary(_, child) => child.subtree_mut(index),
            Node::Binary(_, left, right) => {
                let size = left.size();
                if index < size {
                    left.subtree_mut(index)
                } else {
                    index -= size;
                    right.subtree_mut(index)
                }
            }
        }
    }

    /// Depth at which the node at preorder position `index` sits (root = 1)
    pub fn depth_of(&self, index: usize) -> Option<usize> {
        if index == 0 {
            return Some(1);
        }
        let mut index = index - 1;
        for child in self.children() {
            let size = child.size();
            if index < size {
                return child.depth_of(index).map(|d| d + 1);
            }
            index -= size;
        }
        None
    }

    fn children(&self) -> Vec<&Node> {
        match self {
            Node::Constant(_) | Node::Variable(_) => Vec::new(),
            Node::Unary(_, child) => vec![child.as_ref()],
            Node::Binary(_, left, right) => vec![left.as_ref(), right.as_ref()],
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Constant(c) => write!(f, "{}", c),
            Node::Variable(i) => write!(f, "X_{}", i),
            Node::Unary(op, child) => write!(f, "{}({})", op.symbol(), child),
            Node::Binary(op, left, right) => write!(f, "({} {} {})", left, op.symbol(), right),
        }
    }
}

/// Symbolic-regression solution genome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprTree {
    pub root: Node,
}

impl ExprTree {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn size(&self) -> usize {
        self.root.size()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl Genome for ExprTree {
    fn complexity(&self) -> usize {
        self.size()
    }
}

impl Model for ExprTree {
    fn predict(&self, row: &[f64]) -> f64 {
        self.root.evaluate(row)
    }
}

impl fmt::Display for ExprTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

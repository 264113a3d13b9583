//! Boolean requirement trees over province traits.
//!
//! A building may carry a [`RequirementNode`] instead of flat trait criteria.
//! Trees are supplied by content authors and walked by structural recursion;
//! the engine never builds or mutates them.

use crate::state::Province;
use crate::traits::TraitCategory;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicOp {
    And,
    Or,
    Not,
    Xor,
    Nand,
    Nor,
    Implies,
    Eq,
}

/// One node of a requirement tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequirementNode {
    /// Province trait `category` equals `id`.
    Trait { category: TraitCategory, id: String },
    Group {
        op: LogicOp,
        #[serde(default)]
        children: Vec<RequirementNode>,
    },
}

impl RequirementNode {
    pub fn leaf(category: TraitCategory, id: impl Into<String>) -> Self {
        Self::Trait {
            category,
            id: id.into(),
        }
    }

    pub fn group(op: LogicOp, children: Vec<RequirementNode>) -> Self {
        Self::Group { op, children }
    }

    pub fn evaluate(&self, province: &Province) -> bool {
        match self {
            Self::Trait { category, id } => province.trait_value(*category) == Some(id.as_str()),
            Self::Group { op, children } => evaluate_group(*op, children, province),
        }
    }
}

fn evaluate_group(op: LogicOp, children: &[RequirementNode], province: &Province) -> bool {
    let mut results = children.iter().map(|c| c.evaluate(province));
    match op {
        LogicOp::And => results.all(|r| r),
        LogicOp::Or => results.any(|r| r),
        LogicOp::Not | LogicOp::Nor => !results.any(|r| r),
        LogicOp::Nand => !results.all(|r| r),
        LogicOp::Xor => results.filter(|&r| r).count() == 1,
        LogicOp::Implies => match children {
            [antecedent, consequent, ..] => {
                !antecedent.evaluate(province) || consequent.evaluate(province)
            }
            _ => true,
        },
        LogicOp::Eq => match results.next() {
            Some(first) => results.all(|r| r == first),
            None => true,
        },
    }
}

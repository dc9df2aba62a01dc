//! Nested view of a prepared hierarchy, for display and JSON export

use crate::attribute::ProcessedAttribute;
use crate::key::AttributeKey;
use crate::prepare::PreparedHierarchy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// One node and its children
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeNode {
    /// Identity of the node
    pub key: AttributeKey,
    /// Column header
    pub name: String,
    /// Cell value as first seen
    pub value: String,
    /// Direct children in list order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AttributeNode>,
}

impl AttributeNode {
    /// Nodes in this subtree, including this one
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(AttributeNode::size).sum::<usize>()
    }

    /// Levels in this subtree, including this one
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(AttributeNode::depth).max().unwrap_or(0)
    }

    fn find(&self, key: &AttributeKey) -> Option<&AttributeNode> {
        if &self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }
}

/// Forest of attribute nodes
///
/// Roots and children keep the order in which they appear in the prepared
/// list, i.e. row order within each column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeTree {
    roots: Vec<AttributeNode>,
}

impl AttributeTree {
    /// Build from a prepared hierarchy
    #[must_use]
    pub fn from_prepared(prepared: &PreparedHierarchy) -> Self {
        Self::from_ordered(prepared.ordered())
    }

    /// Build from a parent-before-child list
    ///
    /// An attribute whose parent is absent from the list is placed at the
    /// top level rather than dropped. The same holds for attributes that only
    /// reach each other through a parent cycle: the first of them in list
    /// order becomes a top-level node and the cycle is cut there.
    #[must_use]
    pub fn from_ordered(ordered: &[ProcessedAttribute]) -> Self {
        fn assemble(
            index: usize,
            ordered: &[ProcessedAttribute],
            children: &HashMap<usize, Vec<usize>>,
            placed: &mut [bool],
        ) -> AttributeNode {
            placed[index] = true;
            let attribute = &ordered[index];
            let mut node = AttributeNode {
                key: attribute.key().clone(),
                name: attribute.name().to_string(),
                value: attribute.value().to_string(),
                children: Vec::new(),
            };
            for &kid in children.get(&index).map_or(&[][..], Vec::as_slice) {
                if !placed[kid] {
                    node.children.push(assemble(kid, ordered, children, placed));
                }
            }
            node
        }

        let present: HashMap<&AttributeKey, usize> = ordered
            .iter()
            .enumerate()
            .map(|(i, attribute)| (attribute.key(), i))
            .collect();

        let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut tops = Vec::new();
        for (i, attribute) in ordered.iter().enumerate() {
            match attribute.parent_key().and_then(|parent| present.get(parent)) {
                Some(&parent) => children.entry(parent).or_default().push(i),
                None => tops.push(i),
            }
        }

        let mut placed = vec![false; ordered.len()];
        let mut roots: Vec<AttributeNode> = tops
            .into_iter()
            .map(|top| assemble(top, ordered, &children, &mut placed))
            .collect();

        for index in 0..ordered.len() {
            if !placed[index] {
                roots.push(assemble(index, ordered, &children, &mut placed));
            }
        }

        Self { roots }
    }

    /// Top-level nodes
    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[AttributeNode] {
        &self.roots
    }

    /// Total number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(AttributeNode::size).sum()
    }

    /// Longest root-to-leaf path, in levels
    #[must_use]
    pub fn depth(&self) -> usize {
        self.roots.iter().map(AttributeNode::depth).max().unwrap_or(0)
    }

    /// Node with `key`, searched depth first
    #[must_use]
    pub fn find(&self, key: &AttributeKey) -> Option<&AttributeNode> {
        self.roots.iter().find_map(|root| root.find(key))
    }

    /// True when there are no nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Indented outline, two spaces per level
    #[must_use]
    pub fn render(&self) -> String {
        fn walk(node: &AttributeNode, level: usize, out: &mut String) {
            out.push_str(&"  ".repeat(level));
            out.push_str(&format!("- {} ({})\n", node.value, node.name));
            for child in &node.children {
                walk(child, level + 1, out);
            }
        }

        let mut out = String::new();
        for root in &self.roots {
            walk(root, 0, &mut out);
        }
        out
    }
}

impl Display for AttributeTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::RawAttribute;
    use crate::prepare::prepare_for_insertion;
    use pretty_assertions::assert_eq;

    fn cell(name: &str, value: &str, row: usize, col: usize) -> RawAttribute {
        RawAttribute::new(name, value, row, col)
    }

    fn sample() -> AttributeTree {
        let cells = vec![
            cell("Domain", "Finance", 0, 0),
            cell("Area", "Payroll", 0, 1),
            cell("Control", "Tax", 0, 2),
            cell("Domain", "Finance", 1, 0),
            cell("Area", "Audit", 1, 1),
            cell("Domain", "Legal", 2, 0),
        ];
        AttributeTree::from_prepared(&prepare_for_insertion(&cells).unwrap())
    }

    #[test]
    fn tree_shape() {
        let tree = sample();
        assert_eq!(tree.roots().len(), 2);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.depth(), 3);

        let finance = &tree.roots()[0];
        let children: Vec<&str> = finance.children.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(children, vec!["Payroll", "Audit"]);
    }

    #[test]
    fn tree_render() {
        assert_eq!(
            sample().render(),
            "- Finance (Domain)\n  - Payroll (Area)\n    - Tax (Control)\n  \
             - Audit (Area)\n- Legal (Domain)\n"
        );
    }

    #[test]
    fn tree_find() {
        let tree = sample();
        let tax = tree.find(&AttributeKey::new(2, "tax")).unwrap();
        assert_eq!(tax.name, "Control");
        assert!(tree.find(&AttributeKey::new(2, "nope")).is_none());
    }

    #[test]
    fn missing_parent_becomes_top_level() {
        let ordered = vec![ProcessedAttribute::new(
            cell("Area", "Payroll", 0, 1),
            Some(AttributeKey::new(0, "finance")),
        )];
        let tree = AttributeTree::from_ordered(&ordered);
        assert_eq!(tree.roots().len(), 1);
    }

    #[test]
    fn parent_cycle_is_cut_at_first_member() {
        let linked = |value: &str, row: usize, parent: &str| {
            ProcessedAttribute::new(
                cell("Area", value, row, 1),
                Some(AttributeKey::new(1, parent)),
            )
        };
        let ordered = vec![
            linked("Payroll", 0, "tax"),
            linked("Tax", 1, "payroll"),
            ProcessedAttribute::new(cell("Domain", "Legal", 2, 0), None),
        ];
        let tree = AttributeTree::from_ordered(&ordered);

        assert_eq!(tree.node_count(), 3);
        let values: Vec<&str> = tree.roots().iter().map(|node| node.value.as_str()).collect();
        assert_eq!(values, vec!["Legal", "Payroll"]);
        assert_eq!(tree.roots()[1].children[0].value, "Tax");
        assert!(tree.roots()[1].children[0].children.is_empty());
    }

    #[test]
    fn tree_serializes_without_empty_children() {
        let tree = AttributeTree::from_ordered(&[ProcessedAttribute::new(
            cell("Domain", "Legal", 0, 0),
            None,
        )]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "roots": [{ "key": "0:legal", "name": "Domain", "value": "Legal" }]
            })
        );
    }
}

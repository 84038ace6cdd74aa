//! Two-level hierarchies and radial partition layout
//!
//! A hierarchy has a synthetic root, one child per distinct level-1 key and
//! one grandchild per distinct level-2 key inside that level-1 group. Leaves
//! count records; every internal node's value is the sum of its children,
//! computed bottom-up.

use crate::scale::LinearScale;
use imsight_stats::{group_by, round_percentage};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// A node of an aggregated hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    /// Group key; empty for the root
    pub key: String,
    pub depth: usize,
    pub value: u64,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Create a leaf
    pub fn leaf(key: impl Into<String>, depth: usize, value: u64) -> Self {
        Self {
            key: key.into(),
            depth,
            value,
            children: Vec::new(),
        }
    }

    /// Create an internal node whose value is the sum of its children
    pub fn internal(key: impl Into<String>, depth: usize, children: Vec<HierarchyNode>) -> Self {
        let value = children.iter().map(|c| c.value).sum();
        Self {
            key: key.into(),
            depth,
            value,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Longest distance to a leaf
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// This node and all descendants in pre-order
    pub fn descendants(&self) -> Vec<&HierarchyNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }

    /// Leaves in pre-order
    pub fn leaves(&self) -> Vec<&HierarchyNode> {
        self.descendants()
            .into_iter()
            .filter(|n| n.is_leaf())
            .collect()
    }

    /// Check that every internal node's value equals the sum of its children
    pub fn check_sums(&self) -> bool {
        self.is_leaf()
            || (self.value == self.children.iter().map(|c| c.value).sum::<u64>()
                && self.children.iter().all(HierarchyNode::check_sums))
    }
}

/// A hierarchy plus bookkeeping about excluded items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub root: HierarchyNode,
    /// Items missing either level key
    pub skipped: usize,
}

impl Hierarchy {
    /// Group items by two successive keys
    ///
    /// Items for which either key function returns `None` are left out. A
    /// level-1 group whose members all lack a level-2 key contributes no node.
    pub fn two_level<T, F1, F2>(items: &[T], mut level1: F1, mut level2: F2) -> Self
    where
        F1: FnMut(&T) -> Option<String>,
        F2: FnMut(&T) -> Option<String>,
    {
        let outer = group_by(items.iter(), |item| level1(item));
        let mut skipped = outer.skipped();

        let children = outer
            .into_iter()
            .filter_map(|group| {
                let inner = group_by(group.members, |item| level2(item));
                skipped += inner.skipped();
                if inner.is_empty() {
                    return None;
                }

                let leaves = inner
                    .into_iter()
                    .map(|g| HierarchyNode::leaf(g.key, 2, g.members.len() as u64))
                    .collect();
                Some(HierarchyNode::internal(group.key, 1, leaves))
            })
            .collect();

        Self {
            root: HierarchyNode::internal("", 0, children),
            skipped,
        }
    }

    /// Total value at the root
    pub fn total(&self) -> u64 {
        self.root.value
    }

    pub fn is_empty(&self) -> bool {
        self.root.value == 0
    }
}

/// Angular and radial extent of one node in a radial partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionArc {
    /// Keys from the first level down to this node; empty for the root
    pub path: Vec<String>,
    pub key: String,
    pub depth: usize,
    pub value: u64,
    /// Share of the root value in percent
    pub percentage: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl PartitionArc {
    pub fn angle(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Lay a hierarchy out as concentric rings
///
/// The root spans `[0, 2π)`; each child takes a contiguous slice of its
/// parent's span proportional to its value. Depth `d` occupies the radial
/// band `[d, d + 1)` scaled from `[0, height + 1]` onto
/// `[inner_radius, outer_radius]`. Arcs are returned in pre-order.
pub fn partition(root: &HierarchyNode, inner_radius: f64, outer_radius: f64) -> Vec<PartitionArc> {
    let layers = (root.height() + 1) as f64;
    let radial = LinearScale::new([0.0, layers], [inner_radius, outer_radius]);
    let total = root.value;

    let mut arcs = Vec::new();
    let mut path = Vec::new();
    layout_node(root, 0.0, TAU, total, &radial, &mut path, &mut arcs);
    arcs
}

fn layout_node(
    node: &HierarchyNode,
    start: f64,
    end: f64,
    total: u64,
    radial: &LinearScale,
    path: &mut Vec<String>,
    arcs: &mut Vec<PartitionArc>,
) {
    let percentage = if total == 0 {
        0.0
    } else {
        round_percentage(node.value as f64 / total as f64)
    };

    arcs.push(PartitionArc {
        path: path.clone(),
        key: node.key.clone(),
        depth: node.depth,
        value: node.value,
        percentage,
        start_angle: start,
        end_angle: end,
        inner_radius: radial.map(node.depth as f64),
        outer_radius: radial.map((node.depth + 1) as f64),
    });

    if node.value == 0 {
        return;
    }

    let per_unit = (end - start) / node.value as f64;
    let last = node.children.len().saturating_sub(1);
    let mut cursor = start;
    for (i, child) in node.children.iter().enumerate() {
        // The last child closes the span exactly
        let child_end = if i == last {
            end
        } else {
            cursor + child.value as f64 * per_unit
        };
        path.push(child.key.clone());
        layout_node(child, cursor, child_end, total, radial, path, arcs);
        path.pop();
        cursor = child_end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purposes() -> Vec<(Option<&'static str>, Option<&'static str>)> {
        vec![
            (Some("Wealth Creation"), Some("Capital Appreciation")),
            (Some("Wealth Creation"), Some("Growth")),
            (Some("Savings for Future"), Some("Income")),
            (Some("Wealth Creation"), Some("Capital Appreciation")),
            (Some("Returns"), None),
            (None, Some("Growth")),
        ]
    }

    fn build() -> Hierarchy {
        Hierarchy::two_level(
            &purposes(),
            |(p, _)| p.map(str::to_string),
            |(_, o)| o.map(str::to_string),
        )
    }

    #[test]
    fn test_two_level_counts() {
        let hierarchy = build();
        let root = &hierarchy.root;

        assert_eq!(hierarchy.total(), 4);
        assert_eq!(hierarchy.skipped, 2);
        assert_eq!(root.height(), 2);

        let keys: Vec<&str> = root.children.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["Wealth Creation", "Savings for Future"]);

        let wealth = &root.children[0];
        assert_eq!(wealth.value, 3);
        assert_eq!(wealth.children[0].key, "Capital Appreciation");
        assert_eq!(wealth.children[0].value, 2);
        assert!(root.check_sums());
    }

    #[test]
    fn test_repeated_leaf_key_under_two_parents() {
        let items = vec![("A", "x"), ("B", "x"), ("A", "x")];
        let hierarchy = Hierarchy::two_level(
            &items,
            |(a, _)| Some(a.to_string()),
            |(_, b)| Some(b.to_string()),
        );

        assert_eq!(hierarchy.root.leaves().len(), 2);
        assert_eq!(hierarchy.root.children[0].value, 2);
        assert_eq!(hierarchy.root.children[1].value, 1);
        assert!(hierarchy.root.check_sums());
    }

    #[test]
    fn test_check_sums_detects_tampering() {
        let mut root = build().root;
        root.children[0].value += 1;
        assert!(!root.check_sums());
    }

    #[test]
    fn test_partition_angles_tile_parent() {
        let hierarchy = build();
        let arcs = partition(&hierarchy.root, 0.0, 300.0);

        assert_eq!(arcs.len(), hierarchy.root.descendants().len());
        let root = &arcs[0];
        assert_eq!(root.start_angle, 0.0);
        assert_eq!(root.end_angle, TAU);
        assert_eq!(root.percentage, 100.0);

        let level1: Vec<&PartitionArc> = arcs.iter().filter(|a| a.depth == 1).collect();
        assert_eq!(level1[0].start_angle, 0.0);
        assert!((level1[0].angle() - TAU * 0.75).abs() < 1e-12);
        assert_eq!(level1[0].end_angle, level1[1].start_angle);
        assert_eq!(level1[1].end_angle, TAU);
        assert_eq!(level1[0].percentage, 75.0);
    }

    #[test]
    fn test_partition_radial_bands() {
        let arcs = partition(&build().root, 0.0, 300.0);

        let leaf = arcs.iter().find(|a| a.depth == 2).unwrap();
        assert_eq!(leaf.path, vec!["Wealth Creation", "Capital Appreciation"]);
        assert!((leaf.inner_radius - 200.0).abs() < 1e-9);
        assert!((leaf.outer_radius - 300.0).abs() < 1e-9);
        assert!((arcs[0].outer_radius - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_hierarchy() {
        let items: Vec<(Option<&str>, Option<&str>)> = vec![];
        let hierarchy = Hierarchy::two_level(
            &items,
            |(p, _)| p.map(str::to_string),
            |(_, o)| o.map(str::to_string),
        );
        assert!(hierarchy.is_empty());

        let arcs = partition(&hierarchy.root, 0.0, 100.0);
        assert_eq!(arcs.len(), 1);
        assert_eq!(arcs[0].percentage, 0.0);
    }
}

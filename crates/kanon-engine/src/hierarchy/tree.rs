//! Generalization tree for one quasi-identifier.
//!
//! Adjacency is owned by the tree and addressed by `(level, index)`; level 0
//! holds the root and the last level holds the leaves. A per-level index maps
//! the rendered form of each node back to its position, which is how stored
//! signature strings re-enter the tree.

use std::fmt;
use std::sync::Arc;

use kanon_core::errors::{GeneralizationError, GeneralizationResult};
use kanon_core::types::{FxHashMap, FxHashSet, HierarchyKind, ValueType};

use crate::domain::{DomainValue, Scalar};

/// Position of a node inside a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub level: usize,
    pub index: usize,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.level, self.index)
    }
}

/// Where a value currently sits while it is being generalized.
#[derive(Debug, Clone, PartialEq)]
pub enum Position {
    /// Ungeneralized value that is not itself a node (range trees).
    Raw(Scalar),
    /// Missing marker, outside the tree until its first step.
    Sentinel,
    Node(NodeId),
}

#[derive(Debug)]
struct Node {
    value: DomainValue,
    label: Arc<str>,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Node values per level, root level first, each with its parent's index in
/// the previous level.
pub(crate) type LevelLayout = Vec<Vec<(DomainValue, Option<usize>)>>;

#[derive(Debug)]
pub struct HierarchyTree {
    name: String,
    kind: HierarchyKind,
    value_type: ValueType,
    levels: Vec<Vec<Node>>,
    level_index: Vec<FxHashMap<Arc<str>, usize>>,
    /// Leaf indices ordered by lower bound (range trees only).
    leaf_order: Vec<usize>,
}

impl HierarchyTree {
    /// Start an explicitly defined hierarchy rooted at `root`.
    pub fn builder(
        name: impl Into<String>,
        kind: HierarchyKind,
        value_type: ValueType,
        root: impl Into<DomainValue>,
    ) -> HierarchyBuilder {
        HierarchyBuilder {
            name: name.into(),
            kind,
            value_type,
            nodes: vec![(root.into(), None)],
        }
    }

    pub(crate) fn assemble(
        name: String,
        kind: HierarchyKind,
        value_type: ValueType,
        layout: LevelLayout,
    ) -> GeneralizationResult<Self> {
        let invalid = |message: String| GeneralizationError::invalid_hierarchy(name.as_str(), message);

        if layout.first().map(Vec::len) != Some(1) {
            return Err(invalid("level 0 must hold exactly one root".to_string()));
        }
        if kind == HierarchyKind::Range && !value_type.supports_ranges() {
            return Err(invalid(format!("{value_type} values cannot form ranges")));
        }

        let mut levels: Vec<Vec<Node>> = Vec::with_capacity(layout.len());
        let mut level_index = Vec::with_capacity(layout.len());
        let mut seen_labels: FxHashSet<Arc<str>> = FxHashSet::default();

        for (depth, level_layout) in layout.into_iter().enumerate() {
            if level_layout.is_empty() {
                return Err(invalid(format!("level {depth} is empty")));
            }
            let mut nodes = Vec::with_capacity(level_layout.len());
            let mut index = FxHashMap::default();

            for (position, (value, parent)) in level_layout.into_iter().enumerate() {
                check_value(kind, value_type, &value).map_err(&invalid)?;
                match (depth, parent) {
                    (0, None) => {}
                    (0, Some(_)) => return Err(invalid("the root cannot have a parent".to_string())),
                    (_, None) => {
                        return Err(invalid(format!("node {value} at level {depth} has no parent")));
                    }
                    (_, Some(p)) => {
                        let parents = &mut levels[depth - 1];
                        let Some(parent_node) = parents.get_mut(p) else {
                            return Err(invalid(format!("node {value} has a dangling parent {p}")));
                        };
                        if let (Some(outer), Some(inner)) =
                            (parent_node.value.as_interval(), value.as_interval())
                        {
                            if !outer.encloses(inner) {
                                return Err(invalid(format!("{inner} is not inside its parent {outer}")));
                            }
                        }
                        parent_node.children.push(position);
                    }
                }

                let label: Arc<str> = Arc::from(value.to_string());
                let duplicate = match kind {
                    HierarchyKind::Distinct => !seen_labels.insert(label.clone()),
                    HierarchyKind::Range => index.contains_key(&label),
                };
                if duplicate {
                    return Err(invalid(format!("duplicate value {label}")));
                }
                index.insert(label.clone(), position);
                nodes.push(Node {
                    value,
                    label,
                    parent,
                    children: Vec::new(),
                });
            }
            levels.push(nodes);
            level_index.push(index);
        }

        let leaf_level = levels.len() - 1;
        for (depth, nodes) in levels[..leaf_level].iter().enumerate() {
            if let Some(node) = nodes.iter().find(|n| n.children.is_empty()) {
                return Err(invalid(format!(
                    "{} at level {depth} has no children; all leaves must share the last level",
                    node.label
                )));
            }
        }

        let mut leaf_order: Vec<usize> = Vec::new();
        if kind == HierarchyKind::Range {
            let leaves = &levels[leaf_level];
            leaf_order = (0..leaves.len()).collect();
            leaf_order.sort_by(|&a, &b| leaves[a].value.as_interval().cmp(&leaves[b].value.as_interval()));
            for pair in leaf_order.windows(2) {
                let (prev, next) = (&leaves[pair[0]], &leaves[pair[1]]);
                if let (Some(p), Some(n)) = (prev.value.as_interval(), next.value.as_interval()) {
                    if n.lower() < p.upper() {
                        return Err(invalid(format!("leaf intervals {p} and {n} overlap")));
                    }
                }
            }
        }

        Ok(Self {
            name,
            kind,
            value_type,
            levels,
            level_index,
            leaf_order,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> HierarchyKind {
        self.kind
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Number of levels, root and leaves included.
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    /// Largest meaningful step count for a raw value of this column.
    ///
    /// Range trees have one more step than levels below the root, because a
    /// raw value first has to be mapped onto its leaf interval.
    pub fn max_generalization(&self) -> u32 {
        let below_root = (self.height() - 1) as u32;
        match self.kind {
            HierarchyKind::Distinct => below_root,
            HierarchyKind::Range => below_root + 1,
        }
    }

    /// Level reached by a raw value after `steps` generalizations, or `None`
    /// while the value is still raw (range trees at step 0).
    pub fn level_after(&self, steps: u32) -> Option<usize> {
        let leaf = self.height() - 1;
        let steps = steps as usize;
        match self.kind {
            HierarchyKind::Distinct => Some(leaf.saturating_sub(steps)),
            HierarchyKind::Range if steps == 0 => None,
            HierarchyKind::Range => Some((leaf + 1).saturating_sub(steps)),
        }
    }

    pub fn root(&self) -> &DomainValue {
        &self.levels[0][0].value
    }

    pub fn root_id(&self) -> NodeId {
        NodeId { level: 0, index: 0 }
    }

    /// Value stored at `id`.
    pub fn value(&self, id: NodeId) -> Option<&DomainValue> {
        self.node(id).map(|n| &n.value)
    }

    pub fn nodes_at_level(&self, level: usize) -> Vec<&DomainValue> {
        self.levels
            .get(level)
            .map(|nodes| nodes.iter().map(|n| &n.value).collect())
            .unwrap_or_default()
    }

    pub fn leaves(&self) -> Vec<&DomainValue> {
        self.nodes_at_level(self.height() - 1)
    }

    /// Deepest node holding `value`.
    ///
    /// Range trees repeat an interval on consecutive levels when a group has
    /// a single child; the deepest copy is the one raw values reach first.
    pub fn find(&self, value: &DomainValue) -> Option<NodeId> {
        let label = value.to_string();
        (0..self.height())
            .rev()
            .find_map(|level| self.find_at_level(level, &label))
    }

    /// Node rendered as `label` on `level`.
    pub fn find_at_level(&self, level: usize, label: &str) -> Option<NodeId> {
        self.level_index
            .get(level)?
            .get(label)
            .map(|&index| NodeId { level, index })
    }

    pub fn level_of(&self, value: &DomainValue) -> GeneralizationResult<usize> {
        self.find(value)
            .map(|id| id.level)
            .ok_or_else(|| GeneralizationError::unknown_value(value))
    }

    /// Next-coarser value. The root generalizes to itself.
    pub fn parent(&self, value: &DomainValue) -> GeneralizationResult<DomainValue> {
        let position = self.locate(value)?;
        let next = self.generalize(&position)?;
        Ok(self.value_at(&next))
    }

    pub fn children_of(&self, value: &DomainValue) -> GeneralizationResult<Vec<&DomainValue>> {
        let id = self
            .find(value)
            .ok_or_else(|| GeneralizationError::unknown_value(value))?;
        let child_level = id.level + 1;
        Ok(self.levels[id.level][id.index]
            .children
            .iter()
            .map(|&c| &self.levels[child_level][c].value)
            .collect())
    }

    /// Starting position of an ungeneralized cell value. Unlike [`locate`],
    /// raw values of a distinct tree are only matched against the leaves.
    ///
    /// [`locate`]: HierarchyTree::locate
    pub fn locate_leaf(&self, value: &DomainValue) -> GeneralizationResult<Position> {
        match (self.kind, value) {
            (HierarchyKind::Distinct, DomainValue::Raw(scalar)) => self
                .find_at_level(self.height() - 1, &scalar.to_string())
                .map(Position::Node)
                .ok_or_else(|| GeneralizationError::unknown_value(scalar)),
            _ => self.locate(value),
        }
    }

    /// Position of any value of the tree, or of a raw or missing value.
    pub fn locate(&self, value: &DomainValue) -> GeneralizationResult<Position> {
        match value {
            DomainValue::Sentinel => Ok(Position::Sentinel),
            DomainValue::Raw(scalar) if self.kind == HierarchyKind::Range => {
                Ok(Position::Raw(scalar.clone()))
            }
            other => self
                .find(other)
                .map(Position::Node)
                .ok_or_else(|| GeneralizationError::unknown_value(other)),
        }
    }

    /// One generalization step.
    ///
    /// A sentinel has no parent of its own and jumps to the coarsest single
    /// ancestor, the root. Raw values in a range tree move onto the leaf
    /// interval containing them; everything else moves to its parent.
    pub fn generalize(&self, position: &Position) -> GeneralizationResult<Position> {
        match position {
            Position::Sentinel => Ok(Position::Node(self.root_id())),
            Position::Raw(scalar) => match self.kind {
                HierarchyKind::Range => self
                    .containing_leaf(scalar)
                    .map(Position::Node)
                    .ok_or_else(|| GeneralizationError::unknown_value(scalar)),
                HierarchyKind::Distinct => {
                    let leaf = self
                        .find_at_level(self.height() - 1, &scalar.to_string())
                        .ok_or_else(|| GeneralizationError::unknown_value(scalar))?;
                    Ok(Position::Node(self.parent_id(leaf)))
                }
            },
            Position::Node(id) => {
                if self.node(*id).is_none() {
                    return Err(GeneralizationError::unknown_value(format!("node {id}")));
                }
                Ok(Position::Node(self.parent_id(*id)))
            }
        }
    }

    /// Apply `steps` generalization steps.
    pub fn generalize_by(&self, position: Position, steps: u32) -> GeneralizationResult<Position> {
        let mut current = position;
        for _ in 0..steps {
            if current == Position::Node(self.root_id()) {
                break;
            }
            current = self.generalize(&current)?;
        }
        Ok(current)
    }

    /// Signature form of a position.
    pub fn render(&self, position: &Position) -> Arc<str> {
        match position {
            Position::Node(id) => match self.node(*id) {
                Some(node) => node.label.clone(),
                None => Arc::from(""),
            },
            Position::Raw(scalar) => Arc::from(scalar.to_string()),
            Position::Sentinel => Arc::from(DomainValue::Sentinel.to_string()),
        }
    }

    pub fn value_at(&self, position: &Position) -> DomainValue {
        match position {
            Position::Node(id) => self
                .value(*id)
                .cloned()
                .unwrap_or(DomainValue::Sentinel),
            Position::Raw(scalar) => DomainValue::Raw(scalar.clone()),
            Position::Sentinel => DomainValue::Sentinel,
        }
    }

    /// Leaf interval holding `value`: the right-open match first, then the
    /// closed match (which catches the upper bound of the last leaf).
    pub fn containing_leaf(&self, value: &Scalar) -> Option<NodeId> {
        let level = self.height() - 1;
        let leaves = &self.levels[level];
        let split = self.leaf_order.partition_point(|&i| {
            leaves[i]
                .value
                .as_interval()
                .is_some_and(|iv| iv.lower() <= value)
        });
        let index = self.leaf_order[..split].last().copied()?;
        let interval = leaves[index].value.as_interval()?;
        (interval.contains_right_open(value) || interval.contains_inclusive(value))
            .then_some(NodeId { level, index })
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.levels.get(id.level)?.get(id.index)
    }

    fn parent_id(&self, id: NodeId) -> NodeId {
        match self.node(id).and_then(|n| n.parent) {
            Some(index) => NodeId {
                level: id.level - 1,
                index,
            },
            None => id,
        }
    }
}

fn check_value(kind: HierarchyKind, value_type: ValueType, value: &DomainValue) -> Result<(), String> {
    match (kind, value) {
        (_, DomainValue::Sentinel) => Err("the missing marker cannot be a node".to_string()),
        (HierarchyKind::Distinct, DomainValue::Raw(s)) if s.value_type() != value_type => {
            Err(format!("{s} is not a {value_type} value"))
        }
        (HierarchyKind::Distinct, DomainValue::Raw(_) | DomainValue::Label(_)) => Ok(()),
        (HierarchyKind::Range, DomainValue::Interval(iv)) if iv.value_type() == value_type => Ok(()),
        (kind, other) => Err(format!("{other} cannot be a node of a {kind} {value_type} hierarchy")),
    }
}

/// Handle to a node added through [`HierarchyBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderNode(usize);

/// Explicit, node-by-node construction of a loaded hierarchy.
#[derive(Debug)]
pub struct HierarchyBuilder {
    name: String,
    kind: HierarchyKind,
    value_type: ValueType,
    nodes: Vec<(DomainValue, Option<usize>)>,
}

impl HierarchyBuilder {
    pub fn root(&self) -> BuilderNode {
        BuilderNode(0)
    }

    pub fn add_child(&mut self, parent: BuilderNode, value: impl Into<DomainValue>) -> BuilderNode {
        self.nodes.push((value.into(), Some(parent.0)));
        BuilderNode(self.nodes.len() - 1)
    }

    /// Validate and freeze the tree. Children keep their insertion order.
    pub fn build(self) -> GeneralizationResult<HierarchyTree> {
        let mut depth = vec![0usize; self.nodes.len()];
        let mut slot = vec![0usize; self.nodes.len()];
        let mut layout: LevelLayout = Vec::new();

        for (i, (value, parent)) in self.nodes.into_iter().enumerate() {
            let (level, parent_slot) = match parent {
                None => (0, None),
                Some(p) if p < i => (depth[p] + 1, Some(slot[p])),
                Some(p) => {
                    return Err(GeneralizationError::invalid_hierarchy(
                        self.name,
                        format!("node {value} refers to unknown parent {p}"),
                    ));
                }
            };
            if layout.len() <= level {
                layout.resize_with(level + 1, Vec::new);
            }
            depth[i] = level;
            slot[i] = layout[level].len();
            layout[level].push((value, parent_slot));
        }

        HierarchyTree::assemble(self.name, self.kind, self.value_type, layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IntervalValue;

    fn continents() -> HierarchyTree {
        let mut b = HierarchyTree::builder("country", HierarchyKind::Distinct, ValueType::String, "World");
        let root = b.root();
        let europe = b.add_child(root, "Europe");
        let asia = b.add_child(root, "Asia");
        b.add_child(europe, "GR");
        b.add_child(europe, "IT");
        b.add_child(asia, "JP");
        b.build().unwrap()
    }

    fn ages() -> HierarchyTree {
        let iv = |lo: f64, hi: f64| DomainValue::Interval(IntervalValue::new(lo, hi).unwrap());
        let mut b = HierarchyTree::builder("age", HierarchyKind::Range, ValueType::Numeric, iv(0.0, 100.0));
        let root = b.root();
        let young = b.add_child(root, iv(0.0, 50.0));
        let old = b.add_child(root, iv(50.0, 100.0));
        b.add_child(young, iv(0.0, 25.0));
        b.add_child(young, iv(25.0, 50.0));
        b.add_child(old, iv(50.0, 100.0));
        b.build().unwrap()
    }

    #[test]
    fn test_explicit_distinct_tree() {
        let tree = continents();
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.max_generalization(), 2);
        assert_eq!(tree.parent(&"GR".into()).unwrap(), DomainValue::from("Europe"));
        assert_eq!(tree.parent(&"Europe".into()).unwrap(), DomainValue::from("World"));
        assert_eq!(tree.parent(&"World".into()).unwrap(), DomainValue::from("World"));
        assert_eq!(tree.level_of(&"JP".into()).unwrap(), 2);
        let children: Vec<String> = tree
            .children_of(&"Europe".into())
            .unwrap()
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(children, ["GR", "IT"]);
        assert_eq!(tree.nodes_at_level(1).len(), 2);
        assert!(tree.nodes_at_level(9).is_empty());
    }

    #[test]
    fn test_unknown_value() {
        let tree = continents();
        let err = tree.parent(&"FR".into()).unwrap_err();
        assert!(matches!(err, GeneralizationError::UnknownValue { .. }));
        assert!(tree.children_of(&"FR".into()).is_err());
        assert!(tree.locate(&"Europe".into()).is_ok());
        assert!(tree.locate_leaf(&"Europe".into()).is_err());
        assert_eq!(
            tree.locate_leaf(&"IT".into()).unwrap(),
            Position::Node(NodeId { level: 2, index: 1 })
        );
    }

    #[test]
    fn test_sentinel_goes_to_root() {
        let tree = continents();
        assert_eq!(tree.parent(&DomainValue::Sentinel).unwrap(), DomainValue::from("World"));
        let pos = tree.generalize_by(Position::Sentinel, 2).unwrap();
        assert_eq!(pos, Position::Node(tree.root_id()));
    }

    #[test]
    fn test_range_leaf_lookup() {
        let tree = ages();
        assert_eq!(tree.max_generalization(), 3);
        let leaf = |v: f64| {
            let id = tree.containing_leaf(&Scalar::Number(v)).unwrap();
            tree.value(id).unwrap().to_string()
        };
        assert_eq!(leaf(0.0), "0-25");
        assert_eq!(leaf(25.0), "25-50");
        assert_eq!(leaf(49.9), "25-50");
        assert_eq!(leaf(100.0), "50-100");
        assert!(tree.containing_leaf(&Scalar::Number(100.5)).is_none());
        assert!(tree.containing_leaf(&Scalar::Number(-1.0)).is_none());
    }

    #[test]
    fn test_range_repeated_interval_resolves_deepest() {
        let tree = ages();
        let iv = DomainValue::Interval(IntervalValue::new(50.0, 100.0).unwrap());
        assert_eq!(tree.level_of(&iv).unwrap(), 2);
        assert_eq!(tree.parent(&iv).unwrap(), iv);
        let pos = tree.generalize_by(Position::Raw(Scalar::Number(70.0)), 3).unwrap();
        assert_eq!(pos, Position::Node(tree.root_id()));
        assert_eq!(tree.level_after(1), Some(2));
        assert_eq!(tree.level_after(0), None);
    }

    #[test]
    fn test_rejects_duplicates() {
        let mut b = HierarchyTree::builder("x", HierarchyKind::Distinct, ValueType::String, "R");
        let root = b.root();
        b.add_child(root, "A");
        b.add_child(root, "A");
        let err = b.build().unwrap_err();
        assert!(matches!(err, GeneralizationError::InvalidHierarchy { .. }));
    }

    #[test]
    fn test_rejects_unbalanced_leaves() {
        let mut b = HierarchyTree::builder("x", HierarchyKind::Distinct, ValueType::String, "R");
        let root = b.root();
        let a = b.add_child(root, "A");
        b.add_child(root, "B");
        b.add_child(a, "a1");
        assert!(b.build().is_err());
    }

    #[test]
    fn test_rejects_wrong_node_kind() {
        let b = HierarchyTree::builder("x", HierarchyKind::Range, ValueType::Numeric, 5.0);
        assert!(b.build().is_err());
        let b = HierarchyTree::builder("x", HierarchyKind::Distinct, ValueType::Numeric, "text");
        assert!(b.build().is_err());
        let b = HierarchyTree::builder("x", HierarchyKind::Distinct, ValueType::Numeric, DomainValue::Sentinel);
        assert!(b.build().is_err());
    }

    #[test]
    fn test_rejects_child_outside_parent() {
        let iv = |lo: f64, hi: f64| DomainValue::Interval(IntervalValue::new(lo, hi).unwrap());
        let mut b = HierarchyTree::builder("x", HierarchyKind::Range, ValueType::Numeric, iv(0.0, 10.0));
        let root = b.root();
        b.add_child(root, iv(5.0, 20.0));
        assert!(b.build().is_err());
    }

    #[test]
    fn test_tree_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HierarchyTree>();
    }
}

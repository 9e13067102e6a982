use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::layout::LayoutError;

/// One entry of an organisational hierarchy, as handed over by the host.
///
/// Children are kept in the order they were supplied; that order drives both
/// the left-to-right layout and the pre-order search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Display name: the `name` field when present, the id otherwise.
    pub fn label(&self) -> &str {
        self.field("name").unwrap_or(&self.id)
    }

    /// Number of nodes in this subtree, counted iteratively.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Builds a rooted tree from flat records.
    ///
    /// Sibling order follows record order. A record whose parent is unknown
    /// counts as a root; exactly one root is accepted. The root sits at depth
    /// zero and no record may sit deeper than `max_depth`. The tree is built
    /// without recursion, so long manager chains are rejected instead of
    /// exhausting the stack.
    pub fn from_records(
        records: &[NodeRecord],
        max_depth: usize,
    ) -> Result<Option<Self>, LayoutError> {
        if records.is_empty() {
            return Ok(None);
        }

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if index.insert(record.id.as_str(), idx).is_some() {
                return Err(LayoutError::DuplicateNode {
                    id: record.id.clone(),
                });
            }
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
        let mut roots = Vec::new();
        for (idx, record) in records.iter().enumerate() {
            match record
                .parent_id
                .as_deref()
                .and_then(|parent| index.get(parent).copied())
            {
                Some(parent) => children[parent].push(idx),
                None => roots.push(idx),
            }
        }

        let root = match roots.as_slice() {
            [] => {
                // Every record has a known parent, so the parent chains loop.
                let id = first_cycle_member(records, &index);
                return Err(LayoutError::Cycle { id });
            }
            [root] => *root,
            [first, second, ..] => {
                return Err(LayoutError::MultipleRoots {
                    first: records[*first].id.clone(),
                    second: records[*second].id.clone(),
                });
            }
        };

        let order = breadth_first(root, records, &children, max_depth)?;
        if order.len() != records.len() {
            // Whatever the single root cannot reach hangs off a parent loop.
            let mut reached = vec![false; records.len()];
            for &idx in &order {
                reached[idx] = true;
            }
            let id = records
                .iter()
                .zip(&reached)
                .find(|(_, reached)| !**reached)
                .map(|(record, _)| record.id.clone())
                .unwrap_or_default();
            return Err(LayoutError::Cycle { id });
        }
        Ok(assemble(&order, records, &children))
    }
}

/// Flat hierarchy entry, e.g. an employee with a manager reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(str::to_string),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// Reachable records in breadth-first order. Each record has a single parent
/// slot, so every reachable index appears exactly once.
fn breadth_first(
    root: usize,
    records: &[NodeRecord],
    children: &[Vec<usize>],
    max_depth: usize,
) -> Result<Vec<usize>, LayoutError> {
    let mut order = Vec::with_capacity(records.len());
    let mut queue = VecDeque::from([(root, 0usize)]);
    while let Some((idx, depth)) = queue.pop_front() {
        if depth > max_depth {
            return Err(LayoutError::DepthExceeded {
                id: records[idx].id.clone(),
                max_depth,
            });
        }
        order.push(idx);
        queue.extend(children[idx].iter().map(|&child| (child, depth + 1)));
    }
    Ok(order)
}

/// Builds nodes deepest-first: in breadth-first order every child comes after
/// its parent, so walking the order backwards finds children already built.
fn assemble(
    order: &[usize],
    records: &[NodeRecord],
    children: &[Vec<usize>],
) -> Option<TreeNode> {
    let mut built: Vec<Option<TreeNode>> = vec![None; records.len()];
    for &idx in order.iter().rev() {
        let record = &records[idx];
        let kids = children[idx]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[idx] = Some(TreeNode {
            id: record.id.clone(),
            fields: record.fields.clone(),
            children: kids,
        });
    }
    order.first().and_then(|&root| built[root].take())
}

fn first_cycle_member(records: &[NodeRecord], index: &HashMap<&str, usize>) -> String {
    let mut seen = HashSet::new();
    let mut current = 0usize;
    loop {
        if !seen.insert(current) {
            return records[current].id.clone();
        }
        match records[current]
            .parent_id
            .as_deref()
            .and_then(|parent| index.get(parent).copied())
        {
            Some(parent) => current = parent,
            None => return records[current].id.clone(),
        }
    }
}

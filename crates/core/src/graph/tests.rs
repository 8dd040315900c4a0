use super::*;
use crate::ids::NodeId;
use std::collections::BTreeSet;

fn sample() -> (Tree, [NodeId; 5]) {
    // root
    // ├── a
    // │   ├── c
    // │   └── d
    // └── b
    let root = NodeId::new();
    let (a, b, c, d) = (NodeId::new(), NodeId::new(), NodeId::new(), NodeId::new());
    let mut tree = Tree::new(root);
    tree.create_child(root, a).unwrap();
    tree.create_child(root, b).unwrap();
    tree.create_child(a, c).unwrap();
    tree.create_child(a, d).unwrap();
    (tree, [root, a, b, c, d])
}

#[test]
fn create_child_checks_parent_and_child() {
    let (mut tree, [root, a, _, c, _]) = sample();
    let stranger = NodeId::new();
    assert_eq!(
        tree.create_child(stranger, NodeId::new()).unwrap_err(),
        TreeError::InvalidParent
    );
    assert_eq!(tree.create_child(root, c).unwrap_err(), TreeError::ChildAlreadyExists);
    assert_eq!(tree.create_child(a, root).unwrap_err(), TreeError::ChildAlreadyExists);
    assert_eq!(tree.edge_count(), 4);
}

#[test]
fn every_non_root_node_has_exactly_one_parent() {
    let (tree, [root, a, b, c, d]) = sample();
    assert_eq!(tree.fetch_parent(root).unwrap_err(), TreeError::InvalidParent);
    assert_eq!(tree.fetch_parent(a).unwrap(), root);
    assert_eq!(tree.fetch_parent(b).unwrap(), root);
    assert_eq!(tree.fetch_parent(c).unwrap(), a);
    assert_eq!(tree.fetch_parent(d).unwrap(), a);
    assert_eq!(tree.nodes().len(), tree.edge_count() + 1);
}

#[test]
fn delete_node_removes_subtree_only() {
    let (mut tree, [root, a, b, c, d]) = sample();
    assert_eq!(tree.delete_node(a).unwrap(), a);
    for gone in [a, c, d] {
        assert!(!tree.exists(gone));
    }
    assert!(tree.exists(b));
    assert_eq!(tree.fetch_children(root).unwrap(), BTreeSet::from([b]));
    assert_eq!(tree.delete_node(a).unwrap_err(), TreeError::InvalidNode);
    assert_eq!(tree.delete_node(root).unwrap_err(), TreeError::InvalidNode);
}

#[test]
fn move_node_reparents_with_subtree() {
    let (mut tree, [root, a, b, c, d]) = sample();
    tree.move_node(a, b).unwrap();
    assert_eq!(tree.fetch_parent(a).unwrap(), b);
    assert_eq!(tree.fetch_children(a).unwrap(), BTreeSet::from([c, d]));
    assert_eq!(tree.fetch_children(root).unwrap(), BTreeSet::from([b]));

    assert_eq!(tree.move_node(root, b).unwrap_err(), TreeError::InvalidNode);
    assert_eq!(tree.move_node(b, b).unwrap_err(), TreeError::InvalidNode);
    assert_eq!(tree.move_node(b, c).unwrap_err(), TreeError::InvalidNode);
    assert_eq!(tree.move_node(NodeId::new(), b).unwrap_err(), TreeError::InvalidNode);
}

#[test]
fn copy_grafts_with_same_ids() {
    let (other, [_, a, _, c, d]) = sample();
    let mut tree = Tree::new(NodeId::new());
    let host = tree.root();

    assert_eq!(tree.copy(host, &other, a).unwrap(), a);
    assert_eq!(tree.fetch_parent(a).unwrap(), host);
    assert_eq!(tree.fetch_children(a).unwrap(), BTreeSet::from([c, d]));

    // grafting the same ids twice is refused
    assert_eq!(tree.copy(host, &other, a).unwrap_err(), TreeError::ChildAlreadyExists);

    let mut flat = Tree::new(NodeId::new());
    let flat_root = flat.root();
    flat.copy_descendants(flat_root, &other, a).unwrap();
    assert_eq!(flat.fetch_children(flat_root).unwrap(), BTreeSet::from([c, d]));
}

#[test]
fn leaves_and_lineage() {
    let (tree, [root, a, b, c, d]) = sample();
    assert_eq!(fetch_leaves(&tree, root).unwrap(), BTreeSet::from([b, c, d]));
    assert_eq!(fetch_leaves(&tree, b).unwrap(), BTreeSet::from([b]));
    assert_eq!(fetch_lineage(&tree, d).unwrap(), vec![root, a, d]);
    assert_eq!(fetch_lineage(&tree, root).unwrap(), vec![root]);
    assert_eq!(fetch_lineage(&tree, NodeId::new()).unwrap_err(), TreeError::InvalidNode);
    assert!(tree.is_ancestor(root, d));
    assert!(!tree.is_ancestor(b, d));
}

#[test]
fn copy_with_a_colliding_descendant_writes_nothing() {
    let (other, [_, a, _, c, _]) = sample();
    let mut tree = Tree::new(NodeId::new());
    let host = tree.root();
    tree.create_child(host, c).unwrap();

    assert_eq!(tree.copy(host, &other, a).unwrap_err(), TreeError::ChildAlreadyExists);
    assert!(!tree.exists(a));
    assert_eq!(tree.fetch_children(host).unwrap(), BTreeSet::from([c]));
    assert_eq!(tree.edge_count(), 1);

    assert_eq!(
        tree.copy_descendants(host, &other, a).unwrap_err(),
        TreeError::ChildAlreadyExists
    );
    assert_eq!(tree.edge_count(), 1);
}

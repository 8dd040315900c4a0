use super::*;
use ol_core::alias_id;
use std::collections::BTreeSet;

fn outline() -> Outline {
    Outline::new().expect("new outline")
}

#[test]
fn new_outline_has_root_with_attributes() {
    let ol = outline();
    let root = ol.root();
    assert_eq!(ol.fetch_heading(root), Some(ROOT_HEADING));
    assert_eq!(ol.fetch_title(root), Some(ROOT_TITLE));
    assert!(ol.fetch_body(root).is_some_and(|body| body.starts_with("Welcome")));
    assert!(ol.db().fetch_attr_node(root).is_some());
    assert!(ol.fetch_genesis_time(root).is_ok());
    assert!(ol.fetch_children(root).is_empty());
}

#[test]
fn create_child_validates_heading_and_parent() {
    let mut ol = outline();
    let root = ol.root();

    let a = ol.create_child(root, "some_heading").unwrap();
    assert_eq!(ol.fetch_title(a), Some("Some Heading"));
    assert_eq!(ol.fetch_body(a), Some(""));
    assert_eq!(ol.fetch_parent(a), Some(root));

    assert!(matches!(ol.create_child(root, "Bad Heading"), Err(StoreError::InvalidHeading(_))));
    assert!(matches!(ol.create_child(root, "some_heading"), Err(StoreError::DuplicateChildHeading(_))));
    assert!(matches!(ol.create_child(NodeId::new(), "x"), Err(StoreError::InvalidParent)));
    assert!(matches!(ol.create_child_with_id(root, a, "other", "Other"), Err(StoreError::NodeAlreadyExists)));

    let attr = ol.db().fetch_attr_node(a).unwrap();
    assert!(matches!(ol.create_child(attr, "x"), Err(StoreError::InvalidParent)));
}

#[test]
fn updates_do_not_enforce_sibling_uniqueness() {
    let mut ol = outline();
    let root = ol.root();
    let a = ol.create_child(root, "a").unwrap();
    let b = ol.create_child(root, "b").unwrap();

    ol.update_heading(b, "a").unwrap();
    ol.update_title(b, "Renamed").unwrap();
    ol.update_body(b, "text").unwrap();
    assert_eq!(ol.fetch_title(b), Some("Renamed"));
    assert_eq!(ol.fetch_body(b), Some("text"));
    assert_eq!(ol.fetch_child(root, "a"), Some(a.min(b)));
    assert!(matches!(ol.update_heading(b, "A"), Err(StoreError::InvalidHeading(_))));
    assert!(matches!(ol.update_body(NodeId::new(), "x"), Err(StoreError::InvalidNode)));
}

#[test]
fn genesis_is_recorded_per_node() {
    let mut ol = outline();
    let a = ol.create_child(ol.root(), "a").unwrap();
    let genesis = ol.fetch_attr(a, GENESIS_HEADING).unwrap();
    assert!(ol.db().is_in_attr_tree(genesis));
    assert!(!ol.db().is_in_attr_tree(a));

    let at = ol.fetch_genesis_time(a).unwrap();
    assert!((at.unix_timestamp() - crate::store::now_unix()).abs() < 60);
    assert!(ol.fetch_genesis_rfc3339(a).unwrap().contains('T'));
}

#[test]
fn display_order_tracks_creation_and_reorder() {
    let mut ol = outline();
    let root = ol.root();
    let a = ol.create_child(root, "a").unwrap();
    let b = ol.create_child(root, "b").unwrap();
    let c = ol.create_child(root, "c").unwrap();
    assert_eq!(ol.fetch_ordered_children(root).unwrap(), vec![a, b, c]);

    ol.reorder_children(root, &[c, a, b]).unwrap();
    assert_eq!(ol.fetch_ordered_children(root).unwrap(), vec![c, a, b]);

    assert!(matches!(ol.reorder_children(root, &[c, a]), Err(StoreError::InvalidOrdering)));
    assert!(matches!(ol.reorder_children(root, &[c, a, a]), Err(StoreError::InvalidOrdering)));
    assert!(matches!(
        ol.reorder_children(root, &[c, a, NodeId::new()]),
        Err(StoreError::InvalidOrdering)
    ));

    ol.erase_node(a).unwrap();
    assert_eq!(ol.fetch_ordered_children(root).unwrap(), vec![c, b]);
}

#[test]
fn alias_places_source_and_real_descendants() {
    let mut ol = outline();
    let root = ol.root();
    let src = ol.create_child(root, "src").unwrap();
    let kid = ol.create_child(src, "kid").unwrap();
    let dst = ol.create_child(root, "dst").unwrap();

    let alias = ol.create_alias(src, dst).unwrap();
    assert_eq!(alias, alias_id(src, dst));
    assert!(ol.is_alias(alias));
    assert!(ol.aliases().is_top(alias));
    assert_eq!(ol.resolve(alias), src);
    assert_eq!(ol.fetch_heading(alias), Some("src"));
    assert_eq!(ol.fetch_parent(alias), Some(dst));
    assert_eq!(ol.fetch_ordered_children(dst).unwrap(), vec![alias]);

    let inner = alias_id(kid, alias);
    assert!(ol.is_alias(inner));
    assert!(!ol.aliases().is_top(inner));
    assert_eq!(ol.fetch_ordered_children(alias).unwrap(), vec![inner]);
    assert_eq!(ol.fetch_aliased_lineage(inner).unwrap(), vec![root, dst, alias, inner]);

    // new children of the source appear under the placement at once
    let late = ol.create_child(src, "late").unwrap();
    assert!(ol.fetch_alias_children(alias).contains(&alias_id(late, alias)));

    // children created through the placement land on the source
    let via = ol.create_child(alias, "via").unwrap();
    assert_eq!(ol.fetch_parent(via), Some(src));
}

#[test]
fn alias_preconditions_are_checked_before_writing() {
    let mut ol = outline();
    let root = ol.root();
    let a = ol.create_child(root, "a").unwrap();
    let b = ol.create_child(a, "b").unwrap();
    let c = ol.create_child(root, "c").unwrap();
    let _clash = ol.create_child(c, "a").unwrap();

    assert!(matches!(ol.create_alias(root, c), Err(StoreError::IsRoot)));
    assert!(matches!(ol.create_alias(NodeId::new(), c), Err(StoreError::AliasSourceNotFound)));
    assert!(matches!(ol.create_alias(b, NodeId::new()), Err(StoreError::AliasDestinationNotFound)));
    assert!(matches!(ol.create_alias(a, a), Err(StoreError::AliasSourceEqualsDestination)));
    assert!(matches!(ol.create_alias(a, b), Err(StoreError::AliasSourceIsAncestor)));
    assert!(matches!(ol.create_alias(b, a), Err(StoreError::AliasSourceIsAncestor)));
    // any lineal pair is refused, not only source-above-destination
    assert!(matches!(ol.create_alias(b, root), Err(StoreError::AliasSourceIsAncestor)));
    assert!(matches!(ol.create_alias(a, c), Err(StoreError::DuplicateChildHeading(_))));
    assert!(ol.aliases().is_empty());
    assert!(ol.db().cache().aliases().is_empty());
}

#[test]
fn alias_ids_are_symmetric_so_direction_is_kept() {
    let mut ol = outline();
    let root = ol.root();
    let x = ol.create_child(root, "x").unwrap();
    let y = ol.create_child(root, "y").unwrap();

    let alias = ol.create_alias(x, y).unwrap();
    assert_eq!(alias, alias_id(y, x));
    // the reverse placement would claim the same id
    assert!(matches!(ol.create_alias(y, x), Err(StoreError::AliasAlreadyExists)));

    let from_x = ol.fetch_aliases_from(x);
    assert_eq!(from_x.len(), 1);
    assert_eq!((from_x[0].src, from_x[0].dst), (x, y));
    assert!(ol.fetch_aliases_from(y).is_empty());
    assert!(ol.fetch_aliases_to(x).is_empty());
    assert_eq!(ol.fetch_aliases_to(y)[0].src, x);
}

#[test]
fn erasing_an_alias_prunes_the_overlay() {
    let mut ol = outline();
    let root = ol.root();
    let src = ol.create_child(root, "src").unwrap();
    ol.create_child(src, "kid").unwrap();
    let mid = ol.create_child(root, "mid").unwrap();
    let dst = ol.create_child(mid, "dst").unwrap();

    let alias = ol.create_alias(src, dst).unwrap();
    assert!(ol.aliases().overlay().exists(mid));
    assert_eq!(ol.aliases().len(), 2);

    let inner = alias_id(ol.fetch_child(src, "kid").unwrap(), alias);
    assert!(matches!(ol.erase_alias(inner), Err(StoreError::NonTopAlias)));
    assert!(matches!(ol.erase_node(inner), Err(StoreError::NonTopAlias)));

    ol.erase_alias(alias).unwrap();
    assert!(ol.aliases().is_empty());
    assert!(!ol.aliases().overlay().exists(mid));
    assert!(!ol.aliases().overlay().exists(dst));
    assert_eq!(ol.aliases().overlay().edge_count(), 0);
    assert!(ol.fetch_ordered_children(dst).unwrap().is_empty());
    assert!(ol.exists(src));

    // the row was created this session, so re-aliasing is allowed again
    assert_eq!(ol.create_alias(src, dst).unwrap(), alias);
}

#[test]
fn erase_cascades_through_subtree_and_aliases() {
    let mut ol = outline();
    let root = ol.root();
    let a = ol.create_child(root, "a").unwrap();
    let b = ol.create_child(a, "b").unwrap();
    let c = ol.create_child(b, "c").unwrap();
    let other = ol.create_child(root, "other").unwrap();
    let away = ol.create_child(root, "away").unwrap();
    let placed_here = ol.create_alias(other, b).unwrap();
    let placed_away = ol.create_alias(b, away).unwrap();
    assert!(ol.is_alias(alias_id(c, placed_away)));

    let attr_b = ol.db().fetch_attr_node(b).unwrap();
    ol.erase_node(a).unwrap();

    for gone in [a, b, c, attr_b, placed_here, placed_away] {
        assert!(!ol.exists(gone), "{gone} still exists");
    }
    assert!(ol.exists(other));
    assert_eq!(ol.fetch_children(root), BTreeSet::from([other, away]));
    assert!(ol.aliases().is_empty());
    assert_eq!(ol.aliases().overlay().edge_count(), 0);
    assert!(ol.fetch_ordered_children(away).unwrap().is_empty());
    assert!(ol.db().cache().aliases().is_empty());
    assert!(matches!(ol.erase_node(root), Err(StoreError::IsRoot)));
    assert!(matches!(ol.erase_node(a), Err(StoreError::InvalidNode)));
}

#[test]
fn move_keeps_subtree_and_rewires_aliases() {
    let mut ol = outline();
    let root = ol.root();
    let a = ol.create_child(root, "a").unwrap();
    let x = ol.create_child(a, "x").unwrap();
    let x_kid = ol.create_child(x, "x_kid").unwrap();
    let y = ol.create_child(root, "y").unwrap();
    let z = ol.create_child(root, "z").unwrap();
    let alias_a = ol.create_alias(a, z).unwrap();
    assert!(ol.is_alias(alias_id(x, alias_a)));

    ol.move_node(x, y).unwrap();
    assert_eq!(ol.fetch_parent(x), Some(y));
    assert_eq!(ol.fetch_parent(x_kid), Some(x));
    assert!(ol.fetch_children(a).is_empty());
    assert_eq!(ol.fetch_ordered_children(y).unwrap(), vec![x]);
    assert!(!ol.is_alias(alias_id(x, alias_a)));
    assert!(ol.fetch_alias_children(alias_a).is_empty());

    // moving back re-creates the internal placements
    ol.move_node(x, a).unwrap();
    let inner = alias_id(x, alias_a);
    assert!(ol.is_alias(inner));
    assert!(ol.is_alias(alias_id(x_kid, inner)));
}

#[test]
fn move_rejections() {
    let mut ol = outline();
    let root = ol.root();
    let a = ol.create_child(root, "a").unwrap();
    let b = ol.create_child(a, "b").unwrap();
    let c = ol.create_child(root, "c").unwrap();
    let _dup = ol.create_child(c, "b").unwrap();

    assert!(matches!(ol.move_node(root, a), Err(StoreError::IsRoot)));
    assert!(matches!(ol.move_node(a, a), Err(StoreError::InvalidNode)));
    assert!(matches!(ol.move_node(a, b), Err(StoreError::InvalidNode)));
    assert!(matches!(ol.move_node(NodeId::new(), a), Err(StoreError::InvalidNode)));
    assert!(matches!(ol.move_node(b, c), Err(StoreError::DuplicateChildHeading(_))));
    ol.move_node(b, a).unwrap();
    assert_eq!(ol.fetch_parent(b), Some(a));
}

#[test]
fn move_that_would_put_an_alias_source_above_its_destination_is_rejected() {
    let mut ol = outline();
    let root = ol.root();
    let a = ol.create_child(root, "a").unwrap();
    let b = ol.create_child(root, "b").unwrap();
    let c = ol.create_child(b, "c").unwrap();
    ol.create_alias(a, c).unwrap();

    assert!(matches!(ol.move_node(b, a), Err(StoreError::AliasSourceIsAncestor)));
    assert_eq!(ol.fetch_parent(b), Some(root));
}

#[test]
fn moving_a_mirrored_ancestor_moves_it_in_the_overlay() {
    let mut ol = outline();
    let root = ol.root();
    let p = ol.create_child(root, "p").unwrap();
    let d = ol.create_child(p, "d").unwrap();
    let s = ol.create_child(root, "s").unwrap();
    let q = ol.create_child(root, "q").unwrap();
    let alias = ol.create_alias(s, d).unwrap();

    ol.move_node(p, q).unwrap();
    assert_eq!(ol.fetch_aliased_lineage(alias).unwrap(), vec![root, q, p, d, alias]);
}

#[test]
fn hierarchy_subtree_and_leaves_skip_attribute_nodes() {
    let mut ol = outline();
    let root = ol.root();
    let a = ol.create_child(root, "a").unwrap();
    let b = ol.create_child(a, "b").unwrap();
    let c = ol.create_child(a, "c").unwrap();
    let d = ol.create_child(root, "d").unwrap();

    let tree = ol.hierarchy().unwrap();
    assert_eq!(tree.nodes(), BTreeSet::from([root, a, b, c, d]));
    assert_eq!(ol.subtree(a).unwrap().nodes(), BTreeSet::from([a, b, c]));
    assert_eq!(ol.fetch_leaves(root).unwrap(), BTreeSet::from([b, c, d]));
    assert!(ol.is_lineal(root, c));
    assert!(ol.is_lineal(c, a));
    assert!(!ol.is_lineal(c, d));
}

#[test]
fn moving_an_alias_source_keeps_its_nested_placements() {
    let mut ol = outline();
    let root = ol.root();
    let p = ol.create_child(root, "p").unwrap();
    let c = ol.create_child(p, "c").unwrap();
    let q = ol.create_child(root, "q").unwrap();
    let home = ol.create_child(root, "home").unwrap();
    let s = ol.create_child(home, "s").unwrap();
    let away = ol.create_child(root, "away").unwrap();
    let p_under_q = ol.create_alias(p, q).unwrap();
    ol.create_alias(s, c).unwrap();
    let nested = alias_id(s, alias_id(c, p_under_q));
    assert!(ol.is_alias(nested));

    ol.move_node(s, away).unwrap();
    assert_eq!(ol.fetch_parent(s), Some(away));
    assert!(ol.is_alias(nested));

    // moving a real child out of the aliased branch drops its placements
    ol.move_node(c, root).unwrap();
    assert!(!ol.is_alias(alias_id(c, p_under_q)));
    assert!(!ol.is_alias(nested));
    assert!(ol.fetch_alias_children(p_under_q).is_empty());
}

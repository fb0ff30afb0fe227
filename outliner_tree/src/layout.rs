// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row positions for drawing.

use kurbo::Point;

use crate::iter;
use crate::space::SpaceOutliner;
use crate::tree::Tree;
use crate::types::NodeId;

fn depth(tree: &Tree, node: NodeId) -> u32 {
    let mut depth = 0;
    let mut current = tree.parent_of(node);
    while let Some(p) = current {
        depth += 1;
        current = tree.parent_of(p);
    }
    depth
}

/// Assign every visible row its origin and return the height of all rows.
///
/// Rows are stacked from `y = 0` one `row_height` apart, with `y` growing
/// downward as in kurbo, and indented by `indent` per level. Rows below closed
/// rows keep their previous position.
pub fn set_coordinates(space: &mut SpaceOutliner, row_height: f64, indent: f64) -> f64 {
    let searching = space.settings().is_searching();
    let (tree, store) = space.tree_and_store_mut();
    let mut y = 0.0;
    iter::all_open(tree, store, searching, |tree, _, node| {
        let x = f64::from(depth(tree, node)) * indent;
        if let Some(n) = tree.get_mut(node) {
            n.position = Point::new(x, y);
        }
        y += row_height;
    });
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use crate::{DisplayMode, OutlinerSettings};
    use kurbo::Point;

    #[test]
    fn open_rows_stack_and_indent() {
        let (main, scene, _) = testing::scene_with_two_objects();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::ViewLayer));
        space.rebuild(testing::source(&main, Some(scene)));

        // "ViewLayer" is open, its collection base is open, the rest is closed.
        let height = set_coordinates(&mut space, 20.0, 10.0);
        let tree = space.tree();
        let layer = tree.roots()[0];
        let base = tree.children_of(layer)[0];
        let collection = tree.children_of(base)[0];
        assert_eq!(tree.get(layer).map(|n| n.position), Some(Point::new(0.0, 0.0)));
        assert_eq!(tree.get(base).map(|n| n.position), Some(Point::new(10.0, 20.0)));
        assert_eq!(
            tree.get(collection).map(|n| n.position),
            Some(Point::new(20.0, 40.0))
        );
        assert!(height >= 60.0);
    }

    #[test]
    fn closing_a_row_hides_its_subtree() {
        let (main, scene, _) = testing::scene_with_two_objects();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::ViewLayer));
        space.rebuild(testing::source(&main, Some(scene)));
        let layer = space.tree().roots()[0];
        space.set_open(layer, false);

        let height = set_coordinates(&mut space, 20.0, 10.0);
        assert_eq!(height, 20.0, "only the closed view layer row is visible");
    }
}

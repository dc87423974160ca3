//! Group shape combining several objects into one selectable unit.

use super::{SceneObject, ShapeTrait};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A group of objects manipulated as a single unit. Symbols are groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub children: Vec<SceneObject>,
}

impl Group {
    pub fn new(children: Vec<SceneObject>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[SceneObject] {
        &self.children
    }

    /// Dissolve this group and return its children.
    pub fn ungroup(self) -> Vec<SceneObject> {
        self.children
    }
}

impl ShapeTrait for Group {
    fn bounds(&self) -> Rect {
        let mut children = self.children.iter();
        let Some(first) = children.next() else {
            return Rect::ZERO;
        };
        children.fold(first.bounds(), |acc, child| acc.union(child.bounds()))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        // Groups are picked by their box, like a single object.
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for child in &self.children {
            path.extend(child.shape.to_path());
        }
        path
    }

    fn transform(&mut self, affine: Affine) {
        for child in &mut self.children {
            child.shape.transform(affine);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Rectangle, Shape};
    use kurbo::Vec2;

    fn sample() -> Group {
        Group::new(vec![
            SceneObject::new(Shape::Rect(Rectangle::new(Point::new(0.0, 0.0), 40.0, 40.0))),
            SceneObject::new(Shape::Circle(Circle::new(Point::new(30.0, 30.0), 10.0))),
        ])
    }

    #[test]
    fn test_group_bounds_union() {
        assert_eq!(sample().bounds(), Rect::new(0.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn test_empty_group_bounds() {
        assert_eq!(Group::new(Vec::new()).bounds(), Rect::ZERO);
    }

    #[test]
    fn test_group_transform_moves_children() {
        let mut group = sample();
        group.transform(Affine::translate(Vec2::new(10.0, 5.0)));
        assert_eq!(group.bounds(), Rect::new(10.0, 5.0, 60.0, 55.0));
    }
}

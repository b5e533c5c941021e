//! Arrow glyphs and their scene-tree representation.

use std::fmt;

use nalgebra::{UnitQuaternion, Vector3};

use crate::error;
use crate::scene::SceneNode;

use super::color::{color_to_x3d, Rgb};
use super::orientation::{AnnotatedPoint, AxisAngle};
use super::scale::ResolvedScales;
use super::transition::Transition;

/// Identity of a glyph across render passes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GlyphKey {
    /// Position in the filtered point sequence.
    Index(usize),
    Named(String),
}

impl fmt::Display for GlyphKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlyphKey::Index(i) => write!(f, "{}", i),
            GlyphKey::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Fixed dimensions of the arrow primitives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowStyle {
    pub shaft_radius: f64,
    pub head_height: f64,
    pub head_radius: f64,
}

impl Default for ArrowStyle {
    fn default() -> ArrowStyle {
        ArrowStyle {
            shaft_radius: 0.1,
            head_height: 1.0,
            head_radius: 0.4,
        }
    }
}

/// A rendered arrow bound to one annotated point.
///
/// Colour and size are fixed when the glyph enters; later passes only
/// move and rotate it.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphNode {
    pub key: GlyphKey,
    pub datum: AnnotatedPoint,
    pub color: Rgb,
    pub size: f64,
    pub transition: Option<Transition>,
}

impl GlyphNode {
    pub fn enter(point: &AnnotatedPoint, scales: &ResolvedScales) -> Result<GlyphNode, error::Error> {
        let size = scales.size.try_apply(point.length)?;
        let color = scales.color.try_apply(point.length)?;
        Ok(GlyphNode {
            key: point.key.clone(),
            datum: point.clone(),
            color,
            size,
            transition: None,
        })
    }

    /// Target translation.
    pub fn translation(&self) -> Vector3<f64> {
        self.datum.translation
    }

    /// Target rotation.
    pub fn rotation(&self) -> AxisAngle {
        self.datum.rotation
    }

    /// Translation and rotation as currently displayed.
    pub fn current(&self) -> (Vector3<f64>, UnitQuaternion<f64>) {
        match &self.transition {
            Some(transition) => transition.sample(),
            None => (self.datum.translation, self.datum.rotation.to_quaternion()),
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Bind a new datum, transitioning from the displayed state.
    ///
    /// An in-flight transition is re-targeted from wherever it has got to.
    pub fn retarget(&mut self, point: &AnnotatedPoint, duration: f64) {
        let from = self.current();
        let to = (point.translation, point.rotation.to_quaternion());
        self.datum = point.clone();
        let settled =
            (from.0 - to.0).norm() < 1e-12 && from.1.angle_to(&to.1) < 1e-12;
        self.transition = if duration <= 0.0 || settled {
            None
        } else {
            Some(Transition::new(from, to, duration))
        };
    }

    pub fn advance(&mut self, dt: f64) {
        let finished = match self.transition.as_mut() {
            Some(transition) => transition.advance(dt),
            None => false,
        };
        if finished {
            self.transition = None;
        }
    }

    /// `Transform.arrow > Transform > Group > [Shape(Cylinder), Transform > Shape(Cone)]`
    pub fn to_scene(&self, style: &ArrowStyle) -> SceneNode {
        let (translation, rotation) = self.current();
        let rotation = AxisAngle::from_quaternion(&rotation);
        let offset = format!("0 {} 0", self.size / 2.0);
        let material = || {
            SceneNode::new("Appearance")
                .add(SceneNode::new("Material").set("diffuseColor", color_to_x3d(self.color)))
        };
        let shaft = SceneNode::new("Shape").add(material()).add(
            SceneNode::new("Cylinder")
                .set("height", self.size)
                .set("radius", style.shaft_radius),
        );
        let head = SceneNode::new("Transform").set("translation", &offset).add(
            SceneNode::new("Shape").add(material()).add(
                SceneNode::new("Cone")
                    .set("height", style.head_height)
                    .set("bottomRadius", style.head_radius),
            ),
        );
        SceneNode::new("Transform")
            .set("class", "arrow")
            .set("id", format!("arrow-{}", self.key))
            .set(
                "translation",
                format!("{} {} {}", translation.x, translation.y, translation.z),
            )
            .set("rotation", rotation)
            .add(
                SceneNode::new("Transform")
                    .set("translation", &offset)
                    .add(SceneNode::new("Group").add(shaft).add(head)),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dimensions;
    use crate::data::DataPoint;
    use crate::field::color::Colors;
    use crate::field::scale::Scales;
    use crate::field::summary::{Extent, Summary};

    fn scales() -> Scales {
        let extent = Some(Extent { min: 0.0, max: 2.0 });
        let mut scales = Scales::default();
        scales.resolve(
            &Summary {
                x: extent,
                y: extent,
                z: extent,
                magnitude: extent,
            },
            &Dimensions::default(),
            &Colors::default(),
            [2.0, 5.0],
        );
        scales
    }

    fn annotated(key: usize, x: f64, vector: Vector3<f64>) -> AnnotatedPoint {
        let scales = scales();
        AnnotatedPoint::new(
            GlyphKey::Index(key),
            &DataPoint::new(x, 0.0, 0.0),
            vector,
            &scales.resolved().unwrap(),
        )
        .unwrap()
        .unwrap()
    }

    #[test]
    fn test_enter() {
        let scales = scales();
        let point = annotated(0, 1.0, Vector3::new(0.0, 2.0, 0.0));
        let node = GlyphNode::enter(&point, &scales.resolved().unwrap()).unwrap();
        assert_eq!(node.size, 5.0);
        assert_eq!(node.color, scales.color.as_ref().unwrap().apply(2.0));
        assert_eq!(node.translation(), Vector3::new(20.0, 0.0, 0.0));
        assert!(!node.is_transitioning());
    }

    #[test]
    fn test_retarget_and_advance() {
        let scales = scales();
        let first = annotated(0, 0.0, Vector3::new(0.0, 1.0, 0.0));
        let second = annotated(0, 2.0, Vector3::new(1.0, 0.0, 0.0));
        let mut node = GlyphNode::enter(&first, &scales.resolved().unwrap()).unwrap();
        node.retarget(&second, 1.0);
        assert!(node.is_transitioning());
        assert_eq!(node.translation(), Vector3::new(40.0, 0.0, 0.0));
        assert_eq!(node.current().0, Vector3::zeros());
        node.advance(0.5);
        assert!(node.is_transitioning());
        let halfway = node.current().0.x;
        assert!(halfway > 0.0 && halfway < 40.0);
        // re-target mid flight back to the start
        node.retarget(&first, 1.0);
        assert_eq!(node.transition.unwrap().from_translation.x, halfway);
        node.advance(1.0);
        assert!(!node.is_transitioning());
        assert_eq!(node.current().0, Vector3::zeros());
    }

    #[test]
    fn test_retarget_unchanged_is_settled() {
        let scales = scales();
        let point = annotated(3, 1.0, Vector3::new(0.0, 0.0, 1.0));
        let mut node = GlyphNode::enter(&point, &scales.resolved().unwrap()).unwrap();
        node.retarget(&point, 1.0);
        assert!(!node.is_transitioning());
    }

    #[test]
    fn test_to_scene() {
        let scales = scales();
        let point = annotated(7, 2.0, Vector3::new(0.0, 1.0, 0.0));
        let node = GlyphNode::enter(&point, &scales.resolved().unwrap()).unwrap();
        let scene = node.to_scene(&ArrowStyle::default());
        assert_eq!(scene.tag, "Transform");
        assert_eq!(scene.attr("class"), Some("arrow"));
        assert_eq!(scene.attr("id"), Some("arrow-7"));
        assert_eq!(scene.attr("translation"), Some("40 0 0"));
        assert_eq!(scene.attr("rotation"), Some("1 0 0 0"));
        let offset = &scene.children[0];
        assert_eq!(offset.attr("translation"), Some("0 1.75 0"));
        assert_eq!(scene.find_all("Cylinder").len(), 1);
        assert_eq!(scene.find_all("Cone").len(), 1);
        assert_eq!(scene.find_all("Material").len(), 2);
    }
}

//! Enter/update/exit reconciliation of glyphs against annotated points.
//!
//! A pass is computed as a [`Patch`] over the previous keyed node set and
//! the new ordered point sequence, then committed in one step: the new
//! node set is fully built before it replaces the old one.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::trace;

use crate::error;
use crate::scene::SceneNode;

use super::event::{Event, PassSummary};
use super::glyph::{ArrowStyle, GlyphKey, GlyphNode};
use super::orientation::AnnotatedPoint;
use super::scale::ResolvedScales;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Patch {
    pub create: Vec<AnnotatedPoint>,
    pub update: Vec<AnnotatedPoint>,
    pub delete: Vec<GlyphKey>,
}

/// Split `current` into glyphs to create and update, and list the
/// `previous` keys that no longer appear.
pub fn diff(previous: &IndexMap<GlyphKey, GlyphNode>, current: &[AnnotatedPoint]) -> Patch {
    let mut patch = Patch::default();
    let mut keys = HashSet::new();
    for point in current.iter() {
        keys.insert(&point.key);
        if previous.contains_key(&point.key) {
            patch.update.push(point.clone());
        } else {
            patch.create.push(point.clone());
        }
    }
    for key in previous.keys() {
        if !keys.contains(key) {
            patch.delete.push(key.clone());
        }
    }
    patch
}

/// The region of the scene tree owned by one component instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphLayer {
    pub id: String,
    pub classed: String,
    pub nodes: IndexMap<GlyphKey, GlyphNode>,
}

impl GlyphLayer {
    pub fn new(id: &str, classed: &str) -> GlyphLayer {
        GlyphLayer {
            id: id.to_string(),
            classed: classed.to_string(),
            nodes: IndexMap::new(),
        }
    }

    pub fn get(&self, key: &GlyphKey) -> Option<&GlyphNode> {
        self.nodes.get(key)
    }

    /// Apply `patch`, leaving nodes in the order of `order`.
    ///
    /// New glyphs are built first; if any of them fails the layer is
    /// left untouched. Returns the enter, update and exit events in that
    /// order.
    pub fn commit(
        &mut self,
        patch: Patch,
        order: &[GlyphKey],
        scales: Option<&ResolvedScales>,
        duration: f64,
    ) -> Result<(Vec<Event>, PassSummary), error::Error> {
        let mut entering: IndexMap<GlyphKey, GlyphNode> = IndexMap::new();
        if !patch.create.is_empty() {
            let scales = match scales {
                Some(scales) => scales,
                None => return Err(error::Error::NotDefined("scales".to_string())),
            };
            for point in patch.create.iter() {
                entering.insert(point.key.clone(), GlyphNode::enter(point, scales)?);
            }
        }

        let mut previous = std::mem::take(&mut self.nodes);
        let mut updates: IndexMap<&GlyphKey, &AnnotatedPoint> =
            patch.update.iter().map(|p| (&p.key, p)).collect();
        let mut next = IndexMap::with_capacity(order.len());
        for key in order.iter() {
            if let Some(node) = entering.swap_remove(key) {
                next.insert(key.clone(), node);
            } else if let Some(mut node) = previous.swap_remove(key) {
                if let Some(point) = updates.swap_remove(key) {
                    node.retarget(point, duration);
                }
                next.insert(key.clone(), node);
            }
        }
        self.nodes = next;

        let mut events = vec![];
        for point in patch.create.iter() {
            trace!(key = %point.key, "enter");
            events.push(Event::Enter(point.key.clone()));
        }
        for point in patch.update.iter() {
            trace!(key = %point.key, "update");
            events.push(Event::Update(point.key.clone()));
        }
        for key in patch.delete.iter() {
            trace!(key = %key, "exit");
            events.push(Event::Exit(key.clone()));
        }
        let summary = PassSummary {
            entered: patch.create.len(),
            updated: patch.update.len(),
            exited: patch.delete.len(),
            dropped: 0,
        };
        Ok((events, summary))
    }

    pub fn advance(&mut self, dt: f64) {
        for node in self.nodes.values_mut() {
            node.advance(dt);
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.nodes.values().any(|node| node.is_transitioning())
    }

    pub fn to_scene(&self, style: &ArrowStyle) -> SceneNode {
        let mut group = SceneNode::new("Group")
            .set("class", &self.classed)
            .set("id", &self.id);
        for node in self.nodes.values() {
            group = group.add(node.to_scene(style));
        }
        group
    }
}

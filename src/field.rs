//! The vector field component.
//!
//! A [`VectorFields`] instance owns one glyph layer and the scales used
//! to draw it. Each call to [`VectorFields::render`] is one complete pass:
//! the dataset is summarised, unset scales are filled in, a vector is
//! resolved and oriented for every point, and the glyph layer is
//! reconciled against the result in a single commit.

use std::collections::HashSet;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::config::{Dimensions, FieldConfig};
use crate::data::DataSet;
use crate::error;
use crate::scene::SceneNode;

pub mod axis;
pub mod color;
pub mod event;
pub mod glyph;
pub mod orientation;
pub mod reconcile;
pub mod scale;
pub mod summary;
pub mod transition;
pub mod vector;

use axis::AxisComponent;
use color::Colors;
use event::{Dispatcher, Event, EventKind, PassSummary};
use glyph::{ArrowStyle, GlyphKey, GlyphNode};
use orientation::AnnotatedPoint;
use reconcile::GlyphLayer;
use scale::{ColorScale, ContinuousScale, Scales};
use vector::{Identity, VectorFunction};

#[derive(Debug)]
pub struct VectorFields {
    dimensions: Dimensions,
    size_domain: [f64; 2],
    colors: Colors,
    duration: f64,
    classed: String,
    style: ArrowStyle,
    scales: Scales,
    supplied: Scales,
    vector_function: Box<dyn VectorFunction>,
    layer: Option<GlyphLayer>,
    dispatcher: Dispatcher,
}

impl Default for VectorFields {
    fn default() -> VectorFields {
        VectorFields::new()
    }
}

/// Annotated points for one pass and the number of points left out.
struct Annotation {
    points: Vec<AnnotatedPoint>,
    dropped: usize,
}

impl VectorFields {
    pub fn new() -> VectorFields {
        let config = FieldConfig::default();
        VectorFields {
            dimensions: config.dimensions,
            size_domain: config.size_domain,
            colors: Colors::Interpolator(config.palette),
            duration: config.duration,
            classed: config.classed,
            style: ArrowStyle::default(),
            scales: Scales::default(),
            supplied: Scales::default(),
            vector_function: Box::new(Identity),
            layer: None,
            dispatcher: Dispatcher::default(),
        }
    }

    pub fn builder() -> VectorFieldsBuilder {
        VectorFieldsBuilder::default()
    }

    pub fn from_config(config: &FieldConfig) -> Result<VectorFields, error::Error> {
        VectorFields::builder().config(config.clone()).build()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn set_dimensions(&mut self, dimensions: Dimensions) -> &mut Self {
        self.dimensions = dimensions;
        self
    }

    pub fn size_domain(&self) -> [f64; 2] {
        self.size_domain
    }

    pub fn set_size_domain(&mut self, size_domain: [f64; 2]) -> &mut Self {
        self.size_domain = size_domain;
        self
    }

    pub fn colors(&self) -> &Colors {
        &self.colors
    }

    pub fn set_colors(&mut self, colors: Colors) -> &mut Self {
        self.colors = colors;
        self
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn set_duration(&mut self, duration: f64) -> &mut Self {
        self.duration = duration.max(0.0);
        self
    }

    pub fn classed(&self) -> &str {
        &self.classed
    }

    pub fn set_classed(&mut self, classed: &str) -> &mut Self {
        self.classed = classed.to_string();
        if let Some(layer) = self.layer.as_mut() {
            layer.classed = self.classed.clone();
        }
        self
    }

    pub fn style(&self) -> ArrowStyle {
        self.style
    }

    pub fn set_style(&mut self, style: ArrowStyle) -> &mut Self {
        self.style = style;
        self
    }

    pub fn x_scale(&self) -> Option<&ContinuousScale> {
        self.scales.x.as_ref()
    }

    pub fn set_x_scale(&mut self, scale: ContinuousScale) -> &mut Self {
        self.supplied.x = Some(scale.clone());
        self.scales.x = Some(scale);
        self
    }

    pub fn y_scale(&self) -> Option<&ContinuousScale> {
        self.scales.y.as_ref()
    }

    pub fn set_y_scale(&mut self, scale: ContinuousScale) -> &mut Self {
        self.supplied.y = Some(scale.clone());
        self.scales.y = Some(scale);
        self
    }

    pub fn z_scale(&self) -> Option<&ContinuousScale> {
        self.scales.z.as_ref()
    }

    pub fn set_z_scale(&mut self, scale: ContinuousScale) -> &mut Self {
        self.supplied.z = Some(scale.clone());
        self.scales.z = Some(scale);
        self
    }

    pub fn color_scale(&self) -> Option<&ColorScale> {
        self.scales.color.as_ref()
    }

    pub fn set_color_scale(&mut self, scale: ColorScale) -> &mut Self {
        self.supplied.color = Some(scale.clone());
        self.scales.color = Some(scale);
        self
    }

    pub fn size_scale(&self) -> Option<&ContinuousScale> {
        self.scales.size.as_ref()
    }

    pub fn set_size_scale(&mut self, scale: ContinuousScale) -> &mut Self {
        self.supplied.size = Some(scale.clone());
        self.scales.size = Some(scale);
        self
    }

    /// Forget derived scales so the next pass derives them again. Scales
    /// set through the builder or a setter are kept.
    pub fn reset_scales(&mut self) -> &mut Self {
        self.scales.reset(&self.supplied);
        self
    }

    pub fn vector_function(&self) -> &dyn VectorFunction {
        self.vector_function.as_ref()
    }

    pub fn set_vector_function<F: VectorFunction + 'static>(&mut self, function: F) -> &mut Self {
        self.vector_function = Box::new(function);
        self
    }

    /// Subscribe `handler` to the named lifecycle event.
    pub fn on<F>(&mut self, name: &str, handler: F) -> Result<&mut Self, error::Error>
    where
        F: FnMut(&Event) + 'static,
    {
        let kind = EventKind::from_str(name)?;
        self.dispatcher.on(kind, Box::new(handler));
        Ok(self)
    }

    /// Resolve scales for `data` and annotate every drawable point.
    ///
    /// Points with a zero-length or non-finite vector, a non-finite
    /// position or a repeated explicit key are left out.
    pub fn annotate(&mut self, data: &DataSet) -> Result<Vec<AnnotatedPoint>, error::Error> {
        Ok(self.prepare(data)?.points)
    }

    fn prepare(&mut self, data: &DataSet) -> Result<Annotation, error::Error> {
        let vectors = vector::resolve_all(&data.values, self.vector_function.as_ref());
        let summary = summary::summarise(&data.values, &vectors);
        self.scales
            .resolve(&summary, &self.dimensions, &self.colors, self.size_domain);

        let mut points = Vec::with_capacity(data.values.len());
        let mut keys = HashSet::new();
        let mut zero_length = 0;
        let mut dropped = 0;
        let scales = match self.scales.resolved() {
            Some(scales) => scales,
            None => {
                if !data.values.is_empty() {
                    warn!(
                        dataset = %data.key,
                        points = data.values.len(),
                        "no finite extent to build scales from, nothing drawn"
                    );
                }
                return Ok(Annotation {
                    points,
                    dropped: data.values.len(),
                });
            }
        };
        for (point, vector) in data.values.iter().zip(vectors.into_iter()) {
            if !point.position().iter().all(|v| v.is_finite()) {
                dropped += 1;
                continue;
            }
            let key = match &point.key {
                Some(name) => GlyphKey::Named(name.clone()),
                None => GlyphKey::Index(points.len()),
            };
            if keys.contains(&key) {
                warn!(dataset = %data.key, key = %key, "duplicate key, keeping the first point");
                dropped += 1;
                continue;
            }
            match AnnotatedPoint::new(key.clone(), point, vector, &scales)? {
                Some(annotated) => {
                    keys.insert(key);
                    points.push(annotated);
                }
                None => {
                    zero_length += 1;
                    dropped += 1;
                }
            }
        }
        if zero_length > 0 {
            warn!(
                dataset = %data.key,
                count = zero_length,
                "dropped points with zero-length or non-finite vectors"
            );
        }
        Ok(Annotation { points, dropped })
    }

    /// Run one render pass over `data`.
    ///
    /// On error the glyph layer is left exactly as it was.
    pub fn render(&mut self, data: &DataSet) -> Result<PassSummary, error::Error> {
        self.dispatcher.emit(&Event::Render {
            key: data.key.clone(),
            points: data.values.len(),
        });
        let Annotation { points, dropped } = self.prepare(data)?;
        let order: Vec<GlyphKey> = points.iter().map(|p| p.key.clone()).collect();

        let created = self.layer.is_none();
        let classed = self.classed.clone();
        let layer = self
            .layer
            .get_or_insert_with(|| GlyphLayer::new(&data.key, &classed));
        let patch = reconcile::diff(&layer.nodes, &points);
        let (events, mut summary) =
            match layer.commit(patch, &order, self.scales.resolved().as_ref(), self.duration) {
                Ok(result) => result,
                Err(err) => {
                    if created {
                        self.layer = None;
                    }
                    return Err(err);
                }
            };
        layer.id = data.key.clone();
        summary.dropped = dropped;

        for event in events.iter() {
            self.dispatcher.emit(event);
        }
        self.dispatcher.emit(&Event::End(summary));
        debug!(
            dataset = %data.key,
            entered = summary.entered,
            updated = summary.updated,
            exited = summary.exited,
            dropped = summary.dropped,
            "render pass complete"
        );
        Ok(summary)
    }

    /// Step in-flight transitions forward by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        if let Some(layer) = self.layer.as_mut() {
            layer.advance(dt);
        }
    }

    /// Jump every in-flight transition to its end state.
    pub fn finish_transitions(&mut self) {
        self.advance(f64::INFINITY);
    }

    pub fn is_transitioning(&self) -> bool {
        match &self.layer {
            Some(layer) => layer.is_transitioning(),
            None => false,
        }
    }

    pub fn layer(&self) -> Option<&GlyphLayer> {
        self.layer.as_ref()
    }

    pub fn glyphs(&self) -> Vec<&GlyphNode> {
        match &self.layer {
            Some(layer) => layer.nodes.values().collect(),
            None => vec![],
        }
    }

    pub fn glyph(&self, key: &GlyphKey) -> Option<&GlyphNode> {
        self.layer.as_ref().and_then(|layer| layer.get(key))
    }

    /// The managed glyph group, once a pass has run.
    pub fn scene(&self) -> Option<SceneNode> {
        self.layer.as_ref().map(|layer| layer.to_scene(&self.style))
    }

    /// Three-plane axes for the current spatial scales, if all are set.
    pub fn axes(&self, component: &dyn AxisComponent) -> Result<Option<SceneNode>, error::Error> {
        match (&self.scales.x, &self.scales.y, &self.scales.z) {
            (Some(x), Some(y), Some(z)) => Ok(Some(axis::render_axes(component, x, y, z)?)),
            _ => Ok(None),
        }
    }
}

/// Builds a [`VectorFields`] from a [`FieldConfig`] plus overrides.
#[derive(Default)]
pub struct VectorFieldsBuilder {
    config: FieldConfig,
    colors: Option<Colors>,
    color_scale: Option<ColorScale>,
    size_scale: Option<ContinuousScale>,
    vector_function: Option<Box<dyn VectorFunction>>,
}

impl VectorFieldsBuilder {
    pub fn config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dimensions(mut self, dimensions: Dimensions) -> Self {
        self.config.dimensions = dimensions;
        self
    }

    pub fn size_domain(mut self, size_domain: [f64; 2]) -> Self {
        self.config.size_domain = size_domain;
        self
    }

    pub fn colors(mut self, colors: Colors) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.config.duration = duration;
        self
    }

    pub fn classed(mut self, classed: &str) -> Self {
        self.config.classed = classed.to_string();
        self
    }

    pub fn x_scale(mut self, scale: ContinuousScale) -> Self {
        self.config.x_scale = Some(scale);
        self
    }

    pub fn y_scale(mut self, scale: ContinuousScale) -> Self {
        self.config.y_scale = Some(scale);
        self
    }

    pub fn z_scale(mut self, scale: ContinuousScale) -> Self {
        self.config.z_scale = Some(scale);
        self
    }

    pub fn color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale = Some(scale);
        self
    }

    pub fn size_scale(mut self, scale: ContinuousScale) -> Self {
        self.size_scale = Some(scale);
        self
    }

    pub fn vector_function<F: VectorFunction + 'static>(mut self, function: F) -> Self {
        self.vector_function = Some(Box::new(function));
        self
    }

    pub fn build(self) -> Result<VectorFields, error::Error> {
        let colors = match self.colors {
            Some(colors) => colors,
            None => self.config.colors()?,
        };
        let config = self.config;
        let supplied = Scales {
            x: config.x_scale,
            y: config.y_scale,
            z: config.z_scale,
            color: self.color_scale,
            size: self.size_scale,
        };
        Ok(VectorFields {
            dimensions: config.dimensions,
            size_domain: config.size_domain,
            colors,
            duration: config.duration.max(0.0),
            classed: config.classed,
            style: ArrowStyle::default(),
            scales: supplied.clone(),
            supplied,
            vector_function: self.vector_function.unwrap_or_else(|| Box::new(Identity)),
            layer: None,
            dispatcher: Dispatcher::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use nalgebra::Vector3;

    use crate::data::DataPoint;
    use crate::field::scale::ScaleKind;
    use crate::utils::approx_eq;

    fn dataset(values: Vec<DataPoint>) -> DataSet {
        DataSet::new("field", values)
    }

    fn grid() -> DataSet {
        dataset(vec![
            DataPoint::new(0.0, 0.0, 0.0).with_vector(0.0, 1.0, 0.0),
            DataPoint::new(1.0, 1.0, 1.0).with_vector(1.0, 0.0, 0.0),
            DataPoint::new(0.5, 0.5, 0.5).with_vector(0.0, 0.0, 2.0),
        ])
    }

    #[test]
    fn test_builder_overrides_config() {
        let config: FieldConfig = serde_yaml::from_str("duration: 2.0\nclassed: arrows").unwrap();
        let fields = VectorFields::builder()
            .config(config)
            .size_domain([1.0, 9.0])
            .duration(0.0)
            .build()
            .unwrap();
        assert_eq!(fields.classed(), "arrows");
        assert_eq!(fields.duration(), 0.0);
        assert_eq!(fields.size_domain(), [1.0, 9.0]);
        assert!(fields.x_scale().is_none());
    }

    #[test]
    fn test_render_creates_layer() {
        let mut fields = VectorFields::new();
        let summary = fields.render(&grid()).unwrap();
        assert_eq!(summary.entered, 3);
        let layer = fields.layer().unwrap();
        assert_eq!(layer.id, "field");
        assert_eq!(layer.classed, "vectorFields");
        let scene = fields.scene().unwrap();
        assert_eq!(scene.find_class("arrow").len(), 3);
        assert_eq!(fields.x_scale().unwrap().range, [0.0, 40.0]);
    }

    #[test]
    fn test_default_vector_function_is_identity() {
        let mut fields = VectorFields::new();
        let data = dataset(vec![
            DataPoint::new(0.0, 0.0, 0.0),
            DataPoint::new(0.0, 2.0, 0.0),
        ]);
        let points = fields.annotate(&data).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].key, GlyphKey::Index(0));
        assert_eq!(points[0].length, 2.0);
        assert_eq!(points[0].rotation.angle, 0.0);
    }

    #[test]
    fn test_custom_vector_function() {
        let mut fields = VectorFields::builder()
            .vector_function(|_x: f64, _y: f64, _z: f64, v: Option<f64>| {
                Vector3::new(0.0, 0.0, v.unwrap_or(0.0))
            })
            .build()
            .unwrap();
        let data = dataset(vec![
            DataPoint::new(0.0, 0.0, 0.0).with_value(3.0),
            DataPoint::new(1.0, 0.0, 0.0),
            DataPoint::new(2.0, 0.0, 0.0).with_value(1.0),
        ]);
        let points = fields.annotate(&data).unwrap();
        let keys: Vec<GlyphKey> = points.iter().map(|p| p.key.clone()).collect();
        assert_eq!(keys, vec![GlyphKey::Index(0), GlyphKey::Index(1)]);
        assert_eq!(points[1].point.x, 2.0);
        assert_eq!(fields.size_scale().unwrap().domain, [0.0, 3.0]);
    }

    #[test]
    fn test_degenerate_points_are_dropped() {
        let mut fields = VectorFields::new();
        let data = dataset(vec![
            DataPoint::new(0.0, 0.0, 0.0).with_vector(0.0, 0.0, 0.0),
            DataPoint::new(f64::NAN, 0.0, 0.0).with_vector(0.0, 1.0, 0.0),
            DataPoint::new(1.0, 0.0, 0.0).with_vector(0.0, 1.0, 0.0).with_key("a"),
            DataPoint::new(2.0, 0.0, 0.0).with_vector(0.0, 1.0, 0.0).with_key("a"),
            DataPoint::new(3.0, 0.0, 0.0).with_vector(1.0, 0.0, 0.0),
        ]);
        let summary = fields.render(&data).unwrap();
        assert_eq!(summary.entered, 2);
        assert_eq!(summary.dropped, 3);
        let first = fields.glyph(&GlyphKey::Named("a".to_string())).unwrap();
        assert_eq!(first.datum.point.x, 1.0);
        // positional keys count only the points that survive filtering
        let last = fields.glyph(&GlyphKey::Index(1)).unwrap();
        assert_eq!(last.datum.point.x, 3.0);
        assert!(fields.glyph(&GlyphKey::Index(0)).is_none());
    }

    #[test]
    fn test_large_finite_vectors_are_drawn() {
        let mut fields = VectorFields::new();
        let data = dataset(vec![
            DataPoint::new(0.0, 0.0, 0.0).with_vector(1e200, 1e200, 0.0),
            DataPoint::new(1.0, 0.0, 0.0).with_vector(0.0, 1.0, 0.0),
        ]);
        let summary = fields.render(&data).unwrap();
        assert_eq!(summary.entered, 2);
        assert_eq!(summary.dropped, 0);
        let big = fields.glyph(&GlyphKey::Index(0)).unwrap();
        assert!(big.datum.length.is_finite());
        assert!(approx_eq(big.size, 5.0, 1e-9));
        assert_eq!(fields.size_scale().unwrap().domain[0], 1.0);
    }

    #[test]
    fn test_reset_keeps_supplied_scales() {
        let x = ContinuousScale::linear([-1.0, 1.0], [0.0, 10.0]);
        let mut fields = VectorFields::builder().x_scale(x.clone()).build().unwrap();
        let size = ContinuousScale::linear([0.0, 4.0], [1.0, 2.0]);
        fields.set_size_scale(size.clone());
        fields.render(&grid()).unwrap();
        assert_eq!(fields.y_scale().unwrap().domain, [0.0, 1.0]);

        fields.reset_scales();
        assert_eq!(fields.x_scale(), Some(&x));
        assert_eq!(fields.size_scale(), Some(&size));
        assert!(fields.y_scale().is_none());
        assert!(fields.color_scale().is_none());

        let moved = dataset(vec![DataPoint::new(0.0, 7.0, 0.0).with_vector(0.0, 1.0, 0.0)]);
        fields.render(&moved).unwrap();
        assert_eq!(fields.x_scale(), Some(&x));
        assert_eq!(fields.y_scale().unwrap().domain, [7.0, 7.0]);
    }

    #[test]
    fn test_empty_dataset() {
        let mut fields = VectorFields::new();
        let summary = fields.render(&dataset(vec![])).unwrap();
        assert_eq!(summary, PassSummary::default());
        assert!(fields.x_scale().is_none());
        assert!(fields.glyphs().is_empty());
        fields.render(&grid()).unwrap();
        assert_eq!(fields.glyphs().len(), 3);
        let summary = fields.render(&dataset(vec![])).unwrap();
        assert_eq!(summary.exited, 3);
        assert!(fields.glyphs().is_empty());
    }

    #[test]
    fn test_events() {
        let seen = Rc::new(RefCell::new(vec![]));
        let mut fields = VectorFields::new();
        for name in ["render", "enter", "exit", "end"] {
            let seen = seen.clone();
            fields
                .on(name, move |e: &Event| seen.borrow_mut().push(e.clone()))
                .unwrap();
        }
        assert!(fields.on("click", |_: &Event| ()).is_err());
        fields.render(&grid()).unwrap();
        let events = seen.borrow().clone();
        assert_eq!(events.len(), 5);
        assert_eq!(
            events[0],
            Event::Render {
                key: "field".to_string(),
                points: 3
            }
        );
        assert_eq!(events[1], Event::Enter(GlyphKey::Index(0)));
        match &events[4] {
            Event::End(summary) => assert_eq!(summary.entered, 3),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_scale_leaves_layer_untouched() {
        let mut fields = VectorFields::new();
        fields.render(&grid()).unwrap();
        let before = fields.layer().cloned();
        fields.set_x_scale(ContinuousScale::linear([1.0, 10.0], [0.0, 40.0]).with_kind(ScaleKind::Log));
        match fields.render(&grid()) {
            Err(error::Error::InvalidScale(_)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(fields.layer().cloned(), before);
    }

    #[test]
    fn test_transitions() {
        let mut fields = VectorFields::builder().duration(1.0).build().unwrap();
        fields.render(&grid()).unwrap();
        assert!(!fields.is_transitioning());
        let mut moved = grid();
        moved.values[0] = DataPoint::new(0.0, 0.0, 0.0).with_vector(1.0, 0.0, 0.0);
        fields.render(&moved).unwrap();
        assert!(fields.is_transitioning());
        fields.advance(0.5);
        assert!(fields.is_transitioning());
        fields.finish_transitions();
        assert!(!fields.is_transitioning());
        let glyph = fields.glyph(&GlyphKey::Index(0)).unwrap();
        assert_eq!(glyph.current().0, glyph.translation());
    }

    #[test]
    fn test_axes() {
        let mut fields = VectorFields::new();
        assert!(fields.axes(&axis::TickAxis::default()).unwrap().is_none());
        fields.render(&grid()).unwrap();
        let axes = fields.axes(&axis::TickAxis::default()).unwrap().unwrap();
        assert_eq!(axes.children.len(), 4);
    }
}

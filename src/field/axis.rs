//! Axis parameters for the three back planes of a 3D chart and a simple
//! tick-axis renderer that turns them into scene geometry.

use nalgebra::Vector3;

use crate::error;
use crate::scene::SceneNode;
use crate::utils::{format_si, ticks};

use super::color::{color_to_x3d, Rgb};
use super::scale::ContinuousScale;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisName {
    X,
    Y,
    Z,
}

impl AxisName {
    pub fn unit(&self) -> Vector3<f64> {
        match self {
            AxisName::X => Vector3::x(),
            AxisName::Y => Vector3::y(),
            AxisName::Z => Vector3::z(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TickFormat {
    #[default]
    Si,
    /// Ticks are drawn without labels.
    Hidden,
}

/// Everything an axis collaborator needs to draw one axis.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisSpec {
    pub name: String,
    pub scale: ContinuousScale,
    pub direction: AxisName,
    pub tick_direction: AxisName,
    pub tick_size: f64,
    pub tick_padding: f64,
    pub tick_format: TickFormat,
    pub color: Rgb,
}

/// Turns one [`AxisSpec`] into a renderable scene node.
pub trait AxisComponent {
    fn render(&self, spec: &AxisSpec) -> Result<SceneNode, error::Error>;
}

impl<F> AxisComponent for F
where
    F: Fn(&AxisSpec) -> Result<SceneNode, error::Error>,
{
    fn render(&self, spec: &AxisSpec) -> Result<SceneNode, error::Error> {
        self(spec)
    }
}

const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

pub const DEFAULT_TICK_PADDING: f64 = 1.0;

/// The `xz`, `yz`, `yx` and `zx` axes framing a three dimensional plot.
///
/// Tick lines span the perpendicular scale's range so they draw a grid
/// across each back plane.
pub fn three_plane(
    x: &ContinuousScale,
    y: &ContinuousScale,
    z: &ContinuousScale,
) -> [AxisSpec; 4] {
    [
        AxisSpec {
            name: "xzAxis".to_string(),
            scale: x.clone(),
            direction: AxisName::X,
            tick_direction: AxisName::Z,
            tick_size: z.span(),
            tick_padding: x.range[0],
            tick_format: TickFormat::Si,
            color: BLUE,
        },
        AxisSpec {
            name: "yzAxis".to_string(),
            scale: y.clone(),
            direction: AxisName::Y,
            tick_direction: AxisName::Z,
            tick_size: z.span(),
            tick_padding: DEFAULT_TICK_PADDING,
            tick_format: TickFormat::Si,
            color: RED,
        },
        AxisSpec {
            name: "yxAxis".to_string(),
            scale: y.clone(),
            direction: AxisName::Y,
            tick_direction: AxisName::X,
            tick_size: x.span(),
            tick_padding: DEFAULT_TICK_PADDING,
            tick_format: TickFormat::Hidden,
            color: RED,
        },
        AxisSpec {
            name: "zxAxis".to_string(),
            scale: z.clone(),
            direction: AxisName::Z,
            tick_direction: AxisName::X,
            tick_size: x.span(),
            tick_padding: DEFAULT_TICK_PADDING,
            tick_format: TickFormat::Si,
            color: BLACK,
        },
    ]
}

/// Render the three plane axes, each inside a group classed by its name.
pub fn render_axes(
    component: &dyn AxisComponent,
    x: &ContinuousScale,
    y: &ContinuousScale,
    z: &ContinuousScale,
) -> Result<SceneNode, error::Error> {
    let mut group = SceneNode::new("Group").set("class", "x3dAxisThreePlane");
    for spec in three_plane(x, y, z).iter() {
        let layer = SceneNode::new("Group")
            .set("class", &spec.name)
            .add(component.render(spec)?);
        group = group.add(layer);
    }
    Ok(group)
}

fn point_string(points: &[Vector3<f64>]) -> String {
    points
        .iter()
        .map(|p| format!("{} {} {}", p.x, p.y, p.z))
        .collect::<Vec<String>>()
        .join(" ")
}

fn line(from: Vector3<f64>, to: Vector3<f64>, color: Rgb) -> SceneNode {
    SceneNode::new("Shape")
        .add(
            SceneNode::new("Appearance")
                .add(SceneNode::new("Material").set("emissiveColor", color_to_x3d(color))),
        )
        .add(
            SceneNode::new("LineSet")
                .set("vertexCount", 2)
                .add(SceneNode::new("Coordinate").set("point", point_string(&[from, to]))),
        )
}

/// Axis line, one grid line per tick and optional billboarded labels.
#[derive(Clone, Debug, PartialEq)]
pub struct TickAxis {
    pub tick_count: usize,
    pub font_size: f64,
}

impl Default for TickAxis {
    fn default() -> TickAxis {
        TickAxis {
            tick_count: 10,
            font_size: 1.0,
        }
    }
}

impl AxisComponent for TickAxis {
    fn render(&self, spec: &AxisSpec) -> Result<SceneNode, error::Error> {
        let direction = spec.direction.unit();
        let tick_direction = spec.tick_direction.unit();
        let mut group = SceneNode::new("Group").add(line(
            direction * spec.scale.range[0],
            direction * spec.scale.range[1],
            spec.color,
        ));
        for value in ticks(&spec.scale.domain, self.tick_count).iter() {
            let position = direction * spec.scale.try_apply(*value)?;
            let mut tick = SceneNode::new("Group")
                .set("class", "tick")
                .add(line(
                    position,
                    position + tick_direction * spec.tick_size,
                    spec.color,
                ));
            if spec.tick_format == TickFormat::Si {
                let anchor = position - tick_direction * spec.tick_padding;
                tick = tick.add(
                    SceneNode::new("Transform")
                        .set("translation", point_string(&[anchor]))
                        .add(
                            SceneNode::new("Billboard").add(
                                SceneNode::new("Shape").add(
                                    SceneNode::new("Text")
                                        .set("string", format!("\"{}\"", format_si(value, 3)))
                                        .add(
                                            SceneNode::new("FontStyle")
                                                .set("size", self.font_size)
                                                .set("justify", "\"MIDDLE\" \"MIDDLE\""),
                                        ),
                                ),
                            ),
                        ),
                );
            }
            group = group.add(tick);
        }
        Ok(group)
    }
}

//! Shared visualization utilities for the layout viewers.

use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use layout_bsp::{
    DivisionConfig, FixedSeed, GenerationConfig, PartitionError, Rect, RectGraph, RegionId,
    boundary_intersection,
};
use macroquad::prelude::{
    Color, DARKGRAY, Vec2, draw_circle, draw_line, draw_rectangle, draw_rectangle_lines,
    screen_height, screen_width, vec2,
};
use nalgebra::{Point2, Vector2};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod navigator;
pub use navigator::TreeNavigator;

/// Errors raised while loading a viewer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] PartitionError),
}

/// Random removal of finished regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullConfig {
    /// Maximum number of regions removed per pass, unbounded when `None`.
    pub max_culled: Option<usize>,
    /// Chance in `0.0..=1.0` that a removal is attempted for each region.
    pub chance: f64,
}

impl Default for CullConfig {
    fn default() -> Self {
        Self {
            max_culled: None,
            chance: 0.1,
        }
    }
}

/// Everything a viewer needs to lay out a scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: i32,
    pub height: i32,
    /// Inset of each drawn tile, in layout units.
    pub padding: f32,
    pub generation: GenerationConfig,
    pub division: DivisionConfig,
    pub cull: CullConfig,
    pub seed: FixedSeed,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 48,
            padding: 0.1,
            generation: GenerationConfig::default().with_min_size(4, 4),
            division: DivisionConfig::default().with_depth(1, 6),
            cull: CullConfig::default(),
            seed: FixedSeed::new(42),
        }
    }
}

impl LayoutConfig {
    /// Reads a JSON config. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file named by the first CLI argument, or the defaults.
    pub fn from_args() -> Result<Self, ConfigError> {
        match std::env::args().nth(1) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), PartitionError> {
        self.bounds()?;
        self.generation.validate()?;
        self.division.validate()
    }

    /// The rectangle being partitioned, anchored at the origin.
    pub fn bounds(&self) -> Result<Rect, PartitionError> {
        Rect::from_origin_size(Point2::origin(), Vector2::new(self.width, self.height))
    }
}

/// The shared boundary of two neighbouring regions and the points used to
/// draw an elbow line between their centres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub a: RegionId,
    pub b: RegionId,
    /// Endpoints of the shared boundary segment.
    pub boundary: (Point2<i32>, Point2<i32>),
    pub projection_a: Point2<f32>,
    pub projection_b: Point2<f32>,
}

impl Connector {
    /// Builds the connector between `a` and `b`, or `None` if either region
    /// is missing from `graph`.
    pub fn new<T>(graph: &RectGraph<T>, a: RegionId, b: RegionId) -> Option<Self> {
        let rect_a = graph.get(a)?.rect();
        let rect_b = graph.get(b)?.rect();
        let boundary = boundary_intersection(rect_a, rect_b);
        Some(Self {
            a,
            b,
            boundary,
            projection_a: projection_point(rect_a.center(), boundary),
            projection_b: projection_point(rect_b.center(), boundary),
        })
    }

    /// Centre of the shared boundary.
    pub fn midpoint(&self) -> Point2<f32> {
        let (start, end) = self.boundary;
        Point2::new(
            (start.x + end.x) as f32 * 0.5,
            (start.y + end.y) as f32 * 0.5,
        )
    }
}

/// Moves `center` in line with the middle of an axis-aligned `segment`.
///
/// For a vertical segment the result keeps the centre's `x` and takes the
/// segment's middle `y`; for a horizontal one the other way round.
pub fn projection_point(center: Point2<f32>, segment: (Point2<i32>, Point2<i32>)) -> Point2<f32> {
    let (start, end) = segment;
    if start.x == end.x {
        let mid = start.y as f32 + (end.y - start.y) as f32 * 0.5;
        Point2::new(center.x, mid)
    } else {
        let mid = start.x as f32 + (end.x - start.x) as f32 * 0.5;
        Point2::new(mid, center.y)
    }
}

/// One connector per edge of `graph`.
pub fn build_connectors<T>(graph: &RectGraph<T>) -> Vec<Connector> {
    graph
        .edges()
        .into_iter()
        .filter_map(|(a, b)| Connector::new(graph, a, b))
        .collect()
}

/// Randomly removes regions from `graph`, disconnecting them first.
///
/// Each region gets one draw against `config.chance`; a hit removes a random
/// surviving region. Returns the rectangles of the removed regions.
pub fn cull_regions<T, R>(graph: &mut RectGraph<T>, config: &CullConfig, rng: &mut R) -> Vec<Rect>
where
    R: Rng,
{
    let chance = config.chance.clamp(0.0, 1.0);
    let attempts = graph.len();
    let mut culled = Vec::new();

    for _ in 0..attempts {
        if config.max_culled.is_some_and(|max| culled.len() >= max) || graph.is_empty() {
            break;
        }
        if !rng.random_bool(chance) {
            continue;
        }
        let ids: Vec<RegionId> = graph.ids().collect();
        let victim = ids[rng.random_range(0..ids.len())];
        if let Ok(node) = graph.remove(victim) {
            culled.push(*node.rect());
        }
    }

    debug!(culled = culled.len(), remaining = graph.len(), "culled regions");
    culled
}

/// Removes every region lying inside one of the `culled` rectangles.
///
/// A graph rebuilt from a partition tree brings culled leaves back, possibly
/// split further; this drops them again. Returns the number removed.
pub fn remove_covered<T>(graph: &mut RectGraph<T>, culled: &[Rect]) -> usize {
    let covered: Vec<RegionId> = graph
        .iter()
        .filter(|(_, node)| culled.iter().any(|outer| covers(outer, node.rect())))
        .map(|(id, _)| id)
        .collect();

    let removed = covered
        .into_iter()
        .filter(|&id| graph.remove(id).is_ok())
        .count();
    debug!(removed, remaining = graph.len(), "re-applied cull");
    removed
}

fn covers(outer: &Rect, inner: &Rect) -> bool {
    let (outer_min, outer_max) = (outer.min(), outer.max());
    let (inner_min, inner_max) = (inner.min(), inner.max());
    outer_min.x <= inner_min.x
        && outer_min.y <= inner_min.y
        && inner_max.x <= outer_max.x
        && inner_max.y <= outer_max.y
}

/// Generates a deterministic color from a rectangle using hashing, so a
/// region keeps its color across frames.
pub fn region_color(rect: &Rect) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    rect.hash(&mut hasher);
    let hash = hasher.finish();

    let r = ((hash >> 16) & 0xFF) as u8;
    let g = ((hash >> 8) & 0xFF) as u8;
    let b = (hash & 0xFF) as u8;

    Color::from_rgba(r.max(40), g.max(40), b.max(40), 255)
}

/// Maps layout coordinates onto the screen, fitting `bounds` into the window
/// below a header of `top` pixels.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    origin: Vec2,
    scale: f32,
    offset: Vec2,
}

impl Viewport {
    pub fn fit(bounds: &Rect, top: f32, margin: f32) -> Self {
        Self::fit_to(bounds, vec2(screen_width(), screen_height()), top, margin)
    }

    pub fn fit_to(bounds: &Rect, screen: Vec2, top: f32, margin: f32) -> Self {
        let available = vec2(screen.x - 2.0 * margin, screen.y - top - 2.0 * margin);
        let scale = (available.x / bounds.width() as f32)
            .min(available.y / bounds.height() as f32)
            .max(0.01);
        Self {
            origin: vec2(bounds.x() as f32, bounds.y() as f32),
            scale,
            offset: vec2(margin, top + margin),
        }
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn to_screen(&self, point: Point2<f32>) -> Vec2 {
        self.offset + (vec2(point.x, point.y) - self.origin) * self.scale
    }

    pub fn to_layout(&self, screen: Vec2) -> Point2<f32> {
        let p = (screen - self.offset) / self.scale + self.origin;
        Point2::new(p.x, p.y)
    }

    /// Finds the region under a screen position.
    pub fn pick<T>(&self, graph: &RectGraph<T>, screen: Vec2) -> Option<RegionId> {
        let p = self.to_layout(screen);
        graph.iter().find_map(|(id, node)| {
            let (min, max) = (node.rect().min(), node.rect().max());
            let inside = p.x >= min.x as f32
                && p.x < max.x as f32
                && p.y >= min.y as f32
                && p.y < max.y as f32;
            inside.then_some(id)
        })
    }
}

/// Draws a filled region inset by `padding` layout units.
pub fn draw_region(viewport: &Viewport, rect: &Rect, padding: f32) {
    let min = rect.min();
    let corner = Point2::new(min.x as f32 + padding, min.y as f32 + padding);
    let top_left = viewport.to_screen(corner);
    let w = (rect.width() as f32 - 2.0 * padding).max(0.0) * viewport.scale();
    let h = (rect.height() as f32 - 2.0 * padding).max(0.0) * viewport.scale();
    draw_rectangle(top_left.x, top_left.y, w, h, region_color(rect));
}

/// Draws a rectangle outline.
pub fn draw_outline(viewport: &Viewport, rect: &Rect, thickness: f32, color: Color) {
    let min = rect.min();
    let top_left = viewport.to_screen(Point2::new(min.x as f32, min.y as f32));
    draw_rectangle_lines(
        top_left.x,
        top_left.y,
        rect.width() as f32 * viewport.scale(),
        rect.height() as f32 * viewport.scale(),
        thickness,
        color,
    );
}

/// Draws every region of a graph.
pub fn draw_graph<T>(viewport: &Viewport, graph: &RectGraph<T>, padding: f32) {
    for (_, node) in graph.iter() {
        draw_region(viewport, node.rect(), padding);
    }
}

/// Draws a connector as an elbow line: centre, projection, projection, centre.
pub fn draw_connector<T>(
    viewport: &Viewport,
    graph: &RectGraph<T>,
    connector: &Connector,
    color: Color,
) {
    let (Some(a), Some(b)) = (graph.get(connector.a), graph.get(connector.b)) else {
        return;
    };
    let points = [
        a.rect().center(),
        connector.projection_a,
        connector.projection_b,
        b.rect().center(),
    ];
    for pair in points.windows(2) {
        let from = viewport.to_screen(pair[0]);
        let to = viewport.to_screen(pair[1]);
        draw_line(from.x, from.y, to.x, to.y, 2.0, color);
    }
    let mid = viewport.to_screen(connector.midpoint());
    draw_circle(mid.x, mid.y, 3.0, DARKGRAY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_bsp::{Axis, PartitionTree};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect::new(x, y, w, h).unwrap()
    }

    fn side_by_side() -> (RectGraph<()>, RegionId, RegionId) {
        let mut graph = RectGraph::new();
        let a = graph.insert(rect(0, 0, 4, 4), ());
        let b = graph.insert(rect(4, 1, 2, 6), ());
        graph.connect(a, b).unwrap();
        (graph, a, b)
    }

    #[test]
    fn connector_on_vertical_boundary() {
        let (graph, a, b) = side_by_side();
        let connector = Connector::new(&graph, a, b).unwrap();
        assert_eq!(connector.boundary, (Point2::new(4, 1), Point2::new(4, 4)));
        assert_eq!(connector.projection_a, Point2::new(2.0, 2.5));
        assert_eq!(connector.projection_b, Point2::new(5.0, 2.5));
        assert_eq!(connector.midpoint(), Point2::new(4.0, 2.5));
    }

    #[test]
    fn projection_on_horizontal_boundary() {
        let segment = (Point2::new(2, 5), Point2::new(6, 5));
        assert_eq!(
            projection_point(Point2::new(1.0, 9.0), segment),
            Point2::new(4.0, 9.0)
        );
    }

    #[test]
    fn one_connector_per_edge() {
        let graph = layout_bsp::divide_rectangle(
            rect(0, 0, 16, 16),
            &DivisionConfig::<()>::default().with_depth(1, 4),
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();
        let connectors = build_connectors(&graph);
        assert_eq!(connectors.len(), graph.edge_count());
        for c in &connectors {
            assert!(graph.get(c.a).unwrap().is_neighbour(c.b));
        }
    }

    #[test]
    fn cull_respects_limit_and_keeps_symmetry() {
        let mut graph = RectGraph::new();
        let ids: Vec<_> = (0..10).map(|i| graph.insert(rect(i, 0, 1, 1), ())).collect();
        for pair in ids.windows(2) {
            graph.connect(pair[0], pair[1]).unwrap();
        }
        let config = CullConfig {
            max_culled: Some(3),
            chance: 1.0,
        };
        let culled = cull_regions(&mut graph, &config, &mut StdRng::seed_from_u64(9));
        assert_eq!(culled.len(), 3);
        assert_eq!(graph.len(), 7);
        assert!(graph.is_symmetric());
        for gone in &culled {
            assert!(graph.iter().all(|(_, node)| node.rect() != gone));
        }
    }

    #[test]
    fn culled_leaf_stays_gone_after_it_splits() {
        let mut tree = PartitionTree::new(rect(0, 0, 8, 8), Axis::Horizontal);
        let (left, _) = tree.split(tree.root(), Axis::Vertical, 4).unwrap();
        let culled = vec![rect(0, 0, 4, 8)];

        tree.split(left, Axis::Horizontal, 2).unwrap();
        let mut graph = tree.adjacency(|_| ()).unwrap();
        assert_eq!(graph.len(), 3);

        assert_eq!(remove_covered(&mut graph, &culled), 2);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_symmetric());
        let (_, survivor) = graph.iter().next().unwrap();
        assert_eq!(*survivor.rect(), rect(4, 0, 4, 8));
    }

    #[test]
    fn remove_covered_keeps_partially_overlapping_regions() {
        let (mut graph, _, b) = side_by_side();
        assert_eq!(remove_covered(&mut graph, &[rect(0, 0, 5, 5)]), 1);
        assert!(graph.contains(b));
        assert!(graph.get(b).unwrap().neighbours().is_empty());
    }

    #[test]
    fn zero_chance_culls_nothing() {
        let (mut graph, _, _) = side_by_side();
        let config = CullConfig {
            max_culled: None,
            chance: 0.0,
        };
        assert_eq!(cull_regions(&mut graph, &config, &mut StdRng::seed_from_u64(1)), 0);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn config_from_partial_json() {
        let config = LayoutConfig::from_json(
            r#"{ "width": 100, "generation": { "min_width": 3, "max_depth": 5 }, "seed": { "enabled": true, "seed": 7 } }"#,
        )
        .unwrap();
        assert_eq!(config.width, 100);
        assert_eq!(config.height, 48);
        assert_eq!(config.generation.min_width, 3);
        assert_eq!(config.generation.min_height, 1);
        assert_eq!(config.generation.max_depth, Some(5));
        assert_eq!(config.seed.seed, 7);
        assert_eq!(config.bounds().unwrap(), rect(0, 0, 100, 48));
    }

    #[test]
    fn config_rejects_bad_values() {
        assert!(matches!(
            LayoutConfig::from_json(r#"{ "width": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            LayoutConfig::from_json(r#"{ "division": { "min_depth": 4, "max_depth": 2 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            LayoutConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn config_accepts_partial_seed() {
        let config = LayoutConfig::from_json(r#"{ "seed": { "enabled": true } }"#).unwrap();
        assert!(config.seed.enabled);
        assert_eq!(config.seed.seed, 0);

        let config = LayoutConfig::from_json(r#"{ "seed": { "seed": 11 } }"#).unwrap();
        assert!(!config.seed.enabled);
        assert_eq!(config.seed.seed, 11);
    }

    #[test]
    fn viewport_round_trips_points() {
        let viewport = Viewport::fit_to(&rect(0, 0, 10, 5), vec2(220.0, 140.0), 20.0, 10.0);
        assert_eq!(viewport.scale(), 20.0);
        let screen = viewport.to_screen(Point2::new(2.0, 3.0));
        assert_eq!(screen, vec2(50.0, 90.0));
        assert_eq!(viewport.to_layout(screen), Point2::new(2.0, 3.0));
    }

    #[test]
    fn viewport_picks_region() {
        let (graph, a, b) = side_by_side();
        let viewport = Viewport::fit_to(&rect(0, 0, 6, 7), vec2(60.0, 70.0), 0.0, 0.0);
        assert_eq!(viewport.pick(&graph, vec2(15.0, 15.0)), Some(a));
        assert_eq!(viewport.pick(&graph, vec2(45.0, 65.0)), Some(b));
        assert_eq!(viewport.pick(&graph, vec2(15.0, 65.0)), None);
    }
}

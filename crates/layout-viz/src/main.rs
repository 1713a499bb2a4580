use layout_bsp::{PartitionTree, Rect, RectGraph};
use layout_viz::{
    Connector, LayoutConfig, TreeNavigator, Viewport, build_connectors, cull_regions,
    draw_connector, draw_graph, remove_covered,
};
use macroquad::prelude::*;
use ::rand::{Rng, SeedableRng};
use ::rand::rngs::StdRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Partition tree grown one depth level per key press.
struct Scene {
    config: LayoutConfig,
    bounds: Rect,
    tree: PartitionTree,
    graph: RectGraph<()>,
    connectors: Vec<Connector>,
    /// Rectangles removed by culling; regions inside them stay hidden as the
    /// tree grows.
    culled: Vec<Rect>,
    depth: usize,
}

impl Scene {
    fn new(mut config: LayoutConfig) -> layout_bsp::Result<Self> {
        let bounds = config.bounds()?;
        config.seed.reset();
        let mut rng = config.seed.apply();
        let root_only = config.generation.clone().with_max_depth(0);
        let tree = PartitionTree::generate_random(bounds, &root_only, &mut rng)?;
        config.seed.restore(rng);

        let mut scene = Self {
            config,
            bounds,
            tree,
            graph: RectGraph::new(),
            connectors: Vec::new(),
            culled: Vec::new(),
            depth: 0,
        };
        scene.rebuild_graph()?;
        Ok(scene)
    }

    /// Lets the engine split one level deeper, resuming the seeded stream.
    fn grow(&mut self) -> layout_bsp::Result<()> {
        if self
            .config
            .generation
            .max_depth
            .is_some_and(|max| self.depth >= max)
        {
            info!(depth = self.depth, "depth budget reached");
            return Ok(());
        }
        self.depth += 1;

        let step = self.config.generation.clone().with_max_depth(self.depth);
        let mut rng = self.config.seed.apply();
        let report = self.tree.generate(&step, &mut rng)?;
        self.config.seed.restore(rng);

        info!(
            depth = self.depth,
            splits = report.splits,
            terminated = report.terminated,
            nodes = self.tree.node_count(),
            "grew partition"
        );
        self.rebuild_graph()
    }

    fn cull(&mut self) {
        let mut rng = self.config.seed.apply();
        let culled = cull_regions(&mut self.graph, &self.config.cull, &mut rng);
        self.config.seed.restore(rng);
        self.connectors = build_connectors(&self.graph);
        info!(
            culled = culled.len(),
            remaining = self.graph.len(),
            "culled regions"
        );
        self.culled.extend(culled);
    }

    fn rebuild_graph(&mut self) -> layout_bsp::Result<()> {
        self.graph = self.tree.adjacency(|_| ())?;
        remove_covered(&mut self.graph, &self.culled);
        self.connectors = build_connectors(&self.graph);
        Ok(())
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[macroquad::main("Layout BSP")]
async fn main() {
    init_logging();

    let config = match LayoutConfig::from_args() {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            return;
        }
    };
    let mut scene = match Scene::new(config) {
        Ok(scene) => scene,
        Err(err) => {
            error!("{err}");
            return;
        }
    };
    info!(bounds = %scene.bounds, "scene ready");

    let mut navigator = TreeNavigator::new();
    let mut show_connectors = true;

    loop {
        if is_key_pressed(KeyCode::Space) {
            if let Err(err) = scene.grow() {
                error!("{err}");
            }
        }
        if is_key_pressed(KeyCode::X) {
            scene.cull();
        }
        if is_key_pressed(KeyCode::C) {
            show_connectors = !show_connectors;
        }
        if is_key_pressed(KeyCode::R) {
            let fresh = if is_key_down(KeyCode::LeftShift) {
                // New stream from OS entropy.
                let mut config = scene.config.clone();
                config.seed.seed = StdRng::from_os_rng().random();
                Scene::new(config)
            } else {
                Scene::new(scene.config.clone())
            };
            match fresh {
                Ok(fresh) => {
                    scene = fresh;
                    navigator.go_root();
                }
                Err(err) => error!("{err}"),
            }
        }
        navigator.update(&scene.tree);

        clear_background(Color::from_rgba(20, 20, 30, 255));

        let viewport = Viewport::fit(&scene.bounds, 140.0, 10.0);
        draw_graph(&viewport, &scene.graph, scene.config.padding);
        if show_connectors {
            for connector in &scene.connectors {
                draw_connector(&viewport, &scene.graph, connector, WHITE);
            }
        }
        navigator.render(&scene.tree, &viewport);

        draw_text(
            &format!(
                "Layout BSP - depth {} | {} regions | {} nodes (tree depth {})",
                scene.depth,
                scene.graph.len(),
                scene.tree.node_count(),
                scene.tree.max_depth()
            ),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!(
                "Frontier: {} | Edges: {}",
                scene.tree.frontier().len(),
                scene.graph.edge_count()
            ),
            10.0,
            45.0,
            18.0,
            GRAY,
        );
        navigator.draw_ui(&scene.tree, 70.0);
        draw_text(
            "[Space] grow | [X] cull | [C] connectors | [R] reset, [Shift+R] reseed",
            10.0,
            135.0,
            16.0,
            DARKGRAY,
        );

        next_frame().await
    }
}

use layout_bsp::{RectGraph, divide_rectangle, divide_region};
use layout_viz::{
    LayoutConfig, Viewport, build_connectors, cull_regions, draw_connector, draw_graph,
    draw_outline,
};
use macroquad::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn divide_all(config: &mut LayoutConfig) -> layout_bsp::Result<RectGraph<()>> {
    let bounds = config.bounds()?;
    let mut rng = config.seed.apply();
    let graph = divide_rectangle(bounds, &config.division, &mut rng)?;
    config.seed.restore(rng);
    info!(regions = graph.len(), edges = graph.edge_count(), "divided layout");
    Ok(graph)
}

#[macroquad::main("Layout Division")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = match LayoutConfig::from_args() {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            return;
        }
    };
    let bounds = match config.bounds() {
        Ok(bounds) => bounds,
        Err(err) => {
            error!("{err}");
            return;
        }
    };
    let mut graph = match divide_all(&mut config) {
        Ok(graph) => graph,
        Err(err) => {
            error!("{err}");
            return;
        }
    };
    let mut connectors = build_connectors(&graph);
    let mut show_connectors = true;

    loop {
        let viewport = Viewport::fit(&bounds, 80.0, 10.0);
        let hovered = viewport.pick(&graph, mouse_position().into());

        if is_key_pressed(KeyCode::Space) {
            match divide_all(&mut config) {
                Ok(fresh) => graph = fresh,
                Err(err) => error!("{err}"),
            }
            connectors = build_connectors(&graph);
        }
        if is_mouse_button_pressed(MouseButton::Left) {
            if let Some(id) = hovered {
                let mut rng = config.seed.apply();
                match divide_region(&mut graph, id, &config.division, &mut rng) {
                    Ok(leaves) => info!(region = %id, leaves = leaves.len(), "divided region"),
                    Err(err) => error!("{err}"),
                }
                config.seed.restore(rng);
                connectors = build_connectors(&graph);
            }
        }
        if is_key_pressed(KeyCode::X) {
            let mut rng = config.seed.apply();
            cull_regions(&mut graph, &config.cull, &mut rng);
            config.seed.restore(rng);
            connectors = build_connectors(&graph);
        }
        if is_key_pressed(KeyCode::C) {
            show_connectors = !show_connectors;
        }
        if is_key_pressed(KeyCode::R) {
            config.seed.reset();
            match divide_all(&mut config) {
                Ok(fresh) => graph = fresh,
                Err(err) => error!("{err}"),
            }
            connectors = build_connectors(&graph);
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));

        draw_graph(&viewport, &graph, config.padding);
        if show_connectors {
            for connector in &connectors {
                draw_connector(&viewport, &graph, connector, WHITE);
            }
        }
        if let Some(node) = hovered.and_then(|id| graph.get(id)) {
            draw_outline(&viewport, node.rect(), 2.0, YELLOW);
            draw_text(
                &format!("{} | {} neighbours", node.rect(), node.degree()),
                10.0,
                65.0,
                16.0,
                YELLOW,
            );
        }

        draw_text(
            &format!(
                "Layout Division - {} regions | {} edges",
                graph.len(),
                graph.edge_count()
            ),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            "[Space] divide again | [Click] divide region | [X] cull | [C] connectors | [R] reset seed",
            10.0,
            45.0,
            16.0,
            DARKGRAY,
        );

        next_frame().await
    }
}

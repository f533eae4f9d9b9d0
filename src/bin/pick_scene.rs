//! Picking demo
//!
//! Builds a grid of triangle meshes, picks at a frame position and prints
//! the resolved hits nearest first.
//!
//! Usage:
//!     pick_scene [OPTIONS] [U V]
//!
//! U and V are frame fractions from the top-left corner.
//!
//! Options:
//!     -c, --config <FILE>          Selection config JSON (default: built-in defaults)
//!     -g, --granularity <KIND>     vertex, edge or face (overrides the config)
//!     -n, --grid <N>               Meshes per grid side (default: 4)
//!     --save-config <FILE>         Write the effective config and exit
//!     -h, --help                   Show this help message

use std::env;
use std::path::PathBuf;

use glam::{Mat4, Vec3};

use scenecore::core::SelectionConfig;
use scenecore::geometry::{Granularity, Model, VertexGroup};
use scenecore::render::select;
use scenecore::scene::{Node, SceneGraph, Transform};

fn print_help() {
    eprintln!("pick_scene - Picking demo");
    eprintln!();
    eprintln!("Usage: pick_scene [OPTIONS] [U V]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    -c, --config <FILE>          Selection config JSON");
    eprintln!("    -g, --granularity <KIND>     vertex, edge or face");
    eprintln!("    -n, --grid <N>               Meshes per grid side (default: 4)");
    eprintln!("    --save-config <FILE>         Write the effective config and exit");
    eprintln!("    -h, --help                   Show this help message");
    eprintln!();
    eprintln!("Example:");
    eprintln!("    pick_scene 0.5 0.5");
    eprintln!("    pick_scene -g vertex -n 8 0.1 0.9");
}

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    granularity: Option<Granularity>,
    grid: u32,
    save_config: Option<PathBuf>,
    at: Option<(f32, f32)>,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut config = None;
    let mut granularity = None;
    let mut grid = 4;
    let mut save_config = None;
    let mut coords = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-c" | "--config" => {
                i += 1;
                let path = args.get(i).ok_or("Missing value for --config")?;
                config = Some(PathBuf::from(path));
            }
            "-g" | "--granularity" => {
                i += 1;
                let kind = args.get(i).ok_or("Missing value for --granularity")?;
                granularity = Some(match kind.to_lowercase().as_str() {
                    "vertex" => Granularity::Vertex,
                    "edge" => Granularity::Edge,
                    "face" => Granularity::Face,
                    other => return Err(format!("Unknown granularity: {}. Valid: vertex, edge, face", other)),
                });
            }
            "-n" | "--grid" => {
                i += 1;
                let n = args.get(i).ok_or("Missing value for --grid")?;
                grid = n.parse().map_err(|_| format!("Invalid grid size: {}", n))?;
            }
            "--save-config" => {
                i += 1;
                let path = args.get(i).ok_or("Missing value for --save-config")?;
                save_config = Some(PathBuf::from(path));
            }
            arg if arg.starts_with('-') && arg.parse::<f32>().is_err() => {
                return Err(format!("Unknown option: {}", arg));
            }
            value => {
                coords.push(value.parse::<f32>().map_err(|_| format!("Invalid coordinate: {}", value))?);
            }
        }
        i += 1;
    }

    let at = match coords[..] {
        [] => None,
        [u, v] => Some((u, v)),
        _ => return Err("Expected exactly two coordinates".to_string()),
    };

    Ok(Args {
        config,
        granularity,
        grid,
        save_config,
        at,
    })
}

/// `grid` x `grid` nodes, each a two-triangle quad, spread over [-1, 1].
fn build_scene(grid: u32) -> scenecore::core::Result<SceneGraph> {
    let mut graph = SceneGraph::new();
    let group = Node::new("grid");
    graph.add_subgraph(&group)?;

    let cell = 2.0 / grid.max(1) as f32;
    let half = cell * 0.4;
    for row in 0..grid {
        for col in 0..grid {
            let quad = VertexGroup::from_positions(&[
                Vec3::new(-half, -half, 0.0),
                Vec3::new(half, -half, 0.0),
                Vec3::new(half, half, 0.0),
                Vec3::new(-half, -half, 0.0),
                Vec3::new(half, half, 0.0),
                Vec3::new(-half, half, 0.0),
            ]);
            let name = format!("quad_{}_{}", row, col);
            let node = Node::with_model(name.clone(), Model::new(name).with_group(quad));
            node.set_transformation(Transform::from_position(Vec3::new(
                -1.0 + cell * (col as f32 + 0.5),
                1.0 - cell * (row as f32 + 0.5),
                -((row * grid + col) as f32) * 0.01,
            )));
            graph.add_subgraph_under(&node, &group)?;
        }
    }
    Ok(graph)
}

fn main() {
    scenecore::core::logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    let mut config = match &args.config {
        Some(path) => match SelectionConfig::load_sync(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        },
        None => SelectionConfig::default(),
    };
    if let Some(granularity) = args.granularity {
        config.granularity = granularity;
    }

    if let Some(path) = &args.save_config {
        if let Err(e) = config.save_sync(path) {
            eprintln!("Error saving config: {}", e);
            std::process::exit(1);
        }
        log::info!("Wrote config to {}", path.display());
        return;
    }

    let graph = match build_scene(args.grid) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error building scene: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Scene has {} nodes", graph.node_count());

    // Default to the centre of the top-left mesh.
    let (u, v) = args.at.unwrap_or((0.5 / args.grid.max(1) as f32, 0.5 / args.grid.max(1) as f32));
    let pick = match config.pick_at(u, v) {
        Ok(pick) => pick,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let proj = Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, 0.1, 10.0);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let hits = select(&graph, &pick, proj * view, &config);

    println!("Pick at ({:.3}, {:.3}), {:?} granularity", u, v, config.granularity);
    if hits.is_empty() {
        println!("  no hits");
    }
    for hit in &hits {
        let primitive = match (&hit.primitive, hit.primitive_index) {
            (Some(subset), Some(index)) => format!(
                "primitive {} ({} vertices at offset {:?})",
                index,
                subset.vertex_count(),
                subset.index_within_parent()
            ),
            _ => "whole node".to_string(),
        };
        println!(
            "  {} {:<12} {}  depth {:.4}..{:.4}",
            hit.node.id().map(|id| id.to_string()).unwrap_or_default(),
            hit.node.name(),
            primitive,
            hit.minimum_distance,
            hit.maximum_distance
        );
    }
}

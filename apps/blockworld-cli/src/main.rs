mod config;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use blockworld_common::Camera;
use blockworld_input::parse_script;
use blockworld_interact::Session;
use blockworld_kernel::{VoxelStore, generate};
use blockworld_render::{
    DebugTextRenderer, FrameRenderer, Framebuffer, Projector, Renderer, Viewport,
};
use blockworld_tools::{FrameSampler, StoreInspector};
use clap::{Args, Parser, Subcommand};
use glam::Vec3;
use tracing_subscriber::EnvFilter;

use crate::config::BlockworldConfig;

#[derive(Parser)]
#[command(name = "blockworld", about = "CLI for the blockworld voxel core")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML or JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// World and camera placement shared by the frame-producing commands.
#[derive(Args)]
struct SceneArgs {
    /// RNG seed for tree placement (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,
    /// Half-extent of the generated world, overrides the config
    #[arg(long)]
    size: Option<i32>,
    /// Camera position as x,y,z
    #[arg(long, default_value = "0,10,-20", value_parser = parse_vec3, allow_hyphen_values = true)]
    pos: Vec3,
    /// Camera yaw in radians
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    yaw: f32,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Generate a world and summarise it
    Generate {
        #[arg(long)]
        size: Option<i32>,
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Project one frame and write it as text or PNG
    Render {
        #[command(flatten)]
        scene: SceneArgs,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        /// Write the frame to this PNG file
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Print the draw list
        #[arg(long)]
        text: bool,
    },
    /// Run a scripted session, e.g. "forward,forward,place,break"
    Play {
        #[command(flatten)]
        scene: SceneArgs,
        #[arg(long, default_value = "")]
        script: String,
        /// Write the final frame to this PNG file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Run a script, rebuild the store from its event log and compare
    Replay {
        #[command(flatten)]
        scene: SceneArgs,
        #[arg(long, default_value = "place,forward,place,break")]
        script: String,
    },
    /// Time repeated projection of one frame
    Bench {
        #[command(flatten)]
        scene: SceneArgs,
        #[arg(short, long, default_value = "120")]
        frames: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = BlockworldConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("blockworld v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", blockworld_render::crate_info());
            println!("tools: {}", blockworld_tools::crate_info());
            println!(
                "world: size={} viewport={}x{}",
                config.world.world_size, config.viewport.width, config.viewport.height
            );
        }
        Commands::Generate { size, seed } => {
            if let Some(size) = size {
                config.world.world_size = size;
            }
            let store = VoxelStore::from_blocks(generate(&config.world, seed));
            println!("{}", StoreInspector::summary(&store));
            println!("hash: {:#018x}", store.state_hash());
        }
        Commands::Render {
            scene,
            width,
            height,
            out,
            text,
        } => {
            let viewport = Viewport::new(
                width.unwrap_or(config.viewport.width),
                height.unwrap_or(config.viewport.height),
            );
            anyhow::ensure!(viewport.width > 0 && viewport.height > 0, "viewport must be non-empty");
            let (store, camera) = build_scene(&mut config, &scene);

            let list = Projector::new(config.projection.clone()).project(&store, &camera, viewport);
            let s = &list.stats;
            println!(
                "candidates={} drawn={} culled={} (air={} radius={} behind={} near={} small={} offscreen={})",
                s.candidates,
                s.drawn,
                s.culled(),
                s.air,
                s.out_of_radius,
                s.behind,
                s.near_plane,
                s.too_small,
                s.off_screen
            );
            if text {
                let renderer = DebugTextRenderer::new(config.projection.clone(), viewport);
                print!("{}", renderer.render(&store, &camera));
            }
            if let Some(out) = out {
                let fb = FrameRenderer::new(config.projection.clone(), viewport).render(&store, &camera);
                write_png(&fb, &out)?;
                println!("wrote {}", out.display());
            }
        }
        Commands::Play { scene, script, out } => {
            let actions = parse_script(&script)?;
            let mut session = build_session(&mut config, &scene);

            for action in actions {
                match session.handle(action) {
                    Ok(outcome) => println!("{action}: {outcome}"),
                    Err(err) => println!("{action}: rejected: {err}"),
                }
            }
            println!("mode: {}", session.mode());
            println!("inventory: {}", session.inventory());
            println!("drawn: {}", session.frame().stats.drawn);

            if let Some(out) = out {
                let fb = FrameRenderer::new(config.projection.clone(), session.viewport())
                    .render(session.store(), session.camera());
                write_png(&fb, &out)?;
                println!("wrote {}", out.display());
            }
        }
        Commands::Replay { scene, script } => {
            let actions = parse_script(&script)?;
            let mut session = build_session(&mut config, &scene);
            for action in actions {
                if let Err(err) = session.handle(action) {
                    tracing::warn!(%action, %err, "action rejected");
                }
            }

            let original = session.into_store();
            let replayed = VoxelStore::replay(original.events());
            println!(
                "events={} blocks: original={} replayed={}",
                original.events().len(),
                original.len(),
                replayed.len()
            );
            println!(
                "hash: original={:#018x} replayed={:#018x}",
                original.state_hash(),
                replayed.state_hash()
            );
            println!(
                "Match: {}",
                if original.state_hash() == replayed.state_hash() {
                    "OK"
                } else {
                    "MISMATCH"
                }
            );
        }
        Commands::Bench { scene, frames } => {
            let (store, camera) = build_scene(&mut config, &scene);
            let projector = Projector::new(config.projection.clone());
            let mut sampler = FrameSampler::new(frames);

            for _ in 0..frames {
                let start = Instant::now();
                let list = projector.project(&store, &camera, config.viewport);
                sampler.record(start.elapsed(), list.stats.drawn);
            }
            println!(
                "frames={} blocks={} avg={:?} max={:?} avg_drawn={:.1}",
                sampler.count(),
                store.len(),
                sampler.average_elapsed(),
                sampler.max_elapsed(),
                sampler.average_drawn()
            );
        }
    }

    Ok(())
}

fn build_scene(config: &mut BlockworldConfig, scene: &SceneArgs) -> (VoxelStore, Camera) {
    if let Some(size) = scene.size {
        config.world.world_size = size;
    }
    let store = VoxelStore::from_blocks(generate(&config.world, scene.seed));
    (store, Camera::new(scene.pos, scene.yaw))
}

fn build_session(config: &mut BlockworldConfig, scene: &SceneArgs) -> Session {
    let (store, camera) = build_scene(config, scene);
    Session::new(store, camera)
        .with_input(config.input.clone())
        .with_interaction(config.interaction.clone())
        .with_projection(config.projection.clone(), config.viewport)
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid coordinate in {s:?}: {e}"))?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got {s:?}")),
    }
}

fn write_png(fb: &Framebuffer, path: &Path) -> anyhow::Result<()> {
    let image = image::RgbImage::from_raw(fb.width(), fb.height(), fb.to_rgb8())
        .context("framebuffer size does not match its pixel data")?;
    image
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_vec3_accepts_negatives() {
        assert_eq!(parse_vec3("0, 10,-20"), Ok(Vec3::new(0.0, 10.0, -20.0)));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("a,b,c").is_err());
    }

    #[test]
    fn png_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let fb = Framebuffer::new(8, 6, blockworld_common::Rgb::SKY);
        write_png(&fb, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (8, 6));
        assert_eq!(img.get_pixel(0, 0).0, [0x87, 0xCE, 0xEB]);
    }

    #[test]
    fn cli_parses_render_flags() {
        let cli = Cli::try_parse_from([
            "blockworld", "render", "--seed", "7", "--pos", "-1,6,-3", "--yaw", "-0.5", "--text",
        ])
        .unwrap();
        match cli.command {
            Commands::Render { scene, text, .. } => {
                assert_eq!(scene.seed, Some(7));
                assert_eq!(scene.pos, Vec3::new(-1.0, 6.0, -3.0));
                assert_eq!(scene.yaw, -0.5);
                assert!(text);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn global_flags_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["blockworld", "generate", "--verbose", "--config", "w.yaml"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("w.yaml")));
    }
}

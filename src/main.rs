// SPDX-License-Identifier: GPL-3.0-only

use clap::{Args, Parser, Subcommand};
use rgbd_viewer::backends::Intrinsics;
use rgbd_viewer::geometry::PoseControls;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "rgbd-viewer")]
#[command(about = "View RGB-D frames as a pose-controlled point cloud")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    /// Configuration file (default: per-user config.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Color camera intrinsics in pixels
#[derive(Args, Debug, Clone, Copy)]
struct IntrinsicsArgs {
    /// Focal length X
    #[arg(long)]
    fx: f32,
    /// Focal length Y
    #[arg(long)]
    fy: f32,
    /// Principal point X
    #[arg(long, allow_hyphen_values = true)]
    cx: f32,
    /// Principal point Y
    #[arg(long, allow_hyphen_values = true)]
    cy: f32,
}

impl IntrinsicsArgs {
    fn to_intrinsics(self) -> Result<Intrinsics, rgbd_viewer::errors::ReprojectError> {
        Intrinsics::new(self.fx, self.fy, self.cx, self.cy)
    }
}

/// Viewing pose (degrees and centimeters)
#[derive(Args, Debug, Clone, Copy)]
struct PoseArgs {
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    roll: f32,
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pitch: f32,
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    yaw: f32,
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    tx: f32,
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    ty: f32,
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    tz: f32,
}

impl From<PoseArgs> for PoseControls {
    fn from(args: PoseArgs) -> Self {
        PoseControls {
            roll: args.roll,
            pitch: args.pitch,
            yaw: args.yaw,
            tx: args.tx,
            ty: args.ty,
            tz: args.tz,
        }
        .clamped()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal viewer over a still color/depth pair
    View {
        /// Color image (PNG/JPEG)
        rgb: PathBuf,
        /// 16-bit depth image in millimeters
        depth: PathBuf,
        #[command(flatten)]
        intrinsics: IntrinsicsArgs,
        /// Point cloud written on quit (default: config export_path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive terminal viewer over a directory of captured pairs
    Replay {
        /// Directory holding rgb_<ts>.png / depth_<ts>.png pairs
        dir: PathBuf,
        #[command(flatten)]
        intrinsics: IntrinsicsArgs,
        /// Point cloud written on quit (default: config export_path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Reproject a pair and write a PLY point cloud (no GPU needed)
    Export {
        rgb: PathBuf,
        depth: PathBuf,
        #[command(flatten)]
        intrinsics: IntrinsicsArgs,
        /// Output file (default: config export_path)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write a binary little-endian body instead of text
        #[arg(long)]
        binary: bool,
        /// Leave out pixels without depth
        #[arg(long)]
        skip_invalid: bool,
    },

    /// Render a pair at a fixed pose to a PNG
    Render {
        rgb: PathBuf,
        depth: PathBuf,
        #[command(flatten)]
        intrinsics: IntrinsicsArgs,
        #[command(flatten)]
        pose: PoseArgs,
        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=rgbd_viewer=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = rgbd_viewer::ViewerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::View {
            rgb,
            depth,
            intrinsics,
            output,
        } => cli::view(&rgb, &depth, intrinsics.to_intrinsics()?, config, output)?,
        Commands::Replay {
            dir,
            intrinsics,
            output,
        } => cli::replay(&dir, intrinsics.to_intrinsics()?, config, output)?,
        Commands::Export {
            rgb,
            depth,
            intrinsics,
            output,
            binary,
            skip_invalid,
        } => cli::export(
            &rgb,
            &depth,
            intrinsics.to_intrinsics()?,
            &config,
            output,
            binary,
            skip_invalid,
        )?,
        Commands::Render {
            rgb,
            depth,
            intrinsics,
            pose,
            output,
        } => cli::render(
            &rgb,
            &depth,
            intrinsics.to_intrinsics()?,
            pose.into(),
            config,
            &output,
        )?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_principal_point_parses() {
        let cli = Cli::try_parse_from([
            "rgbd-viewer", "export", "rgb.png", "depth.png", "--fx", "500", "--fy", "500", "--cx",
            "-5", "--cy", "-2.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Export { intrinsics, .. } => {
                assert_eq!(intrinsics.cx, -5.0);
                assert_eq!(intrinsics.cy, -2.5);
            }
            _ => panic!("expected export subcommand"),
        }
    }

    #[test]
    fn test_render_pose_accepts_negative_values() {
        let cli = Cli::try_parse_from([
            "rgbd-viewer", "render", "rgb.png", "depth.png", "--fx", "500", "--fy", "500", "--cx",
            "320", "--cy", "240", "--yaw", "-30", "--tz", "-50", "-o", "out.png",
        ])
        .unwrap();
        match cli.command {
            Commands::Render { pose, .. } => {
                let pose = PoseControls::from(pose);
                assert_eq!(pose.yaw, -30.0);
                assert_eq!(pose.tz, -50.0);
            }
            _ => panic!("expected render subcommand"),
        }
    }
}

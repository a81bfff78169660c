use std::f32::consts::FRAC_PI_4;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use thiserror::Error;

pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (1280, 720);
pub const DEFAULT_SUBDIVISIONS: u32 = 4;
/// Level 7 is already 327,680 triangles.
pub const MAX_SUBDIVISIONS: u32 = 7;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "planet-viewer", version, about = "Textured icosphere planet viewer")]
pub struct Args {
    /// Enable graphics backend validation and debug logging.
    #[arg(short = 'g', long)]
    pub debug_gpu: bool,
    /// Subdivision passes applied to the base icosahedron.
    #[arg(long, default_value_t = DEFAULT_SUBDIVISIONS)]
    pub subdivisions: u32,
    /// Directory holding the earth, moon and star textures.
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,
    /// Present with vsync.
    #[arg(long)]
    pub vsync: bool,
    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("subdivision level {requested} exceeds the maximum of {max}")]
    TooManySubdivisions { requested: u32, max: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub orbit_radius: f32,
    /// Radians per pixel of drag.
    pub sensitivity: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            orbit_radius: 4.0,
            sensitivity: 0.01,
            fov: FRAC_PI_4,
            near: 0.01,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub subdivisions: u32,
    pub assets: PathBuf,
    pub window_size: (u32, u32),
    pub vsync: bool,
    pub debug_gpu: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            subdivisions: DEFAULT_SUBDIVISIONS,
            assets: PathBuf::from("assets/textures"),
            window_size: DEFAULT_WINDOW_SIZE,
            vsync: false,
            debug_gpu: false,
        }
    }
}

impl ViewerConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        if args.subdivisions > MAX_SUBDIVISIONS {
            return Err(ConfigError::TooManySubdivisions {
                requested: args.subdivisions,
                max: MAX_SUBDIVISIONS,
            });
        }

        let mut config = Self {
            subdivisions: args.subdivisions,
            vsync: args.vsync,
            debug_gpu: args.debug_gpu,
            ..Self::default()
        };
        if let Some(assets) = &args.assets {
            config.assets = assets.clone();
        }
        Ok(config)
    }

    pub fn earth_texture(&self) -> PathBuf {
        self.assets.join("earth_color.jpg")
    }

    pub fn moon_texture(&self) -> PathBuf {
        self.assets.join("moon_color.jpg")
    }

    /// Skybox faces in cubemap layer order: +X, -X, +Y, -Y, +Z, -Z.
    pub fn skybox_faces(&self) -> [PathBuf; 6] {
        ["px", "nx", "py", "ny", "pz", "nz"].map(|face| self.assets.join(format!("stars_{face}.jpg")))
    }
}

/// Log filter string: `--log-level`, then `RUST_LOG`, then `info`.
/// `--debug-gpu` adds `wgpu` targets at debug level on top.
pub fn resolve_log_filter(args: &Args) -> String {
    let base = match args.log_level {
        Some(level) => level.as_str().to_string(),
        None => std::env::var("RUST_LOG")
            .ok()
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| "info".to_string()),
    };

    if args.debug_gpu {
        format!("{base},wgpu_core=debug,wgpu_hal=debug")
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("planet-viewer").chain(argv.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults_match_reference_viewer() {
        let config = ViewerConfig::from_args(&parse(&[])).unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.subdivisions, 4);
        assert_eq!(config.camera.orbit_radius, 4.0);
        assert_eq!(config.camera.sensitivity, 0.01);
        assert_eq!(config.camera.fov, FRAC_PI_4);
    }

    #[test]
    fn short_debug_flag_enables_gpu_debugging() {
        let args = parse(&["-g", "--log-level", "warn"]);
        assert!(args.debug_gpu);
        assert_eq!(resolve_log_filter(&args), "warn,wgpu_core=debug,wgpu_hal=debug");
        assert!(ViewerConfig::from_args(&args).unwrap().debug_gpu);
    }

    #[test]
    fn explicit_log_level_wins() {
        let args = parse(&["--log-level", "trace"]);
        assert_eq!(resolve_log_filter(&args), "trace");
    }

    #[test]
    fn rejects_excessive_subdivision() {
        let args = parse(&["--subdivisions", "9"]);
        assert_eq!(
            ViewerConfig::from_args(&args),
            Err(ConfigError::TooManySubdivisions { requested: 9, max: MAX_SUBDIVISIONS })
        );
    }

    #[test]
    fn texture_paths_follow_assets_dir() {
        let config = ViewerConfig::from_args(&parse(&["--assets", "/tmp/tex"])).unwrap();
        assert_eq!(config.earth_texture(), PathBuf::from("/tmp/tex/earth_color.jpg"));
        assert_eq!(config.moon_texture(), PathBuf::from("/tmp/tex/moon_color.jpg"));
        assert_eq!(config.skybox_faces()[3], PathBuf::from("/tmp/tex/stars_ny.jpg"));
    }
}

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// How the block set reaches the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    /// One draw call, instance matrices read from a per-instance vertex buffer
    #[default]
    Instanced,
    /// One `model` uniform write and one draw call per block
    PerBlock,
}

/// Contains configuration options for the renderer like the resolution, vsync, and other settings
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub draw_mode: DrawMode,
    pub max_point_lights: usize,
    pub max_spot_lights: usize,
    pub block_count: usize,
    pub clear_color: [f32; 4],
    /// Overrides the resources directory, see [`ResourcePaths::resolve`]
    pub resources_dir: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "Voxa".to_owned(),
            width: 1920,
            height: 1080,
            vsync: false,
            draw_mode: DrawMode::default(),
            max_point_lights: 4,
            max_spot_lights: 4,
            block_count: 4096,
            clear_color: [0.2, 0.3, 0.3, 1.0],
            resources_dir: None,
        }
    }
}

/// Locations of the shader and texture files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    root: PathBuf,
}

impl ResourcePaths {
    pub const ENV_VAR: &'static str = "VOXA_RESOURCES_DIR";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// First match wins: `VOXA_RESOURCES_DIR`, `config.resources_dir`,
    /// `resources` next to the executable, `./resources`.
    pub fn resolve(config: &RenderConfig) -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let paths = Self::resolve_from(
            std::env::var_os(Self::ENV_VAR),
            config.resources_dir.as_deref(),
            exe_dir.as_deref(),
        );
        log::info!("Loading resources from {}", paths.root.display());
        paths
    }

    fn resolve_from(env: Option<OsString>, configured: Option<&Path>, exe_dir: Option<&Path>) -> Self {
        if let Some(dir) = env.filter(|dir| !dir.is_empty()) {
            return Self::new(dir);
        }
        if let Some(dir) = configured {
            return Self::new(dir);
        }
        match exe_dir.map(|dir| dir.join("resources")) {
            Some(dir) if dir.is_dir() => Self::new(dir),
            _ => Self::new("resources"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn shader(&self, file_name: &str) -> PathBuf {
        self.root.join("shaders").join(file_name)
    }

    pub fn texture(&self, file_name: &str) -> PathBuf {
        self.root.join("textures").join(file_name)
    }
}

use bitflags::bitflags;

bitflags! {
    /// Which parts of a manifest a build turns into scene requests.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct BuildFlags: u32 {
        const BACKGROUND = 1 << 0;
        const ENVIRONMENT = 1 << 1;
        const REFLECTION = 1 << 2;
        const SUN = 1 << 3;
        /// Numbered `[LightN]` sections.
        const LIGHTS = 1 << 4;
        /// Lights sampled from the environment image.
        const ENVIRONMENT_LIGHTS = 1 << 5;
    }
}

impl Default for BuildFlags {
    fn default() -> Self {
        Self::all()
    }
}

bitflags! {
    /// Render contributions an image request should be visible to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct Visibility: u32 {
        const CAMERA = 1 << 0;
        const GLOBAL_ILLUMINATION = 1 << 1;
        const REFLECTIONS = 1 << 2;
    }
}

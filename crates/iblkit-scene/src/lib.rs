//! Scene construction for iblkit.
//!
//! [`IblSceneBuilder`] reads the manifest held by an [`IblSession`] and
//! submits [`SceneRequest`]s to a host-provided [`SceneSink`]. The builder
//! never touches host scene objects itself.

pub mod builder;
pub mod flags;
pub mod scene;
pub mod session;

pub use builder::{BuildReport, IblSceneBuilder, SceneBuilderConfig, SkippedAsset};
pub use flags::{BuildFlags, Visibility};
pub use scene::{ImageRequest, NamedLight, SceneRequest, SceneSink};
pub use session::{FileImageLoader, IblSession, ImageLoader, PersistedState};

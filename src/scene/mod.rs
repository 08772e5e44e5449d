mod catalog;
mod renderer;

pub use catalog::{Catalog, ObjectKind, TrackedObject, DEBRIS_PREFIX};
pub use renderer::{HeadlessScene, SceneRenderer, SharedScene};

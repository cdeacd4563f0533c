//! CPU-side scene for Orbiter: procedural meshes, the Earth and satellite
//! bodies, the camera view state and the per-frame update.
//!
//! Nothing here touches the GPU, so the whole crate is testable headless.

pub mod body;
pub mod camera;
pub mod geometry;
pub mod readout;
pub mod state;
pub mod transform;

pub use body::{BodyPose, Earth, Satellite, rpm_angle_delta, wrap_angle};
pub use camera::{CameraAccumulators, ViewState, ZOOM_MAX, ZOOM_MIN};
pub use geometry::{GeometryError, Mesh, PRIMARY_FACE_INDEX_COUNT, generate_cube, generate_sphere};
pub use readout::{OrbitDirection, OrbitReadout};
pub use state::{SceneParams, SceneState};
pub use transform::{
    BodyTransform, TransformScope, TransformStack, TransformStackError, normal_matrix,
};

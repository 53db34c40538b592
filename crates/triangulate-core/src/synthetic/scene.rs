//! Synthetic multi-view scenes with known ground truth.

use anyhow::{ensure, Result};
use nalgebra::Vector3;

use super::noise::{offset3, UniformPixelNoise};
use crate::{
    CameraMap, FrameId, FxFyCxCySkew, Iso3, Landmark, LandmarkMap, PerspectiveCamera,
    ProjectiveCamera, Pt3, Real, Track, TrackId, TrackSet, TrackState,
};

/// Parameters of a synthetic scene.
#[derive(Debug, Clone)]
pub struct SceneSpec {
    pub num_cameras: usize,
    pub num_points: usize,
    /// Distance of every camera from the world origin.
    pub radius: Real,
    /// Angular span of the camera arc (radians).
    pub arc_rad: Real,
    /// Points are drawn uniformly from `[-extent, extent]³`.
    pub point_extent: Real,
    pub intrinsics: FxFyCxCySkew,
    pub pixel_noise: UniformPixelNoise,
    /// Per-axis magnitude of the error applied to initial guesses.
    pub initial_offset: Real,
    /// Replace every n-th projected state with a failed detection.
    pub drop_every: Option<usize>,
    pub seed: u64,
}

impl Default for SceneSpec {
    fn default() -> Self {
        Self {
            num_cameras: 5,
            num_points: 32,
            radius: 5.0,
            arc_rad: 0.8,
            point_extent: 1.0,
            intrinsics: FxFyCxCySkew {
                fx: 800.0,
                fy: 800.0,
                cx: 640.0,
                cy: 360.0,
                skew: 0.0,
            },
            pixel_noise: UniformPixelNoise::default(),
            initial_offset: 0.25,
            drop_every: None,
            seed: 7,
        }
    }
}

/// A generated scene: the three engine inputs plus the true landmark positions.
#[derive(Debug, Clone)]
pub struct SyntheticScene {
    pub cameras: CameraMap,
    pub tracks: TrackSet,
    /// Initial guesses, one per track.
    pub initial: LandmarkMap,
    pub ground_truth: LandmarkMap,
}

/// World-to-camera pose of a camera at `eye` looking at `target`.
///
/// The camera looks along its +Z axis with +Y pointing down in the image.
pub fn look_at(eye: &Pt3, target: &Pt3) -> Iso3 {
    let up = Vector3::new(0.0, -1.0, 0.0);
    Iso3::face_towards(eye, target, &up).inverse()
}

/// `n` cameras on a horizontal arc of `radius` around the origin, all looking at it.
///
/// Frames are numbered `0..n`.
pub fn arc_cameras(
    n: usize,
    radius: Real,
    arc_rad: Real,
    intrinsics: FxFyCxCySkew,
) -> CameraMap {
    (0..n)
        .map(|i| {
            let t = if n > 1 {
                i as Real / (n - 1) as Real - 0.5
            } else {
                0.0
            };
            let theta = t * arc_rad;
            let eye = Pt3::new(radius * theta.sin(), 0.0, -radius * theta.cos());
            let pose = look_at(&eye, &Pt3::origin());
            (i as FrameId, PerspectiveCamera::pinhole(intrinsics, pose))
        })
        .collect()
}

/// Seeded point cloud inside `[-extent, extent]³`.
pub fn point_cloud(n: usize, extent: Real, seed: u64) -> Vec<Pt3> {
    (0..n as u64)
        .map(|i| Pt3::from(offset3(seed, i, extent)))
        .collect()
}

/// Project each point into every camera, producing one track per point.
///
/// Cameras that cannot see a point contribute a state with no feature, as
/// does every `drop_every`-th visible projection.
pub fn project_tracks(
    cameras: &CameraMap,
    points: &[(TrackId, Pt3)],
    noise: &UniformPixelNoise,
    drop_every: Option<usize>,
) -> TrackSet {
    let mut counter = 0usize;
    points
        .iter()
        .map(|(id, pw)| {
            let mut track = Track::new(*id);
            for (&frame_id, camera) in cameras {
                let state = match camera.project(pw) {
                    Some(px) => {
                        counter += 1;
                        let dropped = drop_every.is_some_and(|k| k > 0 && counter % k == 0);
                        if dropped {
                            TrackState::missing(frame_id)
                        } else {
                            TrackState::new(frame_id, px + noise.sample(frame_id, *id))
                        }
                    }
                    None => TrackState::missing(frame_id),
                };
                track.append(state);
            }
            track
        })
        .collect()
}

/// Build a complete scene from a spec.
pub fn build(spec: &SceneSpec) -> Result<SyntheticScene> {
    ensure!(spec.num_cameras > 0, "need at least one camera");
    ensure!(
        spec.radius > spec.point_extent * 3.0_f64.sqrt(),
        "cameras at radius {} would sit inside the point cloud (extent {})",
        spec.radius,
        spec.point_extent
    );

    let cameras = arc_cameras(spec.num_cameras, spec.radius, spec.arc_rad, spec.intrinsics);
    let points: Vec<(TrackId, Pt3)> = point_cloud(spec.num_points, spec.point_extent, spec.seed)
        .into_iter()
        .enumerate()
        .map(|(i, p)| (i as TrackId, p))
        .collect();

    let tracks = project_tracks(&cameras, &points, &spec.pixel_noise, spec.drop_every);
    let ground_truth = points
        .iter()
        .map(|(id, p)| (*id, Landmark::new(*p)))
        .collect();
    let initial = points
        .iter()
        .map(|(id, p)| {
            let guess = *p + offset3(spec.seed ^ 0xA5A5, *id, spec.initial_offset);
            (*id, Landmark::new(guess))
        })
        .collect();

    Ok(SyntheticScene {
        cameras,
        tracks,
        initial,
        ground_truth,
    })
}

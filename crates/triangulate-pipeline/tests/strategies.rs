use serde_json::json;
use triangulate_core::synthetic::scene::{build, look_at};
use triangulate_core::synthetic::{SceneSpec, SyntheticScene, UniformPixelNoise};
use triangulate_core::{
    CameraMap, FxFyCxCySkew, Iso3, Landmark, LandmarkMap, PerspectiveCamera, ProjectiveCamera,
    Pt2, Pt3, Real, Track, TrackSet, TrackState,
};
use triangulate_linear::LinearTriangulationError;
use triangulate_optim::{LinearPointSolver, PointEstimate, PointSolveError, PointSolver};
use triangulate_pipeline::{
    run_triangulation, ConfigBlock, Configurable, ConfigurableTriangulator, EngineSettings,
    ExecutionMode, MultiViewTriangulator, SceneInput, SkipReason, TriangulateLandmarks,
};

fn scene(noise_px: Real) -> SyntheticScene {
    build(&SceneSpec {
        pixel_noise: UniformPixelNoise {
            seed: 21,
            max_abs_px: noise_px,
        },
        ..SceneSpec::default()
    })
    .unwrap()
}

fn configured(value: serde_json::Value) -> ConfigurableTriangulator {
    let mut algo = ConfigurableTriangulator::default();
    algo.set_configuration(&ConfigBlock::from_json(value).unwrap())
        .unwrap();
    algo
}

fn mean_error(estimates: &LandmarkMap, truth: &LandmarkMap) -> Real {
    let total: Real = estimates
        .iter()
        .map(|(id, lm)| (lm.loc - truth.get(*id).unwrap().loc).norm())
        .sum();
    total / estimates.len() as Real
}

#[test]
fn linear_method_is_exact_without_noise() {
    let s = scene(0.0);
    let out = configured(json!({ "method": "linear" }))
        .triangulate(Some(&s.cameras), Some(&s.tracks), Some(&s.initial))
        .unwrap();

    assert_eq!(out.len(), s.ground_truth.len());
    for (id, lm) in &out {
        let err = (lm.loc - s.ground_truth.get(*id).unwrap().loc).norm();
        assert!(err < 1e-6, "landmark {id} off by {err}");
    }
}

#[test]
fn refinement_beats_initial_guesses_under_noise() {
    let s = scene(1.0);
    let out = MultiViewTriangulator::new()
        .triangulate(Some(&s.cameras), Some(&s.tracks), Some(&s.initial))
        .unwrap();

    assert_eq!(out.len(), s.initial.len());
    let refined = mean_error(&out, &s.ground_truth);
    let initial = mean_error(&s.initial, &s.ground_truth);
    assert!(refined < 0.05, "mean refined error {refined}");
    assert!(refined < initial / 4.0, "refined {refined} vs initial {initial}");
    for lm in out.iter().map(|(_, lm)| lm) {
        let sigma = lm.covar.and_then(|c| c.isotropic_sigma()).unwrap();
        assert!(sigma > 0.0 && sigma < 2.0, "rms error {sigma}");
    }
}

#[test]
fn outlier_cutoff_drops_high_residual_landmarks() {
    let s = scene(2.0);
    let limit = 1.0;
    let outcome = configured(json!({ "max_reprojection_error": limit }))
        .triangulate_with_report(Some(&s.cameras), Some(&s.tracks), Some(&s.initial))
        .unwrap();

    let too_large = outcome
        .report
        .count_where(|r| matches!(r, SkipReason::ResidualTooLarge { .. }));
    assert!(too_large > 0);
    assert_eq!(too_large, outcome.report.num_skipped());
    assert_eq!(outcome.report.triangulated + too_large, s.initial.len());
    for (_, lm) in &outcome.landmarks {
        let sigma = lm.covar.and_then(|c| c.isotropic_sigma()).unwrap();
        assert!(sigma <= limit);
    }
}

#[test]
fn robust_kernel_and_view_threshold_are_honored() {
    let s = scene(0.5);
    let algo = configured(json!({
        "robust_kernel": { "type": "cauchy", "c": 2.0 },
        "min_views": 6,
        "max_iters": 20,
    }));
    let outcome = algo
        .triangulate_with_report(Some(&s.cameras), Some(&s.tracks), Some(&s.initial))
        .unwrap();

    // Five cameras in the default scene.
    assert!(outcome.landmarks.is_empty());
    assert_eq!(
        outcome
            .report
            .count_where(|r| matches!(r, SkipReason::TooFewViews { valid: 5, .. })),
        s.initial.len()
    );
}

/// Linear solver that refuses points with a negative initial x.
struct RefuseLeft;

impl PointSolver for RefuseLeft {
    fn solve<C: ProjectiveCamera>(
        &self,
        cameras: &[&C],
        pixels: &[Pt2],
        initial: &Pt3,
    ) -> Result<PointEstimate, PointSolveError> {
        if initial.x < 0.0 {
            return Err(PointSolveError::Diverged);
        }
        LinearPointSolver.solve(cameras, pixels, initial)
    }
}

#[test]
fn solver_failures_skip_only_the_affected_landmarks() {
    let s = scene(0.0);
    let settings = EngineSettings {
        mode: ExecutionMode::Sequential,
        ..EngineSettings::default()
    };
    let outcome = run_triangulation(&RefuseLeft, &settings, &s.cameras, &s.tracks, &s.initial);

    let refused = s.initial.iter().filter(|(_, lm)| lm.loc.x < 0.0).count();
    assert!(refused > 0 && refused < s.initial.len());
    assert_eq!(outcome.report.num_skipped(), refused);
    assert_eq!(outcome.landmarks.len(), s.initial.len() - refused);
    for (id, reason) in &outcome.report.skipped {
        assert!(s.initial.get(*id).unwrap().loc.x < 0.0);
        assert_eq!(
            reason,
            &SkipReason::SolverFailure {
                message: PointSolveError::Diverged.to_string()
            }
        );
    }
}

#[test]
fn degenerate_two_view_geometry_is_reported_not_rejected() {
    let k = FxFyCxCySkew {
        fx: 600.0,
        fy: 600.0,
        cx: 320.0,
        cy: 240.0,
        skew: 0.0,
    };
    // Both camera centers and the point lie on the z axis.
    let near = PerspectiveCamera::pinhole(k, look_at(&Pt3::new(0.0, 0.0, -3.0), &Pt3::origin()));
    let far = PerspectiveCamera::pinhole(k, look_at(&Pt3::new(0.0, 0.0, -6.0), &Pt3::origin()));
    let cameras: CameraMap = [(0, near), (1, far)].into_iter().collect();
    let center = Pt2::new(320.0, 240.0);
    let track =
        Track::from_states(0, vec![TrackState::new(0, center), TrackState::new(1, center)])
            .unwrap();
    let tracks = TrackSet::new(vec![track]);
    let landmarks: LandmarkMap = [(0, Landmark::new(Pt3::new(0.0, 0.0, 0.5)))]
        .into_iter()
        .collect();

    let out = MultiViewTriangulator::new()
        .triangulate(Some(&cameras), Some(&tracks), Some(&landmarks))
        .unwrap();
    let lm = out.get(0).unwrap();
    assert!(lm.loc.coords.iter().all(|v| v.is_finite()));
    assert!(lm.covar.and_then(|c| c.isotropic_sigma()).is_some());
}

#[test]
fn scene_input_drives_any_algorithm() {
    let s = scene(0.0);
    let input = SceneInput::from(s.clone());
    let json = serde_json::to_string(&input).unwrap();
    let parsed: SceneInput = serde_json::from_str(&json).unwrap();

    let direct = MultiViewTriangulator::new()
        .triangulate_with_report(Some(&s.cameras), Some(&s.tracks), Some(&s.initial))
        .unwrap();
    let via_input = parsed.triangulate_with(&MultiViewTriangulator::new()).unwrap();
    assert_eq!(direct.report.triangulated, s.initial.len());
    assert_eq!(direct, via_input);
}

/// Cameras at x = 0 and x = 1 looking down +z. Landmark 0 sits in front of
/// both; landmark 1 is seen at the principal point in both views, so its
/// rays are parallel.
fn parallel_rig(guess_for_parallel: Pt3) -> (CameraMap, TrackSet, LandmarkMap) {
    let k = FxFyCxCySkew {
        fx: 600.0,
        fy: 600.0,
        cx: 320.0,
        cy: 240.0,
        skew: 0.0,
    };
    let cameras: CameraMap = [0.0, 1.0]
        .into_iter()
        .enumerate()
        .map(|(i, x)| {
            let pose = Iso3::translation(-x, 0.0, 0.0);
            (i as u64, PerspectiveCamera::pinhole(k, pose))
        })
        .collect();

    let visible = Pt3::new(0.5, 0.2, 4.0);
    let seen: Vec<TrackState> = cameras
        .iter()
        .map(|(&frame, cam)| TrackState::new(frame, cam.project(&visible).unwrap()))
        .collect();
    let center = Pt2::new(320.0, 240.0);
    let parallel = vec![TrackState::new(0, center), TrackState::new(1, center)];
    let tracks = TrackSet::new(vec![
        Track::from_states(0, seen).unwrap(),
        Track::from_states(1, parallel).unwrap(),
    ]);

    let landmarks: LandmarkMap = [
        (0, Landmark::new(Pt3::new(0.4, 0.1, 3.5))),
        (1, Landmark::new(guess_for_parallel)),
    ]
    .into_iter()
    .collect();
    (cameras, tracks, landmarks)
}

fn assert_parallel_landmark_skipped(
    algo: &dyn TriangulateLandmarks,
    guess_for_parallel: Pt3,
) {
    let (cameras, tracks, landmarks) = parallel_rig(guess_for_parallel);
    let outcome = algo
        .triangulate_with_report(Some(&cameras), Some(&tracks), Some(&landmarks))
        .unwrap();

    assert!(outcome.landmarks.get(1).is_none());
    assert_eq!(outcome.report.triangulated, 1);
    assert_eq!(
        outcome.report.skipped.get(&1),
        Some(&SkipReason::SolverFailure {
            message: PointSolveError::NoStartingPoint(LinearTriangulationError::PointAtInfinity)
                .to_string()
        })
    );

    let lm = outcome.landmarks.get(0).unwrap();
    assert!((lm.loc - Pt3::new(0.5, 0.2, 4.0)).norm() < 1e-6);
    assert_eq!(lm.observations, 2);
}

#[test]
fn linear_method_skips_parallel_rays_despite_a_finite_guess() {
    let algo = configured(json!({ "method": "linear" }));
    assert_parallel_landmark_skipped(&algo, Pt3::new(7.0, 8.0, 9.0));
}

#[test]
fn refined_method_skips_parallel_rays_without_a_usable_guess() {
    assert_parallel_landmark_skipped(
        &MultiViewTriangulator::new(),
        Pt3::new(Real::NAN, 0.0, 1.0),
    );
}

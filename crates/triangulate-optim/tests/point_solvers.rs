use triangulate_core::synthetic::scene::arc_cameras;
use triangulate_core::synthetic::UniformPixelNoise;
use triangulate_core::{FxFyCxCySkew, Iso3, PerspectiveCamera, ProjectiveCamera, Pt2, Pt3};
use triangulate_linear::LinearTriangulationError;
use triangulate_optim::{
    rms_reprojection_error, LinearPointSolver, PointSolveError, PointSolver, RefinedPointSolver,
    RobustKernel, SolveOptions,
};

fn intrinsics() -> FxFyCxCySkew {
    FxFyCxCySkew {
        fx: 800.0,
        fy: 800.0,
        cx: 640.0,
        cy: 360.0,
        skew: 0.0,
    }
}

fn observe(cams: &[&PerspectiveCamera], p: &Pt3) -> Vec<Pt2> {
    cams.iter().map(|c| c.project(p).unwrap()).collect()
}

#[test]
fn two_exact_views_recover_point() {
    let map = arc_cameras(2, 5.0, 0.8, intrinsics());
    let cams: Vec<&PerspectiveCamera> = map.iter().map(|(_, c)| c).collect();
    let truth = Pt3::new(0.3, -0.2, 0.4);
    let pixels = observe(&cams, &truth);
    let initial = Pt3::new(1.0, 1.0, 1.0);

    let linear = LinearPointSolver.solve(&cams, &pixels, &initial).unwrap();
    let refined = RefinedPointSolver::default()
        .solve(&cams, &pixels, &initial)
        .unwrap();

    for est in [linear, refined] {
        let err = (est.point - truth).norm();
        assert!(err < 1e-6, "point error {err}");
        assert!(est.rms_error < 1e-6, "rms {}", est.rms_error);
    }
    assert_eq!(linear.iterations, 0);
}

#[test]
fn refinement_never_reprojects_worse_than_linear() {
    let map = arc_cameras(6, 5.0, 1.0, intrinsics());
    let cams: Vec<&PerspectiveCamera> = map.iter().map(|(_, c)| c).collect();
    let noise = UniformPixelNoise {
        seed: 11,
        max_abs_px: 2.0,
    };
    let truth = Pt3::new(-0.4, 0.25, 0.1);
    let pixels: Vec<Pt2> = map
        .iter()
        .map(|(&frame, c)| c.project(&truth).unwrap() + noise.sample(frame, 3))
        .collect();

    let linear = LinearPointSolver.solve(&cams, &pixels, &truth).unwrap();
    let refined = RefinedPointSolver::default()
        .solve(&cams, &pixels, &truth)
        .unwrap();

    assert!(linear.rms_error > 0.0);
    assert!(
        refined.rms_error <= linear.rms_error + 1e-9,
        "refined {} vs linear {}",
        refined.rms_error,
        linear.rms_error
    );
    assert!(refined.rms_error < 2.0, "rms {}", refined.rms_error);
    assert!(refined.iterations > 0);
}

#[test]
fn huber_kernel_limits_outlier_influence() {
    let map = arc_cameras(5, 5.0, 1.0, intrinsics());
    let cams: Vec<&PerspectiveCamera> = map.iter().map(|(_, c)| c).collect();
    let truth = Pt3::new(0.1, 0.1, -0.2);
    let mut pixels = observe(&cams, &truth);
    pixels[2].x += 40.0;
    pixels[2].y -= 25.0;

    let plain = RefinedPointSolver::default()
        .solve(&cams, &pixels, &truth)
        .unwrap();
    let huber = RobustKernel::Huber { delta: 1.0 };
    let robust = RefinedPointSolver::new(SolveOptions::default(), huber)
        .solve(&cams, &pixels, &truth)
        .unwrap();

    let err_plain = (plain.point - truth).norm();
    let err_robust = (robust.point - truth).norm();
    assert!(
        err_robust < err_plain,
        "huber {err_robust} should beat plain {err_plain}"
    );
}

#[test]
fn invalid_view_sets_are_rejected() {
    let map = arc_cameras(2, 5.0, 0.8, intrinsics());
    let cams: Vec<&PerspectiveCamera> = map.iter().map(|(_, c)| c).collect();
    let origin = Pt3::origin();
    let pixels = observe(&cams, &origin);

    assert_eq!(
        LinearPointSolver.solve(&cams[..1], &pixels[..1], &origin),
        Err(PointSolveError::NotEnoughViews(1))
    );
    assert_eq!(
        RefinedPointSolver::default().solve(&cams, &pixels[..1], &origin),
        Err(PointSolveError::CountMismatch {
            cameras: 2,
            pixels: 1
        })
    );
}

#[test]
fn rms_error_is_pixel_distance() {
    let map = arc_cameras(2, 5.0, 0.8, intrinsics());
    let cams: Vec<&PerspectiveCamera> = map.iter().map(|(_, c)| c).collect();
    let p = Pt3::new(0.0, 0.2, 0.0);
    let mut pixels = observe(&cams, &p);
    pixels[0].x += 3.0;
    pixels[1].y += 4.0;

    // sqrt((9 + 16) / 2)
    let rms = rms_reprojection_error(&cams, &pixels, &p).unwrap();
    assert!((rms - 12.5_f64.sqrt()).abs() < 1e-9, "rms {rms}");
    assert!(rms_reprojection_error::<PerspectiveCamera>(&[], &[], &p).is_none());
}

/// Two cameras one unit apart along x, both looking down +z.
fn parallel_pair() -> [PerspectiveCamera; 2] {
    [0.0, 1.0].map(|x| PerspectiveCamera::pinhole(intrinsics(), Iso3::translation(-x, 0.0, 0.0)))
}

#[test]
fn parallel_rays_have_no_linear_solution() {
    let pair = parallel_pair();
    let cams: Vec<&PerspectiveCamera> = pair.iter().collect();
    // Principal point in both views: the rays never meet.
    let pixels = vec![Pt2::new(640.0, 360.0); 2];
    let expected = Err(PointSolveError::NoStartingPoint(
        LinearTriangulationError::PointAtInfinity,
    ));

    let guess = Pt3::new(7.0, 8.0, 9.0);
    assert_eq!(LinearPointSolver.solve(&cams, &pixels, &guess), expected);

    let nan = Pt3::new(f64::NAN, 0.0, 1.0);
    assert_eq!(LinearPointSolver.solve(&cams, &pixels, &nan), expected);
    assert_eq!(
        RefinedPointSolver::default().solve(&cams, &pixels, &nan),
        expected
    );
}

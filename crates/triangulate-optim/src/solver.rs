//! Point triangulation solvers.
//!
//! A [`PointSolver`] turns a set of `(camera, pixel)` observations and an
//! initial guess into a world point and its RMS reprojection error in pixels.

use crate::{
    LmBackend, NllsSolverBackend, PointReprojectionProblem, RobustKernel, SolveOptions,
};
use log::debug;
use nalgebra::DVector;
use thiserror::Error;
use triangulate_core::{ProjectiveCamera, Pt2, Pt3, Real};
use triangulate_linear::{triangulate_point_normalized, LinearTriangulationError};

/// Result of triangulating one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointEstimate {
    pub point: Pt3,
    /// RMS reprojection error in pixels over all observations.
    pub rms_error: Real,
    /// Solver evaluations spent; zero for closed-form solvers.
    pub iterations: usize,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PointSolveError {
    #[error("need at least 2 views, got {0}")]
    NotEnoughViews(usize),
    #[error("mismatched number of cameras ({cameras}) and pixels ({pixels})")]
    CountMismatch { cameras: usize, pixels: usize },
    #[error("no usable starting point: {0}")]
    NoStartingPoint(LinearTriangulationError),
    #[error("refinement diverged to a non-finite point")]
    Diverged,
    #[error("point lies on the plane of an observing camera")]
    Unprojectable,
}

/// Multi-view point triangulation.
pub trait PointSolver {
    /// Estimate a world point from `pixels[i]` observed by `cameras[i]`.
    ///
    /// `initial` is the current estimate of the point; iterative solvers may
    /// start from it.
    fn solve<C: ProjectiveCamera>(
        &self,
        cameras: &[&C],
        pixels: &[Pt2],
        initial: &Pt3,
    ) -> Result<PointEstimate, PointSolveError>;
}

/// RMS pixel distance between observations and reprojections of `point`.
///
/// Returns `None` for empty input or when `point` lies on a camera plane.
pub fn rms_reprojection_error<C: ProjectiveCamera>(
    cameras: &[&C],
    pixels: &[Pt2],
    point: &Pt3,
) -> Option<Real> {
    if cameras.is_empty() || cameras.len() != pixels.len() {
        return None;
    }
    let mut sum = 0.0;
    for (cam, obs) in cameras.iter().zip(pixels) {
        let px = cam.reproject(point)?;
        sum += (px - obs).norm_squared();
    }
    let rms = (sum / cameras.len() as Real).sqrt();
    rms.is_finite().then_some(rms)
}

fn check_views(cameras: usize, pixels: usize) -> Result<(), PointSolveError> {
    if cameras != pixels {
        return Err(PointSolveError::CountMismatch { cameras, pixels });
    }
    if cameras < 2 {
        return Err(PointSolveError::NotEnoughViews(cameras));
    }
    Ok(())
}

fn is_finite(p: &Pt3) -> bool {
    p.coords.iter().all(|v| v.is_finite())
}

/// Closed-form DLT in normalized coordinates.
///
/// The initial guess is ignored. A degenerate linear system is an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinearPointSolver;

impl PointSolver for LinearPointSolver {
    fn solve<C: ProjectiveCamera>(
        &self,
        cameras: &[&C],
        pixels: &[Pt2],
        _initial: &Pt3,
    ) -> Result<PointEstimate, PointSolveError> {
        check_views(cameras.len(), pixels.len())?;

        let point = triangulate_point_normalized(cameras, pixels)
            .map_err(PointSolveError::NoStartingPoint)?;

        let rms_error = rms_reprojection_error(cameras, pixels, &point)
            .ok_or(PointSolveError::Unprojectable)?;
        Ok(PointEstimate {
            point,
            rms_error,
            iterations: 0,
        })
    }
}

/// DLT or initial guess, whichever reprojects better, refined by minimizing
/// the (optionally robust) reprojection error.
#[derive(Debug, Clone, Copy)]
pub struct RefinedPointSolver<B = LmBackend> {
    pub backend: B,
    pub options: SolveOptions,
    pub kernel: RobustKernel,
}

impl Default for RefinedPointSolver<LmBackend> {
    fn default() -> Self {
        Self {
            backend: LmBackend,
            options: SolveOptions::default(),
            kernel: RobustKernel::None,
        }
    }
}

impl RefinedPointSolver<LmBackend> {
    pub fn new(options: SolveOptions, kernel: RobustKernel) -> Self {
        Self {
            backend: LmBackend,
            options,
            kernel,
        }
    }
}

impl<B: NllsSolverBackend> RefinedPointSolver<B> {
    fn starting_point<C: ProjectiveCamera>(
        cameras: &[&C],
        pixels: &[Pt2],
        initial: &Pt3,
    ) -> Result<(Pt3, Real), PointSolveError> {
        let linear = triangulate_point_normalized(cameras, pixels);
        let mut candidates = Vec::with_capacity(2);
        if let Ok(p) = &linear {
            candidates.push(*p);
        }
        if is_finite(initial) {
            candidates.push(*initial);
        }

        candidates
            .into_iter()
            .filter_map(|p| rms_reprojection_error(cameras, pixels, &p).map(|e| (p, e)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or(match linear {
                Err(err) => PointSolveError::NoStartingPoint(err),
                Ok(_) => PointSolveError::Unprojectable,
            })
    }
}

impl<B: NllsSolverBackend> PointSolver for RefinedPointSolver<B> {
    fn solve<C: ProjectiveCamera>(
        &self,
        cameras: &[&C],
        pixels: &[Pt2],
        initial: &Pt3,
    ) -> Result<PointEstimate, PointSolveError> {
        check_views(cameras.len(), pixels.len())?;

        let (start, start_rms) = Self::starting_point(cameras, pixels, initial)?;
        let problem = PointReprojectionProblem::new(cameras, pixels, self.kernel);
        let x0 = DVector::from_column_slice(start.coords.as_slice());
        let (x, report) = self.backend.solve(&problem, x0, &self.options);

        let point = Pt3::new(x[0], x[1], x[2]);
        if !is_finite(&point) {
            return Err(PointSolveError::Diverged);
        }
        let rms_error = rms_reprojection_error(cameras, pixels, &point)
            .ok_or(PointSolveError::Unprojectable)?;
        debug!(
            "refined point over {} views: rms {:.4} -> {:.4} px, {} evaluations, converged: {}",
            cameras.len(),
            start_rms,
            rms_error,
            report.evaluations,
            report.converged
        );

        Ok(PointEstimate {
            point,
            rms_error,
            iterations: report.evaluations,
        })
    }
}

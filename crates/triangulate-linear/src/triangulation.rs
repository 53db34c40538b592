//! Linear triangulation of 3D points from multiple views.
//!
//! Uses a DLT formulation on the camera projection matrices and image points:
//! every view contributes the two rows `u·P₃ − P₁` and `v·P₃ − P₂`, and the
//! homogeneous point is the right singular vector of the smallest singular
//! value.

use nalgebra::DMatrix;
use thiserror::Error;
use triangulate_core::{Mat34, ProjectiveCamera, Pt2, Pt3, Real};

/// Homogeneous scale below which the solution is treated as a point at infinity.
const MIN_HOMOGENEOUS_W: Real = 1e-12;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinearTriangulationError {
    #[error("need at least 2 views, got {0}")]
    NotEnoughViews(usize),
    #[error("mismatched number of cameras ({cameras}) and points ({points})")]
    CountMismatch { cameras: usize, points: usize },
    #[error("svd failed during triangulation")]
    SvdFailed,
    #[error("triangulated point is at infinity")]
    PointAtInfinity,
}

/// Linear triangulation from multiple views using DLT.
///
/// `cameras` are projection matrices `P_i`, and `points` are their corresponding
/// image coordinates in the same units the matrices produce. The returned 3D
/// point is in the world frame of the camera matrices.
pub fn triangulate_point_linear(
    cameras: &[Mat34],
    points: &[Pt2],
) -> Result<Pt3, LinearTriangulationError> {
    if cameras.len() < 2 {
        return Err(LinearTriangulationError::NotEnoughViews(cameras.len()));
    }
    if cameras.len() != points.len() {
        return Err(LinearTriangulationError::CountMismatch {
            cameras: cameras.len(),
            points: points.len(),
        });
    }

    let mut a = DMatrix::<Real>::zeros(2 * cameras.len(), 4);
    for (i, (p, cam)) in points.iter().zip(cameras.iter()).enumerate() {
        let row0 = cam.row(0);
        let row1 = cam.row(1);
        let row2 = cam.row(2);

        a.row_mut(2 * i).copy_from(&(p.x * row2 - row0));
        a.row_mut(2 * i + 1).copy_from(&(p.y * row2 - row1));
    }

    // Equalize row weights so views at different depths count alike.
    for mut row in a.row_iter_mut() {
        let n = row.norm();
        if n > 0.0 {
            row /= n;
        }
    }

    let svd = a.svd(false, true);
    let v_t = svd.v_t.ok_or(LinearTriangulationError::SvdFailed)?;
    let smallest = svd
        .singular_values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, _)| idx)
        .ok_or(LinearTriangulationError::SvdFailed)?;
    let x_h = v_t.row(smallest);

    let w = x_h[3];
    if w.abs() <= MIN_HOMOGENEOUS_W {
        return Err(LinearTriangulationError::PointAtInfinity);
    }

    let point = Pt3::new(x_h[0] / w, x_h[1] / w, x_h[2] / w);
    if !point.coords.iter().all(|v| v.is_finite()) {
        return Err(LinearTriangulationError::PointAtInfinity);
    }
    Ok(point)
}

/// DLT triangulation in undistorted normalized image coordinates.
///
/// Pixels are mapped through each camera's inverse intrinsics and
/// distortion, and each view uses its `[R | t]` matrix. This keeps the
/// linear system well conditioned and handles lens distortion.
pub fn triangulate_point_normalized<C: ProjectiveCamera>(
    cameras: &[&C],
    pixels: &[Pt2],
) -> Result<Pt3, LinearTriangulationError> {
    if cameras.len() != pixels.len() {
        return Err(LinearTriangulationError::CountMismatch {
            cameras: cameras.len(),
            points: pixels.len(),
        });
    }
    let matrices: Vec<Mat34> = cameras
        .iter()
        .map(|c| c.normalized_projection_matrix())
        .collect();
    let normalized: Vec<Pt2> = cameras
        .iter()
        .zip(pixels)
        .map(|(c, px)| c.normalize_pixel(px))
        .collect();
    triangulate_point_linear(&matrices, &normalized)
}

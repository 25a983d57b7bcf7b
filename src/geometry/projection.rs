// SPDX-License-Identifier: GPL-3.0-only

//! View and projection matrices for the point cloud renderer
//!
//! Points come out of the reprojector in the camera convention (X right,
//! Y down, Z forward). The renderer expects the GL convention (Y up, Z
//! backward), so the view is pre-multiplied by `diag(1, -1, -1, 1)` before
//! the intrinsic perspective is applied.
//!
//! All matrices are `glam::Mat4`, column-major in memory. The renderer
//! uploads them verbatim.

use super::pose::PoseControls;
use crate::backends::types::Intrinsics;
use glam::{Mat3, Mat4, Vec3, Vec4};

/// Rigid transform built from the pose controls
///
/// The Euler triple (roll, pitch, yaw) uses the x-y-z sequence applied about
/// the fixed axes: roll about X first, then pitch about Y, then yaw about Z,
/// giving `R = Rz(yaw) * Ry(pitch) * Rx(roll)`. Translation is converted
/// from centimeters to meters.
pub fn build_view_matrix(pose: &PoseControls) -> Mat4 {
    let rotation = Mat3::from_rotation_z(pose.yaw.to_radians())
        * Mat3::from_rotation_y(pose.pitch.to_radians())
        * Mat3::from_rotation_x(pose.roll.to_radians());
    let translation = Vec3::new(pose.tx, pose.ty, pose.tz) / 100.0;

    let mut view = Mat4::from_mat3(rotation);
    view.w_axis = translation.extend(1.0);
    view
}

/// Flip Y and Z to go from camera convention to GL convention
pub fn axis_fixup() -> Mat4 {
    Mat4::from_diagonal(Vec4::new(1.0, -1.0, -1.0, 1.0))
}

/// View matrix in the renderer's convention (`fixup * view`)
pub fn build_gl_view(pose: &PoseControls) -> Mat4 {
    axis_fixup() * build_view_matrix(pose)
}

/// Perspective matrix derived from calibrated intrinsics
///
/// Preconditions: `far > near > 0`, `width > 0`, `height > 0`.
pub fn intrinsic_projection(
    intrinsics: &Intrinsics,
    width: u32,
    height: u32,
    near: f32,
    far: f32,
) -> Mat4 {
    debug_assert!(far > near && near > 0.0, "clip planes must satisfy far > near > 0");
    debug_assert!(width > 0 && height > 0, "viewport must be non-empty");

    let (w, h) = (width as f32, height as f32);
    let Intrinsics { fx, fy, cx, cy } = *intrinsics;

    // Written row by row, then transposed into glam's column storage
    let rows = [
        [2.0 * fx / w, 0.0, 2.0 * (cx / w) - 1.0, 0.0],
        [0.0, 2.0 * fy / h, 2.0 * (cy / h) - 1.0, 0.0],
        [
            0.0,
            0.0,
            -(far + near) / (far - near),
            -2.0 * far * near / (far - near),
        ],
        [0.0, 0.0, -1.0, 0.0],
    ];
    Mat4::from_cols_array_2d(&rows).transpose()
}

/// Full view-projection: `projection * (fixup * view)`
pub fn build_projection(
    intrinsics: &Intrinsics,
    view: &Mat4,
    width: u32,
    height: u32,
    near: f32,
    far: f32,
) -> Mat4 {
    intrinsic_projection(intrinsics, width, height, near, far) * axis_fixup() * *view
}

/// Convenience: view-projection straight from the pose controls
pub fn view_projection(
    pose: &PoseControls,
    intrinsics: &Intrinsics,
    width: u32,
    height: u32,
    near: f32,
    far: f32,
) -> Mat4 {
    build_projection(
        intrinsics,
        &build_view_matrix(pose),
        width,
        height,
        near,
        far,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_vec3_eq(a: Vec3, b: Vec3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
    }

    #[test]
    fn test_identity_pose_view_is_fixup() {
        let pose = PoseControls::default();
        assert_eq!(build_view_matrix(&pose), Mat4::IDENTITY);
        assert_eq!(
            build_gl_view(&pose),
            Mat4::from_diagonal(Vec4::new(1.0, -1.0, -1.0, 1.0))
        );
    }

    #[test]
    fn test_translation_in_meters() {
        let pose = PoseControls {
            tx: 100.0,
            ty: -50.0,
            tz: 1000.0,
            ..Default::default()
        };
        let view = build_view_matrix(&pose);
        assert_eq!(view.w_axis, Vec4::new(1.0, -0.5, 10.0, 1.0));
        assert_eq!(view.row(3), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_roll_rotates_about_x() {
        let pose = PoseControls {
            roll: 90.0,
            ..Default::default()
        };
        let view = build_view_matrix(&pose);
        assert_vec3_eq(view.transform_vector3(Vec3::Y), Vec3::Z);
        assert_vec3_eq(view.transform_vector3(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_rotation_sequence_roll_then_yaw() {
        // Roll is applied first, about the fixed X axis, then yaw about Z.
        let pose = PoseControls {
            roll: 90.0,
            yaw: 90.0,
            ..Default::default()
        };
        let view = build_view_matrix(&pose);
        assert_vec3_eq(view.transform_vector3(Vec3::X), Vec3::Y);
        assert_vec3_eq(view.transform_vector3(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_three_angle_rotation_matches_rz_ry_rx() {
        let pose = PoseControls {
            roll: 30.0,
            pitch: 45.0,
            yaw: 60.0,
            ..Default::default()
        };
        let (sx, cx) = 30.0f32.to_radians().sin_cos();
        let (sy, cy) = 45.0f32.to_radians().sin_cos();
        let (sz, cz) = 60.0f32.to_radians().sin_cos();
        let expected = [
            [cz * cy, cz * sy * sx - sz * cx, cz * sy * cx + sz * sx],
            [sz * cy, sz * sy * sx + cz * cx, sz * sy * cx - cz * sx],
            [-sy, cy * sx, cy * cx],
        ];

        let view = build_view_matrix(&pose);
        for (i, row) in expected.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                assert_relative_eq!(view.col(j)[i], *value, epsilon = 1e-5);
            }
        }
        assert_eq!(view.w_axis, Vec4::W);
    }

    #[test]
    fn test_intrinsic_projection_entries() {
        let k = Intrinsics::new(500.0, 400.0, 300.0, 200.0).unwrap();
        let p = intrinsic_projection(&k, 640, 480, 0.1, 1000.0);
        // glam's col(j)[i] is row i, column j
        assert_relative_eq!(p.col(0)[0], 2.0 * 500.0 / 640.0);
        assert_relative_eq!(p.col(1)[1], 2.0 * 400.0 / 480.0);
        assert_relative_eq!(p.col(2)[0], 2.0 * 300.0 / 640.0 - 1.0);
        assert_relative_eq!(p.col(2)[1], 2.0 * 200.0 / 480.0 - 1.0);
        assert_relative_eq!(p.col(2)[2], -(1000.1) / (999.9), epsilon = 1e-6);
        assert_relative_eq!(p.col(3)[2], -2.0 * 1000.0 * 0.1 / 999.9, epsilon = 1e-6);
        assert_eq!(p.col(2)[3], -1.0);
        assert_eq!(p.col(3)[3], 0.0);
    }

    #[test]
    fn test_principal_point_at_far_maps_to_far_plane() {
        let k = Intrinsics::new(525.0, 525.0, 320.0, 240.0).unwrap();
        let (near, far) = (0.1, 100.0);
        let m = view_projection(&PoseControls::default(), &k, 640, 480, near, far);

        let clip = m * Vec4::new(0.0, 0.0, far, 1.0);
        assert_relative_eq!(clip.w, far, epsilon = 1e-4);
        let ndc = clip.truncate() / clip.w;
        assert_vec3_eq(ndc, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_near_plane_maps_to_minus_one() {
        let k = Intrinsics::new(525.0, 525.0, 320.0, 240.0).unwrap();
        let m = view_projection(&PoseControls::default(), &k, 640, 480, 0.5, 50.0);
        let clip = m * Vec4::new(0.0, 0.0, 0.5, 1.0);
        assert_relative_eq!(clip.z / clip.w, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_points_below_center_project_to_lower_half() {
        // Camera Y points down; the GL convention has NDC +Y up.
        let k = Intrinsics::new(525.0, 525.0, 320.0, 240.0).unwrap();
        let m = view_projection(&PoseControls::default(), &k, 640, 480, 0.1, 100.0);
        let clip = m * Vec4::new(0.0, 0.5, 2.0, 1.0);
        assert!(clip.y / clip.w < 0.0);
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! User-controlled viewing pose

use crate::constants::{ROTATION_LIMIT_DEG, TRANSLATION_LIMIT_CM};
use serde::{Deserialize, Serialize};

/// One of the six adjustable pose parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseAxis {
    Roll,
    Pitch,
    Yaw,
    X,
    Y,
    Z,
}

impl PoseAxis {
    /// All axes in display order
    pub const ALL: [PoseAxis; 6] = [
        PoseAxis::Roll,
        PoseAxis::Pitch,
        PoseAxis::Yaw,
        PoseAxis::X,
        PoseAxis::Y,
        PoseAxis::Z,
    ];

    /// Short label for status displays
    pub fn label(&self) -> &'static str {
        match self {
            PoseAxis::Roll => "Roll",
            PoseAxis::Pitch => "Pitch",
            PoseAxis::Yaw => "Yaw",
            PoseAxis::X => "X",
            PoseAxis::Y => "Y",
            PoseAxis::Z => "Z",
        }
    }

    pub fn is_rotation(&self) -> bool {
        matches!(self, PoseAxis::Roll | PoseAxis::Pitch | PoseAxis::Yaw)
    }

    /// Inclusive limit of the axis range (symmetric around zero)
    pub fn limit(&self) -> f32 {
        if self.is_rotation() {
            ROTATION_LIMIT_DEG
        } else {
            TRANSLATION_LIMIT_CM
        }
    }

    /// Unit suffix for status displays
    pub fn unit(&self) -> &'static str {
        if self.is_rotation() { "°" } else { "cm" }
    }
}

/// Live pose read each tick by the renderer
///
/// Rotations are degrees in [-180, 180], translations centimeters in
/// [-1000, 1000]. The default is the identity pose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseControls {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub tx: f32,
    pub ty: f32,
    pub tz: f32,
}

impl PoseControls {
    /// Pose with every value clamped into its allowed range
    pub fn clamped(self) -> Self {
        let mut pose = self;
        for axis in PoseAxis::ALL {
            pose.set(axis, self.get(axis));
        }
        pose
    }

    pub fn get(&self, axis: PoseAxis) -> f32 {
        match axis {
            PoseAxis::Roll => self.roll,
            PoseAxis::Pitch => self.pitch,
            PoseAxis::Yaw => self.yaw,
            PoseAxis::X => self.tx,
            PoseAxis::Y => self.ty,
            PoseAxis::Z => self.tz,
        }
    }

    /// Set one axis, clamping into range
    pub fn set(&mut self, axis: PoseAxis, value: f32) {
        let limit = axis.limit();
        let value = value.clamp(-limit, limit);
        match axis {
            PoseAxis::Roll => self.roll = value,
            PoseAxis::Pitch => self.pitch = value,
            PoseAxis::Yaw => self.yaw = value,
            PoseAxis::X => self.tx = value,
            PoseAxis::Y => self.ty = value,
            PoseAxis::Z => self.tz = value,
        }
    }

    /// Nudge one axis by `delta`, clamping into range
    pub fn adjust(&mut self, axis: PoseAxis, delta: f32) {
        self.set(axis, self.get(axis) + delta);
    }

    /// One-line summary, e.g. `Roll 0° Pitch 5° ... Z -10cm`
    pub fn summary(&self) -> String {
        PoseAxis::ALL
            .iter()
            .map(|axis| format!("{} {:.0}{}", axis.label(), self.get(*axis), axis.unit()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let pose = PoseControls::default();
        for axis in PoseAxis::ALL {
            assert_eq!(pose.get(axis), 0.0);
        }
    }

    #[test]
    fn test_set_clamps_to_range() {
        let mut pose = PoseControls::default();
        pose.set(PoseAxis::Roll, 270.0);
        pose.set(PoseAxis::Yaw, -500.0);
        pose.set(PoseAxis::Z, 1500.0);
        pose.set(PoseAxis::X, -1000.0);
        assert_eq!(pose.roll, 180.0);
        assert_eq!(pose.yaw, -180.0);
        assert_eq!(pose.tz, 1000.0);
        assert_eq!(pose.tx, -1000.0);
    }

    #[test]
    fn test_adjust_accumulates() {
        let mut pose = PoseControls::default();
        pose.adjust(PoseAxis::Pitch, 5.0);
        pose.adjust(PoseAxis::Pitch, 5.0);
        pose.adjust(PoseAxis::Y, -10.0);
        assert_eq!(pose.pitch, 10.0);
        assert_eq!(pose.ty, -10.0);
    }

    #[test]
    fn test_clamped() {
        let pose = PoseControls {
            roll: 181.0,
            tx: 2000.0,
            ..Default::default()
        }
        .clamped();
        assert_eq!(pose.roll, 180.0);
        assert_eq!(pose.tx, 1000.0);
    }

    #[test]
    fn test_summary_lists_all_axes() {
        let summary = PoseControls::default().summary();
        for axis in PoseAxis::ALL {
            assert!(summary.contains(axis.label()));
        }
    }
}

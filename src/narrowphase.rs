use glam::Vec2;

use crate::types::Rect;

/// Primitive swept tests shared by every shape.
pub struct Narrowphase;

impl Narrowphase {
    /// Fraction of `delta` a point at `pos` can travel before entering the
    /// box centered at `obstacle_center` with half extents `obstacle_half_size`.
    ///
    /// The box is expected to be Minkowski-expanded by the mover's own half
    /// size. Separating axes tested: X, Y and the perpendicular of `delta`.
    /// Any axis proving the path never reaches the box yields 1. Otherwise the
    /// result is the largest per-axis entry fraction (pulled back by `skin`),
    /// or 0 when no axis bounds it (already inside).
    pub fn raycast_against_aabb(
        pos: Vec2,
        delta: Vec2,
        obstacle_center: Vec2,
        obstacle_half_size: Vec2,
        skin: f32,
    ) -> f32 {
        let axes = [Vec2::X, Vec2::Y, delta.perp().normalize_or_zero()];
        let mut fraction = 0.0f32;

        for axis in axes {
            // Orient so that moving along delta increases the projection.
            let axis = if axis.dot(delta) < 0.0 { -axis } else { axis };

            let half = (obstacle_half_size.x * axis.x).abs() + (obstacle_half_size.y * axis.y).abs();
            let center = obstacle_center.dot(axis);
            let near = center - half;
            let far = center + half;

            let start = pos.dot(axis);
            let end = (pos + delta).dot(axis);

            if end <= near || start >= far {
                return 1.0;
            }

            if end > start {
                let f = (near - skin - start) / (end - start);
                fraction = fraction.max(f);
            }
        }

        fraction.clamp(0.0, 1.0)
    }

    /// Swept test of `mover` travelling by `delta` against the fixed `obstacle`.
    pub fn raycast_box(mover: Rect, delta: Vec2, obstacle: Rect, skin: f32) -> f32 {
        Self::raycast_against_aabb(
            mover.center(),
            delta,
            obstacle.center(),
            obstacle.half_size() + mover.half_size(),
            skin,
        )
    }
}

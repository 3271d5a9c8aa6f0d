//! Fixed point maths used by the renderer. Everything here works on 16.16
//! `Fixed` values and BAM angles, floats are only used once to build tables.

mod angle;
mod fixed_point;
mod trig;

pub use angle::*;
pub use fixed_point::*;
pub use trig::*;

/// Angle of the vector `(dx, dy)`, resolved per octant through `tantoangle`.
///
/// Doom function name `R_PointToAngle`
pub fn point_to_angle(dx: Fixed, dy: Fixed) -> Angle {
    let mut x = dx.raw();
    let mut y = dy.raw();
    if x == 0 && y == 0 {
        return Angle::ZERO;
    }

    let bam = if x >= 0 {
        if y >= 0 {
            if x > y {
                // octant 0
                tantoangle(slope_div(y as u32, x as u32))
            } else {
                // octant 1
                ANG90 - 1 - tantoangle(slope_div(x as u32, y as u32))
            }
        } else {
            y = y.wrapping_neg();
            if (x as u32) > (y as u32) {
                // octant 8
                tantoangle(slope_div(y as u32, x as u32)).wrapping_neg()
            } else {
                // octant 7
                ANG270.wrapping_add(tantoangle(slope_div(x as u32, y as u32)))
            }
        }
    } else {
        x = x.wrapping_neg();
        if y >= 0 {
            if (x as u32) > (y as u32) {
                // octant 3
                ANG180 - 1 - tantoangle(slope_div(y as u32, x as u32))
            } else {
                // octant 2
                ANG90 + tantoangle(slope_div(x as u32, y as u32))
            }
        } else {
            y = y.wrapping_neg();
            if (x as u32) > (y as u32) {
                // octant 4
                ANG180 + tantoangle(slope_div(y as u32, x as u32))
            } else {
                // octant 5
                ANG270 - 1 - tantoangle(slope_div(x as u32, y as u32))
            }
        }
    };
    Angle::new(bam)
}

/// Angle from one point to another. Deltas that overflow 32 bits are halved
/// until they fit, which keeps the angle but loses a little precision on
/// very large maps.
pub fn point_to_angle_2(from_x: Fixed, from_y: Fixed, to_x: Fixed, to_y: Fixed) -> Angle {
    let mut dx = to_x.raw() as i64 - from_x.raw() as i64;
    let mut dy = to_y.raw() as i64 - from_y.raw() as i64;
    while dx < i32::MIN as i64 || dx > i32::MAX as i64 || dy < i32::MIN as i64 || dy > i32::MAX as i64
    {
        dx /= 2;
        dy /= 2;
    }
    point_to_angle(Fixed::new(dx as i32), Fixed::new(dy as i32))
}

/// Distance between two points, approximated through the angle tables.
///
/// Doom function name `R_PointToDist`
pub fn point_to_dist(from_x: Fixed, from_y: Fixed, to_x: Fixed, to_y: Fixed) -> Fixed {
    let mut dx = (to_x.raw().wrapping_sub(from_x.raw())).wrapping_abs();
    let mut dy = (to_y.raw().wrapping_sub(from_y.raw())).wrapping_abs();
    if dy > dx {
        std::mem::swap(&mut dx, &mut dy);
    }
    if dx == 0 {
        return Fixed::ZERO;
    }

    let slope = (fixed_div(dy, dx) >> DBITS) as usize;
    let angle = Angle::new(tantoangle(slope).wrapping_add(ANG90));
    Fixed::new(fixed_div(dx, finesine(angle.fine())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Angle, b: u32, tolerance: u32) -> bool {
        let d = a.bam().wrapping_sub(b);
        d <= tolerance || d.wrapping_neg() <= tolerance
    }

    #[test]
    fn octant_angles() {
        let one = Fixed::UNIT;
        let tol = 1 << 22;
        assert!(close(point_to_angle(one, Fixed::ZERO), 0, tol));
        assert!(close(point_to_angle(one, one), ANG45, tol));
        assert!(close(point_to_angle(Fixed::ZERO, one), ANG90, tol));
        assert!(close(point_to_angle(-one, one), ANG90 + ANG45, tol));
        assert!(close(point_to_angle(-one, Fixed::ZERO), ANG180, tol));
        assert!(close(point_to_angle(-one, -one), ANG180 + ANG45, tol));
        assert!(close(point_to_angle(Fixed::ZERO, -one), ANG270, tol));
        assert!(close(point_to_angle(one, -one), ANG270 + ANG45, tol));
        assert_eq!(point_to_angle(Fixed::ZERO, Fixed::ZERO), Angle::ZERO);
    }

    #[test]
    fn angle_2_handles_overflow() {
        let far = Fixed::from_int(30000);
        let a = point_to_angle_2(-far, Fixed::ZERO, far, Fixed::ZERO);
        assert!(close(a, 0, 1 << 22));
        let a = point_to_angle_2(Fixed::ZERO, far, Fixed::ZERO, -far);
        assert!(close(a, ANG270, 1 << 22));
    }

    #[test]
    fn distance() {
        let d = point_to_dist(Fixed::ZERO, Fixed::ZERO, Fixed::from_int(300), Fixed::from_int(400));
        assert!((d.to_int() - 500).abs() <= 1);
        let d = point_to_dist(Fixed::ZERO, Fixed::ZERO, Fixed::ZERO, Fixed::from_int(-128));
        assert!((d.to_int() - 128).abs() <= 1);
        assert_eq!(point_to_dist(Fixed::UNIT, Fixed::UNIT, Fixed::UNIT, Fixed::UNIT), Fixed::ZERO);
    }
}

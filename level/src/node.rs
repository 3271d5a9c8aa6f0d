use math::Fixed;

use crate::map_defs::Node;

impl Node {
    /// R_PointOnSide
    ///
    /// Determine which side of the splitting line the point is on. `0` is the
    /// front (right) side, `1` the back.
    pub fn point_on_side(&self, x: Fixed, y: Fixed) -> usize {
        point_on_side(x, y, self.x, self.y, self.dx, self.dy)
    }
}

/// Side of the line through `(lx, ly)` with direction `(ldx, ldy)` that the
/// point is on. Axis aligned lines and opposite signs are resolved without
/// multiplying.
pub fn point_on_side(x: Fixed, y: Fixed, lx: Fixed, ly: Fixed, ldx: Fixed, ldy: Fixed) -> usize {
    if ldx == Fixed::ZERO {
        if x <= lx {
            return (ldy > Fixed::ZERO) as usize;
        }
        return (ldy < Fixed::ZERO) as usize;
    }
    if ldy == Fixed::ZERO {
        if y <= ly {
            return (ldx < Fixed::ZERO) as usize;
        }
        return (ldx > Fixed::ZERO) as usize;
    }

    let dx = x - lx;
    let dy = y - ly;

    // Sign bits differ, the answer is in the signs
    if (ldy.raw() ^ ldx.raw() ^ dx.raw() ^ dy.raw()) < 0 {
        if (ldy.raw() ^ dx.raw()) < 0 {
            return 1;
        }
        return 0;
    }

    let left = Fixed::new(ldy.raw() >> 16) * dx;
    let right = dy * Fixed::new(ldx.raw() >> 16);
    if right < left { 0 } else { 1 }
}

#[cfg(test)]
mod tests {
    use super::point_on_side;
    use math::Fixed;

    fn f(v: i32) -> Fixed {
        Fixed::from_int(v)
    }

    #[test]
    fn line_side_problem() {
        let (x1, y1) = (f(832), f(-2944));
        let (dx, dy) = (f(968 - 832), f(-2880 + 2944));

        assert_eq!(point_on_side(f(0), f(0), x1, y1, dx, dy), 1);
        assert_eq!(point_on_side(f(976), f(-2912), x1, y1, dx, dy), 0);
    }

    #[test]
    fn axis_aligned() {
        // Line going north along x = 0, right side is east
        assert_eq!(point_on_side(f(10), f(5), f(0), f(0), f(0), f(64)), 0);
        assert_eq!(point_on_side(f(-10), f(5), f(0), f(0), f(0), f(64)), 1);
        // Line going east along y = 0, right side is south
        assert_eq!(point_on_side(f(3), f(-8), f(0), f(0), f(64), f(0)), 0);
        assert_eq!(point_on_side(f(3), f(8), f(0), f(0), f(64), f(0)), 1);
    }
}

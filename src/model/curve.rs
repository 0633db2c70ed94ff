use serde::Serialize;

use crate::constants::BEZIER_SEGMENTS;

/// Easing between one keyframe and the next.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    #[default]
    Linear,
    Stepped,
    Bezier(BezierCurve),
}

/// A cubic Bézier from (0, 0) to (1, 1), sampled by forward differencing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BezierCurve {
    pub control: [f32; 4],
    #[serde(skip)]
    deltas: [f32; 6],
}

impl Curve {
    pub fn bezier(cx1: f32, cy1: f32, cx2: f32, cy2: f32) -> Curve {
        let step = 1.0 / BEZIER_SEGMENTS as f32;
        let step2 = step * step;
        let step3 = step2 * step;
        let pre1 = 3.0 * step;
        let pre2 = 3.0 * step2;
        let pre4 = 6.0 * step2;
        let pre5 = 6.0 * step3;
        let tmp1x = -cx1 * 2.0 + cx2;
        let tmp1y = -cy1 * 2.0 + cy2;
        let tmp2x = (cx1 - cx2) * 3.0 + 1.0;
        let tmp2y = (cy1 - cy2) * 3.0 + 1.0;
        Curve::Bezier(BezierCurve {
            control: [cx1, cy1, cx2, cy2],
            deltas: [
                cx1 * pre1 + tmp1x * pre2 + tmp2x * step3,
                cy1 * pre1 + tmp1y * pre2 + tmp2y * step3,
                tmp1x * pre4 + tmp2x * pre5,
                tmp1y * pre4 + tmp2y * pre5,
                tmp2x * pre5,
                tmp2y * pre5,
            ],
        })
    }

    /// Maps linear progress `percent` in `[0, 1]` through this curve.
    pub fn percent(&self, percent: f32) -> f32 {
        match self {
            Curve::Linear => percent,
            Curve::Stepped => 0.0,
            Curve::Bezier(curve) => curve.percent(percent),
        }
    }
}

impl BezierCurve {
    fn percent(&self, percent: f32) -> f32 {
        let [mut dfx, mut dfy, mut ddfx, mut ddfy, dddfx, dddfy] = self.deltas;
        let mut x = dfx;
        let mut y = dfy;
        let mut remaining = BEZIER_SEGMENTS - 2;
        loop {
            if x >= percent {
                let last_x = x - dfx;
                let last_y = y - dfy;
                return last_y + (y - last_y) * (percent - last_x) / (x - last_x);
            }
            if remaining == 0 {
                break;
            }
            remaining -= 1;
            dfx += ddfx;
            dfy += ddfy;
            ddfx += dddfx;
            ddfy += dddfy;
            x += dfx;
            y += dfy;
        }
        // last sample is (1, 1)
        y + (1.0 - y) * (percent - x) / (1.0 - x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[rstest::rstest]
    #[case(0.0)]
    #[case(0.25)]
    #[case(0.5)]
    #[case(0.95)]
    #[case(1.0)]
    fn test_diagonal_bezier_is_linear(#[case] p: f32) {
        let curve = Curve::bezier(0.25, 0.25, 0.75, 0.75);
        assert!(close(curve.percent(p), p), "{p} -> {}", curve.percent(p));
    }

    #[rstest::rstest]
    fn test_ease_in_lags_linear() {
        let curve = Curve::bezier(0.5, 0.0, 1.0, 1.0);
        let eased = curve.percent(0.5);
        assert!(eased < 0.5);
        assert!(eased > 0.0);
        assert!(close(curve.percent(1.0), 1.0));
    }

    #[rstest::rstest]
    fn test_linear_and_stepped() {
        assert_eq!(Curve::Linear.percent(0.3), 0.3);
        assert_eq!(Curve::Stepped.percent(0.3), 0.0);
        assert_eq!(Curve::default(), Curve::Linear);
    }
}

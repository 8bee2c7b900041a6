//! Small shared geometry types and the circle fit.

use nalgebra::{Matrix3, Vector3};

/// Integer image coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Point2i {
    pub x: i32,
    pub y: i32,
}

impl Point2i {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point2i {
    type Output = Point2i;
    fn sub(self, rhs: Point2i) -> Point2i {
        Point2i::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point2i {
    type Output = Point2i;
    fn add(self, rhs: Point2i) -> Point2i {
        Point2i::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// A fitted circle in image coordinates.
///
/// `is_defined == false` is the explicit "no ball" sentinel; `sd` is the RMS
/// radial residual of the fit (0 for fallback geometry).
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Circle {
    pub centre_x: f32,
    pub centre_y: f32,
    pub radius: f32,
    pub sd: f32,
    pub is_defined: bool,
}

/// Least-squares circle fit (Kåsa's algebraic method).
///
/// Minimizes `Σ (x² + y² + D·x + E·y + F)²` by solving the 3×3 normal
/// equations. Points lying exactly on a circle recover it exactly; `sd`
/// reports the RMS distance residual otherwise.
///
/// Requires at least 3 points. Returns `None` for degenerate input
/// (too few points or a singular system, e.g. collinear points).
pub fn fit_circle(points: &[Point2i]) -> Option<Circle> {
    let n = points.len();
    if n < 3 {
        return None;
    }

    // Normal equations for [D, E, F]:
    //   Σ [x², xy, x] [D]     [−x(x²+y²)]
    //   Σ [xy, y², y] [E]  =  [−y(x²+y²)]
    //   Σ [x,  y,  1] [F]     [−(x²+y²) ]
    let mut m = Matrix3::<f64>::zeros();
    let mut rhs = Vector3::<f64>::zeros();
    for p in points {
        let (x, y) = (p.x as f64, p.y as f64);
        let z = x * x + y * y;
        m[(0, 0)] += x * x;
        m[(0, 1)] += x * y;
        m[(0, 2)] += x;
        m[(1, 1)] += y * y;
        m[(1, 2)] += y;
        m[(2, 2)] += 1.0;
        rhs[0] -= x * z;
        rhs[1] -= y * z;
        rhs[2] -= z;
    }
    m[(1, 0)] = m[(0, 1)];
    m[(2, 0)] = m[(0, 2)];
    m[(2, 1)] = m[(1, 2)];

    let sol = m.try_inverse()? * rhs;
    let (d, e, f) = (sol[0], sol[1], sol[2]);
    let cx = -d / 2.0;
    let cy = -e / 2.0;
    let r2 = cx * cx + cy * cy - f;
    if !r2.is_finite() || r2 <= 0.0 {
        return None;
    }
    let radius = r2.sqrt();

    let mut sq_residual = 0.0;
    for p in points {
        let dx = p.x as f64 - cx;
        let dy = p.y as f64 - cy;
        let d = (dx * dx + dy * dy).sqrt() - radius;
        sq_residual += d * d;
    }
    let sd = (sq_residual / n as f64).sqrt();

    Some(Circle {
        centre_x: cx as f32,
        centre_y: cy as f32,
        radius: radius as f32,
        sd: sd as f32,
        is_defined: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_circle(cx: f64, cy: f64, r: f64, theta_deg: f64) -> Point2i {
        let t = theta_deg.to_radians();
        Point2i::new(
            (cx + r * t.cos()).round() as i32,
            (cy + r * t.sin()).round() as i32,
        )
    }

    #[test]
    fn recovers_exact_circle_from_six_points() {
        // Angles chosen so every point lands on integer coordinates.
        let points = vec![
            Point2i::new(60, 50),
            Point2i::new(40, 50),
            Point2i::new(50, 60),
            Point2i::new(50, 40),
            Point2i::new(56, 58),
            Point2i::new(44, 42),
        ];
        let c = fit_circle(&points).unwrap();
        assert!(c.is_defined);
        assert!((c.centre_x - 50.0).abs() < 1e-3, "centre_x = {}", c.centre_x);
        assert!((c.centre_y - 50.0).abs() < 1e-3, "centre_y = {}", c.centre_y);
        assert!((c.radius - 10.0).abs() < 1e-3, "radius = {}", c.radius);
        assert!(c.sd < 1e-3, "sd = {}", c.sd);
    }

    #[test]
    fn near_circle_reports_residual() {
        let mut points: Vec<Point2i> = (0..8)
            .map(|i| on_circle(100.0, 80.0, 20.0, i as f64 * 45.0))
            .collect();
        points.push(Point2i::new(100, 105)); // 5px outlier below
        let c = fit_circle(&points).unwrap();
        assert!(c.sd > 0.1);
        assert!((c.centre_x - 100.0).abs() < 3.0);
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let points: Vec<Point2i> = (0..6).map(|i| Point2i::new(i, 2 * i)).collect();
        assert!(fit_circle(&points).is_none());
    }

    #[test]
    fn too_few_points_are_rejected() {
        assert!(fit_circle(&[Point2i::new(0, 0), Point2i::new(1, 1)]).is_none());
    }
}

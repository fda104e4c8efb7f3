use crate::error::GeomError;
use crate::line::Line;
use crate::point::Point;

/// Natural cubic spline through a set of samples `(s_i, y_i)`, evaluated
/// with the standard tridiagonal (Thomas algorithm) solve for second
/// derivatives. Used to fit `x(s)` and `y(s)` independently, parametrized
/// by arc length `s`, which is how `interp_area.c`'s pipe-based resampling
/// treats a polyline as two 1-D splines over a shared parametrization.
struct NaturalSpline {
    s: Vec<f64>,
    y: Vec<f64>,
    m: Vec<f64>, // second derivatives at each knot
}

impl NaturalSpline {
    fn fit(s: &[f64], y: &[f64]) -> Self {
        let n = s.len();
        let mut m = vec![0.0; n];
        if n < 3 {
            return NaturalSpline { s: s.to_vec(), y: y.to_vec(), m };
        }
        let mut a = vec![0.0; n];
        let mut b = vec![0.0; n];
        let mut c = vec![0.0; n];
        let mut d = vec![0.0; n];
        for i in 1..n - 1 {
            let h0 = s[i] - s[i - 1];
            let h1 = s[i + 1] - s[i];
            a[i] = h0;
            b[i] = 2.0 * (h0 + h1);
            c[i] = h1;
            d[i] = 6.0 * ((y[i + 1] - y[i]) / h1 - (y[i] - y[i - 1]) / h0);
        }
        // Natural boundary conditions: m[0] = m[n-1] = 0.
        b[0] = 1.0;
        b[n - 1] = 1.0;
        // Thomas algorithm.
        let mut cp = vec![0.0; n];
        let mut dp = vec![0.0; n];
        cp[0] = c[0] / b[0];
        dp[0] = d[0] / b[0];
        for i in 1..n {
            let denom = b[i] - a[i] * cp[i - 1];
            cp[i] = if denom.abs() > f64::EPSILON { c[i] / denom } else { 0.0 };
            dp[i] = if denom.abs() > f64::EPSILON {
                (d[i] - a[i] * dp[i - 1]) / denom
            } else {
                0.0
            };
        }
        m[n - 1] = dp[n - 1];
        for i in (0..n - 1).rev() {
            m[i] = dp[i] - cp[i] * m[i + 1];
        }
        NaturalSpline { s: s.to_vec(), y: y.to_vec(), m }
    }

    fn eval(&self, t: f64) -> f64 {
        let n = self.s.len();
        if n == 0 {
            return 0.0;
        }
        if n == 1 {
            return self.y[0];
        }
        let idx = match self.s.partition_point(|&x| x <= t) {
            0 => 0,
            i if i >= n => n - 2,
            i => i - 1,
        };
        let h = self.s[idx + 1] - self.s[idx];
        if h.abs() < f64::EPSILON {
            return self.y[idx];
        }
        let a = (self.s[idx + 1] - t) / h;
        let b = (t - self.s[idx]) / h;
        a * self.y[idx]
            + b * self.y[idx + 1]
            + ((a.powi(3) - a) * self.m[idx] + (b.powi(3) - b) * self.m[idx + 1]) * (h * h) / 6.0
    }
}

fn cumulative_arclength(line: &Line) -> Vec<f64> {
    let n = line.points.len();
    let total_pts = if line.closed { n + 1 } else { n };
    let mut s = Vec::with_capacity(total_pts);
    s.push(0.0);
    for i in 1..n {
        s.push(s[i - 1] + line.points[i - 1].dist(line.points[i]));
    }
    if line.closed {
        s.push(s[n - 1] + line.points[n - 1].dist(line.points[0]));
    }
    s
}

/// Re-samples `line` to `n_out` equally `s`-spaced points using independent
/// natural cubic splines for x(s) and y(s). For closed lines the first
/// point of `line.points` is duplicated as the final knot (so the spline
/// sees a continuous loop) and the duplicate is dropped from the output.
pub fn spline_resample(line: &Line, n_out: usize) -> Result<Line, GeomError> {
    if line.points.len() < 2 {
        return Err(GeomError::TooFewPoints);
    }
    if n_out < 2 {
        return Err(GeomError::TooFewPoints);
    }
    let s = cumulative_arclength(line);
    let mut xs: Vec<f64> = line.points.iter().map(|p| p.x).collect();
    let mut ys: Vec<f64> = line.points.iter().map(|p| p.y).collect();
    if line.closed {
        xs.push(line.points[0].x);
        ys.push(line.points[0].y);
    }
    let total = *s.last().unwrap();
    if total <= f64::EPSILON {
        return Err(GeomError::ZeroLength);
    }
    let sx = NaturalSpline::fit(&s, &xs);
    let sy = NaturalSpline::fit(&s, &ys);

    let denom = if line.closed { n_out } else { n_out - 1 };
    let mut points = Vec::with_capacity(n_out);
    for i in 0..n_out {
        let t = total * (i as f64) / (denom as f64);
        points.push(Point::new(sx.eval(t), sy.eval(t)));
    }
    Ok(Line { points, closed: line.closed })
}

/// Resamples `line` at an arc-length spacing of approximately `res`,
/// returning however many points that implies (at least 2).
pub fn spline_resample_at_resolution(line: &Line, res: f64) -> Result<Line, GeomError> {
    if res <= 0.0 {
        return Err(GeomError::SplineBracketFailed);
    }
    let total = line.length();
    let raw = (total / res).round() as i64;
    let n_out = raw.max(2) as usize;
    spline_resample(line, n_out)
}

//! Scalar numerics shared by the pricing layer: normal distribution helpers
//! and adaptive quadrature.

#[derive(Debug, Clone, PartialEq)]
pub enum MathError {
    NonConvergence,
    InvalidInput(&'static str),
}

pub fn normal_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

pub fn normal_cdf(x: f64) -> f64 {
    // Abramowitz & Stegun 7.1.26
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.231_641_9 * z);
    let poly = t
        * (0.319_381_530
            + t * (-0.356_563_782
                + t * (1.781_477_937 + t * (-1.821_255_978 + t * 1.330_274_429))));
    let approx = 1.0 - normal_pdf(z) * poly;
    if x >= 0.0 { approx } else { 1.0 - approx }
}

/// Maximum subdivision depth of the adaptive quadrature; exhausting it
/// without meeting the tolerance is a hard `NonConvergence` failure.
const MAX_DEPTH: usize = 48;

/// Fixed panel count seeding the adaptive refinement, so narrow features
/// inside a wide interval are sampled before the acceptance test runs.
const INITIAL_PANELS: usize = 8;

/// Floor on the per-interval tolerance as subdivision halves it. Without the
/// floor, deep refinement chains demand accuracy below the rounding noise of
/// the integrand itself and can never terminate.
const TOL_FLOOR: f64 = 1e-14;

/// Adaptive Simpson quadrature of `f` over `[a, b]`.
///
/// `b` may be `f64::INFINITY`: the tail is folded onto the unit interval with
/// the substitution `x = a + u/(1 - u)`, whose Jacobian concentrates nodes
/// near the finite endpoint where the integrand mass sits. The interval is
/// seeded with a fixed number of equal panels, each refined independently.
/// The tolerance is absolute. Integrands must stay finite on the interior of
/// the domain; non-finite values abort the integration instead of being
/// subdivided indefinitely.
pub fn integrate_adaptive<F>(f: F, a: f64, b: f64, tol: f64) -> Result<f64, MathError>
where
    F: Fn(f64) -> f64,
{
    if !(tol > 0.0) {
        return Err(MathError::InvalidInput("tol must be positive"));
    }
    if !a.is_finite() {
        return Err(MathError::InvalidInput("lower bound must be finite"));
    }

    if b.is_finite() {
        if b <= a {
            return Err(MathError::InvalidInput("upper bound must exceed lower bound"));
        }
        panelled_simpson(&f, a, b, tol)
    } else {
        let g = |u: f64| {
            if u >= 1.0 {
                return 0.0;
            }
            let w = 1.0 - u;
            let fx = f(a + u / w);
            // Decaying integrands underflow to exact zero long before the
            // Jacobian overflows; keep the product at zero there.
            if fx == 0.0 { 0.0 } else { fx / (w * w) }
        };
        panelled_simpson(&g, 0.0, 1.0, tol)
    }
}

#[inline]
fn simpson(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}

fn panelled_simpson<F>(f: &F, a: f64, b: f64, tol: f64) -> Result<f64, MathError>
where
    F: Fn(f64) -> f64,
{
    let width = (b - a) / INITIAL_PANELS as f64;
    let panel_tol = tol / INITIAL_PANELS as f64;
    let mut total = 0.0;

    for i in 0..INITIAL_PANELS {
        let lo = a + i as f64 * width;
        let hi = if i + 1 == INITIAL_PANELS { b } else { lo + width };
        total += adaptive_simpson(f, lo, hi, panel_tol)?;
    }

    Ok(total)
}

fn adaptive_simpson<F>(f: &F, a: f64, b: f64, tol: f64) -> Result<f64, MathError>
where
    F: Fn(f64) -> f64,
{
    let fa = f(a);
    let fb = f(b);
    let m = 0.5 * (a + b);
    let fm = f(m);
    let whole = simpson(a, b, fa, fm, fb);
    simpson_step(f, a, b, fa, fm, fb, whole, tol, MAX_DEPTH)
}

#[allow(clippy::too_many_arguments)]
fn simpson_step<F>(
    f: &F,
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
    tol: f64,
    depth: usize,
) -> Result<f64, MathError>
where
    F: Fn(f64) -> f64,
{
    let m = 0.5 * (a + b);
    let lm = 0.5 * (a + m);
    let rm = 0.5 * (m + b);
    let flm = f(lm);
    let frm = f(rm);

    let left = simpson(a, m, fa, flm, fm);
    let right = simpson(m, b, fm, frm, fb);
    if !left.is_finite() || !right.is_finite() {
        return Err(MathError::InvalidInput("integrand is not finite"));
    }

    // Richardson acceptance test (Lyness): the halved estimate is accepted
    // with a fifteenth of the observed defect folded back in.
    let defect = left + right - whole;
    if defect.abs() <= 15.0 * tol {
        return Ok(left + right + defect / 15.0);
    }
    if depth == 0 {
        return Err(MathError::NonConvergence);
    }

    let half_tol = (0.5 * tol).max(TOL_FLOOR);
    Ok(simpson_step(f, a, m, fa, flm, fm, left, half_tol, depth - 1)?
        + simpson_step(f, m, b, fm, frm, fb, right, half_tol, depth - 1)?)
}

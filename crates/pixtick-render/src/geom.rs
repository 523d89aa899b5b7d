//! 2D affine transforms for sprites.

/// An affine transform
///
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// ```
///
/// acting on column vectors: `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`.
///
/// `translate`, `scale` and `rotate` each apply their operation after the
/// current transform, so `GeoM::new().scale(2.0, 2.0).translate(5.0, 0.0)`
/// scales first and then translates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoM {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    tx: f64,
    ty: f64,
}

impl Default for GeoM {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl GeoM {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub const fn new() -> Self {
        Self::IDENTITY
    }

    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    pub const fn from_coefficients(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    /// `(a, b, c, d, tx, ty)`.
    pub fn coefficients(&self) -> (f64, f64, f64, f64, f64, f64) {
        (self.a, self.b, self.c, self.d, self.tx, self.ty)
    }

    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        self.then(&Self::from_coefficients(1.0, 0.0, 0.0, 1.0, dx, dy))
    }

    #[must_use]
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        self.then(&Self::from_coefficients(sx, 0.0, 0.0, sy, 0.0, 0.0))
    }

    /// Rotate by `theta` radians about the origin.
    #[must_use]
    pub fn rotate(self, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        self.then(&Self::from_coefficients(cos, sin, -sin, cos, 0.0, 0.0))
    }

    /// Apply `other` after `self`.
    #[must_use]
    pub fn concat(self, other: &Self) -> Self {
        self.then(other)
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// True when every coefficient is finite and the determinant is
    /// nonzero. A determinant that overflows to infinity still counts.
    pub fn is_invertible(&self) -> bool {
        let finite = [self.a, self.b, self.c, self.d, self.tx, self.ty]
            .iter()
            .all(|v| v.is_finite());
        finite && self.determinant() != 0.0
    }

    /// The inverse transform, if there is one.
    pub fn invert(&self) -> Option<Self> {
        if !self.is_invertible() {
            return None;
        }
        let det = self.determinant();
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Some(Self {
            a,
            b,
            c,
            d,
            tx: -(a * self.tx + c * self.ty),
            ty: -(b * self.tx + d * self.ty),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn tx(&self) -> f64 {
        self.tx
    }

    pub fn ty(&self) -> f64 {
        self.ty
    }

    fn then(self, op: &Self) -> Self {
        Self {
            a: op.a * self.a + op.c * self.b,
            b: op.b * self.a + op.d * self.b,
            c: op.a * self.c + op.c * self.d,
            d: op.b * self.c + op.d * self.d,
            tx: op.a * self.tx + op.c * self.ty + op.tx,
            ty: op.b * self.tx + op.d * self.ty + op.ty,
        }
    }
}

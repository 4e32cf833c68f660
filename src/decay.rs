use crate::error::{Error, Result};

/// A hyperparameter that changes over training time
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f64) -> f64;
}

impl<D: Decay + ?Sized> Decay for Box<D> {
    fn evaluate(&self, t: f64) -> f64 {
        (**self).evaluate(t)
    }
}

fn validate(rate: f64, vi: f64, vf: f64) -> Result<()> {
    ((rate >= 0.0 && vi > vf) || (rate < 0.0 && vi < vf))
        .then_some(())
        .ok_or(Error::InvalidDecay { rate, vi, vf })
}

/// A constant value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f64) -> f64 {
        self.value
    }
}

/// v(t) = max(v<sub>i</sub> - rt, v<sub>f</sub>)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Linear {
    rate: f64,
    vi: f64,
    vf: f64,
}

impl Linear {
    pub fn new(rate: f64, vi: f64, vf: f64) -> Result<Self> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }

    /// Linear decay from `vi` to `vf` spread evenly over `steps`
    ///
    /// Reaches `vf` at `t = steps`.
    pub fn over(steps: u32, vi: f64, vf: f64) -> Result<Self> {
        Self::new((vi - vf) / f64::from(steps.max(1)), vi, vf)
    }
}

impl Decay for Linear {
    fn evaluate(&self, t: f64) -> f64 {
        let &Self { rate, vi, vf } = self;
        (vi - rate * t).max(vf)
    }
}

/// v(t) = v<sub>f</sub> + (v<sub>i</sub> - v<sub>f</sub>) * e<sup>-rt</sup>
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Exponential {
    rate: f64,
    vi: f64,
    vf: f64,
}

impl Exponential {
    pub fn new(rate: f64, vi: f64, vf: f64) -> Result<Self> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Exponential {
    fn evaluate(&self, t: f64) -> f64 {
        let &Self { rate, vi, vf } = self;
        vf + (vi - vf) * (-rate * t).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_functional() {
        assert!(validate(1.0, 1.0, 0.0).is_ok());
        assert!(validate(1.0, -1.0, 0.0).is_err());
        assert!(validate(-1.0, 1.0, 0.0).is_err());
        assert!(validate(-1.0, -1.0, 0.0).is_ok());
        assert!(validate(0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn constant_decay() {
        let x = Constant::new(0.3);
        assert_eq!(x.evaluate(0.0), 0.3);
        assert_eq!(x.evaluate(1e6), 0.3);
    }

    #[test]
    fn linear_decay() {
        let x = Linear::new(0.5, 2.0, 0.5).unwrap();
        assert_eq!(x.evaluate(0.0), 2.0);
        assert_eq!(x.evaluate(1.0), 1.5);
        assert_eq!(x.evaluate(10.0), 0.5);
    }

    #[test]
    fn linear_over_steps() {
        let x = Linear::over(500, 1.0, 0.0).unwrap();
        assert_eq!(x.evaluate(0.0), 1.0);
        assert!((x.evaluate(250.0) - 0.5).abs() < 1e-12);
        assert!(x.evaluate(499.0) > 0.0);
        assert!(x.evaluate(500.0).abs() < 1e-12);
        assert_eq!(x.evaluate(600.0), 0.0);
        assert!(Linear::over(10, 0.0, 0.0).is_err());
    }

    #[test]
    fn exponential_decay() {
        let x = Exponential::new(2.0, 2.0, 0.5).unwrap();
        assert_eq!(x.evaluate(0.0), 2.0);
        assert_eq!(x.evaluate(1.0), 0.5 + 1.5 * f64::exp(-2.0));
    }

    #[test]
    fn boxed_decay() {
        let x: Box<dyn Decay> = Box::new(Constant::new(0.25));
        assert_eq!(x.evaluate(3.0), 0.25);
    }
}

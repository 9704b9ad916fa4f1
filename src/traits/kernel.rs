//! Kernels
use crate::types::Point;

pub trait IntegrandValue: Copy + Send + Sync {
    //! Value of a function that can be integrated over a triangle
    /// Zero
    fn zero() -> Self;
    /// Add `scale * other` to self
    fn add_scaled(&mut self, other: &Self, scale: f64);
    /// Size of the value, used for error estimates
    fn magnitude(&self) -> f64;
    /// Size of the difference between two values
    fn distance(&self, other: &Self) -> f64;
}

impl IntegrandValue for f64 {
    fn zero() -> Self {
        0.0
    }
    fn add_scaled(&mut self, other: &Self, scale: f64) {
        *self += scale * other;
    }
    fn magnitude(&self) -> f64 {
        self.abs()
    }
    fn distance(&self, other: &Self) -> f64 {
        (self - other).abs()
    }
}

impl IntegrandValue for [f64; 3] {
    fn zero() -> Self {
        [0.0; 3]
    }
    fn add_scaled(&mut self, other: &Self, scale: f64) {
        for (s, o) in self.iter_mut().zip(other) {
            *s += scale * o;
        }
    }
    fn magnitude(&self) -> f64 {
        self.iter().map(|x| x * x).sum::<f64>().sqrt()
    }
    fn distance(&self, other: &Self) -> f64 {
        self.iter()
            .zip(other)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

pub trait AnalyticKernel: Sync {
    //! A closed form integral over a fixed triangle, seen as a function of an observation point
    /// Value type
    type Output: IntegrandValue;

    /// Evaluate the kernel at a point
    fn evaluate(&self, point: &Point) -> Self::Output;
}

/// Density of the zero-mean normal distribution with standard deviation `sigma`
///
/// Used to sample Gaussian smoothing weights. The density is returned as-is,
/// without renormalising a truncated set of samples to unit sum.
pub fn normal_density(x: f64, sigma: f64) -> f64 {
    let variance = sigma * sigma;
    (-0.5 * x * x / variance).exp() / (sigma * (2.0 * std::f64::consts::PI).sqrt())
}

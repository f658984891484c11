use num::Num;

/// Dot product of two dense vectors, accumulated in f64.
///
/// # Arguments
/// * `a` - first vector
/// * `b` - second vector, must be the same length
#[inline]
pub fn dot<N>(a: &[N], b: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    debug_assert_eq!(
        a.len(),
        b.len(),
        "Vectors must be of the same length to compute dot product."
    );
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| x.into() * y.into())
        .sum()
}

/// Squared Euclidean norm, accumulated in f64.
#[inline]
pub fn norm_sq<N>(a: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    a.iter()
        .map(|&x| {
            let v: f64 = x.into();
            v * v
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot() {
        let a = [1.0f64, 2.0, 3.0];
        let b = [4.0f64, 5.0, 6.0];
        assert_eq!(dot(&a, &b), 32.0);
    }

    #[test]
    fn test_norm_sq() {
        let a = [3.0f64, 4.0];
        assert_eq!(norm_sq(&a), 25.0);
    }
}

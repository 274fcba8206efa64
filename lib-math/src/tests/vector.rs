use crate::*;

#[test]
fn test_magnitude_at_rest() {
    // A phone lying flat only measures gravity.
    let v = Vector { x: 0.0, y: 0.0, z: 1.0 };
    assert!(approx_eq(v.magnitude(), 1.0, 1e-12));
}

#[test]
fn test_magnitude_arbitrary_vector() {
    let v = Vector { x: 3.0, y: 4.0, z: 12.0 };
    assert!(approx_eq(v.magnitude(), 13.0, 1e-12));
}

#[test]
fn test_dot_product_orthogonal_vectors() {
    let v1 = Vector { x: 1.0, y: 0.0, z: 0.0 };
    let v2 = Vector { x: 0.0, y: 1.0, z: 0.0 };
    assert_eq!(v1.dot(&v2), 0.0);
}

#[test]
fn test_magnitude_ignores_sign() {
    let v = Vector::new(-0.6, 0.0, -0.8);
    assert!(approx_eq(v.magnitude(), 1.0, 1e-12));
}

/// Three axis sensor reading, e.g. an accelerometer sample in g.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector
{
    pub x: f64, 
    pub y: f64,
    pub z: f64,
}

impl Vector 
{
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector { x, y, z }
    }

    /// Calculate the length/magnitude of the vector
    /// 
    pub fn magnitude(&self) -> f64 {
        libm::sqrt(self.dot(self))
    }

    /// Take the dot product of two vectors.
    /// 
    pub fn dot(&self, other: &Vector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

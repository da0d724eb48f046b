pub use self::matrix::Matrix;
pub use self::vector::Vector;

mod matrix;
mod vector;

pub type Value = f32;

use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

use super::Value;

/// A dense runtime-length vector. Binary operations require both operands
/// to have the same length and return `ShapeMismatch` otherwise.
#[repr(transparent)]
#[derive(Clone, Deserialize, PartialEq, Serialize)]
pub struct Vector(Vec<Value>);

macro_rules! elementwise_impl {
    ($op_method:ident, $op:tt) => {
        pub fn $op_method(&self, rhs: &Self) -> Result<Self, NetworkError> {
            self.check_len(rhs)?;
            Ok(Self(self.0.iter().zip(&rhs.0).map(|(a, b)| a $op b).collect()))
        }
    };
}

impl Vector {
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// A vector of `len` zeros with a single one at `hot`.
    pub fn one_hot(len: usize, hot: usize) -> Result<Self, NetworkError> {
        if hot >= len {
            return Err(NetworkError::ShapeMismatch {
                expected: len,
                actual: hot,
            });
        }

        let mut values = vec![0.0; len];
        values[hot] = 1.0;
        Ok(Self(values))
    }

    pub fn dot(&self, rhs: &Self) -> Result<Value, NetworkError> {
        self.check_len(rhs)?;
        Ok(self.0.iter().zip(&rhs.0).map(|(a, b)| a * b).sum())
    }

    elementwise_impl!(add, +);
    elementwise_impl!(sub, -);
    elementwise_impl!(hadamard, *);

    /// Applies `f` to every entry, returning a new vector.
    pub fn map(&self, f: impl Fn(Value) -> Value) -> Self {
        Self(self.0.iter().map(|&x| f(x)).collect())
    }

    pub fn add_assign(&mut self, rhs: &Self) -> Result<(), NetworkError> {
        self.check_len(rhs)?;
        for (a, b) in self.0.iter_mut().zip(&rhs.0) {
            *a += b;
        }
        Ok(())
    }

    pub fn scaled_sub_assign(&mut self, rhs: &Self, scale: Value) -> Result<(), NetworkError> {
        self.check_len(rhs)?;
        for (a, b) in self.0.iter_mut().zip(&rhs.0) {
            *a -= b * scale;
        }
        Ok(())
    }

    fn check_len(&self, rhs: &Self) -> Result<(), NetworkError> {
        if self.0.len() != rhs.0.len() {
            return Err(NetworkError::ShapeMismatch {
                expected: self.0.len(),
                actual: rhs.0.len(),
            });
        }
        Ok(())
    }
}

impl Deref for Vector {
    type Target = [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Vector {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Value>> for Vector {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (x, value) in self.0.iter().enumerate() {
            value.fmt(f)?;
            if x < self.0.len() - 1 {
                write!(f, " ")?;
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot() {
        let a = Vector::from_values(vec![1.0, 2.0, 3.0]);
        let b = Vector::from_values(vec![4.0, -5.0, 6.0]);
        assert_eq!(a.dot(&b).unwrap(), 12.0);
    }

    #[test]
    fn elementwise() {
        let a = Vector::from_values(vec![1.0, 2.0, 3.0]);
        let b = Vector::from_values(vec![4.0, -5.0, 6.0]);
        assert_eq!(a.add(&b).unwrap(), Vector::from_values(vec![5.0, -3.0, 9.0]));
        assert_eq!(
            a.sub(&b).unwrap(),
            Vector::from_values(vec![-3.0, 7.0, -3.0])
        );
        assert_eq!(
            a.hadamard(&b).unwrap(),
            Vector::from_values(vec![4.0, -10.0, 18.0])
        );
    }

    #[test]
    fn mismatched_lengths() {
        let a = Vector::zeros(3);
        let b = Vector::zeros(2);
        assert_eq!(
            a.add(&b),
            Err(NetworkError::ShapeMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn one_hot() {
        let v = Vector::one_hot(4, 2).unwrap();
        assert_eq!(v, Vector::from_values(vec![0.0, 0.0, 1.0, 0.0]));
        assert!(Vector::one_hot(4, 4).is_err());
    }

    #[test]
    fn accumulate() {
        let mut a = Vector::from_values(vec![1.0, 2.0]);
        a.add_assign(&Vector::from_values(vec![0.5, 0.5])).unwrap();
        assert_eq!(a, Vector::from_values(vec![1.5, 2.5]));

        a.scaled_sub_assign(&Vector::from_values(vec![1.0, 1.0]), 0.5)
            .unwrap();
        assert_eq!(a, Vector::from_values(vec![1.0, 2.0]));
    }
}

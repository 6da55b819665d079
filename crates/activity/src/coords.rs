use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tripoint {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Tripoint {
    pub const ZERO: Tripoint = Tripoint { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl Add for Tripoint {
    type Output = Tripoint;

    fn add(self, rhs: Tripoint) -> Tripoint {
        Tripoint {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Tripoint {
    type Output = Tripoint;

    fn sub(self, rhs: Tripoint) -> Tripoint {
        Tripoint {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl fmt::Display for Tripoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_arithmetic_round_trips() {
        let origin = Tripoint::new(5, 5, 0);
        let offset = Tripoint::new(-1, 2, 1);
        assert_eq!(origin + offset, Tripoint::new(4, 7, 1));
        assert_eq!((origin + offset) - offset, origin);
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(Tripoint::new(1, -2, 0).to_string(), "(1,-2,0)");
    }
}

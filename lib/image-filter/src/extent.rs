/// Rectangular bounds of the pixel content a recipe defines.
///
/// Coordinates are in source pixel space. The origin may be negative when a
/// filter grows its output past the source bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Smallest extent covering both corner points. `right`/`bottom` are exclusive.
    /// Bounds outside the `i32` coordinate space are clamped to it.
    pub fn from_bounds(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        let clamp = |v: i64| v.clamp(i32::MIN as i64, i32::MAX as i64);
        let (left, top) = (clamp(left), clamp(top));
        let width = (clamp(right) - left).clamp(0, u32::MAX as i64);
        let height = (clamp(bottom) - top).clamp(0, u32::MAX as i64);

        Self::new(left as i32, top as i32, width as u32, height as u32)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn left(&self) -> i64 {
        self.x as i64
    }

    pub fn top(&self) -> i64 {
        self.y as i64
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.left() && x < self.right() && y >= self.top() && y < self.bottom()
    }

    pub fn contains_extent(&self, other: &Extent) -> bool {
        other.is_empty()
            || (other.left() >= self.left()
                && other.top() >= self.top()
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }

    pub fn union(&self, other: &Extent) -> Extent {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        Self::from_bounds(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Grow by `amount` pixels on every side.
    pub fn outset(&self, amount: u32) -> Extent {
        if self.is_empty() {
            return *self;
        }

        let amount = amount as i64;
        Self::from_bounds(
            self.left() - amount,
            self.top() - amount,
            self.right() + amount,
            self.bottom() + amount,
        )
    }

    /// Shrink by `amount` pixels on every side, collapsing to empty if needed.
    pub fn inset(&self, amount: u32) -> Extent {
        let amount = amount as i64;
        let (left, top) = (self.left() + amount, self.top() + amount);
        let (right, bottom) = (self.right() - amount, self.bottom() - amount);

        if right <= left || bottom <= top {
            return Self::from_bounds(left, top, left, top);
        }
        Self::from_bounds(left, top, right, bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_covers_both() {
        let a = Extent::new(0, 0, 100, 100);
        let b = Extent::new(-50, 20, 60, 200);
        let u = a.union(&b);

        assert_eq!(u, Extent::new(-50, 0, 150, 220));
        assert!(u.contains_extent(&a));
        assert!(u.contains_extent(&b));
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = Extent::new(3, 4, 10, 10);
        assert_eq!(a.union(&Extent::default()), a);
        assert_eq!(Extent::default().union(&a), a);
    }

    #[test]
    fn test_outset_inset() {
        let a = Extent::from_size(10, 10);
        let grown = a.outset(5);
        assert_eq!(grown, Extent::new(-5, -5, 20, 20));
        assert_eq!(grown.inset(5), a);
        assert!(a.inset(5).is_empty());
    }

    #[test]
    fn test_saturated_bounds_are_clamped() {
        let e = Extent::from_bounds(i64::MIN, i64::MIN, i64::MAX, i64::MAX);
        assert_eq!(e, Extent::new(i32::MIN, i32::MIN, u32::MAX, u32::MAX));

        let e = Extent::from_bounds(i64::MAX, 0, i64::MAX, 10);
        assert_eq!(e, Extent::new(i32::MAX, 0, 0, 10));
        assert!(e.is_empty());

        let huge = Extent::from_size(10, 10).outset(u32::MAX);
        assert!(huge.contains_extent(&Extent::from_size(10, 10)));
    }

    #[test]
    fn test_contains_and_center() {
        let a = Extent::new(-2, -2, 4, 4);
        assert!(a.contains(-2, -2));
        assert!(a.contains(1, 1));
        assert!(!a.contains(2, 0));
        assert_eq!(a.center(), (0.0, 0.0));
        assert_eq!(a.area(), 16);
    }
}

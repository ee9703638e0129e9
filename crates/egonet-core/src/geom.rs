pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

/// True when `p` lies inside (or on) the circle at `center` with `radius`.
pub fn circle_contains(center: Point, radius: f64, p: Point) -> bool {
    (p - center).square_length() <= radius * radius
}

use geo_types::{coord, Point, Rect};

/// Great circle distance in km between two points (x = longitude, y = latitude).
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    const R: f64 = 6372.8; // Radius of the earth in km

    let d_lat = (p2.y() - p1.y()).to_radians();
    let d_lon = (p2.x() - p1.x()).to_radians();
    let lat1 = p1.y().to_radians();
    let lat2 = p2.y().to_radians();

    let a = f64::sin(d_lat / 2.).powi(2)
        + f64::cos(lat1) * f64::cos(lat2) * f64::sin(d_lon / 2.).powi(2);
    let c = 2. * f64::asin(f64::sqrt(a));

    R * c
}

/// Straight linear interpolation in lat/lon space. `fraction` 0 gives `from`, 1 gives `to`.
pub fn interpolate(from: Point, to: Point, fraction: f64) -> Point {
    Point::new(
        from.x() + (to.x() - from.x()) * fraction,
        from.y() + (to.y() - from.y()) * fraction,
    )
}

/// Smallest rectangle containing every point, `None` for no points.
pub fn bounding_rect(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    let mut points = points.into_iter();
    let first = points.next()?;

    let (min, max) = points.fold((first, first), |(min, max), p| {
        (
            Point::new(min.x().min(p.x()), min.y().min(p.y())),
            Point::new(max.x().max(p.x()), max.y().max(p.y())),
        )
    });

    Some(Rect::new(
        coord! { x: min.x(), y: min.y() },
        coord! { x: max.x(), y: max.y() },
    ))
}

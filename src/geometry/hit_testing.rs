use super::Point;
use crate::shape::Shape;

/// Winding number of the closed path through `path` around `(px, py)`.
///
/// The path is closed by an implicit edge from the last vertex back to the
/// first, the same way it is built for painting.
pub fn winding_number(path: &[Point], px: f64, py: f64) -> i32 {
    if path.len() < 3 {
        return 0;
    }

    let mut winding = 0;
    let mut previous = path[path.len() - 1];

    for &current in path {
        let (x0, y0) = (previous.x as f64, previous.y as f64);
        let (x1, y1) = (current.x as f64, current.y as f64);

        // Positive when (px, py) is left of the edge going from previous to current.
        let side = (x1 - x0) * (py - y0) - (px - x0) * (y1 - y0);

        if y0 <= py {
            if y1 > py && side > 0.0 {
                winding += 1;
            }
        } else if y1 <= py && side < 0.0 {
            winding -= 1;
        }

        previous = current;
    }

    winding
}

/// Non-zero fill rule test at an arbitrary sample position.
pub fn contains_sample(path: &[Point], px: f64, py: f64) -> bool {
    winding_number(path, px, py) != 0
}

/// Whether `point` lies inside the closed polygon through `path` or on its outline.
pub fn polygon_contains(path: &[Point], point: Point) -> bool {
    if path.len() < 3 {
        return false;
    }
    on_outline(path, point) || contains_sample(path, point.x as f64, point.y as f64)
}

/// Whether `point` lies on any edge of the closed path, vertices included.
fn on_outline(path: &[Point], point: Point) -> bool {
    let mut previous = path[path.len() - 1];
    for &current in path {
        if on_segment(previous, current, point) {
            return true;
        }
        previous = current;
    }
    false
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    let cross = (b.x as i64 - a.x as i64) * (p.y as i64 - a.y as i64)
        - (p.x as i64 - a.x as i64) * (b.y as i64 - a.y as i64);

    cross == 0
        && (a.x.min(b.x)..=a.x.max(b.x)).contains(&p.x)
        && (a.y.min(b.y)..=a.y.max(b.y)).contains(&p.y)
}

/// Index of the first shape, in collection order, whose closed path contains `point`.
pub fn hit_test(shapes: &[Shape], point: Point) -> Option<usize> {
    shapes
        .iter()
        .position(|shape| polygon_contains(shape.points(), point))
}

//! Normalized polygon text encoding.
//!
//! One line per polygon: `<class> <x1> <y1> <x2> <y2> ...` where every
//! coordinate is the pixel value divided by the surface width or height,
//! printed with six decimals. Lines are joined with [`SEPARATOR`].

use thiserror::Error;

use crate::geometry::Point;

pub const SEPARATOR: &str = " ;";
pub const DECIMALS: usize = 6;

#[derive(Error, Debug, PartialEq)]
pub enum EncodingError {
    #[error("Line {line}: missing class index")]
    MissingClass { line: usize },

    #[error("Line {line}: invalid class index {token:?}")]
    InvalidClass { line: usize, token: String },

    #[error("Line {line}: invalid coordinate {token:?}")]
    InvalidCoordinate { line: usize, token: String },

    #[error("Line {line}: odd number of coordinates ({count})")]
    UnpairedCoordinate { line: usize, count: usize },

    #[error("Line {line}: polygon needs at least 3 vertices, found {count}")]
    TooFewVertices { line: usize, count: usize },
}

/// Encode one polygon. Fractions are not clamped to `[0, 1]`.
pub fn encode_line(class_index: u32, points: &[Point], width: u32, height: u32) -> String {
    let (w, h) = (width as f64, height as f64);
    let mut line = class_index.to_string();

    for point in points {
        line.push_str(&format!(
            " {:.prec$} {:.prec$}",
            point.x as f64 / w,
            point.y as f64 / h,
            prec = DECIMALS
        ));
    }

    line
}

/// Join already-encoded lines into the mask blob.
pub fn join<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Encode a whole collection of polygons.
pub fn encode<'a, I>(class_index: u32, polygons: I, width: u32, height: u32) -> String
where
    I: IntoIterator<Item = &'a [Point]>,
{
    let lines: Vec<String> = polygons
        .into_iter()
        .map(|points| encode_line(class_index, points, width, height))
        .collect();
    join(&lines)
}

/// A polygon parsed back out of the mask blob.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPolygon {
    pub class_index: u32,
    /// Fractional `(x, y)` pairs in line order.
    pub coords: Vec<(f64, f64)>,
}

impl EncodedPolygon {
    /// Map the fractions back onto a surface, rounding to whole pixels.
    pub fn to_points(&self, width: u32, height: u32) -> Vec<Point> {
        self.coords
            .iter()
            .map(|&(fx, fy)| {
                Point::new(
                    (fx * width as f64).round() as i32,
                    (fy * height as f64).round() as i32,
                )
            })
            .collect()
    }
}

/// Parse a mask blob. An empty (or all-whitespace) blob holds no polygons.
pub fn decode(text: &str) -> Result<Vec<EncodedPolygon>, EncodingError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    text.split(SEPARATOR)
        .enumerate()
        .map(|(line, raw)| decode_line(line, raw))
        .collect()
}

fn decode_line(line: usize, raw: &str) -> Result<EncodedPolygon, EncodingError> {
    let mut tokens = raw.split_whitespace();

    let class_token = tokens.next().ok_or(EncodingError::MissingClass { line })?;
    let class_index = class_token
        .parse::<u32>()
        .map_err(|_| EncodingError::InvalidClass {
            line,
            token: class_token.to_owned(),
        })?;

    let values = tokens
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| EncodingError::InvalidCoordinate {
                    line,
                    token: token.to_owned(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() % 2 != 0 {
        return Err(EncodingError::UnpairedCoordinate {
            line,
            count: values.len(),
        });
    }

    let coords: Vec<(f64, f64)> = values.chunks_exact(2).map(|c| (c[0], c[1])).collect();
    if coords.len() < 3 {
        return Err(EncodingError::TooFewVertices {
            line,
            count: coords.len(),
        });
    }

    Ok(EncodedPolygon {
        class_index,
        coords,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Point> {
        vec![Point::new(10, 10), Point::new(110, 10), Point::new(60, 110)]
    }

    #[test]
    fn encodes_triangle_on_square_surface() {
        assert_eq!(
            encode_line(0, &triangle(), 200, 200),
            "0 0.050000 0.050000 0.550000 0.050000 0.300000 0.550000"
        );
    }

    #[test]
    fn uses_width_for_x_and_height_for_y() {
        let points = [Point::new(400, 150), Point::new(0, 0), Point::new(800, 300)];
        assert_eq!(
            encode_line(0, &points, 800, 300),
            "0 0.500000 0.500000 0.000000 0.000000 1.000000 1.000000"
        );
    }

    #[test]
    fn out_of_bounds_fractions_are_kept() {
        let points = [Point::new(-20, 0), Point::new(300, 0), Point::new(0, 250)];
        assert_eq!(
            encode_line(0, &points, 200, 200),
            "0 -0.100000 0.000000 1.500000 0.000000 0.000000 1.250000"
        );
    }

    #[test]
    fn joins_with_separator() {
        assert_eq!(join(&["0 a", "0 b", "0 c"]), "0 a ;0 b ;0 c");
        assert_eq!(join::<&str>(&[]), "");
        assert_eq!(join(&["only"]), "only");
    }

    #[test]
    fn encode_matches_line_by_line_join() {
        let a = triangle();
        let b = vec![Point::new(0, 0), Point::new(20, 0), Point::new(20, 20)];
        let blob = encode(0, [a.as_slice(), b.as_slice()], 200, 200);

        let expected = format!(
            "{}{}{}",
            encode_line(0, &a, 200, 200),
            SEPARATOR,
            encode_line(0, &b, 200, 200)
        );
        assert_eq!(blob, expected);
    }

    #[test]
    fn decode_recovers_pixels() {
        let blob = encode(0, [triangle().as_slice()], 200, 200);
        let polygons = decode(&blob).unwrap();

        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].class_index, 0);
        assert_eq!(polygons[0].to_points(200, 200), triangle());
    }

    #[test]
    fn decode_empty_blob() {
        assert_eq!(decode("").unwrap(), Vec::new());
        assert_eq!(decode("   ").unwrap(), Vec::new());
    }

    #[test]
    fn decode_rejects_malformed_lines() {
        assert_eq!(
            decode("0 0.1 0.1 0.2"),
            Err(EncodingError::UnpairedCoordinate { line: 0, count: 3 })
        );
        assert_eq!(
            decode("0 0.1 0.1 0.2 0.2"),
            Err(EncodingError::TooFewVertices { line: 0, count: 2 })
        );
        assert_eq!(
            decode("0 0.1 0.1 0.2 0.2 0.3 0.3 ;x 0.1 0.1 0.2 0.2 0.3 0.3"),
            Err(EncodingError::InvalidClass {
                line: 1,
                token: "x".to_owned()
            })
        );
        assert!(matches!(
            decode("0 0.1 abc 0.2 0.2 0.3 0.3"),
            Err(EncodingError::InvalidCoordinate { line: 0, .. })
        ));
        assert_eq!(decode("0 0 0 1 0 1 1 ; "), Err(EncodingError::MissingClass { line: 1 }));
    }
}

//! Smooth boundary paths for stacked layers.
//!
//! Layers are drawn with a uniform cubic B-spline ("basis") through the band
//! edges: the curve starts and ends on the first/last point but otherwise only
//! approximates the data, trading exactness for smoothness. Points are taken
//! in surface coordinates, so uneven timestamp spacing is already baked into
//! the x positions.

use std::fmt::Write as _;

use egui::{Pos2, pos2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Pos2),
    LineTo(Pos2),
    /// Cubic Bezier: two control points, then the end point.
    CubicTo(Pos2, Pos2, Pos2),
    Close,
}

/// Ordered list of drawing commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub commands: Vec<PathCommand>,
}

impl Path {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// SVG path data (`d` attribute).
    ///
    /// ```
    /// # use streamgraph::data::curve::basis;
    /// # use egui::pos2;
    /// let p = basis(&[pos2(0.0, 0.0), pos2(10.0, 5.0)]);
    /// assert_eq!(p.to_svg_data(), "M0.00,0.00L10.00,5.00");
    /// ```
    pub fn to_svg_data(&self) -> String {
        let mut d = String::new();
        for cmd in &self.commands {
            // Writing to a String cannot fail.
            let _ = match cmd {
                PathCommand::MoveTo(p) => write!(d, "M{:.2},{:.2}", p.x, p.y),
                PathCommand::LineTo(p) => write!(d, "L{:.2},{:.2}", p.x, p.y),
                PathCommand::CubicTo(c1, c2, p) => write!(
                    d,
                    "C{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
                    c1.x, c1.y, c2.x, c2.y, p.x, p.y
                ),
                PathCommand::Close => write!(d, "Z"),
            };
        }
        d
    }

    /// Approximate the path by a polyline, `samples` points per cubic segment.
    pub fn flatten(&self, samples: usize) -> Vec<Pos2> {
        let samples = samples.max(1);
        let mut out: Vec<Pos2> = Vec::new();
        let mut cursor = Pos2::ZERO;
        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => {
                    out.push(p);
                    cursor = p;
                }
                PathCommand::CubicTo(c1, c2, p) => {
                    for k in 1..=samples {
                        let t = k as f32 / samples as f32;
                        out.push(cubic_point(cursor, c1, c2, p, t));
                    }
                    cursor = p;
                }
                PathCommand::Close => {}
            }
        }
        out
    }
}

fn cubic_point(p0: Pos2, c1: Pos2, c2: Pos2, p1: Pos2, t: f32) -> Pos2 {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;
    pos2(
        a * p0.x + b * c1.x + c * c2.x + d * p1.x,
        a * p0.y + b * c1.y + c * c2.y + d * p1.y,
    )
}

fn lerp3(a: Pos2, wa: f32, b: Pos2, wb: f32, c: Pos2, wc: f32, div: f32) -> Pos2 {
    pos2(
        (wa * a.x + wb * b.x + wc * c.x) / div,
        (wa * a.y + wb * b.y + wc * c.y) / div,
    )
}

/// Bezier segment of the B-spline between knots `a` and `b`, looking ahead to `c`.
fn basis_segment(a: Pos2, b: Pos2, c: Pos2) -> PathCommand {
    PathCommand::CubicTo(
        lerp3(a, 2.0, b, 1.0, c, 0.0, 3.0),
        lerp3(a, 1.0, b, 2.0, c, 0.0, 3.0),
        lerp3(a, 1.0, b, 4.0, c, 1.0, 6.0),
    )
}

/// Append a basis curve through `points`.
///
/// With `connect` the first point is joined by a straight line from the
/// current position instead of starting a new sub-path.
fn push_basis(out: &mut Vec<PathCommand>, points: &[Pos2], connect: bool) {
    let Some(&first) = points.first() else {
        return;
    };
    out.push(if connect {
        PathCommand::LineTo(first)
    } else {
        PathCommand::MoveTo(first)
    });
    match points.len() {
        1 => {}
        2 => out.push(PathCommand::LineTo(points[1])),
        n => {
            out.push(PathCommand::LineTo(lerp3(
                points[0], 5.0, points[1], 1.0, points[1], 0.0, 6.0,
            )));
            for w in points.windows(3) {
                out.push(basis_segment(w[0], w[1], w[2]));
            }
            let last = points[n - 1];
            out.push(basis_segment(points[n - 2], last, last));
            out.push(PathCommand::LineTo(last));
        }
    }
}

/// Open basis curve through `points`.
pub fn basis(points: &[Pos2]) -> Path {
    let mut commands = Vec::new();
    push_basis(&mut commands, points, false);
    Path { commands }
}

/// Closed region between an upper and a lower edge, plus flattened edges for
/// filling and hit testing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaShape {
    /// Upper edge forward, lower edge backward, closed.
    pub path: Path,
    /// Flattened upper edge, left to right.
    pub upper: Vec<Pos2>,
    /// Flattened lower edge, left to right, sample-aligned with `upper`.
    pub lower: Vec<Pos2>,
}

impl AreaShape {
    /// Closed outline: upper edge forward followed by lower edge backward.
    pub fn outline(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.upper.iter().chain(self.lower.iter().rev()).copied()
    }

    /// Even-odd point-in-polygon test against the flattened outline.
    pub fn contains(&self, p: Pos2) -> bool {
        let poly: Vec<Pos2> = self.outline().collect();
        if poly.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = poly.len() - 1;
        for i in 0..poly.len() {
            let (a, b) = (poly[i], poly[j]);
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// Build the smoothed area between `upper` and `lower`.
///
/// Both edges must have the same length and share x positions point for point
/// (which stacked bands always do).
pub fn area(upper: &[Pos2], lower: &[Pos2], samples: usize) -> AreaShape {
    debug_assert_eq!(upper.len(), lower.len());
    let mut commands = Vec::new();
    push_basis(&mut commands, upper, false);
    let reversed: Vec<Pos2> = lower.iter().rev().copied().collect();
    push_basis(&mut commands, &reversed, true);
    if !commands.is_empty() {
        commands.push(PathCommand::Close);
    }
    AreaShape {
        path: Path { commands },
        upper: basis(upper).flatten(samples),
        lower: basis(lower).flatten(samples),
    }
}

/// Tessellation of parametric primitives into edges
///
/// Every generator works in the untransformed frame and appends to the given
/// [`EdgeList`]. Step counts are validated before anything is appended, so a
/// rejected primitive leaves the list untouched.
use std::f64::consts::{PI, TAU};

use nalgebra::{Matrix4, Matrix4x3, Point3, RowVector4};

use crate::error::{Error, Result};
use crate::geometry::EdgeList;

/// Fewest steps a curve accepts: one step is the chord from t=0 to t=1
pub const MIN_CURVE_STEPS: usize = 1;
/// Fewest steps a circle, sphere or torus accepts
pub const MIN_SURFACE_STEPS: usize = 2;
/// Most steps any primitive accepts. Spheres and tori grow with the square
/// of the step count, so this keeps one primitive to a few million edges.
pub const MAX_STEPS: usize = 1000;

/// Cubic curve flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    /// Inputs are (position0, position1, tangent0, tangent1)
    Hermite,
    /// Inputs are the four control points
    Bezier,
}

impl CurveKind {
    /// Basis matrix turning the four inputs into cubic coefficients (a, b, c, d)
    /// of `a t³ + b t² + c t + d`.
    fn basis(self) -> Matrix4<f64> {
        match self {
            CurveKind::Hermite => Matrix4::new(
                2.0, -2.0, 1.0, 1.0, //
                -3.0, 3.0, -2.0, -1.0, //
                0.0, 0.0, 1.0, 0.0, //
                1.0, 0.0, 0.0, 0.0,
            ),
            CurveKind::Bezier => Matrix4::new(
                -1.0, 3.0, -3.0, 1.0, //
                3.0, -6.0, 3.0, 0.0, //
                -3.0, 3.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, 0.0,
            ),
        }
    }
}

fn check_steps(steps: usize, min: usize) -> Result<()> {
    if steps < min || steps > MAX_STEPS {
        return Err(Error::InvalidTessellationStep {
            steps,
            min,
            max: MAX_STEPS,
        });
    }
    Ok(())
}

pub fn add_line(edges: &mut EdgeList, start: Point3<f64>, end: Point3<f64>) {
    edges.add_edge(start, end);
}

/// Closed polygon of `steps` edges in the plane z = center.z.
///
/// The edge count is always `steps`. With two steps the closing edge runs
/// back over the first one; the two-point collapse `add_loop` applies to
/// sphere and torus rings does not apply here.
pub fn add_circle(edges: &mut EdgeList, center: Point3<f64>, radius: f64, steps: usize) -> Result<()> {
    check_steps(steps, MIN_SURFACE_STEPS)?;

    let points: Vec<Point3<f64>> = (0..steps)
        .map(|i| {
            let theta = TAU * i as f64 / steps as f64;
            Point3::new(
                center.x + radius * theta.cos(),
                center.y + radius * theta.sin(),
                center.z,
            )
        })
        .collect();

    edges.add_polyline(&points);
    edges.add_edge(points[steps - 1], points[0]);
    Ok(())
}

/// Open polyline of `steps` edges sampled at t = k / steps
pub fn add_curve(
    edges: &mut EdgeList,
    inputs: [Point3<f64>; 4],
    steps: usize,
    kind: CurveKind,
) -> Result<()> {
    check_steps(steps, MIN_CURVE_STEPS)?;

    let geometry = Matrix4x3::from_fn(|row, col| inputs[row][col]);
    let coefs = kind.basis() * geometry;

    let points: Vec<Point3<f64>> = (0..=steps)
        .map(|k| {
            let t = k as f64 / steps as f64;
            let p = RowVector4::new(t * t * t, t * t, t, 1.0) * coefs;
            Point3::new(p[0], p[1], p[2])
        })
        .collect();

    edges.add_polyline(&points);
    Ok(())
}

/// Axis-aligned box with one corner at `corner`.
///
/// Width grows along +x, height along -y and depth along -z.
pub fn add_box(edges: &mut EdgeList, corner: Point3<f64>, width: f64, height: f64, depth: f64) {
    let (x0, y0, z0) = (corner.x, corner.y, corner.z);
    let (x1, y1, z1) = (x0 + width, y0 - height, z0 - depth);

    let face = |z: f64| {
        [
            Point3::new(x0, y0, z),
            Point3::new(x1, y0, z),
            Point3::new(x1, y1, z),
            Point3::new(x0, y1, z),
        ]
    };
    let front = face(z0);
    let back = face(z1);

    edges.add_loop(&front);
    edges.add_loop(&back);
    for (f, b) in front.iter().zip(back.iter()) {
        edges.add_edge(*f, *b);
    }
}

/// Latitude/longitude wireframe sphere.
///
/// The polar angle runs from +x to -x and the azimuth rotates about the x
/// axis. Both poles are single points: every meridian starts at one and ends
/// at the other, and only interior latitudes get rings.
pub fn add_sphere(edges: &mut EdgeList, center: Point3<f64>, radius: f64, steps: usize) -> Result<()> {
    check_steps(steps, MIN_SURFACE_STEPS)?;

    let point = |lat: usize, lon: usize| {
        let phi = PI * lat as f64 / steps as f64;
        let theta = TAU * lon as f64 / steps as f64;
        Point3::new(
            center.x + radius * phi.cos(),
            center.y + radius * phi.sin() * theta.cos(),
            center.z + radius * phi.sin() * theta.sin(),
        )
    };
    let north = Point3::new(center.x + radius, center.y, center.z);
    let south = Point3::new(center.x - radius, center.y, center.z);

    for lat in 1..steps {
        let ring: Vec<Point3<f64>> = (0..steps).map(|lon| point(lat, lon)).collect();
        edges.add_loop(&ring);
    }

    for lon in 0..steps {
        let mut meridian = Vec::with_capacity(steps + 1);
        meridian.push(north);
        meridian.extend((1..steps).map(|lat| point(lat, lon)));
        meridian.push(south);
        edges.add_polyline(&meridian);
    }
    Ok(())
}

/// Wireframe torus swept around the y axis.
///
/// `tube_radius` is the cross-section radius and `ring_radius` the distance
/// from the torus center to the center of the tube.
pub fn add_torus(
    edges: &mut EdgeList,
    center: Point3<f64>,
    tube_radius: f64,
    ring_radius: f64,
    steps: usize,
) -> Result<()> {
    check_steps(steps, MIN_SURFACE_STEPS)?;

    let grid: Vec<Vec<Point3<f64>>> = (0..steps)
        .map(|ring| {
            let phi = TAU * ring as f64 / steps as f64;
            (0..steps)
                .map(|tube| {
                    let theta = TAU * tube as f64 / steps as f64;
                    let reach = tube_radius * theta.cos() + ring_radius;
                    Point3::new(
                        center.x + phi.cos() * reach,
                        center.y + tube_radius * theta.sin(),
                        center.z - phi.sin() * reach,
                    )
                })
                .collect()
        })
        .collect();

    for section in &grid {
        edges.add_loop(section);
    }
    for tube in 0..steps {
        let ring: Vec<Point3<f64>> = grid.iter().map(|section| section[tube]).collect();
        edges.add_loop(&ring);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Edge;

    const EPS: f64 = 1e-9;

    fn close(a: Point3<f64>, b: Point3<f64>) -> bool {
        (a - b).norm() < EPS
    }

    fn assert_no_degenerate_or_duplicate(edges: &EdgeList) {
        let all: Vec<&Edge> = edges.iter().collect();
        for (i, e) in all.iter().enumerate() {
            assert!((e.end - e.start).norm() > EPS, "zero-length edge {i}: {e:?}");
            for other in &all[i + 1..] {
                let same = close(e.start, other.start) && close(e.end, other.end);
                let reversed = close(e.start, other.end) && close(e.end, other.start);
                assert!(!same && !reversed, "duplicate edge {e:?}");
            }
        }
    }

    #[test]
    fn test_circle_is_closed_loop() {
        let mut edges = EdgeList::new();
        add_circle(&mut edges, Point3::new(1.0, 2.0, 3.0), 5.0, 10).unwrap();
        assert_eq!(edges.len(), 10);

        let first = edges.edges()[0];
        let last = edges.edges()[9];
        assert!(close(last.end, first.start));
        assert!(close(first.start, Point3::new(6.0, 2.0, 3.0)));
        for pair in edges.edges().windows(2) {
            assert!(close(pair[0].end, pair[1].start));
        }
        for e in &edges {
            assert!(((e.start - Point3::new(1.0, 2.0, 3.0)).norm() - 5.0).abs() < EPS);
            assert_eq!(e.start.z, 3.0);
        }
    }

    #[test]
    fn test_circle_rejects_too_few_steps() {
        let mut edges = EdgeList::new();
        let err = add_circle(&mut edges, Point3::origin(), 1.0, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidTessellationStep { steps: 1, min: 2, .. }));
        assert!(edges.is_empty());
    }

    #[test]
    fn test_two_step_circle_keeps_step_count() {
        let mut edges = EdgeList::new();
        add_circle(&mut edges, Point3::origin(), 1.0, 2).unwrap();
        assert_eq!(edges.len(), 2);
        let (a, b) = (edges.edges()[0], edges.edges()[1]);
        assert!(close(a.start, b.end) && close(a.end, b.start));
    }

    #[test]
    fn test_steps_above_limit_are_rejected() {
        let mut edges = EdgeList::new();
        let too_many = MAX_STEPS + 1;
        let results = [
            add_circle(&mut edges, Point3::origin(), 1.0, too_many),
            add_curve(&mut edges, [Point3::origin(); 4], too_many, CurveKind::Bezier),
            add_sphere(&mut edges, Point3::origin(), 1.0, usize::MAX),
            add_torus(&mut edges, Point3::origin(), 1.0, 3.0, too_many),
        ];
        for result in results {
            assert!(matches!(
                result,
                Err(Error::InvalidTessellationStep { max: MAX_STEPS, .. })
            ));
        }
        assert!(edges.is_empty());

        add_circle(&mut edges, Point3::origin(), 1.0, MAX_STEPS).unwrap();
        assert_eq!(edges.len(), MAX_STEPS);
    }

    #[test]
    fn test_one_step_curve_is_chord() {
        let inputs = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 5.0, 0.0),
            Point3::new(3.0, 9.0, 0.0),
            Point3::new(-4.0, 2.0, 0.0),
        ];

        let mut hermite = EdgeList::new();
        add_curve(&mut hermite, inputs, 1, CurveKind::Hermite).unwrap();
        assert_eq!(hermite.len(), 1);
        // hermite ends at its second position
        assert!(close(hermite.edges()[0].start, inputs[0]));
        assert!(close(hermite.edges()[0].end, inputs[1]));

        let mut bezier = EdgeList::new();
        add_curve(&mut bezier, inputs, 1, CurveKind::Bezier).unwrap();
        assert_eq!(bezier.len(), 1);
        // bezier ends at its last control point
        assert!(close(bezier.edges()[0].start, inputs[0]));
        assert!(close(bezier.edges()[0].end, inputs[3]));
    }

    #[test]
    fn test_curve_rejects_zero_steps() {
        let mut edges = EdgeList::new();
        let err = add_curve(&mut edges, [Point3::origin(); 4], 0, CurveKind::Bezier).unwrap_err();
        assert!(matches!(err, Error::InvalidTessellationStep { steps: 0, min: 1, .. }));
    }

    #[test]
    fn test_bezier_matches_bernstein_form() {
        let p = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 4.0, 0.0),
            Point3::new(5.0, 4.0, 0.0),
            Point3::new(6.0, 0.0, 0.0),
        ];
        let mut edges = EdgeList::new();
        add_curve(&mut edges, p, 4, CurveKind::Bezier).unwrap();
        assert_eq!(edges.len(), 4);

        for (k, edge) in edges.iter().enumerate() {
            let t = k as f64 / 4.0;
            let u = 1.0 - t;
            let expected = p[0].coords * (u * u * u)
                + p[1].coords * (3.0 * u * u * t)
                + p[2].coords * (3.0 * u * t * t)
                + p[3].coords * (t * t * t);
            assert!((edge.start.coords - expected).norm() < EPS);
        }
    }

    #[test]
    fn test_hermite_matches_basis_functions() {
        let p0 = Point3::new(0.0, 0.0, 0.0);
        let p1 = Point3::new(4.0, 0.0, 0.0);
        let r0 = Point3::new(0.0, 8.0, 0.0);
        let r1 = Point3::new(0.0, -8.0, 0.0);
        let mut edges = EdgeList::new();
        add_curve(&mut edges, [p0, p1, r0, r1], 10, CurveKind::Hermite).unwrap();
        assert_eq!(edges.len(), 10);

        for (k, edge) in edges.iter().enumerate() {
            let t = k as f64 / 10.0;
            let h00 = 2.0 * t * t * t - 3.0 * t * t + 1.0;
            let h01 = -2.0 * t * t * t + 3.0 * t * t;
            let h10 = t * t * t - 2.0 * t * t + t;
            let h11 = t * t * t - t * t;
            let expected =
                p0.coords * h00 + p1.coords * h01 + r0.coords * h10 + r1.coords * h11;
            assert!((edge.start.coords - expected).norm() < EPS);
        }
        assert!(close(edges.edges()[9].end, p1));
    }

    #[test]
    fn test_box_has_twelve_edges() {
        let mut edges = EdgeList::new();
        add_box(&mut edges, Point3::new(0.0, 0.0, 0.0), 2.0, 3.0, 4.0);
        assert_eq!(edges.len(), 12);
        assert_no_degenerate_or_duplicate(&edges);

        for e in &edges {
            for p in [e.start, e.end] {
                assert!(p.x == 0.0 || p.x == 2.0);
                assert!(p.y == 0.0 || p.y == -3.0);
                assert!(p.z == 0.0 || p.z == -4.0);
            }
        }
        // every edge is parallel to one axis
        for e in &edges {
            let d = e.end - e.start;
            let nonzero = [d.x, d.y, d.z].iter().filter(|v| v.abs() > EPS).count();
            assert_eq!(nonzero, 1);
        }
    }

    #[test]
    fn test_sphere_wireframe() {
        let center = Point3::new(1.0, -1.0, 2.0);
        let steps = 10;
        let mut edges = EdgeList::new();
        add_sphere(&mut edges, center, 3.0, steps).unwrap();

        // interior rings plus full meridians
        assert_eq!(edges.len(), (steps - 1) * steps + steps * steps);
        assert_no_degenerate_or_duplicate(&edges);
        for e in &edges {
            assert!(((e.start - center).norm() - 3.0).abs() < EPS);
            assert!(((e.end - center).norm() - 3.0).abs() < EPS);
        }
    }

    #[test]
    fn test_sphere_minimum_steps() {
        let mut edges = EdgeList::new();
        add_sphere(&mut edges, Point3::origin(), 1.0, 2).unwrap();
        // one two-point ring plus two meridians of two edges each
        assert_eq!(edges.len(), 5);
        assert_no_degenerate_or_duplicate(&edges);

        let err = add_sphere(&mut edges, Point3::origin(), 1.0, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidTessellationStep { .. }));
        assert_eq!(edges.len(), 5);
    }

    #[test]
    fn test_torus_wireframe() {
        let center = Point3::new(0.0, 0.0, 0.0);
        let steps = 8;
        let mut edges = EdgeList::new();
        add_torus(&mut edges, center, 1.0, 4.0, steps).unwrap();
        assert_eq!(edges.len(), 2 * steps * steps);
        assert_no_degenerate_or_duplicate(&edges);

        // every point lies on the tube surface
        for e in &edges {
            let p = e.start;
            let ring_dist = (p.x * p.x + p.z * p.z).sqrt() - 4.0;
            assert!(((ring_dist * ring_dist + p.y * p.y).sqrt() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_torus_minimum_steps() {
        let mut edges = EdgeList::new();
        add_torus(&mut edges, Point3::origin(), 1.0, 3.0, 2).unwrap();
        assert_eq!(edges.len(), 4);
        assert_no_degenerate_or_duplicate(&edges);
    }
}

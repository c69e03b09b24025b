//! Convex hull builder
//!
//! QuickHull in 3D: start from a maximal tetrahedron and give every other
//! point to one face that sees it. Each step takes a face's farthest outside
//! point, walks the faces visible from it across shared edges, and fans new
//! faces from the horizon to the point. The orphaned outside points are handed
//! to the new faces; any that no new face sees are inside and dropped, so the
//! output keeps only boundary vertices.
//!
//! Faces are kept counter-clockwise seen from outside; every directed edge
//! has exactly one twin running the other way.

use std::collections::HashMap;

use crate::core::{HullConfig, Naming};
use crate::foundation::math::Vec3;
use crate::scene::{Aabb, MeshData, SceneObject};

use super::{eligible, ColliderProxy, GeometryError};

/// Why a point set has no 3D hull
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HullError {
    /// Fewer than four points, or all points coincide
    #[error("fewer than four distinct points")]
    TooFewPoints,
    /// All points lie on one line
    #[error("all points are collinear")]
    Collinear,
    /// All points lie in one plane
    #[error("all points are coplanar")]
    Coplanar,
    /// A coordinate is NaN or infinite
    #[error("vertex {0} is not finite")]
    NonFiniteVertex(usize),
}

impl HullError {
    fn for_object(self, object: &str) -> GeometryError {
        match self {
            Self::NonFiniteVertex(index) => GeometryError::NonFiniteVertex {
                object: object.to_string(),
                index,
            },
            reason => GeometryError::DegenerateHull {
                object: object.to_string(),
                reason,
            },
        }
    }
}

/// Closed triangle mesh bounding a point set
#[derive(Debug, Clone, PartialEq)]
pub struct HullMesh {
    /// Hull vertices, a subset of the input in input order
    pub vertices: Vec<Vec3>,
    /// Outward-facing triangles indexing `vertices`
    pub faces: Vec<[u32; 3]>,
    /// Input index of each hull vertex
    pub source_indices: Vec<usize>,
}

#[derive(Debug, Clone)]
struct Face {
    v: [usize; 3],
    normal: Vec3,
    offset: f32,
    alive: bool,
    /// Points above this face not yet on the hull
    outside: Vec<usize>,
}

impl Face {
    fn new(points: &[Vec3], v: [usize; 3]) -> Self {
        let (a, b, c) = (points[v[0]], points[v[1]], points[v[2]]);
        let normal = (b - a)
            .cross(&(c - a))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros);
        Self {
            v,
            normal,
            offset: normal.dot(&a),
            alive: true,
            outside: Vec::new(),
        }
    }

    fn distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) - self.offset
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.v;
        [(a, b), (b, c), (c, a)]
    }
}

/// Working surface: faces, the directed-edge map and recycled face slots
#[derive(Debug, Default)]
struct Surface {
    faces: Vec<Face>,
    edges: HashMap<(usize, usize), usize>,
    free: Vec<usize>,
}

impl Surface {
    fn add(&mut self, face: Face) -> usize {
        let index = match self.free.pop() {
            Some(slot) => {
                self.faces[slot] = face;
                slot
            }
            None => {
                self.faces.push(face);
                self.faces.len() - 1
            }
        };
        for edge in self.faces[index].edges() {
            self.edges.insert(edge, index);
        }
        index
    }

    /// Retire a face, returning the outside points it held
    fn remove(&mut self, index: usize) -> Vec<usize> {
        let face = &mut self.faces[index];
        face.alive = false;
        for edge in face.edges() {
            self.edges.remove(&edge);
        }
        self.free.push(index);
        std::mem::take(&mut face.outside)
    }

    /// Give each candidate to the first target face that sees it
    fn partition(
        &mut self,
        targets: &[usize],
        points: &[Vec3],
        candidates: impl IntoIterator<Item = usize>,
        tolerance: f32,
    ) {
        for index in candidates {
            let point = &points[index];
            if let Some(&face) = targets.iter().find(|&&f| self.faces[f].distance(point) > tolerance) {
                self.faces[face].outside.push(index);
            }
        }
    }

    /// Faces visible from `point` connected to `start`, and their horizon edges
    fn visible_region(&self, start: usize, point: &Vec3, tolerance: f32) -> (Vec<usize>, Vec<(usize, usize)>) {
        let mut visible = vec![start];
        let mut seen: HashMap<usize, bool> = HashMap::from([(start, true)]);
        let mut horizon = Vec::new();

        let mut cursor = 0;
        while cursor < visible.len() {
            let face = visible[cursor];
            cursor += 1;
            for (u, v) in self.faces[face].edges() {
                let twin_visible = match self.edges.get(&(v, u)).copied() {
                    None => false,
                    Some(twin) => match seen.get(&twin) {
                        Some(&known) => known,
                        None => {
                            let is_visible = self.faces[twin].distance(point) > tolerance;
                            seen.insert(twin, is_visible);
                            if is_visible {
                                visible.push(twin);
                            }
                            is_visible
                        }
                    },
                };
                if !twin_visible {
                    horizon.push((u, v));
                }
            }
        }
        (visible, horizon)
    }
}

fn farthest(points: &[Vec3], measure: impl Fn(&Vec3) -> f32) -> Option<(usize, f32)> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, measure(p)))
        .max_by(|x, y| x.1.total_cmp(&y.1))
}

/// Four points spanning the largest initial volume we can cheaply find
fn initial_simplex(points: &[Vec3], tolerance: f32) -> Result<[usize; 4], HullError> {
    let (a, _) = farthest(points, |p| -p.x).ok_or(HullError::TooFewPoints)?;
    let pa = points[a];

    let (b, ab_len) = farthest(points, |p| (p - pa).magnitude()).ok_or(HullError::TooFewPoints)?;
    if ab_len <= tolerance {
        return Err(HullError::TooFewPoints);
    }
    let axis = (points[b] - pa) / ab_len;

    let (c, line_dist) = farthest(points, |p| (p - pa).cross(&axis).magnitude())
        .ok_or(HullError::TooFewPoints)?;
    if line_dist <= tolerance {
        return Err(HullError::Collinear);
    }
    let normal = (points[b] - pa).cross(&(points[c] - pa)).normalize();

    let (d, plane_dist) = farthest(points, |p| normal.dot(&(p - pa)).abs())
        .ok_or(HullError::TooFewPoints)?;
    if plane_dist <= tolerance {
        return Err(HullError::Coplanar);
    }

    Ok([a, b, c, d])
}

/// Convex hull of a point set
///
/// `epsilon` is relative to the diagonal of the input's bounding box; points
/// closer than that to a face count as on it.
pub fn convex_hull(points: &[Vec3], epsilon: f32) -> Result<HullMesh, HullError> {
    if let Some(index) = points.iter().position(|p| p.iter().any(|c| !c.is_finite())) {
        return Err(HullError::NonFiniteVertex(index));
    }
    if points.len() < 4 {
        return Err(HullError::TooFewPoints);
    }
    let diagonal = Aabb::from_points(points)
        .ok_or(HullError::TooFewPoints)?
        .size()
        .magnitude();
    if diagonal <= f32::EPSILON {
        return Err(HullError::TooFewPoints);
    }
    let tolerance = epsilon * diagonal;

    let simplex = initial_simplex(points, tolerance)?;
    let [a, b, c, d] = simplex;
    let centroid = (points[a] + points[b] + points[c] + points[d]) * 0.25;

    let mut surface = Surface::default();
    let mut pending: Vec<usize> = Vec::new();
    for [i, j, k] in [[a, b, c], [a, c, d], [a, d, b], [b, d, c]] {
        let mut face = Face::new(points, [i, j, k]);
        if face.distance(&centroid) > 0.0 {
            face = Face::new(points, [i, k, j]);
        }
        pending.push(surface.add(face));
    }
    let rest = (0..points.len()).filter(|i| !simplex.contains(i));
    surface.partition(&pending, points, rest, tolerance);

    while let Some(start) = pending.pop() {
        let face = &surface.faces[start];
        if !face.alive {
            continue;
        }
        let apex = face
            .outside
            .iter()
            .copied()
            .max_by(|&x, &y| face.distance(&points[x]).total_cmp(&face.distance(&points[y])));
        let Some(apex) = apex else {
            continue;
        };

        let (visible, horizon) = surface.visible_region(start, &points[apex], tolerance);
        let mut orphans = Vec::new();
        for face in visible {
            orphans.extend(surface.remove(face).into_iter().filter(|&i| i != apex));
        }
        let created: Vec<usize> = horizon
            .into_iter()
            .map(|(u, v)| surface.add(Face::new(points, [u, v, apex])))
            .collect();
        surface.partition(&created, points, orphans, tolerance);
        pending.extend(created.into_iter().filter(|&f| !surface.faces[f].outside.is_empty()));
    }

    let alive: Vec<&Face> = surface.faces.iter().filter(|f| f.alive).collect();
    let mut source_indices: Vec<usize> = alive.iter().flat_map(|f| f.v).collect();
    source_indices.sort_unstable();
    source_indices.dedup();

    let mut remap = vec![u32::MAX; points.len()];
    for (new_index, &old_index) in source_indices.iter().enumerate() {
        remap[old_index] = new_index as u32;
    }

    Ok(HullMesh {
        vertices: source_indices.iter().map(|&i| points[i]).collect(),
        faces: alive.iter().map(|f| f.v.map(|i| remap[i])).collect(),
        source_indices,
    })
}

/// Build a proxy from the convex hull of the source vertices
///
/// The proxy keeps the source transform; its mesh is named `"<mesh> convexhull"`.
/// Degenerate input is an error for this object only.
pub fn build_convex_hull(
    source: &SceneObject,
    mesh: Option<&MeshData>,
    naming: &Naming,
    config: &HullConfig,
) -> Result<Option<ColliderProxy>, GeometryError> {
    let Some(mesh) = mesh.filter(|_| eligible(source, mesh, naming)) else {
        return Ok(None);
    };
    let hull = convex_hull(&mesh.vertices, config.epsilon)
        .map_err(|e| e.for_object(source.name()))?;

    let hull_mesh = MeshData::from_data(
        format!("{} convexhull", mesh.name),
        hull.vertices,
        hull.faces.iter().map(|f| f.to_vec()).collect(),
    );
    Ok(Some(ColliderProxy::new(
        naming.collider_name(source.name()),
        hull_mesh,
        source.matrix_world,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::{MeshKey, SlotMap};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPSILON: f32 = 1e-5;

    fn cube_corners() -> Vec<Vec3> {
        Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
            .corners()
            .to_vec()
    }

    fn assert_closed(hull: &HullMesh) {
        let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
        for [a, b, c] in &hull.faces {
            for edge in [(*a, *b), (*b, *c), (*c, *a)] {
                *directed.entry(edge).or_default() += 1;
            }
        }
        for (&(u, v), &count) in &directed {
            assert_eq!(count, 1, "edge {}->{} used {} times", u, v, count);
            assert_eq!(directed.get(&(v, u)), Some(&1), "edge {}->{} has no twin", u, v);
        }
        let edge_count = directed.len() / 2;
        let euler = hull.vertices.len() as i64 - edge_count as i64 + hull.faces.len() as i64;
        assert_eq!(euler, 2, "hull is not a closed genus-0 surface");
    }

    fn assert_contains(hull: &HullMesh, points: &[Vec3], tolerance: f32) {
        for [a, b, c] in &hull.faces {
            let (pa, pb, pc) = (
                hull.vertices[*a as usize],
                hull.vertices[*b as usize],
                hull.vertices[*c as usize],
            );
            let Some(normal) = (pb - pa).cross(&(pc - pa)).try_normalize(f32::EPSILON) else {
                continue;
            };
            for point in points {
                let distance = normal.dot(&(point - pa));
                assert!(distance <= tolerance, "point {:?} is {} outside the hull", point, distance);
            }
        }
    }

    #[test]
    fn test_cube_with_interior_points() {
        let mut points = cube_corners();
        points.push(Vec3::new(0.0, 0.0, 0.0));
        points.push(Vec3::new(0.5, -0.25, 0.1));
        points.insert(3, Vec3::new(-0.3, 0.9, 0.2));

        let hull = convex_hull(&points, EPSILON).unwrap();

        assert_eq!(hull.vertices.len(), 8);
        assert_eq!(hull.faces.len(), 12);
        assert!(!hull.source_indices.contains(&3));
        assert_closed(&hull);
        assert_contains(&hull, &points, 1e-4);
    }

    #[test]
    fn test_random_cloud_properties() {
        let mut rng = StdRng::seed_from_u64(7);
        let points: Vec<Vec3> = (0..400)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                )
            })
            .collect();

        let hull = convex_hull(&points, EPSILON).unwrap();

        assert!(hull.vertices.len() < points.len());
        for (vertex, &source) in hull.vertices.iter().zip(&hull.source_indices) {
            assert_eq!(*vertex, points[source]);
        }
        assert_closed(&hull);
        assert_contains(&hull, &points, 1e-3);
    }

    #[test]
    fn test_points_on_sphere_all_kept() {
        let mut points = Vec::new();
        for ring in 1..6 {
            let theta = ring as f32 * std::f32::consts::PI / 6.0;
            for step in 0..8 {
                let phi = step as f32 * std::f32::consts::TAU / 8.0;
                points.push(Vec3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos()));
            }
        }
        points.push(Vec3::new(0.0, 0.0, 1.0));
        points.push(Vec3::new(0.0, 0.0, -1.0));

        let hull = convex_hull(&points, EPSILON).unwrap();

        assert_eq!(hull.vertices.len(), points.len());
        assert_closed(&hull);
        assert_contains(&hull, &points, 1e-4);
    }

    #[test]
    fn test_dense_sphere_scan_keeps_every_point() {
        // Fibonacci lattice: evenly spread, every point on the hull
        let count = 10_000;
        let golden = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
        let points: Vec<Vec3> = (0..count)
            .map(|i| {
                let z = 1.0 - 2.0 * (i as f32 + 0.5) / count as f32;
                let ring = (1.0 - z * z).sqrt();
                let phi = golden * i as f32;
                Vec3::new(ring * phi.cos(), ring * phi.sin(), z) * 50.0 + Vec3::new(200.0, -80.0, 10.0)
            })
            .collect();

        let hull = convex_hull(&points, EPSILON).unwrap();

        assert_eq!(hull.vertices.len(), count);
        assert_eq!(hull.faces.len(), 2 * count - 4);
        assert_closed(&hull);
        let sample: Vec<Vec3> = points.iter().step_by(97).copied().collect();
        assert_contains(&hull, &sample, 1e-2);
    }

    #[test]
    fn test_degenerate_inputs() {
        let square = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
        ];
        assert_eq!(convex_hull(&square, EPSILON), Err(HullError::Coplanar));

        let line: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        assert_eq!(convex_hull(&line, EPSILON), Err(HullError::Collinear));

        assert_eq!(convex_hull(&square[..3], EPSILON), Err(HullError::TooFewPoints));
        assert_eq!(convex_hull(&[Vec3::new(1.0, 1.0, 1.0); 6], EPSILON), Err(HullError::TooFewPoints));

        let mut broken = cube_corners();
        broken[5].y = f32::NAN;
        assert_eq!(convex_hull(&broken, EPSILON), Err(HullError::NonFiniteVertex(5)));
    }

    #[test]
    fn test_builder_reports_degenerate_source() {
        let mut meshes: SlotMap<MeshKey, MeshData> = SlotMap::with_key();
        let flat = meshes.insert(MeshData::from_data(
            "Plane",
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2, 3]],
        ));
        let source = SceneObject::new("Pond").with_mesh(flat);

        let result = build_convex_hull(&source, meshes.get(flat), &Naming::default(), &HullConfig::default());
        assert!(matches!(
            result,
            Err(GeometryError::DegenerateHull { ref object, reason: HullError::Coplanar }) if object == "Pond"
        ));
    }

    #[test]
    fn test_builder_emits_named_proxy() {
        let mut meshes: SlotMap<MeshKey, MeshData> = SlotMap::with_key();
        let mut vertices = cube_corners();
        vertices.push(Vec3::zeros());
        let key = meshes.insert(MeshData::from_data("Crate", vertices, Vec::new()));
        let source = SceneObject::new("Crate_01").with_mesh(key);

        let proxy = build_convex_hull(&source, meshes.get(key), &Naming::default(), &HullConfig::default())
            .unwrap()
            .unwrap();

        assert_eq!(proxy.name, "Crate_01_collider");
        assert_eq!(proxy.mesh.name, "Crate convexhull");
        assert_eq!(proxy.mesh.vertices.len(), 8);
        assert!(proxy.mesh.faces.iter().all(|f| f.len() == 3));
        assert_eq!(proxy.tags.get("collider"), Some(1));

        let link = SceneObject::new("Crate_gltf").with_mesh(key);
        assert_eq!(
            build_convex_hull(&link, meshes.get(key), &Naming::default(), &HullConfig::default()),
            Ok(None)
        );
    }
}

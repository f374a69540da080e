//! Triangle Meshes

use super::*;
use crate::error::*;
use crate::paramset::*;
use crate::sampling::*;

/// A triangle mesh with vertices stored in world space. The mesh itself
/// cannot be intersected; it refines into one `Triangle` per face.
#[derive(Clone, Debug)]
pub struct TriangleMesh {
    /// Common shape data.
    pub data: ShapeData,

    /// Number of triangles.
    pub n_triangles: usize,

    /// Three vertex indices per triangle.
    pub vertex_indices: Vec<usize>,

    /// Vertex positions in world space.
    pub p: Vec<Point3f>,

    /// Optional per-vertex parametric coordinates.
    pub uv: Option<Vec<Point2f>>,

    /// Running sum of triangle areas used to pick a triangle when sampling.
    area_cdf: Vec<Float>,
}

impl TriangleMesh {
    /// Create a new triangle mesh.
    ///
    /// * `data`           - Common shape data.
    /// * `vertex_indices` - Three vertex indices per triangle.
    /// * `p`              - Vertex positions in object space.
    /// * `uv`             - Optional per-vertex parametric coordinates.
    pub fn new(data: ShapeData, vertex_indices: Vec<usize>, p: Vec<Point3f>, uv: Option<Vec<Point2f>>) -> Result<Self> {
        if vertex_indices.len() % 3 != 0 {
            return Err(Error::InvalidParameter(format!(
                "number of vertex indices {} is not a multiple of 3",
                vertex_indices.len()
            )));
        }
        if let Some(&bad) = vertex_indices.iter().find(|&&i| i >= p.len()) {
            return Err(Error::InvalidParameter(format!(
                "vertex index {} out of range for {} vertices",
                bad,
                p.len()
            )));
        }
        let uv = match uv {
            Some(uv) if uv.len() != p.len() => {
                warn!("Ignoring 'uv' values: expected {}, found {}", p.len(), uv.len());
                None
            }
            uv => uv,
        };

        let p: Vec<Point3f> = p.iter().map(|v| data.object_to_world.transform_point(v)).collect();
        let mut mesh = Self {
            data,
            n_triangles: vertex_indices.len() / 3,
            vertex_indices,
            p,
            uv,
            area_cdf: vec![],
        };

        let mut total = 0.0;
        mesh.area_cdf = (0..mesh.n_triangles)
            .map(|i| {
                total += mesh.triangle_area(i);
                total
            })
            .collect();
        Ok(mesh)
    }

    /// Returns the world space vertices of a triangle.
    ///
    /// * `i` - Triangle index.
    fn vertices(&self, i: usize) -> [Point3f; 3] {
        let v = &self.vertex_indices[3 * i..3 * i + 3];
        [self.p[v[0]], self.p[v[1]], self.p[v[2]]]
    }

    fn triangle_area(&self, i: usize) -> Float {
        let [p1, p2, p3] = self.vertices(i);
        0.5 * (p2 - p1).cross(&(p3 - p1)).length()
    }

    /// Returns a bounding box in object space.
    pub fn object_bound(&self) -> Bounds3f {
        self.p.iter().fold(Bounds3f::EMPTY, |b, p| {
            b.union(&self.data.world_to_object.transform_point(p))
        })
    }

    /// Returns a bounding box in world space.
    pub fn world_bound(&self) -> Bounds3f {
        self.p.iter().fold(Bounds3f::EMPTY, |b, p| b.union(p))
    }

    /// Returns the total surface area.
    pub fn area(&self) -> Float {
        self.area_cdf.last().copied().unwrap_or(0.0)
    }

    /// Split the mesh into its triangles.
    ///
    /// * `mesh` - The shared mesh.
    pub fn refine(mesh: &Arc<TriangleMesh>) -> Vec<Arc<Shape>> {
        (0..mesh.n_triangles)
            .map(|index| {
                Arc::new(Shape::Triangle(Triangle {
                    mesh: Arc::clone(mesh),
                    index,
                }))
            })
            .collect()
    }

    /// Ray-triangle test returning the hit parameter and barycentrics
    /// `(t, b1, b2)`.
    ///
    /// * `i`   - Triangle index.
    /// * `ray` - World space ray.
    fn hit_triangle(&self, i: usize, ray: &Ray) -> Option<(Float, Float, Float)> {
        let [p1, p2, p3] = self.vertices(i);
        let e1 = p2 - p1;
        let e2 = p3 - p1;
        let s1 = ray.d.cross(&e2);
        let divisor = s1.dot(&e1);
        if divisor == 0.0 {
            return None;
        }
        let inv_divisor = 1.0 / divisor;

        let s = ray.o - p1;
        let b1 = s.dot(&s1) * inv_divisor;
        if !(0.0..=1.0).contains(&b1) {
            return None;
        }

        let s2 = s.cross(&e1);
        let b2 = ray.d.dot(&s2) * inv_divisor;
        if b2 < 0.0 || b1 + b2 > 1.0 {
            return None;
        }

        let t = e2.dot(&s2) * inv_divisor;
        if t < ray.min_t || t > ray.max_t {
            return None;
        }
        Some((t, b1, b2))
    }

    /// Sample a point uniformly over the whole mesh surface.
    ///
    /// * `u1` - First random value; also selects the triangle.
    /// * `u2` - Second random value.
    pub fn sample(&self, u1: Float, u2: Float) -> (Point3f, Normal3f) {
        let total = self.area();
        if self.n_triangles == 0 || total == 0.0 {
            return (Point3f::zero(), Normal3f::zero());
        }

        let target = u1 * total;
        let i = min(self.area_cdf.partition_point(|&c| c <= target), self.n_triangles - 1);
        let start = if i == 0 { 0.0 } else { self.area_cdf[i - 1] };
        let width = self.area_cdf[i] - start;
        let u1 = if width > 0.0 {
            clamp((target - start) / width, 0.0, 1.0)
        } else {
            0.5
        };
        self.sample_triangle(i, u1, u2)
    }

    fn sample_triangle(&self, i: usize, u1: Float, u2: Float) -> (Point3f, Normal3f) {
        let [p1, p2, p3] = self.vertices(i);
        let (b1, b2) = uniform_sample_triangle(u1, u2);
        let p = b1 * p1 + b2 * p2 + (1.0 - b1 - b2) * p3;
        let n = Normal3f::from((p2 - p1).cross(&(p3 - p1)).normalize());
        let n = if self.data.reverse_orientation { -n } else { n };
        (p, n)
    }

    /// Returns the solid angle density of sampling `wi` from `p`, using the
    /// nearest triangle along `wi`.
    ///
    /// * `p`  - Reference point.
    /// * `wi` - Direction from the reference point.
    pub fn pdf_wi(&self, p: &Point3f, wi: &Vector3f) -> Float {
        let mut ray = Ray::new(*p, *wi, 1e-3, INFINITY, 0.0, 0);
        let mut nearest = None;
        for i in 0..self.n_triangles {
            if let Some((t, _, _)) = self.hit_triangle(i, &ray) {
                ray.max_t = t;
                nearest = Some(i);
            }
        }

        match nearest {
            Some(i) => {
                let [p1, p2, p3] = self.vertices(i);
                let n = (p2 - p1).cross(&(p3 - p1)).normalize();
                let pdf = p.distance_squared(&ray.at(ray.max_t)) / (n.abs_dot(&-*wi) * self.area());
                if pdf.is_infinite() {
                    0.0
                } else {
                    pdf
                }
            }
            None => 0.0,
        }
    }
}

impl TryFrom<(&ParamSet, Transform, bool)> for TriangleMesh {
    type Error = Error;

    /// Create a `TriangleMesh` from the "indices", "P" and optional "uv"
    /// parameters.
    ///
    /// * `p` - A tuple containing the parameter set, object to world
    ///         transform and the reverse orientation flag.
    fn try_from(p: (&ParamSet, Transform, bool)) -> Result<Self> {
        let (params, o2w, reverse_orientation) = p;

        let indices = params.find_int("indices");
        if indices.is_empty() {
            return Err(Error::InvalidParameter("vertex indices \"indices\" not provided for triangle mesh".to_string()));
        }
        let points = params.find_point3f("P");
        if points.is_empty() {
            return Err(Error::InvalidParameter("vertex positions \"P\" not provided for triangle mesh".to_string()));
        }
        let vertex_indices = indices
            .iter()
            .map(|&i| usize::try_from(i).map_err(|_| Error::InvalidParameter(format!("negative vertex index {}", i))))
            .collect::<Result<Vec<usize>>>()?;

        let uvs = params.find_float("uv");
        let uv = if uvs.is_empty() {
            None
        } else {
            Some(uvs.chunks_exact(2).map(|c| Point2f::new(c[0], c[1])).collect())
        };

        Self::new(ShapeData::new(o2w, reverse_orientation), vertex_indices, points, uv)
    }
}

/// A single triangle referencing its mesh.
#[derive(Clone, Debug)]
pub struct Triangle {
    /// The mesh.
    pub mesh: Arc<TriangleMesh>,

    /// Index of the triangle in the mesh.
    pub index: usize,
}

impl Triangle {
    /// Returns the parametric coordinates of the three vertices.
    fn uvs(&self) -> [Point2f; 3] {
        match self.mesh.uv.as_ref() {
            Some(uv) => {
                let v = &self.mesh.vertex_indices[3 * self.index..3 * self.index + 3];
                [uv[v[0]], uv[v[1]], uv[v[2]]]
            }
            None => [Point2f::new(0.0, 0.0), Point2f::new(1.0, 0.0), Point2f::new(1.0, 1.0)],
        }
    }

    /// Returns a bounding box in object space.
    pub fn object_bound(&self) -> Bounds3f {
        let w2o = &self.mesh.data.world_to_object;
        self.mesh
            .vertices(self.index)
            .iter()
            .fold(Bounds3f::EMPTY, |b, p| b.union(&w2o.transform_point(p)))
    }

    /// Returns a bounding box in world space.
    pub fn world_bound(&self) -> Bounds3f {
        self.mesh
            .vertices(self.index)
            .iter()
            .fold(Bounds3f::EMPTY, |b, p| b.union(p))
    }

    /// Returns the surface area.
    pub fn area(&self) -> Float {
        self.mesh.triangle_area(self.index)
    }

    /// Returns the intersection with the triangle.
    ///
    /// * `ray`   - World space ray.
    /// * `shape` - The enclosing shape, recorded in the differential geometry.
    pub fn intersect<'a>(&self, ray: &Ray, shape: &'a Shape) -> Option<ShapeHit<'a>> {
        let (t, b1, b2) = self.mesh.hit_triangle(self.index, ray)?;
        let [p1, p2, p3] = self.mesh.vertices(self.index);
        let uv = self.uvs();

        // Partial derivatives from the parameterization.
        let du02 = uv[0][0] - uv[2][0];
        let dv02 = uv[0][1] - uv[2][1];
        let du12 = uv[1][0] - uv[2][0];
        let dv12 = uv[1][1] - uv[2][1];
        let dp02 = p1 - p3;
        let dp12 = p2 - p3;
        let determinant = du02 * dv12 - dv02 * du12;
        let (dpdu, dpdv) = if determinant == 0.0 {
            coordinate_system(&(p3 - p1).cross(&(p2 - p1)).normalize())
        } else {
            let inv_det = 1.0 / determinant;
            (
                (dp02 * dv12 - dp12 * dv02) * inv_det,
                (dp02 * -du12 + dp12 * du02) * inv_det,
            )
        };

        let b0 = 1.0 - b1 - b2;
        let tu = b0 * uv[0][0] + b1 * uv[1][0] + b2 * uv[2][0];
        let tv = b0 * uv[0][1] + b1 * uv[1][1] + b2 * uv[2][1];

        let dg = DifferentialGeometry::new(
            ray.at(t),
            dpdu,
            dpdv,
            Normal3f::zero(),
            Normal3f::zero(),
            tu,
            tv,
            Some(shape),
        );
        Some(ShapeHit {
            t_hit: t,
            ray_epsilon: 1e-3 * t,
            dg,
        })
    }

    /// Returns true if the ray hits the triangle.
    ///
    /// * `ray` - World space ray.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.mesh.hit_triangle(self.index, ray).is_some()
    }

    /// Sample a point uniformly by area.
    ///
    /// * `u1` - First random value.
    /// * `u2` - Second random value.
    pub fn sample(&self, u1: Float, u2: Float) -> (Point3f, Normal3f) {
        self.mesh.sample_triangle(self.index, u1, u2)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

use nalgebra_glm as glm;

/// Axis-aligned minimum bounding box.
///
/// An *unset* box carries `+inf`/`-inf` sentinels so that expanding it by any
/// finite point or box yields that point or box, and so that it never
/// intersects or contains anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    min: glm::Vec3,
    max: glm::Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: glm::vec3(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: glm::vec3(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }
}

impl Aabb {
    pub fn new(min: glm::Vec3, max: glm::Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point in `positions`, or `None` for an
    /// empty set.
    pub fn from_points(positions: &[glm::Vec3]) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }
        let mut bbox = Self::default();
        for pos in positions {
            bbox.expand_point(*pos);
        }
        Some(bbox)
    }

    pub fn min(&self) -> glm::Vec3 {
        self.min
    }

    pub fn max(&self) -> glm::Vec3 {
        self.max
    }

    /// False while the box still holds the unset sentinels (or any inverted
    /// axis).
    pub fn is_set(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Widens the box to include `v`. No-op if `v` is already inside.
    pub fn expand_point(&mut self, v: glm::Vec3) {
        if v.x < self.min.x {
            self.min.x = v.x;
        }
        if v.x > self.max.x {
            self.max.x = v.x;
        }
        if v.y < self.min.y {
            self.min.y = v.y;
        }
        if v.y > self.max.y {
            self.max.y = v.y;
        }
        if v.z < self.min.z {
            self.min.z = v.z;
        }
        if v.z > self.max.z {
            self.max.z = v.z;
        }
    }

    /// Widens the box to include `bb`. If this box is unset the result equals
    /// `bb`.
    pub fn expand_box(&mut self, bb: &Aabb) {
        if bb.min.x < self.min.x {
            self.min.x = bb.min.x;
        }
        if bb.max.x > self.max.x {
            self.max.x = bb.max.x;
        }
        if bb.min.y < self.min.y {
            self.min.y = bb.min.y;
        }
        if bb.max.y > self.max.y {
            self.max.y = bb.max.y;
        }
        if bb.min.z < self.min.z {
            self.min.z = bb.min.z;
        }
        if bb.max.z > self.max.z {
            self.max.z = bb.max.z;
        }
    }

    /// Per-axis max-of-mins / min-of-maxes. The result is degenerate when the
    /// boxes do not overlap; check `intersects` first if that matters.
    pub fn intersection(&self, bb: &Aabb) -> Aabb {
        Aabb::new(
            glm::vec3(
                self.min.x.max(bb.min.x),
                self.min.y.max(bb.min.y),
                self.min.z.max(bb.min.z),
            ),
            glm::vec3(
                self.max.x.min(bb.max.x),
                self.max.y.min(bb.max.y),
                self.max.z.min(bb.max.z),
            ),
        )
    }

    /// Touching faces count as intersecting.
    pub fn intersects(&self, bb: &Aabb) -> bool {
        self.min.x.max(bb.min.x) <= self.max.x.min(bb.max.x)
            && self.min.y.max(bb.min.y) <= self.max.y.min(bb.max.y)
            && self.min.z.max(bb.min.z) <= self.max.z.min(bb.max.z)
    }

    /// Inclusive on all faces.
    pub fn contains(&self, v: glm::Vec3) -> bool {
        (v.x >= self.min.x && v.x <= self.max.x)
            && (v.y >= self.min.y && v.y <= self.max.y)
            && (v.z >= self.min.z && v.z <= self.max.z)
    }

    /// Tightest axis-aligned box enclosing this box transformed by `matrix`.
    ///
    /// Sums, per axis of the target space, the componentwise min/max of the
    /// two scaled extreme corners contributed by each source axis, then adds
    /// the translation column. Equivalent to transforming all 8 corners and
    /// re-bounding, without doing so.
    pub fn transformed(&self, matrix: &glm::Mat4) -> Aabb {
        let xa = glm::vec4_to_vec3(&glm::column(matrix, 0)) * self.min.x;
        let xb = glm::vec4_to_vec3(&glm::column(matrix, 0)) * self.max.x;

        let ya = glm::vec4_to_vec3(&glm::column(matrix, 1)) * self.min.y;
        let yb = glm::vec4_to_vec3(&glm::column(matrix, 1)) * self.max.y;

        let za = glm::vec4_to_vec3(&glm::column(matrix, 2)) * self.min.z;
        let zb = glm::vec4_to_vec3(&glm::column(matrix, 2)) * self.max.z;

        let translation = glm::vec4_to_vec3(&glm::column(matrix, 3));

        Aabb::new(
            glm::min2(&xa, &xb) + glm::min2(&ya, &yb) + glm::min2(&za, &zb) + translation,
            glm::max2(&xa, &xb) + glm::max2(&ya, &yb) + glm::max2(&za, &zb) + translation,
        )
    }
}

use std::io::BufRead;

use crate::error::MeshError;
use crate::math::Aabb;
use crate::model::{SkinWeight, SubMesh, WeightRange};
use nalgebra_glm as glm;

/// Result of parsing one mesh file: the sub-meshes plus their aggregate
/// bounds, ready to swap into a model.
#[derive(Debug, Clone, Default)]
pub struct MeshGeometry {
    pub sub_meshes: Vec<SubMesh>,
    pub bounds: Aabb,
}

/// One classified line of the mesh format.
///
/// `Unknown` covers both unrecognized prefixes and malformed payloads; both
/// are skipped without error so newer writers stay readable.
#[derive(Debug, Clone)]
enum MeshField {
    MeshCount(usize),
    MeshSelect(usize),
    Material(String),
    Bounds(Aabb),
    Position(glm::Vec3),
    Normal(glm::Vec3),
    Tangent(glm::Vec3),
    Bitangent(glm::Vec3),
    UvChannelCount(usize),
    Uv { channel: usize, uv: glm::Vec2 },
    Face(u32, u32, u32),
    WeightCount(usize),
    WeightRangeEnd(u32),
    Weight(SkinWeight),
    Unknown,
}

fn floats<const N: usize>(tokens: &[&str]) -> Option<[f32; N]> {
    if tokens.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, tok) in out.iter_mut().zip(tokens) {
        *slot = tok.parse().ok()?;
    }
    Some(out)
}

fn bbox(tokens: &[&str]) -> Option<Aabb> {
    let [mnx, mny, mnz, mxx, mxy, mxz] = floats::<6>(tokens)?;
    Some(Aabb::new(glm::vec3(mnx, mny, mnz), glm::vec3(mxx, mxy, mxz)))
}

fn vec3(tokens: &[&str]) -> Option<glm::Vec3> {
    let [x, y, z] = floats::<3>(tokens)?;
    Some(glm::vec3(x, y, z))
}

fn classify(line: &str) -> MeshField {
    let mut tokens = line.split_whitespace();
    let Some(prefix) = tokens.next() else {
        return MeshField::Unknown;
    };
    let rest: Vec<&str> = tokens.collect();

    let field = match prefix {
        "meshes" => rest.first().and_then(|t| t.parse().ok()).map(MeshField::MeshCount),
        "mesh" => rest.first().and_then(|t| t.parse().ok()).map(MeshField::MeshSelect),
        "material" => rest.first().map(|t| MeshField::Material(t.to_string())),
        "bbox" => bbox(&rest).map(MeshField::Bounds),
        "vtx" => vec3(&rest).map(MeshField::Position),
        "vnr" => vec3(&rest).map(|v| MeshField::Normal(glm::normalize(&v))),
        "vtg" => vec3(&rest).map(|v| MeshField::Tangent(glm::normalize(&v))),
        "vbt" => vec3(&rest).map(|v| MeshField::Bitangent(glm::normalize(&v))),
        "tex_channels" => rest
            .first()
            .and_then(|t| t.parse().ok())
            .map(MeshField::UvChannelCount),
        "tx" => {
            let channel: Option<usize> = rest.first().and_then(|t| t.parse().ok());
            match (channel, floats::<2>(rest.get(1..).unwrap_or(&[]))) {
                (Some(channel), Some([u, v])) => Some(MeshField::Uv {
                    channel,
                    uv: glm::vec2(u, v),
                }),
                _ => None,
            }
        }
        "fcx" => {
            let mut ids = rest.iter().map(|t| t.parse::<u32>().ok());
            match (ids.next().flatten(), ids.next().flatten(), ids.next().flatten()) {
                (Some(a), Some(b), Some(c)) => Some(MeshField::Face(a, b, c)),
                _ => None,
            }
        }
        "weights" => rest.first().and_then(|t| t.parse().ok()).map(MeshField::WeightCount),
        "wgi" => rest
            .first()
            .and_then(|t| t.parse().ok())
            .map(MeshField::WeightRangeEnd),
        "wgh" => {
            let joint: Option<u32> = rest.first().and_then(|t| t.parse().ok());
            let weight: Option<f32> = rest.get(1).and_then(|t| t.parse().ok());
            match (joint, weight) {
                (Some(joint), Some(weight)) => Some(MeshField::Weight(SkinWeight { joint, weight })),
                _ => None,
            }
        }
        _ => None,
    };

    field.unwrap_or(MeshField::Unknown)
}

/// Parses the line-oriented mesh format into a fresh `MeshGeometry`.
///
/// Fields before the first `mesh` selector have no target sub-mesh and are
/// skipped. The aggregate bounds are the union of the per-sub-mesh boxes,
/// computed once after the whole stream is consumed.
/// Upper bound on the declared sub-mesh count. The declaration drives an
/// up-front allocation, so an absurd value from a corrupt file is treated as
/// malformed instead of honored.
const MAX_SUB_MESHES: usize = 4096;

pub fn parse_mesh(reader: impl BufRead) -> Result<MeshGeometry, MeshError> {
    let mut geometry = MeshGeometry::default();
    let mut current: Option<usize> = None;
    let mut skipped = 0usize;

    for line in reader.lines() {
        let line = line?;
        let field = classify(&line);

        // Selectors and the mesh-count declaration are valid without an
        // active sub-mesh; everything else needs one.
        match field {
            MeshField::MeshCount(count) => {
                if count > MAX_SUB_MESHES {
                    log::warn!("declared sub-mesh count {count} exceeds cap, ignoring");
                    skipped += 1;
                } else {
                    geometry.sub_meshes = vec![SubMesh::default(); count];
                }
                continue;
            }
            MeshField::MeshSelect(index) => {
                current = if index < geometry.sub_meshes.len() {
                    Some(index)
                } else {
                    log::warn!("mesh selector {index} out of range, ignoring block");
                    None
                };
                continue;
            }
            MeshField::Unknown => {
                skipped += 1;
                continue;
            }
            _ => {}
        }

        let Some(sub_mesh) = current.and_then(|i| geometry.sub_meshes.get_mut(i)) else {
            skipped += 1;
            continue;
        };

        match field {
            MeshField::Material(name) => sub_mesh.texture_name = name,
            MeshField::Bounds(bounds) => sub_mesh.base_bbox = bounds,
            MeshField::Position(v) => sub_mesh.positions.push(v),
            MeshField::Normal(v) => sub_mesh.normals.push(v),
            MeshField::Tangent(v) => sub_mesh.tangents.push(v),
            MeshField::Bitangent(v) => sub_mesh.bitangents.push(v),
            MeshField::UvChannelCount(count) => sub_mesh.uvs.resize(count, Vec::new()),
            MeshField::Uv { channel, uv } => {
                if let Some(channel) = sub_mesh.uvs.get_mut(channel) {
                    channel.push(uv);
                } else {
                    skipped += 1;
                }
            }
            MeshField::Face(a, b, c) => sub_mesh.indices.extend([a, b, c]),
            MeshField::WeightCount(count) => sub_mesh.weights.reserve(count),
            MeshField::WeightRangeEnd(end) => {
                let start = sub_mesh.weight_ranges.last().map_or(0, |r| r.end);
                sub_mesh.weight_ranges.push(WeightRange { start, end });
            }
            MeshField::Weight(w) => sub_mesh.weights.push(w),
            // Count, selector and unknown lines were consumed above.
            MeshField::MeshCount(_) | MeshField::MeshSelect(_) | MeshField::Unknown => {}
        }
    }

    if skipped > 0 {
        log::debug!("mesh parse skipped {skipped} unrecognized or malformed lines");
    }

    let mut bounds = Aabb::default();
    for sub_mesh in &geometry.sub_meshes {
        bounds.expand_box(&sub_mesh.base_bbox);
    }
    geometry.bounds = bounds;

    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const ONE_TRIANGLE: &str = "\
meshes 1
mesh 0
material checker.tga
bbox 0 0 0 1 1 1
vtx 0 0 0
vtx 1 0 0
vtx 0 1 0
vnr 0 0 2
vnr 0 0 2
vnr 0 0 2
vtg 1 0 0
vtg 1 0 0
vtg 1 0 0
vbt 0 1 0
vbt 0 1 0
vbt 0 1 0
tex_channels 1
tx 0 0.0 0.0
tx 0 1.0 0.0
tx 0 0.0 1.0
fcx 0 1 2
weights 3
wgi 1
wgi 2
wgi 3
wgh 1 1.0
wgh 1 1.0
wgh 2 1.0
";

    #[test]
    fn one_triangle_round_trip() {
        let geometry = parse_mesh(Cursor::new(ONE_TRIANGLE)).unwrap();
        assert_eq!(geometry.sub_meshes.len(), 1);

        let m = &geometry.sub_meshes[0];
        assert_eq!(m.texture_name, "checker.tga");
        assert_eq!(m.positions.len(), 3);
        assert_eq!(m.normals.len(), 3);
        assert_eq!(m.tangents.len(), 3);
        assert_eq!(m.bitangents.len(), 3);
        assert_eq!(m.uvs.len(), 1);
        assert_eq!(m.uvs[0].len(), 3);
        assert_eq!(m.indices.len() % 3, 0);
        assert_eq!(m.indices, vec![0, 1, 2]);
        assert!(m.indices.iter().all(|&i| (i as usize) < m.positions.len()));
    }

    #[test]
    fn normals_are_unit_length_after_parse() {
        let geometry = parse_mesh(Cursor::new(ONE_TRIANGLE)).unwrap();
        for n in &geometry.sub_meshes[0].normals {
            assert!((n.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn aggregate_bounds_union_of_sub_meshes() {
        let geometry = parse_mesh(Cursor::new(ONE_TRIANGLE)).unwrap();
        let bounds = geometry.bounds;
        assert_eq!(bounds.min(), glm::vec3(0.0, 0.0, 0.0));
        assert_eq!(bounds.max(), glm::vec3(1.0, 1.0, 1.0));
        for p in &geometry.sub_meshes[0].positions {
            assert!(bounds.contains(*p));
        }
    }

    #[test]
    fn weight_ranges_chain_from_previous_end() {
        let geometry = parse_mesh(Cursor::new(ONE_TRIANGLE)).unwrap();
        let m = &geometry.sub_meshes[0];
        assert_eq!(m.weight_ranges.len(), 3);
        assert_eq!((m.weight_ranges[0].start, m.weight_ranges[0].end), (0, 1));
        assert_eq!((m.weight_ranges[1].start, m.weight_ranges[1].end), (1, 2));
        assert_eq!((m.weight_ranges[2].start, m.weight_ranges[2].end), (2, 3));
        assert_eq!(m.weights.len(), 3);
        assert_eq!(m.vertex_weights(2)[0].joint, 2);
    }

    #[test]
    fn unknown_and_malformed_lines_are_skipped() {
        let text = "meshes 1\nmesh 0\nvtx 1 2 3\nfrobnicate 9 9\nvtx not a number\nvtx 4 5 6\n";
        let geometry = parse_mesh(Cursor::new(text)).unwrap();
        assert_eq!(geometry.sub_meshes[0].positions.len(), 2);
    }

    #[test]
    fn fields_before_any_selector_are_dropped() {
        let text = "meshes 1\nvtx 1 2 3\nmesh 0\nvtx 4 5 6\n";
        let geometry = parse_mesh(Cursor::new(text)).unwrap();
        assert_eq!(geometry.sub_meshes[0].positions.len(), 1);
    }

    #[test]
    fn absurd_mesh_count_is_treated_as_malformed() {
        let text = "meshes 999999999\nmesh 0\nvtx 0 0 0\n";
        let geometry = parse_mesh(Cursor::new(text)).unwrap();
        // The declaration is dropped, so no sub-mesh exists to select.
        assert!(geometry.sub_meshes.is_empty());
    }

    #[test]
    fn mesh_prefix_does_not_swallow_meshes_declaration() {
        // Token-level dispatch: "meshes 2" must not read as "mesh" + junk.
        let text = "meshes 2\nmesh 1\nvtx 0 0 0\n";
        let geometry = parse_mesh(Cursor::new(text)).unwrap();
        assert_eq!(geometry.sub_meshes.len(), 2);
        assert_eq!(geometry.sub_meshes[1].positions.len(), 1);
    }
}

//! STL (binary) and OBJ (ASCII) mesh writers, selected by output extension.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::CliError;
use crate::mesh_out::Mesh;

pub fn write_mesh(mesh: &Mesh, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("stl") => write_stl(mesh, path),
        Some("obj") => write_obj(mesh, path),
        _ => Err(CliError::UnrecognisedOutputExtension(path.to_path_buf()).into()),
    }
}

fn face_normal(mesh: &Mesh, (a, b, c): (usize, usize, usize)) -> [f32; 3] {
    let pa = mesh.vertices[a].position;
    let pb = mesh.vertices[b].position;
    let pc = mesh.vertices[c].position;
    let u = (pb.0 - pa.0, pb.1 - pa.1, pb.2 - pa.2);
    let v = (pc.0 - pa.0, pc.1 - pa.1, pc.2 - pa.2);
    let n = (
        u.1 * v.2 - u.2 * v.1,
        u.2 * v.0 - u.0 * v.2,
        u.0 * v.1 - u.1 * v.0,
    );
    let length = (n.0 * n.0 + n.1 * n.1 + n.2 * n.2).sqrt();
    if length <= f64::EPSILON {
        [0.0, 0.0, 0.0]
    } else {
        [(n.0 / length) as f32, (n.1 / length) as f32, (n.2 / length) as f32]
    }
}

fn write_stl(mesh: &Mesh, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let header = [0u8; 80];
    writer.write_all(&header)?;
    writer.write_u32::<LittleEndian>(mesh.triangles.len() as u32)?;

    for &triangle in &mesh.triangles {
        let normal = face_normal(mesh, triangle);
        for component in normal {
            writer.write_f32::<LittleEndian>(component)?;
        }
        for vertex_index in [triangle.0, triangle.1, triangle.2] {
            let p = mesh.vertices[vertex_index].position;
            writer.write_f32::<LittleEndian>(p.0 as f32)?;
            writer.write_f32::<LittleEndian>(p.1 as f32)?;
            writer.write_f32::<LittleEndian>(p.2 as f32)?;
        }
        writer.write_u16::<LittleEndian>(0)?;
    }

    writer.flush()?;
    Ok(())
}

fn write_obj(mesh: &Mesh, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    for vertex in &mesh.vertices {
        writeln!(writer, "v {} {} {}", vertex.position.0, vertex.position.1, vertex.position.2)?;
    }
    for vertex in &mesh.vertices {
        writeln!(writer, "vt {} {}", vertex.uv.0, vertex.uv.1)?;
    }
    for &(a, b, c) in &mesh.triangles {
        writeln!(writer, "f {0}/{0} {1}/{1} {2}/{2}", a + 1, b + 1, c + 1)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_out::Vertex;
    use tempfile::tempdir;

    fn triangle_mesh() -> Mesh {
        Mesh {
            vertices: vec![
                Vertex { position: (0.0, 0.0, 0.0), uv: (0.0, 0.0) },
                Vertex { position: (1.0, 0.0, 0.0), uv: (1.0, 0.0) },
                Vertex { position: (0.0, 1.0, 0.0), uv: (0.0, 1.0) },
            ],
            triangles: vec![(0, 1, 2)],
        }
    }

    #[test]
    fn stl_extension_writes_a_non_empty_binary_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.stl");
        write_mesh(&triangle_mesh(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 80 + 4 + 50);
    }

    #[test]
    fn obj_extension_writes_vertex_and_face_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.obj");
        write_mesh(&triangle_mesh(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("v 0 0 0"));
        assert!(text.contains("f 1/1 2/2 3/3"));
    }

    #[test]
    fn unrecognised_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.ply");
        let err = write_mesh(&triangle_mesh(), &path).unwrap_err();
        assert!(err.to_string().contains("no recognised extension"));
    }
}

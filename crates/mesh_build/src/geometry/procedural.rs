use bevy::prelude::*;
use fastnoise_lite::{FastNoiseLite, NoiseType};
use serde::{Deserialize, Serialize};

use super::writer::GeometryWriter;
use crate::error::MeshBuildError;

/// Largest vertex lattice a grid or heightfield may produce.
pub const MAX_GRID_VERTICES: u32 = 1 << 22;

/// Built-in generators. All shapes lie on the XZ plane with +Y up.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ProceduralShape {
    /// Single triangle at (0,0,0), (0,0,1), (1,0,0).
    #[default]
    Triangle,
    /// Square with its corner at the origin.
    Quad { size: f32 },
    /// Flat grid of `columns x rows` cells.
    Grid {
        columns: u32,
        rows: u32,
        cell_size: f32,
    },
    /// Grid displaced on Y by OpenSimplex2 noise, deterministic per seed.
    Heightfield {
        columns: u32,
        rows: u32,
        cell_size: f32,
        amplitude: f32,
        frequency: f32,
        seed: i32,
    },
}

impl ProceduralShape {
    pub fn label(&self) -> &'static str {
        match self {
            ProceduralShape::Triangle => "triangle",
            ProceduralShape::Quad { .. } => "quad",
            ProceduralShape::Grid { .. } => "grid",
            ProceduralShape::Heightfield { .. } => "heightfield",
        }
    }

    /// Reject dimensions whose vertex or index counts overflow or exceed
    /// `MAX_GRID_VERTICES`.
    pub fn check(&self) -> Result<(), MeshBuildError> {
        match *self {
            ProceduralShape::Grid { columns, rows, .. }
            | ProceduralShape::Heightfield { columns, rows, .. } => {
                match grid_counts(columns, rows) {
                    Some(_) => Ok(()),
                    None => Err(MeshBuildError::GridTooLarge {
                        columns,
                        rows,
                        max_vertices: MAX_GRID_VERTICES,
                    }),
                }
            }
            ProceduralShape::Triangle | ProceduralShape::Quad { .. } => Ok(()),
        }
    }

    /// Append this shape's geometry. Grids that fail `check` write nothing.
    pub fn generate(&self, out: &mut GeometryWriter) {
        match *self {
            ProceduralShape::Triangle => {
                let a = out.push_vertex(Vec3::new(0.0, 0.0, 0.0));
                let b = out.push_vertex(Vec3::new(0.0, 0.0, 1.0));
                let c = out.push_vertex(Vec3::new(1.0, 0.0, 0.0));
                out.push_triangle(a, b, c);
            }
            ProceduralShape::Quad { size } => {
                out.push_quad([
                    Vec3::ZERO,
                    Vec3::new(0.0, 0.0, size),
                    Vec3::new(size, 0.0, size),
                    Vec3::new(size, 0.0, 0.0),
                ]);
            }
            ProceduralShape::Grid {
                columns,
                rows,
                cell_size,
            } => grid(out, columns, rows, cell_size, |_, _| 0.0),
            ProceduralShape::Heightfield {
                columns,
                rows,
                cell_size,
                amplitude,
                frequency,
                seed,
            } => {
                let mut noise = FastNoiseLite::with_seed(seed);
                noise.set_noise_type(Some(NoiseType::OpenSimplex2));
                noise.set_frequency(Some(frequency));
                grid(out, columns, rows, cell_size, |c, r| {
                    noise.get_noise_2d(c as f32, r as f32) * amplitude
                });
            }
        }
    }
}

/// Vertex and index counts of a `columns x rows` grid, or `None` if they
/// overflow or the lattice exceeds `MAX_GRID_VERTICES`.
fn grid_counts(columns: u32, rows: u32) -> Option<(u32, u32)> {
    let vertices = columns.checked_add(1)?.checked_mul(rows.checked_add(1)?)?;
    let indices = columns.checked_mul(rows)?.checked_mul(6)?;
    (vertices <= MAX_GRID_VERTICES).then_some((vertices, indices))
}

/// Emit a `(columns + 1) x (rows + 1)` vertex lattice and two triangles per cell.
fn grid(
    out: &mut GeometryWriter,
    columns: u32,
    rows: u32,
    cell_size: f32,
    mut height: impl FnMut(u32, u32) -> f32,
) {
    if columns == 0 || rows == 0 {
        return;
    }
    let Some((vertex_count, index_count)) = grid_counts(columns, rows) else {
        return;
    };
    let Some(base) = u32::try_from(out.vertex_count())
        .ok()
        .filter(|base| base.checked_add(vertex_count).is_some())
    else {
        return;
    };
    let stride = columns + 1;
    out.reserve(vertex_count as usize, index_count as usize);

    for r in 0..=rows {
        for c in 0..=columns {
            out.push_vertex(Vec3::new(
                c as f32 * cell_size,
                height(c, r),
                r as f32 * cell_size,
            ));
        }
    }

    for r in 0..rows {
        for c in 0..columns {
            let i00 = base + r * stride + c;
            let i10 = i00 + 1;
            let i01 = i00 + stride;
            let i11 = i01 + 1;
            out.push_triangle(i00, i01, i11);
            out.push_triangle(i00, i11, i10);
        }
    }
}

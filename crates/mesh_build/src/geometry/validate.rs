use crate::error::MeshBuildError;

/// Check that `indices` describe a triangle list over `vertex_count` vertices.
pub fn validate_geometry(vertex_count: usize, indices: &[u32]) -> Result<(), MeshBuildError> {
    if indices.len() % 3 != 0 {
        return Err(MeshBuildError::IndexCountNotTriangleAligned {
            count: indices.len(),
        });
    }
    if let Some((position, &index)) = indices
        .iter()
        .enumerate()
        .find(|(_, i)| **i as usize >= vertex_count)
    {
        return Err(MeshBuildError::IndexOutOfBounds {
            position,
            index,
            vertex_count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_triangle() {
        assert!(validate_geometry(3, &[0, 1, 2]).is_ok());
    }

    #[test]
    fn test_empty_geometry_is_valid() {
        assert!(validate_geometry(0, &[]).is_ok());
    }

    #[test]
    fn test_unaligned_count() {
        assert_eq!(
            validate_geometry(3, &[0, 1]),
            Err(MeshBuildError::IndexCountNotTriangleAligned { count: 2 })
        );
    }

    #[test]
    fn test_out_of_bounds_reports_first_offender() {
        assert_eq!(
            validate_geometry(3, &[0, 1, 2, 2, 3, 4]),
            Err(MeshBuildError::IndexOutOfBounds {
                position: 4,
                index: 3,
                vertex_count: 3,
            })
        );
    }
}

/// Fatal conditions of a detection call.
#[derive(Clone, Debug, PartialEq)]
pub enum DetectError {
    /// `detect` was called before any parameters were configured.
    NotConfigured,
    /// Zero-sized or inconsistent raster.
    InvalidInput { width: usize, height: usize },
    /// Precomputed edge and orientation maps disagree in size.
    DimensionMismatch {
        edges: (usize, usize),
        orientation: (usize, usize),
    },
}

impl std::fmt::Display for DetectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectError::NotConfigured => write!(f, "detector has no parameters configured"),
            DetectError::InvalidInput { width, height } => {
                write!(f, "invalid input raster {width}x{height}")
            }
            DetectError::DimensionMismatch { edges, orientation } => write!(
                f,
                "edge map {}x{} does not match orientation map {}x{}",
                edges.0, edges.1, orientation.0, orientation.1
            ),
        }
    }
}

impl std::error::Error for DetectError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let cases = [
            (DetectError::NotConfigured, "no parameters"),
            (
                DetectError::InvalidInput {
                    width: 0,
                    height: 7,
                },
                "0x7",
            ),
            (
                DetectError::DimensionMismatch {
                    edges: (4, 5),
                    orientation: (4, 6),
                },
                "4x6",
            ),
        ];
        for (err, needle) in cases {
            // parameter errors come from `configure`, never from detection
            match err {
                DetectError::NotConfigured
                | DetectError::InvalidInput { .. }
                | DetectError::DimensionMismatch { .. } => {}
            }
            assert!(err.to_string().contains(needle), "{err}");
        }
    }
}

use std::fmt;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),
    #[error("Error in {stage} shader: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },
    #[error("Link error in program: {log}")]
    Link { log: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_stage() {
        let err = RenderError::ShaderCompile {
            stage: ShaderStage::Fragment,
            log: "expected ';'".to_string(),
        };
        assert_eq!(err.to_string(), "Error in fragment shader: expected ';'");

        let err = RenderError::Link {
            log: "location 2 not provided".to_string(),
        };
        assert_eq!(err.to_string(), "Link error in program: location 2 not provided");
    }
}

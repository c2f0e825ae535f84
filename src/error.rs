use std::fmt;

/// Shader stage reported in compile diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

#[derive(Debug, thiserror::Error)]
pub enum VizError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("element #{0} not found")]
    MissingElement(String),
    #[error("WebGL2 not supported")]
    ContextUnavailable,
    #[error("failed to compile {stage} shader: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },
    #[error("failed to link program: {0}")]
    ProgramLink(String),
    #[error("failed to create {0}")]
    ResourceAllocation(&'static str),
    #[error("dom error: {0}")]
    Dom(String),
    #[error("invalid parameter patch: {0}")]
    InvalidPatch(#[source] serde_json::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(#[source] serde_json::Error),
}

pub type Result<T, E = VizError> = std::result::Result<T, E>;

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for VizError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        VizError::Dom(format!("{:?}", value))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<VizError> for wasm_bindgen::JsValue {
    fn from(err: VizError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_names_the_stage() {
        let err = VizError::ShaderCompile {
            stage: ShaderStage::Fragment,
            log: "ERROR: 0:3: syntax error".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to compile fragment shader: ERROR: 0:3: syntax error"
        );
    }
}

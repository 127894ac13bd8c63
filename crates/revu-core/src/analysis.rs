use crate::error::AnalysisError;

/// Everything a provider needs to review one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub file_name: String,
    pub code: String,
    pub prompt: Option<String>,
    pub model_id: Option<String>,
}

/// A source of raw review text. Implementations wrap an LLM provider;
/// the structured result is always produced by [`crate::extract`], never
/// by the backend itself.
pub trait AnalysisBackend {
    fn analyze(&self, request: &AnalysisRequest) -> Result<String, AnalysisError>;
}

/// Deterministic local backend for development and tests. Selects its
/// behavior from `REVU_ANALYSIS_MODE`: `ok` (default), `unavailable`,
/// `empty` or `timeout`.
#[derive(Debug, Clone, Default)]
pub struct StubAnalysisBackend;

impl StubAnalysisBackend {
    const MODE_VAR: &'static str = "REVU_ANALYSIS_MODE";
}

impl AnalysisBackend for StubAnalysisBackend {
    fn analyze(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        let mode = std::env::var(Self::MODE_VAR).unwrap_or_default();
        match mode.as_str() {
            "unavailable" => Err(AnalysisError::ProviderUnavailable {
                message: "stub backend configured as unavailable".to_string(),
            }),
            "empty" => Err(AnalysisError::EmptyResponse),
            "timeout" => Err(AnalysisError::Timeout { seconds: 30 }),
            _ => Ok(format!(
                "Análise de {}: código bem estruturado e adequado aos padrões do projeto.",
                request.file_name
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_mentions_the_file_under_review() {
        let request = AnalysisRequest {
            file_name: "ContaService.java".to_string(),
            code: "class ContaService {}".to_string(),
            prompt: None,
            model_id: None,
        };
        let text = StubAnalysisBackend.analyze(&request).unwrap();
        assert!(text.contains("ContaService.java"));
    }
}

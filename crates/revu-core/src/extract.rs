//! Turns raw analysis text into a structured [`AnalysisResult`] with a
//! keyword-driven heuristic. The extraction is a pure function of the
//! input text: the same text always yields the same result, including
//! the line numbers attached to issues.

use crate::types::enums::IssueKind;
use crate::types::review::{AnalysisResult, Issue};
use sha2::{Digest, Sha256};

pub const BASE_SCORE: i32 = 75;
pub const MIN_SCORE: i32 = 40;
pub const MAX_SCORE: i32 = 100;
pub const POSITIVE_KEYWORD_BONUS: i32 = 5;
pub const NEGATIVE_KEYWORD_PENALTY: i32 = 8;
pub const MAX_SUGGESTIONS: usize = 5;

const POSITIVE_KEYWORDS: [&str; 5] = [
    "boa qualidade",
    "bem estruturado",
    "adequado",
    "correto",
    "bom",
];

const NEGATIVE_KEYWORDS: [&str; 5] = [
    "problema",
    "erro",
    "crítico",
    "vulnerabilidade",
    "melhorar",
];

const GENERIC_SUGGESTIONS: [&str; 5] = [
    "Considere implementar validação de entrada mais robusta",
    "Adicione logging adequado para facilitar debugging",
    "Implemente tratamento de exceções específico",
    "Considere usar padrões de design appropriados",
    "Adicione documentação JavaDoc aos métodos públicos",
];

/// Request-side inputs that took part in producing the raw text. They
/// feed the derived line numbers, so two files with the same analysis
/// text still get distinct plausible lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionContext {
    pub file_name: String,
    pub model_id: Option<String>,
}

/// Computes the whole structured result from raw analysis text.
pub fn extract(raw: &str, ctx: &ExtractionContext) -> AnalysisResult {
    let lowered = raw.to_lowercase();

    AnalysisResult {
        quality_score: quality_score(&lowered),
        issues: extract_issues(raw, ctx, &lowered),
        suggestions: extract_suggestions(&lowered),
        raw_review: raw.to_string(),
    }
}

fn quality_score(lowered: &str) -> u8 {
    let mut score = BASE_SCORE;

    for keyword in POSITIVE_KEYWORDS {
        if lowered.contains(keyword) {
            score += POSITIVE_KEYWORD_BONUS;
        }
    }
    for keyword in NEGATIVE_KEYWORDS {
        if lowered.contains(keyword) {
            score -= NEGATIVE_KEYWORD_PENALTY;
        }
    }

    score.clamp(MIN_SCORE, MAX_SCORE) as u8
}

fn extract_issues(raw: &str, ctx: &ExtractionContext, lowered: &str) -> Vec<Issue> {
    let mut issues = Vec::new();

    if lowered.contains("senha") || lowered.contains("password") {
        issues.push(Issue {
            kind: IssueKind::Critical,
            message: "Possível problema de segurança com senha em texto plano".to_string(),
            line: Some(derive_line(raw, ctx, "plaintext-password")),
            severity: 9,
        });
    }

    if lowered.contains("null") || lowered.contains("nullpointer") {
        issues.push(Issue {
            kind: IssueKind::Warning,
            message: "Possível risco de NullPointerException".to_string(),
            line: Some(derive_line(raw, ctx, "null-deref")),
            severity: 6,
        });
    }

    if lowered.contains("performance") || lowered.contains("lento") {
        issues.push(Issue {
            kind: IssueKind::Info,
            message: "Oportunidade de melhoria de performance identificada".to_string(),
            line: Some(derive_line(raw, ctx, "performance")),
            severity: 4,
        });
    }

    if lowered.contains("empresta") || lowered.contains("devolve") || lowered.contains("conexão") {
        issues.push(Issue {
            kind: IssueKind::Critical,
            message: "Verificar padrão empresta()/devolve() para evitar vazamento de conexão"
                .to_string(),
            line: Some(derive_line(raw, ctx, "connection-leak")),
            severity: 9,
        });
    }

    issues
}

fn extract_suggestions(lowered: &str) -> Vec<String> {
    let mut suggestions: Vec<String> =
        GENERIC_SUGGESTIONS.iter().map(|s| (*s).to_string()).collect();

    // Topic suggestions are pushed to the front, most recently matched
    // topic first.
    if lowered.contains("conexão") || lowered.contains("database") {
        suggestions.insert(
            0,
            "Implemente o padrão empresta()/devolve() para gerenciamento de conexões".to_string(),
        );
    }
    if lowered.contains("segurança") || lowered.contains("security") {
        suggestions.insert(0, "Revise as práticas de segurança implementadas".to_string());
    }
    if lowered.contains("performance") {
        suggestions.insert(0, "Considere otimizações de performance sugeridas".to_string());
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

/// Derives a stable line number in 1..=20 from the analysis text, the
/// request context and the rule that fired. Keeps repeated extractions
/// of the same inputs bit-identical.
fn derive_line(raw: &str, ctx: &ExtractionContext, rule: &str) -> u32 {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hasher.update(ctx.file_name.as_bytes());
    if let Some(model_id) = &ctx.model_id {
        hasher.update(model_id.as_bytes());
    }
    hasher.update(rule.as_bytes());
    let digest = hasher.finalize();
    let word = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    (word % 20) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ExtractionContext {
        ExtractionContext {
            file_name: "EmprestimoService.java".to_string(),
            model_id: None,
        }
    }

    #[test]
    fn positive_keywords_raise_score() {
        let result = extract("Código de boa qualidade, bem estruturado.", &ctx());
        assert_eq!(result.quality_score, 85);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn score_never_leaves_bounds() {
        let negative = "problema erro crítico vulnerabilidade melhorar \
                        problema erro crítico";
        assert_eq!(extract(negative, &ctx()).quality_score, 40);

        let positive = "boa qualidade bem estruturado adequado correto bom";
        assert_eq!(extract(positive, &ctx()).quality_score, 100);
    }

    #[test]
    fn password_mention_yields_critical_issue() {
        let result = extract("A senha está armazenada em texto plano.", &ctx());
        let issue = result
            .issues
            .iter()
            .find(|issue| issue.kind == IssueKind::Critical)
            .unwrap();
        assert_eq!(issue.severity, 9);
        assert!(issue.message.contains("senha"));
        let line = issue.line.unwrap();
        assert!((1..=20).contains(&line));
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let result = extract("Cuidado com NULLPOINTER neste método.", &ctx());
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].kind, IssueKind::Warning);
    }

    #[test]
    fn suggestions_are_capped_at_five() {
        // All three topics fire, plus the generic list.
        let result = extract("Revise a conexão, a segurança e a performance do módulo.", &ctx());
        assert_eq!(result.suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(
            result.suggestions[0],
            "Considere otimizações de performance sugeridas"
        );
    }

    #[test]
    fn extraction_is_deterministic() {
        let raw = "Detectado problema de performance e uso de senha fixa.";
        let first = extract(raw, &ctx());
        let second = extract(raw, &ctx());
        assert_eq!(first, second);
    }

    #[test]
    fn raw_text_is_preserved_verbatim() {
        let raw = "Análise concluída.\n\nSem ressalvas.";
        assert_eq!(extract(raw, &ctx()).raw_review, raw);
    }
}

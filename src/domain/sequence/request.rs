use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Validated input for one generation. Free-text fields are sanitized on
/// construction so that nothing downstream has to worry about prompt or
/// markup injection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceRequest {
    pub grado: String,
    pub area: String,
    pub asignatura: String,
    pub tema: String,
    /// Derecho Básico de Aprendizaje reference, free text or number.
    pub dba: String,
    pub sesiones: u32,
    pub eje_crese: String,
    pub grupos: String,
    pub fecha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docente_nombre: Option<String>,
    /// Free-text adjustment to apply on top of a previous generation.
    /// Refinements are exempt from the caller-side debounce.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruccion_refinamiento: Option<String>,
    /// The previous document the refinement refers to, passed back
    /// verbatim so the model rewrites instead of starting over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respuesta_anterior: Option<serde_json::Value>,
}

impl SequenceRequest {
    /// Sanitize every free-text field and validate the invariants:
    /// at least one session, and a non-empty topic after sanitization.
    pub fn validated(mut self) -> Result<Self, DomainError> {
        self.grado = sanitize(&self.grado);
        self.area = sanitize(&self.area);
        self.asignatura = sanitize(&self.asignatura);
        self.tema = sanitize(&self.tema);
        self.dba = sanitize(&self.dba);
        self.eje_crese = sanitize(&self.eje_crese);
        self.grupos = sanitize(&self.grupos);
        self.fecha = sanitize(&self.fecha);
        self.docente_nombre = self.docente_nombre.map(|n| sanitize(&n));
        self.instruccion_refinamiento = self
            .instruccion_refinamiento
            .map(|i| sanitize(&i))
            .filter(|i| !i.is_empty());

        if self.sesiones < 1 {
            return Err(DomainError::validation("sesiones must be at least 1"));
        }

        if self.tema.is_empty() {
            return Err(DomainError::validation(
                "tema must not be empty after sanitization",
            ));
        }

        Ok(self)
    }

    /// A refinement re-runs generation over a prior answer. The caller
    /// lets these through the debounce gate.
    pub fn is_refinement(&self) -> bool {
        self.instruccion_refinamiento.is_some() && self.respuesta_anterior.is_some()
    }
}

/// Strip control characters plus quote and angle-bracket characters. The
/// result is safe to interpolate into the prompt and into XML output.
pub fn sanitize(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '\'' | '"' | '<' | '>'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> SequenceRequest {
        SequenceRequest {
            grado: "Quinto".to_string(),
            area: "Ciencias Naturales".to_string(),
            asignatura: "Biología".to_string(),
            tema: "Sistema Digestivo Humano".to_string(),
            dba: "DBA 3".to_string(),
            sesiones: 2,
            eje_crese: "Estilos de Vida Saludable".to_string(),
            grupos: "5A, 5B".to_string(),
            fecha: "2026-03-10".to_string(),
            docente_nombre: Some("Laura Pérez".to_string()),
            instruccion_refinamiento: None,
            respuesta_anterior: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let request = base_request().validated().unwrap();
        assert_eq!(request.sesiones, 2);
        assert_eq!(request.tema, "Sistema Digestivo Humano");
    }

    #[test]
    fn test_zero_sessions_rejected() {
        let mut request = base_request();
        request.sesiones = 0;
        assert!(request.validated().is_err());
    }

    #[test]
    fn test_sanitize_strips_injection_characters() {
        assert_eq!(sanitize("tema <script>\"x\"</script>"), "tema scriptx/script");
        assert_eq!(sanitize("  Fotosíntesis  "), "Fotosíntesis");
        assert_eq!(sanitize("a'b\u{0007}c"), "abc");
    }

    #[test]
    fn test_refinement_requires_instruction_and_prior_answer() {
        let mut request = base_request();
        assert!(!request.is_refinement());

        request.instruccion_refinamiento = Some("Agrega más ejercicios".to_string());
        assert!(!request.is_refinement());

        request.respuesta_anterior = Some(serde_json::json!({"tema_principal": "x"}));
        assert!(request.is_refinement());
    }

    #[test]
    fn test_blank_refinement_instruction_dropped() {
        let mut request = base_request();
        request.instruccion_refinamiento = Some("  \"\"  ".to_string());
        let request = request.validated().unwrap();
        assert!(request.instruccion_refinamiento.is_none());
    }

    #[test]
    fn test_topic_empty_after_sanitization_rejected() {
        let mut request = base_request();
        request.tema = "\"<>'".to_string();
        let err = request.validated().unwrap_err();
        assert!(err.to_string().contains("tema"));
    }
}

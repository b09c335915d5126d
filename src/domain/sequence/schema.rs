use serde_json::{json, Value};

/// Structured-output schema sent with every generation request. Every
/// core field is listed as required so a conforming provider cannot
/// omit sections, which keeps schema violations a provider bug rather
/// than an expected condition.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "tema_principal": {"type": "STRING"},
            "titulo_secuencia": {"type": "STRING"},
            "descripcion_secuencia": {"type": "STRING"},
            "proposito": {"type": "STRING"},
            "objetivos_aprendizaje": {"type": "STRING"},
            "indicadores": {
                "type": "OBJECT",
                "properties": {
                    "cognitivo": {"type": "STRING"},
                    "afectivo": {"type": "STRING"},
                    "expresivo": {"type": "STRING"}
                },
                "required": ["cognitivo", "afectivo", "expresivo"]
            },
            "ensenanzas": {"type": "ARRAY", "items": {"type": "STRING"}},
            "contenidos_desarrollar": {"type": "ARRAY", "items": {"type": "STRING"}},
            "competencias_men": {"type": "STRING"},
            "estandar_competencia": {"type": "STRING"},
            "secuencia_didactica": {
                "type": "OBJECT",
                "properties": {
                    "motivacion_encuadre": {"type": "STRING"},
                    "enunciacion": {"type": "STRING"},
                    "modelacion": {"type": "STRING"},
                    "simulacion": {"type": "STRING"},
                    "ejercitacion": {"type": "STRING"},
                    "demostracion": {"type": "STRING"}
                },
                "required": [
                    "motivacion_encuadre",
                    "enunciacion",
                    "modelacion",
                    "simulacion",
                    "ejercitacion",
                    "demostracion"
                ]
            },
            "metodologia": {"type": "STRING"},
            "corporiedad_adi": {"type": "STRING"},
            "eje_transversal_crese": {"type": "STRING"},
            "sesiones_detalle": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "numero": {"type": "INTEGER"},
                        "titulo": {"type": "STRING"},
                        "descripcion": {"type": "STRING"},
                        "tiempo": {"type": "STRING"},
                        "momento_adi": {"type": "STRING"}
                    },
                    "required": ["numero", "titulo", "descripcion", "tiempo", "momento_adi"]
                }
            },
            "rubrica": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "criterio": {"type": "STRING"},
                        "bajo": {"type": "STRING"},
                        "basico": {"type": "STRING"},
                        "alto": {"type": "STRING"},
                        "superior": {"type": "STRING"}
                    },
                    "required": ["criterio", "bajo", "basico", "alto", "superior"]
                }
            },
            "evaluacion": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "pregunta": {"type": "STRING"},
                        "tipo": {"type": "STRING"},
                        "opciones": {"type": "ARRAY", "items": {"type": "STRING"}},
                        "respuesta_correcta": {"type": "STRING"},
                        "competencia": {"type": "STRING"},
                        "explicacion": {"type": "STRING"}
                    },
                    "required": ["pregunta", "tipo", "respuesta_correcta", "explicacion"]
                }
            },
            "adecuaciones_piar": {"type": "STRING"},
            "dba_utilizado": {"type": "STRING"},
            "dba_detalle": {
                "type": "OBJECT",
                "properties": {
                    "numero": {"type": "STRING"},
                    "enunciado": {"type": "STRING"},
                    "evidencias": {"type": "ARRAY", "items": {"type": "STRING"}}
                },
                "required": ["numero", "enunciado", "evidencias"]
            },
            "recursos_links": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "nombre": {"type": "STRING"},
                        "url": {"type": "STRING"}
                    },
                    "required": ["nombre", "url"]
                }
            },
            "taller_imprimible": {
                "type": "OBJECT",
                "properties": {
                    "introduccion": {"type": "STRING"},
                    "instrucciones": {"type": "STRING"},
                    "ejercicios": {"type": "ARRAY", "items": {"type": "STRING"}},
                    "reto_creativo": {"type": "STRING"}
                },
                "required": ["introduccion", "instrucciones", "ejercicios", "reto_creativo"]
            },
            "alertas_generadas": {"type": "ARRAY", "items": {"type": "STRING"}},
            "autoevaluacion": {"type": "ARRAY", "items": {"type": "STRING"}}
        },
        "required": [
            "tema_principal",
            "titulo_secuencia",
            "descripcion_secuencia",
            "proposito",
            "objetivos_aprendizaje",
            "indicadores",
            "ensenanzas",
            "contenidos_desarrollar",
            "competencias_men",
            "estandar_competencia",
            "secuencia_didactica",
            "metodologia",
            "corporiedad_adi",
            "eje_transversal_crese",
            "sesiones_detalle",
            "rubrica",
            "evaluacion",
            "adecuaciones_piar",
            "dba_utilizado",
            "taller_imprimible"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_core_sections() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();

        for field in [
            "tema_principal",
            "secuencia_didactica",
            "rubrica",
            "evaluacion",
            "taller_imprimible",
        ] {
            assert!(required.contains(&field), "missing '{}'", field);
        }
        // Additive fields stay optional for older-style responses
        assert!(!required.contains(&"recursos_links"));
        assert!(!required.contains(&"autoevaluacion"));
    }

    #[test]
    fn test_schema_phase_keys_match_document_model() {
        let schema = response_schema();
        let phases = schema["properties"]["secuencia_didactica"]["required"]
            .as_array()
            .unwrap();
        assert_eq!(phases.len(), 6);
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SequenceRequest;
use crate::domain::DomainError;

/// Three-dimension learning indicators block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Indicadores {
    #[serde(default)]
    pub cognitivo: String,
    #[serde(default)]
    pub afectivo: String,
    #[serde(default)]
    pub expresivo: String,
}

/// The six-phase lesson cycle of the institutional format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecuenciaFases {
    #[serde(default)]
    pub motivacion_encuadre: String,
    #[serde(default)]
    pub enunciacion: String,
    #[serde(default)]
    pub modelacion: String,
    #[serde(default)]
    pub simulacion: String,
    #[serde(default)]
    pub ejercitacion: String,
    #[serde(default)]
    pub demostracion: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SesionDetalle {
    #[serde(default)]
    pub numero: u32,
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub tiempo: String,
    #[serde(default)]
    pub momento_adi: String,
}

/// One rubric row across the four institutional performance levels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RubricaRow {
    #[serde(default)]
    pub criterio: String,
    #[serde(default)]
    pub bajo: String,
    #[serde(default)]
    pub basico: String,
    #[serde(default)]
    pub alto: String,
    #[serde(default)]
    pub superior: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationItem {
    #[serde(default)]
    pub pregunta: String,
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub opciones: Vec<String>,
    #[serde(default)]
    pub respuesta_correcta: String,
    #[serde(default)]
    pub competencia: String,
    #[serde(default)]
    pub explicacion: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecursoLink {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TallerImprimible {
    #[serde(default)]
    pub introduccion: String,
    #[serde(default)]
    pub instrucciones: String,
    #[serde(default)]
    pub ejercicios: Vec<String>,
    #[serde(default)]
    pub reto_creativo: String,
}

/// Official DBA citation with its learning evidences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DbaDetalle {
    #[serde(default)]
    pub numero: String,
    #[serde(default)]
    pub enunciado: String,
    #[serde(default)]
    pub evidencias: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlVersion {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub fecha: String,
    #[serde(default)]
    pub descripcion: String,
}

/// A complete didactic sequence. One versioned schema: the core fields
/// are required from the provider, later additions are optional and
/// normalized to defaults when an older-style response omits them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DidacticSequence {
    // Header block
    #[serde(default)]
    pub institucion: String,
    #[serde(default)]
    pub formato_nombre: String,
    #[serde(default)]
    pub nombre_docente: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub asignatura: String,
    #[serde(default)]
    pub grado: String,
    #[serde(default)]
    pub grupos: String,
    #[serde(default)]
    pub fecha: String,
    #[serde(default)]
    pub num_secuencia: u32,

    // Core sections (required from the provider)
    pub tema_principal: String,
    pub titulo_secuencia: String,
    pub descripcion_secuencia: String,
    pub proposito: String,
    pub objetivos_aprendizaje: String,
    pub indicadores: Indicadores,
    pub ensenanzas: Vec<String>,
    pub contenidos_desarrollar: Vec<String>,
    pub competencias_men: String,
    pub estandar_competencia: String,
    pub secuencia_didactica: SecuenciaFases,
    pub metodologia: String,
    pub corporiedad_adi: String,
    pub eje_transversal_crese: String,
    pub sesiones_detalle: Vec<SesionDetalle>,
    pub rubrica: Vec<RubricaRow>,
    pub evaluacion: Vec<EvaluationItem>,
    pub adecuaciones_piar: String,
    pub dba_utilizado: String,

    // Additive optional fields, defaulted by normalization
    #[serde(default)]
    pub dba_detalle: Option<DbaDetalle>,
    #[serde(default)]
    pub recursos_links: Vec<RecursoLink>,
    #[serde(default)]
    pub taller_imprimible: Option<TallerImprimible>,
    #[serde(default)]
    pub alertas_generadas: Vec<String>,
    #[serde(default)]
    pub autoevaluacion: Vec<String>,
    #[serde(default)]
    pub control_versiones: Vec<ControlVersion>,

    // Footer / signatures
    #[serde(default)]
    pub elaboro: String,
    #[serde(default)]
    pub reviso: String,
    #[serde(default)]
    pub pie_fecha: String,
}

/// Core string fields the provider must return.
const REQUIRED_STRINGS: &[&str] = &[
    "tema_principal",
    "titulo_secuencia",
    "descripcion_secuencia",
    "proposito",
    "objetivos_aprendizaje",
    "competencias_men",
    "estandar_competencia",
    "metodologia",
    "corporiedad_adi",
    "eje_transversal_crese",
    "adecuaciones_piar",
    "dba_utilizado",
];

/// Core array fields the provider must return. Possibly empty, never
/// null or missing.
const REQUIRED_ARRAYS: &[&str] = &[
    "ensenanzas",
    "contenidos_desarrollar",
    "sesiones_detalle",
    "rubrica",
    "evaluacion",
];

/// Optional array fields normalized to `[]` when absent or null, in the
/// manner of older provider responses.
const OPTIONAL_ARRAYS: &[&str] = &[
    "recursos_links",
    "alertas_generadas",
    "autoevaluacion",
    "control_versiones",
];

impl DidacticSequence {
    /// Build a sequence from a raw provider response: normalize additive
    /// optional fields to defaults, then enforce the core contract. A
    /// missing or wrongly-shaped core field rejects the whole response as
    /// a schema violation, which is a distinct failure mode from a
    /// network or provider error.
    pub fn from_provider_json(value: Value) -> Result<Self, DomainError> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(DomainError::schema_violation(format!(
                    "expected a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        for field in OPTIONAL_ARRAYS {
            let entry = map.entry(field.to_string()).or_insert(Value::Null);
            if !entry.is_array() {
                *entry = Value::Array(Vec::new());
            }
        }

        for field in REQUIRED_STRINGS {
            match map.get(*field) {
                Some(Value::String(_)) => {}
                Some(other) => {
                    return Err(DomainError::schema_violation(format!(
                        "field '{}' must be a string, got {}",
                        field,
                        json_type_name(other)
                    )))
                }
                None => {
                    return Err(DomainError::schema_violation(format!(
                        "missing required field '{}'",
                        field
                    )))
                }
            }
        }

        for field in REQUIRED_ARRAYS {
            match map.get(*field) {
                Some(Value::Array(_)) => {}
                Some(other) => {
                    return Err(DomainError::schema_violation(format!(
                        "field '{}' must be an array, got {}",
                        field,
                        json_type_name(other)
                    )))
                }
                None => {
                    return Err(DomainError::schema_violation(format!(
                        "missing required field '{}'",
                        field
                    )))
                }
            }
        }

        require_object_keys(&map, "indicadores", &["cognitivo", "afectivo", "expresivo"])?;
        require_object_keys(
            &map,
            "secuencia_didactica",
            &[
                "motivacion_encuadre",
                "enunciacion",
                "modelacion",
                "simulacion",
                "ejercitacion",
                "demostracion",
            ],
        )?;

        serde_json::from_value(Value::Object(map))
            .map_err(|e| DomainError::schema_violation(format!("malformed document: {}", e)))
    }

    /// Fill the header block and signatures from the request and
    /// institutional constants. Provider-supplied values win when present.
    pub fn fill_header(&mut self, request: &SequenceRequest) {
        const INSTITUCION: &str = "Institución Educativa Guaimaral";
        const FORMATO: &str = "Preparación de Clases - Secuencia Didáctica";

        if self.institucion.is_empty() {
            self.institucion = INSTITUCION.to_string();
        }
        if self.formato_nombre.is_empty() {
            self.formato_nombre = FORMATO.to_string();
        }
        if self.nombre_docente.is_empty() {
            self.nombre_docente = request.docente_nombre.clone().unwrap_or_default();
        }
        if self.area.is_empty() {
            self.area = request.area.clone();
        }
        if self.asignatura.is_empty() {
            self.asignatura = request.asignatura.clone();
        }
        if self.grado.is_empty() {
            self.grado = request.grado.clone();
        }
        if self.grupos.is_empty() {
            self.grupos = request.grupos.clone();
        }
        if self.fecha.is_empty() {
            self.fecha = request.fecha.clone();
        }
        if self.num_secuencia == 0 {
            self.num_secuencia = 1;
        }
        if self.elaboro.is_empty() {
            self.elaboro = self.nombre_docente.clone();
        }
        if self.reviso.is_empty() {
            self.reviso = "Coordinación Académica".to_string();
        }
        if self.pie_fecha.is_empty() {
            self.pie_fecha = request.fecha.clone();
        }
        if self.control_versiones.is_empty() {
            self.control_versiones.push(ControlVersion {
                version: "1.0".to_string(),
                fecha: request.fecha.clone(),
                descripcion: "Generación inicial".to_string(),
            });
        }
    }
}

fn require_object_keys(
    map: &serde_json::Map<String, Value>,
    field: &str,
    keys: &[&str],
) -> Result<(), DomainError> {
    let obj = match map.get(field) {
        Some(Value::Object(obj)) => obj,
        Some(other) => {
            return Err(DomainError::schema_violation(format!(
                "field '{}' must be an object, got {}",
                field,
                json_type_name(other)
            )))
        }
        None => {
            return Err(DomainError::schema_violation(format!(
                "missing required field '{}'",
                field
            )))
        }
    };

    for key in keys {
        if !obj.contains_key(*key) {
            return Err(DomainError::schema_violation(format!(
                "field '{}' is missing sub-key '{}'",
                field, key
            )));
        }
    }

    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// A minimal schema-complete provider response used across the crate's
    /// tests.
    pub(crate) fn complete_response() -> Value {
        json!({
            "tema_principal": "Sistema Digestivo Humano",
            "titulo_secuencia": "Explorando la digestión",
            "descripcion_secuencia": "Secuencia de dos sesiones sobre el sistema digestivo.",
            "proposito": "Comprender el proceso digestivo.",
            "objetivos_aprendizaje": "Identificar órganos y funciones.",
            "indicadores": {
                "cognitivo": "Describe el recorrido de los alimentos.",
                "afectivo": "Valora los hábitos alimenticios saludables.",
                "expresivo": "Representa el proceso en un esquema."
            },
            "ensenanzas": ["Órganos del sistema digestivo", "Fases de la digestión"],
            "contenidos_desarrollar": ["Boca y esófago", "Estómago e intestinos"],
            "competencias_men": "Explicar fenómenos del entorno vivo.",
            "estandar_competencia": "Identifico estructuras de los seres vivos.",
            "secuencia_didactica": {
                "motivacion_encuadre": "Video introductorio.",
                "enunciacion": "Presentación de conceptos.",
                "modelacion": "Esquema guiado.",
                "simulacion": "Juego de roles.",
                "ejercitacion": "Taller en parejas.",
                "demostracion": "Exposición final."
            },
            "metodologia": "Aprendizaje activo.",
            "corporiedad_adi": "Pausas activas con movimiento.",
            "eje_transversal_crese": "Estilos de Vida Saludable",
            "sesiones_detalle": [
                {"numero": 1, "titulo": "Los órganos", "descripcion": "Exploración inicial.", "tiempo": "2 horas", "momento_adi": "Dinámica corporal."},
                {"numero": 2, "titulo": "El recorrido", "descripcion": "Profundización.", "tiempo": "2 horas", "momento_adi": "Juego de postas."}
            ],
            "rubrica": [
                {"criterio": "Identifica órganos", "bajo": "No identifica", "basico": "Identifica algunos", "alto": "Identifica la mayoría", "superior": "Identifica todos y los relaciona"}
            ],
            "evaluacion": [
                {"pregunta": "¿Dónde inicia la digestión?", "tipo": "selección múltiple", "opciones": ["Boca", "Estómago"], "respuesta_correcta": "Boca", "competencia": "Uso del conocimiento", "explicacion": "La digestión inicia en la boca."}
            ],
            "adecuaciones_piar": "Material visual ampliado.",
            "dba_utilizado": "DBA 3: Comprende que los organismos tienen sistemas.",
            "taller_imprimible": {
                "introduccion": "El viaje de los alimentos.",
                "instrucciones": "Resuelve en tu cuaderno.",
                "ejercicios": ["Dibuja el sistema digestivo"],
                "reto_creativo": "Inventa una historia de un alimento."
            }
        })
    }

    #[test]
    fn test_complete_response_parses() {
        let doc = DidacticSequence::from_provider_json(complete_response()).unwrap();
        assert_eq!(doc.sesiones_detalle.len(), 2);
        assert_eq!(doc.rubrica.len(), 1);
        assert!(doc.taller_imprimible.is_some());
        // Optional arrays normalized to empty, never missing
        assert!(doc.alertas_generadas.is_empty());
        assert!(doc.control_versiones.is_empty());
    }

    #[test]
    fn test_missing_required_string_rejected() {
        let mut response = complete_response();
        response.as_object_mut().unwrap().remove("proposito");
        let err = DidacticSequence::from_provider_json(response).unwrap_err();
        assert!(matches!(err, DomainError::SchemaViolation { .. }));
        assert!(err.to_string().contains("proposito"));
    }

    #[test]
    fn test_required_array_with_wrong_shape_rejected() {
        let mut response = complete_response();
        response["rubrica"] = json!("not an array");
        let err = DidacticSequence::from_provider_json(response).unwrap_err();
        assert!(err.to_string().contains("rubrica"));
    }

    #[test]
    fn test_missing_phase_subkey_rejected() {
        let mut response = complete_response();
        response["secuencia_didactica"]
            .as_object_mut()
            .unwrap()
            .remove("modelacion");
        let err = DidacticSequence::from_provider_json(response).unwrap_err();
        assert!(err.to_string().contains("modelacion"));
    }

    #[test]
    fn test_null_optional_array_normalized() {
        let mut response = complete_response();
        response["alertas_generadas"] = Value::Null;
        let doc = DidacticSequence::from_provider_json(response).unwrap();
        assert!(doc.alertas_generadas.is_empty());
    }

    #[test]
    fn test_non_object_rejected() {
        let err = DidacticSequence::from_provider_json(json!([1, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_fill_header_defaults() {
        let request = crate::domain::sequence::SequenceRequest {
            grado: "Quinto".to_string(),
            area: "Ciencias Naturales".to_string(),
            asignatura: "Biología".to_string(),
            tema: "Sistema Digestivo".to_string(),
            dba: String::new(),
            sesiones: 2,
            eje_crese: String::new(),
            grupos: "5A".to_string(),
            fecha: "2026-03-10".to_string(),
            docente_nombre: Some("Laura Pérez".to_string()),
            instruccion_refinamiento: None,
            respuesta_anterior: None,
        };

        let mut doc = DidacticSequence::from_provider_json(complete_response()).unwrap();
        doc.fill_header(&request);

        assert_eq!(doc.grado, "Quinto");
        assert_eq!(doc.nombre_docente, "Laura Pérez");
        assert_eq!(doc.elaboro, "Laura Pérez");
        assert_eq!(doc.num_secuencia, 1);
        assert_eq!(doc.control_versiones.len(), 1);
        assert!(!doc.institucion.is_empty());
    }
}

use serde::Deserialize;

use super::{sanitize, DidacticSequence, RubricaRow, SesionDetalle};
use crate::domain::DomainError;

/// A manual refinement applied to a generated sequence. Edits are typed
/// per section so the API cannot patch arbitrary fields, and every text
/// input goes through the same sanitizer as generation requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "campo", rename_all = "snake_case")]
pub enum SequenceUpdate {
    TituloSecuencia { texto: String },
    Proposito { texto: String },
    ObjetivosAprendizaje { texto: String },
    Metodologia { texto: String },
    AdecuacionesPiar { texto: String },
    Fase { fase: FaseUpdate, texto: String },
    Sesion { numero: u32, descripcion: String },
    RubricaCriterio { indice: usize, fila: RubricaRow },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaseUpdate {
    MotivacionEncuadre,
    Enunciacion,
    Modelacion,
    Simulacion,
    Ejercitacion,
    Demostracion,
}

impl SequenceUpdate {
    pub fn apply(self, doc: &mut DidacticSequence) -> Result<(), DomainError> {
        match self {
            Self::TituloSecuencia { texto } => {
                doc.titulo_secuencia = non_empty(texto, "titulo_secuencia")?;
            }
            Self::Proposito { texto } => {
                doc.proposito = non_empty(texto, "proposito")?;
            }
            Self::ObjetivosAprendizaje { texto } => {
                doc.objetivos_aprendizaje = non_empty(texto, "objetivos_aprendizaje")?;
            }
            Self::Metodologia { texto } => {
                doc.metodologia = non_empty(texto, "metodologia")?;
            }
            Self::AdecuacionesPiar { texto } => {
                doc.adecuaciones_piar = non_empty(texto, "adecuaciones_piar")?;
            }
            Self::Fase { fase, texto } => {
                let texto = non_empty(texto, "fase")?;
                let fases = &mut doc.secuencia_didactica;
                match fase {
                    FaseUpdate::MotivacionEncuadre => fases.motivacion_encuadre = texto,
                    FaseUpdate::Enunciacion => fases.enunciacion = texto,
                    FaseUpdate::Modelacion => fases.modelacion = texto,
                    FaseUpdate::Simulacion => fases.simulacion = texto,
                    FaseUpdate::Ejercitacion => fases.ejercitacion = texto,
                    FaseUpdate::Demostracion => fases.demostracion = texto,
                }
            }
            Self::Sesion { numero, descripcion } => {
                let descripcion = non_empty(descripcion, "sesion")?;
                let sesion: &mut SesionDetalle = doc
                    .sesiones_detalle
                    .iter_mut()
                    .find(|s| s.numero == numero)
                    .ok_or_else(|| {
                        DomainError::validation(format!("session {} does not exist", numero))
                    })?;
                sesion.descripcion = descripcion;
            }
            Self::RubricaCriterio { indice, fila } => {
                let slot = doc.rubrica.get_mut(indice).ok_or_else(|| {
                    DomainError::validation(format!("rubric row {} does not exist", indice))
                })?;
                *slot = RubricaRow {
                    criterio: sanitize(&fila.criterio),
                    bajo: sanitize(&fila.bajo),
                    basico: sanitize(&fila.basico),
                    alto: sanitize(&fila.alto),
                    superior: sanitize(&fila.superior),
                };
            }
        }
        Ok(())
    }
}

fn non_empty(texto: String, field: &str) -> Result<String, DomainError> {
    let clean = sanitize(&texto);
    if clean.is_empty() {
        return Err(DomainError::validation(format!(
            "refinement for '{}' is empty after sanitization",
            field
        )));
    }
    Ok(clean)
}

use super::SequenceRequest;

/// Build the generation prompt for a request. When the teacher supplied
/// a DBA (Derecho Básico de Aprendizaje) it anchors the sequence;
/// otherwise the model is told to pick the closest official guidance
/// from the "Orientaciones Pedagógicas" for the area and grade.
pub fn build_prompt(request: &SequenceRequest) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str(
        "Eres un experto en pedagogía y diseño curricular colombiano, especializado en el \
         modelo de Pedagogía Conceptual y en los lineamientos del MEN. Genera una secuencia \
         didáctica completa en formato institucional.\n\n",
    );

    prompt.push_str(&format!(
        "DATOS DE LA CLASE:\n\
         - Grado: {}\n\
         - Área: {}\n\
         - Asignatura: {}\n\
         - Tema: {}\n\
         - Grupos: {}\n\
         - Fecha: {}\n\
         - Número de sesiones: {}\n",
        request.grado,
        request.area,
        request.asignatura,
        request.tema,
        request.grupos,
        request.fecha,
        request.sesiones,
    ));

    if request.dba.trim().is_empty() {
        prompt.push_str(&format!(
            "\nNo se proporcionó un DBA. Selecciona el DBA oficial o la Orientación \
             Pedagógica del MEN más pertinente para el área '{}' en grado '{}' con el tema \
             '{}', cítalo textualmente en 'dba_utilizado' y detállalo en 'dba_detalle'.\n",
            request.area, request.grado, request.tema,
        ));
    } else {
        prompt.push_str(&format!(
            "\nDBA DE REFERENCIA (obligatorio, usar textualmente):\n{}\n",
            request.dba,
        ));
    }

    if !request.eje_crese.trim().is_empty() {
        prompt.push_str(&format!(
            "\nEJE TRANSVERSAL CRESE: integra el eje '{}' de forma explícita en las fases y \
             en 'eje_transversal_crese'.\n",
            request.eje_crese,
        ));
    }

    if let (Some(instruccion), Some(anterior)) = (
        &request.instruccion_refinamiento,
        &request.respuesta_anterior,
    ) {
        prompt.push_str(&format!(
            "\nSOLICITUD DE AJUSTE: parte de la secuencia ya generada que se incluye a \
             continuación y aplica únicamente este cambio, conservando todo lo demás: {}\n\
             SECUENCIA ANTERIOR (JSON):\n{}\n",
            instruccion, anterior,
        ));
    }

    prompt.push_str(&format!(
        "\nREQUISITOS:\n\
         - Desarrolla las 6 fases de la secuencia didáctica (motivación/encuadre, \
           enunciación, modelación, simulación, ejercitación, demostración).\n\
         - Genera exactamente {} sesiones en 'sesiones_detalle', numeradas desde 1, cada \
           una con momento ADI de corporeidad.\n\
         - La rúbrica debe tener al menos 4 criterios con los niveles bajo, básico, alto y \
           superior.\n\
         - La evaluación debe ser tipo SABER, con opciones cuando el tipo sea de selección \
           múltiple, indicando la respuesta correcta y su explicación.\n\
         - Incluye un taller imprimible para el estudiante.\n\
         - Incluye adecuaciones PIAR razonables para el aula.\n\
         - Responde únicamente con el JSON del esquema indicado, sin texto adicional.\n",
        request.sesiones,
    ));

    prompt
}

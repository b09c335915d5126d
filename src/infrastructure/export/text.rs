use std::fmt::Write;

use crate::domain::sequence::DidacticSequence;

/// Plain-text rendering of a sequence in the same section order as the
/// Word export. Used for previews and quick copies.
pub fn render_text(doc: &DidacticSequence) -> String {
    let mut out = String::with_capacity(8 * 1024);

    let _ = writeln!(out, "{}", doc.institucion);
    let _ = writeln!(out, "{}", doc.formato_nombre);
    let _ = writeln!(
        out,
        "Docente: {} | Área: {} | Asignatura: {} | Grado: {} {} | Fecha: {}",
        doc.nombre_docente, doc.area, doc.asignatura, doc.grado, doc.grupos, doc.fecha
    );

    section(&mut out, "1. Identificación");
    field(&mut out, "Tema principal", &doc.tema_principal);
    field(&mut out, "Título", &doc.titulo_secuencia);
    field(&mut out, "Descripción", &doc.descripcion_secuencia);
    field(&mut out, "Propósito", &doc.proposito);
    field(&mut out, "Objetivos", &doc.objetivos_aprendizaje);

    section(&mut out, "2. Referentes curriculares");
    field(&mut out, "DBA", &doc.dba_utilizado);
    field(&mut out, "Competencias MEN", &doc.competencias_men);
    field(&mut out, "Estándar", &doc.estandar_competencia);
    field(&mut out, "Eje CRESE", &doc.eje_transversal_crese);

    section(&mut out, "3. Indicadores de desempeño");
    field(&mut out, "Cognitivo", &doc.indicadores.cognitivo);
    field(&mut out, "Afectivo", &doc.indicadores.afectivo);
    field(&mut out, "Expresivo", &doc.indicadores.expresivo);

    section(&mut out, "4. Enseñanzas y contenidos");
    for item in doc.ensenanzas.iter().chain(&doc.contenidos_desarrollar) {
        let _ = writeln!(out, "  - {}", item);
    }

    section(&mut out, "5. Secuencia didáctica");
    let fases = &doc.secuencia_didactica;
    field(&mut out, "Motivación y encuadre", &fases.motivacion_encuadre);
    field(&mut out, "Enunciación", &fases.enunciacion);
    field(&mut out, "Modelación", &fases.modelacion);
    field(&mut out, "Simulación", &fases.simulacion);
    field(&mut out, "Ejercitación", &fases.ejercitacion);
    field(&mut out, "Demostración", &fases.demostracion);
    field(&mut out, "Metodología", &doc.metodologia);
    field(&mut out, "Corporeidad ADI", &doc.corporiedad_adi);

    section(&mut out, "6. Sesiones");
    for sesion in &doc.sesiones_detalle {
        let _ = writeln!(
            out,
            "  Sesión {} - {} ({}): {} [ADI: {}]",
            sesion.numero, sesion.titulo, sesion.tiempo, sesion.descripcion, sesion.momento_adi
        );
    }

    section(&mut out, "7. Rúbrica de evaluación");
    for row in &doc.rubrica {
        let _ = writeln!(
            out,
            "  {} | Bajo: {} | Básico: {} | Alto: {} | Superior: {}",
            row.criterio, row.bajo, row.basico, row.alto, row.superior
        );
    }

    section(&mut out, "8. Evaluación tipo SABER");
    for (i, item) in doc.evaluacion.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} ({})", i + 1, item.pregunta, item.tipo);
        for opcion in &item.opciones {
            let _ = writeln!(out, "     * {}", opcion);
        }
        if !item.respuesta_correcta.is_empty() {
            let _ = writeln!(out, "     Respuesta: {}", item.respuesta_correcta);
        }
    }

    section(&mut out, "9. Adecuaciones PIAR");
    let _ = writeln!(out, "  {}", doc.adecuaciones_piar);

    if let Some(taller) = &doc.taller_imprimible {
        section(&mut out, "10. Taller imprimible");
        let _ = writeln!(out, "  {}", taller.introduccion);
        field(&mut out, "Instrucciones", &taller.instrucciones);
        for ejercicio in &taller.ejercicios {
            let _ = writeln!(out, "  - {}", ejercicio);
        }
        field(&mut out, "Reto creativo", &taller.reto_creativo);
    }

    let _ = writeln!(
        out,
        "\nElaboró: {} | Revisó: {} | Fecha: {}",
        doc.elaboro, doc.reviso, doc.pie_fecha
    );

    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", title);
}

fn field(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {}: {}", label, value);
}

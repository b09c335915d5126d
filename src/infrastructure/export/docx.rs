use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::sequence::DidacticSequence;
use crate::domain::DomainError;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:style w:type="paragraph" w:styleId="Titulo"><w:name w:val="Titulo"/><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Seccion"><w:name w:val="Seccion"/><w:rPr><w:b/><w:sz w:val="26"/></w:rPr></w:style>
</w:styles>"#;

/// Renders a sequence as a Word document laid out in the order of the
/// printed institutional format.
#[derive(Debug, Clone, Default)]
pub struct DocxExporter;

impl DocxExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn export(&self, doc: &DidacticSequence) -> Result<Vec<u8>, DomainError> {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            build_body(doc)
        );

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, content) in [
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", ROOT_RELS),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS),
            ("word/styles.xml", STYLES),
            ("word/document.xml", document.as_str()),
        ] {
            zip.start_file(name, options)
                .map_err(|e| DomainError::internal(format!("Failed to write docx: {}", e)))?;
            zip.write_all(content.as_bytes())
                .map_err(|e| DomainError::internal(format!("Failed to write docx: {}", e)))?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| DomainError::internal(format!("Failed to finish docx: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

fn esc(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

fn paragraph(text: &str) -> String {
    format!(
        r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        esc(text)
    )
}

fn styled(style: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        style,
        esc(text)
    )
}

fn labeled(label: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">{}: </w:t></w:r><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        esc(label),
        esc(text)
    )
}

fn bullet(text: &str) -> String {
    paragraph(&format!("• {}", text))
}

fn cell(text: &str, bold: bool) -> String {
    let run = if bold {
        format!(
            r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#,
            esc(text)
        )
    } else {
        format!(r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r>"#, esc(text))
    };
    format!("<w:tc><w:p>{}</w:p></w:tc>", run)
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut xml = String::from(
        r#"<w:tbl><w:tblPr><w:tblBorders><w:top w:val="single"/><w:bottom w:val="single"/><w:left w:val="single"/><w:right w:val="single"/><w:insideH w:val="single"/><w:insideV w:val="single"/></w:tblBorders></w:tblPr>"#,
    );
    xml.push_str("<w:tr>");
    for header in headers {
        xml.push_str(&cell(header, true));
    }
    xml.push_str("</w:tr>");
    for row in rows {
        xml.push_str("<w:tr>");
        for value in row {
            xml.push_str(&cell(value, false));
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

fn build_body(doc: &DidacticSequence) -> String {
    let mut body = String::with_capacity(16 * 1024);

    body.push_str(&styled("Titulo", &doc.institucion));
    body.push_str(&styled("Titulo", &doc.formato_nombre));
    body.push_str(&table(
        &["Docente", "Área", "Asignatura", "Grado", "Grupos", "Fecha", "N° Secuencia"],
        &[vec![
            doc.nombre_docente.clone(),
            doc.area.clone(),
            doc.asignatura.clone(),
            doc.grado.clone(),
            doc.grupos.clone(),
            doc.fecha.clone(),
            doc.num_secuencia.to_string(),
        ]],
    ));

    body.push_str(&styled("Seccion", "1. Identificación"));
    body.push_str(&labeled("Tema principal", &doc.tema_principal));
    body.push_str(&labeled("Título de la secuencia", &doc.titulo_secuencia));
    body.push_str(&labeled("Descripción", &doc.descripcion_secuencia));
    body.push_str(&labeled("Propósito", &doc.proposito));
    body.push_str(&labeled("Objetivos de aprendizaje", &doc.objetivos_aprendizaje));

    body.push_str(&styled("Seccion", "2. Referentes curriculares"));
    body.push_str(&labeled("DBA", &doc.dba_utilizado));
    if let Some(detalle) = &doc.dba_detalle {
        body.push_str(&labeled(
            "DBA detalle",
            &format!("{} - {}", detalle.numero, detalle.enunciado),
        ));
        for evidencia in &detalle.evidencias {
            body.push_str(&bullet(evidencia));
        }
    }
    body.push_str(&labeled("Competencias MEN", &doc.competencias_men));
    body.push_str(&labeled("Estándar de competencia", &doc.estandar_competencia));
    body.push_str(&labeled("Eje transversal CRESE", &doc.eje_transversal_crese));

    body.push_str(&styled("Seccion", "3. Indicadores de desempeño"));
    body.push_str(&labeled("Cognitivo", &doc.indicadores.cognitivo));
    body.push_str(&labeled("Afectivo", &doc.indicadores.afectivo));
    body.push_str(&labeled("Expresivo", &doc.indicadores.expresivo));

    body.push_str(&styled("Seccion", "4. Enseñanzas y contenidos"));
    for ensenanza in &doc.ensenanzas {
        body.push_str(&bullet(ensenanza));
    }
    for contenido in &doc.contenidos_desarrollar {
        body.push_str(&bullet(contenido));
    }

    body.push_str(&styled("Seccion", "5. Secuencia didáctica"));
    let fases = &doc.secuencia_didactica;
    body.push_str(&labeled("Motivación y encuadre", &fases.motivacion_encuadre));
    body.push_str(&labeled("Enunciación", &fases.enunciacion));
    body.push_str(&labeled("Modelación", &fases.modelacion));
    body.push_str(&labeled("Simulación", &fases.simulacion));
    body.push_str(&labeled("Ejercitación", &fases.ejercitacion));
    body.push_str(&labeled("Demostración", &fases.demostracion));
    body.push_str(&labeled("Metodología", &doc.metodologia));
    body.push_str(&labeled("Corporeidad ADI", &doc.corporiedad_adi));

    body.push_str(&styled("Seccion", "6. Sesiones"));
    body.push_str(&table(
        &["N°", "Título", "Descripción", "Tiempo", "Momento ADI"],
        &doc.sesiones_detalle
            .iter()
            .map(|s| {
                vec![
                    s.numero.to_string(),
                    s.titulo.clone(),
                    s.descripcion.clone(),
                    s.tiempo.clone(),
                    s.momento_adi.clone(),
                ]
            })
            .collect::<Vec<_>>(),
    ));

    body.push_str(&styled("Seccion", "7. Rúbrica de evaluación"));
    body.push_str(&table(
        &["Criterio", "Bajo", "Básico", "Alto", "Superior"],
        &doc.rubrica
            .iter()
            .map(|r| {
                vec![
                    r.criterio.clone(),
                    r.bajo.clone(),
                    r.basico.clone(),
                    r.alto.clone(),
                    r.superior.clone(),
                ]
            })
            .collect::<Vec<_>>(),
    ));

    body.push_str(&styled("Seccion", "8. Evaluación tipo SABER"));
    for (i, item) in doc.evaluacion.iter().enumerate() {
        body.push_str(&labeled(
            &format!("Pregunta {}", i + 1),
            &format!("{} ({})", item.pregunta, item.tipo),
        ));
        for opcion in &item.opciones {
            body.push_str(&bullet(opcion));
        }
        if !item.respuesta_correcta.is_empty() {
            body.push_str(&labeled("Respuesta correcta", &item.respuesta_correcta));
        }
        if !item.explicacion.is_empty() {
            body.push_str(&labeled("Explicación", &item.explicacion));
        }
    }

    body.push_str(&styled("Seccion", "9. Adecuaciones PIAR"));
    body.push_str(&paragraph(&doc.adecuaciones_piar));

    if let Some(taller) = &doc.taller_imprimible {
        body.push_str(&styled("Seccion", "10. Taller imprimible"));
        body.push_str(&paragraph(&taller.introduccion));
        body.push_str(&labeled("Instrucciones", &taller.instrucciones));
        for ejercicio in &taller.ejercicios {
            body.push_str(&bullet(ejercicio));
        }
        body.push_str(&labeled("Reto creativo", &taller.reto_creativo));
    }

    if !doc.recursos_links.is_empty() {
        body.push_str(&styled("Seccion", "Recursos"));
        for recurso in &doc.recursos_links {
            body.push_str(&bullet(&format!("{}: {}", recurso.nombre, recurso.url)));
        }
    }

    if !doc.autoevaluacion.is_empty() {
        body.push_str(&styled("Seccion", "Autoevaluación"));
        for item in &doc.autoevaluacion {
            body.push_str(&bullet(item));
        }
    }

    if !doc.control_versiones.is_empty() {
        body.push_str(&styled("Seccion", "Control de versiones"));
        body.push_str(&table(
            &["Versión", "Fecha", "Descripción"],
            &doc.control_versiones
                .iter()
                .map(|v| vec![v.version.clone(), v.fecha.clone(), v.descripcion.clone()])
                .collect::<Vec<_>>(),
        ));
    }

    body.push_str(&table(
        &["Elaboró", "Revisó", "Fecha"],
        &[vec![doc.elaboro.clone(), doc.reviso.clone(), doc.pie_fecha.clone()]],
    ));

    body.push_str(r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>"#);
    body
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use crate::domain::sequence::complete_response;

    fn doc() -> DidacticSequence {
        let mut doc =
            DidacticSequence::from_provider_json(complete_response()).unwrap();
        doc.institucion = "Institución Educativa Guaimaral".to_string();
        doc.formato_nombre = "Preparación de Clases".to_string();
        doc.nombre_docente = "Laura & Co.".to_string();
        doc
    }

    fn document_xml(bytes: Vec<u8>) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name("word/document.xml").unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_export_is_a_valid_zip_with_expected_parts() {
        let bytes = DocxExporter::new().export(&doc()).unwrap();
        assert_eq!(&bytes[..4], b"PK\x03\x04");

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/_rels/document.xml.rels",
            "word/styles.xml",
            "word/document.xml",
        ] {
            assert!(archive.by_name(part).is_ok(), "missing part {}", part);
        }
    }

    #[test]
    fn test_document_follows_section_order() {
        let content = document_xml(DocxExporter::new().export(&doc()).unwrap());

        let tema = content.find("Sistema Digestivo Humano").unwrap();
        let fases = content.find("Motivación y encuadre").unwrap();
        let rubrica = content.find("Rúbrica de evaluación").unwrap();
        let taller = content.find("Taller imprimible").unwrap();
        assert!(tema < fases && fases < rubrica && rubrica < taller);
    }

    #[test]
    fn test_text_is_xml_escaped() {
        let content = document_xml(DocxExporter::new().export(&doc()).unwrap());
        assert!(content.contains("Laura &amp; Co."));
        assert!(!content.contains("Laura & Co."));
    }

    #[test]
    fn test_sessions_render_as_table_rows() {
        let content = document_xml(DocxExporter::new().export(&doc()).unwrap());
        assert!(content.contains("Los órganos"));
        assert!(content.contains("El recorrido"));
    }
}

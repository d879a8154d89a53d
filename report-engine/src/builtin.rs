//! FILENAME: report-engine/src/builtin.rs
//! The built-in report types, in registration order.

use records::{Alignment, ColumnSpec};

use crate::descriptor::{Consolidation, FormTemplate, RendererDescriptor, RendererKind};

pub const DAILY_REPORT: &str = "daily_report";
pub const GENERAL_REPORT: &str = "general_report";
pub const F049_REPORT: &str = "f049_report";

/// Reception date field of the material reception list.
pub const RECEPTION_DATE_FIELD: &str = "FECHA_RECEPCION";

/// All built-in descriptors. `default_candidates` is the date field
/// priority used by report types that do not name their own.
pub fn builtin_descriptors(default_candidates: &[String]) -> Vec<RendererDescriptor> {
    vec![
        daily_report(default_candidates),
        general_report(default_candidates),
        f049_report(default_candidates),
    ]
}

pub fn daily_report(default_candidates: &[String]) -> RendererDescriptor {
    RendererDescriptor {
        identifier: DAILY_REPORT.to_string(),
        display_name: "Detallado".to_string(),
        columns: vec![
            ColumnSpec::new("PROYECTO", 30.0, "PROYECTO"),
            ColumnSpec::new("RUTA", 35.0, "RUTA"),
            ColumnSpec::new("DESCRIPCION", 60.0, "DESCRIPCION"),
            ColumnSpec::new("PLACA", 20.0, "PLACA").centered(),
            ColumnSpec::new("MATERIAL", 40.0, "MATERIAL"),
            ColumnSpec::new("VOLUMEN", 20.0, "VOLUMEN")
                .numeric(2)
                .aligned(Alignment::Right),
            ColumnSpec::new("OBSERVACION", 60.0, "OBSERVACION"),
        ],
        date_candidates: default_candidates.to_vec(),
        consolidation: None,
        renderer: RendererKind::HtmlDetail {
            title: "Reporte Diario Detallado".to_string(),
        },
    }
}

pub fn general_report(default_candidates: &[String]) -> RendererDescriptor {
    RendererDescriptor {
        identifier: GENERAL_REPORT.to_string(),
        display_name: "General".to_string(),
        columns: vec![
            ColumnSpec::new("RUTA", 60.0, "RUTA"),
            ColumnSpec::new("VOLUMEN", 30.0, "VOLUMEN")
                .numeric(2)
                .aligned(Alignment::Right),
        ],
        date_candidates: default_candidates.to_vec(),
        consolidation: Some(Consolidation {
            group_column: "RUTA".to_string(),
            sum_column: "VOLUMEN".to_string(),
            group_label: "Ruta".to_string(),
            count_label: "Cantidad de Viajes".to_string(),
            sum_label: "Volumen Total (m³)".to_string(),
            sum_decimal_places: 2,
        }),
        renderer: RendererKind::HtmlSummary {
            title: "Reporte General de Transporte".to_string(),
        },
    }
}

pub fn f049_report(default_candidates: &[String]) -> RendererDescriptor {
    let mut date_candidates = vec![RECEPTION_DATE_FIELD.to_string()];
    date_candidates.extend(
        default_candidates
            .iter()
            .filter(|c| c.as_str() != RECEPTION_DATE_FIELD)
            .cloned(),
    );

    RendererDescriptor {
        identifier: F049_REPORT.to_string(),
        display_name: "F-049".to_string(),
        columns: vec![
            ColumnSpec::new("PROVEEDOR", 40.0, "PROVEEDOR"),
            ColumnSpec::new("REMISIÓN", 25.0, "REMISION").centered(),
            ColumnSpec::new("IDENTIFICACION LOTE", 35.0, "LOTE"),
            ColumnSpec::new("DESCRIPCION", 50.0, "DESCRIPCION"),
            ColumnSpec::new("UND", 15.0, "UNIDAD").centered().fixed("M3"),
            ColumnSpec::new("CERTIFICADO DE CALIDAD", 40.0, "CERTIFICADO_CALIDAD"),
            ColumnSpec::new("INSPECCION VISUAL", 30.0, "INSPECCION_VISUAL"),
            ColumnSpec::new("ACTIVIDAD A E.", 30.0, "ACTIVIDAD_EJECUTAR"),
        ],
        date_candidates,
        consolidation: None,
        renderer: RendererKind::GridForm(FormTemplate {
            form_code: "F-049".to_string(),
            title_lines: vec![
                "RECEPCION Y CONTROL DE MATERIALES".to_string(),
                "EN LA VIA Y/O ALMACEN".to_string(),
            ],
            file_prefix: "F049".to_string(),
        }),
    }
}

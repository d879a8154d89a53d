//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for report-engine integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use records::Record;
use report_engine::{
    DateWindow, InMemorySource, MemoizedSource, RecordSource, ReportDispatcher, ReportSettings,
    RunOptions, SourceError,
};
use serde_json::json;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn report_date() -> NaiveDate {
    date(2024, 3, 1)
}

pub fn generated_at() -> NaiveDateTime {
    date(2024, 3, 2).and_hms_opt(7, 15, 0).unwrap()
}

pub fn options() -> RunOptions {
    RunOptions::at(generated_at())
}

/// One transport trip as the list store returns it.
pub fn trip(id: u32, created: &str, route: &str, volume: f64) -> Record {
    Record::from_json(json!({
        "ID": id,
        "Created": created,
        "Modified": "2024-04-30T12:00:00Z",
        "PROYECTO": "MAVA",
        "RUTA": route,
        "DESCRIPCION": "Relleno Adecuado (Terraglen)",
        "PLACA": format!("P{}", id),
        "MATERIAL": {"Title": "Recebo", "Value": "7"},
        "VOLUMEN": volume,
        "OBSERVACION": null
    }))
}

/// Six trips: four on 2024-03-01 and two on 2024-03-02 (Bogota time),
/// interleaved. Kept ids for 2024-03-01 are 1, 3, 4, 6.
pub fn six_trips() -> Vec<Record> {
    vec![
        trip(1, "2024-03-01T13:00:00Z", "Norte", 10.5),
        trip(2, "2024-03-02T13:00:00Z", "Norte", 99.0),
        trip(3, "2024-03-01T18:30:00Z", "Sur", 20.25),
        trip(4, "2024-03-01 09:00:00", "Norte", 5.0),
        trip(5, "2024-03-02T16:00:00-05:00", "Sur", 99.0),
        trip(6, "01/03/2024", "Centro", 0.0),
    ]
}

/// One material reception, for the F-049 form.
pub fn reception(id: u32, received: &str) -> Record {
    Record::from_json(json!({
        "ID": id,
        "FECHA_RECEPCION": received,
        "Created": "2024-03-05T12:00:00Z",
        "PROVEEDOR": {"Title": "TRANSPORTES Y MOVIMIENTOS CIVILES ACC.S.A.S"},
        "REMISION": format!("1217{:02}", id),
        "LOTE": "2812",
        "DESCRIPCION": "Relleno Adecuado (Terraglen)",
        "UNIDAD": "TON",
        "CERTIFICADO_CALIDAD": "",
        "INSPECCION_VISUAL": "16,38",
        "ACTIVIDAD_EJECUTAR": ["Terraplén", "Sub-base"]
    }))
}

/// Test harness bundling a dispatcher over the built-in reports.
pub struct TestHarness {
    pub dispatcher: ReportDispatcher,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_settings(ReportSettings::default())
    }

    pub fn with_settings(settings: ReportSettings) -> Self {
        TestHarness {
            dispatcher: ReportDispatcher::with_builtin_reports(settings).unwrap(),
        }
    }

    pub fn memoized(records: Vec<Record>) -> MemoizedSource<InMemorySource> {
        MemoizedSource::new(InMemorySource::new(records))
    }
}

/// Source that remembers what it was asked for.
#[derive(Default)]
pub struct RecordingSource {
    pub records: Vec<Record>,
    pub calls: Vec<(DateWindow, Vec<String>)>,
}

impl RecordingSource {
    pub fn new(records: Vec<Record>) -> Self {
        RecordingSource {
            records,
            calls: Vec::new(),
        }
    }
}

impl RecordSource for RecordingSource {
    fn fetch(&mut self, window: &DateWindow, fields: &[String]) -> Result<Vec<Record>, SourceError> {
        self.calls.push((*window, fields.to_vec()));
        Ok(self.records.clone())
    }
}

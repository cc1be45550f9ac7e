//! CSV export of the loaded measurements
//!
//! UTF-8 with a BOM so spreadsheet tools pick the right encoding for the
//! Chinese header.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::domain::measurement::Measurement;
use crate::error::{Error, Result};
use crate::i18n::{Locale, t};
use crate::utils::format::format_record_time;

const BOM: &[u8] = b"\xEF\xBB\xBF";

const HEADER: [&str; 5] = ["序号", "系统ID", "记录时间", "总辐射(W/m²)", "设备温度(°C)"];

/// `测量数据_{system_id}_{date}.csv`
pub fn export_filename(system_id: &str, date: NaiveDate) -> String {
    format!("测量数据_{}_{}.csv", system_id, date.format("%Y-%m-%d"))
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write `rows` in the given order, numbered from 1
pub fn write_csv<W: Write>(mut out: W, rows: &[Measurement], tz: Tz) -> Result<()> {
    out.write_all(BOM)?;
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADER)?;
    for (index, m) in rows.iter().enumerate() {
        writer.write_record([
            (index + 1).to_string(),
            m.system_id.clone(),
            format_record_time(&m.wall_clock(tz)),
            cell(m.irradiance),
            cell(m.temperature),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Export into `dir`; an empty list is refused
pub fn export_to_dir(
    dir: &Path,
    system_id: &str,
    date: NaiveDate,
    rows: &[Measurement],
    tz: Tz,
    locale: Locale,
) -> Result<PathBuf> {
    if rows.is_empty() {
        return Err(Error::Validation {
            message: t(locale, "export-empty"),
        });
    }

    let path = dir.join(export_filename(system_id, date));
    let file = File::create(&path)?;
    write_csv(BufWriter::new(file), rows, tz)?;
    tracing::info!("Exported {} measurements to {}", rows.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::{parse_date, parse_timezone};

    fn rows() -> Vec<Measurement> {
        serde_json::from_str(
            r#"[
                {"system_id":"PV-001","timestamp":"2026-02-03T07:00:00","local_time":"2026-02-03T15:00:00+08:00","irradiance":512.5,"temperature":0.0},
                {"system_id":"PV-001","timestamp":"2026-02-03T07:01:00","irradiance":null,"temperature":31.2}
            ]"#,
        )
        .expect("rows")
    }

    #[test]
    fn test_filename() {
        let date = parse_date("2026-02-03").expect("date");
        assert_eq!(export_filename("PV-001", date), "测量数据_PV-001_2026-02-03.csv");
    }

    #[test]
    fn test_csv_content() {
        let tz = parse_timezone("Asia/Shanghai").expect("tz");
        let mut buf = Vec::new();
        write_csv(&mut buf, &rows(), tz).expect("csv");

        assert!(buf.starts_with(BOM));
        let text = String::from_utf8(buf[BOM.len()..].to_vec()).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "序号,系统ID,记录时间,总辐射(W/m²),设备温度(°C)");
        assert_eq!(lines[1], "1,PV-001,2026-02-03 15:00:00,512.5,0");
        assert_eq!(lines[2], "2,PV-001,2026-02-03 15:01:00,,31.2");
    }

    #[test]
    fn test_empty_export_refused() {
        let tz = parse_timezone("Asia/Shanghai").expect("tz");
        let date = parse_date("2026-02-03").expect("date");
        let err = export_to_dir(&std::env::temp_dir(), "PV-001", date, &[], tz, Locale::ZhCN)
            .expect_err("empty");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "没有可导出的数据");
    }
}

//! CSV import/export for student records.
//!
//! The import format mirrors the export: one header row, amounts in
//! minor units. Row-level failures are collected, not fatal.

use serde::{Deserialize, Serialize};

use crate::domain::Student;
use crate::errors::{AppError, AppResult};
use crate::infra::NewStudent;

/// One row of the student import/export file.
#[derive(Debug, Serialize, Deserialize)]
pub struct StudentCsvRow {
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub class_name: String,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub guardian_name: Option<String>,
    #[serde(default)]
    pub guardian_phone: Option<String>,
    #[serde(default)]
    pub total_fees: i64,
}

impl From<StudentCsvRow> for NewStudent {
    fn from(row: StudentCsvRow) -> Self {
        Self {
            admission_no: row.admission_no,
            first_name: row.first_name,
            last_name: row.last_name,
            class_name: row.class_name,
            section: row.section,
            guardian_name: row.guardian_name,
            guardian_phone: row.guardian_phone,
            total_fees: row.total_fees,
        }
    }
}

/// Parse an uploaded CSV file.
///
/// Returns the parsed rows and the parse failures, each carrying its
/// 1-based data row number in the file. Keeping the number with the row
/// means later rejections (duplicates, bad values) still point at the
/// right line even when earlier rows failed to parse.
pub fn parse_students(
    data: &[u8],
) -> AppResult<(Vec<(usize, StudentCsvRow)>, Vec<(usize, String)>)> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (i, result) in reader.deserialize::<StudentCsvRow>().enumerate() {
        match result {
            Ok(row) => rows.push((i + 1, row)),
            Err(e) => errors.push((i + 1, e.to_string())),
        }
    }

    if rows.is_empty() && errors.is_empty() {
        return Err(AppError::validation("CSV file contains no data rows"));
    }

    Ok((rows, errors))
}

/// Serialize students to a CSV document.
pub fn export_students(students: &[Student]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for student in students {
        let row = StudentCsvRow {
            admission_no: student.admission_no.clone(),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            class_name: student.class_name.clone(),
            section: student.section.clone(),
            guardian_name: student.guardian_name.clone(),
            guardian_phone: student.guardian_phone.clone(),
            total_fees: student.total_fees,
        };
        writer
            .serialize(row)
            .map_err(|e| AppError::internal(format!("CSV write failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV write failed: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| AppError::internal(format!("CSV encoding: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StudentStatus;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn parses_well_formed_rows() {
        let data = b"admission_no,first_name,last_name,class_name,section,guardian_name,guardian_phone,total_fees\n\
            ADM-1,Amina,Yusuf,Grade 7,A,Halima Yusuf,0700123456,50000\n\
            ADM-2,Brian,Otieno,Grade 7,,,,0\n";

        let (rows, errors) = parse_students(data).unwrap();
        assert!(errors.is_empty());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, 1);
        assert_eq!(rows[0].1.admission_no, "ADM-1");
        assert_eq!(rows[0].1.total_fees, 50_000);
        assert_eq!(rows[1].1.section, None);
    }

    #[test]
    fn collects_row_errors_without_aborting() {
        let data = b"admission_no,first_name,last_name,class_name,section,guardian_name,guardian_phone,total_fees\n\
            ADM-1,Amina,Yusuf,Grade 7,,,,notanumber\n\
            ADM-2,Brian,Otieno,Grade 7,,,,0\n";

        let (rows, errors) = parse_students(data).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, 1);
        // The surviving row keeps its position in the file
        assert_eq!(rows[0].0, 2);
        assert_eq!(rows[0].1.admission_no, "ADM-2");
    }

    #[test]
    fn empty_file_is_rejected() {
        let data = b"admission_no,first_name,last_name,class_name,section,guardian_name,guardian_phone,total_fees\n";
        assert!(parse_students(data).is_err());
    }

    #[test]
    fn export_round_trips() {
        let student = Student {
            id: Uuid::new_v4(),
            admission_no: "ADM-9".to_string(),
            first_name: "C".to_string(),
            last_name: "D".to_string(),
            class_name: "Grade 8".to_string(),
            section: Some("B".to_string()),
            guardian_name: None,
            guardian_phone: None,
            total_fees: 75_000,
            paid_fees: 0,
            fee_balance: 75_000,
            status: StudentStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };

        let out = export_students(&[student]).unwrap();
        let (rows, errors) = parse_students(out.as_bytes()).unwrap();
        assert!(errors.is_empty());
        assert_eq!(rows[0].1.admission_no, "ADM-9");
        assert_eq!(rows[0].1.total_fees, 75_000);
    }
}

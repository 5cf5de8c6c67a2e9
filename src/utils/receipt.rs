//! HTML receipt rendering for fee payments.

use chrono::{DateTime, Utc};

use crate::services::ReceiptData;

/// Format a minor-unit amount as a decimal string, e.g. 150050 -> "1500.50".
pub fn format_amount(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Render a printable receipt page for one payment.
pub fn render(data: &ReceiptData) -> String {
    let school_name = data
        .settings
        .as_ref()
        .map(|s| s.school_name.as_str())
        .unwrap_or("School");
    let currency = data
        .settings
        .as_ref()
        .map(|s| s.currency.as_str())
        .unwrap_or("USD");

    let reference = data
        .payment
        .reference
        .as_deref()
        .map(|r| {
            format!(
                "<tr><th>Reference</th><td>{}</td></tr>",
                escape(r)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Receipt {receipt_no}</title>
<style>
body {{ font-family: sans-serif; max-width: 40em; margin: 2em auto; }}
h1 {{ font-size: 1.4em; }}
table {{ width: 100%; border-collapse: collapse; }}
th {{ text-align: left; padding: 0.3em 0.5em; width: 40%; }}
td {{ padding: 0.3em 0.5em; }}
.total {{ font-weight: bold; border-top: 1px solid #333; }}
footer {{ margin-top: 2em; font-size: 0.8em; color: #666; }}
</style>
</head>
<body>
<h1>{school_name}</h1>
<h2>Fee Payment Receipt</h2>
<table>
<tr><th>Receipt No</th><td>{receipt_no}</td></tr>
<tr><th>Date</th><td>{date}</td></tr>
<tr><th>Student</th><td>{student_name}</td></tr>
<tr><th>Admission No</th><td>{admission_no}</td></tr>
<tr><th>Class</th><td>{class_name}</td></tr>
<tr><th>Method</th><td>{method}</td></tr>
{reference}
<tr class="total"><th>Amount Paid</th><td>{currency} {amount}</td></tr>
<tr><th>Outstanding Balance</th><td>{currency} {balance}</td></tr>
</table>
<footer>This receipt was generated electronically and is valid without a signature.</footer>
</body>
</html>
"#,
        receipt_no = data.payment.id,
        date = format_date(data.payment.created_at),
        school_name = escape(school_name),
        student_name = escape(&data.student.full_name()),
        admission_no = escape(&data.student.admission_no),
        class_name = escape(&data.student.class_name),
        method = escape(&data.payment.method),
        reference = reference,
        currency = escape(currency),
        amount = format_amount(data.payment.amount),
        balance = format_amount(data.student.fee_balance),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeePayment, Student, StudentStatus};
    use uuid::Uuid;

    #[test]
    fn amount_formatting() {
        assert_eq!(format_amount(0), "0.00");
        assert_eq!(format_amount(5), "0.05");
        assert_eq!(format_amount(150_050), "1500.50");
        assert_eq!(format_amount(-9_900), "-99.00");
    }

    #[test]
    fn receipt_contains_core_fields_escaped() {
        let now = Utc::now();
        let data = ReceiptData {
            payment: FeePayment {
                id: Uuid::new_v4(),
                student_id: Uuid::new_v4(),
                amount: 250_000,
                method: "bank_transfer".to_string(),
                reference: Some("TRX<99>".to_string()),
                note: None,
                received_by: Uuid::new_v4(),
                created_at: now,
            },
            student: Student {
                id: Uuid::new_v4(),
                admission_no: "ADM-7".to_string(),
                first_name: "Amina".to_string(),
                last_name: "Yusuf".to_string(),
                class_name: "Grade 7".to_string(),
                section: None,
                guardian_name: None,
                guardian_phone: None,
                total_fees: 500_000,
                paid_fees: 250_000,
                fee_balance: 250_000,
                status: StudentStatus::Active,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            },
            settings: None,
        };

        let html = render(&data);
        assert!(html.contains("Amina Yusuf"));
        assert!(html.contains("ADM-7"));
        assert!(html.contains("2500.00"));
        assert!(html.contains("TRX&lt;99&gt;"));
        assert!(!html.contains("TRX<99>"));
    }
}

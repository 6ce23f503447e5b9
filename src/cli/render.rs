use ansi_term::Style;
use chrono::Local;

use crate::storage::entities::RecordEntity;

/// Prints the display list, one tab-separated row per record. The timestamp is
/// recovered from the id and shown in local time.
pub fn print_records(records: &[RecordEntity]) {
    if records.is_empty() {
        println!("No entries yet.");
        return;
    }

    println!(
        "{}",
        Style::new()
            .bold()
            .paint("recorded\t\tid\t\tself-care\tgratitude\tinteractions\twater")
    );
    for record in records {
        println!(
            "{}\t{}\t{}\t\t{}\t\t{}\t\t{}",
            format_created_at(record),
            record.id,
            record.autocuidado,
            record.gratidao,
            record.interacoes,
            format_water(record),
        );
    }
}

fn format_created_at(record: &RecordEntity) -> String {
    record
        .created_at()
        .map(|v| v.with_timezone(&Local).format("%x %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_water(record: &RecordEntity) -> String {
    match record.agua {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::counts::CountsTable;
use crate::types::{Task, REPORT_FILE_NAME};

/// Render the summary report for `counts`.
pub fn render_report(counts: &CountsTable) -> String {
    let mut report = String::from("Dataset Summary\n================\n\n");
    for (i, &task) in Task::ALL.iter().enumerate() {
        if i > 0 {
            report.push('\n');
        }
        report.push_str(task.report_heading());
        report.push('\n');
        for (cell_type, count) in counts.entries(task) {
            report.push_str(&format!("- {}: {} images\n", cell_type, count));
        }
    }
    report
}

/// Write `README.txt` under `output_dir`, replacing any previous report.
pub fn write_report(output_dir: &Path, counts: &CountsTable) -> std::io::Result<PathBuf> {
    let report_path = output_dir.join(REPORT_FILE_NAME);
    let mut writer = BufWriter::new(File::create(&report_path)?);
    writer.write_all(render_report(counts).as_bytes())?;
    writer.flush()?;
    Ok(report_path)
}

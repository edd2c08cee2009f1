//! Rendering of result rows: plain lines, an aligned table, or a CSV file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::cli::{Cli, OutputMode};
use crate::process::Rows;
use crate::{Result, DATETIME_FORMAT, RESULTS_DIR};

/// Send the rows wherever the command line asked for.
pub fn control_output(results: &Rows, args: &Cli) -> Result<()> {
    match args.output {
        Some(OutputMode::Pretty) => pretty_output(results),
        Some(OutputMode::File) => {
            file_output(results, args.mode.as_str(), Path::new(RESULTS_DIR))?;
        }
        None => default_output(results),
    }
    Ok(())
}

/// One space-joined line per row.
fn default_output(results: &Rows) {
    for row in results {
        println!("{}", row.join(" "));
    }
}

/// Aligned ASCII table with the first row as header.
fn pretty_output(results: &Rows) {
    print!("{}", render_table(results));
}

fn render_table(results: &Rows) -> String {
    let columns = results.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in results {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let rule = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };

    let mut out = String::new();
    for (i, row) in results.iter().enumerate() {
        if i == 0 {
            out.push_str(&rule);
        }
        out.push('|');
        for (j, &width) in widths.iter().enumerate() {
            let cell = row.get(j).map(String::as_str).unwrap_or("");
            out.push_str(&format!(" {cell:<width$} |"));
        }
        out.push('\n');
        if i == 0 {
            out.push_str(&rule);
        }
    }
    out.push_str(&rule);
    out
}

/// Write the rows as a CSV file named after the mode and the current time.
///
/// Every field is quoted, `"` doubled, lines end with `\n`.
fn file_output(results: &Rows, mode: &str, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let timestamp = Local::now().format(DATETIME_FORMAT);
    let path = dir.join(format!("{mode}_{timestamp}.csv"));

    let mut buf: Vec<u8> = Vec::new();
    for row in results {
        write_row(&mut buf, row)?;
    }
    fs::write(&path, buf)?;
    info!("results saved to {}", path.display());
    Ok(path)
}

/// Write a single CSV row, quoting every field.
fn write_row<W: Write>(mut w: W, row: &[String]) -> std::io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
    }
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rows() -> Rows {
        vec![
            vec!["Status".to_string(), "Count".to_string()],
            vec!["Draft".to_string(), "2".to_string()],
            vec!["Total".to_string(), "2".to_string()],
        ]
    }

    #[test]
    fn csv_quotes_every_field() {
        let mut buf = Vec::new();
        write_row(&mut buf, &["He said \"hi\"".to_string(), "b,c".to_string()]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "\"He said \"\"hi\"\"\",\"b,c\"\n"
        );
    }

    #[test]
    fn table_is_aligned_and_ruled() {
        let expected = "\
+--------+-------+
| Status | Count |
+--------+-------+
| Draft  | 2     |
| Total  | 2     |
+--------+-------+
";
        assert_eq!(render_table(&rows()), expected);
    }

    #[test]
    fn file_output_names_file_after_mode_and_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_output(&rows(), "pep", dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("pep_"));
        assert!(name.ends_with(".csv"));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "\"Status\",\"Count\"\n\"Draft\",\"2\"\n\"Total\",\"2\"\n"
        );
    }
}

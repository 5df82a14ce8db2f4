//! Command-line interface definition using clap.

use clap::Parser;

/// Extract bilibili links from a chunked-jsonl chat export into a CSV
/// table, with optional Excel conversion and title aggregation.
#[derive(Parser, Debug, Clone)]
#[command(name = "bililinks")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    bililinks -i ~/.qq-chat-exporter/exports/group_12345
    bililinks -i export_dir -o bilibili.csv --excel bilibili.xlsx
    bililinks -i export_dir --fetch --aggregate by_title.xlsx")]
pub struct Args {
    /// Export directory (the folder holding manifest.json and chunks/)
    #[arg(short, long, value_name = "DIR")]
    pub input: String,

    /// Output CSV path
    #[arg(short, long, default_value = "bilibili_links.csv")]
    pub output: String,

    /// Also convert the CSV table to an Excel file at this path
    #[arg(long, value_name = "PATH")]
    pub excel: Option<String>,

    /// Fetch page title/uploader per link (one blocking request each)
    #[arg(long)]
    pub fetch: bool,

    /// Write a title-aggregated spreadsheet to this path
    #[arg(long, value_name = "PATH")]
    pub aggregate: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let args = Args::parse_from(["bililinks", "-i", "export_dir"]);
        assert_eq!(args.input, "export_dir");
        assert_eq!(args.output, "bilibili_links.csv");
        assert!(!args.fetch);
        assert!(args.excel.is_none());
        assert!(args.aggregate.is_none());
    }

    #[test]
    fn test_parse_full() {
        let args = Args::parse_from([
            "bililinks",
            "-i",
            "export_dir",
            "-o",
            "out.csv",
            "--excel",
            "out.xlsx",
            "--fetch",
            "--aggregate",
            "agg.xlsx",
        ]);
        assert_eq!(args.output, "out.csv");
        assert_eq!(args.excel.as_deref(), Some("out.xlsx"));
        assert!(args.fetch);
        assert_eq!(args.aggregate.as_deref(), Some("agg.xlsx"));
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["bililinks"]).is_err());
    }
}

//! Text and JSON renderings of dnodes and ingest reports.

use crate::ingest::IngestReport;
use crate::record::Dnode;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

/// JSON shape of a dnode. `path` is lossy text, `path_hex` the exact bytes.
#[derive(Debug, Clone, Serialize)]
pub struct DnodeView {
    pub inode: u64,
    pub full: f64,
    #[serde(rename = "type")]
    pub dnode_type: String,
    pub flags: Option<String>,
    pub maxblkid: Option<u64>,
    pub path: Option<String>,
    pub path_hex: Option<String>,
}

impl From<&Dnode> for DnodeView {
    fn from(dnode: &Dnode) -> Self {
        DnodeView {
            inode: dnode.inode(),
            full: dnode.full(),
            dnode_type: dnode.dnode_type().to_string(),
            flags: dnode.flags().map(str::to_string),
            maxblkid: dnode.maxblkid(),
            path: dnode.path().map(|p| p.to_string()),
            path_hex: dnode.path().map(|p| hex::encode(p.as_bytes())),
        }
    }
}

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Format a list of dnodes as a table.
pub fn format_dnode_table(dnodes: &[Dnode]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Dnodes")));
    if dnodes.is_empty() {
        out.push_str("No dnodes stored.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Inode", "Type", "%Full", "Flags", "Maxblkid", "Path"]);
    for dnode in dnodes {
        table.add_row(vec![
            dnode.inode().to_string(),
            dnode.dnode_type().to_string(),
            format!("{:.2}", dnode.full()),
            or_dash(dnode.flags()),
            or_dash(dnode.maxblkid()),
            or_dash(dnode.path()),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!("Total: {} dnodes.\n", dnodes.len()));
    out
}

/// Format one dnode as `key: value` lines.
pub fn format_dnode_detail(dnode: &Dnode) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("Dnode {}", dnode.inode()))
    ));
    out.push_str(&format!("  Type:     {}\n", dnode.dnode_type()));
    out.push_str(&format!("  %Full:    {:.2}\n", dnode.full()));
    out.push_str(&format!("  Flags:    {}\n", or_dash(dnode.flags())));
    out.push_str(&format!("  Maxblkid: {}\n", or_dash(dnode.maxblkid())));
    out.push_str(&format!("  Path:     {}\n", or_dash(dnode.path())));
    out
}

pub fn format_ingest_report(report: &IngestReport) -> String {
    let elapsed = report.finished_at - report.started_at;
    format!(
        "Ingested {} dnodes from {} lines ({} grammar, {} ms).\n",
        report.records,
        report.lines,
        report.grammar,
        elapsed.num_milliseconds()
    )
}

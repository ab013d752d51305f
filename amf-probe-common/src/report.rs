use crate::models::{AdapterCapabilities, Codec};
use crate::ProbeError;
use std::fmt::Write;

const RULE: &str = "----------------------------------------------------------------";
const LABEL_WIDTH: usize = 14;

pub fn render_report(caps: &AdapterCapabilities) -> String {
    let mut out = format!("\n{RULE}\n\nAMF Encoders\n\n");
    for codec in Codec::ALL {
        let value = if caps.supports(codec) { "True" } else { "False" };
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{:<width$}= {}", codec.label(), value, width = LABEL_WIDTH);
    }
    out
}

pub fn render_error(err: &ProbeError) -> String {
    format!("ERROR: {}\n", err)
}

//! HTML gallery of a run: each certificate as an inline image next to its
//! draw listing.

use crate::run::GenerationRun;
use crate::Result;
use std::fmt::Write as _;

/// Render `run` as a standalone HTML page.
pub fn render_html(run: &GenerationRun) -> Result<String> {
    let mut html = String::new();
    let title = escape_html(&run.category);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Certificates: {title}</title>\
         <style>body{{font-family:sans-serif;background:#f4f4f4}}\
         .certificate-item{{display:flex;gap:16px;margin:16px;padding:16px;background:#fff}}\
         .code-container{{white-space:pre;font-family:monospace;font-size:12px;overflow:auto}}\
         .failed{{color:#c0392b}}</style></head>\n<body>\n<h1>{title}</h1>\n"
    );

    for outcome in &run.slots {
        let _ = writeln!(html, "<div class=\"certificate-item\" id=\"certificate-{}\">", outcome.slot);
        match &outcome.result {
            Ok(cert) => {
                let _ = writeln!(
                    html,
                    "<div class=\"canvas-container\"><img src=\"{}\" width=\"{}\" height=\"{}\" alt=\"Certificate {}\"></div>",
                    cert.data_url()?,
                    cert.width(),
                    cert.height(),
                    outcome.slot + 1
                );
                let _ = writeln!(html, "<div class=\"code-container\">{}</div>", escape_html(&cert.listing()));
            }
            Err(e) => {
                let _ = writeln!(
                    html,
                    "<div class=\"failed\">Certificate {} failed: {}</div>",
                    outcome.slot + 1,
                    escape_html(&e.to_string())
                );
            }
        }
        html.push_str("</div>\n");
    }

    html.push_str("</body>\n</html>\n");
    Ok(html)
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concept::DesignConcept;
    use crate::run::SlotOutcome;
    use crate::Error;

    #[test]
    fn failed_slots_are_listed() {
        let run = GenerationRun {
            category: "R&D <Heroes>".into(),
            slots: vec![SlotOutcome {
                slot: 0,
                concept: DesignConcept::default(),
                result: Err(Error::asset("backgrounds/background1.png", "not found")),
            }],
        };
        let html = render_html(&run).unwrap();
        assert!(html.contains("<h1>R&amp;D &lt;Heroes&gt;</h1>"));
        assert!(html.contains("Certificate 1 failed: Failed to load asset backgrounds/background1.png: not found"));
        assert!(html.trim_end().ends_with("</html>"));
    }
}

// src/reporting/terminal.rs
use std::io::{self, Write};

use crate::core::model::IntelRecord;

const RULE_WIDTH: usize = 78;

const BANNER: &str = r#"
     ____                  _
    |  _ \  ___  ___ ___ (_) ___ _ __
    | | | |/ _ \/ __/ __|| |/ _ \ '__|
    | |_| | (_) \__ \__ \| |  __/ |
    |____/ \___/|___/___/|_|\___|_|
"#;

/// Human-facing rendering of a dossier
pub struct TerminalRenderer {
    show_banner: bool,
}

impl TerminalRenderer {
    pub fn new(show_banner: bool) -> Self {
        Self { show_banner }
    }

    pub fn banner<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.show_banner {
            writeln!(out, "{}", BANNER)?;
            writeln!(out, "    single-target profile reconnaissance  v{}", env!("CARGO_PKG_VERSION"))?;
            writeln!(out)?;
        }
        Ok(())
    }

    /// Print the dossier to stdout
    pub fn render(&self, record: &IntelRecord) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.render_to(record, &mut out)
    }

    pub fn render_to<W: Write>(&self, record: &IntelRecord, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(
            out,
            " INTELLIGENCE DOSSIER: {}  ({})",
            record.username,
            record.collected_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

        section(out, "Primary Intel")?;
        pairs(out, &[
            ("Display Name", record.display_name.as_str()),
            ("Bio", record.bio.as_str()),
            ("Photo URL", record.profile_photo_url.as_deref().unwrap_or("N/A")),
        ])?;

        section(out, "Digital Fingerprints")?;
        let emails = if record.emails_found.is_empty() {
            "None".to_string()
        } else {
            record.emails_found.join(", ")
        };
        pairs(out, &[
            ("MD5 Fingerprint", record.fingerprints.weak.as_str()),
            ("SHA256 Fingerprint", record.fingerprints.strong.as_str()),
            ("Emails found", emails.as_str()),
        ])?;

        section(out, "Reverse Image Search")?;
        match &record.reverse_image_search_url {
            Some(url) => writeln!(out, "  {}", url)?,
            None => writeln!(out, "  No profile picture found.")?,
        }

        if !record.phone_intel.is_empty() {
            section(out, "Phone Number Intelligence")?;
            let rows: Vec<Vec<&str>> = record
                .phone_intel
                .iter()
                .map(|p| vec![p.number_string.as_str(), p.location.as_str(), p.carrier.as_str()])
                .collect();
            table(out, &["Phone Number Found", "Location", "Carrier"], &rows)?;
        }

        if !record.exif_data.is_empty() {
            section(out, "Image Forensic Analysis (EXIF) [!]")?;
            let rows: Vec<Vec<&str>> = record
                .exif_data
                .iter()
                .map(|(tag, value)| vec![tag.as_str(), value.as_str()])
                .collect();
            table(out, &["EXIF Tag", "Value"], &rows)?;
        }

        if !record.linked_domains.is_empty() {
            section(out, "Linked Domain & IP Intelligence")?;
            let rows: Vec<Vec<&str>> = record
                .linked_domains
                .iter()
                .map(|d| {
                    vec![
                        d.url.as_str(),
                        d.host.as_str(),
                        d.ip_address.as_str(),
                        d.country.as_str(),
                        d.organization.as_str(),
                        d.asn.as_str(),
                    ]
                })
                .collect();
            table(out, &["URL", "Domain", "IP Address", "Country", "Organization", "ASN"], &rows)?;
        }

        if !record.cross_platform_searches.is_empty() {
            section(out, "Cross-Platform Search")?;
            let rows: Vec<Vec<&str>> = record
                .cross_platform_searches
                .iter()
                .map(|(label, url)| vec![label.as_str(), url.as_str()])
                .collect();
            table(out, &["Platform", "Search URL"], &rows)?;
        }

        writeln!(out)?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        out.flush()
    }
}

fn section<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "[ {} ]", title)?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

fn pairs<W: Write>(out: &mut W, rows: &[(&str, &str)]) -> io::Result<()> {
    let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0) + 1;
    for (key, value) in rows {
        let mut lines = value.lines();
        let first = lines.next().unwrap_or("");
        writeln!(out, "  {:<width$} {}", format!("{}:", key), first, width = width)?;
        // multi-line bios stay aligned under the value column
        for line in lines {
            writeln!(out, "  {:<width$} {}", "", line, width = width)?;
        }
    }
    Ok(())
}

fn table<W: Write>(out: &mut W, headers: &[&str], rows: &[Vec<&str>]) -> io::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: &[&str]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    writeln!(out, "  {}", line(headers).trim_end())?;
    writeln!(out, "  {}", widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "))?;
    for row in rows {
        writeln!(out, "  {}", line(row.as_slice()).trim_end())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::core::model::{CrossPlatformLinks, DomainIntel, ExifTags, FingerprintSet, PhoneIntel};

    fn record() -> IntelRecord {
        IntelRecord {
            collected_at: Utc::now(),
            username: "@jane".to_string(),
            display_name: "Jane Doe".to_string(),
            bio: "line one\nline two".to_string(),
            profile_photo_url: None,
            emails_found: vec![],
            linked_domains: vec![DomainIntel::unresolved("https://example.com", "example.com")],
            phone_intel: vec![],
            exif_data: ExifTags::new(),
            reverse_image_search_url: None,
            cross_platform_searches: CrossPlatformLinks::from([(
                "GitHub".to_string(),
                "https://github.com/search?q=jane".to_string(),
            )]),
            fingerprints: FingerprintSet { weak: "aa".to_string(), strong: "bb".to_string() },
        }
    }

    fn render(record: &IntelRecord) -> String {
        let mut buf = Vec::new();
        TerminalRenderer::new(false).render_to(record, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_sections_present() {
        let text = render(&record());

        assert!(text.contains("INTELLIGENCE DOSSIER: @jane"));
        assert!(text.contains("[ Primary Intel ]"));
        assert!(text.contains("Emails found:"));
        assert!(text.contains("None"));
        assert!(text.contains("No profile picture found."));
        assert!(text.contains("[ Linked Domain & IP Intelligence ]"));
        assert!(text.contains("Resolution Failed"));
        assert!(text.contains("https://github.com/search?q=jane"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let text = render(&record());

        assert!(!text.contains("Phone Number Intelligence"));
        assert!(!text.contains("EXIF"));
    }

    #[test]
    fn test_populated_optional_sections() {
        let mut r = record();
        r.phone_intel.push(PhoneIntel {
            number_string: "+44 20 7946 0000".to_string(),
            location: "United Kingdom".to_string(),
            carrier: "N/A".to_string(),
        });
        r.exif_data.insert("Image Model".to_string(), "\"X100\"".to_string());

        let text = render(&r);

        assert!(text.contains("United Kingdom"));
        assert!(text.contains("Image Forensic Analysis (EXIF) [!]"));
        assert!(text.contains("\"X100\""));
    }

    #[test]
    fn test_multiline_bio_keeps_every_line() {
        let text = render(&record());
        assert!(text.contains("line one"));
        assert!(text.contains("line two"));
    }

    #[test]
    fn test_banner_toggle() {
        let mut buf = Vec::new();
        TerminalRenderer::new(false).banner(&mut buf).unwrap();
        assert!(buf.is_empty());

        TerminalRenderer::new(true).banner(&mut buf).unwrap();
        assert!(!buf.is_empty());
    }
}

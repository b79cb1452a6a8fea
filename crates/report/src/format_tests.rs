// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn parse_accepts_both_spellings_of_markdown() {
    assert_eq!(ReportFormat::parse("markdown"), Some(ReportFormat::Markdown));
    assert_eq!(ReportFormat::parse("md"), Some(ReportFormat::Markdown));
}

#[test]
fn parse_rejects_unknown_formats() {
    assert_eq!(ReportFormat::parse("pdf"), None);
}

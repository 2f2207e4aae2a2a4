//! Block parser for the `syminfo.lib` format.

use sgt_core::{ErrorInfo, SgError};
use tracing::{debug, trace};

use crate::record::SymmetryRecord;
use crate::words::shell_split;

const BEGIN: &str = "begin_spacegroup";
const END: &str = "end_spacegroup";

/// Parses the whole database text into records, in file order.
///
/// Lines are trimmed; blank lines and `#` comments are skipped anywhere.
/// Unknown lines inside a block are ignored, anything else outside a block
/// is a [`SgError::Format`] error.
pub fn parse_syminfo(text: &str) -> Result<Vec<SymmetryRecord>, SgError> {
    let mut records = Vec::new();
    let mut current: Option<PartialRecord> = None;
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == BEGIN {
            if let Some(open) = &current {
                return Err(format_error(
                    "nested-block",
                    "begin_spacegroup inside an open block",
                    line_no,
                )
                .with_context("opened_at", open.line.to_string())
                .into_format());
            }
            current = Some(PartialRecord::new(line_no));
            continue;
        }
        if line == END {
            let Some(partial) = current.take() else {
                return Err(outside_block(line, line_no));
            };
            let record = partial.finish(line_no)?;
            trace!(name = %record.extended_hm_name, line = record.line, "record parsed");
            records.push(record);
            continue;
        }
        let Some(partial) = current.as_mut() else {
            return Err(outside_block(line, line_no));
        };
        partial.field(line, line_no)?;
    }
    if let Some(open) = current {
        return Err(format_error("unterminated-block", "missing end_spacegroup", open.line).into_format());
    }
    debug!(records = records.len(), "syminfo parsed");
    Ok(records)
}

#[derive(Debug, Default)]
struct PartialRecord {
    line: usize,
    number: Option<u32>,
    ccp4: Option<u32>,
    hall: Option<String>,
    xhm: Option<String>,
    old: Vec<String>,
    basisop: Option<String>,
    symops: Vec<String>,
    cenops: Vec<String>,
}

impl PartialRecord {
    fn new(line: usize) -> Self {
        Self {
            line,
            ..Self::default()
        }
    }

    fn field(&mut self, line: &str, line_no: usize) -> Result<(), SgError> {
        if let Some(rest) = line.strip_prefix("number ") {
            self.number = Some(parse_integer(rest, "number", line_no)?);
        } else if let Some(rest) = line.strip_prefix("basisop ") {
            self.basisop = Some(rest.to_string());
        } else if let Some(rest) = line.strip_prefix("symbol ccp4 ") {
            self.ccp4 = Some(parse_integer(rest, "ccp4", line_no)?);
        } else if let Some(rest) = line.strip_prefix("symbol Hall ") {
            self.hall = Some(strip_quotes(rest).to_string());
        } else if let Some(rest) = line.strip_prefix("symbol xHM ") {
            self.xhm = Some(strip_quotes(rest).replace(" :", ":"));
        } else if let Some(rest) = line.strip_prefix("symbol old ") {
            self.old = shell_split(rest).map_err(|message| {
                format_error("legacy-names", message, line_no)
                    .with_context("text", rest)
                    .into_format()
            })?;
        } else if let Some(rest) = line.strip_prefix("symop ") {
            self.symops.push(rest.to_string());
        } else if let Some(rest) = line.strip_prefix("cenop ") {
            self.cenops.push(rest.to_string());
        }
        Ok(())
    }

    fn finish(self, line_no: usize) -> Result<SymmetryRecord, SgError> {
        let missing = |field: &str| {
            format_error("missing-field", format!("block lacks '{field}'"), line_no)
                .with_context("field", field)
                .with_context("opened_at", self.line.to_string())
                .into_format()
        };
        let basis_operator_text = self.basisop.clone().ok_or_else(|| missing("basisop"))?;
        let ccp4_code = self.ccp4.ok_or_else(|| missing("ccp4"))?;
        let number = self.number.ok_or_else(|| missing("number"))?;
        let hall_symbol = self.hall.clone().ok_or_else(|| missing("hall"))?;
        let extended_hm_name = self.xhm.clone().ok_or_else(|| missing("xhm"))?;
        if self.symops.is_empty() {
            return Err(missing("symop"));
        }
        if self.cenops.is_empty() {
            return Err(missing("cenop"));
        }
        if !(1..=230).contains(&number) {
            return Err(format_error("number-range", "space-group number outside 1-230", line_no)
                .with_context("number", number.to_string())
                .into_format());
        }
        if ccp4_code != 0 && ccp4_code % 1000 != number {
            return Err(format_error("ccp4-code", "ccp4 code does not encode the number", line_no)
                .with_context("ccp4", ccp4_code.to_string())
                .with_context("number", number.to_string())
                .into_format());
        }
        Ok(SymmetryRecord {
            number,
            ccp4_code,
            hall_symbol,
            extended_hm_name,
            legacy_aliases: self.old,
            basis_operator_text,
            explicit_operations: self.symops,
            centering_operations: self.cenops,
            line: self.line,
        })
    }
}

fn outside_block(line: &str, line_no: usize) -> SgError {
    format_error("outside-block", "content outside a spacegroup block", line_no)
        .with_context("text", line)
        .into_format()
}

fn strip_quotes(text: &str) -> &str {
    text.trim_matches(|c: char| c == ' ' || c == '\'')
}

fn parse_integer(text: &str, field: &str, line_no: usize) -> Result<u32, SgError> {
    text.trim().parse().map_err(|_| {
        format_error("bad-integer", format!("'{field}' is not a non-negative integer"), line_no)
            .with_context("text", text.trim())
            .into_format()
    })
}

fn format_error(code: &str, message: impl Into<String>, line_no: usize) -> ErrorInfo {
    ErrorInfo::new(code, message).with_context("line", line_no.to_string())
}

trait IntoFormat {
    fn into_format(self) -> SgError;
}

impl IntoFormat for ErrorInfo {
    fn into_format(self) -> SgError {
        SgError::Format(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P2: &str = "\
begin_spacegroup
number  3
basisop x,y,z
symbol ccp4 3
symbol Hall ' P 2y'
symbol xHM  'P 1 2 1'
symbol old  'P 1 2 1' 'P 2'
symop x,y,z
symop -x,y,-z
cenop x,y,z
end_spacegroup
";

    #[test]
    fn fields_are_extracted() {
        let records = parse_syminfo(P2).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.number, 3);
        assert_eq!(r.ccp4_code, 3);
        assert_eq!(r.hall_symbol, "P 2y");
        assert_eq!(r.extended_hm_name, "P 1 2 1");
        assert_eq!(r.legacy_aliases, vec!["P 1 2 1", "P 2"]);
        assert_eq!(r.explicit_operations, vec!["x,y,z", "-x,y,-z"]);
        assert_eq!(r.centering_operations, vec!["x,y,z"]);
        assert_eq!(r.line, 1);
    }

    #[test]
    fn extension_space_is_removed() {
        let text = P2.replace("'P 1 2 1'\nsymbol old", "'P 1 2 1 :b'\nsymbol old");
        assert_eq!(parse_syminfo(&text).unwrap()[0].extended_hm_name, "P 1 2 1:b");
    }

    #[test]
    fn unknown_lines_inside_blocks_are_ignored() {
        let text = P2.replace("symop x,y,z\n", "symop x,y,z\nsymbol patt 'P 1 2/m 1'\n");
        assert_eq!(parse_syminfo(&text).unwrap().len(), 1);
    }
}

//! Routing of stored records: math-bearing text goes to the lecture API,
//! everything else to the SQL script.

use crate::model::ProblemRecord;

/// True when any text field contains `$` or a literal `\\`.
pub fn is_math_bearing(record: &ProblemRecord) -> bool {
    record
        .text_fields()
        .any(|text| text.contains('$') || text.contains("\\\\"))
}

/// Split records into (math-bearing, plain), keeping store order.
pub fn partition(records: &[ProblemRecord]) -> (Vec<&ProblemRecord>, Vec<&ProblemRecord>) {
    records.iter().partition(|r| is_math_bearing(r))
}

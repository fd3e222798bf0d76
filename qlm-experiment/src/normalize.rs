use qlm_core::TrialResult;

/// Column order of a normalized line.
pub const FIELDS: [&str; 8] = [
    "block",
    "trial_index",
    "time_elapsed",
    "stimulus",
    "choices",
    "label_selected",
    "response",
    "rt",
];

/// Renders one result as a comma-joined, newline-terminated line.
///
/// Fields are not quoted. Option lists are themselves comma-joined, so a
/// line with displayed choices has more columns than `FIELDS`; downstream
/// analysis scripts expect exactly this layout.
pub fn normalize(result: &TrialResult) -> String {
    let fields = [
        result.block.map(|b| b.to_string()).unwrap_or_default(),
        result.trial_index.to_string(),
        result.time_elapsed_ms.to_string(),
        result.stimulus.clone(),
        result.choices.join(","),
        result.label_selected.clone().unwrap_or_default(),
        result.response.to_string(),
        result.rt_ms.map(|rt| rt.to_string()).unwrap_or_default(),
    ];

    let mut line = fields.join(",");
    line.push('\n');
    line
}

/// Header plus one normalized line per result.
pub fn results_to_csv(results: &[TrialResult]) -> String {
    let mut out = FIELDS.join(",");
    out.push('\n');
    for result in results {
        out.push_str(&normalize(result));
    }
    out
}

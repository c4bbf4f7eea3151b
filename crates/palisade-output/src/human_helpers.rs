use palisade_enforce::types::{ConstantReference, Violation};

pub(crate) fn format_violation_human(v: &Violation) -> String {
    let severity_label = match v.severity.as_str() {
        "ERROR" => "error",
        "INFO" => "info",
        _ => "note",
    };

    let mut out = format!(
        "{}[{}]: {}\n  --> {}:{}:{}\n",
        severity_label, v.code, v.message, v.file, v.line, v.column,
    );

    if let Some(fix) = &v.fix_hint {
        out.push_str(&format!("   = fix: {}\n", fix));
    }

    if v.suppressed {
        if let Some(hint) = &v.suppress_hint {
            out.push_str(&format!("   = {}\n", hint));
        }
    }

    out
}

pub(crate) fn format_reference_human(r: &ConstantReference) -> String {
    let visibility = if r.is_public { "public" } else { "private" };
    format!(
        "  --> {} [{}, {}]\n",
        r.definition_path, r.defining_package.name, visibility,
    )
}

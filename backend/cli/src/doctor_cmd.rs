//! `defectscan doctor`: report credential and configuration problems.

use std::collections::HashMap;

use anyhow::Result;

use defectscan_config::{from_map, mask_secret, resolve_api_key, validate, API_KEY_VARS};

use crate::terminal_output::{note_error, note_success, note_warn, render_table};

/// Run all checks against the merged environment (`.env` plus process).
/// Returns `Ok(false)` when a check failed.
pub fn run(vars: &HashMap<String, String>) -> Result<bool> {
    println!("\nRunning DefectScan doctor...\n");

    println!("API key variables (first match wins):");
    print!("{}", render_table(&["Variable", "Status"], &key_rows(vars)));
    println!();

    let config = match from_map(vars) {
        Ok(config) => config,
        Err(err) => {
            note_error(&err.to_string());
            note_error("Configuration errors found; fix the issues above.");
            return Ok(false);
        }
    };

    let report = validate(&config);
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    for error in &report.errors {
        note_error(&format!("{}: {}", error.path, error.message));
    }

    println!("  model     {}", config.model);
    println!("  api base  {}", config.api_base_url);
    println!("  listen    {}", config.listen_addr());
    println!();

    if report.is_valid() && config.has_api_key() {
        note_success("All checks passed.");
    } else if report.is_valid() {
        note_warn("Server will start, but analyses fail until an API key is set.");
    } else {
        note_error("Configuration errors found; fix the issues above.");
    }

    Ok(report.is_valid())
}

fn key_rows(vars: &HashMap<String, String>) -> Vec<Vec<String>> {
    let resolved = resolve_api_key(vars);
    API_KEY_VARS
        .iter()
        .map(|var| {
            let status = match &resolved {
                Some((source, key)) if source == var => format!("in use ({})", mask_secret(key)),
                _ => match vars.get(*var) {
                    Some(v) if !v.trim().is_empty() => "set (shadowed)".to_string(),
                    _ => "missing".to_string(),
                },
            };
            vec![var.to_string(), status]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn status_of<'a>(rows: &'a [Vec<String>], var: &str) -> &'a str {
        &rows.iter().find(|r| r[0] == var).unwrap()[1]
    }

    #[test]
    fn marks_resolved_variable_in_use() {
        let rows = key_rows(&vars(&[("GEMINI_API_KEY", "AIzaSyExampleKey123")]));
        assert_eq!(status_of(&rows, "GEMINI_API_KEY"), "in use (AIza***)");
        assert_eq!(status_of(&rows, "GOOGLE_GEMINI_API_KEY"), "missing");
        assert_eq!(rows.len(), API_KEY_VARS.len());
    }

    #[test]
    fn lower_priority_alias_from_env_file_is_shadowed() {
        let rows = key_rows(&vars(&[
            ("GOOGLE-GEMINI-API-KEY", "AIzaSyFromDotenvFile1"),
            ("GOOGLE_API_KEY", "AIzaSyAlsoInDotenv22"),
        ]));
        assert_eq!(status_of(&rows, "GOOGLE-GEMINI-API-KEY"), "in use (AIza***)");
        assert_eq!(status_of(&rows, "GOOGLE_API_KEY"), "set (shadowed)");
    }

    #[test]
    fn bad_port_is_reported_not_raised() {
        assert!(!run(&vars(&[("DEFECTSCAN_PORT", "http")])).unwrap());
    }

    #[test]
    fn invalid_config_fails() {
        assert!(!run(&vars(&[("DEFECTSCAN_API_BASE", "ftp://example.com")])).unwrap());
    }
}

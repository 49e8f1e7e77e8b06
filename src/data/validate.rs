use std::fmt;
use std::fs;

use serde::Serialize;
use serde_json::{Map, Value};

const STAT_KEYS: &[&str] = &["M", "WS", "BS", "S", "T", "W", "I", "A", "Ld", "LD"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Check a faction document on disk. `Err` only when the file cannot be read or is not JSON.
pub fn validate_faction_document(path: &str) -> Result<ValidationReport, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("unable to read '{path}': {err}"))?;
    let payload: Value = serde_json::from_str(&raw)
        .map_err(|err| format!("unable to parse json '{path}': {err}"))?;
    Ok(validate_faction_value(&payload))
}

/// Errors make the loader skip the whole file. Warnings are entries the loader drops or
/// fills with defaults. Info marks values that coerce to 0.
pub fn validate_faction_value(payload: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(object) = payload.as_object() else {
        report.push(
            ValidationSeverity::Error,
            "document",
            "expected top-level JSON object",
        );
        return report;
    };

    match object.get("faction_name") {
        Some(Value::String(name)) if !name.trim().is_empty() => {}
        Some(Value::String(_)) | None | Some(Value::Null) => report.push(
            ValidationSeverity::Warning,
            "faction_name",
            "missing faction_name; records will use 'Unknown'",
        ),
        Some(_) => report.push(
            ValidationSeverity::Error,
            "faction_name",
            "expected string",
        ),
    }

    let units = match object.get("units") {
        None | Some(Value::Null) => {
            report.push(ValidationSeverity::Warning, "units", "no units listed");
            return report;
        }
        Some(Value::Array(units)) => units,
        Some(_) => {
            report.push(ValidationSeverity::Error, "units", "expected array");
            return report;
        }
    };

    for (index, unit) in units.iter().enumerate() {
        let context = format!("units[{index}]");
        let Some(unit_obj) = unit.as_object() else {
            report.push(
                ValidationSeverity::Warning,
                context,
                "unit is not an object; entry is ignored",
            );
            continue;
        };
        validate_string_list(&mut report, unit_obj, &context, "rules", "unit");
        validate_upgrades(&mut report, unit_obj, &context);
        validate_models(&mut report, unit_obj, &context);
    }

    report
}

fn validate_string_list(
    report: &mut ValidationReport,
    object: &Map<String, Value>,
    context: &str,
    key: &str,
    owner: &str,
) {
    let items = match object.get(key) {
        None | Some(Value::Null) => return,
        Some(Value::Array(items)) => items,
        Some(_) => {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.{key}"),
                format!("expected array of strings; the {owner} is ignored"),
            );
            return;
        }
    };
    for (index, item) in items.iter().enumerate() {
        if !item.is_string() {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.{key}[{index}]"),
                "expected string; item is ignored",
            );
        }
    }
}

fn validate_upgrades(report: &mut ValidationReport, unit: &Map<String, Value>, context: &str) {
    let upgrades = match unit.get("upgrades") {
        None | Some(Value::Null) => return,
        Some(Value::Array(upgrades)) => upgrades,
        Some(_) => {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.upgrades"),
                "expected array; the unit is ignored",
            );
            return;
        }
    };
    for (index, upgrade) in upgrades.iter().enumerate() {
        let upgrade_context = format!("{context}.upgrades[{index}]");
        let Some(upgrade_obj) = upgrade.as_object() else {
            report.push(
                ValidationSeverity::Warning,
                upgrade_context,
                "upgrade is not an object; entry is ignored",
            );
            continue;
        };
        match upgrade_obj.get("name").and_then(Value::as_str) {
            Some(name) if !name.trim().is_empty() => {}
            _ => report.push(
                ValidationSeverity::Warning,
                format!("{upgrade_context}.name"),
                "missing name; upgrade is ignored",
            ),
        }
        if let Some(flag) = upgrade_obj.get("is_default") {
            if !flag.is_boolean() && !flag.is_null() {
                report.push(
                    ValidationSeverity::Warning,
                    format!("{upgrade_context}.is_default"),
                    format!("non-boolean value {flag} is read by truthiness"),
                );
            }
        }
    }
}

fn validate_models(report: &mut ValidationReport, unit: &Map<String, Value>, context: &str) {
    let models = match unit.get("models") {
        Some(Value::Array(models)) if !models.is_empty() => models,
        Some(Value::Array(_)) | Some(Value::Null) | None => {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.models"),
                "unit has no models and produces no records",
            );
            return;
        }
        Some(_) => {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.models"),
                "expected array; the unit is ignored",
            );
            return;
        }
    };

    for (index, model) in models.iter().enumerate() {
        let model_context = format!("{context}.models[{index}]");
        let Some(model_obj) = model.as_object() else {
            report.push(
                ValidationSeverity::Warning,
                model_context,
                "model is not an object; entry is ignored",
            );
            continue;
        };

        match model_obj.get("name").and_then(Value::as_str) {
            Some(name) if !name.trim().is_empty() => {}
            _ => report.push(
                ValidationSeverity::Warning,
                format!("{model_context}.name"),
                "missing name",
            ),
        }
        validate_string_list(report, model_obj, &model_context, "rules", "model");
        validate_string_list(report, model_obj, &model_context, "default_weapons", "model");

        let stats = match model_obj.get("stats") {
            None | Some(Value::Null) => continue,
            Some(Value::Object(stats)) => stats,
            Some(_) => {
                report.push(
                    ValidationSeverity::Warning,
                    format!("{model_context}.stats"),
                    "expected object; the model is ignored",
                );
                continue;
            }
        };
        for key in STAT_KEYS {
            let Some(value) = stats.get(*key) else {
                continue;
            };
            let numeric = match value {
                Value::Number(_) => true,
                Value::String(s) => s.chars().any(|c| c.is_ascii_digit()),
                _ => false,
            };
            if !numeric {
                report.push(
                    ValidationSeverity::Info,
                    format!("{model_context}.stats.{key}"),
                    format!("non-numeric value {value} is read as 0"),
                );
            }
        }
    }
}

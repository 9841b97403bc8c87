//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::EngineConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " — did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for EngineConfig.
///
/// This is maintained manually to match the struct hierarchy in mod.rs.
/// Any new field added to EngineConfig must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [well]
        "well",
        "well.name",
        "well.field",
        // [formation]
        "formation",
        "formation.poisson_ratio",
        "formation.eaton_exponent",
        "formation.hydrostatic_gradient_psi_ft",
        // [risk]
        "risk",
        "risk.high_margin_ppg",
        "risk.medium_margin_ppg",
        // [monte_carlo]
        "monte_carlo",
        "monte_carlo.trials",
        "monte_carlo.seed",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a_len = a.len();
    let b_len = b.len();
    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &k in known {
        let dist = levenshtein(unknown, k);
        if dist <= 3 {
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((k, dist)),
            }
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys — it only warns. Existing configs
/// always continue to work.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    let found = walk_toml_keys(&value, "");

    found
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| {
            let suggestion = suggest_correction(&key, &known);
            ValidationWarning {
                message: format!("Unknown config key '{key}' (ignored)"),
                field: key,
                suggestion,
            }
        })
        .collect()
}

// ============================================================================
// Range Warnings
// ============================================================================

/// Suspicious-but-legal values. These never abort loading; the operator may
/// genuinely want them, but they deserve a line in the log.
pub fn range_warnings(config: &EngineConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if config.formation.poisson_ratio > 0.45 {
        warnings.push(ValidationWarning {
            field: "formation.poisson_ratio".to_string(),
            message: format!(
                "Poisson ratio {} is unusually high — K0 exceeds {:.1}",
                config.formation.poisson_ratio,
                config.formation.poisson_ratio / (1.0 - config.formation.poisson_ratio)
            ),
            suggestion: None,
        });
    }

    if config.monte_carlo.trials < 100 {
        warnings.push(ValidationWarning {
            field: "monte_carlo.trials".to_string(),
            message: format!(
                "{} Monte Carlo trials — P10/P90 estimates will be noisy below 100",
                config.monte_carlo.trials
            ),
            suggestion: None,
        });
    }

    if config.risk.medium_margin_ppg > 2.0 {
        warnings.push(ValidationWarning {
            field: "risk.medium_margin_ppg".to_string(),
            message: format!(
                "Medium-risk margin {} ppg is wider than any practical mud-weight window",
                config.risk.medium_margin_ppg
            ),
            suggestion: None,
        });
    }

    warnings
}

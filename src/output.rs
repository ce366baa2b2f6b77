//! Plan rendering.

use anyhow::Result;
use rollplan::plan::Plan;

use crate::config::OutputFormat;

/// Render a plan in the requested format.
pub fn render(plan: &Plan, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(plan)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(plan)?),
        OutputFormat::Tree => Ok(tree(plan)),
    }
}

/// Indented phase listing, one line per phase.
fn tree(plan: &Plan) -> String {
    let mut out = format!(
        "Operation {} on cluster {}\n",
        plan.operation_id, plan.cluster_name
    );
    for phase in plan.root.flatten() {
        let depth = phase.id.matches('/').count().saturating_sub(1);
        let name = phase.id.rsplit('/').next().unwrap_or_default();
        let executor = phase
            .executor
            .map(|e| format!(" [{e}]"))
            .unwrap_or_default();
        out.push_str(&format!(
            "{}{name}{executor}  {}\n",
            "  ".repeat(depth),
            phase.description
        ));
    }
    out
}

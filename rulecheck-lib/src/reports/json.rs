use super::ReportableRule;
use crate::Result;
use crate::expr::Outcome;
use core::fmt::Write;
use serde_json::json;

#[expect(unused_results, reason = "Map::insert return values are irrelevant for fresh keys")]
pub fn generate<W: Write>(report: &ReportableRule, writer: &mut W) -> Result<()> {
    let mut obj = serde_json::Map::new();
    obj.insert("rule".to_string(), json!(report.source));
    obj.insert("title".to_string(), json!(report.title));
    obj.insert("outcome".to_string(), json!(report.outcome.kind().to_string()));
    obj.insert("result".to_string(), json!(report.outcome.passed()));

    match &report.outcome {
        Outcome::Satisfied => {}
        Outcome::Violated { message } => {
            obj.insert("message".to_string(), json!(message));
        }
        Outcome::MissingData { key, input, hint } => {
            obj.insert("key".to_string(), json!(key));
            obj.insert("input".to_string(), json!(input));
            obj.insert("hint".to_string(), json!(hint));
        }
        Outcome::Fatal(cause) => {
            obj.insert("error".to_string(), json!(cause.to_string()));
            obj.insert("input".to_string(), json!(cause.input()));
        }
    }

    if !matches!(report.outcome, Outcome::Satisfied | Outcome::Violated { .. }) {
        obj.insert("expression".to_string(), json!(report.expression));
    }

    writeln!(writer, "{}", serde_json::to_string_pretty(&obj)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::FatalCause;
    use crate::inputs::CollectionError;

    fn render(outcome: Outcome) -> serde_json::Value {
        let report = ReportableRule {
            source: "rules/nodes.yaml".to_string(),
            title: Some("Cluster has nodes".to_string()),
            expression: Some("nodes.items.size() > 0".to_string()),
            outcome,
        };

        let mut output = String::new();
        generate(&report, &mut output).unwrap();
        serde_json::from_str(&output).unwrap()
    }

    #[test]
    fn test_satisfied() {
        assert_eq!(
            render(Outcome::Satisfied),
            json!({"rule": "rules/nodes.yaml", "title": "Cluster has nodes", "outcome": "satisfied", "result": true})
        );
    }

    #[test]
    fn test_violated() {
        let value = render(Outcome::Violated {
            message: Some("No nodes registered".to_string()),
        });

        assert_eq!(value["outcome"], "violated");
        assert_eq!(value["result"], false);
        assert_eq!(value["message"], "No nodes registered");
    }

    #[test]
    fn test_missing_data() {
        let value = render(Outcome::MissingData {
            key: "status".to_string(),
            input: Some("nodes".to_string()),
            hint: Some("v1/nodes".to_string()),
        });

        assert_eq!(value["outcome"], "missing_data");
        assert_eq!(value["result"], false);
        assert_eq!(value["key"], "status");
        assert_eq!(value["input"], "nodes");
        assert_eq!(value["hint"], "v1/nodes");
        assert_eq!(value["expression"], "nodes.items.size() > 0");
    }

    #[test]
    fn test_fatal() {
        let value = render(Outcome::Fatal(FatalCause::Collection(CollectionError::Forbidden {
            input: "nodes".to_string(),
            what: "v1/nodes".to_string(),
        })));

        assert_eq!(
            value,
            json!({
                "rule": "rules/nodes.yaml",
                "title": "Cluster has nodes",
                "outcome": "fatal",
                "result": false,
                "error": "input 'nodes': access to v1/nodes is forbidden",
                "input": "nodes",
                "expression": "nodes.items.size() > 0"
            })
        );
    }
}

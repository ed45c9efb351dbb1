use super::ReportableRule;
use crate::Result;
use crate::expr::{FatalCause, Outcome};
use core::fmt::Write;
use owo_colors::OwoColorize;

/// Render `report` for a terminal.
///
/// The verdict line and any violation message go to `out`. Warnings and
/// errors go to `err`.
pub fn generate<O: Write, E: Write>(report: &ReportableRule, use_colors: bool, out: &mut O, err: &mut E) -> Result<()> {
    let title = report.display_title();

    match &report.outcome {
        Outcome::Satisfied => writeln!(out, "{title}: {}", verdict(true, use_colors))?,

        Outcome::Violated { message } => {
            if let Some(message) = message {
                writeln!(out, "{message}")?;
            }
            writeln!(out, "{title}: {}", verdict(false, use_colors))?;
        }

        Outcome::MissingData { key, input, hint } => {
            let label = if use_colors {
                "warning:".yellow().bold().to_string()
            } else {
                "warning:".to_string()
            };

            write!(err, "{label} no such key: {key}")?;
            if let Some(input) = input {
                write!(err, " in input '{input}'")?;
            }
            if let Some(hint) = hint {
                write!(err, " ({hint})")?;
            }
            writeln!(err)?;

            writeln!(out, "{title}: {}", verdict(false, use_colors))?;
        }

        Outcome::Fatal(cause) => {
            let label = if use_colors {
                "error:".red().bold().to_string()
            } else {
                "error:".to_string()
            };

            if let FatalCause::Load(e) = cause {
                writeln!(err, "{label} could not load rule '{}': {e}", report.source)?;
                return Ok(());
            }

            writeln!(err, "{label} rule '{title}' failed: {cause}")?;
            if let Some(expression) = &report.expression {
                writeln!(err, "  expression: {expression}")?;
            }
            if let Some(input) = cause.input() {
                writeln!(err, "  input: {input}")?;
            }
        }
    }

    Ok(())
}

fn verdict(passed: bool, use_colors: bool) -> String {
    match (passed, use_colors) {
        (true, true) => "true".green().to_string(),
        (false, true) => "false".red().to_string(),
        (true, false) => "true".to_string(),
        (false, false) => "false".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::EvalError;
    use crate::inputs::CollectionError;
    use crate::rule::LoadError;

    fn report(outcome: Outcome) -> ReportableRule {
        ReportableRule {
            source: "rules/kubelet.yaml".to_string(),
            title: Some("Kubelet read-only port is disabled".to_string()),
            expression: Some("kubelet.readOnlyPort == 0".to_string()),
            outcome,
        }
    }

    fn render(report: &ReportableRule, use_colors: bool) -> (String, String) {
        let mut out = String::new();
        let mut err = String::new();
        generate(report, use_colors, &mut out, &mut err).unwrap();
        (out, err)
    }

    #[test]
    fn test_satisfied() {
        let (out, err) = render(&report(Outcome::Satisfied), false);
        insta::assert_snapshot!(out, @"Kubelet read-only port is disabled: true");
        assert!(err.is_empty());
    }

    #[test]
    fn test_violated_with_message() {
        let (out, err) = render(
            &report(Outcome::Violated {
                message: Some("The kubelet read-only port is enabled".to_string()),
            }),
            false,
        );

        insta::assert_snapshot!(out, @r"
        The kubelet read-only port is enabled
        Kubelet read-only port is disabled: false
        ");
        assert!(err.is_empty());
    }

    #[test]
    fn test_violated_without_message() {
        let (out, _) = render(&report(Outcome::Violated { message: None }), false);
        insta::assert_snapshot!(out, @"Kubelet read-only port is disabled: false");
    }

    #[test]
    fn test_missing_data_warns() {
        let (out, err) = render(
            &report(Outcome::MissingData {
                key: "readOnlyPort".to_string(),
                input: Some("kubelet".to_string()),
                hint: Some("v1/configmaps/kubelet-config in namespace kube-system".to_string()),
            }),
            false,
        );

        insta::assert_snapshot!(out, @"Kubelet read-only port is disabled: false");
        insta::assert_snapshot!(err, @"warning: no such key: readOnlyPort in input 'kubelet' (v1/configmaps/kubelet-config in namespace kube-system)");
    }

    #[test]
    fn test_fatal_names_rule_expression_and_input() {
        let (out, err) = render(
            &report(Outcome::Fatal(FatalCause::Collection(CollectionError::ResourceNotFound {
                input: "kubelet".to_string(),
                what: "v1/configmaps/kubelet-config in namespace kube-system".to_string(),
            }))),
            false,
        );

        assert!(out.is_empty());
        insta::assert_snapshot!(err, @r"
        error: rule 'Kubelet read-only port is disabled' failed: input 'kubelet': v1/configmaps/kubelet-config in namespace kube-system not found
          expression: kubelet.readOnlyPort == 0
          input: kubelet
        ");
    }

    #[test]
    fn test_fatal_evaluation_without_input() {
        let (_, err) = render(
            &report(Outcome::Fatal(FatalCause::Evaluation(EvalError::Other {
                message: "Undeclared reference to 'typo'".to_string(),
            }))),
            false,
        );

        insta::assert_snapshot!(err, @r"
        error: rule 'Kubelet read-only port is disabled' failed: Undeclared reference to 'typo'
          expression: kubelet.readOnlyPort == 0
        ");
    }

    #[test]
    fn test_load_failure_names_path() {
        let report = ReportableRule::new(
            "rules/kubelet.yaml",
            None,
            Outcome::Fatal(FatalCause::Load(LoadError::ParseError {
                message: "missing field `expression`".to_string(),
            })),
        );

        let (out, err) = render(&report, false);

        assert!(out.is_empty());
        insta::assert_snapshot!(err, @"error: could not load rule 'rules/kubelet.yaml': could not parse rule document: missing field `expression`");
    }

    #[test]
    fn test_colors() {
        let (out, _) = render(&report(Outcome::Satisfied), true);
        assert!(out.contains("\u{1b}["), "{out:?}");
        assert!(out.starts_with("Kubelet read-only port is disabled: "));
    }
}

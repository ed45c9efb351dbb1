use super::Host;
use super::common::{ColorMode, LogLevel, OutputFormat, init_logging};
use super::config::Config;
use crate::Result;
use crate::expr::{Environment, EvaluationContext, FatalCause, Outcome, classify};
use crate::inputs::{CancelSignal, ClusterClient, CollectionError, Collector, HttpClusterClient, needs_cluster};
use crate::reports::{ReportableRule, generate_console, generate_json};
use crate::rule::{self, InputSource, Rule};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use clap::builder::NonEmptyStringValueParser;
use std::io::Write;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the rule document to evaluate
    #[arg(short = 'i', long = "input", value_name = "PATH", value_parser = NonEmptyStringValueParser::new())]
    pub input: String,

    /// Path to a configuration file
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Path to the kubeconfig used for cluster resource inputs
    #[arg(long, value_name = "PATH", env = "KUBECONFIG")]
    pub kubeconfig: Option<Utf8PathBuf>,

    /// How to render the outcome
    #[arg(long, value_name = "FORMAT", default_value = "console")]
    pub format: OutputFormat,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

/// Load, collect, evaluate, and report on the rule named by `args`.
///
/// The outcome is written to the host and, unless it maps to exit code 0,
/// the host is asked to exit with the configured code. Errors are returned only
/// for problems outside the rule itself, such as an unreadable configuration file.
pub async fn check<H: Host>(host: &mut H, args: &CheckArgs, cancel: &CancelSignal) -> Result<()> {
    init_logging(args.log_level);

    let config = Config::load(args.config.as_deref())?;
    let path = Utf8Path::new(&args.input);

    let (rule, outcome) = match rule::load(path) {
        Ok(rule) => {
            let outcome = run_rule(&rule, &config, args.kubeconfig.as_deref(), cancel).await;
            (Some(rule), outcome)
        }
        Err(e) => (None, Outcome::Fatal(FatalCause::Load(e))),
    };

    log::info!("rule '{}' evaluated as {}", args.input, outcome.kind());

    let report = ReportableRule::new(path.as_str(), rule.as_ref(), outcome);
    render(host, &report, args)?;

    let code = config.exit_code(&report.outcome);
    if code != 0 {
        host.exit(code);
    }

    Ok(())
}

async fn run_rule(rule: &Rule, config: &Config, kubeconfig: Option<&Utf8Path>, cancel: &CancelSignal) -> Outcome {
    let client = match kubeconfig {
        Some(path) if needs_cluster(rule) => match HttpClusterClient::from_kubeconfig(path, config.request_timeout) {
            Ok(client) => Some(client),
            Err(e) => {
                return Outcome::Fatal(FatalCause::Collection(CollectionError::MissingCredentials {
                    input: first_cluster_input(rule).unwrap_or_default().to_string(),
                    message: format!("{e:#}"),
                }));
            }
        },
        _ => None,
    };

    let collector = Collector::new(client, config.unrecognized_inputs);
    evaluate_rule(rule, &collector, cancel).await
}

/// Run the evaluation pipeline for `rule`: collect its inputs, build the
/// context, compile and evaluate the expression, and classify the result.
///
/// Compilation is only attempted once every input has been collected.
pub async fn evaluate_rule<C: ClusterClient>(rule: &Rule, collector: &Collector<C>, cancel: &CancelSignal) -> Outcome {
    let collected = match collector.collect(rule, cancel).await {
        Ok(collected) => collected,
        Err(e) => return Outcome::Fatal(e.into()),
    };

    let context = EvaluationContext::build(collected);
    let program = match Environment::for_context(&context).compile(rule.expression()) {
        Ok(program) => program,
        Err(e) => return Outcome::Fatal(e.into()),
    };

    let result = program.evaluate(&context);
    classify(result, rule, program.referenced_inputs())
}

fn first_cluster_input(rule: &Rule) -> Option<&str> {
    rule.inputs()
        .iter()
        .find(|input| matches!(input.source(), InputSource::ClusterResource(_)))
        .map(rule::Input::name)
}

fn render<H: Host>(host: &mut H, report: &ReportableRule, args: &CheckArgs) -> Result<()> {
    match args.format {
        OutputFormat::Console => {
            let mut out = String::new();
            let mut err = String::new();
            generate_console(report, args.color.use_colors(), &mut out, &mut err)?;

            write!(host.error(), "{err}")?;
            write!(host.output(), "{out}")?;
        }
        OutputFormat::Json => {
            let mut out = String::new();
            generate_json(report, &mut out)?;
            write!(host.output(), "{out}")?;
        }
    }

    Ok(())
}

//! HealthPlan command line client
//!
//! Runs the mobile app's plan, payment and member lookups against the plan
//! backend and prints the results as JSON:
//! - Active plans and plan cards with annual/monthly prices
//! - Payment options of a plan, optionally narrowed to one billing cycle
//! - Payment method catalog and installment pickers
//! - Contract installments, dependents and waiting-room schedules

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::info;

use healthplan_billing::{
    distinct_method_names, installment_choices, load_cycle_options, load_plan_options,
    BillingService, ContractId, PaymentMethodSelectionView, PlanCardView, PlanId, PlanPriceSummary,
};
use healthplan_member::{
    active_contract, filter_by_date_range, parse_day, MemberContract, MemberService, PatientId,
};
use healthplan_shared::{ApiClient, Config, FetchOutcome, LoadEvent};

#[derive(Debug, Parser)]
#[command(name = "healthplan", version, about = "HealthPlan backend client")]
struct Cli {
    /// Bearer token; falls back to HEALTHPLAN_ACCESS_TOKEN
    #[arg(long, global = true)]
    token: Option<String>,

    /// Fail when the backend cannot be reached instead of printing an empty list
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Active plans, sorted by name
    Plans,
    /// Plan cards with enrollment fee, features and prices
    Cards,
    /// Payment options of a plan
    Options(OptionsArgs),
    /// Annual and monthly price of a plan
    Price {
        #[arg(long)]
        plan: PlanId,
    },
    /// Payment method picker for a plan and billing cycle
    Picker(PickerArgs),
    /// Active payment methods offered to members
    Methods,
    /// Method and installment choices of a plan
    Choices {
        #[arg(long)]
        plan: PlanId,
    },
    /// Installments of a contract
    Installments {
        #[arg(long)]
        contract: ContractId,
    },
    /// Dependents of a contract and the free allowance
    Dependents(DependentsArgs),
    /// Waiting-room schedules of a patient
    Schedules(SchedulesArgs),
}

#[derive(Debug, Args)]
struct OptionsArgs {
    /// Plan id; every plan's options when omitted
    #[arg(long)]
    plan: Option<PlanId>,
    #[arg(long, conflicts_with = "monthly", requires = "plan")]
    annual: bool,
    #[arg(long, requires = "plan")]
    monthly: bool,
}

#[derive(Debug, Args)]
struct PickerArgs {
    #[arg(long)]
    plan: PlanId,
    /// Annual track; monthly otherwise
    #[arg(long)]
    annual: bool,
}

#[derive(Debug, Args)]
struct DependentsArgs {
    /// Contract id
    #[arg(long, required_unless_present = "contracts_file")]
    contract: Option<i64>,
    /// Free dependent allowance of the contract's plan
    #[arg(long, default_value_t = 0, conflicts_with = "contracts_file")]
    max: u32,
    /// Member contracts as JSON; the first active one is used
    #[arg(long, conflicts_with = "contract")]
    contracts_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SchedulesArgs {
    #[arg(long)]
    patient: String,
    /// First day, YYYY-MM-DD
    #[arg(long)]
    from: Option<String>,
    /// Last day, YYYY-MM-DD
    #[arg(long)]
    to: Option<String>,
}

/// Unwrap a fetch for printing
fn into_list<T>(outcome: FetchOutcome<T>, strict: bool) -> anyhow::Result<Vec<T>> {
    match outcome {
        FetchOutcome::Failed(e) if strict => Err(e.into()),
        outcome => Ok(outcome.into_items()),
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_contracts(path: &Path) -> anyhow::Result<Vec<MemberContract>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid contracts in {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let token = config.token(cli.token.as_deref())?;

    info!(api_base_url = %config.api_base_url, "Starting HealthPlan client");

    let billing = BillingService::from_config(&config);
    let member = MemberService::new(ApiClient::from_config(&config));
    let strict = cli.strict;

    match cli.command {
        Command::Plans => {
            let plans = into_list(billing.plans.list_active_plans(token).await, strict)?;
            print_json(&plans)?;
        }
        Command::Cards => {
            let plans = into_list(billing.plans.list_active_plans(token).await, strict)?;
            let mut cards = Vec::with_capacity(plans.len());

            for plan in plans {
                let Ok(plan_id) = plan.plan_id() else {
                    tracing::warn!(plan_id = plan.id, "Skipping plan with invalid id");
                    continue;
                };
                let mut view = PlanCardView::new(plan, billing.currency().clone());
                view.apply(LoadEvent::Started);
                if let Some(event) =
                    load_plan_options(&billing.resolver, plan_id, token, view.token()).await
                {
                    view.apply(event);
                }
                let card = view.card();
                let lines = card.prices.display_lines();
                cards.push(json!({ "card": card, "lines": lines }));
            }

            print_json(&cards)?;
        }
        Command::Options(args) => {
            let outcome = match (args.plan, args.annual, args.monthly) {
                (Some(plan), true, _) => billing.resolver.options_for_cycle(plan, true, token).await,
                (Some(plan), _, true) => {
                    billing.resolver.options_for_cycle(plan, false, token).await
                }
                (plan, _, _) => billing.resolver.fetch_options(plan, token).await,
            };
            print_json(&into_list(outcome, strict)?)?;
        }
        Command::Price { plan } => {
            let outcome = billing.resolver.fetch_options_for_plan(plan, token).await;
            let options = into_list(outcome, strict)?;
            let summary = PlanPriceSummary::from_options(&options, billing.currency());
            print_json(&json!({
                "plan_id": plan,
                "summary": summary,
                "lines": summary.display_lines(),
            }))?;
        }
        Command::Picker(args) => {
            let mut view = PaymentMethodSelectionView::new(args.plan, args.annual);
            view.apply(LoadEvent::Started);
            if let Some(event) = load_cycle_options(
                &billing.resolver,
                view.plan_id(),
                view.want_annual(),
                token,
                view.token(),
            )
            .await
            {
                let event = match event {
                    LoadEvent::Finished(FetchOutcome::Failed(e)) if strict => return Err(e.into()),
                    event => event,
                };
                view.apply(event);
            }
            print_json(&view.rows())?;
        }
        Command::Methods => {
            let methods = into_list(billing.payment_methods.list_active_methods(token).await, strict)?;
            print_json(&methods)?;
        }
        Command::Choices { plan } => {
            let outcome = billing.resolver.fetch_options_for_plan(plan, token).await;
            let options = into_list(outcome, strict)?;
            print_json(&json!({
                "methods": distinct_method_names(&options),
                "installments": installment_choices(&options, billing.currency()),
            }))?;
        }
        Command::Installments { contract } => {
            let outcome = billing.installments.list_for_contract(contract, token).await;
            print_json(&into_list(outcome, strict)?)?;
        }
        Command::Dependents(args) => {
            let (contract_id, contract) = match (&args.contracts_file, args.contract) {
                (Some(path), _) => {
                    let contracts = load_contracts(path)?;
                    let active = active_contract(&contracts)?.clone();
                    (active.contract_id()?, active)
                }
                (None, Some(id)) => (
                    id,
                    MemberContract {
                        id: Some(id),
                        is_active: true,
                        max_dependents: Some(args.max),
                        additional_dependent_fee: None,
                    },
                ),
                (None, None) => anyhow::bail!("Pass --contract or --contracts-file"),
            };

            let outcome = member.dependents.list_for_contract(contract_id, token).await;
            let dependents = into_list(outcome, strict)?;
            let allowance = contract.allowance(dependents.len());

            let rows: Vec<_> = dependents
                .iter()
                .map(|d| {
                    json!({
                        "name": d.name,
                        "cpf": d.masked_cpf(),
                        "status": d.status_label(),
                        "registered": d.registered_display(),
                        "updated": d.updated_display(),
                    })
                })
                .collect();

            print_json(&json!({
                "contract_id": contract_id,
                "dependents": rows,
                "allowance": allowance.summary(),
                "can_add": allowance.can_add(),
                "notice": allowance.paid_dependent_notice(billing.currency()),
            }))?;
        }
        Command::Schedules(args) => {
            let patient = PatientId::new(args.patient)?;
            let start = args.from.as_deref().map(parse_day).transpose()?;
            let end = args.to.as_deref().map(parse_day).transpose()?;

            let outcome = member.schedules.list_waiting(&patient, token).await;
            let waiting = into_list(outcome, strict)?;
            print_json(&filter_by_date_range(&waiting, start, end))?;
        }
    }

    Ok(())
}

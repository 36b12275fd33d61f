//! Premium subscription commands
use crate::context::AppContext;
use crate::output;
use crate::PlanArg;
use anyhow::{anyhow, Context, Result};
use readarabic_core::api::SubscriptionApi;
use readarabic_core::models::{NewSubscription, Plan};

pub async fn subscription_status(ctx: &AppContext, json: bool) -> Result<()> {
    let user = ctx.require_user()?;
    let subscription = ctx
        .api()?
        .status(&user.id)
        .await
        .context("Failed to fetch subscription")?;

    if json {
        return output::print_json("subscription.status", subscription);
    }
    let Some(sub) = subscription else {
        println!("Free plan");
        return Ok(());
    };
    let plan = sub.subscription_type.map(|p| p.as_str()).unwrap_or("premium");
    println!("{plan} · {}", sub.status.as_str());
    if let Some(next) = &sub.next_billing_date {
        println!("Next billing: {next}");
    }
    if let Some(expires) = &sub.expires_at {
        println!("Expires: {expires}");
    }
    Ok(())
}

pub async fn cancel_subscription(ctx: &AppContext) -> Result<()> {
    let user = ctx.require_user()?;
    ctx.api()?
        .cancel(&user.id)
        .await
        .context("Failed to cancel subscription")?;
    println!("Subscription cancelled");
    Ok(())
}

pub async fn create_subscription(
    ctx: &AppContext,
    plan: PlanArg,
    paypal_subscription_id: &str,
) -> Result<()> {
    let user = ctx.require_user()?;
    let (plan, plan_id) = match plan {
        PlanArg::Monthly => (Plan::Monthly, &ctx.config.subscription.monthly_plan_id),
        PlanArg::Annual => (Plan::Annual, &ctx.config.subscription.annual_plan_id),
    };
    let plan_id = plan_id
        .clone()
        .ok_or_else(|| anyhow!("No PayPal plan id configured for the {} plan", plan.as_str()))?;

    let request = NewSubscription {
        user_id: user.id,
        paypal_subscription_id: paypal_subscription_id.to_string(),
        paypal_plan_id: plan_id,
        subscription_type: plan,
    };
    let api = ctx.api()?;
    SubscriptionApi::create(&api, &request)
        .await
        .context("Failed to record subscription")?;
    println!("✅ {} subscription active", plan.as_str());
    Ok(())
}

//! Fee withdrawal
//!
//! Raises the fee, then lets traders buy until collected fees cross the
//! withdrawal threshold. Every withdrawal attempt below the threshold must be
//! rejected; the first one above it must pay the owner exactly the collected
//! fees without touching the trading reserve.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use types::numeric::whole_units;

use crate::chain::Chain;
use crate::config::SimulationConfig;
use crate::metrics::SimMetrics;
use crate::scenarios::ScenarioResult;

/// Fee used for the run, as a scaled percentage (25%).
const FEE_PERCENTAGE: u64 = 25;

/// Upper bound on buys before giving up.
const MAX_BUYS: u64 = 50;

pub fn run(chain: &mut Chain, config: &SimulationConfig, metrics: &mut SimMetrics) -> ScenarioResult {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(2));
    let mut local = SimMetrics::new();
    let trader_count = chain.accounts().traders.len();
    let owner = chain.accounts().owner;
    let mut missed_withdrawals = 0u64;
    let mut payout_mismatch = false;
    let mut withdrawn = None;
    let mut buys = 0u64;

    let outcome = chain.set_fee_percentage(whole_units(FEE_PERCENTAGE));
    local.record(&outcome);

    while buys < MAX_BUYS && trader_count > 0 {
        let collected = chain.state().exchange.fees_collected();
        let threshold = chain.state().exchange.withdrawal_threshold();
        let owner_before = chain.native_balance(&owner);
        let reserve_before = chain.ether_reserve();

        let outcome = chain.withdraw_fees();
        local.record(&outcome);
        match outcome {
            Ok(receipt) => {
                if collected <= threshold
                    || receipt.output != collected
                    || chain.native_balance(&owner) != owner_before + collected
                    || chain.ether_reserve() != reserve_before
                    || !chain.state().exchange.fees_collected().is_zero()
                {
                    payout_mismatch = true;
                }
                withdrawn = Some(receipt.output);
                break;
            }
            Err(_) if collected > threshold => missed_withdrawals += 1,
            Err(_) => {}
        }

        let trader = rng.gen_range(0..trader_count);
        let amount = whole_units(rng.gen_range(1..=config.max_trade_tokens.clamp(1, 10)));
        let outcome = chain.buy_tokens(trader, amount, whole_units(5));
        local.record(&outcome);
        buys += 1;
    }

    let passed = withdrawn.is_some() && !payout_mismatch && missed_withdrawals == 0;
    let details = match withdrawn {
        Some(amount) => format!("Withdrew {} after {} buys.", amount, buys),
        None => format!("Threshold not reached after {} buys.", buys),
    };
    info!(passed, %details, "Fee withdrawal scenario finished");
    let result = ScenarioResult::new("fee_withdrawal", buys, chain, &local, passed, details);
    metrics.merge(&local);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_withdrawal_passes() {
        let config = SimulationConfig::default();
        let mut chain = Chain::bootstrap(&config).unwrap();
        let mut metrics = SimMetrics::new();
        let result = run(&mut chain, &config, &mut metrics);
        assert!(result.passed, "{}", result.details);
        assert!(metrics.rejections_by_reason.contains_key("Insufficient amount of fees"));
        assert!(metrics.fees_withdrawn > rust_decimal::Decimal::ZERO);
        assert!(chain.state().exchange.fees_collected().is_zero());
    }
}
